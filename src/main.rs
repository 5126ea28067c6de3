use std::env;
use std::io;
use std::process::ExitCode;

use mpi::traits::*;
use tracing::{error, info};

use distributed_matrix_product::cli::{self, Invocation};
use distributed_matrix_product::coordinator::Coordinator;
use distributed_matrix_product::error::Error;
use distributed_matrix_product::matrix::Matrix;
use distributed_matrix_product::verify;
use distributed_matrix_product::worker::Worker;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let universe = match mpi::initialize() {
        Some(universe) => universe,
        None => {
            eprintln!("failed to initialize MPI");
            return ExitCode::FAILURE;
        }
    };
    let world = universe.world();
    let rank = world.rank();
    let size = world.size();

    // Every rank sees the same argv, so all of them exit here together
    // without touching the communicator again.
    let args: Vec<String> = env::args().collect();
    if args.iter().skip(1).any(|arg| arg == "--help" || arg == "-help") {
        if rank == 0 {
            println!("{}", cli::USAGE);
        }
        return ExitCode::FAILURE;
    }

    if (size as usize) < 2 {
        if rank == 0 {
            error!("{}", Error::InsufficientWorkers(size as usize));
        }
        return ExitCode::FAILURE;
    }

    let outcome = if rank == 0 {
        run_coordinator(&world, &args)
    } else {
        Worker::new(&world).run()
    };

    if let Err(e) = outcome {
        error!("rank {}: {}", rank, e);
        // Peers may be blocked mid-protocol; tear the whole computation
        // down instead of stranding them.
        world.abort(1);
    }

    ExitCode::SUCCESS
}

fn run_coordinator<C: Communicator>(world: &C, args: &[String]) -> Result<(), Error> {
    let options = match cli::parse(args)? {
        Invocation::Run(options) => options,
        Invocation::Help => {
            println!("{}", cli::USAGE);
            return Err(Error::InvalidArgument("help requested".to_string()));
        }
        Invocation::Prompt => {
            let mut stdin = io::stdin().lock();
            cli::prompt_for_options(&mut stdin)?
        }
    };

    if let Some(processes) = options.processes {
        let size = world.size() as usize;
        if processes != size {
            return Err(Error::InvalidArgument(format!(
                "requested {} processes but {} were launched",
                processes, size
            )));
        }
    }

    info!("loading matrix A from {:?}", options.matrix_a);
    let a = Matrix::load_from_file(&options.matrix_a)?;
    info!("loading matrix B from {:?}", options.matrix_b);
    let b = Matrix::load_from_file(&options.matrix_b)?;

    let coordinator = Coordinator::new(world);
    let (product, record) = coordinator.multiply(&a, &b)?;

    info!("writing product to {:?}", options.output);
    product.save_to_file(&options.output)?;

    // The oracle compares the bare matrix, so the annotation goes in after
    // verification.
    verify::verify_product(&options.matrix_a, &options.matrix_b, &options.output)?;
    record.append_to(&options.output)?;

    info!("product and timing written to {:?}", options.output);
    Ok(())
}
