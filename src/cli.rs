use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::Error;

pub const USAGE: &str = "\
Usage: distributed-matrix-product <matrix_a> <matrix_b> <output> [processes]
  matrix_a:   path to the left operand (text format)
  matrix_b:   path to the right operand (text format)
  output:     path the product is written to
  processes:  expected process count, checked against the launched world";

/// Paths and the optional process-count check parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub matrix_a: PathBuf,
    pub matrix_b: PathBuf,
    pub output: PathBuf,
    pub processes: Option<usize>,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(RunOptions),
    /// Missing or extra arguments: ask for the paths interactively.
    Prompt,
    Help,
}

/// Parse the raw argument list, program name included.
pub fn parse(args: &[String]) -> Result<Invocation, Error> {
    if args.iter().skip(1).any(|arg| arg == "--help" || arg == "-help") {
        return Ok(Invocation::Help);
    }

    match args.len() {
        4 | 5 => {
            let processes = match args.get(4) {
                Some(token) => Some(parse_process_count(token)?),
                None => None,
            };
            Ok(Invocation::Run(RunOptions {
                matrix_a: PathBuf::from(&args[1]),
                matrix_b: PathBuf::from(&args[2]),
                output: PathBuf::from(&args[3]),
                processes,
            }))
        }
        _ => Ok(Invocation::Prompt),
    }
}

fn parse_process_count(token: &str) -> Result<usize, Error> {
    let count: usize = token.parse().map_err(|_| {
        Error::InvalidArgument(format!(
            "process count must be a positive integer, got {:?}",
            token
        ))
    })?;
    if count < 2 {
        return Err(Error::InvalidArgument(format!(
            "process count must be at least 2, got {}",
            count
        )));
    }
    Ok(count)
}

/// Ask for the three paths on the terminal, one per line.
pub fn prompt_for_options(input: &mut impl BufRead) -> Result<RunOptions, Error> {
    let matrix_a = prompt_path(input, "Path to matrix A: ")?;
    let matrix_b = prompt_path(input, "Path to matrix B: ")?;
    let output = prompt_path(input, "Path to output file: ")?;
    Ok(RunOptions {
        matrix_a,
        matrix_b,
        output,
        processes: None,
    })
}

fn prompt_path(input: &mut impl BufRead, prompt: &str) -> Result<PathBuf, Error> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("expected a file path".to_string()));
    }
    Ok(PathBuf::from(trimmed))
}
