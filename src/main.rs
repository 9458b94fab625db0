// Copyright (c) 2022 Bastiaan Marinus van de Weerd

mod day18;

use std::{fmt, path::PathBuf, process::ExitCode, time::{Duration, Instant}};


/// Adds up snailfish homework (Advent of Code 2021, day 18).
#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
	/// File with one snailfish number per line
	#[arg(short, long, env = "INPUT", default_value = "puzzle.txt")]
	input: PathBuf,
}


struct Execution<E> {
	label: &'static str,
	solution: Result<u64, E>,
	elapsed: Duration,
}

fn run<E>(label: &'static str, input: &str, part: fn(&str) -> Result<u64, E>) -> Execution<E> {
	let start = Instant::now();
	let solution = part(input);
	Execution { label, solution, elapsed: start.elapsed() }
}

impl<E: fmt::Debug> fmt::Display for Execution<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: ", self.label)?;
		match &self.solution {
			Ok(answer) => write!(f, "{answer}")?,
			Err(err) => write!(f, "{err:?}")?,
		}
		write!(f, " ({}ms)", self.elapsed.as_millis())
	}
}


fn main() -> ExitCode {
	use clap::Parser as _;

	let args = Args::parse();
	let input = match std::fs::read_to_string(&args.input) {
		Ok(input) => input,
		Err(err) => {
			eprintln!("Error reading {}: {err}", args.input.display());
			return ExitCode::FAILURE
		}
	};

	let part1 = run("Solution 1", &input, day18::part1);
	let part2 = run("Solution 2", &input, day18::part2);

	println!("\nInput: {}", args.input.display());
	println!("{part1}");
	println!("{part2}");
	ExitCode::SUCCESS
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn args() {
		use clap::{CommandFactory as _, Parser as _};
		Args::command().debug_assert();
		let args = Args::try_parse_from(["advent21", "--input", "homework.txt"]).unwrap();
		assert_eq!(args.input, PathBuf::from("homework.txt"));
		let args = Args::try_parse_from(["advent21", "-i", "day18.txt"]).unwrap();
		assert_eq!(args.input, PathBuf::from("day18.txt"));
		assert!(Args::try_parse_from(["advent21", "--output", "day18.txt"]).is_err());
		if std::env::var_os("INPUT").is_none() {
			let args = Args::try_parse_from(["advent21"]).unwrap();
			assert_eq!(args.input, PathBuf::from("puzzle.txt"));
		}
	}

	#[test]
	fn execution() {
		let mut solved = run("Solution 1", "[[1,2],[[3,4],5]]", day18::part1);
		assert!(matches!(solved.solution, Ok(143)));
		solved.elapsed = Duration::from_millis(3);
		assert_eq!(solved.to_string(), "Solution 1: 143 (3ms)");

		let failed = Execution { label: "Solution 2", solution: Err("missing root"), elapsed: Duration::ZERO };
		assert_eq!(failed.to_string(), "Solution 2: \"missing root\" (0ms)");
	}
}
