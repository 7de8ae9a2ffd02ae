//! CLI entry point for the river crossing solver.
//!
//! Usage:
//!   river-crossing solve [puzzle.json] [options]
//!   river-crossing solve --stdin [options]
//!
//! Options:
//!   --preset <name>        Built-in roster when no file is given: classic, family (default: classic)
//!   --algorithm <name>     bfs, dfs or dls (default: bfs)
//!   --depth-limit <n>      Crossing limit for dls (default: 20)
//!   --capacity <n>         Override the boat capacity
//!   --explored             Include every explored state in the output
//!   --format <fmt>         json or text (default: json)
//!
//! Exit codes: 0 solved, 1 no plan found, 2 bad input.
//! Set RUST_LOG (e.g. `RUST_LOG=river_crossing=debug`) for search logs on stderr.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use river_crossing::{
    Algorithm, PuzzleConfig, PuzzleError, SearchOutcome, SearchResult, SearchStats, Solver,
    State, Transition,
};

#[derive(Parser)]
#[command(name = "river-crossing")]
#[command(about = "Uninformed search solver for the river crossing puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a crossing plan
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Built-in roster used when no puzzle file is given
        #[arg(long, value_enum, default_value = "classic")]
        preset: Preset,

        /// Search strategy
        #[arg(long, value_enum, default_value = "bfs")]
        algorithm: AlgorithmArg,

        /// Maximum crossings explored by dls
        #[arg(long, default_value = "20")]
        depth_limit: usize,

        /// Boat capacity, overriding the puzzle's
        #[arg(long)]
        capacity: Option<usize>,

        /// Include all explored states in the output
        #[arg(long)]
        explored: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Classic,
    Family,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Bfs,
    Dfs,
    Dls,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Output format for a search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    outcome: SearchOutcome,
    algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    crossings: Option<usize>,
    path: Vec<State>,
    moves: Vec<Transition>,
    stats: SearchStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    explored: Option<Vec<State>>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether a plan was found
fn run(cli: Cli) -> Result<bool, PuzzleError> {
    match cli.command {
        Commands::Solve {
            file,
            stdin,
            preset,
            algorithm,
            depth_limit,
            capacity,
            explored,
            format,
        } => {
            let mut puzzle = load_puzzle(file, stdin, preset)?;
            if let Some(capacity) = capacity {
                puzzle.boat_capacity = capacity;
            }

            let algorithm = match algorithm {
                AlgorithmArg::Bfs => Algorithm::Bfs,
                AlgorithmArg::Dfs => Algorithm::Dfs,
                AlgorithmArg::Dls => Algorithm::Dls { limit: depth_limit },
            };

            let solver = Solver::new(puzzle)?;
            let result = solver.solve_from_start(algorithm)?;

            match format {
                Format::Json => {
                    let output = format_result(&result, explored);
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                Format::Text => print_text(&result, explored),
            }

            Ok(result.is_solved())
        }
    }
}

fn load_puzzle(
    file: Option<PathBuf>,
    stdin: bool,
    preset: Preset,
) -> Result<PuzzleConfig, PuzzleError> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        PuzzleConfig::from_json(&buffer)
    } else if let Some(path) = file {
        PuzzleConfig::from_json_file(&path)
    } else {
        Ok(match preset {
            Preset::Classic => PuzzleConfig::classic(),
            Preset::Family => PuzzleConfig::family(),
        })
    }
}

fn format_result(result: &SearchResult, include_explored: bool) -> SolveOutput {
    SolveOutput {
        solved: result.is_solved(),
        outcome: result.outcome,
        algorithm: result.algorithm,
        crossings: result.crossings(),
        path: result.path.clone(),
        moves: result.transitions(),
        stats: result.stats.clone(),
        explored: include_explored.then(|| result.explored.clone()),
    }
}

fn print_text(result: &SearchResult, include_explored: bool) {
    match result.outcome {
        SearchOutcome::Solved => println!(
            "{}: solved in {} crossings ({} states explored)",
            result.algorithm,
            result.crossings().unwrap_or(0),
            result.explored.len()
        ),
        SearchOutcome::Exhausted => println!(
            "{}: no solution ({} states explored)",
            result.algorithm,
            result.explored.len()
        ),
        SearchOutcome::DepthLimitReached => println!(
            "{}: no solution within the depth limit ({} states explored)",
            result.algorithm,
            result.explored.len()
        ),
    }

    if let Some(start) = result.path.first() {
        println!("0: {}", start);
    }
    for (transition, state) in result.transitions().iter().zip(result.path.iter().skip(1)) {
        println!("{}", transition);
        println!("   {}", state);
    }

    if include_explored {
        println!();
        println!("Explored:");
        for (i, state) in result.explored.iter().enumerate() {
            println!("{:>4}: {}", i + 1, state);
        }
    }
}
