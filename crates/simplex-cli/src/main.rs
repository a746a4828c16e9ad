use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use env_logger::Builder;
use simplex_solver::{Comparator, Problem, SolveError, Solver, VariableIndex};

#[derive(Parser)]
#[command(name = "simplex")]
#[command(about = "Solve linear programs with the two-phase simplex method", long_about = None)]
struct Cli {
    #[command(flatten)]
    verbosity: Verbosity,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a problem file and print it
    Parse {
        /// The file to parse (.json or the text format)
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Solve a problem and output the optimal solution
    Solve {
        /// The file containing the problem
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Magnitudes at or below this are treated as zero
        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,
        /// Maximum number of pivots
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
    },
    /// Check a problem file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

fn load_problem(file: &Path) -> Result<Problem, String> {
    let source = std::fs::read_to_string(file).map_err(|e| format!("Error reading file: {}", e))?;
    log::debug!("read {} bytes from {}", source.len(), file.display());

    if file.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&source).map_err(|e| format!("JSON error: {}", e))
    } else {
        simplex_lang::Parser::parse(&source).map_err(|e| format!("Parse error: {}", e))
    }
}

fn load_or_exit(file: &Path) -> Problem {
    match load_problem(file) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    match cli.command {
        Commands::Parse { file, format } => {
            let problem = load_or_exit(&file);
            if format == "json" {
                match serde_json::to_string_pretty(&problem) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                println!("{}", problem);
            }
        }
        Commands::Solve {
            file,
            format,
            tolerance,
            max_iterations,
        } => {
            let problem = load_or_exit(&file);

            let solver = Solver::new()
                .with_tolerance(tolerance)
                .with_max_iterations(max_iterations);
            let solution = match solver.solve(&problem) {
                Ok(solution) => solution,
                Err(e) => {
                    match e {
                        SolveError::Infeasible { .. } => {
                            println!("Status: INFEASIBLE");
                            println!("No solution exists that satisfies all constraints.");
                        }
                        SolveError::Unbounded { .. } => {
                            println!("Status: UNBOUNDED");
                            println!("The problem has no finite optimal solution.");
                        }
                        SolveError::Malformed(_) | SolveError::IterationLimit(_) => {
                            println!("Status: ERROR");
                        }
                    }
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            println!("Status: OPTIMAL");
            println!("Objective: {:.4}", solution.objective_value);
            println!(
                "Pivots: {} (phase 1: {}, phase 2: {})",
                solution.pivots.total(),
                solution.pivots.phase_one,
                solution.pivots.phase_two
            );
            println!();
            println!("Variables:");
            for (name, value) in &solution.assignment {
                println!("  {:20} {:12.4}", name, value);
            }
        }
        Commands::Check { file } => {
            let problem = match load_problem(&file) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            };

            let mut upper = 0;
            let mut lower = 0;
            let mut equal = 0;
            let mut strict = 0;
            for constraint in problem.constraints() {
                match constraint.comparator() {
                    Comparator::LessOrEqual => upper += 1,
                    Comparator::GreaterOrEqual => lower += 1,
                    Comparator::Equal => equal += 1,
                    Comparator::Less | Comparator::Greater => strict += 1,
                }
            }
            let variables = VariableIndex::build(&problem).len();

            println!("✓ {} is valid", file.display());
            println!("  {} variables", variables);
            println!("  {} <= constraints", upper);
            println!("  {} >= constraints", lower);
            println!("  {} = constraints", equal);
            if strict > 0 {
                println!("  {} strict constraints (not solvable)", strict);
            }
        }
    }
}
