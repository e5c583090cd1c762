// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The driver: resolve a puzzle, build the board, pick an engine, solve,
//! validate against the unreduced givens, print.
//!
//! Arguments are `key value` pairs in any order:
//!
//! ```text
//! formica puzzle <chars> | file <path> | blank 1 order <k>
//!         alg <0|1|2> timeout <secs> ants <n> subcolonies <n>
//!         q0 <f> rho <f> evap <f> verbose 1 showinitial 1 json 1
//! ```

mod args;
mod output;

use args::ArgSet;
use formica_acs::colony::AcsSolver;
use formica_acs::parallel::ParallelAcsSolver;
use formica_acs::params::AcsParams;
use formica_model::board::Board;
use formica_model::{loading, timing};
use formica_solver::backtrack::BacktrackSolver;
use formica_solver::report::CpReport;
use formica_solver::solver::Solver;
use std::time::Duration;

fn main() {
    std::process::exit(run(ArgSet::from_env()));
}

fn resolve_puzzle(args: &ArgSet) -> Option<String> {
    // Blank generation engages only when a usable order accompanies the
    // flag; otherwise the inline and file forms are still consulted.
    if args.get_bool("blank", false) {
        let order = args.get_usize("order", 0);
        if (3..=8).contains(&order) {
            return Some(".".repeat(order * order * order * order));
        }
    }
    if let Some(puzzle) = args.get_str("puzzle") {
        return Some(puzzle.to_string());
    }
    if let Some(path) = args.get_str("file") {
        match loading::read_puzzle_file(path) {
            Ok(puzzle) => return Some(puzzle),
            Err(e) => {
                eprintln!("could not read puzzle file {path}: {e}");
                return None;
            }
        }
    }
    None
}

fn default_timeout(cell_count: usize) -> i64 {
    match cell_count {
        81 => 5,
        256 => 20,
        _ => 120,
    }
}

fn run(args: ArgSet) -> i32 {
    let Some(puzzle_string) = resolve_puzzle(&args) else {
        eprintln!("no puzzle specified");
        return 0;
    };

    timing::reset();

    let board = match Board::from_puzzle(&puzzle_string) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("{e}");
            return 0;
        }
    };
    // The unreduced givens are what a solution is ultimately checked
    // against.
    let fingerprint =
        Board::givens(&puzzle_string).expect("puzzle string parsed once already");

    let algorithm = args.get_i64("alg", 0);
    let num_ants = args.get_usize("ants", 10);
    let num_subcolonies = args.get_usize("subcolonies", 4);
    let verbose = args.get_bool("verbose", false);
    let show_initial = args.get_bool("showinitial", false);
    let json = args.get_bool("json", false);

    let mut timeout_secs = args.get_i64("timeout", -1);
    if timeout_secs <= 0 {
        timeout_secs = default_timeout(board.cell_count());
    }

    let params = AcsParams::new()
        .with_num_ants(num_ants)
        .with_q0(args.get_f32("q0", 0.9))
        .with_rho(args.get_f32("rho", 0.9))
        .with_best_evap(args.get_f32("evap", 0.005));

    let mut solver: Box<dyn Solver> = match algorithm {
        0 => Box::new(AcsSolver::new(params)),
        1 => Box::new(BacktrackSolver::new()),
        2 => Box::new(ParallelAcsSolver::new(params, num_subcolonies)),
        _ => {
            eprintln!(
                "invalid algorithm: {algorithm}; use 0 (single-colony ACS), 1 (backtracking), or 2 (parallel ACS)"
            );
            return 1;
        }
    };

    if show_initial {
        println!("Initial constrained grid");
        println!("{}", board.as_string(false, true));
    }

    let outcome = solver.solve(&board, Duration::from_secs(timeout_secs as u64));

    let mut success = outcome.solved;
    let mut error_message = String::new();
    if success && !fingerprint.check_solution(&outcome.solution) {
        error_message = "solution not valid".to_string();
        success = false;
        if !json {
            println!(
                "solution not valid {} {}",
                args.get_str("file").unwrap_or(""),
                algorithm
            );
            println!("numfixedCells {}", outcome.solution.fixed_cell_count());
            println!("{}", outcome.solution.as_string(true, false));
        }
    }

    let num_workers = if algorithm == 2 { num_subcolonies } else { 1 };
    let report = CpReport::gather(num_workers);
    let iterations = if algorithm == 1 { 0 } else { outcome.iterations };

    if json {
        output::print_json(&output::JsonReport {
            success,
            algorithm,
            time: outcome.seconds(),
            iterations,
            communication: outcome.communication,
            solution: outcome.solution.as_string(true, false),
            error: error_message,
            cp_initial: report.initial,
            cp_ant_avg: report.ant_avg,
            cp_ant_total: report.ant_total,
            cp_calls: report.calls,
            cp_total: report.total(),
        });
        return 0;
    }

    if !verbose {
        output::print_compact(success, outcome.seconds());
    }
    output::print_cp_lines(&report);

    if verbose {
        if success {
            println!("Solution:");
            println!("{}", outcome.solution.as_string(true, false));
            println!("solved in {}", outcome.seconds());
        } else {
            println!("failed in time {}", outcome.seconds());
        }
        if algorithm == 0 {
            println!("iterations: {iterations}");
        } else if algorithm == 2 {
            println!("iterations: {iterations}");
            println!(
                "communication: {}",
                if outcome.communication { "yes" } else { "no" }
            );
        }
        output::print_cp_breakdown(&report, outcome.seconds());
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    fn run_args(list: &[&str]) -> i32 {
        run(ArgSet::parse(list.iter().map(|s| s.to_string())))
    }

    #[test]
    fn test_invalid_algorithm_is_a_hard_error() {
        assert_eq!(run_args(&["puzzle", EASY, "alg", "7"]), 1);
    }

    #[test]
    fn test_missing_puzzle_is_reported_softly() {
        assert_eq!(run_args(&["alg", "0"]), 0);
        assert_eq!(run_args(&["blank", "1"]), 0);
        assert_eq!(run_args(&["blank", "1", "order", "2"]), 0);
    }

    #[test]
    fn test_blank_without_order_falls_through_to_puzzle() {
        // A blank flag with no usable order must not shadow an inline
        // puzzle.
        let args = ArgSet::parse(
            ["blank", "1", "puzzle", EASY].iter().map(|s| s.to_string()),
        );
        assert_eq!(resolve_puzzle(&args).as_deref(), Some(EASY));

        let args = ArgSet::parse(
            ["blank", "1", "order", "2", "puzzle", EASY]
                .iter()
                .map(|s| s.to_string()),
        );
        assert_eq!(resolve_puzzle(&args).as_deref(), Some(EASY));

        assert_eq!(run_args(&["puzzle", EASY, "blank", "1", "alg", "1", "json", "1"]), 0);
    }

    #[test]
    fn test_backtracking_run_completes() {
        assert_eq!(run_args(&["puzzle", EASY, "alg", "1", "json", "1"]), 0);
    }

    #[test]
    fn test_bad_puzzle_string_is_reported_softly() {
        assert_eq!(run_args(&["puzzle", "..x.."]), 0);
    }

    #[test]
    fn test_default_timeouts_scale_with_board_size() {
        assert_eq!(default_timeout(81), 5);
        assert_eq!(default_timeout(256), 20);
        assert_eq!(default_timeout(625), 120);
        assert_eq!(default_timeout(4096), 120);
    }

    #[test]
    fn test_resolve_puzzle_blank_order() {
        let args = ArgSet::parse(
            ["blank", "1", "order", "3"].iter().map(|s| s.to_string()),
        );
        let puzzle = resolve_puzzle(&args).unwrap();
        assert_eq!(puzzle.len(), 81);
        assert!(puzzle.chars().all(|c| c == '.'));
    }
}
