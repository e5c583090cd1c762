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

//! Result formatting: the machine-readable one-line JSON report and the
//! plain text forms (a compact failure/time pair for batch runs, plus the
//! propagation timing lines scripts scrape).

use formica_solver::report::CpReport;
use serde::Serialize;

/// The one-line JSON result. Field order is the output order.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub success: bool,
    pub algorithm: i64,
    pub time: f32,
    pub iterations: u64,
    pub communication: bool,
    pub solution: String,
    pub error: String,
    pub cp_initial: f32,
    pub cp_ant_avg: f32,
    pub cp_ant_total: f32,
    pub cp_calls: usize,
    pub cp_total: f32,
}

/// Prints the JSON report on one line.
pub fn print_json(report: &JsonReport) {
    let line = serde_json::to_string(report)
        .expect("called `print_json` on a report that failed to serialize");
    println!("{line}");
}

/// Compact text output for batch processing: failure flag, then seconds.
pub fn print_compact(success: bool, seconds: f32) {
    println!("{}", u8::from(!success));
    println!("{seconds}");
}

/// The propagation timing lines, printed in both text modes.
pub fn print_cp_lines(report: &CpReport) {
    println!("cp_initial: {}", report.initial);
    println!("cp_ant: {}", report.ant_avg);
    println!("cp_calls: {}", report.calls);
}

/// The verbose propagation cost breakdown.
pub fn print_cp_breakdown(report: &CpReport, solve_seconds: f32) {
    println!("\n=== Constraint Propagation Timing ===");
    println!("Initial CP time:    {:.6} s", report.initial);
    println!("Ant CP time:        {:.6} s", report.ant_total);
    println!("CP calls during ants: {}", report.calls);
    println!("Total CP time:      {:.6} s", report.total());
    println!("Total solve time:   {:.6} s", solve_seconds);

    let cp_share = report.total() / solve_seconds * 100.0;
    println!("\nCP overhead:        {:.6}% of total time", cp_share);
    println!("ACO computation:    {:.6}% of total time", 100.0 - cp_share);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JsonReport {
        JsonReport {
            success: true,
            algorithm: 2,
            time: 0.5,
            iterations: 120,
            communication: true,
            solution: "1 2\n3 4".to_string(),
            error: String::new(),
            cp_initial: 0.01,
            cp_ant_avg: 0.02,
            cp_ant_total: 0.08,
            cp_calls: 42,
            cp_total: 0.09,
        }
    }

    #[test]
    fn test_json_report_has_all_keys_on_one_line() {
        let line = serde_json::to_string(&sample()).unwrap();
        for key in [
            "success",
            "algorithm",
            "time",
            "iterations",
            "communication",
            "solution",
            "error",
            "cp_initial",
            "cp_ant_avg",
            "cp_ant_total",
            "cp_calls",
            "cp_total",
        ] {
            assert!(line.contains(&format!("\"{key}\":")), "missing key {key}");
        }
        // Newlines in the solution grid must be escaped, not literal.
        assert!(!line.contains('\n'));
        assert!(line.contains("\\n"));
    }

    #[test]
    fn test_json_key_order_matches_declaration() {
        let line = serde_json::to_string(&sample()).unwrap();
        let success = line.find("\"success\"").unwrap();
        let algorithm = line.find("\"algorithm\"").unwrap();
        let cp_total = line.find("\"cp_total\"").unwrap();
        assert!(success < algorithm);
        assert!(algorithm < cp_total);
    }
}
