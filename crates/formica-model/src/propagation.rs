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

//! # Constraint Propagation
//!
//! Logical reduction of a board by two classic sudoku rules:
//!
//! - **Elimination** ([`eliminate`]): remove from a cell every value already
//!   fixed somewhere in its row, column, or box. If exactly one candidate
//!   survives, the cell is fixed to it.
//! - **Hidden single** ([`hidden_single`]): if one of a cell's candidates
//!   appears nowhere else in one of its peer groups, the cell must hold it.
//!
//! Fixing a cell re-examines all of its peers, which can fix further cells,
//! and so on until a fixpoint. The cascade is driven by an explicit
//! work-list rather than mutual recursion: fixations on large boards (order
//! 5 and up) can chain through thousands of cells, far past any comfortable
//! stack depth. Termination follows from the fixed-cell counter being
//! strictly monotone and bounded by the cell count.
//!
//! Every rule application credits its wall time to the [`crate::timing`]
//! counters; every fixation outside board construction counts one
//! propagation call.

use crate::board::Board;
use crate::timing;
use formica_core::set::ValueSet;
use smallvec::SmallVec;
use std::time::Instant;

/// Cells pending re-examination. Most cascades stay small; deep ones spill
/// to the heap.
type WorkList = SmallVec<[usize; 128]>;

/// Fixes cell `i` to `value` and propagates the consequences to every peer,
/// transitively, until no further deduction applies.
///
/// Does nothing when the cell is already fixed.
pub fn set_and_propagate(board: &mut Board, i: usize, value: ValueSet) {
    if board.cell(i).is_fixed() {
        return;
    }
    let mut work = WorkList::new();
    fix_cell(board, i, value, &mut work);
    drain(board, &mut work);
}

/// Applies both rules to cell `i` and lets any resulting fixation cascade.
pub fn propagate(board: &mut Board, i: usize) {
    let mut work = WorkList::new();
    visit(board, i, &mut work);
    drain(board, &mut work);
}

/// Rule 1: removes all peer-fixed values from cell `i`.
///
/// Returns `true` when the cell ended up fixed by this rule.
pub fn eliminate(board: &mut Board, i: usize) -> bool {
    let mut work = WorkList::new();
    let fixed = eliminate_inner(board, i, &mut work);
    drain(board, &mut work);
    fixed
}

/// Rule 2: fixes cell `i` when one of its candidates has no other home in
/// some peer group.
///
/// Returns `true` when the cell ended up fixed by this rule.
pub fn hidden_single(board: &mut Board, i: usize) -> bool {
    let mut work = WorkList::new();
    let fixed = hidden_single_inner(board, i, &mut work);
    drain(board, &mut work);
    fixed
}

fn drain(board: &mut Board, work: &mut WorkList) {
    while let Some(i) = work.pop() {
        visit(board, i, work);
    }
}

fn visit(board: &mut Board, i: usize, work: &mut WorkList) {
    let cell = board.cell(i);
    if cell.is_empty() || cell.is_fixed() {
        return;
    }
    if eliminate_inner(board, i, work) {
        return;
    }
    hidden_single_inner(board, i, work);
    if board.cell(i).is_empty() {
        board.bump_infeasible();
    }
}

/// Installs `value` at cell `i` and queues all peers for re-examination.
fn fix_cell(board: &mut Board, i: usize, value: ValueSet, work: &mut WorkList) {
    board.set_cell_direct(i, value);
    board.bump_fixed();
    timing::count_propagation_call();

    let n = board.num_units();
    let b = board.box_for(i);
    let c = board.col_for(i);
    let r = board.row_for(i);
    for j in 0..n {
        let k = board.box_cell(b, j);
        if k != i {
            work.push(k);
        }
        let k = board.col_cell(c, j);
        if k != i {
            work.push(k);
        }
        let k = board.row_cell(r, j);
        if k != i {
            work.push(k);
        }
    }
}

fn eliminate_inner(board: &mut Board, i: usize, work: &mut WorkList) -> bool {
    let start = Instant::now();

    let cell = board.cell(i);
    if cell.is_empty() || cell.is_fixed() {
        timing::record_rule_time(start);
        return false;
    }

    let n = board.num_units();
    let b = board.box_for(i);
    let c = board.col_for(i);
    let r = board.row_for(i);

    let mut peer_fixed = ValueSet::empty(n);
    for j in 0..n {
        let k = board.box_cell(b, j);
        if k != i && board.cell(k).is_fixed() {
            peer_fixed += board.cell(k);
        }
        let k = board.col_cell(c, j);
        if k != i && board.cell(k).is_fixed() {
            peer_fixed += board.cell(k);
        }
        let k = board.row_cell(r, j);
        if k != i && board.cell(k).is_fixed() {
            peer_fixed += board.cell(k);
        }
    }

    let reduced = cell - peer_fixed;
    timing::record_rule_time(start);

    if reduced.is_fixed() {
        fix_cell(board, i, reduced, work);
        true
    } else {
        board.set_cell_direct(i, reduced);
        false
    }
}

fn hidden_single_inner(board: &mut Board, i: usize, work: &mut WorkList) -> bool {
    let start = Instant::now();

    let cell = board.cell(i);
    if cell.is_empty() || cell.is_fixed() {
        timing::record_rule_time(start);
        return false;
    }

    let n = board.num_units();
    let b = board.box_for(i);
    let c = board.col_for(i);
    let r = board.row_for(i);

    let mut box_all = ValueSet::empty(n);
    let mut col_all = ValueSet::empty(n);
    let mut row_all = ValueSet::empty(n);
    for j in 0..n {
        let k = board.box_cell(b, j);
        if k != i {
            box_all += board.cell(k);
        }
        let k = board.col_cell(c, j);
        if k != i {
            col_all += board.cell(k);
        }
        let k = board.row_cell(r, j);
        if k != i {
            row_all += board.cell(k);
        }
    }

    timing::record_rule_time(start);

    if (cell - row_all).is_fixed() {
        fix_cell(board, i, cell - row_all, work);
        true
    } else if (cell - col_all).is_fixed() {
        fix_cell(board, i, cell - col_all, work);
        true
    } else if (cell - box_all).is_fixed() {
        fix_cell(board, i, cell - box_all, work);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    /// Solvable by elimination and hidden singles alone.
    const EASY: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    /// Not fully reducible by the two rules; search is required.
    const HARD: &str =
        "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......";

    /// The three top-right cells of box 2 can only hold {7,8,9}, but row 1
    /// pins all three digits inside the box, leaving row 0 with nothing.
    const CONTRADICTION: &str = concat!(
        "123456...",
        "......789",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    );

    #[test]
    fn test_easy_puzzle_is_fully_reduced() {
        let board = Board::from_puzzle(EASY).unwrap();
        assert_eq!(board.fixed_cell_count(), 81);
        let fingerprint = Board::givens(EASY).unwrap();
        assert!(fingerprint.check_solution(&board));
    }

    #[test]
    fn test_no_peer_keeps_a_fixed_value_as_candidate() {
        let board = Board::from_puzzle(HARD).unwrap();
        for i in 0..board.cell_count() {
            let cell = board.cell(i);
            if !cell.is_fixed() {
                continue;
            }
            let value = cell.index() + 1;
            let (r, c, b) = (board.row_for(i), board.col_for(i), board.box_for(i));
            for j in 0..board.num_units() {
                for k in [board.row_cell(r, j), board.col_cell(c, j), board.box_cell(b, j)] {
                    if k != i && !board.cell(k).is_fixed() {
                        assert!(
                            !board.cell(k).contains(value),
                            "cell {k} still offers the value fixed at cell {i}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_repropagation_is_monotone() {
        let mut board = Board::from_puzzle(HARD).unwrap();
        let fixed_before = board.fixed_cell_count();
        let cells_before: Vec<_> = (0..board.cell_count()).map(|i| board.cell(i)).collect();

        for i in 0..board.cell_count() {
            propagate(&mut board, i);
        }

        assert!(board.fixed_cell_count() >= fixed_before);
        for (i, before) in cells_before.iter().enumerate() {
            let after = board.cell(i);
            // No candidate set may gain bits.
            assert_eq!(after + *before, *before, "cell {i} gained candidates");
        }
    }

    #[test]
    fn test_contradiction_is_recorded_not_fatal() {
        let board = Board::from_puzzle(CONTRADICTION).unwrap();
        assert!(board.infeasible_cell_count() > 0);
    }

    #[test]
    fn test_set_and_propagate_ignores_fixed_cells() {
        let mut board = Board::from_puzzle(EASY).unwrap();
        let before = board.clone();
        // Everything is already fixed; any further set must be a no-op.
        set_and_propagate(&mut board, 0, formica_core::set::ValueSet::singleton(9, 1));
        assert_eq!(board, before);
    }

    #[test]
    fn test_eliminate_reduces_candidates() {
        let mut puzzle = ".".repeat(81);
        // Row 0 holds 1..=6; cell (0,8) keeps {7,8,9} after elimination.
        puzzle.replace_range(0..6, "123456");
        let mut board = Board::givens(&puzzle).unwrap();
        let fixed = eliminate(&mut board, 8);
        assert!(!fixed);
        assert_eq!(board.cell(8).count(), 3);
        assert!(!board.cell(8).contains(1));
        assert!(board.cell(8).contains(7));
    }

    #[test]
    fn test_hidden_single_fixes_unique_candidate() {
        // In row 0, only cell 8 may hold 9: every other row cell has lost it.
        let mut board = Board::givens(&".".repeat(81)).unwrap();
        for i in 0..8 {
            let mut cell = board.cell(i);
            cell.remove(9);
            board.set_cell_direct(i, cell);
        }
        let fixed = hidden_single(&mut board, 8);
        assert!(fixed);
        assert!(board.cell(8).is_fixed());
        assert_eq!(board.cell(8).index(), 8);
    }
}
