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

//! # Board
//!
//! A square sudoku board of order `k` (side length `N = k²`, `N²` cells),
//! stored as a flat vector of candidate sets in row-major order. Alongside
//! the cells the board maintains two counters: the number of *fixed* cells
//! (exactly one candidate) and the number of *infeasible* cells (no
//! candidates left). The propagation engine keeps both incremental.
//!
//! Construction from a puzzle string immediately runs constraint
//! propagation on every given cell, so a freshly parsed board is already
//! logically reduced. [`Board::givens`] builds the unreduced board instead;
//! the driver retains one as the fingerprint that final solutions are
//! checked against.
//!
//! Cell geometry (row/column/box membership) is pure arithmetic on the
//! order, exposed as the `*_cell` and `*_for` helper methods.

use crate::loading::{self, PuzzleError};
use crate::propagation;
use crate::timing;
use formica_core::set::ValueSet;

/// A sudoku board: `N²` candidate sets plus bookkeeping counters.
#[derive(Debug, PartialEq, Eq)]
pub struct Board {
    order: usize,
    num_units: usize,
    num_cells: usize,
    cells: Vec<ValueSet>,
    num_fixed_cells: usize,
    num_infeasible: usize,
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            num_units: self.num_units,
            num_cells: self.num_cells,
            cells: self.cells.clone(),
            num_fixed_cells: self.num_fixed_cells,
            num_infeasible: self.num_infeasible,
        }
    }

    /// Re-copies `source` into this board, reusing the cell allocation.
    /// Ants call this once per iteration, so it must not allocate.
    fn clone_from(&mut self, source: &Self) {
        self.order = source.order;
        self.num_units = source.num_units;
        self.num_cells = source.num_cells;
        self.cells.clone_from(&source.cells);
        self.num_fixed_cells = source.num_fixed_cells;
        self.num_infeasible = source.num_infeasible;
    }
}

impl Board {
    fn with_order(order: usize) -> Self {
        let num_units = order * order;
        let num_cells = num_units * num_units;
        Self {
            order,
            num_units,
            num_cells,
            cells: vec![ValueSet::full(num_units); num_cells],
            num_fixed_cells: 0,
            num_infeasible: 0,
        }
    }

    /// Parses a puzzle string and reduces it by constraint propagation.
    ///
    /// The string length selects the order (81 → 3, …, 4096 → 8); `.` marks
    /// an empty cell. Each given is installed with
    /// [`propagation::set_and_propagate`], so the returned board may have
    /// many more fixed cells than the puzzle had givens.
    pub fn from_puzzle(puzzle: &str) -> Result<Self, PuzzleError> {
        let (order, values) = loading::parse_puzzle(puzzle)?;
        let mut board = Self::with_order(order);
        let num_units = board.num_units;
        timing::begin_initial();
        for (i, value) in values.into_iter().enumerate() {
            if let Some(v) = value {
                propagation::set_and_propagate(&mut board, i, ValueSet::singleton(num_units, v));
            }
        }
        timing::end_initial();
        Ok(board)
    }

    /// Parses a puzzle string without any propagation: givens become
    /// singletons, every other cell keeps the full universe.
    ///
    /// This is the pre-reduction fingerprint used to verify that a solution
    /// agrees with the puzzle as stated.
    pub fn givens(puzzle: &str) -> Result<Self, PuzzleError> {
        let (order, values) = loading::parse_puzzle(puzzle)?;
        let mut board = Self::with_order(order);
        let num_units = board.num_units;
        for (i, value) in values.into_iter().enumerate() {
            if let Some(v) = value {
                board.cells[i] = ValueSet::singleton(num_units, v);
                board.num_fixed_cells += 1;
            }
        }
        Ok(board)
    }

    /// The board order `k`.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Side length `N = k²`; also the number of rows, columns, and boxes.
    #[inline]
    pub fn num_units(&self) -> usize {
        self.num_units
    }

    /// Total number of cells, `N²`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.num_cells
    }

    /// Number of cells with a uniquely determined value.
    #[inline]
    pub fn fixed_cell_count(&self) -> usize {
        self.num_fixed_cells
    }

    /// Number of cells with no remaining candidates.
    #[inline]
    pub fn infeasible_cell_count(&self) -> usize {
        self.num_infeasible
    }

    /// The candidate set of cell `i`.
    #[inline]
    pub fn cell(&self, i: usize) -> ValueSet {
        self.cells[i]
    }

    #[inline]
    pub(crate) fn set_cell_direct(&mut self, i: usize, value: ValueSet) {
        self.cells[i] = value;
    }

    #[inline]
    pub(crate) fn bump_fixed(&mut self) {
        self.num_fixed_cells += 1;
    }

    #[inline]
    pub(crate) fn bump_infeasible(&mut self) {
        self.num_infeasible += 1;
    }

    /// Index of the `i`-th cell of row `r`.
    #[inline]
    pub fn row_cell(&self, r: usize, i: usize) -> usize {
        r * self.num_units + i
    }

    /// Index of the `i`-th cell of column `c`.
    #[inline]
    pub fn col_cell(&self, c: usize, i: usize) -> usize {
        i * self.num_units + c
    }

    /// Index of the `i`-th cell of box `b`. Boxes are numbered left to
    /// right, top to bottom; cells within a box likewise.
    #[inline]
    pub fn box_cell(&self, b: usize, i: usize) -> usize {
        let k = self.order;
        let corner = (b % k) * k + (b / k) * k * k * k;
        corner + (i % k) + (i / k) * k * k
    }

    /// Row containing cell `i`.
    #[inline]
    pub fn row_for(&self, i: usize) -> usize {
        i / self.num_units
    }

    /// Column containing cell `i`.
    #[inline]
    pub fn col_for(&self, i: usize) -> usize {
        i % self.num_units
    }

    /// Box containing cell `i`.
    #[inline]
    pub fn box_for(&self, i: usize) -> usize {
        let k = self.order;
        k * (i / (k * k * k)) + (i % (k * k)) / k
    }

    /// Checks whether `other` is a valid solution of this puzzle: complete,
    /// every row/column/box containing each digit exactly once, and every
    /// fixed cell of this board matching the corresponding cell of `other`.
    pub fn check_solution(&self, other: &Board) -> bool {
        if other.cell_count() != self.cell_count() {
            return false;
        }

        let mut is_solution = other.cells.iter().all(|c| c.is_fixed());

        for i in 0..self.num_units {
            let mut row = ValueSet::empty(self.num_units);
            let mut col = ValueSet::empty(self.num_units);
            let mut boxu = ValueSet::empty(self.num_units);
            for j in 0..self.num_units {
                row += other.cell(self.row_cell(i, j));
                col += other.cell(self.col_cell(i, j));
                boxu += other.cell(self.box_cell(i, j));
            }
            if row.count() != self.num_units
                || col.count() != self.num_units
                || boxu.count() != self.num_units
            {
                is_solution = false;
            }
        }

        let is_consistent = (0..self.num_cells).all(|i| {
            !self.cell(i).is_fixed() || self.cell(i) == other.cell(i)
        });

        is_solution && is_consistent
    }

    /// Renders the board as a padded grid with box separators.
    ///
    /// With `use_numbers` every fixed cell prints its 1-based value in
    /// decimal (unfixed cells print `0`). Otherwise cells print in the
    /// order's alphabet; unfixed cells print `.` unless `show_unfixed`
    /// requests their full candidate list.
    pub fn as_string(&self, use_numbers: bool, show_unfixed: bool) -> String {
        let use_numbers = use_numbers && !show_unfixed;
        let alphabet = loading::alphabet(self.order);

        let cell_strings: Vec<String> = (0..self.num_cells)
            .map(|i| {
                let cell = self.cells[i];
                if use_numbers {
                    if cell.is_fixed() {
                        (cell.index() + 1).to_string()
                    } else {
                        "0".to_string()
                    }
                } else if !show_unfixed && !cell.is_fixed() {
                    ".".to_string()
                } else {
                    cell.to_display(alphabet)
                }
            })
            .collect();

        let max_len = cell_strings.iter().map(String::len).max().unwrap_or(0);
        let pitch = max_len + 1;

        let mut out = String::new();
        for (i, s) in cell_strings.iter().enumerate() {
            out.push_str(&format!("{:>pitch$} ", s));
            if i % self.num_units == self.num_units - 1 {
                if i != self.num_cells - 1 {
                    out.push('\n');
                }
            } else if i % self.order == self.order - 1 {
                out.push('|');
            }
            if i % (self.num_units * self.order) == self.num_units * self.order - 1
                && i != self.num_cells - 1
            {
                for j in 0..self.order {
                    for _ in 0..self.order * (pitch + 1) {
                        out.push('-');
                    }
                    if j != self.order - 1 {
                        out.push('+');
                    }
                }
                out.push('\n');
            }
        }
        out
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string(false, false))
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use formica_core::set::ValueSet;

    /// A full valid 9×9 grid (rows are shifted copies of 1..9).
    pub(crate) const SOLVED: &str = "123456789456789123789123456234567891567891234891234567345678912678912345912345678";

    #[test]
    fn test_blank_board() {
        let blank = ".".repeat(81);
        let board = Board::from_puzzle(&blank).unwrap();
        assert_eq!(board.order(), 3);
        assert_eq!(board.cell_count(), 81);
        assert_eq!(board.fixed_cell_count(), 0);
        assert_eq!(board.infeasible_cell_count(), 0);
        for i in 0..81 {
            assert_eq!(board.cell(i), ValueSet::full(9));
        }
        // An incomplete board is not a solution of itself.
        assert!(!board.check_solution(&board));
    }

    #[test]
    fn test_solved_board_parses_fully_fixed() {
        let board = Board::from_puzzle(SOLVED).unwrap();
        assert_eq!(board.fixed_cell_count(), 81);
        assert_eq!(board.infeasible_cell_count(), 0);
        assert!(board.check_solution(&board));
    }

    #[test]
    fn test_fixed_count_never_below_given_count() {
        let puzzle = "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";
        let givens = puzzle.chars().filter(|&c| c != '.').count();
        let board = Board::from_puzzle(puzzle).unwrap();
        assert!(board.fixed_cell_count() >= givens);
    }

    #[test]
    fn test_bad_length_is_rejected() {
        assert!(Board::from_puzzle("..3..").is_err());
    }

    #[test]
    fn test_geometry_helpers_order_three() {
        let board = Board::from_puzzle(&".".repeat(81)).unwrap();
        assert_eq!(board.box_cell(0, 0), 0);
        assert_eq!(board.box_cell(0, 8), 20);
        assert_eq!(board.box_cell(4, 0), 30);
        assert_eq!(board.row_for(45), 5);
        assert_eq!(board.col_for(45), 0);
        assert_eq!(board.box_for(45), 3);
    }

    #[test]
    fn test_geometry_units_are_consistent() {
        // Every cell must appear in exactly one row, column, and box slot.
        for order in [3usize, 4] {
            let board = Board::from_puzzle(&".".repeat(order * order * order * order)).unwrap();
            let n = board.num_units();
            for i in 0..board.cell_count() {
                let r = board.row_for(i);
                let c = board.col_for(i);
                let b = board.box_for(i);
                assert!((0..n).any(|j| board.row_cell(r, j) == i));
                assert!((0..n).any(|j| board.col_cell(c, j) == i));
                assert!((0..n).any(|j| board.box_cell(b, j) == i));
            }
        }
    }

    #[test]
    fn test_givens_board_does_not_propagate() {
        let puzzle = "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";
        let givens = Board::givens(puzzle).unwrap();
        let expected = puzzle.chars().filter(|&c| c != '.').count();
        assert_eq!(givens.fixed_cell_count(), expected);
        // Unfixed cells keep the full universe.
        let first_empty = puzzle.chars().position(|c| c == '.').unwrap();
        assert_eq!(givens.cell(first_empty), ValueSet::full(9));
    }

    #[test]
    fn test_check_solution_rejects_inconsistent_solution() {
        let solved = Board::from_puzzle(SOLVED).unwrap();
        // A puzzle whose (single) given disagrees with the solved grid.
        let mut puzzle = ".".repeat(81);
        puzzle.replace_range(0..1, "2");
        let fingerprint = Board::givens(&puzzle).unwrap();
        assert!(!fingerprint.check_solution(&solved));
    }

    #[test]
    fn test_check_solution_accepts_consistent_solution() {
        let solved = Board::from_puzzle(SOLVED).unwrap();
        let mut puzzle = ".".repeat(81);
        puzzle.replace_range(0..1, "1");
        let fingerprint = Board::givens(&puzzle).unwrap();
        assert!(fingerprint.check_solution(&solved));
    }

    #[test]
    fn test_clone_from_reuses_allocation() {
        let puzzle = Board::from_puzzle(SOLVED).unwrap();
        let mut scratch = Board::from_puzzle(&".".repeat(81)).unwrap();
        scratch.clone_from(&puzzle);
        assert_eq!(scratch, puzzle);
    }

    #[test]
    fn test_as_string_numeric_solved() {
        let board = Board::from_puzzle(SOLVED).unwrap();
        let s = board.as_string(true, false);
        assert!(s.starts_with(" 1  2  3 |"));
        assert!(s.contains('\n'));
    }

    #[test]
    fn test_display_hides_unfixed_cells() {
        let blank = Board::from_puzzle(&".".repeat(81)).unwrap();
        let s = format!("{}", blank);
        assert!(s.contains('.'));
        assert!(!s.contains('1'));
    }
}
