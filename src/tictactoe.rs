// src/tictactoe.rs
//
// Unstable Tic-Tac-Toe: after most moves the board itself decides to
// grow or shrink, keeping any marks that still fit. Wins are judged
// against whatever size the board happens to be right now.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 6;

/// Chance that a non-terminal move mutates the board size.
const MUTATE_CHANCE: f64 = 0.6;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The cell was occupied, out of range, or the game was over.
    Rejected,
    Win { mark: Mark, line: Vec<usize> },
    Draw,
    /// Game continues; `resized` holds the new size if the board
    /// mutated after this move.
    Continue { resized: Option<usize> },
}

#[derive(Debug, Clone)]
pub struct TicTacToe {
    size: usize,
    cells: Vec<Option<Mark>>,
    turn: Mark,
    over: bool,
    winner: Option<Mark>,
    rng: StdRng,
}

impl TicTacToe {
    pub fn new() -> TicTacToe {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_rng(rng: StdRng) -> TicTacToe {
        TicTacToe {
            size: MIN_SIZE,
            cells: vec![None; MIN_SIZE * MIN_SIZE],
            turn: Mark::X,
            over: false,
            winner: None,
            rng,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells[row * self.size + col]
    }

    /// Places the current player's mark at the flat index. Terminal
    /// positions are settled before any mutation is rolled, so a
    /// winning line can never be snatched away by a resize.
    pub fn place(&mut self, index: usize) -> PlaceOutcome {
        if self.over || index >= self.cells.len() || self.cells[index].is_some() {
            return PlaceOutcome::Rejected;
        }
        let mark = self.turn;
        self.cells[index] = Some(mark);

        if let Some(line) = self.winning_line(mark) {
            self.over = true;
            self.winner = Some(mark);
            return PlaceOutcome::Win { mark, line };
        }
        if self.cells.iter().all(|c| c.is_some()) {
            self.over = true;
            return PlaceOutcome::Draw;
        }

        self.turn = mark.other();
        let resized = self.maybe_mutate();
        PlaceOutcome::Continue { resized }
    }

    fn winning_line(&self, mark: Mark) -> Option<Vec<usize>> {
        let n = self.size;
        let at = |r: usize, c: usize| self.cells[r * n + c] == Some(mark);

        for r in 0..n {
            if (0..n).all(|c| at(r, c)) {
                return Some((0..n).map(|c| r * n + c).collect());
            }
        }
        for c in 0..n {
            if (0..n).all(|r| at(r, c)) {
                return Some((0..n).map(|r| r * n + c).collect());
            }
        }
        if (0..n).all(|i| at(i, i)) {
            return Some((0..n).map(|i| i * n + i).collect());
        }
        if (0..n).all(|i| at(i, n - 1 - i)) {
            return Some((0..n).map(|i| i * n + n - 1 - i).collect());
        }
        None
    }

    /// Rolls the size mutation: 60% of the time the board grows or
    /// shrinks by one, clamped to the legal range and wrapping back to
    /// the minimum past the maximum. Marks keep their (row, col) where
    /// it still exists on the new board.
    fn maybe_mutate(&mut self) -> Option<usize> {
        if !self.rng.random_bool(MUTATE_CHANCE) {
            return None;
        }
        let delta: i64 = if self.rng.random_bool(0.5) { 1 } else { -1 };
        let mut new_size = (self.size as i64 + delta).max(MIN_SIZE as i64) as usize;
        if new_size > MAX_SIZE {
            new_size = MIN_SIZE;
        }
        if new_size == self.size {
            return None;
        }

        let old_size = self.size;
        let mut cells = vec![None; new_size * new_size];
        for r in 0..old_size.min(new_size) {
            for c in 0..old_size.min(new_size) {
                cells[r * new_size + c] = self.cells[r * old_size + c];
            }
        }
        self.size = new_size;
        self.cells = cells;
        Some(new_size)
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size;
        for r in 0..n {
            if r > 0 {
                writeln!(f, "{}", "-".repeat(n * 4 - 1))?;
            }
            for c in 0..n {
                if c > 0 {
                    write!(f, "|")?;
                }
                match self.cell(r, c) {
                    Some(mark) => write!(f, " {} ", mark)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;

    fn game(seed: u64) -> TicTacToe {
        TicTacToe::with_rng(StdRng::seed_from_u64(seed))
    }

    /// A game whose RNG is irrelevant because every tested move either
    /// ends the game or has its mutation suppressed by construction.
    fn fixed(size: usize, cells: &[(usize, usize, Mark)], turn: Mark) -> TicTacToe {
        let mut g = game(0);
        g.size = size;
        g.cells = vec![None; size * size];
        for &(r, c, m) in cells {
            g.cells[r * size + c] = Some(m);
        }
        g.turn = turn;
        g
    }

    #[test]
    fn starts_as_a_three_board_with_x_to_move() {
        let g = game(1);
        assert_eq!(g.size(), 3);
        assert_eq!(g.turn(), Mark::X);
        assert!(!g.is_over());
    }

    #[test]
    fn row_win_on_a_three_board() {
        let mut g = fixed(
            3,
            &[(1, 0, Mark::X), (1, 1, Mark::X), (0, 0, Mark::O), (2, 2, Mark::O)],
            Mark::X,
        );
        let outcome = g.place(1 * 3 + 2);
        assert_eq!(
            outcome,
            PlaceOutcome::Win { mark: Mark::X, line: vec![3, 4, 5] }
        );
        assert!(g.is_over());
        assert_eq!(g.winner(), Some(Mark::X));
        assert_eq!(g.place(0), PlaceOutcome::Rejected);
    }

    #[test]
    fn anti_diagonal_win_on_a_four_board() {
        let mut g = fixed(
            4,
            &[
                (0, 3, Mark::O), (1, 2, Mark::O), (2, 1, Mark::O),
                (0, 0, Mark::X), (1, 0, Mark::X), (2, 0, Mark::X),
            ],
            Mark::O,
        );
        let outcome = g.place(3 * 4 + 0);
        assert_eq!(
            outcome,
            PlaceOutcome::Win { mark: Mark::O, line: vec![3, 6, 9, 12] }
        );
    }

    #[test]
    fn column_win_on_a_six_board() {
        let marks: Vec<(usize, usize, Mark)> = (0..5)
            .map(|r| (r, 2, Mark::X))
            .chain((0..5).map(|r| (r, 4, Mark::O)))
            .collect();
        let mut g = fixed(6, &marks, Mark::X);
        let outcome = g.place(5 * 6 + 2);
        assert_eq!(
            outcome,
            PlaceOutcome::Win {
                mark: Mark::X,
                line: (0..6).map(|r| r * 6 + 2).collect(),
            }
        );
    }

    #[test]
    fn a_partial_line_is_not_a_win_on_a_bigger_board() {
        // Three in a row only wins on a size-3 board.
        let g = fixed(
            4,
            &[(0, 0, Mark::X), (0, 1, Mark::X), (0, 2, Mark::X)],
            Mark::O,
        );
        assert_eq!(g.winning_line(Mark::X), None);
    }

    #[test]
    fn occupied_and_out_of_range_cells_are_rejected() {
        let mut g = fixed(3, &[(0, 0, Mark::X)], Mark::O);
        assert_eq!(g.place(0), PlaceOutcome::Rejected);
        assert_eq!(g.place(9), PlaceOutcome::Rejected);
        assert_eq!(g.turn(), Mark::O, "rejected moves keep the turn");
    }

    #[test]
    fn full_board_without_a_line_is_a_draw() {
        // X O X / X O O / O X _ with X to play the last cell.
        let mut g = fixed(
            3,
            &[
                (0, 0, Mark::X), (0, 1, Mark::O), (0, 2, Mark::X),
                (1, 0, Mark::X), (1, 1, Mark::O), (1, 2, Mark::O),
                (2, 0, Mark::O), (2, 1, Mark::X),
            ],
            Mark::X,
        );
        assert_eq!(g.place(2 * 3 + 2), PlaceOutcome::Draw);
        assert!(g.is_over());
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn growing_preserves_marks_at_their_coordinates() {
        for seed in 0..200 {
            let mut probe = fixed(3, &[(0, 0, Mark::X), (2, 2, Mark::O)], Mark::X);
            probe.rng = StdRng::seed_from_u64(seed);
            if probe.maybe_mutate() == Some(4) {
                assert_eq!(probe.cell(0, 0), Some(Mark::X));
                assert_eq!(probe.cell(2, 2), Some(Mark::O));
                assert_eq!(probe.cells.iter().filter(|c| c.is_some()).count(), 2);
                return;
            }
        }
        panic!("no seed in range grew the board");
    }

    #[test]
    fn shrinking_drops_out_of_range_marks() {
        for seed in 0..200 {
            let mut probe = fixed(
                4,
                &[(0, 0, Mark::X), (3, 3, Mark::O), (1, 1, Mark::X)],
                Mark::O,
            );
            probe.rng = StdRng::seed_from_u64(seed);
            if probe.maybe_mutate() == Some(3) {
                assert_eq!(probe.cell(0, 0), Some(Mark::X));
                assert_eq!(probe.cell(1, 1), Some(Mark::X));
                assert_eq!(probe.cells.iter().filter(|c| c.is_some()).count(), 2);
                return;
            }
        }
        panic!("no seed in range shrank the board");
    }

    #[test]
    fn size_stays_in_range_over_a_long_game() {
        for seed in 0..20 {
            let mut g = game(seed);
            for _ in 0..300 {
                if g.is_over() {
                    break;
                }
                let free = g.cells.iter().position(|c| c.is_none());
                match free {
                    Some(index) => {
                        g.place(index);
                        assert!(
                            (MIN_SIZE..=MAX_SIZE).contains(&g.size()),
                            "size {} escaped the range",
                            g.size()
                        );
                        assert_eq!(g.cells.len(), g.size() * g.size());
                    }
                    None => break,
                }
            }
        }
    }

    #[test]
    fn win_check_runs_before_any_mutation() {
        // Completing a row must report Win on every seed, even those
        // whose next mutation roll would have fired.
        for seed in 0..50 {
            let mut g = fixed(3, &[(0, 0, Mark::X), (0, 1, Mark::X)], Mark::X);
            g.rng = StdRng::seed_from_u64(seed);
            match g.place(2) {
                PlaceOutcome::Win { mark: Mark::X, .. } => {}
                other => panic!("seed {} produced {:?}", seed, other),
            }
            assert_eq!(g.size(), 3, "terminal boards never resize");
        }
    }
}
