// src/sudoku.rs
//
// Saboteur Sudoku: an ordinary puzzle whose givens cannot be trusted.
// A handful of the printed clues are deliberate lies, so every cell is
// editable and the solver must sniff out the plants.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const GRID: usize = 9;
const BOX: usize = 3;

/// Canonical solved grid every puzzle is carved from.
const BASE_SOLUTION: [[u8; GRID]; GRID] = [
    [5, 3, 4, 6, 7, 8, 9, 1, 2],
    [6, 7, 2, 1, 9, 5, 3, 4, 8],
    [1, 9, 8, 3, 4, 2, 5, 6, 7],
    [8, 5, 9, 7, 6, 1, 4, 2, 3],
    [4, 2, 6, 8, 5, 3, 7, 9, 1],
    [7, 1, 3, 9, 2, 4, 8, 5, 6],
    [9, 6, 1, 5, 3, 7, 2, 8, 4],
    [2, 8, 7, 4, 1, 9, 6, 3, 5],
    [3, 4, 5, 2, 8, 6, 1, 7, 9],
];

// --- Types ---

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of cells blanked out. Blanking picks cells with
    /// repetition, so the actual count of empty cells can be lower.
    fn holes(self) -> usize {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 50,
            Difficulty::Hard => 60,
        }
    }

    /// Number of givens replaced with a false value.
    fn lies(self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// A truthful clue.
    Given(u8),
    /// A planted clue showing this false value.
    Lie(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Incomplete,
    Wrong,
    Solved,
}

// --- Puzzle ---

#[derive(Debug, Clone)]
pub struct SudokuPuzzle {
    solution: [[u8; GRID]; GRID],
    cells: [[Cell; GRID]; GRID],
}

impl SudokuPuzzle {
    pub fn generate(difficulty: Difficulty, rng: &mut StdRng) -> SudokuPuzzle {
        let solution = BASE_SOLUTION;
        let mut cells: [[Cell; GRID]; GRID] =
            std::array::from_fn(|r| std::array::from_fn(|c| Cell::Given(solution[r][c])));

        for _ in 0..difficulty.holes() {
            let r = rng.random_range(0..GRID);
            let c = rng.random_range(0..GRID);
            cells[r][c] = Cell::Empty;
        }

        // Lies go on distinct surviving givens, each showing a value
        // that differs from the true one.
        let mut planted = 0;
        while planted < difficulty.lies() {
            let r = rng.random_range(0..GRID);
            let c = rng.random_range(0..GRID);
            if !matches!(cells[r][c], Cell::Given(_)) {
                continue;
            }
            let truth = solution[r][c];
            let fake = rng.random_range(1..=8);
            let fake = if fake >= truth { fake + 1 } else { fake };
            cells[r][c] = Cell::Lie(fake);
            planted += 1;
        }

        SudokuPuzzle { solution, cells }
    }

    pub fn new_random(difficulty: Difficulty) -> SudokuPuzzle {
        SudokuPuzzle::generate(difficulty, &mut StdRng::from_os_rng())
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// The value printed in the grid, lies included; 0 for empty.
    pub fn shown_value(&self, row: usize, col: usize) -> u8 {
        match self.cells[row][col] {
            Cell::Empty => 0,
            Cell::Given(v) | Cell::Lie(v) => v,
        }
    }

    pub fn is_lie(&self, row: usize, col: usize) -> bool {
        matches!(self.cells[row][col], Cell::Lie(_))
    }

    pub fn lie_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Lie(_)))
            .count()
    }

    pub fn solution(&self, row: usize, col: usize) -> u8 {
        self.solution[row][col]
    }

    /// Grades a full set of entries against the hidden solution. An
    /// entry of 0 means the cell was left blank.
    pub fn check(&self, entries: &[[u8; GRID]; GRID]) -> CheckResult {
        let mut complete = true;
        for r in 0..GRID {
            for c in 0..GRID {
                match entries[r][c] {
                    0 => complete = false,
                    v if v != self.solution[r][c] => return CheckResult::Wrong,
                    _ => {}
                }
            }
        }
        if complete {
            CheckResult::Solved
        } else {
            CheckResult::Incomplete
        }
    }
}

/// Coordinates of every entry that clashes with a duplicate in its
/// row, column or box. Blanks never conflict.
pub fn conflicts(entries: &[[u8; GRID]; GRID]) -> Vec<(usize, usize)> {
    let mut flagged = [[false; GRID]; GRID];

    for r in 0..GRID {
        for c in 0..GRID {
            let v = entries[r][c];
            if v == 0 || flagged[r][c] {
                continue;
            }
            let dup = (0..GRID).any(|cc| cc != c && entries[r][cc] == v)
                || (0..GRID).any(|rr| rr != r && entries[rr][c] == v)
                || box_duplicate(entries, r, c, v);
            if dup {
                flagged[r][c] = true;
            }
        }
    }

    let mut out = Vec::new();
    for r in 0..GRID {
        for c in 0..GRID {
            if flagged[r][c] {
                out.push((r, c));
            }
        }
    }
    out
}

fn box_duplicate(entries: &[[u8; GRID]; GRID], row: usize, col: usize, v: u8) -> bool {
    let br = (row / BOX) * BOX;
    let bc = (col / BOX) * BOX;
    for r in br..br + BOX {
        for c in bc..bc + BOX {
            if (r, c) != (row, col) && entries[r][c] == v {
                return true;
            }
        }
    }
    false
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(difficulty: Difficulty, seed: u64) -> SudokuPuzzle {
        SudokuPuzzle::generate(difficulty, &mut StdRng::seed_from_u64(seed))
    }

    fn entries_from_solution(p: &SudokuPuzzle) -> [[u8; GRID]; GRID] {
        std::array::from_fn(|r| std::array::from_fn(|c| p.solution(r, c)))
    }

    #[test]
    fn base_solution_is_valid() {
        let p = puzzle(Difficulty::Easy, 1);
        let entries = entries_from_solution(&p);
        assert!(conflicts(&entries).is_empty());
        assert_eq!(p.check(&entries), CheckResult::Solved);
    }

    #[test]
    fn lie_counts_match_difficulty() {
        for seed in 0..20 {
            assert_eq!(puzzle(Difficulty::Easy, seed).lie_count(), 2);
            assert_eq!(puzzle(Difficulty::Medium, seed).lie_count(), 4);
            assert_eq!(puzzle(Difficulty::Hard, seed).lie_count(), 6);
        }
    }

    #[test]
    fn lies_sit_on_filled_cells_and_differ_from_the_truth() {
        for seed in 0..20 {
            let p = puzzle(Difficulty::Hard, seed);
            for r in 0..GRID {
                for c in 0..GRID {
                    if let Cell::Lie(shown) = p.cell(r, c) {
                        assert!((1..=9).contains(&shown));
                        assert_ne!(shown, p.solution(r, c));
                    }
                }
            }
        }
    }

    #[test]
    fn harder_puzzles_blank_more_cells() {
        // Repetition means exact counts vary, but the ordering of
        // expectations should hold comfortably on any seed.
        let empty = |p: &SudokuPuzzle| {
            (0..GRID)
                .flat_map(|r| (0..GRID).map(move |c| (r, c)))
                .filter(|&(r, c)| p.cell(r, c) == Cell::Empty)
                .count()
        };
        for seed in 0..10 {
            let easy = empty(&puzzle(Difficulty::Easy, seed));
            let hard = empty(&puzzle(Difficulty::Hard, seed));
            assert!(easy <= 40);
            assert!(hard <= 60);
            assert!(easy >= 20, "easy blanked suspiciously few: {}", easy);
        }
    }

    #[test]
    fn check_is_incomplete_then_wrong_then_solved() {
        let p = puzzle(Difficulty::Easy, 3);
        let mut entries = entries_from_solution(&p);

        entries[4][4] = 0;
        assert_eq!(p.check(&entries), CheckResult::Incomplete);

        entries[4][4] = p.solution(4, 4) % 9 + 1;
        assert_eq!(p.check(&entries), CheckResult::Wrong);

        entries[4][4] = p.solution(4, 4);
        assert_eq!(p.check(&entries), CheckResult::Solved);
    }

    #[test]
    fn copying_a_lie_reads_as_wrong() {
        let p = puzzle(Difficulty::Easy, 4);
        let mut entries = entries_from_solution(&p);
        let (r, c) = (0..GRID)
            .flat_map(|r| (0..GRID).map(move |c| (r, c)))
            .find(|&(r, c)| p.is_lie(r, c))
            .unwrap();
        entries[r][c] = p.shown_value(r, c);
        assert_eq!(p.check(&entries), CheckResult::Wrong);
    }

    #[test]
    fn conflicts_flag_every_duplicate_peer() {
        let mut entries = [[0u8; GRID]; GRID];
        entries[0][0] = 5;
        entries[0][7] = 5; // row duplicate
        entries[6][0] = 5; // column duplicate
        entries[1][1] = 7;
        entries[2][2] = 7; // box duplicate
        let found = conflicts(&entries);
        for pos in [(0, 0), (0, 7), (6, 0), (1, 1), (2, 2)] {
            assert!(found.contains(&pos), "missing conflict at {:?}", pos);
        }
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn blanks_and_clean_grids_have_no_conflicts() {
        assert!(conflicts(&[[0; GRID]; GRID]).is_empty());
        let mut entries = [[0u8; GRID]; GRID];
        entries[0][0] = 1;
        entries[0][1] = 2;
        entries[8][8] = 1;
        assert!(conflicts(&entries).is_empty());
    }
}
