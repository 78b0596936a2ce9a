// src/chess.rs
//
// Chaos Chess: a chess variant in which the movement rules of the five
// non-pawn piece kinds are shuffled at the start of the match and keep
// mutating while the game is played. Capturing the enemy king wins;
// there is no check, castling, en passant or promotion.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;

use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

// --- Constants ---

/// A piece kind's pattern is reassigned after this many committed moves.
const MUTATION_THRESHOLD: u8 = 3;

// Direction vectors as (row delta, file delta).
const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ALL_DIRS: [(i8, i8); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (1, -2), (-1, 2), (-1, -2),
    (2, 1), (2, -1), (-2, 1), (-2, -1),
];

// --- Precomputed Leap Tables ---

lazy_static! {
    static ref KNIGHT_TARGETS: [Vec<Square>; 64] = leap_target_table(&KNIGHT_OFFSETS);
    static ref KING_TARGETS: [Vec<Square>; 64] = leap_target_table(&ALL_DIRS);
}

fn leap_target_table(offsets: &[(i8, i8)]) -> [Vec<Square>; 64] {
    std::array::from_fn(|index| {
        let from = Square::new(index as u8);
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .collect()
    })
}

// --- Enums and Basic Structs ---

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl Kind {
    /// Capture value used by the AI move scorer.
    pub fn value(self) -> u32 {
        match self {
            Kind::King => 900,
            Kind::Queen => 90,
            Kind::Rook => 50,
            Kind::Bishop => 30,
            Kind::Knight => 30,
            Kind::Pawn => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::King => "King",
            Kind::Queen => "Queen",
            Kind::Rook => "Rook",
            Kind::Bishop => "Bishop",
            Kind::Knight => "Knight",
            Kind::Pawn => "Pawn",
        }
    }

    pub fn glyph(self, side: Side) -> char {
        match (side, self) {
            (Side::White, Kind::King) => '♔',
            (Side::White, Kind::Queen) => '♕',
            (Side::White, Kind::Rook) => '♖',
            (Side::White, Kind::Bishop) => '♗',
            (Side::White, Kind::Knight) => '♘',
            (Side::White, Kind::Pawn) => '♙',
            (Side::Black, Kind::King) => '♚',
            (Side::Black, Kind::Queen) => '♛',
            (Side::Black, Kind::Rook) => '♜',
            (Side::Black, Kind::Bishop) => '♝',
            (Side::Black, Kind::Knight) => '♞',
            (Side::Black, Kind::Pawn) => '♟',
        }
    }
}

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: Kind,
    pub side: Side,
}

impl Piece {
    pub fn new(kind: Kind, side: Side) -> Self {
        Piece { kind, side }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.glyph(self.side))
    }
}

/// A board square, index 0..64. Index 0 is a8; ranks count down the
/// array, so rank = 8 - row and White's pieces start in rows 6 and 7.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Out-of-range indices are a programming error, not user input.
    pub fn new(index: u8) -> Square {
        assert!(index < 64, "square index out of range: {}", index);
        Square(index)
    }

    pub fn from_coords(row: u8, col: u8) -> Square {
        assert!(row < 8 && col < 8, "square coords out of range: ({}, {})", row, col);
        Square(row * 8 + col)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Row 0 is the top of the board (rank 8).
    pub fn row(self) -> u8 {
        self.0 / 8
    }

    pub fn col(self) -> u8 {
        self.0 % 8
    }

    /// The square reached by stepping (dr, dc), or None off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::from_coords(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let col = match file_char {
            'a'..='h' => file_char as u8 - b'a',
            _ => return None,
        };
        let row = match rank_char {
            '1'..='8' => 8 - (rank_char as u8 - b'0'),
            _ => return None,
        };
        Some(Square::from_coords(row, col))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col()) as char;
        let rank = 8 - self.row();
        write!(f, "{}{}", file, rank)
    }
}

// --- Board Model ---

/// Flat 64-cell occupancy map. Holds no rules of its own; the match
/// state machine is responsible for legality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Board {
        Board { cells: [None; 64] }
    }

    /// Mirrored random setup: one shuffled back rank used by both
    /// sides, pawns on each side's second rank. The king is kept off
    /// the corner files so it always has room to breathe.
    fn random_setup(rng: &mut StdRng) -> Board {
        let mut back_rank = [
            Kind::Rook, Kind::Knight, Kind::Bishop, Kind::Queen,
            Kind::King, Kind::Bishop, Kind::Knight, Kind::Rook,
        ];
        back_rank.shuffle(rng);
        if let Some(pos) = back_rank.iter().position(|&k| k == Kind::King) {
            if pos == 0 || pos == 7 {
                back_rank.swap(pos, rng.random_range(1..=6));
            }
        }

        let mut board = Board::empty();
        for (col, &kind) in back_rank.iter().enumerate() {
            let col = col as u8;
            board.place(Square::from_coords(0, col), Some(Piece::new(kind, Side::Black)));
            board.place(Square::from_coords(1, col), Some(Piece::new(Kind::Pawn, Side::Black)));
            board.place(Square::from_coords(6, col), Some(Piece::new(Kind::Pawn, Side::White)));
            board.place(Square::from_coords(7, col), Some(Piece::new(kind, Side::White)));
        }
        board
    }

    pub fn occupant_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    pub fn place(&mut self, sq: Square, occupant: Option<Piece>) {
        self.cells[sq.index()] = occupant;
    }

    /// Plain-text board description, fed to the taunt collaborator.
    pub fn summary_text(&self) -> String {
        let mut text = String::new();
        for index in 0..64u8 {
            let sq = Square::new(index);
            if let Some(piece) = self.occupant_at(sq) {
                text.push_str(&format!("{} {} on {}. ", piece.side, piece.kind.name(), sq));
            }
        }
        text
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for row in 0..8u8 {
            write!(f, "{} | ", 8 - row)?;
            for col in 0..8u8 {
                match self.occupant_at(Square::from_coords(row, col)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-----------------+")?;
        write!(f, "    a b c d e f g h")
    }
}

// --- Move Generators ---

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Queen,
    Rook,
    Bishop,
    Knight,
    King,
}

pub const ALL_PATTERNS: [Pattern; 5] = [
    Pattern::Queen,
    Pattern::Rook,
    Pattern::Bishop,
    Pattern::Knight,
    Pattern::King,
];

impl Pattern {
    pub fn name(self) -> &'static str {
        match self {
            Pattern::Queen => "Queen",
            Pattern::Rook => "Rook",
            Pattern::Bishop => "Bishop",
            Pattern::Knight => "Knight",
            Pattern::King => "King",
        }
    }

    /// Candidate destinations for a piece of `side` at `from`, moving
    /// with this pattern. Callers must treat the result as a set.
    pub fn destinations(self, board: &Board, from: Square, side: Side) -> Vec<Square> {
        match self {
            Pattern::Rook => sliding_destinations(board, from, side, &ORTHOGONAL_DIRS),
            Pattern::Bishop => sliding_destinations(board, from, side, &DIAGONAL_DIRS),
            Pattern::Queen => sliding_destinations(board, from, side, &ALL_DIRS),
            Pattern::Knight => leaping_destinations(board, from, side, &KNIGHT_TARGETS),
            Pattern::King => leaping_destinations(board, from, side, &KING_TARGETS),
        }
    }
}

fn sliding_destinations(board: &Board, from: Square, side: Side, dirs: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(dr, dc) in dirs {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match board.occupant_at(next) {
                Some(blocker) => {
                    if blocker.side != side {
                        moves.push(next);
                    }
                    break;
                }
                None => {
                    moves.push(next);
                    current = next;
                }
            }
        }
    }
    moves
}

fn leaping_destinations(
    board: &Board,
    from: Square,
    side: Side,
    targets: &[Vec<Square>; 64],
) -> Vec<Square> {
    targets[from.index()]
        .iter()
        .copied()
        .filter(|&to| board.occupant_at(to).map_or(true, |p| p.side != side))
        .collect()
}

/// Pawn movement is fixed and never enters the chaos rule table:
/// forward one to an empty square, forward two from the starting rank
/// when both squares are empty, diagonal-forward only as a capture.
fn pawn_destinations(board: &Board, from: Square, side: Side) -> Vec<Square> {
    let (dir, start_row) = match side {
        Side::White => (-1i8, 6u8),
        Side::Black => (1i8, 1u8),
    };
    let mut moves = Vec::new();

    if let Some(one) = from.offset(dir, 0) {
        if board.occupant_at(one).is_none() {
            moves.push(one);
            if from.row() == start_row {
                if let Some(two) = one.offset(dir, 0) {
                    if board.occupant_at(two).is_none() {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for dc in [-1i8, 1] {
        if let Some(diag) = from.offset(dir, dc) {
            if let Some(target) = board.occupant_at(diag) {
                if target.side != side {
                    moves.push(diag);
                }
            }
        }
    }
    moves
}

// --- Chaos Rule Table ---

/// The piece kinds whose movement pattern can be reassigned. Pawn is
/// deliberately absent.
pub const REASSIGNABLE: [Kind; 5] = [
    Kind::Queen,
    Kind::Rook,
    Kind::Bishop,
    Kind::Knight,
    Kind::King,
];

/// Maps each reassignable kind to its current movement pattern and
/// tracks how many moves that kind has made since its last mutation.
/// Starts out as a random bijection; mutations reassign kinds
/// independently, so patterns may later be shared or go unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    assigned: [Pattern; 5],
    counters: [u8; 5],
}

impl RuleTable {
    fn slot(kind: Kind) -> usize {
        match kind {
            Kind::Queen => 0,
            Kind::Rook => 1,
            Kind::Bishop => 2,
            Kind::Knight => 3,
            Kind::King => 4,
            Kind::Pawn => panic!("pawn movement is fixed and has no rule table slot"),
        }
    }

    fn random(rng: &mut StdRng) -> RuleTable {
        let mut assigned = ALL_PATTERNS;
        assigned.shuffle(rng);
        RuleTable { assigned, counters: [0; 5] }
    }

    pub fn pattern_for(&self, kind: Kind) -> Pattern {
        self.assigned[Self::slot(kind)]
    }

    pub fn counter(&self, kind: Kind) -> u8 {
        self.counters[Self::slot(kind)]
    }

    /// Counts a committed move by `kind`. On reaching the threshold the
    /// kind is reassigned a different pattern, chosen uniformly, and
    /// its counter resets; the new pattern is returned so the caller
    /// can notify.
    fn record_move(&mut self, kind: Kind, rng: &mut StdRng) -> Option<Pattern> {
        let slot = Self::slot(kind);
        self.counters[slot] += 1;
        if self.counters[slot] < MUTATION_THRESHOLD {
            return None;
        }
        let current = self.assigned[slot];
        let choices: Vec<Pattern> = ALL_PATTERNS
            .iter()
            .copied()
            .filter(|&p| p != current)
            .collect();
        let replacement = choices[rng.random_range(0..choices.len())];
        self.assigned[slot] = replacement;
        self.counters[slot] = 0;
        Some(replacement)
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rules:")?;
        for kind in REASSIGNABLE {
            write!(f, " {}→{}", kind.glyph(Side::White), self.pattern_for(kind).name())?;
        }
        write!(f, " {}→Pawn", Kind::Pawn.glyph(Side::White))
    }
}

// --- Match State Machine ---

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    TwoPlayer,
    SinglePlayer(Difficulty),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    AwaitingSelection,
    AwaitingDestination(Square),
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub side: Side,
    pub kind: Kind,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
}

/// Everything observable that a single input event caused, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Selected(Square),
    Deselected,
    Moved(MoveRecord),
    RuleChanged { kind: Kind, pattern: Pattern },
    GameOver { winner: Side },
}

/// One match of Chaos Chess. Owns the board, the rule table and the
/// RNG; all mutation flows through `square_clicked` and
/// `play_engine_move`, one event at a time.
#[derive(Debug, Clone)]
pub struct ChessMatch {
    board: Board,
    rules: RuleTable,
    turn: Side,
    phase: Phase,
    winner: Option<Side>,
    mode: Mode,
    engine_pending: bool,
    rng: StdRng,
    history: Vec<GameEvent>,
}

impl ChessMatch {
    pub fn new(mode: Mode) -> ChessMatch {
        Self::with_rng(mode, StdRng::from_os_rng())
    }

    pub fn with_rng(mode: Mode, mut rng: StdRng) -> ChessMatch {
        let rules = RuleTable::random(&mut rng);
        let board = Board::random_setup(&mut rng);
        ChessMatch {
            board,
            rules,
            turn: Side::White,
            phase: Phase::AwaitingSelection,
            winner: None,
            mode,
            engine_pending: false,
            rng,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn selected(&self) -> Option<Square> {
        match self.phase {
            Phase::AwaitingDestination(sq) => Some(sq),
            _ => None,
        }
    }

    /// True while the engine's delayed reply is outstanding. Clicks are
    /// ignored until the driver calls `play_engine_move`.
    pub fn engine_to_move(&self) -> bool {
        self.engine_pending
    }

    /// Committed moves, rule changes and the game-over marker, oldest
    /// first. Selection events are transient and not recorded.
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Legal destinations for the piece on `sq`; empty for an empty
    /// square. Resolved through the rule table on every call — results
    /// are stale the moment the board or table changes.
    pub fn legal_moves(&self, sq: Square) -> Vec<Square> {
        let piece = match self.board.occupant_at(sq) {
            Some(piece) => piece,
            None => return Vec::new(),
        };
        match piece.kind {
            Kind::Pawn => pawn_destinations(&self.board, sq, piece.side),
            kind => self.rules.pattern_for(kind).destinations(&self.board, sq, piece.side),
        }
    }

    /// The sole mutating entry point for player input. Out-of-turn and
    /// nonsense clicks are absorbed, never errors.
    pub fn square_clicked(&mut self, sq: Square) -> Vec<GameEvent> {
        if self.engine_pending {
            return Vec::new();
        }
        match self.phase {
            Phase::Terminal => Vec::new(),
            Phase::AwaitingSelection => {
                if self.holds_own_piece(sq) {
                    self.phase = Phase::AwaitingDestination(sq);
                    vec![GameEvent::Selected(sq)]
                } else {
                    Vec::new()
                }
            }
            Phase::AwaitingDestination(selected) => {
                if self.legal_moves(selected).contains(&sq) {
                    self.execute_move(selected, sq)
                } else if self.holds_own_piece(sq) {
                    self.phase = Phase::AwaitingDestination(sq);
                    vec![GameEvent::Selected(sq)]
                } else {
                    self.phase = Phase::AwaitingSelection;
                    vec![GameEvent::Deselected]
                }
            }
        }
    }

    fn holds_own_piece(&self, sq: Square) -> bool {
        self.board.occupant_at(sq).map_or(false, |p| p.side == self.turn)
    }

    /// Applies a validated (origin, destination) pair: moves the piece,
    /// settles king capture, runs the counter/mutation policy, flips
    /// the turn and schedules the engine's reply where applicable.
    fn execute_move(&mut self, from: Square, to: Square) -> Vec<GameEvent> {
        let piece = self
            .board
            .occupant_at(from)
            .unwrap_or_else(|| panic!("move from empty square {}", from));
        let captured = self.board.occupant_at(to);

        self.board.place(to, Some(piece));
        self.board.place(from, None);
        self.phase = Phase::AwaitingSelection;

        let record = MoveRecord {
            side: piece.side,
            kind: piece.kind,
            from,
            to,
            captured,
        };
        self.history.push(GameEvent::Moved(record.clone()));
        let mut events = vec![GameEvent::Moved(record)];

        // Taking the king ends the match on the spot: no counter
        // bookkeeping, no turn flip, no engine reply.
        if captured.map_or(false, |p| p.kind == Kind::King) {
            return self.finish(piece.side, events);
        }

        if piece.kind != Kind::Pawn {
            if let Some(pattern) = self.rules.record_move(piece.kind, &mut self.rng) {
                let event = GameEvent::RuleChanged { kind: piece.kind, pattern };
                self.history.push(event.clone());
                events.push(event);
            }
        }

        self.turn = self.turn.opponent();

        if !self.side_has_any_move(self.turn) {
            return self.finish(self.turn.opponent(), events);
        }

        if let Mode::SinglePlayer(_) = self.mode {
            if self.turn == Side::Black {
                self.engine_pending = true;
            }
        }
        events
    }

    fn finish(&mut self, winner: Side, mut events: Vec<GameEvent>) -> Vec<GameEvent> {
        self.phase = Phase::Terminal;
        self.winner = Some(winner);
        self.engine_pending = false;
        let event = GameEvent::GameOver { winner };
        self.history.push(event.clone());
        events.push(event);
        events
    }

    fn side_has_any_move(&self, side: Side) -> bool {
        (0..64u8).any(|index| {
            let sq = Square::new(index);
            self.board.occupant_at(sq).map_or(false, |p| p.side == side)
                && !self.legal_moves(sq).is_empty()
        })
    }

    // --- AI Move Selector ---

    /// Plays the engine's pending move. With no legal move anywhere the
    /// opposing side wins immediately and the board is left untouched.
    pub fn play_engine_move(&mut self) -> Vec<GameEvent> {
        if self.winner.is_some() || !self.engine_pending {
            return Vec::new();
        }
        self.engine_pending = false;
        let difficulty = match self.mode {
            Mode::SinglePlayer(difficulty) => difficulty,
            Mode::TwoPlayer => return Vec::new(),
        };

        let moves = self.all_moves(self.turn);
        if moves.is_empty() {
            return self.finish(self.turn.opponent(), Vec::new());
        }
        let (from, to) = self.pick_move(&moves, difficulty);
        self.execute_move(from, to)
    }

    fn all_moves(&self, side: Side) -> Vec<(Square, Square)> {
        let mut moves = Vec::new();
        for index in 0..64u8 {
            let from = Square::new(index);
            if self.board.occupant_at(from).map_or(false, |p| p.side == side) {
                for to in self.legal_moves(from) {
                    moves.push((from, to));
                }
            }
        }
        moves
    }

    /// Easy picks uniformly. Medium and Hard score moves by the value
    /// of the captured piece; Medium falls back to pure random when no
    /// capture exists at all, Hard always takes a tied-best move.
    fn pick_move(&mut self, moves: &[(Square, Square)], difficulty: Difficulty) -> (Square, Square) {
        debug_assert!(!moves.is_empty());
        if difficulty == Difficulty::Easy {
            return moves[self.rng.random_range(0..moves.len())];
        }

        let scores: Vec<u32> = moves
            .iter()
            .map(|&(_, to)| self.board.occupant_at(to).map_or(0, |p| p.kind.value()))
            .collect();
        let best = scores.iter().copied().max().unwrap_or(0);

        if difficulty == Difficulty::Hard || best > 0 {
            let best_moves: Vec<(Square, Square)> = moves
                .iter()
                .zip(&scores)
                .filter(|&(_, &score)| score == best)
                .map(|(&mv, _)| mv)
                .collect();
            best_moves[self.rng.random_range(0..best_moves.len())]
        } else {
            moves[self.rng.random_range(0..moves.len())]
        }
    }

    // --- Stats Generation and Saving ---

    pub fn stats(&self) -> MatchStats {
        let mut moves = Vec::new();
        let mut chaos_events = Vec::new();
        for event in &self.history {
            match event {
                GameEvent::Moved(record) => moves.push(MoveStat {
                    side: record.side,
                    notation: format!("{}{}", record.from, record.to),
                    captured: record
                        .captured
                        .map(|p| format!("{} {}", p.side, p.kind.name())),
                }),
                GameEvent::RuleChanged { kind, pattern } => chaos_events.push(ChaosStat {
                    kind: kind.name().to_string(),
                    new_pattern: pattern.name().to_string(),
                }),
                GameEvent::Selected(_) | GameEvent::Deselected | GameEvent::GameOver { .. } => {}
            }
        }
        MatchStats {
            winner: self.winner,
            moves,
            chaos_events,
        }
    }

    pub fn save_stats_to_file(&self, filename: &str) -> Result<(), StatsError> {
        let stats = self.stats();
        let json_data = serde_json::to_string_pretty(&stats).map_err(StatsError::Serialization)?;
        fs::write(filename, json_data).map_err(|e| StatsError::Io(filename.to_string(), e))?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MatchStats {
    pub winner: Option<Side>,
    pub moves: Vec<MoveStat>,
    pub chaos_events: Vec<ChaosStat>,
}

#[derive(Debug, Serialize)]
pub struct MoveStat {
    pub side: Side,
    pub notation: String,
    pub captured: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChaosStat {
    pub kind: String,
    pub new_pattern: String,
}

#[derive(Debug)]
pub enum StatsError {
    Serialization(serde_json::Error),
    Io(String, io::Error),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Serialization(e) => write!(f, "Serialization error: {}", e),
            StatsError::Io(file, e) => write!(f, "I/O error with file '{}': {}", file, e),
        }
    }
}

impl Error for StatsError {}

// --- Taunt Collaborator ---

pub const CANNED_TAUNTS: [&str; 3] = [
    "Predictable.",
    "My calculations are flawless.",
    "Falling into my trap!",
];

#[derive(Debug)]
pub struct TauntError(pub String);

impl fmt::Display for TauntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "taunt request failed: {}", self.0)
    }
}

impl Error for TauntError {}

/// External collaborator that turns a board summary into a taunt line.
/// Purely cosmetic: failures never block or alter the match.
pub trait TauntSource: Send {
    fn request_taunt(&self, board_summary: &str) -> Result<String, TauntError>;
}

/// Stand-in used when no remote taunt service is configured; always
/// fails so callers exercise the canned fallback.
pub struct OfflineTaunts;

impl TauntSource for OfflineTaunts {
    fn request_taunt(&self, _board_summary: &str) -> Result<String, TauntError> {
        Err(TauntError("no taunt service configured".to_string()))
    }
}

/// Fallback line for when the taunt collaborator fails.
pub fn canned_taunt(rng: &mut StdRng) -> &'static str {
    CANNED_TAUNTS[rng.random_range(0..CANNED_TAUNTS.len())]
}

// --- Tests ---
