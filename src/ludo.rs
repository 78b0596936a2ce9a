// src/ludo.rs
//
// Liar's Ludo: standard four-token Ludo on a 52-cell ring, except the
// die sometimes lies. The shown value is what the token moves by; the
// real roll is only ever revealed as table talk.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// --- Constants ---

pub const RING_LEN: u8 = 52;
pub const HOME_LEN: u8 = 6;
pub const TOKENS_PER_PLAYER: usize = 4;

/// Probability that a roll shows a value other than the one rolled.
const LIE_CHANCE: f64 = 0.2;

// --- Colors and Geometry ---

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Red,
    Green,
    Yellow,
    Blue,
}

/// Turn order; a game with n players uses the first n entries.
pub const COLORS: [PlayerColor; 4] = [
    PlayerColor::Red,
    PlayerColor::Green,
    PlayerColor::Yellow,
    PlayerColor::Blue,
];

impl PlayerColor {
    /// Ring cell a token lands on when leaving the yard. Start cells
    /// are also the safe cells: no captures happen on them.
    pub fn start_cell(self) -> u8 {
        match self {
            PlayerColor::Green => 1,
            PlayerColor::Yellow => 14,
            PlayerColor::Blue => 27,
            PlayerColor::Red => 40,
        }
    }

    /// Last ring cell before this color's home column.
    pub fn home_entry(self) -> u8 {
        (self.start_cell() + RING_LEN - 1) % RING_LEN
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Blue => "Blue",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn is_safe_cell(cell: u8) -> bool {
    COLORS.iter().any(|c| c.start_cell() == cell)
}

// --- Tokens ---

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenSpot {
    /// Waiting to enter; only a shown 6 releases it.
    Yard,
    /// On the shared ring at the given absolute cell.
    Path(u8),
    /// In the private home column, 0-based; any slot counts as home.
    Home(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub color: PlayerColor,
    pub spot: TokenSpot,
}

// --- The Lying Die ---

/// A single roll. `shown` drives all movement; `actual` exists only to
/// be gossiped about after the fact.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DieRoll {
    pub shown: u8,
    pub actual: u8,
}

impl DieRoll {
    pub fn lied(self) -> bool {
        self.shown != self.actual
    }
}

/// Rolls the die honestly, then lies about the result one time in
/// five. A lie always shows a value different from the real one.
pub fn chaos_roll(rng: &mut StdRng) -> DieRoll {
    let actual = rng.random_range(1..=6);
    let shown = if rng.random_bool(LIE_CHANCE) {
        let fake = rng.random_range(1..=5);
        if fake >= actual { fake + 1 } else { fake }
    } else {
        actual
    };
    DieRoll { shown, actual }
}

// --- Game State ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// At least one token can use the shown value.
    Moves(DieRoll),
    /// Nothing can move; the turn has already passed.
    NoMoves(DieRoll),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub token: usize,
    pub from: TokenSpot,
    pub to: TokenSpot,
    /// Index of a captured opposing token, already sent to its yard.
    pub capture: Option<usize>,
    pub entered_home: bool,
    pub extra_turn: bool,
    pub winner: Option<PlayerColor>,
}

/// One game of Liar's Ludo. Tokens are stored flat, four per player in
/// turn order, so token index / 4 recovers the owner.
#[derive(Debug, Clone)]
pub struct LudoGame {
    tokens: Vec<Token>,
    players: Vec<PlayerColor>,
    turn: usize,
    roll: Option<DieRoll>,
    winner: Option<PlayerColor>,
    rng: StdRng,
}

impl LudoGame {
    pub fn new(player_count: usize) -> LudoGame {
        Self::with_rng(player_count, StdRng::from_os_rng())
    }

    pub fn with_rng(player_count: usize, rng: StdRng) -> LudoGame {
        assert!((2..=4).contains(&player_count), "ludo takes 2 to 4 players");
        let players = COLORS[..player_count].to_vec();
        let tokens = players
            .iter()
            .flat_map(|&color| {
                (0..TOKENS_PER_PLAYER).map(move |_| Token { color, spot: TokenSpot::Yard })
            })
            .collect();
        LudoGame {
            tokens,
            players,
            turn: 0,
            roll: None,
            winner: None,
            rng,
        }
    }

    pub fn players(&self) -> &[PlayerColor] {
        &self.players
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn current_player(&self) -> PlayerColor {
        self.players[self.turn]
    }

    pub fn pending_roll(&self) -> Option<DieRoll> {
        self.roll
    }

    pub fn winner(&self) -> Option<PlayerColor> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Rolls for the current player. Returns None when the game is
    /// over or a roll is already waiting to be played. A roll no token
    /// can use passes the turn on the spot.
    pub fn roll_die(&mut self) -> Option<RollOutcome> {
        if self.is_over() || self.roll.is_some() {
            return None;
        }
        let roll = chaos_roll(&mut self.rng);
        self.roll = Some(roll);
        if self.movable_tokens().is_empty() {
            self.roll = None;
            self.advance_turn();
            Some(RollOutcome::NoMoves(roll))
        } else {
            Some(RollOutcome::Moves(roll))
        }
    }

    /// Indices of the current player's tokens that can use the pending
    /// shown value.
    pub fn movable_tokens(&self) -> Vec<usize> {
        let roll = match self.roll {
            Some(roll) => roll,
            None => return Vec::new(),
        };
        let color = self.current_player();
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.color == color && self.destination(t, roll.shown).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Where `token` would land moving by `steps`, or None if it
    /// cannot move. Home tokens never move again; entering the home
    /// column must not overshoot its last slot.
    fn destination(&self, token: &Token, steps: u8) -> Option<TokenSpot> {
        match token.spot {
            TokenSpot::Home(_) => None,
            TokenSpot::Yard => {
                if steps == 6 {
                    Some(TokenSpot::Path(token.color.start_cell()))
                } else {
                    None
                }
            }
            TokenSpot::Path(cell) => {
                let entry = token.color.home_entry();
                let to_entry = (entry + RING_LEN - cell) % RING_LEN;
                if steps <= to_entry {
                    Some(TokenSpot::Path((cell + steps) % RING_LEN))
                } else {
                    let into_home = steps - to_entry - 1;
                    if into_home < HOME_LEN {
                        Some(TokenSpot::Home(into_home))
                    } else {
                        None
                    }
                }
            }
        }
    }

    /// Plays the pending roll with the chosen token. Returns None if
    /// there is no pending roll or the token cannot move.
    pub fn move_token(&mut self, index: usize) -> Option<MoveSummary> {
        let roll = self.roll?;
        if self.is_over() || index >= self.tokens.len() {
            return None;
        }
        let token = self.tokens[index];
        if token.color != self.current_player() {
            return None;
        }
        let to = self.destination(&token, roll.shown)?;

        let capture = match to {
            TokenSpot::Path(cell) if !is_safe_cell(cell) => self
                .tokens
                .iter()
                .position(|t| t.color != token.color && t.spot == TokenSpot::Path(cell)),
            _ => None,
        };
        if let Some(victim) = capture {
            self.tokens[victim].spot = TokenSpot::Yard;
        }
        self.tokens[index].spot = to;
        self.roll = None;

        let entered_home = matches!(to, TokenSpot::Home(_));
        let winner = if self.home_count(token.color) == TOKENS_PER_PLAYER {
            Some(token.color)
        } else {
            None
        };
        self.winner = winner;

        let extra_turn = winner.is_none() && (roll.shown == 6 || capture.is_some());
        if winner.is_none() && !extra_turn {
            self.advance_turn();
        }

        Some(MoveSummary {
            token: index,
            from: token.spot,
            to,
            capture,
            entered_home,
            extra_turn,
            winner,
        })
    }

    pub fn home_count(&self, color: PlayerColor) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.color == color && matches!(t.spot, TokenSpot::Home(_)))
            .count()
    }

    fn advance_turn(&mut self) {
        self.turn = (self.turn + 1) % self.players.len();
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;

    fn game(seed: u64) -> LudoGame {
        LudoGame::with_rng(4, StdRng::seed_from_u64(seed))
    }

    /// Forces the pending roll so scenarios don't depend on the RNG.
    fn set_roll(game: &mut LudoGame, shown: u8) {
        game.roll = Some(DieRoll { shown, actual: shown });
    }

    fn token_of(game: &LudoGame, color: PlayerColor, nth: usize) -> usize {
        game.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.color == color)
            .map(|(i, _)| i)
            .nth(nth)
            .unwrap()
    }

    #[test]
    fn start_and_home_entry_geometry() {
        assert_eq!(PlayerColor::Green.start_cell(), 1);
        assert_eq!(PlayerColor::Yellow.start_cell(), 14);
        assert_eq!(PlayerColor::Blue.start_cell(), 27);
        assert_eq!(PlayerColor::Red.start_cell(), 40);
        assert_eq!(PlayerColor::Green.home_entry(), 0);
        assert_eq!(PlayerColor::Yellow.home_entry(), 13);
        assert_eq!(PlayerColor::Blue.home_entry(), 26);
        assert_eq!(PlayerColor::Red.home_entry(), 39);
    }

    #[test]
    fn die_lies_about_a_fifth_of_the_time() {
        let mut lies = 0u32;
        for seed in 0..5000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let roll = chaos_roll(&mut rng);
            assert!((1..=6).contains(&roll.shown));
            assert!((1..=6).contains(&roll.actual));
            if roll.lied() {
                assert_ne!(roll.shown, roll.actual);
                lies += 1;
            }
        }
        // Expected 1000 of 5000; 800..1200 is a generous band.
        assert!((800..1200).contains(&lies), "lie count {} out of band", lies);
    }

    #[test]
    fn yard_exit_needs_a_shown_six() {
        let mut g = game(1);
        let red = token_of(&g, PlayerColor::Red, 0);

        set_roll(&mut g, 5);
        assert!(g.movable_tokens().is_empty());

        set_roll(&mut g, 6);
        assert_eq!(g.movable_tokens().len(), TOKENS_PER_PLAYER);
        let summary = g.move_token(red).unwrap();
        assert_eq!(summary.to, TokenSpot::Path(PlayerColor::Red.start_cell()));
        assert!(summary.extra_turn, "a shown six keeps the turn");
        assert_eq!(g.current_player(), PlayerColor::Red);
    }

    #[test]
    fn movement_uses_the_shown_value_not_the_real_one() {
        let mut g = game(2);
        let red = token_of(&g, PlayerColor::Red, 0);
        g.tokens[red].spot = TokenSpot::Path(45);
        g.roll = Some(DieRoll { shown: 3, actual: 5 });
        let summary = g.move_token(red).unwrap();
        assert_eq!(summary.to, TokenSpot::Path(48));
    }

    #[test]
    fn home_entry_and_overshoot_arithmetic() {
        // Green at cell 50 is two steps from its entry at 0.
        let mut g = game(3);
        g.turn = 1; // green
        let green = token_of(&g, PlayerColor::Green, 0);

        g.tokens[green].spot = TokenSpot::Path(50);
        set_roll(&mut g, 3);
        let summary = g.move_token(green).unwrap();
        assert_eq!(summary.to, TokenSpot::Home(0));
        assert!(summary.entered_home);

        g.turn = 1;
        let other = token_of(&g, PlayerColor::Green, 1);
        g.tokens[other].spot = TokenSpot::Path(50);
        set_roll(&mut g, 2);
        let summary = g.move_token(other).unwrap();
        assert_eq!(summary.to, TokenSpot::Path(0), "exactly reaching the entry stays on the ring");
    }

    #[test]
    fn overshooting_the_home_column_is_not_a_move() {
        let mut g = game(4);
        g.turn = 1;
        let green = token_of(&g, PlayerColor::Green, 0);
        // Sitting on the home entry: six steps reach the last slot,
        // seven would run off the end.
        g.tokens[green].spot = TokenSpot::Path(0);
        assert_eq!(
            g.destination(&g.tokens[green], 6),
            Some(TokenSpot::Home(5)),
            "last home slot is reachable"
        );
        assert_eq!(g.destination(&g.tokens[green], 7), None);
    }

    #[test]
    fn landing_on_an_opponent_captures_and_grants_a_turn() {
        let mut g = game(5);
        let red = token_of(&g, PlayerColor::Red, 0);
        let green = token_of(&g, PlayerColor::Green, 0);
        g.tokens[red].spot = TokenSpot::Path(42);
        g.tokens[green].spot = TokenSpot::Path(45);
        set_roll(&mut g, 3);
        let summary = g.move_token(red).unwrap();
        assert_eq!(summary.capture, Some(green));
        assert_eq!(g.tokens[green].spot, TokenSpot::Yard);
        assert!(summary.extra_turn);
        assert_eq!(g.current_player(), PlayerColor::Red);
    }

    #[test]
    fn start_cells_are_capture_safe() {
        let mut g = game(6);
        let red = token_of(&g, PlayerColor::Red, 0);
        let green = token_of(&g, PlayerColor::Green, 0);
        // Green sits on Yellow's start cell; Red lands on it.
        g.tokens[red].spot = TokenSpot::Path(11);
        g.tokens[green].spot = TokenSpot::Path(14);
        set_roll(&mut g, 3);
        let summary = g.move_token(red).unwrap();
        assert_eq!(summary.capture, None);
        assert_eq!(g.tokens[green].spot, TokenSpot::Path(14));
        assert!(!summary.extra_turn);
        assert_eq!(g.current_player(), PlayerColor::Green);
    }

    #[test]
    fn own_tokens_share_cells_without_capture() {
        let mut g = game(7);
        let first = token_of(&g, PlayerColor::Red, 0);
        let second = token_of(&g, PlayerColor::Red, 1);
        g.tokens[first].spot = TokenSpot::Path(42);
        g.tokens[second].spot = TokenSpot::Path(45);
        set_roll(&mut g, 3);
        let summary = g.move_token(first).unwrap();
        assert_eq!(summary.capture, None);
        assert_eq!(g.tokens[second].spot, TokenSpot::Path(45));
    }

    #[test]
    fn unusable_roll_passes_the_turn() {
        let mut g = game(8);
        // All red tokens stay in the yard; force non-six shown values
        // by rerolling until one appears.
        loop {
            match g.roll_die() {
                Some(RollOutcome::NoMoves(roll)) => {
                    assert_ne!(roll.shown, 6);
                    break;
                }
                Some(RollOutcome::Moves(roll)) => {
                    assert_eq!(roll.shown, 6);
                    // Burn the roll and restore the yard.
                    let idx = g.movable_tokens()[0];
                    g.move_token(idx);
                    g.tokens[idx].spot = TokenSpot::Yard;
                    g.turn = 0;
                }
                None => panic!("roll refused"),
            }
        }
        assert_eq!(g.current_player(), PlayerColor::Green);
        assert_eq!(g.pending_roll(), None);
    }

    #[test]
    fn fourth_token_home_wins() {
        let mut g = game(9);
        for nth in 0..3 {
            let idx = token_of(&g, PlayerColor::Red, nth);
            g.tokens[idx].spot = TokenSpot::Home(nth as u8 + 1);
        }
        let last = token_of(&g, PlayerColor::Red, 3);
        g.tokens[last].spot = TokenSpot::Path(38); // one before home entry
        set_roll(&mut g, 2);
        let summary = g.move_token(last).unwrap();
        assert_eq!(summary.winner, Some(PlayerColor::Red));
        assert!(g.is_over());
        assert!(!summary.extra_turn);
        assert!(g.roll_die().is_none(), "finished games refuse new rolls");
    }

    #[test]
    fn home_tokens_never_move_again() {
        let mut g = game(10);
        let red = token_of(&g, PlayerColor::Red, 0);
        g.tokens[red].spot = TokenSpot::Home(2);
        set_roll(&mut g, 6);
        // The other three can still leave the yard; the home token is
        // not offered.
        assert!(!g.movable_tokens().contains(&red));
    }

    #[test]
    fn two_player_game_uses_red_and_green() {
        let g = LudoGame::with_rng(2, StdRng::seed_from_u64(11));
        assert_eq!(g.players(), &[PlayerColor::Red, PlayerColor::Green]);
        assert_eq!(g.tokens().len(), 8);
    }
}
