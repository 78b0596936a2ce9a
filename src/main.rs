// src/main.rs
//
// Terminal front end for the Chaos Arcade: four small games that all
// cheat in their own way. Pick one from the menu and play it through;
// the game modules own every rule, this file only does I/O.

mod chess;
mod ludo;
mod sudoku;
mod tictactoe;

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use chess::{
    canned_taunt, ChessMatch, Difficulty, GameEvent, Mode, OfflineTaunts, Side, Square,
    TauntError, TauntSource,
};
use ludo::{LudoGame, RollOutcome, TokenSpot};
use sudoku::{conflicts, CheckResult, SudokuPuzzle, GRID};
use tictactoe::{PlaceOutcome, TicTacToe};

const DEFAULT_STATS_FILENAME: &str = "chaos_chess_stats.json";

/// Pause before the engine's reply, so its move reads as a decision
/// rather than an echo.
const AI_MOVE_DELAY: Duration = Duration::from_secs(1);

// --- Command Errors ---

#[derive(Debug)]
enum CommandError {
    UnknownCommand(String),
    InvalidArgument(String),
    MissingArgument(String),
    StatsError(chess::StatsError),
    IoError(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(cmd) => {
                write!(f, "Unknown command: '{}'. Type 'help' for commands.", cmd)
            }
            CommandError::InvalidArgument(arg) => write!(f, "Invalid argument: '{}'", arg),
            CommandError::MissingArgument(cmd) => write!(f, "Missing argument for command: '{}'", cmd),
            CommandError::StatsError(e) => write!(f, "Stats Save Error: {}", e),
            CommandError::IoError(e) => write!(f, "Input/Output error: {}", e),
        }
    }
}

impl Error for CommandError {}

impl From<chess::StatsError> for CommandError {
    fn from(e: chess::StatsError) -> Self {
        CommandError::StatsError(e)
    }
}
impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::IoError(e)
    }
}

// --- Input Helpers ---

/// Reads one trimmed line from stdin. None means EOF.
fn read_line_trimmed() -> Result<Option<String>, io::Error> {
    let mut line = String::new();
    match io::stdin().read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

fn prompt(text: &str) -> Result<Option<String>, io::Error> {
    print!("{}", text);
    io::stdout().flush()?;
    read_line_trimmed()
}

// --- Main Menu ---

fn main() -> Result<(), Box<dyn Error>> {
    println!("==============================");
    println!("|       Chaos Arcade         |");
    println!("==============================");

    'menu: loop {
        println!("\nGames:");
        println!("  1) Chaos Chess     - the pieces forget how they move");
        println!("  2) Liar's Ludo     - the die lies one time in five");
        println!("  3) Saboteur Sudoku - some of the clues are plants");
        println!("  4) Unstable Tic-Tac-Toe - the board resizes itself");
        println!("  q) Quit");

        let choice = match prompt("Pick a game: ")? {
            Some(choice) => choice,
            None => break 'menu,
        };
        match choice.as_str() {
            "1" => run_chess()?,
            "2" => run_ludo()?,
            "3" => run_sudoku()?,
            "4" => run_tictactoe()?,
            "q" | "quit" | "exit" => break 'menu,
            "" => {}
            other => println!("Unknown choice: '{}'", other),
        }
    }

    println!("\nThanks for playing.");
    Ok(())
}

// --- Chaos Chess Front End ---

#[derive(Debug)]
enum ChessInput {
    Click(Square),
    Command(ChessCommand),
}

#[derive(Debug)]
enum ChessCommand {
    Rules,
    Moves(Square),
    History,
    SaveStats(String),
    Help,
    Quit,
}

fn parse_chess_input(input: &str) -> Result<ChessInput, CommandError> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command_word = parts.next().unwrap_or("").to_lowercase();
    let argument = parts.next().unwrap_or("").trim();

    match command_word.as_str() {
        "rules" => return Ok(ChessInput::Command(ChessCommand::Rules)),
        "history" => return Ok(ChessInput::Command(ChessCommand::History)),
        "help" | "?" => return Ok(ChessInput::Command(ChessCommand::Help)),
        "quit" | "exit" => return Ok(ChessInput::Command(ChessCommand::Quit)),
        "moves" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument("moves".to_string()));
            }
            let square = Square::from_algebraic(argument)
                .ok_or_else(|| CommandError::InvalidArgument(argument.to_string()))?;
            return Ok(ChessInput::Command(ChessCommand::Moves(square)));
        }
        "savestats" => {
            let filename = if argument.is_empty() { DEFAULT_STATS_FILENAME } else { argument };
            return Ok(ChessInput::Command(ChessCommand::SaveStats(filename.to_string())));
        }
        _ => {}
    }

    Square::from_algebraic(trimmed)
        .map(ChessInput::Click)
        .ok_or_else(|| CommandError::UnknownCommand(trimmed.to_string()))
}

fn choose_mode() -> Result<Option<Mode>, io::Error> {
    loop {
        let answer = match prompt("Opponent - (1) another human, (2) the AI: ")? {
            Some(answer) => answer,
            None => return Ok(None),
        };
        match answer.as_str() {
            "1" => return Ok(Some(Mode::TwoPlayer)),
            "2" => break,
            other => println!("Unknown choice: '{}'", other),
        }
    }
    loop {
        let answer = match prompt("Difficulty - (e)asy, (m)edium, (h)ard: ")? {
            Some(answer) => answer,
            None => return Ok(None),
        };
        let difficulty = match answer.to_lowercase().as_str() {
            "e" | "easy" => Difficulty::Easy,
            "m" | "medium" => Difficulty::Medium,
            "h" | "hard" => Difficulty::Hard,
            other => {
                println!("Unknown difficulty: '{}'", other);
                continue;
            }
        };
        return Ok(Some(Mode::SinglePlayer(difficulty)));
    }
}

fn report_chess_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Selected(sq) => println!("Selected {}.", sq),
            GameEvent::Deselected => println!("Selection cleared."),
            GameEvent::Moved(record) => {
                print!("{} {} moves {} to {}", record.side, record.kind.name(), record.from, record.to);
                match record.captured {
                    Some(piece) => println!(", capturing the {} {}!", piece.side, piece.kind.name()),
                    None => println!("."),
                }
            }
            GameEvent::RuleChanged { kind, pattern } => {
                println!("*** CHAOS: The {} now moves like a {}! ***", kind.glyph(Side::White), pattern.name());
            }
            GameEvent::GameOver { winner } => println!("\n=== GAME OVER: {} wins! ===", winner),
        }
    }
}

fn run_chess() -> Result<(), CommandError> {
    let mode = match choose_mode()? {
        Some(mode) => mode,
        None => return Ok(()),
    };
    let mut game = ChessMatch::new(mode);
    let mut taunt_rng = StdRng::from_os_rng();
    let (taunt_tx, taunt_rx) = mpsc::channel::<Result<String, TauntError>>();

    println!("\nA fresh board, freshly scrambled rules. Good luck.");
    print_chess_help();

    'game_loop: loop {
        // Taunts arrive whenever their thread finishes; a failed
        // request falls back to a canned line.
        while let Ok(result) = taunt_rx.try_recv() {
            let line = result.unwrap_or_else(|_| canned_taunt(&mut taunt_rng).to_string());
            println!("AI: \"{}\"", line);
        }

        println!("------------------------------------------");
        println!("{}", game.board());
        println!("{}", game.rules());

        if game.is_over() {
            if let Some(winner) = game.winner() {
                println!("\n=== GAME OVER: {} wins! ===", winner);
            }
            println!("Saving final game stats to '{}'...", DEFAULT_STATS_FILENAME);
            match game.save_stats_to_file(DEFAULT_STATS_FILENAME) {
                Ok(()) => println!("Stats saved successfully."),
                Err(e) => eprintln!("Error: Failed to save final stats: {}", e),
            }
            break 'game_loop;
        }

        if game.engine_to_move() {
            println!("\nAI is thinking...");
            thread::sleep(AI_MOVE_DELAY);
            let events = game.play_engine_move();
            report_chess_events(&events);

            // Ask the taunt collaborator off-thread; the game never
            // waits on it.
            let summary = game.board().summary_text();
            let tx = taunt_tx.clone();
            thread::spawn(move || {
                let _ = tx.send(OfflineTaunts.request_taunt(&summary));
            });
            continue 'game_loop;
        }

        let selected_note = game
            .selected()
            .map(|sq| format!(" [selected: {}]", sq))
            .unwrap_or_default();
        let line = match prompt(&format!(
            "\n{}'s turn{}. Enter a square (e.g. e2) or command: ",
            game.turn(),
            selected_note
        ))? {
            Some(line) => line,
            None => {
                println!("\nEnd of input detected. Leaving the game.");
                break 'game_loop;
            }
        };
        if line.is_empty() {
            continue 'game_loop;
        }

        match parse_chess_input(&line) {
            Ok(ChessInput::Click(square)) => {
                let events = game.square_clicked(square);
                if events.is_empty() {
                    println!("Nothing happens on {}.", square);
                } else {
                    report_chess_events(&events);
                }
            }
            Ok(ChessInput::Command(command)) => match command {
                ChessCommand::Rules => println!("{}", game.rules()),
                ChessCommand::Moves(square) => {
                    let moves = game.legal_moves(square);
                    if moves.is_empty() {
                        println!("No legal moves from {}.", square);
                    } else {
                        let list: Vec<String> = moves.iter().map(|sq| sq.to_string()).collect();
                        println!("Moves from {}: {}", square, list.join(" "));
                    }
                }
                ChessCommand::History => {
                    let moved: Vec<String> = game
                        .history()
                        .iter()
                        .filter_map(|e| match e {
                            GameEvent::Moved(r) => Some(format!("{}{}", r.from, r.to)),
                            _ => None,
                        })
                        .collect();
                    if moved.is_empty() {
                        println!("No moves yet.");
                    } else {
                        println!("Moves so far: {}", moved.join(" "));
                    }
                }
                ChessCommand::SaveStats(filename) => {
                    match game.save_stats_to_file(&filename) {
                        Ok(()) => println!("Game stats saved to '{}'.", filename),
                        Err(e) => println!("Error: {}", CommandError::from(e)),
                    }
                }
                ChessCommand::Help => print_chess_help(),
                ChessCommand::Quit => {
                    println!("Leaving the game.");
                    break 'game_loop;
                }
            },
            Err(e) => println!("Input Error: {}", e),
        }
    }

    Ok(())
}

/// Prints available chess commands.
fn print_chess_help() {
    println!("\nAvailable Commands:");
    println!("  <square>       Click a square (e.g. e2). First click selects one of");
    println!("                 your pieces, second click moves it. Clicking another");
    println!("                 of your pieces reselects; anything else deselects.");
    println!("  moves <square> List legal destinations from a square.");
    println!("  rules          Show the current (temporary) movement rules.");
    println!("  history        Show the moves played so far.");
    println!("  savestats [file] Save game statistics (default: {}).", DEFAULT_STATS_FILENAME);
    println!("  help           Show this help message.");
    println!("  quit / exit    Back to the menu.");
    println!();
}

// --- Liar's Ludo Front End ---

fn spot_text(spot: TokenSpot) -> String {
    match spot {
        TokenSpot::Yard => "yard".to_string(),
        TokenSpot::Path(cell) => format!("cell {}", cell),
        TokenSpot::Home(slot) => format!("home {}", slot + 1),
    }
}

fn print_ludo_board(game: &LudoGame) {
    println!("------------------------------------------");
    for &color in game.players() {
        let spots: Vec<String> = game
            .tokens()
            .iter()
            .filter(|t| t.color == color)
            .map(|t| spot_text(t.spot))
            .collect();
        println!("{:<7} {}", format!("{}:", color), spots.join(", "));
    }
}

fn run_ludo() -> Result<(), CommandError> {
    let player_count = loop {
        let answer = match prompt("How many players (2-4)? ")? {
            Some(answer) => answer,
            None => return Ok(()),
        };
        match answer.parse::<usize>() {
            Ok(n) if (2..=4).contains(&n) => break n,
            _ => println!("Please enter 2, 3 or 4."),
        }
    };
    let mut game = LudoGame::new(player_count);
    println!("\nThe die in this house lies one time in five. Play accordingly.");

    'game_loop: loop {
        print_ludo_board(&game);
        if let Some(winner) = game.winner() {
            println!("\n=== GAME OVER: {} brings all four tokens home! ===", winner);
            break 'game_loop;
        }

        let line = match prompt(&format!(
            "\n{} to roll. Press Enter to roll (or 'quit'): ",
            game.current_player()
        ))? {
            Some(line) => line,
            None => break 'game_loop,
        };
        if matches!(line.as_str(), "quit" | "exit") {
            break 'game_loop;
        }

        let roller = game.current_player();
        let outcome = match game.roll_die() {
            Some(outcome) => outcome,
            None => continue 'game_loop,
        };
        let roll = match outcome {
            RollOutcome::NoMoves(roll) => {
                println!("{} rolls a {}. No token can use it; turn passes.", roller, roll.shown);
                if roll.lied() {
                    println!("(Rumor has it the die actually landed on {}.)", roll.actual);
                }
                continue 'game_loop;
            }
            RollOutcome::Moves(roll) => roll,
        };
        println!("{} rolls a {}.", roller, roll.shown);
        if roll.lied() {
            println!("(Rumor has it the die actually landed on {}.)", roll.actual);
        }

        let movable = game.movable_tokens();
        let index = if movable.len() == 1 {
            movable[0]
        } else {
            for (n, &idx) in movable.iter().enumerate() {
                println!("  {}) token at {}", n + 1, spot_text(game.tokens()[idx].spot));
            }
            loop {
                let answer = match prompt("Which token? ")? {
                    Some(answer) => answer,
                    None => break 'game_loop,
                };
                match answer.parse::<usize>() {
                    Ok(n) if n >= 1 && n <= movable.len() => break movable[n - 1],
                    _ => println!("Pick a number between 1 and {}.", movable.len()),
                }
            }
        };

        if let Some(summary) = game.move_token(index) {
            println!("Token moves from {} to {}.", spot_text(summary.from), spot_text(summary.to));
            if summary.capture.is_some() {
                println!("An enemy token is sent back to its yard!");
            }
            if summary.entered_home {
                println!("The token is home.");
            }
            if summary.extra_turn {
                println!("{} rolls again.", roller);
            }
        }
    }

    Ok(())
}

// --- Saboteur Sudoku Front End ---

fn print_sudoku(entries: &[[u8; GRID]; GRID]) {
    println!("------------------------------------------");
    println!("    1 2 3   4 5 6   7 8 9");
    for r in 0..GRID {
        if r % 3 == 0 {
            println!("  +-------+-------+-------+");
        }
        print!("{} ", r + 1);
        for c in 0..GRID {
            if c % 3 == 0 {
                print!("| ");
            }
            match entries[r][c] {
                0 => print!(". "),
                v => print!("{} ", v),
            }
        }
        println!("|");
    }
    println!("  +-------+-------+-------+");
}

fn parse_cell_ref(row: &str, col: &str) -> Option<(usize, usize)> {
    let r = row.parse::<usize>().ok()?;
    let c = col.parse::<usize>().ok()?;
    if (1..=GRID).contains(&r) && (1..=GRID).contains(&c) {
        Some((r - 1, c - 1))
    } else {
        None
    }
}

fn run_sudoku() -> Result<(), CommandError> {
    let difficulty = loop {
        let answer = match prompt("Difficulty - (e)asy, (m)edium, (h)ard: ")? {
            Some(answer) => answer,
            None => return Ok(()),
        };
        match answer.to_lowercase().as_str() {
            "e" | "easy" => break sudoku::Difficulty::Easy,
            "m" | "medium" => break sudoku::Difficulty::Medium,
            "h" | "hard" => break sudoku::Difficulty::Hard,
            other => println!("Unknown difficulty: '{}'", other),
        }
    };

    let puzzle = SudokuPuzzle::new_random(difficulty);
    let mut entries: [[u8; GRID]; GRID] =
        std::array::from_fn(|r| std::array::from_fn(|c| puzzle.shown_value(r, c)));

    println!("\nSome of the printed clues are lies. Every cell is editable.");
    println!("Commands: set <row> <col> <value>, clear <row> <col>, conflicts, check, quit");

    'game_loop: loop {
        print_sudoku(&entries);
        let line = match prompt("\n> ")? {
            Some(line) => line,
            None => break 'game_loop,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["set", row, col, value] => {
                let cell = parse_cell_ref(row, col);
                let v = value.parse::<u8>().ok().filter(|v| (1..=9).contains(v));
                match (cell, v) {
                    (Some((r, c)), Some(v)) => entries[r][c] = v,
                    _ => println!("Usage: set <row 1-9> <col 1-9> <value 1-9>"),
                }
            }
            ["clear", row, col] => match parse_cell_ref(row, col) {
                Some((r, c)) => entries[r][c] = 0,
                None => println!("Usage: clear <row 1-9> <col 1-9>"),
            },
            ["conflicts"] => {
                let clashes = conflicts(&entries);
                if clashes.is_empty() {
                    println!("No visible conflicts. (Lies may still be lurking.)");
                } else {
                    for (r, c) in clashes {
                        println!("Conflict at row {} col {}.", r + 1, c + 1);
                    }
                }
            }
            ["check"] => match puzzle.check(&entries) {
                CheckResult::Incomplete => println!("The grid is not full yet."),
                CheckResult::Wrong => println!("At least one entry is wrong. The lies claim another victim."),
                CheckResult::Solved => {
                    println!("\n=== SOLVED! You saw through all {} lies. ===", puzzle.lie_count());
                    break 'game_loop;
                }
            },
            ["quit"] | ["exit"] => break 'game_loop,
            _ => println!("Unknown command: '{}'", line),
        }
    }

    Ok(())
}

// --- Unstable Tic-Tac-Toe Front End ---

fn run_tictactoe() -> Result<(), CommandError> {
    let mut game = TicTacToe::new();
    println!("\nThe board mutates after most moves. Enter moves as: <row> <col>");

    'game_loop: loop {
        println!("------------------------------------------");
        print!("{}", game);

        if game.is_over() {
            match game.winner() {
                Some(mark) => println!("\n=== GAME OVER: {} wins! ===", mark),
                None => println!("\n=== GAME OVER: Draw. ==="),
            }
            break 'game_loop;
        }

        let line = match prompt(&format!("\n{} to move (row col, 1-{}): ", game.turn(), game.size()))? {
            Some(line) => line,
            None => break 'game_loop,
        };
        if matches!(line.as_str(), "quit" | "exit") {
            break 'game_loop;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let (r, c) = match words.as_slice() {
            [row, col] => match (row.parse::<usize>(), col.parse::<usize>()) {
                (Ok(r), Ok(c)) if (1..=game.size()).contains(&r) && (1..=game.size()).contains(&c) => {
                    (r - 1, c - 1)
                }
                _ => {
                    println!("Coordinates must be between 1 and {}.", game.size());
                    continue 'game_loop;
                }
            },
            _ => {
                println!("Enter a row and a column, e.g. '2 3'.");
                continue 'game_loop;
            }
        };

        match game.place(r * game.size() + c) {
            PlaceOutcome::Rejected => println!("That cell is taken."),
            PlaceOutcome::Win { mark, .. } => {
                println!("{} completes a line!", mark);
            }
            PlaceOutcome::Draw => {}
            PlaceOutcome::Continue { resized } => {
                if let Some(size) = resized {
                    println!("*** The board shudders and is now {}x{}! ***", size, size);
                }
            }
        }
    }

    Ok(())
}
