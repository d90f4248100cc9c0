//! CLI interface for Townsquare.
//!
//! Each subcommand is non-interactive: arguments in, plain text out.
//! Commands split into two groups:
//!
//! - `townsquare game new|list` — lifecycle management, no game context.
//! - `townsquare --game <id> <command>` — everything else, operating on
//!   one game's state document in a load-mutate-store cycle.
//!
//! The `--game` flag takes a full UUID or unambiguous prefix.
//!
//! This layer owns everything the engine leaves to its caller: the
//! privilege check (is the acting person the storyteller?), the
//! load-mutate-store cycle, and turning engine errors into terminal
//! messages.

mod game;
mod nom;
mod phase;
mod seat;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::resolve_storyteller;
use crate::game::Game;
use crate::state::State;
use crate::storage::Storage;

use game::GameCommand;
use nom::NomCommand;
use phase::PhaseCommand;
use seat::SeatCommand;

/// Townsquare — track a social-deduction game from the command line.
#[derive(Debug, Parser)]
#[command(name = "townsquare", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Game ID: full UUID or unambiguous prefix (e.g. `a3b`).
    /// Required for seat, phase, and nom commands.
    #[arg(long, global = true)]
    game: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: running a day
  1. townsquare game new --as sam "Friday night"
     → prints a game ID (e.g. a3b0fc12)
  2. townsquare --game a3b seat init 101:Ana 102:Bert 103:Cleo
  3. townsquare --game a3b phase dawn --as sam
  4. townsquare --game a3b nom new <nominator-seat> <nominee-seat>
  5. townsquare --game a3b nom lock <voter-seat> <nominee-seat> yes --as sam
  6. townsquare --game a3b phase dusk --as sam

Seat ids are printed by `seat show` and accepted everywhere a player
is named."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage games: create new ones, list existing.
    Game {
        #[command(subcommand)]
        command: GameCommand,
    },

    /// Manage the seating roster. Requires `--game`.
    Seat {
        #[command(subcommand)]
        command: SeatCommand,
    },

    /// Show or advance the day/night phase. Requires `--game`.
    Phase {
        #[command(subcommand)]
        command: PhaseCommand,
    },

    /// Raise nominations and record votes. Requires `--game`.
    Nom {
        #[command(subcommand)]
        command: NomCommand,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Game { command } => game::run(storage, command),
        Command::Seat { command } => {
            let game = require_game(storage, cli.game.as_deref())?;
            seat::run(storage, &game, command)
        }
        Command::Phase { command } => {
            let game = require_game(storage, cli.game.as_deref())?;
            phase::run(storage, &game, command)
        }
        Command::Nom { command } => {
            let game = require_game(storage, cli.game.as_deref())?;
            nom::run(storage, &game, command)
        }
    }
}

/// Require that `--game` was provided and resolve it.
fn require_game(storage: &Storage, game_ref: Option<&str>) -> Result<Game, String> {
    let game_ref = game_ref.ok_or("this command requires --game <id>")?;
    resolve_game(storage, game_ref)
}

/// Resolve a game reference (full UUID or unambiguous prefix) to a game.
fn resolve_game(storage: &Storage, reference: &str) -> Result<Game, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_game(id)
            .map_err(|e| format!("game not found: {e}"));
    }

    // Try as a prefix match against all games.
    let games = storage
        .list_games()
        .map_err(|e| format!("failed to list games: {e}"))?;

    let matches: Vec<&Game> = games
        .iter()
        .filter(|g| g.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => Err(format!("no game matching '{reference}'")),
        1 => Ok(matches[0].clone()),
        n => {
            let ids: Vec<String> = matches
                .iter()
                .map(|g| g.id.to_string()[..8].to_string())
                .collect();
            Err(format!(
                "'{reference}' is ambiguous — matches {n} games: {}",
                ids.join(", ")
            ))
        }
    }
}

/// The privilege check: resolve the acting person and require that
/// they are this game's storyteller.
fn ensure_storyteller(game: &Game, explicit: Option<&str>) -> Result<(), String> {
    let acting = resolve_storyteller(explicit)?;
    if acting != game.storyteller {
        return Err(format!(
            "only the storyteller ({}) may do this",
            game.storyteller
        ));
    }
    Ok(())
}

/// Whether the acting person gets the private view. Unlike
/// [`ensure_storyteller`], an unresolved name just means a public view.
fn is_storyteller(game: &Game, explicit: Option<&str>) -> bool {
    resolve_storyteller(explicit).is_ok_and(|acting| acting == game.storyteller)
}

/// One load-mutate-store cycle: load the game's state document, apply
/// `mutate`, and write the document back. Nothing is persisted when
/// `mutate` fails.
fn with_state<T>(
    storage: &Storage,
    game: &Game,
    mutate: impl FnOnce(&mut State) -> Result<T, String>,
) -> Result<T, String> {
    let mut state = read_state(storage, game)?;
    let value = mutate(&mut state)?;
    let document = state
        .dump()
        .map_err(|e| format!("failed to serialize state: {e}"))?;
    storage
        .save_state(game.id, &document)
        .map_err(|e| format!("failed to save state: {e}"))?;
    Ok(value)
}

/// Loads the game's state without writing anything back.
fn read_state(storage: &Storage, game: &Game) -> Result<State, String> {
    let document = storage
        .load_state(game.id)
        .map_err(|e| format!("failed to load state: {e}"))?;
    State::load(&document).map_err(|e| format!("failed to read state: {e}"))
}
