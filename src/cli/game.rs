//! Game lifecycle commands: new, list.

use clap::Subcommand;
use jiff::Timestamp;
use uuid::Uuid;

use crate::config::resolve_storyteller;
use crate::game::Game;
use crate::state::State;
use crate::storage::Storage;

#[derive(Debug, Subcommand)]
pub enum GameCommand {
    /// Create a new game. Prints the game ID.
    New {
        /// The storyteller running this game.
        /// When omitted, the configured default is used.
        #[arg(long = "as")]
        storyteller: Option<String>,

        /// Display name for listings.
        name: String,
    },

    /// List games.
    List,
}

pub(super) fn run(storage: &Storage, command: GameCommand) -> Result<(), String> {
    match command {
        GameCommand::New { storyteller, name } => cmd_new(storage, storyteller.as_deref(), &name),
        GameCommand::List => cmd_list(storage),
    }
}

fn cmd_new(storage: &Storage, storyteller: Option<&str>, name: &str) -> Result<(), String> {
    let storyteller = resolve_storyteller(storyteller)?;

    let game = Game {
        id: Uuid::new_v4(),
        name: name.to_string(),
        storyteller,
        created_at: Timestamp::now(),
    };

    // Every game starts from the documented defaults: empty seating,
    // day 1 at night, no nominations.
    let document = State::default()
        .dump()
        .map_err(|e| format!("failed to serialize state: {e}"))?;
    storage
        .create_game(&game, &document)
        .map_err(|e| format!("failed to create game: {e}"))?;

    println!("{}", game.id);
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let games = storage
        .list_games()
        .map_err(|e| format!("failed to list games: {e}"))?;

    if games.is_empty() {
        println!("No games");
        return Ok(());
    }

    for g in &games {
        let short_id = &g.id.to_string()[..8];
        println!("{short_id}  [{}]  {}", g.storyteller, g.name);
    }

    Ok(())
}
