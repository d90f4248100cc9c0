//! Day/night phase commands, plus the night-order pages.

use clap::{Subcommand, ValueEnum};

use crate::game::Game;
use crate::state::Night;
use crate::storage::Storage;

use super::{ensure_storyteller, is_storyteller, read_state, with_state};

#[derive(Debug, Subcommand)]
pub enum PhaseCommand {
    /// Show the current day and phase.
    Show,

    /// End the day: the table goes to sleep and the day number advances.
    Dusk {
        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Start the day.
    Dawn {
        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Render the night order from the loaded script.
    Nights {
        #[arg(value_enum)]
        night: NightArg,

        /// Drop roles nobody holds. Only meaningful on the private view.
        #[arg(long)]
        filter: bool,

        /// Act as this storyteller to see which seat each role belongs to.
        #[arg(long = "as")]
        storyteller: Option<String>,
    },
}

/// CLI-facing night selector, mapped to the domain `Night`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NightArg {
    First,
    Other,
}

impl NightArg {
    fn to_domain(self) -> Night {
        match self {
            Self::First => Night::First,
            Self::Other => Night::Other,
        }
    }
}

pub(super) fn run(storage: &Storage, game: &Game, command: PhaseCommand) -> Result<(), String> {
    match command {
        PhaseCommand::Show => {
            let state = read_state(storage, game)?;
            println!("It is {} {}.", state.moment.phase.name(), state.moment.day);
            Ok(())
        }
        PhaseCommand::Dusk { storyteller } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let moment = with_state(storage, game, |state| {
                state.moment.go_to_dusk().map_err(|e| e.to_string())?;
                Ok(state.moment.clone())
            })?;
            eprintln!("It is now {} {}.", moment.phase.name(), moment.day);
            Ok(())
        }
        PhaseCommand::Dawn { storyteller } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let moment = with_state(storage, game, |state| {
                state.moment.go_to_dawn().map_err(|e| e.to_string())?;
                Ok(state.moment.clone())
            })?;
            eprintln!("It is now {} {}.", moment.phase.name(), moment.day);
            Ok(())
        }
        PhaseCommand::Nights {
            night,
            filter,
            storyteller,
        } => {
            let private = is_storyteller(game, storyteller.as_deref());
            // Only the storyteller gets the filtered, in-play view.
            let filter = filter && private;
            let state = read_state(storage, game)?;
            println!("{}", state.make_nightorder(night.to_domain(), filter, private));
            Ok(())
        }
    }
}
