//! Nomination and voting commands.
//!
//! Players are named by seat id throughout. Votes are free text until
//! the storyteller locks them to a result.

use clap::{Subcommand, ValueEnum};

use crate::game::Game;
use crate::state::VoteResult;
use crate::storage::Storage;

use super::{ensure_storyteller, is_storyteller, read_state, with_state};

#[derive(Debug, Subcommand)]
pub enum NomCommand {
    /// List a day's nominations. Defaults to the current day.
    List {
        #[arg(long)]
        day: Option<u32>,

        /// View as the player holding this seat; their own private
        /// votes stay visible.
        #[arg(long)]
        viewer: Option<String>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Show one nomination in full, including its voting log.
    Show {
        /// Seat ID of the nominee.
        nominee: String,

        #[arg(long)]
        day: Option<u32>,

        #[arg(long)]
        viewer: Option<String>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Raise a nomination on the current day.
    New {
        /// Seat ID of the nominator.
        nominator: String,

        /// Seat ID of the nominee.
        nominee: String,
    },

    /// Record a free-text vote. Omit the text to clear ("unvote").
    Vote {
        /// Seat ID of the voter.
        voter: String,

        /// Seat ID of the nominee.
        nominee: String,

        /// The vote as the table should see it.
        vote: Option<String>,

        /// Record as the private vote, visible only to the storyteller
        /// and the voter.
        #[arg(long)]
        private: bool,
    },

    /// Lock a ballot to its final result. Omit the result to unlock.
    Lock {
        /// Seat ID of the voter.
        voter: String,

        /// Seat ID of the nominee.
        nominee: String,

        #[arg(value_enum)]
        result: Option<ResultArg>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Mark a nomination for execution, or clear the mark.
    Mark {
        /// Seat ID of the nominee.
        nominee: String,

        #[arg(long)]
        clear: bool,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Record the accusation. Only the nominator may speak it.
    Accuse {
        /// Seat ID of the nominator.
        nominator: String,

        /// Seat ID of the nominee.
        nominee: String,

        accusation: String,
    },

    /// Record the nominee's defense.
    Defend {
        /// Seat ID of the nominee.
        nominee: String,

        defense: String,
    },
}

/// CLI-facing locked result, mapped to the domain `VoteResult`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResultArg {
    Yes,
    No,
    /// Negates a yes: counts against the tally.
    Thief,
    /// Triples the vote.
    Bureaucrat,
}

impl ResultArg {
    fn to_domain(self) -> VoteResult {
        match self {
            Self::Yes => VoteResult::Yes,
            Self::No => VoteResult::No,
            Self::Thief => VoteResult::Thief,
            Self::Bureaucrat => VoteResult::Bureaucrat,
        }
    }
}

pub(super) fn run(storage: &Storage, game: &Game, command: NomCommand) -> Result<(), String> {
    match command {
        NomCommand::List {
            day,
            viewer,
            storyteller,
        } => {
            let private = is_storyteller(game, storyteller.as_deref());
            let state = read_state(storage, game)?;
            println!(
                "{}",
                state.make_nomination_page(day, private, viewer.as_deref())
            );
            Ok(())
        }
        NomCommand::Show {
            nominee,
            day,
            viewer,
            storyteller,
        } => {
            let private = is_storyteller(game, storyteller.as_deref());
            let state = read_state(storage, game)?;
            let day = day.unwrap_or(state.moment.day);
            let nomination = state
                .nominations
                .get_specific_nomination(day, &nominee)
                .ok_or("there is no such nomination")?;
            println!(
                "{}",
                nomination.make_description(&state.seating, private, true, viewer.as_deref())
            );
            Ok(())
        }
        NomCommand::New { nominator, nominee } => with_state(storage, game, |state| {
            state.nominate(&nominator, &nominee).map_err(|e| e.to_string())
        }),
        NomCommand::Vote {
            voter,
            nominee,
            vote,
            private,
        } => with_state(storage, game, |state| {
            state
                .set_vote(&voter, &nominee, vote, private)
                .map_err(|e| e.to_string())
        }),
        NomCommand::Lock {
            voter,
            nominee,
            result,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let tally = with_state(storage, game, |state| {
                state
                    .lock_vote(&voter, &nominee, result.map(ResultArg::to_domain))
                    .map_err(|e| e.to_string())?;
                let nomination = state
                    .nominations
                    .get_specific_nomination(state.moment.day, &nominee)
                    .ok_or("there is no such nomination")?;
                Ok((nomination.tally(), nomination.required, nomination.passes()))
            })?;
            let (count, required, passes) = tally;
            let verdict = if passes { " — threshold met" } else { "" };
            eprintln!("{count} of {required} required{verdict}");
            Ok(())
        }
        NomCommand::Mark {
            nominee,
            clear,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            with_state(storage, game, |state| {
                state.mark(&nominee, !clear).map_err(|e| e.to_string())
            })
        }
        NomCommand::Accuse {
            nominator,
            nominee,
            accusation,
        } => with_state(storage, game, |state| {
            state
                .accuse(&nominator, &nominee, &accusation)
                .map_err(|e| e.to_string())
        }),
        NomCommand::Defend { nominee, defense } => with_state(storage, game, |state| {
            state.defend(&nominee, &defense).map_err(|e| e.to_string())
        }),
    }
}
