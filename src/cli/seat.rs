//! Seating commands: the roster's full edit surface.

use clap::{Subcommand, ValueEnum};

use crate::game::Game;
use crate::state::{Marker, SeatKind, Status};
use crate::storage::Storage;

use super::{ensure_storyteller, is_storyteller, read_state, with_state};

#[derive(Debug, Subcommand)]
pub enum SeatCommand {
    /// Show the roster. The storyteller sees roles and statuses in full.
    Show {
        /// Act as this storyteller to see the private view.
        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Seat a whole player list at once. One-shot.
    Init {
        /// Players as `member:alias` pairs, in table order.
        #[arg(required = true)]
        players: Vec<String>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Add one player to the end of the table. Prints the seat ID.
    Add {
        /// External account id of the player.
        member: u64,

        /// Display name.
        alias: String,

        #[arg(long, value_enum, default_value_t = KindArg::Player)]
        kind: KindArg,

        /// The true character, as its id in the script.
        #[arg(long)]
        role: Option<String>,

        /// The character this player believes they are, if different.
        #[arg(long)]
        apparent: Option<String>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Remove a player. The seat keeps its place but leaves play.
    Remove {
        /// Seat ID.
        seat: String,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Move a seat to a new position.
    Move {
        /// Seat ID to move.
        seat: String,

        #[arg(long, value_enum)]
        to: MarkerArg,

        /// The seat to move relative to. Required for before/after.
        #[arg(long)]
        anchor: Option<String>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Exchange two seats' positions.
    Swap {
        lhs: String,
        rhs: String,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Edit a seat's alias, roles, status, or kind. Omitted fields are
    /// left untouched.
    Edit {
        /// Seat ID.
        seat: String,

        #[arg(long)]
        alias: Option<String>,

        /// The true character.
        #[arg(long)]
        role: Option<String>,

        /// The apparent character.
        #[arg(long)]
        apparent: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },

    /// Replace the person occupying a seat, keeping everything else.
    Substitute {
        /// Seat ID.
        seat: String,

        /// The incoming player's account id.
        member: u64,

        /// The incoming player's display name.
        alias: String,

        #[arg(long = "as")]
        storyteller: Option<String>,
    },
}

/// CLI-facing seat kind, mapped to the domain `SeatKind`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Player,
    Traveller,
}

impl KindArg {
    fn to_domain(self) -> SeatKind {
        match self {
            Self::Player => SeatKind::Player,
            Self::Traveller => SeatKind::Traveller,
        }
    }
}

/// CLI-facing life status, mapped to the domain `Status`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Alive,
    Dead,
    /// Dead with the ghost vote used up.
    Spent,
}

impl StatusArg {
    fn to_domain(self) -> Status {
        match self {
            Self::Alive => Status::Alive,
            Self::Dead => Status::Dead,
            Self::Spent => Status::Spent,
        }
    }
}

/// CLI-facing move anchor, mapped to the domain `Marker`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MarkerArg {
    Beginning,
    Before,
    After,
    End,
}

impl MarkerArg {
    fn to_domain(self) -> Marker {
        match self {
            Self::Beginning => Marker::Beginning,
            Self::Before => Marker::Before,
            Self::After => Marker::After,
            Self::End => Marker::End,
        }
    }
}

pub(super) fn run(storage: &Storage, game: &Game, command: SeatCommand) -> Result<(), String> {
    match command {
        SeatCommand::Show { storyteller } => {
            let private = is_storyteller(game, storyteller.as_deref());
            let state = read_state(storage, game)?;
            println!("{}", state.seating.make_page(private));
            Ok(())
        }
        SeatCommand::Init {
            players,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let players = parse_players(&players)?;
            with_state(storage, game, |state| {
                state
                    .seating
                    .init_players(&players)
                    .map_err(|e| e.to_string())
            })?;
            eprintln!("Seated {} players", players.len());
            Ok(())
        }
        SeatCommand::Add {
            member,
            alias,
            kind,
            role,
            apparent,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let id = with_state(storage, game, |state| {
                state
                    .seating
                    .add_player(member, &alias, kind.to_domain(), role, apparent)
                    .map_err(|e| e.to_string())
            })?;
            println!("{id}");
            Ok(())
        }
        SeatCommand::Remove { seat, storyteller } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let removed = with_state(storage, game, |state| {
                state.seating.remove_player(&seat).map_err(|e| e.to_string())
            })?;
            eprintln!("Removed {}", removed.alias);
            Ok(())
        }
        SeatCommand::Move {
            seat,
            to,
            anchor,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            with_state(storage, game, |state| {
                state
                    .seating
                    .move_seats(&seat, anchor.as_deref(), to.to_domain())
                    .map_err(|e| e.to_string())
            })
        }
        SeatCommand::Swap {
            lhs,
            rhs,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            with_state(storage, game, |state| {
                state.seating.swap_seats(&lhs, &rhs).map_err(|e| e.to_string())
            })
        }
        SeatCommand::Edit {
            seat,
            alias,
            role,
            apparent,
            status,
            kind,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            with_state(storage, game, |state| {
                if let Some(alias) = &alias {
                    state.seating.set_alias(&seat, alias).map_err(|e| e.to_string())?;
                }
                state
                    .seating
                    .set_role(&seat, role.as_deref(), apparent.as_deref())
                    .map_err(|e| e.to_string())?;
                state
                    .seating
                    .set_status(&seat, status.map(StatusArg::to_domain))
                    .map_err(|e| e.to_string())?;
                state
                    .seating
                    .set_type(&seat, kind.map(KindArg::to_domain))
                    .map_err(|e| e.to_string())
            })
        }
        SeatCommand::Substitute {
            seat,
            member,
            alias,
            storyteller,
        } => {
            ensure_storyteller(game, storyteller.as_deref())?;
            let previous = with_state(storage, game, |state| {
                state
                    .seating
                    .substitute_player(&seat, member, &alias)
                    .map_err(|e| e.to_string())
            })?;
            // The previous occupant's id is surfaced so their external
            // access can be revoked.
            eprintln!("Replaced member {previous}");
            Ok(())
        }
    }
}

/// Parses `member:alias` pairs.
fn parse_players(raw: &[String]) -> Result<Vec<(u64, String)>, String> {
    raw.iter()
        .map(|entry| {
            let (member, alias) = entry
                .split_once(':')
                .ok_or_else(|| format!("expected member:alias, got '{entry}'"))?;
            let member = member
                .parse::<u64>()
                .map_err(|e| format!("invalid member id in '{entry}': {e}"))?;
            if alias.is_empty() {
                return Err(format!("empty alias in '{entry}'"));
            }
            Ok((member, alias.to_string()))
        })
        .collect()
}
