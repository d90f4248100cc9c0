//! The rules-state of one game: seating, day/phase, and nominations.
//!
//! The aggregate is loaded from a serialized document at the start of an
//! operation, mutated in place, and dumped back at the end. It performs
//! no I/O of its own; the document is its only persistence surface, and
//! whoever stores it owns the transaction boundary.

mod moment;
mod nominations;
mod seating;

use serde::{Deserialize, Serialize};

pub use moment::{Moment, Phase};
pub use nominations::{Nomination, NominationKind, Nominations, Vote, VoteResult};
pub use seating::{Marker, Roles, Seat, SeatKind, Seating, Status};

/// A business-rule violation, reported to the caller instead of being
/// logged or retried. The display strings are what an end user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("that player has already been nominated today")]
    NomineeAlreadyNominated,

    #[error("you have already nominated today")]
    AlreadyNominatedToday,

    #[error("you are not seated in this game")]
    NotSeated,

    #[error("you cannot nominate because you are dead")]
    DeadNominator,

    #[error("your vote is locked")]
    VoteLocked,

    #[error("your ghost vote is already spent")]
    GhostVoteSpent,

    #[error("there is no such nomination")]
    NoSuchNomination,

    #[error("you did not make this nomination")]
    NotYourNomination,

    #[error("no seat with that id")]
    SeatNotFound,

    #[error("that player is already seated")]
    AlreadySeated,

    #[error("seating has already been initialized")]
    AlreadyInitialized,

    #[error("it is already nighttime")]
    AlreadyNight,

    #[error("it is already daytime")]
    AlreadyDay,
}

/// A state document that could not be read or written.
#[derive(Debug, thiserror::Error)]
#[error("invalid state document: {0}")]
pub struct DocumentError(#[from] serde_json::Error);

/// Modifications to standard play that deserve their own feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Mod {
    CultLeader,
    OrganGrinder,
    StorytellerExecution,
}

impl From<Mod> for i64 {
    fn from(m: Mod) -> Self {
        match m {
            Mod::CultLeader => 1,
            Mod::OrganGrinder => 2,
            Mod::StorytellerExecution => 3,
        }
    }
}

impl TryFrom<i64> for Mod {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Mod::CultLeader),
            2 => Ok(Mod::OrganGrinder),
            3 => Ok(Mod::StorytellerExecution),
            other => Err(format!("unknown mod: {other}")),
        }
    }
}

/// The night-order lists attached to a loaded script: role ids in the
/// order they act on the first night and on every other night.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nights {
    #[serde(default)]
    pub first: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

/// Which night order to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Night {
    First,
    Other,
}

/// Night-order entries that render even when no seat holds the role.
const SPECIAL_ORDER_MARKS: [&str; 4] = ["DUSK", "DEMON", "MINION", "DAWN"];

/// The aggregate root: one game's complete rules-state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub mods: Vec<Mod>,
    #[serde(default)]
    pub moment: Moment,
    #[serde(default)]
    pub seating: Seating,
    #[serde(default)]
    pub nominations: Nominations,
    /// Loaded script metadata, passed through unmodified.
    #[serde(default)]
    pub script: Option<serde_json::Value>,
    #[serde(default)]
    pub nights: Option<Nights>,
}

impl State {
    /// Reconstructs a state from its document. Absent optional fields
    /// fall back to their documented defaults: empty seating, day 1 at
    /// night, empty nomination ledger.
    pub fn load(document: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Serializes the state back to a document. Structural inverse of
    /// [`State::load`].
    pub fn dump(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    // ── Nomination operations on the current day ──

    /// Raises a nomination on the current day.
    pub fn nominate(&mut self, nominator: &str, nominee: &str) -> Result<(), EngineError> {
        self.nominations
            .create(self.moment.day, &self.seating, nominator, nominee)
    }

    /// Records or clears a text vote on the current day's nomination
    /// against `nominee`.
    pub fn set_vote(
        &mut self,
        voter: &str,
        nominee: &str,
        vote: Option<String>,
        private: bool,
    ) -> Result<(), EngineError> {
        self.nominations
            .set_vote(self.moment.day, &self.seating, voter, nominee, vote, private)
    }

    /// Locks or unlocks a ballot on the current day's nomination.
    pub fn lock_vote(
        &mut self,
        voter: &str,
        nominee: &str,
        result: Option<VoteResult>,
    ) -> Result<(), EngineError> {
        self.nominations
            .lock_vote(self.moment.day, &self.seating, voter, nominee, result)
    }

    /// Sets or clears the intent-to-execute mark on today's nomination.
    pub fn mark(&mut self, nominee: &str, mark: bool) -> Result<(), EngineError> {
        self.nominations.mark(self.moment.day, nominee, mark)
    }

    /// Records the accusation on today's nomination.
    pub fn accuse(
        &mut self,
        nominator: &str,
        nominee: &str,
        accusation: &str,
    ) -> Result<(), EngineError> {
        self.nominations
            .accuse(self.moment.day, nominator, nominee, accusation)
    }

    /// Records the defense on today's nomination.
    pub fn defend(&mut self, nominee: &str, defense: &str) -> Result<(), EngineError> {
        self.nominations.defend(self.moment.day, nominee, defense)
    }

    /// Lists nominations for the given day, defaulting to today.
    pub fn make_nomination_page(
        &self,
        day: Option<u32>,
        private: bool,
        viewer: Option<&str>,
    ) -> String {
        let day = day.unwrap_or(self.moment.day);
        self.nominations
            .make_page(day, &self.seating, private, viewer)
    }

    /// Renders the night order for the given night, if a script and
    /// its night lists are loaded.
    ///
    /// Role ids are matched against seats' true and apparent roles.
    /// With `filter`, ids nobody holds are dropped (the special dusk,
    /// dawn, and minion/demon info marks always render). With
    /// `private`, each matched line names the seat it belongs to.
    pub fn make_nightorder(&self, night: Night, filter: bool, private: bool) -> String {
        if self.script.is_none() {
            return "There is no script loaded on this game.".to_string();
        }
        let Some(nights) = &self.nights else {
            return "There is a script, but no loaded night order.".to_string();
        };

        let order = match night {
            Night::First => &nights.first,
            Night::Other => &nights.other,
        };

        let mut entries: Vec<(&str, Option<&Seat>)> = Vec::new();
        for id in order.iter().map(String::as_str) {
            let holders: Vec<&Seat> = self
                .seating
                .active_seats()
                .filter(|seat| {
                    seat.roles.true_role.as_deref() == Some(id)
                        || seat.roles.apparent.as_deref() == Some(id)
                })
                .collect();

            if holders.is_empty() {
                if SPECIAL_ORDER_MARKS.contains(&id) || !filter {
                    entries.push((id, None));
                }
            } else {
                for seat in holders {
                    entries.push((id, Some(seat)));
                }
            }
        }

        let lines: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, (id, seat))| {
                let target = match seat {
                    Some(seat) if private => {
                        format!(" for [{}] {} ({})", seat.status.name(), seat.alias, seat.member)
                    }
                    _ => String::new(),
                };
                format!("{}. `{id}`{target}", i + 1)
            })
            .collect();
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A state exercised through every documented mutation path.
    fn sample_state() -> State {
        let mut state = State::default();
        state.mods.push(Mod::CultLeader);
        state
            .seating
            .init_players(&[(1, "Ana".into()), (2, "Bert".into()), (3, "Cleo".into())])
            .unwrap();
        let trav = state
            .seating
            .add_player(4, "Drew", SeatKind::Traveller, Some("gunslinger".into()), None)
            .unwrap();
        let ids: Vec<String> = state.seating.seats.iter().map(|s| s.id.clone()).collect();

        state.seating.set_role(&ids[0], Some("imp"), None).unwrap();
        state
            .seating
            .set_role(&ids[1], Some("drunk"), Some("chef"))
            .unwrap();
        state.seating.set_status(&ids[2], Some(Status::Dead)).unwrap();

        state.moment.go_to_dawn().unwrap();
        state.nominate(&ids[0], &ids[1]).unwrap();
        state
            .set_vote(&ids[2], &ids[1], Some("aye".into()), false)
            .unwrap();
        state
            .set_vote(&ids[2], &ids[1], Some("not sure".into()), true)
            .unwrap();
        state
            .lock_vote(&ids[2], &ids[1], Some(VoteResult::Yes))
            .unwrap();
        state.accuse(&ids[0], &ids[1], "saw them at night").unwrap();
        state.defend(&ids[1], "i was asleep").unwrap();
        state.mark(&ids[1], true).unwrap();
        state.nominate(&ids[1], &trav).unwrap();

        state.seating.remove_player(&ids[2]).unwrap();
        state.script = Some(serde_json::json!({ "name": "Trouble Brewing" }));
        state.nights = Some(Nights {
            first: vec!["DUSK".into(), "imp".into(), "chef".into(), "DAWN".into()],
            other: vec!["DUSK".into(), "imp".into(), "DAWN".into()],
        });
        state
    }

    #[test]
    fn load_of_dump_is_identity() {
        let state = sample_state();
        let document = state.dump().unwrap();
        let reloaded = State::load(&document).unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn empty_document_yields_documented_defaults() {
        let state = State::load("{}").unwrap();
        assert_eq!(state.moment.day, 1);
        assert_eq!(state.moment.phase, Phase::Night);
        assert!(state.seating.seats.is_empty());
        assert!(!state.seating.already_init);
        assert!(state.nominations.days.is_empty());
        assert!(state.mods.is_empty());
        assert!(state.script.is_none());
        assert!(state.nights.is_none());
    }

    #[test]
    fn document_stores_enums_as_integers() {
        let state = sample_state();
        let document = state.dump().unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();

        assert_eq!(value["moment"]["phase"], 0); // Day
        assert_eq!(value["mods"][0], 1); // CultLeader
        assert_eq!(value["seating"]["seats"][0]["status"], 1); // Alive
        assert_eq!(value["nominations"]["days"]["1"][0]["kind"], 1); // Execution
    }

    #[test]
    fn roles_keep_their_wire_keys() {
        let state = sample_state();
        let document = state.dump().unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert_eq!(value["seating"]["seats"][1]["roles"]["true"], "drunk");
        assert_eq!(value["seating"]["seats"][1]["roles"]["apparent"], "chef");
    }

    #[test]
    fn day_scoped_operations_follow_the_moment() {
        let mut state = State::default();
        state
            .seating
            .init_players(&[(1, "Ana".into()), (2, "Bert".into())])
            .unwrap();
        let ids: Vec<String> = state.seating.seats.iter().map(|s| s.id.clone()).collect();

        state.moment.go_to_dawn().unwrap();
        state.nominate(&ids[0], &ids[1]).unwrap();
        state.moment.go_to_dusk().unwrap();
        state.moment.go_to_dawn().unwrap();

        // Day 2: the day-1 nomination no longer blocks, or answers for,
        // today's ledger.
        assert!(matches!(
            state.set_vote(&ids[0], &ids[1], Some("aye".into()), false),
            Err(EngineError::NoSuchNomination)
        ));
        state.nominate(&ids[0], &ids[1]).unwrap();
        assert_eq!(state.nominations.on_day(1).len(), 1);
        assert_eq!(state.nominations.on_day(2).len(), 1);
    }

    #[test]
    fn nightorder_requires_script_and_nights() {
        let mut state = State::default();
        assert_eq!(
            state.make_nightorder(Night::First, false, false),
            "There is no script loaded on this game."
        );

        state.script = Some(serde_json::json!({}));
        assert_eq!(
            state.make_nightorder(Night::First, false, false),
            "There is a script, but no loaded night order."
        );
    }

    #[test]
    fn nightorder_matches_roles_and_filters() {
        let state = sample_state();

        // Unfiltered: every id renders; Bert's apparent role matches "chef".
        let page = state.make_nightorder(Night::First, false, false);
        assert_eq!(page.lines().count(), 4);
        assert!(page.contains("`chef`"));

        // Filtered: unheld ids drop, special marks stay.
        let mut filtered_state = state.clone();
        filtered_state.nights.as_mut().unwrap().first.push("butler".into());
        let page = filtered_state.make_nightorder(Night::First, true, false);
        assert!(!page.contains("butler"));
        assert!(page.contains("`DUSK`"));
        assert!(page.contains("`DAWN`"));

        // Private: matched lines name their seat.
        let page = state.make_nightorder(Night::First, false, true);
        assert!(page.contains("for [alive] Ana (1)"));
    }
}
