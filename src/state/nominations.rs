//! The nomination and voting ledger, keyed by day number.
//!
//! Each nomination owns a ballot: one vote record per seat that was active
//! when it was raised, ordered starting at the nominator and rotating
//! through the seating. Votes are free text until the storyteller locks
//! them; locked values are what the tally counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EngineError;
use super::seating::{Seat, SeatKind, Seating, Status};

/// What a nomination calls for, derived from the nominee's seat kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum NominationKind {
    Execution,
    Exile,
}

impl From<NominationKind> for i64 {
    fn from(kind: NominationKind) -> Self {
        match kind {
            NominationKind::Execution => 1,
            NominationKind::Exile => 2,
        }
    }
}

impl TryFrom<i64> for NominationKind {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NominationKind::Execution),
            2 => Ok(NominationKind::Exile),
            other => Err(format!("unknown nomination kind: {other}")),
        }
    }
}

impl NominationKind {
    pub fn name(self) -> &'static str {
        match self {
            NominationKind::Execution => "execution",
            NominationKind::Exile => "exile",
        }
    }
}

/// A locked ballot value. `Yes` and `No` are the base scheme; `Thief`
/// and `Bureaucrat` are the weighted modifiers, negating or tripling
/// the vote they land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum VoteResult {
    No,
    Yes,
    Thief,
    Bureaucrat,
}

impl From<VoteResult> for i64 {
    fn from(result: VoteResult) -> Self {
        match result {
            VoteResult::No => 0,
            VoteResult::Yes => 1,
            VoteResult::Thief => -1,
            VoteResult::Bureaucrat => 3,
        }
    }
}

impl TryFrom<i64> for VoteResult {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VoteResult::No),
            1 => Ok(VoteResult::Yes),
            -1 => Ok(VoteResult::Thief),
            3 => Ok(VoteResult::Bureaucrat),
            other => Err(format!("unknown vote result: {other}")),
        }
    }
}

impl VoteResult {
    /// Signed contribution to the running tally. The discriminants
    /// double as weights, as the original scheme intended.
    pub fn weight(self) -> i64 {
        i64::from(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            VoteResult::No => "no",
            VoteResult::Yes => "yes",
            VoteResult::Thief => "thief",
            VoteResult::Bureaucrat => "bureaucrat",
        }
    }
}

/// One seat's ballot on one nomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Seat id of the voter.
    pub id: String,
    /// Public free-text vote, visible to the table.
    #[serde(default)]
    pub vote: Option<String>,
    /// Free-text vote visible only to the storyteller and the voter.
    #[serde(default)]
    pub private_vote: Option<String>,
    /// The storyteller's authoritative record. Once set, the text
    /// fields above are frozen.
    #[serde(default)]
    pub locked: Option<VoteResult>,
}

impl Vote {
    fn unset(id: &str) -> Self {
        Self {
            id: id.to_string(),
            vote: None,
            private_vote: None,
            locked: None,
        }
    }

    /// Sets or clears one of the text fields. `None` clears ("unvote").
    fn set(
        &mut self,
        kind: NominationKind,
        status: Status,
        vote: Option<String>,
        private: bool,
    ) -> Result<(), EngineError> {
        if self.locked.is_some() {
            return Err(EngineError::VoteLocked);
        }
        if status == Status::Spent && kind == NominationKind::Execution {
            return Err(EngineError::GhostVoteSpent);
        }

        if private {
            self.private_vote = vote;
        } else {
            self.vote = vote;
        }
        Ok(())
    }

    /// Locks the ballot to a result, or unlocks it with `None`.
    /// A spent ghost may still be locked to `No` on an execution.
    fn lock(
        &mut self,
        kind: NominationKind,
        status: Status,
        result: Option<VoteResult>,
    ) -> Result<(), EngineError> {
        if status == Status::Spent
            && kind == NominationKind::Execution
            && result.is_some_and(|r| r != VoteResult::No)
        {
            return Err(EngineError::GhostVoteSpent);
        }

        self.locked = result;
        Ok(())
    }

    fn describe(
        &self,
        seat: Option<&Seat>,
        kind: NominationKind,
        private: bool,
        viewer: Option<&str>,
        count: i64,
        required: u32,
    ) -> String {
        let seat_line = seat.map_or_else(|| "(removed player)".to_string(), |s| s.describe(private));
        let header = match self.locked {
            Some(result) => format!("[{}] ({count:>2}/{required:>2})  {seat_line}", result.name()),
            None => seat_line,
        };

        let mut lines = vec![header];
        let spent_ghost =
            kind == NominationKind::Execution && seat.is_some_and(|s| s.status == Status::Spent);
        if spent_ghost {
            lines.push("  - (ghost vote already spent)".to_string());
        } else if private || viewer == Some(self.id.as_str()) {
            lines.push(format!(
                "  - display: {}",
                self.vote.as_deref().unwrap_or("n/a")
            ));
            lines.push(format!(
                "  - private: {}",
                self.private_vote.as_deref().unwrap_or("n/a")
            ));
        } else {
            lines.push(format!("  - vote: {}", self.vote.as_deref().unwrap_or("n/a")));
        }
        lines.join("\n")
    }
}

/// A formal accusation against one seat, opened at most once per seat
/// per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nomination {
    pub nominator: String,
    pub nominee: String,
    #[serde(default)]
    pub accusation: Option<String>,
    #[serde(default)]
    pub defense: Option<String>,
    pub kind: NominationKind,
    /// Vote threshold, computed once at creation.
    pub required: u32,
    /// One ballot per seat active at creation, starting at the
    /// nominator and rotating through the seating order.
    #[serde(default)]
    pub voters: Vec<Vote>,
    /// The storyteller's intent-to-execute flag.
    #[serde(default)]
    pub marked: bool,
}

impl Nomination {
    /// Running sum of locked vote weights, in ballot order.
    pub fn tally(&self) -> i64 {
        self.voters
            .iter()
            .filter_map(|vote| vote.locked)
            .map(VoteResult::weight)
            .sum()
    }

    /// Whether the locked tally has reached the threshold.
    pub fn passes(&self) -> bool {
        self.tally() >= i64::from(self.required)
    }

    fn set_vote(
        &mut self,
        seating: &Seating,
        voter: &str,
        vote: Option<String>,
        private: bool,
    ) -> Result<(), EngineError> {
        let kind = self.kind;
        let status = seating
            .seat(voter)
            .map_or(Status::Alive, |seat| seat.status);
        let entry = self
            .voters
            .iter_mut()
            .find(|v| v.id == voter)
            .ok_or(EngineError::NotSeated)?;
        entry.set(kind, status, vote, private)
    }

    fn lock_vote(
        &mut self,
        seating: &Seating,
        voter: &str,
        result: Option<VoteResult>,
    ) -> Result<(), EngineError> {
        let kind = self.kind;
        let status = seating
            .seat(voter)
            .map_or(Status::Alive, |seat| seat.status);
        let entry = self
            .voters
            .iter_mut()
            .find(|v| v.id == voter)
            .ok_or(EngineError::NotSeated)?;
        entry.lock(kind, status, result)
    }

    /// Renders the nomination header, and optionally the accusation,
    /// defense, and full voting log.
    pub fn make_description(
        &self,
        seating: &Seating,
        private: bool,
        show_votes: bool,
        viewer: Option<&str>,
    ) -> String {
        let alias = |id: &str| {
            seating
                .seat(id)
                .map_or_else(|| "(unknown)".to_string(), |seat| seat.alias.clone())
        };
        let describe = |id: &str| {
            seating
                .seat(id)
                .map_or_else(|| "(unknown)".to_string(), |seat| seat.describe(private))
        };

        let collected = self.tally();
        let plural = if collected == 1 { "" } else { "s" };
        let marked = if self.marked { "[marked] " } else { "" };
        let mut lines = vec![
            format!(
                "Call for {}: {} -> {}",
                self.kind.name(),
                alias(&self.nominator),
                alias(&self.nominee)
            ),
            format!("- plaintiff: {}", describe(&self.nominator)),
            format!("- defendant: {}", describe(&self.nominee)),
            format!(
                "- {marked}{collected} vote{plural} (of {} required)",
                self.required
            ),
        ];

        if show_votes {
            let quote = |text: &Option<String>| {
                text.as_deref()
                    .map_or_else(|| "n/a".to_string(), |t| format!("\"{t}\""))
            };
            lines.push(format!("Accusation: {}", quote(&self.accusation)));
            lines.push(format!("Defense: {}", quote(&self.defense)));
            lines.push(self.make_voting_log(seating, private, viewer));
        }

        lines.join("\n")
    }

    /// Lists the ballots in rotation order with the running tally.
    pub fn make_voting_log(
        &self,
        seating: &Seating,
        private: bool,
        viewer: Option<&str>,
    ) -> String {
        let mut count = 0;
        let mut lines = vec!["Votes:".to_string()];
        for (i, vote) in self.voters.iter().enumerate() {
            if let Some(result) = vote.locked {
                count += result.weight();
            }
            let seat = seating.seat(&vote.id);
            lines.push(format!(
                "{}. {}",
                i + 1,
                vote.describe(seat, self.kind, private, viewer, count, self.required)
            ));
        }
        lines.join("\n")
    }
}

/// All nominations ever raised in a game, grouped by day.
///
/// Days are created lazily on first write; a day with no nominations
/// reads as an empty list. Old days are never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nominations {
    #[serde(default)]
    pub days: BTreeMap<u32, Vec<Nomination>>,
}

impl Nominations {
    /// All nominations raised on the given day, in creation order.
    pub fn on_day(&self, day: u32) -> &[Nomination] {
        self.days.get(&day).map_or(&[], Vec::as_slice)
    }

    /// The nomination against `nominee` on `day`, if one was raised.
    pub fn get_specific_nomination(&self, day: u32, nominee: &str) -> Option<&Nomination> {
        self.on_day(day).iter().find(|nom| nom.nominee == nominee)
    }

    fn nomination_mut(&mut self, day: u32, nominee: &str) -> Result<&mut Nomination, EngineError> {
        self.days
            .get_mut(&day)
            .and_then(|noms| noms.iter_mut().find(|nom| nom.nominee == nominee))
            .ok_or(EngineError::NoSuchNomination)
    }

    /// Raises a nomination, building its ballot from the seats active
    /// right now, rotated to start at the nominator.
    pub fn create(
        &mut self,
        day: u32,
        seating: &Seating,
        nominator: &str,
        nominee: &str,
    ) -> Result<(), EngineError> {
        let nominee_seat = seating.seat(nominee).ok_or(EngineError::NotSeated)?;
        let kind = match nominee_seat.kind {
            SeatKind::Player => NominationKind::Execution,
            SeatKind::Traveller => NominationKind::Exile,
        };

        if self.get_specific_nomination(day, nominee).is_some() {
            return Err(EngineError::NomineeAlreadyNominated);
        }

        // One execution call per nominator per day; exiles don't count
        // against it.
        if kind == NominationKind::Execution
            && self.on_day(day).iter().any(|nom| {
                nom.nominator == nominator && nom.kind == NominationKind::Execution
            })
        {
            return Err(EngineError::AlreadyNominatedToday);
        }

        let nominator_index = seating.index(nominator).ok_or(EngineError::NotSeated)?;
        if seating.seats[nominator_index].status != Status::Alive {
            return Err(EngineError::DeadNominator);
        }

        let required = seating.required_votes_for(nominee_seat.kind);
        let voters = rotate_starting_at(&seating.seats, nominator_index)
            .filter(|seat| !seat.removed)
            .map(|seat| Vote::unset(&seat.id))
            .collect();

        self.days.entry(day).or_default().push(Nomination {
            nominator: nominator.to_string(),
            nominee: nominee.to_string(),
            accusation: None,
            defense: None,
            kind,
            required,
            voters,
            marked: false,
        });
        Ok(())
    }

    /// Records or clears a voter's text vote on the day's nomination
    /// against `nominee`.
    pub fn set_vote(
        &mut self,
        day: u32,
        seating: &Seating,
        voter: &str,
        nominee: &str,
        vote: Option<String>,
        private: bool,
    ) -> Result<(), EngineError> {
        self.nomination_mut(day, nominee)?
            .set_vote(seating, voter, vote, private)
    }

    /// Locks or unlocks a voter's ballot. Privilege is the caller's
    /// concern; the engine only enforces the ghost-vote rule.
    pub fn lock_vote(
        &mut self,
        day: u32,
        seating: &Seating,
        voter: &str,
        nominee: &str,
        result: Option<VoteResult>,
    ) -> Result<(), EngineError> {
        self.nomination_mut(day, nominee)?
            .lock_vote(seating, voter, result)
    }

    /// Sets or clears the storyteller's intent-to-execute mark.
    pub fn mark(&mut self, day: u32, nominee: &str, mark: bool) -> Result<(), EngineError> {
        self.nomination_mut(day, nominee)?.marked = mark;
        Ok(())
    }

    /// Records the accusation; only the original nominator may speak it.
    pub fn accuse(
        &mut self,
        day: u32,
        nominator: &str,
        nominee: &str,
        accusation: &str,
    ) -> Result<(), EngineError> {
        let nomination = self.nomination_mut(day, nominee)?;
        if nomination.nominator != nominator {
            return Err(EngineError::NotYourNomination);
        }
        nomination.accusation = Some(accusation.to_string());
        Ok(())
    }

    /// Records the nominee's defense.
    pub fn defend(&mut self, day: u32, nominee: &str, defense: &str) -> Result<(), EngineError> {
        self.nomination_mut(day, nominee)?.defense = Some(defense.to_string());
        Ok(())
    }

    /// Lists a day's nominations, one numbered header each.
    pub fn make_page(
        &self,
        day: u32,
        seating: &Seating,
        private: bool,
        viewer: Option<&str>,
    ) -> String {
        let nominations = self.on_day(day);
        if nominations.is_empty() {
            return format!("There are no nominations on day {day}.");
        }

        let sections: Vec<String> = nominations
            .iter()
            .enumerate()
            .map(|(i, nom)| {
                format!(
                    "{}. {}",
                    i + 1,
                    nom.make_description(seating, private, false, viewer)
                )
            })
            .collect();
        sections.join("\n\n")
    }
}

/// A fresh view of `items` starting at `start` and wrapping around.
/// The source order is untouched.
pub fn rotate_starting_at<T>(items: &[T], start: usize) -> impl Iterator<Item = &T> {
    items[start..].iter().chain(items[..start].iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four alive players A, B, C, D in table order.
    fn sample_table() -> (Seating, Vec<String>) {
        let mut seating = Seating::default();
        let mut ids = Vec::new();
        for (i, alias) in ["A", "B", "C", "D"].iter().enumerate() {
            let id = seating
                .add_player(100 + i as u64, alias, SeatKind::Player, None, None)
                .unwrap();
            ids.push(id);
        }
        (seating, ids)
    }

    #[test]
    fn rotation_wraps_without_mutating() {
        let items = vec!["a", "b", "c", "d"];
        let rotated: Vec<_> = rotate_starting_at(&items, 2).copied().collect();
        assert_eq!(rotated, vec!["c", "d", "a", "b"]);
        assert_eq!(items, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn ballot_starts_at_nominator_in_seating_order() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();

        // A nominates C: ballot order is A, B, C, D.
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        let nomination = nominations.get_specific_nomination(1, &ids[2]).unwrap();
        let order: Vec<_> = nomination.voters.iter().map(|v| v.id.clone()).collect();
        assert_eq!(order, ids);
        assert_eq!(nomination.required, 2);
        assert_eq!(nomination.kind, NominationKind::Execution);
    }

    #[test]
    fn ballot_rotates_and_skips_removed_seats() {
        let (mut seating, ids) = sample_table();
        seating.remove_player(&ids[3]).unwrap();
        let mut nominations = Nominations::default();

        // C nominates A: rotation is C, D, A, B; D is removed.
        nominations.create(1, &seating, &ids[2], &ids[0]).unwrap();
        let nomination = nominations.get_specific_nomination(1, &ids[0]).unwrap();
        let order: Vec<_> = nomination.voters.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(order, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
    }

    #[test]
    fn nominee_can_only_be_nominated_once_a_day() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();

        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        let err = nominations.create(1, &seating, &ids[1], &ids[2]).unwrap_err();
        assert!(matches!(err, EngineError::NomineeAlreadyNominated));
        assert_eq!(nominations.on_day(1).len(), 1);

        // A new day opens the slot again.
        nominations.create(2, &seating, &ids[1], &ids[2]).unwrap();
    }

    #[test]
    fn nominator_gets_one_execution_call_per_day() {
        let (mut seating, ids) = sample_table();
        let trav = seating
            .add_player(999, "Trav", SeatKind::Traveller, None, None)
            .unwrap();
        let mut nominations = Nominations::default();

        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        let err = nominations.create(1, &seating, &ids[0], &ids[3]).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyNominatedToday));

        // An exile call is still allowed the same day.
        nominations.create(1, &seating, &ids[0], &trav).unwrap();
        let exile = nominations.get_specific_nomination(1, &trav).unwrap();
        assert_eq!(exile.kind, NominationKind::Exile);
        assert_eq!(exile.required, 3); // ceil(5 / 2)
    }

    #[test]
    fn dead_and_unseated_nominators_are_rejected() {
        let (mut seating, ids) = sample_table();
        seating.set_status(&ids[0], Some(Status::Dead)).unwrap();
        let mut nominations = Nominations::default();

        let err = nominations.create(1, &seating, &ids[0], &ids[2]).unwrap_err();
        assert!(matches!(err, EngineError::DeadNominator));

        let err = nominations.create(1, &seating, "ghost", &ids[2]).unwrap_err();
        assert!(matches!(err, EngineError::NotSeated));

        let err = nominations.create(1, &seating, &ids[1], "ghost").unwrap_err();
        assert!(matches!(err, EngineError::NotSeated));
        assert!(nominations.on_day(1).is_empty());
    }

    #[test]
    fn tally_meets_threshold_in_ballot_order() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();

        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        nominations
            .lock_vote(1, &seating, &ids[0], &ids[2], Some(VoteResult::Yes))
            .unwrap();
        nominations
            .lock_vote(1, &seating, &ids[1], &ids[2], Some(VoteResult::Yes))
            .unwrap();

        let nomination = nominations.get_specific_nomination(1, &ids[2]).unwrap();
        assert_eq!(nomination.tally(), 2);
        assert!(nomination.passes());
    }

    #[test]
    fn weighted_results_add_and_subtract() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();

        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        nominations
            .lock_vote(1, &seating, &ids[0], &ids[2], Some(VoteResult::Bureaucrat))
            .unwrap();
        nominations
            .lock_vote(1, &seating, &ids[1], &ids[2], Some(VoteResult::Thief))
            .unwrap();
        nominations
            .lock_vote(1, &seating, &ids[3], &ids[2], Some(VoteResult::No))
            .unwrap();

        let nomination = nominations.get_specific_nomination(1, &ids[2]).unwrap();
        assert_eq!(nomination.tally(), 2);
    }

    #[test]
    fn set_vote_writes_one_field_and_clears_with_none() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();

        nominations
            .set_vote(1, &seating, &ids[1], &ids[2], Some("aye".into()), false)
            .unwrap();
        nominations
            .set_vote(1, &seating, &ids[1], &ids[2], Some("leaning no".into()), true)
            .unwrap();

        let vote = &nominations.get_specific_nomination(1, &ids[2]).unwrap().voters[1];
        assert_eq!(vote.vote.as_deref(), Some("aye"));
        assert_eq!(vote.private_vote.as_deref(), Some("leaning no"));

        nominations
            .set_vote(1, &seating, &ids[1], &ids[2], None, false)
            .unwrap();
        let vote = &nominations.get_specific_nomination(1, &ids[2]).unwrap().voters[1];
        assert_eq!(vote.vote, None);
        assert_eq!(vote.private_vote.as_deref(), Some("leaning no"));
    }

    #[test]
    fn locked_votes_are_immutable_until_unlocked() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();

        nominations
            .lock_vote(1, &seating, &ids[1], &ids[2], Some(VoteResult::Yes))
            .unwrap();
        let err = nominations
            .set_vote(1, &seating, &ids[1], &ids[2], Some("changed my mind".into()), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::VoteLocked));

        // Unlock, then the text becomes editable again.
        nominations
            .lock_vote(1, &seating, &ids[1], &ids[2], None)
            .unwrap();
        nominations
            .set_vote(1, &seating, &ids[1], &ids[2], Some("changed my mind".into()), false)
            .unwrap();
    }

    #[test]
    fn spent_ghost_cannot_vote_on_executions() {
        let (mut seating, ids) = sample_table();
        seating.set_status(&ids[2], Some(Status::Spent)).unwrap();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[3]).unwrap();

        let err = nominations
            .set_vote(1, &seating, &ids[2], &ids[3], Some("aye".into()), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::GhostVoteSpent));
        let vote = nominations
            .get_specific_nomination(1, &ids[3])
            .unwrap()
            .voters
            .iter()
            .find(|v| v.id == ids[2])
            .unwrap();
        assert_eq!(vote.vote, None);
        assert_eq!(vote.private_vote, None);

        let err = nominations
            .lock_vote(1, &seating, &ids[2], &ids[3], Some(VoteResult::Yes))
            .unwrap_err();
        assert!(matches!(err, EngineError::GhostVoteSpent));

        // A spent ghost can still be locked to No on an execution.
        nominations
            .lock_vote(1, &seating, &ids[2], &ids[3], Some(VoteResult::No))
            .unwrap();
    }

    #[test]
    fn spent_ghost_may_vote_on_exiles() {
        let (mut seating, ids) = sample_table();
        let trav = seating
            .add_player(999, "Trav", SeatKind::Traveller, None, None)
            .unwrap();
        seating.set_status(&ids[2], Some(Status::Spent)).unwrap();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &trav).unwrap();

        nominations
            .set_vote(1, &seating, &ids[2], &trav, Some("exile them".into()), false)
            .unwrap();
        nominations
            .lock_vote(1, &seating, &ids[2], &trav, Some(VoteResult::Yes))
            .unwrap();
    }

    #[test]
    fn voting_requires_a_ballot_entry() {
        let (mut seating, ids) = sample_table();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();

        // Seated after the nomination opened: no ballot entry.
        let late = seating
            .add_player(777, "Late", SeatKind::Player, None, None)
            .unwrap();
        let err = nominations
            .set_vote(1, &seating, &late, &ids[2], Some("aye".into()), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotSeated));
    }

    #[test]
    fn mutators_need_an_existing_nomination() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();

        let err = nominations
            .set_vote(1, &seating, &ids[0], &ids[2], None, false)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoSuchNomination));
        let err = nominations.mark(1, &ids[2], true).unwrap_err();
        assert!(matches!(err, EngineError::NoSuchNomination));
    }

    #[test]
    fn accusation_belongs_to_the_nominator() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();

        let err = nominations
            .accuse(1, &ids[1], &ids[2], "they did it")
            .unwrap_err();
        assert!(matches!(err, EngineError::NotYourNomination));

        nominations.accuse(1, &ids[0], &ids[2], "they did it").unwrap();
        nominations.defend(1, &ids[2], "i did not").unwrap();
        nominations.mark(1, &ids[2], true).unwrap();

        let nomination = nominations.get_specific_nomination(1, &ids[2]).unwrap();
        assert_eq!(nomination.accusation.as_deref(), Some("they did it"));
        assert_eq!(nomination.defense.as_deref(), Some("i did not"));
        assert!(nomination.marked);
    }

    #[test]
    fn old_days_stay_queryable() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        nominations.create(2, &seating, &ids[0], &ids[1]).unwrap();

        assert_eq!(nominations.on_day(1).len(), 1);
        assert_eq!(nominations.on_day(2).len(), 1);
        assert!(nominations.on_day(3).is_empty());
    }

    #[test]
    fn page_and_log_render_redacted_views() {
        let (seating, ids) = sample_table();
        let mut nominations = Nominations::default();
        nominations.create(1, &seating, &ids[0], &ids[2]).unwrap();
        nominations
            .set_vote(1, &seating, &ids[1], &ids[2], Some("secret".into()), true)
            .unwrap();
        nominations
            .lock_vote(1, &seating, &ids[0], &ids[2], Some(VoteResult::Yes))
            .unwrap();

        let nomination = nominations.get_specific_nomination(1, &ids[2]).unwrap();

        let public = nomination.make_description(&seating, false, true, None);
        assert!(public.contains("Call for execution: A -> C"));
        assert!(public.contains("1 vote (of 2 required)"));
        assert!(!public.contains("secret"));

        // The voter sees their own private vote; the storyteller sees all.
        let own = nomination.make_description(&seating, false, true, Some(&ids[1]));
        assert!(own.contains("secret"));
        let storyteller = nomination.make_description(&seating, true, true, None);
        assert!(storyteller.contains("secret"));

        let empty_day = nominations.make_page(2, &seating, false, None);
        assert_eq!(empty_day, "There are no nominations on day 2.");
    }

    #[test]
    fn vote_results_keep_their_wire_values() {
        assert_eq!(serde_json::to_string(&VoteResult::Thief).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&VoteResult::Bureaucrat).unwrap(), "3");
        assert_eq!(serde_json::to_string(&NominationKind::Exile).unwrap(), "2");
    }
}
