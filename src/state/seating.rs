//! The seating roster: an ordered ring of seats around the table.
//!
//! Seat order is meaningful — it defines the rotation order used when a
//! nomination collects votes. Removal is soft: a removed seat keeps its
//! position and id but drops out of active rotations.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::EngineError;

/// A player's life state, as it would appear on their life token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Status {
    #[default]
    Alive,
    Dead,
    /// Dead, and the one ghost vote has been used.
    Spent,
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        match status {
            Status::Alive => 1,
            Status::Dead => 2,
            Status::Spent => 3,
        }
    }
}

impl TryFrom<i64> for Status {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Status::Alive),
            2 => Ok(Status::Dead),
            3 => Ok(Status::Spent),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

impl Status {
    /// Lowercase name for display.
    pub fn name(self) -> &'static str {
        match self {
            Status::Alive => "alive",
            Status::Dead => "dead",
            Status::Spent => "spent",
        }
    }
}

/// Whether a seat holds a resident player or a traveller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum SeatKind {
    #[default]
    Player,
    Traveller,
}

impl From<SeatKind> for i64 {
    fn from(kind: SeatKind) -> Self {
        match kind {
            SeatKind::Player => 1,
            SeatKind::Traveller => 2,
        }
    }
}

impl TryFrom<i64> for SeatKind {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SeatKind::Player),
            2 => Ok(SeatKind::Traveller),
            other => Err(format!("unknown seat kind: {other}")),
        }
    }
}

/// Anchors for relative seat moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Beginning,
    Before,
    After,
    End,
}

/// The pair of roles on a seat: the character they actually are, and the
/// character they are told they are (the Drunk, the Lunatic, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    #[serde(rename = "true", default)]
    pub true_role: Option<String>,
    #[serde(default)]
    pub apparent: Option<String>,
}

impl Roles {
    /// The role shown to the table: the apparent role when one is set,
    /// otherwise the true role.
    pub fn shown(&self) -> Option<&str> {
        self.apparent.as_deref().or(self.true_role.as_deref())
    }
}

/// One occupant of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Stable opaque id, generated once and never reused.
    pub id: String,
    /// External account id of the occupying participant.
    pub member: u64,
    /// Display name snapshot, editable independently of `member`.
    pub alias: String,
    #[serde(default)]
    pub kind: SeatKind,
    #[serde(default)]
    pub roles: Roles,
    #[serde(default)]
    pub status: Status,
    /// Soft-delete flag. Removed seats keep their position and id but
    /// are excluded from active rotations.
    #[serde(default)]
    pub removed: bool,
}

impl Seat {
    /// One-line description of the seat for roster and voting pages.
    ///
    /// Role visibility: travellers' roles are always public; players'
    /// roles only appear on private pages.
    pub fn describe(&self, private: bool) -> String {
        let mut text = format!("[{}] {} ({})", self.status.name(), self.alias, self.member);
        if private {
            match (&self.roles.true_role, &self.roles.apparent) {
                (Some(role), Some(apparent)) if role != apparent => {
                    text.push_str(&format!(" the `{role}` (apparent `{apparent}`)"));
                }
                (Some(role), _) => text.push_str(&format!(" the `{role}`")),
                (None, Some(apparent)) => text.push_str(&format!(" the apparent `{apparent}`")),
                (None, None) => text.push_str(": no role"),
            }
        } else if self.kind == SeatKind::Traveller {
            match self.roles.shown() {
                Some(role) => text.push_str(&format!(" the `{role}`")),
                None => text.push_str(": no role"),
            }
        }
        text
    }
}

/// The ordered roster of all seats in a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    #[serde(default)]
    pub seats: Vec<Seat>,
    /// One-shot guard: set once the roster has been drawn from the
    /// game's player list.
    #[serde(default)]
    pub already_init: bool,
}

impl Seating {
    /// Index of the seat with the given id, counting removed seats.
    pub fn index(&self, id: &str) -> Option<usize> {
        self.seats.iter().position(|seat| seat.id == id)
    }

    /// Index of the seat with the given id among active seats only.
    pub fn index_active(&self, id: &str) -> Option<usize> {
        self.active_seats().position(|seat| seat.id == id)
    }

    /// The seat with the given id, if any.
    pub fn seat(&self, id: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.id == id)
    }

    /// Reverse lookup: the seat id occupied by the given member.
    pub fn member_to_id(&self, member: u64) -> Option<&str> {
        self.seats
            .iter()
            .find(|seat| seat.member == member)
            .map(|seat| seat.id.as_str())
    }

    /// Seats still in active rotation, in order.
    pub fn active_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|seat| !seat.removed)
    }

    /// Moves seat `lhs` to a position relative to `rhs` (or to an end of
    /// the table). `rhs` is required for `Before` and `After`.
    pub fn move_seats(
        &mut self,
        lhs: &str,
        rhs: Option<&str>,
        mode: Marker,
    ) -> Result<(), EngineError> {
        let l = self.index(lhs).ok_or(EngineError::SeatNotFound)?;

        match mode {
            Marker::Beginning => {
                let seat = self.seats.remove(l);
                self.seats.insert(0, seat);
            }
            Marker::Before => {
                let r = rhs
                    .and_then(|rhs| self.index(rhs))
                    .ok_or(EngineError::SeatNotFound)?;
                // Removing the source first shifts everything after it
                // left by one; adjust the target to compensate.
                let r = if r > l { r - 1 } else { r };
                let seat = self.seats.remove(l);
                self.seats.insert(r, seat);
            }
            Marker::After => {
                let r = rhs
                    .and_then(|rhs| self.index(rhs))
                    .ok_or(EngineError::SeatNotFound)?;
                let r = if r > l { r } else { r + 1 };
                let seat = self.seats.remove(l);
                self.seats.insert(r, seat);
            }
            Marker::End => {
                let seat = self.seats.remove(l);
                self.seats.push(seat);
            }
        }
        Ok(())
    }

    /// Exchanges two seats' positions.
    pub fn swap_seats(&mut self, lhs: &str, rhs: &str) -> Result<(), EngineError> {
        if lhs == rhs {
            return Err(EngineError::SeatNotFound);
        }
        let (l, r) = match (self.index(lhs), self.index(rhs)) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(EngineError::SeatNotFound),
        };
        self.seats.swap(l, r);
        Ok(())
    }

    /// Sets the display alias of a seat.
    pub fn set_alias(&mut self, id: &str, alias: &str) -> Result<(), EngineError> {
        let seat = self.seat_mut(id)?;
        seat.alias = alias.to_string();
        Ok(())
    }

    /// Updates a seat's roles. Absent arguments leave the existing
    /// values untouched; this is a partial update, not a clear.
    pub fn set_role(
        &mut self,
        id: &str,
        true_role: Option<&str>,
        apparent: Option<&str>,
    ) -> Result<(), EngineError> {
        let seat = self.seat_mut(id)?;
        if let Some(role) = true_role {
            seat.roles.true_role = Some(role.to_string());
        }
        if let Some(role) = apparent {
            seat.roles.apparent = Some(role.to_string());
        }
        Ok(())
    }

    /// Updates a seat's life status. Absent means no change.
    pub fn set_status(&mut self, id: &str, status: Option<Status>) -> Result<(), EngineError> {
        let seat = self.seat_mut(id)?;
        if let Some(status) = status {
            seat.status = status;
        }
        Ok(())
    }

    /// Updates whether a seat holds a player or a traveller.
    /// Absent means no change.
    pub fn set_type(&mut self, id: &str, kind: Option<SeatKind>) -> Result<(), EngineError> {
        let seat = self.seat_mut(id)?;
        if let Some(kind) = kind {
            seat.kind = kind;
        }
        Ok(())
    }

    /// Appends a new seat for the given member, unless they already
    /// hold one. Returns the new seat's id.
    pub fn add_player(
        &mut self,
        member: u64,
        alias: &str,
        kind: SeatKind,
        true_role: Option<String>,
        apparent: Option<String>,
    ) -> Result<String, EngineError> {
        if self.seats.iter().any(|seat| seat.member == member) {
            return Err(EngineError::AlreadySeated);
        }

        let id = self.fresh_seat_id(member);
        self.seats.push(Seat {
            id: id.clone(),
            member,
            alias: alias.to_string(),
            kind,
            roles: Roles {
                true_role,
                apparent,
            },
            status: Status::Alive,
            removed: false,
        });
        Ok(id)
    }

    /// Seats a whole player list at once. One-shot: refuses after the
    /// first successful initialization. Members already seated are
    /// skipped.
    pub fn init_players(&mut self, players: &[(u64, String)]) -> Result<(), EngineError> {
        if self.already_init {
            return Err(EngineError::AlreadyInitialized);
        }
        self.already_init = true;

        for (member, alias) in players {
            // Ignore duplicates within the list itself.
            let _ = self.add_player(*member, alias, SeatKind::Player, None, None);
        }
        Ok(())
    }

    /// Soft-deletes a seat: it keeps its position and id but leaves the
    /// active rotation. Returns the seat as it was removed.
    pub fn remove_player(&mut self, id: &str) -> Result<Seat, EngineError> {
        let seat = self.seat_mut(id)?;
        seat.removed = true;
        Ok(seat.clone())
    }

    /// Replaces the occupant of a seat in place, updating the alias.
    /// Returns the previous occupant's member id so the caller can
    /// revoke their external access.
    pub fn substitute_player(
        &mut self,
        id: &str,
        member: u64,
        alias: &str,
    ) -> Result<u64, EngineError> {
        let seat = self.seat_mut(id)?;
        let previous = seat.member;
        seat.member = member;
        seat.alias = alias.to_string();
        Ok(previous)
    }

    /// The vote threshold for a nomination against a seat of the given
    /// kind: exiling a traveller needs half the table, executing a
    /// player needs half the living players. Both round up.
    pub fn required_votes_for(&self, kind: SeatKind) -> u32 {
        let count = match kind {
            SeatKind::Traveller => self.active_seats().count(),
            SeatKind::Player => self
                .active_seats()
                .filter(|seat| seat.status == Status::Alive)
                .count(),
        };
        u32::try_from((count + 1) / 2).unwrap_or(u32::MAX)
    }

    /// One line per active seat, in table order.
    pub fn make_page(&self, private: bool) -> String {
        if self.active_seats().next().is_none() {
            return "There are no players.".to_string();
        }

        let lines: Vec<String> = self
            .active_seats()
            .enumerate()
            .map(|(i, seat)| format!("{}. {}", i + 1, seat.describe(private)))
            .collect();
        lines.join("\n")
    }

    fn seat_mut(&mut self, id: &str) -> Result<&mut Seat, EngineError> {
        self.seats
            .iter_mut()
            .find(|seat| seat.id == id)
            .ok_or(EngineError::SeatNotFound)
    }

    /// Generates a seat id that is unique within this roster, even
    /// against removed seats. Ids are short hex digests of the member,
    /// the creation instant, and a collision salt.
    fn fresh_seat_id(&self, member: u64) -> String {
        let now = jiff::Timestamp::now().as_nanosecond();
        for salt in 0u64.. {
            let mut hasher = Sha256::new();
            hasher.update(member.to_be_bytes());
            hasher.update(now.to_be_bytes());
            hasher.update(salt.to_be_bytes());
            let id = hex::encode(&hasher.finalize()[..4]);
            if self.index(&id).is_none() {
                return id;
            }
        }
        unreachable!("some salt always yields an unused id")
    }
}
