//! Boards, participants and tournament enrollments.

use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a score board.
pub type BoardId = Uuid;

/// Unique identifier for a participant (used in fixtures and lookups).
pub type ParticipantId = Uuid;

/// A score board. Participants and tournaments hang off a board.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A participant registered on a board.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub board_id: BoardId,
    pub name: String,
}

impl Participant {
    /// Create a new participant on the given board.
    pub fn new(board_id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            name: name.into(),
        }
    }
}

/// Enrollment of a participant in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentParticipant {
    pub tournament_id: TournamentId,
    pub participant_id: ParticipantId,
    /// Group-stage rank, written when the tournament advances to knockout.
    pub seed: Option<u32>,
    pub enrolled_at: DateTime<Utc>,
}

impl TournamentParticipant {
    pub fn new(tournament_id: TournamentId, participant_id: ParticipantId) -> Self {
        Self {
            tournament_id,
            participant_id,
            seed: None,
            enrolled_at: Utc::now(),
        }
    }
}
