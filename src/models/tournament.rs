//! Tournament, TournamentPhase and TournamentStatus.

use crate::config::ScoringRules;
use crate::models::participant::{BoardId, ParticipantId, TournamentParticipant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament. Phases only ever move forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentPhase {
    /// Enrolling participants, editing the group plan.
    #[default]
    Setup,
    /// Groups committed; waiting for the schedule.
    GroupDraw,
    /// Round-robin fixtures are being played.
    GroupStage,
    /// Semifinals and final.
    Knockout,
    Completed,
}

impl fmt::Display for TournamentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TournamentPhase::Setup => "SETUP",
            TournamentPhase::GroupDraw => "GROUP_DRAW",
            TournamentPhase::GroupStage => "GROUP_STAGE",
            TournamentPhase::Knockout => "KNOCKOUT",
            TournamentPhase::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// Lifecycle status shown on boards; orthogonal to the phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    Draft,
    Active,
    Finished,
}

/// Tournament record as persisted. Groups and fixtures live alongside it in the store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub board_id: BoardId,
    pub phase: TournamentPhase,
    pub status: TournamentStatus,
    /// Target group sizes in draw order, e.g. `[6, 5]`.
    pub group_config: Vec<usize>,
    pub scoring: ScoringRules,
    pub participants: Vec<TournamentParticipant>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Setup with no participants.
    pub fn new(
        name: impl Into<String>,
        board_id: BoardId,
        group_config: Vec<usize>,
        scoring: ScoringRules,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            board_id,
            phase: TournamentPhase::Setup,
            status: TournamentStatus::Draft,
            group_config,
            scoring,
            participants: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Enrolled participant ids in enrollment order.
    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.participant_id).collect()
    }

    pub fn is_enrolled(&self, participant_id: ParticipantId) -> bool {
        self.participants
            .iter()
            .any(|p| p.participant_id == participant_id)
    }

    /// Seed written for a participant after the group stage, if any.
    pub fn seed_of(&self, participant_id: ParticipantId) -> Option<u32> {
        self.participants
            .iter()
            .find(|p| p.participant_id == participant_id)
            .and_then(|p| p.seed)
    }
}
