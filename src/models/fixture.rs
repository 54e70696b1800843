//! Fixture (a single scored match), its round and status.

use crate::error::TournamentError;
use crate::models::group::GroupId;
use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

/// Stage of the tournament this fixture belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Round {
    Group,
    Semifinal,
    Final,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixtureStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// What a fixture hangs off: its group during the group stage, the tournament in knockout.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FixtureScope {
    Group(GroupId),
    Tournament(TournamentId),
}

/// Final score submitted by the match-completion side.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureScore {
    pub player1_score: u32,
    pub player2_score: u32,
}

/// A single fixture between two distinct participants.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub scope: FixtureScope,
    pub player1_id: ParticipantId,
    pub player2_id: ParticipantId,
    pub player1_score: u32,
    pub player2_score: u32,
    pub status: FixtureStatus,
    pub round: Round,
    /// 1-based, scoped to the group or to the knockout round.
    pub match_number: u32,
    /// None until completed, and stays None for a drawn group fixture.
    pub winner_id: Option<ParticipantId>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Fixture {
    /// Create a pending fixture. Fails if both sides are the same participant.
    pub fn new(
        scope: FixtureScope,
        player1_id: ParticipantId,
        player2_id: ParticipantId,
        round: Round,
        match_number: u32,
    ) -> Result<Self, TournamentError> {
        if player1_id == player2_id {
            return Err(TournamentError::DuplicateParticipant(player1_id));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            scope,
            player1_id,
            player2_id,
            player1_score: 0,
            player2_score: 0,
            status: FixtureStatus::Pending,
            round,
            match_number,
            winner_id: None,
            completed_at: None,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == FixtureStatus::Completed
    }

    pub fn group_id(&self) -> Option<GroupId> {
        match self.scope {
            FixtureScope::Group(id) => Some(id),
            FixtureScope::Tournament(_) => None,
        }
    }

    /// Copy of this fixture carrying the final score. The winner is the higher score; a level
    /// score leaves `winner_id` empty.
    pub fn completed_with(&self, score: FixtureScore, at: DateTime<Utc>) -> Self {
        let winner_id = match score.player1_score.cmp(&score.player2_score) {
            std::cmp::Ordering::Greater => Some(self.player1_id),
            std::cmp::Ordering::Less => Some(self.player2_id),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            player1_score: score.player1_score,
            player2_score: score.player2_score,
            status: FixtureStatus::Completed,
            winner_id,
            completed_at: Some(at),
            ..self.clone()
        }
    }
}
