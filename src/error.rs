//! Errors surfaced by tournament operations.

use crate::models::{FixtureId, ParticipantId, TournamentPhase};
use crate::store::StoreError;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
///
/// Every variant is produced by a precondition check that runs before anything is written, so a
/// failed operation leaves the tournament exactly as it was.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TournamentError {
    /// Operation is not legal in the tournament's current phase.
    #[error("operation requires phase {expected} but tournament is in {actual}")]
    InvalidPhase {
        expected: TournamentPhase,
        actual: TournamentPhase,
    },
    /// Group-size plan does not fit the enrolled participants (or the bracket shape).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Manual draw left an enrolled participant without a valid group.
    #[error("participant {0} has no valid group assignment")]
    IncompleteAssignment(ParticipantId),
    /// Manual draw filled a group with the wrong number of participants.
    #[error("group {group} expects {expected} participants but {assigned} were assigned")]
    GroupCapacityMismatch {
        group: usize,
        expected: usize,
        assigned: usize,
    },
    /// Knockout advancement attempted while group fixtures are still open.
    #[error("{group} still has unfinished fixtures")]
    IncompleteGroupStage { group: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    /// Participant already enrolled, or a fixture would pit a participant against themselves.
    #[error("participant {0} is already enrolled or paired")]
    DuplicateParticipant(ParticipantId),
    #[error("participant {0} does not belong to the tournament's board")]
    ParticipantNotOnBoard(ParticipantId),
    /// Fixture already completed or cancelled.
    #[error("fixture {0} is closed")]
    FixtureClosed(FixtureId),
    #[error("invalid score: {0}")]
    InvalidScore(String),
    /// A concurrent write got there first.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl TournamentError {
    pub(crate) fn not_found(entity: &'static str, id: Uuid) -> Self {
        TournamentError::NotFound { entity, id }
    }
}

impl From<StoreError> for TournamentError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity, id } => TournamentError::NotFound { entity, id },
            StoreError::PhaseMismatch { expected, actual } => {
                TournamentError::InvalidPhase { expected, actual }
            }
            StoreError::Duplicate(id) => TournamentError::DuplicateParticipant(id),
            StoreError::FixtureClosed(id) => TournamentError::FixtureClosed(id),
            StoreError::Conflict(msg) => TournamentError::Conflict(msg),
            StoreError::Backend(msg) => TournamentError::Storage(msg),
        }
    }
}
