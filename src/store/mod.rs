//! Storage abstraction for the tournament engine.
//!
//! The engine never talks to a database directly. It reads entities by id and writes through
//! [`TournamentStore::commit`], which applies a whole [`Commit`] atomically and only if the
//! tournament is still in the phase the engine observed. That compare-and-set is what keeps two
//! concurrent "generate schedule" or "advance" requests from both succeeding.

mod memory;

pub use memory::InMemoryStore;

use crate::models::{
    Board, BoardId, Fixture, FixtureId, FixtureStatus, Group, GroupId, Participant, ParticipantId,
    Round, Tournament, TournamentId, TournamentParticipant, TournamentPhase, TournamentStatus,
};
use uuid::Uuid;

/// Uniform error type for storage backends.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    /// Compare-and-set on the phase failed.
    #[error("expected phase {expected}, found {actual}")]
    PhaseMismatch {
        expected: TournamentPhase,
        actual: TournamentPhase,
    },
    #[error("participant {0} already enrolled")]
    Duplicate(ParticipantId),
    /// Fixture was already completed or cancelled when the commit tried to complete it.
    #[error("fixture {0} already closed")]
    FixtureClosed(FixtureId),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Which fixtures to list. Every field but the tournament is optional.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixtureFilter {
    pub tournament_id: TournamentId,
    pub group_id: Option<GroupId>,
    pub round: Option<Round>,
    pub status: Option<FixtureStatus>,
}

impl FixtureFilter {
    pub fn tournament(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            group_id: None,
            round: None,
            status: None,
        }
    }

    pub fn group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn round(mut self, round: Round) -> Self {
        self.round = Some(round);
        self
    }

    pub fn status(mut self, status: FixtureStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, fixture: &Fixture) -> bool {
        self.group_id.map_or(true, |g| fixture.group_id() == Some(g))
            && self.round.map_or(true, |r| fixture.round == r)
            && self.status.map_or(true, |s| fixture.status == s)
    }
}

/// One atomic write against a tournament.
///
/// Applied in full or not at all, and only while the tournament is in `expected_phase`.
#[derive(Clone, Debug, Default)]
pub struct Commit {
    pub expected_phase: TournamentPhase,
    pub next_phase: Option<TournamentPhase>,
    pub status: Option<TournamentStatus>,
    pub group_config: Option<Vec<usize>>,
    pub enroll: Vec<TournamentParticipant>,
    pub withdraw: Vec<ParticipantId>,
    /// Replaces the tournament's whole group set.
    pub groups: Option<Vec<Group>>,
    pub new_fixtures: Vec<Fixture>,
    /// Fixtures carrying their final score; each must still be open in the store.
    pub completed_fixtures: Vec<Fixture>,
    pub seeds: Vec<(ParticipantId, u32)>,
}

impl Commit {
    pub fn expecting(phase: TournamentPhase) -> Self {
        Self {
            expected_phase: phase,
            ..Self::default()
        }
    }

    pub fn advance_to(mut self, phase: TournamentPhase) -> Self {
        self.next_phase = Some(phase);
        self
    }

    pub fn with_status(mut self, status: TournamentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_group_config(mut self, config: Vec<usize>) -> Self {
        self.group_config = Some(config);
        self
    }

    pub fn enrolling(mut self, enrollments: Vec<TournamentParticipant>) -> Self {
        self.enroll = enrollments;
        self
    }

    pub fn withdrawing(mut self, participant_id: ParticipantId) -> Self {
        self.withdraw.push(participant_id);
        self
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = Some(groups);
        self
    }

    pub fn creating(mut self, fixtures: Vec<Fixture>) -> Self {
        self.new_fixtures.extend(fixtures);
        self
    }

    pub fn completing(mut self, fixture: Fixture) -> Self {
        self.completed_fixtures.push(fixture);
        self
    }

    pub fn seeding(mut self, seeds: Vec<(ParticipantId, u32)>) -> Self {
        self.seeds = seeds;
        self
    }
}

/// The storage trait the engine depends on.
pub trait TournamentStore: Send + Sync {
    fn get_board(&self, board_id: BoardId) -> Result<Board, StoreError>;

    fn get_participant(&self, participant_id: ParticipantId) -> Result<Participant, StoreError>;

    /// Persist a freshly created tournament.
    fn create_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;

    fn get_tournament(&self, tournament_id: TournamentId) -> Result<Tournament, StoreError>;

    /// All tournaments, optionally only those of one board.
    fn list_tournaments(&self, board_id: Option<BoardId>) -> Result<Vec<Tournament>, StoreError>;

    /// Groups ordered by position.
    fn list_groups(&self, tournament_id: TournamentId) -> Result<Vec<Group>, StoreError>;

    /// Fixtures in creation order.
    fn list_fixtures(&self, filter: &FixtureFilter) -> Result<Vec<Fixture>, StoreError>;

    fn get_fixture(
        &self,
        tournament_id: TournamentId,
        fixture_id: FixtureId,
    ) -> Result<Fixture, StoreError>;

    /// Apply `commit` atomically, guarded by its expected phase.
    fn commit(&self, tournament_id: TournamentId, commit: Commit) -> Result<(), StoreError>;
}
