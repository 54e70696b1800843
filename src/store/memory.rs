//! In-memory store: everything behind one `RwLock`, commits applied to a copy and swapped in.

use crate::models::{
    Board, BoardId, Fixture, FixtureId, FixtureScope, FixtureStatus, Group, Participant,
    ParticipantId, Round, Tournament, TournamentId,
};
use crate::store::{Commit, FixtureFilter, StoreError, TournamentStore};
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A tournament together with the groups and fixtures that belong to it.
#[derive(Clone, Debug)]
struct TournamentRecord {
    tournament: Tournament,
    groups: Vec<Group>,
    fixtures: Vec<Fixture>,
}

#[derive(Default)]
struct State {
    boards: HashMap<BoardId, Board>,
    participants: HashMap<ParticipantId, Participant>,
    tournaments: HashMap<TournamentId, TournamentRecord>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_board(&self, board: Board) -> Result<(), StoreError> {
        self.write()?.boards.insert(board.id, board);
        Ok(())
    }

    /// Register a participant. Its board must already exist.
    pub fn insert_participant(&self, participant: Participant) -> Result<(), StoreError> {
        let mut g = self.write()?;
        if !g.boards.contains_key(&participant.board_id) {
            return Err(StoreError::NotFound {
                entity: "board",
                id: participant.board_id,
            });
        }
        g.participants.insert(participant.id, participant);
        Ok(())
    }

    /// Participants of one board, sorted by name.
    pub fn board_participants(&self, board_id: BoardId) -> Result<Vec<Participant>, StoreError> {
        let g = self.read()?;
        let mut out: Vec<Participant> = g
            .participants
            .values()
            .filter(|p| p.board_id == board_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

fn missing(entity: &'static str, id: uuid::Uuid) -> StoreError {
    StoreError::NotFound { entity, id }
}

/// Apply `commit` to `record` in place. The caller hands in a copy and only keeps it on `Ok`.
fn apply(record: &mut TournamentRecord, commit: Commit) -> Result<(), StoreError> {
    let tournament_id = record.tournament.id;
    let actual = record.tournament.phase;
    if actual != commit.expected_phase {
        return Err(StoreError::PhaseMismatch {
            expected: commit.expected_phase,
            actual,
        });
    }

    if let Some(config) = commit.group_config {
        record.tournament.group_config = config;
    }

    for pid in commit.withdraw {
        let before = record.tournament.participants.len();
        record
            .tournament
            .participants
            .retain(|p| p.participant_id != pid);
        if record.tournament.participants.len() == before {
            return Err(missing("participant", pid));
        }
    }

    for enrollment in commit.enroll {
        if record.tournament.is_enrolled(enrollment.participant_id) {
            return Err(StoreError::Duplicate(enrollment.participant_id));
        }
        record.tournament.participants.push(enrollment);
    }

    if let Some(groups) = commit.groups {
        let grouped: HashSet<_> = record.groups.iter().map(|g| g.id).collect();
        if record
            .fixtures
            .iter()
            .any(|f| f.group_id().is_some_and(|g| grouped.contains(&g)))
        {
            return Err(StoreError::Conflict(
                "groups with fixtures cannot be replaced".to_string(),
            ));
        }
        record.groups = groups;
    }

    let mut slots: HashSet<(FixtureScope, Round, u32)> = record
        .fixtures
        .iter()
        .map(|f| (f.scope, f.round, f.match_number))
        .collect();
    for fixture in commit.new_fixtures {
        match fixture.scope {
            FixtureScope::Group(gid) if !record.groups.iter().any(|g| g.id == gid) => {
                return Err(missing("group", gid));
            }
            FixtureScope::Tournament(tid) if tid != tournament_id => {
                return Err(missing("tournament", tid));
            }
            _ => {}
        }
        if !slots.insert((fixture.scope, fixture.round, fixture.match_number)) {
            return Err(StoreError::Conflict(format!(
                "{:?} match {} already exists",
                fixture.round, fixture.match_number
            )));
        }
        record.fixtures.push(fixture);
    }

    for completed in commit.completed_fixtures {
        let stored = record
            .fixtures
            .iter_mut()
            .find(|f| f.id == completed.id)
            .ok_or_else(|| missing("fixture", completed.id))?;
        if matches!(
            stored.status,
            FixtureStatus::Completed | FixtureStatus::Cancelled
        ) {
            return Err(StoreError::FixtureClosed(completed.id));
        }
        *stored = completed;
    }

    for (pid, seed) in commit.seeds {
        let enrollment = record
            .tournament
            .participants
            .iter_mut()
            .find(|p| p.participant_id == pid)
            .ok_or_else(|| missing("participant", pid))?;
        enrollment.seed = Some(seed);
    }

    if let Some(phase) = commit.next_phase {
        record.tournament.phase = phase;
    }
    if let Some(status) = commit.status {
        record.tournament.status = status;
    }
    Ok(())
}

impl TournamentStore for InMemoryStore {
    fn get_board(&self, board_id: BoardId) -> Result<Board, StoreError> {
        self.read()?
            .boards
            .get(&board_id)
            .cloned()
            .ok_or_else(|| missing("board", board_id))
    }

    fn get_participant(&self, participant_id: ParticipantId) -> Result<Participant, StoreError> {
        self.read()?
            .participants
            .get(&participant_id)
            .cloned()
            .ok_or_else(|| missing("participant", participant_id))
    }

    fn create_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut g = self.write()?;
        if !g.boards.contains_key(&tournament.board_id) {
            return Err(missing("board", tournament.board_id));
        }
        if g.tournaments.contains_key(&tournament.id) {
            return Err(StoreError::Conflict(format!(
                "tournament {} already exists",
                tournament.id
            )));
        }
        g.tournaments.insert(
            tournament.id,
            TournamentRecord {
                tournament: tournament.clone(),
                groups: Vec::new(),
                fixtures: Vec::new(),
            },
        );
        Ok(())
    }

    fn get_tournament(&self, tournament_id: TournamentId) -> Result<Tournament, StoreError> {
        self.read()?
            .tournaments
            .get(&tournament_id)
            .map(|r| r.tournament.clone())
            .ok_or_else(|| missing("tournament", tournament_id))
    }

    fn list_tournaments(&self, board_id: Option<BoardId>) -> Result<Vec<Tournament>, StoreError> {
        let g = self.read()?;
        let mut out: Vec<Tournament> = g
            .tournaments
            .values()
            .map(|r| &r.tournament)
            .filter(|t| board_id.map_or(true, |b| t.board_id == b))
            .cloned()
            .collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }

    fn list_groups(&self, tournament_id: TournamentId) -> Result<Vec<Group>, StoreError> {
        let g = self.read()?;
        let record = g
            .tournaments
            .get(&tournament_id)
            .ok_or_else(|| missing("tournament", tournament_id))?;
        let mut groups = record.groups.clone();
        groups.sort_by_key(|g| g.position);
        Ok(groups)
    }

    fn list_fixtures(&self, filter: &FixtureFilter) -> Result<Vec<Fixture>, StoreError> {
        let g = self.read()?;
        let record = g
            .tournaments
            .get(&filter.tournament_id)
            .ok_or_else(|| missing("tournament", filter.tournament_id))?;
        Ok(record
            .fixtures
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect())
    }

    fn get_fixture(
        &self,
        tournament_id: TournamentId,
        fixture_id: FixtureId,
    ) -> Result<Fixture, StoreError> {
        let g = self.read()?;
        let record = g
            .tournaments
            .get(&tournament_id)
            .ok_or_else(|| missing("tournament", tournament_id))?;
        record
            .fixtures
            .iter()
            .find(|f| f.id == fixture_id)
            .cloned()
            .ok_or_else(|| missing("fixture", fixture_id))
    }

    fn commit(&self, tournament_id: TournamentId, commit: Commit) -> Result<(), StoreError> {
        let mut g = self.write()?;
        let record = g
            .tournaments
            .get_mut(&tournament_id)
            .ok_or_else(|| missing("tournament", tournament_id))?;
        let mut staged = record.clone();
        apply(&mut staged, commit)?;
        *record = staged;
        Ok(())
    }
}
