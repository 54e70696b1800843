//! Tournament phase machine: SETUP -> GROUP_DRAW -> GROUP_STAGE -> KNOCKOUT -> COMPLETED.
//!
//! Every write follows the same shape: take the tournament's writer lock, load it, check the
//! phase and all other preconditions, compute the new records with the pure functions in
//! `logic`, then hand them to the store as one [`Commit`] guarded by the phase that was checked.

use crate::config::ScoringRules;
use crate::error::TournamentError;
use crate::logic::group_draw::{assign_manual, assign_random, build_groups, DrawMode};
use crate::logic::knockout::{build_bracket, final_from_semifinals, plan_knockout, Bracket};
use crate::logic::ranking::compute_standings;
use crate::logic::schedule::generate_group_fixtures;
use crate::models::{
    BoardId, Fixture, FixtureId, FixtureScore, FixtureScope, FixtureStatus, Group, GroupStandings,
    ParticipantId, Round, Tournament, TournamentId, TournamentParticipant, TournamentPhase,
    TournamentStatus,
};
use crate::store::{Commit, FixtureFilter, TournamentStore};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Request to create a tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub board_id: BoardId,
    #[serde(default)]
    pub group_config: Vec<usize>,
    /// Falls back to the engine's default scoring.
    #[serde(default)]
    pub scoring: Option<ScoringRules>,
}

/// One writer lock per tournament; reads never take it.
#[derive(Default)]
struct WriterLocks {
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl WriterLocks {
    fn get(&self, id: TournamentId) -> Result<Arc<Mutex<()>>, TournamentError> {
        let mut g = self
            .locks
            .lock()
            .map_err(|_| TournamentError::Storage("lock poisoned".to_string()))?;
        Ok(g.entry(id).or_default().clone())
    }
}

pub struct TournamentEngine<S> {
    store: S,
    default_scoring: ScoringRules,
    writers: WriterLocks,
}

fn require_phase(t: &Tournament, expected: TournamentPhase) -> Result<(), TournamentError> {
    if t.phase != expected {
        return Err(TournamentError::InvalidPhase {
            expected,
            actual: t.phase,
        });
    }
    Ok(())
}

impl<S: TournamentStore> TournamentEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_scoring(store, ScoringRules::default())
    }

    pub fn with_scoring(store: S, default_scoring: ScoringRules) -> Self {
        Self {
            store,
            default_scoring,
            writers: WriterLocks::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run `f` while holding the tournament's writer lock.
    fn exclusive<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let lock = self.writers.get(id)?;
        let _guard = lock
            .lock()
            .map_err(|_| TournamentError::Storage("lock poisoned".to_string()))?;
        let tournament = self.store.get_tournament(id)?;
        f(tournament)
    }

    pub fn create_tournament(&self, req: NewTournament) -> Result<Tournament, TournamentError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidConfiguration(
                "tournament name is empty".to_string(),
            ));
        }
        self.store.get_board(req.board_id)?;
        let scoring = req.scoring.unwrap_or(self.default_scoring);
        let tournament = Tournament::new(name, req.board_id, req.group_config, scoring);
        self.store.create_tournament(&tournament)?;
        log::info!("Created tournament {} ({})", tournament.id, tournament.name);
        Ok(tournament)
    }

    /// Replace the group-size plan (Setup only).
    pub fn set_group_config(
        &self,
        id: TournamentId,
        group_config: Vec<usize>,
    ) -> Result<Tournament, TournamentError> {
        self.exclusive(id, |t| {
            require_phase(&t, TournamentPhase::Setup)?;
            self.store.commit(
                id,
                Commit::expecting(TournamentPhase::Setup).with_group_config(group_config),
            )?;
            Ok(self.store.get_tournament(id)?)
        })
    }

    /// Enroll participants (Setup only). All-or-nothing: one bad id rejects the whole request.
    pub fn add_participants(
        &self,
        id: TournamentId,
        participant_ids: &[ParticipantId],
    ) -> Result<Tournament, TournamentError> {
        self.exclusive(id, |t| {
            require_phase(&t, TournamentPhase::Setup)?;
            let mut seen = HashSet::new();
            for &pid in participant_ids {
                if !seen.insert(pid) || t.is_enrolled(pid) {
                    return Err(TournamentError::DuplicateParticipant(pid));
                }
                let participant = self.store.get_participant(pid)?;
                if participant.board_id != t.board_id {
                    return Err(TournamentError::ParticipantNotOnBoard(pid));
                }
            }
            let enrollments = participant_ids
                .iter()
                .map(|&pid| TournamentParticipant::new(id, pid))
                .collect();
            self.store.commit(
                id,
                Commit::expecting(TournamentPhase::Setup).enrolling(enrollments),
            )?;
            log::info!(
                "Enrolled {} participant(s) in tournament {}",
                participant_ids.len(),
                id
            );
            Ok(self.store.get_tournament(id)?)
        })
    }

    /// Withdraw an enrolled participant (Setup only).
    pub fn remove_participant(
        &self,
        id: TournamentId,
        participant_id: ParticipantId,
    ) -> Result<Tournament, TournamentError> {
        self.exclusive(id, |t| {
            require_phase(&t, TournamentPhase::Setup)?;
            if !t.is_enrolled(participant_id) {
                return Err(TournamentError::not_found("participant", participant_id));
            }
            self.store.commit(
                id,
                Commit::expecting(TournamentPhase::Setup).withdrawing(participant_id),
            )?;
            log::info!("Withdrew participant {participant_id} from tournament {id}");
            Ok(self.store.get_tournament(id)?)
        })
    }

    pub fn draw_groups(
        &self,
        id: TournamentId,
        mode: &DrawMode,
    ) -> Result<Vec<Group>, TournamentError> {
        self.draw_groups_with_rng(id, mode, &mut rand::thread_rng())
    }

    /// Draw groups and move to GroupDraw (Setup only).
    pub fn draw_groups_with_rng<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        mode: &DrawMode,
        rng: &mut R,
    ) -> Result<Vec<Group>, TournamentError> {
        self.exclusive(id, |t| {
            require_phase(&t, TournamentPhase::Setup)?;
            let participants = t.participant_ids();
            let memberships = match mode {
                DrawMode::Random => assign_random(&t.group_config, &participants, rng)?,
                DrawMode::Manual { assignments } => {
                    assign_manual(&t.group_config, &participants, assignments)?
                }
            };
            let groups = build_groups(id, &t.group_config, memberships);
            self.store.commit(
                id,
                Commit::expecting(TournamentPhase::Setup)
                    .advance_to(TournamentPhase::GroupDraw)
                    .with_groups(groups.clone()),
            )?;
            log::info!(
                "Drew {} group(s) for tournament {} ({:?})",
                groups.len(),
                id,
                t.group_config
            );
            Ok(groups)
        })
    }

    /// Create the round-robin schedule of every group and move to GroupStage.
    pub fn generate_schedule(&self, id: TournamentId) -> Result<Vec<Fixture>, TournamentError> {
        self.exclusive(id, |t| {
            require_phase(&t, TournamentPhase::GroupDraw)?;
            let groups = self.store.list_groups(id)?;
            let mut fixtures = Vec::new();
            for group in &groups {
                let group_fixtures = generate_group_fixtures(group)?;
                log::debug!("{}: {} fixture(s)", group.name, group_fixtures.len());
                fixtures.extend(group_fixtures);
            }
            self.store.commit(
                id,
                Commit::expecting(TournamentPhase::GroupDraw)
                    .advance_to(TournamentPhase::GroupStage)
                    .with_status(TournamentStatus::Active)
                    .creating(fixtures.clone()),
            )?;
            log::info!(
                "Scheduled {} group fixture(s) for tournament {}",
                fixtures.len(),
                id
            );
            Ok(fixtures)
        })
    }

    /// Record a fixture's final score.
    ///
    /// Group fixtures are accepted in GroupStage; semifinals and the final in Knockout, where a
    /// level score is rejected. The second semifinal result creates the final, and the final's
    /// result completes the tournament, each in the same commit as the score.
    pub fn complete_fixture(
        &self,
        id: TournamentId,
        fixture_id: FixtureId,
        score: FixtureScore,
    ) -> Result<Fixture, TournamentError> {
        self.exclusive(id, |t| {
            let fixture = self.store.get_fixture(id, fixture_id)?;
            if matches!(
                fixture.status,
                FixtureStatus::Completed | FixtureStatus::Cancelled
            ) {
                return Err(TournamentError::FixtureClosed(fixture_id));
            }
            let completed = fixture.completed_with(score, Utc::now());

            let commit = match fixture.round {
                Round::Group => {
                    require_phase(&t, TournamentPhase::GroupStage)?;
                    Commit::expecting(TournamentPhase::GroupStage).completing(completed.clone())
                }
                Round::Semifinal | Round::Final => {
                    require_phase(&t, TournamentPhase::Knockout)?;
                    if completed.winner_id.is_none() {
                        return Err(TournamentError::InvalidScore(
                            "knockout fixtures cannot end level".to_string(),
                        ));
                    }
                    self.knockout_commit(id, &completed)?
                }
            };
            self.store.commit(id, commit)?;
            log::info!(
                "Fixture {} ({:?} #{}) completed {}-{}",
                fixture_id,
                completed.round,
                completed.match_number,
                completed.player1_score,
                completed.player2_score
            );
            if completed.round == Round::Final {
                log::info!("Tournament {id} completed");
            }
            Ok(completed)
        })
    }

    /// Commit for a knockout result, including whatever the result unlocks.
    fn knockout_commit(
        &self,
        id: TournamentId,
        completed: &Fixture,
    ) -> Result<Commit, TournamentError> {
        let commit = Commit::expecting(TournamentPhase::Knockout).completing(completed.clone());
        match completed.round {
            Round::Final => Ok(commit
                .advance_to(TournamentPhase::Completed)
                .with_status(TournamentStatus::Finished)),
            _ => {
                let semifinals: Vec<Fixture> = self
                    .store
                    .list_fixtures(&FixtureFilter::tournament(id).round(Round::Semifinal))?
                    .into_iter()
                    .map(|f| if f.id == completed.id { completed.clone() } else { f })
                    .collect();
                match final_from_semifinals(id, &semifinals)? {
                    Some(final_fixture) => {
                        log::info!(
                            "Final set for tournament {}: {} vs {}",
                            id,
                            final_fixture.player1_id,
                            final_fixture.player2_id
                        );
                        Ok(commit.creating(vec![final_fixture]))
                    }
                    None => Ok(commit),
                }
            }
        }
    }

    /// Rank the groups, write seeds, create the semifinals and move to Knockout.
    pub fn advance_to_knockout(&self, id: TournamentId) -> Result<Vec<Fixture>, TournamentError> {
        self.exclusive(id, |t| {
            require_phase(&t, TournamentPhase::GroupStage)?;
            let groups = self.store.list_groups(id)?;
            let fixtures = self
                .store
                .list_fixtures(&FixtureFilter::tournament(id).round(Round::Group))?;
            let plan = match plan_knockout(id, &groups, &fixtures, &t.scoring) {
                Ok(plan) => plan,
                Err(e) => {
                    log::warn!("Tournament {id} cannot advance to knockout: {e}");
                    return Err(e);
                }
            };
            self.store.commit(
                id,
                Commit::expecting(TournamentPhase::GroupStage)
                    .advance_to(TournamentPhase::Knockout)
                    .creating(plan.semifinals.clone())
                    .seeding(plan.seeds),
            )?;
            log::info!("Tournament {id} advanced to knockout");
            Ok(plan.semifinals)
        })
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        Ok(self.store.get_tournament(id)?)
    }

    pub fn tournaments(&self, board_id: Option<BoardId>) -> Result<Vec<Tournament>, TournamentError> {
        Ok(self.store.list_tournaments(board_id)?)
    }

    pub fn groups(&self, id: TournamentId) -> Result<Vec<Group>, TournamentError> {
        Ok(self.store.list_groups(id)?)
    }

    pub fn fixtures(&self, filter: &FixtureFilter) -> Result<Vec<Fixture>, TournamentError> {
        Ok(self.store.list_fixtures(filter)?)
    }

    /// Current standings of every group, from the fixtures completed so far.
    pub fn standings(&self, id: TournamentId) -> Result<Vec<GroupStandings>, TournamentError> {
        let tournament = self.store.get_tournament(id)?;
        let fixtures = self
            .store
            .list_fixtures(&FixtureFilter::tournament(id).round(Round::Group))?;
        let groups = self.store.list_groups(id)?;
        Ok(groups
            .into_iter()
            .map(|group| {
                let own: Vec<Fixture> = fixtures
                    .iter()
                    .filter(|f| f.scope == FixtureScope::Group(group.id))
                    .cloned()
                    .collect();
                GroupStandings {
                    standings: compute_standings(&group.members, &own, &tournament.scoring),
                    group_id: group.id,
                    group_name: group.name,
                }
            })
            .collect())
    }

    pub fn bracket(&self, id: TournamentId) -> Result<Bracket, TournamentError> {
        let knockout: Vec<Fixture> = self
            .store
            .list_fixtures(&FixtureFilter::tournament(id))?
            .into_iter()
            .filter(|f| f.round != Round::Group)
            .collect();
        Ok(build_bracket(&knockout))
    }
}
