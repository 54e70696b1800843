//! Score board tournament engine: library with models, storage and business logic.

pub mod config;
pub mod error;
pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{ScoringRules, ServerConfig};
pub use error::TournamentError;
pub use logic::{
    assign_manual, assign_random, build_bracket, build_groups, compare_standings,
    compute_standings, final_from_semifinals, generate_group_fixtures, plan_knockout,
    round_robin_pairs, select_semifinals, Bracket, DrawMode, KnockoutPlan, NewTournament,
    TournamentEngine,
};
pub use models::{
    group_name, Board, BoardId, Fixture, FixtureId, FixtureScope, FixtureScore, FixtureStatus,
    Group, GroupId, GroupStandings, Participant, ParticipantId, Round, Standing, Tournament,
    TournamentId, TournamentParticipant, TournamentPhase, TournamentStatus,
};
pub use store::{Commit, FixtureFilter, InMemoryStore, StoreError, TournamentStore};
