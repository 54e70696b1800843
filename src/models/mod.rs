//! Data structures for the tournament engine: boards, participants, groups, fixtures, standings.

mod fixture;
mod group;
mod participant;
mod standing;
mod tournament;

pub use fixture::{Fixture, FixtureId, FixtureScope, FixtureScore, FixtureStatus, Round};
pub use group::{group_name, Group, GroupId};
pub use participant::{Board, BoardId, Participant, ParticipantId, TournamentParticipant};
pub use standing::{GroupStandings, Standing};
pub use tournament::{Tournament, TournamentId, TournamentPhase, TournamentStatus};
