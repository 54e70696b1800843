//! Tournament business logic: group draw, round-robin schedule, standings, knockout, and the
//! phase machine that drives them.

mod engine;
mod group_draw;
mod knockout;
mod ranking;
mod schedule;

pub use engine::{NewTournament, TournamentEngine};
pub use group_draw::{assign_manual, assign_random, build_groups, DrawMode};
pub use knockout::{
    build_bracket, final_from_semifinals, plan_knockout, select_semifinals, Bracket, KnockoutPlan,
};
pub use ranking::{compare_standings, compute_standings};
pub use schedule::{generate_group_fixtures, round_robin_pairs};
