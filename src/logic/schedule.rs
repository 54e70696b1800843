//! Round-robin schedule for one group.

use crate::error::TournamentError;
use crate::models::{Fixture, FixtureScope, Group, ParticipantId, Round};

/// Every unordered pair of `members` exactly once: `i` vs `j` for all `i < j` in member order.
/// Fewer than two members give no pairs.
pub fn round_robin_pairs(members: &[ParticipantId]) -> Vec<(ParticipantId, ParticipantId)> {
    let n = members.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, &home) in members.iter().enumerate() {
        for &away in &members[i + 1..] {
            pairs.push((home, away));
        }
    }
    pairs
}

/// Pending group fixtures for `group`, numbered 1.. in generation order.
pub fn generate_group_fixtures(group: &Group) -> Result<Vec<Fixture>, TournamentError> {
    round_robin_pairs(&group.members)
        .into_iter()
        .zip(1u32..)
        .map(|((p1, p2), match_number)| {
            Fixture::new(FixtureScope::Group(group.id), p1, p2, Round::Group, match_number)
        })
        .collect()
}
