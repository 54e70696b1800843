//! Group draw: partition enrolled participants into groups following the group-size plan.

use crate::error::TournamentError;
use crate::models::{Group, ParticipantId, TournamentId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the draw places participants.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DrawMode {
    Random,
    /// Explicit participant -> group index (0-based, in group-plan order).
    Manual {
        assignments: HashMap<ParticipantId, usize>,
    },
}

/// Check the plan against the participant count.
fn check_plan(sizes: &[usize], participant_count: usize) -> Result<(), TournamentError> {
    if sizes.is_empty() {
        return Err(TournamentError::InvalidConfiguration(
            "group plan is empty".to_string(),
        ));
    }
    let total = sizes
        .iter()
        .try_fold(0usize, |acc, &size| acc.checked_add(size))
        .ok_or_else(|| {
            TournamentError::InvalidConfiguration("group sizes overflow".to_string())
        })?;
    if total != participant_count {
        return Err(TournamentError::InvalidConfiguration(format!(
            "group sizes add up to {total} but {participant_count} participants are enrolled"
        )));
    }
    Ok(())
}

/// Random draw: shuffle, then cut into contiguous chunks of `sizes[0]`, `sizes[1]`, ...
pub fn assign_random<R: Rng + ?Sized>(
    sizes: &[usize],
    participants: &[ParticipantId],
    rng: &mut R,
) -> Result<Vec<Vec<ParticipantId>>, TournamentError> {
    check_plan(sizes, participants.len())?;

    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let mut rest = shuffled.as_slice();
    let mut groups = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let (head, tail) = rest.split_at(size);
        groups.push(head.to_vec());
        rest = tail;
    }
    Ok(groups)
}

/// Manual draw: every participant must be placed in an existing group, and every group must
/// end up exactly at its target size. Members keep enrollment order.
pub fn assign_manual(
    sizes: &[usize],
    participants: &[ParticipantId],
    assignments: &HashMap<ParticipantId, usize>,
) -> Result<Vec<Vec<ParticipantId>>, TournamentError> {
    check_plan(sizes, participants.len())?;

    // Deterministic error for unknown ids regardless of map iteration order.
    let mut unknown: Vec<_> = assignments
        .keys()
        .filter(|id| !participants.contains(id))
        .copied()
        .collect();
    unknown.sort();
    if let Some(&id) = unknown.first() {
        return Err(TournamentError::not_found("participant", id));
    }

    let mut groups: Vec<Vec<ParticipantId>> = vec![Vec::new(); sizes.len()];
    for &pid in participants {
        let group = assignments
            .get(&pid)
            .and_then(|&index| groups.get_mut(index))
            .ok_or(TournamentError::IncompleteAssignment(pid))?;
        group.push(pid);
    }

    for (group, (members, &expected)) in groups.iter().zip(sizes).enumerate() {
        if members.len() != expected {
            return Err(TournamentError::GroupCapacityMismatch {
                group,
                expected,
                assigned: members.len(),
            });
        }
    }
    Ok(groups)
}

/// Turn drawn memberships into named, positioned groups.
pub fn build_groups(
    tournament_id: TournamentId,
    sizes: &[usize],
    memberships: Vec<Vec<ParticipantId>>,
) -> Vec<Group> {
    memberships
        .into_iter()
        .zip(sizes)
        .enumerate()
        .map(|(position, (members, &capacity))| {
            Group::new(tournament_id, position, capacity, members)
        })
        .collect()
}
