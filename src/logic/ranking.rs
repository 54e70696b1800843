//! Standings: accumulate completed fixtures per participant and rank them.
//!
//! Order, best first: total points, point difference, points for, wins (all descending).
//! Full ties keep the order participants were passed in; ranks are strictly ordinal.

use crate::config::ScoringRules;
use crate::models::{Fixture, ParticipantId, Standing};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Standings for `participants` from `fixtures`. Only completed fixtures count, and only the
/// sides that belong to `participants`.
pub fn compute_standings(
    participants: &[ParticipantId],
    fixtures: &[Fixture],
    rules: &ScoringRules,
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = participants.iter().map(|&id| Standing::new(id)).collect();
    let index: HashMap<ParticipantId, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    for f in fixtures.iter().filter(|f| f.is_completed()) {
        let sides = [
            (f.player1_id, f.player1_score, f.player2_score),
            (f.player2_id, f.player2_score, f.player1_score),
        ];
        for (pid, own, opp) in sides {
            if let Some(&i) = index.get(&pid) {
                record(&mut standings[i], own, opp);
            }
        }
    }

    for s in &mut standings {
        s.point_difference = s.points_for as i64 - s.points_against as i64;
        s.total_points = s.wins as i64 * rules.win as i64
            + s.draws as i64 * rules.draw as i64
            + s.losses as i64 * rules.loss as i64;
    }

    // sort_by is stable, so full ties keep enumeration order.
    standings.sort_by(compare_standings);
    for (rank, s) in (1u32..).zip(standings.iter_mut()) {
        s.rank = rank;
    }
    standings
}

fn record(s: &mut Standing, own: u32, opp: u32) {
    s.played += 1;
    s.points_for += own as u64;
    s.points_against += opp as u64;
    match own.cmp(&opp) {
        Ordering::Greater => s.wins += 1,
        Ordering::Less => s.losses += 1,
        Ordering::Equal => s.draws += 1,
    }
}

/// `Less` means `a` ranks above `b`.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then(b.point_difference.cmp(&a.point_difference))
        .then(b.points_for.cmp(&a.points_for))
        .then(b.wins.cmp(&a.wins))
}
