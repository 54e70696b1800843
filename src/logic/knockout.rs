//! Knockout rounds: semifinal selection from group standings, then the final.

use crate::config::ScoringRules;
use crate::error::TournamentError;
use crate::logic::ranking::compute_standings;
use crate::models::{
    Fixture, FixtureScope, Group, GroupStandings, ParticipantId, Round, TournamentId,
};
use serde::{Deserialize, Serialize};

/// Everything the advance-to-knockout step writes.
#[derive(Clone, Debug)]
pub struct KnockoutPlan {
    pub semifinals: Vec<Fixture>,
    /// Group rank per participant.
    pub seeds: Vec<(ParticipantId, u32)>,
}

/// Knockout view of a tournament (for API / display).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub semifinals: Vec<Fixture>,
    pub final_fixture: Option<Fixture>,
    pub champion: Option<ParticipantId>,
}

/// Cross-pair two ranked groups: A1 vs B2, then B1 vs A2.
pub fn select_semifinals(
    group_a: &GroupStandings,
    group_b: &GroupStandings,
) -> Result<[(ParticipantId, ParticipantId); 2], TournamentError> {
    for g in [group_a, group_b] {
        if g.standings.len() < 2 {
            return Err(TournamentError::InvalidConfiguration(format!(
                "{} needs at least 2 participants to send two to the semifinals",
                g.group_name
            )));
        }
    }
    let (a, b) = (&group_a.standings, &group_b.standings);
    Ok([
        (a[0].participant_id, b[1].participant_id),
        (b[0].participant_id, a[1].participant_id),
    ])
}

/// Rank both groups and build the semifinals.
///
/// Requires exactly two groups and every group fixture completed. `fixtures` may contain the
/// whole tournament; each group only reads its own.
pub fn plan_knockout(
    tournament_id: TournamentId,
    groups: &[Group],
    fixtures: &[Fixture],
    rules: &ScoringRules,
) -> Result<KnockoutPlan, TournamentError> {
    if groups.len() != 2 {
        return Err(TournamentError::InvalidConfiguration(format!(
            "knockout needs exactly 2 groups, tournament has {}",
            groups.len()
        )));
    }

    let mut standings = Vec::with_capacity(groups.len());
    for group in groups {
        let own: Vec<Fixture> = fixtures
            .iter()
            .filter(|f| f.group_id() == Some(group.id))
            .cloned()
            .collect();
        if own.iter().any(|f| !f.is_completed()) {
            return Err(TournamentError::IncompleteGroupStage {
                group: group.name.clone(),
            });
        }
        standings.push(GroupStandings {
            group_id: group.id,
            group_name: group.name.clone(),
            standings: compute_standings(&group.members, &own, rules),
        });
    }

    let pairs = select_semifinals(&standings[0], &standings[1])?;
    let semifinals = pairs
        .iter()
        .zip(1u32..)
        .map(|(&(p1, p2), n)| {
            Fixture::new(
                FixtureScope::Tournament(tournament_id),
                p1,
                p2,
                Round::Semifinal,
                n,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let seeds = standings
        .iter()
        .flat_map(|g| g.standings.iter().map(|s| (s.participant_id, s.rank)))
        .collect();

    Ok(KnockoutPlan {
        semifinals,
        seeds,
    })
}

/// The final, once both semifinals have winners: semifinal 1 winner vs semifinal 2 winner.
/// Returns `None` while either semifinal is still open.
pub fn final_from_semifinals(
    tournament_id: TournamentId,
    semifinals: &[Fixture],
) -> Result<Option<Fixture>, TournamentError> {
    let winner = |n: u32| {
        semifinals
            .iter()
            .find(|f| f.round == Round::Semifinal && f.match_number == n && f.is_completed())
            .and_then(|f| f.winner_id)
    };
    match (winner(1), winner(2)) {
        (Some(w1), Some(w2)) => Fixture::new(
            FixtureScope::Tournament(tournament_id),
            w1,
            w2,
            Round::Final,
            1,
        )
        .map(Some),
        _ => Ok(None),
    }
}

/// Assemble the bracket from a tournament's knockout fixtures.
pub fn build_bracket(knockout: &[Fixture]) -> Bracket {
    let mut semifinals: Vec<Fixture> = knockout
        .iter()
        .filter(|f| f.round == Round::Semifinal)
        .cloned()
        .collect();
    semifinals.sort_by_key(|f| f.match_number);
    let final_fixture = knockout.iter().find(|f| f.round == Round::Final).cloned();
    let champion = final_fixture
        .as_ref()
        .filter(|f| f.is_completed())
        .and_then(|f| f.winner_id);
    Bracket {
        semifinals,
        final_fixture,
        champion,
    }
}
