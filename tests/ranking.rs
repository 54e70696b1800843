//! Integration tests for standings and tie-breaking.

use chrono::Utc;
use score_tournament::{
    compute_standings, Fixture, FixtureScope, FixtureScore, ParticipantId, Round, ScoringRules,
};
use uuid::Uuid;

fn played(a: ParticipantId, b: ParticipantId, sa: u32, sb: u32) -> Fixture {
    Fixture::new(FixtureScope::Group(Uuid::nil()), a, b, Round::Group, 1)
        .unwrap()
        .completed_with(
            FixtureScore {
                player1_score: sa,
                player2_score: sb,
            },
            Utc::now(),
        )
}

fn pending(a: ParticipantId, b: ParticipantId) -> Fixture {
    Fixture::new(FixtureScope::Group(Uuid::nil()), a, b, Round::Group, 1).unwrap()
}

fn order(standings: &[score_tournament::Standing]) -> Vec<ParticipantId> {
    standings.iter().map(|s| s.participant_id).collect()
}

#[test]
fn three_player_round_robin() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let fixtures = vec![played(a, b, 3, 1), played(b, c, 2, 0), played(a, c, 1, 1)];
    let standings = compute_standings(&[c, b, a], &fixtures, &ScoringRules::default());

    assert_eq!(order(&standings), vec![a, b, c]);

    let sa = &standings[0];
    assert_eq!((sa.wins, sa.draws, sa.losses, sa.total_points), (1, 1, 0, 4));
    assert_eq!((sa.points_for, sa.points_against, sa.point_difference), (4, 2, 2));
    let sb = &standings[1];
    assert_eq!((sb.wins, sb.draws, sb.losses, sb.total_points), (1, 0, 1, 3));
    let sc = &standings[2];
    assert_eq!((sc.wins, sc.draws, sc.losses, sc.total_points), (0, 1, 1, 1));

    let ranks: Vec<u32> = standings.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn unfinished_fixtures_do_not_count() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let standings = compute_standings(&[a, b], &[pending(a, b)], &ScoringRules::default());
    assert!(standings.iter().all(|s| s.played == 0 && s.total_points == 0));
}

#[test]
fn equal_points_split_by_point_difference() {
    // a and b both win once; a by more.
    let (a, b, x, y) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let fixtures = vec![played(b, y, 2, 1), played(a, x, 5, 0)];
    let standings = compute_standings(&[b, a], &fixtures, &ScoringRules::default());
    assert_eq!(order(&standings), vec![a, b]);
}

#[test]
fn equal_difference_split_by_points_for() {
    let (a, b, x, y) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let fixtures = vec![played(b, y, 2, 1), played(a, x, 6, 5)];
    let standings = compute_standings(&[b, a], &fixtures, &ScoringRules::default());
    assert_eq!(order(&standings), vec![a, b]);
}

#[test]
fn equal_points_for_split_by_wins() {
    // a 1W 1L and b 2D: both 2 points, PD 0, PF 4.
    let rules = ScoringRules {
        win: 2,
        draw: 1,
        loss: 0,
    };
    let (a, b, x, y, z, w) = (
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
    );
    let fixtures = vec![
        played(b, z, 2, 2),
        played(b, w, 2, 2),
        played(a, x, 3, 0),
        played(a, y, 1, 4),
    ];
    let standings = compute_standings(&[b, a], &fixtures, &rules);
    assert_eq!(standings[0].total_points, standings[1].total_points);
    assert_eq!(standings[0].point_difference, standings[1].point_difference);
    assert_eq!(standings[0].points_for, standings[1].points_for);
    assert_eq!(order(&standings), vec![a, b]);
}

#[test]
fn full_tie_keeps_enumeration_order_with_distinct_ranks() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let fixtures = vec![played(a, b, 1, 1)];
    let standings = compute_standings(&[b, a], &fixtures, &ScoringRules::default());
    assert_eq!(order(&standings), vec![b, a]);
    assert_eq!(standings[0].rank, 1);
    assert_eq!(standings[1].rank, 2);
}
