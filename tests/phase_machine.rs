//! Integration tests for the tournament phase machine, end to end over the in-memory store.

use rand::rngs::StdRng;
use rand::SeedableRng;
use score_tournament::{
    Board, DrawMode, FixtureFilter, FixtureScope, FixtureScore, FixtureStatus, InMemoryStore,
    NewTournament, Participant, ParticipantId, Round, TournamentEngine, TournamentError,
    TournamentId, TournamentPhase, TournamentStatus,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

struct Setup {
    engine: TournamentEngine<InMemoryStore>,
    tournament_id: TournamentId,
    players: Vec<ParticipantId>,
}

fn setup(group_config: Vec<usize>, n: usize) -> Setup {
    let store = InMemoryStore::new();
    let board = Board::new("Club night");
    store.insert_board(board.clone()).unwrap();
    let players: Vec<ParticipantId> = (0..n)
        .map(|i| {
            let p = Participant::new(board.id, format!("P{i}"));
            let id = p.id;
            store.insert_participant(p).unwrap();
            id
        })
        .collect();
    let engine = TournamentEngine::new(store);
    let t = engine
        .create_tournament(NewTournament {
            name: "Spring Cup".to_string(),
            board_id: board.id,
            group_config,
            scoring: None,
        })
        .unwrap();
    Setup {
        engine,
        tournament_id: t.id,
        players,
    }
}

fn score(a: u32, b: u32) -> FixtureScore {
    FixtureScore {
        player1_score: a,
        player2_score: b,
    }
}

/// Enroll everyone, draw randomly, generate the schedule.
fn into_group_stage(s: &Setup) {
    s.engine.add_participants(s.tournament_id, &s.players).unwrap();
    s.engine
        .draw_groups_with_rng(s.tournament_id, &DrawMode::Random, &mut StdRng::seed_from_u64(3))
        .unwrap();
    s.engine.generate_schedule(s.tournament_id).unwrap();
}

fn complete_group_stage(s: &Setup) {
    let open = s
        .engine
        .fixtures(&FixtureFilter::tournament(s.tournament_id).status(FixtureStatus::Pending))
        .unwrap();
    for f in open {
        s.engine
            .complete_fixture(s.tournament_id, f.id, score(3, 1))
            .unwrap();
    }
}

#[test]
fn add_participants_rejects_duplicates_and_other_boards() {
    let s = setup(vec![2, 2], 4);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players[..2]).unwrap();

    assert_eq!(
        s.engine.add_participants(id, &[s.players[2], s.players[0]]),
        Err(TournamentError::DuplicateParticipant(s.players[0]))
    );
    assert_eq!(
        s.engine.add_participants(id, &[s.players[3], s.players[3]]),
        Err(TournamentError::DuplicateParticipant(s.players[3]))
    );
    // Nothing from the rejected requests was enrolled.
    assert_eq!(s.engine.tournament(id).unwrap().participants.len(), 2);

    let other = Board::new("Other board");
    s.engine.store().insert_board(other.clone()).unwrap();
    let outsider = Participant::new(other.id, "Visitor");
    s.engine.store().insert_participant(outsider.clone()).unwrap();
    assert_eq!(
        s.engine.add_participants(id, &[outsider.id]),
        Err(TournamentError::ParticipantNotOnBoard(outsider.id))
    );
}

#[test]
fn remove_participant_only_in_setup() {
    let s = setup(vec![2, 2], 5);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players).unwrap();
    let t = s.engine.remove_participant(id, s.players[4]).unwrap();
    assert_eq!(t.participants.len(), 4);
    assert!(matches!(
        s.engine.remove_participant(id, s.players[4]),
        Err(TournamentError::NotFound { .. })
    ));

    s.engine.draw_groups(id, &DrawMode::Random).unwrap();
    assert_eq!(
        s.engine.remove_participant(id, s.players[0]),
        Err(TournamentError::InvalidPhase {
            expected: TournamentPhase::Setup,
            actual: TournamentPhase::GroupDraw,
        })
    );
    assert!(matches!(
        s.engine.add_participants(id, &[s.players[4]]),
        Err(TournamentError::InvalidPhase { .. })
    ));
}

#[test]
fn failed_draw_keeps_setup() {
    let s = setup(vec![6, 5], 11);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players).unwrap();

    let assignments: HashMap<_, _> = s
        .players
        .iter()
        .enumerate()
        .map(|(i, &p)| (p, if i < 7 { 0 } else { 1 }))
        .collect();
    assert!(matches!(
        s.engine.draw_groups(id, &DrawMode::Manual { assignments }),
        Err(TournamentError::GroupCapacityMismatch { .. })
    ));
    assert_eq!(s.engine.tournament(id).unwrap().phase, TournamentPhase::Setup);
    assert!(s.engine.groups(id).unwrap().is_empty());
}

#[test]
fn manual_draw_commits_groups() {
    let s = setup(vec![6, 5], 11);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players).unwrap();
    let assignments: HashMap<_, _> = s
        .players
        .iter()
        .enumerate()
        .map(|(i, &p)| (p, if i < 6 { 0 } else { 1 }))
        .collect();
    let groups = s
        .engine
        .draw_groups(id, &DrawMode::Manual { assignments })
        .unwrap();
    assert_eq!(groups[0].members, s.players[..6].to_vec());
    assert_eq!(groups[1].members, s.players[6..].to_vec());
    assert_eq!(s.engine.tournament(id).unwrap().phase, TournamentPhase::GroupDraw);
}

#[test]
fn second_draw_is_rejected_and_keeps_groups() {
    let s = setup(vec![2, 2], 4);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players).unwrap();
    let first = s.engine.draw_groups(id, &DrawMode::Random).unwrap();

    assert_eq!(
        s.engine.draw_groups(id, &DrawMode::Random),
        Err(TournamentError::InvalidPhase {
            expected: TournamentPhase::Setup,
            actual: TournamentPhase::GroupDraw,
        })
    );
    assert_eq!(s.engine.groups(id).unwrap(), first);
    assert_eq!(s.engine.tournament(id).unwrap().phase, TournamentPhase::GroupDraw);
}

#[test]
fn overflowing_group_plan_fails_draw_and_stays_writable() {
    let s = setup(vec![usize::MAX, 1], 4);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players).unwrap();

    assert!(matches!(
        s.engine.draw_groups(id, &DrawMode::Random),
        Err(TournamentError::InvalidConfiguration(_))
    ));
    assert_eq!(s.engine.tournament(id).unwrap().phase, TournamentPhase::Setup);

    s.engine.set_group_config(id, vec![2, 2]).unwrap();
    let groups = s.engine.draw_groups(id, &DrawMode::Random).unwrap();
    assert_eq!(groups.len(), 2);
}

#[test]
fn schedule_in_setup_is_rejected_without_fixtures() {
    let s = setup(vec![2, 2], 4);
    let id = s.tournament_id;
    assert_eq!(
        s.engine.generate_schedule(id),
        Err(TournamentError::InvalidPhase {
            expected: TournamentPhase::GroupDraw,
            actual: TournamentPhase::Setup,
        })
    );
    assert!(s.engine.fixtures(&FixtureFilter::tournament(id)).unwrap().is_empty());
}

#[test]
fn schedule_runs_once() {
    let s = setup(vec![3, 3], 6);
    into_group_stage(&s);
    let id = s.tournament_id;

    let t = s.engine.tournament(id).unwrap();
    assert_eq!(t.phase, TournamentPhase::GroupStage);
    assert_eq!(t.status, TournamentStatus::Active);

    assert!(matches!(
        s.engine.generate_schedule(id),
        Err(TournamentError::InvalidPhase { .. })
    ));
    assert_eq!(s.engine.fixtures(&FixtureFilter::tournament(id)).unwrap().len(), 6);
}

#[test]
fn concurrent_schedule_requests_create_one_schedule() {
    let s = setup(vec![4, 4], 8);
    let id = s.tournament_id;
    s.engine.add_participants(id, &s.players).unwrap();
    s.engine.draw_groups(id, &DrawMode::Random).unwrap();

    let engine = Arc::new(s.engine);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.generate_schedule(id).is_ok())
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(engine.fixtures(&FixtureFilter::tournament(id)).unwrap().len(), 12);
}

#[test]
fn advance_with_pending_fixture_is_rejected() {
    let s = setup(vec![2, 2], 4);
    into_group_stage(&s);
    let id = s.tournament_id;

    let fixtures = s.engine.fixtures(&FixtureFilter::tournament(id)).unwrap();
    for f in fixtures.iter().skip(1) {
        s.engine.complete_fixture(id, f.id, score(2, 0)).unwrap();
    }
    assert!(matches!(
        s.engine.advance_to_knockout(id),
        Err(TournamentError::IncompleteGroupStage { .. })
    ));
    let t = s.engine.tournament(id).unwrap();
    assert_eq!(t.phase, TournamentPhase::GroupStage);
    assert!(t.participants.iter().all(|p| p.seed.is_none()));
}

#[test]
fn completed_fixture_cannot_be_rescored() {
    let s = setup(vec![2, 2], 4);
    into_group_stage(&s);
    let id = s.tournament_id;
    let f = &s.engine.fixtures(&FixtureFilter::tournament(id)).unwrap()[0];

    let done = s.engine.complete_fixture(id, f.id, score(1, 1)).unwrap();
    assert_eq!(done.status, FixtureStatus::Completed);
    assert_eq!(done.winner_id, None);
    assert_eq!(
        s.engine.complete_fixture(id, f.id, score(2, 1)),
        Err(TournamentError::FixtureClosed(f.id))
    );
}

#[test]
fn end_to_end_two_groups_of_four() {
    let s = setup(vec![4, 4], 8);
    into_group_stage(&s);
    let id = s.tournament_id;

    let groups = s.engine.groups(id).unwrap();
    assert_eq!(groups.len(), 2);
    let group_fixtures = s
        .engine
        .fixtures(&FixtureFilter::tournament(id).round(Round::Group))
        .unwrap();
    assert_eq!(group_fixtures.len(), 12);
    for g in &groups {
        let own = s
            .engine
            .fixtures(&FixtureFilter::tournament(id).group(g.id))
            .unwrap();
        assert_eq!(own.len(), 6);
    }

    complete_group_stage(&s);
    let standings = s.engine.standings(id).unwrap();
    let semis = s.engine.advance_to_knockout(id).unwrap();
    assert!(matches!(
        s.engine.advance_to_knockout(id),
        Err(TournamentError::InvalidPhase { .. })
    ));

    assert_eq!(semis.len(), 2);
    let (a, b) = (&standings[0].standings, &standings[1].standings);
    assert_eq!(
        (semis[0].player1_id, semis[0].player2_id),
        (a[0].participant_id, b[1].participant_id)
    );
    assert_eq!(
        (semis[1].player1_id, semis[1].player2_id),
        (b[0].participant_id, a[1].participant_id)
    );
    assert!(semis.iter().all(|f| f.scope == FixtureScope::Tournament(id)));

    let t = s.engine.tournament(id).unwrap();
    assert_eq!(t.phase, TournamentPhase::Knockout);
    assert_eq!(t.seed_of(a[0].participant_id), Some(1));
    assert_eq!(t.seed_of(b[3].participant_id), Some(4));

    // Knockout: no level scores, final appears after both semis.
    assert!(matches!(
        s.engine.complete_fixture(id, semis[0].id, score(2, 2)),
        Err(TournamentError::InvalidScore(_))
    ));
    s.engine.complete_fixture(id, semis[0].id, score(3, 2)).unwrap();
    assert!(s.engine.bracket(id).unwrap().final_fixture.is_none());
    s.engine.complete_fixture(id, semis[1].id, score(0, 3)).unwrap();

    let bracket = s.engine.bracket(id).unwrap();
    let final_fixture = bracket.final_fixture.unwrap();
    assert_eq!(
        (final_fixture.player1_id, final_fixture.player2_id),
        (semis[0].player1_id, semis[1].player2_id)
    );

    s.engine.complete_fixture(id, final_fixture.id, score(1, 4)).unwrap();
    let t = s.engine.tournament(id).unwrap();
    assert_eq!(t.phase, TournamentPhase::Completed);
    assert_eq!(t.status, TournamentStatus::Finished);
    assert_eq!(
        s.engine.bracket(id).unwrap().champion,
        Some(semis[1].player2_id)
    );
    assert!(matches!(
        s.engine.set_group_config(id, vec![8]),
        Err(TournamentError::InvalidPhase { .. })
    ));
}

#[test]
fn knockout_needs_two_groups() {
    let s = setup(vec![2, 2, 2], 6);
    into_group_stage(&s);
    complete_group_stage(&s);
    assert!(matches!(
        s.engine.advance_to_knockout(s.tournament_id),
        Err(TournamentError::InvalidConfiguration(_))
    ));
}

#[test]
fn standings_cover_every_group_member() {
    let s = setup(vec![3, 2], 5);
    into_group_stage(&s);
    let standings = s.engine.standings(s.tournament_id).unwrap();
    let everyone: HashSet<_> = standings
        .iter()
        .flat_map(|g| g.standings.iter().map(|st| st.participant_id))
        .collect();
    assert_eq!(everyone, s.players.iter().copied().collect());
    assert_eq!(standings[0].group_name, "Group A");
}
