// Integration tests (native) for the `balloon-math` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use balloon_math::{
    GameSession, MemoryStore, NoticeKind, Outcome, Phase, Round, RoundConfig, ScoreHistory,
};

fn session() -> GameSession<MemoryStore> {
    GameSession::new(MemoryStore::default(), RoundConfig::default())
}

// Basic dataset sanity check: the tutorial has its four steps with real text.
#[test]
fn tutorial_steps_are_complete() {
    assert_eq!(balloon_math::TUTORIAL_STEPS.len(), 4);
    for (title, body) in balloon_math::TUTORIAL_STEPS {
        assert!(!title.is_empty());
        assert!(!body.is_empty());
    }
}

#[test]
fn option_keys_are_distinct() {
    let keys = balloon_math::OPTION_KEYS;
    for (i, k) in keys.iter().enumerate() {
        assert!(!keys[..i].contains(k), "duplicate key binding '{k}'");
    }
}

#[test]
fn playing_five_correct_answers_reaches_level_two() {
    let mut s = session();
    s.drain_notices();
    let mut level_up_notices = 0;
    for _ in 0..5 {
        let answer = s.round().question().answer();
        let outcome = s.submit_answer(answer);
        assert!(matches!(outcome, Outcome::Correct | Outcome::LevelUp));
        level_up_notices += s
            .drain_notices()
            .iter()
            .filter(|n| n.kind == NoticeKind::LevelUp)
            .count();
        if s.round().phase() == Phase::LevelingUp {
            assert!(s.advance());
        }
    }
    assert_eq!(s.round().level(), 2);
    assert_eq!(s.round().score(), 5);
    assert_eq!(level_up_notices, 1);
}

#[test]
fn timing_out_records_exactly_one_score() {
    let config = RoundConfig {
        round_seconds: 3,
        ..RoundConfig::default()
    };
    let mut s = GameSession::new(MemoryStore::default(), config);
    for _ in 0..3 {
        s.tick();
    }
    assert_eq!(s.round().phase(), Phase::Ended);
    assert_eq!(s.history(), vec![0]);

    // Late input after the session ended must not record a second score or
    // mutate anything.
    assert_eq!(s.tick(), Outcome::Ignored);
    assert_eq!(s.submit_answer(1), Outcome::Ignored);
    assert_eq!(s.submit_answer(1), Outcome::Ignored);
    assert_eq!(s.round().score(), 0);
    assert_eq!(s.history(), vec![0]);
}

#[test]
fn game_over_keeps_score_at_the_moment_the_round_left_play() {
    let mut s = session();
    for _ in 0..3 {
        let answer = s.round().question().answer();
        s.submit_answer(answer);
    }
    let outcome = s.submit_answer(0);
    assert_eq!(outcome, Outcome::GameOver { final_score: 3 });
    assert_eq!(s.history(), vec![3]);
    // Second submission is a no-op; the recorded score stands.
    assert_eq!(s.submit_answer(0), Outcome::Ignored);
    assert_eq!(s.history(), vec![3]);
}

#[test]
fn history_holds_the_ten_most_recent_scores() {
    let mut history = ScoreHistory::new(MemoryStore::default());
    for score in 1..=11 {
        history.record(score);
    }
    let scores = history.load();
    assert_eq!(scores.len(), 10);
    assert_eq!(scores[0], 11, "newest score must come first");
    assert_eq!(scores[9], 2, "oldest surviving score");
    assert!(!scores.contains(&1), "first score should have been evicted");
}

#[test]
fn every_question_has_its_answer_among_the_options() {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    let mut rng = SmallRng::seed_from_u64(21);
    for _ in 0..100 {
        let round = Round::start(RoundConfig::default(), &mut rng);
        let answer = round.question().answer();
        let hits = round.options().iter().filter(|v| **v == answer).count();
        assert_eq!(hits, 1);
        assert!(round.options().iter().all(|v| *v > 0));
    }
}
