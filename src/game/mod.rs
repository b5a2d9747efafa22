//! Quiz gameplay: question generation, the round state machine, the score
//! history store, and the browser front end that wires them together.
//!
//! Everything except `dom` is browser-free and runs under native `cargo test`.

pub mod dom;
pub mod history;
pub mod question;
pub mod round;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use history::{KeyValueStore, ScoreHistory};
use round::{Notice, Outcome, Round, RoundConfig};

/// One play session: a `Round` plus its collaborators (RNG, notices, score
/// history). The session is the only caller of the round's transition
/// functions and the only writer of the history store, so the final score is
/// recorded exactly once no matter how many stray ticks or answers arrive
/// after the round ends.
pub struct GameSession<S: KeyValueStore> {
    round: Round,
    history: ScoreHistory<S>,
    rng: SmallRng,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(store: S, config: RoundConfig) -> Self {
        let mut rng = SmallRng::from_entropy();
        let round = Round::start(config, &mut rng);
        let mut session = Self {
            round,
            history: ScoreHistory::new(store),
            rng,
            notices: Vec::new(),
        };
        session.notices.push(Notice::welcome());
        session
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Persisted recent scores, most recent first.
    pub fn history(&self) -> Vec<u32> {
        self.history.load()
    }

    /// One-second countdown tick. Ignored outside `AwaitingAnswer`.
    pub fn tick(&mut self) -> Outcome {
        let outcome = self.round.tick();
        if let Outcome::TimedOut { final_score } = outcome {
            self.notices.push(Notice::timed_out(final_score));
            self.history.record(final_score);
            self.round.finish();
        }
        outcome
    }

    /// Resolve an answer selection. Ignored outside `AwaitingAnswer`.
    pub fn submit_answer(&mut self, value: u32) -> Outcome {
        let outcome = self.round.submit_answer(value, &mut self.rng);
        match outcome {
            Outcome::Correct => self.notices.push(Notice::correct()),
            Outcome::LevelUp => self.notices.push(Notice::level_up(self.round.level())),
            Outcome::GameOver { final_score } => {
                self.notices.push(Notice::game_over());
                self.history.record(final_score);
                self.round.finish();
            }
            _ => {}
        }
        outcome
    }

    /// Leave the `LevelingUp` celebration and deal the next question.
    pub fn advance(&mut self) -> bool {
        self.round.advance(&mut self.rng)
    }

    /// Hand pending notifications to the presentation layer (fire-and-forget).
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::history::MemoryStore;
    use crate::game::round::{NoticeKind, Phase};

    fn session_with(config: RoundConfig) -> GameSession<MemoryStore> {
        GameSession::new(MemoryStore::default(), config)
    }

    #[test]
    fn five_correct_answers_level_up_once() {
        let mut s = session_with(RoundConfig::default());
        s.drain_notices();
        for _ in 0..4 {
            let answer = s.round().question().answer();
            assert_eq!(s.submit_answer(answer), Outcome::Correct);
        }
        let answer = s.round().question().answer();
        assert_eq!(s.submit_answer(answer), Outcome::LevelUp);
        assert_eq!(s.round().level(), 2);
        assert_eq!(s.round().phase(), Phase::LevelingUp);
        let level_ups = s
            .drain_notices()
            .iter()
            .filter(|n| n.kind == NoticeKind::LevelUp)
            .count();
        assert_eq!(level_ups, 1);
        assert!(s.advance());
        assert_eq!(s.round().phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn timeout_records_starting_score_once() {
        let config = RoundConfig {
            round_seconds: 3,
            ..RoundConfig::default()
        };
        let mut s = session_with(config);
        assert_eq!(s.tick(), Outcome::Continue);
        assert_eq!(s.tick(), Outcome::Continue);
        assert_eq!(s.tick(), Outcome::TimedOut { final_score: 0 });
        assert_eq!(s.round().phase(), Phase::Ended);
        assert_eq!(s.history(), vec![0]);
        // Stray ticks after the end change nothing.
        assert_eq!(s.tick(), Outcome::Ignored);
        assert_eq!(s.history(), vec![0]);
    }

    #[test]
    fn wrong_answer_ends_round_and_later_submissions_are_inert() {
        let mut s = session_with(RoundConfig::default());
        let answer = s.round().question().answer();
        assert_eq!(s.submit_answer(answer), Outcome::Correct);
        // An answer of 0 can never be correct (all options are positive).
        assert_eq!(s.submit_answer(0), Outcome::GameOver { final_score: 1 });
        assert_eq!(s.round().phase(), Phase::Ended);
        assert_eq!(s.history(), vec![1]);
        assert_eq!(s.submit_answer(0), Outcome::Ignored);
        assert_eq!(s.round().score(), 1);
        assert_eq!(s.history(), vec![1]);
    }

    #[test]
    fn welcome_notice_is_emitted_on_start() {
        let mut s = session_with(RoundConfig::default());
        let notices = s.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Welcome);
        assert!(s.drain_notices().is_empty());
    }
}
