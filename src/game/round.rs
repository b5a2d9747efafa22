//! Round state machine: score, level, countdown and phase transitions.

use rand::Rng;

use super::question::{self, GeneratorConfig, Question};

/// Discrete state of one round. `Resolving` and `LevelingUp` are the transient
/// phases between an accepted answer and the next question; `TimedOut` and
/// `GameOver` mark how a round ended before the session seals it as `Ended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    AwaitingAnswer,
    Resolving,
    LevelingUp,
    TimedOut,
    GameOver,
    Ended,
}

/// Result of one transition call. `Ignored` means the call arrived out of
/// phase and changed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Continue,
    Correct,
    LevelUp,
    TimedOut { final_score: u32 },
    GameOver { final_score: u32 },
}

/// Round tuning constants. Exposed as configuration rather than buried in the
/// transition functions.
#[derive(Clone, Copy, Debug)]
pub struct RoundConfig {
    /// Countdown budget per question, in seconds.
    pub round_seconds: u32,
    /// Correct answers needed per level.
    pub level_up_threshold: u32,
    pub generator: GeneratorConfig,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_seconds: 10,
            level_up_threshold: 5,
            generator: GeneratorConfig::default(),
        }
    }
}

/// State of the active round. Created by `start`, mutated only through the
/// transition functions below, inert once the phase leaves `AwaitingAnswer`
/// for one of the terminal phases.
pub struct Round {
    score: u32,
    level: u32,
    time_remaining: u32,
    phase: Phase,
    question: Question,
    options: Vec<u32>,
    config: RoundConfig,
}

impl Round {
    pub fn start(config: RoundConfig, rng: &mut impl Rng) -> Self {
        let question = question::generate(1, &config.generator, rng);
        let options = question::build_answer_set(&question, &config.generator, rng);
        Self {
            score: 0,
            level: 1,
            time_remaining: config.round_seconds,
            phase: Phase::AwaitingAnswer,
            question,
            options,
            config,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Current answer options in display order. Usually 4 entries; may be
    /// shorter on distractor shortfall (see `question::generate_distractors`).
    pub fn options(&self) -> &[u32] {
        &self.options
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::TimedOut | Phase::GameOver | Phase::Ended)
    }

    /// One-second countdown tick. Only meaningful while awaiting an answer;
    /// anything else is a no-op so stray timer callbacks cannot double-end a
    /// round.
    pub fn tick(&mut self) -> Outcome {
        if self.phase != Phase::AwaitingAnswer {
            return Outcome::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.phase = Phase::TimedOut;
            return Outcome::TimedOut {
                final_score: self.score,
            };
        }
        Outcome::Continue
    }

    /// Resolve a submitted answer value against the current question.
    pub fn submit_answer(&mut self, value: u32, rng: &mut impl Rng) -> Outcome {
        if self.phase != Phase::AwaitingAnswer {
            return Outcome::Ignored;
        }
        self.phase = Phase::Resolving;
        if value == self.question.answer() {
            self.score += 1;
            if self.score % self.config.level_up_threshold == 0 {
                self.level += 1;
                self.phase = Phase::LevelingUp;
                Outcome::LevelUp
            } else {
                self.next_question(rng);
                Outcome::Correct
            }
        } else {
            self.phase = Phase::GameOver;
            Outcome::GameOver {
                final_score: self.score,
            }
        }
    }

    /// Leave `LevelingUp` (after the celebration overlay) and deal the next
    /// question. Returns false when called in any other phase.
    pub fn advance(&mut self, rng: &mut impl Rng) -> bool {
        if self.phase != Phase::LevelingUp {
            return false;
        }
        self.next_question(rng);
        true
    }

    /// Seal a finished round. Called once by the session after the final
    /// score has been handed to the history store.
    pub fn finish(&mut self) {
        if matches!(self.phase, Phase::TimedOut | Phase::GameOver) {
            self.phase = Phase::Ended;
        }
    }

    fn next_question(&mut self, rng: &mut impl Rng) {
        self.question = question::generate(self.level, &self.config.generator, rng);
        self.options = question::build_answer_set(&self.question, &self.config.generator, rng);
        self.time_remaining = self.config.round_seconds;
        self.phase = Phase::AwaitingAnswer;
    }
}

// -----------------------------------------------------------------------------
// Notifications
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Welcome,
    Correct,
    LevelUp,
    TimeOut,
    GameOver,
}

/// Fire-and-forget message for the presentation layer (toast / overlay text).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub body: String,
}

impl Notice {
    pub fn welcome() -> Self {
        Self {
            kind: NoticeKind::Welcome,
            title: "¡Bienvenido!",
            body: "Usa las teclas A, S, D, F para seleccionar tu respuesta".to_owned(),
        }
    }

    pub fn correct() -> Self {
        Self {
            kind: NoticeKind::Correct,
            title: "¡Correcto!",
            body: "¡Muy bien! Sigamos adelante.".to_owned(),
        }
    }

    pub fn level_up(level: u32) -> Self {
        Self {
            kind: NoticeKind::LevelUp,
            title: "¡Subiste de nivel!",
            body: format!("¡Ahora estás en el nivel {level}!"),
        }
    }

    pub fn timed_out(final_score: u32) -> Self {
        Self {
            kind: NoticeKind::TimeOut,
            title: "¡Se acabó el tiempo!",
            body: format!("Conseguiste {final_score} estrellas."),
        }
    }

    pub fn game_over() -> Self {
        Self {
            kind: NoticeKind::GameOver,
            title: "¡Inténtalo de nuevo!",
            body: "No te rindas, ¡tú puedes!".to_owned(),
        }
    }
}
