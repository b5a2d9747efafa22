//! Question, distractor and answer-set generation.

use rand::Rng;
use rand::seq::SliceRandom;

/// Arithmetic operation of a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

/// A single quiz question. Division questions are built so that
/// `operand1 % operand2 == 0` and `operand2 >= 1`; `answer()` is exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Question {
    pub operand1: u32,
    pub operand2: u32,
    pub operation: Operation,
}

impl Question {
    pub fn answer(&self) -> u32 {
        match self.operation {
            Operation::Multiply => self.operand1 * self.operand2,
            Operation::Divide => self.operand1 / self.operand2,
        }
    }

    /// Prompt line shown to the player.
    pub fn prompt(&self) -> String {
        format!(
            "¿Cuánto es {} {} {}?",
            self.operand1,
            self.operation.symbol(),
            self.operand2
        )
    }
}

/// Difficulty tuning knobs for question and distractor generation.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    /// Base operand at level 1.
    pub min_base: u32,
    /// Base operand ceiling at high levels.
    pub max_base: u32,
    /// Levels per base increment.
    pub level_step: u32,
    /// Probability of a Multiply question (otherwise Divide).
    pub multiply_weight: f64,
    /// Second operand range for Multiply is `1..=multiplier_max`.
    pub multiplier_max: u32,
    /// Divisor range for Divide is `1..=divisor_max`.
    pub divisor_max: u32,
    /// Sampling attempts per distractor pass before widening / giving up.
    pub distractor_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_base: 5,
            max_base: 12,
            level_step: 2,
            multiply_weight: 0.8,
            multiplier_max: 10,
            divisor_max: 5,
            distractor_attempts: 10,
        }
    }
}

/// Difficulty-scaled base operand: a non-decreasing step function of `level`,
/// capped at `max_base`.
pub fn difficulty_base(level: u32, config: &GeneratorConfig) -> u32 {
    (level.saturating_sub(1) / config.level_step.max(1) + config.min_base).min(config.max_base)
}

/// Generate one question for the given level.
pub fn generate(level: u32, config: &GeneratorConfig, rng: &mut impl Rng) -> Question {
    let base = difficulty_base(level, config);
    if rng.gen_bool(config.multiply_weight) {
        Question {
            operand1: rng.gen_range(1..=base),
            operand2: rng.gen_range(1..=config.multiplier_max),
            operation: Operation::Multiply,
        }
    } else {
        // Build the dividend from the divisor so the division is always exact
        // and the divisor is never zero.
        let operand2 = rng.gen_range(1..=config.divisor_max);
        Question {
            operand1: base * operand2,
            operand2,
            operation: Operation::Divide,
        }
    }
}

/// Sample up to `count` wrong answers: positive, distinct, never equal to
/// `answer`. Candidates are drawn uniformly from `1..=max(2*answer, answer+3)`;
/// after `distractor_attempts` misses the range is doubled for one more pass.
/// If both passes fall short, the smaller set is returned - callers must cope
/// with fewer than `count` distractors (only plausible at tiny answers).
pub fn generate_distractors(
    answer: u32,
    count: usize,
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> Vec<u32> {
    let mut found: Vec<u32> = Vec::with_capacity(count);
    let mut upper = (2 * answer).max(answer + 3);
    for _pass in 0..2 {
        for _ in 0..config.distractor_attempts {
            if found.len() == count {
                return found;
            }
            let candidate = rng.gen_range(1..=upper);
            if candidate != answer && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
        upper *= 2;
    }
    found
}

/// Build the shuffled answer set for a question: 3 distractors plus the
/// correct answer in a uniformly random order (Fisher-Yates via `rand`).
pub fn build_answer_set(question: &Question, config: &GeneratorConfig, rng: &mut impl Rng) -> Vec<u32> {
    let answer = question.answer();
    let mut options = generate_distractors(answer, 3, config, rng);
    options.push(answer);
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn difficulty_base_is_monotone_and_capped() {
        let config = GeneratorConfig::default();
        let mut previous = 0;
        for level in 1..=40 {
            let base = difficulty_base(level, &config);
            assert!(base >= previous, "base decreased at level {level}");
            assert!(base <= config.max_base);
            previous = base;
        }
        assert_eq!(difficulty_base(1, &config), config.min_base);
        assert_eq!(difficulty_base(100, &config), config.max_base);
    }

    #[test]
    fn generated_questions_have_positive_exact_answers() {
        let config = GeneratorConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        for level in 1..=30 {
            for _ in 0..50 {
                let q = generate(level, &config, &mut rng);
                assert!(q.answer() > 0, "non-positive answer for {q:?}");
                if q.operation == Operation::Divide {
                    assert!(q.operand2 >= 1);
                    assert_eq!(q.operand1 % q.operand2, 0, "inexact division in {q:?}");
                }
            }
        }
    }

    #[test]
    fn example_two_times_seven() {
        let q = Question {
            operand1: 2,
            operand2: 7,
            operation: Operation::Multiply,
        };
        assert_eq!(q.answer(), 14);
        assert_eq!(q.prompt(), "¿Cuánto es 2 × 7?");

        let mut rng = SmallRng::seed_from_u64(1);
        let distractors = generate_distractors(14, 3, &GeneratorConfig::default(), &mut rng);
        assert_eq!(distractors.len(), 3);
        for (i, d) in distractors.iter().enumerate() {
            assert!(*d > 0);
            assert_ne!(*d, 14);
            assert!(!distractors[..i].contains(d), "duplicate distractor {d}");
        }
    }

    #[test]
    fn distractor_shortfall_is_bounded_not_fatal() {
        let config = GeneratorConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        // answer = 1 samples from 1..=4 first and 1..=8 on the widened pass.
        let distractors = generate_distractors(1, 3, &config, &mut rng);
        assert!(distractors.len() <= 3);
        assert!(!distractors.is_empty());
        for (i, d) in distractors.iter().enumerate() {
            assert!(*d > 0);
            assert_ne!(*d, 1);
            assert!(!distractors[..i].contains(d));
        }
    }

    #[test]
    fn answer_set_contains_answer_exactly_once() {
        let config = GeneratorConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        for level in 1..=20 {
            let q = generate(level, &config, &mut rng);
            let options = build_answer_set(&q, &config, &mut rng);
            assert!(options.len() <= 4 && options.len() >= 2);
            let hits = options.iter().filter(|v| **v == q.answer()).count();
            assert_eq!(hits, 1, "answer appears {hits} times in {options:?}");
            for (i, v) in options.iter().enumerate() {
                assert!(*v > 0);
                assert!(!options[..i].contains(v), "duplicate option {v}");
            }
        }
    }
}
