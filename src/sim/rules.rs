//! Arithmetic rules: evaluation, per-level rotation and display text

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Rule;
use crate::consts::*;

/// Result of collecting one number under the active rule.
///
/// Every variant carries the `collected` sequence that should replace the
/// current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Accepted, rule not yet satisfied
    Progress { collected: Vec<u32>, score_delta: i32 },
    /// Accepted and the rule is satisfied
    LevelComplete { collected: Vec<u32>, score_delta: i32 },
    /// Rejected: costs points and a life
    Penalty {
        collected: Vec<u32>,
        score_delta: i32,
        lives_lost: u8,
    },
}

impl Outcome {
    pub fn score_delta(&self) -> i32 {
        match self {
            Outcome::Progress { score_delta, .. }
            | Outcome::LevelComplete { score_delta, .. }
            | Outcome::Penalty { score_delta, .. } => *score_delta,
        }
    }

    pub fn collected(&self) -> &[u32] {
        match self {
            Outcome::Progress { collected, .. }
            | Outcome::LevelComplete { collected, .. }
            | Outcome::Penalty { collected, .. } => collected,
        }
    }

    pub fn lives_lost(&self) -> u8 {
        match self {
            Outcome::Penalty { lives_lost, .. } => *lives_lost,
            _ => 0,
        }
    }

    /// Whether the collected number is used up (its cell is cleared)
    pub fn consumes(&self) -> bool {
        !matches!(self, Outcome::Penalty { .. })
    }

    fn penalty(collected: Vec<u32>) -> Self {
        Outcome::Penalty {
            collected,
            score_delta: PENALTY_POINTS,
            lives_lost: 1,
        }
    }
}

/// Judge `value` against `rule` given what has been collected so far.
pub fn evaluate(rule: &Rule, collected: &[u32], value: u32) -> Outcome {
    match *rule {
        Rule::Addition { target } => {
            let mut next = collected.to_vec();
            next.push(value);
            let sum: u32 = next.iter().sum();
            if sum == target {
                Outcome::LevelComplete {
                    collected: next,
                    score_delta: LEVEL_COMPLETE_BONUS,
                }
            } else if sum > target {
                // Overshoot starts the sum over
                Outcome::penalty(Vec::new())
            } else {
                Outcome::Progress {
                    collected: next,
                    score_delta: ADDITION_PROGRESS_POINTS,
                }
            }
        }
        Rule::Subtraction { secondary, target } => {
            // Each pick stands alone; nothing accumulates
            if secondary.checked_sub(target) == Some(value) {
                Outcome::LevelComplete {
                    collected: vec![value],
                    score_delta: LEVEL_COMPLETE_BONUS,
                }
            } else {
                Outcome::penalty(collected.to_vec())
            }
        }
        Rule::Multiples { target } => {
            if !is_valid_multiple(target, value) {
                return Outcome::penalty(collected.to_vec());
            }
            let mut next = collected.to_vec();
            next.push(value);
            let found = next.iter().filter(|&&n| is_valid_multiple(target, n)).count();
            if found >= MULTIPLES_REQUIRED {
                Outcome::LevelComplete {
                    collected: next,
                    score_delta: LEVEL_COMPLETE_BONUS,
                }
            } else {
                Outcome::Progress {
                    collected: next,
                    score_delta: MULTIPLE_PROGRESS_POINTS,
                }
            }
        }
    }
}

fn is_valid_multiple(target: u32, value: u32) -> bool {
    target != 0 && value % target == 0 && value <= MULTIPLES_CEILING
}

/// Whether collecting `value` right now would be accepted (used for the
/// math-boost highlight)
pub fn accepts(rule: &Rule, collected: &[u32], value: u32) -> bool {
    evaluate(rule, collected, value).consumes()
}

/// Rule for `level`, rotating addition -> subtraction -> multiples every
/// three levels with targets growing each cycle.
pub fn rule_for_level<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Rule {
    let cycle = level / 3;
    match level % 3 {
        1 => Rule::Addition {
            target: 10 + 5 * cycle,
        },
        2 => {
            let secondary = 15 + 5 * cycle;
            Rule::Subtraction {
                secondary,
                target: rng.random_range(5..secondary),
            }
        }
        _ => Rule::Multiples {
            target: rng.random_range(2..=7),
        },
    }
}

impl Rule {
    /// Upper bound (inclusive) for numbers placed on the board
    pub fn max_board_value(&self) -> u32 {
        match *self {
            Rule::Addition { .. } => 9,
            Rule::Subtraction { secondary, .. } => secondary.max(1),
            Rule::Multiples { .. } => MULTIPLES_CEILING,
        }
    }

    pub fn intro_title(&self) -> &'static str {
        match self {
            Rule::Addition { .. } => "Addition Challenge!",
            Rule::Subtraction { .. } => "Subtraction Mission!",
            Rule::Multiples { .. } => "Multiples Mayhem!",
        }
    }

    /// One-line statement of the rule shown above the board
    pub fn description(&self) -> String {
        match *self {
            Rule::Addition { target } => format!("Collect numbers that add up to {target}"),
            Rule::Subtraction { secondary, target } => {
                format!("Find the number that makes {secondary} - ? = {target}")
            }
            Rule::Multiples { target } => {
                format!("Collect {MULTIPLES_REQUIRED} multiples of {target} ({MULTIPLES_CEILING} and under)")
            }
        }
    }

    /// Progress toward the rule for the given collected numbers
    pub fn progress(&self, collected: &[u32]) -> String {
        match *self {
            Rule::Addition { target } => {
                let sum: u32 = collected.iter().sum();
                format!("Sum: {sum} / {target}")
            }
            Rule::Subtraction { .. } => match collected.first() {
                Some(n) => format!("Selected: {n}"),
                None => "Select a number".to_string(),
            },
            Rule::Multiples { target } => {
                let found = collected
                    .iter()
                    .filter(|&&n| is_valid_multiple(target, n))
                    .count();
                format!("Multiples: {found} / {MULTIPLES_REQUIRED}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn collect_all(rule: &Rule, values: &[u32]) -> (Vec<u32>, Vec<Outcome>) {
        let mut collected = Vec::new();
        let mut outcomes = Vec::new();
        for &v in values {
            let outcome = evaluate(rule, &collected, v);
            collected = outcome.collected().to_vec();
            outcomes.push(outcome);
        }
        (collected, outcomes)
    }

    #[test]
    fn test_addition_exact_sum_completes() {
        let rule = Rule::Addition { target: 10 };
        let (collected, outcomes) = collect_all(&rule, &[4, 6]);
        assert_eq!(
            outcomes[0],
            Outcome::Progress {
                collected: vec![4],
                score_delta: 10
            }
        );
        assert_eq!(
            outcomes[1],
            Outcome::LevelComplete {
                collected: vec![4, 6],
                score_delta: 100
            }
        );
        assert_eq!(collected, vec![4, 6]);
        let total: i32 = outcomes.iter().map(Outcome::score_delta).sum();
        assert_eq!(total, 110);
    }

    #[test]
    fn test_addition_overshoot_resets() {
        let rule = Rule::Addition { target: 10 };
        let (collected, outcomes) = collect_all(&rule, &[7, 5]);
        assert_eq!(
            outcomes[1],
            Outcome::Penalty {
                collected: vec![],
                score_delta: -5,
                lives_lost: 1
            }
        );
        assert!(collected.is_empty());
    }

    #[test]
    fn test_subtraction_answer() {
        let rule = Rule::Subtraction {
            secondary: 15,
            target: 8,
        };
        assert_eq!(
            evaluate(&rule, &[], 7),
            Outcome::LevelComplete {
                collected: vec![7],
                score_delta: 100
            }
        );
        for wrong in [1, 6, 8, 15] {
            let outcome = evaluate(&rule, &[], wrong);
            assert_eq!(outcome.lives_lost(), 1);
            assert_eq!(outcome.score_delta(), -5);
            assert!(outcome.collected().is_empty());
        }
    }

    #[test]
    fn test_multiples_three_completes() {
        let rule = Rule::Multiples { target: 3 };
        let (_, outcomes) = collect_all(&rule, &[3, 6, 9]);
        assert_eq!(outcomes[0].score_delta(), 20);
        assert_eq!(outcomes[1].score_delta(), 20);
        assert!(matches!(outcomes[2], Outcome::LevelComplete { score_delta: 100, .. }));
    }

    #[test]
    fn test_multiples_rejects_non_multiple_and_over_ceiling() {
        let rule = Rule::Multiples { target: 3 };
        let five = evaluate(&rule, &[3], 5);
        assert_eq!(
            five,
            Outcome::Penalty {
                collected: vec![3],
                score_delta: -5,
                lives_lost: 1
            }
        );
        let fifteen = evaluate(&rule, &[3], 15);
        assert_eq!(fifteen.lives_lost(), 1);
        assert_eq!(fifteen.collected(), &[3]);
    }

    #[test]
    fn test_accepts_matches_evaluate() {
        let rule = Rule::Addition { target: 10 };
        assert!(accepts(&rule, &[4], 6));
        assert!(accepts(&rule, &[4], 5));
        assert!(!accepts(&rule, &[4], 7));
    }

    #[test]
    fn test_rule_rotation() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(rule_for_level(1, &mut rng), Rule::Addition { target: 10 });
        assert_eq!(rule_for_level(4, &mut rng), Rule::Addition { target: 15 });
        assert_eq!(rule_for_level(7, &mut rng), Rule::Addition { target: 20 });

        for _ in 0..200 {
            match rule_for_level(2, &mut rng) {
                Rule::Subtraction { secondary, target } => {
                    assert_eq!(secondary, 15);
                    assert!((5..15).contains(&target));
                }
                other => panic!("expected subtraction, got {other:?}"),
            }
            match rule_for_level(5, &mut rng) {
                Rule::Subtraction { secondary, target } => {
                    assert_eq!(secondary, 20);
                    assert!((5..20).contains(&target));
                }
                other => panic!("expected subtraction, got {other:?}"),
            }
            match rule_for_level(3, &mut rng) {
                Rule::Multiples { target } => assert!((2..=7).contains(&target)),
                other => panic!("expected multiples, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_text() {
        let add = Rule::Addition { target: 10 };
        assert_eq!(add.description(), "Collect numbers that add up to 10");
        assert_eq!(add.progress(&[4, 3]), "Sum: 7 / 10");

        let sub = Rule::Subtraction {
            secondary: 15,
            target: 8,
        };
        assert_eq!(sub.description(), "Find the number that makes 15 - ? = 8");
        assert_eq!(sub.progress(&[]), "Select a number");
        assert_eq!(sub.progress(&[7]), "Selected: 7");

        let mul = Rule::Multiples { target: 4 };
        assert_eq!(mul.description(), "Collect 3 multiples of 4 (12 and under)");
        assert_eq!(mul.progress(&[4, 8]), "Multiples: 2 / 3");
        assert_eq!(mul.intro_title(), "Multiples Mayhem!");
    }
}
