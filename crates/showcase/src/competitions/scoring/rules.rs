use std::collections::BTreeMap;

use super::super::domain::{JudgeId, ParticipantId, ScoreSubmission, ScoringRule};

/// Highest value a judge may give for a single rule.
pub const MAX_RULE_SCORE: u8 = 10;

/// Rubric submission errors. Nothing is written when one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreViolation {
    #[error("participant {0:?} is not registered in this competition")]
    ParticipantNotRegistered(ParticipantId),
    #[error("judge {judge:?} is not assigned to score participant {participant:?}")]
    PairNotExpected {
        judge: JudgeId,
        participant: ParticipantId,
    },
    #[error("score every rule before submitting (missing {0})")]
    MissingRuleScore(String),
    #[error("score for {rule} must be between 1 and 10 (found {score})")]
    OutOfRange { rule: String, score: u8 },
    #[error("comments are required")]
    BlankComments,
}

/// Weighted rubric total: `round(Σ score·weight / Σ weight)` over the rule set, or the rounded
/// mean of the entered scores when no rules apply. Empty inputs yield 0.
pub fn weighted_total(rules: &[ScoringRule], scores: &BTreeMap<String, u8>) -> u8 {
    if rules.is_empty() {
        if scores.is_empty() {
            return 0;
        }
        let sum: u64 = scores.values().map(|score| u64::from(*score)).sum();
        return round_ratio(sum, scores.len() as u64);
    }

    let weight_sum: u64 = rules.iter().map(|rule| u64::from(rule.weight)).sum();
    if weight_sum == 0 {
        return 0;
    }

    let weighted: u64 = rules
        .iter()
        .map(|rule| {
            let score = scores.get(&rule.name).copied().unwrap_or(0);
            u64::from(score) * u64::from(rule.weight)
        })
        .sum();

    round_ratio(weighted, weight_sum)
}

fn round_ratio(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 0;
    }
    let value = (numerator as f64 / denominator as f64).round();
    value.min(f64::from(u8::MAX)) as u8
}

/// Score map with every rule seeded at zero, the editable starting point for pending pairs.
pub fn blank_scores(rules: &[ScoringRule]) -> BTreeMap<String, u8> {
    rules.iter().map(|rule| (rule.name.clone(), 0)).collect()
}

/// Check a submission against the rules in force and keep only the rubric keys.
pub(crate) fn sanitize_submission(
    rules: &[ScoringRule],
    submission: &ScoreSubmission,
) -> Result<BTreeMap<String, u8>, ScoreViolation> {
    let mut scores = BTreeMap::new();

    for rule in rules {
        let score = submission.scores.get(&rule.name).copied().unwrap_or(0);
        if score == 0 {
            return Err(ScoreViolation::MissingRuleScore(rule.name.clone()));
        }
        if score > MAX_RULE_SCORE {
            return Err(ScoreViolation::OutOfRange {
                rule: rule.name.clone(),
                score,
            });
        }
        scores.insert(rule.name.clone(), score);
    }

    if submission.comments.trim().is_empty() {
        return Err(ScoreViolation::BlankComments);
    }

    Ok(scores)
}
