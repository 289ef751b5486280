mod export;
mod progress;
mod rules;

pub use progress::{percent, JudgeProgress, OverallProgress};
pub use rules::{blank_scores, weighted_total, ScoreViolation, MAX_RULE_SCORE};

pub(crate) use rules::sanitize_submission;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Competition, CompetitionId, JudgeId, JudgeScore, ParticipantId, ParticipantKind, ScoringRule,
    UNKNOWN_LABEL,
};
use super::resolution::{applicable_rules, DirectorySnapshot};

/// Whether an expected (judge, participant) pair has a submitted rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Completed,
    Pending,
}

impl ScoreStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreStatus::Completed => "completed",
            ScoreStatus::Pending => "pending",
        }
    }
}

/// One expected (judge, participant) pair with its reconciled rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub judge_id: JudgeId,
    pub judge_name: String,
    #[serde(rename = "appId")]
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub owner_name: String,
    pub facet: ParticipantKind,
    pub status: ScoreStatus,
    pub total_score: u8,
    pub scores: BTreeMap<String, u8>,
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Row filter used by the scoring table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScoringFilter {
    #[serde(default)]
    pub judge: Option<JudgeId>,
    #[serde(default)]
    pub status: Option<ScoreStatus>,
}

impl ScoringFilter {
    pub fn matches(&self, row: &ScoreRow) -> bool {
        self.judge
            .as_ref()
            .map(|judge| &row.judge_id == judge)
            .unwrap_or(true)
            && self.status.map(|status| row.status == status).unwrap_or(true)
    }
}

/// Read-time scoring table, recomputed from the current score records on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOverview {
    pub competition_id: CompetitionId,
    pub rows: Vec<ScoreRow>,
    pub judges: Vec<JudgeProgress>,
    pub overall: OverallProgress,
}

impl ScoringOverview {
    /// Narrow rows and judge progress to the filter. Overall progress is left untouched.
    pub fn filtered(mut self, filter: &ScoringFilter) -> Self {
        self.rows.retain(|row| filter.matches(row));
        if let Some(judge) = &filter.judge {
            self.judges.retain(|progress| &progress.judge_id == judge);
        }
        self
    }

    pub fn completed_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status == ScoreStatus::Completed)
            .count()
    }
}

/// Stateless engine reconciling submitted scores against a competition's expected pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn aggregate(
        &self,
        competition: &Competition,
        scores: &[JudgeScore],
        directory: &DirectorySnapshot,
    ) -> ScoringOverview {
        let submitted: HashMap<(&JudgeId, &ParticipantId), &JudgeScore> = scores
            .iter()
            .map(|score| ((&score.judge_id, &score.participant_id), score))
            .collect();

        let mut rows = Vec::new();
        let mut tally = progress::JudgeTally::default();

        for facet in competition.facets() {
            let rules = applicable_rules(competition, facet);

            for judge_id in competition.judge_ids_for(facet) {
                let judge_name = directory.judge_name(judge_id);

                for participant_id in competition.participants_for(facet) {
                    let (participant_name, owner_name) = directory
                        .participant(facet, participant_id)
                        .map(|participant| {
                            (
                                participant.display_name().to_string(),
                                participant.owner_name().to_string(),
                            )
                        })
                        .unwrap_or_else(|| {
                            (UNKNOWN_LABEL.to_string(), UNKNOWN_LABEL.to_string())
                        });

                    // Records are keyed by pair only, so a rubric lacking any of this
                    // facet's rule names belongs elsewhere and leaves the pair pending.
                    let score = submitted
                        .get(&(judge_id, participant_id))
                        .filter(|score| covers_rules(&rules, score));
                    let row = match score {
                        Some(score) => ScoreRow {
                            judge_id: judge_id.clone(),
                            judge_name: judge_name.clone(),
                            participant_id: participant_id.clone(),
                            participant_name,
                            owner_name,
                            facet,
                            status: ScoreStatus::Completed,
                            total_score: weighted_total(&rules, &score.scores),
                            scores: score.scores.clone(),
                            comments: score.comments.clone(),
                            submitted_at: Some(score.submitted_at),
                        },
                        None => ScoreRow {
                            judge_id: judge_id.clone(),
                            judge_name: judge_name.clone(),
                            participant_id: participant_id.clone(),
                            participant_name,
                            owner_name,
                            facet,
                            status: ScoreStatus::Pending,
                            total_score: 0,
                            scores: blank_scores(&rules),
                            comments: String::new(),
                            submitted_at: None,
                        },
                    };

                    tally.record(&row);
                    rows.push(row);
                }
            }
        }

        let overall = OverallProgress::new(
            rows.iter()
                .filter(|row| row.status == ScoreStatus::Completed)
                .count(),
            rows.len(),
        );

        ScoringOverview {
            competition_id: competition.id.clone(),
            rows,
            judges: tally.into_progress(),
            overall,
        }
    }
}

fn covers_rules(rules: &[ScoringRule], score: &JudgeScore) -> bool {
    rules.iter().all(|rule| score.scores.contains_key(&rule.name))
}
