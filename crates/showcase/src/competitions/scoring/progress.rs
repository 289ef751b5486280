use serde::Serialize;

use super::super::domain::JudgeId;
use super::{ScoreRow, ScoreStatus};

/// `round(100 * completed / total)`, 0 when nothing is expected.
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let value = (completed as f64 * 100.0 / total as f64).round();
    value.clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeProgress {
    pub judge_id: JudgeId,
    pub judge_name: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl OverallProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percent: percent(completed, total),
        }
    }
}

/// Accumulates per-judge counts in first-seen order. A judge sitting on both facets of a mixed
/// competition is counted once with both facets' pairs.
#[derive(Debug, Default)]
pub(super) struct JudgeTally {
    entries: Vec<JudgeProgress>,
}

impl JudgeTally {
    pub(super) fn record(&mut self, row: &ScoreRow) {
        let index = match self
            .entries
            .iter()
            .position(|entry| entry.judge_id == row.judge_id)
        {
            Some(index) => index,
            None => {
                self.entries.push(JudgeProgress {
                    judge_id: row.judge_id.clone(),
                    judge_name: row.judge_name.clone(),
                    completed: 0,
                    total: 0,
                    percent: 0,
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        entry.total += 1;
        if row.status == ScoreStatus::Completed {
            entry.completed += 1;
        }
    }

    pub(super) fn into_progress(self) -> Vec<JudgeProgress> {
        self.entries
            .into_iter()
            .map(|mut entry| {
                entry.percent = percent(entry.completed, entry.total);
                entry
            })
            .collect()
    }
}
