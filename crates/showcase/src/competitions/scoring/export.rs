use std::io::Write;

use super::ScoringOverview;

const HEADERS: [&str; 9] = [
    "judge_id",
    "judge_name",
    "participant_id",
    "participant_name",
    "facet",
    "status",
    "total_score",
    "submitted_at",
    "comments",
];

impl ScoringOverview {
    /// Write the scoring table as CSV, one line per expected pair.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(HEADERS)?;

        for row in &self.rows {
            let total = row.total_score.to_string();
            let submitted_at = row
                .submitted_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default();
            csv.write_record([
                row.judge_id.0.as_str(),
                row.judge_name.as_str(),
                row.participant_id.0.as_str(),
                row.participant_name.as_str(),
                row.facet.label(),
                row.status.label(),
                total.as_str(),
                submitted_at.as_str(),
                row.comments.as_str(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
