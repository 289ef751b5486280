use super::common::*;
use crate::competitions::domain::{JudgeId, ParticipantId, ParticipantKind, UNKNOWN_LABEL};
use crate::competitions::repository::ScoreRepository;
use crate::competitions::scoring::{ScoreStatus, ScoreViolation, ScoringFilter};
use crate::competitions::service::CompetitionServiceError;

#[test]
fn aggregation_produces_one_row_per_judge_and_participant() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(
            &[&seeded.judges[0], &seeded.judges[1]],
            &[&seeded.apps[0], &seeded.apps[1]],
        ))
        .expect("created");

    seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[0], &default_individual_scores(8)),
        )
        .expect("score accepted");

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");

    assert_eq!(overview.rows.len(), 4);
    let completed = overview.completed_rows();
    let pending = overview
        .rows
        .iter()
        .filter(|row| row.status == ScoreStatus::Pending)
        .count();
    assert_eq!(completed, 1);
    assert_eq!(completed + pending, 4);
    assert_eq!(overview.overall.percent, 25);

    let judge_progress = &overview.judges[0];
    assert_eq!(judge_progress.judge_id, seeded.judges[0]);
    assert_eq!((judge_progress.completed, judge_progress.total), (1, 2));
    assert_eq!(judge_progress.percent, 50);
}

#[test]
fn pending_rows_carry_a_zeroed_rubric() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");
    let row = &overview.rows[0];

    assert_eq!(row.status, ScoreStatus::Pending);
    assert_eq!(row.total_score, 0);
    assert_eq!(row.scores.len(), 5);
    assert!(row.scores.values().all(|score| *score == 0));
    assert!(row.submitted_at.is_none());
    assert_eq!(row.judge_name, "Ada");
    assert_eq!(row.participant_name, "Writer Bot");
}

#[test]
fn weighted_total_follows_configured_rules() {
    let seeded = seeded();
    let mut draft = individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]);
    draft.rules = vec![rule("A", 60), rule("B", 40)];
    let competition = seeded.service.create_competition(draft).expect("created");

    let receipt = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[0], &[("A", 10), ("B", 5)]),
        )
        .expect("score accepted");
    assert_eq!(receipt.total_score, 8);

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");
    assert_eq!(overview.rows[0].total_score, 8);
}

#[test]
fn rubric_from_another_competition_leaves_the_pair_pending() {
    let seeded = seeded();
    let mut custom = individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]);
    custom.rules = vec![rule("A", 60), rule("B", 40)];
    let custom = seeded.service.create_competition(custom).expect("created");
    let standard = seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");

    seeded
        .service
        .submit_judge_score(
            &custom.id,
            submission(&seeded.judges[0], &seeded.apps[0], &[("A", 10), ("B", 5)]),
        )
        .expect("score accepted");

    let scored = seeded
        .service
        .scoring_overview(&custom.id)
        .expect("overview");
    assert_eq!(scored.rows[0].status, ScoreStatus::Completed);

    let other = seeded
        .service
        .scoring_overview(&standard.id)
        .expect("overview");
    let row = &other.rows[0];
    assert_eq!(row.status, ScoreStatus::Pending);
    assert_eq!(row.total_score, 0);
    assert_eq!(row.scores.len(), 5);
    assert_eq!(other.overall.completed, 0);
}

#[test]
fn resubmission_replaces_the_previous_record() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");

    let first = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[0], &default_individual_scores(4)),
        )
        .expect("first score");
    let second = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[0], &default_individual_scores(9)),
        )
        .expect("second score");

    assert!(!first.replaced_previous);
    assert!(second.replaced_previous);

    let records: Vec<_> = seeded
        .store
        .list_scores()
        .expect("scores listed")
        .into_iter()
        .filter(|score| score.judge_id == seeded.judges[0] && score.participant_id == seeded.apps[0])
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].scores.get("創新性"), Some(&9));

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");
    assert_eq!(overview.rows[0].total_score, 9);
}

#[test]
fn incomplete_rubric_and_blank_comments_are_rejected_without_writing() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");

    let mut partial = default_individual_scores(7);
    partial.pop();
    let error = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[0], &partial),
        )
        .expect_err("missing rule score");
    assert!(matches!(
        error,
        CompetitionServiceError::Score(ScoreViolation::MissingRuleScore(ref rule)) if rule == "影響力"
    ));

    let mut silent = submission(&seeded.judges[0], &seeded.apps[0], &default_individual_scores(7));
    silent.comments = "   ".to_string();
    let error = seeded
        .service
        .submit_judge_score(&competition.id, silent)
        .expect_err("blank comments");
    assert!(matches!(
        error,
        CompetitionServiceError::Score(ScoreViolation::BlankComments)
    ));

    let error = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[0], &default_individual_scores(11)),
        )
        .expect_err("out of range");
    assert!(matches!(
        error,
        CompetitionServiceError::Score(ScoreViolation::OutOfRange { score: 11, .. })
    ));

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");
    assert_eq!(overview.completed_rows(), 0);
}

#[test]
fn submissions_outside_the_expected_pairs_are_rejected() {
    let seeded = seeded();
    let competition = mixed_competition(&seeded);

    let error = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.team, &default_team_scores(6)),
        )
        .expect_err("individual judge cannot score a team");
    assert!(matches!(
        error,
        CompetitionServiceError::Score(ScoreViolation::PairNotExpected { .. })
    ));

    let error = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(
                &seeded.judges[0],
                &ParticipantId("entry-elsewhere".to_string()),
                &default_individual_scores(6),
            ),
        )
        .expect_err("participant not registered");
    assert!(matches!(
        error,
        CompetitionServiceError::Score(ScoreViolation::ParticipantNotRegistered(_))
    ));
}

#[test]
fn mixed_progress_counts_each_facet_separately() {
    let seeded = seeded();
    let competition = mixed_competition(&seeded);

    let receipt = seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[1], &seeded.team, &default_team_scores(7)),
        )
        .expect("team score accepted");
    assert_eq!(receipt.facet, ParticipantKind::Team);

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");

    assert_eq!(overview.rows.len(), 3);
    assert_eq!(overview.overall.completed, 1);
    assert_eq!(overview.overall.total, 3);
    assert_eq!(overview.overall.percent, 33);
    assert!(overview
        .rows
        .iter()
        .filter(|row| row.facet == ParticipantKind::Team)
        .all(|row| row.judge_id == seeded.judges[1]));
}

#[test]
fn scoring_filter_narrows_rows_by_judge_and_status() {
    let seeded = seeded();
    let competition = mixed_competition(&seeded);
    seeded
        .service
        .submit_judge_score(
            &competition.id,
            submission(&seeded.judges[0], &seeded.apps[1], &default_individual_scores(5)),
        )
        .expect("score accepted");

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");

    let pending_for_first = overview.clone().filtered(&ScoringFilter {
        judge: Some(seeded.judges[0].clone()),
        status: Some(ScoreStatus::Pending),
    });
    assert_eq!(pending_for_first.rows.len(), 1);
    assert_eq!(pending_for_first.rows[0].participant_id, seeded.apps[0]);

    let completed = overview.filtered(&ScoringFilter {
        judge: None,
        status: Some(ScoreStatus::Completed),
    });
    assert_eq!(completed.rows.len(), 1);
}

#[test]
fn deleted_directory_entries_render_as_unknown() {
    let seeded = seeded();
    let mut draft = individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]);
    draft.judges.push(JudgeId("judge-gone".to_string()));
    let competition = seeded.service.create_competition(draft).expect("created");

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");
    let unknown = overview
        .rows
        .iter()
        .find(|row| row.judge_id.0 == "judge-gone")
        .expect("row for missing judge");
    assert_eq!(unknown.judge_name, UNKNOWN_LABEL);
}

#[test]
fn csv_export_lists_every_row() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(
            &[&seeded.judges[0]],
            &[&seeded.apps[0], &seeded.apps[1]],
        ))
        .expect("created");

    let overview = seeded
        .service
        .scoring_overview(&competition.id)
        .expect("overview");
    let mut buffer = Vec::new();
    overview.write_csv(&mut buffer).expect("csv written");
    let text = String::from_utf8(buffer).expect("utf8");

    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("Writer Bot"));
    assert!(text.contains("pending"));
}
