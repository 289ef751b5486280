use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::awards::service::release_attachments;
use crate::awards::storage::BlobStore;

use super::directory::{sanitize_app, sanitize_judge, sanitize_team, DirectoryViolation};
use super::domain::{
    Competition, CompetitionDraft, CompetitionId, CompetitionStatus, IndividualApp, Judge,
    JudgeId, JudgeScore, ParticipantId, ParticipantKind, ScoreSubmission, Team,
};
use super::repository::{RepositoryError, ShowcaseRepository};
use super::resolution::{
    applicable_rules, expected_pair_facet, facet_of, resolve, DirectorySnapshot,
    ParticipantFilter, Resolution, ResolutionError,
};
use super::scoring::{sanitize_submission, weighted_total, ScoreViolation, ScoringEngine, ScoringOverview};
use super::validation::{CompetitionViolation, ConfigurationGuard};

static COMPETITION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static JUDGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TEAM_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

/// Service composing the configuration guard, directories, scoring engine and repository.
/// The blob store is only touched when a competition delete cascades into award attachments.
pub struct CompetitionService<R> {
    guard: ConfigurationGuard,
    engine: ScoringEngine,
    repository: Arc<R>,
    blobs: Arc<dyn BlobStore>,
}

/// Result of a rubric submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReceipt {
    pub record: JudgeScore,
    pub facet: ParticipantKind,
    pub total_score: u8,
    pub replaced_previous: bool,
}

impl<R> CompetitionService<R>
where
    R: ShowcaseRepository + 'static,
{
    pub fn new(repository: Arc<R>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            guard: ConfigurationGuard,
            engine: ScoringEngine,
            repository,
            blobs,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate and store a new competition.
    pub fn create_competition(
        &self,
        draft: CompetitionDraft,
    ) -> Result<Competition, CompetitionServiceError> {
        let id = CompetitionId(next_id(&COMPETITION_SEQUENCE, "comp"));
        let competition = self.guard.competition_from_draft(id, draft)?;
        let stored = self.repository.insert_competition(competition)?;
        info!(
            competition = %stored.id.0,
            kind = stored.kind.label(),
            "competition created"
        );
        Ok(stored)
    }

    /// Validate a draft and replace the stored competition with it.
    pub fn update_competition(
        &self,
        id: &CompetitionId,
        draft: CompetitionDraft,
    ) -> Result<Competition, CompetitionServiceError> {
        self.get_competition(id)?;
        let competition = self.guard.competition_from_draft(id.clone(), draft)?;
        self.repository.update_competition(competition.clone())?;
        info!(competition = %id.0, "competition updated");
        Ok(competition)
    }

    pub fn set_status(
        &self,
        id: &CompetitionId,
        status: CompetitionStatus,
    ) -> Result<Competition, CompetitionServiceError> {
        let competition = self.repository.modify_competition(id, |competition| {
            competition.status = status;
            Ok(competition.clone())
        })?;
        info!(competition = %id.0, status = status.label(), "competition status changed");
        Ok(competition)
    }

    /// Remove a competition, the awards issued under it and their attachments. Awards go first
    /// so a failed cascade leaves the competition in place.
    pub fn delete_competition(
        &self,
        id: &CompetitionId,
    ) -> Result<Competition, CompetitionServiceError> {
        self.get_competition(id)?;
        let mut cascaded = 0usize;
        for award in self.repository.list_awards()? {
            if &award.competition_id == id {
                let removed = self.repository.delete_award(&award.id)?;
                release_attachments(self.blobs.as_ref(), &removed);
                cascaded += 1;
            }
        }
        let removed = self.repository.delete_competition(id)?;
        info!(competition = %id.0, awards = cascaded, "competition deleted");
        Ok(removed)
    }

    pub fn get_competition(
        &self,
        id: &CompetitionId,
    ) -> Result<Competition, CompetitionServiceError> {
        let competition = self
            .repository
            .fetch_competition(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(competition)
    }

    pub fn list_competitions(&self) -> Result<Vec<Competition>, CompetitionServiceError> {
        let mut competitions = self.repository.list_competitions()?;
        competitions.sort_by(|left, right| {
            right
                .start_date
                .cmp(&left.start_date)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(competitions)
    }

    pub fn add_judge(&self, judge: Judge) -> Result<Judge, CompetitionServiceError> {
        let mut judge = sanitize_judge(judge)?;
        judge.id = JudgeId(next_id(&JUDGE_SEQUENCE, "judge"));
        Ok(self.repository.insert_judge(judge)?)
    }

    pub fn update_judge(&self, id: &JudgeId, judge: Judge) -> Result<Judge, CompetitionServiceError> {
        let mut judge = sanitize_judge(judge)?;
        judge.id = id.clone();
        self.repository.update_judge(judge.clone())?;
        Ok(judge)
    }

    /// Delete a judge that no competition references.
    pub fn delete_judge(&self, id: &JudgeId) -> Result<Judge, CompetitionServiceError> {
        if let Some(competition) = self
            .repository
            .list_competitions()?
            .into_iter()
            .find(|competition| competition.references_judge(id))
        {
            warn!(judge = %id.0, competition = %competition.id.0, "judge deletion rejected");
            return Err(RepositoryError::InUse(format!("competition {}", competition.id.0)).into());
        }
        Ok(self.repository.delete_judge(id)?)
    }

    pub fn list_judges(&self) -> Result<Vec<Judge>, CompetitionServiceError> {
        Ok(self.repository.list_judges()?)
    }

    pub fn add_team(&self, team: Team) -> Result<Team, CompetitionServiceError> {
        let mut team = sanitize_team(team)?;
        team.id = ParticipantId(next_id(&TEAM_SEQUENCE, "team"));
        Ok(self.repository.insert_team(team)?)
    }

    pub fn update_team(
        &self,
        id: &ParticipantId,
        team: Team,
    ) -> Result<Team, CompetitionServiceError> {
        let mut team = sanitize_team(team)?;
        team.id = id.clone();
        self.repository.update_team(team.clone())?;
        Ok(team)
    }

    pub fn delete_team(&self, id: &ParticipantId) -> Result<Team, CompetitionServiceError> {
        self.ensure_participant_unreferenced(id)?;
        Ok(self.repository.delete_team(id)?)
    }

    pub fn list_teams(&self) -> Result<Vec<Team>, CompetitionServiceError> {
        Ok(self.repository.list_teams()?)
    }

    pub fn add_app(&self, app: IndividualApp) -> Result<IndividualApp, CompetitionServiceError> {
        let mut app = sanitize_app(app)?;
        app.id = ParticipantId(next_id(&ENTRY_SEQUENCE, "entry"));
        if app.submission_date.is_none() {
            app.submission_date = Some(Utc::now().date_naive());
        }
        Ok(self.repository.insert_app(app)?)
    }

    pub fn update_app(
        &self,
        id: &ParticipantId,
        app: IndividualApp,
    ) -> Result<IndividualApp, CompetitionServiceError> {
        let mut app = sanitize_app(app)?;
        app.id = id.clone();
        self.repository.update_app(app.clone())?;
        Ok(app)
    }

    pub fn delete_app(&self, id: &ParticipantId) -> Result<IndividualApp, CompetitionServiceError> {
        self.ensure_participant_unreferenced(id)?;
        Ok(self.repository.delete_app(id)?)
    }

    pub fn list_apps(&self) -> Result<Vec<IndividualApp>, CompetitionServiceError> {
        Ok(self.repository.list_apps()?)
    }

    fn ensure_participant_unreferenced(
        &self,
        id: &ParticipantId,
    ) -> Result<(), CompetitionServiceError> {
        if let Some(competition) = self
            .repository
            .list_competitions()?
            .into_iter()
            .find(|competition| competition.references_participant(id))
        {
            warn!(participant = %id.0, competition = %competition.id.0, "participant deletion rejected");
            return Err(RepositoryError::InUse(format!("competition {}", competition.id.0)).into());
        }
        if let Some(award) = self
            .repository
            .list_awards()?
            .into_iter()
            .find(|award| award.references_participant(id))
        {
            warn!(participant = %id.0, award = %award.id.0, "participant deletion rejected");
            return Err(RepositoryError::InUse(format!("award {}", award.id.0)).into());
        }
        Ok(())
    }

    /// Snapshot of the judge and participant directories.
    pub fn directory(&self) -> Result<DirectorySnapshot, CompetitionServiceError> {
        Ok(DirectorySnapshot::new(
            self.repository.list_judges()?,
            self.repository.list_apps()?,
            self.repository.list_teams()?,
        ))
    }

    pub fn resolve(
        &self,
        id: &CompetitionId,
        facet: Option<ParticipantKind>,
        filter: &ParticipantFilter,
    ) -> Result<Resolution, CompetitionServiceError> {
        let competition = self.get_competition(id)?;
        let directory = self.directory()?;
        Ok(resolve(&competition, facet, &directory, filter)?)
    }

    /// Validate a rubric and upsert it for its (judge, participant) pair.
    pub fn submit_judge_score(
        &self,
        id: &CompetitionId,
        submission: ScoreSubmission,
    ) -> Result<ScoreReceipt, CompetitionServiceError> {
        let competition = self.get_competition(id)?;

        if facet_of(&competition, &submission.participant_id).is_none() {
            return Err(ScoreViolation::ParticipantNotRegistered(submission.participant_id).into());
        }
        let facet = expected_pair_facet(
            &competition,
            &submission.judge_id,
            &submission.participant_id,
        )
        .ok_or_else(|| ScoreViolation::PairNotExpected {
            judge: submission.judge_id.clone(),
            participant: submission.participant_id.clone(),
        })?;

        let rules = applicable_rules(&competition, facet);
        let scores = sanitize_submission(&rules, &submission)?;
        let total_score = weighted_total(&rules, &scores);

        let record = JudgeScore {
            judge_id: submission.judge_id,
            participant_id: submission.participant_id,
            scores,
            comments: submission.comments.trim().to_string(),
            submitted_at: Utc::now(),
        };
        let previous = self.repository.upsert_score(record.clone())?;

        info!(
            competition = %id.0,
            judge = %record.judge_id.0,
            participant = %record.participant_id.0,
            total_score,
            replaced = previous.is_some(),
            "judge score submitted"
        );

        Ok(ScoreReceipt {
            record,
            facet,
            total_score,
            replaced_previous: previous.is_some(),
        })
    }

    /// Recompute the scoring table and progress from the current score records.
    pub fn scoring_overview(
        &self,
        id: &CompetitionId,
    ) -> Result<ScoringOverview, CompetitionServiceError> {
        let competition = self.get_competition(id)?;
        let scores = self.repository.list_scores()?;
        let directory = self.directory()?;
        Ok(self.engine.aggregate(&competition, &scores, &directory))
    }
}

/// Error raised by the competition service.
#[derive(Debug, thiserror::Error)]
pub enum CompetitionServiceError {
    #[error(transparent)]
    Configuration(#[from] CompetitionViolation),
    #[error(transparent)]
    Directory(#[from] DirectoryViolation),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Score(#[from] ScoreViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CompetitionServiceError {
    /// Local validation failures that blocked a write.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CompetitionServiceError::Configuration(_)
                | CompetitionServiceError::Directory(_)
                | CompetitionServiceError::Resolution(_)
                | CompetitionServiceError::Score(_)
        )
    }
}
