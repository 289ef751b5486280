use crate::awards::storage::AwardRepository;

use super::domain::{
    Competition, CompetitionId, IndividualApp, Judge, JudgeId, JudgeScore, ParticipantId, Team,
};

/// Storage abstraction for competitions so services can be exercised in isolation.
pub trait CompetitionRepository: Send + Sync {
    fn insert_competition(&self, competition: Competition) -> Result<Competition, RepositoryError>;
    fn update_competition(&self, competition: Competition) -> Result<(), RepositoryError>;
    fn fetch_competition(&self, id: &CompetitionId)
        -> Result<Option<Competition>, RepositoryError>;
    fn list_competitions(&self) -> Result<Vec<Competition>, RepositoryError>;
    fn delete_competition(&self, id: &CompetitionId) -> Result<Competition, RepositoryError>;

    /// Apply `change` to the stored competition as one atomic read-modify-write. The stored
    /// record is left untouched when `change` fails.
    fn modify_competition<T, F>(&self, id: &CompetitionId, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Competition) -> Result<T, RepositoryError>,
        Self: Sized;
}

/// Judge directory storage.
pub trait JudgeRepository: Send + Sync {
    fn insert_judge(&self, judge: Judge) -> Result<Judge, RepositoryError>;
    fn update_judge(&self, judge: Judge) -> Result<(), RepositoryError>;
    fn fetch_judge(&self, id: &JudgeId) -> Result<Option<Judge>, RepositoryError>;
    fn list_judges(&self) -> Result<Vec<Judge>, RepositoryError>;
    fn delete_judge(&self, id: &JudgeId) -> Result<Judge, RepositoryError>;
}

/// Individual application and team storage.
pub trait ParticipantRepository: Send + Sync {
    fn insert_app(&self, app: IndividualApp) -> Result<IndividualApp, RepositoryError>;
    fn update_app(&self, app: IndividualApp) -> Result<(), RepositoryError>;
    fn fetch_app(&self, id: &ParticipantId) -> Result<Option<IndividualApp>, RepositoryError>;
    fn list_apps(&self) -> Result<Vec<IndividualApp>, RepositoryError>;
    fn delete_app(&self, id: &ParticipantId) -> Result<IndividualApp, RepositoryError>;

    fn insert_team(&self, team: Team) -> Result<Team, RepositoryError>;
    fn update_team(&self, team: Team) -> Result<(), RepositoryError>;
    fn fetch_team(&self, id: &ParticipantId) -> Result<Option<Team>, RepositoryError>;
    fn list_teams(&self) -> Result<Vec<Team>, RepositoryError>;
    fn delete_team(&self, id: &ParticipantId) -> Result<Team, RepositoryError>;
}

/// Judge score storage. At most one record exists per (judge, participant) pair.
pub trait ScoreRepository: Send + Sync {
    /// Insert or replace the record for the pair, returning the replaced record.
    fn upsert_score(&self, score: JudgeScore) -> Result<Option<JudgeScore>, RepositoryError>;
    fn list_scores(&self) -> Result<Vec<JudgeScore>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record is still referenced by {0}")]
    InUse(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Every repository the console services need, satisfied by one backing store.
pub trait ShowcaseRepository:
    CompetitionRepository + JudgeRepository + ParticipantRepository + ScoreRepository + AwardRepository
{
}

impl<T> ShowcaseRepository for T where
    T: CompetitionRepository
        + JudgeRepository
        + ParticipantRepository
        + ScoreRepository
        + AwardRepository
{
}
