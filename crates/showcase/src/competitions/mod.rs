//! Competition configuration, participant directories, judge scoring and progress tracking.

pub mod directory;
pub mod domain;
pub mod repository;
pub mod resolution;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use directory::DirectoryViolation;
pub use domain::{
    AwardTypeDefinition, Competition, CompetitionDraft, CompetitionId, CompetitionStatus,
    CompetitionType, FacetConfig, IndividualApp, Judge, JudgeId, JudgeScore, Participant,
    ParticipantId, ParticipantKind, ScoreSubmission, ScoringRule, Team, TeamMember,
    UNKNOWN_LABEL,
};
pub use repository::{
    CompetitionRepository, JudgeRepository, ParticipantRepository, RepositoryError,
    ScoreRepository, ShowcaseRepository,
};
pub use resolution::{
    applicable_rules, default_rules, resolve, select_facet, DirectorySnapshot,
    ParticipantFilter, Resolution, ResolutionError,
};
pub use router::competition_router;
pub use scoring::{
    ScoreRow, ScoreStatus, ScoreViolation, ScoringEngine, ScoringFilter, ScoringOverview,
};
pub use service::{CompetitionService, CompetitionServiceError, ScoreReceipt};
pub use validation::{weight_total, CompetitionViolation, ConfigurationGuard};
