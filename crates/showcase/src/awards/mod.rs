//! Curated awards: derivation from competitions, listing, attachments and HTTP routing.

pub mod derivation;
pub mod domain;
pub mod listing;
pub mod router;
pub mod service;
pub mod storage;

pub use derivation::{
    award_category, award_icon, check_required_fields, default_rank, derive_award,
    AwardViolation, MAX_AWARD_SCORE,
};
pub use domain::{
    ApplicationLinks, Award, AwardCategory, AwardDocument, AwardDraft, AwardId, AwardKind,
    AwardPhoto, TEAM_WORK_LABEL,
};
pub use listing::{filter_and_sort, listing_order, AwardQuery};
pub use router::award_router;
pub use service::{AwardService, AwardServiceError, AwardView};
pub use storage::{AwardRepository, BlobError, BlobStore, MemoryBlobStore, StoredBlob};
