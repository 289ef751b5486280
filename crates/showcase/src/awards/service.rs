use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::competitions::domain::{CompetitionId, Participant, ParticipantId, ParticipantKind};
use crate::competitions::repository::{RepositoryError, ShowcaseRepository};

use super::derivation::{check_required_fields, derive_award, display_fields, AwardViolation};
use super::domain::{Award, AwardDocument, AwardDraft, AwardId, AwardPhoto};
use super::listing::{listing_order, AwardQuery};
use super::storage::{BlobError, BlobStore};

static AWARD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PHOTO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

/// Award as presented to readers: display fields come from the live directory and fall back to
/// the issued snapshot once the participant is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardView {
    #[serde(flatten)]
    pub award: Award,
    pub participant_found: bool,
}

/// Issues, edits and lists curated awards and their attachments.
pub struct AwardService<R, B> {
    repository: Arc<R>,
    blobs: Arc<B>,
}

impl<R, B> AwardService<R, B>
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    pub fn new(repository: Arc<R>, blobs: Arc<B>) -> Self {
        Self { repository, blobs }
    }

    pub fn issue_award(&self, draft: AwardDraft) -> Result<Award, AwardServiceError> {
        let id = AwardId(next_id(&AWARD_SEQUENCE, "award"));
        let award = self.build(id, draft)?;
        let stored = self.repository.insert_award(award)?;
        info!(
            award = %stored.id.0,
            competition = %stored.competition_id.0,
            award_type = stored.award_type.label(),
            "award issued"
        );
        Ok(stored)
    }

    /// Re-derive an award from the draft. Attachments carry over.
    pub fn update_award(&self, id: &AwardId, draft: AwardDraft) -> Result<Award, AwardServiceError> {
        let mut award = self.build(id.clone(), draft)?;
        let award = self.repository.modify_award(id, move |stored| {
            award.documents = std::mem::take(&mut stored.documents);
            award.photos = std::mem::take(&mut stored.photos);
            *stored = award.clone();
            Ok(award)
        })?;
        info!(award = %id.0, "award updated");
        Ok(award)
    }

    pub fn delete_award(&self, id: &AwardId) -> Result<Award, AwardServiceError> {
        let removed = self.repository.delete_award(id)?;
        release_attachments(self.blobs.as_ref(), &removed);
        info!(award = %id.0, "award deleted");
        Ok(removed)
    }

    pub fn get_award(&self, id: &AwardId) -> Result<Award, AwardServiceError> {
        let award = self
            .repository
            .fetch_award(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(award)
    }

    /// Project an award with its display fields recomputed from the participant directory.
    pub fn view(&self, mut award: Award) -> Result<AwardView, AwardServiceError> {
        let participant = match award.participant_id() {
            Some(id) => self.lookup_participant(award.participant_type, id)?,
            None => None,
        };
        let participant_found = participant.is_some();
        if let Some(participant) = participant.as_ref() {
            let (app_name, creator) = display_fields(award.participant_type, Some(participant));
            award.app_name = app_name;
            award.creator = creator;
        }
        Ok(AwardView {
            award,
            participant_found,
        })
    }

    pub fn list_awards(&self, query: &AwardQuery) -> Result<Vec<AwardView>, AwardServiceError> {
        let competition_types: HashMap<_, _> = self
            .repository
            .list_competitions()?
            .into_iter()
            .map(|competition| (competition.id, competition.kind))
            .collect();

        let competition_type_of =
            |competition_id: &CompetitionId| competition_types.get(competition_id).copied();

        // Search runs against the live display fields, not the issued snapshot.
        let mut views = Vec::new();
        for award in self.repository.list_awards()? {
            let view = self.view(award)?;
            if query.matches(&view.award, &competition_type_of) {
                views.push(view);
            }
        }
        views.sort_by(|left, right| listing_order(&left.award, &right.award));
        Ok(views)
    }

    pub fn attach_document(
        &self,
        id: &AwardId,
        name: &str,
        bytes: &[u8],
    ) -> Result<AwardDocument, AwardServiceError> {
        let content_type = guess_content_type(name);
        let url = self.blobs.upload(name, content_type.essence_str(), bytes)?;

        let document = AwardDocument {
            id: next_id(&DOCUMENT_SEQUENCE, "doc"),
            name: name.to_string(),
            content_type: content_type.essence_str().to_string(),
            size: bytes.len() as u64,
            upload_date: Utc::now(),
            url,
        };
        let attached = document.clone();
        self.record_upload(id, &document.url, move |award| {
            award.documents.push(attached);
        })?;
        info!(award = %id.0, document = %document.id, size = document.size, "document attached");
        Ok(document)
    }

    pub fn attach_photo(
        &self,
        id: &AwardId,
        name: &str,
        caption: &str,
        bytes: &[u8],
    ) -> Result<AwardPhoto, AwardServiceError> {
        let content_type = guess_content_type(name);
        if content_type.type_() != mime::IMAGE {
            return Err(AwardServiceError::NotAnImage(name.to_string()));
        }
        let url = self.blobs.upload(name, content_type.essence_str(), bytes)?;

        let photo = AwardPhoto {
            id: next_id(&PHOTO_SEQUENCE, "photo"),
            name: name.to_string(),
            url,
            caption: caption.trim().to_string(),
            upload_date: Utc::now(),
            size: bytes.len() as u64,
        };
        let attached = photo.clone();
        self.record_upload(id, &photo.url, move |award| {
            award.photos.push(attached);
        })?;
        info!(award = %id.0, photo = %photo.id, size = photo.size, "photo attached");
        Ok(photo)
    }

    /// Remove a document or photo by attachment id.
    pub fn remove_attachment(
        &self,
        id: &AwardId,
        attachment_id: &str,
    ) -> Result<Award, AwardServiceError> {
        let (award, url) = self.repository.modify_award(id, |award| {
            let url = if let Some(position) = award
                .documents
                .iter()
                .position(|document| document.id == attachment_id)
            {
                award.documents.remove(position).url
            } else if let Some(position) = award
                .photos
                .iter()
                .position(|photo| photo.id == attachment_id)
            {
                award.photos.remove(position).url
            } else {
                return Err(RepositoryError::NotFound);
            };
            Ok((award.clone(), url))
        })?;

        if let Err(error) = self.blobs.remove(&url) {
            warn!(award = %id.0, url, %error, "attachment blob removal failed");
        }
        info!(award = %id.0, attachment = attachment_id, "attachment removed");
        Ok(award)
    }

    /// Record an uploaded blob on the award, dropping the blob again if the award is gone.
    fn record_upload(
        &self,
        id: &AwardId,
        url: &str,
        attach: impl FnOnce(&mut Award),
    ) -> Result<(), AwardServiceError> {
        let recorded = self.repository.modify_award(id, |award| {
            attach(award);
            Ok(())
        });
        if let Err(error) = recorded {
            if let Err(cleanup) = self.blobs.remove(url) {
                warn!(award = %id.0, url, error = %cleanup, "orphaned upload cleanup failed");
            }
            return Err(error.into());
        }
        Ok(())
    }

    fn build(&self, id: AwardId, draft: AwardDraft) -> Result<Award, AwardServiceError> {
        check_required_fields(&draft)?;
        let competition = self
            .repository
            .fetch_competition(&draft.competition_id)?
            .ok_or(RepositoryError::NotFound)?;
        let participant = self.lookup_participant(draft.participant_type, &draft.participant_id)?;
        Ok(derive_award(id, draft, &competition, participant.as_ref())?)
    }

    fn lookup_participant(
        &self,
        kind: ParticipantKind,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, RepositoryError> {
        Ok(match kind {
            ParticipantKind::Individual => self.repository.fetch_app(id)?.map(Participant::Individual),
            ParticipantKind::Team => self.repository.fetch_team(id)?.map(Participant::Team),
        })
    }
}

/// Remove every document and photo blob of an award that has left the repository. Failures are
/// logged; the award itself is already gone.
pub(crate) fn release_attachments<B: BlobStore + ?Sized>(blobs: &B, award: &Award) {
    let urls = award
        .documents
        .iter()
        .map(|document| document.url.as_str())
        .chain(award.photos.iter().map(|photo| photo.url.as_str()));
    for url in urls {
        if let Err(error) = blobs.remove(url) {
            warn!(award = %award.id.0, url, %error, "attachment cleanup failed");
        }
    }
}

fn guess_content_type(name: &str) -> mime::Mime {
    mime_guess::from_path(name).first_or_octet_stream()
}

/// Error raised by the award service.
#[derive(Debug, thiserror::Error)]
pub enum AwardServiceError {
    #[error(transparent)]
    Violation(#[from] AwardViolation),
    #[error("{0} is not an image")]
    NotAnImage(String),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AwardServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AwardServiceError::Violation(_)
                | AwardServiceError::NotAnImage(_)
                | AwardServiceError::Blob(BlobError::Empty)
                | AwardServiceError::Blob(BlobError::TooLarge { .. })
        )
    }
}
