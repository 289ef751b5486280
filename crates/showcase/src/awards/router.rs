use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::competitions::repository::{RepositoryError, ShowcaseRepository};

use super::domain::{AwardDraft, AwardId};
use super::listing::AwardQuery;
use super::service::{AwardService, AwardServiceError};
use super::storage::BlobStore;

/// Router builder exposing award curation and attachment endpoints.
pub fn award_router<R, B>(service: Arc<AwardService<R, B>>) -> Router
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/awards",
            get(list_awards_handler::<R, B>).post(issue_award_handler::<R, B>),
        )
        .route(
            "/api/v1/awards/:award_id",
            get(get_award_handler::<R, B>)
                .put(update_award_handler::<R, B>)
                .delete(delete_award_handler::<R, B>),
        )
        .route(
            "/api/v1/awards/:award_id/documents",
            post(attach_document_handler::<R, B>),
        )
        .route(
            "/api/v1/awards/:award_id/photos",
            post(attach_photo_handler::<R, B>),
        )
        .route(
            "/api/v1/awards/:award_id/attachments/:attachment_id",
            delete(remove_attachment_handler::<R, B>),
        )
        .with_state(service)
}

type ServiceState<R, B> = State<Arc<AwardService<R, B>>>;

fn error_response(error: AwardServiceError) -> Response {
    let status = match &error {
        err if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        AwardServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AwardServiceError::Repository(RepositoryError::Conflict)
        | AwardServiceError::Repository(RepositoryError::InUse(_)) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T, AwardServiceError>) -> Response {
    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_awards_handler<R, B>(
    State(service): ServiceState<R, B>,
    Query(query): Query<AwardQuery>,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    respond(StatusCode::OK, service.list_awards(&query))
}

pub(crate) async fn issue_award_handler<R, B>(
    State(service): ServiceState<R, B>,
    axum::Json(draft): axum::Json<AwardDraft>,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    respond(StatusCode::CREATED, service.issue_award(draft))
}

pub(crate) async fn get_award_handler<R, B>(
    State(service): ServiceState<R, B>,
    Path(award_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    let result = service
        .get_award(&AwardId(award_id))
        .and_then(|award| service.view(award));
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_award_handler<R, B>(
    State(service): ServiceState<R, B>,
    Path(award_id): Path<String>,
    axum::Json(draft): axum::Json<AwardDraft>,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    respond(StatusCode::OK, service.update_award(&AwardId(award_id), draft))
}

pub(crate) async fn delete_award_handler<R, B>(
    State(service): ServiceState<R, B>,
    Path(award_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    match service.delete_award(&AwardId(award_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttachmentParams {
    name: String,
    #[serde(default)]
    caption: String,
}

pub(crate) async fn attach_document_handler<R, B>(
    State(service): ServiceState<R, B>,
    Path(award_id): Path<String>,
    Query(params): Query<AttachmentParams>,
    body: Bytes,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    respond(
        StatusCode::CREATED,
        service.attach_document(&AwardId(award_id), &params.name, &body),
    )
}

pub(crate) async fn attach_photo_handler<R, B>(
    State(service): ServiceState<R, B>,
    Path(award_id): Path<String>,
    Query(params): Query<AttachmentParams>,
    body: Bytes,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    respond(
        StatusCode::CREATED,
        service.attach_photo(&AwardId(award_id), &params.name, &params.caption, &body),
    )
}

pub(crate) async fn remove_attachment_handler<R, B>(
    State(service): ServiceState<R, B>,
    Path((award_id, attachment_id)): Path<(String, String)>,
) -> Response
where
    R: ShowcaseRepository + 'static,
    B: BlobStore + 'static,
{
    respond(
        StatusCode::OK,
        service.remove_attachment(&AwardId(award_id), &attachment_id),
    )
}
