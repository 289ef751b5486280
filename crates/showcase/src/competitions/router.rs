use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    CompetitionDraft, CompetitionId, CompetitionStatus, IndividualApp, Judge, JudgeId,
    ParticipantId, ParticipantKind, ScoreSubmission, Team,
};
use super::repository::{RepositoryError, ShowcaseRepository};
use super::resolution::ParticipantFilter;
use super::scoring::{ScoreStatus, ScoringFilter};
use super::service::{CompetitionService, CompetitionServiceError};

/// Router builder exposing competition, directory and scoring endpoints.
pub fn competition_router<R>(service: Arc<CompetitionService<R>>) -> Router
where
    R: ShowcaseRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/competitions",
            get(list_competitions_handler::<R>).post(create_competition_handler::<R>),
        )
        .route(
            "/api/v1/competitions/:competition_id",
            get(get_competition_handler::<R>)
                .put(update_competition_handler::<R>)
                .delete(delete_competition_handler::<R>),
        )
        .route(
            "/api/v1/competitions/:competition_id/status",
            put(status_handler::<R>),
        )
        .route(
            "/api/v1/competitions/:competition_id/participants",
            get(participants_handler::<R>),
        )
        .route(
            "/api/v1/competitions/:competition_id/scores",
            post(submit_score_handler::<R>),
        )
        .route(
            "/api/v1/competitions/:competition_id/scoring",
            get(scoring_handler::<R>),
        )
        .route(
            "/api/v1/competitions/:competition_id/scoring/export",
            get(scoring_export_handler::<R>),
        )
        .route(
            "/api/v1/judges",
            get(list_judges_handler::<R>).post(create_judge_handler::<R>),
        )
        .route(
            "/api/v1/judges/:judge_id",
            put(update_judge_handler::<R>).delete(delete_judge_handler::<R>),
        )
        .route(
            "/api/v1/teams",
            get(list_teams_handler::<R>).post(create_team_handler::<R>),
        )
        .route(
            "/api/v1/teams/:team_id",
            put(update_team_handler::<R>).delete(delete_team_handler::<R>),
        )
        .route(
            "/api/v1/individual-apps",
            get(list_apps_handler::<R>).post(create_app_handler::<R>),
        )
        .route(
            "/api/v1/individual-apps/:app_id",
            put(update_app_handler::<R>).delete(delete_app_handler::<R>),
        )
        .with_state(service)
}

type ServiceState<R> = State<Arc<CompetitionService<R>>>;

pub(crate) fn error_response(error: CompetitionServiceError) -> Response {
    let status = match &error {
        err if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        CompetitionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CompetitionServiceError::Repository(RepositoryError::Conflict)
        | CompetitionServiceError::Repository(RepositoryError::InUse(_)) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, CompetitionServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_competitions_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::OK, service.list_competitions())
}

pub(crate) async fn create_competition_handler<R>(
    State(service): ServiceState<R>,
    axum::Json(draft): axum::Json<CompetitionDraft>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::CREATED, service.create_competition(draft))
}

pub(crate) async fn get_competition_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.get_competition(&CompetitionId(competition_id)),
    )
}

pub(crate) async fn update_competition_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
    axum::Json(draft): axum::Json<CompetitionDraft>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.update_competition(&CompetitionId(competition_id), draft),
    )
}

pub(crate) async fn delete_competition_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    match service.delete_competition(&CompetitionId(competition_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    status: CompetitionStatus,
}

pub(crate) async fn status_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
    axum::Json(change): axum::Json<StatusChange>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.set_status(&CompetitionId(competition_id), change.status),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ParticipantQuery {
    #[serde(default)]
    facet: Option<ParticipantKind>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

pub(crate) async fn participants_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
    Query(query): Query<ParticipantQuery>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    let filter = ParticipantFilter {
        search: query.search.unwrap_or_default(),
        department: query.department,
    };
    respond(
        StatusCode::OK,
        service.resolve(&CompetitionId(competition_id), query.facet, &filter),
    )
}

pub(crate) async fn submit_score_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
    axum::Json(submission): axum::Json<ScoreSubmission>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.submit_judge_score(&CompetitionId(competition_id), submission),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScoringQuery {
    #[serde(default)]
    judge: Option<String>,
    #[serde(default)]
    status: Option<ScoreStatus>,
}

impl ScoringQuery {
    fn into_filter(self) -> ScoringFilter {
        ScoringFilter {
            judge: self.judge.filter(|id| !id.is_empty()).map(JudgeId),
            status: self.status,
        }
    }
}

pub(crate) async fn scoring_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
    Query(query): Query<ScoringQuery>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    let filter = query.into_filter();
    respond(
        StatusCode::OK,
        service
            .scoring_overview(&CompetitionId(competition_id))
            .map(|overview| overview.filtered(&filter)),
    )
}

pub(crate) async fn scoring_export_handler<R>(
    State(service): ServiceState<R>,
    Path(competition_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    let overview = match service.scoring_overview(&CompetitionId(competition_id)) {
        Ok(overview) => overview,
        Err(error) => return error_response(error),
    };

    let mut buffer = Vec::new();
    match overview.write_csv(&mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.as_ref())],
            buffer,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_judges_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::OK, service.list_judges())
}

pub(crate) async fn create_judge_handler<R>(
    State(service): ServiceState<R>,
    axum::Json(judge): axum::Json<Judge>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::CREATED, service.add_judge(judge))
}

pub(crate) async fn update_judge_handler<R>(
    State(service): ServiceState<R>,
    Path(judge_id): Path<String>,
    axum::Json(judge): axum::Json<Judge>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::OK, service.update_judge(&JudgeId(judge_id), judge))
}

pub(crate) async fn delete_judge_handler<R>(
    State(service): ServiceState<R>,
    Path(judge_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    match service.delete_judge(&JudgeId(judge_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_teams_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::OK, service.list_teams())
}

pub(crate) async fn create_team_handler<R>(
    State(service): ServiceState<R>,
    axum::Json(team): axum::Json<Team>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::CREATED, service.add_team(team))
}

pub(crate) async fn update_team_handler<R>(
    State(service): ServiceState<R>,
    Path(team_id): Path<String>,
    axum::Json(team): axum::Json<Team>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.update_team(&ParticipantId(team_id), team),
    )
}

pub(crate) async fn delete_team_handler<R>(
    State(service): ServiceState<R>,
    Path(team_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    match service.delete_team(&ParticipantId(team_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_apps_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::OK, service.list_apps())
}

pub(crate) async fn create_app_handler<R>(
    State(service): ServiceState<R>,
    axum::Json(app): axum::Json<IndividualApp>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::CREATED, service.add_app(app))
}

pub(crate) async fn update_app_handler<R>(
    State(service): ServiceState<R>,
    Path(app_id): Path<String>,
    axum::Json(app): axum::Json<IndividualApp>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    respond(StatusCode::OK, service.update_app(&ParticipantId(app_id), app))
}

pub(crate) async fn delete_app_handler<R>(
    State(service): ServiceState<R>,
    Path(app_id): Path<String>,
) -> Response
where
    R: ShowcaseRepository + 'static,
{
    match service.delete_app(&ParticipantId(app_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}
