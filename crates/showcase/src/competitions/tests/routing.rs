use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::awards::storage::MemoryBlobStore;
use crate::competitions::domain::CompetitionType;
use crate::competitions::router::{competition_router, list_competitions_handler};
use crate::competitions::service::CompetitionService;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn list_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(CompetitionService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryBlobStore::default()),
    ));

    let response = list_competitions_handler::<UnavailableRepository>(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("offline"));
}

#[tokio::test]
async fn create_route_rejects_draft_without_judges() {
    let seeded = seeded();
    let router = competition_router(seeded.service.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/competitions",
            json!({
                "name": "X",
                "startDate": "2024-01-01",
                "endDate": "2024-01-31",
                "type": "individual",
                "judges": [],
                "participatingApps": ["a1"],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "select at least one judge");
}

#[tokio::test]
async fn create_route_accepts_blank_optional_dates_as_missing() {
    let seeded = seeded();
    let router = competition_router(seeded.service.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/competitions",
            json!({
                "name": "X",
                "startDate": "",
                "endDate": "2024-01-31",
                "type": "individual",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("missing required fields"));
}

#[tokio::test]
async fn create_then_fetch_round_trips_through_the_router() {
    let seeded = seeded();
    let router = competition_router(seeded.service.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/competitions",
            json!({
                "name": "Autumn Cup",
                "startDate": "2024-10-01",
                "endDate": "2024-10-20",
                "type": "individual",
                "status": "ongoing",
                "judges": [seeded.judges[0].0],
                "participatingApps": [seeded.apps[0].0],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    assert_eq!(created["status"], "active");
    assert_eq!(created["year"], 2024);
    assert_eq!(created["month"], 10);
    let id = created["id"].as_str().expect("id").to_string();

    let response = router
        .oneshot(get(&format!("/api/v1/competitions/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json_body(response).await;
    assert_eq!(fetched["name"], "Autumn Cup");
    assert_eq!(fetched["type"], "individual");
}

#[tokio::test]
async fn unknown_competition_is_not_found() {
    let seeded = seeded();
    let router = competition_router(seeded.service.clone());

    let response = router
        .oneshot(get("/api/v1/competitions/comp-missing"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn participants_route_requires_a_facet_for_mixed_competitions() {
    let seeded = seeded();
    let competition = mixed_competition(&seeded);
    let router = competition_router(seeded.service.clone());

    let response = router
        .clone()
        .oneshot(get(&format!(
            "/api/v1/competitions/{}/participants",
            competition.id.0
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(get(&format!(
            "/api/v1/competitions/{}/participants?facet=team&search=moon",
            competition.id.0
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["facet"], "team");
    assert_eq!(body["participants"].as_array().expect("array").len(), 1);
    assert_eq!(body["judges"][0]["name"], "Grace");
}

#[tokio::test]
async fn score_submission_and_overview_routes() {
    let seeded = seeded();
    let competition = mixed_competition(&seeded);
    let router = competition_router(seeded.service.clone());

    let scores: serde_json::Map<String, Value> = default_team_scores(7)
        .into_iter()
        .map(|(name, score)| (name.to_string(), json!(score)))
        .collect();
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/competitions/{}/scores", competition.id.0),
            json!({
                "judgeId": seeded.judges[1].0,
                "appId": seeded.team.0,
                "scores": scores,
                "comments": "Great teamwork",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = read_json_body(response).await;
    assert_eq!(receipt["totalScore"], 7);
    assert_eq!(receipt["replacedPrevious"], false);

    let response = router
        .clone()
        .oneshot(get(&format!(
            "/api/v1/competitions/{}/scoring",
            competition.id.0
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let overview = read_json_body(response).await;
    assert_eq!(overview["overall"]["percent"], 33);
    assert_eq!(overview["rows"].as_array().expect("rows").len(), 3);

    let response = router
        .oneshot(get(&format!(
            "/api/v1/competitions/{}/scoring?status=pending&judge={}",
            competition.id.0, seeded.judges[0].0
        )))
        .await
        .unwrap();
    let filtered = read_json_body(response).await;
    assert_eq!(filtered["rows"].as_array().expect("rows").len(), 2);
}

#[tokio::test]
async fn blank_comments_are_unprocessable() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");
    let router = competition_router(seeded.service.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/competitions/{}/scores", competition.id.0),
            json!({
                "judgeId": seeded.judges[0].0,
                "appId": seeded.apps[0].0,
                "scores": {"創新性": 8, "技術性": 8, "實用性": 8, "展示效果": 8, "影響力": 8},
                "comments": "  ",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "comments are required");
}

#[tokio::test]
async fn scoring_export_returns_csv() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");
    let router = competition_router(seeded.service.clone());

    let response = router
        .oneshot(get(&format!(
            "/api/v1/competitions/{}/scoring/export",
            competition.id.0
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("judge_id,judge_name"));
}

#[tokio::test]
async fn deleting_a_referenced_judge_conflicts() {
    let seeded = seeded();
    seeded
        .service
        .create_competition(individual_draft(&[&seeded.judges[0]], &[&seeded.apps[0]]))
        .expect("created");
    let router = competition_router(seeded.service.clone());

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/judges/{}", seeded.judges[0].0))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/judges/{}", seeded.judges[1].0))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn directory_routes_create_and_list_records() {
    let seeded = seeded();
    let router = competition_router(seeded.service.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/individual-apps",
            json!({"name": "Note Taker", "creator": "Kai", "submissionDate": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    assert!(created["id"].as_str().expect("id").starts_with("entry-"));
    assert!(created["submissionDate"].is_string());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/teams",
            json!({"name": "Solo", "leader": "Kai", "members": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router.oneshot(get("/api/v1/individual-apps")).await.unwrap();
    let listed = read_json_body(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 3);
}

#[tokio::test]
async fn status_route_accepts_the_ongoing_alias() {
    let seeded = seeded();
    let competition = seeded
        .service
        .create_competition(draft_with(&seeded))
        .expect("created");
    let router = competition_router(seeded.service.clone());

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/competitions/{}/status", competition.id.0),
            json!({"status": "ongoing"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "active");
}

fn draft_with(seeded: &Seeded) -> crate::competitions::domain::CompetitionDraft {
    let mut draft = draft(CompetitionType::Team);
    draft.judges = vec![seeded.judges[0].clone()];
    draft.participating_teams = vec![seeded.team.clone()];
    draft
}
