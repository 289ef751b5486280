use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::awards::domain::{Award, AwardId};
use crate::awards::storage::{AwardRepository, MemoryBlobStore};
use crate::competitions::domain::{
    Competition, CompetitionDraft, CompetitionId, CompetitionStatus, CompetitionType, FacetConfig,
    IndividualApp, Judge, JudgeId, JudgeScore, ParticipantId, ScoreSubmission, ScoringRule, Team,
    TeamMember,
};
use crate::competitions::repository::{
    CompetitionRepository, JudgeRepository, ParticipantRepository, RepositoryError,
    ScoreRepository,
};
use crate::competitions::service::CompetitionService;
use crate::store::MemoryStore;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn rule(name: &str, weight: u32) -> ScoringRule {
    ScoringRule {
        id: String::new(),
        name: name.to_string(),
        description: format!("{name} criterion"),
        weight,
    }
}

pub(super) fn draft(kind: CompetitionType) -> CompetitionDraft {
    CompetitionDraft {
        name: "Spring Showcase".to_string(),
        kind,
        year: None,
        month: None,
        start_date: Some(date(2024, 1, 1)),
        end_date: Some(date(2024, 1, 31)),
        description: String::new(),
        status: CompetitionStatus::Upcoming,
        judges: Vec::new(),
        participating_apps: Vec::new(),
        participating_teams: Vec::new(),
        rules: Vec::new(),
        award_types: Vec::new(),
        individual_config: None,
        team_config: None,
    }
}

pub(super) fn individual_draft(judges: &[&JudgeId], apps: &[&ParticipantId]) -> CompetitionDraft {
    let mut draft = draft(CompetitionType::Individual);
    draft.judges = judges.iter().map(|id| (*id).clone()).collect();
    draft.participating_apps = apps.iter().map(|id| (*id).clone()).collect();
    draft
}

pub(super) fn facet(judges: &[&JudgeId]) -> FacetConfig {
    FacetConfig {
        judges: judges.iter().map(|id| (*id).clone()).collect(),
        ..FacetConfig::default()
    }
}

pub(super) fn judge(name: &str) -> Judge {
    Judge {
        id: JudgeId(String::new()),
        name: name.to_string(),
        title: "Principal Engineer".to_string(),
        department: "Platform".to_string(),
        expertise: vec!["AI".to_string()],
    }
}

pub(super) fn app(name: &str, creator: &str, department: &str) -> IndividualApp {
    IndividualApp {
        id: ParticipantId(String::new()),
        name: name.to_string(),
        creator: creator.to_string(),
        department: department.to_string(),
        submission_date: Some(date(2024, 1, 5)),
    }
}

pub(super) fn team(name: &str, leader: &str) -> Team {
    Team {
        id: ParticipantId(String::new()),
        name: name.to_string(),
        leader: leader.to_string(),
        department: "Research".to_string(),
        contact_email: "team@example.com".to_string(),
        leader_phone: String::new(),
        description: String::new(),
        members: vec![
            TeamMember {
                id: String::new(),
                name: leader.to_string(),
                department: "Research".to_string(),
                role: "Lead".to_string(),
            },
            TeamMember {
                id: String::new(),
                name: "Mei".to_string(),
                department: "Research".to_string(),
                role: "Engineer".to_string(),
            },
        ],
        apps: vec!["Lab Assistant".to_string()],
        app_links: Vec::new(),
        submitted_app_count: 0,
    }
}

pub(super) fn submission(
    judge: &JudgeId,
    participant: &ParticipantId,
    scores: &[(&str, u8)],
) -> ScoreSubmission {
    ScoreSubmission {
        judge_id: judge.clone(),
        participant_id: participant.clone(),
        scores: scores
            .iter()
            .map(|(name, score)| (name.to_string(), *score))
            .collect::<BTreeMap<_, _>>(),
        comments: "Solid work".to_string(),
    }
}

pub(super) fn default_individual_scores(score: u8) -> Vec<(&'static str, u8)> {
    ["創新性", "技術性", "實用性", "展示效果", "影響力"]
        .into_iter()
        .map(|name| (name, score))
        .collect()
}

pub(super) fn default_team_scores(score: u8) -> Vec<(&'static str, u8)> {
    ["團隊合作", "創新性", "技術性", "實用性", "展示效果"]
        .into_iter()
        .map(|name| (name, score))
        .collect()
}

/// Directory seeded with two judges, two apps and one team.
pub(super) struct Seeded {
    pub service: Arc<CompetitionService<MemoryStore>>,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub judges: Vec<JudgeId>,
    pub apps: Vec<ParticipantId>,
    pub team: ParticipantId,
}

pub(super) fn seeded() -> Seeded {
    let store = Arc::new(MemoryStore::default());
    let blobs = Arc::new(MemoryBlobStore::default());
    let service = Arc::new(CompetitionService::new(store.clone(), blobs.clone()));

    let judges = ["Ada", "Grace"]
        .into_iter()
        .map(|name| service.add_judge(judge(name)).expect("judge stored").id)
        .collect();
    let apps = vec![
        service
            .add_app(app("Writer Bot", "Lin", "Marketing"))
            .expect("app stored")
            .id,
        service
            .add_app(app("Chart Helper", "Chen", "Finance"))
            .expect("app stored")
            .id,
    ];
    let team = service
        .add_team(team("Moonshot", "Wei"))
        .expect("team stored")
        .id;

    Seeded {
        service,
        store,
        blobs,
        judges,
        apps,
        team,
    }
}

/// Mixed competition with judge 0 on the individual facet (both apps) and judge 1 on the team
/// facet.
pub(super) fn mixed_competition(seeded: &Seeded) -> Competition {
    let mut draft = draft(CompetitionType::Mixed);
    draft.participating_apps = seeded.apps.clone();
    draft.participating_teams = vec![seeded.team.clone()];
    draft.individual_config = Some(facet(&[&seeded.judges[0]]));
    draft.team_config = Some(facet(&[&seeded.judges[1]]));
    seeded
        .service
        .create_competition(draft)
        .expect("mixed competition created")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Repository whose every call fails, used to exercise 500 mappings.
#[derive(Debug, Default)]
pub(super) struct UnavailableRepository;

fn unavailable<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("offline".to_string()))
}

impl CompetitionRepository for UnavailableRepository {
    fn insert_competition(&self, _competition: Competition) -> Result<Competition, RepositoryError> {
        unavailable()
    }

    fn update_competition(&self, _competition: Competition) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn fetch_competition(
        &self,
        _id: &CompetitionId,
    ) -> Result<Option<Competition>, RepositoryError> {
        unavailable()
    }

    fn list_competitions(&self) -> Result<Vec<Competition>, RepositoryError> {
        unavailable()
    }

    fn delete_competition(&self, _id: &CompetitionId) -> Result<Competition, RepositoryError> {
        unavailable()
    }

    fn modify_competition<T, F>(&self, _id: &CompetitionId, _change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Competition) -> Result<T, RepositoryError>,
    {
        unavailable()
    }
}

impl JudgeRepository for UnavailableRepository {
    fn insert_judge(&self, _judge: Judge) -> Result<Judge, RepositoryError> {
        unavailable()
    }

    fn update_judge(&self, _judge: Judge) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn fetch_judge(&self, _id: &JudgeId) -> Result<Option<Judge>, RepositoryError> {
        unavailable()
    }

    fn list_judges(&self) -> Result<Vec<Judge>, RepositoryError> {
        unavailable()
    }

    fn delete_judge(&self, _id: &JudgeId) -> Result<Judge, RepositoryError> {
        unavailable()
    }
}

impl ParticipantRepository for UnavailableRepository {
    fn insert_app(&self, _app: IndividualApp) -> Result<IndividualApp, RepositoryError> {
        unavailable()
    }

    fn update_app(&self, _app: IndividualApp) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn fetch_app(&self, _id: &ParticipantId) -> Result<Option<IndividualApp>, RepositoryError> {
        unavailable()
    }

    fn list_apps(&self) -> Result<Vec<IndividualApp>, RepositoryError> {
        unavailable()
    }

    fn delete_app(&self, _id: &ParticipantId) -> Result<IndividualApp, RepositoryError> {
        unavailable()
    }

    fn insert_team(&self, _team: Team) -> Result<Team, RepositoryError> {
        unavailable()
    }

    fn update_team(&self, _team: Team) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn fetch_team(&self, _id: &ParticipantId) -> Result<Option<Team>, RepositoryError> {
        unavailable()
    }

    fn list_teams(&self) -> Result<Vec<Team>, RepositoryError> {
        unavailable()
    }

    fn delete_team(&self, _id: &ParticipantId) -> Result<Team, RepositoryError> {
        unavailable()
    }
}

impl ScoreRepository for UnavailableRepository {
    fn upsert_score(&self, _score: JudgeScore) -> Result<Option<JudgeScore>, RepositoryError> {
        unavailable()
    }

    fn list_scores(&self) -> Result<Vec<JudgeScore>, RepositoryError> {
        unavailable()
    }
}

impl AwardRepository for UnavailableRepository {
    fn insert_award(&self, _award: Award) -> Result<Award, RepositoryError> {
        unavailable()
    }

    fn fetch_award(&self, _id: &AwardId) -> Result<Option<Award>, RepositoryError> {
        unavailable()
    }

    fn list_awards(&self) -> Result<Vec<Award>, RepositoryError> {
        unavailable()
    }

    fn delete_award(&self, _id: &AwardId) -> Result<Award, RepositoryError> {
        unavailable()
    }

    fn modify_award<T, F>(&self, _id: &AwardId, _change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Award) -> Result<T, RepositoryError>,
    {
        unavailable()
    }
}
