use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder label rendered when a referenced judge or participant no longer exists.
pub const UNKNOWN_LABEL: &str = "未知";

/// Identifier wrapper for competitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompetitionId(pub String);

/// Identifier wrapper for judges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JudgeId(pub String);

/// Identifier shared by individual applications and teams.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

/// Competition shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionType {
    Individual,
    Team,
    Mixed,
}

impl CompetitionType {
    pub const fn label(self) -> &'static str {
        match self {
            CompetitionType::Individual => "individual",
            CompetitionType::Team => "team",
            CompetitionType::Mixed => "mixed",
        }
    }

    /// Participant facet scored by a single-type competition.
    pub const fn single_facet(self) -> Option<ParticipantKind> {
        match self {
            CompetitionType::Individual => Some(ParticipantKind::Individual),
            CompetitionType::Team => Some(ParticipantKind::Team),
            CompetitionType::Mixed => None,
        }
    }
}

/// Manually selected lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Upcoming,
    #[serde(alias = "ongoing")]
    Active,
    Judging,
    Completed,
}

impl CompetitionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CompetitionStatus::Upcoming => "upcoming",
            CompetitionStatus::Active => "active",
            CompetitionStatus::Judging => "judging",
            CompetitionStatus::Completed => "completed",
        }
    }
}

impl Default for CompetitionStatus {
    fn default() -> Self {
        Self::Upcoming
    }
}

/// The two participant facets a competition can score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Individual,
    Team,
}

impl ParticipantKind {
    pub const fn label(self) -> &'static str {
        match self {
            ParticipantKind::Individual => "individual",
            ParticipantKind::Team => "team",
        }
    }

    pub const fn ordered() -> [ParticipantKind; 2] {
        [ParticipantKind::Individual, ParticipantKind::Team]
    }
}

/// Named scoring criterion. Rule names double as keys in score maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRule {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weight: u32,
}

/// Award category offered by a competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardTypeDefinition {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

/// Per-facet configuration of a mixed competition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetConfig {
    #[serde(default)]
    pub judges: Vec<JudgeId>,
    #[serde(default)]
    pub rules: Vec<ScoringRule>,
    #[serde(default)]
    pub award_types: Vec<AwardTypeDefinition>,
    #[serde(default)]
    pub evaluation_focus: String,
}

/// Unvalidated competition as collected by the configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CompetitionType,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: CompetitionStatus,
    #[serde(default)]
    pub judges: Vec<JudgeId>,
    #[serde(default)]
    pub participating_apps: Vec<ParticipantId>,
    #[serde(default)]
    pub participating_teams: Vec<ParticipantId>,
    #[serde(default)]
    pub rules: Vec<ScoringRule>,
    #[serde(default)]
    pub award_types: Vec<AwardTypeDefinition>,
    #[serde(default)]
    pub individual_config: Option<FacetConfig>,
    #[serde(default)]
    pub team_config: Option<FacetConfig>,
}

/// Competition accepted by the configuration guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CompetitionType,
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub status: CompetitionStatus,
    pub judges: Vec<JudgeId>,
    pub participating_apps: Vec<ParticipantId>,
    pub participating_teams: Vec<ParticipantId>,
    pub rules: Vec<ScoringRule>,
    pub award_types: Vec<AwardTypeDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_config: Option<FacetConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_config: Option<FacetConfig>,
}

impl Competition {
    /// Participant IDs registered for a facet.
    pub fn participants_for(&self, kind: ParticipantKind) -> &[ParticipantId] {
        match kind {
            ParticipantKind::Individual => &self.participating_apps,
            ParticipantKind::Team => &self.participating_teams,
        }
    }

    /// Facets in play: the single facet for individual/team competitions, both for mixed ones.
    pub fn facets(&self) -> Vec<ParticipantKind> {
        match self.kind.single_facet() {
            Some(kind) => vec![kind],
            None => ParticipantKind::ordered().to_vec(),
        }
    }

    /// Judge IDs assigned to a facet, without directory lookup.
    pub fn judge_ids_for(&self, kind: ParticipantKind) -> &[JudgeId] {
        match self.kind {
            CompetitionType::Mixed => self
                .facet_config(kind)
                .map(|config| config.judges.as_slice())
                .unwrap_or(&[]),
            _ if self.kind.single_facet() == Some(kind) => &self.judges,
            _ => &[],
        }
    }

    /// Configured rules of a facet, before the default fallback.
    pub fn configured_rules_for(&self, kind: ParticipantKind) -> &[ScoringRule] {
        match self.kind {
            CompetitionType::Mixed => self
                .facet_config(kind)
                .map(|config| config.rules.as_slice())
                .unwrap_or(&[]),
            _ => &self.rules,
        }
    }

    pub fn facet_config(&self, kind: ParticipantKind) -> Option<&FacetConfig> {
        match kind {
            ParticipantKind::Individual => self.individual_config.as_ref(),
            ParticipantKind::Team => self.team_config.as_ref(),
        }
    }

    pub fn references_judge(&self, judge_id: &JudgeId) -> bool {
        self.judges.contains(judge_id)
            || [&self.individual_config, &self.team_config]
                .into_iter()
                .flatten()
                .any(|config| config.judges.contains(judge_id))
    }

    pub fn references_participant(&self, participant_id: &ParticipantId) -> bool {
        self.participating_apps.contains(participant_id)
            || self.participating_teams.contains(participant_id)
    }
}

/// Judge directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judge {
    #[serde(default = "pending_judge_id")]
    pub id: JudgeId,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub expertise: Vec<String>,
}

fn pending_judge_id() -> JudgeId {
    JudgeId(String::new())
}

/// Team member roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
}

/// Team participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default = "pending_participant_id")]
    pub id: ParticipantId,
    pub name: String,
    pub leader: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub leader_phone: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub apps: Vec<String>,
    #[serde(default)]
    pub app_links: Vec<String>,
    #[serde(default)]
    pub submitted_app_count: usize,
}

/// Individual application entered into individual-type competitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualApp {
    #[serde(default = "pending_participant_id")]
    pub id: ParticipantId,
    pub name: String,
    pub creator: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, deserialize_with = "blank_as_none_date")]
    pub submission_date: Option<NaiveDate>,
}

fn pending_participant_id() -> ParticipantId {
    ParticipantId(String::new())
}

/// Participant of either facet, projected uniformly by resolution and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum Participant {
    Individual(IndividualApp),
    Team(Team),
}

impl Participant {
    pub fn id(&self) -> &ParticipantId {
        match self {
            Participant::Individual(app) => &app.id,
            Participant::Team(team) => &team.id,
        }
    }

    pub fn kind(&self) -> ParticipantKind {
        match self {
            Participant::Individual(_) => ParticipantKind::Individual,
            Participant::Team(_) => ParticipantKind::Team,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Participant::Individual(app) => &app.name,
            Participant::Team(team) => &team.name,
        }
    }

    /// Creator of an individual app, leader of a team.
    pub fn owner_name(&self) -> &str {
        match self {
            Participant::Individual(app) => &app.creator,
            Participant::Team(team) => &team.leader,
        }
    }

    pub fn department(&self) -> &str {
        match self {
            Participant::Individual(app) => &app.department,
            Participant::Team(team) => &team.department,
        }
    }
}

/// Current rubric record for one (judge, participant) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeScore {
    pub judge_id: JudgeId,
    #[serde(rename = "appId")]
    pub participant_id: ParticipantId,
    pub scores: BTreeMap<String, u8>,
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

/// Inbound rubric submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub judge_id: JudgeId,
    #[serde(rename = "appId")]
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub scores: BTreeMap<String, u8>,
    #[serde(default)]
    pub comments: String,
}

/// Treats `""` (what HTML date inputs post when untouched) the same as a missing date.
pub(crate) fn blank_as_none_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|err| {
                serde::de::Error::custom(format!("failed to parse '{value}' as YYYY-MM-DD ({err})"))
            }),
    }
}
