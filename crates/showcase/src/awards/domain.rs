use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::competitions::domain::{CompetitionId, ParticipantId, ParticipantKind};

/// Display label used in place of an app name for team awards.
pub const TEAM_WORK_LABEL: &str = "團隊作品";

/// Identifier wrapper for awards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AwardId(pub String);

/// Award type. Unrecognised labels deserialize as `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardKind {
    Gold,
    Silver,
    Bronze,
    Popular,
    Innovation,
    Technical,
    #[serde(other)]
    Custom,
}

impl AwardKind {
    pub const fn label(self) -> &'static str {
        match self {
            AwardKind::Gold => "gold",
            AwardKind::Silver => "silver",
            AwardKind::Bronze => "bronze",
            AwardKind::Popular => "popular",
            AwardKind::Innovation => "innovation",
            AwardKind::Technical => "technical",
            AwardKind::Custom => "custom",
        }
    }

    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "gold" => AwardKind::Gold,
            "silver" => AwardKind::Silver,
            "bronze" => AwardKind::Bronze,
            "popular" => AwardKind::Popular,
            "innovation" => AwardKind::Innovation,
            "technical" => AwardKind::Technical,
            _ => AwardKind::Custom,
        }
    }
}

/// Listing category derived from the award type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardCategory {
    Ranking,
    Popular,
    Special,
    Custom,
}

impl AwardCategory {
    pub const fn label(self) -> &'static str {
        match self {
            AwardCategory::Ranking => "ranking",
            AwardCategory::Popular => "popular",
            AwardCategory::Special => "special",
            AwardCategory::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationLinks {
    #[serde(default)]
    pub production: String,
    #[serde(default)]
    pub demo: String,
    #[serde(default)]
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardPhoto {
    pub id: String,
    pub name: String,
    pub url: String,
    pub caption: String,
    pub upload_date: DateTime<Utc>,
    pub size: u64,
}

/// Admin input for issuing or editing an award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardDraft {
    pub competition_id: CompetitionId,
    pub participant_type: ParticipantKind,
    pub participant_id: ParticipantId,
    pub award_type: AwardKind,
    #[serde(default)]
    pub award_name: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub rank: Option<u8>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub judge_comments: String,
    #[serde(default)]
    pub application_links: ApplicationLinks,
}

/// Curated award record. `app_name` and `creator` are snapshots taken when the award was
/// issued; see `AwardService::view` for the live projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub id: AwardId,
    pub competition_id: CompetitionId,
    pub participant_type: ParticipantKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<ParticipantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<ParticipantId>,
    pub app_name: String,
    pub creator: String,
    pub award_type: AwardKind,
    pub award_name: String,
    pub score: f32,
    pub year: i32,
    pub month: u32,
    pub icon: String,
    pub rank: u8,
    pub category: AwardCategory,
    pub description: String,
    pub judge_comments: String,
    pub application_links: ApplicationLinks,
    #[serde(default)]
    pub documents: Vec<AwardDocument>,
    #[serde(default)]
    pub photos: Vec<AwardPhoto>,
}

impl Award {
    pub fn participant_id(&self) -> Option<&ParticipantId> {
        match self.participant_type {
            ParticipantKind::Individual => self.app_id.as_ref(),
            ParticipantKind::Team => self.team_id.as_ref(),
        }
    }

    pub fn references_participant(&self, id: &ParticipantId) -> bool {
        self.participant_id() == Some(id)
    }
}
