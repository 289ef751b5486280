use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    Competition, IndividualApp, Judge, JudgeId, Participant, ParticipantId,
    ParticipantKind, ScoringRule, Team, UNKNOWN_LABEL,
};

/// Canonical rubric for individual participants when a competition defines no rules.
pub const INDIVIDUAL_DEFAULT_RULES: [(&str, &str); 5] = [
    ("創新性", "創意新穎程度與解決問題的獨特性"),
    ("技術性", "技術實現難度與完成度"),
    ("實用性", "解決實際工作問題的程度"),
    ("展示效果", "介面設計與展示呈現品質"),
    ("影響力", "對組織與使用者的潛在影響"),
];

/// Canonical rubric for teams when a competition defines no rules.
pub const TEAM_DEFAULT_RULES: [(&str, &str); 5] = [
    ("團隊合作", "成員分工與協作成效"),
    ("創新性", "創意新穎程度與解決問題的獨特性"),
    ("技術性", "技術實現難度與完成度"),
    ("實用性", "解決實際工作問題的程度"),
    ("展示效果", "介面設計與展示呈現品質"),
];

const DEFAULT_RULE_WEIGHT: u32 = 20;

pub fn default_rules(kind: ParticipantKind) -> Vec<ScoringRule> {
    let table = match kind {
        ParticipantKind::Individual => &INDIVIDUAL_DEFAULT_RULES,
        ParticipantKind::Team => &TEAM_DEFAULT_RULES,
    };

    table
        .iter()
        .enumerate()
        .map(|(index, (name, description))| ScoringRule {
            id: format!("default-{}-{}", kind.label(), index + 1),
            name: (*name).to_string(),
            description: (*description).to_string(),
            weight: DEFAULT_RULE_WEIGHT,
        })
        .collect()
}

/// Rules in force for a facet, falling back to the default rubric.
pub fn applicable_rules(competition: &Competition, kind: ParticipantKind) -> Vec<ScoringRule> {
    let configured = competition.configured_rules_for(kind);
    if configured.is_empty() {
        default_rules(kind)
    } else {
        configured.to_vec()
    }
}

/// Point-in-time copy of the judge and participant directories.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub judges: BTreeMap<JudgeId, Judge>,
    pub apps: BTreeMap<ParticipantId, IndividualApp>,
    pub teams: BTreeMap<ParticipantId, Team>,
}

impl DirectorySnapshot {
    pub fn new(judges: Vec<Judge>, apps: Vec<IndividualApp>, teams: Vec<Team>) -> Self {
        Self {
            judges: judges.into_iter().map(|judge| (judge.id.clone(), judge)).collect(),
            apps: apps.into_iter().map(|app| (app.id.clone(), app)).collect(),
            teams: teams.into_iter().map(|team| (team.id.clone(), team)).collect(),
        }
    }

    pub fn participant(&self, kind: ParticipantKind, id: &ParticipantId) -> Option<Participant> {
        match kind {
            ParticipantKind::Individual => self.apps.get(id).cloned().map(Participant::Individual),
            ParticipantKind::Team => self.teams.get(id).cloned().map(Participant::Team),
        }
    }

    pub fn judge_name(&self, id: &JudgeId) -> String {
        self.judges
            .get(id)
            .map(|judge| judge.name.clone())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }
}

/// Free-text and department filter applied to a participant pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub department: Option<String>,
}

impl ParticipantFilter {
    pub fn matches(&self, participant: &Participant) -> bool {
        let needle = self.search.trim().to_lowercase();
        let text_match = needle.is_empty()
            || participant.display_name().to_lowercase().contains(&needle)
            || participant.owner_name().to_lowercase().contains(&needle);

        let department_match = match self.department.as_deref().map(str::trim) {
            None | Some("") | Some("all") => true,
            Some(department) => participant.department() == department,
        };

        text_match && department_match
    }
}

/// Judges, rules and participants applicable to one facet of a competition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub facet: ParticipantKind,
    pub judges: Vec<Judge>,
    pub rules: Vec<ScoringRule>,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("mixed competitions require a participant type to be selected")]
    FacetRequired,
    #[error("{competition} competitions do not score {facet} participants")]
    FacetMismatch {
        competition: &'static str,
        facet: &'static str,
    },
}

/// Pick the facet to project, defaulting to the only facet of single-type competitions.
pub fn select_facet(
    competition: &Competition,
    facet: Option<ParticipantKind>,
) -> Result<ParticipantKind, ResolutionError> {
    match (competition.kind.single_facet(), facet) {
        (None, Some(kind)) => Ok(kind),
        (None, None) => Err(ResolutionError::FacetRequired),
        (Some(own), None) => Ok(own),
        (Some(own), Some(kind)) if own == kind => Ok(kind),
        (Some(_), Some(kind)) => Err(ResolutionError::FacetMismatch {
            competition: competition.kind.label(),
            facet: kind.label(),
        }),
    }
}

/// Resolve the judge set, rule set and filtered participant pool of a facet. IDs without a
/// directory entry are dropped.
pub fn resolve(
    competition: &Competition,
    facet: Option<ParticipantKind>,
    directory: &DirectorySnapshot,
    filter: &ParticipantFilter,
) -> Result<Resolution, ResolutionError> {
    let facet = select_facet(competition, facet)?;

    let judges = competition
        .judge_ids_for(facet)
        .iter()
        .filter_map(|id| directory.judges.get(id).cloned())
        .collect();

    let participants = competition
        .participants_for(facet)
        .iter()
        .filter_map(|id| directory.participant(facet, id))
        .filter(|participant| filter.matches(participant))
        .collect();

    Ok(Resolution {
        facet,
        judges,
        rules: applicable_rules(competition, facet),
        participants,
    })
}

/// Facet scoring a participant in this competition, if it is registered at all.
pub fn facet_of(competition: &Competition, participant_id: &ParticipantId) -> Option<ParticipantKind> {
    competition
        .facets()
        .into_iter()
        .find(|kind| competition.participants_for(*kind).contains(participant_id))
}

/// Facet in which the competition expects this judge to score this participant.
pub fn expected_pair_facet(
    competition: &Competition,
    judge_id: &JudgeId,
    participant_id: &ParticipantId,
) -> Option<ParticipantKind> {
    competition.facets().into_iter().find(|kind| {
        competition.judge_ids_for(*kind).contains(judge_id)
            && competition.participants_for(*kind).contains(participant_id)
    })
}
