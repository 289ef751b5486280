use crate::competitions::domain::{Competition, Participant, ParticipantKind, UNKNOWN_LABEL};
use crate::competitions::resolution::select_facet;

use super::domain::{Award, AwardCategory, AwardDraft, AwardId, AwardKind, TEAM_WORK_LABEL};

/// Highest display rating an award may carry.
pub const MAX_AWARD_SCORE: f32 = 5.0;

/// Validation errors raised while building an award.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AwardViolation {
    #[error("missing required fields: competition, participant and award name must be filled in")]
    MissingRequiredFields,
    #[error("award targets competition {expected:?} but draft names {found:?}")]
    CompetitionMismatch { expected: String, found: String },
    #[error("{competition} competitions do not award {facet} participants")]
    FacetMismatch {
        competition: &'static str,
        facet: &'static str,
    },
    #[error("participant {0:?} is not registered in this competition")]
    ParticipantNotRegistered(String),
    #[error("award score must be between 0.0 and 5.0 (found {0})")]
    ScoreOutOfRange(f32),
    #[error("award rank must be 0 (unranked) or 1 to 3 (found {0})")]
    RankOutOfRange(u8),
}

pub fn award_icon(kind: AwardKind) -> &'static str {
    match kind {
        AwardKind::Gold => "🥇",
        AwardKind::Silver => "🥈",
        AwardKind::Bronze => "🥉",
        AwardKind::Popular => "👥",
        AwardKind::Innovation => "💡",
        AwardKind::Technical => "⚙️",
        AwardKind::Custom => "🏆",
    }
}

pub fn award_category(kind: AwardKind) -> AwardCategory {
    match kind {
        AwardKind::Gold | AwardKind::Silver | AwardKind::Bronze => AwardCategory::Ranking,
        AwardKind::Popular => AwardCategory::Popular,
        AwardKind::Innovation | AwardKind::Technical => AwardCategory::Special,
        AwardKind::Custom => AwardCategory::Custom,
    }
}

/// Placement implied by the award type when the admin does not pick one.
pub fn default_rank(kind: AwardKind) -> u8 {
    match kind {
        AwardKind::Gold => 1,
        AwardKind::Silver => 2,
        AwardKind::Bronze => 3,
        _ => 0,
    }
}

/// Display fields for the participant: app name and creator for individuals, the team-work
/// label and team name for teams.
pub fn display_fields(kind: ParticipantKind, participant: Option<&Participant>) -> (String, String) {
    match (kind, participant) {
        (ParticipantKind::Individual, Some(participant)) => (
            participant.display_name().to_string(),
            participant.owner_name().to_string(),
        ),
        (ParticipantKind::Team, Some(participant)) => (
            TEAM_WORK_LABEL.to_string(),
            participant.display_name().to_string(),
        ),
        (ParticipantKind::Individual, None) => {
            (UNKNOWN_LABEL.to_string(), UNKNOWN_LABEL.to_string())
        }
        (ParticipantKind::Team, None) => (TEAM_WORK_LABEL.to_string(), UNKNOWN_LABEL.to_string()),
    }
}

/// Build an award from a draft, the competition it belongs to, and the participant looked up
/// from the directory (`None` when the directory has no entry).
/// Reject drafts with a blank competition, participant or award name. Needs no lookups.
pub fn check_required_fields(draft: &AwardDraft) -> Result<(), AwardViolation> {
    if draft.competition_id.0.trim().is_empty()
        || draft.participant_id.0.trim().is_empty()
        || draft.award_name.trim().is_empty()
    {
        return Err(AwardViolation::MissingRequiredFields);
    }
    Ok(())
}

pub fn derive_award(
    id: AwardId,
    draft: AwardDraft,
    competition: &Competition,
    participant: Option<&Participant>,
) -> Result<Award, AwardViolation> {
    check_required_fields(&draft)?;
    let award_name = draft.award_name.trim().to_string();

    if draft.competition_id != competition.id {
        return Err(AwardViolation::CompetitionMismatch {
            expected: competition.id.0.clone(),
            found: draft.competition_id.0,
        });
    }

    let facet = select_facet(competition, Some(draft.participant_type)).map_err(|_| {
        AwardViolation::FacetMismatch {
            competition: competition.kind.label(),
            facet: draft.participant_type.label(),
        }
    })?;
    if !competition.participants_for(facet).contains(&draft.participant_id) {
        return Err(AwardViolation::ParticipantNotRegistered(
            draft.participant_id.0,
        ));
    }

    if !draft.score.is_finite() || !(0.0..=MAX_AWARD_SCORE).contains(&draft.score) {
        return Err(AwardViolation::ScoreOutOfRange(draft.score));
    }

    let rank = draft.rank.unwrap_or_else(|| default_rank(draft.award_type));
    if rank > 3 {
        return Err(AwardViolation::RankOutOfRange(rank));
    }

    let (app_name, creator) = display_fields(facet, participant);
    let (app_id, team_id) = match facet {
        ParticipantKind::Individual => (Some(draft.participant_id), None),
        ParticipantKind::Team => (None, Some(draft.participant_id)),
    };

    Ok(Award {
        id,
        competition_id: competition.id.clone(),
        participant_type: facet,
        app_id,
        team_id,
        app_name,
        creator,
        award_type: draft.award_type,
        award_name,
        score: draft.score,
        year: competition.year,
        month: competition.month,
        icon: award_icon(draft.award_type).to_string(),
        rank,
        category: award_category(draft.award_type),
        description: draft.description.trim().to_string(),
        judge_comments: draft.judge_comments.trim().to_string(),
        application_links: draft.application_links,
        documents: Vec::new(),
        photos: Vec::new(),
    })
}
