use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use super::domain::{
    AwardTypeDefinition, Competition, CompetitionDraft, CompetitionId, FacetConfig, ParticipantId,
    ParticipantKind, ScoringRule,
};

/// Required total of rule weights within one rule set.
pub const REQUIRED_WEIGHT_TOTAL: u64 = 100;

/// Validation errors raised before a competition may be created or edited.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompetitionViolation {
    #[error("missing required fields: name, start date and end date must be filled in")]
    MissingRequiredFields,
    #[error("end date {end} is earlier than start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("select at least one judge")]
    NoJudges,
    #[error("select at least one participant")]
    NoParticipants,
    #[error("select at least one judge for a participant type that has participants")]
    NoJudgedFacet,
    #[error("{scope} rule weights must sum to 100 (found {total})")]
    WeightSum { scope: &'static str, total: u64 },
    #[error("{scope} rule #{position} needs both a name and a description")]
    BlankRule { scope: &'static str, position: usize },
    #[error("{scope} award type #{position} needs both a name and a description")]
    BlankAwardType { scope: &'static str, position: usize },
    #[error("{scope} rule {name:?} is listed more than once")]
    DuplicateRule { scope: &'static str, name: String },
    #[error("month {0} is outside 1-12")]
    InvalidMonth(u32),
}

/// Guard turning drafts into validated competitions. Checks run in a fixed order and the first
/// failure wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationGuard;

impl ConfigurationGuard {
    pub fn competition_from_draft(
        &self,
        id: CompetitionId,
        draft: CompetitionDraft,
    ) -> Result<Competition, CompetitionViolation> {
        let name = draft.name.trim().to_string();
        let (start_date, end_date) = match (draft.start_date, draft.end_date) {
            (Some(start), Some(end)) if !name.is_empty() => (start, end),
            _ => return Err(CompetitionViolation::MissingRequiredFields),
        };
        if end_date < start_date {
            return Err(CompetitionViolation::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        let month = draft.month.unwrap_or_else(|| start_date.month());
        if !(1..=12).contains(&month) {
            return Err(CompetitionViolation::InvalidMonth(month));
        }

        let judges = dedup(draft.judges);
        let mut participating_apps = dedup(draft.participating_apps);
        let mut participating_teams = dedup(draft.participating_teams);
        let mut rules = draft.rules;
        let mut award_types = draft.award_types;
        let mut individual_config = draft.individual_config;
        let mut team_config = draft.team_config;

        match draft.kind.single_facet() {
            None => {
                check_mixed(
                    individual_config.as_ref(),
                    team_config.as_ref(),
                    &participating_apps,
                    &participating_teams,
                )?;
                for config in [&mut individual_config, &mut team_config]
                    .into_iter()
                    .flatten()
                {
                    config.judges = dedup(std::mem::take(&mut config.judges));
                    normalize_rules(&mut config.rules);
                    normalize_award_types(&mut config.award_types);
                }
            }
            Some(facet) => {
                if judges.is_empty() {
                    return Err(CompetitionViolation::NoJudges);
                }
                let participants = match facet {
                    ParticipantKind::Individual => &participating_apps,
                    ParticipantKind::Team => &participating_teams,
                };
                if participants.is_empty() {
                    return Err(CompetitionViolation::NoParticipants);
                }
                check_rules("competition", &rules)?;
                check_award_types("competition", &award_types)?;

                normalize_rules(&mut rules);
                normalize_award_types(&mut award_types);
                match facet {
                    ParticipantKind::Individual => participating_teams.clear(),
                    ParticipantKind::Team => participating_apps.clear(),
                }
                individual_config = None;
                team_config = None;
            }
        }

        Ok(Competition {
            id,
            name,
            kind: draft.kind,
            year: draft.year.unwrap_or_else(|| start_date.year()),
            month,
            start_date,
            end_date,
            description: draft.description.trim().to_string(),
            status: draft.status,
            judges,
            participating_apps,
            participating_teams,
            rules,
            award_types,
            individual_config,
            team_config,
        })
    }
}

fn check_mixed(
    individual: Option<&FacetConfig>,
    team: Option<&FacetConfig>,
    apps: &[ParticipantId],
    teams: &[ParticipantId],
) -> Result<(), CompetitionViolation> {
    let has_judges = |config: Option<&FacetConfig>| {
        config.map(|config| !config.judges.is_empty()).unwrap_or(false)
    };

    if !has_judges(individual) && !has_judges(team) {
        return Err(CompetitionViolation::NoJudges);
    }
    if apps.is_empty() && teams.is_empty() {
        return Err(CompetitionViolation::NoParticipants);
    }

    let facets = [
        (ParticipantKind::Individual, individual, apps),
        (ParticipantKind::Team, team, teams),
    ];
    let mut judged = false;
    for (kind, config, participants) in facets {
        let Some(config) = config else { continue };
        if participants.is_empty() || config.judges.is_empty() {
            continue;
        }
        judged = true;
        check_rules(kind.label(), &config.rules)?;
        check_award_types(kind.label(), &config.award_types)?;
    }

    if judged {
        Ok(())
    } else {
        Err(CompetitionViolation::NoJudgedFacet)
    }
}

fn check_rules(scope: &'static str, rules: &[ScoringRule]) -> Result<(), CompetitionViolation> {
    if rules.is_empty() {
        return Ok(());
    }

    let total = weight_total(rules);
    if total != REQUIRED_WEIGHT_TOTAL {
        return Err(CompetitionViolation::WeightSum { scope, total });
    }

    if let Some(position) = rules
        .iter()
        .position(|rule| rule.name.trim().is_empty() || rule.description.trim().is_empty())
    {
        return Err(CompetitionViolation::BlankRule {
            scope,
            position: position + 1,
        });
    }

    // Rule names key the submitted score maps.
    let mut seen = HashSet::new();
    for rule in rules {
        let name = rule.name.trim();
        if !seen.insert(name) {
            return Err(CompetitionViolation::DuplicateRule {
                scope,
                name: name.to_string(),
            });
        }
    }

    Ok(())
}

fn check_award_types(
    scope: &'static str,
    award_types: &[AwardTypeDefinition],
) -> Result<(), CompetitionViolation> {
    match award_types
        .iter()
        .position(|award| award.name.trim().is_empty() || award.description.trim().is_empty())
    {
        Some(position) => Err(CompetitionViolation::BlankAwardType {
            scope,
            position: position + 1,
        }),
        None => Ok(()),
    }
}

pub fn weight_total(rules: &[ScoringRule]) -> u64 {
    rules.iter().map(|rule| u64::from(rule.weight)).sum()
}

fn normalize_rules(rules: &mut [ScoringRule]) {
    for (index, rule) in rules.iter_mut().enumerate() {
        rule.name = rule.name.trim().to_string();
        rule.description = rule.description.trim().to_string();
        if rule.id.trim().is_empty() {
            rule.id = format!("rule-{}", index + 1);
        }
    }
}

fn normalize_award_types(award_types: &mut [AwardTypeDefinition]) {
    for (index, award) in award_types.iter_mut().enumerate() {
        award.name = award.name.trim().to_string();
        award.description = award.description.trim().to_string();
        if award.id.trim().is_empty() {
            award.id = format!("award-type-{}", index + 1);
        }
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
