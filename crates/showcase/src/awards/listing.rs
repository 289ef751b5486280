use std::cmp::Ordering;

use serde::Deserialize;

use crate::competitions::domain::{CompetitionId, CompetitionType};

use super::domain::{Award, AwardKind};

/// Query applied to the award collection when listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    /// An award type label, `ranking` (rank 1 to 3) or `popular`.
    #[serde(default)]
    pub award_type: Option<String>,
    #[serde(default)]
    pub competition_type: Option<CompetitionType>,
}

impl AwardQuery {
    /// Filters run in order: text, year, month, type/category, competition type.
    pub fn matches<F>(&self, award: &Award, competition_type_of: &F) -> bool
    where
        F: Fn(&CompetitionId) -> Option<CompetitionType>,
    {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && ![&award.app_name, &award.creator, &award.award_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }

        if self.year.map(|year| award.year != year).unwrap_or(false) {
            return false;
        }

        if self.month.map(|month| award.month != month).unwrap_or(false) {
            return false;
        }

        if let Some(filter) = self.award_type.as_deref().map(str::trim) {
            let keep = match filter {
                "" | "all" => true,
                "ranking" => (1..=3).contains(&award.rank),
                "popular" => award.award_type == AwardKind::Popular,
                other => {
                    award.award_type.label() == other || award.category.label() == other
                }
            };
            if !keep {
                return false;
            }
        }

        if let Some(expected) = self.competition_type {
            if competition_type_of(&award.competition_id) != Some(expected) {
                return false;
            }
        }

        true
    }
}

/// Year descending, then month descending, then rank ascending with unranked awards last.
pub fn listing_order(left: &Award, right: &Award) -> Ordering {
    right
        .year
        .cmp(&left.year)
        .then_with(|| right.month.cmp(&left.month))
        .then_with(|| rank_key(left.rank).cmp(&rank_key(right.rank)))
}

fn rank_key(rank: u8) -> u16 {
    if rank == 0 {
        u16::MAX
    } else {
        u16::from(rank)
    }
}

pub fn filter_and_sort<F>(awards: Vec<Award>, query: &AwardQuery, competition_type_of: F) -> Vec<Award>
where
    F: Fn(&CompetitionId) -> Option<CompetitionType>,
{
    let mut listed: Vec<Award> = awards
        .into_iter()
        .filter(|award| query.matches(award, &competition_type_of))
        .collect();
    listed.sort_by(listing_order);
    listed
}
