//! In-memory implementation of every repository trait, used by the service binary and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::awards::domain::{Award, AwardId};
use crate::awards::storage::AwardRepository;
use crate::competitions::domain::{
    Competition, CompetitionId, IndividualApp, Judge, JudgeId, JudgeScore, ParticipantId, Team,
};
use crate::competitions::repository::{
    CompetitionRepository, JudgeRepository, ParticipantRepository, RepositoryError,
    ScoreRepository,
};

#[derive(Debug, Default)]
struct Tables {
    competitions: BTreeMap<CompetitionId, Competition>,
    judges: BTreeMap<JudgeId, Judge>,
    apps: BTreeMap<ParticipantId, IndividualApp>,
    teams: BTreeMap<ParticipantId, Team>,
    scores: BTreeMap<(JudgeId, ParticipantId), JudgeScore>,
    awards: BTreeMap<AwardId, Award>,
}

/// Shared, mutex-guarded tables. Clones share the same data.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        f(&mut guard)
    }
}

fn insert_new<K: Ord + Clone, V: Clone>(
    table: &mut BTreeMap<K, V>,
    key: &K,
    value: V,
) -> Result<V, RepositoryError> {
    if table.contains_key(key) {
        return Err(RepositoryError::Conflict);
    }
    table.insert(key.clone(), value.clone());
    Ok(value)
}

fn modify_existing<K: Ord, V: Clone, T>(
    table: &mut BTreeMap<K, V>,
    key: &K,
    change: impl FnOnce(&mut V) -> Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    let slot = table.get_mut(key).ok_or(RepositoryError::NotFound)?;
    let mut next = slot.clone();
    let outcome = change(&mut next)?;
    *slot = next;
    Ok(outcome)
}

fn replace_existing<K: Ord + Clone, V>(
    table: &mut BTreeMap<K, V>,
    key: &K,
    value: V,
) -> Result<(), RepositoryError> {
    match table.get_mut(key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(RepositoryError::NotFound),
    }
}

impl CompetitionRepository for MemoryStore {
    fn insert_competition(&self, competition: Competition) -> Result<Competition, RepositoryError> {
        let key = competition.id.clone();
        self.with_tables(|tables| insert_new(&mut tables.competitions, &key, competition))
    }

    fn update_competition(&self, competition: Competition) -> Result<(), RepositoryError> {
        let key = competition.id.clone();
        self.with_tables(|tables| replace_existing(&mut tables.competitions, &key, competition))
    }

    fn fetch_competition(
        &self,
        id: &CompetitionId,
    ) -> Result<Option<Competition>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.competitions.get(id).cloned()))
    }

    fn list_competitions(&self) -> Result<Vec<Competition>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.competitions.values().cloned().collect()))
    }

    fn delete_competition(&self, id: &CompetitionId) -> Result<Competition, RepositoryError> {
        self.with_tables(|tables| tables.competitions.remove(id))
            .ok_or(RepositoryError::NotFound)
    }

    fn modify_competition<T, F>(&self, id: &CompetitionId, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Competition) -> Result<T, RepositoryError>,
    {
        self.with_tables(|tables| modify_existing(&mut tables.competitions, id, change))
    }
}

impl JudgeRepository for MemoryStore {
    fn insert_judge(&self, judge: Judge) -> Result<Judge, RepositoryError> {
        let key = judge.id.clone();
        self.with_tables(|tables| insert_new(&mut tables.judges, &key, judge))
    }

    fn update_judge(&self, judge: Judge) -> Result<(), RepositoryError> {
        let key = judge.id.clone();
        self.with_tables(|tables| replace_existing(&mut tables.judges, &key, judge))
    }

    fn fetch_judge(&self, id: &JudgeId) -> Result<Option<Judge>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.judges.get(id).cloned()))
    }

    fn list_judges(&self) -> Result<Vec<Judge>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.judges.values().cloned().collect()))
    }

    fn delete_judge(&self, id: &JudgeId) -> Result<Judge, RepositoryError> {
        self.with_tables(|tables| tables.judges.remove(id))
            .ok_or(RepositoryError::NotFound)
    }
}

impl ParticipantRepository for MemoryStore {
    fn insert_app(&self, app: IndividualApp) -> Result<IndividualApp, RepositoryError> {
        let key = app.id.clone();
        self.with_tables(|tables| insert_new(&mut tables.apps, &key, app))
    }

    fn update_app(&self, app: IndividualApp) -> Result<(), RepositoryError> {
        let key = app.id.clone();
        self.with_tables(|tables| replace_existing(&mut tables.apps, &key, app))
    }

    fn fetch_app(&self, id: &ParticipantId) -> Result<Option<IndividualApp>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.apps.get(id).cloned()))
    }

    fn list_apps(&self) -> Result<Vec<IndividualApp>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.apps.values().cloned().collect()))
    }

    fn delete_app(&self, id: &ParticipantId) -> Result<IndividualApp, RepositoryError> {
        self.with_tables(|tables| tables.apps.remove(id))
            .ok_or(RepositoryError::NotFound)
    }

    fn insert_team(&self, team: Team) -> Result<Team, RepositoryError> {
        let key = team.id.clone();
        self.with_tables(|tables| insert_new(&mut tables.teams, &key, team))
    }

    fn update_team(&self, team: Team) -> Result<(), RepositoryError> {
        let key = team.id.clone();
        self.with_tables(|tables| replace_existing(&mut tables.teams, &key, team))
    }

    fn fetch_team(&self, id: &ParticipantId) -> Result<Option<Team>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.teams.get(id).cloned()))
    }

    fn list_teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.teams.values().cloned().collect()))
    }

    fn delete_team(&self, id: &ParticipantId) -> Result<Team, RepositoryError> {
        self.with_tables(|tables| tables.teams.remove(id))
            .ok_or(RepositoryError::NotFound)
    }
}

impl ScoreRepository for MemoryStore {
    fn upsert_score(&self, score: JudgeScore) -> Result<Option<JudgeScore>, RepositoryError> {
        let key = (score.judge_id.clone(), score.participant_id.clone());
        Ok(self.with_tables(|tables| tables.scores.insert(key, score)))
    }

    fn list_scores(&self) -> Result<Vec<JudgeScore>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.scores.values().cloned().collect()))
    }
}

impl AwardRepository for MemoryStore {
    fn insert_award(&self, award: Award) -> Result<Award, RepositoryError> {
        let key = award.id.clone();
        self.with_tables(|tables| insert_new(&mut tables.awards, &key, award))
    }

    fn fetch_award(&self, id: &AwardId) -> Result<Option<Award>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.awards.get(id).cloned()))
    }

    fn list_awards(&self) -> Result<Vec<Award>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.awards.values().cloned().collect()))
    }

    fn delete_award(&self, id: &AwardId) -> Result<Award, RepositoryError> {
        self.with_tables(|tables| tables.awards.remove(id))
            .ok_or(RepositoryError::NotFound)
    }

    fn modify_award<T, F>(&self, id: &AwardId, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Award) -> Result<T, RepositoryError>,
    {
        self.with_tables(|tables| modify_existing(&mut tables.awards, id, change))
    }
}
