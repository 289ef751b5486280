use crate::infra::Console;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use showcase::awards::{AwardDraft, AwardKind, AwardQuery};
use showcase::competitions::{
    CompetitionDraft, CompetitionId, CompetitionStatus, CompetitionType, FacetConfig,
    IndividualApp, Judge, JudgeId, ParticipantId, ParticipantKind, ScoreSubmission,
    ScoreStatus, ScoringOverview, ScoringRule, Team, TeamMember,
};
use showcase::error::AppError;
use std::collections::BTreeMap;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Competition start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Print the scoring table as CSV after the summary.
    #[arg(long)]
    pub(crate) csv: bool,
}

struct Seeded {
    competition: CompetitionId,
    judges: Vec<JudgeId>,
    apps: Vec<ParticipantId>,
    team: ParticipantId,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let start = args.start.unwrap_or_else(|| Local::now().date_naive());
    let console = Console::in_memory();

    println!("Showcase console demo");
    let seeded = seed(&console, start)?;
    let competition = console.competitions.get_competition(&seeded.competition)?;
    println!(
        "- {} ({}) {} to {} | {} apps, {} team(s)",
        competition.name,
        competition.kind.label(),
        competition.start_date,
        competition.end_date,
        competition.participating_apps.len(),
        competition.participating_teams.len()
    );

    let rubric = [("Originality", 9), ("Usefulness", 7)];
    for (app, comment) in seeded.apps.iter().zip(["sharp copy", "needs polish"]) {
        let receipt = console.competitions.submit_judge_score(
            &seeded.competition,
            submission(&seeded.judges[0], app, &rubric, comment),
        )?;
        println!(
            "- scored {} for {}: total {}",
            app.0,
            receipt.facet.label(),
            receipt.total_score
        );
    }

    let overview = console.competitions.scoring_overview(&seeded.competition)?;
    render_progress(&overview);

    let award = console.awards.issue_award(AwardDraft {
        competition_id: seeded.competition.clone(),
        participant_type: ParticipantKind::Individual,
        participant_id: seeded.apps[0].clone(),
        award_type: AwardKind::Gold,
        award_name: "Best in Show".to_string(),
        score: 4.8,
        rank: None,
        description: "Highest weighted total of the individual facet".to_string(),
        judge_comments: "sharp copy".to_string(),
        application_links: Default::default(),
    })?;
    println!("\nAwards (latest {})", award.id.0);
    for view in console.awards.list_awards(&AwardQuery::default())? {
        println!(
            "- {} {} | {} by {} | rank {}",
            view.award.icon,
            view.award.award_name,
            view.award.app_name,
            view.award.creator,
            view.award.rank
        );
    }

    if args.csv {
        println!();
        overview.write_csv(std::io::stdout())?;
    }
    Ok(())
}

fn seed(console: &Console, start: NaiveDate) -> Result<Seeded, AppError> {
    let services = &console.competitions;
    let mut judges = Vec::new();
    for (name, title) in [("Ada", "Director"), ("Grace", "Principal Engineer")] {
        let judge = services.add_judge(Judge {
            id: JudgeId(String::new()),
            name: name.to_string(),
            title: title.to_string(),
            department: "Technology".to_string(),
            expertise: Vec::new(),
        })?;
        judges.push(judge.id);
    }

    let mut apps = Vec::new();
    for (name, creator, department) in [
        ("Writer Bot", "Lin", "Marketing"),
        ("Chart Helper", "Chen", "Finance"),
    ] {
        let app = services.add_app(IndividualApp {
            id: ParticipantId(String::new()),
            name: name.to_string(),
            creator: creator.to_string(),
            department: department.to_string(),
            submission_date: Some(start),
        })?;
        apps.push(app.id);
    }

    let team = services.add_team(Team {
        id: ParticipantId(String::new()),
        name: "Moonshot".to_string(),
        leader: "Wei".to_string(),
        department: "Research".to_string(),
        contact_email: "moonshot@example.com".to_string(),
        leader_phone: String::new(),
        description: "Meeting summariser".to_string(),
        members: ["Wei", "Mei"]
            .into_iter()
            .map(|name| TeamMember {
                id: String::new(),
                name: name.to_string(),
                department: "Research".to_string(),
                role: String::new(),
            })
            .collect(),
        apps: Vec::new(),
        app_links: Vec::new(),
        submitted_app_count: 0,
    })?;

    let competition = services.create_competition(CompetitionDraft {
        name: "Showcase Demo Cup".to_string(),
        kind: CompetitionType::Mixed,
        year: None,
        month: None,
        start_date: Some(start),
        end_date: Some(start + Duration::days(28)),
        description: String::new(),
        status: CompetitionStatus::Judging,
        judges: Vec::new(),
        participating_apps: apps.clone(),
        participating_teams: vec![team.id.clone()],
        rules: Vec::new(),
        award_types: Vec::new(),
        individual_config: Some(FacetConfig {
            judges: vec![judges[0].clone()],
            rules: vec![rule("Originality", 60), rule("Usefulness", 40)],
            ..FacetConfig::default()
        }),
        team_config: Some(FacetConfig {
            judges: vec![judges[1].clone()],
            ..FacetConfig::default()
        }),
    })?;

    Ok(Seeded {
        competition: competition.id,
        judges,
        apps,
        team: team.id,
    })
}

fn rule(name: &str, weight: u32) -> ScoringRule {
    ScoringRule {
        id: String::new(),
        name: name.to_string(),
        description: format!("{name} of the submission"),
        weight,
    }
}

fn submission(
    judge: &JudgeId,
    participant: &ParticipantId,
    rubric: &[(&str, u8)],
    comments: &str,
) -> ScoreSubmission {
    ScoreSubmission {
        judge_id: judge.clone(),
        participant_id: participant.clone(),
        scores: rubric
            .iter()
            .map(|(name, score)| (name.to_string(), *score))
            .collect::<BTreeMap<_, _>>(),
        comments: comments.to_string(),
    }
}

fn render_progress(overview: &ScoringOverview) {
    println!("\nJudging progress");
    for judge in &overview.judges {
        println!(
            "- {}: {}/{} ({}%)",
            judge.judge_name, judge.completed, judge.total, judge.percent
        );
    }
    println!(
        "- overall: {}/{} ({}%)",
        overview.overall.completed, overview.overall.total, overview.overall.percent
    );
    let pending: Vec<&str> = overview
        .rows
        .iter()
        .filter(|row| row.status == ScoreStatus::Pending)
        .map(|row| row.participant_name.as_str())
        .collect();
    if !pending.is_empty() {
        println!("- awaiting scores: {}", pending.join(", "));
    }
}
