use super::domain::{IndividualApp, Judge, Team};

/// Validation errors for judge, team and individual application records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryViolation {
    #[error("judge name and title are required")]
    IncompleteJudge,
    #[error("team name and leader are required")]
    IncompleteTeam,
    #[error("a team needs at least one member")]
    NoMembers,
    #[error("team leader {0} must be one of the members")]
    LeaderNotInMembers(String),
    #[error("team lists {apps} app(s) but {links} link(s)")]
    AppLinkMismatch { apps: usize, links: usize },
    #[error("application name and creator are required")]
    IncompleteApp,
}

pub(crate) fn sanitize_judge(mut judge: Judge) -> Result<Judge, DirectoryViolation> {
    judge.name = judge.name.trim().to_string();
    judge.title = judge.title.trim().to_string();
    judge.department = judge.department.trim().to_string();
    if judge.name.is_empty() || judge.title.is_empty() {
        return Err(DirectoryViolation::IncompleteJudge);
    }

    judge.expertise = judge
        .expertise
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    Ok(judge)
}

pub(crate) fn sanitize_team(mut team: Team) -> Result<Team, DirectoryViolation> {
    team.name = team.name.trim().to_string();
    team.leader = team.leader.trim().to_string();
    if team.name.is_empty() || team.leader.is_empty() {
        return Err(DirectoryViolation::IncompleteTeam);
    }

    team.members.retain(|member| !member.name.trim().is_empty());
    if team.members.is_empty() {
        return Err(DirectoryViolation::NoMembers);
    }
    for (index, member) in team.members.iter_mut().enumerate() {
        member.name = member.name.trim().to_string();
        if member.id.trim().is_empty() {
            member.id = format!("member-{}", index + 1);
        }
    }
    if !team.members.iter().any(|member| member.name == team.leader) {
        return Err(DirectoryViolation::LeaderNotInMembers(team.leader));
    }

    if !team.app_links.is_empty() && team.app_links.len() != team.apps.len() {
        return Err(DirectoryViolation::AppLinkMismatch {
            apps: team.apps.len(),
            links: team.app_links.len(),
        });
    }
    team.submitted_app_count = team.apps.len();

    Ok(team)
}

pub(crate) fn sanitize_app(mut app: IndividualApp) -> Result<IndividualApp, DirectoryViolation> {
    app.name = app.name.trim().to_string();
    app.creator = app.creator.trim().to_string();
    if app.name.is_empty() || app.creator.is_empty() {
        return Err(DirectoryViolation::IncompleteApp);
    }
    Ok(app)
}
