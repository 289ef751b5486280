use crate::infra::token_store;
use clap::Args;
use showcase::client::{categories, AdminApiClient, AppQuery, AppStatus};
use showcase::config::AppConfig;
use showcase::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct AdminArgs {
    /// Bearer token to use instead of the configured token file
    #[arg(long)]
    pub(crate) token: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AppsListArgs {
    #[command(flatten)]
    pub(crate) admin: AdminArgs,
    /// Free-text search over name and description
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Display category, e.g. 數據分析
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Page number, starting at 1
    #[arg(long)]
    pub(crate) page: Option<u32>,
    /// Page size
    #[arg(long)]
    pub(crate) limit: Option<u32>,
}

fn client(admin: AdminArgs) -> Result<AdminApiClient, AppError> {
    let config = AppConfig::load()?;
    let tokens = token_store(admin.token, &config.admin_api);
    Ok(AdminApiClient::new(config.admin_api.base_url, tokens)?)
}

pub(crate) async fn run_apps_list(args: AppsListArgs) -> Result<(), AppError> {
    let AppsListArgs {
        admin,
        search,
        category,
        page,
        limit,
    } = args;

    let query = AppQuery {
        page,
        limit,
        search,
        category: category.map(|label| categories::to_api_code(&label).to_string()),
        status: None,
    };
    let listing = client(admin)?.list_apps(&query).await?;

    println!(
        "Applications (page {} of {}, {} total)",
        page.unwrap_or(1),
        listing.pagination.total_pages.max(1),
        listing.pagination.total
    );
    for app in &listing.apps {
        println!(
            "- {} [{}] {} | {} | v{}",
            app.id,
            app.status.map(AppStatus::label).unwrap_or("unknown"),
            app.name,
            app.display_category(),
            app.version
        );
    }
    println!(
        "Status counts: {} published | {} pending | {} draft | {} rejected",
        listing.stats.published, listing.stats.pending, listing.stats.draft, listing.stats.rejected
    );
    Ok(())
}

pub(crate) async fn run_user_stats(args: AdminArgs) -> Result<(), AppError> {
    let stats = client(args)?.user_stats().await?;
    println!(
        "Users: {} total | {} active | {} inactive | {} suspended",
        stats.total, stats.active, stats.inactive, stats.suspended
    );
    Ok(())
}
