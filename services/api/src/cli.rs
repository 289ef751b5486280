use crate::admin::{run_apps_list, run_user_stats, AdminArgs, AppsListArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use showcase::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Showcase Console",
    about = "Run the competition showcase console and its admin tooling from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed a mixed competition, score it and print progress, awards and the CSV export
    Demo(DemoArgs),
    /// Browse the application catalogue of the admin API
    Apps {
        #[command(subcommand)]
        command: AppsCommand,
    },
    /// Inspect user accounts through the admin API
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AppsCommand {
    /// List one page of applications with catalogue-wide status counts
    List(AppsListArgs),
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// Print account totals by status
    Stats(AdminArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Apps {
            command: AppsCommand::List(args),
        } => run_apps_list(args).await,
        Command::Users {
            command: UsersCommand::Stats(args),
        } => run_user_stats(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["showcase-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn apps_list_accepts_filters() {
        let cli = Cli::try_parse_from([
            "showcase-api",
            "apps",
            "list",
            "--search",
            "writer",
            "--category",
            "數據分析",
            "--page",
            "2",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Apps {
                command: AppsCommand::List(args),
            }) => {
                assert_eq!(args.search.as_deref(), Some("writer"));
                assert_eq!(args.category.as_deref(), Some("數據分析"));
                assert_eq!(args.page, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn demo_rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["showcase-api", "demo", "--start", "next week"]).is_err());
    }
}
