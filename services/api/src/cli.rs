use crate::demo::{run_demo, run_rank, DemoArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use college_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "College Match",
    about = "Rank postsecondary institutions against an applicant profile",
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
    /// Rank a catalog for one profile document and print the results
    Rank(RankArgs),
    /// Walk through the built-in applicant personas against a catalog
    Demo(DemoArgs),
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
        Command::Rank(args) => run_rank(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::Persona;
    use std::path::PathBuf;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["college-match"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_requires_a_profile() {
        assert!(Cli::try_parse_from(["college-match", "rank"]).is_err());

        let cli = Cli::try_parse_from([
            "college-match",
            "rank",
            "--profile",
            "profile.json",
            "--top-k",
            "3",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.profile, PathBuf::from("profile.json"));
                assert_eq!(args.top_k, Some(3));
                assert!(args.catalog.is_none());
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn demo_accepts_a_persona() {
        let cli = Cli::try_parse_from(["college-match", "demo", "--persona", "international-stem"])
            .expect("parses");
        match cli.command {
            Some(Command::Demo(args)) => assert_eq!(args.persona, Some(Persona::InternationalStem)),
            other => panic!("expected demo command, got {other:?}"),
        }
    }
}
