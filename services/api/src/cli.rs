use crate::score::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_qualifier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Qualifier",
    about = "Score sales leads against a product offer over HTTP or from the command line",
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
    /// Score a lead CSV against an offer document and print the ranking
    Score(ScoreArgs),
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
        Command::Score(args) => run_score(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["lead-qualifier-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_command_parses_paths() {
        let cli = Cli::try_parse_from([
            "lead-qualifier-api",
            "score",
            "--leads",
            "leads.csv",
            "--offer",
            "offer.json",
            "--concurrency",
            "3",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.leads.to_str(), Some("leads.csv"));
                assert_eq!(args.offer.to_str(), Some("offer.json"));
                assert_eq!(args.concurrency, Some(3));
                assert!(args.output.is_none());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }
}
