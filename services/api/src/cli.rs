use crate::demo::{run_demo, run_schema_summary, run_score, DemoArgs, SchemaArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use maag_assessment::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Maag Risk Assessment",
    about = "Serve, score, and demonstrate the gastric-symptom risk assessment",
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
    /// Score a JSON answer file and print the risk tier and advice
    Score(ScoreArgs),
    /// Validate a questionnaire file (or the built-in one) and summarise its sections
    Schema(SchemaArgs),
    /// Walk a scripted respondent through the questionnaire
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
        Command::Score(args) => run_score(args),
        Command::Schema(args) => run_schema_summary(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["maag-assessment-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_requires_an_answer_file() {
        assert!(Cli::try_parse_from(["maag-assessment-api", "score"]).is_err());

        let cli = Cli::try_parse_from(["maag-assessment-api", "score", "--answers", "a.json"])
            .expect("parses");
        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.answers, std::path::PathBuf::from("a.json"));
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_host_and_port_overrides() {
        let cli = Cli::try_parse_from([
            "maag-assessment-api",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
