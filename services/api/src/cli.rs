use crate::demo::{
    run_demo, run_investment_projection, run_readiness_score, DemoArgs, ProjectArgs, ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use realty_analytics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Realty Analytics",
    about = "Run investment projections and seller readiness scoring from the command line",
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
    /// Project a rental property investment over its holding period
    Investment {
        #[command(subcommand)]
        command: InvestmentCommand,
    },
    /// Score a seller's readiness to list
    Readiness {
        #[command(subcommand)]
        command: ReadinessCommand,
    },
    /// Walk through a sample projection, scenario comparison, and readiness score
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum InvestmentCommand {
    /// Print the year-by-year projection and summary metrics
    Project(ProjectArgs),
}

#[derive(Subcommand, Debug)]
enum ReadinessCommand {
    /// Score answers against the configured rubric
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
        Command::Investment {
            command: InvestmentCommand::Project(args),
        } => run_investment_projection(args),
        Command::Readiness {
            command: ReadinessCommand::Score(args),
        } => run_readiness_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["realty-analytics-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_projection_arguments() {
        let cli = Cli::try_parse_from([
            "realty-analytics-api",
            "investment",
            "project",
            "--purchase-price",
            "250000",
            "--monthly-rent",
            "2000",
            "--monthly-expenses",
            "600",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Investment {
                command: InvestmentCommand::Project(args),
            }) => {
                assert_eq!(args.purchase_price, 250_000.0);
                assert_eq!(args.expenses.monthly_expenses, Some(600.0));
                assert_eq!(args.holding_period_years, 5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn expense_model_is_required_and_exclusive() {
        let missing = Cli::try_parse_from([
            "realty-analytics-api",
            "investment",
            "project",
            "--purchase-price",
            "250000",
            "--monthly-rent",
            "2000",
        ]);
        assert!(missing.is_err());

        let both = Cli::try_parse_from([
            "realty-analytics-api",
            "investment",
            "project",
            "--purchase-price",
            "250000",
            "--monthly-rent",
            "2000",
            "--monthly-expenses",
            "600",
            "--expense-rate",
            "0.35",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn parses_repeated_readiness_answers() {
        let cli = Cli::try_parse_from([
            "realty-analytics-api",
            "readiness",
            "score",
            "--answer",
            "market_timing=balanced",
            "--answer",
            "estimated_repairs=4500",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Readiness {
                command: ReadinessCommand::Score(args),
            }) => assert_eq!(args.answers.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
