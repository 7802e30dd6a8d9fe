use crate::predict::{run_health, run_options, run_predict, HealthArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use obesity_predict::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Obesity Risk Predictor",
    about = "Submit lifestyle profiles for obesity risk prediction, or run the reference service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the reference prediction service (default command)
    Serve(ServeArgs),
    /// Fill the sixteen attributes, submit them once and render the result
    Predict(PredictArgs),
    /// List the accepted tokens for each categorical attribute
    Options,
    /// Check that the configured prediction service is up and describe its model
    Health(HealthArgs),
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
        Command::Predict(args) => run_predict(args).await,
        Command::Options => {
            run_options();
            Ok(())
        }
        Command::Health(args) => run_health(args).await,
    }
}
