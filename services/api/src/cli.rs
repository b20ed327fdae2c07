use crate::demo::{run_demo, run_obligation_report, DemoArgs, ObligationReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use compliance_track::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ComplianceTrack",
    about = "Demonstrate and run the compliance obligation tracker from the command line",
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
    /// Project an obligation listing into dashboard or export form
    Report(ObligationReportArgs),
    /// Run an end-to-end CLI demo covering dashboards, insights, and digests
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
        Command::Report(args) => run_obligation_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
