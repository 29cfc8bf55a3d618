mod commands;
mod config;
mod error;
mod session;

use clap::Parser;

use crate::config::{Cli, Command};
use crate::error::CliError;
use crate::session::Session;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "hangarview failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut session = Session::load(&cli)?;

    let output = match cli.command {
        Command::Capture(view) => commands::capture(&mut session, &view)?,
        Command::Apply { roi, pixels } => commands::apply(&session, roi, pixels),
        Command::Render { view, task } => commands::render(&mut session, &view, task.as_deref())?,
        Command::Hit { view, task, at } => commands::hit(&mut session, &view, &task, at)?,
        Command::Animate { task, fps } => return commands::animate(&mut session, &task, fps).await,
        Command::Calibration => commands::calibration(&session)?,
    };
    commands::print_json(&output)
}
