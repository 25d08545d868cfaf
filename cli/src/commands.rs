pub mod render;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the last update date of the repository and write it out
    Render(render::RenderCommand),
}

/// Derive a runner from the command and run it
async fn run_command(command: impl Runnable) -> Result<(), Error> {
    command.runner().run().await
}

/// Without a subcommand the date is rendered with the built-in settings
fn or_default(command: Option<Commands>) -> Commands {
    command.unwrap_or_else(|| Commands::Render(render::RenderCommand::default()))
}

/// Match all commands here, in one place
pub async fn run(command: Option<Commands>) -> Result<(), Error> {
    match or_default(command) {
        Commands::Render(cmd) => run_command(cmd).await,
    }
}
