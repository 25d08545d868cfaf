use clap::Parser;
use repo_date::commands::{self, Commands};
use repo_date::logger::Logger;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> ExitCode {
    Logger::init();
    let cli = Cli::parse();

    match commands::run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("\n{}\n{error}", console::style("Error").red().bold());
            ExitCode::FAILURE
        }
    }
}
