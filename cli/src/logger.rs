use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;

/// Log setup shared by the whole process
///
/// Log lines and spinners both go to stderr through one `MultiProgress`, so stdout only
/// ever carries the rendered date.
pub struct Logger {
    multi_progress: MultiProgress,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

impl<'a> Logger {
    pub fn init() -> &'a Self {
        LOGGER.get_or_init(|| {
            let logger = env_logger::Builder::from_env(
                // Silent by default
                // Enable logs output with "export RUST_LOG=info" in terminal
                env_logger::Env::default().default_filter_or("off"),
            )
            .build();

            let level = logger.filter();
            let multi_progress = MultiProgress::new();

            // Fails only if some other logger got installed first, keep that one
            if LogWrapper::new(multi_progress.clone(), logger)
                .try_init()
                .is_ok()
            {
                log::set_max_level(level);
            }

            Self { multi_progress }
        })
    }

    pub fn multi_progress() -> &'a MultiProgress {
        &Self::init().multi_progress
    }

    /// A ticking spinner with a dimmed message, hidden when stderr is not a terminal
    pub fn spinner(message: &str) -> ProgressBar {
        let spinner = Self::multi_progress().add(ProgressBar::new_spinner());

        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
