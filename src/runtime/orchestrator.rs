use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    app::{get_data_dir, load_config, AppState, Config},
    cli::{handle_command, Cli, CommandOutcome},
    notify::{Notifier, QueueNotifier, TerminalNotifier},
    session::{FileSessionStore, MemorySessionStore, SessionStore},
    tui::run_ui,
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = load_config(cli.config.as_deref())?;
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }

        Ok(Self { cli, config })
    }

    /// Session store for this run
    fn session_store(&self) -> Result<Arc<dyn SessionStore>> {
        if self.cli.ephemeral {
            info!("ephemeral session: nothing is persisted");
            return Ok(Arc::new(MemorySessionStore::new()));
        }

        let dir = get_data_dir(&self.config.storage)?;
        info!(dir = %dir.display(), "session directory");
        Ok(Arc::new(FileSessionStore::new(dir)))
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<ExitCode> {
        let store = self.session_store()?;
        let interactive = matches!(self.cli.command, None | Some(crate::cli::Commands::Ui));

        if interactive {
            let notices = Arc::new(QueueNotifier::new());
            let notifier: Arc<dyn Notifier> = notices.clone();
            let state = AppState::new(self.config, store, notifier)?;
            run_ui(state, notices).await?;
            return Ok(ExitCode::SUCCESS);
        }

        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
        let state = AppState::new(self.config, store, notifier)?;

        // Commands run against a resolved gate; no splash outside the UI
        let resolved = state.gate.bootstrap().await;
        info!(root = ?resolved.root(), "session loaded");

        let Some(command) = &self.cli.command else {
            return Ok(ExitCode::SUCCESS);
        };

        match handle_command(command, &state, self.cli.output_format).await? {
            CommandOutcome::Done => Ok(ExitCode::SUCCESS),
            CommandOutcome::Failed => Ok(ExitCode::FAILURE),
            CommandOutcome::Ui => {
                warn!("interface requested from a command run");
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
