//! Terminal implementations of the controller's capabilities.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use focus_sprint_core::notify::popup_text;
use focus_sprint_core::storage::data_dir;
use focus_sprint_core::storage::database::DB_FILE;
use focus_sprint_core::timer::interval::NoopScheduler;
use focus_sprint_core::{
    AppConfig, Capabilities, Confirm, Database, IntervalHandle, IntervalScheduler, Locale, Mode,
    NotificationKind, NotificationPermission, Notifier, Permission, Result, SprintController,
    StateStore, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Shared state for every command: where data lives and how the host is set up.
pub struct Host {
    pub dir: PathBuf,
    pub config: AppConfig,
    pub assume_yes: bool,
}

impl Host {
    /// Resolve the data directory and load `config.toml`, writing defaults on
    /// first run.
    pub fn open(assume_yes: bool) -> Result<Self> {
        let dir = data_dir()?;
        let config = AppConfig::load_from(&dir)?;
        Ok(Self {
            dir,
            config,
            assume_yes,
        })
    }

    /// Open the store and run recovery. One-shot commands never tick.
    pub fn controller(&self) -> Result<SprintController> {
        self.controller_with(Box::new(NoopScheduler))
    }

    pub fn controller_with(
        &self,
        scheduler: Box<dyn IntervalScheduler>,
    ) -> Result<SprintController> {
        let db = Database::open_at(&self.dir.join(DB_FILE))?;
        let caps = Capabilities {
            clock: Box::new(SystemClock),
            scheduler,
            notifier: Box::new(TerminalNotifier {
                bell: self.config.notifications.bell,
            }),
            permission: Box::new(ConfigPermission {
                desktop: self.config.notifications.desktop,
            }),
            confirm: Box::new(PromptConfirm {
                assume_yes: self.assume_yes,
            }),
        };
        let fallback = self.config.locale.unwrap_or_else(Locale::from_env);
        Ok(SprintController::load(StateStore::new(db), caps, fallback))
    }
}

/// Sends `()` on a channel once per second from a tokio task.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<()>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::UnboundedSender<()>) -> Self {
        Self { tx }
    }
}

struct TokioHandle(JoinHandle<()>);

impl IntervalHandle for TokioHandle {
    fn cancel(&mut self) {
        self.0.abort();
    }
}

impl IntervalScheduler for TokioScheduler {
    fn schedule(&mut self) -> Box<dyn IntervalHandle> {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        Box::new(TokioHandle(task))
    }
}

/// Terminal bell for sound, desktop notification for popups.
pub struct TerminalNotifier {
    bell: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NotificationKind, mode: Mode, locale: Locale) {
        match kind {
            NotificationKind::Sound => {
                if self.bell {
                    eprint!("\x07");
                }
            }
            NotificationKind::Popup => {
                let (title, body) = popup_text(mode, locale);
                if let Err(e) = notify_rust::Notification::new()
                    .summary(&title)
                    .body(&body)
                    .appname("focus-sprint")
                    .show()
                {
                    warn!(error = %e, "failed to send notification");
                }
            }
        }
    }
}

/// Desktop notifications are allowed exactly when the config says so.
pub struct ConfigPermission {
    desktop: bool,
}

#[async_trait]
impl NotificationPermission for ConfigPermission {
    fn status(&self) -> Permission {
        if self.desktop {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn request(&self) -> Permission {
        self.status()
    }
}

/// `[y/N]` on stderr, answer from stdin. `--yes` skips the question.
pub struct PromptConfirm {
    assume_yes: bool,
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{title}: {message} [y/N] ");
        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!(error = %e, "failed to read confirmation");
                false
            }
        }
    }
}
