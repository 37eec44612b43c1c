//! breaker-app - startup wiring for a breaker shell
//!
//! The presentation shell links this crate and calls [`Breaker::start`].
//! It wires together all the components:
//! - Logging, at the level named in the config file
//! - Configuration loading
//! - Journal document store and the background persist writer
//! - Reminder dispatch to the platform notification center
//! - Journal export

use anyhow::{Context, Result, anyhow};
use breaker_api::AppState;
use breaker_config::{Settings, load_config_or_default};
use breaker_core::{JournalStore, SessionTicker, UrgeFlow, UrgeSession};
use breaker_host_api::{NotificationScheduler, ReminderDispatcher};
use breaker_store::{DocumentStore, JsonFileStore, PersistWriter, export_document};
use breaker_util::{TimeOfDay, default_config_path, is_mock_time_active};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global log subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Fails if a subscriber is
/// already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}

/// Install the global log subscriber at the configured `[logging] level`.
///
/// Call once after [`load_settings`]; `RUST_LOG` still takes precedence.
pub fn init_logging_from(settings: &Settings) -> Result<()> {
    init_logging(&settings.log_level)
}

/// Load settings from `path`, or from the default config location.
/// A missing file yields defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let settings = load_config_or_default(&path)
        .with_context(|| format!("Failed to load config from {:?}", path))?;

    debug!(
        config_path = %path.display(),
        data_dir = %settings.storage.data_dir.display(),
        urge_secs = settings.urge_duration_secs(),
        "Configuration loaded"
    );
    Ok(settings)
}

/// A running breaker core
pub struct Breaker {
    settings: Settings,
    journal: Arc<Mutex<JournalStore>>,
    writer: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
}

impl Breaker {
    /// Open the journal document from the configured data directory and
    /// start the background tasks. Must be called within a tokio runtime.
    pub async fn start(settings: Settings, scheduler: Arc<dyn NotificationScheduler>) -> Result<Self> {
        let data_dir = settings.storage.data_dir.clone();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let document_path = settings.storage.document_path();
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::open(&document_path));
        if !store.is_healthy() {
            warn!(path = %document_path.display(), "Journal location not writable, changes may be lost");
        }

        info!(path = %document_path.display(), "Store opened");
        Self::start_with_store(settings, store, scheduler).await
    }

    /// Start on top of an already opened store
    pub async fn start_with_store(
        settings: Settings,
        store: Arc<dyn DocumentStore>,
        scheduler: Arc<dyn NotificationScheduler>,
    ) -> Result<Self> {
        let loader = Arc::clone(&store);
        let initial: AppState = tokio::task::spawn_blocking(move || loader.load())
            .await
            .context("Journal load task failed")?;

        info!(
            onboarded = initial.has_onboarded,
            relapses = initial.relapse_log.len(),
            check_ins = initial.check_ins.len(),
            "Journal loaded"
        );

        if is_mock_time_active() {
            warn!(now = %breaker_util::now(), "Mock time active, streaks use the mocked clock");
        }

        let (reminders, dispatcher) = ReminderDispatcher::new(scheduler);
        let (journal, snapshots) = JournalStore::new(initial, breaker_util::now());
        let journal = journal.with_reminders(reminders);
        journal.request_notification_permission();

        let writer = PersistWriter::new(store, snapshots).spawn();
        let dispatcher = dispatcher.spawn();

        Ok(Self {
            settings,
            journal: Arc::new(Mutex::new(journal)),
            writer,
            dispatcher,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared handle to the journal. All mutation goes through this lock.
    pub fn journal(&self) -> Arc<Mutex<JournalStore>> {
        Arc::clone(&self.journal)
    }

    /// Latest published document
    pub async fn snapshot(&self) -> Arc<AppState> {
        self.journal.lock().await.snapshot()
    }

    /// Delay, breathe, coping task, log
    pub fn guided_flow(&self) -> UrgeFlow {
        UrgeFlow::guided(self.settings.urge_duration_secs())
    }

    /// Countdown with a free activity, log, feedback
    pub fn session_flow(&self) -> UrgeFlow {
        UrgeFlow::session(self.settings.urge_duration_secs())
    }

    /// Stand-alone countdown driven at 1 Hz
    pub fn session_ticker(&self) -> SessionTicker {
        SessionTicker::new(UrgeSession::new(self.settings.urge_duration_secs()))
    }

    /// The user's reminder times, or the configured defaults if none are saved
    pub async fn reminder_times(&self) -> Vec<TimeOfDay> {
        let journal = self.journal.lock().await;
        let saved = &journal.state().reminder_times;
        if saved.is_empty() {
            self.settings.default_reminder_times.clone()
        } else {
            saved.clone()
        }
    }

    /// Write an export into the configured export directory.
    ///
    /// Returns `None` if it could not be written; the reason is logged.
    pub async fn export_to_file(&self) -> Option<PathBuf> {
        let snapshot = self.snapshot().await;
        let dir = self.settings.storage.export_dir.clone();

        match tokio::task::spawn_blocking(move || export_document(&snapshot, &dir)).await {
            Ok(Ok(path)) => Some(path),
            Ok(Err(e)) => {
                warn!(error = %e, "Export failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "Export task failed");
                None
            }
        }
    }

    /// Stop the background tasks after the last snapshot is on disk.
    ///
    /// If the shell still holds a journal handle the tasks keep running
    /// until that handle is dropped, and this returns without waiting.
    pub async fn shutdown(self) -> Result<()> {
        let Some(journal) = Arc::into_inner(self.journal) else {
            warn!("Journal still shared, not waiting for final save");
            return Ok(());
        };
        drop(journal);

        self.writer.await.context("Persist writer failed")?;
        self.dispatcher.await.context("Reminder dispatcher failed")?;

        info!("breaker stopped");
        Ok(())
    }
}
