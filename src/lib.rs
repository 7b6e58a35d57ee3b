// Library interface for SlotCode
// This allows tests and both binaries to share the indicator core

pub mod assets;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod config_file;
pub mod constants;
pub mod glyph;
pub mod i18n;
pub mod reconciler;
pub mod scheduler;
pub mod ui;

use codegen::unix_now;
use commands::{Command, Flow};
use config_file::{Config, ConfigStore};
use log::{debug, info, warn};
use parking_lot::Mutex;
use reconciler::{DisplayState, Reconciler, TickOutcome};
use ui::DisplaySink;

/// Core indicator state shared by the heartbeat and the command handlers
///
/// Every reconciliation, scheduled or forced, runs under the one mutex, so
/// two ticks can never interleave their asset swaps.
pub struct IndicatorCore<D: DisplaySink> {
    inner: Mutex<CoreInner<D>>,
}

struct CoreInner<D> {
    config: Config,
    store: ConfigStore,
    reconciler: Reconciler,
    display: D,
}

impl<D: DisplaySink> IndicatorCore<D> {
    /// Build the core from the persisted preferences in `store`
    pub fn new(store: ConfigStore, reconciler: Reconciler, display: D) -> Self {
        let config = store.load_or_default();
        Self::with_config(config, store, reconciler, display)
    }

    /// Build the core around an already loaded `config`
    pub fn with_config(
        config: Config,
        store: ConfigStore,
        reconciler: Reconciler,
        display: D,
    ) -> Self {
        let reconciler = reconciler.with_last_code(config.last_code.clone());
        Self {
            inner: Mutex::new(CoreInner {
                config,
                store,
                reconciler,
                display,
            }),
        }
    }

    /// Clear assets left by a previous run and paint the first state
    pub fn start(&self) -> TickOutcome {
        self.start_at(unix_now())
    }

    pub fn start_at(&self, now: u64) -> TickOutcome {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        inner.reconciler.assets().sweep();
        let app_name = i18n::lookup(inner.config.language, "app_name");
        inner.display.set_app_name(&app_name);

        info!(
            "Indicator started (secret {})",
            if inner.config.has_secret() { "configured" } else { "not set" }
        );
        inner
            .reconciler
            .reconcile(&inner.config, now, false, &mut inner.display)
    }

    /// Heartbeat handler: refresh unless no secret is configured
    pub fn on_heartbeat(&self) -> Option<TickOutcome> {
        self.on_heartbeat_at(unix_now())
    }

    pub fn on_heartbeat_at(&self, now: u64) -> Option<TickOutcome> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        if !inner.config.has_secret() {
            return None;
        }
        Some(
            inner
                .reconciler
                .reconcile(&inner.config, now, false, &mut inner.display),
        )
    }

    pub fn reconcile(&self, force: bool) -> TickOutcome {
        self.reconcile_at(force, unix_now())
    }

    pub fn reconcile_at(&self, force: bool, now: u64) -> TickOutcome {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        inner
            .reconciler
            .reconcile(&inner.config, now, force, &mut inner.display)
    }

    /// Handle a command from the display layer
    pub fn dispatch(&self, command: Command) -> Flow {
        self.dispatch_at(command, unix_now())
    }

    pub fn dispatch_at(&self, command: Command, now: u64) -> Flow {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        let Some(applied) = command.apply(&mut inner.config) else {
            info!("Quit requested");
            Self::sweep_locked(inner);
            return Flow::Exit;
        };
        debug!("Applied {:?}", redact(&command));

        if applied.language_changed {
            let app_name = i18n::lookup(inner.config.language, "app_name");
            inner.display.set_app_name(&app_name);
            info!("Language switched to {}", inner.config.language);
        }

        let outcome = inner
            .reconciler
            .reconcile(&inner.config, now, true, &mut inner.display);

        // Persist the code now on screen so a restart in this slot stays quiet
        inner.config.last_code = Some(outcome.code);
        if let Err(e) = inner.store.save(&inner.config) {
            warn!("Failed to persist preferences, keeping them in memory: {:#}", e);
        }
        Flow::Continue
    }

    /// Shutdown sweep: every glyph asset except the installed one goes
    fn sweep_locked(inner: &mut CoreInner<D>) -> usize {
        inner.reconciler.assets().sweep()
    }

    pub fn config(&self) -> Config {
        self.inner.lock().config.clone()
    }

    pub fn display_state(&self) -> DisplayState {
        self.inner.lock().reconciler.display_state().clone()
    }

    pub fn active_asset(&self) -> Option<std::path::PathBuf> {
        self.inner
            .lock()
            .reconciler
            .assets()
            .active()
            .map(|p| p.to_path_buf())
    }

    /// Run `f` against the display sink while holding the core lock
    pub fn with_display<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.inner.lock().display)
    }
}

/// Command as it may appear in logs
fn redact(command: &Command) -> Command {
    match command {
        Command::SecretSubmitted(_) => Command::SecretSubmitted("<redacted>".to_string()),
        other => other.clone(),
    }
}
