//! Per-tick reconciliation
//!
//! One call recomputes the code for the current slot and brings label,
//! tooltip, glyph and alert in line with it. Glyph and notification failures
//! are logged and never stop the label from updating.

use crate::assets::AssetStore;
use crate::codegen::{CodeSpec, TimeSlot};
use crate::config_file::Config;
use crate::glyph::GlyphRenderer;
use crate::i18n;
use crate::ui::DisplaySink;
use log::{debug, error, warn};
use std::path::PathBuf;

/// What the display layer was last told
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub label: String,
    pub tooltip: String,
    /// Installed glyph asset; `None` while the default icon is shown
    pub asset_path: Option<PathBuf>,
}

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub code: String,
    pub slot: TimeSlot,
    pub changed: bool,
    pub alerted: bool,
}

pub struct Reconciler {
    spec: CodeSpec,
    renderer: GlyphRenderer,
    assets: AssetStore,
    last_code: Option<String>,
    state: DisplayState,
}

impl Reconciler {
    pub fn new(spec: CodeSpec, renderer: GlyphRenderer, assets: AssetStore) -> Self {
        Self {
            spec,
            renderer,
            assets,
            last_code: None,
            state: DisplayState::default(),
        }
    }

    /// Seed change detection with a code shown before a restart
    pub fn with_last_code(mut self, code: Option<String>) -> Self {
        self.last_code = code;
        self
    }

    pub fn spec(&self) -> &CodeSpec {
        &self.spec
    }

    pub fn last_code(&self) -> Option<&str> {
        self.last_code.as_deref()
    }

    pub fn display_state(&self) -> &DisplayState {
        &self.state
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn reconcile<D: DisplaySink + ?Sized>(
        &mut self,
        config: &Config,
        now: u64,
        force: bool,
        display: &mut D,
    ) -> TickOutcome {
        let slot = self.spec.slot_at(now);
        let code = self.spec.derive(&config.secret, slot.index);

        let changed = self.last_code.as_deref() != Some(code.as_str());
        self.last_code = Some(code.clone());
        if changed {
            debug!("Code rolled over at slot {}", slot.index);
        }

        self.update_label(config, &code, slot.remaining, display);
        self.update_icon(config, &slot, display);

        let alerted = config.notifications_enabled
            && (changed || force)
            && config.has_secret();
        if alerted {
            let title = i18n::code_updated(config.language, &code);
            if let Err(e) = display.show_alert(&title) {
                error!("Failed to show code alert: {:#}", e);
            }
        }

        TickOutcome {
            code,
            slot,
            changed,
            alerted,
        }
    }

    fn update_label<D: DisplaySink + ?Sized>(
        &mut self,
        config: &Config,
        code: &str,
        remaining: u64,
        display: &mut D,
    ) {
        let label = if config.glyph_visible {
            i18n::code_label(config.language, code, remaining)
        } else {
            String::new()
        };
        let tooltip = format!("{}: {}", i18n::lookup(config.language, "app_name"), code);

        if let Err(e) = display.set_label(&label, &tooltip) {
            warn!("Failed to update label: {:#}", e);
        }
        self.state.label = label;
        self.state.tooltip = tooltip;
    }

    fn update_icon<D: DisplaySink + ?Sized>(
        &mut self,
        config: &Config,
        slot: &TimeSlot,
        display: &mut D,
    ) {
        let png = match self.renderer.render(slot.elapsed_fraction(), config.glyph_visible) {
            Ok(png) => png,
            Err(e) => {
                warn!("Glyph rendering failed: {}", e);
                return self.fall_back_to_default_icon(display);
            }
        };

        let path = match self.assets.write(&png) {
            Ok(path) => path,
            Err(e) => {
                warn!("{}", e);
                return self.fall_back_to_default_icon(display);
            }
        };

        match display.set_icon(Some(&path)) {
            Ok(()) => {
                self.assets.activate(path.clone());
                self.state.asset_path = Some(path);
            }
            Err(e) => {
                // Previous asset is still on screen, keep it active
                warn!("Failed to install glyph {}: {:#}", path.display(), e);
                self.assets.discard(&path);
            }
        }
    }

    fn fall_back_to_default_icon<D: DisplaySink + ?Sized>(&mut self, display: &mut D) {
        match display.set_icon(None) {
            Ok(()) => {
                self.assets.retire();
                self.state.asset_path = None;
            }
            Err(e) => warn!("Failed to install default icon: {:#}", e),
        }
    }
}
