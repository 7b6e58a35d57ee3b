// SlotCode Tray App - persistent tray indicator for the rolling slot code
// This binary owns the event loop, the tray icon and its menu

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info};
use slotcode::assets::{self, AssetStore};
use slotcode::codegen::CodeSpec;
use slotcode::commands::{Command, Flow};
use slotcode::config;
use slotcode::config_file::{Config, ConfigStore};
use slotcode::constants::{GLYPH_SIZE_PX, HEARTBEAT_INTERVAL_MS};
use slotcode::glyph::GlyphRenderer;
use slotcode::i18n::{self, Language};
use slotcode::reconciler::Reconciler;
use slotcode::scheduler::Heartbeat;
use slotcode::ui::notifications::Notifier;
use slotcode::ui::DisplaySink;
use slotcode::IndicatorCore;
use std::path::Path;
use std::time::Duration;
use tao::event::Event;
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tray indicator showing the current slot code and a countdown glyph
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tray indicator showing the current slot code",
    long_about = "Tray indicator showing the current slot code.

The code is derived from your secret word and the current time slot and is
refreshed every second. The tray icon draws the elapsed part of the slot.

ENVIRONMENT:
  SLOTCODE_DIGITS        Code width in digits (1-9, default 6)
  SLOTCODE_INTERVAL      Slot width in seconds (5-300, default 30)
  SLOTCODE_APPEND        Constant mixed into every code
  SLOTCODE_CONFIG        Path of the JSON config file
  SLOTCODE_SCRATCH_DIR   Directory receiving glyph images
  SLOTCODE_BADGE         PNG drawn in the middle of the glyph"
)]
struct Args {}

enum UserEvent {
    Tick,
    Menu(MenuEvent),
}

/// Display sink on top of the tray icon and desktop notifications
struct TrayDisplay {
    tray: TrayIcon,
    notifier: Notifier,
    default_icon: Icon,
}

impl DisplaySink for TrayDisplay {
    fn set_label(&mut self, label: &str, tooltip: &str) -> Result<()> {
        self.tray
            .set_title(if label.is_empty() { None } else { Some(label) });
        self.tray
            .set_tooltip(Some(tooltip))
            .context("Failed to update tray tooltip")?;
        Ok(())
    }

    fn set_icon(&mut self, asset: Option<&Path>) -> Result<()> {
        let icon = match asset {
            Some(path) => load_icon(path)?,
            None => self.default_icon.clone(),
        };
        self.tray
            .set_icon(Some(icon))
            .context("Failed to update tray icon")?;
        Ok(())
    }

    fn show_alert(&mut self, title: &str) -> Result<()> {
        self.notifier.show(title)
    }

    fn set_app_name(&mut self, name: &str) {
        self.notifier.set_app_name(name);
    }
}

/// Tray menu items, kept so labels and check marks can be refreshed
struct TrayMenu {
    menu: Menu,
    secret_item: MenuItem,
    notifications_item: CheckMenuItem,
    display_item: CheckMenuItem,
    language_menu: Submenu,
    language_items: Vec<(Language, CheckMenuItem)>,
    quit_item: MenuItem,
}

impl TrayMenu {
    fn build(config: &Config) -> Result<Self> {
        let lang = config.language;
        let secret_item = MenuItem::new(i18n::lookup(lang, "word_key"), true, None);
        let notifications_item = CheckMenuItem::new(
            i18n::lookup(lang, "notifications"),
            true,
            config.notifications_enabled,
            None,
        );
        let display_item = CheckMenuItem::new(
            i18n::lookup(lang, "display"),
            true,
            config.glyph_visible,
            None,
        );
        let language_menu = Submenu::new(i18n::lookup(lang, "language"), true);
        let language_items: Vec<_> = Language::ALL
            .iter()
            .map(|l| (*l, CheckMenuItem::new(l.native_name(), true, *l == lang, None)))
            .collect();
        for (_, item) in &language_items {
            language_menu
                .append(item)
                .context("Failed to add language menu item")?;
        }
        let quit_item = MenuItem::new(i18n::lookup(lang, "quit"), true, None);

        let menu = Menu::new();
        menu.append(&secret_item).context("Failed to add secret menu item")?;
        menu.append(&notifications_item)
            .context("Failed to add notifications menu item")?;
        menu.append(&display_item).context("Failed to add display menu item")?;
        menu.append(&language_menu).context("Failed to add language submenu")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;
        menu.append(&quit_item).context("Failed to add quit menu item")?;

        Ok(Self {
            menu,
            secret_item,
            notifications_item,
            display_item,
            language_menu,
            language_items,
            quit_item,
        })
    }

    /// Re-translate labels and move the language check mark
    fn relabel(&self, lang: Language) {
        self.secret_item.set_text(i18n::lookup(lang, "word_key"));
        self.notifications_item
            .set_text(i18n::lookup(lang, "notifications"));
        self.display_item.set_text(i18n::lookup(lang, "display"));
        self.language_menu.set_text(i18n::lookup(lang, "language"));
        self.quit_item.set_text(i18n::lookup(lang, "quit"));
        self.check_language(lang);
    }

    fn check_language(&self, lang: Language) {
        for (l, item) in &self.language_items {
            item.set_checked(*l == lang);
        }
    }

    /// Translate a menu click into a command. `None` means nothing to do.
    fn command_for(&self, event: &MenuEvent, lang: Language) -> Option<Command> {
        if event.id == *self.secret_item.id() {
            let title = i18n::lookup(lang, "set_key_title");
            return prompt_secret(&title).map(Command::SecretSubmitted);
        }
        if event.id == *self.notifications_item.id() {
            return Some(Command::ToggleNotifications(
                self.notifications_item.is_checked(),
            ));
        }
        if event.id == *self.display_item.id() {
            return Some(Command::ToggleVisibility(self.display_item.is_checked()));
        }
        if event.id == *self.quit_item.id() {
            return Some(Command::Quit);
        }
        self.language_items
            .iter()
            .find(|(_, item)| event.id == *item.id())
            .map(|(l, _)| Command::LanguageSelected(*l))
    }
}

fn main() -> Result<()> {
    let _args = Args::parse();

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting SlotCode Tray App v{}", VERSION);

    let store = ConfigStore::from_env();
    let cfg = store.load_or_default();
    let spec = CodeSpec::from_env()?;

    let mut renderer = GlyphRenderer::new(GLYPH_SIZE_PX);
    if let Some(badge) = config::badge_path_override() {
        renderer = renderer.with_badge(&badge);
    }
    let default_icon = build_default_icon()?;
    let assets = AssetStore::new(assets::resolve_scratch_dir());
    info!("Glyph assets go to {}", assets.dir().display());

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let proxy_for_menu = proxy.clone();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy_for_menu.send_event(UserEvent::Menu(event));
    }));

    let tray_menu = TrayMenu::build(&cfg)?;
    let app_name = i18n::lookup(cfg.language, "app_name");
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(tray_menu.menu.clone()))
        .with_tooltip(&app_name)
        .with_icon(default_icon.clone())
        .build()
        .context("Failed to create tray icon")?;

    let display = TrayDisplay {
        tray,
        notifier: Notifier::new(app_name),
        default_icon,
    };
    let core = IndicatorCore::with_config(
        cfg,
        store,
        Reconciler::new(spec, renderer, assets),
        display,
    );
    let first = core.start();
    info!("Indicator ready (slot {})", first.slot.index);

    // The heartbeat only wakes the event loop; all state changes happen there
    let mut heartbeat = Some(Heartbeat::start(
        Duration::from_millis(HEARTBEAT_INTERVAL_MS),
        move || proxy.send_event(UserEvent::Tick).is_ok(),
    )?);

    info!("Tray icon created, running event loop");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(UserEvent::Tick) => {
                core.on_heartbeat();
            }
            Event::UserEvent(UserEvent::Menu(menu_event)) => {
                let lang = core.config().language;
                let Some(command) = tray_menu.command_for(&menu_event, lang) else {
                    // Radio-like behaviour for the language submenu
                    tray_menu.check_language(lang);
                    return;
                };
                let selected = match &command {
                    Command::LanguageSelected(l) => Some(*l),
                    _ => None,
                };

                if core.dispatch(command) == Flow::Exit {
                    if let Some(heartbeat) = heartbeat.take() {
                        heartbeat.stop();
                    }
                    info!("Quit menu item clicked, exiting");
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if let Some(l) = selected {
                    tray_menu.relabel(l);
                }
            }
            _ => {}
        }
    });
}

/// Static icon shown when no countdown glyph is available
fn build_default_icon() -> Result<Icon> {
    let image = GlyphRenderer::new(GLYPH_SIZE_PX)
        .draw(0.0, false)
        .context("Failed to draw default icon")?;
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height)
        .map_err(|e| anyhow!("Failed to create default icon: {}", e))
}

fn load_icon(path: &Path) -> Result<Icon> {
    let image = image::open(path)
        .with_context(|| format!("Failed to read glyph {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height)
        .map_err(|e| anyhow!("Failed to create icon from {}: {}", path.display(), e))
}

/// Prompt for the secret word with a native dialog.
/// Returns `None` when the dialog is cancelled or unavailable.
fn prompt_secret(title: &str) -> Option<String> {
    use std::process::Command;

    #[cfg(target_os = "macos")]
    let output = Command::new("osascript")
        .arg("-e")
        .arg(format!(
            r#"display dialog "{}:" default answer "" with hidden answer buttons {{"Cancel", "OK"}} default button "OK""#,
            title.replace('"', "\\\"")
        ))
        .output();

    #[cfg(not(target_os = "macos"))]
    let output = Command::new("zenity")
        .args(["--entry", "--hide-text", "--title", title, "--text", title])
        .output();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to open secret prompt: {}", e);
            return None;
        }
    };
    if !output.status.success() {
        info!("Secret prompt cancelled");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    #[cfg(target_os = "macos")]
    let entered = stdout.split("text returned:").nth(1)?.trim_end_matches('\n');
    #[cfg(not(target_os = "macos"))]
    let entered = stdout.trim_end_matches('\n');
    // An empty entry clears the secret and disables generation
    Some(entered.to_string())
}
