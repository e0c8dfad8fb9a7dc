//! GUI application entry point.
//!
//! This module contains the eframe application and main window
//! configuration. The window is a thin view over [`RunController`]: every
//! frame drains the controller's run events, then renders the header,
//! history, output log and status bar from its state.

use crate::config::{Settings, SettingsStore, Virtualization};
use crate::controller::RunController;
use crate::error::{Result, RunnerError};
use crate::gui::modal::Modal;
use crate::gui::theme::{self, colors, rounding, spacing};
use crate::history::HistoryEntry;
use crate::runner::ToolConfig;
use crate::session::{SessionState, SessionStore};
use eframe::egui::{self, Color32, RichText, Rounding, Stroke};
use std::path::PathBuf;
use std::time::Duration;

/// Application name, used for the window title and the eframe app id.
const APP_NAME: &str = "Autopkgtest Runner";

/// Minimum window width in pixels.
const MIN_WIDTH: f32 = 480.0;

/// Minimum window height in pixels.
const MIN_HEIGHT: f32 = 360.0;

/// Repaint interval while a run is active, so streamed output shows up
/// without waiting for user input.
const RUNNING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Maximum height of the history list.
const HISTORY_MAX_HEIGHT: f32 = 200.0;

const WELCOME_TITLE: &str = "Welcome to Autopkgtest Runner";

const WELCOME_MESSAGE: &str = "Run Debian autopkgtests easily.\n\n\
    ✓ Run autopkgtest on local packages\n\
    ✓ Visual pass/fail results\n\
    ✓ Live test output streaming\n\
    ✓ Run history for this session";

pub struct RunnerApp {
    controller: RunController,
    settings: Settings,
    settings_store: Option<SettingsStore>,
    session_store: Option<SessionStore>,
    /// Latest window geometry, written out on close.
    session: SessionState,
    session_saved: bool,
    /// Contents of the package directory field.
    path_input: String,
    show_welcome: bool,
    window_title: String,
}

impl RunnerApp {
    /// Create the application state.
    ///
    /// Stores are optional so the window still works when no config
    /// directory can be resolved; preferences are then not persisted.
    pub fn new(
        settings_store: Option<SettingsStore>,
        session_store: Option<SessionStore>,
        session: SessionState,
    ) -> Self {
        let settings = settings_store
            .as_ref()
            .map(|store| {
                store.load().unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Using default settings");
                    Settings::default()
                })
            })
            .unwrap_or_default();

        let controller =
            RunController::new(ToolConfig::default().with_backend(settings.virtualization));

        Self {
            controller,
            settings,
            settings_store,
            session_store,
            session,
            session_saved: false,
            path_input: String::new(),
            show_welcome: !settings.welcome_shown,
            window_title: APP_NAME.to_string(),
        }
    }

    pub fn controller(&self) -> &RunController {
        &self.controller
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn is_welcome_visible(&self) -> bool {
        self.show_welcome
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Select `path` as the package directory.
    pub fn open_directory(&mut self, path: PathBuf) {
        self.path_input = path.display().to_string();

        if !path.is_dir() {
            // Run must not keep targeting the previous package
            self.controller.clear_selection();
            let error = RunnerError::PackageNotFound(path);
            self.controller.set_status(error.to_string());
            return;
        }
        self.controller.select_directory(path);
    }

    /// Open whatever is typed in the directory field.
    pub fn open_path_input(&mut self) {
        let trimmed = self.path_input.trim();
        if trimmed.is_empty() {
            self.controller
                .set_status(RunnerError::NoPackageSelected.to_string());
            return;
        }
        let path = PathBuf::from(trimmed);
        self.open_directory(path);
    }

    /// Run button handler: start a run, or stop the active one.
    pub fn toggle_run(&mut self) {
        if let Err(e) = self.controller.toggle_run() {
            tracing::warn!(error = %e, "Could not toggle test run");
            self.controller.set_status(e.to_string());
        }
    }

    /// Close the welcome dialog for good.
    pub fn dismiss_welcome(&mut self) {
        self.show_welcome = false;
        self.update_settings(self.settings.with_welcome_shown());
    }

    /// Change the backend used by subsequent runs.
    pub fn set_backend(&mut self, backend: Virtualization) {
        if backend == self.settings.virtualization {
            return;
        }
        self.controller.set_backend(backend);
        self.update_settings(self.settings.with_virtualization(backend));
    }

    fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        let Some(store) = self.settings_store.as_ref() else {
            return;
        };
        if let Err(e) = store.save(&settings) {
            tracing::warn!(error = %e, "Failed to save settings");
            self.controller
                .set_status(format!("Could not save settings: {}", e));
        }
    }

    /// Track live window geometry.
    ///
    /// While maximized only the flag changes, so un-maximizing on the next
    /// launch returns to the last normal size.
    pub fn record_geometry(&mut self, inner_size: Option<egui::Vec2>, maximized: Option<bool>) {
        let maximized = maximized.unwrap_or(self.session.maximized);
        match inner_size {
            Some(size) if !maximized => {
                self.session = SessionState::from_geometry(size.x, size.y, false);
            }
            _ => self.session.maximized = maximized,
        }
    }

    /// Write the window geometry once, on shutdown.
    pub fn save_session(&mut self) {
        if self.session_saved {
            return;
        }
        self.session_saved = true;

        if let Some(store) = self.session_store.as_ref() {
            if let Err(e) = store.save(&self.session) {
                tracing::warn!(error = %e, "Failed to save window session");
            }
        }
    }

    /// Window title for the current selection.
    fn title_for_selection(&self) -> String {
        match self.controller.package_name() {
            Some(name) => format!("{} - {}", APP_NAME, name),
            None => APP_NAME.to_string(),
        }
    }
}

impl eframe::App for RunnerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        if self.controller.is_running() {
            ctx.request_repaint_after(RUNNING_REPAINT_INTERVAL);
        }

        self.handle_window_input(ctx);
        self.sync_title(ctx);

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(colors::SURFACE)
                    .inner_margin(egui::Margin::same(spacing::MD))
                    .stroke(Stroke::new(1.0, colors::SEPARATOR)),
            )
            .show(ctx, |ui| self.render_header(ui));

        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::none()
                    .fill(colors::BACKGROUND)
                    .inner_margin(egui::Margin::symmetric(spacing::MD, spacing::XS)),
            )
            .show(ctx, |ui| self.render_status_bar(ui));

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(colors::BACKGROUND)
                    .inner_margin(egui::Margin::same(spacing::MD)),
            )
            .show(ctx, |ui| {
                self.render_history(ui);
                ui.add_space(spacing::MD);
                self.render_output(ui);
            });

        if self.is_welcome_visible() {
            let action = Modal::new(WELCOME_TITLE)
                .id("welcome")
                .message(WELCOME_MESSAGE)
                .button_label("Get Started")
                .show(ctx);
            if action.is_dismissed() {
                self.dismiss_welcome();
            }
        }
    }
}

impl RunnerApp {
    /// Dropped folders, Ctrl+Q and geometry tracking.
    fn handle_window_input(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            self.open_directory(path);
        }

        let (inner_size, maximized, close_requested) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.inner_rect.map(|rect| rect.size()),
                viewport.maximized,
                viewport.close_requested(),
            )
        });
        self.record_geometry(inner_size, maximized);

        let quit = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Q));
        if quit {
            self.save_session();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        } else if close_requested {
            self.save_session();
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = self.title_for_selection();
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("Package directory (or drop a folder here)")
                    .desired_width((ui.available_width() - 320.0).max(160.0)),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open").clicked() || submitted {
                self.open_path_input();
            }

            let running = self.controller.is_running();
            ui.add_enabled_ui(!running, |ui| {
                let mut backend = self.settings.virtualization;
                egui::ComboBox::from_id_salt("virtualization")
                    .selected_text(backend.as_arg())
                    .width(90.0)
                    .show_ui(ui, |ui| {
                        for option in Virtualization::all() {
                            ui.selectable_value(&mut backend, *option, option.as_arg());
                        }
                    });
                self.set_backend(backend);
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let fill = if running {
                    colors::DESTRUCTIVE
                } else {
                    colors::ACCENT
                };
                let label = self.controller.run_button_label();
                let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(fill)
                    .rounding(Rounding::same(rounding::BUTTON));
                if ui.add_enabled(self.controller.can_run(), button).clicked() {
                    self.toggle_run();
                }
            });
        });
    }

    fn render_history(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Test Runs").strong().color(colors::TEXT_PRIMARY));
        ui.add_space(spacing::XS);

        if self.controller.history().is_empty() {
            ui.label(RichText::new("No runs yet").color(colors::TEXT_MUTED));
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("history")
            .max_height(HISTORY_MAX_HEIGHT)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for entry in self.controller.history().iter() {
                    render_history_row(ui, entry);
                    ui.add_space(spacing::XS);
                }
            });
    }

    fn render_output(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Test Output").strong().color(colors::TEXT_PRIMARY));
        ui.add_space(spacing::XS);

        let log = self.controller.log();
        let row_height = ui.text_style_height(&egui::TextStyle::Monospace);

        egui::Frame::none()
            .fill(colors::LOG_BACKGROUND)
            .stroke(Stroke::new(1.0, colors::BORDER))
            .rounding(Rounding::same(rounding::BUTTON))
            .inner_margin(egui::Margin::same(spacing::SM))
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("output")
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show_rows(ui, row_height, log.len(), |ui, rows| {
                        for line in &log[rows] {
                            ui.label(RichText::new(line).monospace().color(colors::TEXT_PRIMARY));
                        }
                    });
            });
    }

    fn render_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let color = if self.controller.is_stopping() {
                ui.spinner();
                colors::STATUS_WARNING
            } else if self.controller.is_running() {
                ui.spinner();
                colors::STATUS_RUNNING
            } else {
                colors::TEXT_SECONDARY
            };
            ui.label(RichText::new(self.controller.status()).color(color));
        });
    }
}

fn render_history_row(ui: &mut egui::Ui, entry: &HistoryEntry) {
    egui::Frame::none()
        .fill(theme::outcome_background(entry.outcome))
        .rounding(Rounding::same(rounding::CARD))
        .inner_margin(egui::Margin::symmetric(spacing::MD, spacing::SM))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(entry.title())
                    .strong()
                    .color(theme::outcome_color(entry.outcome)),
            );
            ui.label(RichText::new(entry.subtitle()).small().color(colors::TEXT_MUTED));
        });
}

/// Build the root viewport from the restored session geometry.
fn build_viewport(session: &SessionState) -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_app_id("se.danielnylander.autopkgtest.runner")
        .with_inner_size([session.width as f32, session.height as f32])
        .with_min_inner_size([MIN_WIDTH, MIN_HEIGHT])
        .with_maximized(session.maximized)
        .with_drag_and_drop(true)
}

/// Launch the native GUI application.
///
/// # Returns
///
/// * `Ok(())` when the user closes the window
/// * `Err(RunnerError)` if the GUI fails to initialize
pub fn run_gui() -> Result<()> {
    let settings_store = SettingsStore::new()
        .inspect_err(|e| tracing::warn!(error = %e, "Settings will not be persisted"))
        .ok();
    let session_store = SessionStore::new()
        .inspect_err(|e| tracing::warn!(error = %e, "Window size will not be persisted"))
        .ok();
    let session = session_store
        .as_ref()
        .map(SessionStore::load)
        .unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: build_viewport(&session),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            theme::init(&cc.egui_ctx);
            Ok(Box::new(RunnerApp::new(
                settings_store,
                session_store,
                session,
            )))
        }),
    )
    .map_err(|e| RunnerError::GuiError(e.to_string()))
}
