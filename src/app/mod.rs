// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the examination list,
//! the test screen and the floating webcam preview.
//!
//! The `App` struct wires together the domains (eligibility, test taking,
//! camera preview, localization) and translates messages into side effects
//! such as service requests, violation reports and toasts.

mod message;
pub mod paths;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::api::{AssessmentApi, AssessmentService, TestApi, UnavailableAssessments};
use crate::config::{self, WebcamConfig};
use crate::diagnostics::{AppStateEvent, BufferCapacity, DiagnosticsCollector};
use crate::error::ApiError;
use crate::exam::{EligibilityResolver, TestDetailsState};
use crate::i18n::fluent::I18n;
use crate::session::SessionStore;
use crate::ui::notifications::{self, Notification};
use crate::ui::theming::ThemeMode;
use crate::webcam::{FallbackStreamSlot, PreviewState, StreamHandle, WindowCursor};
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::sync::Arc;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    session: SessionStore,
    resolver: EligibilityResolver,
    assessments: Arc<dyn AssessmentService>,
    /// Kept as a `Result` so a bad base URL surfaces when the test starts.
    test_api: Result<TestApi, ApiError>,
    test: Option<TestDetailsState>,
    preview: PreviewState,
    /// Stream handle shared with the preview once capture has started.
    camera_stream: Option<StreamHandle>,
    cursor: WindowCursor,
    theme_mode: ThemeMode,
    webcam_config: WebcamConfig,
    diagnostics: DiagnosticsCollector,
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("resolver", &self.resolver.phase())
            .field("preview_mounted", &self.preview.is_mounted())
            .finish_non_exhaustive()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 760;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1100;
pub const MIN_WINDOW_HEIGHT: u32 = 600;
pub const MIN_WINDOW_WIDTH: u32 = 800;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires a `Fn` boot function; flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads configuration, builds the service clients and mounts the
    /// examination screen.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

        let (mut config, config_warning) = config::load();
        if let Some(url) = flags.api_url.clone() {
            config.api.base_url = Some(url);
        }
        if let Some(device) = flags.device.clone() {
            config.webcam.device = Some(device);
        }

        let mut app = Self::with_config(
            &config,
            I18n::new(flags.lang.clone(), &config),
            SessionStore::from_startup(flags.candidate),
        );

        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        }

        let task = app.mount_examination();
        (app, task)
    }

    /// State for `config` without touching the filesystem or starting any
    /// request.
    fn with_config(config: &config::Config, i18n: I18n, session: SessionStore) -> Self {
        let diagnostics = DiagnosticsCollector::new(BufferCapacity::default());
        let mut notifications = notifications::Manager::new();
        notifications.set_diagnostics(diagnostics.handle());

        let base_url = config.api.base_url_or_default();
        let timeout = config.api.timeout();
        let assessments: Arc<dyn AssessmentService> =
            match AssessmentApi::new(&base_url, timeout, diagnostics.handle()) {
                Ok(api) => Arc::new(api),
                Err(error) => Arc::new(UnavailableAssessments::new(error)),
            };
        let test_api = TestApi::new(&base_url, timeout, diagnostics.handle());

        diagnostics.handle().log_state(AppStateEvent::Started {
            locale: i18n.current_locale().to_string(),
        });

        let mut preview = PreviewState::new(&config.webcam, FallbackStreamSlot::new());
        preview.set_viewport(window_settings().size);

        Self {
            i18n,
            screen: Screen::Examination,
            session,
            resolver: EligibilityResolver::new(),
            assessments,
            test_api,
            test: None,
            preview,
            camera_stream: None,
            cursor: WindowCursor::default(),
            theme_mode: config.general.theme_mode,
            webcam_config: config.webcam.clone(),
            diagnostics,
            notifications,
        }
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match (&self.screen, &self.test) {
            (Screen::TestDetails, Some(test)) => {
                let screen_name = self.i18n.tr("test-details-title");
                format!("{screen_name} {} - {app_name}", test.question_set_id())
            }
            _ => app_name,
        }
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(),
            subscription::create_webcam_subscription(self.screen, &self.preview),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = self.update_context();

        match message {
            Message::Examination(message) => update::handle_examination_message(&mut ctx, message),
            Message::TestDetails(message) => update::handle_test_details_message(&mut ctx, message),
            Message::Webcam(message) => update::handle_webcam_message(&mut ctx, message),
            Message::Notification(message) => {
                ctx.notifications.handle_message(&message);
                Task::none()
            }
            Message::AssessmentsLoaded { token, result } => {
                update::handle_assessments_loaded(&mut ctx, token, result)
            }
            Message::TestStarted {
                question_set_id,
                result,
            } => update::handle_test_started(&mut ctx, &question_set_id, result),
            Message::SectionSubmitted {
                token,
                violations_saved,
                result,
            } => update::handle_section_submitted(&mut ctx, token, violations_saved, result),
            Message::WindowFocusChanged { focused } => {
                update::handle_focus_changed(&mut ctx, focused)
            }
            Message::WindowResized(size) => {
                ctx.preview.set_viewport(size);
                Task::none()
            }
            Message::ExportDiagnostics => update::handle_export_diagnostics(&mut ctx),
            Message::Tick(_instant) => {
                ctx.diagnostics.process_pending();
                ctx.notifications.tick();
                ctx.preview.refresh();
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: self.screen,
            resolver: &self.resolver,
            test: self.test.as_ref(),
            preview: &self.preview,
            cursor: &self.cursor,
            notifications: &self.notifications,
        })
    }

    fn mount_examination(&mut self) -> Task<Message> {
        let mut ctx = self.update_context();
        update::mount_examination(&mut ctx)
    }

    fn update_context(&mut self) -> update::UpdateContext<'_> {
        update::UpdateContext {
            screen: &mut self.screen,
            session: &self.session,
            resolver: &mut self.resolver,
            assessments: &self.assessments,
            test_api: &self.test_api,
            test: &mut self.test,
            preview: &mut self.preview,
            camera_stream: &mut self.camera_stream,
            cursor: &mut self.cursor,
            webcam_config: &self.webcam_config,
            diagnostics: &mut self.diagnostics,
            notifications: &mut self.notifications,
        }
    }
}
