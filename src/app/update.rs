// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Handlers receive an [`UpdateContext`] borrowing the parts of `App` they
//! touch, and return the follow-up `Task` (service requests) if any.

use super::{paths, Message, Screen};
use crate::api::{AssessmentService, TestApi};
use crate::config::WebcamConfig;
use crate::diagnostics::{AppStateEvent, DiagnosticsCollector, UserAction};
use crate::error::ApiError;
use crate::exam::test_details::{self, Submission};
use crate::exam::{
    view as examination, EligibilityResolver, MountOutcome, RequestToken, Resolution, Route,
    SubmissionToken, TestDetailsState, TestPhase, ViolationKind,
};
use crate::session::SessionStore;
use crate::ui::notifications::{self, Notification};
use crate::webcam::{self, PointerKind, PreviewState, StreamHandle, WindowCursor};
use chrono::Utc;
use iced::Task;
use serde_json::Value;
use std::sync::Arc;

/// Context for update operations containing references to app state.
pub struct UpdateContext<'a> {
    pub screen: &'a mut Screen,
    pub session: &'a SessionStore,
    pub resolver: &'a mut EligibilityResolver,
    pub assessments: &'a Arc<dyn AssessmentService>,
    pub test_api: &'a Result<TestApi, ApiError>,
    pub test: &'a mut Option<TestDetailsState>,
    pub preview: &'a mut PreviewState,
    pub camera_stream: &'a mut Option<StreamHandle>,
    pub cursor: &'a mut WindowCursor,
    pub webcam_config: &'a WebcamConfig,
    pub diagnostics: &'a mut DiagnosticsCollector,
    pub notifications: &'a mut notifications::Manager,
}

impl UpdateContext<'_> {
    /// Id of the cached candidate, or an empty string when there is none.
    fn candidate_id(&self) -> String {
        match self.session.candidate() {
            Ok(Some(candidate)) => candidate.id,
            Ok(None) | Err(_) => String::new(),
        }
    }

    /// Test currently taken, if it has started and not yet been submitted.
    fn test_in_progress(&mut self) -> Option<&mut TestDetailsState> {
        self.test.as_mut().filter(|test| {
            matches!(
                test.phase(),
                TestPhase::Ready | TestPhase::Submitting | TestPhase::SubmitFailed(_)
            )
        })
    }

    fn record_violation(&mut self, kind: ViolationKind) -> bool {
        let Some(test) = self.test_in_progress() else {
            return false;
        };
        test.record_violation(kind, Utc::now());
        self.diagnostics.log_state(AppStateEvent::ViolationRecorded {
            kind: kind.label().to_string(),
        });
        true
    }
}

/// Shows the examination list and resolves eligibility again.
pub fn mount_examination(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    *ctx.screen = Screen::Examination;

    match ctx.resolver.mount(ctx.session) {
        MountOutcome::Resolved(resolution) => {
            log_resolution(ctx.diagnostics, &resolution);
            Task::none()
        }
        MountOutcome::Fetch {
            token,
            candidate_id,
        } => Task::perform(
            ctx.assessments.get_finalized_test(&candidate_id),
            move |result| Message::AssessmentsLoaded { token, result },
        ),
    }
}

fn log_resolution(diagnostics: &mut DiagnosticsCollector, resolution: &Resolution) {
    diagnostics.log_state(AppStateEvent::EligibilityResolved {
        outcome: resolution.label().to_string(),
        card_count: resolution.cards().len(),
    });
}

/// Applies a finalized-assessments response, dropping it when a newer
/// mount has superseded its request.
pub fn handle_assessments_loaded(
    ctx: &mut UpdateContext<'_>,
    token: RequestToken,
    result: Result<Value, ApiError>,
) -> Task<Message> {
    if ctx.resolver.complete(token, result) {
        if let Some(resolution) = ctx.resolver.resolution() {
            log_resolution(ctx.diagnostics, resolution);
        }
    } else {
        ctx.diagnostics.log_state(AppStateEvent::StaleResponseDropped {
            token: token.value(),
        });
    }
    Task::none()
}

pub fn handle_examination_message(
    ctx: &mut UpdateContext<'_>,
    message: examination::Message,
) -> Task<Message> {
    match message {
        examination::Message::GiveTest(route) => {
            if let Route::TestDetails { question_set_id } = &route {
                ctx.diagnostics.log_action(UserAction::GiveTest {
                    question_set_id: question_set_id.clone(),
                });
            }
            navigate(ctx, route)
        }
    }
}

/// Switches to `route`, mounting or unmounting the webcam preview.
pub fn navigate(ctx: &mut UpdateContext<'_>, route: Route) -> Task<Message> {
    match route {
        Route::Examination => {
            leave_test(ctx);
            mount_examination(ctx)
        }
        Route::TestDetails { question_set_id } => {
            leave_test(ctx);
            *ctx.screen = Screen::TestDetails;
            *ctx.test = Some(TestDetailsState::new(question_set_id.clone()));
            ctx.preview.mount(
                ctx.webcam_config.initial_position(),
                ctx.camera_stream.clone(),
            );
            start_test(ctx.test_api, question_set_id)
        }
    }
}

fn leave_test(ctx: &mut UpdateContext<'_>) {
    if ctx.preview.is_mounted() {
        ctx.preview.unmount(&mut *ctx.cursor);
    }
    if ctx.camera_stream.take().is_some() {
        ctx.diagnostics.log_state(AppStateEvent::CameraStopped);
    }
    *ctx.test = None;
}

fn start_test(test_api: &Result<TestApi, ApiError>, question_set_id: String) -> Task<Message> {
    match test_api {
        Ok(api) => {
            let api = api.clone();
            let id = question_set_id.clone();
            Task::perform(async move { api.start_test(&id).await }, move |result| {
                Message::TestStarted {
                    question_set_id: question_set_id.clone(),
                    result,
                }
            })
        }
        Err(error) => Task::done(Message::TestStarted {
            question_set_id,
            result: Err(error.clone()),
        }),
    }
}

pub fn handle_test_started(
    ctx: &mut UpdateContext<'_>,
    question_set_id: &str,
    result: Result<Value, ApiError>,
) -> Task<Message> {
    let Some(test) = ctx
        .test
        .as_mut()
        .filter(|test| test.question_set_id() == question_set_id)
    else {
        return Task::none();
    };

    if let Err(error) = &result {
        ctx.notifications.push(Notification::from_api_error(error));
    }
    test.on_started(result);
    Task::none()
}

pub fn handle_test_details_message(
    ctx: &mut UpdateContext<'_>,
    message: test_details::Message,
) -> Task<Message> {
    match message {
        test_details::Message::SelectAnswer {
            question_id,
            option,
        } => {
            if let Some(test) = ctx.test.as_mut() {
                test.select(&question_id, option);
                ctx.diagnostics
                    .log_action(UserAction::SelectAnswer { question_id });
            }
            Task::none()
        }
        test_details::Message::Submit => {
            let candidate_id = ctx.candidate_id();
            let Some(submission) = ctx
                .test
                .as_mut()
                .and_then(|test| test.begin_submit(&candidate_id))
            else {
                return Task::none();
            };
            ctx.diagnostics.log_action(UserAction::SubmitSection);
            let token = submission.token;

            match ctx.test_api {
                Ok(api) => Task::perform(
                    submit_with_violations(api.clone(), submission),
                    move |(violations_saved, result)| Message::SectionSubmitted {
                        token,
                        violations_saved,
                        result,
                    },
                ),
                Err(error) => Task::done(Message::SectionSubmitted {
                    token,
                    violations_saved: 0,
                    result: Err(error.clone()),
                }),
            }
        }
        test_details::Message::Back => {
            ctx.diagnostics.log_action(UserAction::BackToExaminations);
            navigate(ctx, Route::Examination)
        }
    }
}

/// Flushes pending violations, then sends the section.
///
/// Returns how many violations the service accepted; a failed flush keeps
/// them for the next submission.
async fn submit_with_violations(
    api: TestApi,
    submission: Submission,
) -> (usize, Result<Value, ApiError>) {
    let violations_saved = match &submission.violations {
        Some((payload, count)) => match api.save_violations(payload).await {
            Ok(_) => *count,
            Err(_) => 0,
        },
        None => 0,
    };

    let result = api
        .submit_section(&submission.question_set_id, &submission.body)
        .await;
    (violations_saved, result)
}

/// Applies a submission result to the open test, dropping it when it
/// belongs to a submission that is no longer in flight.
pub fn handle_section_submitted(
    ctx: &mut UpdateContext<'_>,
    token: SubmissionToken,
    violations_saved: usize,
    result: Result<Value, ApiError>,
) -> Task<Message> {
    let notification = match &result {
        Ok(_) => Notification::success("test-details-submitted"),
        Err(error) => Notification::from_api_error(error),
    };

    let applied = ctx
        .test
        .as_mut()
        .is_some_and(|test| test.on_submitted(token, violations_saved, result));

    if applied {
        ctx.notifications.push(notification);
    } else {
        ctx.diagnostics.log_state(AppStateEvent::StaleResponseDropped {
            token: token.value(),
        });
    }
    Task::none()
}

pub fn handle_webcam_message(
    ctx: &mut UpdateContext<'_>,
    message: webcam::Message,
) -> Task<Message> {
    let Some(event) = webcam::update(ctx.preview, message, &mut *ctx.cursor) else {
        return Task::none();
    };

    match event {
        webcam::Event::DragStarted { kind, .. } => {
            ctx.diagnostics.log_action(UserAction::BeginDrag {
                pointer: kind.label().to_string(),
            });
        }
        webcam::Event::DragEnded => ctx.diagnostics.log_action(UserAction::EndDrag),
        webcam::Event::CameraStarted(handle) => {
            ctx.diagnostics.log_state(AppStateEvent::CameraStarted {
                device: handle.device().to_string(),
            });
            ctx.preview.set_shared(Some(handle.clone()));
            *ctx.camera_stream = Some(handle);
            ctx.notifications.clear_matching("error-camera-");
        }
        webcam::Event::CameraLost(error) => {
            *ctx.camera_stream = None;
            ctx.diagnostics.log_state(AppStateEvent::CameraStopped);
            ctx.notifications.push(Notification::from_camera_error(&error));
            ctx.record_violation(ViolationKind::CameraLost);
        }
    }
    Task::none()
}

/// Focus loss ends a mouse drag (the release would never reach us) and
/// counts as a violation while a test is in progress.
pub fn handle_focus_changed(ctx: &mut UpdateContext<'_>, focused: bool) -> Task<Message> {
    if focused {
        return Task::none();
    }

    if ctx.preview.controller().is_dragging_with(PointerKind::Mouse) {
        ctx.preview.controller_mut().end_drag(&mut *ctx.cursor);
        ctx.diagnostics.log_action(UserAction::EndDrag);
    }

    if *ctx.screen == Screen::TestDetails && ctx.record_violation(ViolationKind::FocusLost) {
        ctx.notifications
            .push(Notification::warning("violation-focus-lost"));
    }
    Task::none()
}

/// Writes the diagnostics buffer to the data directory.
pub fn handle_export_diagnostics(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::ExportDiagnostics);
    ctx.diagnostics.process_pending();

    let exported = paths::get_app_data_dir()
        .ok_or(())
        .and_then(|dir| ctx.diagnostics.export_to_dir(&dir).map_err(|_| ()));

    let notification = match exported {
        Ok(path) => Notification::success("notification-diagnostics-exported")
            .with_arg("path", path.display().to_string()),
        Err(()) => Notification::error("notification-diagnostics-export-failed"),
    };
    ctx.notifications.push(notification);
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UnavailableAssessments;
    use crate::diagnostics::BufferCapacity;
    use serde_json::json;

    struct Fixture {
        screen: Screen,
        session: SessionStore,
        resolver: EligibilityResolver,
        assessments: Arc<dyn AssessmentService>,
        test_api: Result<TestApi, ApiError>,
        test: Option<TestDetailsState>,
        preview: PreviewState,
        camera_stream: Option<StreamHandle>,
        cursor: WindowCursor,
        webcam_config: WebcamConfig,
        diagnostics: DiagnosticsCollector,
        notifications: notifications::Manager,
    }

    impl Fixture {
        fn new() -> Self {
            let webcam_config = WebcamConfig::default();
            Self {
                screen: Screen::Examination,
                session: SessionStore::new(),
                resolver: EligibilityResolver::new(),
                assessments: Arc::new(UnavailableAssessments::new(ApiError::InvalidUrl(
                    "test".into(),
                ))),
                test_api: Err(ApiError::InvalidUrl("test".into())),
                test: None,
                preview: PreviewState::new(&webcam_config, webcam::FallbackStreamSlot::new()),
                camera_stream: None,
                cursor: WindowCursor::default(),
                webcam_config,
                diagnostics: DiagnosticsCollector::new(BufferCapacity::default()),
                notifications: notifications::Manager::new(),
            }
        }

        fn ctx(&mut self) -> UpdateContext<'_> {
            UpdateContext {
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

    fn in_flight_token(fixture: &mut Fixture) -> SubmissionToken {
        fixture
            .test
            .as_ref()
            .and_then(TestDetailsState::submission_in_flight)
            .unwrap()
    }

    fn ready_test(id: &str) -> TestDetailsState {
        let mut test = TestDetailsState::new(id);
        test.on_started(Ok(json!({"questions": []})));
        test
    }

    #[test]
    fn navigate_to_test_uses_configured_position() {
        let mut fixture = Fixture::new();
        let _ = navigate(
            &mut fixture.ctx(),
            Route::TestDetails {
                question_set_id: "qs".into(),
            },
        );

        assert_eq!(fixture.screen, Screen::TestDetails);
        assert_eq!(
            fixture.preview.controller().position(),
            fixture.webcam_config.initial_position()
        );
    }

    #[test]
    fn leaving_test_forgets_camera_stream() {
        let mut fixture = Fixture::new();
        fixture.camera_stream = Some(StreamHandle::new("cam"));
        fixture.test = Some(ready_test("qs"));

        let _ = navigate(&mut fixture.ctx(), Route::Examination);

        assert!(fixture.camera_stream.is_none());
        assert!(fixture.test.is_none());
        assert_eq!(fixture.screen, Screen::Examination);
    }

    #[test]
    fn violations_are_not_recorded_before_test_starts() {
        let mut fixture = Fixture::new();
        fixture.screen = Screen::TestDetails;
        fixture.test = Some(TestDetailsState::new("qs"));

        let _ = handle_focus_changed(&mut fixture.ctx(), false);

        assert_eq!(fixture.test.as_ref().map(|t| t.violations().len()), Some(0));
        assert_eq!(fixture.notifications.visible_count(), 0);
    }

    #[test]
    fn failed_start_shows_error_toast() {
        let mut fixture = Fixture::new();
        fixture.test = Some(TestDetailsState::new("qs"));

        let _ = handle_test_started(&mut fixture.ctx(), "qs", Err(ApiError::Status(503)));

        assert!(matches!(
            fixture.test.as_ref().map(TestDetailsState::phase),
            Some(TestPhase::LoadFailed(ApiError::Status(503)))
        ));
        assert_eq!(fixture.notifications.visible_count(), 1);
    }

    #[test]
    fn failed_submission_keeps_unsaved_violations() {
        let mut fixture = Fixture::new();
        let mut test = ready_test("qs");
        test.record_violation(ViolationKind::FocusLost, Utc::now());
        fixture.test = Some(test);

        let _ = handle_test_details_message(&mut fixture.ctx(), test_details::Message::Submit);
        let token = in_flight_token(&mut fixture);
        let _ = handle_section_submitted(
            &mut fixture.ctx(),
            token,
            0,
            Err(ApiError::Status(500)),
        );

        let test = fixture.test.as_ref().map(|t| (t.violations().len(), t.can_submit()));
        assert_eq!(test, Some((1, true)));
    }

    #[test]
    fn late_submission_result_leaves_newly_opened_test_alone() {
        let mut fixture = Fixture::new();
        let _ = navigate(
            &mut fixture.ctx(),
            Route::TestDetails {
                question_set_id: "qs-1".into(),
            },
        );
        let _ = handle_test_started(&mut fixture.ctx(), "qs-1", Ok(json!({"questions": []})));
        let _ = handle_test_details_message(&mut fixture.ctx(), test_details::Message::Submit);
        let first = in_flight_token(&mut fixture);

        let _ = handle_test_details_message(&mut fixture.ctx(), test_details::Message::Back);
        let _ = navigate(
            &mut fixture.ctx(),
            Route::TestDetails {
                question_set_id: "qs-2".into(),
            },
        );
        let _ = handle_test_started(&mut fixture.ctx(), "qs-2", Ok(json!({"questions": []})));
        let _ = handle_focus_changed(&mut fixture.ctx(), false);
        let toasts = fixture.notifications.visible_count();

        let _ = handle_section_submitted(&mut fixture.ctx(), first, 1, Ok(json!({})));

        let test = fixture.test.as_ref().unwrap();
        assert_eq!(test.question_set_id(), "qs-2");
        assert_eq!(test.phase(), &TestPhase::Ready);
        assert_eq!(test.violations().len(), 1);
        assert_eq!(fixture.notifications.visible_count(), toasts);
    }

    #[test]
    fn camera_restart_clears_camera_toasts() {
        let mut fixture = Fixture::new();
        fixture
            .notifications
            .push(Notification::from_camera_error(
                &crate::error::CameraError::NoVideoStream,
            ));
        fixture.preview.mount(iced::Point::ORIGIN, None);

        let _ = handle_webcam_message(
            &mut fixture.ctx(),
            webcam::Message::Capture(webcam::CaptureEvent::Started(StreamHandle::new("cam"))),
        );

        assert_eq!(fixture.notifications.visible_count(), 0);
        assert!(fixture.camera_stream.is_some());
    }
}
