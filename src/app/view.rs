// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The current screen is drawn first, the floating webcam preview above it
//! while a test is open, and toasts on top.

use super::{Message, Screen};
use crate::exam::{view as examination, EligibilityResolver, TestDetailsState};
use crate::i18n::fluent::I18n;
use crate::ui::notifications::{self, Toast};
use crate::webcam::{PreviewState, WindowCursor};
use iced::widget::{mouse_area, Container, Stack, Text};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: Screen,
    pub resolver: &'a EligibilityResolver,
    pub test: Option<&'a TestDetailsState>,
    pub preview: &'a PreviewState,
    pub cursor: &'a WindowCursor,
    pub notifications: &'a notifications::Manager,
}

/// Renders the current application view based on the active screen.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let current_view: Element<'_, Message> = match ctx.screen {
        Screen::Examination => examination::view(ctx.resolver, ctx.i18n).map(Message::Examination),
        Screen::TestDetails => view_test_details(ctx.test, ctx.i18n),
    };

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(
            Container::new(current_view)
                .width(Length::Fill)
                .height(Length::Fill),
        );

    if ctx.preview.is_mounted() {
        layers = layers.push(ctx.preview.view(ctx.i18n).map(Message::Webcam));
    }

    layers = layers.push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification));

    // The window-level cursor follows the drag even outside the preview.
    mouse_area(layers)
        .interaction(ctx.cursor.interaction())
        .into()
}

fn view_test_details<'a>(test: Option<&'a TestDetailsState>, i18n: &'a I18n) -> Element<'a, Message> {
    if let Some(test) = test {
        test.view(i18n).map(Message::TestDetails)
    } else {
        Container::new(Text::new(i18n.tr("test-details-loading")))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
