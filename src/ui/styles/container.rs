// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{border, opacity, palette, radius, shadow};
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Examination card surface.
///
/// Derived from the active Iced `Theme` background so cards stay readable in
/// both light and dark modes.
pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.background.base.color)),
        border: Border {
            color: palette.background.strong.color,
            width: border::WIDTH_SM,
            radius: radius::LG.into(),
        },
        shadow: shadow::SM,
        ..Default::default()
    }
}

/// Pill used for the work type and skill tags.
pub fn tag(accent: Color) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_SUBTLE,
            ..accent
        })),
        text_color: Some(accent),
        border: Border {
            color: accent,
            width: border::WIDTH_SM,
            radius: radius::LG.into(),
        },
        ..Default::default()
    }
}

/// Horizontal divider above the card actions.
pub fn divider(theme: &Theme) -> container::Style {
    let is_dark = theme.extended_palette().is_dark;
    container::Style {
        background: Some(Background::Color(if is_dark {
            palette::GRAY_700
        } else {
            palette::GRAY_200
        })),
        ..Default::default()
    }
}
