// SPDX-License-Identifier: MPL-2.0
//! Visual constants shared by the examination list, the test screen, the
//! webcam preview and toasts.
//!
//! Screens take their colors and sizes from here rather than inline values.
//!
//! ```
//! use iced::Color;
//! use proctor_lens::ui::design_tokens::{opacity, palette, spacing};
//!
//! // Backdrop of the "Drag to move" badge.
//! let badge = Color {
//!     a: opacity::OVERLAY_MEDIUM,
//!     ..palette::BLACK
//! };
//! assert!(badge.a < 1.0);
//! assert_eq!(spacing::MD, 16.0);
//! ```

use iced::Color;

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;

    /// Preview frame and placeholder backgrounds.
    pub const GRAY_900: Color = Color::from_rgb(0.1, 0.1, 0.1);
    pub const GRAY_700: Color = Color::from_rgb(0.3, 0.3, 0.3);
    /// Secondary text on cards, fallback camera glyph.
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);
    pub const GRAY_100: Color = Color::from_rgb(0.85, 0.85, 0.85);

    /// "Give test" and submit buttons.
    pub const PRIMARY_500: Color = Color::from_rgb(0.3, 0.6, 0.9);
    pub const PRIMARY_600: Color = Color::from_rgb(0.2, 0.5, 0.8);
    pub const PRIMARY_700: Color = Color::from_rgb(0.15, 0.4, 0.7);

    // Toast severities
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);
}

pub mod opacity {
    /// Skill tag fill, hovered toast dismiss button.
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    /// Badge backdrop over the live frame.
    pub const OVERLAY_MEDIUM: f32 = 0.5;
}

/// 4px steps.
pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
}

pub mod sizing {
    /// Severity icon column of a toast.
    pub const ICON_MD: f32 = 24.0;
    pub const TOAST_WIDTH: f32 = 320.0;
    /// "Give test" button on examination cards.
    pub const GIVE_TEST_WIDTH: f32 = 110.0;
    /// Labels of the From / To lines on examination cards.
    pub const LABEL_WIDTH: f32 = 100.0;
}

pub mod typography {
    /// Examination list heading.
    pub const TITLE_LG: f32 = 30.0;
    /// Card titles and the test screen heading.
    pub const TITLE_MD: f32 = 20.0;
    /// Question text, toast messages.
    pub const BODY_LG: f32 = 16.0;
    pub const BODY: f32 = 14.0;
    pub const BODY_SM: f32 = 13.0;
    /// Badges, skill tags, hints.
    pub const CAPTION: f32 = 12.0;
}

pub mod border {
    pub const WIDTH_SM: f32 = 1.0;
    /// Toast accent.
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
    pub const LG: f32 = 12.0;
}

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const SM: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 2.0 },
        blur_radius: 4.0,
    };

    pub const MD: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };

    /// Floating webcam preview.
    pub const LG: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 8.0 },
        blur_radius: 16.0,
    };
}

const _: () = {
    assert!(spacing::XXS > 0.0);
    assert!(spacing::XS > spacing::XXS);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(opacity::OVERLAY_SUBTLE < opacity::OVERLAY_MEDIUM);
    assert!(opacity::OVERLAY_MEDIUM < 1.0);

    assert!(typography::TITLE_LG > typography::TITLE_MD);
    assert!(typography::TITLE_MD > typography::BODY_LG);
    assert!(typography::BODY_LG > typography::BODY);
    assert!(typography::BODY > typography::BODY_SM);
    assert!(typography::BODY_SM > typography::CAPTION);

    assert!(radius::LG > radius::MD);
    assert!(border::WIDTH_MD > border::WIDTH_SM);

    assert!(sizing::GIVE_TEST_WIDTH < sizing::TOAST_WIDTH);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_follows_four_pixel_steps() {
        for step in [spacing::XXS, spacing::XS, spacing::SM, spacing::MD, spacing::LG] {
            assert_eq!(step % 4.0, 0.0);
        }
    }

    #[test]
    fn severity_colors_are_distinct() {
        let colors = [
            palette::ERROR_500,
            palette::WARNING_500,
            palette::SUCCESS_500,
            palette::INFO_500,
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
