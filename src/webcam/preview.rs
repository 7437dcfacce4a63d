// SPDX-License-Identifier: MPL-2.0
//! Floating webcam preview: state and layered view.
//!
//! Layers, bottom to top: fallback canvas (only while a stream is open but
//! no frame has been decoded), live frame, "Drag to move" badge, "no camera"
//! placeholder (only when no stream exists at all), and a transparent drag
//! surface that receives presses and touches.

use super::capture::{CameraFrame, CaptureConfig};
use super::cursor::CursorAffordance;
use super::drag::{DragController, PointerKind};
use super::stream::{FallbackStreamSlot, StreamAvailability, StreamHandle, StreamSources};
use super::Message;
use crate::config::WebcamConfig;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{opacity, palette, radius, shadow, spacing, typography};
use iced::widget::canvas::{self, Canvas, Frame, Path, Stroke};
use iced::widget::{container, image, pin, text, Container, Stack};
use iced::{
    mouse, touch, Background, Border, Color, ContentFit, Element, Length, Point, Rectangle,
    Renderer, Size, Theme,
};

/// Everything the preview needs between two renders.
#[derive(Debug, Clone)]
pub struct PreviewState {
    controller: DragController,
    sources: StreamSources,
    frame: Option<CameraFrame>,
    frame_observed: bool,
    availability: StreamAvailability,
    size: Size,
    capture: CaptureConfig,
    mounted: bool,
}

impl PreviewState {
    #[must_use]
    pub fn new(config: &WebcamConfig, fallback: FallbackStreamSlot) -> Self {
        let sources = StreamSources::new(fallback);
        let availability = StreamAvailability::resolve(sources.has_stream(), false);
        Self {
            controller: DragController::new(config.initial_position()),
            sources,
            frame: None,
            frame_observed: false,
            availability,
            size: config.size(),
            capture: CaptureConfig {
                device: config.device_or_default(),
                input_format: config.input_format_or_default(),
                mirrored: config.is_mirrored(),
                session: 0,
            },
            mounted: false,
        }
    }

    /// Shows the preview at `initial`, with `shared` as the stream owned by
    /// the surrounding test session.
    ///
    /// Each mount opens the camera afresh.
    pub fn mount(&mut self, initial: Point, shared: Option<StreamHandle>) {
        self.controller.mount(initial);
        self.sources.local = None;
        self.sources.shared = shared;
        self.frame = None;
        self.frame_observed = false;
        self.capture.session = self.capture.session.wrapping_add(1);
        self.mounted = true;
        self.refresh();
    }

    /// Takes the preview off screen, ending any drag and giving up the
    /// stream it opened.
    pub fn unmount(&mut self, cursor: &mut dyn CursorAffordance) {
        self.controller.release(cursor);
        if let Some(local) = self.sources.local.take() {
            self.sources.fallback.clear_if(&local);
        }
        self.sources.shared = None;
        self.frame = None;
        self.frame_observed = false;
        self.mounted = false;
        self.refresh();
    }

    pub fn on_stream_started(&mut self, handle: StreamHandle) {
        self.sources.fallback.publish(handle.clone());
        self.sources.local = Some(handle);
        self.refresh();
    }

    pub fn on_frame(&mut self, frame: CameraFrame) {
        self.frame = Some(frame);
        self.frame_observed = true;
        self.refresh();
    }

    /// The capture task stopped: drop every handle pointing at it.
    pub fn on_stream_lost(&mut self) {
        if let Some(local) = self.sources.local.take() {
            self.sources.fallback.clear_if(&local);
            if self.sources.shared.as_ref() == Some(&local) {
                self.sources.shared = None;
            }
        }
        self.frame = None;
        self.frame_observed = false;
        self.refresh();
    }

    pub fn set_shared(&mut self, shared: Option<StreamHandle>) {
        self.sources.shared = shared;
        self.refresh();
    }

    /// Recomputes the availability from the current sources.
    ///
    /// The fallback slot can change outside the preview, so the app calls
    /// this once per update.
    pub fn refresh(&mut self) {
        self.availability =
            StreamAvailability::resolve(self.sources.has_stream(), self.frame_observed);
    }

    #[must_use]
    pub fn availability(&self) -> StreamAvailability {
        self.availability
    }

    #[must_use]
    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DragController {
        &mut self.controller
    }

    #[must_use]
    pub fn sources(&self) -> &StreamSources {
        &self.sources
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn frame_observed(&self) -> bool {
        self.frame_observed
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Window size the preview is drawn into.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.controller.set_max_anchor(Size::new(
            viewport.width - self.size.width,
            viewport.height - self.size.height,
        ));
    }

    /// Capture settings for the current mount, or `None` while unmounted.
    #[must_use]
    pub fn capture_config(&self) -> Option<&CaptureConfig> {
        self.mounted.then_some(&self.capture)
    }

    /// Full-window layer placing the preview at its current position.
    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let mut layers = Stack::new().width(Length::Fill).height(Length::Fill);

        if self.availability.shows_fallback() {
            layers = layers.push(
                Canvas::new(FallbackCanvas)
                    .width(Length::Fill)
                    .height(Length::Fill),
            );
        }

        if let Some(frame) = &self.frame {
            layers = layers.push(
                image(frame.handle.clone())
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fill)
                    .height(Length::Fill),
            );
        }

        layers = layers.push(
            container(
                container(text(i18n.tr("webcam-drag-badge")).size(typography::CAPTION))
                    .padding([spacing::XXS, spacing::XS])
                    .style(badge_style),
            )
            .padding(spacing::XS),
        );

        if self.availability.shows_placeholder() {
            layers = layers.push(
                container(text(i18n.tr("webcam-no-stream")).size(typography::BODY_SM))
                    .center(Length::Fill)
                    .style(placeholder_style),
            );
        }

        layers = layers.push(
            Canvas::new(DragSurface {
                dragging: self.controller.is_dragging(),
            })
            .width(Length::Fill)
            .height(Length::Fill),
        );

        let preview = Container::new(layers)
            .width(Length::Fixed(self.size.width))
            .height(Length::Fixed(self.size.height))
            .clip(true)
            .style(frame_style);

        pin(preview)
            .position(self.controller.visible_position())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn frame_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BLACK)),
        border: Border {
            color: palette::GRAY_700,
            width: 1.0,
            radius: radius::MD.into(),
        },
        shadow: shadow::LG,
        ..Default::default()
    }
}

fn badge_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_MEDIUM,
            ..palette::BLACK
        })),
        text_color: Some(palette::WHITE),
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn placeholder_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::GRAY_900)),
        text_color: Some(palette::GRAY_200),
        ..Default::default()
    }
}

/// Drawn beneath the live frame while the camera warms up.
#[derive(Debug, Clone, Copy)]
struct FallbackCanvas;

impl canvas::Program<Message> for FallbackCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette::GRAY_900);

        // Camera glyph: body and lens.
        let center = frame.center();
        let body = Size::new(bounds.width * 0.24, bounds.height * 0.22);
        let stroke = Stroke::default()
            .with_color(palette::GRAY_400)
            .with_width(2.0);
        frame.stroke(
            &Path::rectangle(
                Point::new(center.x - body.width / 2.0, center.y - body.height / 2.0),
                body,
            ),
            stroke,
        );
        frame.stroke(&Path::circle(center, body.height * 0.3), stroke);

        vec![frame.into_geometry()]
    }
}

/// Transparent top layer turning presses into drag messages.
#[derive(Debug, Clone, Copy)]
struct DragSurface {
    dragging: bool,
}

/// Finger driving a touch drag; later fingers are ignored.
#[derive(Debug, Default)]
struct DragSurfaceState {
    primary_finger: Option<touch::Finger>,
}

impl DragSurfaceState {
    /// Drag message for a touch event, if it concerns the primary finger.
    ///
    /// A press inside `bounds` claims the primary slot when it is free. A
    /// lost finger ends the drag like a lifted one.
    fn on_touch(&mut self, event: &touch::Event, bounds: Rectangle) -> Option<Message> {
        match *event {
            touch::Event::FingerPressed { id, position } => {
                if self.primary_finger.is_some() || !bounds.contains(position) {
                    return None;
                }
                self.primary_finger = Some(id);
                Some(Message::PointerPressed {
                    position,
                    kind: PointerKind::Touch,
                })
            }
            touch::Event::FingerMoved { id, position } if self.primary_finger == Some(id) => {
                Some(Message::PointerMoved {
                    position,
                    kind: PointerKind::Touch,
                })
            }
            touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. }
                if self.primary_finger == Some(id) =>
            {
                self.primary_finger = None;
                Some(Message::PointerReleased(PointerKind::Touch))
            }
            _ => None,
        }
    }
}

impl canvas::Program<Message> for DragSurface {
    type State = DragSurfaceState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<iced::widget::Action<Message>> {
        use iced::widget::Action;

        let message = match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                Message::PointerPressed {
                    position: cursor.position_over(bounds)?,
                    kind: PointerKind::Mouse,
                }
            }
            iced::Event::Touch(finger_event) => state.on_touch(finger_event, bounds)?,
            _ => return None,
        };
        Some(Action::publish(message).and_capture())
    }

    fn draw(
        &self,
        _state: &Self::State,
        _renderer: &Renderer,
        _theme: &Theme,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        Vec::new()
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::None
        }
    }
}
