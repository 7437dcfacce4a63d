// SPDX-License-Identifier: MPL-2.0
//! Camera capture through FFmpeg's input devices.
//!
//! The device is opened and decoded on a blocking thread (FFmpeg contexts
//! are not `Send`), frames are converted to RGBA and handed to the UI as
//! image handles through a bounded channel. The channel holds two frames; a
//! slow UI blocks the capture thread instead of queueing frames.

use super::stream::StreamHandle;
use crate::error::CameraError;
use iced::futures::{SinkExt, Stream};
use iced::stream;
use iced::widget::image;
use std::sync::Once;
use tokio::sync::mpsc;

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg and its capture devices once per process.
pub fn init_ffmpeg() -> Result<(), CameraError> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(CameraError::Init(e.to_string()));
            return;
        }
        ffmpeg_next::device::register_all();

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Which camera to open and how to present it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptureConfig {
    /// Device path or name, e.g. `/dev/video0`.
    pub device: String,
    /// FFmpeg input device name, e.g. `v4l2`.
    pub input_format: String,
    /// Flip frames horizontally.
    pub mirrored: bool,
    /// Distinguishes preview mounts so each one opens the camera afresh.
    pub session: u64,
}

/// Decoded RGBA frame ready to display.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// The device is open; frames follow.
    Started(StreamHandle),
    Frame(CameraFrame),
    /// Capture stopped for good.
    Error(CameraError),
}

/// Capture events for one preview mount.
pub fn subscription(config: CaptureConfig) -> iced::Subscription<CaptureEvent> {
    iced::Subscription::run_with(config, capture_stream)
}

fn capture_stream(config: &CaptureConfig) -> impl Stream<Item = CaptureEvent> {
    let config = config.clone();

    stream::channel(4, move |mut output: iced::futures::channel::mpsc::Sender<CaptureEvent>| async move {
        let (event_tx, mut event_rx) = mpsc::channel(2);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = capture_loop_blocking(&config, &event_tx) {
                let _ = event_tx.blocking_send(CaptureEvent::Error(e));
            }
        });

        // Dropping the receiver (when the subscription goes away) makes the
        // capture thread's next send fail, which closes the device.
        while let Some(event) = event_rx.recv().await {
            if output.send(event).await.is_err() {
                break;
            }
        }
    })
}

fn open_device(config: &CaptureConfig) -> Result<ffmpeg_next::format::context::Input, CameraError> {
    init_ffmpeg()?;

    let format = ffmpeg_next::device::input::video()
        .find(|format| format.name() == config.input_format)
        .ok_or_else(|| CameraError::BackendUnavailable(config.input_format.clone()))?;

    let context =
        ffmpeg_next::format::open_with(&config.device, &format, ffmpeg_next::Dictionary::new())
        .map_err(|e| CameraError::from_message(&format!("{}: {}", config.device, e)))?;

    Ok(context.input())
}

fn capture_loop_blocking(
    config: &CaptureConfig,
    event_tx: &mpsc::Sender<CaptureEvent>,
) -> Result<(), CameraError> {
    let mut ictx = open_device(config)?;

    let input = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or(CameraError::NoVideoStream)?;
    let video_stream_index = input.index();

    let context_decoder = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
        .map_err(|e| CameraError::DecodingFailed(format!("codec context: {}", e)))?;
    let mut decoder = context_decoder
        .decoder()
        .video()
        .map_err(|e| CameraError::DecodingFailed(format!("video decoder: {}", e)))?;

    let width = decoder.width();
    let height = decoder.height();

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        decoder.format(),
        width,
        height,
        ffmpeg_next::format::Pixel::RGBA,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| CameraError::DecodingFailed(format!("scaler: {}", e)))?;

    if event_tx
        .blocking_send(CaptureEvent::Started(StreamHandle::new(config.device.clone())))
        .is_err()
    {
        return Ok(());
    }

    let mut decoded_frame = ffmpeg_next::frame::Video::empty();
    let mut rgba_frame = ffmpeg_next::frame::Video::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() != video_stream_index {
            continue;
        }

        // A corrupt packet from a webcam is not fatal; wait for the next one.
        if decoder.send_packet(&packet).is_err() {
            continue;
        }

        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            scaler
                .run(&decoded_frame, &mut rgba_frame)
                .map_err(|e| CameraError::DecodingFailed(format!("scaling: {}", e)))?;

            let mut pixels = extract_rgba_data(&rgba_frame);
            if config.mirrored {
                mirror_rows(&mut pixels, width as usize);
            }

            let frame = CameraFrame {
                handle: image::Handle::from_rgba(width, height, pixels),
                width,
                height,
            };

            if event_tx.blocking_send(CaptureEvent::Frame(frame)).is_err() {
                // Subscription dropped; release the device.
                return Ok(());
            }
        }
    }

    Err(CameraError::DeviceUnavailable(format!(
        "{}: stream ended",
        config.device
    )))
}

/// Extracts RGBA data from a decoded frame, handling stride correctly.
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba_bytes = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row_start = y * stride;
        let row_end = row_start + width * 4;
        rgba_bytes.extend_from_slice(&data[row_start..row_end]);
    }

    rgba_bytes
}

/// Flips tightly packed RGBA rows horizontally in place.
fn mirror_rows(pixels: &mut [u8], width: usize) {
    let row_len = width * 4;
    if row_len == 0 {
        return;
    }
    for row in pixels.chunks_exact_mut(row_len) {
        for x in 0..width / 2 {
            let left = x * 4;
            let right = (width - 1 - x) * 4;
            for channel in 0..4 {
                row.swap(left + channel, right + channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_rows_flips_each_row() {
        // 3x2 image, pixels labelled by their first byte.
        let mut pixels = vec![
            1, 0, 0, 255, 2, 0, 0, 255, 3, 0, 0, 255, //
            4, 0, 0, 255, 5, 0, 0, 255, 6, 0, 0, 255,
        ];
        mirror_rows(&mut pixels, 3);

        let firsts: Vec<u8> = pixels.chunks_exact(4).map(|p| p[0]).collect();
        assert_eq!(firsts, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn mirror_rows_twice_is_identity() {
        let original: Vec<u8> = (0..64).collect();
        let mut pixels = original.clone();
        mirror_rows(&mut pixels, 4);
        mirror_rows(&mut pixels, 4);
        assert_eq!(pixels, original);
    }

    #[test]
    fn mirror_rows_ignores_zero_width() {
        let mut pixels: Vec<u8> = Vec::new();
        mirror_rows(&mut pixels, 0);
        assert!(pixels.is_empty());
    }
}
