/// Live camera feed
///
/// CameraFeed spawns a capture thread that owns the nokhwa device for its
/// whole lifetime: open, stream, publish frames, stop. The UI polls
/// `latest_frame` on a timer and `take_failure` to learn the thread died.
/// Dropping the handle stops the stream and joins the thread, so the device
/// is released on every exit path, including errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use super::{CameraError, Frame};

/// Frame rate requested from the device; the UI polls slower than this.
const REQUESTED_FPS: u32 = 30;

/// Handle to the capture thread.
pub struct CameraFeed {
    latest: Arc<Mutex<Option<Frame>>>,
    failure: Arc<Mutex<Option<String>>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl CameraFeed {
    /// Start the capture thread, requesting a device format closest to the
    /// given dimensions. Opening happens on the thread, so this returns
    /// immediately; failures surface later through `take_failure`.
    pub fn start(hint_width: u32, hint_height: u32) -> Self {
        #[cfg(target_os = "macos")]
        nokhwa::nokhwa_initialize(|_granted| {});

        let latest = Arc::new(Mutex::new(None));
        let failure = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = {
            let latest = Arc::clone(&latest);
            let failure = Arc::clone(&failure);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                if let Err(error) = run_capture_loop(hint_width, hint_height, &latest, &stop) {
                    log::error!("camera capture loop ended: {}", error);
                    if let Ok(mut slot) = failure.lock() {
                        *slot = Some(error.to_string());
                    }
                }
            })
        };

        Self {
            latest,
            failure,
            stop,
            worker: Some(worker),
        }
    }

    /// The most recent frame, if the stream has produced one yet.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }

    /// Take the capture thread's failure message, if it died.
    pub fn take_failure(&self) -> Option<String> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_capture_loop(
    hint_width: u32,
    hint_height: u32,
    latest: &Mutex<Option<Frame>>,
    stop: &AtomicBool,
) -> Result<(), CameraError> {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(
            Resolution::new(hint_width, hint_height),
            FrameFormat::MJPEG,
            REQUESTED_FPS,
        ),
    ));

    let mut camera = Camera::new(CameraIndex::Index(0), requested)
        .map_err(|e| CameraError::Open(e.to_string()))?;
    camera
        .open_stream()
        .map_err(|e| CameraError::Stream(e.to_string()))?;

    let resolution = camera.resolution();
    log::info!(
        "camera stream open at {}x{}",
        resolution.width(),
        resolution.height()
    );

    let result = pump_frames(&mut camera, latest, stop);

    // Release the device on every exit path
    let _ = camera.stop_stream();
    result
}

fn pump_frames(
    camera: &mut Camera,
    latest: &Mutex<Option<Frame>>,
    stop: &AtomicBool,
) -> Result<(), CameraError> {
    while !stop.load(Ordering::Relaxed) {
        let buffer = camera
            .frame()
            .map_err(|e| CameraError::Frame(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::Decode(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for pixel in decoded.pixels() {
            rgba.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
        }

        if let Ok(mut slot) = latest.lock() {
            *slot = Some(Frame {
                width,
                height,
                rgba,
            });
        }
    }
    Ok(())
}
