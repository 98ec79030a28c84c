//! Capture device adapter
//!
//! Idle -> Requesting -> Streaming, or -> Error when the device is refused.
//! The live stream is held in a [`StreamGuard`] that releases the device when
//! dropped, so every exit path (stop, restart, adapter drop) frees it.
//!
//! All methods take `&self`: the adapter is shared between UI callbacks on a
//! single thread, and no borrow is held across the device acquisition await.

use std::cell::RefCell;

use serde::Serialize;

use crate::codec::{self, EncodedImage, RgbaFrame};
use crate::error::{Error, Result};

/// Message shown when the device is refused or missing
pub const CAMERA_UNAVAILABLE: &str =
    "Unable to access camera. Please ensure permissions are granted.";

/// Camera request hints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConstraints {
    pub facing_mode: String,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing_mode: "user".to_string(),
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// A live video stream bound to a preview surface
pub trait VideoStream {
    /// Current preview dimensions; zero while the device is warming up
    fn frame_size(&self) -> (u32, u32);

    /// Samples the current frame as RGBA8
    fn grab_frame(&self) -> Result<RgbaFrame>;

    /// Binds the stream to the preview surface. Called only for the stream
    /// that becomes current, never for one discarded after `stop()`.
    fn attach(&mut self);

    /// Stops every track of the stream. Must tolerate repeated calls, and
    /// must leave the preview alone if another stream is bound to it.
    fn release(&mut self);
}

/// Platform camera access (permission-gated)
#[allow(async_fn_in_trait)]
pub trait CaptureDevice {
    type Stream: VideoStream;

    async fn acquire(&self, constraints: &StreamConstraints) -> Result<Self::Stream>;
}

/// Releases the wrapped stream exactly once, at the latest when dropped
pub struct StreamGuard<S: VideoStream> {
    stream: Option<S>,
}

impl<S: VideoStream> StreamGuard<S> {
    fn new(stream: S) -> Self {
        Self { stream: Some(stream) }
    }

    fn get(&self) -> Option<&S> {
        self.stream.as_ref()
    }
}

impl<S: VideoStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            tracing::debug!("camera stream released");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Requesting,
    Streaming,
    Error(String),
}

struct Inner<S: VideoStream> {
    state: CaptureState,
    // bumped by stop(); an acquisition that finishes under an older epoch is discarded
    epoch: u64,
    stream: Option<StreamGuard<S>>,
}

pub struct CaptureAdapter<D: CaptureDevice> {
    device: D,
    constraints: StreamConstraints,
    inner: RefCell<Inner<D::Stream>>,
}

impl<D: CaptureDevice> CaptureAdapter<D> {
    pub fn new(device: D) -> Self {
        Self::with_constraints(device, StreamConstraints::default())
    }

    pub fn with_constraints(device: D, constraints: StreamConstraints) -> Self {
        Self {
            device,
            constraints,
            inner: RefCell::new(Inner {
                state: CaptureState::Idle,
                epoch: 0,
                stream: None,
            }),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.inner.borrow().state.clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.inner.borrow().state == CaptureState::Streaming
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Requests the camera. No-op while already requesting or streaming.
    pub async fn start(&self) -> Result<()> {
        let epoch = {
            let mut inner = self.inner.borrow_mut();
            if matches!(inner.state, CaptureState::Requesting | CaptureState::Streaming) {
                return Ok(());
            }
            inner.state = CaptureState::Requesting;
            inner.epoch
        };

        let acquired = self.device.acquire(&self.constraints).await;

        let mut inner = self.inner.borrow_mut();
        if inner.epoch != epoch {
            // stopped while the permission prompt was open
            if let Ok(stream) = acquired {
                drop(StreamGuard::new(stream));
            }
            return Ok(());
        }

        match acquired {
            Ok(mut stream) => {
                stream.attach();
                inner.stream = Some(StreamGuard::new(stream));
                inner.state = CaptureState::Streaming;
                tracing::debug!("camera streaming");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "camera acquisition failed");
                inner.state = CaptureState::Error(CAMERA_UNAVAILABLE.to_string());
                Err(Error::Device(CAMERA_UNAVAILABLE.to_string()))
            }
        }
    }

    /// Releases the current stream (if any) and requests a fresh one.
    pub async fn restart(&self) -> Result<()> {
        self.stop();
        self.start().await
    }

    /// Releases the device and returns to Idle. Safe to call in any state.
    pub fn stop(&self) {
        let released = {
            let mut inner = self.inner.borrow_mut();
            inner.epoch += 1;
            inner.state = CaptureState::Idle;
            inner.stream.take()
        };
        drop(released);
    }

    /// Snapshots the current preview frame as JPEG.
    pub fn capture_frame(&self) -> Result<EncodedImage> {
        let inner = self.inner.borrow();
        let stream = match (&inner.state, inner.stream.as_ref().and_then(StreamGuard::get)) {
            (CaptureState::Streaming, Some(stream)) => stream,
            _ => return Err(Error::Capture("camera is not streaming".into())),
        };

        let (width, height) = stream.frame_size();
        if width == 0 || height == 0 {
            return Err(Error::Capture("camera preview is not ready yet".into()));
        }

        let frame = stream.grab_frame()?;
        codec::encode_frame(&frame)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeCamera;
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn counts(adapter: &CaptureAdapter<FakeCamera>) -> (u32, u32) {
        let c = &adapter.device().counters;
        (c.acquired.get(), c.released.get())
    }

    #[test]
    fn test_start_streams() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        assert_eq!(adapter.state(), CaptureState::Idle);

        block_on(adapter.start()).unwrap();
        assert_eq!(adapter.state(), CaptureState::Streaming);
        assert_eq!(counts(&adapter), (1, 0));
    }

    #[test]
    fn test_start_twice_keeps_one_stream() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        block_on(adapter.start()).unwrap();
        block_on(adapter.start()).unwrap();
        assert_eq!(counts(&adapter), (1, 0));
        assert!(adapter.is_streaming());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        adapter.stop();
        adapter.stop();
        assert_eq!(adapter.state(), CaptureState::Idle);
        assert_eq!(counts(&adapter), (0, 0));
    }

    #[test]
    fn test_stop_releases_once() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        block_on(adapter.start()).unwrap();
        adapter.stop();
        adapter.stop();
        assert_eq!(counts(&adapter), (1, 1));
        assert_eq!(adapter.state(), CaptureState::Idle);
    }

    #[test]
    fn test_restart_releases_before_acquiring() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        block_on(adapter.start()).unwrap();
        block_on(adapter.restart()).unwrap();
        assert_eq!(counts(&adapter), (2, 1));
        assert!(adapter.is_streaming());
    }

    #[test]
    fn test_drop_releases_stream() {
        let camera = FakeCamera::new();
        let counters = std::rc::Rc::clone(&camera.counters);
        {
            let adapter = CaptureAdapter::new(camera);
            block_on(adapter.start()).unwrap();
        }
        assert_eq!((counters.acquired.get(), counters.released.get()), (1, 1));
    }

    #[test]
    fn test_permission_denied_sets_error_state() {
        let camera = FakeCamera::new();
        camera.deny.set(true);
        let adapter = CaptureAdapter::new(camera);

        let result = block_on(adapter.start());
        assert!(matches!(result, Err(Error::Device(_))));
        assert_eq!(adapter.state(), CaptureState::Error(CAMERA_UNAVAILABLE.to_string()));

        // stop() still works from Error
        adapter.stop();
        assert_eq!(adapter.state(), CaptureState::Idle);
    }

    #[test]
    fn test_retry_after_error() {
        let camera = FakeCamera::new();
        camera.deny.set(true);
        let adapter = CaptureAdapter::new(camera);
        assert!(block_on(adapter.start()).is_err());

        adapter.device().deny.set(false);
        block_on(adapter.start()).unwrap();
        assert!(adapter.is_streaming());
    }

    #[test]
    fn test_capture_frame_while_streaming() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        block_on(adapter.start()).unwrap();

        let image = adapter.capture_frame().unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert!(image.split().is_ok());
    }

    #[test]
    fn test_capture_frame_when_idle_is_capture_error() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        assert!(matches!(adapter.capture_frame(), Err(Error::Capture(_))));
    }

    #[test]
    fn test_capture_frame_zero_dimensions_is_capture_error() {
        let camera = FakeCamera::new();
        camera.size.set((0, 0));
        let adapter = CaptureAdapter::new(camera);
        block_on(adapter.start()).unwrap();

        let result = adapter.capture_frame();
        assert_eq!(
            result,
            Err(Error::Capture("camera preview is not ready yet".to_string()))
        );
    }

    /// Camera whose permission prompts stay open until the test answers them,
    /// one queued answer per request
    struct PendingCamera {
        inner: FakeCamera,
        answers: RefCell<VecDeque<oneshot::Receiver<()>>>,
    }

    impl PendingCamera {
        fn new(answers: Vec<oneshot::Receiver<()>>) -> Self {
            Self {
                inner: FakeCamera::new(),
                answers: RefCell::new(answers.into()),
            }
        }
    }

    impl CaptureDevice for PendingCamera {
        type Stream = <FakeCamera as CaptureDevice>::Stream;

        async fn acquire(&self, constraints: &StreamConstraints) -> Result<Self::Stream> {
            let answer = self.answers.borrow_mut().pop_front();
            if let Some(answer) = answer {
                let _ = answer.await;
            }
            self.inner.acquire(constraints).await
        }
    }

    fn spawn_start(pool: &LocalPool, adapter: &Rc<CaptureAdapter<PendingCamera>>) {
        let starter = Rc::clone(adapter);
        pool.spawner()
            .spawn_local(async move {
                starter.start().await.unwrap();
            })
            .unwrap();
    }

    #[test]
    fn test_stop_during_request_discards_late_stream() {
        let (tx, rx) = oneshot::channel();
        let adapter = Rc::new(CaptureAdapter::new(PendingCamera::new(vec![rx])));

        let mut pool = LocalPool::new();
        spawn_start(&pool, &adapter);
        pool.run_until_stalled();
        assert_eq!(adapter.state(), CaptureState::Requesting);

        // second start while the prompt is open does not request again
        block_on(adapter.start()).unwrap();

        adapter.stop();
        tx.send(()).unwrap();
        pool.run();

        let counters = &adapter.device().inner.counters;
        assert_eq!((counters.acquired.get(), counters.released.get()), (1, 1));
        assert_eq!(adapter.state(), CaptureState::Idle);
        assert_eq!(counters.preview.get(), None);
    }

    #[test]
    fn test_late_stale_stream_keeps_live_preview() {
        let (stale_tx, stale_rx) = oneshot::channel();
        let (fresh_tx, fresh_rx) = oneshot::channel();
        let adapter = Rc::new(CaptureAdapter::new(PendingCamera::new(vec![stale_rx, fresh_rx])));
        let mut pool = LocalPool::new();

        // cancelled while the first prompt is open, then reopened
        spawn_start(&pool, &adapter);
        pool.run_until_stalled();
        adapter.stop();
        spawn_start(&pool, &adapter);
        pool.run_until_stalled();
        assert_eq!(adapter.state(), CaptureState::Requesting);

        fresh_tx.send(()).unwrap();
        pool.run_until_stalled();
        assert!(adapter.is_streaming());
        let counters = &adapter.device().inner.counters;
        assert_eq!(counters.preview.get(), Some(1));

        stale_tx.send(()).unwrap();
        pool.run();
        assert_eq!((counters.acquired.get(), counters.released.get()), (2, 1));
        assert_eq!(counters.preview.get(), Some(1));
        assert!(adapter.is_streaming());
        assert!(adapter.capture_frame().is_ok());
    }

    #[test]
    fn test_stop_clears_preview() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        block_on(adapter.start()).unwrap();
        assert_eq!(adapter.device().counters.preview.get(), Some(1));

        adapter.stop();
        assert_eq!(adapter.device().counters.preview.get(), None);
    }

    #[test]
    fn test_default_constraints() {
        let constraints = StreamConstraints::default();
        assert_eq!(constraints.facing_mode, "user");
        assert_eq!((constraints.ideal_width, constraints.ideal_height), (1280, 720));
    }
}
