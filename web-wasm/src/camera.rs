//! `getUserMedia` camera device
//!
//! The device owns a detached `<video>` element as its preview surface; the
//! camera view mounts it while the Capture screen is shown. Frames are sampled
//! through an offscreen canvas.

use std::rc::Rc;

use chronosnap_common::codec::RgbaFrame;
use chronosnap_common::{CaptureAdapter, CaptureDevice, Error, Result, StreamConstraints, VideoStream};
use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

/// Adapter handle shared by the app shell and the camera view
pub type SharedCamera = StoredValue<Rc<CaptureAdapter<BrowserCamera>>, LocalStorage>;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints {
    facing_mode: String,
    width: Ideal,
    height: Ideal,
}

#[derive(Debug, Serialize, PartialEq)]
struct Ideal {
    ideal: u32,
}

impl From<&StreamConstraints> for VideoConstraints {
    fn from(c: &StreamConstraints) -> Self {
        Self {
            facing_mode: c.facing_mode.clone(),
            width: Ideal { ideal: c.ideal_width },
            height: Ideal { ideal: c.ideal_height },
        }
    }
}

pub struct BrowserCamera {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
}

impl BrowserCamera {
    pub fn new() -> std::result::Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let video: HtmlVideoElement = document.create_element("video")?.dyn_into()?;
        video.set_autoplay(true);
        video.set_muted(true);
        video.set_attribute("playsinline", "")?;
        video.set_class_name("camera-preview");

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        Ok(Self { video, canvas })
    }

    /// The live preview element
    pub fn preview(&self) -> &HtmlVideoElement {
        &self.video
    }
}

impl CaptureDevice for BrowserCamera {
    type Stream = BrowserStream;

    async fn acquire(&self, constraints: &StreamConstraints) -> Result<BrowserStream> {
        let media_devices = web_sys::window()
            .ok_or_else(|| Error::Device("no window".into()))?
            .navigator()
            .media_devices()
            .map_err(device_error)?;

        let video = serde_wasm_bindgen::to_value(&VideoConstraints::from(constraints))
            .map_err(|e| Error::Device(e.to_string()))?;
        let request = MediaStreamConstraints::new();
        request.set_video(&video);
        request.set_audio(&JsValue::FALSE);

        let promise = media_devices
            .get_user_media_with_constraints(&request)
            .map_err(device_error)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(device_error)?
            .dyn_into()
            .map_err(device_error)?;

        Ok(BrowserStream {
            stream: Some(stream),
            video: self.video.clone(),
            canvas: self.canvas.clone(),
        })
    }
}

pub struct BrowserStream {
    stream: Option<MediaStream>,
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
}

impl VideoStream for BrowserStream {
    fn frame_size(&self) -> (u32, u32) {
        (self.video.video_width(), self.video.video_height())
    }

    fn grab_frame(&self) -> Result<RgbaFrame> {
        let (width, height) = self.frame_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let context: CanvasRenderingContext2d = self
            .canvas
            .get_context("2d")
            .map_err(capture_error)?
            .ok_or_else(|| Error::Capture("2d canvas context unavailable".into()))?
            .dyn_into()
            .map_err(|obj: js_sys::Object| capture_error(obj.into()))?;

        context
            .draw_image_with_html_video_element(&self.video, 0.0, 0.0)
            .map_err(capture_error)?;
        let pixels = context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(capture_error)?
            .data();

        RgbaFrame::new(width, height, pixels.0)
    }

    fn attach(&mut self) {
        let Some(stream) = &self.stream else {
            return;
        };
        self.video.set_src_object(Some(stream));
        if let Ok(playing) = self.video.play() {
            // autoplay covers the rejected case
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(playing).await;
            });
        }
    }

    fn release(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        for track in stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        // a newer stream may own the preview by now
        let shown = self
            .video
            .src_object()
            .is_some_and(|current| current.id() == stream.id());
        if shown {
            self.video.set_src_object(None);
        }
    }
}

fn device_error(value: JsValue) -> Error {
    gloo::console::error!("getUserMedia failed", value.clone());
    Error::Device(format!("{value:?}"))
}

fn capture_error(value: JsValue) -> Error {
    Error::Capture(format!("{value:?}"))
}
