//! Browser platform: LocalStorage, `<img>` decoding and `<video>` frames
//!
//! Pixels are read back through an offscreen 2D canvas (`getImageData`).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use crate::assets::{Assets, Sprite, SpriteKey};
use crate::media::{FrameSource, RequestGate};
use crate::persistence::{self, ProgressStore, StoreError};
use crate::progress::Progress;

/// LocalStorage key for the progress record
pub const SAVE_KEY: &str = "flap_shop_save";
/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

fn js_error(e: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{:?}", e))
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Read a LocalStorage entry
pub fn read_local(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Write a LocalStorage entry
pub fn write_local(key: &str, value: &str) -> Result<(), StoreError> {
    let storage =
        local_storage().ok_or_else(|| StoreError::Unavailable("no LocalStorage".to_string()))?;
    storage.set_item(key, value).map_err(js_error)
}

/// Progress stored in LocalStorage
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(SAVE_KEY)
    }
}

impl ProgressStore for LocalStorageStore {
    fn load(&self) -> Progress {
        persistence::decode_or_default(read_local(&self.key).as_deref())
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StoreError> {
        let json = persistence::encode(progress)?;
        write_local(&self.key, &json)
    }
}

/// Offscreen canvas used to pull RGBA pixels out of images and video
struct PixelReader {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl PixelReader {
    fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self { canvas, ctx })
    }

    fn resize(&self, width: u32, height: u32) {
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }

    fn read(&self, width: u32, height: u32) -> Option<Sprite> {
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;
        Sprite::from_rgba(width, height, &data.data())
    }

    fn image(&self, img: &HtmlImageElement) -> Option<Sprite> {
        let (w, h) = (img.natural_width(), img.natural_height());
        if w == 0 || h == 0 {
            return None;
        }
        self.resize(w, h);
        self.ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
        self.read(w, h)
    }

    fn video(&self, video: &HtmlVideoElement, width: u32, height: u32) -> Option<Sprite> {
        if video.ready_state() < HAVE_CURRENT_DATA {
            return None;
        }
        self.resize(width, height);
        self.ctx
            .draw_image_with_html_video_element_and_dw_and_dh(
                video,
                0.0,
                0.0,
                width as f64,
                height as f64,
            )
            .ok()?;
        self.read(width, height)
    }
}

async fn fetch_image(url: &str) -> Option<HtmlImageElement> {
    let img = HtmlImageElement::new().ok()?;
    img.set_src(url);
    JsFuture::from(img.decode()).await.ok()?;
    Some(img)
}

/// Decode every known sprite under `base_url`; missing files are skipped
pub async fn load_assets(base_url: &str) -> Assets {
    let mut assets = Assets::new();
    let Some(reader) = PixelReader::new() else {
        log::warn!("No 2D canvas available, using procedural sprites");
        return assets;
    };
    for key in SpriteKey::all() {
        let Some(file) = key.file_name() else {
            continue;
        };
        let url = format!("{}/{}", base_url, file);
        match fetch_image(&url).await.and_then(|img| reader.image(&img)) {
            Some(sprite) => {
                let (w, h) = match key {
                    SpriteKey::Avatar(_) => (50, 40),
                    SpriteKey::Coin => (30, 30),
                    SpriteKey::Background => (400, 600),
                };
                assets.insert_sprite(key, sprite.resized(w, h));
            }
            None => log::info!("{} not loaded, using fallback", url),
        }
    }
    log::info!("Loaded {} sprites", assets.sprite_count());
    assets
}

/// Frames from a `<video>` element, either a looping file or a live camera
pub struct VideoFrames {
    video: HtmlVideoElement,
    reader: PixelReader,
    width: u32,
    height: u32,
    /// Camera stream, shared with the pending `getUserMedia` future
    stream: Rc<RefCell<Option<MediaStream>>>,
    request: Rc<RequestGate>,
    camera: bool,
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

impl VideoFrames {
    fn with_video(video: HtmlVideoElement, width: u32, height: u32, camera: bool) -> Option<Self> {
        video.set_muted(true);
        video.set_autoplay(true);
        let _ = video.set_attribute("playsinline", "");
        Some(Self {
            video,
            reader: PixelReader::new()?,
            width,
            height,
            stream: Rc::new(RefCell::new(None)),
            request: Rc::new(RequestGate::new()),
            camera,
        })
    }

    /// Looping background video
    pub fn looping(url: &str, width: u32, height: u32) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let video: HtmlVideoElement = document.create_element("video").ok()?.dyn_into().ok()?;
        video.set_loop(true);
        video.set_src(url);
        let frames = Self::with_video(video, width, height, false)?;
        let _ = frames.video.play();
        log::info!("Background video: {}", url);
        Some(frames)
    }

    /// Webcam; the device is only opened on `start`
    pub fn camera(width: u32, height: u32) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let video: HtmlVideoElement = document.create_element("video").ok()?.dyn_into().ok()?;
        Self::with_video(video, width, height, true)
    }
}

impl FrameSource for VideoFrames {
    fn poll_frame(&mut self) -> Option<Sprite> {
        self.reader.video(&self.video, self.width, self.height)
    }

    fn start(&mut self) {
        if !self.camera || self.stream.borrow().is_some() {
            return;
        }
        // At most one permission prompt in flight
        let Some(ticket) = self.request.begin() else {
            return;
        };
        let Some(devices) = web_sys::window().and_then(|w| w.navigator().media_devices().ok())
        else {
            log::warn!("Camera unavailable (no media devices)");
            self.request.cancel();
            return;
        };
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        let promise = match devices.get_user_media_with_constraints(&constraints) {
            Ok(promise) => promise,
            Err(e) => {
                log::warn!("Camera unavailable: {:?}", e);
                self.request.cancel();
                return;
            }
        };

        let video = self.video.clone();
        let slot = self.stream.clone();
        let request = self.request.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = JsFuture::from(promise).await;
            let current = request.settle(ticket);
            match result {
                Ok(value) => {
                    let stream: MediaStream = value.unchecked_into();
                    if !current {
                        stop_tracks(&stream);
                        log::info!("Camera answered after capture closed, released");
                        return;
                    }
                    video.set_src_object(Some(&stream));
                    let _ = video.play();
                    *slot.borrow_mut() = Some(stream);
                    log::info!("Camera started");
                }
                Err(e) => log::warn!("Camera permission denied or failed: {:?}", e),
            }
        });
    }

    fn stop(&mut self) {
        self.request.cancel();
        if let Some(stream) = self.stream.borrow_mut().take() {
            stop_tracks(&stream);
            self.video.set_src_object(None);
            log::info!("Camera released");
        }
    }
}
