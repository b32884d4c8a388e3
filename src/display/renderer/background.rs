//! Background image loading, fitting and caching.

use std::fmt;
use std::io::{self, Cursor};

use image::{imageops::FilterType, DynamicImage, ImageReader};
use log::{info, warn};

use super::context::RenderContext;
use crate::display::graphics::framebuffer::FrameBuffer;
use crate::models::WallpaperSettings;

/// Alpha of the black overlay composited over a background image so the
/// text stays readable.
const OVERLAY_ALPHA: u8 = 100;

/// Resolves an opaque image identifier to raw encoded bytes.
pub trait ImageSource: Send + Sync {
    fn open(&self, id: &str) -> io::Result<Vec<u8>>;
}

#[derive(Debug)]
pub enum BackgroundError {
    Open(io::Error),
    Decode(String),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::Open(e) => write!(f, "failed to open image: {}", e),
            BackgroundError::Decode(e) => write!(f, "failed to decode image: {}", e),
        }
    }
}

/// A decoded background, already scaled and cropped to the viewport.
pub struct FittedBackground {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl FittedBackground {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Reads a pixel; callers stay within `size()`.
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 3] {
        let i = ((y * self.width + x) * 3) as usize;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }
}

/// Scales with preserved aspect so the image covers the whole viewport,
/// then crops the centered window. The result is always exactly
/// `target_w x target_h`.
pub fn fit_cover(image: &DynamicImage, target_w: u32, target_h: u32) -> FittedBackground {
    let src_w = image.width().max(1);
    let src_h = image.height().max(1);

    let scale = f32::max(
        target_w as f32 / src_w as f32,
        target_h as f32 / src_h as f32,
    );

    // Round up so the crop window always fits
    let scaled_w = ((src_w as f32 * scale).ceil() as u32).max(target_w);
    let scaled_h = ((src_h as f32 * scale).ceil() as u32).max(target_h);

    let resized = image.resize_exact(scaled_w, scaled_h, FilterType::Triangle);

    let left = (scaled_w - target_w) / 2;
    let top = (scaled_h - target_h) / 2;
    let cropped = resized.crop_imm(left, top, target_w, target_h);

    let rgb = cropped.to_rgb8();
    FittedBackground {
        width: target_w as i32,
        height: target_h as i32,
        pixels: rgb.into_raw(),
    }
}

fn load_fitted(
    source: &dyn ImageSource,
    id: &str,
    width: u32,
    height: u32,
) -> Result<FittedBackground, BackgroundError> {
    let bytes = source.open(id).map_err(BackgroundError::Open)?;

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BackgroundError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| BackgroundError::Decode(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(BackgroundError::Decode("image has a zero dimension".to_string()));
    }

    Ok(fit_cover(&image, width, height))
}

struct CacheEntry {
    image_id: String,
    width: i32,
    height: i32,
    image: FittedBackground,
}

/// Holds at most one background, fitted to the viewport it was loaded for.
///
/// The entry is invalidated only when the image identifier or the viewport
/// size changes; a decode failure leaves the cache empty and the wallpaper
/// falls back to the flat background color.
#[derive(Default)]
pub struct BackgroundCache {
    entry: Option<CacheEntry>,
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the background for `(image_id, width, height)` unless that
    /// exact combination is already cached. With an unready viewport
    /// (non-positive dimension) nothing is loaded or released.
    pub fn ensure_loaded(
        &mut self,
        source: &dyn ImageSource,
        image_id: Option<&str>,
        width: i32,
        height: i32,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }

        let wanted = match image_id {
            Some(id) => id,
            None => {
                self.entry = None;
                return;
            }
        };

        if let Some(entry) = &self.entry {
            if entry.image_id == wanted && entry.width == width && entry.height == height {
                return;
            }
        }

        // Release the previous image before decoding its replacement
        self.entry = None;

        match load_fitted(source, wanted, width as u32, height as u32) {
            Ok(image) => {
                info!("Loaded background image {} fitted to {}x{}", wanted, width, height);
                self.entry = Some(CacheEntry {
                    image_id: wanted.to_string(),
                    width,
                    height,
                    image,
                });
            }
            Err(e) => {
                warn!("Dropping background image {}: {}", wanted, e);
            }
        }
    }

    pub fn get(&self) -> Option<&FittedBackground> {
        self.entry.as_ref().map(|entry| &entry.image)
    }

    /// Drops the held image without waiting for the next `ensure_loaded`.
    pub fn release(&mut self) {
        self.entry = None;
    }
}

/// Draws the background layer: the cached image darkened by the overlay,
/// or the flat background color when no image is available.
pub fn render_background(
    frame: &mut FrameBuffer,
    background: Option<&FittedBackground>,
    ctx: &RenderContext,
    settings: &WallpaperSettings,
) {
    match background {
        Some(image) => {
            let (width, height) = image.size();
            for y in 0..height.min(frame.height()) {
                for x in 0..width.min(frame.width()) {
                    let [r, g, b] = ctx.apply_brightness(image.pixel(x, y));
                    frame.set_pixel(x, y, r, g, b);
                }
            }
            frame.darken(OVERLAY_ALPHA);
        }
        None => {
            let [r, g, b] = ctx.apply_brightness(settings.bg_color);
            frame.fill(r, g, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        images: HashMap<String, Vec<u8>>,
        opens: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                images: HashMap::new(),
                opens: AtomicUsize::new(0),
            }
        }

        fn insert(&mut self, id: &str, bytes: Vec<u8>) {
            self.images.insert(id.to_string(), bytes);
        }

        fn open_count(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }
    }

    impl ImageSource for CountingSource {
        fn open(&self, id: &str) -> io::Result<Vec<u8>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            self.images
                .get(id)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such image"))
        }
    }

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn fit_output_is_exactly_the_target_size() {
        for (src_w, src_h, dst_w, dst_h) in [
            (10, 10, 64, 32),
            (333, 77, 100, 50),
            (1, 1, 7, 5),
            (1920, 1080, 64, 32),
            (33, 100, 100, 33),
        ] {
            let image = DynamicImage::ImageRgb8(RgbImage::new(src_w, src_h));
            let fitted = fit_cover(&image, dst_w, dst_h);
            assert_eq!(
                fitted.size(),
                (dst_w as i32, dst_h as i32),
                "source {}x{} target {}x{}",
                src_w,
                src_h,
                dst_w,
                dst_h
            );
        }
    }

    #[test]
    fn fit_crops_the_centered_window() {
        // Three 100px vertical bands; only the middle one survives a
        // 300x100 -> 100x100 fit.
        let mut img = RgbImage::new(300, 100);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = if x < 100 {
                Rgb([255, 0, 0])
            } else if x < 200 {
                Rgb([0, 255, 0])
            } else {
                Rgb([0, 0, 255])
            };
        }

        let fitted = fit_cover(&DynamicImage::ImageRgb8(img), 100, 100);
        assert_eq!(fitted.pixel(50, 50), [0, 255, 0]);
        assert_eq!(fitted.pixel(5, 50), [0, 255, 0]);
        assert_eq!(fitted.pixel(94, 50), [0, 255, 0]);
    }

    #[test]
    fn identical_calls_load_once() {
        let mut source = CountingSource::new();
        source.insert("bg", png_bytes(16, 16, [1, 2, 3]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("bg"), 64, 32);
        cache.ensure_loaded(&source, Some("bg"), 64, 32);

        assert_eq!(source.open_count(), 1);
        assert!(cache.get().is_some());
    }

    #[test]
    fn identifier_change_reloads_once() {
        let mut source = CountingSource::new();
        source.insert("a", png_bytes(16, 16, [1, 2, 3]));
        source.insert("b", png_bytes(16, 16, [4, 5, 6]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("a"), 64, 32);
        cache.ensure_loaded(&source, Some("b"), 64, 32);
        cache.ensure_loaded(&source, Some("b"), 64, 32);

        assert_eq!(source.open_count(), 2);
    }

    #[test]
    fn viewport_change_reloads_once() {
        let mut source = CountingSource::new();
        source.insert("bg", png_bytes(16, 16, [1, 2, 3]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("bg"), 64, 32);
        cache.ensure_loaded(&source, Some("bg"), 32, 64);
        cache.ensure_loaded(&source, Some("bg"), 32, 64);

        assert_eq!(source.open_count(), 2);
        assert_eq!(cache.get().unwrap().size(), (32, 64));
    }

    #[test]
    fn release_drops_the_entry() {
        let mut source = CountingSource::new();
        source.insert("bg", png_bytes(16, 16, [1, 2, 3]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("bg"), 64, 32);
        assert!(cache.get().is_some());

        cache.release();
        assert!(cache.get().is_none());

        // The next matching call has to load again
        cache.ensure_loaded(&source, Some("bg"), 64, 32);
        assert_eq!(source.open_count(), 2);
    }

    #[test]
    fn missing_identifier_releases_the_entry() {
        let mut source = CountingSource::new();
        source.insert("bg", png_bytes(16, 16, [1, 2, 3]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("bg"), 64, 32);
        assert!(cache.get().is_some());

        cache.ensure_loaded(&source, None, 64, 32);
        assert!(cache.get().is_none());
        assert_eq!(source.open_count(), 1);
    }

    #[test]
    fn unready_viewport_is_a_no_op() {
        let mut source = CountingSource::new();
        source.insert("bg", png_bytes(16, 16, [1, 2, 3]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("bg"), 0, 32);
        cache.ensure_loaded(&source, Some("bg"), 64, -1);
        assert_eq!(source.open_count(), 0);
        assert!(cache.get().is_none());

        // A loaded entry survives a temporarily unready viewport
        cache.ensure_loaded(&source, Some("bg"), 64, 32);
        cache.ensure_loaded(&source, Some("bg"), 0, 0);
        assert!(cache.get().is_some());
        assert_eq!(source.open_count(), 1);
    }

    #[test]
    fn decode_failure_leaves_the_cache_empty() {
        let mut source = CountingSource::new();
        source.insert("bad", b"not an image at all".to_vec());
        source.insert("good", png_bytes(16, 16, [1, 2, 3]));

        let mut cache = BackgroundCache::new();
        cache.ensure_loaded(&source, Some("good"), 64, 32);
        assert!(cache.get().is_some());

        cache.ensure_loaded(&source, Some("bad"), 64, 32);
        assert!(cache.get().is_none());

        cache.ensure_loaded(&source, Some("missing"), 64, 32);
        assert!(cache.get().is_none());
        assert_eq!(source.open_count(), 3);
    }

    #[test]
    fn flat_color_fallback_fills_the_frame() {
        let settings = WallpaperSettings {
            bg_color: [10, 20, 30],
            ..WallpaperSettings::default()
        };
        let ctx = test_ctx();
        let mut frame = FrameBuffer::new(8, 8);

        render_background(&mut frame, None, &ctx, &settings);
        assert_eq!(frame.pixel(0, 0), Some([10, 20, 30]));
        assert_eq!(frame.pixel(7, 7), Some([10, 20, 30]));
    }

    #[test]
    fn image_background_is_darkened_by_the_overlay() {
        let settings = WallpaperSettings::default();
        let ctx = test_ctx();
        let mut frame = FrameBuffer::new(4, 4);

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
        let fitted = fit_cover(&image, 4, 4);
        render_background(&mut frame, Some(&fitted), &ctx, &settings);

        // 255 scaled by (255 - 100) / 255
        assert_eq!(frame.pixel(2, 2), Some([155, 155, 155]));
    }

    fn test_ctx() -> RenderContext {
        RenderContext {
            display_width: 8,
            display_height: 8,
            brightness: 100,
            date: String::new(),
            time: String::new(),
            day: String::new(),
            battery_percent: 0,
            charging: false,
            timestamp: 0,
        }
    }
}
