use crate::config::DisplayConfig;
use crate::display::driver::{LedCanvas, LedDriver};
use crate::display::graphics::framebuffer::FrameBuffer;
use crate::display::renderer::{
    render_background, render_cursor, render_text, BackgroundCache, ImageSource, RenderContext,
    ScanlineRenderer,
};
use crate::models::WallpaperSettings;
use crate::power::BatteryProbe;
use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Structure to manage LED matrix state
pub struct WallpaperManager {
    driver: Box<dyn LedDriver>,
    canvas: Option<Box<dyn LedCanvas>>,
    pub display_width: i32,
    pub display_height: i32,
    frame: FrameBuffer,
    settings: WallpaperSettings,
    preview_settings: Option<WallpaperSettings>,
    preview_session_id: Option<String>,
    last_preview_ping: Instant,
    render_context: RenderContext,
    background: BackgroundCache,
    image_source: Arc<dyn ImageSource>,
    scanline: ScanlineRenderer,
    battery: BatteryProbe,
    max_brightness: u8,
}

impl WallpaperManager {
    pub fn with_config_and_driver(
        config: &DisplayConfig,
        driver: Box<dyn LedDriver>,
        settings: WallpaperSettings,
        image_source: Arc<dyn ImageSource>,
    ) -> Self {
        let display_width = config.display_width();
        let display_height = config.display_height();

        info!(
            "Initializing display: {}x{} (rows={}, cols={}, chain={}, parallel={})",
            display_width,
            display_height,
            config.rows,
            config.cols,
            config.chain_length,
            config.parallel
        );

        Self::new(
            driver,
            display_width,
            display_height,
            config.limit_max_brightness,
            settings,
            image_source,
        )
    }

    pub fn new(
        driver: Box<dyn LedDriver>,
        display_width: i32,
        display_height: i32,
        max_brightness: u8,
        mut settings: WallpaperSettings,
        image_source: Arc<dyn ImageSource>,
    ) -> Self {
        settings.sanitize(max_brightness);

        // Get the canvas from the driver
        let mut driver_box = driver;
        let canvas = driver_box.take_canvas();

        let battery = BatteryProbe::new();
        let render_context = RenderContext::capture(
            display_width,
            display_height,
            settings.brightness,
            &settings.locale,
            battery.read(),
        );

        let mut manager = Self {
            driver: driver_box,
            canvas,
            display_width,
            display_height,
            frame: FrameBuffer::new(display_width, display_height),
            settings,
            preview_settings: None,
            preview_session_id: None,
            last_preview_ping: Instant::now(),
            render_context,
            background: BackgroundCache::new(),
            image_source,
            scanline: ScanlineRenderer::new(),
            battery,
            max_brightness,
        };

        manager.refresh_background();
        manager
    }

    /// The persisted settings, ignoring any active preview.
    pub fn settings(&self) -> &WallpaperSettings {
        &self.settings
    }

    /// The settings the display is currently rendering. A preview takes
    /// precedence over the persisted settings while it is active.
    pub fn effective_settings(&self) -> &WallpaperSettings {
        self.preview_settings.as_ref().unwrap_or(&self.settings)
    }

    pub fn apply_settings(&mut self, mut settings: WallpaperSettings) {
        settings.sanitize(self.max_brightness);
        self.settings = settings;
        self.refresh_context();
        self.refresh_background();
    }

    /// Refresh the per-tick snapshot: clock fields and battery state.
    pub fn tick_state(&mut self) {
        self.refresh_context();
        self.refresh_background();
    }

    /// Advance time-based animation state.
    pub fn advance(&mut self, dt: f32) {
        let settings = self.effective_settings().clone();
        self.scanline.update(dt, self.display_height, &settings);
    }

    /// How long to wait between frames for the current mode.
    pub fn frame_interval(&self) -> Duration {
        if self.effective_settings().scanline {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(1000)
        }
    }

    /// Compose a full frame and push it to the panel.
    pub fn render_frame(&mut self) {
        if self.display_width <= 0 || self.display_height <= 0 {
            return;
        }

        let canvas = match self.canvas.take() {
            Some(canvas) => canvas,
            None => return,
        };

        let settings = self.effective_settings().clone();
        let ctx = self.render_context.clone();

        render_background(&mut self.frame, self.background.get(), &ctx, &settings);
        let anchor = render_text(&mut self.frame, &ctx, &settings);
        self.scanline.render(&mut self.frame, &ctx, &settings);
        render_cursor(&mut self.frame, &ctx, &settings, anchor);

        let mut canvas = canvas;
        self.frame.blit_to(canvas.as_mut());

        // Update the canvas using the driver
        let updated_canvas = self.driver.update_canvas(canvas);
        self.canvas = Some(updated_canvas);
    }

    /// Push a black frame to the panel without touching the settings.
    pub fn blank_display(&mut self) {
        if let Some(mut canvas) = self.canvas.take() {
            canvas.fill(0, 0, 0);
            let updated_canvas = self.driver.update_canvas(canvas);
            self.canvas = Some(updated_canvas);
        }
    }

    pub fn shutdown(&mut self) {
        info!("Shutting down display manager");
        self.blank_display();
        self.background.release();
        self.driver.shutdown();
    }

    // Handle settings preview with animation state preservation
    pub fn enter_preview_mode(&mut self, mut settings: WallpaperSettings, session_id: String) {
        settings.sanitize(self.max_brightness);

        if self.preview_settings.is_none() {
            info!("Entering preview mode with session_id: {}", session_id);
        }

        self.preview_settings = Some(settings);
        self.preview_session_id = Some(session_id);
        self.last_preview_ping = Instant::now();
        self.refresh_context();
        self.refresh_background();
    }

    // Method to update preview content without changing the session ID
    pub fn update_preview_settings(&mut self, mut settings: WallpaperSettings) {
        if self.preview_settings.is_none() {
            return;
        }

        settings.sanitize(self.max_brightness);
        self.preview_settings = Some(settings);
        self.last_preview_ping = Instant::now();
        self.refresh_context();
        self.refresh_background();
    }

    // Check if preview mode has timed out from inactivity
    pub fn check_preview_timeout(&mut self, timeout_seconds: u64) -> Option<String> {
        if self.preview_settings.is_some() {
            let elapsed = self.last_preview_ping.elapsed().as_secs();
            if elapsed > timeout_seconds {
                info!(
                    "Preview mode timed out after {} seconds of inactivity",
                    elapsed
                );
                // Store session ID before exiting preview mode
                let session_id = self.preview_session_id.clone();
                self.exit_preview_mode();
                return session_id;
            }
        }
        None
    }

    // Check if preview mode is currently active
    pub fn is_in_preview_mode(&self) -> bool {
        self.preview_settings.is_some()
    }

    // Update the ping time and return whether the operation was successful
    pub fn update_preview_ping(&mut self) -> bool {
        if self.preview_settings.is_some() {
            self.last_preview_ping = Instant::now();
            true
        } else {
            false
        }
    }

    // Check if a session owns the preview
    pub fn is_preview_session_owner(&self, session_id: &str) -> bool {
        if self.preview_settings.is_none() {
            return false;
        }

        self.preview_session_id
            .as_ref()
            .map_or(false, |id| id == session_id)
    }

    pub fn exit_preview_mode(&mut self) {
        if self.preview_settings.is_some() {
            info!(
                "Exiting preview mode for session_id: {}",
                self.preview_session_id.clone().unwrap_or_default()
            );
            self.preview_settings = None;
            self.preview_session_id = None;
            self.refresh_context();
            self.refresh_background();
        }
    }

    fn refresh_context(&mut self) {
        let effective = self.effective_settings();
        let brightness = effective.brightness;
        let locale = effective.locale.clone();

        self.render_context = RenderContext::capture(
            self.display_width,
            self.display_height,
            brightness,
            &locale,
            self.battery.read(),
        );
    }

    fn refresh_background(&mut self) {
        let image_id = self.effective_settings().background_image.clone();
        self.background.ensure_loaded(
            self.image_source.as_ref(),
            image_id.as_deref(),
            self.display_width,
            self.display_height,
        );
    }
}
