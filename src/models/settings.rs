use serde::{Deserialize, Serialize};

/// User-facing wallpaper settings, persisted as one JSON document and
/// editable through the web interface.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct WallpaperSettings {
    #[serde(default = "default_text_color")]
    pub text_color: [u8; 3],

    #[serde(default = "default_bg_color")]
    pub bg_color: [u8; 3],

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_custom_text")]
    pub custom_text: String,

    #[serde(default)]
    pub offset_x: i32,

    #[serde(default)]
    pub offset_y: i32,

    /// Identifier of an uploaded background image; `None` renders the
    /// flat background color.
    #[serde(default)]
    pub background_image: Option<String>,

    #[serde(default)]
    pub scanline: bool,

    #[serde(default = "default_scanline_speed")]
    pub scanline_speed: f32,

    #[serde(default = "default_brightness")]
    pub brightness: u8,

    /// Locale for the `#date` and `#day` tokens, e.g. "en_US" or "id_ID".
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub text_shadow: bool,
}

fn default_text_color() -> [u8; 3] {
    [0, 255, 0]
}

fn default_bg_color() -> [u8; 3] {
    [0, 0, 0]
}

fn default_font_size() -> u32 {
    48
}

fn default_custom_text() -> String {
    "Hello, World!".to_string()
}

fn default_scanline_speed() -> f32 {
    40.0
}

fn default_brightness() -> u8 {
    100
}

fn default_locale() -> String {
    "en_US".to_string()
}

// Implement default manually to be explicit
impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            text_color: default_text_color(),
            bg_color: default_bg_color(),
            font_size: default_font_size(),
            custom_text: default_custom_text(),
            offset_x: 0,
            offset_y: 0,
            background_image: None,
            scanline: false,
            scanline_speed: default_scanline_speed(),
            brightness: default_brightness(),
            locale: default_locale(),
            text_shadow: false,
        }
    }
}

impl WallpaperSettings {
    /// Clamps values into their supported ranges. Applied to every settings
    /// document that enters the system (API, disk).
    pub fn sanitize(&mut self, max_brightness: u8) {
        self.brightness = self.brightness.clamp(0, 100).min(max_brightness);
        self.font_size = self.font_size.clamp(1, 512);
        if !self.scanline_speed.is_finite() || self.scanline_speed <= 0.0 {
            self.scanline_speed = default_scanline_speed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let settings: WallpaperSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, WallpaperSettings::default());
        assert_eq!(settings.text_color, [0, 255, 0]);
        assert_eq!(settings.bg_color, [0, 0, 0]);
        assert_eq!(settings.font_size, 48);
        assert_eq!(settings.custom_text, "Hello, World!");
        assert_eq!(settings.offset_x, 0);
        assert_eq!(settings.offset_y, 0);
        assert_eq!(settings.background_image, None);
        assert!(!settings.scanline);
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let settings: WallpaperSettings =
            serde_json::from_str(r##"{"custom_text": "#time", "offset_y": -4}"##).unwrap();
        assert_eq!(settings.custom_text, "#time");
        assert_eq!(settings.offset_y, -4);
        assert_eq!(settings.font_size, 48);
    }

    #[test]
    fn roundtrips_through_json() {
        let mut settings = WallpaperSettings::default();
        settings.custom_text = "#day\n@Status: Online".to_string();
        settings.background_image = Some("a1b2".to_string());
        settings.scanline = true;

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: WallpaperSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut settings = WallpaperSettings {
            brightness: 255,
            font_size: 0,
            scanline_speed: -3.0,
            ..WallpaperSettings::default()
        };
        settings.sanitize(80);

        assert_eq!(settings.brightness, 80);
        assert_eq!(settings.font_size, 1);
        assert_eq!(settings.scanline_speed, 40.0);

        let mut settings = WallpaperSettings {
            font_size: 100_000,
            ..WallpaperSettings::default()
        };
        settings.sanitize(100);
        assert_eq!(settings.font_size, 512);
    }
}
