use chrono::{DateTime, Local, Locale};
use log::debug;

use crate::power::BatteryStatus;

/// Per-tick snapshot shared by all renderers.
///
/// Captured once per state tick so every layer of a frame sees the same
/// clock and battery values.
#[derive(Clone)]
pub struct RenderContext {
    /// Display width in pixels
    pub display_width: i32,

    /// Display height in pixels
    pub display_height: i32,

    /// User-defined brightness (0-100)
    pub brightness: u8,

    /// Localized "day month year", e.g. "22 Aug 2025"
    pub date: String,

    /// "hour:minute:second", e.g. "10:20:30"
    pub time: String,

    /// Localized weekday name, e.g. "Friday"
    pub day: String,

    /// Battery charge percentage (0 when no battery is present)
    pub battery_percent: u8,

    /// Whether a battery is charging or full
    pub charging: bool,

    /// Unix timestamp of the snapshot
    pub timestamp: i64,
}

impl RenderContext {
    /// Capture a snapshot at the current wall-clock time.
    pub fn capture(
        display_width: i32,
        display_height: i32,
        brightness: u8,
        locale: &str,
        battery: BatteryStatus,
    ) -> Self {
        Self::at(Local::now(), display_width, display_height, brightness, locale, battery)
    }

    /// Capture a snapshot at a fixed time.
    pub fn at(
        now: DateTime<Local>,
        display_width: i32,
        display_height: i32,
        brightness: u8,
        locale: &str,
        battery: BatteryStatus,
    ) -> Self {
        let locale = Locale::try_from(locale).unwrap_or_else(|_| {
            debug!("Unknown locale '{}', falling back to POSIX", locale);
            Locale::POSIX
        });

        Self {
            display_width,
            display_height,
            brightness,
            date: now.format_localized("%d %b %Y", locale).to_string(),
            time: now.format("%H:%M:%S").to_string(),
            day: now.format_localized("%A", locale).to_string(),
            battery_percent: battery.percent,
            charging: battery.charging,
            timestamp: now.timestamp(),
        }
    }

    /// Apply brightness scaling to a color
    pub fn apply_brightness(&self, color: [u8; 3]) -> [u8; 3] {
        let brightness_scale = self.brightness as f32 / 100.0;
        [
            (color[0] as f32 * brightness_scale) as u8,
            (color[1] as f32 * brightness_scale) as u8,
            (color[2] as f32 * brightness_scale) as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn battery(percent: u8, charging: bool) -> BatteryStatus {
        BatteryStatus { percent, charging }
    }

    #[test]
    fn snapshot_formats_clock_fields() {
        let now = Local.with_ymd_and_hms(2024, 5, 5, 13, 4, 5).unwrap();
        let ctx = RenderContext::at(now, 64, 32, 100, "en_US", battery(73, false));

        assert_eq!(ctx.date, "05 May 2024");
        assert_eq!(ctx.time, "13:04:05");
        assert_eq!(ctx.day, "Sunday");
        assert_eq!(ctx.timestamp, now.timestamp());
    }

    #[test]
    fn unknown_locale_falls_back_to_posix() {
        let now = Local.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
        let ctx = RenderContext::at(now, 64, 32, 100, "not_a_locale", battery(0, false));

        assert_eq!(ctx.day, "Monday");
    }

    #[test]
    fn localized_weekday_names() {
        let now = Local.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
        let ctx = RenderContext::at(now, 64, 32, 100, "de_DE", battery(0, false));

        assert_eq!(ctx.day, "Montag");
    }

    #[test]
    fn apply_brightness_scales_colors() {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = RenderContext::at(now, 64, 32, 50, "en_US", battery(0, false));

        assert_eq!(ctx.apply_brightness([200, 100, 0]), [100, 50, 0]);

        ctx.brightness = 100;
        assert_eq!(ctx.apply_brightness([200, 100, 0]), [200, 100, 0]);

        ctx.brightness = 0;
        assert_eq!(ctx.apply_brightness([200, 100, 0]), [0, 0, 0]);
    }
}
