use crate::config::DisplayConfig;

// Common options for both drivers
#[derive(Debug, Clone)]
pub struct MatrixOptions {
    // Basic display options
    pub rows: usize,
    pub cols: usize,
    pub chain_length: usize,
    pub parallel: usize,
    pub brightness: u8,

    // Additional options
    pub hardware_mapping: String,
    pub refresh_rate: usize,
    pub pwm_bits: u8,
    pub pwm_lsb_nanoseconds: u32,
    pub gpio_slowdown: Option<u32>,
    pub interlaced: bool,
    pub dither_bits: usize,
    pub panel_type: Option<String>,
    pub multiplexing: Option<String>,
    pub pixel_mapper: Option<String>,
    pub row_setter: String,
    pub led_sequence: String,

    // C++ binding specific options
    pub hardware_pulsing: bool,
    pub show_refresh: bool,
    pub inverse_colors: bool,
    pub limit_refresh: u32,
    pub pi_chip: Option<String>,
}

impl MatrixOptions {
    // Create from DisplayConfig; CLI/env merging already happened there.
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            chain_length: config.chain_length,
            parallel: config.parallel,
            brightness: config.led_brightness,
            hardware_mapping: config.hardware_mapping.clone(),
            refresh_rate: config.refresh_rate,
            pwm_bits: config.pwm_bits,
            pwm_lsb_nanoseconds: config.pwm_lsb_nanoseconds,
            gpio_slowdown: config.gpio_slowdown,
            interlaced: config.interlaced,
            dither_bits: config.dither_bits,
            panel_type: config.panel_type.clone(),
            multiplexing: config.multiplexing.clone(),
            pixel_mapper: config.pixel_mapper.clone(),
            row_setter: config.row_setter.clone(),
            led_sequence: config.led_sequence.clone(),
            hardware_pulsing: config.hardware_pulsing,
            show_refresh: config.show_refresh,
            inverse_colors: config.inverse_colors,
            limit_refresh: config.limit_refresh,
            pi_chip: config.pi_chip.clone(),
        }
    }
}
