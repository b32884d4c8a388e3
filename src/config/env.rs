//! Environment variable handling

/// Environment variables for LED matrix configuration
#[derive(Debug, Default, Clone)]
pub struct EnvVars {
    pub driver: Option<String>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub chain_length: Option<usize>,
    pub parallel: Option<usize>,
    pub hardware_mapping: Option<String>,
    pub refresh_rate: Option<usize>,
    pub gpio_slowdown: Option<u32>,
    pub pwm_bits: Option<u8>,
    pub pwm_lsb_nanoseconds: Option<u32>,
    pub pixel_mapper: Option<String>,
    pub multiplexing: Option<String>,
    pub pi_chip: Option<String>,
    pub interlaced: Option<bool>,
    pub dither_bits: Option<usize>,
    pub panel_type: Option<String>,
    pub row_setter: Option<String>,
    pub led_sequence: Option<String>,
    pub hardware_pulsing: Option<bool>,
    pub show_refresh: Option<bool>,
    pub inverse_colors: Option<bool>,
    pub limit_refresh: Option<u32>,
    pub limit_max_brightness: Option<u8>,
    pub storage_dir: Option<String>,
    pub port: Option<u16>,
    pub interface: Option<String>,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

// Accepts "true"/"false" as well as numeric 0/1.
fn parse_bool_var(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    if let Ok(enabled) = value.parse::<bool>() {
        Some(enabled)
    } else if let Ok(enabled) = value.parse::<u8>() {
        Some(enabled != 0)
    } else {
        None
    }
}

/// Load configuration from environment variables
pub fn load_env_vars() -> EnvVars {
    EnvVars {
        driver: std::env::var("LED_DRIVER").ok(),
        rows: parse_var("LED_ROWS"),
        cols: parse_var("LED_COLS"),
        chain_length: parse_var("LED_CHAIN_LENGTH"),
        parallel: parse_var("LED_PARALLEL"),
        hardware_mapping: std::env::var("LED_HARDWARE_MAPPING").ok(),
        refresh_rate: parse_var("LED_REFRESH_RATE"),
        gpio_slowdown: parse_var("LED_GPIO_SLOWDOWN"),
        pwm_bits: parse_var("LED_PWM_BITS"),
        pwm_lsb_nanoseconds: parse_var("LED_PWM_LSB_NANOSECONDS"),
        pixel_mapper: std::env::var("LED_PIXEL_MAPPER").ok(),
        multiplexing: std::env::var("LED_MULTIPLEXING").ok(),
        pi_chip: std::env::var("LED_PI_CHIP").ok(),
        interlaced: parse_bool_var("LED_INTERLACED"),
        dither_bits: parse_var("LED_DITHER_BITS"),
        panel_type: std::env::var("LED_PANEL_TYPE").ok(),
        row_setter: std::env::var("LED_ROW_SETTER").ok(),
        led_sequence: std::env::var("LED_SEQUENCE").ok(),
        hardware_pulsing: parse_bool_var("LED_HARDWARE_PULSING"),
        show_refresh: parse_bool_var("LED_SHOW_REFRESH"),
        inverse_colors: parse_bool_var("LED_INVERSE_COLORS"),
        limit_refresh: parse_var("LED_LIMIT_REFRESH"),
        limit_max_brightness: parse_var::<u8>("LED_LIMIT_MAX_BRIGHTNESS").map(|v| v.clamp(0, 100)),
        storage_dir: std::env::var("LED_STORAGE_DIR").ok(),
        port: parse_var("LED_PORT"),
        interface: std::env::var("LED_INTERFACE").ok(),
    }
}
