//! Daemon configuration assembled from CLI arguments and `LED_*`
//! environment variables.

mod cli;
mod display;
mod env;

pub use cli::CliArgs;
pub use display::DisplayConfig;
pub use env::{load_env_vars, EnvVars};

/// Build the display configuration from every source. Environment
/// variables take precedence over CLI arguments.
pub fn init_config() -> DisplayConfig {
    let cli_args = CliArgs::parse();
    let env_vars = load_env_vars();

    DisplayConfig::new(cli_args, env_vars)
}
