mod config;
mod display;
mod models;
mod power;
mod storage;
mod utils;
mod web;

use crate::display::driver::create_driver;
use crate::display::manager::WallpaperManager;
use crate::display::update_loop::UpdateLoop;
use crate::models::WallpaperSettings;
use crate::storage::app_storage::create_storage;
use crate::utils::privilege::{check_root_privileges, drop_privileges};
use crate::web::api::display::{get_display_info, set_display_power};
use crate::web::api::events::{editor_lock_events, settings_events, EventState};
use crate::web::api::images::{fetch_image, upload_image, MAX_IMAGE_BYTES};
use crate::web::api::preview::{
    check_session_owner, exit_preview_mode, get_preview_mode_status, ping_preview_mode,
    start_preview_mode, update_preview,
};
use crate::web::api::settings::{get_settings, update_settings};
use crate::web::api::CombinedState;
use crate::web::static_assets::{index_handler, static_assets_handler};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Local;
use colored::*;
use config::init_config;
use env_logger::Builder;
use log::{debug, error, info, warn, LevelFilter};
use std::io::Write;
use std::sync::Mutex;
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() {
    // Initialize the logger with a custom format that includes timestamps and colors
    Builder::new()
        .format(|buf, record| {
            // Color based on log level
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red().bold(),
                log::Level::Warn => record.level().to_string().yellow().bold(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().purple(),
            };

            // Apply appropriate colors to the message based on level
            let message = match record.level() {
                log::Level::Error => record.args().to_string().red(),
                log::Level::Warn => record.args().to_string().yellow(),
                log::Level::Info => record.args().to_string().normal(),
                log::Level::Debug => record.args().to_string().blue(),
                log::Level::Trace => record.args().to_string().purple(),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                level,
                message
            )
        })
        .filter(None, LevelFilter::Info) // Set default log level to Info
        .parse_env("RUST_LOG") // Allow overriding with RUST_LOG environment variable
        .init();

    info!("Starting LED Terminal Wallpaper");

    // Check for root privileges before doing anything else
    if let Err(e) = check_root_privileges() {
        error!("{}", e);
        std::process::exit(1);
    }

    // Set higher priority for the process if possible
    #[cfg(target_os = "linux")]
    unsafe {
        // Set nice level to -20
        libc::nice(-20);
        debug!("Set process priority to -20");

        // Set real-time scheduling with high priority
        let pid = libc::getpid();
        let sched_param = libc::sched_param { sched_priority: 99 };
        if libc::sched_setscheduler(pid, libc::SCHED_FIFO, &sched_param) != 0 {
            let err = std::io::Error::last_os_error();
            warn!("Failed to set real-time scheduling: {}", err);
        } else {
            debug!("Set real-time scheduling policy with priority 99");
        }
    }

    // Initialize configuration
    let display_config = init_config();

    // Validate configuration
    if let Err(errors) = display_config.validate() {
        for error in errors {
            error!("{}", error);
        }
        std::process::exit(1);
    }

    // Storage is set up while still root so the system directory gets the
    // right ownership before privileges go away
    let storage = create_storage(display_config.storage_dir.clone());

    // Create the driver - this might drop privileges
    info!("Initializing LED matrix driver (requires elevated privileges)");
    let driver = match create_driver(&display_config) {
        Ok(driver) => driver,
        Err(e) => {
            error!("Failed to initialize LED matrix driver: {}", e);
            std::process::exit(1);
        }
    };

    // Now drop privileges explicitly if the driver didn't do it
    #[cfg(target_os = "linux")]
    {
        if let Err(e) = drop_privileges() {
            error!("Failed to drop privileges: {}", e);
        }
    }

    // Initialize the wallpaper manager with persisted settings, if any
    let display = {
        let settings = storage.load_settings().unwrap_or_else(|| {
            info!("No saved settings found, using defaults");
            WallpaperSettings::default()
        });

        Arc::new(tokio::sync::Mutex::new(
            WallpaperManager::with_config_and_driver(
                &display_config,
                driver,
                settings,
                storage.clone(),
            ),
        ))
    };

    // Create SSE state manager and the render loop handle
    let sse_state = EventState::new();
    let update_loop = Arc::new(Mutex::new(UpdateLoop::new()));

    // Set up signal handlers for clean shutdown
    let display_for_shutdown = display.clone();
    let update_loop_for_shutdown = update_loop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received termination signal, shutting down...");

        if let Ok(mut update_loop_guard) = update_loop_for_shutdown.lock() {
            update_loop_guard.stop();
        }

        // Try to get a lock on the display and shut it down
        // Using try_lock to avoid deadlocks since we're in a signal handler
        if let Ok(mut display_guard) = display_for_shutdown.try_lock() {
            // Clear the display before shutting down
            display_guard.shutdown();
        } else {
            println!("Could not acquire display lock for shutdown - display might not be properly cleared");
        }

        std::process::exit(0);
    }) {
        error!("Error setting Ctrl-C handler: {}", e);
    }

    // Start rendering
    update_loop
        .lock()
        .unwrap()
        .start(display.clone(), sse_state.clone());

    // Create the combined state
    let combined_state: CombinedState = (
        (display.clone(), storage.clone()),
        sse_state.clone(),
        update_loop.clone(),
    );

    // API routes with shared storage
    let api_routes = Router::new()
        // Wallpaper settings endpoints
        .route("/api/settings", get(get_settings))
        .route("/api/settings", put(update_settings))
        // Background image endpoints
        .route("/api/images", post(upload_image))
        .route("/api/images/:id", get(fetch_image))
        // Display info and power endpoints
        .route("/api/display/info", get(get_display_info))
        .route("/api/display/power", put(set_display_power))
        // SSE endpoints
        .route("/api/events/settings", get(settings_events))
        .route("/api/events/editor", get(editor_lock_events))
        // Preview mode endpoints
        .route("/api/preview", post(start_preview_mode))
        .route("/api/preview", put(update_preview))
        .route("/api/preview", delete(exit_preview_mode))
        .route("/api/preview/status", get(get_preview_mode_status))
        .route("/api/preview/ping", post(ping_preview_mode))
        .route("/api/preview/session", post(check_session_owner))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(combined_state);

    // Embedded settings page
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/static/*path", get(static_assets_handler))
        .merge(api_routes);

    let ip_addr = display_config
        .interface
        .parse::<std::net::IpAddr>()
        .expect("Invalid network interface address");

    let addr = SocketAddr::from((ip_addr, display_config.port));

    info!("Server running on http://{}", addr);

    if let Err(e) = axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to bind to address {}: {}", addr, e);
                std::process::exit(1);
            }),
        app,
    )
    .await
    {
        error!("Server error: {}", e);
    }

    info!("Application exiting, cleaning up display...");
    update_loop.lock().unwrap().stop();
    let mut display_guard = display.lock().await;
    display_guard.shutdown();
}
