pub mod api;
pub mod static_assets;
