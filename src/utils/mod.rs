pub mod privilege;
pub mod static_assets;
pub mod uuid;
