use rust_embed::RustEmbed;

/// Web interface files baked into the binary, so the daemon ships as a
/// single executable with no files to install next to it.
#[derive(RustEmbed)]
#[folder = "web_ui/"]
pub struct StaticAssets;
