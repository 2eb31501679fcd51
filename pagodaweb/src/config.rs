//! Configuration loader and defaults for the pagoda web server.
//!
//! Exposes a lazily-initialized `CONFIG` which reads values from environment
//! variables (with sensible defaults). Fields cover the listen port, the
//! frontend paths the render engine is built from, and the target of the
//! startup connectivity probe.
//!
use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use pagodarender::EngineConfig;

/// Default HTTP listen port
const DEFAULT_PORT: u16 = 8080;
/// Default frontend source directory
const DEFAULT_FRONTEND_DIR: &str = "./frontend";
/// Default URL prefix for frontend assets
const DEFAULT_ASSET_ROUTE: &str = "/assets";
/// Default output path for the generated TypeScript declarations
const DEFAULT_GENERATED_TYPES: &str = "./frontend/generated.d.ts";
/// Default props schema source, the structs in `props.rs`
const DEFAULT_PROPS_SCHEMA: &str = "./pagodaweb/src/props.rs";
/// Default connectivity probe target
const DEFAULT_PROBE_URL: &str = "https://google.com";

/// Application configuration, read once at startup
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    /// Frontend source directory
    pub frontend_dir: PathBuf,
    /// URL prefix frontend assets are served under
    pub asset_route: String,
    /// Output path for the generated TypeScript declarations
    pub generated_types_path: PathBuf,
    /// Rust source file declaring the page props structs
    pub props_schema_path: PathBuf,
    /// Optional Tailwind config forwarded to the engine
    pub tailwind_config_path: Option<PathBuf>,
    /// Target of the startup connectivity probe
    pub probe_url: String,
}

/// Global application configuration instance, lazily initialized
pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    let path_or = |name: &str, default: &str| -> PathBuf {
        PathBuf::from(env::var(name).unwrap_or_else(|_| default.into()))
    };

    Config {
        port: env::var("PAGODA_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT),
        frontend_dir: path_or("PAGODA_FRONTEND_DIR", DEFAULT_FRONTEND_DIR),
        asset_route: env::var("PAGODA_ASSET_ROUTE").unwrap_or_else(|_| DEFAULT_ASSET_ROUTE.into()),
        generated_types_path: path_or("PAGODA_GENERATED_TYPES", DEFAULT_GENERATED_TYPES),
        props_schema_path: path_or("PAGODA_PROPS_SCHEMA", DEFAULT_PROPS_SCHEMA),
        tailwind_config_path: env::var("PAGODA_TAILWIND_CONFIG").ok().map(PathBuf::from),
        probe_url: env::var("PAGODA_PROBE_URL").unwrap_or_else(|_| DEFAULT_PROBE_URL.into()),
    }
});

impl Config {
    /// Assemble the engine configuration from the loaded settings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            asset_route: self.asset_route.clone(),
            frontend_dir: self.frontend_dir.clone(),
            generated_types_path: self.generated_types_path.clone(),
            props_schema_path: self.props_schema_path.clone(),
            tailwind_config_path: self.tailwind_config_path.clone(),
        }
    }
}
