//! Configuration record for the render engine.
//!
//! The engine is configured once at startup from a handful of filesystem
//! paths plus the URL prefix assets are served under. `validate` is called
//! by `Engine::new` before anything touches the disk, so a broken
//! configuration surfaces as a single startup error instead of a half
//! constructed engine.
//!
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Static configuration the render engine is built from
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// URL prefix frontend assets are served under, e.g. `/assets`
    pub asset_route: String,
    /// Directory holding the frontend sources (pages and assets)
    pub frontend_dir: PathBuf,
    /// Output path for the generated TypeScript declaration file
    pub generated_types_path: PathBuf,
    /// Rust source file declaring the page props structs
    pub props_schema_path: PathBuf,
    /// Optional Tailwind config consumed by the frontend build
    pub tailwind_config_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Check every field before the engine is constructed
    pub fn validate(&self) -> Result<()> {
        if !self.asset_route.starts_with('/') {
            bail!("asset route {:?} must start with '/'", self.asset_route);
        }
        if self.asset_route.len() == 1 || self.asset_route.ends_with('/') {
            bail!("asset route {:?} must be a non-root prefix without a trailing '/'", self.asset_route);
        }
        if !self.frontend_dir.is_dir() {
            bail!("frontend dir {} does not exist or is not a directory", self.frontend_dir.display());
        }
        if !self.props_schema_path.is_file() {
            bail!("props schema {} does not exist", self.props_schema_path.display());
        }
        if let Some(tailwind) = &self.tailwind_config_path {
            if !tailwind.is_file() {
                bail!("tailwind config {} does not exist", tailwind.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn valid_config(tag: &str) -> EngineConfig {
        let root = std::env::temp_dir().join(format!("pagoda-cfg-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("frontend")).unwrap();
        fs::write(root.join("props.rs"), "pub struct P {\n    pub n: i32,\n}\n").unwrap();
        EngineConfig {
            asset_route: "/assets".to_string(),
            frontend_dir: root.join("frontend"),
            generated_types_path: root.join("generated.d.ts"),
            props_schema_path: root.join("props.rs"),
            tailwind_config_path: None,
        }
    }

    #[test]
    fn accepts_a_complete_config() {
        assert!(valid_config("ok").validate().is_ok());
    }

    #[test]
    fn rejects_missing_frontend_dir() {
        let mut config = valid_config("dir");
        config.frontend_dir = PathBuf::from("/no/such/frontend");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_missing_props_schema() {
        let mut config = valid_config("schema");
        config.props_schema_path = PathBuf::from("/no/such/props.rs");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_asset_routes() {
        for route in ["assets", "/", "/assets/"] {
            let mut config = valid_config("route");
            config.asset_route = route.to_string();
            assert!(config.validate().is_err(), "route {:?} should be rejected", route);
        }
    }

    #[test]
    fn rejects_missing_tailwind_config_when_set() {
        let mut config = valid_config("tailwind");
        config.tailwind_config_path = Some(PathBuf::from("/no/such/tailwind.config.js"));
        assert!(config.validate().is_err());
    }
}
