//! Pagoda render-engine client crate.
//!
//! This crate contains everything the web front door needs to talk to the
//! page renderer: the engine configuration record (`config`), the engine
//! itself with page rendering and asset loading (`engine`), and the
//! props-schema to TypeScript declaration generator (`typegen`). These
//! modules are intentionally minimal and focus on the needs of the pagoda
//! server rather than being general-purpose libraries.
//!
/// Engine configuration record and validation
pub mod config;
/// Engine construction, page rendering and asset loading
pub mod engine;
/// Props schema to TypeScript declaration generator
pub mod typegen;

pub use config::EngineConfig;
pub use engine::{Asset, Engine, RenderEngine, RenderRequest};
