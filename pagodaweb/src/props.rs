//! Page props handed to the render engine.
//!
//! This file doubles as the props schema the engine generates TypeScript
//! declarations from at startup, so the structs here stay flat records of
//! `pub` fields.
//!
use rand::Rng;
use serde::Serialize;

/// Props for the index page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRouteProps {
    /// Starting value for the page counter
    pub initial_count: i32,
}

impl IndexRouteProps {
    /// Fresh props with a pseudo-random count in [0, 100)
    pub fn sample() -> Self {
        Self {
            initial_count: rand::rng().random_range(0..100),
        }
    }
}
