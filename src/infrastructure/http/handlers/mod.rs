//! HTTP Handlers

mod health;
mod synthesize;

pub use health::*;
pub use synthesize::*;
