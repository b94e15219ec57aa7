//! Banana Canvas - batch image generation for social media content
//!
//! Takes a prompt plus a style preset and aspect ratio, asks Gemini for several
//! variations in parallel, and keeps the successful images in an in-memory gallery
//! that can be exported to disk.

pub mod ai;
pub mod app;
pub mod batch;
pub mod credentials;
pub mod error;
pub mod export;
pub mod gallery;
pub mod models;
pub mod presets;

pub use error::{Error, Result};
