//! Outfit generator - styles a clothing item onto a self-portrait
//!
//! Encodes two uploaded images, assembles an occasion-themed instruction,
//! asks a generative image model for a composite look, and normalizes the
//! reply into an image plus a shoppable outfit description.

pub mod ai;
pub mod assembler;
pub mod codec;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod state;

pub use error::{Error, FailureKind, Result};
