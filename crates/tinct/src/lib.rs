//! Tinct — native color management.
//!
//! Loads an immutable configuration document describing color spaces,
//! displays, views, and role bindings, resolves named endpoints into
//! compiled transform pipelines, and applies those pipelines to RGB
//! pixel data. Build a [`Config`] once, build a [`Processor`] per
//! endpoint pair, and call its CPU form per pixel or per tile.

mod config;
mod error;
mod pipeline;
mod processor;

pub mod primaries;
pub mod transfer;

pub use config::{Config, SCENE_LINEAR};
pub use error::{Error, NameKind};
pub use primaries::Primaries;
pub use processor::{CpuProcessor, Processor};
pub use transfer::Transfer;
