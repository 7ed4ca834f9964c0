//! Frame-by-frame evaluation of Lottie documents.
//!
//! A document is built once into a graph of animator nodes; each frame is
//! then brought up to date incrementally and read out as a [`RenderTree`]
//! for an external renderer to draw.
//!
//! ```no_run
//! use lottie_core::{Animation, EngineConfig, Providers};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("animation.json")?;
//! let mut animation = Animation::from_json(&json, EngineConfig::default(), Providers::default())?;
//! animation.update(12.0, false);
//! let tree = animation.scene();
//! println!("{} nodes", tree.node_count());
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod animator;
pub mod assets;
pub mod composition;
pub mod config;
pub mod error;
pub mod geometry;
pub mod keyframes;
pub mod keypath;
pub mod player;
pub mod property;
pub mod render;

pub use animation::Animation;
pub use assets::{
    DefaultImageProvider, FixedAdvanceMeasurer, ImageProvider, Providers, ResolvedImage, SourceTextProvider,
    TextMeasurer, TextProvider,
};
pub use config::EngineConfig;
pub use error::{LottieError, LottieResult};
pub use keypath::Keypath;
pub use player::LottiePlayer;
pub use property::{AnyValue, ValueKind};
pub use render::*;
