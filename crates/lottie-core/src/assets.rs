//! Providers for the resources a document refers to but does not contain.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use lottie_data::model::Asset;
use tracing::warn;

/// An image asset resolved for the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedImage {
    pub data: Option<Vec<u8>>,
    pub path: Option<String>,
}

pub trait ImageProvider: Send {
    fn image(&self, asset: &Asset) -> Option<ResolvedImage>;
}

pub trait TextMeasurer: Send {
    /// Returns the advance width of `text` for the given font and size.
    fn measure(&self, text: &str, font_family: &str, size: f32) -> f32;
}

pub trait TextProvider: Send {
    /// Replacement text for the text layer at `keypath`.
    fn text(&self, keypath: &str, source: &str) -> String;
}

/// Decodes embedded `data:` URIs and passes any other location through.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageProvider;

impl ImageProvider for DefaultImageProvider {
    fn image(&self, asset: &Asset) -> Option<ResolvedImage> {
        let p = asset.p.as_deref()?;
        if let Some(encoded) = p.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
            return match BASE64_STANDARD.decode(encoded.1) {
                Ok(bytes) => Some(ResolvedImage { data: Some(bytes), path: None }),
                Err(err) => {
                    warn!(asset = %asset.id, "failed to decode embedded image: {err}");
                    None
                }
            };
        }
        let path = match asset.u.as_deref() {
            Some(dir) if !dir.is_empty() => format!("{dir}{p}"),
            _ => p.to_string(),
        };
        Some(ResolvedImage { data: None, path: Some(path) })
    }
}

/// Every character advances by a fixed fraction of the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMeasurer {
    pub advance_ratio: f32,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, _font_family: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * self.advance_ratio
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SourceTextProvider;

impl TextProvider for SourceTextProvider {
    fn text(&self, _keypath: &str, source: &str) -> String {
        source.to_string()
    }
}

/// The providers an animation consults while assembling a frame.
pub struct Providers {
    pub images: Box<dyn ImageProvider>,
    pub measurer: Box<dyn TextMeasurer>,
    pub text: Box<dyn TextProvider>,
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            images: Box::new(DefaultImageProvider),
            measurer: Box::new(FixedAdvanceMeasurer::default()),
            text: Box::new(SourceTextProvider),
        }
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}
