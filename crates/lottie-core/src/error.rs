use thiserror::Error;

use crate::property::ValueKind;

#[derive(Error, Debug)]
pub enum LottieError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Keypath not found: {0}")]
    KeypathNotFound(String),
    #[error("Value kind mismatch at {keypath}: expected {expected:?}, got {found:?}")]
    TypeMismatch {
        keypath: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("Asset not found: {0}")]
    MissingAsset(String),
}

pub type LottieResult<T> = Result<T, LottieError>;
