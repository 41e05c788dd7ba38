use thiserror::Error;

#[derive(Error, Debug)]
pub enum LegendError {
    #[error("Layer name must not be empty")]
    EmptyLayer,

    #[error("Layer '{0}' declares no categories")]
    EmptyDeclaration(String),

    #[error("Category key must not be empty")]
    EmptyKey,

    #[error("Duplicate category key: {0}")]
    DuplicateKey(String),

    #[error("Invalid predicate for category '{key}': {reason}")]
    InvalidPredicate { key: String, reason: String },

    #[error("Invalid bands on '{attr}': {reason}")]
    InvalidBands { attr: String, reason: String },

    #[error("Unknown category '{key}' referenced by {context}")]
    UnknownCategory { key: String, context: &'static str },

    #[error("Invalid cascade from '{parent}': {reason}")]
    InvalidCascade { parent: String, reason: String },

    #[error("Layer '{0}' is already bound to a category filter")]
    LayerAlreadyBound(String),

    #[error("Invalid layer group '{name}': {reason}")]
    InvalidGroup { name: String, reason: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Declaration error: {0}")]
    Declaration(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LegendError>;
