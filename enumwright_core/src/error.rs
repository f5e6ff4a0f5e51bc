use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumwrightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidConfigValue { key: String, value: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(#[from] UnsupportedConfigurationError),

    #[error("Generated output is out of date: {path}")]
    StaleOutput { path: PathBuf },
}

/// Structural invariant violations found before any emission happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate enum name `{enum_name}`")]
    DuplicateEnumName { enum_name: String },

    #[error("duplicate entry name `{entry}` in enum `{enum_name}`")]
    DuplicateEntryName { enum_name: String, entry: String },

    #[error("enum `{enum_name}` has no entries")]
    EmptyEnum { enum_name: String },

    #[error("flags enum `{enum_name}` entry `{entry}` has negative value {value}")]
    NegativeFlagValue {
        enum_name: String,
        entry: String,
        value: i128,
    },

    #[error(
        "flags enum `{enum_name}` entry `{entry}` repeats value {value} already used by `{first}`"
    )]
    DuplicateFlagValue {
        enum_name: String,
        entry: String,
        first: String,
        value: i128,
    },

    #[error("flags enum `{enum_name}` entry `{entry}` value {value:#x} sets more than one bit")]
    MultiBitFlagValue {
        enum_name: String,
        entry: String,
        value: i128,
    },

    #[error(
        "enum `{enum_name}` entry `{entry}` value {value} does not fit storage type `{size_type}`"
    )]
    ValueOutOfRange {
        enum_name: String,
        entry: String,
        value: i128,
        size_type: String,
    },

    #[error("enum `{enum_name}` entry `{entry}` collides with a generated member name")]
    ReservedEntryName { enum_name: String, entry: String },

    #[error("enum `{enum_name}` default value `{entry}` is not one of its entries")]
    UnknownDefault { enum_name: String, entry: String },
}

/// Combinations that parse fine but the generator refuses to emit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedConfigurationError {
    #[error("flags enum `{enum_name}` uses signed storage type `{size_type}`")]
    SignedFlagsStorage {
        enum_name: String,
        size_type: String,
    },

    #[error("enum `{enum_name}` references size type #{index}, registry has {registry_len}")]
    UnknownSizeType {
        enum_name: String,
        index: usize,
        registry_len: usize,
    },
}

pub type Result<T> = std::result::Result<T, EnumwrightError>;

impl EnumwrightError {
    pub fn config(message: impl Into<String>) -> Self {
        EnumwrightError::Config(message.into())
    }

    pub fn invalid_config_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        EnumwrightError::InvalidConfigValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EnumwrightError::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn stale_output(path: impl Into<PathBuf>) -> Self {
        EnumwrightError::StaleOutput { path: path.into() }
    }

    /// The validation error behind this failure, if it is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            EnumwrightError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
