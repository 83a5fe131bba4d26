use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("step catalog must contain at least one step")]
    Empty,
    #[error("step {index} has a blank title")]
    BlankTitle { index: usize },
    #[error("step {index} has a blank description")]
    BlankDescription { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("autoplay period must be greater than zero")]
    ZeroAutoplayPeriod,
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized command '{0}'")]
pub struct CommandParseError(pub String);
