use thiserror::Error;

/// Rejected spiderfier configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("circleSpiralSwitchover must be at least 1")]
    ZeroSwitchover,

    #[error("invalid {field} colour {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
}
