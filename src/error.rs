use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("invalid radius: {0}")]
    InvalidRadius(String),

    #[error("invalid measurement for {category}: {reason}")]
    InvalidMeasurement { category: String, reason: String },

    #[error("missing measurement row: {0}")]
    MissingCategory(String),

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("iris code not found in population dataset: {0}")]
    IrisNotFound(String),

    #[error("invalid siren: {0}")]
    InvalidSiren(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScoreError {
    pub fn invalid_measurement(category: &str, reason: impl Into<String>) -> Self {
        Self::InvalidMeasurement {
            category: category.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors caused by the caller's inputs rather than by the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinates(_)
                | Self::InvalidRadius(_)
                | Self::InvalidMeasurement { .. }
                | Self::MissingCategory(_)
                | Self::UnknownCity(_)
                | Self::IrisNotFound(_)
                | Self::InvalidSiren(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
