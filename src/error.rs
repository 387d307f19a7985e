use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid operator: {token:?}")]
    InvalidOperator { token: String },
    #[error("Unknown attribute: {path:?} on {entity}")]
    UnknownAttribute { entity: String, path: String },
    #[error("Type mismatch: {value:?} is not a valid {expected} for {path}")]
    TypeMismatch { path: String, expected: String, value: String },
    #[error("Too many clauses: {count} exceeds the limit of {limit}")]
    TooManyClauses { count: usize, limit: usize },
    #[error("Payload error: {0}")]
    Payload(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    pub fn type_mismatch(path: &str, expected: impl ToString, value: impl ToString) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            value: value.to_string(),
        }
    }
}

// Helper conversions
impl From<rusqlite::Error> for FilterError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}
impl From<config::ConfigError> for FilterError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self { Self::Payload(e.to_string()) }
}
