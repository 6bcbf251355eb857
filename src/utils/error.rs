use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Catalog '{catalog}' is invalid: {message}")]
    CatalogError { catalog: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScopingError {
    pub fn catalog(catalog: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CatalogError {
            catalog: catalog.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Data,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CatalogError { .. } => ErrorCategory::Catalog,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Data => ErrorSeverity::Medium,
            // 內建目錄損壞屬於程式缺陷
            ErrorCategory::Catalog => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::SerializationError(_) => "Check the JSON payload for syntax errors",
            Self::CsvError(_) => "Check the formula table for unbalanced quotes or missing columns",
            Self::ConfigValidationError { .. } => {
                "Fix the reported field in the engagement TOML file and retry"
            }
            Self::InvalidConfigValueError { .. } => {
                "Use one of the accepted values for the reported field"
            }
            Self::MissingConfigError { .. } => "Add the missing field to the engagement file",
            Self::CatalogError { .. } => {
                "The bundled catalog data is inconsistent; rebuild from a clean checkout"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not read input: {}", e),
            Self::ConfigValidationError { field, message } => {
                format!("Engagement file problem at '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, value, .. } => {
                format!("'{}' is not a valid value for '{}'", value, field)
            }
            Self::MissingConfigError { field } => format!("'{}' is required", field),
            Self::CatalogError { catalog, .. } => {
                format!("Internal catalog '{}' failed validation", catalog)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScopingError>;
