use thiserror::Error;

#[derive(Error, Debug)]
pub enum LottoError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Ticket already registered: {qr_url}")]
    DuplicateTicket { qr_url: String },

    #[error("Ticket round {ticket_round} does not match draw round {draw_round}")]
    RoundMismatch { ticket_round: i32, draw_round: i32 },

    #[error("Draw result for round {round} is not available")]
    DrawNotAvailable { round: i32 },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LottoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LottoError::ApiError(_) | LottoError::DrawNotAvailable { .. } => ErrorCategory::Network,
            LottoError::IoError(_) | LottoError::CsvError(_) => ErrorCategory::Storage,
            LottoError::ConfigError { .. }
            | LottoError::MissingConfigError { .. }
            | LottoError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LottoError::SerializationError(_)
            | LottoError::InvalidInput { .. }
            | LottoError::DuplicateTicket { .. }
            | LottoError::RoundMismatch { .. }
            | LottoError::NotFound { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 尚未開獎或重複登錄都只是提醒
            LottoError::DrawNotAvailable { .. } | LottoError::DuplicateTicket { .. } => {
                ErrorSeverity::Low
            }
            LottoError::ApiError(_) => ErrorSeverity::Medium,
            LottoError::CsvError(_)
            | LottoError::SerializationError(_)
            | LottoError::InvalidInput { .. }
            | LottoError::RoundMismatch { .. }
            | LottoError::NotFound { .. } => ErrorSeverity::High,
            LottoError::IoError(_)
            | LottoError::ConfigError { .. }
            | LottoError::MissingConfigError { .. }
            | LottoError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LottoError::ApiError(_) => "無法連線到開獎資訊服務".to_string(),
            LottoError::DrawNotAvailable { round } => format!("第 {} 期尚未開獎", round),
            LottoError::DuplicateTicket { .. } => "這張彩券已經登錄過了".to_string(),
            LottoError::IoError(e) => format!("檔案讀寫失敗: {}", e),
            LottoError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值 {} 無效: {}", field, reason)
            }
            LottoError::MissingConfigError { field } => format!("缺少設定值: {}", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the api endpoint, then retry",
            ErrorCategory::Storage => "Make sure the data directory exists and is writable",
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
            ErrorCategory::Data => "Inspect the ticket and draw files for malformed entries",
        }
    }
}

pub type Result<T> = std::result::Result<T, LottoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_draw_is_low_severity() {
        let err = LottoError::DrawNotAvailable { round: 1200 };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("1200"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = LottoError::MissingConfigError {
            field: "source.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_round_mismatch_display() {
        let err = LottoError::RoundMismatch {
            ticket_round: 10,
            draw_round: 11,
        };
        assert_eq!(
            err.to_string(),
            "Ticket round 10 does not match draw round 11"
        );
    }
}
