//! API error types
//!
//! ApiError는 HTTP 호출 세부 에러를 관리합니다.
//! tablero_foundation::Error와의 변환을 지원합니다.

use tablero_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors that can occur during dashboard API calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network error (connection failed, DNS, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not the expected JSON
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// 서버가 응답했는지 (연결 자체는 성공)
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for FoundationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(msg) => FoundationError::Http(format!("Network: {}", msg)),
            ApiError::Status { status, body } => {
                FoundationError::Http(format!("HTTP {}: {}", status, body))
            }
            ApiError::Decode(msg) => FoundationError::Http(format!("Decode: {}", msg)),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
