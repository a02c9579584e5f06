//! Error types for Tablero
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Tablero 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 저장소 관련
    // ========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    // ========================================================================
    // 권한 소스 관련
    // ========================================================================
    #[error("Permission source nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// 저장된 값이 손상된 것으로 취급되어야 하는 에러인지 확인
    ///
    /// 권한 추출은 이런 에러를 "권한 없음"으로 흡수하고 warn만 남긴다.
    /// 그 밖의 에러(저장소 자체 실패 등)는 error로 남긴다.
    pub fn is_absent_data(&self) -> bool {
        matches!(self, Error::Json(_) | Error::DepthExceeded { .. })
    }
}
