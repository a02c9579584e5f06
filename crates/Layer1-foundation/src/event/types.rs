//! Storage Event Types - 저장소 변경 이벤트 정의
//!
//! 브라우저의 `storage` 이벤트처럼 key 판별자와 이전/새 값을 담는다.
//! `key`가 `None`이면 저장소 전체가 비워진 것(clear)이다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// StorageEvent
// ============================================================================

/// 저장소 변경 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// 이벤트 ID
    pub id: EventId,

    /// 변경된 키 (None = 전체 clear)
    pub key: Option<String>,

    /// 변경 전 값
    pub old_value: Option<String>,

    /// 변경 후 값 (None = 삭제)
    pub new_value: Option<String>,

    /// 이벤트 발생 시간
    pub timestamp: DateTime<Utc>,

    /// 이벤트 소스 (어느 저장소/프로세스에서 발생했는지)
    pub source: String,
}

impl StorageEvent {
    /// 키 변경 이벤트 생성
    pub fn changed(
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            key: Some(key.into()),
            old_value,
            new_value,
            timestamp: Utc::now(),
            source: String::new(),
        }
    }

    /// 전체 clear 이벤트 생성
    pub fn cleared() -> Self {
        Self {
            id: EventId::new(),
            key: None,
            old_value: None,
            new_value: None,
            timestamp: Utc::now(),
            source: String::new(),
        }
    }

    /// 소스 설정
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// 전체 clear 이벤트인지
    pub fn is_clear(&self) -> bool {
        self.key.is_none()
    }

    /// 삭제 이벤트인지
    pub fn is_removal(&self) -> bool {
        self.key.is_some() && self.new_value.is_none()
    }

    /// 주어진 키 중 하나에 영향을 주는지
    ///
    /// clear 이벤트는 모든 키에 영향을 준다.
    pub fn affects(&self, keys: &[&str]) -> bool {
        match &self.key {
            None => true,
            Some(key) => keys.iter().any(|k| k == key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_event() {
        let event = StorageEvent::changed("permisos", None, Some("{}".into())).with_source("memory");

        assert_eq!(event.key.as_deref(), Some("permisos"));
        assert_eq!(event.source, "memory");
        assert!(!event.is_clear());
        assert!(!event.is_removal());
        assert!(event.affects(&["alias", "permisos"]));
        assert!(!event.affects(&["alias", "user"]));
    }

    #[test]
    fn test_clear_affects_everything() {
        let event = StorageEvent::cleared();
        assert!(event.is_clear());
        assert!(event.affects(&["alias"]));
        assert!(event.affects(&[]));
    }

    #[test]
    fn test_removal() {
        let event = StorageEvent::changed("alias", Some("jperez".into()), None);
        assert!(event.is_removal());
    }
}
