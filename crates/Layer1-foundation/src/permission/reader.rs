//! 저장소에서 권한 읽기
//!
//! 읽기 실패(키 없음, 잘못된 JSON, 깊이 초과)는 빈 집합으로 흡수한다.
//! `read`는 절대 에러를 밖으로 내보내지 않는다.

use super::source::{PermissionSource, DEFAULT_MAX_DEPTH};
use super::token::PermissionSet;
use crate::storage::{keys, KeyValueStore};
use crate::Result;
use tracing::{debug, error, warn};

/// 권한 읽기 설정
#[derive(Debug, Clone)]
pub struct PermissionReader {
    key: String,
    max_depth: usize,
}

impl PermissionReader {
    pub fn new() -> Self {
        Self {
            key: keys::PERMISOS.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 권한 읽기 (실패 시 빈 집합)
    pub fn read(&self, store: &dyn KeyValueStore) -> PermissionSet {
        match self.try_read(store) {
            Ok(Some(set)) => set,
            Ok(None) => {
                debug!(key = %self.key, "No permission source in store");
                PermissionSet::new()
            }
            Err(e) if e.is_absent_data() => {
                warn!(key = %self.key, error = %e, "Unreadable permission source, treating as empty");
                PermissionSet::new()
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "Permission read failed, treating as empty");
                PermissionSet::new()
            }
        }
    }

    /// 권한 읽기 (실패 원인 보존)
    ///
    /// 키가 없으면 `Ok(None)`.
    pub fn try_read(&self, store: &dyn KeyValueStore) -> Result<Option<PermissionSet>> {
        let Some(raw) = store.get(&self.key) else {
            return Ok(None);
        };
        let source = PermissionSource::parse(&raw, self.max_depth)?;
        Ok(Some(source.tokens()))
    }
}

impl Default for PermissionReader {
    fn default() -> Self {
        Self::new()
    }
}

/// 기본 설정으로 권한 읽기
pub fn extract_permissions(store: &dyn KeyValueStore) -> PermissionSet {
    PermissionReader::new().read(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::is_admin;
    use crate::storage::MemoryStore;
    use crate::Error;

    #[test]
    fn test_missing_key_is_empty() {
        let store = MemoryStore::new();
        let set = extract_permissions(&store);
        assert!(set.is_empty());
        assert!(!is_admin(&set));
        assert!(PermissionReader::new().try_read(&store).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_is_empty() {
        let store = MemoryStore::with_entries([("permisos", "{not json")]);
        let set = extract_permissions(&store);
        assert!(set.is_empty());
        assert!(!is_admin(&set));
        let err = PermissionReader::new().try_read(&store).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_absent_data());
    }

    #[test]
    fn test_pagos_only_scenario() {
        let store = MemoryStore::with_entries([(
            "permisos",
            r#"{"a": ["PERMISO_PagosInterno-ver","PERMISO_PagosExterno-ver","PERMISO_PagosJudicial-ver"]}"#,
        )]);

        let set = extract_permissions(&store);
        assert_eq!(set.len(), 3);
        assert!(!is_admin(&set));
        assert!(set.has_module("Pagos"));
        assert!(!set.has_module("Calidad"));
    }

    #[test]
    fn test_depth_limit_yields_empty() {
        let store = MemoryStore::with_entries([("permisos", r#"{"a":{"b":{"c":["PERMISO_X"]}}}"#)]);

        assert_eq!(PermissionReader::new().read(&store).len(), 1);
        assert!(PermissionReader::new().with_max_depth(1).read(&store).is_empty());

        // 한도와 트리 깊이가 같으면 통과, 하나 모자라면 거부
        assert_eq!(PermissionReader::new().with_max_depth(4).read(&store).len(), 1);
        let err = PermissionReader::new().with_max_depth(3).try_read(&store).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 3 }));
        assert!(err.is_absent_data());
    }

    #[test]
    fn test_custom_key() {
        let store = MemoryStore::with_entries([("permisosSpeech", r#"["PERMISO_Speech-ver"]"#)]);
        let reader = PermissionReader::new().with_key("permisosSpeech");
        assert_eq!(reader.key(), "permisosSpeech");
        assert!(reader.read(&store).contains("PERMISO_Speech-ver"));
    }
}
