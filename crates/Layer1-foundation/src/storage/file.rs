//! 파일 기반 key-value 저장소
//!
//! 전체 맵을 JSON 객체 하나로 저장한다. 다른 프로세스가 파일을 바꾼 경우
//! `reload()`가 차이를 키 단위 이벤트로 발행한다 (브라우저의 다른 탭에서 온
//! `storage` 이벤트에 해당).

use super::kv::KeyValueStore;
use crate::event::{StorageEvent, StorageEventBus};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SOURCE: &str = "file";
const SOURCE_EXTERNAL: &str = "file:external";

/// JSON 파일 저장소
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    events: StorageEventBus,
}

impl FileStore {
    /// 파일 열기 (없으면 빈 저장소)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = Self::read_file(&path)?;
        debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            events: StorageEventBus::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 파일을 다시 읽고 바뀐 키마다 이벤트 발행
    ///
    /// 발행된 이벤트 수를 반환한다.
    pub fn reload(&self) -> Result<usize> {
        let fresh = Self::read_file(&self.path)?;

        let changes: Vec<StorageEvent> = {
            let mut entries = self.entries.write();
            let all_keys: BTreeSet<String> =
                entries.keys().chain(fresh.keys()).cloned().collect();

            let changes = all_keys
                .into_iter()
                .filter_map(|key| {
                    let old = entries.get(&key).cloned();
                    let new = fresh.get(&key).cloned();
                    (old != new).then(|| {
                        StorageEvent::changed(key, old, new).with_source(SOURCE_EXTERNAL)
                    })
                })
                .collect();

            *entries = fresh;
            changes
        };

        let count = changes.len();
        for event in changes {
            self.events.publish(event);
        }

        debug!(path = %self.path.display(), changed = count, "Reloaded file store");
        Ok(count)
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("Failed to parse {}: {}", path.display(), e)))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Storage(format!("Failed to serialize: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to write file store");
            Error::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let old = {
            let mut entries = self.entries.write();
            let old = entries.insert(key.to_string(), value.to_string());
            if let Err(e) = self.persist(&entries) {
                // 디스크 쓰기 실패 시 메모리도 되돌림
                match &old {
                    Some(prev) => entries.insert(key.to_string(), prev.clone()),
                    None => entries.remove(key),
                };
                return Err(e);
            }
            old
        };

        self.events.publish(
            StorageEvent::changed(key, old, Some(value.to_string())).with_source(SOURCE),
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let old = {
            let mut entries = self.entries.write();
            let Some(old) = entries.remove(key) else {
                return Ok(());
            };
            if let Err(e) = self.persist(&entries) {
                entries.insert(key.to_string(), old);
                return Err(e);
            }
            old
        };

        self.events
            .publish(StorageEvent::changed(key, Some(old), None).with_source(SOURCE));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        {
            let mut entries = self.entries.write();
            self.persist(&BTreeMap::new())?;
            entries.clear();
        }

        self.events.publish(StorageEvent::cleared().with_source(SOURCE));
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn events(&self) -> &StorageEventBus {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("storage.json")).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_persist_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("alias", "jperez").unwrap();
        store.set("permisos", r#"{"a":["PERMISO_Pagos-ver"]}"#).unwrap();
        store.remove("alias").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get("alias").is_none());
        assert_eq!(
            reopened.get("permisos").as_deref(),
            Some(r#"{"a":["PERMISO_Pagos-ver"]}"#)
        );
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(FileStore::open(&path), Err(Error::Storage(_))));
    }

    #[test]
    fn test_reload_publishes_external_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("alias", "jperez").unwrap();
        store.set("user", "{}").unwrap();

        // 다른 프로세스가 파일을 수정
        let other = FileStore::open(&path).unwrap();
        other.set("alias", "mgomez").unwrap();
        other.remove("user").unwrap();
        other.set("permisos", "{}").unwrap();

        let before = store.events().event_count();
        assert_eq!(store.reload().unwrap(), 3);
        assert_eq!(store.events().event_count(), before + 3);
        assert_eq!(store.get("alias").as_deref(), Some("mgomez"));
        assert!(store.get("user").is_none());

        let history = store.events().history(Some(3));
        assert!(history.iter().all(|e| e.source == "file:external"));

        // 변화 없으면 이벤트 없음
        assert_eq!(store.reload().unwrap(), 0);
    }

    #[test]
    fn test_clear_truncates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("alias", "jperez").unwrap();
        store.clear().unwrap();

        assert!(FileStore::open(&path).unwrap().keys().is_empty());
    }
}
