//! 메모리 저장소 (테스트 및 임베딩용)

use super::kv::KeyValueStore;
use crate::event::{StorageEvent, StorageEventBus};
use crate::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;

const SOURCE: &str = "memory";

/// 프로세스 내 key-value 저장소
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    events: StorageEventBus,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 값과 함께 생성 (이벤트 발행 없음)
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            events: StorageEventBus::new(),
        }
    }

    /// 이벤트 없이 값만 바꿈
    ///
    /// 다른 창/탭이 저장소를 수정했지만 아직 이벤트가 도착하지 않은 상황을 흉내낸다.
    pub fn set_silently(&self, key: &str, value: &str) {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
    }

    /// 외부에서 온 이벤트를 그대로 전달
    pub fn dispatch(&self, event: StorageEvent) {
        self.events.publish(event);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let old = self
            .entries
            .write()
            .insert(key.to_string(), value.to_string());

        self.events.publish(
            StorageEvent::changed(key, old, Some(value.to_string())).with_source(SOURCE),
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let old = self.entries.write().remove(key);
        if old.is_some() {
            self.events
                .publish(StorageEvent::changed(key, old, None).with_source(SOURCE));
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
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
