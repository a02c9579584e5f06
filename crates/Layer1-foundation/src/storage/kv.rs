//! Key-value 저장소 추상화
//!
//! 브라우저 local storage와 같은 모델: 문자열 키, 문자열(대개 JSON) 값,
//! 쓰기마다 변경 이벤트. 권한 데이터는 외부 로그인 흐름이 기록하고
//! 이 크레이트는 읽기만 한다.

use crate::event::StorageEventBus;
use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};

/// 잘 알려진 저장소 키
pub mod keys {
    /// 중첩된 권한 소스 (JSON)
    pub const PERMISOS: &str = "permisos";
    /// 사용자 alias (평문)
    pub const ALIAS: &str = "alias";
    /// 사용자 객체 (JSON, `alias`/`usuario` 포함 가능)
    pub const USER: &str = "user";
    /// 최근 활동 목록 (JSON 배열)
    pub const ACTIVIDADES_RECIENTES: &str = "actividadesRecientes";

    /// 접근 스냅샷에 영향을 주는 키들
    pub const ACCESS_KEYS: [&str; 3] = [ALIAS, USER, PERMISOS];
}

/// Key-value 저장소
///
/// 구현체는 값을 바꾼 뒤 내부 락을 놓고 `events()` 버스에 이벤트를 발행해야 한다.
pub trait KeyValueStore: Send + Sync {
    /// 값 조회
    fn get(&self, key: &str) -> Option<String>;

    /// 값 저장
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// 값 삭제 (없으면 아무 일도 하지 않음)
    fn remove(&self, key: &str) -> Result<()>;

    /// 전체 삭제
    fn clear(&self) -> Result<()>;

    /// 저장된 키 목록
    fn keys(&self) -> Vec<String>;

    /// 변경 이벤트 버스
    fn events(&self) -> &StorageEventBus;

    /// 키 존재 여부
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// JSON 값 로드
///
/// 키가 없으면 `Ok(None)`, 파싱 실패는 `Err(Error::Json)`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key) {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// JSON 값 저장
pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)
        .map_err(|e| Error::Storage(format!("Failed to serialize {}: {}", key, e)))?;
    store.set(key, &raw)
}
