//! 사용자 alias 해석
//!
//! 순서: `alias` 키(평문) → `user` 객체의 `alias` → `usuario`.
//! 빈 문자열은 없는 것으로 본다. 손상된 `user` JSON도 없는 것으로 본다.

use serde_json::Value;
use tablero_foundation::{keys, KeyValueStore};
use tracing::debug;

/// 저장소에서 alias 조회
pub fn resolve_alias(store: &dyn KeyValueStore) -> Option<String> {
    if let Some(alias) = store.get(keys::ALIAS).and_then(|raw| normalize(&raw)) {
        return Some(alias);
    }

    let raw_user = store.get(keys::USER)?;
    match serde_json::from_str::<Value>(&raw_user) {
        Ok(user) => alias_from_user(&user),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed user object");
            None
        }
    }
}

fn alias_from_user(user: &Value) -> Option<String> {
    ["alias", "usuario"]
        .iter()
        .filter_map(|field| user.get(field).and_then(Value::as_str))
        .find_map(normalize)
}

/// 공백 제거, JSON 문자열로 한 번 더 감싸진 값 풀기
fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| trimmed.to_string())
    } else {
        trimmed.to_string()
    };

    let unquoted = unquoted.trim();
    (!unquoted.is_empty()).then(|| unquoted.to_string())
}
