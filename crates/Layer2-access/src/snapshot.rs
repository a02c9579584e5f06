//! Access snapshot - alias + 권한 + 관리자 여부의 읽기 모델
//!
//! 저장소에서 매번 통째로 다시 계산되는 순수 투영이다. 독립적인 수명이 없다.

use serde::{Deserialize, Serialize};
use tablero_foundation::{is_admin, PermissionSet};

/// 접근 스냅샷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSnapshot {
    /// 사용자 alias
    pub alias: Option<String>,

    /// 아홉 토큰 관리자
    pub is_admin: bool,

    /// speech 필터 사용 가능 (관리자 또는 speech 관리자 alias)
    pub can_use_filters: bool,

    /// 추출된 토큰
    pub permissions: PermissionSet,
}

impl AccessSnapshot {
    /// alias + 권한으로 계산
    pub fn compute(
        alias: Option<String>,
        permissions: PermissionSet,
        speech_admins: &[String],
    ) -> Self {
        let admin = is_admin(&permissions);
        let listed = alias
            .as_deref()
            .is_some_and(|a| speech_admins.iter().any(|s| s.eq_ignore_ascii_case(a)));

        Self {
            alias,
            is_admin: admin,
            can_use_filters: admin || listed,
            permissions,
        }
    }

    /// 로그인 여부
    pub fn is_authenticated(&self) -> bool {
        self.alias.is_some()
    }

    /// 정확한 권한 보유 (hasPermiso)
    pub fn has_permission(&self, token: &str) -> bool {
        self.permissions.contains(token)
    }

    /// 모듈 권한 보유 (tienePermisoModulo)
    pub fn has_module_permission(&self, module: &str) -> bool {
        self.permissions.has_module(module)
    }
}

/// 접근 상태
///
/// 첫 동기화 전에는 `Unknown`이다. "아직 모름"과 "권한 0개"를 구분해서
/// 첫 렌더에서 성급하게 거부하지 않도록 한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "snapshot", rename_all = "camelCase")]
pub enum AccessState {
    #[default]
    Unknown,
    Loaded(AccessSnapshot),
}

impl AccessState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn snapshot(&self) -> Option<&AccessSnapshot> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot),
            Self::Unknown => None,
        }
    }
}

/// 접근 상태 제공자
///
/// 가드와 홈 리다이렉트는 이 trait을 생성자/인자로 받는다.
pub trait AccessProvider: Send + Sync {
    fn access_state(&self) -> AccessState;
}

impl AccessProvider for AccessState {
    fn access_state(&self) -> AccessState {
        self.clone()
    }
}
