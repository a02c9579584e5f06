//! Home redirect - 접근 상태로 시작 화면 선택

use crate::snapshot::{AccessProvider, AccessState};
use serde::{Deserialize, Serialize};
use tablero_foundation::RoutesConfig;
use tracing::debug;

/// 시작 화면
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HomeRoute {
    /// 첫 동기화 전
    Pending,
    Login { route: String },
    SpeechDashboard { route: String },
    Module { module: String, route: String },
    NoAccess { route: String },
}

impl HomeRoute {
    /// 이동할 경로 (Pending이면 None)
    pub fn route(&self) -> Option<&str> {
        match self {
            Self::Pending => None,
            Self::Login { route }
            | Self::SpeechDashboard { route }
            | Self::Module { route, .. }
            | Self::NoAccess { route } => Some(route),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// 홈 리다이렉트
#[derive(Debug, Clone, Default)]
pub struct HomeRedirect {
    routes: RoutesConfig,
}

impl HomeRedirect {
    pub fn new(routes: RoutesConfig) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RoutesConfig {
        &self.routes
    }

    /// 시작 화면 결정
    ///
    /// Unknown → Pending, alias 없음 → 로그인, 관리자/필터 사용자 → speech 대시보드,
    /// 그 외 설정 순서상 첫 모듈, 없으면 무권한 경로.
    pub fn resolve(&self, state: &AccessState) -> HomeRoute {
        let Some(snapshot) = state.snapshot() else {
            return HomeRoute::Pending;
        };

        let home = if !snapshot.is_authenticated() {
            HomeRoute::Login {
                route: self.routes.login.clone(),
            }
        } else if snapshot.is_admin || snapshot.can_use_filters {
            HomeRoute::SpeechDashboard {
                route: self.routes.speech_dashboard.clone(),
            }
        } else {
            self.routes
                .modules
                .iter()
                .find(|m| snapshot.has_module_permission(&m.module))
                .map(|m| HomeRoute::Module {
                    module: m.module.clone(),
                    route: m.route.clone(),
                })
                .unwrap_or_else(|| HomeRoute::NoAccess {
                    route: self.routes.no_access.clone(),
                })
        };

        debug!(alias = ?snapshot.alias, home = ?home.route(), "Resolved home route");
        home
    }

    pub fn resolve_for(&self, provider: &dyn AccessProvider) -> HomeRoute {
        self.resolve(&provider.access_state())
    }
}
