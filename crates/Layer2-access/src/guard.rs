//! Route guards
//!
//! 화면 하위 트리를 권한으로 막는다. 상태가 `Unknown`이면 거부하지 않고 `Pending`.

use crate::snapshot::{AccessProvider, AccessSnapshot, AccessState};
use serde::{Deserialize, Serialize};
use tablero_foundation::RoutesConfig;
use tracing::debug;

/// 가드 요구사항
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Requirement {
    /// alias 존재
    Authenticated,
    /// `PERMISO_<module>` 부분 문자열 일치
    Module(String),
    /// 정확한 토큰 일치
    Permission(String),
    /// 아홉 토큰 관리자
    Admin,
    /// speech 필터 사용 가능
    FilterAccess,
}

impl Requirement {
    /// 스냅샷이 요구사항을 만족하는지
    pub fn is_met_by(&self, snapshot: &AccessSnapshot) -> bool {
        match self {
            Self::Authenticated => snapshot.is_authenticated(),
            Self::Module(module) => snapshot.has_module_permission(module),
            Self::Permission(token) => snapshot.has_permission(token),
            Self::Admin => snapshot.is_admin,
            Self::FilterAccess => snapshot.can_use_filters,
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticated => write!(f, "authenticated"),
            Self::Module(module) => write!(f, "module:{}", module),
            Self::Permission(token) => write!(f, "permission:{}", token),
            Self::Admin => write!(f, "admin"),
            Self::FilterAccess => write!(f, "filter-access"),
        }
    }
}

/// 가드 판정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum GuardDecision {
    Allow,
    Deny { redirect: String },
    /// 첫 동기화 전
    Pending,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// 거부 시 이동할 경로
    pub fn redirect(&self) -> Option<&str> {
        match self {
            Self::Deny { redirect } => Some(redirect),
            _ => None,
        }
    }
}

/// 경로 가드
///
/// 거부 시 alias가 없으면 로그인 경로, 있으면 fallback 경로로 보낸다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    requirement: Requirement,
    login: String,
    fallback: String,
}

impl RouteGuard {
    pub fn new(requirement: Requirement) -> Self {
        let routes = RoutesConfig::default();
        Self {
            requirement,
            login: routes.login,
            fallback: routes.no_access,
        }
    }

    pub fn authenticated() -> Self {
        Self::new(Requirement::Authenticated)
    }

    pub fn module(module: impl Into<String>) -> Self {
        Self::new(Requirement::Module(module.into()))
    }

    pub fn permission(token: impl Into<String>) -> Self {
        Self::new(Requirement::Permission(token.into()))
    }

    pub fn admin() -> Self {
        Self::new(Requirement::Admin)
    }

    pub fn filter_access() -> Self {
        Self::new(Requirement::FilterAccess)
    }

    /// 설정된 로그인/무권한 경로 사용
    pub fn with_routes(mut self, routes: &RoutesConfig) -> Self {
        self.login = routes.login.clone();
        self.fallback = routes.no_access.clone();
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// 상태로 판정
    pub fn evaluate(&self, state: &AccessState) -> GuardDecision {
        let Some(snapshot) = state.snapshot() else {
            return GuardDecision::Pending;
        };

        if self.requirement.is_met_by(snapshot) {
            return GuardDecision::Allow;
        }

        let redirect = if snapshot.is_authenticated() {
            self.fallback.clone()
        } else {
            self.login.clone()
        };
        debug!(
            requirement = %self.requirement,
            alias = ?snapshot.alias,
            redirect = %redirect,
            "Route guard denied"
        );
        GuardDecision::Deny { redirect }
    }

    /// 제공자의 현재 상태로 판정
    pub fn check(&self, provider: &dyn AccessProvider) -> GuardDecision {
        self.evaluate(&provider.access_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablero_foundation::permission::admin_tokens;
    use tablero_foundation::PermissionSet;

    fn loaded(alias: Option<&str>, tokens: &[&str]) -> AccessState {
        AccessState::Loaded(AccessSnapshot::compute(
            alias.map(String::from),
            PermissionSet::from_strings(tokens.iter().copied()),
            &[],
        ))
    }

    #[test]
    fn test_unknown_is_pending() {
        for guard in [
            RouteGuard::authenticated(),
            RouteGuard::module("Pagos"),
            RouteGuard::permission("PERMISO_Pagos-ver"),
            RouteGuard::admin(),
            RouteGuard::filter_access(),
        ] {
            let decision = guard.evaluate(&AccessState::Unknown);
            assert!(decision.is_pending());
            assert!(decision.redirect().is_none());
        }
    }

    #[test]
    fn test_module_substring_match() {
        let state = loaded(Some("jperez"), &["PERMISO_PagosInterno-ver"]);
        assert!(RouteGuard::module("Pagos").evaluate(&state).is_allowed());
        assert!(RouteGuard::module("PagosInterno").evaluate(&state).is_allowed());
        assert_eq!(
            RouteGuard::module("Calidad").evaluate(&state),
            GuardDecision::Deny { redirect: "/sin-acceso".into() }
        );
    }

    #[test]
    fn test_exact_permission() {
        let state = loaded(Some("jperez"), &["PERMISO_PagosInterno-ver"]);
        assert!(RouteGuard::permission("PERMISO_PagosInterno-ver")
            .evaluate(&state)
            .is_allowed());
        assert!(!RouteGuard::permission("PERMISO_PagosInterno")
            .evaluate(&state)
            .is_allowed());
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        let state = loaded(None, &[]);
        assert_eq!(
            RouteGuard::authenticated().evaluate(&state).redirect(),
            Some("/login")
        );
        assert_eq!(RouteGuard::module("Pagos").evaluate(&state).redirect(), Some("/login"));
    }

    #[test]
    fn test_admin_guard() {
        let tokens: Vec<&str> = admin_tokens().collect();
        let admin = loaded(Some("root"), &tokens);
        assert!(RouteGuard::admin().evaluate(&admin).is_allowed());
        assert!(RouteGuard::filter_access().evaluate(&admin).is_allowed());

        let partial = loaded(Some("jperez"), &tokens[..8]);
        assert!(!RouteGuard::admin().evaluate(&partial).is_allowed());
    }

    #[test]
    fn test_custom_fallback_and_routes() {
        let mut routes = RoutesConfig::default();
        routes.login = "/ingresar".into();
        routes.no_access = "/denegado".into();

        let guard = RouteGuard::admin().with_routes(&routes);
        assert_eq!(guard.evaluate(&loaded(None, &[])).redirect(), Some("/ingresar"));
        assert_eq!(
            guard.evaluate(&loaded(Some("a"), &[])).redirect(),
            Some("/denegado")
        );

        let guard = guard.with_fallback("/inicio");
        assert_eq!(guard.evaluate(&loaded(Some("a"), &[])).redirect(), Some("/inicio"));
    }

    #[test]
    fn test_check_with_provider() {
        let state = loaded(Some("jperez"), &["PERMISO_Calidad-ver"]);
        assert!(RouteGuard::module("Calidad").check(&state).is_allowed());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(GuardDecision::Deny { redirect: "/login".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"decision": "deny", "redirect": "/login"}));
        assert_eq!(Requirement::Module("Pagos".into()).to_string(), "module:Pagos");
    }
}
