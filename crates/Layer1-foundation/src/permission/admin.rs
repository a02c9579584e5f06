//! 관리자 판정
//!
//! 세 도메인(Pagos, Calidad, Reclamos) × 세 범위(Interno, Externo, Judicial)의
//! 아홉 토큰을 모두 가진 경우에만 관리자다. 부분 점수는 없다.

use super::token::PermissionSet;

/// 도메인별 토큰 세 개
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminTriple {
    pub domain: &'static str,
    pub tokens: [&'static str; 3],
}

/// 관리자 판정에 필요한 세 묶음
pub const ADMIN_TRIPLES: [AdminTriple; 3] = [
    AdminTriple {
        domain: "Pagos",
        tokens: [
            "PERMISO_PagosInterno-ver",
            "PERMISO_PagosExterno-ver",
            "PERMISO_PagosJudicial-ver",
        ],
    },
    AdminTriple {
        domain: "Calidad",
        tokens: [
            "PERMISO_CalidadInterno-ver",
            "PERMISO_CalidadExterno-ver",
            "PERMISO_CalidadJudicial-ver",
        ],
    },
    AdminTriple {
        domain: "Reclamos",
        tokens: [
            "PERMISO_ReclamosInterno-ver",
            "PERMISO_ReclamosExterno-ver",
            "PERMISO_ReclamosJudicial-ver",
        ],
    },
];

impl AdminTriple {
    /// 세 토큰을 모두 가졌는지
    pub fn is_satisfied_by(&self, permissions: &PermissionSet) -> bool {
        self.tokens.iter().all(|t| permissions.contains(t))
    }
}

/// 관리자 여부
pub fn is_admin(permissions: &PermissionSet) -> bool {
    ADMIN_TRIPLES.iter().all(|triple| triple.is_satisfied_by(permissions))
}

/// 관리자 판정에 빠진 토큰 목록 (진단용)
pub fn missing_admin_tokens(permissions: &PermissionSet) -> Vec<&'static str> {
    ADMIN_TRIPLES
        .iter()
        .flat_map(|triple| triple.tokens.iter().copied())
        .filter(|t| !permissions.contains(t))
        .collect()
}

/// 아홉 토큰 전체
pub fn admin_tokens() -> impl Iterator<Item = &'static str> {
    ADMIN_TRIPLES
        .iter()
        .flat_map(|triple| triple.tokens.iter().copied())
}
