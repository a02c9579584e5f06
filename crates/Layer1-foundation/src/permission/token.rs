//! 권한 토큰과 토큰 집합
//!
//! 토큰은 `PERMISO_` 접두어가 붙은 불투명 문자열이다. 접두어 검사 외의
//! 구조 검증은 하지 않는다.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// 토큰 접두어
pub const PERMISSION_PREFIX: &str = "PERMISO_";

/// 권한 토큰
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionToken(String);

impl PermissionToken {
    /// 접두어가 맞으면 토큰 생성
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        raw.starts_with(PERMISSION_PREFIX).then_some(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 모듈 소속 여부 (`PERMISO_<module>` 부분 문자열 포함)
    pub fn belongs_to_module(&self, module: &str) -> bool {
        self.0.contains(&module_marker(module))
    }
}

impl fmt::Display for PermissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PermissionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PermissionToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn module_marker(module: &str) -> String {
    format!("{}{}", PERMISSION_PREFIX, module)
}

// ============================================================================
// PermissionSet
// ============================================================================

/// 중복 없는 토큰 집합 (순서 무의미, 출력은 정렬됨)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    tokens: BTreeSet<PermissionToken>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문자열 목록에서 생성 (접두어가 없는 항목은 버림)
    pub fn from_strings<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        raw.into_iter().filter_map(|s| PermissionToken::parse(s)).collect()
    }

    pub fn insert(&mut self, token: PermissionToken) -> bool {
        self.tokens.insert(token)
    }

    pub fn remove(&mut self, token: &str) -> bool {
        self.tokens.remove(token)
    }

    /// 정확한 토큰 포함 여부 (hasPermiso)
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// 모듈 권한 보유 여부 (tienePermisoModulo)
    ///
    /// 어느 토큰이든 `PERMISO_<module>`을 부분 문자열로 포함하면 참.
    pub fn has_module(&self, module: &str) -> bool {
        let marker = module_marker(module);
        self.tokens.iter().any(|t| t.as_str().contains(&marker))
    }

    /// 모듈에 속한 토큰들
    pub fn module_tokens<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a PermissionToken> + 'a {
        self.tokens.iter().filter(move |t| t.belongs_to_module(module))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 문자열 벡터로 변환
    pub fn to_strings(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl FromIterator<PermissionToken> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl Extend<PermissionToken> for PermissionSet {
    fn extend<I: IntoIterator<Item = PermissionToken>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a PermissionToken;
    type IntoIter = std::collections::btree_set::Iter<'a, PermissionToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
