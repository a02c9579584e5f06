//! 권한 소스 트리
//!
//! 로그인 흐름이 `permisos` 키에 남기는 JSON은 모양이 정해져 있지 않다.
//! 경계에서 명시적인 태그 트리로 디코드하고, 깊이 제한을 넘는 입력은 거부한다.
//!
//! 추출 규칙:
//! - `Node`(객체)는 모든 자식으로 재귀한다.
//! - `List`(배열)는 직계 문자열 항목 중 접두어가 맞는 것만 토큰이 된다.
//! - 그 밖의 값(배열 밖의 문자열, 숫자, bool, null, 배열 안의 배열/객체)은 무시한다.

use super::token::{PermissionSet, PermissionToken};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// 기본 최대 중첩 깊이
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// 디코드된 권한 소스
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionSource {
    /// 문자열 값
    Leaf(String),
    /// 배열
    List(Vec<PermissionSource>),
    /// 객체
    Node(BTreeMap<String, PermissionSource>),
    /// 숫자, bool, null
    Ignored,
}

impl PermissionSource {
    /// 원시 JSON 문자열 디코드
    pub fn parse(raw: &str, max_depth: usize) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::decode(&value, max_depth)
    }

    /// JSON 값 디코드
    pub fn decode(value: &Value, max_depth: usize) -> Result<Self> {
        Self::decode_at(value, 0, max_depth)
    }

    /// `depth`는 이미 들어온 컨테이너 수. 컨테이너 하나를 더 열면 `depth + 1`단계가 되므로
    /// 그 값이 `max_depth`를 넘으면 거부한다 (`depth()`와 같은 기준).
    fn decode_at(value: &Value, depth: usize, max_depth: usize) -> Result<Self> {
        let enter = |depth: usize| {
            if depth >= max_depth {
                Err(Error::DepthExceeded { limit: max_depth })
            } else {
                Ok(())
            }
        };

        match value {
            Value::String(s) => Ok(Self::Leaf(s.clone())),
            Value::Array(items) => {
                enter(depth)?;
                items
                    .iter()
                    .map(|item| Self::decode_at(item, depth + 1, max_depth))
                    .collect::<Result<Vec<_>>>()
                    .map(Self::List)
            }
            Value::Object(map) => {
                enter(depth)?;
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), Self::decode_at(v, depth + 1, max_depth)?)))
                    .collect::<Result<BTreeMap<_, _>>>()
                    .map(Self::Node)
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(Self::Ignored),
        }
    }

    /// 토큰 추출
    pub fn tokens(&self) -> PermissionSet {
        let mut set = PermissionSet::new();
        self.collect_into(&mut set);
        set
    }

    fn collect_into(&self, set: &mut PermissionSet) {
        match self {
            Self::Node(children) => {
                for child in children.values() {
                    child.collect_into(set);
                }
            }
            Self::List(items) => {
                set.extend(items.iter().filter_map(|item| match item {
                    Self::Leaf(s) => PermissionToken::parse(s.as_str()),
                    _ => None,
                }));
            }
            Self::Leaf(_) | Self::Ignored => {}
        }
    }

    /// 트리 깊이 (Leaf/Ignored = 0)
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) | Self::Ignored => 0,
            Self::List(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            Self::Node(children) => 1 + children.values().map(Self::depth).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(set: &PermissionSet) -> Vec<String> {
        set.to_strings()
    }

    #[test]
    fn test_flat_object_of_arrays() {
        let source = PermissionSource::decode(
            &json!({
                "a": ["PERMISO_PagosInterno-ver", "PERMISO_PagosExterno-ver", "otro"],
                "b": ["PERMISO_Calidad-ver"]
            }),
            DEFAULT_MAX_DEPTH,
        )
        .unwrap();

        assert_eq!(
            strings(&source.tokens()),
            vec![
                "PERMISO_Calidad-ver",
                "PERMISO_PagosExterno-ver",
                "PERMISO_PagosInterno-ver"
            ]
        );
    }

    #[test]
    fn test_deep_nesting() {
        let source = PermissionSource::decode(
            &json!({
                "modulos": {
                    "speech": {
                        "acciones": ["PERMISO_Speech-ver"],
                        "sub": { "x": { "y": ["PERMISO_Speech-filtrar"] } }
                    }
                },
                "top": ["PERMISO_Top"]
            }),
            DEFAULT_MAX_DEPTH,
        )
        .unwrap();

        let tokens = source.tokens();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("PERMISO_Speech-filtrar"));
    }

    #[test]
    fn test_non_array_values_ignored() {
        let source = PermissionSource::decode(
            &json!({
                "suelto": "PERMISO_NoCuenta",
                "numero": 7,
                "nulo": null,
                "flag": true,
                "lista": ["PERMISO_Si", 3, null, ["PERMISO_Anidado"], {"k": ["PERMISO_EnObjeto"]}]
            }),
            DEFAULT_MAX_DEPTH,
        )
        .unwrap();

        assert_eq!(strings(&source.tokens()), vec!["PERMISO_Si"]);
    }

    #[test]
    fn test_top_level_array() {
        let source =
            PermissionSource::parse(r#"["PERMISO_A", "B", "PERMISO_C"]"#, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(strings(&source.tokens()), vec!["PERMISO_A", "PERMISO_C"]);
    }

    #[test]
    fn test_scalar_root_has_no_tokens() {
        let source = PermissionSource::parse(r#""PERMISO_A""#, DEFAULT_MAX_DEPTH).unwrap();
        assert!(source.tokens().is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let value = json!({"a": {"b": {"c": ["PERMISO_X"]}}});

        let ok = PermissionSource::decode(&value, 4).unwrap();
        assert_eq!(ok.depth(), 4);
        assert_eq!(ok.tokens().len(), 1);

        let err = PermissionSource::decode(&value, 3).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 3 }));
    }

    #[test]
    fn test_accepted_depth_never_exceeds_limit() {
        let mut value = json!(["PERMISO_Fondo"]);
        for level in 1..=6 {
            let limit = level;
            match PermissionSource::decode(&value, limit) {
                Ok(source) => assert!(source.depth() <= limit),
                Err(e) => panic!("depth {} rejected under limit {}: {}", level, limit, e),
            }
            assert!(PermissionSource::decode(&value, limit - 1).is_err());
            value = json!({ "k": value });
        }

        // 스칼라 루트는 컨테이너가 아니므로 한도 0에서도 통과
        assert!(PermissionSource::decode(&json!("x"), 0).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PermissionSource::parse("{\"a\": [", DEFAULT_MAX_DEPTH),
            Err(Error::Json(_))
        ));
    }
}
