//! Permission model for Tablero
//!
//! - `token`: 권한 토큰 (`PERMISO_` 접두어)과 토큰 집합
//! - `source`: 모양이 정해지지 않은 권한 JSON을 태그 트리로 디코드 + 추출
//! - `admin`: 아홉 토큰 기반 관리자 판정
//! - `reader`: 저장소에서 읽기 (실패는 빈 집합)
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use tablero_foundation::permission::{extract_permissions, is_admin};
//!
//! let permissions = extract_permissions(&store);
//! if permissions.has_module("Pagos") {
//!     // Pagos 화면 표시
//! }
//! let admin = is_admin(&permissions);
//! ```

mod admin;
mod reader;
mod source;
mod token;

pub use admin::{admin_tokens, is_admin, missing_admin_tokens, AdminTriple, ADMIN_TRIPLES};
pub use reader::{extract_permissions, PermissionReader};
pub use source::{PermissionSource, DEFAULT_MAX_DEPTH};
pub use token::{PermissionSet, PermissionToken, PERMISSION_PREFIX};
