//! # tablero-access
//!
//! 접근 제어 레이어:
//! - Identity: 저장소에서 alias 해석
//! - Snapshot: alias + 권한 + 관리자 여부 (`AccessState::Unknown`으로 시작)
//! - Sync: 저장소 이벤트로 스냅샷 재계산
//! - Guard: 모듈/정확 권한/관리자 가드
//! - Redirect: 시작 화면 선택
//!
//! ```text
//! KeyValueStore ──events──▶ AccessSync ──AccessState──▶ RouteGuard / HomeRedirect
//! ```

pub mod guard;
pub mod identity;
pub mod redirect;
pub mod snapshot;
pub mod sync;

pub use guard::{GuardDecision, Requirement, RouteGuard};
pub use identity::resolve_alias;
pub use redirect::{HomeRedirect, HomeRoute};
pub use snapshot::{AccessProvider, AccessSnapshot, AccessState};
pub use sync::{AccessOptions, AccessSync, SyncMode};
