//! # tablero-foundation
//!
//! Foundation layer for Tablero:
//! - Storage: KeyValueStore (local storage 모델), MemoryStore, FileStore
//! - Event: 저장소 변경 이벤트 버스
//! - Permission: 권한 토큰 추출 + 관리자 판정
//! - Activity: 최근 활동 기록
//! - Config: 통합 설정 (TableroConfig, ConfigDir)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  login flow (외부)  ──set──▶  KeyValueStore              │
//! │                               │  permisos / alias / user │
//! │                               ▼                         │
//! │                        StorageEventBus                  │
//! │                               │                         │
//! │          ┌────────────────────┴──────────┐              │
//! │          ▼                               ▼              │
//! │   PermissionReader ──▶ PermissionSet ──▶ is_admin        │
//! │   (tablero-access: AccessSync, guards, home redirect)   │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod activity;
pub mod config;
pub mod error;
pub mod event;
pub mod permission;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    AccessConfig, ActivityConfig, ApiConfig, ConfigDir, ModuleRoute, RoutesConfig,
    StorageConfig, TableroConfig, TABLERO_CONFIG_FILE,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{
    keys, read_json, write_json, FileStore, KeyValueStore, MemoryStore,
};

// ============================================================================
// Event (저장소 이벤트)
// ============================================================================
pub use event::{
    EventBusConfig, EventFilter, EventId, ListenerId, StorageEvent, StorageEventBus,
    StorageListener,
};

// ============================================================================
// Permission (권한)
// ============================================================================
pub use permission::{
    extract_permissions, is_admin, missing_admin_tokens, PermissionReader, PermissionSet,
    PermissionSource, PermissionToken, ADMIN_TRIPLES, PERMISSION_PREFIX,
};

// ============================================================================
// Activity (최근 활동)
// ============================================================================
pub use activity::{Activity, ActivityLog, DEFAULT_ACTIVITY_CAP};
