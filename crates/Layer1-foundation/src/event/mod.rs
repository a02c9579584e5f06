//! Event System - 저장소 변경 이벤트 발행/구독
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  KeyValueStore::set / remove / clear                     │
//! │         │                                                │
//! │         ▼                                                │
//! │  StorageEventBus::publish(StorageEvent)                  │
//! │         │                                                │
//! │  ┌──────┴───────────┬──────────────────┐                 │
//! │  ▼                  ▼                  ▼                 │
//! │  AccessSync    PermissionsSync    broadcast::Receiver    │
//! │  (동기 리스너)   (동기 리스너)       (비동기 watch)        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod bus;
pub mod types;

pub use bus::{EventBusConfig, EventFilter, ListenerId, StorageEventBus, StorageListener};
pub use types::{EventId, StorageEvent};
