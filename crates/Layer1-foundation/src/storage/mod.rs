//! Storage module for Tablero
//!
//! - `kv`: KeyValueStore trait - local storage 모델 (키 + 변경 이벤트)
//! - `memory`: MemoryStore - 테스트/임베딩용
//! - `file`: FileStore - JSON 파일 기반 (CLI 세션 저장소)

mod file;
pub mod kv;
mod memory;

// Key-value (세션 데이터)
pub use file::FileStore;
pub use kv::{keys, read_json, write_json, KeyValueStore};
pub use memory::MemoryStore;
