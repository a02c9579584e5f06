//! Config - 통합 설정 관리
//!
//! - `dir.rs` - ConfigDir (글로벌/프로젝트 설정 디렉토리)
//! - `tablero.rs` - TableroConfig (api, access, routes, activity, storage)

mod dir;
mod tablero;

pub use dir::ConfigDir;
pub use tablero::{
    AccessConfig, ActivityConfig, ApiConfig, ModuleRoute, RoutesConfig, StorageConfig,
    TableroConfig, ENV_API_URL, TABLERO_CONFIG_FILE,
};
