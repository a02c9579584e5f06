//! Tablero Config - 통합 설정
//!
//! 글로벌(`~/.config/tablero/config.json`) + 프로젝트(`.tablero/config.json`) 병합,
//! 마지막으로 환경 변수 오버라이드.

use crate::activity::DEFAULT_ACTIVITY_CAP;
use crate::permission::DEFAULT_MAX_DEPTH;
use super::dir::ConfigDir;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// 설정 파일명
pub const TABLERO_CONFIG_FILE: &str = "config.json";

/// API base URL 오버라이드 환경 변수
pub const ENV_API_URL: &str = "TABLERO_API_URL";

// ============================================================================
// Tablero Config (통합)
// ============================================================================

/// Tablero 통합 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableroConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// API 설정
    #[serde(default)]
    pub api: ApiConfig,

    /// 접근 제어 설정
    #[serde(default)]
    pub access: AccessConfig,

    /// 경로 설정
    #[serde(default)]
    pub routes: RoutesConfig,

    /// 최근 활동 설정
    #[serde(default)]
    pub activity: ActivityConfig,

    /// 세션 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for TableroConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            access: AccessConfig::default(),
            routes: RoutesConfig::default(),
            activity: ActivityConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl TableroConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드 + 환경 변수
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = ConfigDir::global() {
            if let Some(global_config) = global.read::<TableroConfig>(TABLERO_CONFIG_FILE)? {
                debug!(path = %global.path(TABLERO_CONFIG_FILE).display(), "Loaded global config");
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = ConfigDir::current_project() {
            if let Some(project_config) = project.read::<TableroConfig>(TABLERO_CONFIG_FILE)? {
                debug!(path = %project.path(TABLERO_CONFIG_FILE).display(), "Loaded project config");
                config.merge(project_config);
            }
        }

        // 3. 환경 변수
        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// 특정 디렉토리에서만 로드 (환경 변수 미적용)
    pub fn load_from(dir: &ConfigDir) -> Result<Self> {
        let mut config = Self::new();
        if let Some(loaded) = dir.read::<TableroConfig>(TABLERO_CONFIG_FILE)? {
            config.merge(loaded);
        }
        config.validate()?;
        Ok(config)
    }

    /// 검증 후 `config.json`으로 저장, 쓴 경로 반환
    pub fn save_to(&self, dir: &ConfigDir) -> Result<PathBuf> {
        self.validate()?;
        let path = dir.write(TABLERO_CONFIG_FILE, self)?;
        debug!(path = %path.display(), "Saved config");
        Ok(path)
    }

    /// 글로벌 설정 저장
    pub fn save_global(&self) -> Result<PathBuf> {
        self.save_to(&ConfigDir::global()?)
    }

    /// 프로젝트 설정 저장
    pub fn save_project(&self) -> Result<PathBuf> {
        self.save_to(&ConfigDir::current_project()?)
    }

    /// 환경 변수 적용
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.baseUrl must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeoutSecs must be positive".to_string()));
        }
        if self.access.max_depth == 0 {
            return Err(Error::Config("access.maxDepth must be positive".to_string()));
        }
        for module in &self.routes.modules {
            if module.module.trim().is_empty() || module.route.trim().is_empty() {
                return Err(Error::Config(
                    "routes.modules entries need a module and a route".to_string(),
                ));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: TableroConfig) {
        self.version = self.version.max(other.version);
        self.api.merge(other.api);
        self.access.merge(other.access);
        self.routes.merge(other.routes);
        self.activity.merge(other.activity);
        self.storage.merge(other.storage);
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn speech_admin(mut self, alias: impl Into<String>) -> Self {
        self.access.speech_admins.push(alias.into());
        self
    }
}

// ============================================================================
// API Config
// ============================================================================

/// 원격 API 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    fn merge(&mut self, other: ApiConfig) {
        if other.base_url != default_base_url() {
            self.base_url = other.base_url;
        }
        if other.timeout_secs != default_timeout_secs() {
            self.timeout_secs = other.timeout_secs;
        }
    }
}

// ============================================================================
// Access Config
// ============================================================================

/// 접근 제어 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    /// 권한 소스의 최대 컨테이너(객체/배열) 단계 수
    ///
    /// `["PERMISO_A"]`는 1단계, `{"a": ["PERMISO_A"]}`는 2단계.
    /// 이보다 깊은 소스는 통째로 거부되어 권한 없음으로 취급된다.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// 관리자가 아니어도 speech 필터를 쓸 수 있는 alias 목록
    #[serde(default)]
    pub speech_admins: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            speech_admins: Vec::new(),
        }
    }
}

impl AccessConfig {
    fn merge(&mut self, other: AccessConfig) {
        if other.max_depth != default_max_depth() {
            self.max_depth = other.max_depth;
        }
        for alias in other.speech_admins {
            if !self.speech_admins.contains(&alias) {
                self.speech_admins.push(alias);
            }
        }
    }
}

// ============================================================================
// Routes Config
// ============================================================================

/// 모듈별 시작 경로
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRoute {
    /// 모듈 이름 (`PERMISO_<module>`)
    pub module: String,

    /// 경로
    pub route: String,
}

impl ModuleRoute {
    pub fn new(module: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            route: route.into(),
        }
    }
}

/// 경로 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesConfig {
    /// 로그인 경로 (alias 없음)
    #[serde(default = "default_login_route")]
    pub login: String,

    /// speech analytics 대시보드 (관리자/필터 사용자)
    #[serde(default = "default_speech_dashboard_route")]
    pub speech_dashboard: String,

    /// 접근 가능한 화면이 없을 때
    #[serde(default = "default_no_access_route")]
    pub no_access: String,

    /// 모듈 순서대로의 시작 경로
    #[serde(default = "default_module_routes")]
    pub modules: Vec<ModuleRoute>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login_route(),
            speech_dashboard: default_speech_dashboard_route(),
            no_access: default_no_access_route(),
            modules: default_module_routes(),
        }
    }
}

impl RoutesConfig {
    fn merge(&mut self, other: RoutesConfig) {
        if other.login != default_login_route() {
            self.login = other.login;
        }
        if other.speech_dashboard != default_speech_dashboard_route() {
            self.speech_dashboard = other.speech_dashboard;
        }
        if other.no_access != default_no_access_route() {
            self.no_access = other.no_access;
        }
        if other.modules != default_module_routes() {
            self.modules = other.modules;
        }
    }
}

// ============================================================================
// Activity / Storage Config
// ============================================================================

/// 최근 활동 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityConfig {
    /// 보관 개수
    #[serde(default = "default_activity_cap")]
    pub cap: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            cap: default_activity_cap(),
        }
    }
}

impl ActivityConfig {
    fn merge(&mut self, other: ActivityConfig) {
        if other.cap != default_activity_cap() {
            self.cap = other.cap;
        }
    }
}

/// 세션 저장소 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// 저장소 파일 이름 (프로젝트 디렉토리 기준)
    #[serde(default = "default_storage_file")]
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_storage_file(),
        }
    }
}

impl StorageConfig {
    fn merge(&mut self, other: StorageConfig) {
        if other.file != default_storage_file() {
            self.file = other.file;
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn default_version() -> u32 {
    1
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_speech_dashboard_route() -> String {
    "/speech/dashboard".to_string()
}

fn default_no_access_route() -> String {
    "/sin-acceso".to_string()
}

fn default_module_routes() -> Vec<ModuleRoute> {
    vec![
        ModuleRoute::new("Speech", "/speech"),
        ModuleRoute::new("Pagos", "/pagos"),
        ModuleRoute::new("Calidad", "/calidad"),
        ModuleRoute::new("Reclamos", "/reclamos"),
    ]
}

fn default_activity_cap() -> usize {
    DEFAULT_ACTIVITY_CAP
}

fn default_storage_file() -> String {
    "storage.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = TableroConfig::new();
        assert_eq!(config.version, 1);
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.access.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.routes.modules[1], ModuleRoute::new("Pagos", "/pagos"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TableroConfig =
            serde_json::from_str(r#"{"api": {"baseUrl": "https://tablero.local"}}"#).unwrap();
        assert_eq!(config.api.base_url, "https://tablero.local");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.routes.login, "/login");
    }

    #[test]
    fn test_config_merge() {
        let mut base = TableroConfig::new().base_url("http://global:3000").speech_admin("jperez");

        let overlay: TableroConfig = serde_json::from_str(
            r#"{
                "access": {"speechAdmins": ["mgomez", "jperez"]},
                "routes": {"modules": [{"module": "Calidad", "route": "/qa"}]}
            }"#,
        )
        .unwrap();

        base.merge(overlay);

        assert_eq!(base.api.base_url, "http://global:3000");
        assert_eq!(base.access.speech_admins, vec!["jperez", "mgomez"]);
        assert_eq!(base.routes.modules, vec![ModuleRoute::new("Calidad", "/qa")]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TableroConfig::new();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = TableroConfig::new();
        config.routes.modules.push(ModuleRoute::new("", "/x"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_to_then_load_from() {
        let root = tempdir().unwrap();
        let dir = ConfigDir::project(root.path());

        // 파일 없음 → 기본값
        assert_eq!(TableroConfig::load_from(&dir).unwrap(), TableroConfig::new());

        let config = TableroConfig::new().base_url("http://saved:8080");
        let path = config.save_to(&dir).unwrap();
        assert_eq!(path, root.path().join(".tablero").join(TABLERO_CONFIG_FILE));

        let loaded = TableroConfig::load_from(&dir).unwrap();
        assert_eq!(loaded.api.base_url, "http://saved:8080");
    }

    #[test]
    fn test_save_to_rejects_invalid() {
        let root = tempdir().unwrap();
        let dir = ConfigDir::new(root.path());

        let mut config = TableroConfig::new();
        config.access.max_depth = 0;
        assert!(config.save_to(&dir).is_err());
        assert_eq!(dir.read::<TableroConfig>(TABLERO_CONFIG_FILE).unwrap(), None);
    }
}
