//! Tablero CLI commands
//!
//! 각 명령은 출력할 문자열을 돌려준다. 출력과 종료 코드는 main이 결정한다.

use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tablero_access::{
    AccessOptions, AccessState, AccessSync, GuardDecision, HomeRedirect, HomeRoute, RouteGuard,
};
use tablero_api::DashboardApi;
use tablero_foundation::{
    Activity, ActivityLog, ConfigDir, FileStore, KeyValueStore, TableroConfig,
};
use tracing::debug;

/// 명령 실행 컨텍스트 (설정 + 파일 저장소)
pub struct App {
    config: TableroConfig,
    store: Arc<FileStore>,
}

impl App {
    /// `--store`가 없으면 프로젝트 디렉토리의 `storage.file`
    pub fn open(config: TableroConfig, store_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = match store_path {
            Some(path) => path,
            None => ConfigDir::current_project()?.path(&config.storage.file),
        };
        let store = FileStore::open(path.clone())
            .with_context(|| format!("Failed to open store {}", path.display()))?;
        debug!(path = %path.display(), "Opened store");

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    // ========================================================================
    // Config
    // ========================================================================

    pub fn config(&self) -> &TableroConfig {
        &self.config
    }

    /// 현재 적용 중인 설정 JSON
    pub fn config_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }

    /// 현재 설정을 파일로 저장 (`global`이면 `~/.config/tablero/`, 아니면 `.tablero/`)
    pub fn save_config(&self, global: bool) -> anyhow::Result<PathBuf> {
        let path = if global {
            self.config.save_global()?
        } else {
            self.config.save_project()?
        };
        Ok(path)
    }

    pub fn save_config_to(&self, dir: &ConfigDir) -> anyhow::Result<PathBuf> {
        Ok(self.config.save_to(dir)?)
    }

    // ========================================================================
    // Access
    // ========================================================================

    fn access(&self) -> Arc<AccessSync> {
        let sync = AccessSync::new(self.store.clone(), AccessOptions::from_config(&self.config));
        sync.mount();
        sync
    }

    /// 접근 스냅샷 JSON
    pub fn snapshot(&self) -> anyhow::Result<String> {
        let state = self.access().state();
        Ok(serde_json::to_string_pretty(&state)?)
    }

    /// 가드 판정
    pub fn check(&self, guard: RouteGuard) -> GuardDecision {
        let guard = guard.with_routes(&self.config.routes);
        guard.check(&*self.access())
    }

    /// 시작 화면
    pub fn home(&self) -> HomeRoute {
        HomeRedirect::new(self.config.routes.clone()).resolve(&self.access().state())
    }

    pub fn state(&self) -> AccessState {
        self.access().state()
    }

    // ========================================================================
    // Store
    // ========================================================================

    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.store.set(key, value)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let existed = self.store.contains(key);
        self.store.remove(key)?;
        Ok(existed)
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    // ========================================================================
    // Activity
    // ========================================================================

    fn activity_log(&self) -> ActivityLog {
        ActivityLog::new(self.config.activity.cap)
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.activity_log().recent(&*self.store)
    }

    pub fn record_activity(&self, title: &str, route: &str) -> anyhow::Result<Vec<Activity>> {
        Ok(self
            .activity_log()
            .record(&*self.store, Activity::new(title, route))?)
    }

    // ========================================================================
    // API
    // ========================================================================

    pub fn api(&self) -> anyhow::Result<DashboardApi> {
        Ok(DashboardApi::from_config(&self.config.api)?)
    }
}

/// 가드 판정 한 줄 표현
pub fn render_decision(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Allow => "allow".to_string(),
        GuardDecision::Deny { redirect } => format!("deny -> {}", redirect),
        GuardDecision::Pending => "pending".to_string(),
    }
}

/// 시작 화면 한 줄 표현
pub fn render_home(home: &HomeRoute) -> String {
    home.route().unwrap_or("pending").to_string()
}

/// 활동 목록 표
pub fn render_activities(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No recent activity.".to_string();
    }

    let mut out = format!("{:<25} {:<30} {}\n", "Time", "Title", "Route");
    out.push_str(&"-".repeat(70));
    for activity in activities {
        let title = if activity.title.chars().count() > 28 {
            format!("{}...", activity.title.chars().take(25).collect::<String>())
        } else {
            activity.title.clone()
        };
        out.push_str(&format!(
            "\n{:<25} {:<30} {}",
            activity.timestamp.format("%Y-%m-%d %H:%M:%S"),
            title,
            activity.route
        ));
    }
    out
}

pub fn render_json(value: &Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
