//! 최근 활동 기록 (`actividadesRecientes`)
//!
//! 최신 항목이 앞에 오는 JSON 배열. 같은 경로의 이전 항목은 새 항목으로 대체되고,
//! 목록은 상한을 넘지 않는다.

use crate::storage::{keys, read_json, write_json, KeyValueStore};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 기본 보관 개수
pub const DEFAULT_ACTIVITY_CAP: usize = 10;

/// 활동 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// 표시 제목
    pub title: String,

    /// 이동 경로
    pub route: String,

    /// 기록 시각
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn new(title: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            route: route.into(),
            timestamp: Utc::now(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Activity title is empty".to_string()));
        }
        if self.route.trim().is_empty() {
            return Err(Error::Validation("Activity route is empty".to_string()));
        }
        Ok(())
    }
}

/// 최근 활동 저장소
#[derive(Debug, Clone)]
pub struct ActivityLog {
    cap: usize,
}

impl ActivityLog {
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1) }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// 최근 활동 목록 (없거나 손상되면 빈 목록)
    pub fn recent(&self, store: &dyn KeyValueStore) -> Vec<Activity> {
        match read_json::<Vec<Activity>>(store, keys::ACTIVIDADES_RECIENTES) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Unreadable recent activity list, treating as empty");
                Vec::new()
            }
        }
    }

    /// 활동 기록
    pub fn record(&self, store: &dyn KeyValueStore, activity: Activity) -> Result<Vec<Activity>> {
        activity.validate()?;

        let mut list = self.recent(store);
        list.retain(|a| a.route != activity.route);
        list.insert(0, activity);
        list.truncate(self.cap);

        write_json(store, keys::ACTIVIDADES_RECIENTES, &list)?;
        debug!(count = list.len(), "Recorded recent activity");
        Ok(list)
    }

    /// 기록 삭제
    pub fn clear(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.remove(keys::ACTIVIDADES_RECIENTES)
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAP)
    }
}
