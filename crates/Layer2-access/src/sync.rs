//! Access snapshot 동기화
//!
//! 상태는 *stale*/*fresh* 두 가지뿐이고, 저장소 접근이 동기이므로 재계산 한 번으로
//! 합쳐진다. 트리거는 마운트와 저장소 변경 이벤트:
//! - `SyncMode::Access`: `alias`, `user`, `permisos` 키 (또는 clear)
//! - `SyncMode::PermissionsOnly`: 모든 이벤트
//!
//! 재계산은 상태 락을 잡은 채 끝까지 실행되므로 다른 읽기는 중간 상태를 보지 않는다.

use crate::identity::resolve_alias;
use crate::snapshot::{AccessProvider, AccessSnapshot, AccessState};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tablero_foundation::{
    keys, EventFilter, KeyValueStore, ListenerId, PermissionReader, StorageEvent,
    StorageListener, TableroConfig,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, trace, warn};

/// 재계산 트리거 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// alias/user/permisos 변경에만 반응
    Access,
    /// 모든 저장소 이벤트에 반응
    PermissionsOnly,
}

/// 동기화 옵션
#[derive(Debug, Clone, Default)]
pub struct AccessOptions {
    /// 권한 읽기 설정
    pub reader: PermissionReader,

    /// speech 필터 허용 alias
    pub speech_admins: Vec<String>,
}

impl AccessOptions {
    pub fn from_config(config: &TableroConfig) -> Self {
        Self {
            reader: PermissionReader::new().with_max_depth(config.access.max_depth),
            speech_admins: config.access.speech_admins.clone(),
        }
    }
}

/// 접근 상태 동기화기
pub struct AccessSync {
    store: Arc<dyn KeyValueStore>,
    options: AccessOptions,
    mode: SyncMode,
    state: RwLock<AccessState>,
    listener: Mutex<Option<ListenerId>>,
    generation: AtomicU64,
}

impl AccessSync {
    /// alias/user/permisos 변경에 반응하는 동기화기
    pub fn new(store: Arc<dyn KeyValueStore>, options: AccessOptions) -> Arc<Self> {
        Self::with_mode(store, options, SyncMode::Access)
    }

    /// 모든 변경에 반응하는 동기화기
    pub fn permissions_only(store: Arc<dyn KeyValueStore>, options: AccessOptions) -> Arc<Self> {
        Self::with_mode(store, options, SyncMode::PermissionsOnly)
    }

    pub fn with_mode(
        store: Arc<dyn KeyValueStore>,
        options: AccessOptions,
        mode: SyncMode,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            options,
            mode,
            state: RwLock::new(AccessState::Unknown),
            listener: Mutex::new(None),
            generation: AtomicU64::new(0),
        })
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    // ========================================================================
    // 마운트
    // ========================================================================

    /// 저장소 이벤트 구독 후 첫 동기화
    ///
    /// 구독이 먼저라서 첫 동기화 도중의 쓰기도 이벤트로 다시 반영된다.
    /// 이미 마운트되어 있으면 기존 리스너 ID를 반환한다.
    pub fn mount(self: &Arc<Self>) -> ListenerId {
        let mut listener = self.listener.lock();
        if let Some(id) = *listener {
            return id;
        }

        let filter = match self.mode {
            SyncMode::Access => Some(EventFilter::new().with_keys(keys::ACCESS_KEYS)),
            SyncMode::PermissionsOnly => None,
        };
        let adapter = Arc::new(SyncListener {
            name: format!("access-sync:{:?}", self.mode),
            target: Arc::downgrade(self),
        });
        let id = self.store.events().subscribe_with_filter(adapter, filter);
        *listener = Some(id);

        self.sync();

        debug!(listener_id = %id, mode = ?self.mode, "Mounted access sync");
        id
    }

    /// 구독 해제 (상태는 유지)
    pub fn unmount(&self) -> bool {
        match self.listener.lock().take() {
            Some(id) => self.store.events().unsubscribe(id),
            None => false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.lock().is_some()
    }

    // ========================================================================
    // 재계산
    // ========================================================================

    /// 저장소에서 스냅샷 재계산
    pub fn sync(&self) -> AccessSnapshot {
        let mut state = self.state.write();

        let permissions = self.options.reader.read(self.store.as_ref());
        let alias = resolve_alias(self.store.as_ref());
        let snapshot = AccessSnapshot::compute(alias, permissions, &self.options.speech_admins);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(
            generation,
            alias = ?snapshot.alias,
            permissions = snapshot.permissions.len(),
            is_admin = snapshot.is_admin,
            "Recomputed access snapshot"
        );

        *state = AccessState::Loaded(snapshot.clone());
        snapshot
    }

    /// 이 이벤트가 재계산을 일으키는지
    pub fn should_resync(&self, event: &StorageEvent) -> bool {
        match self.mode {
            SyncMode::Access => event.affects(&keys::ACCESS_KEYS),
            SyncMode::PermissionsOnly => true,
        }
    }

    /// 이벤트 처리 (재계산했으면 true)
    pub fn handle_event(&self, event: &StorageEvent) -> bool {
        if !self.should_resync(event) {
            return false;
        }

        let before = self.state.read().snapshot().map(|s| s.permissions.len());
        let snapshot = self.sync();
        if before != Some(snapshot.permissions.len()) {
            info!(
                key = ?event.key,
                permissions = snapshot.permissions.len(),
                "Access permissions changed"
            );
        }
        true
    }

    /// broadcast 수신자로 이벤트 처리 (채널이 닫힐 때까지)
    ///
    /// 밀린 이벤트(Lagged)가 있으면 무엇이 바뀌었는지 알 수 없으므로 전체 재계산한다.
    pub async fn watch(self: Arc<Self>, mut events: broadcast::Receiver<StorageEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(&event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Storage events lagged, resyncing access snapshot");
                    self.sync();
                }
                Err(RecvError::Closed) => {
                    debug!("Storage event channel closed");
                    break;
                }
            }
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 현재 상태
    pub fn state(&self) -> AccessState {
        self.state.read().clone()
    }

    /// 현재 스냅샷 (첫 동기화 전이면 None)
    pub fn snapshot(&self) -> Option<AccessSnapshot> {
        self.state.read().snapshot().cloned()
    }

    /// 재계산 횟수
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl AccessProvider for AccessSync {
    fn access_state(&self) -> AccessState {
        self.state()
    }
}

impl std::fmt::Debug for AccessSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessSync")
            .field("mode", &self.mode)
            .field("mounted", &self.is_mounted())
            .field("generation", &self.generation())
            .finish()
    }
}

impl Drop for AccessSync {
    fn drop(&mut self) {
        if let Some(id) = self.listener.get_mut().take() {
            self.store.events().unsubscribe(id);
        }
    }
}

/// 버스에 등록되는 어댑터 (저장소 ↔ 동기화기 순환 참조 방지)
struct SyncListener {
    name: String,
    target: Weak<AccessSync>,
}

impl StorageListener for SyncListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &StorageEvent) {
        if let Some(sync) = self.target.upgrade() {
            sync.handle_event(event);
        }
    }
}
