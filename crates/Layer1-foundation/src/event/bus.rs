//! Storage Event Bus - 저장소 변경 브로드캐스트
//!
//! 저장소 쓰기 한 번당 이벤트 하나를 발행한다. 리스너는 발행 순서대로,
//! 발행한 스레드에서 동기적으로 호출된다. 비동기 소비자는 `receiver()`로
//! broadcast 채널을 구독한다.

use super::types::StorageEvent;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

// ============================================================================
// StorageListener Trait
// ============================================================================

/// 리스너 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// 저장소 이벤트 리스너
///
/// `on_event`는 발행 스레드에서 끝까지 실행된 뒤 다음 리스너로 넘어간다.
pub trait StorageListener: Send + Sync {
    /// 리스너 이름 (디버깅용)
    fn name(&self) -> &str;

    /// 이벤트 처리
    fn on_event(&self, event: &StorageEvent);
}

// ============================================================================
// EventFilter
// ============================================================================

/// 이벤트 필터
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// 키 필터 (clear 이벤트는 항상 통과)
    pub keys: Option<Vec<String>>,
}

impl EventFilter {
    /// 새 필터 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 키 필터 추가
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// 이벤트가 필터를 통과하는지 확인
    pub fn matches(&self, event: &StorageEvent) -> bool {
        match (&self.keys, &event.key) {
            (Some(keys), Some(key)) => keys.contains(key),
            _ => true,
        }
    }
}

// ============================================================================
// StorageEventBus
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,

    /// 이벤트 히스토리 보관 개수
    pub history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_size: 100,
        }
    }
}

/// 등록된 리스너 정보
struct RegisteredListener {
    listener: Arc<dyn StorageListener>,
    filter: Option<EventFilter>,
}

/// 저장소 이벤트 버스
///
/// ```ignore
/// let bus = StorageEventBus::new();
/// let id = bus.subscribe(listener);
/// bus.publish(StorageEvent::changed("alias", None, Some("jperez".into())));
/// bus.unsubscribe(id);
/// ```
pub struct StorageEventBus {
    /// 설정
    config: EventBusConfig,

    /// 브로드캐스트 채널 송신자
    sender: broadcast::Sender<StorageEvent>,

    /// 등록된 리스너
    listeners: RwLock<HashMap<ListenerId, RegisteredListener>>,

    /// 리스너 ID 카운터
    listener_counter: AtomicU64,

    /// 이벤트 히스토리
    history: RwLock<VecDeque<StorageEvent>>,

    /// 발행된 이벤트 수
    event_count: AtomicU64,
}

impl StorageEventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));

        Self {
            config,
            sender,
            listeners: RwLock::new(HashMap::new()),
            listener_counter: AtomicU64::new(0),
            history: RwLock::new(VecDeque::new()),
            event_count: AtomicU64::new(0),
        }
    }

    /// 리스너 등록
    pub fn subscribe(&self, listener: Arc<dyn StorageListener>) -> ListenerId {
        self.subscribe_with_filter(listener, None)
    }

    /// 필터와 함께 리스너 등록
    pub fn subscribe_with_filter(
        &self,
        listener: Arc<dyn StorageListener>,
        filter: Option<EventFilter>,
    ) -> ListenerId {
        let id = ListenerId::new(self.listener_counter.fetch_add(1, Ordering::SeqCst));

        debug!(
            listener_name = listener.name(),
            listener_id = %id,
            "Registering storage listener"
        );

        self.listeners
            .write()
            .insert(id, RegisteredListener { listener, filter });

        id
    }

    /// 리스너 해제
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.listeners.write().remove(&id).is_some();

        if removed {
            debug!(listener_id = %id, "Unregistered storage listener");
        }

        removed
    }

    /// 이벤트 발행
    ///
    /// 호출자는 저장소 락을 놓은 뒤 발행해야 한다. 리스너가 저장소를 다시 읽는다.
    pub fn publish(&self, event: StorageEvent) {
        let event_count = self.event_count.fetch_add(1, Ordering::SeqCst);

        trace!(
            event_id = %event.id,
            key = ?event.key,
            source = %event.source,
            "Publishing storage event #{}", event_count + 1
        );

        {
            let mut history = self.history.write();
            history.push_back(event.clone());
            while history.len() > self.config.history_size {
                history.pop_front();
            }
        }

        // 수신자가 없으면 Err - 무시
        let _ = self.sender.send(event.clone());

        // 리스너 호출 중 subscribe/unsubscribe가 가능하도록 락 밖에서 전달
        let targets: Vec<(ListenerId, Arc<dyn StorageListener>)> = {
            let listeners = self.listeners.read();
            let mut targets: Vec<_> = listeners
                .iter()
                .filter(|(_, registered)| {
                    registered
                        .filter
                        .as_ref()
                        .map_or(true, |filter| filter.matches(&event))
                })
                .map(|(id, registered)| (*id, registered.listener.clone()))
                .collect();
            targets.sort_by_key(|(id, _)| id.0);
            targets
        };

        for (id, listener) in targets {
            trace!(
                listener_id = %id,
                listener_name = listener.name(),
                key = ?event.key,
                "Delivering storage event"
            );
            listener.on_event(&event);
        }
    }

    /// 브로드캐스트 수신자 생성 (스트림 방식)
    pub fn receiver(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }

    /// 최근 이벤트 히스토리 조회 (최신 순)
    pub fn history(&self, limit: Option<usize>) -> Vec<StorageEvent> {
        let history = self.history.read();
        let limit = limit.unwrap_or(history.len());
        history.iter().rev().take(limit).cloned().collect()
    }

    /// 등록된 리스너 수
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// 총 발행된 이벤트 수
    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::SeqCst)
    }

    /// 히스토리 클리어
    pub fn clear_history(&self) {
        self.history.write().clear();
    }
}

impl Default for StorageEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StorageEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEventBus")
            .field("config", &self.config)
            .field("listeners", &self.listener_count())
            .field("event_count", &self.event_count())
            .finish()
    }
}

// ============================================================================
// 테스트
// ============================================================================
