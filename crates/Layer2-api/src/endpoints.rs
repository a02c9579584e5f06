//! Dashboard endpoint wrappers
//!
//! 목록 래퍼는 실패(네트워크, 2xx 아님, 디코드)를 `error!`로 남기고 빈 목록을 돌려준다.
//! 실패를 구분해야 하는 호출자는 `try_` 버전을 쓴다.
//!
//! 응답 형태:
//! - JSON 배열 → 그대로
//! - `{ "data": [...] }` → `data`
//! - 그 외 → 빈 목록

use crate::client::{ApiClient, HttpClient, Method};
use crate::error::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tablero_foundation::ApiConfig;
use tracing::{debug, error};

// ============================================================================
// Paths
// ============================================================================

pub const PATH_PRUEBAS: &str = "/api/obtenerPruebas";
pub const PATH_JUSTS_POR_SUPER: &str = "/api/obtenerJustsPorSuper";
pub const PATH_LISTA_JEFES: &str = "/api/obtenerListaJefes";
pub const PATH_CALENDARIO_JEFES: &str = "/api/obtenerSolicitudesCalendarioJefes";
pub const PATH_ENCUESTA: &str = "/api/encuesta";

/// 대시보드 API
#[derive(Clone)]
pub struct DashboardApi {
    client: Arc<dyn ApiClient>,
}

impl DashboardApi {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// reqwest 클라이언트로 생성
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpClient::from_config(config)?)))
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    // ========================================================================
    // obtenerPruebas
    // ========================================================================

    pub async fn try_obtener_pruebas(&self, id: &str) -> Result<Vec<Value>> {
        let path = format!("{}/{}", PATH_PRUEBAS, urlencoding::encode(id));
        self.fetch_list(Method::Get, &path, None).await
    }

    pub async fn obtener_pruebas(&self, id: &str) -> Vec<Value> {
        self.or_empty("obtenerPruebas", self.try_obtener_pruebas(id).await)
    }

    // ========================================================================
    // obtenerJustsPorSuper
    // ========================================================================

    pub async fn try_obtener_justs_por_super(&self, grupo: &str, cargo: &str) -> Result<Vec<Value>> {
        let body = json!({ "grupo": grupo, "cargo": cargo });
        self.fetch_list(Method::Post, PATH_JUSTS_POR_SUPER, Some(body))
            .await
    }

    pub async fn obtener_justs_por_super(&self, grupo: &str, cargo: &str) -> Vec<Value> {
        self.or_empty(
            "obtenerJustsPorSuper",
            self.try_obtener_justs_por_super(grupo, cargo).await,
        )
    }

    // ========================================================================
    // obtenerListaJefes
    // ========================================================================

    pub async fn try_obtener_lista_jefes(&self) -> Result<Vec<Value>> {
        self.fetch_list(Method::Get, PATH_LISTA_JEFES, None).await
    }

    pub async fn obtener_lista_jefes(&self) -> Vec<Value> {
        self.or_empty("obtenerListaJefes", self.try_obtener_lista_jefes().await)
    }

    // ========================================================================
    // obtenerSolicitudesCalendarioJefes
    // ========================================================================

    pub async fn try_obtener_solicitudes_calendario_jefes(&self) -> Result<Vec<Value>> {
        self.fetch_list(Method::Get, PATH_CALENDARIO_JEFES, None).await
    }

    pub async fn obtener_solicitudes_calendario_jefes(&self) -> Vec<Value> {
        self.or_empty(
            "obtenerSolicitudesCalendarioJefes",
            self.try_obtener_solicitudes_calendario_jefes().await,
        )
    }

    // ========================================================================
    // encuesta
    // ========================================================================

    /// 설문 상태 변경 (`PUT /api/encuesta/{id}`, body `{surveyState}`)
    pub async fn try_actualizar_encuesta(
        &self,
        survey_id: &str,
        state: impl Into<Value>,
    ) -> Result<Value> {
        let path = format!("{}/{}", PATH_ENCUESTA, urlencoding::encode(survey_id));
        let body = json!({ "surveyState": state.into() });
        self.client.request(Method::Put, &path, Some(body)).await
    }

    /// 실패 시 None
    pub async fn actualizar_encuesta(
        &self,
        survey_id: &str,
        state: impl Into<Value>,
    ) -> Option<Value> {
        match self.try_actualizar_encuesta(survey_id, state).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!(endpoint = "encuesta", survey_id, error = %e, "API request failed");
                None
            }
        }
    }

    // ========================================================================
    // Internal
    // ========================================================================

    async fn fetch_list(&self, method: Method, path: &str, body: Option<Value>) -> Result<Vec<Value>> {
        let value = self.client.request(method, path, body).await?;
        Ok(into_list(value))
    }

    fn or_empty(&self, endpoint: &str, result: Result<Vec<Value>>) -> Vec<Value> {
        match result {
            Ok(items) => {
                debug!(endpoint, count = items.len(), "API list fetched");
                items
            }
            Err(e) => {
                error!(
                    endpoint,
                    base_url = %self.client.base_url(),
                    error = %e,
                    "API request failed, using empty list"
                );
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for DashboardApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardApi")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

/// 응답 본문을 목록으로
pub fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// 요청을 기록하고 고정 응답을 돌려주는 클라이언트
    struct FakeClient {
        response: Result<Value>,
        requests: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl FakeClient {
        fn new(response: Result<Value>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> (Method, String, Option<Value>) {
            self.requests.lock().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ApiClient for FakeClient {
        async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
            self.requests.lock().push((method, path.to_string(), body));
            self.response.clone()
        }

        fn base_url(&self) -> &str {
            "fake://"
        }
    }

    #[test]
    fn test_into_list_shapes() {
        assert_eq!(into_list(json!([1, 2])), vec![json!(1), json!(2)]);
        assert_eq!(into_list(json!({"data": [{"a": 1}]})), vec![json!({"a": 1})]);
        assert!(into_list(json!({"data": "x"})).is_empty());
        assert!(into_list(json!({"rows": []})).is_empty());
        assert!(into_list(Value::Null).is_empty());
        assert!(into_list(json!("texto")).is_empty());
    }

    #[tokio::test]
    async fn test_lista_jefes_request() {
        let fake = FakeClient::new(Ok(json!([{"alias": "jefe1"}])));
        let api = DashboardApi::new(fake.clone());

        let jefes = api.obtener_lista_jefes().await;
        assert_eq!(jefes.len(), 1);
        assert_eq!(fake.last(), (Method::Get, PATH_LISTA_JEFES.to_string(), None));
    }

    #[tokio::test]
    async fn test_justs_por_super_body() {
        let fake = FakeClient::new(Ok(json!({"data": []})));
        let api = DashboardApi::new(fake.clone());

        assert!(api.obtener_justs_por_super("G1", "Supervisor").await.is_empty());
        let (method, path, body) = fake.last();
        assert_eq!(method, Method::Post);
        assert_eq!(path, PATH_JUSTS_POR_SUPER);
        assert_eq!(body, Some(json!({"grupo": "G1", "cargo": "Supervisor"})));
    }

    #[tokio::test]
    async fn test_pruebas_path_and_calendario() {
        let fake = FakeClient::new(Ok(json!([])));
        let api = DashboardApi::new(fake.clone());

        api.obtener_pruebas("42").await;
        assert_eq!(fake.last().1, "/api/obtenerPruebas/42");

        api.obtener_solicitudes_calendario_jefes().await;
        assert_eq!(fake.last().1, PATH_CALENDARIO_JEFES);

        // 경로 세그먼트는 인코딩
        api.obtener_pruebas("a b/c").await;
        assert_eq!(fake.last().1, "/api/obtenerPruebas/a%20b%2Fc");
        api.actualizar_encuesta("ñ", true).await;
        assert_eq!(fake.last().1, "/api/encuesta/%C3%B1");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_empty() {
        let fake = FakeClient::new(Err(ApiError::Status {
            status: 500,
            body: "boom".into(),
        }));
        let api = DashboardApi::new(fake);

        assert!(api.obtener_lista_jefes().await.is_empty());
        assert!(api.obtener_pruebas("1").await.is_empty());

        let err = api.try_obtener_lista_jefes().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_encuesta() {
        let fake = FakeClient::new(Ok(json!({"ok": true})));
        let api = DashboardApi::new(fake.clone());

        let result = api.actualizar_encuesta("7", "cerrada").await;
        assert_eq!(result, Some(json!({"ok": true})));
        assert_eq!(
            fake.last(),
            (
                Method::Put,
                "/api/encuesta/7".to_string(),
                Some(json!({"surveyState": "cerrada"}))
            )
        );

        let failing = DashboardApi::new(FakeClient::new(Err(ApiError::Network("refused".into()))));
        assert!(failing.actualizar_encuesta("7", true).await.is_none());
    }
}
