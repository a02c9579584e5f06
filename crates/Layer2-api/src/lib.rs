//! # tablero-api
//!
//! 대시보드 백엔드 HTTP 래퍼:
//! - `ApiClient`: 전송 계층 trait (기본: reqwest `HttpClient`)
//! - `DashboardApi`: 엔드포인트별 래퍼 (실패 시 로그 + 빈 목록, `try_` 버전은 Result)
//! - `ApiError`: Network / Status / Decode

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{ApiClient, HttpClient, Method};
pub use endpoints::{
    into_list, DashboardApi, PATH_CALENDARIO_JEFES, PATH_ENCUESTA, PATH_JUSTS_POR_SUPER,
    PATH_LISTA_JEFES, PATH_PRUEBAS,
};
pub use error::{ApiError, Result};
