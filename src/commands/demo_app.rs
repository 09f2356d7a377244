//! Intentionally vulnerable demo target for the security review pipeline.
//!
//! WARNING: DO NOT USE IN PRODUCTION.

use crate::config::AppConfig;
use crate::models::RowDump;
use crate::services::Database;
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct AppState {
    pub database: PathBuf,
    pub debug: bool,
}

impl From<&AppConfig> for AppState {
    fn from(config: &AppConfig) -> Self {
        Self {
            database: config.database.clone(),
            debug: config.debug,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user", get(get_user))
        .with_state(Arc::new(state))
}

/// 按 id 查询用户
///
/// 连接在每个请求内打开，请求结束即关闭。
async fn get_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let user_id = first_param(&params, "id").unwrap_or_default();

    // INTENTIONAL VULNERABILITY: SQL injection.
    // The id is spliced straight into the statement text.
    let sql = format!("SELECT * FROM users WHERE id = {}", user_id);

    let db_path = state.database.clone();
    let query = sql.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<RowDump> {
        let db = Database::new(&db_path)?;
        let row = db.query_first_row(&query)?;
        db.close()?;
        Ok(row)
    })
    .await;

    match result {
        // INTENTIONAL BAD PRACTICE: the raw row goes back to the caller.
        Ok(Ok(row)) => (StatusCode::OK, row.to_string()).into_response(),
        Ok(Err(e)) => internal_error(&state, &sql, &format!("{:#}", e)),
        Err(e) => internal_error(&state, &sql, &e.to_string()),
    }
}

/// 参数重复时取第一个值
fn first_param(params: &[(String, String)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

/// 调试模式下把错误原文和 SQL 一起返回
fn internal_error(state: &AppState, sql: &str, detail: &str) -> Response {
    log::error!("Query failed: {} ({})", detail, sql);

    let body = if state.debug {
        format!("{}\n\nQuery: {}", detail, sql)
    } else {
        "Internal Server Error".to_string()
    };
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

pub async fn serve(config: AppConfig) -> Result<()> {
    Database::init_db(&config.database)?;

    if config.debug {
        // INTENTIONAL BAD PRACTICE: debug mode leaks internals on errors.
        log::warn!("Debug mode is on: SQL errors are returned to clients");
    }

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(AppState::from(&config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutting down"),
        Err(e) => {
            log::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn seeded_state(debug: bool) -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let database = dir.path().join("users.db");
        Database::init_db(&database).unwrap();
        (dir, AppState { database, debug })
    }

    /// 在随机端口上启动路由，发起一次 GET
    async fn get(state: AppState, path_and_query: &str) -> (StatusCode, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        let response = reqwest::get(format!("http://{}{}", addr, path_and_query))
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.text().await.unwrap())
    }

    #[tokio::test]
    async fn returns_row_dump_for_known_id() {
        let (_dir, state) = seeded_state(true);
        let (status, body) = get(state, "/user?id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "('1', 'admin')");
    }

    #[tokio::test]
    async fn repeated_id_uses_first_value() {
        let (_dir, state) = seeded_state(true);
        let (status, body) = get(state, "/user?id=1&id=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "('1', 'admin')");
    }

    #[tokio::test]
    async fn unrelated_params_are_ignored() {
        let (_dir, state) = seeded_state(true);
        let (status, body) = get(state, "/user?name=x&id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "('1', 'admin')");
    }

    #[test]
    fn first_param_picks_earliest_match() {
        let params = vec![
            ("id".to_string(), "7".to_string()),
            ("id".to_string(), "8".to_string()),
        ];
        assert_eq!(first_param(&params, "id").as_deref(), Some("7"));
        assert_eq!(first_param(&params, "name"), None);
    }

    #[tokio::test]
    async fn returns_none_for_unknown_id() {
        let (_dir, state) = seeded_state(true);
        let (status, body) = get(state, "/user?id=999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "None");
    }

    #[tokio::test]
    async fn tautology_injection_returns_first_row() {
        let (_dir, state) = seeded_state(true);
        let (status, body) = get(state, "/user?id=0%20OR%201%3D1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "('1', 'admin')");
    }

    #[tokio::test]
    async fn union_injection_leaks_arbitrary_columns() {
        let (_dir, state) = seeded_state(true);
        let (status, body) =
            get(state, "/user?id=0%20UNION%20SELECT%20'x'%2C%20'leaked'").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "('x', 'leaked')");
    }

    #[tokio::test]
    async fn missing_id_is_a_server_error_with_debug_details() {
        let (_dir, state) = seeded_state(true);
        let (status, body) = get(state, "/user").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.ends_with("Query: SELECT * FROM users WHERE id = "));
    }

    #[tokio::test]
    async fn server_error_is_generic_without_debug() {
        let (_dir, state) = seeded_state(false);
        let (status, body) = get(state, "/user?id=%27").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (_dir, state) = seeded_state(true);
        let (status, _) = get(state, "/users").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
