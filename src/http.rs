//! HTTP front end on axum: JSON in and out.
//!
//! | Method | Path          | Success                 |
//! |--------|---------------|-------------------------|
//! | POST   | `/items/`     | 201 + created item      |
//! | GET    | `/items/`     | 200 + array of items    |
//! | GET    | `/items/{id}` | 200 + item              |
//! | PUT    | `/items/{id}` | 200 + updated item      |
//! | DELETE | `/items/{id}` | 204, no body            |
//!
//! Errors come back as `{"detail": ...}` with the status from
//! [`Error::status_code`].

use crate::error::{Error, FieldError, Result};
use crate::model::{Item, ItemFields};
use crate::store::ItemStore;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Largest request body accepted.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

type SharedStore = Arc<ItemStore>;

/// All item routes over `store`.
///
/// `/items` and `/items/` are the same collection; query strings are ignored.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route(
            "/items/{id}/",
            get(get_item).put(update_item).delete(delete_item),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(log_and_shape))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(store)
}

/// Serve `store` on `listener` until the process exits.
pub async fn serve(listener: TcpListener, store: SharedStore) -> Result<()> {
    serve_with_shutdown(listener, store, std::future::pending()).await
}

/// Serve `store` on `listener` until `signal` resolves, then finish the
/// requests in flight and return.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    store: SharedStore,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(signal)
        .await?;
    info!("server stopped");
    Ok(())
}

// ---- handlers ----

async fn list_items(State(store): State<SharedStore>) -> Result<Json<Vec<Item>>> {
    let items = blocking(store, |s| s.list()).await?;
    Ok(Json(items))
}

async fn create_item(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>)> {
    let fields = ItemFields::from_json(&body)?;
    let item = blocking(store, move |s| s.create(fields)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let id = parse_id(&id)?;
    let item = blocking(store, move |s| s.get(id)).await?;
    Ok(Json(item))
}

async fn update_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Item>> {
    let id = parse_id(&id)?;
    // A bad body wins over a missing id.
    let fields = ItemFields::from_json(&body)?;
    let item = blocking(store, move |s| s.update(id, fields)).await?;
    Ok(Json(item))
}

async fn delete_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    blocking(store, move |s| s.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response()
}

// ---- helpers ----

fn parse_id(segment: &str) -> Result<u64> {
    segment.parse::<u64>().map_err(|_| {
        Error::Validation(vec![FieldError::path(
            "item_id",
            "value is not a valid integer",
            "type_error.integer",
        )])
    })
}

/// Store calls do blocking file I/O; keep them off the async workers.
async fn blocking<T, F>(store: SharedStore, op: F) -> Result<T>
where
    F: FnOnce(&ItemStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| Error::Task(e.to_string()))?
}

/// Log every request, and give the plain-text rejections axum and hyper
/// produce (405, 413, 400) the same `{"detail": ...}` body as everything else.
async fn log_and_shape(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = json_detail(next.run(request).await);
    debug!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "handled"
    );
    response
}

fn json_detail(response: Response) -> Response {
    let detail = match response.status() {
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::METHOD_NOT_ALLOWED => "Method Not Allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        _ => return response,
    };
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    // Keep the status and headers such as `Allow`; swap the body.
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.remove(CONTENT_TYPE);
    (parts, Json(json!({ "detail": detail }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_unsigned_integers() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id("18446744073709551615"), Ok(u64::MAX));
        for bad in ["abc", "-1", "1.5", "", "18446744073709551616"] {
            let Err(Error::Validation(errors)) = parse_id(bad) else {
                panic!("{bad:?} should be rejected");
            };
            assert_eq!(errors[0].loc, vec!["path", "item_id"]);
            assert_eq!(errors[0].kind, "type_error.integer");
        }
    }

    #[test]
    fn plain_rejections_become_json_detail() {
        let response = (
            StatusCode::METHOD_NOT_ALLOWED,
            [("allow", "GET,HEAD,POST")],
            "",
        )
            .into_response();
        let shaped = json_detail(response);
        assert_eq!(shaped.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(shaped.headers()["allow"], "GET,HEAD,POST");
        assert_eq!(shaped.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn json_responses_pass_through() {
        let response = Error::NotFound(3).into_response();
        let shaped = json_detail(response);
        assert_eq!(shaped.status(), StatusCode::NOT_FOUND);
        assert_eq!(shaped.headers()[CONTENT_TYPE], "application/json");
    }
}
