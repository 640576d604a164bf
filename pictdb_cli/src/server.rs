//! The HTTP front end (§6.4): four routes over a single shared catalog, serialized
//! through a `tokio::sync::Mutex` and bridged onto blocking catalog calls with
//! `spawn_blocking`, since `pictdb_core::PictDb` is synchronous by design.

use crate::http_error::HttpError;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::Multipart;
use pictdb_core::catalog::OpenMode;
use pictdb_core::metadata::Resolution;
use pictdb_core::{Error, PictDb};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<PictDb>>,
}

/// Runs a blocking catalog operation on the blocking thread pool, holding the mutex
/// for the duration of the closure.
async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, HttpError>
where
    F: FnOnce(&mut PictDb) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = db.blocking_lock();
        f(&mut guard)
    })
    .await
    .expect("catalog task panicked")
    .map_err(HttpError::from)
}

async fn list_route(State(state): State<AppState>) -> Result<Response, HttpError> {
    let body = with_db(&state, |db| db.list_json()).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[derive(Deserialize)]
struct ReadParams {
    res: String,
    pict_id: String,
}

async fn read_route(
    State(state): State<AppState>,
    Query(params): Query<ReadParams>,
) -> Result<Response, HttpError> {
    let res = Resolution::from_str(&params.res).map_err(HttpError::from)?;
    let id = params.pict_id;
    let bytes = with_db(&state, move |db| db.read(&id, res)).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

async fn insert_route(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, HttpError> {
    let mut pict_id: Option<String> = None;
    let mut payload: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| HttpError(Error::InvalidArgument))?
    {
        match field.name().unwrap_or_default() {
            "pict_id" => {
                pict_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| HttpError(Error::InvalidArgument))?,
                );
            }
            "payload" => {
                payload = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| HttpError(Error::InvalidArgument))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let pict_id = pict_id.ok_or(HttpError(Error::NotEnoughArguments))?;
    let payload = payload.ok_or(HttpError(Error::NotEnoughArguments))?;

    with_db(&state, move |db| db.insert(&payload, &pict_id)).await?;
    Ok(Redirect::to("/pictDB/list").into_response())
}

#[derive(Deserialize)]
struct DeleteParams {
    pict_id: String,
}

async fn delete_route(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Response, HttpError> {
    with_db(&state, move |db| db.delete(&params.pict_id)).await?;
    Ok(Redirect::to("/pictDB/list").into_response())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/pictDB/list", get(list_route))
        .route("/pictDB/read", get(read_route))
        .route("/pictDB/insert", post(insert_route))
        .route("/pictDB/delete", get(delete_route))
        .with_state(state)
}

/// Opens `db_path` read-write and serves it on `127.0.0.1:<port>` until the process is
/// killed. Logs the bound address (and, best-effort, the host's LAN address) the way
/// a small local tool announces where it's listening.
pub async fn run(db_path: PathBuf, port: u16) -> anyhow::Result<()> {
    let db = PictDb::open(&db_path, OpenMode::ReadWrite)?;
    let state = AppState {
        db: Arc::new(Mutex::new(db)),
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("pictDB server listening on http://127.0.0.1:{port}");
    if let Ok(local) = local_ip_address::local_ip() {
        log::info!("reachable on the local network at http://{local}:{port}");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
