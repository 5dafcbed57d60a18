use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use features::collection::FeatureCollection;
use features::geojson;

#[derive(Clone)]
struct AppState {
    paddocks_path: PathBuf,
    overlays_root: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("BUILDER_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9200".to_string())
        .parse()
        .expect("invalid BUILDER_ADDR");
    let paddocks_path = env::var("PADDOCKS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data/paddocks/paddocks.json"));
    let overlays_root = env::var("OVERLAYS_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data/overlays"));

    let state = AppState {
        paddocks_path,
        overlays_root,
    };

    if let Some(parent) = state.paddocks_path.parent() {
        if let Err(err) = tokio::fs::create_dir_all(parent).await {
            warn!("failed to create paddocks dir: {err}");
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/paddocks", get(get_paddocks).post(save_paddocks))
        .route("/overlays/:metric/:file", get(get_overlay_asset))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("builder server listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_paddocks(State(state): State<AppState>) -> Response {
    let raw = match tokio::fs::read_to_string(&state.paddocks_path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            // Nothing saved yet: an empty collection, not an error.
            match geojson::to_json(&FeatureCollection::default()) {
                Ok(body) => return json_response(StatusCode::OK, body),
                Err(err) => {
                    warn!("empty collection serialization failed: {err}");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "paddocks error").into_response();
                }
            }
        }
        Err(err) => {
            warn!("paddocks read failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "paddocks error").into_response();
        }
    };

    // Validate what is on disk before handing it out.
    if let Err(err) = geojson::from_json(&raw) {
        warn!("stored paddocks malformed: {err}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "paddocks error").into_response();
    }

    json_response(StatusCode::OK, raw)
}

async fn save_paddocks(State(state): State<AppState>, body: String) -> Response {
    let collection = match geojson::from_json(&body) {
        Ok(collection) => collection,
        Err(err) => {
            warn!("rejected paddocks payload: {err}");
            return (StatusCode::BAD_REQUEST, format!("invalid geojson: {err}")).into_response();
        }
    };
    if let Err(err) = collection.ensure_unique_ids() {
        warn!("rejected paddocks payload: {err}");
        return (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response();
    }

    let canonical = match geojson::to_json(&collection) {
        Ok(canonical) => canonical,
        Err(err) => {
            warn!("paddocks serialization failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "paddocks error").into_response();
        }
    };
    if let Err(err) = tokio::fs::write(&state.paddocks_path, canonical).await {
        warn!("paddocks write failed: {err}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "paddocks error").into_response();
    }

    info!("saved {} paddocks", collection.len());
    json_response(
        StatusCode::OK,
        serde_json::json!({ "saved": collection.len() }).to_string(),
    )
}

async fn get_overlay_asset(
    State(state): State<AppState>,
    AxumPath((metric, file)): AxumPath<(String, String)>,
) -> Response {
    if !safe_component(&metric) || !safe_component(&file) {
        return (StatusCode::BAD_REQUEST, "invalid overlay path").into_response();
    }

    let path = state.overlays_root.join(&metric).join(&file);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "overlay not found").into_response();
        }
        Err(err) => {
            warn!("overlay read failed for {}: {err}", path.display());
            return (StatusCode::INTERNAL_SERVER_ERROR, "overlay error").into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&file)),
    );
    (StatusCode::OK, headers, Body::from(bytes)).into_response()
}

fn json_response(status: StatusCode, body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (status, headers, Body::from(body)).into_response()
}

fn safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\'])
}

fn content_type_for(file: &str) -> &'static str {
    match file.rsplit('.').next() {
        Some("json") => "application/json",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::{content_type_for, safe_component};

    #[test]
    fn path_components_are_sanitized() {
        assert!(safe_component("BIOMASS"));
        assert!(safe_component("BIOMASS_20230717.png"));
        assert!(!safe_component(""));
        assert!(!safe_component(".."));
        assert!(!safe_component("a/b"));
        assert!(!safe_component("a\\b"));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("x.json"), "application/json");
        assert_eq!(content_type_for("x.png"), "image/png");
        assert_eq!(content_type_for("x.bin"), "application/octet-stream");
    }
}
