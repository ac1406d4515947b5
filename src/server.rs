//! HTTP API serving locale tables to the web UI.
//!
//! The web UI loads one i18next resource per language from
//! `/api/locales/{code}`; single keys can be resolved through
//! `/api/translate`, and `/api/audit` exposes the consistency report.

use crate::config::Config;
use crate::i18n::{Catalog, ConsistencyValidator, LocaleRegistry, LookupMetrics};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    catalog: Arc<Catalog>,
    uptime: Instant,
}

impl ApiState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            uptime: Instant::now(),
        }
    }
}

/// Query parameters of `GET /api/locales/{code}`.
#[derive(Debug, Deserialize)]
struct ResourceParams {
    /// Fill keys the locale lacks from the reference locale
    #[serde(default)]
    fallback: bool,
}

/// Query parameters of `GET /api/translate`.
#[derive(Debug, Deserialize)]
struct TranslateParams {
    key: String,
    locale: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

/// `GET /api/health`: liveness with locale count and uptime.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "locales": state.catalog.len(),
        "uptime_secs": state.uptime.elapsed().as_secs(),
    }))
}

/// `GET /api/locales`: every loaded locale with its names and coverage.
///
/// Locales missing from the registry are listed under their bare code with
/// `registered: false`.
async fn list_locales(State(state): State<ApiState>) -> Json<Value> {
    let catalog = &state.catalog;
    let registry = LocaleRegistry::get();

    let locales: Vec<Value> = catalog
        .tables()
        .into_iter()
        .map(|table| {
            let config = registry.get_by_code(table.code());
            let report = ConsistencyValidator::validate(catalog.reference(), table);
            json!({
                "code": table.code(),
                "name": config.map(|c| c.name).unwrap_or(table.code()),
                "native_name": config.map(|c| c.native_name).unwrap_or(table.code()),
                "registered": config.is_some(),
                "reference": table.code() == catalog.reference_code(),
                "coverage": report.coverage,
            })
        })
        .collect();

    Json(Value::Array(locales))
}

/// `GET /api/locales/{code}`: the locale as an i18next resource.
async fn locale_resource(
    State(state): State<ApiState>,
    Path(code): Path<String>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<Value>, ApiError> {
    let catalog = &state.catalog;

    let resolved = catalog.resolve_locale(&code).and_then(|c| catalog.table(c));
    let Some(table) = resolved else {
        warn!("Request for unknown locale '{}'", code);
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("unknown locale '{}'", code)})),
        ));
    };

    let resource = if params.fallback {
        table.merged_with(catalog.reference()).to_resource()
    } else {
        table.to_resource()
    };

    Ok(Json(resource))
}

/// `GET /api/translate?key=...&locale=...`: resolve one key with fallback.
///
/// Without `locale`, the `Accept-Language` header is negotiated against the
/// loaded locales; the reference answers when neither is given.
async fn translate(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(params): Query<TranslateParams>,
) -> Json<Value> {
    let requested = match params.locale {
        Some(locale) => locale,
        None => headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(|value| state.catalog.negotiate(value).to_string())
            .unwrap_or_else(|| state.catalog.reference_code().to_string()),
    };

    let lookup = state.catalog.lookup(&requested, &params.key);

    Json(json!({
        "key": params.key,
        "requested": requested,
        "locale": lookup.locale,
        "text": lookup.text,
        "source": lookup.source,
    }))
}

/// `GET /api/audit`: consistency report for every locale.
async fn audit(State(state): State<ApiState>) -> Json<Value> {
    let report = ConsistencyValidator::audit(&state.catalog);
    Json(json!(report))
}

/// `GET /api/metrics`: lookup counters.
async fn metrics() -> Json<Value> {
    Json(json!(LookupMetrics::global().report()))
}

/// Build the axum router with shared state.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/locales", get(list_locales))
        .route("/api/locales/:code", get(locale_resource))
        .route("/api/translate", get(translate))
        .route("/api/audit", get(audit))
        .route("/api/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server and run until it stops.
pub async fn serve(config: &Config, catalog: Arc<Catalog>) -> Result<()> {
    let app = build_router(ApiState::new(catalog));
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("API server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serial_test::serial;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let catalog = Catalog::bundled("en").expect("Bundled tables should parse");
        build_router(ApiState::new(Arc::new(catalog)))
    }

    /// Router over tables written to a temporary directory as `<code>.json`.
    fn dir_router(reference: &str, tables: &[(&str, Value)]) -> Router {
        let temp_dir = tempfile::TempDir::new().unwrap();
        for (code, table) in tables {
            std::fs::write(
                temp_dir.path().join(format!("{}.json", code)),
                table.to_string(),
            )
            .unwrap();
        }
        let catalog = Catalog::load_dir(temp_dir.path(), reference).expect("Should load");
        build_router(ApiState::new(Arc::new(catalog)))
    }

    fn accept_language(uri: &str, header: &str) -> Request<Body> {
        Request::get(uri)
            .header("Accept-Language", header)
            .body(Body::empty())
            .unwrap()
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        get_json_with(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn get_json_with(req: Request<Body>) -> (StatusCode, Value) {
        get_json_from(test_router(), req).await
    }

    async fn get_json_from(router: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    // ==================== Health / Listing Tests ====================

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["locales"], 4);
    }

    #[tokio::test]
    async fn test_list_locales() {
        let (status, json) = get_json("/api/locales").await;
        assert_eq!(status, StatusCode::OK);

        let locales = json.as_array().unwrap();
        assert_eq!(locales.len(), 4);

        let english = locales.iter().find(|l| l["code"] == "en").unwrap();
        assert_eq!(english["reference"], true);
        assert_eq!(english["registered"], true);
        assert_eq!(english["coverage"], 100.0);

        let japanese = locales.iter().find(|l| l["code"] == "ja").unwrap();
        assert_eq!(japanese["native_name"], "日本語");
        assert!(japanese["coverage"].as_f64().unwrap() < 100.0);
    }

    // ==================== Resource Tests ====================

    #[tokio::test]
    async fn test_locale_resource() {
        let (status, json) = get_json("/api/locales/de").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["translation"]["auth"]["login"], "Einloggen");
        assert_eq!(json["translation"]["settings"]["device"]["oled"]["3600"], "1 hour");
    }

    #[tokio::test]
    async fn test_locale_resource_region_tag() {
        let (status, json) = get_json("/api/locales/it-IT").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["translation"]["head"]["terminal"], "Terminale");
    }

    #[tokio::test]
    async fn test_locale_resource_without_fallback_keeps_gaps() {
        let (_, json) = get_json("/api/locales/ja").await;
        assert!(json["translation"]["settings"]["tailscale"]["unzip"].is_null());
    }

    #[tokio::test]
    async fn test_locale_resource_with_fallback_fills_gaps() {
        let (status, json) = get_json("/api/locales/ja?fallback=true").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["translation"]["settings"]["tailscale"]["unzip"], "and unzip it");
        assert_eq!(json["translation"]["auth"]["login"], "ログイン");
    }

    #[tokio::test]
    async fn test_locale_resource_unknown() {
        let (status, json) = get_json("/api/locales/fr").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("fr"));
    }

    // ==================== Translate Tests ====================

    #[tokio::test]
    #[serial]
    async fn test_translate_explicit_locale() {
        let (status, json) = get_json("/api/translate?key=auth.login&locale=it").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Accesso");
        assert_eq!(json["source"], "locale");
        assert_eq!(json["locale"], "it");
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_fallback() {
        let (_, json) = get_json("/api/translate?key=settings.tailscale.unzip&locale=ja").await;
        assert_eq!(json["text"], "and unzip it");
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["locale"], "en");
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_unknown_key() {
        let (_, json) = get_json("/api/translate?key=nope.missing&locale=de").await;
        assert_eq!(json["text"], "nope.missing");
        assert_eq!(json["source"], "key");
        assert!(json["locale"].is_null());
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_accept_language() {
        let req = Request::get("/api/translate?key=power.title")
            .header("Accept-Language", "fr-FR,de;q=0.8")
            .body(Body::empty())
            .unwrap();
        let (_, json) = get_json_with(req).await;
        assert_eq!(json["requested"], "de");
        assert_eq!(json["text"], "Einschalten");
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_defaults_to_reference() {
        let (_, json) = get_json("/api/translate?key=power.title").await;
        assert_eq!(json["requested"], "en");
        assert_eq!(json["text"], "Power");
    }

    #[tokio::test]
    async fn test_translate_missing_key_param() {
        let req = Request::get("/api/translate?locale=de")
            .body(Body::empty())
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_accept_language_reaches_directory_locale() {
        let router = dir_router(
            "en",
            &[
                ("en", json!({"power": {"title": "Power"}})),
                ("fr", json!({"power": {"title": "Alimentation"}})),
            ],
        );

        let req = accept_language("/api/translate?key=power.title", "fr-FR,fr;q=0.9");
        let (_, json) = get_json_from(router, req).await;
        assert_eq!(json["requested"], "fr");
        assert_eq!(json["text"], "Alimentation");
        assert_eq!(json["source"], "locale");
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_unmatched_header_uses_catalog_reference() {
        let tables = [
            ("de", json!({"power": {"title": "Einschalten"}})),
            ("en", json!({"power": {"title": "Power"}})),
        ];

        let req = accept_language("/api/translate?key=power.title", "fr");
        let (_, json) = get_json_from(dir_router("de", &tables), req).await;
        assert_eq!(json["requested"], "de");
        assert_eq!(json["text"], "Einschalten");

        let req = Request::get("/api/translate?key=power.title")
            .body(Body::empty())
            .unwrap();
        let (_, json) = get_json_from(dir_router("de", &tables), req).await;
        assert_eq!(json["requested"], "de");
        assert_eq!(json["text"], "Einschalten");
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_bundled_with_german_reference() {
        let catalog = Catalog::bundled("de").expect("Bundled tables should parse");
        let router = build_router(ApiState::new(Arc::new(catalog)));

        let req = accept_language("/api/translate?key=settings.tailscale.unzip", "ja");
        let (_, json) = get_json_from(router, req).await;
        assert_eq!(json["requested"], "ja");
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["locale"], "de");
    }

    #[tokio::test]
    async fn test_list_locales_marks_unregistered() {
        let router = dir_router(
            "en",
            &[
                ("en", json!({"power": {"title": "Power"}})),
                ("fr", json!({"power": {"title": "Alimentation"}})),
            ],
        );

        let req = Request::get("/api/locales").body(Body::empty()).unwrap();
        let (status, json) = get_json_from(router, req).await;
        assert_eq!(status, StatusCode::OK);

        let french = json
            .as_array()
            .unwrap()
            .iter()
            .find(|l| l["code"] == "fr")
            .unwrap();
        assert_eq!(french["registered"], false);
        assert_eq!(french["name"], "fr");
        assert_eq!(french["coverage"], 100.0);
    }

    // ==================== Audit / Metrics Tests ====================

    #[tokio::test]
    async fn test_audit() {
        let (status, json) = get_json("/api/audit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reference"], "en");

        let japanese = json["locales"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["locale"] == "ja")
            .unwrap();
        assert_eq!(japanese["missing"][0], "settings.tailscale.unzip");
        assert_eq!(japanese["extra"][0], "settings.about.firmware");
    }

    #[tokio::test]
    #[serial]
    async fn test_metrics() {
        LookupMetrics::global().reset();
        let (_, _) = get_json("/api/translate?key=auth.login&locale=de").await;

        let (status, json) = get_json("/api/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hits"], 1);
        assert_eq!(json["lookups"], 1);
    }
}
