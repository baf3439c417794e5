use std::net::SocketAddr;

use axum::{
    extract::{Form, Path, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use deskhaven::catalog::Area;
use deskhaven::constants::{DEFAULT_BIND_ADDR, PURPOSE_OPTIONS};
use deskhaven::content;
use deskhaven::store::{BulkOutcome, DynamicPage, PageCandidate};
use deskhaven::web::{
    render_admin_generator, render_area_options, render_generate_outcome, render_home,
    render_lead_thanks, render_not_found, render_notice, render_page_row, render_public_page,
    standard_plans, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let state = AppState::new().await?;
    let app = Router::new()
        .route("/", get(home))
        .route("/virtual-office/:slug", get(public_page))
        .route("/admin/pages", get(admin_generator))
        .route("/admin/pages/areas", get(admin_area_options))
        .route("/admin/pages/generate", post(admin_generate))
        .route("/admin/pages/:id/toggle", post(admin_toggle))
        .route("/api/locations", get(list_locations))
        .route("/api/locations/:location_id/areas", get(location_areas))
        .route("/api/dynamic-pages", get(list_pages))
        .route("/api/dynamic-pages/slug/:slug", get(page_by_slug))
        .route("/api/admin/dynamic-pages/bulk", post(bulk_create))
        .route("/api/admin/dynamic-pages/:id", delete(delete_page))
        .route("/api/admin/dynamic-pages/:id/active", patch(set_active))
        .route("/api/leads", post(capture_lead))
        .with_state(state);

    let bind = std::env::var("DESKHAVEN_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind.parse()?;
    info!("Starting deskhaven server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let locations = state.store().list_locations().await.map_err(internal)?;
    let pages = state.store().list_pages().await.map_err(internal)?;
    Ok(Html(render_home(&locations, &pages)))
}

/// Public slug resolution. Unpublished (inactive) and unknown slugs both
/// render the not-found document; a found page renders the full landing page.
async fn public_page(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let page = state.store().get_by_slug(&slug).await.map_err(internal)?;
    match page {
        Some(page) if page.is_active => {
            Ok(Html(render_public_page(&page, &standard_plans())).into_response())
        }
        _ => Ok((StatusCode::NOT_FOUND, Html(render_not_found(&slug))).into_response()),
    }
}

async fn admin_generator(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let locations = state.store().list_locations().await.map_err(internal)?;
    let pages = state.store().list_pages().await.map_err(internal)?;
    Ok(Html(render_admin_generator(&locations, PURPOSE_OPTIONS, &pages)))
}

/// HTMX fragment: area checkboxes for the cities currently ticked. Repeated
/// `cities` query params arrive as a raw string ("cities=1&cities=2").
async fn admin_area_options(
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
) -> Result<Html<String>, StatusCode> {
    let city_ids = parse_id_params(query.as_deref().unwrap_or(""), "cities");
    let mut pool: Vec<Area> = Vec::new();
    for city_id in city_ids {
        let mut areas = state
            .store()
            .areas_for_location(city_id)
            .await
            .map_err(internal)?;
        pool.append(&mut areas);
    }
    pool.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Html(render_area_options(&pool)))
}

/// HTMX generate submit. The form carries area ids and purpose indexes;
/// content is composed server-side and the batch inserted with slug dedup.
async fn admin_generate(
    State(state): State<AppState>,
    body: String,
) -> Result<Html<String>, StatusCode> {
    let area_ids = parse_id_params(&body, "areas");
    let purposes: Vec<&str> = parse_id_params(&body, "purposes")
        .into_iter()
        .filter_map(|index| usize::try_from(index).ok())
        .filter_map(|index| PURPOSE_OPTIONS.get(index).copied())
        .collect();

    if area_ids.is_empty() || purposes.is_empty() {
        return Ok(Html(render_notice(
            "Select at least one area and one purpose before generating.",
        )));
    }

    let mut candidates = Vec::with_capacity(area_ids.len() * purposes.len());
    for area_id in area_ids {
        let Some((area, city)) = state.store().area_with_city(area_id).await.map_err(internal)?
        else {
            continue;
        };
        for purpose in &purposes {
            let content = content::compose(&area.name, &city, purpose);
            candidates.push(PageCandidate {
                area_name: area.name.clone(),
                city_name: city.clone(),
                purpose: (*purpose).to_string(),
                slug: content.slug,
                overview: content.overview,
                benefits: content.benefits,
                why_us: content.why_us,
                is_active: true,
            });
        }
    }

    let outcome = state.store().insert_batch(&candidates).await.map_err(internal)?;
    let pages = state.store().list_pages().await.map_err(internal)?;
    Ok(Html(render_generate_outcome(&outcome, &pages)))
}

/// HTMX row refresh after flipping a page's active flag.
async fn admin_toggle(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Html<String>, StatusCode> {
    let page = state.store().toggle_active(id).await.map_err(internal)?;
    match page {
        Some(page) => Ok(Html(render_page_row(&page))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<deskhaven::catalog::Location>>, StatusCode> {
    let locations = state.store().list_locations().await.map_err(internal)?;
    Ok(Json(locations))
}

async fn location_areas(
    Path(location_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Area>>, StatusCode> {
    let areas = state
        .store()
        .areas_for_location(location_id)
        .await
        .map_err(internal)?;
    Ok(Json(areas))
}

async fn list_pages(State(state): State<AppState>) -> Result<Json<Vec<DynamicPage>>, StatusCode> {
    let pages = state.store().list_pages().await.map_err(internal)?;
    Ok(Json(pages))
}

async fn page_by_slug(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DynamicPage>, StatusCode> {
    let page = state.store().get_by_slug(&slug).await.map_err(internal)?;
    page.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Bulk creation endpoint. Candidates with an empty slug, area, or purpose
/// are a client bug; the whole batch is rejected before any insert.
async fn bulk_create(
    State(state): State<AppState>,
    Json(candidates): Json<Vec<PageCandidate>>,
) -> Result<Json<BulkOutcome>, (StatusCode, String)> {
    if candidates
        .iter()
        .any(|c| c.slug.is_empty() || c.area_name.is_empty() || c.purpose.is_empty())
    {
        return Err((
            StatusCode::BAD_REQUEST,
            "candidates must carry a slug, area name, and purpose".to_string(),
        ));
    }
    let outcome = state.store().insert_batch(&candidates).await.map_err(|err| {
        error!(?err, "bulk insert failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to persist batch".to_string(),
        )
    })?;
    Ok(Json(outcome))
}

/// Returns 200 with an empty body so the admin table's HTMX delete swap
/// removes the row.
async fn delete_page(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    let deleted = state.store().delete_page(id).await.map_err(internal)?;
    if deleted {
        info!(id, "page deleted");
        Ok(StatusCode::OK)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

#[derive(Debug, Deserialize)]
struct SetActiveRequest {
    active: bool,
}

async fn set_active(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(request): Json<SetActiveRequest>,
) -> Result<StatusCode, StatusCode> {
    let updated = state
        .store()
        .set_active(id, request.active)
        .await
        .map_err(internal)?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

#[derive(Debug, Deserialize)]
struct LeadRequest {
    email: String,
    slug: Option<String>,
}

async fn capture_lead(
    State(state): State<AppState>,
    Form(request): Form<LeadRequest>,
) -> Result<Html<String>, (StatusCode, String)> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email is required".to_string()));
    }
    state
        .store()
        .record_lead(email, request.slug.as_deref())
        .await
        .map_err(|err| {
            error!(?err, email = %email, "failed to store lead");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save your details right now. Please try again.".to_string(),
            )
        })?;
    info!(email = %email, slug = ?request.slug, "lead captured");
    Ok(Html(render_lead_thanks()))
}

fn internal(err: deskhaven::Error) -> StatusCode {
    error!(?err, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Pulls every integer value for `key` out of a urlencoded query/body string.
fn parse_id_params(raw: &str, key: &str) -> Vec<i64> {
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(name, _)| *name == key)
        .filter_map(|(_, value)| value.parse().ok())
        .collect()
}
