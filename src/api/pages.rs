//! Page API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::token_from_headers;
use crate::errors::AppError;
use crate::models::{menu, MenuItem, PageId};
use crate::portal::{Navigation, NavigationAction};
use crate::views::{render, PageView, Viewer};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Selected subject on the subjects page
    pub subject: Option<String>,
    /// Board display name remembered by the client
    pub viewer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    /// Where the client is now; the subjects index when absent
    #[serde(default)]
    pub current: Navigation,
    pub action: NavigationAction,
    #[serde(default)]
    pub viewer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub navigation: Navigation,
    pub view: PageView,
}

async fn viewer_for(state: &AppState, headers: &HeaderMap, name: Option<String>) -> Viewer {
    let token = token_from_headers(headers);
    Viewer {
        is_admin: state.admin.is_admin(token.as_deref()).await,
        name,
    }
}

/// GET /api/menu - Sidebar entries in display order.
pub async fn get_menu() -> ApiResult<Vec<MenuItem>> {
    success(menu())
}

/// GET /api/pages/:page - Render one page for the caller.
pub async fn get_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> ApiResult<PageView> {
    let page =
        PageId::parse(&page).ok_or_else(|| AppError::NotFound(format!("Page {} not found", page)))?;

    let nav = match (page, query.subject) {
        (PageId::Disciplinas, Some(subject)) => Navigation::default().select_subject(subject),
        (page, _) => Navigation::default().go_to(page),
    };
    let viewer = viewer_for(&state, &headers, query.viewer).await;

    let snapshot = state.portal.snapshot().await;
    success(render(&snapshot, &nav, &viewer))
}

/// POST /api/navigate - Apply one navigation step and render where it lands.
pub async fn navigate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<NavigateResponse> {
    let navigation = request.current.step(request.action);
    let viewer = viewer_for(&state, &headers, request.viewer).await;

    let snapshot = state.portal.snapshot().await;
    let view = render(&snapshot, &navigation, &viewer);
    success(NavigateResponse { navigation, view })
}
