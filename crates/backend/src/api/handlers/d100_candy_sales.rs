use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::dashboards::d100_candy_sales::{AnalysisView, ViewDataResponse, ViewDescriptor};
use serde::Deserialize;

use crate::dashboards::d100_candy_sales::service::{self, ViewError};
use crate::shared::data::store::sheet_store;

#[derive(Debug, Deserialize)]
pub struct ViewDataQuery {
    /// Comma-separated filter selection. Absent = all values,
    /// empty string = deliberately empty selection.
    pub selected: Option<String>,
}

fn status_for(err: &ViewError) -> StatusCode {
    match err {
        ViewError::Data(_) => StatusCode::SERVICE_UNAVAILABLE,
        ViewError::Aggregate(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /api/d100/views
pub async fn list_views() -> Result<Json<Vec<ViewDescriptor>>, StatusCode> {
    let store = sheet_store().map_err(|e| {
        tracing::error!("View catalog unavailable: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    match service::catalog(store) {
        Ok(views) => {
            tracing::info!("Listed {} dashboard views", views.len());
            Ok(Json(views))
        }
        Err(e) => {
            tracing::error!("Failed to build view catalog: {}", e);
            Err(status_for(&e))
        }
    }
}

/// GET /api/d100/views/:view_id?selected=a,b,c
pub async fn get_view_data(
    Path(view_id): Path<String>,
    Query(query): Query<ViewDataQuery>,
) -> Result<Json<ViewDataResponse>, StatusCode> {
    let Some(view) = AnalysisView::from_id(&view_id) else {
        tracing::warn!("Unknown view id '{}'", view_id);
        return Err(StatusCode::NOT_FOUND);
    };
    let store = sheet_store().map_err(|e| {
        tracing::error!("View data unavailable: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    match service::view_data(store, view, query.selected.as_deref()) {
        Ok(data) => {
            tracing::info!(
                "View '{}': {} chart rows{}",
                view_id,
                data.table.rows.len(),
                query
                    .selected
                    .as_deref()
                    .map(|s| format!(", selection '{}'", s))
                    .unwrap_or_default()
            );
            Ok(Json(data))
        }
        Err(e) => {
            tracing::error!("View '{}' failed: {}", view_id, e);
            Err(status_for(&e))
        }
    }
}
