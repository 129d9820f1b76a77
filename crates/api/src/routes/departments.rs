//! Department ledger routes.
//!
//! - `GET  /departments/{department_id}/ledger?category=` balanced ledger
//! - `GET  /departments/{department_id}/summary` final balance per category
//! - `GET  /departments/{department_id}/overview` OPEX totals and utilization
//! - `POST /departments/{department_id}/recalculate` rebuild category budgets

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use potledger_core::ledger::LedgerError;
use potledger_shared::AppError;
use potledger_shared::types::{Category, DepartmentId};

use crate::{AppState, error::error_response, middleware::AuthUser};

/// Creates the department routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments/{department_id}/ledger", get(get_ledger))
        .route("/departments/{department_id}/summary", get(get_summary))
        .route("/departments/{department_id}/overview", get(get_overview))
        .route("/departments/{department_id}/recalculate", post(recalculate))
}

/// Query parameters for the ledger.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Restrict the ledger to one category.
    pub category: Option<String>,
}

fn ledger_error(err: LedgerError) -> Response {
    error_response(&AppError::from(err))
}

/// GET `/departments/{department_id}/ledger` - Balanced ledger entries.
async fn get_ledger(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
    Query(query): Query<LedgerQuery>,
) -> Response {
    let department_id = DepartmentId::from_uuid(department_id);
    let category = query.category.as_deref().map(Category::new);

    match state.finance.get_ledger(department_id, category.as_ref()).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => ledger_error(e),
    }
}

/// GET `/departments/{department_id}/summary` - Final balance per category.
async fn get_summary(State(state): State<AppState>, Path(department_id): Path<Uuid>) -> Response {
    let department_id = DepartmentId::from_uuid(department_id);

    match state.finance.get_summary(department_id).await {
        Ok(categories) => (
            StatusCode::OK,
            Json(json!({
                "department_id": department_id,
                "categories": categories
            })),
        )
            .into_response(),
        Err(e) => ledger_error(e),
    }
}

/// GET `/departments/{department_id}/overview` - OPEX totals and utilization.
async fn get_overview(State(state): State<AppState>, Path(department_id): Path<Uuid>) -> Response {
    match state
        .finance
        .get_overview(DepartmentId::from_uuid(department_id))
        .await
    {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => ledger_error(e),
    }
}

/// POST `/departments/{department_id}/recalculate` - Rebuild category
/// budgets from approved requests. Admin and head of department only.
async fn recalculate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(department_id): Path<Uuid>,
) -> Response {
    let department_id = DepartmentId::from_uuid(department_id);

    match state.finance.recalculate(auth.context(), department_id).await {
        Ok(report) => {
            info!(
                %department_id,
                user_id = %auth.user_id(),
                changed = report.changes.len(),
                "Recalculation requested"
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => ledger_error(e),
    }
}
