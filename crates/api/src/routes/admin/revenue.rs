//! Admin revenue analytics handlers. Read-only; cancelled orders are
//! excluded by every query.

use axum::extract::State;
use serde_json::{Value, json};

use crate::db::analytics::AnalyticsRepository;
use crate::error::Result;
use crate::extract::Json;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// `GET /admin/revenue/monthRevenue`
pub async fn by_month(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Value>> {
    let revenue = AnalyticsRepository::new(state.pool()).month_revenue().await?;

    Ok(Json(json!({
        "success": true,
        "revenue": revenue,
    })))
}

/// `GET /admin/revenue/categoryRevenue`
pub async fn by_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Value>> {
    let revenue = AnalyticsRepository::new(state.pool())
        .category_revenue()
        .await?;

    Ok(Json(json!({
        "success": true,
        "revenue": revenue,
    })))
}

/// `GET /admin/revenue/topProduct`
pub async fn top_products(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Value>> {
    let products = AnalyticsRepository::new(state.pool()).top_products().await?;

    Ok(Json(json!({
        "success": true,
        "products": products,
    })))
}
