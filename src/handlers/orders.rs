use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::auth::{self, Role};
use crate::db::models::{OrderRequest, OrderWithProducts};
use crate::db::orders;
use crate::error::AppError;
use crate::report;
use crate::state::AppState;

/// POST /place-order: rate limit by client address, gate on the customer
/// role, validate, then insert transactionally. The CSV report afterwards is
/// best-effort; its failure is logged and the order still succeeds.
pub async fn place_order(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    if !state.request_limiter.allow(&addr.ip().to_string()) {
        return Err(AppError::RateLimited);
    }
    auth::authorize(&state.tokens, Role::Customer, &headers)?;

    let Json(request) = payload.map_err(|err| {
        log::warn!("Rejected order payload: {}", err);
        AppError::MalformedPayload
    })?;
    orders::validate_order_request(&request).map_err(AppError::Validation)?;

    let order_id = orders::create_order(&state.pool, &request).await?;
    log::info!(
        "Order {} placed for customer {}",
        order_id,
        request.customer_id
    );

    match orders::order_detail(&state.pool, order_id, request.customer_id).await {
        Ok(Some(detail)) => {
            if let Err(err) = report::write_order_report(&state.report_path, &detail) {
                log::error!("Failed to write report for order {}: {}", order_id, err);
            }
        }
        Ok(None) => log::error!("Order {} not found for report generation", order_id),
        Err(err) => log::error!("Failed to load order {} for its report: {}", order_id, err),
    }

    Ok((StatusCode::CREATED, "Order placed successfully"))
}

/// GET /customer/orders: the caller names itself via the X-Customer-ID
/// header. An absent or unparsable header degrades to customer 0, which owns
/// nothing and yields an empty list.
pub async fn customer_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderWithProducts>>, AppError> {
    auth::authorize(&state.tokens, Role::Customer, &headers)?;

    let customer_id = headers
        .get("X-Customer-ID")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(0);

    let result = orders::customer_orders(&state.pool, customer_id).await?;
    Ok(Json(result))
}

/// GET /admin/orders: every order in the system, customer ids included.
pub async fn admin_orders(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderWithProducts>>, AppError> {
    if !state.request_limiter.allow(&addr.ip().to_string()) {
        return Err(AppError::RateLimited);
    }
    auth::authorize(&state.tokens, Role::Admin, &headers)?;

    let result = orders::all_orders(&state.pool).await?;
    Ok(Json(result))
}
