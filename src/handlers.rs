use crate::config::MAX_PERIOD_DAYS;
use crate::errors::AppError;
use crate::models::{
    DashboardSummary, NewOrderRequest, Order, OrderStatus, PeriodQuery, RevenueResponse,
    StatusUpdateRequest,
};
use crate::revenue::{aggregate_now, series_total, summarize_now};
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use tracing::info;

pub async fn get_revenue(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<RevenueResponse>, AppError> {
    let period_in_days = requested_period(&query, &state)?;
    let data = state.data.lock().await;
    let days = aggregate_now(&data.orders, period_in_days)?;

    let total = series_total(&days);
    let (start_date, end_date) = match (days.first(), days.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(AppError::bad_request("empty revenue window")),
    };

    Ok(Json(RevenueResponse {
        period_in_days,
        start_date,
        end_date,
        total,
        days,
    }))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    let period_in_days = requested_period(&query, &state)?;
    let data = state.data.lock().await;
    Ok(Json(summarize_now(&data.orders, period_in_days)?))
}

pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    let data = state.data.lock().await;
    let mut orders = data.orders.clone();
    orders.sort_by(|a, b| b.date.cmp(&a.date));
    Json(orders)
}

pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let Json(payload) = payload?;
    if !payload.total.is_finite() || payload.total < 0.0 {
        return Err(AppError::bad_request("total must be a non-negative number"));
    }

    let mut data = state.data.lock().await;

    let id = match payload.id.map(|id| id.trim().to_string()) {
        Some(id) if id.is_empty() => return Err(AppError::bad_request("id must not be blank")),
        Some(id) => {
            if data.orders.iter().any(|order| order.id == id) {
                return Err(AppError::conflict(format!("order {id} already exists")));
            }
            id
        }
        None => next_order_id(&data.orders),
    };

    let order = Order {
        id,
        reference: payload.reference.unwrap_or_default(),
        customer_id: payload.customer_id,
        date: payload.date.unwrap_or_else(|| Local::now().fixed_offset()),
        total: payload.total,
        status: payload.status.unwrap_or(OrderStatus::Ordered),
        returned: payload.returned,
    };

    let mut next = data.clone();
    next.orders.push(order.clone());
    persist_data(&state.data_path, &next).await?;
    *data = next;
    info!("stored order {} ({:?}, {:.2})", order.id, order.status, order.total);

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let Json(payload) = payload?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let updated = {
        let order = next
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| AppError::not_found(format!("order {id} not found")))?;
        order.status = payload.status;
        order.clone()
    };

    persist_data(&state.data_path, &next).await?;
    *data = next;
    info!("order {} is now {:?}", updated.id, updated.status);

    Ok(Json(updated))
}

fn requested_period(query: &PeriodQuery, state: &AppState) -> Result<u32, AppError> {
    let days = query.days.unwrap_or(state.period_in_days);
    if days > MAX_PERIOD_DAYS {
        return Err(AppError::bad_request(format!(
            "days must be at most {MAX_PERIOD_DAYS}, got {days}"
        )));
    }
    Ok(days)
}

fn next_order_id(orders: &[Order]) -> String {
    let mut n = orders.len() + 1;
    loop {
        let candidate = format!("ord-{n}");
        if !orders.iter().any(|order| order.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}
