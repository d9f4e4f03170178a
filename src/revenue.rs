//! Daily revenue series and dashboard figures over a trailing window of days.
//!
//! Everything here is a pure function of its inputs. "Today" and the time zone
//! used to cut orders into calendar days are parameters; the `*_now` variants
//! read the local clock on every call.

use crate::errors::RevenueError;
use crate::models::{DailyTotal, DashboardSummary, Order};
use chrono::{Duration, Local, NaiveDate, TimeZone};
use std::collections::BTreeMap;

pub fn aggregate_now(orders: &[Order], period_in_days: u32) -> Result<Vec<DailyTotal>, RevenueError> {
    aggregate(orders, period_in_days, Local::now().date_naive(), &Local)
}

/// Builds one `DailyTotal` per day of the `period_in_days` days ending at
/// `today` (inclusive), oldest first. Cancelled orders are skipped and days
/// without revenue are reported as zero.
pub fn aggregate<Tz: TimeZone>(
    orders: &[Order],
    period_in_days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Result<Vec<DailyTotal>, RevenueError> {
    let start = window_start(today, period_in_days)?;
    let per_day = revenue_by_day(orders, tz);

    let mut series = Vec::with_capacity(period_in_days as usize);
    for offset in 0..i64::from(period_in_days) {
        let date = start + Duration::days(offset);
        let total = per_day.get(&date).copied().unwrap_or(0.0);
        series.push(DailyTotal { date, total });
    }

    Ok(series)
}

pub fn summarize_now(orders: &[Order], period_in_days: u32) -> Result<DashboardSummary, RevenueError> {
    summarize(orders, period_in_days, Local::now().date_naive(), &Local)
}

/// Revenue, new order count and pending orders for the orders placed inside
/// the window. Pending orders are sorted newest first.
pub fn summarize<Tz: TimeZone>(
    orders: &[Order],
    period_in_days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Result<DashboardSummary, RevenueError> {
    let start = window_start(today, period_in_days)?;
    let revenue = series_total(&aggregate(orders, period_in_days, today, tz)?);

    let mut nb_new_orders = 0u64;
    let mut pending_orders = Vec::new();

    for order in orders {
        let day = local_day(order, tz);
        if day < start || day > today {
            continue;
        }
        if !order.status.is_cancelled() {
            nb_new_orders += 1;
        }
        if order.status.is_pending() {
            pending_orders.push(order.clone());
        }
    }

    pending_orders.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(DashboardSummary {
        period_in_days,
        start_date: start,
        end_date: today,
        revenue,
        nb_new_orders,
        pending_orders,
    })
}

/// Sum of a series, adding days oldest first. Dashboard revenue is totalled
/// the same way.
pub fn series_total(series: &[DailyTotal]) -> f64 {
    series.iter().map(|day| day.total).sum()
}

/// First day of the window, so that `[start, today]` spans `period_in_days` days.
pub fn window_start(today: NaiveDate, period_in_days: u32) -> Result<NaiveDate, RevenueError> {
    if period_in_days == 0 {
        return Err(RevenueError::InvalidPeriod(period_in_days));
    }
    today
        .checked_sub_signed(Duration::days(i64::from(period_in_days) - 1))
        .ok_or(RevenueError::WindowOutOfRange(period_in_days, today))
}

fn revenue_by_day<Tz: TimeZone>(orders: &[Order], tz: &Tz) -> BTreeMap<NaiveDate, f64> {
    let mut per_day = BTreeMap::new();
    for order in orders.iter().filter(|order| !order.status.is_cancelled()) {
        *per_day.entry(local_day(order, tz)).or_insert(0.0) += order.total;
    }
    per_day
}

fn local_day<Tz: TimeZone>(order: &Order, tz: &Tz) -> NaiveDate {
    order.date.with_timezone(tz).date_naive()
}
