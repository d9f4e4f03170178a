use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Ordered,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_cancelled(self) -> bool {
        self == OrderStatus::Cancelled
    }

    pub fn is_pending(self) -> bool {
        self == OrderStatus::Ordered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub returned: bool,
}

/// Revenue accumulated on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub orders: Vec<Order>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PeriodQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewOrderRequest {
    pub id: Option<String>,
    pub reference: Option<String>,
    pub customer_id: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub total: f64,
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub returned: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevenueResponse {
    pub period_in_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: f64,
    pub days: Vec<DailyTotal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub period_in_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub revenue: f64,
    pub nb_new_orders: u64,
    pub pending_orders: Vec<Order>,
}
