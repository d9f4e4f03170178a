use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub period_in_days: u32,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, period_in_days: u32, data: AppData) -> Self {
        Self {
            data_path,
            period_in_days,
            data: Arc::new(Mutex::new(data)),
        }
    }
}
