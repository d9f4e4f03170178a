pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod revenue;
pub mod storage;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
