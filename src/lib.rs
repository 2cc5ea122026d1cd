pub mod app;
pub mod config;
pub mod errors;
pub mod fit;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod sleep;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::{Config, Zone};
pub use sleep::{aggregate, SleepAggregator};
pub use state::AppState;
pub use storage::load_data;
