//! Durable CRUD service for food records.
//!
//! [`state::store::FoodStore`] keeps records in a snapshot-backed map,
//! [`services::food_service::FoodService`] implements the record lifecycle
//! on top of it, and [`app::build_app`] exposes both over HTTP.

pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_app;
pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use errors::{FoodError, StoreError};
pub use services::food_service::{FoodFields, FoodService};
pub use state::food::Food;
pub use state::store::FoodStore;
