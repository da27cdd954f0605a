pub mod food;
pub mod store;
