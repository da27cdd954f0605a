pub mod food_routes;
pub mod system_routes;
