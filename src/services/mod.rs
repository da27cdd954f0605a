pub mod food_service;
