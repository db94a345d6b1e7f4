pub mod api;
pub mod app;
pub mod constants;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
