pub mod data;
pub mod viewer;
