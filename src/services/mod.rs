pub mod generator;
pub mod render;
pub mod risks;
