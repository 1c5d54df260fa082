pub mod bounds;
pub mod lines;
