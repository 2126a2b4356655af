pub mod api;
pub mod memory;
pub mod model;
