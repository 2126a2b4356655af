pub mod blend;
pub mod engine;
pub mod transform;
