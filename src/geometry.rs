pub mod fit;
pub mod normalize;
