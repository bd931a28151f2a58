pub mod geometry;
#[cfg(feature = "vectors")]
pub mod vector;
