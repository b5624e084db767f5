//! Vector algebra shared by every other module

mod vector;

pub use vector::{Vector2, Vector3, VectorError, VectorLike, VectorRecord};
