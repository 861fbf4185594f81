//! Remote bibliographic index sources

pub mod dblp;
pub mod traits;

pub use dblp::*;
pub use traits::*;
