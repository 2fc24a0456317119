pub mod error;
pub mod set;

pub use error::*;
pub use set::BitSet;
