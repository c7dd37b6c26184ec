mod levels;
mod objects;

pub use levels::*;
pub use objects::*;
