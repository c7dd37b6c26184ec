mod ines;
mod region;

pub use ines::*;
pub use region::Region;
