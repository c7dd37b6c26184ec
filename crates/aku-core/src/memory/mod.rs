mod image;
pub mod layout;

#[cfg(test)]
pub mod mock;

pub use image::MemoryImage;
pub use layout::{AddressClass, RegionLayout};

#[cfg(test)]
pub use mock::MockRomBuilder;
