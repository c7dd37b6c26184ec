use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Release region of a supported ROM.
///
/// Europe shares neither the mapper nor the data layout of the other two
/// releases and is rejected by the loader.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
pub enum Region {
    #[strum(to_string = "US", serialize = "u", ascii_case_insensitive)]
    #[serde(rename = "US")]
    Us,
    #[strum(to_string = "Japan", serialize = "j", serialize = "jp", ascii_case_insensitive)]
    Japan,
}

impl Region {
    /// iNES mapper number the region's cartridge is dumped with
    pub fn from_mapper(mapper: u8) -> Option<Self> {
        match mapper {
            5 => Some(Self::Us),
            24 => Some(Self::Japan),
            _ => None,
        }
    }

    pub fn mapper(&self) -> u8 {
        match self {
            Self::Us => 5,
            Self::Japan => 24,
        }
    }

    /// Single-letter tag used in reports and on the command line
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Us => "U",
            Self::Japan => "J",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_region_from_mapper() {
        assert_eq!(Region::from_mapper(5), Some(Region::Us));
        assert_eq!(Region::from_mapper(24), Some(Region::Japan));
        assert_eq!(Region::from_mapper(4), None);
    }

    #[test]
    fn test_region_mapper_roundtrip() {
        for region in Region::iter() {
            assert_eq!(Region::from_mapper(region.mapper()), Some(region));
        }
    }

    #[test]
    fn test_region_from_str_keys() {
        assert_eq!(Region::from_str("u").unwrap(), Region::Us);
        assert_eq!(Region::from_str("J").unwrap(), Region::Japan);
        assert_eq!(Region::from_str("jp").unwrap(), Region::Japan);
        assert!(Region::from_str("e").is_err());
    }

    #[test]
    fn test_region_names() {
        assert_eq!(Region::Us.to_string(), "US");
        assert_eq!(Region::Japan.to_string(), "Japan");
        assert_eq!(Region::Japan.short_name(), "J");
    }
}
