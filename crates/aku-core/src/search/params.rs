use std::collections::BTreeMap;

use serde::Serialize;

use super::ValuePredicate;
use crate::error::{Error, Result};
use crate::rom::Region;

/// One corruption to look for: a RAM address per region and the values
/// that would be acceptable there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParameters {
    targets: BTreeMap<Region, u16>,
    predicate: ValuePredicate,
}

impl SearchParameters {
    /// Fails with [`Error::NoTargetAddress`] if no region has an address.
    pub fn new<I>(targets: I, predicate: ValuePredicate) -> Result<Self>
    where
        I: IntoIterator<Item = (Region, u16)>,
    {
        let targets: BTreeMap<Region, u16> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(Error::NoTargetAddress);
        }
        Ok(Self { targets, predicate })
    }

    /// Build from optional per-region addresses, as handed over by the parser.
    pub fn from_addresses(
        us: Option<u16>,
        japan: Option<u16>,
        predicate: ValuePredicate,
    ) -> Result<Self> {
        let targets = [(Region::Us, us), (Region::Japan, japan)]
            .into_iter()
            .filter_map(|(region, address)| address.map(|a| (region, a)));
        Self::new(targets, predicate)
    }

    /// Target addresses in region order
    pub fn targets(&self) -> impl Iterator<Item = (Region, u16)> + '_ {
        self.targets.iter().map(|(r, a)| (*r, *a))
    }

    pub fn target(&self, region: Region) -> Option<u16> {
        self.targets.get(&region).copied()
    }

    pub fn predicate(&self) -> &ValuePredicate {
        &self.predicate
    }
}
