//! Result types produced by the corruption search.

use serde::Serialize;

use super::SearchParameters;
use crate::game::{RamRole, RoomId, is_hard_mode_only, is_invalid_object};
use crate::memory::layout::RAM_MASK;
use crate::rom::Region;

/// Width of one camera column in pixels
pub const COLUMN_PIXELS: u16 = 0x40;

/// An out-of-bounds camera column whose offset redirects a table write onto
/// the target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeasibleOffset {
    /// Camera column, i.e. index into the offset table
    pub index: u8,
    /// Offset table entry at `index`
    pub offset: u8,
}

impl FeasibleOffset {
    /// RAM address the write to `table` lands on with this offset
    pub fn written_address(&self, table: u16) -> u16 {
        written_address(table, self.offset)
    }

    /// Camera scroll positions covering this column, for display only
    pub fn camera_pixels(&self) -> (u16, u16) {
        let start = self.index as u16 * COLUMN_PIXELS;
        (start, start + COLUMN_PIXELS - 1)
    }
}

/// Address written when the loader stores into `table` at slot `offset`.
pub fn written_address(table: u16, offset: u8) -> u16 {
    table.wrapping_add(offset as u16) & RAM_MASK
}

/// Phase 1 result for a single object RAM table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFeasibility {
    pub role: RamRole,
    pub table: u16,
    pub statically_predictable: bool,
    pub offsets: Vec<FeasibleOffset>,
}

impl TableFeasibility {
    pub fn is_feasible(&self) -> bool {
        !self.offsets.is_empty()
    }
}

/// Phase 1 result: for every object RAM table, the camera columns that
/// redirect its write onto the target address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraFeasibility {
    pub target_address: u16,
    pub tables: Vec<TableFeasibility>,
}

impl CameraFeasibility {
    pub fn table(&self, role: RamRole) -> Option<&TableFeasibility> {
        self.tables.iter().find(|t| t.role == role)
    }

    pub fn is_feasible(&self, role: RamRole) -> bool {
        self.table(role).is_some_and(TableFeasibility::is_feasible)
    }

    pub fn any_feasible(&self) -> bool {
        self.tables.iter().any(TableFeasibility::is_feasible)
    }

    /// Every (table, offset) pair in table order, then offset index order
    pub fn pairs(&self) -> impl Iterator<Item = (RamRole, FeasibleOffset)> + '_ {
        self.tables
            .iter()
            .flat_map(|t| t.offsets.iter().map(move |o| (t.role, *o)))
    }

    pub fn unreachable_tables(&self) -> impl Iterator<Item = RamRole> + '_ {
        self.tables
            .iter()
            .filter(|t| !t.is_feasible())
            .map(|t| t.role)
    }
}

/// A write of `value` from object `object_index` into the table of `role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateWrite {
    pub object_index: u8,
    pub role: RamRole,
    pub value: u8,
    /// Descriptor byte the value comes from, None for the constant zero
    pub source_byte: Option<u8>,
}

impl CandidateWrite {
    pub fn target_table(&self) -> u16 {
        self.role.address()
    }

    pub fn is_hard_mode_only(&self) -> bool {
        is_hard_mode_only(self.object_index)
    }

    pub fn is_invalid(&self) -> bool {
        is_invalid_object(self.object_index)
    }
}

/// A room whose out-of-bounds column loads an object that writes an
/// acceptable value onto the target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub region: Region,
    pub room: RoomId,
    pub column: FeasibleOffset,
    pub write: CandidateWrite,
    /// Room's object index array pointer
    pub room_pointer: u16,
    /// Address the object index was read from
    pub column_address: u16,
    pub target_address: u16,
}

impl Finding {
    pub fn is_hard_mode_only(&self) -> bool {
        self.write.is_hard_mode_only()
    }

    pub fn is_invalid(&self) -> bool {
        self.write.is_invalid()
    }
}

/// Everything the search learned about one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSearch {
    pub region: Region,
    pub target_address: u16,
    pub feasibility: CameraFeasibility,
    pub candidates: Vec<CandidateWrite>,
    /// Objects whose descriptor pointer does not point into ROM
    pub unresolvable_objects: Vec<u8>,
    pub findings: Vec<Finding>,
}

impl RegionSearch {
    /// Tables with a feasible offset but no object providing an acceptable value
    pub fn tables_without_candidates(&self) -> Vec<RamRole> {
        self.feasibility
            .tables
            .iter()
            .filter(|t| t.is_feasible())
            .map(|t| t.role)
            .filter(|role| !self.candidates.iter().any(|c| c.role == *role))
            .collect()
    }

    /// Candidates together with the offsets that make them land on the target
    pub fn placed_candidates(&self) -> impl Iterator<Item = (FeasibleOffset, &CandidateWrite)> + '_ {
        self.feasibility.pairs().flat_map(move |(role, offset)| {
            self.candidates
                .iter()
                .filter(move |c| c.role == role)
                .map(move |c| (offset, c))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegionOutcome {
    /// The search named this region but no ROM for it was loaded
    Skipped { region: Region, target_address: u16 },
    Searched(RegionSearch),
}

impl RegionOutcome {
    pub fn region(&self) -> Region {
        match self {
            Self::Skipped { region, .. } => *region,
            Self::Searched(search) => search.region,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        match self {
            Self::Skipped { .. } => &[],
            Self::Searched(search) => &search.findings,
        }
    }
}

/// Result of running one [`SearchParameters`] against the loaded images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub parameters: SearchParameters,
    pub regions: Vec<RegionOutcome>,
}

impl SearchReport {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> + '_ {
        self.regions.iter().flat_map(|r| r.findings().iter())
    }

    pub fn skipped_regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions.iter().filter_map(|r| match r {
            RegionOutcome::Skipped { region, .. } => Some(*region),
            RegionOutcome::Searched(_) => None,
        })
    }
}
