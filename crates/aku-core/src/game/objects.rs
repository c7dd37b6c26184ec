//! Enemy object data and the RAM tables it is copied into.
//!
//! When a room column is loaded the game looks up an object index, fetches
//! the 5-byte descriptor for that index and writes it into a set of 6-entry
//! RAM tables, one byte per table, at slot `x`. The slot comes from the
//! offset table indexed by the camera column; for out-of-bounds columns the
//! offset is garbage and the writes land elsewhere in RAM.

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::error::{Error, Result};

/// Only offset table entries at or past this index are out of bounds
pub const OFFSET_TABLE_WINDOW: usize = 48;

/// Object indices from here on are only spawned in hard mode
pub const HARD_MODE_OBJECT_START: u8 = 208;
/// Object indices from here on are rejected by the game even in hard mode
pub const INVALID_OBJECT_START: u8 = 228;

pub fn is_hard_mode_only(index: u8) -> bool {
    index >= HARD_MODE_OBJECT_START
}

pub fn is_invalid_object(index: u8) -> bool {
    index >= INVALID_OBJECT_START
}

/// Convert a requested object index, rejecting anything past the 256-entry table.
pub fn object_index(index: usize) -> Result<u8> {
    u8::try_from(index).map_err(|_| Error::ObjectIndexOutOfRange(index))
}

/// Role of an object RAM table.
///
/// Declaration order is the order the game writes the tables in and the
/// order every search phase enumerates them.
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
    EnumIter,
    Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum RamRole {
    #[strum(serialize = "type")]
    Type,
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "x-high")]
    XHigh,
    #[strum(serialize = "y")]
    Y,
    #[strum(serialize = "unknown")]
    Unknown,
    #[strum(serialize = "timer")]
    Timer,
    #[strum(serialize = "state")]
    State,
}

/// Where the byte written into a RAM table comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteSource {
    /// Byte `n` of the object descriptor
    DescriptorByte(u8),
    /// Descriptor byte 1 added to a run-time accumulator ($09)
    RuntimeSum,
    /// Carry out of the `RuntimeSum` addition
    RuntimeCarry,
    /// Constant zero
    FixedZero,
}

/// One RAM table the object loader writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RamTarget {
    pub role: RamRole,
    pub address: u16,
    pub source: WriteSource,
    /// Whether the written value can be derived from the ROM alone
    pub statically_predictable: bool,
}

pub static OBJ_RAM_TARGETS: [RamTarget; 7] = [
    // If the type byte is 0 the loader stops after this write
    RamTarget {
        role: RamRole::Type,
        address: 0x7C2,
        source: WriteSource::DescriptorByte(0),
        statically_predictable: true,
    },
    RamTarget {
        role: RamRole::X,
        address: 0x7DA,
        source: WriteSource::RuntimeSum,
        statically_predictable: false,
    },
    RamTarget {
        role: RamRole::XHigh,
        address: 0x7E0,
        source: WriteSource::RuntimeCarry,
        statically_predictable: false,
    },
    RamTarget {
        role: RamRole::Y,
        address: 0x7D4,
        source: WriteSource::DescriptorByte(2),
        statically_predictable: true,
    },
    RamTarget {
        role: RamRole::Unknown,
        address: 0x7E6,
        source: WriteSource::DescriptorByte(3),
        statically_predictable: true,
    },
    RamTarget {
        role: RamRole::Timer,
        address: 0x7CE,
        source: WriteSource::DescriptorByte(4),
        statically_predictable: true,
    },
    RamTarget {
        role: RamRole::State,
        address: 0x7C8,
        source: WriteSource::FixedZero,
        statically_predictable: true,
    },
];

impl RamRole {
    pub fn target(&self) -> &'static RamTarget {
        &OBJ_RAM_TARGETS[*self as usize]
    }

    pub fn address(&self) -> u16 {
        self.target().address
    }

    /// Values the table can receive when they cannot be read from the ROM
    pub fn value_note(&self) -> Option<&'static str> {
        match self {
            Self::X => Some("[ * ]    (depends on $09)"),
            Self::XHigh => Some("[ 0, 1 ] (depends on $09)"),
            Self::State => Some("[ 0 ]"),
            _ => None,
        }
    }
}

/// A 5-byte object descriptor resolved from the object pointer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectDescriptor {
    pub index: u8,
    pub pointer: u16,
    pub bytes: [u8; 5],
}

impl ObjectDescriptor {
    /// Value this descriptor writes into `role`, or None if it depends on
    /// run-time state.
    pub fn value_for(&self, role: RamRole) -> Option<u8> {
        match role.target().source {
            WriteSource::DescriptorByte(n) => Some(self.bytes[n as usize]),
            WriteSource::FixedZero => Some(0),
            WriteSource::RuntimeSum | WriteSource::RuntimeCarry => None,
        }
    }

    /// The loader stops after the type write when the type byte is 0.
    pub fn terminates_early(&self) -> bool {
        self.bytes[0] == 0
    }
}
