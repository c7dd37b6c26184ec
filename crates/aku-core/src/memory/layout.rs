//! ROM and RAM layout constants
//!
//! Locations of the static tables the corruption search reads, plus the
//! CPU address space boundaries used to resolve pointers into banks.

use crate::rom::Region;

/// Bank holding the object, offset and room tables
pub const OBJECT_DATA_BANK: usize = 10;
/// Bank permanently mapped at $C000-$FFFF
pub const FIXED_BANK: usize = 15;

/// Mask turning a CPU address into an offset inside its 16 KiB bank
pub const BANK_MASK: u16 = 0x3FFF;
/// Lowest CPU address backed by PRG ROM
pub const ROM_START: u16 = 0x8000;
/// Lowest CPU address served by the fixed bank
pub const FIXED_BANK_START: u16 = 0xC000;

/// Internal RAM is 2 KiB, mirrored up to $2000
pub const RAM_MASK: u16 = 0x7FF;
pub const RAM_MIRROR_END: u16 = 0x2000;

/// Entries in the offset table and in the object pointer table
pub const TABLE_ENTRIES: usize = 256;
/// Size of one object descriptor record
pub const DESCRIPTOR_SIZE: usize = 5;
/// Camera columns are 7-bit values
pub const CAMERA_COLUMN_MASK: u8 = 0x7F;

/// Region-specific locations of the static data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLayout {
    /// Zero-page byte holding the camera column being loaded
    pub load_column: u8,
    /// Zero-page pointer to the current room's object index array
    pub obj_idx_ptr: u8,
    /// Signed per-column RAM offsets ("mod 6" table)
    pub offset_table: u16,
    /// Object descriptor pointers
    pub object_table: u16,
    /// Block -> sublevel pointer table
    pub block_pointer_table: u16,
}

const US_LAYOUT: RegionLayout = RegionLayout {
    load_column: 0x76,
    obj_idx_ptr: 0x98,
    offset_table: 0x840C,
    object_table: 0xA03F,
    block_pointer_table: 0x937F,
};

const JAPAN_LAYOUT: RegionLayout = RegionLayout {
    load_column: 0x73,
    obj_idx_ptr: 0x95,
    offset_table: 0x8410,
    object_table: 0x9F6E,
    block_pointer_table: 0x92AE,
};

impl RegionLayout {
    pub fn for_region(region: Region) -> &'static RegionLayout {
        match region {
            Region::Us => &US_LAYOUT,
            Region::Japan => &JAPAN_LAYOUT,
        }
    }

    /// Address of the pointer-table slot for object `index`
    pub fn object_pointer_slot(&self, index: u8) -> u16 {
        self.object_table.wrapping_add(index as u16 * 2)
    }
}

/// Where a 16-bit pointer lands in the CPU address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum AddressClass {
    /// $0000 or its $0800 mirror
    ZeroPage,
    /// Internal RAM and mirrors below $2000
    Ram,
    /// PPU/APU registers, expansion and cartridge RAM
    Unmapped,
    /// Switchable bank at $8000-$BFFF
    SwitchableBank,
    /// Fixed bank at $C000-$FFFF
    FixedBank,
}

impl AddressClass {
    pub fn of(address: u16) -> Self {
        if address & !0x800 == 0 {
            Self::ZeroPage
        } else if address < RAM_MIRROR_END {
            Self::Ram
        } else if address < ROM_START {
            Self::Unmapped
        } else if address < FIXED_BANK_START {
            Self::SwitchableBank
        } else {
            Self::FixedBank
        }
    }

    pub fn is_rom(&self) -> bool {
        matches!(self, Self::SwitchableBank | Self::FixedBank)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ZeroPage => "[RAM] [ZP]",
            Self::Ram => "[RAM]",
            Self::Unmapped => "[-]",
            Self::SwitchableBank => "[ROM]",
            Self::FixedBank => "[ROM] [FIXED]",
        }
    }
}
