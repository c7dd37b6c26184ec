//! Synthetic ROM images for tests.
//!
//! The builder lays out a complete, valid room hierarchy for the region and
//! leaves everything else zeroed, so every object pointer is unresolvable
//! and every room column loads object 0 until a test says otherwise.

use super::MemoryImage;
use super::layout::{BANK_MASK, FIXED_BANK, FIXED_BANK_START, OBJECT_DATA_BANK, RegionLayout};
use crate::game::{BLOCKS, RoomId, room_ids};
use crate::rom::{CHR_BANK_COUNT, CHR_BANK_SIZE, PRG_BANK_COUNT, PRG_BANK_SIZE, Region, ines_header};

const SUBLEVEL_TABLES: u16 = 0x8600;
const ROOM_TABLES: u16 = 0x8700;
const ROOM_DATA: u16 = 0xA400;
/// Bytes of column data per synthetic room (16 columns)
pub const ROOM_DATA_STRIDE: u16 = 0x20;
const DESCRIPTOR_AREA: u16 = 0xB800;

#[derive(Debug, Clone)]
pub struct MockRomBuilder {
    region: Region,
    banks: Vec<Vec<u8>>,
    next_descriptor: u16,
}

impl MockRomBuilder {
    pub fn new(region: Region) -> Self {
        let builder = Self {
            region,
            banks: vec![vec![0u8; PRG_BANK_SIZE]; PRG_BANK_COUNT],
            next_descriptor: DESCRIPTOR_AREA,
        };
        builder.with_room_hierarchy()
    }

    fn layout(&self) -> &'static RegionLayout {
        RegionLayout::for_region(self.region)
    }

    fn with_room_hierarchy(mut self) -> Self {
        let block_table = self.layout().block_pointer_table;
        for (b, block) in BLOCKS.iter().enumerate() {
            let sublevel_table = SUBLEVEL_TABLES + b as u16 * 0x10;
            self = self.poke_word(block_table + b as u16 * 2, sublevel_table);
            for s in 0..block.sublevels.len() {
                let room_table = ROOM_TABLES + (b as u16 * 8 + s as u16) * 8;
                self = self.poke_word(sublevel_table + s as u16 * 2, room_table);
            }
        }
        for room in room_ids() {
            let slot = self.room_table_slot(room);
            let base = self.room_base(room);
            self = self.poke_word(slot, base);
        }
        self
    }

    fn room_table_slot(&self, room: RoomId) -> u16 {
        ROOM_TABLES + (room.block as u16 * 8 + room.sublevel as u16) * 8 + room.room as u16 * 2
    }

    /// Address of the column data of `room`
    pub fn room_base(&self, room: RoomId) -> u16 {
        let seq = room_ids().position(|r| r == room).unwrap_or(0) as u16;
        ROOM_DATA + seq * ROOM_DATA_STRIDE
    }

    pub fn poke(mut self, address: u16, value: u8) -> Self {
        let bank = if address >= FIXED_BANK_START {
            FIXED_BANK
        } else {
            OBJECT_DATA_BANK
        };
        self.banks[bank][(address & BANK_MASK) as usize] = value;
        self
    }

    pub fn poke_word(self, address: u16, value: u16) -> Self {
        let [lo, hi] = value.to_le_bytes();
        self.poke(address, lo).poke(address.wrapping_add(1), hi)
    }

    pub fn offset(self, index: usize, value: u8) -> Self {
        let address = self.layout().offset_table + index as u16;
        self.poke(address, value)
    }

    pub fn object_pointer(self, index: u8, pointer: u16) -> Self {
        let slot = self.layout().object_pointer_slot(index);
        self.poke_word(slot, pointer)
    }

    /// Store a descriptor at an explicit address and point object `index` at it
    pub fn object_at(mut self, index: u8, pointer: u16, bytes: [u8; 5]) -> Self {
        for (i, byte) in bytes.into_iter().enumerate() {
            self = self.poke(pointer + i as u16, byte);
        }
        self.object_pointer(index, pointer)
    }

    /// Store a descriptor in the builder's descriptor area
    pub fn object(mut self, index: u8, bytes: [u8; 5]) -> Self {
        let pointer = self.next_descriptor;
        self.next_descriptor += 5;
        self.object_at(index, pointer, bytes)
    }

    /// Point `room` at arbitrary column data
    pub fn room_pointer(self, room: RoomId, pointer: u16) -> Self {
        let slot = self.room_table_slot(room);
        self.poke_word(slot, pointer)
    }

    /// Make `column` of `room` load `object`
    pub fn room_column(self, room: RoomId, column: u8, object: u8) -> Self {
        let address = self.room_base(room) + (column & 0x7F) as u16 * 2;
        self.poke(address, object)
    }

    pub fn build(&self) -> MemoryImage {
        MemoryImage::new(self.region, self.banks.clone())
            .expect("mock image always has 16 full banks")
    }

    /// Serialize as a complete iNES file
    pub fn to_ines_bytes(&self) -> Vec<u8> {
        let mut raw = ines_header(self.region.mapper(), false).to_vec();
        for bank in &self.banks {
            raw.extend_from_slice(bank);
        }
        raw.extend(std::iter::repeat_n(0u8, CHR_BANK_COUNT * CHR_BANK_SIZE));
        raw
    }
}
