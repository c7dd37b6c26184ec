//! Static game data extracted from the PRG ROM of one region.

use tracing::debug;

use super::layout::{
    BANK_MASK, CAMERA_COLUMN_MASK, DESCRIPTOR_SIZE, FIXED_BANK, FIXED_BANK_START, OBJECT_DATA_BANK,
    ROM_START, RegionLayout, TABLE_ENTRIES,
};
use crate::error::{Error, Result};
use crate::game::{BLOCKS, ObjectDescriptor, RoomId};
use crate::rom::{PRG_BANK_COUNT, PRG_BANK_SIZE, Region, Rom};

/// Immutable view of one region's ROM with the corruption-relevant tables
/// already extracted.
///
/// Reads go through the CPU address space the way the game sees it while
/// the object data bank is switched in: $8000-$BFFF maps to bank 10 and
/// $C000-$FFFF to the fixed bank. Pointers are masked to 14 bits and reads
/// are never clamped to the data a pointer was meant for.
#[derive(Debug, Clone)]
pub struct MemoryImage {
    region: Region,
    prg_banks: Vec<Vec<u8>>,
    offset_table: Vec<u8>,
    object_table: Vec<u16>,
    block_pointers: Vec<u16>,
    sublevel_pointers: Vec<Vec<u16>>,
    room_pointers: Vec<Vec<Vec<u16>>>,
}

impl MemoryImage {
    pub fn new(region: Region, prg_banks: Vec<Vec<u8>>) -> Result<Self> {
        if prg_banks.len() != PRG_BANK_COUNT {
            return Err(Error::InvalidImage(format!(
                "expected {} PRG banks, got {}",
                PRG_BANK_COUNT,
                prg_banks.len()
            )));
        }
        if let Some(bank) = prg_banks.iter().position(|b| b.len() != PRG_BANK_SIZE) {
            return Err(Error::InvalidImage(format!(
                "PRG bank {} is {} bytes, expected {}",
                bank,
                prg_banks[bank].len(),
                PRG_BANK_SIZE
            )));
        }

        let mut image = Self {
            region,
            prg_banks,
            offset_table: Vec::new(),
            object_table: Vec::new(),
            block_pointers: Vec::new(),
            sublevel_pointers: Vec::new(),
            room_pointers: Vec::new(),
        };
        image.extract_tables();
        Ok(image)
    }

    pub fn from_rom(rom: Rom) -> Result<Self> {
        Self::new(rom.region, rom.prg_banks)
    }

    fn extract_tables(&mut self) {
        let layout = *self.layout();

        self.offset_table = (0..TABLE_ENTRIES as u16)
            .map(|i| self.read_byte(layout.offset_table.wrapping_add(i)))
            .collect();
        self.object_table = self.read_words(layout.object_table, TABLE_ENTRIES);

        self.block_pointers = self.read_words(layout.block_pointer_table, BLOCKS.len());
        self.sublevel_pointers = BLOCKS
            .iter()
            .zip(&self.block_pointers)
            .map(|(block, &ptr)| self.read_words(ptr, block.sublevels.len()))
            .collect();
        self.room_pointers = BLOCKS
            .iter()
            .zip(&self.sublevel_pointers)
            .map(|(block, sublevels)| {
                block
                    .sublevels
                    .iter()
                    .zip(sublevels)
                    .map(|(sub, &ptr)| self.read_words(ptr, sub.room_count))
                    .collect()
            })
            .collect();

        debug!(
            "Extracted {} tables: offsets@${:04X}, objects@${:04X}, blocks@${:04X}",
            self.region, layout.offset_table, layout.object_table, layout.block_pointer_table
        );
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn layout(&self) -> &'static RegionLayout {
        RegionLayout::for_region(self.region)
    }

    pub fn prg_banks(&self) -> &[Vec<u8>] {
        &self.prg_banks
    }

    pub fn object_data_bank(&self) -> &[u8] {
        &self.prg_banks[OBJECT_DATA_BANK]
    }

    pub fn fixed_bank(&self) -> &[u8] {
        &self.prg_banks[FIXED_BANK]
    }

    /// Read a byte at a CPU address with the object data bank switched in.
    pub fn read_byte(&self, address: u16) -> u8 {
        let bank = if address >= FIXED_BANK_START {
            self.fixed_bank()
        } else {
            self.object_data_bank()
        };
        bank[(address & BANK_MASK) as usize]
    }

    /// Read a little-endian word at a CPU address.
    pub fn read_word(&self, address: u16) -> u16 {
        u16::from_le_bytes([
            self.read_byte(address),
            self.read_byte(address.wrapping_add(1)),
        ])
    }

    pub fn read_words(&self, address: u16, count: usize) -> Vec<u16> {
        (0..count)
            .map(|i| self.read_word(address.wrapping_add(i as u16 * 2)))
            .collect()
    }

    pub fn offset_table(&self) -> &[u8] {
        &self.offset_table
    }

    /// RAM offset applied to the object tables when the camera column is `index`
    pub fn offset(&self, index: usize) -> u8 {
        self.offset_table[index]
    }

    pub fn object_table(&self) -> &[u16] {
        &self.object_table
    }

    pub fn object_pointer(&self, index: u8) -> u16 {
        self.object_table[index as usize]
    }

    /// Resolve the descriptor for object `index`.
    ///
    /// Returns None when the pointer does not point into ROM.
    pub fn object_descriptor(&self, index: u8) -> Option<ObjectDescriptor> {
        let pointer = self.object_pointer(index);
        if pointer < ROM_START {
            return None;
        }

        let mut bytes = [0u8; DESCRIPTOR_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_byte(pointer.wrapping_add(i as u16));
        }
        Some(ObjectDescriptor {
            index,
            pointer,
            bytes,
        })
    }

    pub fn block_pointers(&self) -> &[u16] {
        &self.block_pointers
    }

    pub fn sublevel_pointer(&self, block: usize, sublevel: usize) -> u16 {
        self.sublevel_pointers[block][sublevel]
    }

    /// Pointer to the room's per-column object index array
    pub fn room_pointer(&self, room: RoomId) -> u16 {
        self.room_pointers[room.block][room.sublevel][room.room]
    }

    /// Address the game reads the object index from for `column`.
    ///
    /// Only the low 7 bits of the column are used; columns past the end of
    /// the room read whatever follows its data.
    pub fn room_column_address(&self, room: RoomId, column: u8) -> u16 {
        let column = (column & CAMERA_COLUMN_MASK) as u16;
        self.room_pointer(room).wrapping_add(column * 2)
    }

    /// Object index loaded for `column` of `room`.
    pub fn room_object_index(&self, room: RoomId, column: u8) -> u8 {
        self.read_byte(self.room_column_address(room, column))
    }

    /// Same as [`Self::room_object_index`] with unchecked coordinates.
    pub fn room_object_column_index(
        &self,
        block: usize,
        sublevel: usize,
        room: usize,
        column: u8,
    ) -> Result<u8> {
        let room = RoomId::new(block, sublevel, room)?;
        Ok(self.room_object_index(room, column))
    }
}
