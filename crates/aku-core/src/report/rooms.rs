//! Room pointer survey
//!
//! Lists every pointer of the block, sublevel and room hierarchy along with
//! where it lands in the CPU address space. Each block's room tables are
//! walked for 128 slots from the first sublevel's table, since a corrupted
//! room index can select any of them.

use std::fmt::Write;

use serde::Serialize;

use crate::game::BLOCKS;
use crate::memory::layout::FIXED_BANK_START;
use crate::memory::{AddressClass, MemoryImage};

/// Room slots reachable from one block's first room table
pub const ROOM_SLOTS_PER_BLOCK: usize = 128;

/// Offset into the room data the level byte is read from
pub const ROOM_LEVEL_BYTE_OFFSET: u16 = 0xAA;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum HierarchyLevel {
    Block {
        block: usize,
    },
    Sublevel {
        block: usize,
        sublevel: usize,
    },
    Room {
        block: usize,
        sublevel: usize,
        room: usize,
        /// Past the sublevel's room count
        out_of_bounds: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomPointerRow {
    #[serde(flatten)]
    pub level: HierarchyLevel,
    pub pointer: u16,
    pub class: AddressClass,
    /// Byte at pointer + $AA, when that stays in the switchable bank
    pub level_byte: Option<u8>,
}

impl RoomPointerRow {
    fn new(level: HierarchyLevel, pointer: u16) -> Self {
        Self {
            level,
            pointer,
            class: AddressClass::of(pointer),
            level_byte: None,
        }
    }

    fn room(image: &MemoryImage, level: HierarchyLevel, pointer: u16) -> Self {
        let class = AddressClass::of(pointer);
        let level_byte = (class == AddressClass::SwitchableBank
            && pointer + ROOM_LEVEL_BYTE_OFFSET < FIXED_BANK_START)
        .then(|| image.read_byte(pointer + ROOM_LEVEL_BYTE_OFFSET));
        Self {
            level,
            pointer,
            class,
            level_byte,
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self.level,
            HierarchyLevel::Room {
                out_of_bounds: true,
                ..
            }
        )
    }

    pub fn format_line(&self) -> String {
        let label = match self.level {
            HierarchyLevel::Block { block } => {
                format!("BLK {:X} ({})", block, BLOCKS[block].name)
            }
            HierarchyLevel::Sublevel { block, sublevel } => {
                let info = &BLOCKS[block];
                format!(
                    "  {:X}-{} ({}-{})",
                    block, sublevel, info.letter, info.sublevels[sublevel].letter
                )
            }
            HierarchyLevel::Room {
                room,
                out_of_bounds,
                ..
            } => format!("      {:02X}{}", room, if out_of_bounds { " *" } else { "" }),
        };
        let target = match (self.level, self.level_byte) {
            (_, Some(byte)) => format!(
                "@ [${:04X}],${:02X} -> ${:02X}",
                self.pointer, ROOM_LEVEL_BYTE_OFFSET, byte
            ),
            (HierarchyLevel::Room { .. }, None) if self.class.is_rom() => "[ROM] [?]".to_string(),
            _ => self.class.label().to_string(),
        };
        format!("{:<24} - ${:04X} - {}", label, self.pointer, target)
    }
}

/// Pointers in hierarchy order: each block, then the 128 room slots read
/// from its first room table. A sublevel row precedes the slots from its
/// table onward; room numbers restart there.
pub fn room_pointer_rows(image: &MemoryImage) -> Vec<RoomPointerRow> {
    let mut rows = Vec::new();
    for (block, info) in BLOCKS.iter().enumerate() {
        rows.push(RoomPointerRow::new(
            HierarchyLevel::Block { block },
            image.block_pointers()[block],
        ));
        let starts: Vec<u16> = (0..info.sublevels.len())
            .map(|s| image.sublevel_pointer(block, s))
            .collect();
        let mut slot = starts[0];
        let mut sublevel = 0;
        let mut room = 0;
        rows.push(RoomPointerRow::new(
            HierarchyLevel::Sublevel { block, sublevel },
            starts[0],
        ));
        for _ in 0..ROOM_SLOTS_PER_BLOCK {
            if sublevel + 1 < starts.len() && slot >= starts[sublevel + 1] {
                sublevel += 1;
                room = 0;
                rows.push(RoomPointerRow::new(
                    HierarchyLevel::Sublevel { block, sublevel },
                    starts[sublevel],
                ));
            }
            let level = HierarchyLevel::Room {
                block,
                sublevel,
                room,
                out_of_bounds: room >= info.sublevels[sublevel].room_count,
            };
            rows.push(RoomPointerRow::room(image, level, image.read_word(slot)));
            slot = slot.wrapping_add(2);
            room += 1;
        }
        // Tables starting past the walk
        for (s, &start) in starts.iter().enumerate().skip(sublevel + 1) {
            rows.push(RoomPointerRow::new(
                HierarchyLevel::Sublevel { block, sublevel: s },
                start,
            ));
        }
    }
    rows
}

pub fn render_room_survey(image: &MemoryImage, rows: &[RoomPointerRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Room pointers ({} ROM, block table ${:04X})\n",
        image.region(),
        image.layout().block_pointer_table
    );
    for row in rows {
        let _ = writeln!(out, "{}", row.format_line());
    }
    let rooms = || rows.iter().filter(|r| matches!(r.level, HierarchyLevel::Room { .. }));
    let outside_rom = rooms().filter(|r| !r.class.is_rom()).count();
    let reachable = rooms()
        .filter(|r| r.is_out_of_bounds() && r.level_byte.is_some())
        .count();
    let _ = writeln!(out, "\n{} room pointers outside ROM", outside_rom);
    let _ = writeln!(
        out,
        "{} out-of-bounds rooms point at readable room data (*)",
        reachable
    );
    out
}
