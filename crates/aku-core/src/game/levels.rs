//! Level structure of the game
//!
//! Blocks are listed in the order of the ROM's block pointer table, which is
//! not the order of the in-game block letters (branching paths share letters).

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SublevelInfo {
    pub letter: &'static str,
    pub room_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub letter: char,
    pub name: &'static str,
    pub sublevels: &'static [SublevelInfo],
}

const fn sub(letter: &'static str, room_count: usize) -> SublevelInfo {
    SublevelInfo { letter, room_count }
}

pub static BLOCKS: [BlockInfo; 15] = [
    BlockInfo {
        letter: '1',
        name: "Village",
        sublevels: &[sub("01", 1), sub("02", 4), sub("03", 2), sub("04", 1)],
    },
    BlockInfo {
        letter: '2',
        name: "Clock Tower",
        sublevels: &[
            sub("01", 3),
            sub("02", 3),
            sub("03", 3),
            sub("04", 3),
            sub("05", 3),
            sub("06", 3),
        ],
    },
    BlockInfo {
        letter: '3',
        name: "Mad Forest",
        sublevels: &[sub("00", 2), sub("01", 1), sub("02", 2), sub("03", 3), sub("04", 2)],
    },
    BlockInfo {
        letter: '4',
        name: "Ghost Ship",
        sublevels: &[sub("0A", 3), sub("0B", 2), sub("0C", 2), sub("0D", 2), sub("0E", 3)],
    },
    BlockInfo {
        letter: '5',
        name: "Death Tower",
        sublevels: &[sub("0A", 3), sub("0B", 3), sub("0C", 3)],
    },
    BlockInfo {
        letter: '6',
        name: "Bridge",
        sublevels: &[sub("0A", 1), sub("0B", 1), sub("0C", 2), sub("0D", 2)],
    },
    BlockInfo {
        letter: '4',
        name: "Swamp",
        sublevels: &[sub("01", 2), sub("02", 1), sub("03", 3)],
    },
    BlockInfo {
        letter: '5',
        name: "Caves",
        sublevels: &[
            sub("01", 2),
            sub("02", 1),
            sub("03", 1),
            sub("04", 1),
            sub("05", 2),
            sub("06", 2),
            sub("07", 1),
        ],
    },
    BlockInfo {
        letter: '6',
        name: "Sunken City",
        sublevels: &[sub("01", 2), sub("02", 1), sub("03", 2), sub("04", 1), sub("05", 1)],
    },
    BlockInfo {
        letter: '6',
        name: "Crypt",
        sublevels: &[sub("01", 2), sub("02", 3)],
    },
    BlockInfo {
        letter: '7',
        name: "Cliffs",
        sublevels: &[
            sub("01", 2),
            sub("02", 1),
            sub("03", 1),
            sub("04", 2),
            sub("05", 3),
            sub("06", 2),
            sub("07", 3),
        ],
    },
    BlockInfo {
        letter: '7',
        name: "Aquarius",
        sublevels: &[sub("0A", 2), sub("0B", 2), sub("0C", 3)],
    },
    BlockInfo {
        letter: '8',
        name: "Deva Vu",
        sublevels: &[sub("01", 2), sub("02", 2), sub("03", 1)],
    },
    BlockInfo {
        letter: '9',
        name: "Riddle",
        sublevels: &[sub("01", 3), sub("02", 3), sub("03", 3), sub("04", 2)],
    },
    BlockInfo {
        letter: 'A',
        name: "Pressure",
        sublevels: &[sub("01", 3), sub("02", 2), sub("03", 2)],
    },
];

/// Coordinates of a single room in the block/sublevel/room hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RoomId {
    pub block: usize,
    pub sublevel: usize,
    pub room: usize,
}

impl RoomId {
    /// Validated constructor
    pub fn new(block: usize, sublevel: usize, room: usize) -> Result<Self> {
        let valid = BLOCKS
            .get(block)
            .and_then(|b| b.sublevels.get(sublevel))
            .is_some_and(|s| room < s.room_count);
        if !valid {
            return Err(Error::RoomOutOfRange {
                block,
                sublevel,
                room,
            });
        }
        Ok(Self {
            block,
            sublevel,
            room,
        })
    }

    pub fn block_info(&self) -> &'static BlockInfo {
        &BLOCKS[self.block]
    }

    /// In-game stage label, e.g. "2-04"
    pub fn stage_label(&self) -> String {
        let block = self.block_info();
        format!("{}-{}", block.letter, block.sublevels[self.sublevel].letter)
    }
}

/// Every valid room in block, sublevel, room order.
pub fn room_ids() -> impl Iterator<Item = RoomId> {
    BLOCKS.iter().enumerate().flat_map(|(block, info)| {
        info.sublevels
            .iter()
            .enumerate()
            .flat_map(move |(sublevel, sub)| {
                (0..sub.room_count).map(move |room| RoomId {
                    block,
                    sublevel,
                    room,
                })
            })
    })
}
