//! # aku-core
//!
//! Core library of the Castlevania III object corruption analyzer.
//!
//! This crate provides:
//! - iNES ROM loading and region detection
//! - Static table extraction from the object data bank
//! - The three-phase corruption search (camera offsets, object bytes, rooms)
//! - Text and JSON reports, object table and room pointer dumps

pub mod error;
pub mod game;
pub mod memory;
pub mod report;
pub mod rom;
pub mod search;

pub use error::{Error, Result};
pub use game::{BLOCKS, ObjectDescriptor, RamRole, RoomId, room_ids};
pub use memory::{AddressClass, MemoryImage, RegionLayout};
pub use report::{JsonReport, ReportFormat, TextReport};
pub use rom::{Region, Rom};
pub use search::{
    CorruptionSearch, PredicateKind, RegionOutcome, SearchParameters, SearchReport,
    ValuePredicate,
};
