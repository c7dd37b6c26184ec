use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported ROM format: {0}")]
    UnsupportedRomFormat(String),

    #[error("Invalid ROM {}: {reason}", path.display())]
    InvalidRom { path: PathBuf, reason: String },

    #[error("Unexpected mapper for {}: {mapper}", path.display())]
    UnsupportedMapper { path: PathBuf, mapper: u8 },

    #[error("Invalid memory image: {0}")]
    InvalidImage(String),

    #[error("Invalid value predicate: {0}")]
    InvalidPredicate(String),

    #[error("No target address given for any region")]
    NoTargetAddress,

    #[error("Object index out of range: {0} (expected 0-255)")]
    ObjectIndexOutOfRange(usize),

    #[error("Room out of range: block {block}, sublevel {sublevel}, room {room}")]
    RoomOutOfRange {
        block: usize,
        sublevel: usize,
        room: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if this error was caused by a rejected ROM file rather than by IO
    pub fn is_rom_rejected(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedRomFormat(_) | Error::InvalidRom { .. } | Error::UnsupportedMapper { .. }
        )
    }
}
