//! iNES container loading.
//!
//! Both supported releases ship 256 KiB of PRG ROM and 128 KiB of CHR ROM.
//! The US cartridge uses MMC5 (mapper 5), the Japanese one VRC6a (mapper 24),
//! which is also how the region of a dump is recognized.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Region;
use crate::error::{Error, Result};

/// "NES" followed by MS-DOS end-of-file
pub const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
pub const INES_HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;

pub const PRG_BANK_SIZE: usize = 0x4000;
pub const CHR_BANK_SIZE: usize = 0x2000;

/// Number of 16 KiB PRG banks in both supported releases
pub const PRG_BANK_COUNT: usize = 16;
/// Number of 8 KiB CHR banks in both supported releases
pub const CHR_BANK_COUNT: usize = 16;

const FLAG6_TRAINER: u8 = 0x04;

/// A validated ROM dump with its PRG ROM split into 16 KiB banks.
#[derive(Debug, Clone)]
pub struct Rom {
    pub path: PathBuf,
    pub region: Region,
    pub mapper: u8,
    pub prg_banks: Vec<Vec<u8>>,
}

impl Rom {
    /// Read and validate a ROM file. Only `.nes` files are recognized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_ines = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("nes"));
        if !is_ines {
            return Err(Error::UnsupportedRomFormat(format!(
                "Unrecognized ROM file: {}",
                path.display()
            )));
        }

        let raw = fs::read(path)?;
        debug!("Read {} bytes from {}", raw.len(), path.display());
        let rom = Self::from_bytes(path, &raw)?;
        info!("Loaded {} ROM from {}", rom.region, path.display());
        Ok(rom)
    }

    /// Validate an in-memory iNES image. `path` is only used for error messages.
    pub fn from_bytes<P: AsRef<Path>>(path: P, raw: &[u8]) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let invalid = |reason: &str| Error::InvalidRom {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if raw.len() < INES_HEADER_SIZE || raw[..4] != INES_MAGIC {
            return Err(invalid("unexpected header"));
        }

        let prg_count = raw[4] as usize;
        let chr_count = raw[5] as usize;
        if prg_count != PRG_BANK_COUNT || chr_count != CHR_BANK_COUNT {
            return Err(invalid(&format!(
                "unexpected bank counts (PRG {}, CHR {})",
                prg_count, chr_count
            )));
        }

        let mapper = (raw[7] & 0xF0) | (raw[6] >> 4);
        let region = Region::from_mapper(mapper).ok_or_else(|| Error::UnsupportedMapper {
            path: path.clone(),
            mapper,
        })?;

        let trained = raw[6] & FLAG6_TRAINER != 0;
        let prg_start = if trained {
            INES_HEADER_SIZE + TRAINER_SIZE
        } else {
            INES_HEADER_SIZE
        };
        let prg_end = prg_start + PRG_BANK_COUNT * PRG_BANK_SIZE;
        if raw.len() < prg_end {
            return Err(invalid("file is shorter than its PRG ROM"));
        }

        let prg_banks = raw[prg_start..prg_end]
            .chunks_exact(PRG_BANK_SIZE)
            .map(<[u8]>::to_vec)
            .collect();

        Ok(Self {
            path,
            region,
            mapper,
            prg_banks,
        })
    }
}

/// Build an iNES header for the given mapper with 16 PRG and 16 CHR banks.
pub fn ines_header(mapper: u8, trainer: bool) -> [u8; INES_HEADER_SIZE] {
    let mut header = [0u8; INES_HEADER_SIZE];
    header[..4].copy_from_slice(&INES_MAGIC);
    header[4] = PRG_BANK_COUNT as u8;
    header[5] = CHR_BANK_COUNT as u8;
    header[6] = (mapper << 4) | if trainer { FLAG6_TRAINER } else { 0 };
    header[7] = mapper & 0xF0;
    header
}
