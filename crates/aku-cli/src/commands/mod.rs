//! CLI command implementations.

pub mod hex_utils;
pub mod objects;
pub mod rooms;
pub mod search;
pub mod target;

use std::fs;
use std::path::Path;

use aku_core::{MemoryImage, Rom};
use anyhow::{Context, Result};
use tracing::debug;

/// Load a ROM file and extract its tables.
pub fn load_image(path: &Path) -> Result<MemoryImage> {
    let rom = Rom::load(path).map_err(|e| {
        let context = if e.is_rom_rejected() {
            format!(
                "{} is not a Castlevania III ROM (expected an iNES dump, US MMC5 or JP VRC6)",
                path.display()
            )
        } else if e.is_not_found() {
            format!("ROM file not found: {}", path.display())
        } else {
            format!("Failed to load {}", path.display())
        };
        anyhow::Error::new(e).context(context)
    })?;
    let image = MemoryImage::from_rom(rom)?;
    debug!("Extracted tables of {}", path.display());
    Ok(image)
}

/// Print `content` or write it to `out`.
pub fn write_output(content: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
