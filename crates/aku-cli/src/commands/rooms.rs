//! Room pointer survey command.

use std::path::Path;

use aku_core::report::{render_room_survey, room_pointer_rows};
use anyhow::Result;

use super::{load_image, write_output};

pub fn run(rom: &Path) -> Result<()> {
    let image = load_image(rom)?;
    let rows = room_pointer_rows(&image);
    write_output(&render_room_survey(&image, &rows), None)
}
