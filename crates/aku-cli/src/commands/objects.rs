//! Object table dump command.

use std::path::Path;

use aku_core::report::{object_table_row, object_table_rows, render_object_csv};
use anyhow::Result;
use tracing::info;

use super::hex_utils::{format_address, parse_number};
use super::{load_image, write_output};

pub fn run(rom: &Path, out: Option<&Path>, index: Option<&str>) -> Result<()> {
    let index = index.map(parse_number).transpose()?;
    let image = load_image(rom)?;
    info!(
        "Object table at {}",
        format_address(image.layout().object_table)
    );

    let rows = match index {
        Some(index) => vec![object_table_row(&image, index as usize)?],
        None => object_table_rows(&image),
    };
    write_output(&render_object_csv(&rows), out)
}
