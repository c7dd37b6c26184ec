//! Object table dump
//!
//! One row per object index with its pointer slot, descriptor address and
//! descriptor bytes, as `;`-separated CSV.

use serde::Serialize;

use crate::error::Result;
use crate::game::{is_hard_mode_only, is_invalid_object, object_index};
use crate::memory::MemoryImage;
use crate::memory::layout::DESCRIPTOR_SIZE;

pub const OBJECT_CSV_HEADER: &str =
    "Index;Pointer Adr;OBJ Adr;Hard Mode;Invalid;Byte 0;Byte 1;Byte 2;Byte 3;Byte 4";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectTableRow {
    pub index: u8,
    /// Address of the object's slot in the pointer table
    pub pointer_slot: u16,
    /// Descriptor address read from the slot
    pub pointer: u16,
    pub hard_mode_only: bool,
    pub invalid: bool,
    /// None when the pointer does not point into ROM
    pub bytes: Option<[u8; DESCRIPTOR_SIZE]>,
}

impl ObjectTableRow {
    pub fn from_image(image: &MemoryImage, index: u8) -> Self {
        Self {
            index,
            pointer_slot: image.layout().object_pointer_slot(index),
            pointer: image.object_pointer(index),
            hard_mode_only: is_hard_mode_only(index),
            invalid: is_invalid_object(index),
            bytes: image.object_descriptor(index).map(|d| d.bytes),
        }
    }

    pub fn format_csv(&self) -> String {
        let bytes: Vec<String> = match &self.bytes {
            Some(bytes) => bytes.iter().map(|b| format!("${:02X}", b)).collect(),
            None => vec![String::new(); DESCRIPTOR_SIZE],
        };
        format!(
            "{};${:04X};${:04X};{};{};{}",
            self.index,
            self.pointer_slot,
            self.pointer,
            yes_no(self.hard_mode_only),
            yes_no(self.invalid),
            bytes.join(";")
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Rows for all 256 objects
pub fn object_table_rows(image: &MemoryImage) -> Vec<ObjectTableRow> {
    (0..=u8::MAX)
        .map(|index| ObjectTableRow::from_image(image, index))
        .collect()
}

/// Row for a single object, rejecting indices past the table
pub fn object_table_row(image: &MemoryImage, index: usize) -> Result<ObjectTableRow> {
    Ok(ObjectTableRow::from_image(image, object_index(index)?))
}

/// Render rows as CSV with the header line
pub fn render_object_csv(rows: &[ObjectTableRow]) -> String {
    let mut out = String::from(OBJECT_CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&row.format_csv());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MockRomBuilder;
    use crate::rom::Region;

    fn image() -> MemoryImage {
        MockRomBuilder::new(Region::Us)
            .object_at(3, 0xB900, [0x0C, 0x01, 0x80, 0x00, 0x2A])
            .object_at(230, 0xB910, [0x00, 0x00, 0x00, 0x00, 0x00])
            .build()
    }

    #[test]
    fn test_resolved_row() {
        let row = object_table_row(&image(), 3).unwrap();
        assert_eq!(row.pointer_slot, 0xA03F + 6);
        assert_eq!(row.pointer, 0xB900);
        assert_eq!(
            row.format_csv(),
            "3;$A045;$B900;No;No;$0C;$01;$80;$00;$2A"
        );
    }

    #[test]
    fn test_unresolved_row_has_empty_bytes() {
        let row = object_table_row(&image(), 4).unwrap();
        assert_eq!(row.bytes, None);
        assert_eq!(row.format_csv(), "4;$A047;$0000;No;No;;;;;");
    }

    #[test]
    fn test_flags() {
        let row = object_table_row(&image(), 230).unwrap();
        assert!(row.hard_mode_only);
        assert!(row.invalid);
        assert!(row.format_csv().starts_with("230;$A20B;$B910;Yes;Yes;"));
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(matches!(
            object_table_row(&image(), 256),
            Err(Error::ObjectIndexOutOfRange(256))
        ));
    }

    #[test]
    fn test_render_csv() {
        let csv = render_object_csv(&object_table_rows(&image()));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 257);
        assert_eq!(lines[0], OBJECT_CSV_HEADER);
        for line in &lines {
            assert_eq!(line.matches(';').count(), 9, "{}", line);
        }
    }
}
