//! Rendering of search results and table dumps.

mod format;
mod json;
mod objects;
mod rooms;
mod text;

pub use format::ReportFormat;
pub use json::{JsonReport, format_json_finding, format_json_report, format_json_write};
pub use objects::{
    OBJECT_CSV_HEADER, ObjectTableRow, object_table_row, object_table_rows, render_object_csv,
};
pub use rooms::{HierarchyLevel, RoomPointerRow, render_room_survey, room_pointer_rows};
pub use text::{
    TextReport, show_column, show_corrupt_write, show_finding, show_object, show_object_properties,
};
