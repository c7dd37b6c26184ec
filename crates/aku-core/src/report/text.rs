//! Human-readable report layout.

use std::fmt::Write;

use super::format::ReportFormat;
use crate::game::{BLOCKS, RamRole};
use crate::memory::RegionLayout;
use crate::search::{
    CandidateWrite, FeasibleOffset, Finding, RegionOutcome, RegionSearch, SearchReport,
    written_address,
};

/// Plain text renderer, one section per search phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReport;

impl ReportFormat for TextReport {
    fn render(&self, report: &SearchReport) -> String {
        let mut out = String::new();
        let addresses: Vec<String> = report
            .parameters
            .targets()
            .map(|(region, address)| format!("{} ${:04X}", region.short_name(), address))
            .collect();
        let _ = writeln!(out, "Target addresses: {}", addresses.join(", "));
        let _ = writeln!(out, "Target values: {}", report.parameters.predicate());
        out.push('\n');

        for outcome in &report.regions {
            match outcome {
                RegionOutcome::Skipped {
                    region,
                    target_address,
                } => {
                    let _ = writeln!(
                        out,
                        "Region {}, Target Address: ${:02X}\n",
                        region, target_address
                    );
                    out.push_str("No ROM with this region loaded! Skipping...\n\n");
                }
                RegionOutcome::Searched(search) => render_region(&mut out, search),
            }
        }
        out
    }

    fn render_all(&self, reports: &[SearchReport]) -> String {
        let mut out = String::new();
        for (i, report) in reports.iter().enumerate() {
            let _ = writeln!(
                out,
                "------------------ Starting Corruption Search {} ------------------\n",
                i + 1
            );
            out.push_str(&self.render(report));
            out.push_str("------------------------------------------------------------------\n\n");
        }
        out
    }
}

fn render_region(out: &mut String, search: &RegionSearch) {
    let _ = writeln!(
        out,
        "Region {}, Target Address: ${:02X}\n",
        search.region, search.target_address
    );

    out.push_str("i.   Searching for camera positions to corrupt target address...\n\n");
    for table in &search.feasibility.tables {
        for offset in &table.offsets {
            let _ = write!(
                out,
                "Offset {} - Can corrupt {}",
                show_column(offset),
                show_corrupt_write(table.table, offset.offset)
            );
            match table.role.value_note() {
                Some(note) => {
                    let _ = writeln!(out, "   {}", note);
                }
                None => out.push('\n'),
            }
        }
    }
    if !search.feasibility.any_feasible() {
        out.push_str("No out-of-bounds camera position redirects an object write to the target.\n");
    }
    out.push('\n');

    out.push_str("ii.  Searching for objects that can provide the target value...\n\n");
    let mut placed = 0;
    for (offset, write) in search.placed_candidates() {
        placed += 1;
        let _ = writeln!(
            out,
            "Offset {} - Can write value ${:02X} from {} to {}{}",
            show_column(&offset),
            write.value,
            show_object(write),
            show_corrupt_write(write.target_table(), offset.offset),
            show_object_properties(write)
        );
    }
    if placed == 0 {
        out.push_str("No object provides an acceptable value for a reachable table.\n");
    }
    out.push('\n');

    out.push_str(
        "iii. Searching for rooms in the game that define a matching object at the given camera offset...\n\n",
    );
    let layout = RegionLayout::for_region(search.region);
    for finding in &search.findings {
        let _ = writeln!(out, "{}", show_finding(finding, layout));
    }
    if search.findings.is_empty() {
        if placed == 0 {
            out.push_str("Nothing to look for, no object can provide the target value.\n");
        } else {
            out.push_str(
                "No room loads a matching object at a feasible camera offset. The object index \
                 pointer would have to be corrupted instead.\n",
            );
        }
        render_candidate_diagnostics(out, search);
    }
    out.push('\n');
}

fn render_candidate_diagnostics(out: &mut String, search: &RegionSearch) {
    let unreachable: Vec<String> = search
        .feasibility
        .unreachable_tables()
        .map(show_table)
        .collect();
    if !unreachable.is_empty() {
        let _ = writeln!(out, "Unreachable tables: {}", unreachable.join(", "));
    }
    let unpredictable: Vec<String> = search
        .feasibility
        .tables
        .iter()
        .filter(|t| t.is_feasible() && !t.statically_predictable)
        .map(|t| show_table(t.role))
        .collect();
    if !unpredictable.is_empty() {
        let _ = writeln!(
            out,
            "Reachable but not predictable from ROM: {}",
            unpredictable.join(", ")
        );
    }
    let empty: Vec<String> = search
        .tables_without_candidates()
        .into_iter()
        .filter(|role| role.target().statically_predictable)
        .map(show_table)
        .collect();
    if !empty.is_empty() {
        let _ = writeln!(
            out,
            "No object writes an acceptable value to: {}",
            empty.join(", ")
        );
    }
    let _ = writeln!(
        out,
        "{} of 256 objects have no descriptor in ROM",
        search.unresolvable_objects.len()
    );
}

fn show_table(role: RamRole) -> String {
    format!("${:X} ({})", role.address(), role)
}

/// Camera column with the scroll positions that select it
pub fn show_column(offset: &FeasibleOffset) -> String {
    let (start, end) = offset.camera_pixels();
    format!(
        "${:02X} (Cam: {:5}-{:5} / ${:04X})",
        offset.index, start, end, start
    )
}

pub fn show_object(write: &CandidateWrite) -> String {
    match write.source_byte {
        Some(byte) => format!("OBJ ${:02X} (byte {})", write.object_index, byte),
        None => format!("OBJ ${:02X} (byte -)", write.object_index),
    }
}

pub fn show_corrupt_write(table: u16, offset: u8) -> String {
    format!(
        "${:X} + ${:02X} -> ${:02X}",
        table,
        offset,
        written_address(table, offset)
    )
}

pub fn show_object_properties(write: &CandidateWrite) -> &'static str {
    if write.is_invalid() {
        "   (Invalid Object)"
    } else if write.is_hard_mode_only() {
        "   (Hard Mode)"
    } else {
        ""
    }
}

pub fn show_finding(finding: &Finding, layout: &RegionLayout) -> String {
    let room = finding.room;
    let block = &BLOCKS[room.block];
    format!(
        "Block {:X} ({}), Sublevel {:X} ({}), Room {}, Column {}   << [${:02X}]: ${:04X} [${:02X},${:02X}]: ${:04X} >>   - Writing value ${:02X} from {} to {}{}",
        room.block,
        block.name,
        room.sublevel,
        room.stage_label(),
        room.room,
        show_column(&finding.column),
        layout.obj_idx_ptr,
        finding.room_pointer,
        layout.obj_idx_ptr,
        layout.load_column,
        finding.column_address,
        finding.write.value,
        show_object(&finding.write),
        show_corrupt_write(finding.write.target_table(), finding.column.offset),
        show_object_properties(&finding.write)
    )
}
