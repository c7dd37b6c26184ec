//! JSON report format implementation

use serde_json::{Value as JsonValue, json};

use super::format::ReportFormat;
use crate::search::{CandidateWrite, Finding, RegionOutcome, RegionSearch, SearchReport};

/// JSON renderer (pretty printed, one document per search)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl ReportFormat for JsonReport {
    fn render(&self, report: &SearchReport) -> String {
        pretty(&format_json_report(report))
    }

    fn render_all(&self, reports: &[SearchReport]) -> String {
        let entries: Vec<JsonValue> = reports.iter().map(format_json_report).collect();
        pretty(&JsonValue::Array(entries))
    }
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Generate the JSON document for one search
pub fn format_json_report(report: &SearchReport) -> JsonValue {
    let regions: Vec<JsonValue> = report.regions.iter().map(format_json_region).collect();
    json!({
        "targets": report
            .parameters
            .targets()
            .map(|(region, address)| json!({ "region": region, "address": address }))
            .collect::<Vec<_>>(),
        "predicate": report.parameters.predicate(),
        "predicate_text": report.parameters.predicate().to_string(),
        "regions": regions
    })
}

fn format_json_region(outcome: &RegionOutcome) -> JsonValue {
    match outcome {
        RegionOutcome::Skipped {
            region,
            target_address,
        } => json!({
            "region": region,
            "target_address": target_address,
            "status": "skipped"
        }),
        RegionOutcome::Searched(search) => format_json_search(search),
    }
}

fn format_json_search(search: &RegionSearch) -> JsonValue {
    let offsets: Vec<JsonValue> = search
        .feasibility
        .tables
        .iter()
        .flat_map(|table| {
            table.offsets.iter().map(move |offset| {
                let (start, end) = offset.camera_pixels();
                json!({
                    "role": table.role,
                    "table": table.table,
                    "column": offset.index,
                    "offset": offset.offset,
                    "camera_pixels": [start, end],
                    "statically_predictable": table.statically_predictable
                })
            })
        })
        .collect();

    json!({
        "region": search.region,
        "target_address": search.target_address,
        "status": "searched",
        "feasible_offsets": offsets,
        "unreachable_tables": search.feasibility.unreachable_tables().collect::<Vec<_>>(),
        "candidates": search.candidates.iter().map(format_json_write).collect::<Vec<_>>(),
        "unresolvable_objects": search.unresolvable_objects,
        "findings": search.findings.iter().map(format_json_finding).collect::<Vec<_>>()
    })
}

/// Generate JSON entry for one candidate write, with the object flags
pub fn format_json_write(write: &CandidateWrite) -> JsonValue {
    json!({
        "object": write.object_index,
        "role": write.role,
        "table": write.target_table(),
        "value": write.value,
        "source_byte": write.source_byte,
        "hard_mode_only": write.is_hard_mode_only(),
        "invalid": write.is_invalid()
    })
}

pub fn format_json_finding(finding: &Finding) -> JsonValue {
    let room = finding.room;
    json!({
        "block": room.block,
        "sublevel": room.sublevel,
        "room": room.room,
        "block_name": room.block_info().name,
        "stage": room.stage_label(),
        "column": finding.column.index,
        "offset": finding.column.offset,
        "room_pointer": finding.room_pointer,
        "column_address": finding.column_address,
        "write": format_json_write(&finding.write)
    })
}
