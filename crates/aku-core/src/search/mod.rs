//! Corruption search over the static game data.
//!
//! # Search Strategy
//!
//! The object loader writes a descriptor into a set of RAM tables at a slot
//! taken from the offset table, indexed by the camera column. Columns past
//! the end of the offset table's intended range yield arbitrary slots, so a
//! write can land anywhere in the 2 KiB of RAM. The search works backwards
//! from the target address in three phases:
//!
//! 1. Camera offsets: out-of-bounds columns whose offset moves a table
//!    write onto the target.
//! 2. Object bytes: descriptors that would write an acceptable value into
//!    one of the tables reached in phase 1.
//! 3. Rooms: rooms whose object index array, read at that column (usually
//!    past its end), yields one of the phase-2 objects.
//!
//! An empty result is not an error; the intermediate phases are kept in
//! the report to explain where the chain breaks.

mod params;
mod predicate;
mod types;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::game::{OBJ_RAM_TARGETS, OFFSET_TABLE_WINDOW, RamRole, WriteSource, room_ids};
use crate::memory::MemoryImage;
use crate::memory::layout::RAM_MASK;
use crate::rom::Region;

pub use params::SearchParameters;
pub use predicate::{PredicateKind, ValuePredicate};
pub use types::*;

/// Runs [`SearchParameters`] against one image per region.
pub struct CorruptionSearch<'a> {
    images: BTreeMap<Region, &'a MemoryImage>,
}

impl<'a> CorruptionSearch<'a> {
    pub fn new<I>(images: I) -> Self
    where
        I: IntoIterator<Item = &'a MemoryImage>,
    {
        let mut by_region = BTreeMap::new();
        for image in images {
            if by_region.contains_key(&image.region()) {
                warn!(
                    "More than one {} ROM loaded, using the first one",
                    image.region()
                );
                continue;
            }
            by_region.insert(image.region(), image);
        }
        Self { images: by_region }
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.images.keys().copied()
    }

    /// Search every region named in `params`.
    ///
    /// Regions without a loaded image are reported as skipped.
    pub fn run(&self, params: &SearchParameters) -> SearchReport {
        let regions = params
            .targets()
            .map(|(region, target)| match self.images.get(&region) {
                Some(image) => {
                    RegionOutcome::Searched(search_region(image, target, params.predicate()))
                }
                None => {
                    warn!("No ROM with region {} loaded, skipping", region);
                    RegionOutcome::Skipped {
                        region,
                        target_address: target,
                    }
                }
            })
            .collect();

        SearchReport {
            parameters: params.clone(),
            regions,
        }
    }
}

/// Run all three phases for one image.
pub fn search_region(
    image: &MemoryImage,
    target_address: u16,
    predicate: &ValuePredicate,
) -> RegionSearch {
    info!(
        "Searching {} ROM for writes to ${:04X} ({})",
        image.region(),
        target_address,
        predicate
    );
    if target_address > RAM_MASK {
        warn!(
            "Target ${:04X} is outside internal RAM, object writes cannot reach it",
            target_address
        );
    }

    debug!("Phase 1: Searching camera offsets...");
    let feasibility = find_camera_offsets(image, target_address);
    debug!(
        "  {} feasible (table, offset) pairs",
        feasibility.pairs().count()
    );

    debug!("Phase 2: Searching object descriptors...");
    let (candidates, unresolvable_objects) = find_candidate_writes(image, &feasibility, predicate);
    debug!(
        "  {} candidate writes, {} unresolvable objects",
        candidates.len(),
        unresolvable_objects.len()
    );

    debug!("Phase 3: Searching rooms...");
    let findings = find_rooms(image, &feasibility, &candidates);
    info!("  {} room matches in {} ROM", findings.len(), image.region());

    RegionSearch {
        region: image.region(),
        target_address,
        feasibility,
        candidates,
        unresolvable_objects,
        findings,
    }
}

/// Phase 1: for each object RAM table, the out-of-bounds columns whose
/// offset moves the table write onto `target_address`.
pub fn find_camera_offsets(image: &MemoryImage, target_address: u16) -> CameraFeasibility {
    let tables = OBJ_RAM_TARGETS
        .iter()
        .map(|target| {
            let offsets = image
                .offset_table()
                .iter()
                .enumerate()
                .skip(OFFSET_TABLE_WINDOW)
                .filter(|&(_, &offset)| written_address(target.address, offset) == target_address)
                .map(|(index, &offset)| FeasibleOffset {
                    index: index as u8,
                    offset,
                })
                .collect();
            TableFeasibility {
                role: target.role,
                table: target.address,
                statically_predictable: target.statically_predictable,
                offsets,
            }
        })
        .collect();

    CameraFeasibility {
        target_address,
        tables,
    }
}

/// Phase 2: descriptor bytes that satisfy `predicate` and go into a table
/// reached in phase 1.
///
/// Returns the candidates in object index order, then table order, along
/// with the objects whose descriptor could not be resolved.
pub fn find_candidate_writes(
    image: &MemoryImage,
    feasibility: &CameraFeasibility,
    predicate: &ValuePredicate,
) -> (Vec<CandidateWrite>, Vec<u8>) {
    let mut candidates = Vec::new();
    let mut unresolvable = Vec::new();

    for object_index in 0..=u8::MAX {
        let Some(descriptor) = image.object_descriptor(object_index) else {
            debug!(
                "  OBJ ${:02X}: pointer ${:04X} is not in ROM, skipping",
                object_index,
                image.object_pointer(object_index)
            );
            unresolvable.push(object_index);
            continue;
        };

        for target in OBJ_RAM_TARGETS.iter() {
            if !target.statically_predictable || !feasibility.is_feasible(target.role) {
                continue;
            }
            // A zero type byte ends the write sequence after the type table
            if target.role != RamRole::Type && descriptor.terminates_early() {
                break;
            }
            let Some(value) = descriptor.value_for(target.role) else {
                continue;
            };
            if !predicate.matches(value) {
                continue;
            }

            let source_byte = match target.source {
                WriteSource::DescriptorByte(n) => Some(n),
                _ => None,
            };
            candidates.push(CandidateWrite {
                object_index,
                role: target.role,
                value,
                source_byte,
            });
        }
    }

    (candidates, unresolvable)
}

/// Phase 3: rooms whose object index array, read at a feasible column,
/// yields a candidate object for that column's table.
///
/// Findings are ordered by table, offset index, object index, then room.
pub fn find_rooms(
    image: &MemoryImage,
    feasibility: &CameraFeasibility,
    candidates: &[CandidateWrite],
) -> Vec<Finding> {
    let by_object: HashMap<(u8, RamRole), &CandidateWrite> = candidates
        .iter()
        .map(|c| ((c.object_index, c.role), c))
        .collect();

    let mut findings = Vec::new();
    for (role, column) in feasibility.pairs() {
        let mut matches: Vec<Finding> = room_ids()
            .filter_map(|room| {
                let object_index = image.room_object_index(room, column.index);
                by_object
                    .get(&(object_index, role))
                    .map(|write| Finding {
                        region: image.region(),
                        room,
                        column,
                        write: **write,
                        room_pointer: image.room_pointer(room),
                        column_address: image.room_column_address(room, column.index),
                        target_address: feasibility.target_address,
                    })
            })
            .collect();
        matches.sort_by_key(|f| f.write.object_index);
        findings.extend(matches);
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RoomId;
    use crate::memory::MockRomBuilder;
    use proptest::prelude::*;

    fn any_predicate() -> ValuePredicate {
        ValuePredicate::Any
    }

    #[test]
    fn test_phase1_finds_offset() {
        let image = MockRomBuilder::new(Region::Us).offset(50, 0x12).build();
        let feasibility = find_camera_offsets(&image, 0x7D4);

        let type_table = feasibility.table(RamRole::Type).unwrap();
        assert_eq!(
            type_table.offsets,
            vec![FeasibleOffset {
                index: 50,
                offset: 0x12
            }]
        );
    }

    #[test]
    fn test_phase1_mutated_offset_removes_index() {
        for value in [0x00u8, 0x11, 0x13, 0x92, 0xFF] {
            let image = MockRomBuilder::new(Region::Us).offset(50, value).build();
            let feasibility = find_camera_offsets(&image, 0x7D4);
            assert!(
                !feasibility
                    .table(RamRole::Type)
                    .unwrap()
                    .offsets
                    .iter()
                    .any(|o| o.index == 50),
                "offset {:#x}",
                value
            );
        }
    }

    #[test]
    fn test_phase1_ignores_in_bounds_columns() {
        let image = MockRomBuilder::new(Region::Us)
            .offset(47, 0x12)
            .offset(48, 0x12)
            .build();
        let feasibility = find_camera_offsets(&image, 0x7D4);
        let indices: Vec<u8> = feasibility
            .table(RamRole::Type)
            .unwrap()
            .offsets
            .iter()
            .map(|o| o.index)
            .collect();
        assert_eq!(indices, vec![48]);
    }

    #[test]
    fn test_phase1_scans_every_table() {
        // Target $7D4 is reached from $7C2 with +$12 and from $7D4 itself with +0
        let image = MockRomBuilder::new(Region::Japan).offset(60, 0x12).build();
        let feasibility = find_camera_offsets(&image, 0x7D4);

        assert_eq!(feasibility.tables.len(), 7);
        assert!(feasibility.is_feasible(RamRole::Type));
        // The zeroed rest of the table keeps the Y table at its own address
        let y = feasibility.table(RamRole::Y).unwrap();
        assert!(y.offsets.iter().all(|o| o.offset == 0));
        assert_eq!(y.offsets.len(), 256 - OFFSET_TABLE_WINDOW - 1);
        assert!(!feasibility.is_feasible(RamRole::Timer));
    }

    #[test]
    fn test_phase2_respects_feasibility_and_predicate() {
        let image = MockRomBuilder::new(Region::Us)
            .offset(50, 0x12)
            .object(3, [0x20, 0x01, 0x02, 0x03, 0x04])
            .object(4, [0x21, 0x01, 0x02, 0x03, 0x04])
            .build();
        let feasibility = find_camera_offsets(&image, 0x7D4);
        let predicate = ValuePredicate::equal_to_one_of([0x20]).unwrap();
        let (candidates, unresolvable) = find_candidate_writes(&image, &feasibility, &predicate);

        assert_eq!(
            candidates,
            vec![CandidateWrite {
                object_index: 3,
                role: RamRole::Type,
                value: 0x20,
                source_byte: Some(0),
            }]
        );
        assert_eq!(unresolvable.len(), 254);
        assert!(!unresolvable.contains(&3));
    }

    #[test]
    fn test_phase2_zero_type_byte_stops_chain() {
        // Offset 0 makes every table write land on itself, so target each table in turn
        let image = MockRomBuilder::new(Region::Us)
            .offset(70, 0x00)
            .offset(71, 0x06)
            .offset(72, 0x0C)
            .offset(73, 0x12)
            .offset(74, 0x18)
            .offset(75, 0x1E)
            .offset(76, 0x24)
            .object(9, [0x00, 0x55, 0x66, 0x77, 0x88])
            .build();

        for table in [0x7D4u16, 0x7E6, 0x7CE, 0x7C8] {
            let feasibility = find_camera_offsets(&image, table);
            let (candidates, _) = find_candidate_writes(&image, &feasibility, &any_predicate());
            assert!(
                candidates
                    .iter()
                    .all(|c| c.object_index != 9 || c.role == RamRole::Type),
                "target {:#x}: {:?}",
                table,
                candidates
            );
        }

        let feasibility = find_camera_offsets(&image, 0x7C2);
        let predicate = ValuePredicate::equal_to_one_of([0x00]).unwrap();
        let (candidates, _) = find_candidate_writes(&image, &feasibility, &predicate);
        assert!(candidates.contains(&CandidateWrite {
            object_index: 9,
            role: RamRole::Type,
            value: 0,
            source_byte: Some(0),
        }));
    }

    #[test]
    fn test_phase2_byte_roles() {
        // Target $7E6: Y ($7D4) needs +$12, Unknown ($7E6) needs +0
        let image = MockRomBuilder::new(Region::Us)
            .offset(80, 0x12)
            .offset(81, 0x00)
            .offset(82, 0x0C)
            .object(1, [0x10, 0x11, 0x12, 0x13, 0x14])
            .build();
        let feasibility = find_camera_offsets(&image, 0x7E6);
        let (candidates, _) = find_candidate_writes(&image, &feasibility, &any_predicate());

        let object_1: Vec<_> = candidates.iter().filter(|c| c.object_index == 1).collect();
        assert!(object_1.iter().any(|c| c.role == RamRole::Y
            && c.value == 0x12
            && c.source_byte == Some(2)));
        assert!(object_1.iter().any(|c| c.role == RamRole::Unknown
            && c.value == 0x13
            && c.source_byte == Some(3)));
        // X is never predicted, even though $7DA + $0C reaches the target
        assert!(feasibility.is_feasible(RamRole::X));
        assert!(object_1.iter().all(|c| c.role != RamRole::X));
    }

    #[test]
    fn test_phase2_state_write_is_fixed_zero() {
        // $7C8 + $0C = $7D4
        let image = MockRomBuilder::new(Region::Us)
            .offset(100, 0x0C)
            .object(5, [0x44, 0x00, 0x00, 0x00, 0x00])
            .build();
        let feasibility = find_camera_offsets(&image, 0x7D4);
        let (candidates, _) = find_candidate_writes(&image, &feasibility, &any_predicate());
        assert!(candidates.contains(&CandidateWrite {
            object_index: 5,
            role: RamRole::State,
            value: 0,
            source_byte: None,
        }));

        let nonzero = ValuePredicate::GreaterThan(0);
        let (candidates, _) = find_candidate_writes(&image, &feasibility, &nonzero);
        assert!(candidates.iter().all(|c| c.role != RamRole::State));
    }

    #[test]
    fn test_phase3_finds_room() {
        let room = RoomId::new(2, 3, 1).unwrap();
        let image = MockRomBuilder::new(Region::Us)
            .offset(50, 0x12)
            .object(0xD2, [0x20, 0, 0, 0, 0])
            .room_column(room, 50, 0xD2)
            .build();
        let predicate = ValuePredicate::equal_to_one_of([0x20]).unwrap();
        let search = search_region(&image, 0x7D4, &predicate);

        assert_eq!(search.findings.len(), 1);
        let finding = &search.findings[0];
        assert_eq!(finding.room, room);
        assert_eq!(finding.column.index, 50);
        assert_eq!(finding.write.object_index, 0xD2);
        assert_eq!(finding.write.role, RamRole::Type);
        assert_eq!(finding.column_address, finding.room_pointer + 100);
        assert_eq!(finding.target_address, 0x7D4);
        assert!(finding.is_hard_mode_only());
        assert!(!finding.is_invalid());
    }

    #[test]
    fn test_phase3_invalid_object_flag() {
        let room = RoomId::new(0, 1, 2).unwrap();
        let image = MockRomBuilder::new(Region::Japan)
            .offset(64, 0x12)
            .object(230, [0x20, 0, 0, 0, 0])
            .room_column(room, 64, 230)
            .build();
        let search = search_region(&image, 0x7D4, &ValuePredicate::equal_to_one_of([0x20]).unwrap());
        assert_eq!(search.findings.len(), 1);
        assert!(search.findings[0].is_invalid());
        assert!(search.findings[0].is_hard_mode_only());
    }

    #[test]
    fn test_phase3_ordering() {
        let first = RoomId::new(0, 0, 0).unwrap();
        let second = RoomId::new(5, 2, 0).unwrap();
        let third = RoomId::new(9, 1, 1).unwrap();
        let image = MockRomBuilder::new(Region::Us)
            .offset(50, 0x12)
            .offset(49, 0x12)
            .object(7, [0x20, 0, 0, 0, 0])
            .object(3, [0x20, 0, 0, 0, 0])
            .room_column(first, 50, 7)
            .room_column(second, 50, 3)
            .room_column(third, 50, 7)
            .room_column(third, 49, 3)
            .build();
        let predicate = ValuePredicate::equal_to_one_of([0x20]).unwrap();
        let search = search_region(&image, 0x7D4, &predicate);

        let order: Vec<(u8, u8, RoomId)> = search
            .findings
            .iter()
            .map(|f| (f.column.index, f.write.object_index, f.room))
            .collect();
        assert_eq!(
            order,
            vec![(49, 3, third), (50, 3, second), (50, 7, first), (50, 7, third)]
        );
    }

    #[test]
    fn test_run_skips_missing_region() {
        let image = MockRomBuilder::new(Region::Us).build();
        let search = CorruptionSearch::new([&image]);
        let params =
            SearchParameters::from_addresses(None, Some(0x34), ValuePredicate::Any).unwrap();
        let report = search.run(&params);

        assert_eq!(report.findings().count(), 0);
        assert_eq!(report.skipped_regions().collect::<Vec<_>>(), vec![Region::Japan]);
        assert_eq!(
            report.regions,
            vec![RegionOutcome::Skipped {
                region: Region::Japan,
                target_address: 0x34
            }]
        );
    }

    #[test]
    fn test_run_searches_each_region() {
        let us = MockRomBuilder::new(Region::Us).offset(50, 0x12).build();
        let jp = MockRomBuilder::new(Region::Japan).build();
        let search = CorruptionSearch::new([&jp, &us]);
        assert_eq!(search.regions().collect::<Vec<_>>(), vec![Region::Us, Region::Japan]);

        let params =
            SearchParameters::from_addresses(Some(0x7D4), Some(0x7D5), ValuePredicate::Any)
                .unwrap();
        let report = search.run(&params);
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.regions[0].region(), Region::Us);
        assert_eq!(report.regions[1].region(), Region::Japan);
        match &report.regions[0] {
            RegionOutcome::Searched(us) => assert!(us.feasibility.is_feasible(RamRole::Type)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_run_is_deterministic() {
        let room = RoomId::new(7, 4, 1).unwrap();
        let image = MockRomBuilder::new(Region::Us)
            .offset(50, 0x12)
            .offset(90, 0x00)
            .object(1, [0x20, 1, 0x20, 3, 4])
            .room_column(room, 50, 1)
            .room_column(room, 90, 1)
            .build();
        let search = CorruptionSearch::new([&image]);
        let params = SearchParameters::from_addresses(Some(0x7D4), None, ValuePredicate::Any)
            .unwrap();

        let first = search.run(&params);
        let second = search.run(&params);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert!(first.findings().count() >= 2);
    }

    proptest! {
        #[test]
        fn phase1_pairs_satisfy_equation(offset in any::<u8>(), index in 48usize..256, target in 0u16..0x800) {
            let image = MockRomBuilder::new(Region::Us).offset(index, offset).build();
            let feasibility = find_camera_offsets(&image, target);
            for (role, column) in feasibility.pairs() {
                let entry = image.offset(column.index as usize);
                prop_assert_eq!((role.address() + entry as u16) & 0x7FF, target);
                prop_assert!(column.index as usize >= OFFSET_TABLE_WINDOW);
            }
        }

        #[test]
        fn widening_predicate_only_adds(bytes in any::<[u8; 5]>(), pivot in any::<u8>(), target in 0x7C0u16..0x800) {
            let image = MockRomBuilder::new(Region::Us)
                .offset(60, 0x00)
                .offset(61, 0x12)
                .offset(62, 0x06)
                .object(11, bytes)
                .build();
            let feasibility = find_camera_offsets(&image, target);
            let (narrow, _) = find_candidate_writes(&image, &feasibility, &ValuePredicate::GreaterThan(pivot));
            let (wide, _) = find_candidate_writes(&image, &feasibility, &ValuePredicate::GreaterOrEqual(pivot));
            let (any, _) = find_candidate_writes(&image, &feasibility, &ValuePredicate::Any);
            for c in &narrow {
                prop_assert!(wide.contains(c));
            }
            for c in &wide {
                prop_assert!(any.contains(c));
            }
        }
    }
}
