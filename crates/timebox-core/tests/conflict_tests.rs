//! Tests for conflict detection between plan blocks and busy events.

use chrono::{DateTime, TimeZone, Utc};
use timebox_core::{
    conflicts_for_block, detect_conflicts, has_conflict, BusyEvent, ConflictKind, EventSource,
    PlanBlock,
};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 12, hour, min, 0).unwrap()
}

fn busy(id: &str, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyEvent {
    BusyEvent {
        id: id.to_string(),
        title: format!("busy {id}"),
        start: at(start_hour, start_min),
        end: at(end_hour, end_min),
        location: None,
        source: EventSource::Ics,
        all_day: false,
    }
}

fn block(id: &str, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> PlanBlock {
    PlanBlock {
        id: id.to_string(),
        title: format!("block {id}"),
        start: at(start_hour, start_min),
        end: at(end_hour, end_min),
        location: None,
        notes: None,
    }
}

#[test]
fn plan_overlapping_busy_is_one_busy_conflict() {
    // Busy 09:00-10:00; block A 09:30-10:30 overlaps, block B 12:00-13:00 does not.
    let busy_events = vec![busy("meeting", 9, 0, 10, 0)];
    let blocks = vec![block("a", 9, 30, 10, 30), block("b", 12, 0, 13, 0)];

    let conflicts = detect_conflicts(&blocks, &busy_events);

    assert_eq!(conflicts.len(), 1, "exactly one conflict expected");
    assert_eq!(conflicts[0].plan_block_id, "a");
    assert_eq!(conflicts[0].conflicts_with, "meeting");
    assert_eq!(conflicts[0].kind, ConflictKind::Busy);
    assert!(!has_conflict("b", &conflicts), "b is clear of everything");
}

#[test]
fn plan_vs_plan_overlap_reported_in_both_directions() {
    let blocks = vec![block("a", 9, 0, 10, 0), block("b", 9, 30, 10, 30)];

    let conflicts = detect_conflicts(&blocks, &[]);

    assert_eq!(conflicts.len(), 2, "one directed fact per block");
    assert!(conflicts.iter().any(|c| c.plan_block_id == "a"
        && c.conflicts_with == "b"
        && c.kind == ConflictKind::Plan));
    assert!(conflicts.iter().any(|c| c.plan_block_id == "b"
        && c.conflicts_with == "a"
        && c.kind == ConflictKind::Plan));
}

#[test]
fn block_never_conflicts_with_itself() {
    let blocks = vec![block("solo", 9, 0, 10, 0)];
    let conflicts = detect_conflicts(&blocks, &[]);
    assert!(conflicts.is_empty(), "self-comparison must be excluded");
}

#[test]
fn touching_intervals_are_not_conflicts() {
    // Block ends exactly when the busy event begins.
    let busy_events = vec![busy("next", 11, 0, 12, 0)];
    let blocks = vec![block("before", 10, 0, 11, 0)];

    let conflicts = detect_conflicts(&blocks, &busy_events);
    assert!(conflicts.is_empty(), "shared boundary is not an overlap");
}

#[test]
fn contained_interval_conflicts() {
    let busy_events = vec![busy("offsite", 9, 0, 12, 0)];
    let blocks = vec![block("inside", 10, 0, 10, 30)];

    let conflicts = detect_conflicts(&blocks, &busy_events);
    assert_eq!(conflicts.len(), 1, "strict containment is an overlap");
}

#[test]
fn empty_collections_produce_no_conflicts() {
    assert!(detect_conflicts(&[], &[]).is_empty());
    assert!(detect_conflicts(&[block("a", 9, 0, 10, 0)], &[]).is_empty());
    assert!(detect_conflicts(&[], &[busy("m", 9, 0, 10, 0)]).is_empty());
}

#[test]
fn conflicts_for_block_filters_by_owner() {
    let busy_events = vec![busy("m1", 9, 0, 10, 0), busy("m2", 9, 15, 9, 45)];
    let blocks = vec![block("a", 9, 0, 10, 0), block("b", 13, 0, 14, 0)];

    let conflicts = detect_conflicts(&blocks, &busy_events);

    let for_a = conflicts_for_block("a", &conflicts);
    assert_eq!(for_a.len(), 2, "a overlaps both busy events");
    assert!(for_a.iter().all(|c| c.plan_block_id == "a"));
    assert!(conflicts_for_block("b", &conflicts).is_empty());
    assert!(has_conflict("a", &conflicts));
    assert!(!has_conflict("b", &conflicts));
}

#[test]
fn mixed_busy_and_plan_conflicts_for_one_block() {
    let busy_events = vec![busy("standup", 9, 0, 9, 30)];
    let blocks = vec![block("a", 9, 0, 10, 0), block("b", 9, 45, 10, 15)];

    let conflicts = detect_conflicts(&blocks, &busy_events);

    let for_a = conflicts_for_block("a", &conflicts);
    assert_eq!(for_a.len(), 2, "a hits the busy event and block b");
    assert!(for_a.iter().any(|c| c.kind == ConflictKind::Busy));
    assert!(for_a.iter().any(|c| c.kind == ConflictKind::Plan));
}
