//! Tests for the planner state object: conflict freshness after every
//! mutation, import replace semantics, and the persistence snapshot.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use timebox_core::{
    BusyEvent, EventSource, PlanBlock, PlanBlockPatch, PlannerSnapshot, PlannerState,
    SequentialIds, TimeboxError,
};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 12, hour, min, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 12).unwrap()
}

fn busy(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BusyEvent {
    BusyEvent {
        id: id.to_string(),
        title: format!("busy {id}"),
        start,
        end,
        location: None,
        source: EventSource::Ics,
        all_day: false,
    }
}

#[test]
fn new_state_has_default_window_and_no_conflicts() {
    let state = PlannerState::new(day());
    assert_eq!(state.time_window(), (8, 18));
    assert!(state.plan_blocks().is_empty());
    assert!(state.conflicts().is_empty());
}

#[test]
fn create_block_uses_provider_ids_and_default_title() {
    let ids = SequentialIds::new("blk");
    let mut state = PlannerState::new(day());

    let first = state.create_block(at(9, 0), at(10, 0), &ids);
    let second = state.create_block(at(11, 0), at(12, 0), &ids);

    assert_eq!(first, "blk-1");
    assert_eq!(second, "blk-2");
    assert_eq!(state.plan_blocks()[0].title, PlanBlock::DEFAULT_TITLE);
}

#[test]
fn conflicts_refresh_on_every_mutation() {
    let ids = SequentialIds::new("blk");
    let mut state = PlannerState::new(day());

    let id = state.create_block(at(9, 30), at(10, 30), &ids);
    assert!(state.conflicts().is_empty(), "nothing to collide with yet");

    state.set_busy_events(vec![busy("standup", at(9, 0), at(10, 0))]);
    assert_eq!(state.conflicts().len(), 1, "import recomputes conflicts");

    state
        .update_plan_block(
            &id,
            PlanBlockPatch {
                start: Some(at(12, 0)),
                end: Some(at(13, 0)),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(state.conflicts().is_empty(), "moving the block clears them");

    state
        .update_plan_block(
            &id,
            PlanBlockPatch {
                start: Some(at(9, 0)),
                end: Some(at(9, 45)),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(state.conflicts().len(), 1);

    state.delete_plan_block(&id).unwrap();
    assert!(state.conflicts().is_empty(), "deletion recomputes too");
}

#[test]
fn busy_imports_replace_never_merge() {
    let mut state = PlannerState::new(day());
    state.set_busy_events(vec![
        busy("m1", at(9, 0), at(10, 0)),
        busy("m2", at(11, 0), at(12, 0)),
    ]);
    assert_eq!(state.busy_events().len(), 2);

    state.set_busy_events(vec![busy("m3", at(14, 0), at(15, 0))]);
    assert_eq!(state.busy_events().len(), 1, "second import replaces the first");
    assert_eq!(state.busy_events()[0].id, "m3");

    state.clear_busy_events();
    assert!(state.busy_events().is_empty());
}

#[test]
fn patch_can_clear_optional_fields() {
    let ids = SequentialIds::new("blk");
    let mut state = PlannerState::new(day());
    let id = state.create_block(at(9, 0), at(10, 0), &ids);

    state
        .update_plan_block(
            &id,
            PlanBlockPatch {
                title: Some("Writing".to_string()),
                location: Some(Some("Library".to_string())),
                notes: Some(Some("chapter 3".to_string())),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(state.plan_blocks()[0].title, "Writing");
    assert_eq!(state.plan_blocks()[0].location.as_deref(), Some("Library"));

    state
        .update_plan_block(
            &id,
            PlanBlockPatch {
                location: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(state.plan_blocks()[0].location, None);
    assert_eq!(
        state.plan_blocks()[0].notes.as_deref(),
        Some("chapter 3"),
        "untouched fields stay put"
    );
}

#[test]
fn unknown_block_ids_are_rejected() {
    let mut state = PlannerState::new(day());

    let err = state
        .update_plan_block("ghost", PlanBlockPatch::default())
        .unwrap_err();
    assert!(matches!(err, TimeboxError::UnknownBlock(_)));

    let err = state.delete_plan_block("ghost").unwrap_err();
    assert!(matches!(err, TimeboxError::UnknownBlock(_)));
}

#[test]
fn time_window_is_validated() {
    let mut state = PlannerState::new(day());

    state.set_time_window(6, 22).unwrap();
    assert_eq!(state.time_window(), (6, 22));

    assert!(matches!(
        state.set_time_window(10, 10),
        Err(TimeboxError::InvalidWindow { .. })
    ));
    assert!(matches!(
        state.set_time_window(8, 25),
        Err(TimeboxError::InvalidWindow { .. })
    ));
    assert_eq!(state.time_window(), (6, 22), "failed set leaves window alone");
}

#[test]
fn snapshot_round_trips_through_json() {
    let ids = SequentialIds::new("blk");
    let mut state = PlannerState::new(day());
    state.create_block(at(9, 0), at(10, 0), &ids);
    state.set_time_window(7, 20).unwrap();

    let json = serde_json::to_string(&state.snapshot()).unwrap();
    assert!(json.contains("\"planBlocks\""), "external key names persist");
    assert!(json.contains("\"startHour\":7"));

    let restored: PlannerSnapshot = serde_json::from_str(&json).unwrap();
    let mut fresh = PlannerState::new(day());
    fresh.set_busy_events(vec![busy("standup", at(9, 30), at(10, 30))]);
    fresh.restore(restored);

    assert_eq!(fresh.time_window(), (7, 20));
    assert_eq!(fresh.plan_blocks().len(), 1);
    assert_eq!(
        fresh.conflicts().len(),
        1,
        "restore recomputes against the current busy set"
    );
}

#[test]
fn clear_plan_blocks_resets_conflicts() {
    let ids = SequentialIds::new("blk");
    let mut state = PlannerState::new(day());
    state.create_block(at(9, 0), at(10, 0), &ids);
    state.create_block(at(9, 30), at(10, 30), &ids);
    assert_eq!(state.conflicts().len(), 2);

    state.clear_plan_blocks();
    assert!(state.plan_blocks().is_empty());
    assert!(state.conflicts().is_empty());
}
