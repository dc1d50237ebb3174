use chrono::{DateTime, Duration, TimeZone, Utc};
use midway_core::slots::{
    AvailabilityInterval, SelectedSlots, SlotSelection, TimeSlot, TimeWindow, Toggle,
    generate_slots, merge_intervals,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn at(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("valid RFC 3339 instant")
}

fn slot(raw: &str) -> TimeSlot {
    TimeSlot::new(at(raw))
}

fn interval(start: &str, end: &str) -> AvailabilityInterval {
    AvailabilityInterval {
        start_time: at(start),
        end_time: at(end),
    }
}

fn five_hour_window() -> TimeWindow {
    TimeWindow::new(at("2024-01-01T00:00:00Z"), at("2024-01-01T05:00:00Z"))
}

#[test]
fn test_generate_slots_steps_one_hour_from_start() {
    let slots = generate_slots(&five_hour_window());

    let expected: Vec<TimeSlot> = (0..5)
        .map(|h| TimeSlot::new(at("2024-01-01T00:00:00Z") + Duration::hours(h)))
        .collect();
    assert_eq!(slots, expected);
}

#[rstest]
#[case("2024-01-01T00:00:00Z", "2024-01-01T05:00:00Z", 5)]
#[case("2024-01-01T00:00:00Z", "2024-01-01T04:30:00Z", 5)]
#[case("2024-01-01T00:30:00Z", "2024-01-01T03:00:00Z", 3)]
#[case("2024-01-01T00:00:00Z", "2024-01-01T00:01:00Z", 1)]
#[case("2024-01-01T09:00:00Z", "2024-01-02T22:00:00Z", 37)]
fn test_generate_slots_counts(#[case] start: &str, #[case] end: &str, #[case] count: usize) {
    let window = TimeWindow::new(at(start), at(end));
    let slots = generate_slots(&window);

    assert_eq!(slots.len(), count);
    assert_eq!(slots.first().map(TimeSlot::start), Some(window.start()));
    assert!(slots.iter().all(|s| s.start() < window.end()));
    assert!(slots.windows(2).all(|pair| pair[1].start() - pair[0].start() == Duration::hours(1)));
}

#[rstest]
#[case("2024-01-01T05:00:00Z", "2024-01-01T00:00:00Z")]
#[case("2024-01-01T05:00:00Z", "2024-01-01T05:00:00Z")]
fn test_generate_slots_empty_for_inverted_or_empty_window(#[case] start: &str, #[case] end: &str) {
    let window = TimeWindow::new(at(start), at(end));

    assert!(window.is_empty());
    assert!(generate_slots(&window).is_empty());
}

#[test]
fn test_slot_ending_past_the_last_instant_is_not_offered() {
    let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(30);
    let mut selection = SlotSelection::new(TimeWindow::new(start, DateTime::<Utc>::MAX_UTC));

    assert!(selection.slots().is_empty());
    assert_eq!(selection.toggle(TimeSlot::new(start)), Toggle::OutsideWindow);
    assert!(selection.intervals().is_empty());
}

#[test]
fn test_toggle_last_representable_slot() {
    let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(90);
    let mut selection = SlotSelection::new(TimeWindow::new(start, DateTime::<Utc>::MAX_UTC));

    assert_eq!(selection.slots().len(), 1);
    let last = selection.slots()[0];
    assert_eq!(selection.toggle(last), Toggle::Selected);
    assert_eq!(
        selection.intervals(),
        &[AvailabilityInterval {
            start_time: start,
            end_time: start + Duration::hours(1),
        }]
    );
}

#[test]
fn test_slot_end_saturates() {
    let slot = TimeSlot::new(DateTime::<Utc>::MAX_UTC);

    assert_eq!(slot.end(), DateTime::<Utc>::MAX_UTC);
    assert_eq!(merge_intervals([slot]).len(), 1);
}

#[test]
fn test_merge_empty_set() {
    assert_eq!(merge_intervals(Vec::new()), Vec::new());
    assert!(SelectedSlots::new().intervals().is_empty());
}

#[test]
fn test_merge_contiguous_runs_and_gap() {
    let selected = vec![
        slot("2024-01-01T00:00:00Z"),
        slot("2024-01-01T01:00:00Z"),
        slot("2024-01-01T02:00:00Z"),
        slot("2024-01-01T04:00:00Z"),
    ];

    assert_eq!(
        merge_intervals(selected),
        vec![
            interval("2024-01-01T00:00:00Z", "2024-01-01T03:00:00Z"),
            interval("2024-01-01T04:00:00Z", "2024-01-01T05:00:00Z"),
        ]
    );
}

#[test]
fn test_merge_single_slot() {
    let intervals = merge_intervals(vec![slot("2024-01-01T02:00:00Z")]);

    assert_eq!(
        intervals,
        vec![interval("2024-01-01T02:00:00Z", "2024-01-01T03:00:00Z")]
    );
    assert_eq!(intervals[0].hours(), 1);
}

#[test]
fn test_merge_all_slots_spans_window() {
    let window = five_hour_window();

    assert_eq!(
        merge_intervals(window.slots()),
        vec![interval("2024-01-01T00:00:00Z", "2024-01-01T05:00:00Z")]
    );
}

#[test]
fn test_merge_ignores_input_order_and_duplicates() {
    let ordered = merge_intervals(vec![
        slot("2024-01-01T00:00:00Z"),
        slot("2024-01-01T01:00:00Z"),
        slot("2024-01-01T03:00:00Z"),
    ]);
    let shuffled = merge_intervals(vec![
        slot("2024-01-01T03:00:00Z"),
        slot("2024-01-01T00:00:00Z"),
        slot("2024-01-01T01:00:00Z"),
        slot("2024-01-01T00:00:00Z"),
    ]);

    assert_eq!(ordered, shuffled);
}

#[test]
fn test_merge_compares_instants_not_strings() {
    // Same instants written with different offsets still form one run.
    let selected = vec![
        "2024-01-01T05:30:00+05:30".parse::<TimeSlot>().unwrap(),
        "2024-01-01T01:00:00Z".parse::<TimeSlot>().unwrap(),
        "2023-12-31T21:00:00-05:00".parse::<TimeSlot>().unwrap(),
    ];

    assert_eq!(
        merge_intervals(selected),
        vec![interval("2024-01-01T00:00:00Z", "2024-01-01T03:00:00Z")]
    );
}

#[test]
fn test_merge_across_midnight() {
    let selected = vec![slot("2024-01-01T23:00:00Z"), slot("2024-01-02T00:00:00Z")];

    assert_eq!(
        merge_intervals(selected),
        vec![interval("2024-01-01T23:00:00Z", "2024-01-02T01:00:00Z")]
    );
}

#[test]
fn test_merge_across_dst_change_stays_contiguous() {
    // 2024-03-10 02:00 America/New_York does not exist; UTC slots are still back to back.
    let selected = vec![slot("2024-03-10T06:00:00Z"), slot("2024-03-10T07:00:00Z")];

    assert_eq!(
        merge_intervals(selected),
        vec![interval("2024-03-10T06:00:00Z", "2024-03-10T08:00:00Z")]
    );
}

#[test]
fn test_merge_never_yields_empty_intervals() {
    let window = TimeWindow::new(at("2024-01-01T00:00:00Z"), at("2024-01-02T00:00:00Z"));
    let picked: Vec<TimeSlot> = window.slots().into_iter().step_by(3).collect();

    let intervals = merge_intervals(picked);

    assert_eq!(intervals.len(), 8);
    assert!(intervals.iter().all(|i| i.start_time < i.end_time));
    assert!(intervals.windows(2).all(|pair| pair[0].end_time < pair[1].start_time));
}

#[test]
fn test_toggle_is_idempotent_pair() {
    let mut selected: SelectedSlots =
        vec![slot("2024-01-01T00:00:00Z"), slot("2024-01-01T02:00:00Z")]
            .into_iter()
            .collect();
    let before = selected.intervals();

    assert!(selected.toggle(slot("2024-01-01T01:00:00Z")));
    assert_eq!(
        selected.intervals(),
        vec![interval("2024-01-01T00:00:00Z", "2024-01-01T03:00:00Z")]
    );
    assert!(!selected.toggle(slot("2024-01-01T01:00:00Z")));

    assert_eq!(selected.intervals(), before);
}

#[test]
fn test_toggled_leaves_original_untouched() {
    let original = SelectedSlots::new();
    let next = original.toggled(slot("2024-01-01T00:00:00Z"));

    assert!(original.is_empty());
    assert_eq!(next.len(), 1);
}

#[test]
fn test_selection_end_to_end() {
    let window = TimeWindow::new(at("2024-03-10T00:00:00Z"), at("2024-03-10T03:00:00Z"));
    let mut selection = SlotSelection::new(window);

    assert_eq!(selection.toggle(slot("2024-03-10T01:00:00Z")), Toggle::Selected);
    assert_eq!(selection.toggle(slot("2024-03-10T00:00:00Z")), Toggle::Selected);
    assert_eq!(
        selection.intervals(),
        &[interval("2024-03-10T00:00:00Z", "2024-03-10T02:00:00Z")]
    );
    assert_eq!(selection.toggle(slot("2024-03-10T01:00:00Z")), Toggle::Deselected);

    let remaining: Vec<TimeSlot> = selection.selected().iter().copied().collect();
    assert_eq!(remaining, vec![slot("2024-03-10T00:00:00Z")]);
    assert_eq!(
        selection.intervals(),
        &[interval("2024-03-10T00:00:00Z", "2024-03-10T01:00:00Z")]
    );
}

#[test]
fn test_selection_rejects_slots_outside_window() {
    let mut selection = SlotSelection::new(five_hour_window());

    assert_eq!(selection.toggle(slot("2024-01-01T05:00:00Z")), Toggle::OutsideWindow);
    assert_eq!(selection.toggle(slot("2024-01-01T01:30:00Z")), Toggle::OutsideWindow);
    assert_eq!(selection.selected_count(), 0);
    assert!(selection.intervals().is_empty());
}

#[test]
fn test_selection_toggle_by_identifier() {
    let mut selection = SlotSelection::new(five_hour_window());
    let id = selection.slots()[2].id();

    assert_eq!(id, "2024-01-01T02:00:00.000Z");
    assert_eq!(selection.toggle_id(&id).unwrap(), Toggle::Selected);
    assert_eq!(selection.toggle_id("2024-01-01T02:00:00").unwrap(), Toggle::Deselected);
    assert!(selection.toggle_id("not a time").is_err());
}

#[test]
fn test_window_change_clears_selection() {
    let mut selection = SlotSelection::new(five_hour_window());
    selection.toggle(slot("2024-01-01T01:00:00Z"));

    selection.set_window(five_hour_window());
    assert_eq!(selection.selected_count(), 1);

    let later = TimeWindow::new(at("2024-01-02T00:00:00Z"), at("2024-01-02T02:00:00Z"));
    selection.set_window(later);

    assert_eq!(selection.window(), &later);
    assert_eq!(selection.slots().len(), 2);
    assert_eq!(selection.selected_count(), 0);
    assert!(selection.intervals().is_empty());
}

#[test]
fn test_window_offers_only_generated_slots() {
    let window = five_hour_window();

    assert!(window.offers(&slot("2024-01-01T00:00:00Z")));
    assert!(window.offers(&slot("2024-01-01T04:00:00Z")));
    assert!(!window.offers(&slot("2024-01-01T05:00:00Z")));
    assert!(!window.offers(&slot("2024-01-01T02:15:00Z")));
    assert!(!window.offers(&TimeSlot::new(Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap())));
}

#[test]
fn test_slot_identifiers_sort_chronologically() {
    let window = TimeWindow::new(at("2024-01-01T20:00:00Z"), at("2024-01-02T04:00:00Z"));
    let mut ids: Vec<String> = window.slots().iter().rev().map(TimeSlot::id).collect();
    ids.sort();

    let expected: Vec<String> = window.slots().iter().map(TimeSlot::id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_interval_serializes_as_absolute_instants() {
    let json = serde_json::to_value(interval("2024-01-01T00:00:00Z", "2024-01-01T03:00:00Z"))
        .unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "start_time": "2024-01-01T00:00:00Z",
            "end_time": "2024-01-01T03:00:00Z",
        })
    );
}
