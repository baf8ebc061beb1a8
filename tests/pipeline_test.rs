mod helpers;

use cp_dashboard::error::PipelineError;
use cp_dashboard::models::*;
use cp_dashboard::pipeline::{fill_forward, merge, normalize, normalize_points, reconcile, select_window, DropReason};
use helpers::*;
use std::collections::BTreeMap;

fn snapshots(entries: Vec<ProfileSnapshot>) -> BTreeMap<SourceTag, ProfileSnapshot> {
    entries.into_iter().map(|s| (s.source, s)).collect()
}

#[test]
fn test_unified_history_across_three_sources() {
    let today = date(2024, 1, 31);
    let input = snapshots(vec![
        snapshot_with_history(SourceTag::Codeforces, &[(date(2024, 1, 1), 1000.0), (date(2024, 1, 3), 1050.0)]),
        snapshot_with_history(SourceTag::CodeChef, &[(date(2024, 1, 2), 1200.0)]),
        snapshot_with_history(SourceTag::LeetCode, &[]),
    ]);

    let records = reconcile(&input, &WindowPolicy::all_time(), today).unwrap();

    let rows: Vec<_> = records
        .iter()
        .map(|r| {
            (
                r.date,
                r.value(SourceTag::Codeforces),
                r.value(SourceTag::LeetCode),
                r.value(SourceTag::CodeChef),
            )
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            (date(2024, 1, 1), Some(1000.0), None, None),
            (date(2024, 1, 2), Some(1000.0), None, Some(1200.0)),
            (date(2024, 1, 3), Some(1050.0), None, Some(1200.0)),
        ]
    );
}

#[test]
fn test_every_record_has_every_source() {
    let input = snapshots(vec![snapshot_with_history(SourceTag::LeetCode, &[(date(2024, 3, 1), 1600.0)])]);

    let records = reconcile(&input, &WindowPolicy::all_time(), date(2024, 3, 2)).unwrap();

    assert_eq!(records.len(), 1);
    for tag in SourceTag::ALL {
        assert!(records[0].values.contains_key(&tag), "missing {}", tag);
    }
    assert_eq!(records[0].value(SourceTag::LeetCode), Some(1600.0));
    assert_eq!(records[0].value(SourceTag::Codeforces), None);
}

#[test]
fn test_duplicate_day_keeps_latest_entry() {
    let raw = vec![
        RawHistoryEntry::new("2024-05-01 10:00:00", 1400.0),
        RawHistoryEntry::new("2024-05-01 20:00:00", 1420.0),
    ];

    let normalized = normalize(SourceTag::CodeChef, &raw);

    assert_eq!(normalized.points.len(), 1);
    assert_eq!(normalized.points[0].date, date(2024, 5, 1));
    assert_eq!(normalized.points[0].rating, 1420.0);
}

#[test]
fn test_unsorted_input_normalizes_like_sorted() {
    let sorted = vec![
        RawHistoryEntry::new(Some(1_704_067_200i64), 1000.0),
        RawHistoryEntry::new(Some(1_704_240_000i64), 1050.0),
        RawHistoryEntry::new(Some(1_704_412_800i64), 1100.0),
    ];
    let shuffled = vec![sorted[2].clone(), sorted[0].clone(), sorted[1].clone()];

    let a = normalize(SourceTag::Codeforces, &sorted);
    let b = normalize(SourceTag::Codeforces, &shuffled);

    assert_eq!(a.points, b.points);
    assert!(a.points.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn test_malformed_entries_are_counted_not_raised() {
    let raw = vec![
        RawHistoryEntry::new(RawDate::Missing, 1000.0),
        RawHistoryEntry::new("yesterday-ish", 1000.0),
        RawHistoryEntry::new("2024-01-01", RawRating::Missing),
        RawHistoryEntry::new("2024-01-02", RawRating::Text("unrated".into())),
        RawHistoryEntry::new("2024-01-03", 1234.0),
    ];

    let normalized = normalize(SourceTag::LeetCode, &raw);

    assert_eq!(normalized.points.len(), 1);
    assert_eq!(normalized.dropped_total(), 4);
    assert_eq!(normalized.dropped.get(&DropReason::MissingDate), Some(&1));
    assert_eq!(normalized.dropped.get(&DropReason::InvalidDate), Some(&1));
    assert_eq!(normalized.dropped.get(&DropReason::MissingRating), Some(&1));
    assert_eq!(normalized.dropped.get(&DropReason::InvalidRating), Some(&1));
}

#[test]
fn test_normalize_points_is_idempotent() {
    let points = vec![
        HistoryPoint::new(date(2024, 1, 5), 1300.0, SourceTag::Codeforces),
        HistoryPoint::new(date(2024, 1, 1), 1200.0, SourceTag::Codeforces),
        HistoryPoint::new(date(2024, 1, 5), 1310.0, SourceTag::Codeforces),
    ];

    let once = normalize_points(&points);
    let twice = normalize_points(&once);

    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
    assert_eq!(once[1].rating, 1310.0);
}

#[test]
fn test_forward_fill_carries_last_value() {
    let history = vec![
        HistoryPoint::new(date(2024, 1, 1), 1500.0, SourceTag::Codeforces),
        HistoryPoint::new(date(2024, 1, 5), 1600.0, SourceTag::Codeforces),
    ];
    let window = vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5), date(2024, 1, 7)];

    assert_eq!(
        fill_forward(&history, &window),
        vec![Some(1500.0), Some(1500.0), Some(1600.0), Some(1600.0)]
    );
}

#[test]
fn test_forward_fill_emits_nothing_before_first_observation() {
    let history = vec![HistoryPoint::new(date(2024, 1, 5), 1600.0, SourceTag::CodeChef)];
    let window = vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)];

    assert_eq!(fill_forward(&history, &window), vec![None, None, Some(1600.0)]);
}

#[test]
fn test_trailing_window_clips_old_and_future_dates() {
    let today = date(2024, 6, 30);
    let history = vec![
        HistoryPoint::new(date(2023, 1, 1), 1000.0, SourceTag::Codeforces),
        HistoryPoint::new(date(2024, 6, 1), 1100.0, SourceTag::Codeforces),
        HistoryPoint::new(date(2024, 7, 15), 1200.0, SourceTag::Codeforces),
    ];

    let window = select_window([history.as_slice()], &WindowPolicy::trailing_days(90), today).unwrap();

    assert_eq!(window, vec![date(2024, 6, 1)]);
}

#[test]
fn test_daily_window_covers_every_day() {
    let history = vec![
        HistoryPoint::new(date(2024, 1, 1), 1000.0, SourceTag::Codeforces),
        HistoryPoint::new(date(2024, 1, 4), 1050.0, SourceTag::Codeforces),
    ];

    let window = select_window([history.as_slice()], &WindowPolicy::all_time().daily(), date(2024, 2, 1)).unwrap();
    let records = merge(
        &[(SourceTag::Codeforces, history.clone())].into_iter().collect(),
        &window,
    )
    .unwrap();

    assert_eq!(window.len(), 4);
    assert_eq!(records[2].value(SourceTag::Codeforces), Some(1000.0));
    assert_eq!(records[3].value(SourceTag::Codeforces), Some(1050.0));
}

#[test]
fn test_all_empty_histories_give_empty_series() {
    let input = snapshots(vec![
        ProfileSnapshot::unavailable(SourceTag::Codeforces),
        ProfileSnapshot::unavailable(SourceTag::LeetCode),
        ProfileSnapshot::unavailable(SourceTag::CodeChef),
    ]);

    let records = reconcile(&input, &WindowPolicy::default(), date(2024, 1, 1)).unwrap();

    assert!(records.is_empty());
}

#[test]
fn test_oversized_lookback_is_a_pipeline_error() {
    let policy = WindowPolicy::trailing_days(MAX_LOOKBACK_DAYS + 1);

    let result = reconcile(&BTreeMap::new(), &policy, date(2024, 1, 1));

    assert!(matches!(result, Err(PipelineError::InvalidWindowPolicy(_))));
}

#[test]
fn test_lookback_and_future_clips_apply_independently() {
    let input = snapshots(vec![snapshot_with_history(
        SourceTag::CodeChef,
        &[(date(2023, 1, 1), 1100.0), (date(2024, 1, 10), 1200.0), (date(2024, 2, 10), 1300.0)],
    )]);
    let policy = WindowPolicy {
        exclude_future: false,
        ..WindowPolicy::trailing_days(30)
    };

    let records = reconcile(&input, &policy, date(2024, 1, 31)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, date(2024, 1, 10));
    assert_eq!(records[0].value(SourceTag::CodeChef), Some(1200.0));
}

#[test]
fn test_merge_rejects_unordered_window() {
    let window = vec![date(2024, 1, 2), date(2024, 1, 1)];

    let result = merge(&BTreeMap::new(), &window);

    assert!(matches!(result, Err(PipelineError::UnorderedWindow(_))));
}

#[test]
fn test_reconcile_is_deterministic() {
    let input = snapshots(vec![
        snapshot_with_history(SourceTag::Codeforces, &[(date(2024, 2, 1), 1400.0), (date(2024, 2, 9), 1450.0)]),
        snapshot_with_history(SourceTag::LeetCode, &[(date(2024, 2, 4), 1700.0)]),
    ]);

    let first = reconcile(&input, &WindowPolicy::default(), date(2024, 3, 1)).unwrap();
    let second = reconcile(&input, &WindowPolicy::default(), date(2024, 3, 1)).unwrap();

    assert_eq!(first, second);
}
