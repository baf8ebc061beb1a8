//! History normalization.
//!
//! Turns the loosely-typed history entries each platform reports into
//! [`HistoryPoint`]s keyed by calendar date. Entries whose date or rating
//! cannot be interpreted are dropped and counted, never raised.

use crate::models::{HistoryPoint, RawDate, RawHistoryEntry, RawRating, SourceTag};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a raw entry was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingDate,
    InvalidDate,
    MissingRating,
    InvalidRating,
}

/// Normalized points plus a tally of excluded entries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedHistory {
    pub points: Vec<HistoryPoint>,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl NormalizedHistory {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a textual date or datetime into a naive UTC timestamp
fn parse_text_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_timestamp(date: &RawDate) -> Result<NaiveDateTime, DropReason> {
    match date {
        RawDate::UnixSeconds(secs) => DateTime::<Utc>::from_timestamp(*secs, 0)
            .map(|dt| dt.naive_utc())
            .ok_or(DropReason::InvalidDate),
        RawDate::Text(text) => parse_text_date(text).ok_or(DropReason::InvalidDate),
        RawDate::Missing => Err(DropReason::MissingDate),
    }
}

fn parse_rating(rating: &RawRating) -> Result<f64, DropReason> {
    let value = match rating {
        RawRating::Number(v) => *v,
        RawRating::Text(text) => text.trim().parse::<f64>().map_err(|_| DropReason::InvalidRating)?,
        RawRating::Missing => return Err(DropReason::MissingRating),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(DropReason::InvalidRating)
    }
}

/// Keep the last point of every run of equal dates. Input must be sorted by date.
fn collapse_same_day(sorted: impl IntoIterator<Item = HistoryPoint>) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = Vec::new();
    for point in sorted {
        match points.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => points.push(point),
        }
    }
    points
}

/// Normalize raw entries from one source.
///
/// Entries are ordered by their full timestamp (ties keep input order) before
/// same-day entries collapse to the chronologically last one.
pub fn normalize(source: SourceTag, raw: &[RawHistoryEntry]) -> NormalizedHistory {
    let mut dropped: BTreeMap<DropReason, usize> = BTreeMap::new();
    let mut parsed: Vec<(NaiveDateTime, HistoryPoint)> = Vec::with_capacity(raw.len());

    for entry in raw {
        let parsed_entry = parse_timestamp(&entry.date)
            .and_then(|ts| parse_rating(&entry.rating).map(|rating| (ts, rating)));

        match parsed_entry {
            Ok((ts, rating)) => parsed.push((
                ts,
                HistoryPoint {
                    date: ts.date(),
                    rating,
                    source,
                    contest_label: entry.contest_label.clone(),
                },
            )),
            Err(reason) => *dropped.entry(reason).or_insert(0) += 1,
        }
    }

    // Stable sort, so identical timestamps stay in input order
    parsed.sort_by_key(|(ts, _)| *ts);

    NormalizedHistory {
        points: collapse_same_day(parsed.into_iter().map(|(_, point)| point)),
        dropped,
    }
}

/// Re-establish date order and one point per day on already-typed points.
///
/// Drops non-finite ratings, sorts by date and collapses same-day points.
/// Applying it to its own output returns the output unchanged.
pub fn normalize_points(points: &[HistoryPoint]) -> Vec<HistoryPoint> {
    let mut sorted: Vec<HistoryPoint> = points
        .iter()
        .filter(|p| p.rating.is_finite())
        .cloned()
        .collect();
    sorted.sort_by_key(|p| p.date);
    collapse_same_day(sorted)
}
