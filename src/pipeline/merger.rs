use crate::error::PipelineError;
use crate::models::{HistoryPoint, SourceTag, UnifiedRecord};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// One value per window date for a single source.
///
/// An exact-date observation updates the carried value; dates before the
/// first observation stay `None`.
pub fn fill_forward(history: &[HistoryPoint], window: &[NaiveDate]) -> Vec<Option<f64>> {
    // Later points overwrite earlier ones on the same date
    let observed: HashMap<NaiveDate, f64> = history.iter().map(|p| (p.date, p.rating)).collect();

    let mut last_known: Option<f64> = None;
    window
        .iter()
        .map(|date| {
            if let Some(rating) = observed.get(date) {
                last_known = Some(*rating);
            }
            last_known
        })
        .collect()
}

/// Merge per-source histories into one record per window date.
///
/// Every source in [`SourceTag::ALL`] gets a value slot; sources missing from
/// `per_source` behave as empty histories.
pub fn merge(
    per_source: &BTreeMap<SourceTag, Vec<HistoryPoint>>,
    window: &[NaiveDate],
) -> Result<Vec<UnifiedRecord>, PipelineError> {
    if let Some(pair) = window.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(PipelineError::UnorderedWindow(pair[1]));
    }

    let mut records: Vec<UnifiedRecord> = window.iter().map(|date| UnifiedRecord::empty(*date)).collect();

    for tag in SourceTag::ALL {
        let history = per_source.get(&tag).map(Vec::as_slice).unwrap_or(&[]);
        let series = fill_forward(history, window);

        for (record, value) in records.iter_mut().zip(series) {
            record.values.insert(tag, value);
        }
    }

    Ok(records)
}
