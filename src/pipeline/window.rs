use crate::error::PipelineError;
use crate::models::{HistoryPoint, Lookback, WindowGranularity, WindowPolicy};
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Compute the chart's x-axis: the ordered, distinct dates of interest.
///
/// Starts from the union of every history's dates, clips to
/// `[today - n, today]` for a day lookback, drops dates after `today` when
/// `exclude_future` is set, and optionally densifies to one entry per day.
/// The two clips apply independently.
pub fn select_window<'a, I>(
    histories: I,
    policy: &WindowPolicy,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>, PipelineError>
where
    I: IntoIterator<Item = &'a [HistoryPoint]>,
{
    policy.validate()?;

    let lower_bound = match policy.lookback {
        Lookback::Days(days) => Some(
            today
                .checked_sub_days(Days::new(u64::from(days)))
                .ok_or_else(|| PipelineError::DateOverflow(format!("{} minus {} days", today, days)))?,
        ),
        Lookback::All => None,
    };
    let upper_bound = match policy.lookback {
        Lookback::Days(_) => Some(today),
        Lookback::All if policy.exclude_future => Some(today),
        Lookback::All => None,
    };

    let dates: BTreeSet<NaiveDate> = histories
        .into_iter()
        .flat_map(|history| history.iter().map(|p| p.date))
        .filter(|date| lower_bound.map_or(true, |lo| *date >= lo))
        .filter(|date| upper_bound.map_or(true, |hi| *date <= hi))
        .collect();

    if policy.granularity == WindowGranularity::Daily {
        if let (Some(first), Some(last)) = (dates.first().copied(), dates.last().copied()) {
            return Ok(first.iter_days().take_while(|d| *d <= last).collect());
        }
    }

    Ok(dates.into_iter().collect())
}
