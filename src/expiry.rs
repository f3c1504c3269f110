use crate::models::{ExpirySelection, Instrument};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Calendar days from `from` to `expiry` (negative once expired)
pub fn days_to_expiry(expiry: NaiveDate, from: NaiveDate) -> i64 {
    (expiry - from).num_days()
}

/// Sort ascending and drop duplicates
pub fn normalize_expiries<I>(dates: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// First expiry (ascending) whose DTE falls in the inclusive window
pub fn first_in_window(
    expiries: &[NaiveDate],
    today: NaiveDate,
    (min_dte, max_dte): (i64, i64),
) -> Option<(NaiveDate, i64)> {
    expiries
        .iter()
        .map(|&e| (e, days_to_expiry(e, today)))
        .find(|&(_, dte)| (min_dte..=max_dte).contains(&dte))
}

/// A candidate for selection: instrument plus its in-window expiry, if any
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub instrument: Instrument,
    pub nearest: Option<(NaiveDate, i64)>,
}

/// Pick the instrument to trade.
///
/// Smaller DTE wins; on equal DTE the earlier candidate in `candidates`
/// wins (callers pass NIFTY first). `None` when no candidate has an
/// in-window expiry.
pub fn select_instrument(candidates: &[Candidate]) -> Option<ExpirySelection> {
    let mut best: Option<ExpirySelection> = None;

    for candidate in candidates {
        let Some((expiry_date, dte)) = candidate.nearest else {
            continue;
        };

        let better = match &best {
            Some(current) => dte < current.dte,
            None => true,
        };

        if better {
            best = Some(ExpirySelection {
                instrument: candidate.instrument,
                expiry_date,
                dte,
            });
        }
    }

    best
}

/// DTE as of the next trading day: first expiry not yet past on that day
pub fn dte_as_of(expiries: &[NaiveDate], day: NaiveDate) -> Option<(NaiveDate, i64)> {
    expiries
        .iter()
        .map(|&e| (e, days_to_expiry(e, day)))
        .find(|&(_, dte)| dte >= 0)
}
