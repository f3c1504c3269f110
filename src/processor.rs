use crate::config;
use crate::models::{Candle, DailyRecord, DailySession, Direction, GapResult, PricePoint};
use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

// -----------------------------------------------
// PRICE-POINT EXTRACTION
// -----------------------------------------------

/// Wall-clock (exchange local) time of a candle timestamp.
///
/// Accepts "2025-01-10T15:29:00+05:30" as well as the offset-less form.
fn candle_time(timestamp: &str) -> Option<NaiveTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.time());
    }
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.time())
}

/// 3:30 PM LTP: close of the latest candle at or before 15:29
pub fn extract_ltp_330(candles: &[Candle]) -> Option<Decimal> {
    let mut best: Option<((u32, u32), Decimal)> = None;

    for candle in candles {
        let Some(time) = candle_time(&candle.timestamp) else {
            debug!(timestamp = %candle.timestamp, "Skipping candle with malformed timestamp");
            continue;
        };

        let hm = (time.hour(), time.minute());
        if hm > (config::LTP_CANDLE_HOUR, config::LTP_CANDLE_LAST_MINUTE) {
            continue;
        }

        match best {
            Some((best_hm, _)) if best_hm >= hm => {}
            _ => best = Some((hm, candle.close)),
        }
    }

    best.map(|(_, close)| close)
}

/// 9:15 AM open: open of the candle stamped exactly 09:15
pub fn extract_open_915(candles: &[Candle]) -> Option<Decimal> {
    let (hour, minute) = config::MARKET_OPEN_HM;

    candles.iter().find_map(|candle| {
        let time = match candle_time(&candle.timestamp) {
            Some(t) => t,
            None => {
                debug!(timestamp = %candle.timestamp, "Skipping candle with malformed timestamp");
                return None;
            }
        };
        (time.hour() == hour && time.minute() == minute).then_some(candle.open)
    })
}

// -----------------------------------------------
// GAP COMPUTATION
// -----------------------------------------------

pub fn classify_direction(gap: Decimal) -> Direction {
    if gap > Decimal::ZERO {
        Direction::Up
    } else if gap < Decimal::ZERO {
        Direction::Down
    } else {
        Direction::Flat
    }
}

/// `change` relative to `base`, in percent (unrounded).
/// `None` for a zero base or when the result does not fit a Decimal.
fn percent_change(base: Decimal, change: Decimal) -> Option<Decimal> {
    if base.is_zero() {
        return None;
    }
    change.checked_div(base)?.checked_mul(dec!(100))
}

/// Gap from `earlier` to `later`, percentage relative to `earlier`.
///
/// Returns `None` when the base is zero or the values overflow.
pub fn compute_gap(earlier: Decimal, later: Decimal) -> Option<GapResult> {
    let gap = later.checked_sub(earlier)?.round_dp(2);
    let gap_pct = percent_change(earlier, gap)?.round_dp(2);

    Some(GapResult {
        gap,
        gap_pct,
        direction: classify_direction(gap),
    })
}

/// Both points must be present for a gap
pub fn gap_between(earlier: Option<Decimal>, later: Option<Decimal>) -> Option<GapResult> {
    match (earlier, later) {
        (Some(e), Some(l)) => compute_gap(e, l),
        _ => None,
    }
}

pub fn gap_between_points(earlier: Option<&PricePoint>, later: Option<&PricePoint>) -> Option<GapResult> {
    gap_between(earlier.map(|p| p.value), later.map(|p| p.value))
}

// -----------------------------------------------
// SIXTHSENSE
// -----------------------------------------------

/// Last `days` sessions, oldest first, with intraday change %.
///
/// Sessions are ordered by date first; a session whose change is undefined
/// (zero open) or overflows is dropped before the window is taken.
pub fn sixth_sense_records(sessions: &[DailySession], days: usize) -> Vec<DailyRecord> {
    let mut usable: Vec<DailyRecord> = sessions
        .iter()
        .filter_map(|s| {
            let change = s.close.checked_sub(s.open)?;
            let change_pct = match percent_change(s.open, change) {
                Some(pct) => pct.round_dp(2),
                None => {
                    debug!(date = %s.date, "Skipping session without a defined change");
                    return None;
                }
            };
            Some(DailyRecord {
                date: s.date,
                open: s.open.round_dp(2),
                close: s.close.round_dp(2),
                change_pct,
            })
        })
        .collect();
    usable.sort_by_key(|r| r.date);
    usable.dedup_by_key(|r| r.date);

    let start = usable.len().saturating_sub(days);
    usable.split_off(start)
}
