use crate::config;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};

// -----------------------------------------------
// TRADING-DAY RESOLVER
// -----------------------------------------------
// No holiday calendar: every Mon-Fri counts as a trading day.

/// Reference dates for the BID signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidDays {
    /// Session whose 3:30 PM LTP is the base
    pub prev_day: NaiveDate,
    /// Session whose 9:15 AM open is compared against it
    pub today: NaiveDate,
    pub market_open: bool,
}

/// Reference date for the PriceGap signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceGapDay {
    pub date: NaiveDate,
    pub data_available: bool,
}

/// Current wall-clock time on the exchange
pub fn exchange_now() -> NaiveDateTime {
    Utc::now().with_timezone(&config::EXCHANGE_TZ).naive_local()
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Roll back until the date is a weekday (no-op on weekdays)
pub fn roll_back_to_weekday(mut date: NaiveDate) -> NaiveDate {
    while !is_weekday(date) {
        date -= Duration::days(1);
    }
    date
}

/// Nearest weekday strictly before `date`
pub fn previous_weekday(date: NaiveDate) -> NaiveDate {
    roll_back_to_weekday(date - Duration::days(1))
}

/// Nearest weekday strictly after `date`
pub fn next_weekday(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while !is_weekday(next) {
        next += Duration::days(1);
    }
    next
}

fn clock_at_or_after(now: NaiveDateTime, (hour, minute): (u32, u32)) -> bool {
    (now.hour(), now.minute()) >= (hour, minute)
}

/// Resolve the two sessions compared by the BID signal.
///
/// `today` is `now`'s date rolled back past weekends. Unless `now` is that
/// same weekday at or after 09:15, `today` moves back one more weekday, so
/// the 9:15 open being asked for always exists.
pub fn resolve_bid_days(now: NaiveDateTime) -> BidDays {
    let mut today = roll_back_to_weekday(now.date());

    let is_today_trading_day = now.date() == today;
    let market_open = is_today_trading_day && clock_at_or_after(now, config::MARKET_OPEN_HM);

    if !market_open {
        today = previous_weekday(today);
    }

    BidDays {
        prev_day: previous_weekday(today),
        today,
        market_open,
    }
}

/// Resolve the session whose 3:30 LTP and daily close feed PriceGap.
///
/// Today's values only exist after 15:30; before that (on a weekday) the
/// previous weekday is used. On a weekend the rolled-back Friday is already
/// complete and is used as-is.
pub fn resolve_pricegap_day(now: NaiveDateTime) -> PriceGapDay {
    let mut date = roll_back_to_weekday(now.date());

    let is_today_trading_day = now.date() == date;
    let data_available = is_today_trading_day && clock_at_or_after(now, config::MARKET_CLOSE_HM);

    if !data_available && is_today_trading_day {
        date = previous_weekday(date);
    }

    PriceGapDay {
        date,
        data_available,
    }
}

/// Next trading day after `now`'s date (coverage premium is quoted for it)
pub fn next_trading_day(now: NaiveDateTime) -> NaiveDate {
    next_weekday(now.date())
}
