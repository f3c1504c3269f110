#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use index_signals::models::{Candle, DailySession};
use index_signals::{Instrument, MarketDataProvider, ProviderError};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory provider. Anything not seeded fails like an unreachable API.
#[derive(Default)]
pub struct FakeProvider {
    pub candles: HashMap<(Instrument, NaiveDate), Vec<Candle>>,
    pub expiries: HashMap<Instrument, Vec<NaiveDate>>,
    pub closes: HashMap<Instrument, Decimal>,
    pub spots: HashMap<Instrument, Decimal>,
    pub sessions: HashMap<Instrument, Vec<DailySession>>,
    pub candle_requests: Mutex<Vec<(Instrument, NaiveDate, bool)>>,
}

fn offline(what: &str) -> ProviderError {
    ProviderError::Request(format!("offline: {}", what))
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn candles(
        &self,
        instrument: Instrument,
        date: NaiveDate,
        intraday: bool,
    ) -> Result<Vec<Candle>, ProviderError> {
        if let Ok(mut requests) = self.candle_requests.lock() {
            requests.push((instrument, date, intraday));
        }
        self.candles
            .get(&(instrument, date))
            .cloned()
            .ok_or_else(|| offline("candles"))
    }

    async fn expiry_dates(&self, instrument: Instrument) -> Result<Vec<NaiveDate>, ProviderError> {
        self.expiries
            .get(&instrument)
            .cloned()
            .ok_or_else(|| offline("expiries"))
    }

    async fn daily_close(&self, instrument: Instrument) -> Result<Decimal, ProviderError> {
        self.closes
            .get(&instrument)
            .copied()
            .ok_or_else(|| offline("daily close"))
    }

    async fn spot_price(&self, instrument: Instrument) -> Result<Decimal, ProviderError> {
        self.spots
            .get(&instrument)
            .copied()
            .ok_or_else(|| offline("spot"))
    }

    async fn daily_sessions(
        &self,
        instrument: Instrument,
        _from: NaiveDate,
        _until: NaiveDateTime,
    ) -> Result<Vec<DailySession>, ProviderError> {
        self.sessions
            .get(&instrument)
            .cloned()
            .ok_or_else(|| offline("sessions"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hh, mm, 0).unwrap()
}

pub fn candle(day: NaiveDate, hh: u32, mm: u32, open: Decimal, close: Decimal) -> Candle {
    Candle {
        timestamp: format!("{}T{:02}:{:02}:00+05:30", day.format("%Y-%m-%d"), hh, mm),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume: 0,
    }
}

/// Wed 2025-01-08, 10:00 IST. NIFTY expires Thu 09 (DTE 1), SENSEX Tue 14.
pub fn seeded_provider() -> FakeProvider {
    use rust_decimal_macros::dec;

    let tue = date(2025, 1, 7);
    let wed = date(2025, 1, 8);
    let mut p = FakeProvider::default();

    p.expiries.insert(
        Instrument::Nifty,
        vec![date(2025, 1, 9), date(2025, 1, 16), date(2025, 1, 23)],
    );
    p.expiries
        .insert(Instrument::Sensex, vec![date(2025, 1, 14), date(2025, 1, 21)]);

    p.candles.insert(
        (Instrument::Nifty, tue),
        vec![
            candle(tue, 15, 25, dec!(24780), dec!(24790.00)),
            candle(tue, 15, 29, dec!(24795), dec!(24800.00)),
            candle(tue, 15, 31, dec!(24805), dec!(24810.00)),
        ],
    );
    p.candles.insert(
        (Instrument::Nifty, wed),
        vec![
            candle(wed, 9, 15, dec!(24850.00), dec!(24860)),
            candle(wed, 9, 16, dec!(24861), dec!(24870)),
        ],
    );
    p.candles.insert(
        (Instrument::Sensex, tue),
        vec![candle(tue, 15, 29, dec!(81000), dec!(81000.00))],
    );
    p.candles.insert(
        (Instrument::Sensex, wed),
        vec![candle(wed, 9, 15, dec!(80919.00), dec!(80900))],
    );

    p.closes.insert(Instrument::Nifty, dec!(24750.00));
    p.spots.insert(Instrument::Nifty, dec!(25000));

    p.sessions.insert(
        Instrument::Nifty,
        (1..=8)
            .map(|d| DailySession {
                date: date(2025, 1, d),
                open: dec!(24000),
                close: dec!(24000) + Decimal::from(d * 24),
            })
            .collect(),
    );

    p
}
