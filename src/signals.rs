use crate::calendar;
use crate::config;
use crate::coverage;
use crate::error::SignalError;
use crate::expiry::{self, Candidate};
use crate::models::{
    BidBoardEntry, BidSignal, Candle, CoverageMissing, CoverageReport, CoverageSkip, DailyRecord,
    ExpirySelection, Instrument, PriceGapSignal, PriceKind, PricePoint, SignalBundle,
};
use crate::processor;
use crate::provider::MarketDataProvider;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct SignalSettings {
    pub sixth_sense_days: usize,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            sixth_sense_days: config::DEFAULT_SIXTH_SENSE_DAYS,
        }
    }
}

/// Computes every signal from a provider and an explicit `now` (exchange
/// local time). Holds no state between calls.
#[derive(Clone)]
pub struct SignalEngine {
    provider: Arc<dyn MarketDataProvider>,
    settings: SignalSettings,
}

impl SignalEngine {
    /// The SixthSense window is clamped to 1..=30 sessions
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: SignalSettings) -> Self {
        let settings = SignalSettings {
            sixth_sense_days: settings
                .sixth_sense_days
                .clamp(1, config::MAX_SIXTH_SENSE_DAYS),
        };
        Self { provider, settings }
    }

    // -----------------------------------------------
    // PROVIDER ACCESS (failures become absent values)
    // -----------------------------------------------

    async fn candles(&self, instrument: Instrument, date: NaiveDate, now: NaiveDateTime) -> Vec<Candle> {
        let intraday = date == now.date();
        match self.provider.candles(instrument, date, intraday).await {
            Ok(candles) => candles,
            Err(e) => {
                warn!(%instrument, %date, error = %e, "Candles unavailable");
                Vec::new()
            }
        }
    }

    async fn expiries(&self, instrument: Instrument) -> Vec<NaiveDate> {
        match self.provider.expiry_dates(instrument).await {
            Ok(dates) => expiry::normalize_expiries(dates),
            Err(e) => {
                warn!(%instrument, error = %e, "Expiry list unavailable");
                Vec::new()
            }
        }
    }

    async fn daily_close(&self, instrument: Instrument, date: NaiveDate) -> Option<PricePoint> {
        self.provider
            .daily_close(instrument)
            .await
            .map_err(|e| warn!(%instrument, error = %e, "Daily close unavailable"))
            .ok()
            .map(|value| PricePoint {
                value,
                date,
                kind: PriceKind::DailyClose,
            })
    }

    async fn spot_price(&self, instrument: Instrument) -> Option<Decimal> {
        self.provider
            .spot_price(instrument)
            .await
            .map_err(|e| warn!(%instrument, error = %e, "Spot price unavailable"))
            .ok()
    }

    pub async fn ltp_330(&self, instrument: Instrument, date: NaiveDate, now: NaiveDateTime) -> Option<PricePoint> {
        processor::extract_ltp_330(&self.candles(instrument, date, now).await).map(|value| PricePoint {
            value,
            date,
            kind: PriceKind::ThreePmLastTraded,
        })
    }

    pub async fn open_915(&self, instrument: Instrument, date: NaiveDate, now: NaiveDateTime) -> Option<PricePoint> {
        processor::extract_open_915(&self.candles(instrument, date, now).await).map(|value| PricePoint {
            value,
            date,
            kind: PriceKind::NineFifteenOpen,
        })
    }

    // -----------------------------------------------
    // SIGNALS
    // -----------------------------------------------

    /// Previous session's 3:30 LTP vs the current session's 9:15 open
    pub async fn bid_signal(&self, instrument: Instrument, now: NaiveDateTime) -> BidSignal {
        let days = calendar::resolve_bid_days(now);

        let ltp_330 = self.ltp_330(instrument, days.prev_day, now).await;
        let open_915 = self.open_915(instrument, days.today, now).await;

        BidSignal {
            prev_date: days.prev_day,
            today_date: days.today,
            market_open: days.market_open,
            gap: processor::gap_between_points(ltp_330.as_ref(), open_915.as_ref()),
            ltp_330: ltp_330.map(|p| p.value),
            open_915: open_915.map(|p| p.value),
        }
    }

    /// Daily close vs the same session's 3:30 LTP
    pub async fn pricegap_signal(&self, instrument: Instrument, now: NaiveDateTime) -> PriceGapSignal {
        let day = calendar::resolve_pricegap_day(now);

        let ltp_330 = self.ltp_330(instrument, day.date, now).await;
        let daily_close = self.daily_close(instrument, day.date).await;

        PriceGapSignal {
            date: day.date,
            data_available: day.data_available,
            gap: processor::gap_between_points(daily_close.as_ref(), ltp_330.as_ref()),
            ltp_330: ltp_330.map(|p| p.value),
            daily_close: daily_close.map(|p| p.value),
        }
    }

    /// Trailing window of daily sessions, oldest first
    pub async fn sixth_sense(&self, instrument: Instrument, now: NaiveDateTime) -> Vec<DailyRecord> {
        let days = self.settings.sixth_sense_days;
        let lookback = days as i64 + config::SIXTH_SENSE_LOOKBACK_PADDING_DAYS;
        let from = now.date() - Duration::days(lookback);

        match self.provider.daily_sessions(instrument, from, now).await {
            Ok(sessions) => processor::sixth_sense_records(&sessions, days),
            Err(e) => {
                warn!(%instrument, error = %e, "Daily sessions unavailable");
                Vec::new()
            }
        }
    }

    fn select_from(
        now: NaiveDateTime,
        expiries: &[(Instrument, Vec<NaiveDate>)],
    ) -> Option<ExpirySelection> {
        let today = now.date();
        let candidates: Vec<Candidate> = expiries
            .iter()
            .map(|(instrument, dates)| Candidate {
                instrument: *instrument,
                nearest: config::instrument_spec(*instrument)
                    .expiry_window
                    .and_then(|window| expiry::first_in_window(dates, today, window)),
            })
            .collect();

        expiry::select_instrument(&candidates)
    }

    fn coverage_from(
        now: NaiveDateTime,
        expiries: &[(Instrument, Vec<NaiveDate>)],
        spots: &[(Instrument, Option<Decimal>)],
    ) -> CoverageReport {
        let next_day = calendar::next_trading_day(now);
        let mut instruments = Vec::new();
        let mut skipped = Vec::new();

        for (instrument, dates) in expiries {
            let dte = expiry::dte_as_of(dates, next_day).map(|(_, dte)| dte);
            let spot = spots
                .iter()
                .find(|(i, _)| i == instrument)
                .and_then(|(_, s)| *s);

            match coverage::maybe_estimate(*instrument, dte, spot) {
                Some(estimate) => instruments.push(estimate),
                None => skipped.push(CoverageSkip {
                    instrument: *instrument,
                    reason: if dte.is_none() {
                        CoverageMissing::NoValidExpiry
                    } else {
                        CoverageMissing::SpotUnavailable
                    },
                }),
            }
        }

        CoverageReport {
            date: next_day,
            label: next_day.format("%a %d %b").to_string(),
            instruments,
            skipped,
        }
    }

    async fn traded_expiries(&self) -> Vec<(Instrument, Vec<NaiveDate>)> {
        let mut out = Vec::with_capacity(config::TRADED_INSTRUMENTS.len());
        for instrument in config::TRADED_INSTRUMENTS {
            out.push((*instrument, self.expiries(*instrument).await));
        }
        out
    }

    /// Instrument to trade today by expiry proximity
    pub async fn select_expiry(&self, now: NaiveDateTime) -> Result<ExpirySelection, SignalError> {
        let expiries = self.traded_expiries().await;
        Self::select_from(now, &expiries).ok_or(SignalError::NoValidExpiry)
    }

    /// Premium estimates for the next trading day
    pub async fn coverage(&self, now: NaiveDateTime) -> CoverageReport {
        let expiries = self.traded_expiries().await;
        self.coverage_with(now, &expiries).await
    }

    async fn coverage_with(&self, now: NaiveDateTime, expiries: &[(Instrument, Vec<NaiveDate>)]) -> CoverageReport {
        let mut spots = Vec::with_capacity(expiries.len());
        for (instrument, _) in expiries {
            spots.push((*instrument, self.spot_price(*instrument).await));
        }
        Self::coverage_from(now, expiries, &spots)
    }

    // -----------------------------------------------
    // QUERIES
    // -----------------------------------------------

    /// The full signal bundle. Fails only when no instrument has an
    /// in-window expiry.
    pub async fn bundle(&self, now: NaiveDateTime) -> Result<SignalBundle, SignalError> {
        let expiries = self.traded_expiries().await;
        let selection = Self::select_from(now, &expiries).ok_or(SignalError::NoValidExpiry)?;
        info!(
            instrument = %selection.instrument,
            expiry = %selection.expiry_date,
            dte = selection.dte,
            "Selected instrument"
        );

        let bid = self.bid_signal(selection.instrument, now).await;
        let pricegap = self.pricegap_signal(selection.instrument, now).await;
        let sixthsense = self.sixth_sense(selection.instrument, now).await;
        let coverage = self.coverage_with(now, &expiries).await;

        Ok(SignalBundle {
            instrument: selection.instrument,
            expiry_date: selection.expiry_date,
            dte: selection.dte,
            trading_day_dte: (selection.dte - 1).max(0),
            timestamp: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            bid,
            pricegap,
            sixthsense,
            coverage,
        })
    }

    /// BID signal for every board instrument, each computed on its own
    pub async fn bid_board(&self, now: NaiveDateTime) -> Vec<BidBoardEntry> {
        let mut board = Vec::with_capacity(config::BID_BOARD_INSTRUMENTS.len());
        for instrument in config::BID_BOARD_INSTRUMENTS {
            board.push(BidBoardEntry {
                instrument: *instrument,
                name: config::instrument_spec(*instrument).display_name.to_string(),
                signal: self.bid_signal(*instrument, now).await,
            });
        }
        board
    }
}
