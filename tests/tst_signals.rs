mod common;

use common::{FakeProvider, at, date, seeded_provider};
use index_signals::models::CoverageMissing;
use index_signals::{Direction, Instrument, SignalEngine, SignalError, SignalSettings};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn engine(provider: FakeProvider) -> SignalEngine {
    SignalEngine::new(Arc::new(provider), SignalSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundle_for_seeded_wednesday() {
        let bundle = engine(seeded_provider())
            .bundle(at(2025, 1, 8, 10, 0))
            .await
            .unwrap();

        assert_eq!(bundle.instrument, Instrument::Nifty);
        assert_eq!(bundle.expiry_date, date(2025, 1, 9));
        assert_eq!(bundle.dte, 1);
        assert_eq!(bundle.trading_day_dte, 0);
        assert_eq!(bundle.timestamp, "2025-01-08T10:00:00");

        // BID: Tue 3:30 LTP (15:29 candle, not 15:31) vs Wed 9:15 open
        assert_eq!(bundle.bid.prev_date, date(2025, 1, 7));
        assert_eq!(bundle.bid.today_date, date(2025, 1, 8));
        assert!(bundle.bid.market_open);
        assert_eq!(bundle.bid.ltp_330, Some(dec!(24800.00)));
        assert_eq!(bundle.bid.open_915, Some(dec!(24850.00)));
        let gap = bundle.bid.gap.unwrap();
        assert_eq!(gap.gap, dec!(50.00));
        assert_eq!(gap.gap_pct, dec!(0.20));
        assert_eq!(gap.direction, Direction::Up);

        // PriceGap: before 15:30, so Tuesday's session
        assert_eq!(bundle.pricegap.date, date(2025, 1, 7));
        assert!(!bundle.pricegap.data_available);
        let pricegap = bundle.pricegap.gap.unwrap();
        assert_eq!(pricegap.gap, dec!(50.00));
        assert_eq!(pricegap.gap_pct, dec!(0.20));

        // SixthSense: last five sessions, oldest first
        assert_eq!(bundle.sixthsense.len(), 5);
        assert_eq!(bundle.sixthsense[0].date, date(2025, 1, 4));
        assert_eq!(bundle.sixthsense[4].date, date(2025, 1, 8));
        assert_eq!(bundle.sixthsense[4].change_pct, dec!(0.80));

        // Coverage for Thu 09 Jan
        assert_eq!(bundle.coverage.date, date(2025, 1, 9));
        assert_eq!(bundle.coverage.label, "Thu 09 Jan");
        assert_eq!(bundle.coverage.instruments.len(), 1);
        let nifty = &bundle.coverage.instruments[0];
        assert_eq!(nifty.instrument, Instrument::Nifty);
        assert_eq!(nifty.dte, 0);
        assert_eq!(nifty.premium_pct, dec!(0.54));
        assert_eq!(nifty.premium, dec!(135.00));
        assert_eq!(bundle.coverage.skipped.len(), 1);
        assert_eq!(bundle.coverage.skipped[0].instrument, Instrument::Sensex);
        assert_eq!(bundle.coverage.skipped[0].reason, CoverageMissing::SpotUnavailable);
    }

    #[tokio::test]
    async fn test_intraday_variant_only_for_current_date() {
        let provider = Arc::new(seeded_provider());
        let engine = SignalEngine::new(provider.clone(), SignalSettings::default());
        engine.bid_signal(Instrument::Nifty, at(2025, 1, 8, 10, 0)).await;

        let requests = provider.candle_requests.lock().unwrap().clone();
        assert!(requests.contains(&(Instrument::Nifty, date(2025, 1, 7), false)));
        assert!(requests.contains(&(Instrument::Nifty, date(2025, 1, 8), true)));
    }

    #[tokio::test]
    async fn test_no_valid_expiry_is_terminal() {
        let mut provider = seeded_provider();
        provider.expiries.insert(Instrument::Nifty, vec![date(2025, 1, 16)]);
        provider.expiries.insert(Instrument::Sensex, vec![date(2025, 1, 14)]);

        let result = engine(provider).bundle(at(2025, 1, 8, 10, 0)).await;
        assert_eq!(result.unwrap_err(), SignalError::NoValidExpiry);
    }

    #[tokio::test]
    async fn test_unreachable_expiry_provider_is_no_valid_expiry() {
        let result = engine(FakeProvider::default())
            .bundle(at(2025, 1, 8, 10, 0))
            .await;
        assert_eq!(result.unwrap_err(), SignalError::NoValidExpiry);
    }

    #[tokio::test]
    async fn test_smaller_dte_wins_then_nifty_on_tie() {
        let now = at(2025, 1, 8, 10, 0);

        let mut provider = FakeProvider::default();
        provider.expiries.insert(Instrument::Nifty, vec![date(2025, 1, 10)]);
        provider.expiries.insert(Instrument::Sensex, vec![date(2025, 1, 9)]);
        let selection = engine(provider).select_expiry(now).await.unwrap();
        assert_eq!(selection.instrument, Instrument::Sensex);
        assert_eq!(selection.dte, 1);

        let mut provider = FakeProvider::default();
        provider.expiries.insert(Instrument::Nifty, vec![date(2025, 1, 9)]);
        provider.expiries.insert(Instrument::Sensex, vec![date(2025, 1, 9)]);
        let selection = engine(provider).select_expiry(now).await.unwrap();
        assert_eq!(selection.instrument, Instrument::Nifty);
    }

    #[tokio::test]
    async fn test_each_signal_degrades_independently() {
        let mut provider = FakeProvider::default();
        provider.expiries.insert(Instrument::Nifty, vec![date(2025, 1, 9)]);

        let bundle = engine(provider).bundle(at(2025, 1, 8, 10, 0)).await.unwrap();

        assert_eq!(bundle.instrument, Instrument::Nifty);
        assert_eq!(bundle.bid.ltp_330, None);
        assert_eq!(bundle.bid.gap, None);
        assert_eq!(bundle.pricegap.daily_close, None);
        assert_eq!(bundle.pricegap.gap, None);
        assert!(bundle.sixthsense.is_empty());
        assert!(bundle.coverage.instruments.is_empty());

        let reasons: Vec<_> = bundle.coverage.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![CoverageMissing::SpotUnavailable, CoverageMissing::NoValidExpiry]
        );
    }

    #[tokio::test]
    async fn test_bid_only_missing_open_keeps_ltp() {
        let mut provider = seeded_provider();
        provider.candles.remove(&(Instrument::Nifty, date(2025, 1, 8)));

        let bid = engine(provider)
            .bid_signal(Instrument::Nifty, at(2025, 1, 8, 10, 0))
            .await;
        assert_eq!(bid.ltp_330, Some(dec!(24800.00)));
        assert_eq!(bid.open_915, None);
        assert_eq!(bid.gap, None);
    }

    #[tokio::test]
    async fn test_bid_before_open_uses_previous_sessions() {
        let bid = engine(seeded_provider())
            .bid_signal(Instrument::Nifty, at(2025, 1, 8, 9, 0))
            .await;

        assert!(!bid.market_open);
        assert_eq!(bid.today_date, date(2025, 1, 7));
        assert_eq!(bid.prev_date, date(2025, 1, 6));
        assert_eq!(bid.gap, None);
    }

    #[tokio::test]
    async fn test_bundle_is_deterministic() {
        let engine = engine(seeded_provider());
        let now = at(2025, 1, 8, 10, 0);

        let first = engine.bundle(now).await.unwrap();
        let second = engine.bundle(now).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_bid_board_covers_three_instruments() {
        let board = engine(seeded_provider())
            .bid_board(at(2025, 1, 8, 10, 0))
            .await;

        let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["NIFTY 50", "BANK NIFTY", "SENSEX"]);

        assert_eq!(board[0].signal.gap.unwrap().direction, Direction::Up);
        assert_eq!(board[1].signal.gap, None);

        let sensex = board[2].signal.gap.unwrap();
        assert_eq!(sensex.gap, dec!(-81.00));
        assert_eq!(sensex.gap_pct, dec!(-0.10));
        assert_eq!(sensex.direction, Direction::Down);
    }

    #[tokio::test]
    async fn test_sixth_sense_window_follows_settings() {
        let engine = SignalEngine::new(
            Arc::new(seeded_provider()),
            SignalSettings { sixth_sense_days: 3 },
        );
        let records = engine
            .sixth_sense(Instrument::Nifty, at(2025, 1, 8, 16, 0))
            .await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, date(2025, 1, 6));
    }

    #[tokio::test]
    async fn test_sixth_sense_window_is_clamped() {
        let now = at(2025, 1, 8, 16, 0);

        let wide = SignalEngine::new(
            Arc::new(seeded_provider()),
            SignalSettings { sixth_sense_days: usize::MAX },
        );
        assert_eq!(wide.sixth_sense(Instrument::Nifty, now).await.len(), 8);

        let empty = SignalEngine::new(
            Arc::new(seeded_provider()),
            SignalSettings { sixth_sense_days: 0 },
        );
        let records = empty.sixth_sense(Instrument::Nifty, now).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date(2025, 1, 8));
    }
}
