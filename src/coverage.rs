use crate::config;
use crate::models::{CoverageEstimate, Instrument};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Premium percentage for a DTE; outside the table defaults to 0.54
pub fn premium_pct(dte: i64) -> Decimal {
    config::PREMIUM_PCT
        .iter()
        .find(|(d, _)| *d == dte)
        .map(|(_, pct)| *pct)
        .unwrap_or(config::DEFAULT_PREMIUM_PCT)
}

/// `None` when the spot is too large for the premium to be represented
pub fn estimate_premium(instrument: Instrument, dte: i64, spot: Decimal) -> Option<CoverageEstimate> {
    let pct = premium_pct(dte);
    let premium = spot.checked_mul(pct)?.checked_div(dec!(100))?.round_dp(2);
    Some(CoverageEstimate {
        instrument,
        dte,
        spot,
        premium_pct: pct,
        premium,
    })
}

/// Estimate only when both DTE and spot are known
pub fn maybe_estimate(
    instrument: Instrument,
    dte: Option<i64>,
    spot: Option<Decimal>,
) -> Option<CoverageEstimate> {
    estimate_premium(instrument, dte?, spot?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_table() {
        assert_eq!(premium_pct(0), dec!(0.54));
        assert_eq!(premium_pct(1), dec!(0.81));
        assert_eq!(premium_pct(2), dec!(1.05));
        assert_eq!(premium_pct(3), dec!(1.20));
        assert_eq!(premium_pct(4), dec!(1.38));
        assert_eq!(premium_pct(9), dec!(0.54));
        assert_eq!(premium_pct(-1), dec!(0.54));
    }

    #[test]
    fn test_estimate_premium() {
        let est = estimate_premium(Instrument::Nifty, 2, dec!(25000)).unwrap();
        assert_eq!(est.premium_pct, dec!(1.05));
        assert_eq!(est.premium, dec!(262.5));

        let est = estimate_premium(Instrument::Sensex, 1, dec!(81234.56)).unwrap();
        // 81234.56 * 0.81 / 100 = 658.000 (rounded to 2dp)
        assert_eq!(est.premium, dec!(658.00));
    }

    #[test]
    fn test_missing_inputs_omit_estimate() {
        assert!(maybe_estimate(Instrument::Nifty, None, Some(dec!(25000))).is_none());
        assert!(maybe_estimate(Instrument::Nifty, Some(1), None).is_none());
        assert!(maybe_estimate(Instrument::Nifty, Some(1), Some(dec!(25000))).is_some());
    }

    #[test]
    fn test_oversized_spot_omits_estimate() {
        assert!(estimate_premium(Instrument::Nifty, 4, Decimal::MAX).is_none());
        assert!(maybe_estimate(Instrument::Sensex, Some(2), Some(Decimal::MAX)).is_none());
    }
}
