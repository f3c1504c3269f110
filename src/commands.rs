use crate::models::{
    BidBoardEntry, BidSignal, CoverageMissing, CoverageReport, DailyRecord, Direction, GapResult,
    PriceGapSignal, SignalBundle,
};
use crate::signals::SignalEngine;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// SixthSense rows above this absolute change are highlighted
const SIXTH_SENSE_HIGHLIGHT_PCT: Decimal = dec!(0.5);

/// Terminal front end for the signal engine
pub struct SignalCommands;

impl SignalCommands {
    pub async fn run_signals(engine: &SignalEngine, now: NaiveDateTime) -> Result<()> {
        Self::banner("Index Gap Signals");

        match engine.bundle(now).await {
            Ok(bundle) => Self::display_bundle(&bundle),
            Err(e) => {
                println!("{} {}", "✗".red(), e.to_string().red().bold());
                println!("{} No tradable instrument today", "ℹ".blue());
            }
        }

        Self::footer();
        Ok(())
    }

    pub async fn run_bid(engine: &SignalEngine, now: NaiveDateTime) -> Result<()> {
        Self::banner("BID Board");

        let board = engine.bid_board(now).await;
        for entry in &board {
            Self::display_board_entry(entry);
        }

        Self::footer();
        Ok(())
    }

    // -----------------------------------------------
    // SECTIONS
    // -----------------------------------------------

    fn banner(title: &str) {
        println!("{}", "=".repeat(60).blue());
        println!("{}", title.green().bold());
        println!("{}", "=".repeat(60).blue());
        println!();
    }

    fn footer() {
        println!("{}", "=".repeat(60).blue());
    }

    fn display_bundle(bundle: &SignalBundle) {
        println!(
            "{} Trading {} | Expiry {} | DTE {}",
            "→".cyan(),
            bundle.instrument.as_str().yellow().bold(),
            bundle.expiry_date.format("%d-%b-%Y").to_string().yellow(),
            bundle.trading_day_dte.to_string().yellow()
        );
        println!("{} As of {}", "→".cyan(), bundle.timestamp);
        println!();

        Self::display_bid(&bundle.bid);
        Self::display_pricegap(&bundle.pricegap);
        Self::display_sixth_sense(&bundle.sixthsense);
        Self::display_coverage(&bundle.coverage);
    }

    fn display_bid(bid: &BidSignal) {
        println!("{}", "[1] BID (prev 3:30 LTP → 9:15 open)".cyan().bold());
        println!(
            "    {} 3:30 LTP : {}",
            short_date(bid.prev_date),
            price_or_dash(bid.ltp_330)
        );
        println!(
            "    {} 9:15 Open: {}",
            short_date(bid.today_date),
            price_or_dash(bid.open_915)
        );

        match &bid.gap {
            Some(gap) => println!("    Gap: {}", gap_line(gap)),
            None if !bid.market_open => println!("    {}", "Market not open yet".yellow()),
            None => println!("    {}", "Data not available".yellow()),
        }
        println!();
    }

    fn display_pricegap(pricegap: &PriceGapSignal) {
        println!("{}", "[2] PRICEGAP (daily close → 3:30 LTP)".cyan().bold());
        println!("    Session    : {}", short_date(pricegap.date));
        println!("    Daily close: {}", price_or_dash(pricegap.daily_close));
        println!("    3:30 LTP   : {}", price_or_dash(pricegap.ltp_330));

        match &pricegap.gap {
            Some(gap) => println!("    Gap: {}", gap_line(gap)),
            None => println!("    {}", "Data not available".yellow()),
        }
        println!();
    }

    fn display_sixth_sense(records: &[DailyRecord]) {
        println!(
            "{}",
            format!("[3] SIXTHSENSE (last {} sessions)", records.len())
                .cyan()
                .bold()
        );

        if records.is_empty() {
            println!("    {}", "Data not available".yellow());
            println!();
            return;
        }

        println!(
            "    {:<12} {:>12} {:>12} {:>9}",
            "Date", "Open", "Close", "Change"
        );
        for record in records {
            let line = format!(
                "    {:<12} {:>12} {:>12} {:>8}%",
                short_date(record.date),
                format_price(record.open),
                format_price(record.close),
                format_signed(record.change_pct)
            );
            let colored = color_by_sign(&line, record.change_pct);
            if record.change_pct.abs() > SIXTH_SENSE_HIGHLIGHT_PCT {
                println!("{}", colored.bold());
            } else {
                println!("{}", colored);
            }
        }
        println!();
    }

    fn display_coverage(coverage: &CoverageReport) {
        println!(
            "{}",
            format!("[4] COVERAGE PREMIUM ({})", coverage.label)
                .cyan()
                .bold()
        );

        for estimate in &coverage.instruments {
            println!(
                "    {:<8} DTE {} | Spot {} | {}% → {}",
                estimate.instrument.as_str().yellow(),
                estimate.dte,
                format_price(estimate.spot),
                estimate.premium_pct,
                format_price(estimate.premium).green().bold()
            );
        }
        for skip in &coverage.skipped {
            let reason = match skip.reason {
                CoverageMissing::NoValidExpiry => "No valid expiry",
                CoverageMissing::SpotUnavailable => "Spot unavailable",
            };
            println!(
                "    {:<8} {}",
                skip.instrument.as_str().yellow(),
                reason.red()
            );
        }
        println!();
    }

    fn display_board_entry(entry: &BidBoardEntry) {
        let signal = &entry.signal;
        let status = match &signal.gap {
            Some(gap) => gap_line(gap).to_string(),
            None if !signal.market_open => "Market not open yet".yellow().to_string(),
            None => "Data not available".yellow().to_string(),
        };

        println!("{}", entry.name.yellow().bold());
        println!(
            "    {} LTP {} → {} Open {}",
            short_date(signal.prev_date),
            price_or_dash(signal.ltp_330),
            short_date(signal.today_date),
            price_or_dash(signal.open_915)
        );
        println!("    {}", status);
        println!();
    }
}

// -----------------------------------------------
// FORMATTING
// -----------------------------------------------

fn short_date(date: NaiveDate) -> String {
    date.format("%a %d %b").to_string()
}

/// Two decimals with thousands separators: 24850.5 -> "24,850.50"
pub fn format_price(value: Decimal) -> String {
    let text = format!("{:.2}", value.round_dp(2).abs());
    let (int_part, frac) = match text.split_once('.') {
        Some(parts) => parts,
        None => (text.as_str(), "00"),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value.round_dp(2).is_sign_negative() && !value.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac)
}

/// Like `format_price` but always carries a sign for non-zero values
pub fn format_signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_price(value))
    } else {
        format_price(value)
    }
}

fn price_or_dash(value: Option<Decimal>) -> String {
    value.map(format_price).unwrap_or_else(|| "-".to_string())
}

fn color_by_sign(text: &str, value: Decimal) -> ColoredString {
    if value > Decimal::ZERO {
        text.green()
    } else if value < Decimal::ZERO {
        text.red()
    } else {
        text.yellow()
    }
}

fn gap_line(gap: &GapResult) -> ColoredString {
    let text = format!(
        "{} {} ({}%) {}",
        gap.direction.arrow(),
        format_signed(gap.gap),
        format_signed(gap.gap_pct),
        gap.direction.label()
    );
    match gap.direction {
        Direction::Up => text.green().bold(),
        Direction::Down => text.red().bold(),
        Direction::Flat => text.yellow().bold(),
    }
}
