//! Synthetic daily price history (geometric Brownian motion over weekdays).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::debug;

use crate::domain::{CompanyProfile, PriceBar, PriceHistory, normalize_ticker};
use crate::error::AppError;

/// Daily drift of log price.
const DRIFT: f64 = 0.0004;
/// Daily volatility of log price.
const VOLATILITY: f64 = 0.015;

/// Generate `days` weekday bars ending on (or just before) `end_date`.
///
/// The same ticker, seed and end date always yield the same history.
pub fn generate_history(ticker: &str, days: usize, seed: u64, end_date: NaiveDate) -> Result<PriceHistory, AppError> {
    let ticker = normalize_ticker(ticker)?;
    if days == 0 {
        return Err(AppError::new(2, "Synthetic history length must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(history_seed(&ticker, seed));
    let normal = Normal::new(DRIFT - 0.5 * VOLATILITY * VOLATILITY, VOLATILITY)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let intraday = Normal::new(0.0, VOLATILITY * 0.5)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let dates = weekdays_ending(end_date, days);
    let mut close: f64 = rng.gen_range(20.0..400.0);
    let mut bars = Vec::with_capacity(days);
    for date in dates {
        let open = close;
        close = open * normal.sample(&mut rng).exp();
        let wick_up = intraday.sample(&mut rng).abs();
        let wick_down = intraday.sample(&mut rng).abs();
        bars.push(PriceBar {
            date,
            open,
            high: open.max(close) * (1.0 + wick_up),
            low: open.min(close) * (1.0 - wick_down).max(0.5),
            close,
            volume: rng.gen_range(500_000..5_000_000),
        });
    }
    debug!(%ticker, bars = bars.len(), seed, "generated synthetic history");

    Ok(PriceHistory {
        profile: CompanyProfile {
            symbol: ticker.clone(),
            name: Some(format!("{ticker} (synthetic)")),
            exchange: Some("SIM".to_string()),
            currency: Some("USD".to_string()),
            description: Some(format!("Simulated daily bars for {ticker} from a seeded random walk.")),
        },
        ticker,
        bars,
    })
}

fn weekdays_ending(end_date: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let mut day = end_date;
    while out.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(day);
        }
        match day.checked_sub_signed(Duration::days(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    out.reverse();
    out
}

fn history_seed(ticker: &str, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    ticker.hash(&mut hasher);
    seed.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn generates_requested_weekday_bars() {
        let history = generate_history("acme", 60, 7, end()).unwrap();
        assert_eq!(history.ticker, "ACME");
        assert_eq!(history.bars.len(), 60);
        assert!(history.bars.windows(2).all(|w| w[0].date < w[1].date));
        assert!(
            history
                .bars
                .iter()
                .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun))
        );
        // 2026-03-15 is a Sunday.
        assert_eq!(history.bars.last().unwrap().date, NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());
        for b in &history.bars {
            assert!(b.close > 0.0 && b.low <= b.open.min(b.close) && b.high >= b.open.max(b.close));
        }
    }

    #[test]
    fn same_seed_same_history() {
        let a = generate_history("ACME", 30, 42, end()).unwrap();
        let b = generate_history("ACME", 30, 42, end()).unwrap();
        let c = generate_history("ACME", 30, 43, end()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.closes(), c.closes());
    }

    #[test]
    fn rejects_zero_days() {
        assert_eq!(generate_history("ACME", 0, 1, end()).unwrap_err().exit_code(), 2);
    }
}
