//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the training code stays free of presentation concerns
//! - output changes are localized (important for snapshot tests)

use crate::domain::{CompanyProfile, ForecastPoint, ForecastRun, PriceHistory};
use crate::plot::{ChartLayout, Series, render_line_chart};

pub const DATE_AXIS: &str = "Date";
pub const PRICE_AXIS: &str = "Closed Price";
pub const INDICATOR_LABEL: &str = "EWM-Span-20";

/// Chart title for a forecast: `n_days` counts today.
pub fn forecast_title(n_days: usize) -> String {
    let horizon = n_days.saturating_sub(1);
    if horizon == 1 {
        "Predicted Close Price for next day".to_string()
    } else {
        format!("Predicted Close Price for next {horizon} days")
    }
}

/// Run header: data window, split sizes and the selected hyperparameters.
pub fn format_forecast_summary(run: &ForecastRun) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== sdash - {} ({}) ===\n",
        run.request.ticker,
        run.history.profile.display_name()
    ));
    if let (Some(first), Some(last)) = (run.history.bars.first(), run.history.bars.last()) {
        out.push_str(&format!(
            "Window: {} .. {} ({} trading days, last day index {})\n",
            first.date,
            last.date,
            run.history.bars.len(),
            run.last_day_index
        ));
    }
    out.push_str(&format!("Split: train={} test={}\n", run.n_train, run.n_test));
    out.push_str(&format!(
        "Selected: C={} epsilon={} gamma={}\n",
        run.params.c, run.params.epsilon, run.params.gamma
    ));
    out.push_str(&format!("CV MAE: {:.4}\n", run.cv_mae));
    if let Some(mae) = run.holdout_mae {
        out.push_str(&format!("Holdout MAE: {mae:.4}\n"));
    }
    out
}

/// Table of predicted closes.
pub fn format_forecast_table(points: &[ForecastPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>6} {:>16}\n", "date", "day", "predicted_close"));
    out.push_str(&format!("{:-<10} {:-<6} {:-<16}\n", "", "", ""));
    for p in points {
        out.push_str(&format!(
            "{:<10} {:>6} {:>16.4}\n",
            p.date.to_string(),
            p.day_index,
            p.predicted_close
        ));
    }
    out
}

pub fn format_history_summary(history: &PriceHistory) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== sdash - {} ({}) ===\n",
        history.ticker,
        history.profile.display_name()
    ));
    let (Some(first), Some(last)) = (history.bars.first(), history.bars.last()) else {
        out.push_str("No price data.\n");
        return out;
    };
    let low = history.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let high = history.bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    out.push_str(&format!(
        "Range: {} .. {} ({} bars)\n",
        first.date,
        last.date,
        history.bars.len()
    ));
    out.push_str(&format!(
        "Last close: {:.2} | low={low:.2} high={high:.2}\n",
        last.close
    ));
    out
}

pub fn format_company_info(profile: &CompanyProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("Symbol:   {}\n", profile.symbol));
    out.push_str(&format!("Name:     {}\n", profile.display_name()));
    out.push_str(&format!("Exchange: {}\n", profile.exchange.as_deref().unwrap_or("-")));
    out.push_str(&format!("Currency: {}\n", profile.currency.as_deref().unwrap_or("-")));
    out.push('\n');
    out.push_str(profile.description_or_default());
    out.push('\n');
    out
}

/// Line chart of the predicted closes.
pub fn forecast_chart(run: &ForecastRun, width: usize, height: usize) -> String {
    let title = forecast_title(run.request.n_days);
    let points = run.points.iter().map(|p| (p.date, p.predicted_close)).collect();
    render_line_chart(
        &ChartLayout {
            title: &title,
            x_label: DATE_AXIS,
            y_label: PRICE_AXIS,
            width,
            height,
        },
        &[Series::new("Predicted Close", '*', points)],
    )
}

/// Close and Open over the history window.
pub fn price_chart(history: &PriceHistory, width: usize, height: usize) -> String {
    let title = format!("{} prices", history.profile.display_name());
    let close = history.bars.iter().map(|b| (b.date, b.close)).collect();
    let open = history.bars.iter().map(|b| (b.date, b.open)).collect();
    render_line_chart(
        &ChartLayout {
            title: &title,
            x_label: DATE_AXIS,
            y_label: "Price",
            width,
            height,
        },
        &[Series::new("Close", '*', close), Series::new("Open", '.', open)],
    )
}

/// EWM of Close; `ewm` is aligned with `history.bars`.
pub fn indicator_chart(history: &PriceHistory, ewm: &[f64], width: usize, height: usize) -> String {
    let title = format!("{} {INDICATOR_LABEL}", history.profile.display_name());
    let points = history.bars.iter().zip(ewm.iter()).map(|(b, &v)| (b.date, v)).collect();
    render_line_chart(
        &ChartLayout {
            title: &title,
            x_label: DATE_AXIS,
            y_label: PRICE_AXIS,
            width,
            height,
        },
        &[Series::new(INDICATOR_LABEL, '*', points)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn title_singular_and_plural() {
        assert_eq!(forecast_title(2), "Predicted Close Price for next day");
        assert_eq!(forecast_title(10), "Predicted Close Price for next 9 days");
        assert_eq!(forecast_title(3), "Predicted Close Price for next 2 days");
    }

    #[test]
    fn forecast_table_rows() {
        let points = vec![
            ForecastPoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
                day_index: 60,
                predicted_close: 123.456789,
            },
            ForecastPoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                day_index: 61,
                predicted_close: 124.0,
            },
        ];
        let txt = format_forecast_table(&points);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "2026-01-02     60         123.4568");
        assert!(lines[3].starts_with("2026-01-03     61"));
    }

    #[test]
    fn company_info_falls_back_to_symbol() {
        let profile = CompanyProfile {
            symbol: "ACME".into(),
            ..CompanyProfile::default()
        };
        let txt = format_company_info(&profile);
        assert!(txt.contains("Name:     ACME\n"));
        assert!(txt.contains("Exchange: -\n"));
        assert!(txt.ends_with("please enter a legitimate stock code.\n"));
    }

    #[test]
    fn company_info_prints_description() {
        let profile = CompanyProfile {
            symbol: "ACME".into(),
            name: Some("Acme Corp".into()),
            description: Some("Acme Corp makes anvils.".into()),
            ..CompanyProfile::default()
        };
        let txt = format_company_info(&profile);
        assert!(txt.contains("Currency: -\n\nAcme Corp makes anvils.\n"));
    }

    #[test]
    fn empty_history_summary() {
        let history = PriceHistory {
            ticker: "ACME".into(),
            profile: CompanyProfile::default(),
            bars: Vec::new(),
        };
        assert!(format_history_summary(&history).ends_with("No price data.\n"));
    }
}
