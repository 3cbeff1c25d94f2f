//! Yahoo Finance chart API integration (daily OHLCV + company metadata).

use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{CompanyProfile, PriceBar, PriceHistory, normalize_ticker};
use crate::error::AppError;

const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const DEFAULT_USER_AGENT: &str = concat!("stock-dash/", env!("CARGO_PKG_VERSION"));

pub struct YahooClient {
    client: Client,
    chart_url: String,
    summary_url: String,
    user_agent: String,
}

impl YahooClient {
    /// Build a client, honouring `STOCK_DASH_CHART_URL`, `STOCK_DASH_SUMMARY_URL`
    /// and `STOCK_DASH_USER_AGENT` from the environment (or `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let chart_url = std::env::var("STOCK_DASH_CHART_URL").unwrap_or_else(|_| DEFAULT_CHART_URL.to_string());
        let summary_url =
            std::env::var("STOCK_DASH_SUMMARY_URL").unwrap_or_else(|_| DEFAULT_SUMMARY_URL.to_string());
        let user_agent = std::env::var("STOCK_DASH_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            chart_url: chart_url.trim_end_matches('/').to_string(),
            summary_url: summary_url.trim_end_matches('/').to_string(),
            user_agent,
        })
    }

    /// Most recent daily bars, e.g. `range = "60d"`.
    pub fn fetch_recent(&self, ticker: &str, range: &str) -> Result<PriceHistory, AppError> {
        self.fetch(ticker, &[("range", range.to_string()), ("interval", "1d".to_string())])
    }

    /// Daily bars in `[start, end)`. A missing start means the full history;
    /// a missing end means up to now.
    pub fn fetch_range(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceHistory, AppError> {
        let mut query = vec![("interval", "1d".to_string())];
        match start {
            Some(start) => {
                query.push(("period1", unix_midnight(start).to_string()));
                let end_ts = end.map(unix_midnight).unwrap_or_else(|| chrono::Utc::now().timestamp());
                query.push(("period2", end_ts.to_string()));
            }
            None => {
                query.push(("range", "max".to_string()));
            }
        }
        let mut history = self.fetch(ticker, &query)?;
        if let Some(end) = end {
            history.bars.retain(|b| b.date < end);
        }
        Ok(history)
    }

    /// Long business summary from the `assetProfile` quote-summary module.
    pub fn fetch_description(&self, ticker: &str) -> Result<Option<String>, AppError> {
        let ticker = normalize_ticker(ticker)?;
        let url = format!("{}/{}", self.summary_url, ticker);
        debug!(%url, "requesting company profile");

        let resp = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("modules", "assetProfile")])
            .send()
            .map_err(|e| AppError::new(4, format!("Profile request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Profile request for {ticker} failed with status {}.", resp.status()),
            ));
        }

        let body: SummaryResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse profile response: {e}")))?;
        parse_summary(&ticker, body)
    }

    /// Fill `history.profile.description`; a failed lookup only logs a warning.
    pub fn attach_description(&self, history: &mut PriceHistory) {
        match self.fetch_description(&history.ticker) {
            Ok(description) => history.profile.description = description,
            Err(err) => warn!(ticker = %history.ticker, error = %err, "company profile unavailable"),
        }
    }

    fn fetch(&self, ticker: &str, query: &[(&str, String)]) -> Result<PriceHistory, AppError> {
        let ticker = normalize_ticker(ticker)?;
        let url = format!("{}/{}", self.chart_url, ticker);
        debug!(%url, ?query, "requesting chart data");

        let resp = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .map_err(|e| AppError::new(4, format!("Chart request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Chart request for {ticker} failed with status {}.", resp.status()),
            ));
        }

        let body: ChartResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse chart response: {e}")))?;

        let history = parse_chart(&ticker, body)?;
        info!(ticker = %history.ticker, bars = history.bars.len(), "fetched price history");
        Ok(history)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    currency: Option<String>,
    exchange_name: Option<String>,
    short_name: Option<String>,
    long_name: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn parse_chart(ticker: &str, body: ChartResponse) -> Result<PriceHistory, AppError> {
    if let Some(err) = body.chart.error {
        return Err(AppError::new(
            4,
            format!("Chart API error for {ticker} [{}]: {}", err.code, err.description),
        ));
    }
    let result = body
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::new(4, format!("No chart data returned for {ticker}.")))?;

    let profile = CompanyProfile {
        symbol: result.meta.symbol.clone(),
        name: result.meta.long_name.or(result.meta.short_name),
        exchange: result.meta.exchange_name,
        currency: result.meta.currency,
        description: None,
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        // Days without a close (halts, partial rows) are skipped.
        let Some(close) = series_value(&quote.close, i) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
            .ok_or_else(|| AppError::new(4, format!("Invalid chart timestamp {ts}.")))?
            .date_naive();
        bars.push(PriceBar {
            date,
            open: series_value(&quote.open, i).unwrap_or(close),
            high: series_value(&quote.high, i).unwrap_or(close),
            low: series_value(&quote.low, i).unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    Ok(PriceHistory {
        ticker: ticker.to_string(),
        profile,
        bars,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    long_business_summary: Option<String>,
}

fn parse_summary(ticker: &str, body: SummaryResponse) -> Result<Option<String>, AppError> {
    if let Some(err) = body.quote_summary.error {
        return Err(AppError::new(
            4,
            format!("Profile API error for {ticker} [{}]: {}", err.code, err.description),
        ));
    }
    Ok(body
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.asset_profile)
        .and_then(|p| p.long_business_summary)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn series_value(series: &[Option<f64>], i: usize) -> Option<f64> {
    series.get(i).copied().flatten().filter(|v| v.is_finite())
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "ACME",
                    "currency": "USD",
                    "exchangeName": "NMS",
                    "shortName": "Acme Corp",
                    "gmtoffset": -14400
                },
                "timestamp": [1735828200, 1735914600, 1735741800],
                "indicators": {
                    "quote": [{
                        "open": [10.0, null, 9.0],
                        "high": [11.0, 12.0, 9.5],
                        "low": [9.5, 10.5, 8.5],
                        "close": [10.5, null, 9.2],
                        "volume": [1000, 2000, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parse_chart_sorts_and_skips_missing_closes() {
        let body: ChartResponse = serde_json::from_str(SAMPLE).unwrap();
        let history = parse_chart("ACME", body).unwrap();
        assert_eq!(history.profile.display_name(), "Acme Corp");
        assert_eq!(history.profile.currency.as_deref(), Some("USD"));
        assert_eq!(history.bars.len(), 2);
        assert_eq!(history.bars[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(history.bars[0].close, 9.2);
        assert_eq!(history.bars[0].volume, 0);
        assert_eq!(history.bars[1].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(history.closes(), vec![9.2, 10.5]);
    }

    #[test]
    fn parse_chart_surfaces_api_errors() {
        let body: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        let err = parse_chart("NOPE", body).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("delisted"));
    }

    #[test]
    fn parse_summary_reads_long_business_summary() {
        let body: SummaryResponse = serde_json::from_str(
            r#"{"quoteSummary":{"result":[{"assetProfile":{
                "sector":"Industrials",
                "longBusinessSummary":" Acme Corp makes anvils and rocket skates. "
            }}],"error":null}}"#,
        )
        .unwrap();
        let description = parse_summary("ACME", body).unwrap();
        assert_eq!(description.as_deref(), Some("Acme Corp makes anvils and rocket skates."));
    }

    #[test]
    fn parse_summary_without_profile_is_none() {
        let body: SummaryResponse =
            serde_json::from_str(r#"{"quoteSummary":{"result":[{"assetProfile":{}}],"error":null}}"#).unwrap();
        assert_eq!(parse_summary("ACME", body).unwrap(), None);

        let body: SummaryResponse = serde_json::from_str(
            r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: NOPE"}}}"#,
        )
        .unwrap();
        let err = parse_summary("NOPE", body).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
