//! Market data client over the Yahoo Finance public API.
//!
//! A deliberately thin 1:1 wrapper: no retries, no caching, and no
//! normalization beyond defaulting absent numeric fields to zero. Bodies
//! are passed through in the upstream camelCase wire shape.

use futures::future;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; SmartStocks/1.0)";

/// Index symbols served by [`YahooFinanceClient::market_summary`], with
/// their display names.
const MARKET_INDICES: [(&str, &str); 4] = [
    ("^DJI", "Dow Jones"),
    ("^GSPC", "S&P 500"),
    ("^IXIC", "NASDAQ"),
    ("^N225", "Nikkei 225"),
];

/// Error raised by the market data client.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Non-success HTTP status from the upstream API.
    #[error("market data API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a status.
    #[error("market data transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("malformed market data response: {0}")]
    Malformed(String),
}

/// Latest quote snapshot for one symbol. Absent numeric fields read as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    #[serde(default)]
    pub regular_market_price: f64,
    #[serde(default)]
    pub regular_market_change: f64,
    #[serde(default)]
    pub regular_market_change_percent: f64,
    #[serde(default)]
    pub regular_market_day_high: f64,
    #[serde(default)]
    pub regular_market_day_low: f64,
    #[serde(default)]
    pub regular_market_open: f64,
    #[serde(default)]
    pub regular_market_previous_close: f64,
    #[serde(default)]
    pub regular_market_volume: u64,
    #[serde(default)]
    pub market_cap: u64,
    #[serde(default)]
    pub fifty_two_week_high: f64,
    #[serde(default)]
    pub fifty_two_week_low: f64,
}

/// Daily candles for one symbol. The upstream reports halted sessions as
/// `null` entries; those are passed through, not dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub timestamp: Vec<i64>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<u64>>,
}

/// One equity hit from symbol search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub exchange: String,
}

/// Snapshot of one major index for the market summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Range token accepted by the chart endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl HistoryRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1d",
            HistoryRange::FiveDays => "5d",
            HistoryRange::OneMonth => "1mo",
            HistoryRange::ThreeMonths => "3mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
            HistoryRange::TwoYears => "2y",
            HistoryRange::FiveYears => "5y",
            HistoryRange::TenYears => "10y",
            HistoryRange::YearToDate => "ytd",
            HistoryRange::Max => "max",
        }
    }
}

// Upstream envelopes. Every layer is optional; an absent layer means "no
// data for this symbol" rather than an error.

#[derive(Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse", default)]
    quote_response: Option<QuoteResults>,
}

#[derive(Deserialize)]
struct QuoteResults {
    #[serde(default)]
    result: Option<Vec<Quote>>,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    chart: Option<ChartResults>,
}

#[derive(Deserialize)]
struct ChartResults {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
}

#[derive(Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<ChartIndicators>,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Option<Vec<ChartQuote>>,
}

#[derive(Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Option<Vec<Option<f64>>>,
    #[serde(default)]
    high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Deserialize)]
struct SearchQuote {
    symbol: String,
    #[serde(default)]
    longname: Option<String>,
    #[serde(default)]
    shortname: Option<String>,
    #[serde(rename = "typeDisp", default)]
    type_disp: String,
    #[serde(default)]
    exchange: String,
}

/// Client for quotes, history, search, FX rates and the index summary.
pub struct YahooFinanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, path_and_query: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path_and_query))
            .header("User-Agent", USER_AGENT)
    }

    async fn get_text(&self, path_and_query: &str) -> Result<String, MarketError> {
        let response = self
            .request(path_and_query)
            .send()
            .await
            .map_err(MarketError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MarketError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response.text().await.map_err(MarketError::Transport)
    }

    /// Latest quote for `symbol`, or `None` when the upstream has no
    /// result for it.
    pub async fn quote(&self, symbol: &str) -> Result<Option<Quote>, MarketError> {
        let text = self
            .get_text(&format!("/v7/finance/quote?symbols={symbol}"))
            .await?;
        parse_quote_body(&text)
    }

    /// Daily candles for `symbol` over `range`, or `None` when the
    /// upstream has no chart for it.
    pub async fn historical(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Option<HistoricalSeries>, MarketError> {
        let text = self
            .get_text(&format!(
                "/v8/finance/chart/{symbol}?range={}&interval=1d",
                range.as_str()
            ))
            .await?;
        parse_chart_body(&text)
    }

    /// Equity matches for `query`, capped at ten.
    pub async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketError> {
        let text = self
            .get_text(&format!(
                "/v1/finance/search?q={}",
                urlencoding::encode(query)
            ))
            .await?;
        parse_search_body(&text)
    }

    /// Spot rate for the `{from}{to}=X` currency pair. A zero price reads
    /// as an unavailable pair.
    pub async fn exchange_rate(&self, from: &str, to: &str) -> Result<Option<f64>, MarketError> {
        let symbol = format!("{from}{to}=X");
        let quote = self.quote(&symbol).await?;
        Ok(quote
            .map(|q| q.regular_market_price)
            .filter(|price| *price != 0.0))
    }

    /// Snapshots of the major indices, fetched concurrently. Legs that
    /// fail or return nothing are skipped, not fatal.
    pub async fn market_summary(&self) -> Vec<IndexSnapshot> {
        let quotes =
            future::join_all(MARKET_INDICES.iter().map(|(symbol, _)| self.quote(symbol))).await;

        MARKET_INDICES
            .iter()
            .zip(quotes)
            .filter_map(|((symbol, name), quote)| match quote {
                Ok(Some(q)) => Some(IndexSnapshot {
                    symbol: q.symbol,
                    name: (*name).to_string(),
                    price: q.regular_market_price,
                    change: q.regular_market_change,
                    change_percent: q.regular_market_change_percent,
                }),
                Ok(None) => None,
                Err(err) => {
                    warn!(symbol, error = %err, "index quote failed, skipping");
                    None
                }
            })
            .collect()
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_quote_body(text: &str) -> Result<Option<Quote>, MarketError> {
    let body: QuoteEnvelope =
        serde_json::from_str(text).map_err(|e| MarketError::Malformed(e.to_string()))?;
    Ok(body
        .quote_response
        .and_then(|r| r.result)
        .and_then(|results| results.into_iter().next()))
}

fn parse_chart_body(text: &str) -> Result<Option<HistoricalSeries>, MarketError> {
    let body: ChartEnvelope =
        serde_json::from_str(text).map_err(|e| MarketError::Malformed(e.to_string()))?;
    let Some(data) = body
        .chart
        .and_then(|c| c.result)
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(None);
    };
    let Some(quote) = data
        .indicators
        .and_then(|i| i.quote)
        .and_then(|quotes| quotes.into_iter().next())
    else {
        return Ok(None);
    };
    Ok(Some(HistoricalSeries {
        timestamp: data.timestamp.unwrap_or_default(),
        open: quote.open.unwrap_or_default(),
        high: quote.high.unwrap_or_default(),
        low: quote.low.unwrap_or_default(),
        close: quote.close.unwrap_or_default(),
        volume: quote.volume.unwrap_or_default(),
    }))
}

fn parse_search_body(text: &str) -> Result<Vec<SymbolMatch>, MarketError> {
    let body: SearchEnvelope =
        serde_json::from_str(text).map_err(|e| MarketError::Malformed(e.to_string()))?;
    Ok(body
        .quotes
        .into_iter()
        .filter(|q| q.type_disp == "Equity")
        .take(10)
        .map(|q| SymbolMatch {
            symbol: q.symbol,
            name: q
                .longname
                .filter(|s| !s.is_empty())
                .or(q.shortname.filter(|s| !s.is_empty()))
                .unwrap_or_default(),
            kind: q.type_disp,
            exchange: q.exchange,
        })
        .collect())
}
