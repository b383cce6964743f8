//! Symbol rewriting between the caller's notation and each provider's.
//!
//! Every function here is idempotent.

const CRYPTO_BASES: &[&str] = &[
    "BTC", "ETH", "SOL", "XRP", "BNB", "ADA", "DOGE", "LTC", "DOT", "AVAX", "LINK", "TRX",
];
const STABLE_QUOTES: &[&str] = &["USDT", "USDC", "BUSD"];
const CRYPTO_VENUES: &[&str] = &["BINANCE", "COINBASE", "KRAKEN", "BITFINEX", "BITSTAMP", "GEMINI"];
const FOREX_VENUES: &[&str] = &["OANDA", "FXCM", "FOREX", "FXPRO", "ICMTRADER", "PEPPERSTONE"];

/// Finnhub endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    /// `/forex/candle`
    Forex,
    /// `/crypto/candle`
    Crypto,
    /// `/stock/candle`
    Stock,
}

impl Market {
    /// Path segment used in the candle endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Forex => "forex",
            Self::Crypto => "crypto",
            Self::Stock => "stock",
        }
    }
}

fn strip_venue(s: &str) -> &str {
    s.rsplit_once(':').map_or(s, |(_, rest)| rest)
}

/// `BASE/QUOTE` form: venue prefix removed, `_`/`-` as `/`, bare six-letter
/// pairs split (`XAUUSD` to `XAU/USD`), uppercase.
#[must_use]
pub fn slash_pair(symbol: &str) -> String {
    let s = strip_venue(symbol.trim()).to_ascii_uppercase().replace(&['_', '-'][..], "/");
    if !s.contains('/') && s.len() == 6 && s.chars().all(|c| c.is_ascii_alphabetic()) {
        return format!("{}/{}", &s[..3], &s[3..]);
    }
    s
}

/// Compact form without separators or venue (`XAU/USD` to `XAUUSD`).
#[must_use]
pub fn compact(symbol: &str) -> String {
    strip_venue(symbol.trim())
        .chars()
        .filter(|c| !matches!(*c, '/' | '_' | '-'))
        .collect::<String>()
        .to_ascii_uppercase()
}

fn split_stable(s: &str) -> Option<(&str, &str)> {
    STABLE_QUOTES
        .iter()
        .find_map(|&q| s.strip_suffix(q).filter(|b| !b.is_empty()).map(|b| (b, q)))
}

/// Finnhub composite identifier (`XAU/USD` to `OANDA:XAU_USD`,
/// `BTC/USDT` to `BINANCE:BTCUSDT`). Identifiers that already name a venue are
/// kept apart from case; plain tickers pass through uppercased.
#[must_use]
pub fn finnhub_composite(symbol: &str) -> String {
    let trimmed = symbol.trim();
    if trimmed.contains(':') {
        return trimmed.to_ascii_uppercase();
    }
    let pair = slash_pair(trimmed);
    let Some((base, quote)) = pair
        .split_once('/')
        .map(|(b, q)| (b.to_string(), q.to_string()))
    else {
        return split_stable(&pair)
            .map(|(b, q)| format!("BINANCE:{b}{q}"))
            .unwrap_or(pair);
    };
    let (base, quote) = (base.as_str(), quote.as_str());
    if CRYPTO_BASES.contains(&base) || STABLE_QUOTES.contains(&quote) {
        let quote = if quote == "USD" { "USDT" } else { quote };
        return format!("BINANCE:{base}{quote}");
    }
    format!("OANDA:{base}_{quote}")
}

/// Endpoint family for a Finnhub composite identifier.
#[must_use]
pub fn finnhub_market(composite: &str) -> Market {
    let venue = composite.split_once(':').map(|(v, _)| v.to_ascii_uppercase());
    match venue.as_deref() {
        Some(v) if CRYPTO_VENUES.contains(&v) => Market::Crypto,
        Some(v) if FOREX_VENUES.contains(&v) => Market::Forex,
        _ => Market::Stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_pair_splits_six_letter_pairs() {
        assert_eq!(slash_pair("xauusd"), "XAU/USD");
        assert_eq!(slash_pair("EUR_USD"), "EUR/USD");
        assert_eq!(slash_pair("OANDA:GBP_JPY"), "GBP/JPY");
        assert_eq!(slash_pair("AAPL"), "AAPL");
        assert_eq!(slash_pair("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn compact_strips_separators() {
        assert_eq!(compact("XAU/USD"), "XAUUSD");
        assert_eq!(compact("oanda:eur_usd"), "EURUSD");
    }

    #[test]
    fn finnhub_builds_composites() {
        assert_eq!(finnhub_composite("XAU/USD"), "OANDA:XAU_USD");
        assert_eq!(finnhub_composite("XAUUSD"), "OANDA:XAU_USD");
        assert_eq!(finnhub_composite("BTC/USDT"), "BINANCE:BTCUSDT");
        assert_eq!(finnhub_composite("BTCUSDT"), "BINANCE:BTCUSDT");
        assert_eq!(finnhub_composite("ETH/USD"), "BINANCE:ETHUSDT");
        assert_eq!(finnhub_composite("binance:ethusdt"), "BINANCE:ETHUSDT");
        assert_eq!(finnhub_composite("AAPL"), "AAPL");
    }

    #[test]
    fn finnhub_market_follows_venue() {
        assert_eq!(finnhub_market("OANDA:XAU_USD"), Market::Forex);
        assert_eq!(finnhub_market("BINANCE:BTCUSDT"), Market::Crypto);
        assert_eq!(finnhub_market("AAPL"), Market::Stock);
    }

    #[test]
    fn all_rewrites_are_idempotent() {
        for s in ["XAUUSD", "xau/usd", "BTC-USDT", "OANDA:EUR_USD", "AAPL", "ethusd", "SOL/USD"] {
            let a = slash_pair(s);
            assert_eq!(slash_pair(&a), a);
            let b = compact(s);
            assert_eq!(compact(&b), b);
            let c = finnhub_composite(s);
            assert_eq!(finnhub_composite(&c), c);
        }
    }
}
