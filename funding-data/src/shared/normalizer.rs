use super::models::{Symbol, Venue};

const USDT_QUOTE: &str = "USDT";
const OKX_USDT_SWAP_SUFFIX: &str = "-USDT-SWAP";

/// Map a venue-native instrument identifier to its canonical coin symbol.
///
/// Only USD stablecoin margined perpetuals produce a symbol:
/// - Binance, Bybit: `BTCUSDT` -> `BTC` (delivery contracts such as
///   `BTCUSDT_250627` and non USDT quotes are rejected)
/// - Okx: `BTC-USDT-SWAP` -> `BTC`
/// - Hyperliquid: bare coin names, every perp there is USDC margined
pub fn normalize(venue: Venue, raw: &str) -> Option<Symbol> {
    let raw = raw.trim().to_ascii_uppercase();

    match venue {
        Venue::Binance | Venue::Bybit => raw.strip_suffix(USDT_QUOTE).and_then(canonical),
        Venue::Okx => raw.strip_suffix(OKX_USDT_SWAP_SUFFIX).and_then(canonical),
        Venue::Hyperliquid => canonical(&raw),
    }
}

/// Inverse of [`normalize`], the identifier a venue expects for a symbol.
pub fn instrument_id(venue: Venue, symbol: &Symbol) -> String {
    match venue {
        Venue::Binance | Venue::Bybit => format!("{}{}", symbol, USDT_QUOTE),
        Venue::Okx => format!("{}{}", symbol, OKX_USDT_SWAP_SUFFIX),
        Venue::Hyperliquid => symbol.as_str().to_string(),
    }
}

// Upper-cased, non-empty and ASCII alphanumeric.
pub(crate) fn canonical(base: &str) -> Option<Symbol> {
    let base = base.trim();
    if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(Symbol::new_unchecked(base.to_ascii_uppercase()))
}
