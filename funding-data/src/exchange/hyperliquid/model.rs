use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::FundingError,
    shared::{
        de::de_u64_epoch_ms_as_datetime_utc,
        models::{FundingQuote, FundingRateMap, InstrumentSet, Symbol, Venue},
        normalizer::normalize,
        utils::parse_rate,
    },
};

/*----- */
// Meta
/*----- */
#[derive(Debug, Deserialize)]
pub struct HyperliquidMeta {
    pub universe: Vec<HyperliquidAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidAsset {
    pub name: String,
    #[serde(default)]
    pub is_delisted: bool,
}

impl HyperliquidMeta {
    /// Listed perps as (canonical symbol, venue coin name).
    pub fn listed(&self) -> impl Iterator<Item = (Symbol, &str)> + '_ {
        self.universe
            .iter()
            .filter(|asset| !asset.is_delisted)
            .filter_map(|asset| {
                normalize(Venue::Hyperliquid, &asset.name)
                    .map(|symbol| (symbol, asset.name.as_str()))
            })
    }
}

/*----- */
// Meta and asset contexts
/*----- */
#[derive(Debug, Deserialize)]
pub struct HyperliquidAssetCtx {
    #[serde(default)]
    pub funding: Option<String>,
}

// Response is a two element array, asset contexts are index aligned with the
// meta universe
pub type HyperliquidMetaAndAssetCtxs = (HyperliquidMeta, Vec<HyperliquidAssetCtx>);

#[derive(Debug, Default)]
pub struct HyperliquidSnapshot {
    pub instruments: InstrumentSet,
    pub rates: FundingRateMap,
    pub coin_names: Vec<(Symbol, String)>,
}

pub fn snapshot(
    (meta, contexts): HyperliquidMetaAndAssetCtxs,
    observed_at: DateTime<Utc>,
) -> Result<HyperliquidSnapshot, FundingError> {
    // Contexts are matched to coins by position, a short array would shift or
    // drop listed coins
    if contexts.len() != meta.universe.len() {
        return Err(FundingError::source_unavailable(
            Venue::Hyperliquid,
            format!(
                "metaAndAssetCtxs returned {} asset contexts for {} coins",
                contexts.len(),
                meta.universe.len()
            ),
        ));
    }

    let mut instruments = Vec::with_capacity(meta.universe.len());
    let mut rates = FundingRateMap::new();
    let mut coin_names = Vec::with_capacity(meta.universe.len());

    for (asset, context) in meta.universe.iter().zip(contexts.iter()) {
        if asset.is_delisted {
            continue;
        }
        let Some(symbol) = normalize(Venue::Hyperliquid, &asset.name) else {
            continue;
        };

        // A listed coin without a usable rate stays listed, the aggregator
        // reports it as unavailable rather than pricing it at zero
        let quote = context
            .funding
            .as_deref()
            .and_then(parse_rate)
            .and_then(|rate| {
                FundingQuote::new(Venue::Hyperliquid, symbol.clone(), rate, observed_at).ok()
            });
        if let Some(quote) = quote {
            rates.insert(symbol.clone(), quote);
        }

        coin_names.push((symbol.clone(), asset.name.clone()));
        instruments.push(symbol);
    }

    Ok(HyperliquidSnapshot {
        instruments: instruments.into_iter().collect(),
        rates,
        coin_names,
    })
}

/*----- */
// Funding history
/*----- */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidFundingEntry {
    pub coin: String,
    pub funding_rate: String,
    #[serde(deserialize_with = "de_u64_epoch_ms_as_datetime_utc")]
    pub time: DateTime<Utc>,
}

pub fn latest_funding(
    entries: Vec<HyperliquidFundingEntry>,
    symbol: &Symbol,
) -> Result<FundingQuote, FundingError> {
    let latest = entries
        .into_iter()
        .max_by_key(|entry| entry.time)
        .ok_or_else(|| {
            FundingError::rate_unavailable(
                Venue::Hyperliquid,
                symbol,
                "no funding published in the last 24h",
            )
        })?;

    let rate = parse_rate(&latest.funding_rate).ok_or_else(|| {
        FundingError::rate_unavailable(
            Venue::Hyperliquid,
            symbol,
            format!("unusable fundingRate {:?}", latest.funding_rate),
        )
    })?;

    FundingQuote::new(Venue::Hyperliquid, symbol.clone(), rate, latest.time)
}
