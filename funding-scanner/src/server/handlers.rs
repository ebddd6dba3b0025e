use actix_web::{
    get, post,
    web::{self, Data},
    HttpResponse,
};
use std::future::Future;

use funding_data::{
    error::FundingError,
    shared::models::{Symbol, Venue},
};
use serde::Deserialize;
use tracing::info;

use crate::trade::TradeIntent;

use super::{ApiError, AppState};

/*----- */
// Venues
/*----- */
#[get("/venues")]
pub async fn get_venues_handler(state: Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.aggregator.venues())
}

#[get("/venues/{venue}/instruments")]
pub async fn get_venue_instruments_handler(
    state: Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let venue = path.parse::<Venue>()?;
    let instruments = with_timeout(&state, state.aggregator.list_instruments(venue)).await?;
    Ok(HttpResponse::Ok().json(instruments))
}

/*----- */
// Compare
/*----- */
#[derive(Debug, Deserialize)]
pub struct CompareQueryParams {
    venue_a: String,
    venue_b: String,
    limit: Option<usize>,
}

#[get("/compare")]
pub async fn get_compare_handler(
    state: Data<AppState>,
    query: web::Query<CompareQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let venue_a = query.venue_a.parse::<Venue>()?;
    let venue_b = query.venue_b.parse::<Venue>()?;

    let mut comparison = state
        .aggregator
        .compare_with_timeout(venue_a, venue_b, state.config.compare_timeout())
        .await?;

    if let Some(limit) = query.limit {
        comparison.records.truncate(limit);
    }

    Ok(HttpResponse::Ok().json(comparison))
}

#[derive(Debug, Deserialize)]
pub struct VenuePairQueryParams {
    venue_a: String,
    venue_b: String,
}

#[get("/compare/{symbol}")]
pub async fn get_compare_symbol_handler(
    state: Data<AppState>,
    path: web::Path<String>,
    query: web::Query<VenuePairQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let symbol = path.parse::<Symbol>()?;
    let venue_a = query.venue_a.parse::<Venue>()?;
    let venue_b = query.venue_b.parse::<Venue>()?;

    let record = with_timeout(
        &state,
        state.aggregator.compare_symbol(venue_a, venue_b, &symbol),
    )
    .await?;

    Ok(HttpResponse::Ok().json(record))
}

async fn with_timeout<T>(
    state: &AppState,
    future: impl Future<Output = Result<T, FundingError>>,
) -> Result<T, FundingError> {
    let limit = state.config.compare_timeout();
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| FundingError::Timeout(limit))?
}

/*----- */
// Trade intent
/*----- */
#[derive(Debug, Deserialize)]
pub struct TradeIntentBody {
    venue_a: String,
    venue_b: String,
    symbol: String,
    size: Option<f64>,
}

// Phase one: build the legs against a fresh comparison, nothing is sent
#[post("/trade-intent")]
pub async fn post_trade_intent_handler(
    state: Data<AppState>,
    body: web::Json<TradeIntentBody>,
) -> Result<HttpResponse, ApiError> {
    let venue_a = body.venue_a.parse::<Venue>()?;
    let venue_b = body.venue_b.parse::<Venue>()?;
    let symbol = body.symbol.parse::<Symbol>()?;
    let size = body.size.unwrap_or(state.config.execution.default_size);

    let comparison = state
        .aggregator
        .compare_with_timeout(venue_a, venue_b, state.config.compare_timeout())
        .await?;

    let record = comparison.record(&symbol).ok_or_else(|| {
        ApiError::NotFound(format!(
            "{symbol} has no funding spread between {venue_a} and {venue_b}"
        ))
    })?;

    let intent = TradeIntent::from_record(venue_a, venue_b, record, size, |venue, symbol| {
        state.aggregator.instrument_id(venue, symbol)
    })?;

    Ok(HttpResponse::Ok().json(intent))
}

#[derive(Debug, Deserialize)]
pub struct SubmitTradeIntentBody {
    intent: TradeIntent,
    #[serde(default)]
    confirm: bool,
}

// Phase two: only an explicitly confirmed intent reaches the execution venues
#[post("/trade-intent/submit")]
pub async fn post_submit_trade_intent_handler(
    state: Data<AppState>,
    body: web::Json<SubmitTradeIntentBody>,
) -> Result<HttpResponse, ApiError> {
    let SubmitTradeIntentBody { intent, confirm } = body.into_inner();
    if !confirm {
        return Err(ApiError::BadRequest(String::from(
            "trade intent must be submitted with confirm: true",
        )));
    }

    let confirmed = intent.confirm()?;
    info!(
        symbol = %confirmed.intent().symbol,
        long = %confirmed.intent().long.venue,
        short = %confirmed.intent().short.venue,
        "submitting confirmed trade intent"
    );

    let outcome = state.emitter.submit(confirmed).await;
    Ok(HttpResponse::Ok().json(outcome))
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, sync::Arc, time::Duration};

    use actix_web::{http::StatusCode, test, App};

    use super::*;
    use crate::{
        aggregator::Aggregator,
        config::ScannerConfig,
        mock_data::test_utils::{registry, FixtureAdapter},
        server::routes,
        trade::{HttpExecutionClient, TradeEmitter},
    };

    fn state() -> Data<AppState> {
        let venue_a = FixtureAdapter::new(Venue::Binance).with_rates(&[
            ("BTC", 0.0003),
            ("ETH", 0.0002),
            ("SOL", 0.00005),
        ]);
        let venue_b = FixtureAdapter::new(Venue::Okx).with_rates(&[
            ("ETH", 0.0001),
            ("SOL", 0.00009),
            ("DOGE", 0.0002),
        ]);
        let aggregator = Aggregator::new(registry(vec![Arc::new(venue_a), Arc::new(venue_b)]), 8);
        let emitter = TradeEmitter::new(Arc::new(HttpExecutionClient::new(
            HashMap::new(),
            Duration::from_millis(100),
        )));

        Data::new(AppState::new(
            Arc::new(aggregator),
            emitter,
            ScannerConfig::default(),
        ))
    }

    #[actix_web::test]
    async fn test_compare_handler() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let request = test::TestRequest::get()
            .uri("/compare?venue_a=binance&venue_b=okx&limit=1")
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(response["venue_a"], "binance");
        assert_eq!(response["records"].as_array().unwrap().len(), 1);
        assert_eq!(response["records"][0]["symbol"], "ETH");
        assert_eq!(response["records"][0]["favorable"], "venue_a");
    }

    #[actix_web::test]
    async fn test_compare_rejects_bad_pairs() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        for uri in [
            "/compare?venue_a=binance&venue_b=binance",
            "/compare?venue_a=binance&venue_b=kraken",
            "/compare?venue_a=binance&venue_b=hyperliquid",
        ] {
            let request = test::TestRequest::get().uri(uri).to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri} failed");
        }
    }

    #[actix_web::test]
    async fn test_trade_intent_round_trip() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let request = test::TestRequest::post()
            .uri("/trade-intent")
            .set_json(serde_json::json!({
                "venue_a": "binance",
                "venue_b": "okx",
                "symbol": "eth",
                "size": 0.5
            }))
            .to_request();
        let intent: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(intent["long"]["instrument"], "ETHUSDT");
        assert_eq!(intent["long"]["side"], "long");
        assert_eq!(intent["short"]["instrument"], "ETH-USDT-SWAP");
        assert_eq!(intent["short"]["side"], "short");

        // Not confirmed
        let request = test::TestRequest::post()
            .uri("/trade-intent/submit")
            .set_json(serde_json::json!({ "intent": intent.clone() }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Confirmed, no execution endpoints configured so both legs fail
        let request = test::TestRequest::post()
            .uri("/trade-intent/submit")
            .set_json(serde_json::json!({ "intent": intent, "confirm": true }))
            .to_request();
        let outcome: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(outcome["long"]["status"], "failed");
        assert_eq!(outcome["short"]["status"], "failed");
    }

    #[actix_web::test]
    async fn test_compare_symbol_handler() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let request = test::TestRequest::get()
            .uri("/compare/sol?venue_a=binance&venue_b=okx")
            .to_request();
        let record: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(record["symbol"], "SOL");
        assert_eq!(record["rate_a"], 0.00005);
        assert_eq!(record["rate_b"], 0.00009);
        assert_eq!(record["favorable"], "venue_b");

        // Listed on one side only, no rate rather than a zero spread
        let request = test::TestRequest::get()
            .uri("/compare/BTC?venue_a=binance&venue_b=okx")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = test::TestRequest::get()
            .uri("/compare/BTC-USDT?venue_a=binance&venue_b=okx")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_venue_instruments_handler() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let request = test::TestRequest::get()
            .uri("/venues/okx/instruments")
            .to_request();
        let listed: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert_eq!(listed, vec!["DOGE", "ETH", "SOL"]);

        for (uri, status) in [
            ("/venues/kraken/instruments", StatusCode::BAD_REQUEST),
            ("/venues/bybit/instruments", StatusCode::BAD_REQUEST),
        ] {
            let request = test::TestRequest::get().uri(uri).to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), status, "{uri} failed");
        }
    }

    #[actix_web::test]
    async fn test_trade_intent_unknown_symbol() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let request = test::TestRequest::post()
            .uri("/trade-intent")
            .set_json(serde_json::json!({
                "venue_a": "binance",
                "venue_b": "okx",
                "symbol": "DOGE"
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
