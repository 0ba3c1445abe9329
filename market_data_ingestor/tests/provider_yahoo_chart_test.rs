use chrono::{Duration, TimeZone, Utc};
use market_data_ingestor::{
    models::{asset::AssetClass, request_params::BarsRequestParams, timeframe::TimeFrame},
    providers::{
        DataProvider, ProviderError,
        yahoo_chart::{YahooProvider, YahooProviderConfig},
    },
};
use serial_test::serial;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
};

const CHART_BODY: &str = r#"{"chart":{"result":[{
    "meta":{"symbol":"INFY.NS","gmtoffset":19800,"exchangeTimezoneName":"Asia/Kolkata"},
    "timestamp":[1704167100,1704253500,1704339900],
    "indicators":{"quote":[{
        "open":[1500.0,1510.0,1520.0],
        "high":[1510.0,1520.0,1530.0],
        "low":[1490.0,1500.0,1510.0],
        "close":[1505.0,1515.0,1525.0],
        "volume":[100,200,300]
    }]}
}],"error":null}}"#;

const NOT_FOUND_BODY: &str =
    r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

fn provider_for(server: &MockServer) -> YahooProvider {
    YahooProvider::with_config(YahooProviderConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .expect("provider")
}

fn params(symbols: &[&str]) -> BarsRequestParams {
    let end = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    BarsRequestParams {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        ..BarsRequestParams::daily("", end - Duration::days(700), end, AssetClass::Equity)
    }
}

#[tokio::test]
async fn fetches_daily_bars_in_exchange_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/INFY.NS"))
        .and(query_param("interval", "1d"))
        .and(query_param("period2", "1704412800"))
        .and(query_param("events", "div,splits"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let series = provider_for(&server)
        .fetch_bars(params(&["INFY.NS"]))
        .await
        .unwrap();

    assert_eq!(series.len(), 1);
    let infy = &series[0];
    assert_eq!(infy.symbol, "INFY.NS");
    assert_eq!(infy.timeframe, TimeFrame::day());
    assert_eq!(infy.bars.len(), 3);
    assert_eq!(infy.bars[2].close, 1525.0);
    assert_eq!(
        infy.bars[0].trading_date(infy.exchange_offset).to_string(),
        "2024-01-02"
    );
}

#[tokio::test]
async fn index_request_escapes_caret_and_skips_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/%5ENSEI"))
        .and(query_param_is_missing("events"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let end = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let request = BarsRequestParams::daily("^NSEI", end - Duration::days(30), end, AssetClass::Index);
    let series = provider_for(&server).fetch_bars(request).await.unwrap();

    assert_eq!(series[0].symbol, "^NSEI");
    assert_eq!(series[0].bars.len(), 3);
}

#[tokio::test]
async fn unknown_symbol_is_an_empty_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GONE.NS"))
        .respond_with(ResponseTemplate::new(404).set_body_string(NOT_FOUND_BODY))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/INFY.NS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .mount(&server)
        .await;

    let series = provider_for(&server)
        .fetch_bars(params(&["GONE.NS", "INFY.NS"]))
        .await
        .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].symbol, "GONE.NS");
    assert!(series[0].is_empty());
    assert_eq!(series[1].bars.len(), 3);
}

#[tokio::test]
async fn server_error_surfaces_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .fetch_bars(params(&["INFY.NS"]))
        .await
        .unwrap_err();

    match err {
        ProviderError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_timeframe_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = params(&["INFY.NS"]);
    request.timeframe = TimeFrame::new(3, market_data_ingestor::models::timeframe::TimeFrameUnit::Day);

    let err = provider_for(&server).fetch_bars(request).await.unwrap_err();
    assert!(matches!(err, ProviderError::Validation { .. }));
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_yahoo_provider_live_fetch() {
    let provider = YahooProvider::with_config(YahooProviderConfig::default())
        .expect("Failed to create YahooProvider");
    let end = Utc::now();
    let request = BarsRequestParams::daily(
        "^NSEI",
        end - Duration::days(30),
        end,
        AssetClass::Index,
    );

    let result = provider.fetch_bars(request).await;
    assert!(result.is_ok(), "fetch_bars returned an error: {:?}", result.err());

    let series = result.unwrap();
    assert_eq!(series.len(), 1);
    assert!(!series[0].bars.is_empty(), "Expected at least one bar for ^NSEI");
    assert!(series[0].bars[0].timestamp < series[0].bars[series[0].bars.len() - 1].timestamp);
}
