use mockito::{Server, ServerGuard};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use yield_lens::config::ZkLendConfig;
use yield_lens::lending::zklend::default_markets;
use yield_lens::lending::ZkLendClient;
use yield_lens::metrics::Metrics;
use yield_lens::{Config, YieldService};

fn market(symbol: &str, decimals: u8, supply: &str, debt: &str) -> Value {
    json!({
        "token": { "symbol": symbol, "name": symbol, "decimals": decimals },
        "price": { "price": "0x5f5e100", "decimals": 8, "quote_currency": "USD" },
        "supply_amount": supply,
        "debt_amount": debt,
        "available_liquidity": "0",
        "lending_apy": { "net_apy": 0.02, "raw_apy": 0.015, "reward_apy": 0.005 },
        "borrowing_apy": { "net_apy": 0.04, "raw_apy": 0.04, "reward_apy": null },
        "supplier_count": 10,
        "borrower_count": 3
    })
}

fn client(server: &ServerGuard) -> (ZkLendClient, Arc<Metrics>) {
    let metrics = Arc::new(Metrics::new().unwrap());
    let config = ZkLendConfig {
        api_url: format!("{}/api", server.url()),
        markets: default_markets(),
    };
    (ZkLendClient::new(Client::new(), config, metrics.clone()), metrics)
}

#[tokio::test]
async fn whitelisted_markets_are_normalized() {
    let mut server = Server::new_async().await;
    let _pools = server
        .mock("GET", "/api/pools")
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                market("USDC", 6, "1000000000000", "250000000000"),
                market("WBTC", 8, "100000000", "0"),
                market("ETH", 18, "2000000000000000000", "1000000000000000000"),
                market("STRK", 18, "not-a-number", "0")
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let (zklend, metrics) = client(&server);
    let markets = zklend.get_pool_stats().await.unwrap();

    let symbols: Vec<_> = markets.iter().map(|m| m.token.symbol.as_str()).collect();
    assert_eq!(symbols, ["USDC", "ETH"]);

    let usdc = &markets[0];
    assert!((usdc.total_supply_usd - 1_000_000.0).abs() < 1e-6);
    assert!((usdc.total_borrow_usd - 250_000.0).abs() < 1e-6);
    assert!((usdc.utilization_rate - 25.0).abs() < 1e-9);
    assert!((usdc.supply_apr.total - 2.0).abs() < 1e-9);
    assert!((usdc.supply_apr.reward - 0.5).abs() < 1e-9);
    assert_eq!(usdc.borrow_apr.reward, 0.0);

    assert!((markets[1].utilization_rate - 50.0).abs() < 1e-9);
    assert!(metrics
        .render()
        .unwrap()
        .contains(r#"yield_lens_skipped_records_total{protocol="zklend",reason="invalid_amount"} 1"#));
}

#[tokio::test]
async fn failed_request_yields_no_markets() {
    let mut server = Server::new_async().await;
    let _pools = server
        .mock("GET", "/api/pools")
        .with_status(500)
        .create_async()
        .await;

    let (zklend, metrics) = client(&server);
    assert!(zklend.get_pool_stats().await.unwrap().is_empty());
    assert!(metrics
        .render()
        .unwrap()
        .contains(r#"yield_lens_fetch_failures_total{protocol="zklend"} 1"#));
}

#[tokio::test]
async fn malformed_market_does_not_hide_the_others() {
    let mut server = Server::new_async().await;
    let mut wbtc = market("WBTC", 8, "100000000", "0");
    wbtc["price"] = Value::Null;
    wbtc["supplier_count"] = Value::Null;
    let mut usdt = market("USDT", 6, "1000000", "0");
    usdt["lending_apy"] = Value::Null;
    let _pools = server
        .mock("GET", "/api/pools")
        .with_header("content-type", "application/json")
        .with_body(
            json!([wbtc, usdt, market("USDC", 6, "1000000000000", "250000000000")]).to_string(),
        )
        .create_async()
        .await;

    let (zklend, metrics) = client(&server);
    let markets = zklend.get_pool_stats().await.unwrap();

    let symbols: Vec<_> = markets.iter().map(|m| m.token.symbol.as_str()).collect();
    assert_eq!(symbols, ["USDC"]);
    assert!((markets[0].utilization_rate - 25.0).abs() < 1e-9);

    let text = metrics.render().unwrap();
    assert!(text.contains(r#"yield_lens_skipped_records_total{protocol="zklend",reason="invalid_record"} 1"#));
    assert!(!text.contains("yield_lens_fetch_failures_total{"));
}

#[tokio::test]
async fn lookup_by_token() {
    let mut server = Server::new_async().await;
    let _pools = server
        .mock("GET", "/api/pools")
        .with_header("content-type", "application/json")
        .with_body(json!([market("ETH", 18, "1000000000000000000", "0")]).to_string())
        .expect(2)
        .create_async()
        .await;

    let mut config = Config::default();
    config.zklend.api_url = format!("{}/api", server.url());
    let service = YieldService::new(&config, Arc::new(Metrics::new().unwrap())).unwrap();

    let eth = service.lending_pool_stats_by_token("eth").await.unwrap().unwrap();
    assert_eq!(eth.token.symbol, "ETH");
    assert!((eth.total_supply_usd - 1.0).abs() < 1e-9);
    assert!(service.lending_pool_stats_by_token("USDT").await.unwrap().is_none());
}
