use mockito::{Server, ServerGuard};
use rocket::http::Status;
use rocket::local::asynchronous::Client as LocalClient;
use serde_json::{json, Value};
use std::sync::Arc;
use yield_lens::api::{self, ApiState};
use yield_lens::dex::ekubo::{ETH_ADDRESS, USDC_ADDRESS};
use yield_lens::metrics::Metrics;
use yield_lens::{Config, YieldService};

fn config(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.ekubo.api_url = server.url();
    config.ekubo.quoter_url = server.url();
    config.ekubo.tokens.retain(|t| t.symbol == "ETH" || t.symbol == "USDC");
    config.ekubo.tokens.reverse();
    config.zklend.api_url = server.url();
    config
}

async fn local_client(server: &ServerGuard) -> LocalClient {
    let metrics = Arc::new(Metrics::new().unwrap());
    let service = YieldService::new(&config(server), metrics).unwrap();
    let state = ApiState {
        service: Arc::new(service),
    };
    LocalClient::tracked(api::create_rocket(state))
        .await
        .expect("valid rocket instance")
}

async fn mock_healthy_upstreams(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    let prices = server
        .mock("GET", format!("/prices/{USDC_ADDRESS}").as_str())
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "prices": [
                { "token": ETH_ADDRESS, "price": 3000.0 },
                { "token": USDC_ADDRESS, "price": 1.0 }
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let pools = server
        .mock("GET", format!("/pair/{ETH_ADDRESS}/{USDC_ADDRESS}/pools").as_str())
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "topPools": [{
                "fee": "1020847100762815411640772995208708096",
                "tick_spacing": 5982,
                "extension": "0x0",
                "volume0_24h": "1000000000000000000",
                "volume1_24h": "0",
                "fees0_24h": "3000000000000000",
                "fees1_24h": "0",
                "tvl0_total": "10000000000000000000",
                "tvl1_total": "0"
            }]})
            .to_string(),
        )
        .create_async()
        .await;
    let markets = server
        .mock("GET", "/pools")
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "token": { "symbol": "ETH", "name": "Ether", "decimals": 18 },
                "price": { "price": "300000000000", "decimals": 8 },
                "supply_amount": "1000000000000000000",
                "debt_amount": "0",
                "available_liquidity": "1000000000000000000",
                "lending_apy": { "net_apy": 0.01, "raw_apy": 0.01, "reward_apy": null },
                "borrowing_apy": { "net_apy": 0.03, "raw_apy": 0.03, "reward_apy": null },
                "supplier_count": 1,
                "borrower_count": 0
            }])
            .to_string(),
        )
        .create_async()
        .await;
    vec![prices, pools, markets]
}

#[rocket::async_test]
async fn health_check() {
    let server = Server::new_async().await;
    let client = local_client(&server).await;
    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.unwrap(), "OK");
}

#[rocket::async_test]
async fn combined_snapshot() {
    let mut server = Server::new_async().await;
    let _mocks = mock_healthy_upstreams(&mut server).await;
    let client = local_client(&server).await;

    let response = client.get("/api/v1/apr").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();

    assert_eq!(body["ekubo"].as_array().unwrap().len(), 1);
    assert!((body["ekubo"][0]["apr"].as_f64().unwrap() - 10.95).abs() < 1e-9);
    assert_eq!(body["ekubo"][0]["volume24h"]["token0"], "1000000000000000000");
    assert_eq!(body["zklend"][0]["token"]["symbol"], "ETH");
    assert!((body["zklend"][0]["totalSupplyUSD"].as_f64().unwrap() - 3000.0).abs() < 1e-6);
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[rocket::async_test]
async fn per_protocol_routes() {
    let mut server = Server::new_async().await;
    let _mocks = mock_healthy_upstreams(&mut server).await;
    let client = local_client(&server).await;

    let response = client.get("/api/v1/apr/ekubo").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"][0]["token0Symbol"], "ETH");

    let response = client.get("/api/v1/apr/zklend/eth").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["token"]["symbol"], "ETH");

    let response = client.get("/api/v1/apr/zklend/wbtc").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "No zkLend market for WBTC");

    let response = client.get("/metrics").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let text = response.into_string().await.unwrap();
    assert!(text.contains(r#"yield_lens_passes_total{outcome="success",protocol="ekubo"} 1"#));
}

#[rocket::async_test]
async fn price_failure_returns_fixed_error_body() {
    let mut server = Server::new_async().await;
    let _prices = server
        .mock("GET", format!("/prices/{USDC_ADDRESS}").as_str())
        .with_status(500)
        .create_async()
        .await;
    let client = local_client(&server).await;

    let response = client.get("/api/v1/apr").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to fetch APR data" }));

    let response = client.get("/api/v1/apr/ekubo").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to fetch Ekubo data" }));
}
