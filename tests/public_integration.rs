use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinbase_api_client::model::ObjectKind;
use coinbase_api_client::rest::{CoinbaseClient, CurrencyQuery, PriceQuery};

fn build_public_client(server: &MockServer) -> CoinbaseClient {
    CoinbaseClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_spot_price_default_pair() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/prices/BTC-USD/spot"))
        .and(header("CB-VERSION", "2016-02-18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"amount": "1010.25", "currency": "USD"}
        })))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let price = client.get_spot_price(None).await.unwrap();
    assert_eq!(price.kind(), ObjectKind::Money);
    assert_eq!(price.to_string(), "USD 1010.25");
    assert_eq!(price.amount_decimal(), Some("1010.25".parse().unwrap()));
}

#[tokio::test]
async fn test_historic_spot_price() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/prices/ETH-EUR/spot"))
        .and(query_param("date", "2016-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"amount": "0.87", "currency": "EUR"}
        })))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let query = PriceQuery::new("ETH-EUR").date("2016-01-01");
    let price = client.get_spot_price(Some(&query)).await.unwrap();
    assert_eq!(price.currency(), Some("EUR"));
}

#[tokio::test]
async fn test_buy_and_sell_price_paths() {
    let server = MockServer::start().await;

    for (side, amount) in [("buy", "1020.00"), ("sell", "1000.00")] {
        Mock::given(method("GET"))
            .and(path(format!("/v2/prices/BTC-USD/{side}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"amount": amount, "currency": "USD"}
            })))
            .mount(&server)
            .await;
    }

    let client = build_public_client(&server);
    assert_eq!(client.get_buy_price(None).await.unwrap().amount(), Some("1020.00"));
    assert_eq!(client.get_sell_price(None).await.unwrap().amount(), Some("1000.00"));
}

#[tokio::test]
async fn test_exchange_rates_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/exchange-rates"))
        .and(query_param("currency", "BTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"currency": "BTC", "rates": {"USD": "1010.25", "EUR": "930.10"}}
        })))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let rates = client
        .get_exchange_rates(Some(&CurrencyQuery::new("BTC")))
        .await
        .unwrap();
    let table = rates.attr("rates").unwrap().as_object().unwrap();
    assert_eq!(table.str_field("EUR"), Some("930.10"));
    assert_eq!(rates["currency"].as_str(), Some("BTC"));
}

#[tokio::test]
async fn test_currencies_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/currencies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "AED", "name": "United Arab Emirates Dirham", "min_size": "0.01"},
                {"id": "USD", "name": "US Dollar", "min_size": "0.01"}
            ]
        })))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let currencies = client.get_currencies().await.unwrap();
    assert_eq!(currencies.page().unwrap().len(), 2);
    assert_eq!(currencies[1].as_object().unwrap().id(), Some("USD"));
}

#[tokio::test]
async fn test_server_time() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"iso": "2015-06-23T18:02:51Z", "epoch": 1435082571}
        })))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let time = client.get_time().await.unwrap();
    assert_eq!(time.get("epoch").unwrap().as_i64(), Some(1_435_082_571));
    assert!(time.response().unwrap().status.is_success());
}

#[tokio::test]
async fn test_missing_data_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pagination": {}})))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let err = client.get_time().await.unwrap_err();
    assert!(err.api_error().is_some());
}
