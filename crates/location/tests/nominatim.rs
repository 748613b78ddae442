use std::sync::Arc;

use dealzsta_geo::Coordinate;
use dealzsta_location::config::GeocoderConfig;
use dealzsta_location::providers::{FixedPositioning, NominatimGeocoder};
use dealzsta_location::retry::RetryConfig;
use dealzsta_location::{enrich, Geocoder, LocationError, LocationService, Post, ProviderError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder_for(server: &MockServer) -> NominatimGeocoder {
    let config = GeocoderConfig::default()
        .with_base_url(server.uri())
        .with_retry(RetryConfig::quick());
    NominatimGeocoder::new(&config).expect("valid config")
}

#[tokio::test]
async fn geocode_parses_string_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Pariser Platz 1, Berlin"))
        .and(query_param("format", "jsonv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.5163", "lon": "13.3777", "display_name": "Brandenburger Tor"},
            {"lat": "52.5170", "lon": "13.3889", "display_name": "Unter den Linden"}
        ])))
        .mount(&server)
        .await;

    let results = geocoder_for(&server)
        .geocode("Pariser Platz 1, Berlin")
        .await
        .expect("geocode should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], Coordinate::new(52.5163, 13.3777));
}

#[tokio::test]
async fn empty_result_list_is_geocode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = LocationService::new(
        Arc::new(FixedPositioning::granted(Coordinate::new(52.5219, 13.4132))),
        Arc::new(geocoder_for(&server)),
    );

    let err = service.geocode_address("Nowhere 0").await.unwrap_err();
    assert!(matches!(err, LocationError::GeocodeFailed { .. }));
}

#[tokio::test]
async fn server_errors_are_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let err = geocoder_for(&server).geocode("Alter Markt, Potsdam").await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 503, .. }));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("missing user agent"))
        .expect(1)
        .mount(&server)
        .await;

    let err = geocoder_for(&server).geocode("Alter Markt, Potsdam").await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 403, .. }));
}

#[tokio::test]
async fn malformed_payload_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"lat": "north", "lon": "1"}])))
        .mount(&server)
        .await;

    let err = geocoder_for(&server).geocode("Somewhere").await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)));
}

#[tokio::test]
async fn enrich_over_http_isolates_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Pariser Platz 1, Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.5163", "lon": "13.3777"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Unterm Regenbogen 7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = LocationService::new(
        Arc::new(FixedPositioning::granted(Coordinate::new(52.5219, 13.4132))),
        Arc::new(geocoder_for(&server)),
    );
    let user = service.acquire_user_location(false).await.unwrap();

    let posts = enrich(
        &service,
        Some(&user),
        vec![
            Post::new("gate", "Pariser Platz 1, Berlin"),
            Post::new("rainbow", "Unterm Regenbogen 7"),
        ],
    )
    .await;

    assert_eq!(posts[0].shopkm, "2.5km");
    assert_eq!(posts[1].shopkm, "N/A");
}
