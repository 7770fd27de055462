use georeply::{GeoCoordinate, GeocodeError, GeocoderConfig, NominatimGeocoder, ReverseGeocoder};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn geocoder(server: &MockServer, language: Option<&str>) -> NominatimGeocoder {
    let config = GeocoderConfig {
        endpoint: format!("{}/reverse", server.uri()),
        user_agent: "georeply-test".to_string(),
        language: language.map(str::to_string),
        zoom: 18,
        timeout_secs: 5,
    };
    NominatimGeocoder::new(&config).unwrap()
}

fn aalborg() -> GeoCoordinate {
    GeoCoordinate::new(57.64911, 10.40744)
}

#[tokio::test]
async fn test_maps_nominatim_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "georeply-test"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "place_id": 1234,
            "display_name": "1, Boulevarden, Aalborg, North Denmark Region, 9000, Denmark",
            "address": {
                "house_number": "1",
                "road": "Boulevarden",
                "suburb": "Aalborg Centrum",
                "city": "Aalborg",
                "municipality": "Aalborg Municipality",
                "state": "North Denmark Region",
                "ISO3166-2-lvl4": "DK-81",
                "postcode": "9000",
                "country": "Denmark",
                "country_code": "dk"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let address = geocoder(&server, Some("en"))
        .await
        .reverse(aalborg())
        .await
        .unwrap();

    assert_eq!(
        address.formatted_address,
        "1, Boulevarden, Aalborg, North Denmark Region, 9000, Denmark"
    );
    assert_eq!(address.street, "Boulevarden");
    assert_eq!(address.house_number, "1");
    assert_eq!(address.suburb, "Aalborg Centrum");
    assert_eq!(address.city, "Aalborg");
    assert_eq!(address.state, "North Denmark Region");
    assert_eq!(address.state_code, "DK-81");
    assert_eq!(address.postcode, "9000");
    assert_eq!(address.country, "Denmark");
    assert_eq!(address.country_code, "DK");
    assert_eq!(address.county, "");
    assert_eq!(address.state_district, "");
}

#[tokio::test]
async fn test_error_body_is_no_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Unable to geocode"
        })))
        .mount(&server)
        .await;

    let result = geocoder(&server, None)
        .await
        .reverse(GeoCoordinate::new(-67.5, -157.5))
        .await;

    assert!(matches!(result, Err(GeocodeError::NoResult(_))));
}

#[tokio::test]
async fn test_server_error_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = geocoder(&server, None).await.reverse(aalborg()).await;

    assert!(matches!(
        result,
        Err(GeocodeError::Service { status: 503 })
    ));
}

#[tokio::test]
async fn test_garbage_body_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let result = geocoder(&server, None).await.reverse(aalborg()).await;

    assert!(matches!(result, Err(GeocodeError::Http(_))));
}
