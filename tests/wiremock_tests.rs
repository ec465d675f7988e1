// wxbrief - METAR/TAF weather briefing for aviationweather.gov
//
// Copyright 2025 The wxbrief Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Integration tests for the aviationweather.gov client, the briefing
//! layer, and the webhook notifier, driven against a wiremock server.

use reqwest::{Client, Url};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wxbrief::brief::{self, WeatherBrief};
use wxbrief::client::AviationWeatherClient;
use wxbrief::notify::Notifier;

const SAMPLE_METAR: &str = "KJFK 211951Z 18010G20KT 10SM -RA BKN025 25/17 A2992";

fn sample_taf_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<response version="1.2">
    <request_index>12345</request_index>
    <data_source name="tafs"/>
    <errors/>
    <warnings/>
    <time_taken_ms>7</time_taken_ms>
    <data num_results="2">
        <TAF>
            <raw_text>TAF KJFK 211730Z 2118/2224 18012KT P6SM SCT035</raw_text>
            <station_id>KJFK</station_id>
        </TAF>
        <TAF>
            <raw_text>TAF AMD KJFK 212030Z 2121/2224 19010KT P6SM BKN040</raw_text>
            <station_id>KJFK</station_id>
        </TAF>
    </data>
</response>"#
        .to_string()
}

fn create_test_client(server: &MockServer) -> AviationWeatherClient {
    AviationWeatherClient::new(Client::new(), &server.uri())
}

async fn mount_metar_mock(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_taf_mock(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/data/dataserver.php"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// METAR fetch
// ============================================================================

#[tokio::test]
async fn test_metar_request_uses_expected_url_and_trims_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .and(query_param("ids", "KJFK"))
        .and(query_param("format", "raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("  {}\n\n", SAMPLE_METAR)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let metar = client.metar("KJFK").await.expect("METAR fetch should succeed");

    assert_eq!(metar, SAMPLE_METAR);
}

#[tokio::test]
async fn test_metar_empty_body_yields_placeholder() {
    let server = MockServer::start().await;
    mount_metar_mock(&server, ResponseTemplate::new(200).set_body_string("   \n")).await;
    mount_taf_mock(&server, ResponseTemplate::new(200).set_body_string(sample_taf_xml())).await;

    let client = create_test_client(&server);
    let result = WeatherBrief::fetch(&client, "KJFK").await;

    assert_eq!(result.metar, brief::METAR_EMPTY);
    // placeholder passes through the decode stage unchanged
    assert_eq!(result.decoded_metar, brief::METAR_EMPTY);
}

#[tokio::test]
async fn test_metar_server_error_yields_network_placeholder() {
    let server = MockServer::start().await;
    mount_metar_mock(&server, ResponseTemplate::new(500).set_body_string("boom")).await;
    mount_taf_mock(&server, ResponseTemplate::new(200).set_body_string(sample_taf_xml())).await;

    let client = create_test_client(&server);
    let result = WeatherBrief::fetch(&client, "KJFK").await;

    assert_eq!(result.metar, brief::METAR_NETWORK);
    assert_eq!(result.decoded_metar, brief::METAR_NETWORK);
    // the TAF stage is unaffected by the METAR failure
    assert!(result.taf.contains("TAF KJFK 211730Z"));
}

// ============================================================================
// TAF fetch
// ============================================================================

#[tokio::test]
async fn test_taf_request_uses_expected_url_and_joins_forecasts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/data/dataserver.php"))
        .and(query_param("requestType", "retrieve"))
        .and(query_param("dataSource", "tafs"))
        .and(query_param("format", "xml"))
        .and(query_param("stationString", "KJFK"))
        .and(query_param("hours", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_taf_xml()))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let forecasts = client.taf("KJFK").await.expect("TAF fetch should succeed");
    assert_eq!(forecasts.len(), 2);

    mount_metar_mock(&server, ResponseTemplate::new(200).set_body_string(SAMPLE_METAR)).await;
    let result = WeatherBrief::fetch(&client, "KJFK").await;
    assert_eq!(
        result.taf,
        "TAF KJFK 211730Z 2118/2224 18012KT P6SM SCT035\n\
         TAF AMD KJFK 212030Z 2121/2224 19010KT P6SM BKN040"
    );
}

#[tokio::test]
async fn test_taf_malformed_xml_yields_parse_placeholder() {
    let server = MockServer::start().await;
    mount_metar_mock(&server, ResponseTemplate::new(200).set_body_string(SAMPLE_METAR)).await;
    mount_taf_mock(
        &server,
        ResponseTemplate::new(200).set_body_string("this is not XML at all <<<"),
    )
    .await;

    let client = create_test_client(&server);
    let result = WeatherBrief::fetch(&client, "KJFK").await;

    assert_eq!(result.taf, brief::TAF_PARSE);
    // the METAR stage is unaffected by the TAF failure
    assert_eq!(result.metar, SAMPLE_METAR);
    assert!(result.decoded_metar.contains("station: KJFK"));
}

#[tokio::test]
async fn test_taf_empty_body_yields_empty_placeholder() {
    let server = MockServer::start().await;
    mount_metar_mock(&server, ResponseTemplate::new(200).set_body_string(SAMPLE_METAR)).await;
    mount_taf_mock(&server, ResponseTemplate::new(200).set_body_string("")).await;

    let client = create_test_client(&server);
    let result = WeatherBrief::fetch(&client, "KJFK").await;

    assert_eq!(result.taf, brief::TAF_EMPTY);
}

#[tokio::test]
async fn test_taf_without_forecasts_yields_missing_placeholder() {
    let server = MockServer::start().await;
    mount_metar_mock(&server, ResponseTemplate::new(200).set_body_string(SAMPLE_METAR)).await;
    mount_taf_mock(
        &server,
        ResponseTemplate::new(200)
            .set_body_string(r#"<response version="1.2"><data num_results="0"></data></response>"#),
    )
    .await;

    let client = create_test_client(&server);
    let result = WeatherBrief::fetch(&client, "KJFK").await;

    assert_eq!(result.taf, brief::TAF_MISSING);
}

// ============================================================================
// Input validation
// ============================================================================

#[tokio::test]
async fn test_invalid_icao_short_circuits_all_fetches() {
    let server = MockServer::start().await;

    let client = create_test_client(&server);
    let result = WeatherBrief::fetch(&client, "kjfk").await;

    assert_eq!(result.metar, brief::INVALID_ICAO);
    assert_eq!(result.taf, brief::INVALID_ICAO);
    assert_eq!(result.decoded_metar, brief::INVALID_ICAO);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no request should be made for an invalid code");
}

// ============================================================================
// Notifier
// ============================================================================

fn sample_brief() -> WeatherBrief {
    WeatherBrief {
        metar: SAMPLE_METAR.to_string(),
        taf: "TAF KJFK 211730Z 2118/2224 18012KT P6SM SCT035".to_string(),
        decoded_metar: "station: KJFK".to_string(),
    }
}

#[tokio::test]
async fn test_notifier_posts_payload_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let webhook_url = Url::parse(&format!("{}/hook", server.uri())).unwrap();
    let notifier = Notifier::new(Client::new(), Some(webhook_url));
    notifier.send(&sample_brief(), "kjfk").await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["text"]
        .as_str()
        .unwrap()
        .starts_with("*Weather Brief for KJFK*"));
    assert_eq!(body["attachments"][0]["fields"][0]["title"], "METAR");
    assert_eq!(body["attachments"][0]["fields"][0]["value"], SAMPLE_METAR);
    assert_eq!(body["attachments"][0]["fields"][2]["value"], "station: KJFK");
}

#[tokio::test]
async fn test_notifier_absorbs_webhook_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("webhook exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let webhook_url = Url::parse(&format!("{}/hook", server.uri())).unwrap();
    let notifier = Notifier::new(Client::new(), Some(webhook_url));

    // completes without panicking; the failure is logged and absorbed
    notifier.send(&sample_brief(), "KJFK").await;
}

#[tokio::test]
async fn test_notifier_without_url_sends_nothing() {
    let server = MockServer::start().await;

    let notifier = Notifier::new(Client::new(), None);
    notifier.send(&sample_brief(), "KJFK").await;

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
