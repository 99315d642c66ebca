// tests/source_decode.rs
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use house_trend::config::consts::region_by_key;
use house_trend::source::{decode_response, CellQuery, DataSource, MlitClient, SourceError};

#[test]
fn ok_with_data_yields_records() {
    let body = r#"{"status":"OK","data":[
        {"Type":"中古マンション等","Municipality":"港区","TradePrice":"50000000","FloorPlan":"３ＬＤＫ"},
        {"Type":"宅地(土地)","Municipality":"港区","TradePrice":12000000}
    ]}"#;
    let rows = decode_response(body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].municipality.as_deref(), Some("港区"));
    assert_eq!(rows[1].trade_price.as_deref(), Some("12000000"));
}

#[test]
fn ok_with_empty_data_is_zero_records() {
    let rows = decode_response(r#"{"status":"OK","data":[]}"#).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn non_ok_status_is_a_cell_error() {
    let err = decode_response(r#"{"status":"NG","message":"bad key"}"#).unwrap_err();
    assert!(matches!(err, SourceError::ApiStatus(ref s) if s == "NG"));
}

#[test]
fn missing_status_reads_as_unknown() {
    let err = decode_response(r#"{"data":[]}"#).unwrap_err();
    assert!(matches!(err, SourceError::ApiStatus(ref s) if s == "Unknown"));
}

#[test]
fn ok_without_data_has_its_own_message() {
    let err = decode_response(r#"{"status":"OK"}"#).unwrap_err();
    assert!(matches!(err, SourceError::MissingData));
    assert!(!err.to_string().contains("status \"OK\""));
}

#[test]
fn invalid_json_is_a_decode_error() {
    let err = decode_response("<html>maintenance</html>").unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

/// Serve one canned HTTP response on a loopback port.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let resp = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(resp.as_bytes()).unwrap();
    });
    format!("http://{addr}/ex-api/external/XIT001")
}

fn tokyo_cell() -> CellQuery {
    CellQuery { region: region_by_key("tokyo").unwrap(), year: 2024, quarter: 1, city: None }
}

#[test]
fn http_error_status_is_a_cell_error() {
    let url = serve_once("503 Service Unavailable", r#"{"message":"busy"}"#);
    let client = MlitClient::with_base_url("test-key", &url).unwrap();

    let err = client.fetch_cell(&tokyo_cell()).unwrap_err();
    assert!(matches!(err, SourceError::HttpStatus { status: 503, ref body } if body.contains("busy")));
}

#[test]
fn live_client_decodes_the_body() {
    let url = serve_once("200 OK", r#"{"status":"OK","data":[{"Municipality":"千代田区"}]}"#);
    let client = MlitClient::with_base_url("test-key", &url).unwrap();

    let rows = client.fetch_cell(&tokyo_cell()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].municipality.as_deref(), Some("千代田区"));
}
