use serde::Deserialize;
use std::time::Duration;

use super::{DurationProvider, Query};
use crate::error::FetchError;

const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Google Maps Directions API over blocking HTTP.
pub(crate) struct GoogleDirections {
    agent: ureq::Agent,
    endpoint: String,
}

impl GoogleDirections {
    pub(crate) fn new(timeout: Option<Duration>) -> Self {
        Self::with_endpoint(DIRECTIONS_URL, timeout)
    }

    pub(crate) fn with_endpoint(endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        // Non-2xx responses are inspected below rather than surfaced as ureq errors.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }
}

impl DurationProvider for GoogleDirections {
    fn first_leg_seconds(&self, api_key: &str, query: &Query) -> Result<Option<u64>, FetchError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            origin = %query.origin,
            destination = %query.destination,
            "requesting driving directions"
        );

        let response = self
            .agent
            .get(self.endpoint.as_str())
            .query("origin", &query.origin)
            .query("destination", &query.destination)
            .query("mode", "driving")
            .query("departure_time", "now")
            .query("key", api_key)
            .call()
            .map_err(|e| FetchError::Unexpected(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "directions response");
        if !status.is_success() {
            return Err(FetchError::Unexpected(format!(
                "HTTP {} from directions service",
                status.as_u16()
            )));
        }

        let mut body = response.into_body();
        let text = body
            .read_to_string()
            .map_err(|e| FetchError::Unexpected(e.to_string()))?;
        parse_directions(&text)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u64,
}

/// `OK` and `ZERO_RESULTS` are successful replies; every other status is an
/// API-level failure.
fn parse_directions(body: &str) -> Result<Option<u64>, FetchError> {
    let response: DirectionsResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Unexpected(format!("invalid directions response: {e}")))?;

    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        _ => {
            return Err(FetchError::Provider {
                status: response.status,
                message: response.error_message,
            });
        }
    }

    let Some(route) = response.routes.first() else {
        return Ok(None);
    };
    let leg = route
        .legs
        .first()
        .ok_or_else(|| FetchError::Unexpected("first route has no legs".to_string()))?;
    Ok(Some(leg.duration.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    const OK_BODY: &str = r#"{
        "geocoded_waypoints": [],
        "routes": [
            {
                "summary": "7th Ave",
                "legs": [
                    {
                        "distance": { "text": "1.2 km", "value": 1210 },
                        "duration": { "text": "15 mins", "value": 900 },
                        "duration_in_traffic": { "text": "19 mins", "value": 1140 }
                    },
                    {
                        "distance": { "text": "3 km", "value": 3000 },
                        "duration": { "text": "9 mins", "value": 540 }
                    }
                ]
            },
            {
                "summary": "Broadway",
                "legs": [ { "duration": { "text": "2 mins", "value": 120 } } ]
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn takes_first_route_first_leg_duration() {
        assert_eq!(parse_directions(OK_BODY).unwrap(), Some(900));
    }

    #[test]
    fn zero_results_is_no_route() {
        let body = r#"{"geocoded_waypoints": [], "routes": [], "status": "ZERO_RESULTS"}"#;
        assert_eq!(parse_directions(body).unwrap(), None);
    }

    #[test]
    fn ok_with_empty_routes_is_no_route() {
        let body = r#"{"routes": [], "status": "OK"}"#;
        assert_eq!(parse_directions(body).unwrap(), None);
    }

    #[test]
    fn request_denied_is_provider_error() {
        let body = r#"{
            "error_message": "The provided API key is invalid.",
            "routes": [],
            "status": "REQUEST_DENIED"
        }"#;
        let err = parse_directions(body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Google Maps API Error: REQUEST_DENIED (The provided API key is invalid.)"
        );
    }

    #[test]
    fn quota_error_without_message() {
        let body = r#"{"routes": [], "status": "OVER_QUERY_LIMIT"}"#;
        let err = parse_directions(body).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Provider { ref status, message: None } if status == "OVER_QUERY_LIMIT"
        ));
    }

    #[test]
    fn malformed_json_is_unexpected() {
        let err = parse_directions("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Unexpected(_)));
        assert!(
            err.to_string()
                .starts_with("An unexpected error occurred: invalid directions response")
        );
    }

    #[test]
    fn route_without_legs_is_unexpected() {
        let body = r#"{"routes": [{"legs": []}], "status": "OK"}"#;
        let err = parse_directions(body).unwrap_err();
        assert!(matches!(err, FetchError::Unexpected(ref c) if c == "first route has no legs"));
    }

    #[test]
    fn leg_without_duration_is_unexpected() {
        let body = r#"{"routes": [{"legs": [{"distance": {"value": 10}}]}], "status": "OK"}"#;
        assert!(matches!(
            parse_directions(body).unwrap_err(),
            FetchError::Unexpected(_)
        ));
    }

    /// Serve one canned HTTP response on loopback and hand back the request line.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                let n = reader.read_line(&mut line).unwrap();
                if n == 0 || line == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            write!(
                stream,
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            request_line
        });
        (format!("http://{addr}/maps/api/directions/json"), handle)
    }

    #[test]
    fn sends_driving_request_over_http() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", OK_BODY);
        let provider = GoogleDirections::with_endpoint(endpoint, Some(Duration::from_secs(5)));
        let query = Query::new("Times Square, New York, NY", "40.7484,-73.9857");

        let seconds = provider.first_leg_seconds("test-key", &query).unwrap();
        assert_eq!(seconds, Some(900));

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /maps/api/directions/json?"), "{request_line}");
        assert!(request_line.contains("mode=driving"), "{request_line}");
        assert!(request_line.contains("departure_time=now"), "{request_line}");
        assert!(request_line.contains("key=test-key"), "{request_line}");
        assert!(request_line.contains("origin=Times"), "{request_line}");
        assert!(request_line.contains("destination=40.7484"), "{request_line}");
    }

    #[test]
    fn http_error_status_is_unexpected() {
        let (endpoint, server) = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let provider = GoogleDirections::with_endpoint(endpoint, Some(Duration::from_secs(5)));
        let query = Query::new("a", "b");

        let err = provider.first_leg_seconds("k", &query).unwrap_err();
        server.join().unwrap();
        assert!(matches!(
            err,
            FetchError::Unexpected(ref c) if c == "HTTP 500 from directions service"
        ));
    }

    #[test]
    fn unreachable_host_is_unexpected() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let provider = GoogleDirections::with_endpoint(
            format!("http://127.0.0.1:{port}/directions"),
            Some(Duration::from_secs(5)),
        );
        let err = provider.first_leg_seconds("k", &Query::new("a", "b")).unwrap_err();
        assert!(matches!(err, FetchError::Unexpected(_)));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn debug_events_never_include_api_key() {
        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", OK_BODY);
        let provider = GoogleDirections::with_endpoint(endpoint, Some(Duration::from_secs(5)));
        let query = Query::new("Times Square, New York, NY", "Empire State Building");

        let seconds = tracing::subscriber::with_default(subscriber, || {
            provider.first_leg_seconds("secret-key-8c1f", &query)
        })
        .unwrap();
        let request_line = server.join().unwrap();
        assert_eq!(seconds, Some(900));
        assert!(request_line.contains("key=secret-key-8c1f"), "{request_line}");

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("requesting driving directions"), "{logs}");
        assert!(logs.contains("directions response"), "{logs}");
        assert!(!logs.contains("secret-key-8c1f"), "{logs}");
        assert!(!logs.contains("key="), "{logs}");
    }
}
