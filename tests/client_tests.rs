//! HTTP client tests against a local `tiny_http` server.

use std::thread::{self, JoinHandle};

use trendlens::app::App;
use trendlens::client::{Backend, HttpBackend, SeriesQuery, UptrendQuery};
use trendlens::config::schema::{BackendConfig, DashboardConfig, Mode};
use trendlens::error::DashError;
use trendlens::logging;
use trendlens::range::parse_range;
use trendlens::storage::MemoryStorage;

/// Serve `responses` in order, one per request, and hand back the request
/// URLs once they are all answered.
fn serve(responses: Vec<(u16, &'static str)>) -> (HttpBackend, JoinHandle<Vec<String>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("mock server listens on TCP");

    let handle = thread::spawn(move || {
        let mut urls = Vec::new();
        for (status, body) in responses {
            let request = server.recv().expect("receive request");
            urls.push(request.url().to_string());
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            request.respond(response).expect("send response");
        }
        urls
    });

    let config = BackendConfig {
        base_url: format!("http://{addr}/"),
        timeout_ms: 5_000,
    };
    (HttpBackend::from_config(&config), handle)
}

#[test]
fn decodes_week_catalog() {
    let (client, server) = serve(vec![(
        200,
        r#"[{"weekId":1,"label":"2024-W01"},{"weekId":2,"label":"2024-W02"}]"#,
    )]);
    let weeks = client.weeks().unwrap();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[1].week_id, 2);
    assert_eq!(weeks[1].option_label(), "Week 2024-W02");
    assert_eq!(server.join().unwrap(), ["/weeks"]);
}

#[test]
fn non_success_status_carries_status_line_and_body() {
    let (client, server) = serve(vec![(503, "index rebuilding")]);
    let err = client.weeks().unwrap_err();
    assert_eq!(err.to_string(), "503 Service Unavailable - index rebuilding");
    assert!(matches!(err, DashError::Request { status: 503, .. }));
    server.join().unwrap();
}

#[test]
fn uptrends_sends_normalized_parameters() {
    let (client, server) = serve(vec![(
        200,
        r#"[{"term":"heat pump","start_rank":120,"end_rank":14,"total_improvement":106,"weeks":6}]"#,
    )]);
    let weeks: Vec<_> = (1..=10)
        .map(|i| trendlens::model::Week::new(i, format!("W{i}")))
        .collect();
    let range = parse_range("10", "5", &weeks).unwrap();
    let rows = client
        .uptrends(&UptrendQuery::new(&range, "a, b", ""))
        .unwrap();
    assert_eq!(rows[0].term, "heat pump");
    assert_eq!(rows[0].total_improvement.as_number(), Some(106.0));

    let urls = server.join().unwrap();
    let url = &urls[0];
    assert!(url.starts_with("/uptrends?"), "{url}");
    assert!(url.contains("startWeekId=5"), "{url}");
    assert!(url.contains("endWeekId=10"), "{url}");
    assert!(
        url.contains("include=a+b") || url.contains("include=a%20b"),
        "{url}"
    );
}

#[test]
fn series_tolerates_missing_ranks() {
    let (client, server) = serve(vec![(
        200,
        r#"[{"weekLabel":"W1","rank":3},{"weekLabel":"W2","rank":null},{"weekLabel":"W3"}]"#,
    )]);
    let points = client.series(&SeriesQuery::new("solar", 1, 3)).unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].finite_rank(), Some(3.0));
    assert_eq!(points[1].rank, None);
    assert_eq!(points[2].rank, None);

    let urls = server.join().unwrap();
    assert!(urls[0].starts_with("/series?term=solar"), "{}", urls[0]);
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (client, server) = serve(vec![(200, "<html>oops</html>")]);
    assert!(matches!(client.weeks(), Err(DashError::Decode(_))));
    server.join().unwrap();
}

#[test]
fn reindex_ignores_response_body() {
    let (client, server) = serve(vec![(200, "rebuilt 42 terms")]);
    client.reindex().unwrap();
    assert_eq!(server.join().unwrap(), ["/reindex"]);
}

#[test]
fn dashboard_startup_over_http() {
    logging::set_enabled(false);
    let (client, server) = serve(vec![
        (
            200,
            r#"[{"weekId":1,"label":"W1"},{"weekId":2,"label":"W2"},{"weekId":3,"label":"W3"}]"#,
        ),
        (
            200,
            r#"[{"term":"solar","start_rank":9,"end_rank":2,"total_improvement":7,"weeks":3}]"#,
        ),
    ]);
    let settings = DashboardConfig {
        mode: Mode::Pro,
        ..DashboardConfig::default()
    };
    let mut app = App::new(client, MemoryStorage::default(), settings);
    app.start();

    assert_eq!(app.range_badge(), "3 weeks • W1 → W3");
    assert_eq!(app.table().found_label(), "Found: 1");
    assert!(app.take_console().is_empty());

    let urls = server.join().unwrap();
    assert_eq!(urls[0], "/weeks");
    assert!(urls[1].starts_with("/uptrends?startWeekId=1&endWeekId=3"), "{}", urls[1]);
}
