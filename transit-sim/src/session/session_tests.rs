//! Unit tests for the session and route coordinator.

use super::*;
use crate::cache::{CacheConfig, CachedPathClient};
use crate::domain::{Coord, StopId};
use crate::engine::{PathResult, shortest_path};
use crate::graph::RawNetwork;
use crate::remote::{MockPathService, RemoteClient, RemoteConfig};

fn stop(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

fn stops(names: &[&str]) -> Vec<StopId> {
    names.iter().map(|n| stop(n)).collect()
}

/// A-B:1, B-C:1, C-D:1, A-D:5, stops about 1.1 km apart along the equator.
fn square_network() -> RawNetwork {
    RawNetwork::from_json_str(
        r#"{
            "nodes": [
                {"name": "A", "lat": 0.0, "lng": 0.00},
                {"name": "B", "lat": 0.0, "lng": 0.01},
                {"name": "C", "lat": 0.0, "lng": 0.02},
                {"name": "D", "lat": 0.0, "lng": 0.03}
            ],
            "edges": [
                {"from": "A", "to": "B", "weight": 1},
                {"from": "B", "to": "C", "weight": 1},
                {"from": "C", "to": "D", "weight": 1},
                {"from": "A", "to": "D", "weight": 5}
            ]
        }"#,
    )
    .unwrap()
}

fn session() -> Session {
    Session::with_network(SessionConfig::default(), &square_network())
}

/// Answer every `POST /api/path` with `body`; returns the base URL.
async fn serve_path_body(body: &'static str) -> String {
    let app = axum::Router::new().route(
        "/api/path",
        axum::routing::post(move || async move {
            ([(axum::http::header::CONTENT_TYPE, "application/json")], body)
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn route_via_stub(body: &'static str) -> (Session, RouteOutcome) {
    let client = RemoteClient::new(RemoteConfig::new(serve_path_body(body).await)).unwrap();
    let mut session = session();
    let outcome = session
        .compute_route("A", "D", Some(&client))
        .await
        .unwrap();
    (session, outcome)
}

fn remote_abcd(distance: Option<f64>) -> PathResult {
    PathResult {
        path: stops(&["A", "B", "C", "D"]),
        settled_order: stops(&["A", "B", "C", "D"]),
        distance,
    }
}

#[test]
fn local_route_on_square() {
    let mut session = session();
    let outcome = session.compute_local("A", "D").unwrap();

    assert_eq!(outcome.result.path, stops(&["A", "B", "C", "D"]));
    assert_eq!(outcome.result.distance, Some(3.0));
    assert_eq!(outcome.result.settled_order, stops(&["A", "B", "C", "D"]));
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.segments.len(), 3);
    assert!(outcome.fallback_reason.is_none());

    assert_eq!(session.status().phase, Phase::Found);
    assert_eq!(session.last_result(), Some(&outcome));
}

#[test]
fn query_strings_are_trimmed() {
    let mut session = session();
    let outcome = session.compute_local("  A ", "D\t").unwrap();
    assert_eq!(outcome.result.source(), Some(&stop("A")));
}

#[test]
fn invalid_queries_are_rejected() {
    let mut session = session();

    assert_eq!(
        session.compute_local("", "A"),
        Err(QueryError::MissingSource)
    );
    assert_eq!(
        session.compute_local("A", "   "),
        Err(QueryError::MissingTarget)
    );
    assert_eq!(
        session.compute_local("A", "A"),
        Err(QueryError::SameStop(stop("A")))
    );
    assert_eq!(
        session.compute_local("A", "Z"),
        Err(QueryError::UnknownStop(stop("Z")))
    );

    assert_eq!(session.status().phase, Phase::Error);
    assert!(session.last_result().is_none());
}

#[test]
fn fewest_stops_ignores_weights() {
    let mut session = session();
    let outcome = session.compute_fewest_stops("A", "D").unwrap();
    assert_eq!(outcome.result.path, stops(&["A", "D"]));
    assert_eq!(outcome.result.distance, Some(5.0));
    assert_eq!(outcome.source, RouteSource::Local);

    assert_eq!(
        session.compute_fewest_stops("A", "A"),
        Err(QueryError::SameStop(stop("A")))
    );
}

#[tokio::test]
async fn rejected_remote_falls_back_to_local() {
    let mut session = session();
    let remote = MockPathService::unavailable();

    let outcome = session
        .compute_route("A", "D", Some(&remote))
        .await
        .unwrap();
    let direct = shortest_path(session.graph(), &stop("A"), &stop("D"));

    assert_eq!(outcome.result, direct);
    assert_eq!(outcome.source, RouteSource::Local);
    assert!(outcome.fallback_reason.unwrap().contains("503"));
    assert_eq!(remote.call_count(), 1);
    assert_eq!(session.status().phase, Phase::Found);
}

#[tokio::test]
async fn fallback_shape_matches_local_only() {
    let mut with_remote = session();
    let mut local_only = session();

    let a = with_remote
        .compute_route("A", "D", Some(&MockPathService::unavailable()))
        .await
        .unwrap();
    let b = local_only
        .compute_route::<MockPathService>("A", "D", None)
        .await
        .unwrap();

    assert_eq!(a.result, b.result);
    assert_eq!(a.segments, b.segments);
    assert_eq!(a.route, b.route);
    assert_eq!(a.source, b.source);
    assert!(b.fallback_reason.is_none());
}

#[tokio::test]
async fn remote_result_is_used_when_valid() {
    let mut session = session();
    let remote =
        MockPathService::new().with_route(stop("A"), stop("D"), remote_abcd(Some(3.0)));

    let outcome = session
        .compute_route("A", "D", Some(&remote))
        .await
        .unwrap();

    assert_eq!(outcome.source, RouteSource::Remote);
    assert_eq!(outcome.result, remote_abcd(Some(3.0)));
    assert!(outcome.fallback_reason.is_none());
}

#[tokio::test]
async fn missing_remote_distance_is_reconciled() {
    let mut session = session();
    let remote = MockPathService::new().with_route(stop("A"), stop("D"), remote_abcd(None));

    let outcome = session
        .compute_route("A", "D", Some(&remote))
        .await
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Remote);
    assert_eq!(outcome.result.distance, Some(3.0));
}

#[tokio::test]
async fn disagreeing_remote_distance_is_reconciled() {
    let mut session = session();
    for bad in [42.0, -1.0, f64::NAN] {
        let remote =
            MockPathService::new().with_route(stop("A"), stop("D"), remote_abcd(Some(bad)));
        let outcome = session
            .compute_route("A", "D", Some(&remote))
            .await
            .unwrap();
        assert_eq!(outcome.result.distance, Some(3.0));
    }
}

#[tokio::test]
async fn remote_path_with_unknown_stop_falls_back() {
    let mut session = session();
    let bogus = PathResult {
        path: stops(&["A", "X", "D"]),
        settled_order: Vec::new(),
        distance: Some(1.0),
    };
    let remote = MockPathService::new().with_route(stop("A"), stop("D"), bogus);

    let outcome = session
        .compute_route("A", "D", Some(&remote))
        .await
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.result.path, stops(&["A", "B", "C", "D"]));
    assert!(outcome.fallback_reason.unwrap().contains("unknown stop X"));
}

#[tokio::test]
async fn remote_path_with_wrong_endpoints_falls_back() {
    let mut session = session();
    let wrong = PathResult {
        path: stops(&["B", "C", "D"]),
        settled_order: Vec::new(),
        distance: Some(2.0),
    };
    let remote = MockPathService::new().with_route(stop("A"), stop("D"), wrong);

    let outcome = session
        .compute_route("A", "D", Some(&remote))
        .await
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.result.distance, Some(3.0));
}

#[tokio::test]
async fn remote_no_path_is_not_found_when_local_agrees() {
    let network = RawNetwork::from_json_str(
        r#"{"nodes": ["A", "B", "C"], "edges": [{"from": "A", "to": "B", "weight": 1}]}"#,
    )
    .unwrap();
    let mut session = Session::with_network(SessionConfig::default(), &network);
    let remote = MockPathService::new().with_route(
        stop("A"),
        stop("C"),
        PathResult::no_path(stops(&["A", "Q"])),
    );

    let outcome = session
        .compute_route("A", "C", Some(&remote))
        .await
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Remote);
    assert!(!outcome.is_found());
    assert_eq!(outcome.result.distance, None);
    // Stops the graph does not know are dropped from the trace
    assert_eq!(outcome.result.settled_order, stops(&["A"]));
    assert_eq!(session.status().phase, Phase::NotFound);
}

#[tokio::test]
async fn remote_no_path_on_connected_graph_falls_back() {
    let mut session = session();
    let remote =
        MockPathService::new().with_route(stop("A"), stop("D"), PathResult::no_path(Vec::new()));

    let outcome = session
        .compute_route("A", "D", Some(&remote))
        .await
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.result.distance, Some(3.0));
    assert!(outcome.fallback_reason.unwrap().contains("no path reported"));
    assert_eq!(session.status().phase, Phase::Found);
}

#[tokio::test]
async fn well_formed_stub_answer_is_used() {
    let (_, outcome) = route_via_stub(
        r#"{"path": ["A", "B", "C", "D"], "settledOrder": ["A", "B", "C", "D"], "distance": 3.0}"#,
    )
    .await;
    assert_eq!(outcome.source, RouteSource::Remote);
    assert_eq!(outcome.result.distance, Some(3.0));
}

#[tokio::test]
async fn schema_mismatched_body_falls_back() {
    for body in ["{}", r#"{"unexpected": true}"#, r#"{"distance": 3.0}"#] {
        let (session, outcome) = route_via_stub(body).await;

        assert_eq!(outcome.source, RouteSource::Local, "body {body}");
        assert_eq!(outcome.result.path, stops(&["A", "B", "C", "D"]));
        assert_eq!(outcome.result.distance, Some(3.0));
        assert!(outcome.fallback_reason.unwrap().contains("malformed response"));
        assert_eq!(session.status().phase, Phase::Found);
    }
}

#[tokio::test]
async fn non_numeric_distance_falls_back() {
    let (_, outcome) =
        route_via_stub(r#"{"path": ["A", "B", "C", "D"], "distance": "3"}"#).await;
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.result.distance, Some(3.0));
    assert!(outcome.fallback_reason.unwrap().contains("malformed response"));
}

#[test]
fn begin_route_marks_session_computing() {
    let mut session = session();
    let query = session.begin_route("A", "D").unwrap();

    assert_eq!(query.revision, session.revision());
    assert_eq!(session.status().phase, Phase::Computing);

    let outcome = session
        .complete_route(&query, Some(Ok(remote_abcd(Some(3.0)))))
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Remote);
    assert_eq!(session.status().phase, Phase::Found);
}

#[test]
fn remote_answer_for_older_revision_is_discarded() {
    let mut session = session();
    let query = session.begin_route("A", "D").unwrap();

    // A-C-D now beats the A-B-C-D answer the remote is about to give
    session.add_edge(&stop("A"), &stop("C"), Some(0.5)).unwrap();

    let outcome = session
        .complete_route(&query, Some(Ok(remote_abcd(Some(3.0)))))
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.result.path, stops(&["A", "C", "D"]));
    assert!(outcome.fallback_reason.unwrap().contains("graph changed"));
}

#[test]
fn complete_route_rejects_stops_removed_meanwhile() {
    let mut session = session();
    let query = session.begin_route("A", "D").unwrap();

    session.load_network(&RawNetwork::from_json_str(r#"{"nodes": ["A", "B"]}"#).unwrap());

    assert_eq!(
        session.complete_route(&query, None),
        Err(QueryError::UnknownStop(stop("D")))
    );
    assert_eq!(session.status().phase, Phase::Error);
}

#[tokio::test]
async fn unreachable_remote_client_falls_back() {
    let mut session = session();
    let client =
        RemoteClient::new(RemoteConfig::new("http://127.0.0.1:9").with_timeout(2)).unwrap();

    let outcome = session
        .compute_route("A", "D", Some(&client))
        .await
        .unwrap();
    assert_eq!(outcome.source, RouteSource::Local);
    assert_eq!(outcome.result.distance, Some(3.0));
}

#[tokio::test]
async fn cached_remote_is_keyed_by_revision() {
    let mut session = session();
    let mock = MockPathService::new().with_route(stop("A"), stop("D"), remote_abcd(Some(3.0)));
    let cached = CachedPathClient::new(mock, &CacheConfig::default());

    session.compute_route("A", "D", Some(&cached)).await.unwrap();
    session.compute_route("A", "D", Some(&cached)).await.unwrap();
    assert_eq!(cached.client().call_count(), 1);

    session.move_stop(&stop("B"), 0.001, 0.01).unwrap();
    session.compute_route("A", "D", Some(&cached)).await.unwrap();
    assert_eq!(cached.client().call_count(), 2);
}

#[test]
fn mutations_clear_last_result() {
    let mut session = session();
    let rev = session.revision();

    session.compute_local("A", "D").unwrap();
    assert!(session.last_result().is_some());

    session.move_stop(&stop("A"), 0.5, 0.5).unwrap();
    assert!(session.last_result().is_none());
    assert_eq!(session.status().phase, Phase::Idle);
    assert_eq!(session.revision(), rev + 1);

    session.compute_local("A", "D").unwrap();
    session.reset_stop_positions();
    assert!(session.last_result().is_none());
    assert_eq!(session.revision(), rev + 2);
}

#[test]
fn move_stop_errors() {
    let mut session = session();
    assert!(matches!(
        session.move_stop(&stop("Z"), 0.0, 0.0),
        Err(SessionError::UnknownStop(_))
    ));
    assert!(matches!(
        session.move_stop(&stop("A"), 91.0, 0.0),
        Err(SessionError::InvalidCoordinate { .. })
    ));
    assert!(matches!(
        session.move_stop(&stop("A"), f64::NAN, 0.0),
        Err(SessionError::InvalidCoordinate { .. })
    ));
}

#[test]
fn reset_and_commit_positions() {
    let mut session = session();
    let original = session.graph().stop(&stop("A")).unwrap().coord;

    session.move_stop(&stop("A"), 1.0, 1.0).unwrap();
    assert_eq!(session.reset_stop_positions(), 4);
    assert_eq!(session.graph().stop(&stop("A")).unwrap().coord, original);

    session.move_stop(&stop("A"), 1.0, 1.0).unwrap();
    session.commit_stop_positions();
    session.move_stop(&stop("A"), 2.0, 2.0).unwrap();
    session.reset_stop_positions();
    assert_eq!(
        session.graph().stop(&stop("A")).unwrap().coord,
        Coord::new(1.0, 1.0)
    );
}

#[test]
fn explicit_weights_survive_moves() {
    let mut session = session();
    session.move_stop(&stop("B"), 10.0, 10.0).unwrap();
    let outcome = session.compute_local("A", "D").unwrap();
    assert_eq!(outcome.result.distance, Some(3.0));
}

#[test]
fn add_edge_changes_route() {
    let mut session = session();
    assert!(session.add_edge(&stop("A"), &stop("C"), Some(0.5)).unwrap());
    assert!(!session.add_edge(&stop("C"), &stop("A"), Some(0.1)).unwrap());

    let outcome = session.compute_local("A", "D").unwrap();
    assert_eq!(outcome.result.path, stops(&["A", "C", "D"]));
    assert_eq!(outcome.result.distance, Some(1.5));

    assert!(matches!(
        session.add_edge(&stop("A"), &stop("Z"), None),
        Err(SessionError::UnknownStop(_))
    ));
    assert!(matches!(
        session.add_edge(&stop("B"), &stop("D"), Some(-1.0)),
        Err(SessionError::InvalidWeight(_))
    ));
}

#[test]
fn connect_nearby_links_close_stops() {
    // Stops ~1.1 km apart: nothing at the default 0.8 km, all neighbours at 1.2 km
    let network = RawNetwork::from_json_str(
        r#"{"nodes": [
            {"name": "A", "lat": 0.0, "lng": 0.00},
            {"name": "B", "lat": 0.0, "lng": 0.01},
            {"name": "C", "lat": 0.0, "lng": 0.02}
        ]}"#,
    )
    .unwrap();
    let mut session = Session::with_network(SessionConfig::default(), &network);

    assert_eq!(session.connect_nearby(None), 0);
    assert_eq!(session.connect_nearby(Some(1.2)), 2);
    assert_eq!(session.graph().edge_count(), 2);

    let outcome = session.compute_local("A", "C").unwrap();
    assert_eq!(outcome.result.path, stops(&["A", "B", "C"]));
}

#[tokio::test]
async fn refresh_from_graph_service() {
    let mut session = Session::new(SessionConfig::default());
    assert!(session.graph().is_empty());

    let service = MockPathService::new().with_network(square_network());
    session.refresh_from(&service).await.unwrap();
    assert_eq!(session.graph().len(), 4);

    let rev = session.revision();
    let failing = MockPathService::unavailable();
    assert!(session.refresh_from(&failing).await.is_err());
    assert_eq!(session.graph().len(), 4);
    assert_eq!(session.revision(), rev);
    assert_eq!(session.status().phase, Phase::Error);
}

#[test]
fn outcome_wire_format() {
    let mut session = session();
    let outcome = session.compute_local("A", "D").unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["path"][3], "D");
    assert_eq!(json["settledOrder"][0], "A");
    assert_eq!(json["distance"], 3.0);
    assert_eq!(json["source"], "local");
    assert_eq!(json["segments"].as_array().map(|s| s.len()), Some(3));
    assert!(json["fallbackReason"].is_null());
}
