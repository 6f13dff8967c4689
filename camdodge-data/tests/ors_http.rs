//! HTTP-level tests for the OpenRouteService clients.
//!
//! A small axum server stands in for OpenRouteService so the real `reqwest`
//! code paths run end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use camdodge_core::test_support::StaticCameraSource;
use camdodge_core::{
    Camera, DirectionsError, DirectionsProvider, DirectionsQuery, GeocodeError, Geocoder,
    PlanError, RoutePlanner, RouteRequest, RouteSummary,
};
use camdodge_data::ors::{OrsConfig, OrsDirectionsProvider, OrsGeocoder};
use camdodge_data::test_support::{ors_directions_body, ors_error_body};
use geo::Coord;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

/// What the fake service saw: `(profile, authorization, body)` per call.
type Calls = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

#[derive(Clone, Copy)]
enum Behaviour {
    Route,
    RejectAvoiding,
    Slow,
}

#[derive(Clone)]
struct FakeOrs {
    calls: Calls,
    behaviour: Behaviour,
}

fn direct_path() -> Vec<Coord<f64>> {
    vec![
        Coord { x: -73.98, y: 40.75 },
        Coord { x: -73.975, y: 40.755 },
        Coord { x: -73.97, y: 40.76 },
    ]
}

fn detour_path() -> Vec<Coord<f64>> {
    vec![
        Coord { x: -73.98, y: 40.75 },
        Coord { x: -73.985, y: 40.758 },
        Coord { x: -73.97, y: 40.76 },
    ]
}

async fn directions(
    State(fake): State<FakeOrs>,
    Path(profile): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let avoiding = body.get("options").is_some();
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    fake.calls
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push((profile, authorization, body));
    match fake.behaviour {
        Behaviour::Slow => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({})).into_response()
        }
        Behaviour::RejectAvoiding if avoiding => (
            StatusCode::BAD_REQUEST,
            Json(ors_error_body(2003, "Parameter 'avoid_polygons' has incorrect value")),
        )
            .into_response(),
        Behaviour::Route | Behaviour::RejectAvoiding => {
            let path = if avoiding { detour_path() } else { direct_path() };
            let steps: &[(&str, f64, f64)] = if avoiding {
                &[("Head west on West 34th Street", 400.0, 290.0)]
            } else {
                &[]
            };
            let summary = RouteSummary {
                distance: if avoiding { 1_850.0 } else { 1_390.0 },
                duration: if avoiding { 1_330.0 } else { 1_000.0 },
            };
            Json(ors_directions_body(&path, summary, steps)).into_response()
        }
    }
}

async fn geocode(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let found = params.get("api_key").map(String::as_str) == Some("secret")
        && params.get("size").map(String::as_str) == Some("1")
        && params.get("text").map(String::as_str) == Some("Empire State Building");
    let features = if found {
        json!([{"type": "Feature", "geometry": {"type": "Point", "coordinates": [-73.9857, 40.7484]}}])
    } else {
        json!([])
    };
    Json(json!({"type": "FeatureCollection", "features": features}))
}

async fn serve(behaviour: Behaviour) -> (String, Calls) {
    let calls = Calls::default();
    let router = Router::new()
        .route("/v2/directions/:profile", post(directions))
        .route("/geocode/search", get(geocode))
        .with_state(FakeOrs {
            calls: Arc::clone(&calls),
            behaviour,
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake service");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake service");
    });
    (format!("http://{addr}"), calls)
}

fn provider_for(base_url: &str, timeout: Duration) -> OrsDirectionsProvider {
    OrsDirectionsProvider::with_config(
        OrsConfig::new("secret")
            .with_base_url(base_url)
            .with_timeout(timeout),
    )
    .expect("provider should build")
}

#[fixture]
fn request() -> RouteRequest {
    RouteRequest::new(Coord { x: -73.98, y: 40.75 }, Coord { x: -73.97, y: 40.76 })
}

#[rstest]
#[tokio::test]
async fn posts_coordinates_with_api_key(request: RouteRequest) {
    let (base_url, calls) = serve(Behaviour::Route).await;
    let provider = provider_for(&base_url, Duration::from_secs(5));

    let response = provider
        .directions(&DirectionsQuery::direct(&request))
        .await
        .expect("directions should succeed");

    assert_eq!(response.summary.distance, 1_390.0);
    assert!(response.geometry.is_some());
    let recorded = calls.lock().unwrap_or_else(PoisonError::into_inner).clone();
    assert_eq!(recorded.len(), 1);
    let (profile, authorization, body) = recorded.first().expect("one call");
    assert_eq!(profile, "foot-walking");
    assert_eq!(authorization.as_deref(), Some("secret"));
    assert_eq!(body.get("coordinates"), Some(&json!([[-73.98, 40.75], [-73.97, 40.76]])));
    assert_eq!(body.get("geometry"), Some(&json!(true)));
    assert_eq!(body.get("instructions"), Some(&json!(false)));
}

#[rstest]
#[tokio::test]
async fn error_payload_is_preserved(request: RouteRequest) {
    let (base_url, _calls) = serve(Behaviour::RejectAvoiding).await;
    let provider = provider_for(&base_url, Duration::from_secs(5));
    let query = DirectionsQuery::avoiding(&request, geo::MultiPolygon::new(Vec::new()));

    let err = provider.directions(&query).await.expect_err("should fail");

    match err {
        DirectionsError::Http { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body.pointer("/error/code"), Some(&json!(2003)));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn slow_service_times_out(request: RouteRequest) {
    let (base_url, _calls) = serve(Behaviour::Slow).await;
    let provider = provider_for(&base_url, Duration::from_millis(200));

    let err = provider
        .directions(&DirectionsQuery::direct(&request))
        .await
        .expect_err("should time out");

    assert!(
        matches!(err, DirectionsError::Timeout { .. }),
        "expected Timeout, got {err:?}"
    );
}

#[rstest]
#[tokio::test]
async fn unreachable_service_is_a_network_error(request: RouteRequest) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    let provider = provider_for(&format!("http://{addr}"), Duration::from_secs(5));

    let err = provider
        .directions(&DirectionsQuery::direct(&request))
        .await
        .expect_err("should fail");

    assert!(
        matches!(err, DirectionsError::Network { .. }),
        "expected Network, got {err:?}"
    );
}

#[rstest]
#[tokio::test]
async fn planner_routes_around_cameras_over_http(request: RouteRequest) {
    let (base_url, calls) = serve(Behaviour::Route).await;
    let cameras = vec![Camera::new("midtown", Coord { x: -73.975, y: 40.755 }, "traffic")];
    let planner = RoutePlanner::new(
        provider_for(&base_url, Duration::from_secs(5)),
        StaticCameraSource::new(cameras),
    );

    let response = planner.plan(&request).await.expect("plan should succeed");

    assert_eq!(response.route, detour_path());
    assert_eq!(response.direct_route, direct_path());
    assert_eq!(response.cameras_near_direct_route, vec!["midtown".to_owned()]);
    assert_eq!(response.directions.distance, 1_850.0);
    assert_eq!(
        response.directions.steps.first().map(|step| step.instruction.as_str()),
        Some("Head west on West 34th Street")
    );
    assert_eq!(response.metadata.direct.get("service"), Some(&json!("routing")));
    let recorded = calls.lock().unwrap_or_else(PoisonError::into_inner).clone();
    let avoiding = recorded
        .iter()
        .find(|(_, _, body)| body.get("options").is_some())
        .expect("an avoiding call");
    assert_eq!(
        avoiding.2.pointer("/options/avoid_polygons/type"),
        Some(&json!("MultiPolygon"))
    );
}

#[rstest]
#[tokio::test]
async fn planner_reports_both_attempts_when_one_fails(request: RouteRequest) {
    let (base_url, _calls) = serve(Behaviour::RejectAvoiding).await;
    let planner = RoutePlanner::new(
        provider_for(&base_url, Duration::from_secs(5)),
        StaticCameraSource::new(Vec::new()),
    );

    let err = planner.plan(&request).await.expect_err("plan should fail");

    match err {
        PlanError::Upstream { failures, details } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(details.len(), 2);
            let avoiding = details.first().expect("avoiding details");
            assert_eq!(avoiding.pointer("/error/code"), Some(&json!(2003)));
            let direct = details.get(1).expect("direct details");
            assert!(direct.get("routes").is_some());
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn geocoder_returns_first_feature() {
    let (base_url, _calls) = serve(Behaviour::Route).await;
    let geocoder =
        OrsGeocoder::with_config(OrsConfig::new("secret").with_base_url(base_url.as_str()))
            .expect("geocoder should build");

    let found = geocoder
        .geocode("Empire State Building")
        .await
        .expect("should resolve");

    assert_eq!(found, Coord { x: -73.9857, y: 40.7484 });
}

#[rstest]
#[tokio::test]
async fn geocoder_reports_missing_places() {
    let (base_url, _calls) = serve(Behaviour::Route).await;
    let geocoder =
        OrsGeocoder::with_config(OrsConfig::new("secret").with_base_url(base_url.as_str()))
            .expect("geocoder should build");

    let err = geocoder.geocode("Atlantis").await.expect_err("should fail");

    assert_eq!(
        err,
        GeocodeError::NotFound {
            query: "Atlantis".to_owned()
        }
    );
}
