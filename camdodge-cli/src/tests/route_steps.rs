//! Behaviour-driven step definitions driving the route CLI scenarios.

use super::helpers::{END, START, detour_path, direct_path, midtown_camera};
use super::*;
use crate::route::{RouteConfig, run_route_with};
use camdodge_core::test_support::{StaticCameraSource, StubDirectionsProvider};
use camdodge_core::{Camera, CombinedRouteResponse, GeocodeError, RoutePlanner};
use camdodge_data::test_support::StubGeocoder;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Scenario state for one `camdodge route` invocation.
#[derive(Default)]
struct RouteWorld {
    cameras: RefCell<Vec<Camera>>,
    arguments: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
    directions_queries: RefCell<Vec<(geo::Coord<f64>, geo::Coord<f64>)>>,
}

impl RouteWorld {
    fn set_endpoints(&self, endpoints: &[&str]) {
        let mut arguments = vec![
            "camdodge".to_owned(),
            "route".to_owned(),
            "--ors-api-key".to_owned(),
            "secret".to_owned(),
        ];
        arguments.extend(endpoints.iter().map(|part| (*part).to_owned()));
        self.arguments.replace(arguments);
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected failure")
        })
    }
}

#[fixture]
fn world() -> RouteWorld {
    RouteWorld::default()
}

fn geocoder() -> StubGeocoder {
    StubGeocoder::default()
        .with_place("Herald Square", START)
        .with_place("Grand Central", END)
}

#[given("a camera beside the direct path through midtown")]
fn camera_on_path(#[from(world)] world: &RouteWorld) {
    world.cameras.replace(vec![midtown_camera()]);
}

#[given("the route runs between two coordinate pairs")]
fn coordinate_endpoints(#[from(world)] world: &RouteWorld) {
    world.set_endpoints(&["--from", "-73.98,40.75", "--to", "-73.97,40.76"]);
}

#[given("the route runs between two named places")]
fn named_endpoints(#[from(world)] world: &RouteWorld) {
    world.set_endpoints(&["--from", "Herald Square", "--to", "Grand Central"]);
}

#[given("the route ends at an unknown place")]
fn unknown_destination(#[from(world)] world: &RouteWorld) {
    world.set_endpoints(&["--from", "Herald Square", "--to", "Atlantis"]);
}

#[given("the command line omits the destination")]
fn missing_destination(#[from(world)] world: &RouteWorld) {
    world.set_endpoints(&["--from", "Herald Square"]);
}

#[when("I run the route command")]
fn run_route_command(#[from(world)] world: &RouteWorld) {
    let planner = RoutePlanner::new(
        StubDirectionsProvider::with_paths(&detour_path(), &direct_path()),
        StaticCameraSource::new(world.cameras.borrow().clone()),
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime should build");
    let parsed = Cli::try_parse_from(world.arguments.borrow().iter()).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Route(args) => {
            let config = RouteConfig::try_from(args)?;
            let mut buffer = world.stdout.borrow_mut();
            runtime.block_on(run_route_with(
                &config.from,
                &config.to,
                &geocoder(),
                &planner,
                &mut *buffer,
            ))
        }
        other => panic!("expected route command, found {other:?}"),
    });
    world.result.replace(Some(outcome));
    world.directions_queries.replace(
        planner
            .provider()
            .recorded()
            .into_iter()
            .map(|query| (query.origin, query.destination))
            .collect(),
    );
}

#[then("the command prints the planned route as JSON")]
fn prints_json(#[from(world)] world: &RouteWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let response: CombinedRouteResponse =
        serde_json::from_str(&stdout).expect("output should be a JSON route response");
    assert_eq!(response.route, detour_path());
    assert_eq!(response.direct_route, direct_path());
}

#[then("the midtown camera is listed near the direct route")]
fn camera_listed(#[from(world)] world: &RouteWorld) {
    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let response: CombinedRouteResponse =
        serde_json::from_str(&stdout).expect("output should be a JSON route response");
    assert_eq!(response.cameras_near_direct_route, vec!["midtown".to_owned()]);
}

#[then("both directions calls use the geocoded endpoints")]
fn geocoded_endpoints(#[from(world)] world: &RouteWorld) {
    let queries = world.directions_queries.borrow();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|endpoints| *endpoints == (START, END)));
}

#[then("the command fails to resolve the destination")]
fn geocode_failure(#[from(world)] world: &RouteWorld) {
    match &*world.error() {
        CliError::Geocode { field, source } => {
            assert_eq!(*field, ARG_TO);
            assert!(matches!(source, GeocodeError::NotFound { .. }));
        }
        other => panic!("expected Geocode, found {other:?}"),
    }
}

#[then("no directions calls are made")]
fn no_directions_calls(#[from(world)] world: &RouteWorld) {
    assert!(world.directions_queries.borrow().is_empty());
    assert!(world.stdout.borrow().is_empty());
}

#[then("the command fails because the destination is missing")]
fn missing_destination_failure(#[from(world)] world: &RouteWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_TO);
            assert_eq!(*env, ENV_ROUTE_TO);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_route_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/route_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RouteWorld) {
            let _ = world;
        }
    };
}

register_route_scenario!(route_between_coordinates, "planning between two coordinate pairs");
register_route_scenario!(route_between_named_places, "geocoding named places");
register_route_scenario!(route_unknown_place, "rejecting an unknown place");
register_route_scenario!(route_missing_destination, "rejecting a missing destination");
