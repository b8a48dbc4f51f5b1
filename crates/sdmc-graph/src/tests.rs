//! Unit tests for sdmc-graph.
//!
//! Fixtures are tiny hand-built worlds on the x axis so expected vertex ids,
//! times and costs can be worked out by hand.

#[cfg(test)]
mod helpers {
    use sdmc_core::{CarObservation, DroneId, EpisodeConfig, EpochInfo, Point, RouteWaypoint, WaypointId};

    use crate::{Drone, GraphSolution};

    pub fn wp(id: u32, x: f64, t: f64) -> RouteWaypoint {
        RouteWaypoint::new(WaypointId(id), Point::new(x, 0.0), t)
    }

    /// Car "a": waypoints 1..=4 at x = 1..=4, one second apart, shifted by `delay`.
    pub fn route_a(delay: f64) -> Vec<RouteWaypoint> {
        (1..=4).map(|i| wp(i, i as f64, i as f64 + delay)).collect()
    }

    pub fn epoch(time: f64, a: Option<Vec<RouteWaypoint>>) -> EpochInfo {
        let obs = match a {
            Some(route) => CarObservation::active(Point::new(1.0, 0.0), route),
            None => CarObservation::inactive(Point::new(1.0, 0.0)),
        };
        EpochInfo::new(time).with_car("a", obs)
    }

    pub fn drone() -> Drone {
        Drone::new(DroneId(0), 2.0, 100.0, 1_000.0)
    }

    pub fn config() -> EpisodeConfig {
        EpisodeConfig { time_drift_threshold: 0.5, ..EpisodeConfig::default() }
    }

    /// Start (0,0) at t=0, goal (10,0) unbounded, car "a" on vertices 2..=5.
    pub fn graph() -> GraphSolution {
        GraphSolution::initialize(
            drone(),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &epoch(0.0, Some(route_a(0.0))),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .expect("fixture graph")
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use sdmc_core::{CarId, CarObservation, EpochInfo, Point, VertexId, WaypointId};

    use super::helpers::*;
    use crate::{GraphError, GraphSolution, RouteRange};

    fn car_a() -> CarId {
        CarId::from("a")
    }

    #[test]
    fn initialize_lays_out_start_goal_then_routes() {
        let g = graph();
        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.next_start(), VertexId(0));
        assert_eq!(g.goal(), VertexId(1));
        assert!(g.vertex(g.goal()).unwrap().time.is_infinite());

        let car = g.car(&car_a()).unwrap();
        assert!(car.active);
        assert_eq!(car.route, Some(RouteRange { first: VertexId(2), last: VertexId(5) }));
        assert_eq!(car.next_waypoint, Some(WaypointId(1)));
        assert_eq!(g.waypoint_vertex(&car_a(), WaypointId(3)), Some(VertexId(4)));
        assert!((g.max_car_speed() - 1.0).abs() < 1e-12);
        g.validate().unwrap();
    }

    #[test]
    fn waypoints_are_ordered_by_id() {
        let mut route = route_a(0.0);
        route.reverse();
        let g = GraphSolution::initialize(
            drone(),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &epoch(0.0, Some(route)),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap();
        let waypoints: Vec<_> = (2..6).map(|i| g.vertex(VertexId(i)).unwrap().waypoint.unwrap().0).collect();
        assert_eq!(waypoints, vec![1, 2, 3, 4]);
    }

    #[test]
    fn routeless_car_in_first_epoch_is_inactive() {
        let first = epoch(0.0, Some(route_a(0.0))).with_car("b", CarObservation::inactive(Point::ORIGIN));
        let g = GraphSolution::initialize(
            drone(),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &first,
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap();
        let b = g.car(&CarId::from("b")).unwrap();
        assert!(!b.active);
        assert_eq!(b.route, None);
        assert_eq!(g.vertex_count(), 6);
    }

    #[test]
    fn duplicate_waypoint_is_rejected() {
        let mut route = route_a(0.0);
        route.push(wp(2, 2.5, 2.5));
        let err = GraphSolution::initialize(
            drone(),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &epoch(0.0, Some(route)),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateWaypoint { waypoint: WaypointId(2), .. }));
    }

    #[test]
    fn decreasing_route_times_are_rejected() {
        let route = vec![wp(1, 1.0, 5.0), wp(2, 2.0, 4.0)];
        let err = GraphSolution::initialize(
            drone(),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &epoch(0.0, Some(route)),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::NonMonotonicRoute { .. }));
    }

    #[test]
    fn identical_epoch_is_idempotent() {
        let mut g = graph();
        let delta = g.absorb_epoch(&epoch(1.0, Some(route_a(0.0)))).unwrap();
        assert!(delta.is_unchanged());
        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.current_time(), 1.0);
    }

    #[test]
    fn known_car_times_update_in_place() {
        let mut g = graph();
        let delta = g.absorb_epoch(&epoch(1.0, Some(route_a(2.0)))).unwrap();
        assert_eq!(delta.times_updated, 4);
        assert_eq!(delta.vertices_added, 0);
        assert_eq!(g.vertex_count(), 6);

        let v = g.vertex(VertexId(3)).unwrap();
        assert_eq!(v.time, 4.0);
        g.validate().unwrap();
    }

    #[test]
    fn range_advances_when_next_waypoint_changes() {
        let mut g = graph();
        let route = route_a(0.0).split_off(1);
        let delta = g.absorb_epoch(&epoch(1.5, Some(route))).unwrap();
        assert_eq!(delta.advanced, 1);

        let car = g.car(&car_a()).unwrap();
        assert_eq!(car.route, Some(RouteRange { first: VertexId(3), last: VertexId(5) }));
        assert_eq!(car.next_waypoint, Some(WaypointId(2)));
    }

    #[test]
    fn moving_backwards_is_an_error() {
        let mut g = graph();
        g.absorb_epoch(&epoch(1.5, Some(route_a(0.0).split_off(1)))).unwrap();
        let err = g.absorb_epoch(&epoch(2.0, Some(route_a(0.0)))).unwrap_err();
        assert!(matches!(err, GraphError::RouteRegressed { from: VertexId(3), to: VertexId(2), .. }));
    }

    #[test]
    fn unknown_waypoint_is_an_error() {
        let mut g = graph();
        let mut route = route_a(0.0);
        route.push(wp(9, 9.0, 9.0));
        let err = g.absorb_epoch(&epoch(1.0, Some(route))).unwrap_err();
        assert!(matches!(err, GraphError::UnknownWaypoint { waypoint: WaypointId(9), .. }));
        // Nothing was revised for the rejected car.
        assert_eq!(g.vertex(VertexId(2)).unwrap().time, 1.0);
    }

    #[test]
    fn unreported_tail_stays_ordered_in_time() {
        let mut g = graph();
        let route = vec![wp(1, 1.0, 1.0), wp(2, 2.0, 10.0)];
        g.absorb_epoch(&epoch(1.0, Some(route))).unwrap();
        assert_eq!(g.vertex(VertexId(4)).unwrap().time, 10.0);
        assert_eq!(g.vertex(VertexId(5)).unwrap().time, 10.0);
        g.validate().unwrap();
    }

    #[test]
    fn deactivated_car_stays_frozen() {
        let mut g = graph();
        let delta = g.absorb_epoch(&epoch(1.0, None)).unwrap();
        assert_eq!(delta.deactivated, 1);
        let frozen = g.car(&car_a()).unwrap().route;
        assert!(!g.car(&car_a()).unwrap().active);

        for t in 2..5 {
            let route = vec![wp(1, 1.0, t as f64), wp(7, 7.0, 7.0 + t as f64)];
            let delta = g.absorb_epoch(&epoch(t as f64, Some(route))).unwrap();
            assert!(delta.is_unchanged());
            let car = g.car(&car_a()).unwrap();
            assert!(!car.active);
            assert_eq!(car.route, frozen);
        }
        assert_eq!(g.vertex_count(), 6);
        // Stale vertices stay in the arena.
        assert_eq!(g.vertex(VertexId(2)).unwrap().car.as_ref(), Some(&car_a()));
    }

    #[test]
    fn missing_car_is_left_alone() {
        let mut g = graph();
        let delta = g.absorb_epoch(&EpochInfo::new(1.0)).unwrap();
        assert!(delta.is_unchanged());
        assert!(g.car(&car_a()).unwrap().active);
    }

    #[test]
    fn new_and_late_cars_append_vertices() {
        let mut g = graph();
        let e = epoch(1.0, Some(route_a(0.0)))
            .with_car("b", CarObservation::inactive(Point::ORIGIN))
            .with_car("c", CarObservation::active(Point::ORIGIN, vec![wp(1, 0.0, 5.0), wp(2, 0.0, 6.0)]));
        let delta = g.absorb_epoch(&e).unwrap();
        assert_eq!(delta.vertices_added, 2);
        assert_eq!(delta.activated, 1);
        assert!(!g.car(&CarId::from("b")).unwrap().active);

        let e = epoch(2.0, Some(route_a(0.0)))
            .with_car("b", CarObservation::active(Point::ORIGIN, vec![wp(3, 3.0, 8.0)]));
        let delta = g.absorb_epoch(&e).unwrap();
        assert_eq!(delta.activated, 1);
        let b = g.car(&CarId::from("b")).unwrap();
        assert!(b.active);
        assert_eq!(b.route, Some(RouteRange { first: VertexId(8), last: VertexId(8) }));
        g.validate().unwrap();
    }

    #[test]
    fn vertex_ids_are_strictly_increasing() {
        let mut g = graph();
        let mut issued = Vec::new();
        for t in 1..6 {
            let id = format!("car{t}");
            let e = epoch(t as f64, Some(route_a(0.0)))
                .with_car(id.as_str(), CarObservation::active(Point::ORIGIN, vec![wp(1, 0.0, 10.0), wp(2, 1.0, 11.0)]));
            g.absorb_epoch(&e).unwrap();
            issued.push(g.add_drone_vertex(Point::new(t as f64, 1.0), t as f64));
            issued.push(g.set_next_start(Point::new(t as f64, 2.0), t as f64));
            g.validate().unwrap();
        }
        assert!(issued.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(g.next_start(), *issued.last().unwrap());
        let ids: Vec<_> = g.vertices().iter().map(|v| v.id.index()).collect();
        assert_eq!(ids, (0..g.vertex_count()).collect::<Vec<_>>());
    }

    #[test]
    fn next_start_vertex_must_exist() {
        let mut g = graph();
        g.set_next_start_vertex(VertexId(3)).unwrap();
        assert_eq!(g.next_start(), VertexId(3));
        let err = g.set_next_start_vertex(VertexId(99)).unwrap_err();
        assert!(matches!(err, GraphError::UnknownVertex(VertexId(99))));
        assert_eq!(g.next_start(), VertexId(3));
    }
}

// ── Edge costs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cost {
    use std::cell::Cell;

    use sdmc_core::{Point, VertexId};

    use super::helpers::*;
    use crate::{Drone, EdgeKind, FlightCost, NominalFlightCost, Vertex};

    #[test]
    fn edges_are_classified_by_endpoints() {
        let mut g = graph();
        let aux = g.add_drone_vertex(Point::new(0.0, 5.0), 1.0);
        assert_eq!(g.edge_kind(VertexId(2), VertexId(3)).unwrap(), EdgeKind::Coast);
        assert_eq!(g.edge_kind(VertexId(3), VertexId(2)).unwrap(), EdgeKind::CachedFlight);
        assert_eq!(g.edge_kind(VertexId(0), VertexId(4)).unwrap(), EdgeKind::CachedFlight);
        assert_eq!(g.edge_kind(VertexId(0), VertexId(1)).unwrap(), EdgeKind::CachedFlight);
        assert_eq!(g.edge_kind(VertexId(0), aux).unwrap(), EdgeKind::NominalFlight);
        assert!(g.edge_kind(VertexId(0), VertexId(42)).is_err());
    }

    #[test]
    fn coast_cost_tracks_schedule_immediately() {
        let mut g = graph();
        let nominal = NominalFlightCost::new(*g.weights());
        assert_eq!(g.edge_cost(VertexId(2), VertexId(4), &nominal).unwrap(), 2.0);

        // Delay waypoints 3 and 4; coast costs are never cached.
        let mut route = route_a(0.0);
        route[2].time += 0.25;
        route[3].time += 0.25;
        g.absorb_epoch(&epoch(1.0, Some(route))).unwrap();
        let c = g.edge_cost(VertexId(2), VertexId(4), &nominal).unwrap();
        assert!((c - 2.25).abs() < 1e-12);
        assert!(g.cache().is_empty());
    }

    #[test]
    fn nominal_flight_cost_includes_hover_time() {
        let g = graph();
        let nominal = NominalFlightCost::new(*g.weights());
        let (start, wp2, goal) = (
            g.vertex(VertexId(0)).unwrap(),
            g.vertex(VertexId(3)).unwrap(),
            g.vertex(VertexId(1)).unwrap(),
        );
        // 2 m at 2 m/s = 1 s, then hover until t = 2.
        let c = nominal.flight_cost(start, wp2, g.drone());
        assert!((c - (2.0 + 0.1 * 2.0)).abs() < 1e-12);
        // Unbounded goal: pure flight time.
        let c = nominal.flight_cost(start, goal, g.drone());
        assert!((c - (5.0 + 0.1 * 10.0)).abs() < 1e-12);
    }

    #[test]
    fn uncommitted_flights_are_not_cached() {
        let mut g = graph();
        let aux = g.add_drone_vertex(Point::new(0.0, 4.0), 0.0);
        let calls = Cell::new(0);
        let flight = |_: &Vertex, _: &Vertex, _: &Drone| {
            calls.set(calls.get() + 1);
            1.0
        };
        let c = g.edge_cost(VertexId(0), aux, &flight).unwrap();
        assert!((c - (2.0 + 0.1 * 4.0)).abs() < 1e-12);
        assert_eq!(calls.get(), 0);
        assert!(g.cache().is_empty());
    }

    #[test]
    fn cached_flight_is_computed_once() {
        let mut g = graph();
        let calls = Cell::new(0);
        let flight = |_: &Vertex, _: &Vertex, _: &Drone| {
            calls.set(calls.get() + 1);
            7.0
        };
        assert_eq!(g.edge_cost(VertexId(0), VertexId(4), &flight).unwrap(), 7.0);
        assert_eq!(g.edge_cost(VertexId(0), VertexId(4), &flight).unwrap(), 7.0);
        assert_eq!(calls.get(), 1);

        // Direction matters.
        g.edge_cost(VertexId(4), VertexId(0), &flight).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(g.cache().len(), 2);

        let stats = g.cache().stats();
        assert_eq!((stats.hits, stats.misses, stats.recomputes), (1, 2, 0));
    }

    #[test]
    fn identical_epoch_keeps_cached_costs() {
        let mut g = graph();
        let calls = Cell::new(0);
        let flight = |_: &Vertex, _: &Vertex, _: &Drone| {
            calls.set(calls.get() + 1);
            3.0
        };
        g.edge_cost(VertexId(0), VertexId(3), &flight).unwrap();
        let before = *g.cache().get(VertexId(0), VertexId(3)).unwrap();

        g.absorb_epoch(&epoch(1.0, Some(route_a(0.0)))).unwrap();
        assert_eq!(g.cache().get(VertexId(0), VertexId(3)), Some(&before));
        g.edge_cost(VertexId(0), VertexId(3), &flight).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn small_drift_hits_large_drift_recomputes() {
        let mut g = graph();
        let calls = Cell::new(0);
        let flight = |_: &Vertex, to: &Vertex, _: &Drone| {
            calls.set(calls.get() + 1);
            to.time
        };
        assert_eq!(g.edge_cost(VertexId(0), VertexId(3), &flight).unwrap(), 2.0);

        // Within the 0.5 s threshold: stale value is served.
        g.absorb_epoch(&epoch(1.0, Some(route_a(0.3)))).unwrap();
        assert_eq!(g.edge_cost(VertexId(0), VertexId(3), &flight).unwrap(), 2.0);
        assert_eq!(calls.get(), 1);

        // Beyond it (measured from the write, not the last revision).
        g.absorb_epoch(&epoch(2.0, Some(route_a(0.6)))).unwrap();
        let c = g.edge_cost(VertexId(0), VertexId(3), &flight).unwrap();
        assert!((c - 2.6).abs() < 1e-12);
        assert_eq!(calls.get(), 2);

        let entry = g.cache().get(VertexId(0), VertexId(3)).unwrap();
        assert_eq!(entry.to_time, c);
        assert_eq!(g.cache().stats().recomputes, 1);
    }

    #[test]
    fn unbounded_goal_never_drifts() {
        let mut g = graph();
        let calls = Cell::new(0);
        let flight = |_: &Vertex, _: &Vertex, _: &Drone| {
            calls.set(calls.get() + 1);
            1.0
        };
        g.edge_cost(VertexId(5), VertexId(1), &flight).unwrap();
        g.edge_cost(VertexId(5), VertexId(1), &flight).unwrap();
        assert_eq!(calls.get(), 1);
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use std::cell::Cell;

    use sdmc_core::{DroneId, EpochInfo, Point, RouteWaypoint, VertexId, WaypointId};

    use super::helpers::*;
    use crate::{Drone, FlightCost, GraphSolution, NominalFlightCost, PlanOutcome, Planner, Vertex};

    /// Slow short-range drone; the only way to the goal at x = 10 is to
    /// ride car "a" from x = 1 to x = 9.
    fn ride_world(first_time: f64) -> GraphSolution {
        let route = vec![wp(1, 1.0, first_time), wp(2, 5.0, first_time + 1.0), wp(3, 9.0, first_time + 2.0)];
        GraphSolution::initialize(
            Drone::new(DroneId(0), 1.0, 2.5, 100.0),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &epoch(0.0, Some(route)),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap()
    }

    fn nominal(g: &GraphSolution) -> NominalFlightCost {
        NominalFlightCost::new(*g.weights())
    }

    #[test]
    fn direct_flight_without_cars() {
        let mut g = GraphSolution::initialize(
            drone(),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &EpochInfo::new(0.0),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap();
        let flight = nominal(&g);
        let plan = Planner::new().plan(&mut g, &flight).unwrap();
        let PlanOutcome::Found { path, cost } = plan else { panic!("expected a path") };
        assert_eq!(path, vec![VertexId(0), VertexId(1)]);
        assert!((cost - 6.0).abs() < 1e-12);
        assert_eq!(g.best_path(), &[VertexId(0), VertexId(1)]);
        assert_eq!(g.next_hop(), Some(VertexId(1)));
    }

    #[test]
    fn rides_a_car_when_the_goal_is_out_of_range() {
        let mut g = ride_world(2.0);
        let flight = nominal(&g);
        let plan = Planner::new().plan(&mut g, &flight).unwrap();
        let PlanOutcome::Found { path, cost } = plan else { panic!("expected a path") };
        assert_eq!(path, vec![VertexId(0), VertexId(2), VertexId(3), VertexId(4), VertexId(1)]);
        // 2.1 to board (hover until t = 2), 1 + 1 coasting, 1.1 to the goal.
        assert!((cost - 5.2).abs() < 1e-9);
        assert_eq!(g.best_cost(), cost);
    }

    #[test]
    fn car_that_leaves_too_early_cannot_be_caught() {
        let mut g = ride_world(0.5);
        let flight = nominal(&g);
        let plan = Planner::new().plan(&mut g, &flight).unwrap();
        assert_eq!(plan, PlanOutcome::Unreachable);
        assert!(g.best_path().is_empty());
        assert!(g.best_cost().is_infinite());
    }

    #[test]
    fn replanning_from_a_car_vertex() {
        let mut g = ride_world(2.0);
        let flight = nominal(&g);
        let mut planner = Planner::new();
        planner.plan(&mut g, &flight).unwrap();

        g.set_next_start_vertex(VertexId(3)).unwrap();
        let plan = planner.plan(&mut g, &flight).unwrap();
        let PlanOutcome::Found { path, .. } = plan else { panic!("expected a path") };
        assert_eq!(path, vec![VertexId(3), VertexId(4), VertexId(1)]);
        assert!(planner.search().is_closed(VertexId(1)));
    }

    #[test]
    fn deactivated_car_is_not_planned_on() {
        let mut g = ride_world(2.0);
        g.absorb_epoch(&epoch(0.5, None)).unwrap();
        let flight = nominal(&g);
        assert_eq!(Planner::new().plan(&mut g, &flight).unwrap(), PlanOutcome::Unreachable);
    }

    #[test]
    fn custom_flight_cost_is_used_and_cached() {
        let mut g = ride_world(2.0);
        let calls = Cell::new(0);
        let flight = |u: &Vertex, v: &Vertex, d: &Drone| {
            calls.set(calls.get() + 1);
            u.pos.distance(v.pos) / d.max_speed
        };
        let mut planner = Planner::new();
        let first = planner.plan(&mut g, &flight).unwrap();
        let after_first = calls.get();
        assert!(after_first > 0);

        let second = planner.plan(&mut g, &flight).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), after_first);
    }

    #[test]
    fn infinite_flight_cost_falls_back_to_riding() {
        let mut g = graph();
        let base = nominal(&g);
        let flight = |u: &Vertex, v: &Vertex, d: &Drone| {
            if u.id == VertexId(0) && v.id == VertexId(1) {
                f64::INFINITY
            } else {
                base.flight_cost(u, v, d)
            }
        };
        let plan = Planner::new().plan(&mut g, &flight).unwrap();
        let PlanOutcome::Found { path, cost } = plan else { panic!("expected a path") };
        assert_eq!(path.first(), Some(&VertexId(0)));
        assert_eq!(path.last(), Some(&VertexId(1)));
        assert!(path.len() > 2);
        assert!(cost.is_finite());
    }

    #[test]
    fn energy_budget_caps_flight_length() {
        let world = |max_energy: f64| {
            GraphSolution::initialize(
                Drone::new(DroneId(0), 2.0, 100.0, max_energy),
                Point::ORIGIN,
                Point::new(10.0, 0.0),
                &EpochInfo::new(0.0),
                0.0,
                f64::INFINITY,
                &config(),
            )
            .unwrap()
        };

        let mut short = world(5.0);
        let flight = nominal(&short);
        assert_eq!(Planner::new().plan(&mut short, &flight).unwrap(), PlanOutcome::Unreachable);

        let mut enough = world(10.0);
        let plan = Planner::new().plan(&mut enough, &flight).unwrap();
        let PlanOutcome::Found { path, .. } = plan else { panic!("expected a path") };
        assert_eq!(path, vec![VertexId(0), VertexId(1)]);
    }

    #[test]
    fn heuristic_is_zero_at_the_goal_and_admissible_at_the_start() {
        let mut g = ride_world(2.0);
        assert_eq!(g.heuristic(g.goal()), 0.0);
        let flight = nominal(&g);
        let PlanOutcome::Found { cost, .. } = Planner::new().plan(&mut g, &flight).unwrap() else {
            panic!("expected a path")
        };
        assert!(g.heuristic(VertexId(0)) <= cost);
    }

    #[test]
    fn zero_time_car_leg_keeps_the_cheapest_path() {
        // Car "a" jumps from (0,1) to (10,1) at t = 1; riding it is far
        // cheaper than flying 10 m at 1 m/s.
        let route = vec![
            RouteWaypoint::new(WaypointId(1), Point::new(0.0, 1.0), 1.0),
            RouteWaypoint::new(WaypointId(2), Point::new(10.0, 1.0), 1.0),
        ];
        let mut g = GraphSolution::initialize(
            Drone::new(DroneId(0), 1.0, 100.0, 100.0),
            Point::ORIGIN,
            Point::new(10.0, 0.0),
            &epoch(0.0, Some(route)),
            0.0,
            f64::INFINITY,
            &config(),
        )
        .unwrap();
        assert!(g.max_car_speed().is_infinite());
        assert_eq!(g.heuristic(VertexId(0)), 0.0);

        let flight = nominal(&g);
        let PlanOutcome::Found { path, cost } = Planner::new().plan(&mut g, &flight).unwrap() else {
            panic!("expected a path")
        };
        assert_eq!(path, vec![VertexId(0), VertexId(2), VertexId(3), VertexId(1)]);
        // 1.1 to board, a free coast, 1.1 down to the goal.
        assert!((cost - 2.2).abs() < 1e-9);
    }

    #[test]
    fn clamped_times_that_collapse_a_leg_disable_the_heuristic() {
        let mut g = ride_world(2.0);
        assert!(g.max_car_speed().is_finite());
        // Waypoint 2 goes unreported and is clamped onto t = 3 with its neighbours.
        g.absorb_epoch(&epoch(0.5, Some(vec![wp(1, 1.0, 3.0), wp(3, 9.0, 3.0)]))).unwrap();
        assert_eq!(g.vertex(VertexId(3)).unwrap().time, 3.0);
        assert!(g.max_car_speed().is_infinite());
        assert_eq!(g.heuristic(VertexId(0)), 0.0);
        g.validate().unwrap();
    }
}

// ── Cars ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cars {
    use sdmc_core::{CarId, DroneId, VertexId};

    use super::helpers::*;
    use crate::{GraphError, RouteRange};

    #[test]
    fn boarding_respects_capacity() {
        let mut g = graph();
        let a = CarId::from("a");
        g.board(&a, DroneId(0)).unwrap();
        g.board(&a, DroneId(0)).unwrap();
        assert!(matches!(g.board(&a, DroneId(1)), Err(GraphError::CarFull(_))));
        assert_eq!(g.riding_car(DroneId(0)), Some(&a));
        g.validate().unwrap();

        assert!(g.alight(&a, DroneId(0)).unwrap());
        assert!(!g.alight(&a, DroneId(0)).unwrap());
        assert_eq!(g.riding_car(DroneId(0)), None);
        assert!(matches!(g.board(&CarId::from("zz"), DroneId(0)), Err(GraphError::UnknownCar(_))));
    }

    #[test]
    fn route_range_walks_forward() {
        let r = RouteRange { first: VertexId(2), last: VertexId(4) };
        assert_eq!(r.len(), 3);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![VertexId(2), VertexId(3), VertexId(4)]);
        assert_eq!(r.next_after(VertexId(2)), Some(VertexId(3)));
        assert_eq!(r.next_after(VertexId(4)), None);
        assert_eq!(r.next_after(VertexId(1)), None);
    }
}
