//! Integration tests for `agv-sim`: the end-to-end scenarios S1-S6 from
//! `spec.md` §8, run against a fully built [`Engine`], plus the Core API's
//! error surface and the cross-run determinism property.
//!
//! Unlike `agv-map`/`agv-traffic`/`agv-recovery`/`agv-kinematics`'s inline
//! unit tests, these drive whole ticks through [`Engine::tick`] rather than
//! calling a single rule or step directly — they exercise the full
//! snapshot → arbitrate → recovery/kinematics → auto-pilot pipeline.
//!
//! Fleets here are assembled directly via [`agv_fleet::Fleet::spawn`] (not
//! [`Engine::spawn`]) so AGVs land on known nodes — `Engine::spawn`'s
//! randomized placement is exactly what `spec.md` §4.8 specifies, but these
//! scenarios need deterministic starting positions to match the literal node
//! layouts §8 describes.

use agv_core::{Point, Rng};
use agv_fleet::{AgvStatus, Fleet, WaitReason};
use agv_map::{GraphBuilder, MapError};

use crate::{Engine, EngineBuilder, SimError};

const EPS_ARRIVAL: f64 = 10.0; // snap-to-arrival slack, spec.md §4.5/§8 property 4.

// ── S1 — straight-line delivery ───────────────────────────────────────────────

#[cfg(test)]
mod s1_straight_line_delivery {
    use super::*;

    #[test]
    fn single_agv_completes_and_parks_with_no_reservations() {
        // A(0,0) - B(100,0) - C(200,0), edges weight 100 each.
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let node_b = b.add_node(100, 0, "B");
        let c = b.add_node(200, 0, "C");
        b.add_edge(a, node_b, 100);
        b.add_edge(node_b, c, 100);
        let graph = b.build();

        let mut fleet = Fleet::new();
        let id = fleet.spawn(a, Point::new(0.0, 0.0));
        let mut engine = Engine::new(graph, fleet, Rng::new(1), false);
        engine.set_target(id, c).expect("C is reachable from A");

        let mut saw_moving = false;
        for _ in 0..500 {
            engine.tick();
            let snap = engine.snapshot();
            let agv = snap.agvs.iter().find(|a| a.id == id).unwrap();
            saw_moving |= agv.status == AgvStatus::Moving;
        }

        let snap = engine.snapshot();
        let agv = snap.agvs.iter().find(|a| a.id == id).unwrap();
        assert_eq!(agv.current_node, c);
        assert_eq!(agv.status, AgvStatus::Completed);
        assert!(agv.reserved_nodes.is_empty());
        assert!((agv.x - 200.0).abs() < 1e-6);
        assert!((agv.y - 0.0).abs() < 1e-6);
        assert!(saw_moving, "AGV should have been MOVING at least once en route");
    }
}

// ── S2 — head-on resolution ────────────────────────────────────────────────────

#[cfg(test)]
mod s2_head_on_resolution {
    use super::*;

    #[test]
    fn opposing_agvs_detour_around_each_other_and_both_complete() {
        // A(0,0) - B(100,0) - C(200,0), A - D(100,-100) - C, all edges weight 100.
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let node_b = b.add_node(100, 0, "B");
        let c = b.add_node(200, 0, "C");
        let d = b.add_node(100, -100, "D");
        b.add_edge(a, node_b, 100);
        b.add_edge(node_b, c, 100);
        b.add_edge(a, d, 100);
        b.add_edge(d, c, 100);
        let graph = b.build();

        let mut fleet = Fleet::new();
        let agv1 = fleet.spawn(a, Point::new(0.0, 0.0));
        let agv2 = fleet.spawn(c, Point::new(200.0, 0.0));
        let mut engine = Engine::new(graph, fleet, Rng::new(2), false);
        engine.set_target(agv1, c).unwrap();
        engine.set_target(agv2, a).unwrap();

        let max_speed = engine.fleet().default_config().max_speed;
        let mut prev_positions: std::collections::HashMap<_, _> =
            engine.snapshot().agvs.into_iter().map(|a| (a.id, a.position())).collect();
        let mut saw_repathing = false;

        for _ in 0..2000 {
            engine.tick();
            let snap = engine.snapshot();
            for agv in &snap.agvs {
                saw_repathing |= agv.status == AgvStatus::Repathing;
                let prev = prev_positions[&agv.id];
                let displacement = prev.distance(agv.position());
                assert!(
                    displacement <= max_speed + EPS_ARRIVAL,
                    "agv {} displaced {displacement} in one tick (bound {max_speed}+{EPS_ARRIVAL})",
                    agv.id
                );
                prev_positions.insert(agv.id, agv.position());
            }
        }

        assert!(saw_repathing, "at least one AGV should enter REPATHING to resolve the head-on");
        let snap = engine.snapshot();
        for agv in &snap.agvs {
            assert_eq!(agv.status, AgvStatus::Completed, "agv {} should have completed", agv.id);
        }
    }
}

// ── S3 — reservation contention resolves via detour ───────────────────────────

#[cfg(test)]
mod s3_reservation_contention {
    use super::*;

    /// Two AGVs whose immediate next node is the same contested node `M`.
    /// `agv_a`'s only route runs through `M` with no alternative; `agv_b` has
    /// a (costlier) alternate route avoiding `M`. R0 fires symmetrically for
    /// both at first (each reserves `M` via `hard_borrow_length=1`) — the
    /// deadlock only breaks once the retry ladder gives `agv_b` a detour,
    /// releasing its reservation on `M` and letting `agv_a` proceed.
    #[test]
    fn losing_side_detours_and_releases_the_shared_reservation() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let m = b.add_node(60, 0, "M");
        let c = b.add_node(120, 0, "C");
        let b2 = b.add_node(60, -60, "B2");
        let d2 = b.add_node(60, 60, "D2");
        let e2 = b.add_node(120, -60, "E2");
        b.add_edge(a, m, 60);
        b.add_edge(m, c, 60);
        b.add_edge(b2, m, 60);
        b.add_edge(m, d2, 60);
        b.add_edge(b2, e2, 100);
        b.add_edge(e2, d2, 100);
        let graph = b.build();

        let mut fleet = Fleet::new();
        let agv_a = fleet.spawn(a, Point::new(0.0, 0.0));
        let agv_b = fleet.spawn(b2, Point::new(60.0, -60.0));
        let mut engine = Engine::new(graph, fleet, Rng::new(3), false);
        engine.set_target(agv_a, c).unwrap();
        engine.set_target(agv_b, d2).unwrap();

        // Both should reserve M and WAIT on R0 in the first handful of ticks.
        for _ in 0..5 {
            engine.tick();
        }
        let snap = engine.snapshot();
        let a_state = snap.agvs.iter().find(|x| x.id == agv_a).unwrap();
        let b_state = snap.agvs.iter().find(|x| x.id == agv_b).unwrap();
        assert_eq!(a_state.status, AgvStatus::Waiting);
        assert_eq!(b_state.status, AgvStatus::Waiting);
        assert_eq!(a_state.wait_reason, Some(WaitReason::NodeReserved(m)));
        assert_eq!(b_state.wait_reason, Some(WaitReason::NodeReserved(m)));

        let mut saw_detour = false;
        for _ in 0..1500 {
            engine.tick();
            let snap = engine.snapshot();
            let b_state = snap.agvs.iter().find(|x| x.id == agv_b).unwrap();
            saw_detour |= matches!(b_state.status, AgvStatus::Detour | AgvStatus::Repathing);
        }
        assert!(saw_detour, "agv_b should have detoured around M via E2");

        let snap = engine.snapshot();
        let a_state = snap.agvs.iter().find(|x| x.id == agv_a).unwrap();
        let b_state = snap.agvs.iter().find(|x| x.id == agv_b).unwrap();
        assert_eq!(a_state.status, AgvStatus::Completed);
        assert_eq!(a_state.current_node, c);
        assert_eq!(b_state.status, AgvStatus::Completed);
        assert_eq!(b_state.current_node, d2);
        assert!(a_state.reserved_nodes.is_empty());
        assert!(b_state.reserved_nodes.is_empty());
    }
}

// ── S4 — stop before wall ──────────────────────────────────────────────────────

#[cfg(test)]
mod s4_stop_before_wall {
    use super::*;

    #[test]
    fn final_edge_arrival_converges_speed_to_zero() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let node_b = b.add_node(60, 0, "B");
        b.add_edge(a, node_b, 60);
        let graph = b.build();

        let mut fleet = Fleet::new();
        let id = fleet.spawn(a, Point::new(0.0, 0.0));
        let deceleration = fleet.default_config().deceleration;
        let mut engine = Engine::new(graph, fleet, Rng::new(4), false);
        engine.set_target(id, node_b).unwrap();

        let mut prev_speed = 0.0_f64;
        let mut prev_remaining = 60.0_f64;
        let mut arrived = false;

        for _ in 0..500 {
            engine.tick();
            let snap = engine.snapshot();
            let agv = snap.agvs.iter().find(|a| a.id == id).unwrap();

            if agv.status == AgvStatus::Completed {
                assert_eq!(agv.current_speed, 0.0);
                let bound = (2.0 * deceleration * prev_remaining).sqrt() + 1e-6;
                assert!(
                    prev_speed <= bound,
                    "speed {prev_speed} on the tick before arrival exceeded braking bound {bound}"
                );
                arrived = true;
                break;
            }

            prev_speed = agv.current_speed;
            prev_remaining = 60.0 - agv.progress_distance;
        }

        assert!(arrived, "AGV should have arrived within 500 ticks");
    }
}

// ── S5 — step-back unblocking ──────────────────────────────────────────────────

#[cfg(test)]
mod s5_step_back_unblocking {
    use super::*;

    /// Corridor A-B-C-D. AGV-1 at B targets past C; AGV-2 at C targets D but
    /// D is permanently occupied by stationary AGV-3 (no target, so IDLE
    /// rather than WAITING). AGV-2's R2a wait is therefore blocked by an
    /// IDLE occupant, not a WAITING one, so per §4.6's literal rule ("blocker
    /// itself is WAITING or BLOCKED") AGV-2 never qualifies for step-back —
    /// it exhausts every ranked-detour attempt in a corridor with no
    /// alternate route and simply stays WAITING. AGV-1's blocker (AGV-2) *is*
    /// WAITING, so AGV-1 does qualify and steps back to A after its retry
    /// budget expires. This is a deliberate reading of the scenario's
    /// "stationary, no target" blocker, not a gap in the implementation.
    #[test]
    fn upstream_agv_steps_back_when_its_blocker_is_waiting() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(0, 0, "A");
        let node_b = builder.add_node(100, 0, "B");
        let c = builder.add_node(200, 0, "C");
        let d = builder.add_node(300, 0, "D");
        builder.add_edge(a, node_b, 100);
        builder.add_edge(node_b, c, 100);
        builder.add_edge(c, d, 100);
        let graph = builder.build();

        let mut fleet = Fleet::new();
        let agv1 = fleet.spawn(node_b, Point::new(100.0, 0.0));
        let agv2 = fleet.spawn(c, Point::new(200.0, 0.0));
        let _agv3 = fleet.spawn(d, Point::new(300.0, 0.0)); // stationary, no target: IDLE.

        let mut engine = Engine::new(graph, fleet, Rng::new(5), false);
        engine.set_target(agv1, d).unwrap();
        engine.set_target(agv2, d).unwrap();

        let mut saw_agv1_retreat_to_a = false;
        for _ in 0..400 {
            engine.tick();
            let snap = engine.snapshot();
            let agv1_state = snap.agvs.iter().find(|x| x.id == agv1).unwrap();
            if agv1_state.current_node == a
                && matches!(agv1_state.status, AgvStatus::Detour | AgvStatus::Repathing)
            {
                saw_agv1_retreat_to_a = true;
                break;
            }
        }

        assert!(saw_agv1_retreat_to_a, "agv1 should step back to A once its WAITING blocker persists");

        let snap = engine.snapshot();
        let agv2_state = snap.agvs.iter().find(|x| x.id == agv2).unwrap();
        assert_eq!(
            agv2_state.status,
            AgvStatus::Waiting,
            "agv2's blocker (agv3) never reports WAITING/BLOCKED, so agv2 keeps retrying in place"
        );
    }
}

// ── S6 — unreachable target ────────────────────────────────────────────────────

#[cfg(test)]
mod s6_unreachable_target {
    use super::*;

    #[test]
    fn set_target_across_disconnected_components_leaves_agv_idle() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let _node_b = b.add_node(100, 0, "B");
        b.add_edge(a, _node_b, 100);
        let island = b.add_node(1000, 1000, "Z"); // no edges: unreachable from A.
        let graph = b.build();

        let mut fleet = Fleet::new();
        let id = fleet.spawn(a, Point::new(0.0, 0.0));
        let mut engine = Engine::new(graph, fleet, Rng::new(6), false);

        let err = engine.set_target(id, island).unwrap_err();
        assert!(matches!(err, SimError::Map(MapError::NoPath { from, to }) if from == a && to == island));

        let snap = engine.snapshot();
        let agv = snap.agvs.iter().find(|a| a.id == id).unwrap();
        assert_eq!(agv.status, AgvStatus::Idle);
        assert!(agv.path.is_empty());
        assert_eq!(agv.wait_reason, Some(WaitReason::NoPath));
    }
}

// ── Cross-cutting properties ──────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;

    #[test]
    fn same_seed_same_trace_is_bit_exact() {
        let build = || {
            let mut engine = EngineBuilder::new("determinism-check").generate_map(24).auto_pilot(true).build();
            for _ in 0..6 {
                engine.spawn().unwrap();
            }
            engine
        };

        let mut e1 = build();
        let mut e2 = build();
        for _ in 0..300 {
            e1.tick();
            e2.tick();
        }

        assert_eq!(e1.snapshot().agvs, e2.snapshot().agvs);
        assert_eq!(e1.snapshot().now, e2.snapshot().now);
    }

    #[test]
    fn builder_continues_the_map_generators_rng_stream() {
        // `EngineBuilder::build()` must seed one `Rng`, hand it to
        // `MapGenerator::generate_with_rng` for node placement/edge
        // weights, and keep using that same (now-advanced) `Rng` for the
        // engine's own draws (auto-pilot, `spawn`) — not restart a second
        // stream from the same seed string. Reconstructing the old
        // (buggy) two-independent-generators behavior by hand and
        // comparing against `build()`'s actual spawn choice demonstrates
        // the streams differ.
        let seed = "rng-continuity-check";
        let node_count = 30;

        let mut built = EngineBuilder::new(seed).generate_map(node_count).build();
        let built_spawn = built.spawn().unwrap();
        let built_pos = built.snapshot().agvs.into_iter().find(|a| a.id == built_spawn).unwrap().position();

        // The buggy reconstruction: a graph generated from its own
        // discarded `Rng`, paired with an independently fresh `Rng` seeded
        // from the same string for the engine.
        let data = agv_map::MapGenerator::generate(seed, node_count);
        let graph = agv_map::Graph::from_map_data(&data);
        let mut buggy = Engine::new(graph, Fleet::new(), Rng::from_str_seed(seed), false);
        let buggy_spawn = buggy.spawn().unwrap();
        let buggy_pos = buggy.snapshot().agvs.into_iter().find(|a| a.id == buggy_spawn).unwrap().position();

        assert_ne!(
            built_pos, buggy_pos,
            "build() should continue the map generator's rng stream rather than restart an independent one"
        );
    }

    #[test]
    fn spawn_on_empty_map_fails() {
        let graph = GraphBuilder::new().build();
        let fleet = Fleet::new();
        let mut engine = Engine::new(graph, fleet, Rng::new(7), false);
        assert!(engine.spawn().is_err());
    }

    #[test]
    fn idle_and_completed_agvs_always_hold_no_reservations() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let node_b = b.add_node(50, 0, "B");
        b.add_edge(a, node_b, 50);
        let graph = b.build();

        let mut fleet = Fleet::new();
        let id = fleet.spawn(a, Point::new(0.0, 0.0));
        let mut engine = Engine::new(graph, fleet, Rng::new(8), false);
        engine.set_target(id, node_b).unwrap();

        for _ in 0..200 {
            engine.tick();
            let snap = engine.snapshot();
            let agv = snap.agvs.iter().find(|a| a.id == id).unwrap();
            if agv.status.is_idle_or_completed() {
                assert!(agv.reserved_nodes.is_empty());
            }
        }
    }

    #[test]
    fn set_target_twice_to_same_node_is_idempotent_modulo_planning_time() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, 0, "A");
        let node_b = b.add_node(50, 0, "B");
        b.add_edge(a, node_b, 50);
        let graph = b.build();

        let mut fleet = Fleet::new();
        let id = fleet.spawn(a, Point::new(0.0, 0.0));
        let mut engine = Engine::new(graph, fleet, Rng::new(9), false);

        engine.set_target(id, node_b).unwrap();
        let first = engine.snapshot().agvs.into_iter().find(|a| a.id == id).unwrap();
        engine.set_target(id, node_b).unwrap();
        let second = engine.snapshot().agvs.into_iter().find(|a| a.id == id).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(first.target_node, second.target_node);
        assert_eq!(first.status, second.status);
    }

    #[test]
    fn update_config_rejects_out_of_range_values() {
        let graph = GraphBuilder::new().build();
        let fleet = Fleet::new();
        let mut engine = Engine::new(graph, fleet, Rng::new(10), false);
        let result = engine.update_config(None, crate::ConfigKey::MaxSpeed, -1.0);
        assert!(result.is_err());
    }
}
