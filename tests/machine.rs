//! Integration tests for claw-sim
//!
//! These tests exercise end-to-end behaviour of the simulation core through
//! the public API re-exported from the crate root. All tests run
//! deterministically with fixed time steps and no randomness.

use std::f32::consts::FRAC_PI_2;

use claw_sim::{
    Aabb, ChainRig, ClawMachine, HermitePath, HermiteSegment, Integrator, JointChain,
    JointLimits, RotationAxis, Simulation, SimError, Spline, Toy, ToyEvent, ToyWorld, Transform,
};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

// ============================================================================
// Helpers
// ============================================================================

fn assert_close(actual: f32, expected: f32, eps: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= eps,
        "{what}: expected {expected}, got {actual}"
    );
}

fn assert_vec_close(actual: Vec3, expected: Vec3, eps: f32, what: &str) {
    assert!(
        actual.distance(expected) <= eps,
        "{what}: expected {expected:?}, got {actual:?}"
    );
}

/// A two-particle pendulum spring hanging from a pinned anchor, high enough
/// that the ground plane never interferes.
fn hanging_pair(integrator: Integrator) -> ChainRig {
    let mut sim = Simulation::new();
    sim.integrator = integrator;
    sim.add_particle(Vec3::new(0.0, 10.0, 0.0), 1.0, Vec3::ZERO);
    sim.add_particle(Vec3::new(0.0, 9.0, 0.0), 1.0, Vec3::ZERO);
    sim.add_spring(0, 1, 500.0, 10.0, 1.0)
        .expect("both particles configured");
    ChainRig::new(sim)
}

/// Closed square loop of four Hermite segments at a fixed height.
fn square_loop() -> HermitePath {
    let corners = [
        Vec3::new(3.0, 6.0, 3.0),
        Vec3::new(-3.0, 6.0, 3.0),
        Vec3::new(-3.0, 6.0, -3.0),
        Vec3::new(3.0, 6.0, -3.0),
    ];
    let tangents = [
        Vec3::new(-6.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -6.0),
        Vec3::new(6.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 6.0),
    ];
    let mut path = HermitePath::new();
    for i in 0..4 {
        let j = (i + 1) % 4;
        path.add_segment(corners[i], corners[j], tangents[i], tangents[j]);
    }
    path
}

// ============================================================================
// Spring simulation
// ============================================================================

/// A mass hanging from a pinned anchor settles at the rest length plus the
/// gravitational stretch m*g/ks.
#[test]
fn hanging_mass_settles_at_stretched_rest_length() {
    let mut rig = hanging_pair(Integrator::Symplectic);
    for _ in 0..600 {
        rig.update(DT).expect("configured simulation never errors");
    }

    let expected_y = 10.0 - (1.0 + 9.8 / 500.0);
    let tail = rig.tail_position();
    assert_close(tail.y, expected_y, 0.02, "settled height");
    assert_close(tail.x, 0.0, 1e-4, "no lateral drift");
    // Anchor stays pinned exactly.
    assert_vec_close(
        rig.positions().next().unwrap(),
        Vec3::new(0.0, 10.0, 0.0),
        1e-6,
        "anchor position",
    );
}

/// Velocity Verlet must stay bounded over a long run and settle to the same
/// equilibrium as the symplectic scheme.
#[test]
fn verlet_integration_stays_bounded() {
    let mut rig = hanging_pair(Integrator::Verlet);
    for _ in 0..1000 {
        rig.update(DT).expect("configured simulation never errors");
        let tail = rig.tail_position();
        assert!(tail.is_finite(), "position diverged: {tail:?}");
        assert!(tail.y > 8.0 && tail.y < 10.0, "tail escaped: {tail:?}");
    }
    let expected_y = 10.0 - (1.0 + 9.8 / 500.0);
    assert_close(rig.tail_position().y, expected_y, 0.05, "Verlet equilibrium");
}

/// An undamped spring-mass pair under velocity Verlet: total mechanical
/// energy must stay within a small bounded drift, never growing without
/// bound.
#[test]
fn undamped_verlet_conserves_energy() {
    let mut sim = Simulation::new();
    sim.integrator = Integrator::Verlet;
    sim.gravity_enabled = false;
    sim.ground_y = -100.0;
    sim.add_particle(Vec3::new(-0.75, 0.0, 0.0), 1.0, Vec3::ZERO);
    sim.add_particle(Vec3::new(0.75, 0.0, 0.0), 1.0, Vec3::ZERO);
    sim.add_spring(0, 1, 100.0, 0.0, 1.0)
        .expect("both particles configured");

    let energy = |sim: &Simulation| -> f32 {
        let particles = sim.particles();
        let stretch = particles[0].position.distance(particles[1].position) - 1.0;
        let kinetic: f32 = particles
            .iter()
            .map(|p| 0.5 * p.mass * p.velocity.length_squared())
            .sum();
        kinetic + 0.5 * 100.0 * stretch * stretch
    };

    let initial = energy(&sim);
    assert_close(initial, 12.5, 1e-4, "energy of the stretched release");
    for step in 0..1000 {
        sim.step().expect("configured simulation never errors");
        let current = energy(&sim);
        assert!(
            (current - initial).abs() < initial * 0.05,
            "energy drifted out of bounds at step {step}: {current} vs {initial}"
        );
    }
}

/// Explicit Euler on a free-falling particle: no springs, just gravity.
#[test]
fn free_fall_accelerates_downward() {
    let mut sim = Simulation::new();
    sim.integrator = Integrator::Euler;
    sim.ground_y = -100.0;
    sim.add_particle(Vec3::new(0.0, 5.0, 0.0), 2.0, Vec3::ZERO);

    for _ in 0..30 {
        sim.advance(DT).expect("no springs to misconfigure");
    }

    let particle = &sim.particles()[0];
    assert!(particle.position.y < 5.0, "particle did not fall");
    assert!(particle.velocity.y < 0.0, "velocity should point down");
    assert_close(
        particle.acceleration.y,
        -9.8,
        1e-4,
        "gravitational acceleration",
    );
}

/// A spring slot that was reserved but never configured is an initialization
/// error, reported on the first step.
#[test]
fn unconfigured_spring_slot_is_an_error() {
    let mut sim = Simulation::new();
    sim.add_particle(Vec3::ZERO, 1.0, Vec3::ZERO);
    sim.create_springs(1);

    match sim.step() {
        Err(SimError::SpringNotConfigured(0)) => {}
        other => panic!("expected SpringNotConfigured(0), got {other:?}"),
    }
}

/// The slot configuration surface: reserved slots are configured by index,
/// with out-of-range and unconfigured-endpoint errors reported eagerly.
#[test]
fn slot_configuration_validates_indices_and_endpoints() {
    let mut sim = Simulation::new();
    sim.create_particles(2);
    sim.create_springs(1);

    match sim.set_particle(5, Vec3::ZERO, 1.0, Vec3::ZERO) {
        Err(SimError::ParticleIndexOutOfRange { index: 5, count: 2 }) => {}
        other => panic!("expected ParticleIndexOutOfRange, got {other:?}"),
    }
    match sim.set_spring(3, 0, 1, 100.0, 1.0, 0.5) {
        Err(SimError::SpringIndexOutOfRange { index: 3, count: 1 }) => {}
        other => panic!("expected SpringIndexOutOfRange, got {other:?}"),
    }

    sim.set_particle(0, Vec3::ZERO, 1.0, Vec3::ZERO)
        .expect("slot 0 in range");
    // Endpoint 1 is still unconfigured, so the auto rest length has nothing
    // to measure.
    match sim.set_spring(0, 0, 1, 100.0, 1.0, -1.0) {
        Err(SimError::ParticleNotConfigured(1)) => {}
        other => panic!("expected ParticleNotConfigured(1), got {other:?}"),
    }

    sim.set_particle(1, Vec3::new(0.0, -1.5, 0.0), 1.0, Vec3::ZERO)
        .expect("slot 1 in range");
    sim.set_spring(0, 0, 1, 100.0, 1.0, -1.0)
        .expect("both endpoints configured");
    assert_close(sim.springs()[0].rest_length, 1.5, 1e-6, "auto rest length");
    sim.step().expect("fully configured simulation steps");
}

/// A non-positive rest length auto-computes from the current endpoint
/// distance.
#[test]
fn rest_length_sentinel_uses_current_distance() {
    let mut sim = Simulation::new();
    sim.add_particle(Vec3::ZERO, 1.0, Vec3::ZERO);
    sim.add_particle(Vec3::new(0.0, -2.0, 0.0), 1.0, Vec3::ZERO);
    sim.add_spring(0, 1, 100.0, 1.0, -1.0).expect("valid endpoints");

    assert_close(sim.springs()[0].rest_length, 2.0, 1e-6, "auto rest length");
}

/// The claw rig keeps its anchor pinned through updates while the chain
/// hangs below it.
#[test]
fn claw_rig_anchor_stays_pinned() {
    let top = Vec3::new(0.0, 6.0, 0.0);
    let mut rig = ChainRig::claw(top);
    for _ in 0..120 {
        rig.update(DT).expect("claw rig is fully configured");
    }

    assert_vec_close(rig.positions().next().unwrap(), top, 1e-6, "anchor");
    assert!(
        rig.tail_position().y < top.y,
        "tail should hang below the anchor"
    );
    for position in rig.positions() {
        assert!(position.is_finite(), "chain diverged: {position:?}");
    }
}

/// The claw rig's grabber mount is the chain foot, not one of the splayed
/// tip particles strung from it.
#[test]
fn claw_rig_tail_is_the_chain_foot() {
    let top = Vec3::new(0.0, 6.0, 0.0);
    let mut rig = ChainRig::claw(top);
    assert_eq!(rig.tail_index(), 2);

    for _ in 0..60 {
        rig.update(DT).expect("claw rig is fully configured");
    }

    let positions: Vec<Vec3> = rig.positions().collect();
    assert_eq!(positions.len(), 6);
    assert_vec_close(rig.tail_position(), positions[2], 1e-6, "tail is the foot");
    assert!(
        rig.tail_position().distance(positions[5]) > 0.5,
        "tail must not coincide with a tip particle"
    );
}

// ============================================================================
// Splines and paths
// ============================================================================

/// Hermite endpoint interpolation: the segment passes through p1 at t=0 and
/// p2 at t=1, with tangents matching v1 and v2.
#[test]
fn hermite_segment_endpoint_properties() {
    let segment = HermiteSegment::new(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(4.0, 0.0, -1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
    );

    assert_vec_close(segment.point_at(0.0), Vec3::new(1.0, 2.0, 3.0), 1e-5, "p(0)");
    assert_vec_close(segment.point_at(1.0), Vec3::new(4.0, 0.0, -1.0), 1e-5, "p(1)");
    assert_vec_close(segment.tangent_at(0.0), Vec3::X, 1e-4, "tangent at 0");
    assert_vec_close(segment.tangent_at(1.0), -Vec3::Y, 1e-4, "tangent at 1");
    assert!(segment.arc_length(100) > 0.0, "positive arc length");
}

/// A closed square loop: t=0 sits on the first corner, t=0.5 on the opposite
/// one, and the cursor wraps cleanly past the end.
#[test]
fn closed_path_loops_and_wraps() {
    let mut path = square_loop();

    assert_vec_close(path.point_at(0.0), Vec3::new(3.0, 6.0, 3.0), 1e-4, "start");
    assert_vec_close(path.point_at(1.0), Vec3::new(3.0, 6.0, 3.0), 1e-4, "end equals start");
    // Equal segment lengths put the halfway parameter on the opposite corner.
    assert_vec_close(
        path.point_at(0.5),
        Vec3::new(-3.0, 6.0, -3.0),
        1e-3,
        "halfway point",
    );

    assert!(path.advance(0.7), "mid-loop advance");
    assert!(!path.advance(0.7), "wrapping advance reports the loop");
    assert_close(path.cursor(), 0.4, 1e-5, "wrapped cursor");
}

/// The cumulative arc-length table never decreases and its total matches
/// `arc_length()`.
#[test]
fn spline_arc_length_table_is_monotonic() {
    let points = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(4.0, 0.0, 1.0),
        Vec3::new(6.0, -1.0, 0.0),
    ];
    let spline = Spline::from_catmull_rom(&points, 0.5);

    let table = spline.arc_length_table();
    assert!(table.len() > 1, "table populated");
    for window in table.windows(2) {
        assert!(window[1] >= window[0], "table must be non-decreasing");
    }
    assert_close(
        spline.arc_length(),
        *table.last().unwrap(),
        1e-6,
        "total matches table",
    );
    assert!(spline.arc_length() > 6.0, "length at least the chord span");

    // Endpoint interpolation survives the global-to-local mapping.
    assert_vec_close(spline.position_at(0.0), points[0], 1e-4, "spline start");
    assert_vec_close(spline.position_at(1.0), points[3], 1e-4, "spline end");
}

/// Point and tangent edits rebuild the arc-length table and reshape the
/// curve.
#[test]
fn spline_edits_rebuild_the_table() {
    let mut spline = Spline::new();
    spline.add_point(Vec3::ZERO, Vec3::X);
    spline.add_point(Vec3::new(2.0, 0.0, 0.0), Vec3::X);
    assert_close(spline.arc_length(), 2.0, 1e-2, "straight two-point length");

    spline.add_point(Vec3::new(4.0, 0.0, 0.0), Vec3::X);
    assert_close(spline.arc_length(), 4.0, 1e-2, "length grows with the new point");

    spline.set_point(2, Vec3::new(4.0, 3.0, 0.0));
    assert!(
        spline.arc_length() > 4.5,
        "moving a point must re-measure the curve"
    );
    assert_vec_close(
        spline.position_at(1.0),
        Vec3::new(4.0, 3.0, 0.0),
        1e-4,
        "endpoint follows the edit",
    );

    let before = spline.position_at(0.25);
    spline.set_tangent(0, Vec3::new(0.0, 8.0, 0.0));
    let after = spline.position_at(0.25);
    assert!(
        before.distance(after) > 0.1,
        "tangent edits must reshape the curve"
    );
}

// ============================================================================
// Toy engine
// ============================================================================

fn play_area() -> Aabb {
    Aabb::new(Vec3::new(-4.0, 0.0, -4.0), Vec3::new(4.0, 8.0, 4.0))
}

fn collection_chute() -> Aabb {
    Aabb::new(Vec3::new(2.0, 0.0, 2.0), Vec3::new(3.8, 1.5, 3.8))
}

/// A fast toy launched at a wall must never end a step outside the play
/// area, swept collision included.
#[test]
fn toys_stay_inside_the_play_area() {
    let mut world = ToyWorld::new(play_area(), collection_chute());
    world.add_toy(
        Toy::new("rocket", Vec3::new(0.0, 4.0, 0.0), 0.4, 1.0)
            .with_velocity(Vec3::new(9.0, 3.0, -7.0)),
    );

    for _ in 0..300 {
        world.step(DT);
        let toy = &world.toys()[0];
        let bounds = world.bounds();
        let r = toy.radius;
        assert!(toy.position.is_finite(), "toy diverged");
        assert!(
            toy.position.x - r >= bounds.min.x - 1e-3
                && toy.position.x + r <= bounds.max.x + 1e-3
                && toy.position.y - r >= bounds.min.y - 1e-3
                && toy.position.y + r <= bounds.max.y + 1e-3
                && toy.position.z - r >= bounds.min.z - 1e-3
                && toy.position.z + r <= bounds.max.z + 1e-3,
            "toy escaped bounds at {:?}",
            toy.position
        );
        assert!(
            toy.speed() <= world.config().max_speed + 1e-3,
            "speed cap violated"
        );
    }
}

/// Two overlapping spheres separate and stay separated.
#[test]
fn overlapping_toys_separate() {
    let mut world = ToyWorld::new(play_area(), collection_chute());
    world.add_toy(Toy::new("a", Vec3::new(-0.3, 0.4, 0.0), 0.4, 1.0));
    world.add_toy(Toy::new("b", Vec3::new(0.3, 0.4, 0.0), 0.4, 1.0));

    for _ in 0..120 {
        world.step(DT);
    }

    let distance = world.toys()[0].position.distance(world.toys()[1].position);
    assert!(
        distance >= 0.8 - 0.02,
        "spheres still interpenetrating: distance {distance}"
    );
}

/// An immobile toy never moves, but still deflects a mobile one.
#[test]
fn immobile_toy_deflects_without_moving() {
    let mut world = ToyWorld::new(play_area(), collection_chute());
    let anchor = Vec3::new(0.0, 0.5, 0.0);
    world.add_toy(Toy::new("statue", anchor, 0.5, 10.0).immobile());
    world.add_toy(
        Toy::new("mover", Vec3::new(-2.0, 0.5, 0.0), 0.4, 1.0)
            .with_velocity(Vec3::new(4.0, 0.0, 0.0)),
    );

    for _ in 0..120 {
        world.step(DT);
    }

    assert_vec_close(world.toys()[0].position, anchor, 1e-6, "statue position");
    let mover = &world.toys()[1];
    assert!(
        mover.position.distance(world.toys()[0].position) >= 0.9 - 0.02,
        "mover lodged inside the statue"
    );
}

/// A toy dropped into the collection chute settles near its floor and is
/// reported as collected, leaving the active set.
#[test]
fn settled_toy_in_collection_is_collected() {
    let mut world = ToyWorld::new(play_area(), collection_chute());
    let chute = collection_chute();
    world.add_toy(Toy::new(
        "prize",
        chute.center().with_y(chute.min.y + 0.5),
        0.3,
        1.0,
    ));

    let mut collected = false;
    for _ in 0..900 {
        for event in world.step(DT) {
            if let ToyEvent::Collected { name } = event {
                assert_eq!(name, "prize");
                collected = true;
            }
        }
        if collected {
            break;
        }
    }

    assert!(collected, "toy never settled in the collection volume");
    assert_eq!(world.collected_count(), 1);
    assert!(world.toys().is_empty(), "collected toy must leave the set");
}

/// A toy that somehow ends up far below the floor is teleported back to its
/// spawn point with a reset event.
#[test]
fn escaped_toy_is_reset_to_spawn() {
    let mut world = ToyWorld::new(play_area(), collection_chute());
    let spawn = Vec3::new(0.0, 2.0, 0.0);
    world.add_toy(Toy::new("glitch", spawn, 0.4, 1.0));

    world.toys_mut()[0].position = Vec3::new(0.0, -5.0, 0.0);
    let events = world.step(DT);

    assert!(
        events.contains(&ToyEvent::Reset {
            name: "glitch".into()
        }),
        "expected a reset event, got {events:?}"
    );
    assert_vec_close(world.toys()[0].position, spawn, 1e-6, "reset position");
    assert_eq!(world.toys()[0].velocity, Vec3::ZERO);
}

// ============================================================================
// Inverse kinematics
// ============================================================================

/// A two-joint arm (yaw about Y, pitch about Z) reaches a target inside its
/// workspace within the solver's relaxed success bound.
#[test]
fn two_joint_arm_reaches_target() {
    let mut chain = JointChain::builder()
        .add_joint_with_limits(
            Transform::IDENTITY,
            RotationAxis::Y,
            JointLimits::new(-FRAC_PI_2, FRAC_PI_2),
        )
        .add_joint_with_limits(
            Transform::IDENTITY,
            RotationAxis::Z,
            JointLimits::new(0.0, FRAC_PI_2),
        )
        .end_effector(Vec3::new(1.0, 0.0, 0.0))
        .build();

    let target = Vec3::new(0.7, 0.7, 0.0);
    let result = claw_sim::IkSolver::solve(&mut chain, target);

    assert!(
        result.converged,
        "solver failed: distance {}",
        result.final_distance
    );
    assert!(
        result.final_distance < chain.tolerance() * 10.0,
        "final distance {} above success bound",
        result.final_distance
    );
    let effector = chain.end_effector_position().unwrap();
    assert!(
        effector.distance(target) < 0.1,
        "effector at {effector:?}, target {target:?}"
    );
    // The pitch joint respects its limits.
    let pitch = chain.joints()[1].angle;
    assert!((0.0..=FRAC_PI_2).contains(&pitch), "pitch out of limits: {pitch}");
}

/// Joint limits clamp the solution: a target behind the arm stays
/// unreachable when pitch cannot go negative.
#[test]
fn joint_limits_block_unreachable_targets() {
    let mut chain = JointChain::builder()
        .add_joint_with_limits(
            Transform::IDENTITY,
            RotationAxis::Z,
            JointLimits::new(0.0, FRAC_PI_2),
        )
        .end_effector(Vec3::new(1.0, 0.0, 0.0))
        .build();

    let result = claw_sim::IkSolver::solve(&mut chain, Vec3::new(0.7, -0.7, 0.0));

    assert!(!result.converged, "target below the limit range is unreachable");
    assert!(chain.joints()[0].angle >= 0.0, "limit violated");
}

/// Posing a chain directly clamps each angle into its joint's limits.
#[test]
fn set_angles_clamps_into_limits() {
    let mut chain = JointChain::builder()
        .add_joint_with_limits(
            Transform::IDENTITY,
            RotationAxis::Z,
            JointLimits::new(0.0, FRAC_PI_2),
        )
        .end_effector(Vec3::X)
        .build();

    chain.set_angles(&[2.0]);
    assert_close(chain.angles()[0], FRAC_PI_2, 1e-6, "angle clamped to limit");
    assert_vec_close(
        chain.end_effector_position().unwrap(),
        Vec3::Y,
        1e-5,
        "effector at the limit pose",
    );
}

/// Empty chains and chains without joints fail cleanly instead of panicking.
#[test]
fn empty_chain_is_a_no_op_failure() {
    let mut chain = JointChain::builder().build();
    let result = claw_sim::IkSolver::solve(&mut chain, Vec3::ONE);
    assert!(!result.converged);
    assert_eq!(result.iterations, 0);
}

// ============================================================================
// Machine orchestration
// ============================================================================

/// Full pipeline smoke run: trolley moves along the loop, the chain follows,
/// the grabber solves, and the toys stay alive.
#[test]
fn machine_update_runs_the_whole_pipeline() {
    let path = square_loop();
    let start = path.point_at(0.0);
    let rig = ChainRig::claw(start);
    let mut world = ToyWorld::new(play_area(), collection_chute());
    world.add_toy(Toy::new("bear", Vec3::new(0.0, 1.0, 0.0), 0.4, 1.0));

    let grabber = JointChain::builder()
        .add_joint_with_limits(
            Transform::IDENTITY,
            RotationAxis::Y,
            JointLimits::new(-FRAC_PI_2, FRAC_PI_2),
        )
        .add_joint_with_limits(
            Transform::from_position(Vec3::new(0.0, -0.8, 0.0)),
            RotationAxis::Z,
            JointLimits::new(0.0, FRAC_PI_2),
        )
        .end_effector(Vec3::new(0.0, -1.0, 0.0))
        .build();

    let mut machine = ClawMachine::new(path, rig, world)
        .with_grabber(grabber)
        .with_speed(2.0);
    machine.move_claw();

    for _ in 0..240 {
        machine.update(DT).expect("configured machine never errors");
    }

    assert!(machine.path().cursor() > 0.0, "trolley never moved");
    assert!(machine.claw_position().is_finite(), "chain diverged");
    assert!(machine.last_solve().is_some(), "grabber never solved");
    assert_eq!(machine.world().toys().len(), 1, "toy vanished");

    // Reset returns every subsystem to its initial state.
    machine.reset();
    assert!(!machine.is_moving());
    assert_close(machine.path().cursor(), 0.0, 1e-6, "cursor after reset");
    assert_vec_close(
        machine.world().toys()[0].position,
        Vec3::new(0.0, 1.0, 0.0),
        1e-6,
        "toy spawn after reset",
    );
}
