use std::f32::consts::FRAC_PI_2;

use claw_sim::{
    Aabb, ChainRig, ClawMachine, HermitePath, JointChain, JointLimits, RotationAxis, Toy,
    ToyEvent, ToyWorld, Transform,
};
use glam::Vec3;

/// Closed square loop at gantry height: four Hermite segments whose shared
/// endpoint tangents keep the corners smooth.
fn gantry_path() -> HermitePath {
    let height = 6.0;
    let radius = 3.0;
    let corners = [
        Vec3::new(radius, height, radius),
        Vec3::new(-radius, height, radius),
        Vec3::new(-radius, height, -radius),
        Vec3::new(radius, height, -radius),
    ];
    let tangents = [
        Vec3::new(-radius, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -radius),
        Vec3::new(radius, 0.0, 0.0),
        Vec3::new(0.0, 0.0, radius),
    ];

    let mut path = HermitePath::new();
    for i in 0..4 {
        let j = (i + 1) % 4;
        path.add_segment(corners[i], corners[j], tangents[i] * 2.0, tangents[j] * 2.0);
    }
    path
}

fn grabber_chain() -> JointChain {
    JointChain::builder()
        .add_joint_with_limits(
            Transform::IDENTITY,
            RotationAxis::Y,
            JointLimits::new(-FRAC_PI_2, FRAC_PI_2),
        )
        .add_joint_with_limits(
            Transform::from_position(Vec3::new(0.0, -0.8, 0.0)),
            RotationAxis::X,
            JointLimits::new(0.0, FRAC_PI_2),
        )
        .end_effector(Vec3::new(0.0, -1.0, 0.0))
        .build()
}

fn main() {
    env_logger::init();

    let path = gantry_path();
    let rig = ChainRig::claw(path.point_at(0.0));

    let bounds = Aabb::from_center_half_extents(Vec3::new(0.0, 4.0, 0.0), Vec3::splat(4.0));
    let collection = Aabb::new(Vec3::new(2.0, 0.0, 2.0), Vec3::new(3.8, 1.5, 3.8));
    let mut world = ToyWorld::new(bounds, collection);

    world.add_toy(Toy::new("bear", Vec3::new(-1.0, 2.0, 0.5), 0.4, 1.0));
    world.add_toy(Toy::new("duck", Vec3::new(0.8, 3.0, -0.6), 0.35, 0.8));
    world.add_toy(
        Toy::new("whale", Vec3::new(0.0, 1.5, 1.2), 0.5, 1.5)
            .with_velocity(Vec3::new(1.5, 0.0, -0.5)),
    );
    // A dropped toy headed straight for the collection chute.
    world.add_toy(Toy::new("star", Vec3::new(2.9, 4.0, 2.9), 0.3, 0.6));

    // Low divider wall between the pile and the chute corner.
    world.add_barrier(Aabb::new(Vec3::new(1.6, 0.0, -4.0), Vec3::new(1.9, 0.8, 1.6)));

    let mut machine = ClawMachine::new(path, rig, world)
        .with_grabber(grabber_chain())
        .with_speed(2.0);
    machine.move_claw();

    let dt = 1.0 / 60.0;
    let frames = 60 * 20;

    println!("running {frames} frames of claw machine simulation");
    for frame in 0..frames {
        let events = match machine.update(dt) {
            Ok(events) => events,
            Err(err) => {
                eprintln!("simulation error at frame {frame}: {err}");
                return;
            }
        };
        for event in events {
            let t = frame as f32 * dt;
            match event {
                ToyEvent::Collected { name } => println!("[{t:6.2}s] collected {name}"),
                ToyEvent::Reset { name } => println!("[{t:6.2}s] reset {name}"),
            }
        }
    }

    let world = machine.world();
    println!(
        "done: {} collected, {} still in play, claw at {:?}",
        world.collected_count(),
        world.toys().len(),
        machine.claw_position(),
    );
    if let Some(solve) = machine.last_solve() {
        println!(
            "grabber solve: converged={} iterations={} distance={:.4}",
            solve.converged, solve.iterations, solve.final_distance
        );
    }
}
