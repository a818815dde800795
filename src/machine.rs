use glam::Vec3;
use log::debug;

use crate::error::SimError;
use crate::ik::{IkSolver, JointChain, SolveResult};
use crate::math::Transform;
use crate::spline::HermitePath;
use crate::spring::ChainRig;
use crate::toy::{ToyEvent, ToyWorld};

/// Vertical offset from the suspension tail to the grabber's IK target.
const GRAB_TARGET_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);

/// Per-frame orchestration of the whole machine.
///
/// Each update runs the fixed pipeline: advance the trolley along its path,
/// pin the suspension chain's anchor to the sampled position and step the
/// spring simulation, pose the grabber's joint chain toward the swinging
/// tail, then step the free toys. Stages communicate only through positions,
/// so each subsystem stays independently testable.
pub struct ClawMachine {
    path: HermitePath,
    path_speed: f32,
    rig: ChainRig,
    grabber: Option<JointChain>,
    world: ToyWorld,
    moving: bool,
    last_solve: Option<SolveResult>,
}

impl ClawMachine {
    pub fn new(path: HermitePath, rig: ChainRig, world: ToyWorld) -> Self {
        Self {
            path,
            path_speed: 1.0,
            rig,
            grabber: None,
            world,
            moving: false,
            last_solve: None,
        }
    }

    /// Attaches an articulated grabber posed by IK every update.
    pub fn with_grabber(mut self, grabber: JointChain) -> Self {
        self.grabber = Some(grabber);
        self
    }

    /// Trolley traversal speed in world units per second.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.path_speed = speed;
        self
    }

    /// Starts or stops trolley motion along the path.
    pub fn move_claw(&mut self) -> bool {
        self.moving = !self.moving;
        debug!("claw moving: {}", self.moving);
        self.moving
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Toggles gravity for both the suspension chain and the toys.
    pub fn toggle_gravity(&mut self) -> bool {
        let enabled = self.rig.simulation_mut().toggle_gravity();
        self.world.toggle_gravity();
        enabled
    }

    /// Advances every subsystem by one frame and returns the toy events it
    /// produced.
    pub fn update(&mut self, dt: f32) -> Result<Vec<ToyEvent>, SimError> {
        if self.moving && self.path.total_length() > 0.0 {
            self.path.advance(self.path_speed * dt / self.path.total_length());
        }
        self.rig.set_anchor(self.path.current_point());
        self.rig.update(dt)?;

        if let Some(grabber) = &mut self.grabber {
            let tail = self.rig.tail_position();
            grabber.set_base(Transform::from_position(tail));
            self.last_solve = Some(IkSolver::solve(grabber, tail + GRAB_TARGET_OFFSET));
        }

        Ok(self.world.step(dt))
    }

    /// Result of the most recent grabber solve, if a grabber is attached and
    /// at least one update has run.
    pub fn last_solve(&self) -> Option<SolveResult> {
        self.last_solve
    }

    /// World position of the suspension chain's tail.
    pub fn claw_position(&self) -> Vec3 {
        self.rig.tail_position()
    }

    pub fn path(&self) -> &HermitePath {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut HermitePath {
        &mut self.path
    }

    pub fn rig(&self) -> &ChainRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut ChainRig {
        &mut self.rig
    }

    pub fn grabber(&self) -> Option<&JointChain> {
        self.grabber.as_ref()
    }

    pub fn world(&self) -> &ToyWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ToyWorld {
        &mut self.world
    }

    /// Returns the machine to its initial state: path cursor at zero, chain
    /// at rest, grabber in the zero pose, toys back at their spawn points.
    pub fn reset(&mut self) {
        self.moving = false;
        self.path.reset_cursor();
        self.rig.reset();
        if let Some(grabber) = &mut self.grabber {
            grabber.reset();
        }
        for i in 0..self.world.toys().len() {
            self.world.reset_toy(i);
        }
        self.last_solve = None;
    }
}
