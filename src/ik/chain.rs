use glam::Vec3;

use super::joint::{Joint, JointLimits, RotationAxis};
use crate::math::Transform;

/// An articulated chain of revolute joints rooted at `base`, with an optional
/// end-effector point expressed in the last joint's frame.
#[derive(Debug, Clone)]
pub struct JointChain {
    pub(crate) base: Transform,
    pub(crate) joints: Vec<Joint>,
    pub(crate) end_effector: Option<Vec3>,
    pub(crate) tolerance: f32,
    pub(crate) max_iterations: u32,
    pub(crate) damping: f32,
}

impl JointChain {
    pub fn builder() -> JointChainBuilder {
        JointChainBuilder::new()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joints_mut(&mut self) -> &mut [Joint] {
        &mut self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn base(&self) -> Transform {
        self.base
    }

    pub fn set_base(&mut self, base: Transform) {
        self.base = base;
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// World transform of every joint frame, base to tip.
    pub fn world_transforms(&self) -> Vec<Transform> {
        let mut transforms = Vec::with_capacity(self.joints.len());
        let mut current = self.base;
        for joint in &self.joints {
            current = current.mul_transform(&joint.local_transform());
            transforms.push(current);
        }
        transforms
    }

    /// World position of joint `i`'s origin.
    pub fn joint_position(&self, i: usize) -> Vec3 {
        self.world_transforms()[i].position
    }

    /// World direction of joint `i`'s rotation axis.
    pub fn joint_axis(&self, i: usize) -> Vec3 {
        let transforms = self.world_transforms();
        let parent_rotation = if i == 0 {
            self.base.rotation * self.joints[0].offset.rotation
        } else {
            transforms[i - 1].rotation * self.joints[i].offset.rotation
        };
        (parent_rotation * self.joints[i].axis.axis()).normalize_or_zero()
    }

    /// World position of the end effector, or the last joint origin when no
    /// effector offset is set. None for an empty chain.
    pub fn end_effector_position(&self) -> Option<Vec3> {
        let tip = *self.world_transforms().last()?;
        Some(match self.end_effector {
            Some(local) => tip.transform_point(local),
            None => tip.position,
        })
    }

    pub fn angles(&self) -> Vec<f32> {
        self.joints.iter().map(|j| j.angle).collect()
    }

    pub fn set_angles(&mut self, angles: &[f32]) {
        for (joint, angle) in self.joints.iter_mut().zip(angles) {
            joint.set_angle(*angle);
        }
    }

    /// Returns every joint to its zero pose.
    pub fn reset(&mut self) {
        for joint in &mut self.joints {
            joint.set_angle(0.0);
        }
    }
}

pub struct JointChainBuilder {
    base: Transform,
    joints: Vec<Joint>,
    end_effector: Option<Vec3>,
    tolerance: f32,
    max_iterations: u32,
    damping: f32,
}

impl JointChainBuilder {
    pub fn new() -> Self {
        Self {
            base: Transform::IDENTITY,
            joints: Vec::new(),
            end_effector: None,
            tolerance: 0.01,
            max_iterations: 10,
            damping: 0.5,
        }
    }

    pub fn base(mut self, base: Transform) -> Self {
        self.base = base;
        self
    }

    pub fn add_joint(mut self, offset: Transform, axis: RotationAxis) -> Self {
        self.joints.push(Joint::new(offset, axis));
        self
    }

    pub fn add_joint_with_limits(
        mut self,
        offset: Transform,
        axis: RotationAxis,
        limits: JointLimits,
    ) -> Self {
        self.joints.push(Joint::new(offset, axis).with_limits(limits));
        self
    }

    pub fn end_effector(mut self, local_offset: Vec3) -> Self {
        self.end_effector = Some(local_offset);
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn build(self) -> JointChain {
        JointChain {
            base: self.base,
            joints: self.joints,
            end_effector: self.end_effector,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            damping: self.damping,
        }
    }
}

impl Default for JointChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
