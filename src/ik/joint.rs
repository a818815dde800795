use glam::{Quat, Vec3};

use crate::math::Transform;

/// Local rotation axis of a hinge joint, fixed in the joint's parent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    X,
    NegX,
    Y,
    NegY,
    Z,
    NegZ,
}

impl RotationAxis {
    pub fn axis(self) -> Vec3 {
        match self {
            RotationAxis::X => Vec3::X,
            RotationAxis::NegX => -Vec3::X,
            RotationAxis::Y => Vec3::Y,
            RotationAxis::NegY => -Vec3::Y,
            RotationAxis::Z => Vec3::Z,
            RotationAxis::NegZ => -Vec3::Z,
        }
    }
}

/// Inclusive angle range a joint may take, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    pub min: f32,
    pub max: f32,
}

impl JointLimits {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn unlimited() -> Self {
        Self {
            min: f32::NEG_INFINITY,
            max: f32::INFINITY,
        }
    }

    pub fn clamp(&self, angle: f32) -> f32 {
        angle.clamp(self.min, self.max)
    }
}

/// A single-axis revolute joint. `offset` places the joint relative to its
/// parent; `angle` is its one degree of freedom about `axis`.
#[derive(Debug, Clone)]
pub struct Joint {
    pub offset: Transform,
    pub axis: RotationAxis,
    pub limits: JointLimits,
    pub angle: f32,
}

impl Joint {
    pub fn new(offset: Transform, axis: RotationAxis) -> Self {
        Self {
            offset,
            axis,
            limits: JointLimits::unlimited(),
            angle: 0.0,
        }
    }

    pub fn with_limits(mut self, limits: JointLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = self.limits.clamp(angle);
        self
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = self.limits.clamp(angle);
    }

    /// Transform from the parent frame to this joint's rotated frame.
    pub fn local_transform(&self) -> Transform {
        let spin = Quat::from_axis_angle(self.axis.axis(), self.angle);
        Transform {
            position: self.offset.position,
            rotation: self.offset.rotation * spin,
            scale: self.offset.scale,
        }
    }
}
