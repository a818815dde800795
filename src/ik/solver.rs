use glam::Vec3;

use super::chain::JointChain;

/// Outcome of a solve pass.
#[derive(Debug, Clone, Copy)]
pub struct SolveResult {
    pub converged: bool,
    pub iterations: u32,
    pub final_distance: f32,
}

/// Minimum angle change worth applying, radians.
const ACTIVATION_THRESHOLD: f32 = 0.001;

/// Iterative per-joint heuristic solver.
///
/// Each pass sweeps the joints tip to base. For every joint it projects the
/// position error onto the direction the end effector moves when that joint
/// rotates (the cross of the joint's world axis with the lever arm), scales
/// by the chain's damping and applies the clamped delta immediately, so later
/// joints in the sweep see the updated pose. This is a coordinate-descent
/// relative of the Jacobian-transpose method; it does not converge to exact
/// poses but settles into natural-looking ones within a few passes, which is
/// what an animated grabber wants.
pub struct IkSolver;

impl IkSolver {
    pub fn solve(chain: &mut JointChain, target: Vec3) -> SolveResult {
        if chain.joints.is_empty() {
            return SolveResult {
                converged: false,
                iterations: 0,
                final_distance: 0.0,
            };
        }
        let Some(mut end_effector) = chain.end_effector_position() else {
            return SolveResult {
                converged: false,
                iterations: 0,
                final_distance: 0.0,
            };
        };

        let tolerance = chain.tolerance;
        let damping = chain.damping;
        let mut iterations = 0;

        for _ in 0..chain.max_iterations {
            let error = target - end_effector;
            if error.length() < tolerance {
                break;
            }
            iterations += 1;
            let mut within_tolerance = false;

            for i in (0..chain.joints.len()).rev() {
                let joint_position = chain.joint_position(i);
                let axis = chain.joint_axis(i);
                let lever = end_effector - joint_position;
                let error = target - end_effector;

                let mut delta = axis.cross(lever).dot(error) * damping;

                let joint = &chain.joints[i];
                let clamped = joint.limits.clamp(joint.angle + delta);
                delta = clamped - joint.angle;

                if delta.abs() > ACTIVATION_THRESHOLD {
                    chain.joints[i].angle = clamped;
                    // Later joints in the sweep react to the new pose.
                    end_effector = chain
                        .end_effector_position()
                        .unwrap_or(end_effector);
                    if (target - end_effector).length() < tolerance {
                        within_tolerance = true;
                        break;
                    }
                }
            }

            if within_tolerance {
                break;
            }
        }

        let final_distance = chain
            .end_effector_position()
            .map(|p| (target - p).length())
            .unwrap_or(f32::INFINITY);

        SolveResult {
            // Full convergence is rare for a damped heuristic; close enough
            // counts as success for pose tracking.
            converged: final_distance < tolerance * 10.0,
            iterations,
            final_distance,
        }
    }
}
