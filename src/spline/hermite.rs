use glam::Vec3;

/// Cubic Hermite basis evaluated at `t`, returned as `[h00, h10, h01, h11]`.
///
/// `h00` and `h01` weight the endpoint positions, `h10` and `h11` the
/// endpoint tangents.
pub fn hermite_basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

/// Derivatives of the Hermite basis at `t`, same ordering as [`hermite_basis`].
pub fn hermite_basis_derivative(t: f32) -> [f32; 4] {
    let t2 = t * t;
    [
        6.0 * t2 - 6.0 * t,
        3.0 * t2 - 4.0 * t + 1.0,
        -6.0 * t2 + 6.0 * t,
        3.0 * t2 - 2.0 * t,
    ]
}

/// A single cubic Hermite curve segment defined by two endpoint positions and
/// two endpoint tangents. Evaluation is stateless over `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct HermiteSegment {
    pub p1: Vec3,
    pub p2: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl HermiteSegment {
    pub fn new(p1: Vec3, p2: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { p1, p2, v1, v2 }
    }

    /// Position on the segment at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let [h00, h10, h01, h11] = hermite_basis(t);
        self.p1 * h00 + self.v1 * h10 + self.p2 * h01 + self.v2 * h11
    }

    /// Unit tangent at parameter `t`. Zero vector when the derivative
    /// degenerates (coincident control points).
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let [d00, d10, d01, d11] = hermite_basis_derivative(t);
        (self.p1 * d00 + self.v1 * d10 + self.p2 * d01 + self.v2 * d11).normalize_or_zero()
    }

    /// Approximate arc length by sampling the segment at `samples` steps and
    /// summing chord lengths.
    pub fn arc_length(&self, samples: u32) -> f32 {
        let samples = samples.max(1);
        let mut length = 0.0;
        let mut prev = self.point_at(0.0);
        for i in 1..=samples {
            let t = i as f32 / samples as f32;
            let point = self.point_at(t);
            length += point.distance(prev);
            prev = point;
        }
        length
    }
}
