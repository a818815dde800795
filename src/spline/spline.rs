use glam::Vec3;

use super::hermite::hermite_basis;

/// Resolution of the arc-length lookup table.
const TABLE_SAMPLES: usize = 1000;

/// Estimates Catmull-Rom tangents for a point list with wraparound indices:
/// `tangent_i = alpha * (p[i+1] - p[i-1])`. Duplicate neighbours yield a zero
/// tangent.
pub fn catmull_rom_tangents(points: &[Vec3], alpha: f32) -> Vec<Vec3> {
    let n = points.len();
    if n < 2 {
        return vec![Vec3::ZERO; n];
    }
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            (next - prev) * alpha
        })
        .collect()
}

/// A curve through an ordered list of (point, tangent) pairs, interpolated
/// with a cubic Hermite between each bracketing pair. Tangent magnitudes are
/// divided by `size - 1` so traversal speed stays comparable across the whole
/// parameter range.
///
/// A cumulative arc-length table is rebuilt after every mutation; that is
/// O(samples) and intended for edit-time, not per-frame use.
#[derive(Debug, Clone, Default)]
pub struct Spline {
    points: Vec<Vec3>,
    tangents: Vec<Vec3>,
    table: Vec<f32>,
}

impl Spline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a spline through `points` with Catmull-Rom tangent estimates.
    /// Open splines still use wraparound neighbours at the ends, matching the
    /// tangent estimator.
    pub fn from_catmull_rom(points: &[Vec3], alpha: f32) -> Self {
        let tangents = catmull_rom_tangents(points, alpha);
        let mut spline = Self {
            points: points.to_vec(),
            tangents,
            table: Vec::new(),
        };
        spline.rebuild_table();
        spline
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn add_point(&mut self, point: Vec3, tangent: Vec3) {
        self.points.push(point);
        self.tangents.push(tangent);
        self.rebuild_table();
    }

    /// Replaces the point at `index`; out-of-range indices are ignored.
    pub fn set_point(&mut self, index: usize, point: Vec3) {
        if let Some(p) = self.points.get_mut(index) {
            *p = point;
            self.rebuild_table();
        }
    }

    /// Replaces the tangent at `index`; out-of-range indices are ignored.
    pub fn set_tangent(&mut self, index: usize, tangent: Vec3) {
        if let Some(t) = self.tangents.get_mut(index) {
            *t = tangent;
            self.rebuild_table();
        }
    }

    /// Position at global parameter `t` in `[0, 1]`. Degenerates to the sole
    /// point (or the origin) below two points.
    pub fn position_at(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        match n {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }

        let t = t.clamp(0.0, 1.0);
        let spans = (n - 1) as f32;
        let scaled = t * spans;
        let mut index = scaled.floor() as usize;
        if index >= n - 1 {
            index = n - 2;
        }
        let local = scaled - index as f32;

        let scale = 1.0 / spans;
        let [h00, h10, h01, h11] = hermite_basis(local);
        self.points[index] * h00
            + self.tangents[index] * (scale * h10)
            + self.points[index + 1] * h01
            + self.tangents[index + 1] * (scale * h11)
    }

    /// Total arc length from the lookup table.
    pub fn arc_length(&self) -> f32 {
        self.table.last().copied().unwrap_or(0.0)
    }

    /// Cumulative arc-length table; entry `i` is the length covered up to
    /// sample `i`. Non-decreasing by construction.
    pub fn arc_length_table(&self) -> &[f32] {
        &self.table
    }

    fn rebuild_table(&mut self) {
        self.table.clear();
        self.table.push(0.0);
        if self.points.len() < 2 {
            return;
        }
        let mut prev = self.position_at(0.0);
        let mut total = 0.0;
        for i in 1..=TABLE_SAMPLES {
            let t = i as f32 / TABLE_SAMPLES as f32;
            let point = self.position_at(t);
            total += point.distance(prev);
            self.table.push(total);
            prev = point;
        }
    }
}
