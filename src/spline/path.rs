use glam::Vec3;

use super::hermite::HermiteSegment;

/// Samples used to estimate each segment's arc length when it is added.
const LENGTH_SAMPLES: u32 = 100;

/// An ordered sequence of Hermite segments with per-segment arc-length
/// estimates, evaluated as one composite curve over `t` in `[0, 1]`.
///
/// Parameterization is arc-length-weighted: a segment covering 40% of the
/// total length owns 40% of the parameter range. Position is continuous
/// across segment boundaries when consecutive segments share an endpoint;
/// tangent continuity is the caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct HermitePath {
    segments: Vec<HermiteSegment>,
    segment_lengths: Vec<f32>,
    total_length: f32,
    cursor: f32,
}

impl HermitePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment and folds its sampled arc length into the totals.
    pub fn add_segment(&mut self, p1: Vec3, p2: Vec3, v1: Vec3, v2: Vec3) {
        let segment = HermiteSegment::new(p1, p2, v1, v2);
        let length = segment.arc_length(LENGTH_SAMPLES);
        self.segments.push(segment);
        self.segment_lengths.push(length);
        self.total_length = self.segment_lengths.iter().sum();
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[HermiteSegment] {
        &self.segments
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Position at global parameter `t`, clamped to `[0, 1]`. An empty path
    /// yields the origin.
    pub fn point_at(&self, t: f32) -> Vec3 {
        if self.segments.is_empty() {
            return Vec3::ZERO;
        }
        let t = t.clamp(0.0, 1.0);
        if self.segments.len() == 1 {
            return self.segments[0].point_at(t);
        }

        // Walk cumulative length fractions to the bracketing segment, then
        // rescale t to that segment's local parameter.
        let mut start = 0.0;
        let mut end = 0.0;
        let mut index = 0;
        for (i, length) in self.segment_lengths.iter().enumerate() {
            end = start + length / self.total_length;
            if t <= end || i == self.segment_lengths.len() - 1 {
                index = i;
                break;
            }
            start = end;
        }

        let span = end - start;
        let local = if span > f32::EPSILON {
            (t - start) / span
        } else {
            0.0
        };
        self.segments[index].point_at(local)
    }

    /// Current cursor position along the path.
    pub fn current_point(&self) -> Vec3 {
        self.point_at(self.cursor)
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0.0;
    }

    /// Advances the traversal cursor by `step` of global parameter, wrapping
    /// past the end. Returns `false` on the tick that wraps, signalling a
    /// completed loop.
    pub fn advance(&mut self, step: f32) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        self.cursor += step;
        if self.cursor > 1.0 {
            self.cursor -= 1.0;
            return false;
        }
        true
    }
}
