use crate::geometry::{Rect, Vec2};
use crate::graph::{EdgeIndex, GraphModel};

/// A cubic bezier curve segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    /// Sample the curve at parameter t [0, 1]
    pub fn sample(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = self.start.x * mt3
            + 3.0 * self.control1.x * mt2 * t
            + 3.0 * self.control2.x * mt * t2
            + self.end.x * t3;
        let y = self.start.y * mt3
            + 3.0 * self.control1.y * mt2 * t
            + 3.0 * self.control2.y * mt * t2
            + self.end.y * t3;

        Vec2::new(x, y)
    }

    /// Minimum distance from `point` to the curve, approximated by uniform sampling.
    pub fn point_distance(&self, point: Vec2, num_samples: usize) -> f32 {
        let samples = num_samples.max(2);
        (0..=samples)
            .map(|i| self.sample(i as f32 / samples as f32).distance(point))
            .fold(f32::INFINITY, f32::min)
    }

    pub fn midpoint(&self) -> Vec2 {
        self.sample(0.5)
    }

    pub fn map(&self, f: impl Fn(Vec2) -> Vec2) -> Self {
        Self {
            start: f(self.start),
            control1: f(self.control1),
            control2: f(self.control2),
            end: f(self.end),
        }
    }
}

/// A routed edge in graph space.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    pub edge: EdgeIndex,
    pub curve: CubicBezier,
    pub label: Option<String>,
    pub label_pos: Vec2,
}

/// Routes flowchart edges top-to-bottom: each edge leaves its source at the
/// bottom-center anchor and enters its target at the top-center anchor.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRouter {
    /// Control point offset as a fraction of the vertical distance.
    pub curvature: f32,
    /// Lower bound on the control point offset so short or upward edges still bow.
    pub min_offset: f32,
}

impl Default for EdgeRouter {
    fn default() -> Self {
        Self {
            curvature: 0.5,
            min_offset: 30.0,
        }
    }
}

impl EdgeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit_anchor(rect: Rect) -> Vec2 {
        rect.center_bottom()
    }

    pub fn entry_anchor(rect: Rect) -> Vec2 {
        rect.center_top()
    }

    pub fn route_edge(&self, source_rect: Rect, target_rect: Rect) -> CubicBezier {
        let start = Self::exit_anchor(source_rect);
        let end = Self::entry_anchor(target_rect);
        let offset = ((end.y - start.y).abs() * self.curvature).max(self.min_offset);
        CubicBezier {
            start,
            control1: Vec2::new(start.x, start.y + offset),
            control2: Vec2::new(end.x, end.y - offset),
            end,
        }
    }

    pub fn route_all(&self, model: &GraphModel) -> Vec<EdgeRoute> {
        model
            .edges()
            .map(|(idx, edge)| {
                let curve = self.route_edge(model[edge.source].rect(), model[edge.target].rect());
                EdgeRoute {
                    edge: idx,
                    curve,
                    label: edge.label.clone(),
                    label_pos: curve.midpoint(),
                }
            })
            .collect()
    }
}
