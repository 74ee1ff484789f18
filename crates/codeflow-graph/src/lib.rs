pub mod canvas;
pub mod edge_router;
pub mod explanation;
pub mod geometry;
pub mod graph;
pub mod hit_tester;
pub mod minimap;
pub mod projection;
pub mod style;
pub mod viewport;

pub use canvas::{CanvasScene, FIT_PADDING, FullscreenCanvas, InlineCanvas, fallback_graph};
pub use edge_router::{CubicBezier, EdgeRoute, EdgeRouter};
pub use explanation::{ExplanationRow, ExplanationView};
pub use geometry::{Rect, Vec2};
pub use graph::{EdgeIndex, GraphEdge, GraphError, GraphModel, GraphNode, NodeIndex};
pub use hit_tester::{HitResult, HitTester};
pub use minimap::{Minimap, MinimapGlyph};
pub use projection::{LayoutProjector, ProjectedGraph};
pub use style::{
    Color, EdgeStyle, NodeColors, NodeShape, NodeVisual, get_edge_style, get_kind_badge_colors,
    get_minimap_color, get_node_colors,
};
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Viewport};
