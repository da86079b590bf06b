mod choropleth;
mod geometry;
mod projection;
mod spatial;

pub use choropleth::{render_choropleth, render_outline, ColorScale, MapLayers, RenderOptions, NO_DATA_COLOR, PALETTE};
pub use geometry::draw_line;
pub use projection::Viewport;
pub use spatial::FeatureGrid;
