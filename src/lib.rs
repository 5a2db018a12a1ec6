#[cfg(feature = "cli")]
pub mod cli;
pub mod compose;
pub mod geometry;
pub mod graph;
pub mod layers;
pub mod prefs;
pub mod render;
pub mod selection;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use compose::{compose_scene, Scene};
pub use geometry::BoundingBox;
pub use graph::{Graph, NormalizedNodes};
pub use layers::MapLayer;
pub use prefs::{PreferenceStore, Preferences};
pub use render::render_svg;
pub use selection::{Selection, SelectionState};
pub use theme::Theme;
pub use viewport::ViewportController;
