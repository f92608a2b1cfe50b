//! View construction: pure builders that turn session state into flat
//! [`draw::DrawList`]s for the renderer.

/// Draw commands and the shared color palette.
pub mod draw;
/// First-person nested-slice corridor projection.
pub mod projector;
/// Full-screen map and corner minimap.
pub mod topdown;

pub use draw::{Color, DrawCmd, DrawList};
pub use projector::{VIEW_DEPTH, project};
pub use topdown::{MINIMAP_CELL, MINIMAP_ORIGIN, TOPDOWN_CELL, minimap_overlay, topdown_view};
