mod cursor;
mod overlay;
mod scene_view;

pub use cursor::{HandCursor, MouseCursor};
pub use overlay::{FadeOverlay, NoticeBanner};
pub use scene_view::SceneView;
