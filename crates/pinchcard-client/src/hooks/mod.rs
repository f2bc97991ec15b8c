mod use_frame_loop;
mod use_mouse_position;

pub use use_frame_loop::*;
pub use use_mouse_position::use_mouse_position;
