/// Application-wide numeric constants. Lengths are world units; the
/// simulation runs in a fixed virtual rectangle scaled to the canvas.
pub const WORLD_W: f32 = 800.0;
pub const WORLD_H: f32 = 600.0;
/// Long half-extent of a link body.
pub const LINK_HALF_LEN: f32 = 20.0;
/// Short half-extent of a link body.
pub const LINK_HALF_THICK: f32 = 7.0;
/// Thickness of the boundary walls.
pub const WALL_THICKNESS: f32 = 20.0;
/// Margin the layout frame keeps from the walls.
pub const FRAME_MARGIN: f32 = 80.0;
pub const GRAVITY_Y: f32 = -98.1;
/// Spring parameters for the pointer drag joint.
pub const DRAG_STIFFNESS: f32 = 400.0;
pub const DRAG_DAMPING: f32 = 30.0;
