// Court dimensions (regulation full court) and fixed display sizes
pub const COURT_FEET_WIDTH: f32 = 94.0; // baseline to baseline
pub const COURT_FEET_HEIGHT: f32 = 50.0; // sideline to sideline
pub const COURT_PIXEL_WIDTH: f32 = 846.0; // 9 px per foot

pub const MARKER_RADIUS: f32 = 9.0; // referee marker, pixels
pub const BALL_RADIUS: f32 = 11.0; // pixels
