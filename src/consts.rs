// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Offset along a secondary ray's direction, so that shadow and reflection
// rays do not hit the surface they leave from.
pub const BOUNCE_OFFSET: f64 = 0.001;

// Triangles whose projected determinants are all below this are colinear.
pub const DEGENERATE_TOLERANCE: f64 = 0.001;

// Smallest magnitude accepted for a scaling factor.
pub const SCALE_EPSILON: f64 = 1e-9;

// Maximum recursion depth
pub const MAX_BOUNCES: usize = 5;

// Runtime defaults
pub const DEFAULT_WIDTH: usize = 700;
pub const DEFAULT_HEIGHT: usize = 700;
