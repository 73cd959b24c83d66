pub const UNKNOWN: i8 = -1;
pub const FREE: i8 = 0;
pub const OCCUPIED: i8 = 100;

/// Lower bound on the traversal safety limit, in steps.
pub const MIN_TRAVERSAL_LIMIT: usize = 3;

/// Relative slack, in cell counts, within which a derived grid dimension is
/// treated as an exact multiple of the resolution. Covers f32 rounding of
/// `(max - min) / resolution` only.
pub const DIM_RELATIVE_TOLERANCE: f32 = 4.0 * f32::EPSILON;
