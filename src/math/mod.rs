//! Math types for the renderer and game logic: matrices, vectors, and angle
//! conversions. Everything is laid out so it can be cast straight into WGPU
//! buffers.
//!
//! The [`mat`] module holds matrix operations, the [`vec`] module vector
//! operations; angle conversions live at the root.

pub mod mat;
pub mod vec;

/// Converts degrees to radians, wrapping the input into [0, 360) first.
///
/// # Example
/// ```
/// use bodega::math::deg_to_rad;
///
/// assert_eq!(deg_to_rad(180.0), std::f32::consts::PI);
///
/// // Wrapped before converting
/// assert_eq!(deg_to_rad(540.0), std::f32::consts::PI);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (std::f32::consts::PI / 180.0)
}

/// Converts radians to degrees, wrapping the input into [0, 2π) first.
#[allow(dead_code)]
pub fn rad_to_deg(radians: f32) -> f32 {
    (radians % (2.0 * std::f32::consts::PI)) * (180.0 / std::f32::consts::PI)
}
