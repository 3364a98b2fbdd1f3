//! Free-fly camera state and view matrix calculation.
//!
//! This module defines the [`Camera`] struct, which tracks the observer's
//! position, orientation, and movement parameters, and provides methods for
//! flight, mouse look, and view/projection matrix calculation.
//!
//! # Coordinate System
//!
//! The camera uses a right-handed coordinate system:
//! - X-axis: Left/Right
//! - Y-axis: Up/Down (height)
//! - Z-axis: Forward/Backward
//!
//! Angles are measured in degrees:
//! - **Pitch**: Up/down look angle (-89° to +89°)
//! - **Yaw**: Left/right look angle
//!
//! WASD flight happens in the horizontal plane regardless of pitch; Space and
//! Shift move the camera straight up and down. The puzzle never reads the
//! camera, so the observer can fly anywhere without affecting play.

use crate::math::deg_to_rad;
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// Near clipping plane distance for the scene projection.
pub const Z_NEAR: f32 = 0.1;
/// Far clipping plane distance for the scene projection.
pub const Z_FAR: f32 = 100.0;

/// Represents the free-fly observer above the board.
///
/// # Fields
///
/// - `position`: 3D world coordinates `[x, y, z]` where y is height
/// - `pitch`/`yaw`: look angles in degrees
/// - `fov`: vertical field of view in degrees for the perspective projection
/// - `speed`: flight speed in world units per second
/// - `mouse_sensitivity`: degrees of rotation per mouse count
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera world position `[x, y, z]`.
    pub position: [f32; 3],
    /// Pitch angle in degrees. Positive looks up; clamped to ±89° so the
    /// view never flips over.
    pub pitch: f32,
    /// Yaw angle in degrees. 0° looks down negative z.
    pub yaw: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Flight speed in units per second.
    pub speed: f32,
    /// Mouse sensitivity multiplier.
    pub mouse_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Creates a camera hovering behind and above the board, pitched down
    /// so the whole level is in view.
    pub fn new() -> Self {
        Self {
            position: [0.0, 7.0, 7.0],
            pitch: -45.0,
            yaw: 0.0,
            fov: 45.0,
            speed: 3.0,
            mouse_sensitivity: 0.2,
        }
    }

    /// Updates the camera's orientation based on mouse movement.
    ///
    /// Moving the mouse right turns the view right, moving it up tilts the
    /// view up. Pitch is clamped to [-89°, +89°] to prevent flipping.
    pub fn mouse_movement(&mut self, delta_x: f64, delta_y: f64) {
        self.yaw -= delta_x as f32 * self.mouse_sensitivity;
        self.pitch -= delta_y as f32 * self.mouse_sensitivity;

        self.pitch = self.pitch.clamp(-89.0, 89.0);
    }

    /// Flies forward in the horizontal plane along the current yaw.
    pub fn move_forward(&mut self, delta_time: f32) {
        let forward_x = self.yaw.to_radians().sin();
        let forward_z = self.yaw.to_radians().cos();
        self.position[0] -= forward_x * self.speed * delta_time;
        self.position[2] -= forward_z * self.speed * delta_time;
    }

    /// Flies backward in the horizontal plane along the current yaw.
    pub fn move_backward(&mut self, delta_time: f32) {
        let forward_x = self.yaw.to_radians().sin();
        let forward_z = self.yaw.to_radians().cos();
        self.position[0] += forward_x * self.speed * delta_time;
        self.position[2] += forward_z * self.speed * delta_time;
    }

    /// Strafes left, perpendicular to the current yaw.
    pub fn move_left(&mut self, delta_time: f32) {
        let right_x = self.yaw.to_radians().cos();
        let right_z = self.yaw.to_radians().sin();
        self.position[0] -= right_x * self.speed * delta_time;
        self.position[2] += right_z * self.speed * delta_time;
    }

    /// Strafes right, perpendicular to the current yaw.
    pub fn move_right(&mut self, delta_time: f32) {
        let right_x = self.yaw.to_radians().cos();
        let right_z = self.yaw.to_radians().sin();
        self.position[0] += right_x * self.speed * delta_time;
        self.position[2] -= right_z * self.speed * delta_time;
    }

    /// Rises straight up.
    pub fn move_up(&mut self, delta_time: f32) {
        self.position[1] += self.speed * delta_time;
    }

    /// Sinks straight down.
    pub fn move_down(&mut self, delta_time: f32) {
        self.position[1] -= self.speed * delta_time;
    }

    /// Applies one frame of flight for the currently held movement keys.
    #[allow(clippy::too_many_arguments)]
    pub fn process_movement(
        &mut self,
        delta_time: f32,
        forward: bool,
        backward: bool,
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    ) {
        if forward {
            self.move_forward(delta_time);
        }
        if backward {
            self.move_backward(delta_time);
        }
        if left {
            self.move_left(delta_time);
        }
        if right {
            self.move_right(delta_time);
        }
        if up {
            self.move_up(delta_time);
        }
        if down {
            self.move_down(delta_time);
        }
    }

    /// The full look direction, including pitch. Unit length.
    pub fn forward_vector(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }

    /// The camera's right direction in the horizontal plane. Unit length.
    pub fn right_vector(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// The camera's up direction, perpendicular to both
    /// [`forward_vector`](Camera::forward_vector) and
    /// [`right_vector`](Camera::right_vector).
    pub fn up_vector(&self) -> Vec3 {
        self.right_vector().cross(&self.forward_vector())
    }

    /// Computes the view matrix for the camera's current position and
    /// orientation: translate the world against the camera, then yaw,
    /// then pitch.
    pub fn get_view_matrix(&self) -> Mat4 {
        let pitch_matrix = Mat4::rotation_x(self.pitch);
        let yaw_matrix = Mat4::rotation_y(self.yaw);
        let translation_matrix =
            Mat4::translation(-self.position[0], -self.position[1], -self.position[2]);

        pitch_matrix
            .multiply(&yaw_matrix)
            .multiply(&translation_matrix)
    }

    /// Computes the combined view-projection matrix for rendering.
    ///
    /// # Arguments
    ///
    /// * `aspect_ratio` - Width divided by height of the viewport
    pub fn get_view_proj_matrix(&self, aspect_ratio: f32) -> Mat4 {
        let projection_matrix =
            Mat4::perspective(deg_to_rad(self.fov), aspect_ratio, Z_NEAR, Z_FAR);

        projection_matrix.multiply(&self.get_view_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that forward flight at zero yaw heads down negative z and stays
    /// level.
    #[test]
    fn test_forward_flight_at_zero_yaw() {
        let mut camera = Camera::new();
        camera.yaw = 0.0;
        let start = camera.position;

        camera.move_forward(1.0);
        assert!((camera.position[0] - start[0]).abs() < 1e-5);
        assert!((camera.position[1] - start[1]).abs() < 1e-5);
        assert!(
            camera.position[2] < start[2],
            "forward at yaw 0 must decrease z"
        );
    }

    /// Tests that strafing right at zero yaw heads down positive x.
    #[test]
    fn test_strafe_right_at_zero_yaw() {
        let mut camera = Camera::new();
        camera.yaw = 0.0;
        let start = camera.position;

        camera.move_right(1.0);
        assert!(
            camera.position[0] > start[0],
            "strafe right at yaw 0 must increase x"
        );
        assert!((camera.position[2] - start[2]).abs() < 1e-5);
    }

    /// Tests that pitch stays clamped no matter how far the mouse moves.
    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::new();
        camera.mouse_movement(0.0, -100000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.mouse_movement(0.0, 100000.0);
        assert_eq!(camera.pitch, -89.0);
    }

    /// Tests that the camera basis stays orthonormal at an arbitrary
    /// orientation.
    #[test]
    fn test_basis_vectors_orthonormal() {
        let mut camera = Camera::new();
        camera.yaw = 37.0;
        camera.pitch = -20.0;

        let forward = camera.forward_vector();
        let right = camera.right_vector();
        let up = camera.up_vector();

        assert!((forward.length() - 1.0).abs() < 1e-5, "forward not unit");
        assert!((right.length() - 1.0).abs() < 1e-5, "right not unit");
        assert!((up.length() - 1.0).abs() < 1e-5, "up not unit");
        assert!(forward.dot(&right).abs() < 1e-5, "forward/right not orthogonal");
        assert!(forward.dot(&up).abs() < 1e-5, "forward/up not orthogonal");
        assert!(right.dot(&up).abs() < 1e-5, "right/up not orthogonal");
    }

    /// Tests that the view matrix moves the eye to the origin and points the
    /// look direction down negative z, at an arbitrary orientation.
    #[test]
    fn test_view_matrix_centers_eye() {
        let mut camera = Camera::new();
        camera.position = [3.0, 4.0, -2.0];
        camera.yaw = 25.0;
        camera.pitch = -30.0;

        let view = camera.get_view_matrix();
        let apply = |p: [f32; 3]| -> [f32; 4] {
            let v = [p[0], p[1], p[2], 1.0];
            let mut out = [0.0f32; 4];
            for (j, slot) in out.iter_mut().enumerate() {
                *slot = (0..4).map(|i| v[i] * view.0[i][j]).sum();
            }
            out
        };

        let eye = apply(camera.position);
        for (axis, value) in ["x", "y", "z"].iter().zip(eye) {
            assert!(value.abs() < 1e-4, "eye {} must land at the origin, got {}", axis, value);
        }

        let forward = camera.forward_vector();
        let ahead = apply([
            camera.position[0] + forward.x(),
            camera.position[1] + forward.y(),
            camera.position[2] + forward.z(),
        ]);
        assert!(ahead[0].abs() < 1e-4, "look target must center on x");
        assert!(ahead[1].abs() < 1e-4, "look target must center on y");
        assert!(
            (ahead[2] + 1.0).abs() < 1e-4,
            "one step ahead must sit one unit down negative z, got {}",
            ahead[2]
        );
    }
}
