use crate::math::deg_to_rad;
use crate::math::vec::Vec3;

#[repr(transparent)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Mat4([
            [2.0 / (right - left), 0.0, 0.0, 0.0],
            [0.0, 2.0 / (top - bottom), 0.0, 0.0],
            [0.0, 0.0, 1.0 / (near - far), 0.0],
            [
                (right + left) / (left - right),
                (top + bottom) / (bottom - top),
                near / (near - far),
                1.0,
            ],
        ])
    }

    pub fn perspective(
        field_of_view_y_in_radians: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Mat4 {
        let f = 1.0 / (field_of_view_y_in_radians * 0.5).tan();
        let range_reciprocal = 1.0 / (z_near - z_far);

        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, z_far * range_reciprocal, -1.0], // Depth lands in [0, 1] for wgpu
            [0.0, 0.0, z_far * z_near * range_reciprocal, 0.0],
        ])
    }

    /// Builds a view matrix looking from `eye` toward `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = target.subtract(&eye).normalize();
        let side = forward.cross(&up).normalize();
        let camera_up = side.cross(&forward);

        Mat4([
            [side.x(), camera_up.x(), -forward.x(), 0.0],
            [side.y(), camera_up.y(), -forward.y(), 0.0],
            [side.z(), camera_up.z(), -forward.z(), 0.0],
            [
                -side.dot(&eye),
                -camera_up.dot(&eye),
                forward.dot(&eye),
                1.0,
            ],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle_in_degrees: f32) -> Mat4 {
        let c = (deg_to_rad(angle_in_degrees)).cos();
        let s = (deg_to_rad(angle_in_degrees)).sin();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle_in_degrees: f32) -> Mat4 {
        let c = (deg_to_rad(angle_in_degrees)).cos();
        let s = (deg_to_rad(angle_in_degrees)).sin();
        Mat4([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Composes two transforms. `a.multiply(&b)` applies `b` first, then `a`,
    /// matching the shader-side `matrix * vector` convention this layout uploads.
    pub fn multiply(&self, b: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| b.0[i][k] * self.0[k][j]).sum();
            }
        }
        Mat4(result)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Applies `m` to a point the same way the shaders do (`matrix * vec4(p, 1.0)`
    /// after the row-major upload lands column-wise on the GPU).
    fn transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
        let v = [p[0], p[1], p[2], 1.0];
        let mut out = [0.0f32; 4];
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|i| v[i] * m.0[i][j]).sum();
        }
        out
    }

    fn assert_close(actual: f32, expected: f32, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Tests that a translation matrix moves a point by the given offset.
    #[test]
    fn test_translation_moves_point() {
        let out = transform_point(&Mat4::translation(1.0, 2.0, 3.0), [0.5, 0.0, -0.5]);
        assert_close(out[0], 1.5, "x after translation");
        assert_close(out[1], 2.0, "y after translation");
        assert_close(out[2], 2.5, "z after translation");
        assert_close(out[3], 1.0, "w after translation");
    }

    /// Tests that `a.multiply(&b)` applies `b` before `a`.
    #[test]
    fn test_multiply_applies_argument_first() {
        let scale_then_move = Mat4::translation(5.0, 0.0, 0.0).multiply(&Mat4::scaling(2.0, 2.0, 2.0));
        let out = transform_point(&scale_then_move, [1.0, 0.0, 0.0]);
        assert_close(out[0], 7.0, "scale by 2 then move by 5");
    }

    /// Tests that the orthographic projection maps the near plane to depth 0
    /// and the far plane to depth 1.
    #[test]
    fn test_ortho_depth_range() {
        let ortho = Mat4::ortho(-10.0, 10.0, -10.0, 10.0, 1.0, 15.0);
        let near = transform_point(&ortho, [0.0, 0.0, -1.0]);
        let far = transform_point(&ortho, [0.0, 0.0, -15.0]);
        assert_close(near[2], 0.0, "near plane depth");
        assert_close(far[2], 1.0, "far plane depth");
    }

    /// Tests that perspective projection writes the view-space distance into w.
    #[test]
    fn test_perspective_w_is_view_distance() {
        let proj = Mat4::perspective(crate::math::deg_to_rad(45.0), 1080.0 / 700.0, 0.1, 100.0);
        let out = transform_point(&proj, [0.0, 0.0, -5.0]);
        assert_close(out[3], 5.0, "clip-space w for a point 5 units ahead");
        let depth = out[2] / out[3];
        assert!(
            (0.0..=1.0).contains(&depth),
            "depth should land in [0, 1], got {}",
            depth
        );
    }

    /// Tests that a look_at view matrix puts the target straight ahead of the eye.
    #[test]
    fn test_look_at_centers_target() {
        let view = Mat4::look_at(
            Vec3::new(0.0, 7.0, 7.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let out = transform_point(&view, [0.0, 0.0, 0.0]);
        assert_close(out[0], 0.0, "target x in view space");
        assert_close(out[1], 0.0, "target y in view space");
        assert_close(out[2], -(98.0f32).sqrt(), "target depth in view space");
    }

    /// Tests the combined light-space transform used for shadow mapping: a point
    /// on the board must fall inside the depth range the shadow map stores.
    #[test]
    fn test_light_space_depth_in_range() {
        let light_view = Mat4::look_at(
            Vec3::new(-2.0, 7.0, 2.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let light_space = Mat4::ortho(-10.0, 10.0, -10.0, 10.0, 1.0, 15.0).multiply(&light_view);
        let out = transform_point(&light_space, [0.0, 0.0, 0.0]);
        assert!(
            out[2] > 0.0 && out[2] < 1.0,
            "board center depth should be strictly inside (0, 1), got {}",
            out[2]
        );
        assert!(
            out[0].abs() <= 1.0 && out[1].abs() <= 1.0,
            "board center should project inside the ortho box, got ({}, {})",
            out[0],
            out[1]
        );
    }

    /// Tests the yaw rotation direction used for camera strafing.
    #[test]
    fn test_rotation_y_quarter_turn() {
        let out = transform_point(&Mat4::rotation_y(90.0), [1.0, 0.0, 0.0]);
        assert_close(out[0], 0.0, "x after quarter turn");
        assert_close(out[2], 1.0, "z after quarter turn");
    }
}
