//! Model/view/projection transforms.
//!
//! Conventions, fixed for the whole engine:
//! - right-handed coordinate system, column vectors (`M * v`)
//! - model matrix composes translation * rotation * scale, so scale
//!   applies first and translation last
//! - clip-space depth is 0..1 to match wgpu
//!
//! All math is [`glam`]; this module only pins the conventions and the
//! composition order so every call site agrees.

use glam::{Mat4, Quat, Vec3};

/// Position/orientation/scale of one object in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// The model matrix: `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Rotation of `degrees` around `axis` (normalized internally).
pub fn rotation_degrees(axis: Vec3, degrees: f32) -> Quat {
    Quat::from_axis_angle(axis.normalize(), degrees.to_radians())
}

/// View matrix for an axis-aligned camera at `camera_offset`: the world
/// is translated by the negated offset.
pub fn view(camera_offset: Vec3) -> Mat4 {
    Mat4::from_translation(-camera_offset)
}

/// View matrix looking from `eye` toward `target`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Perspective projection with a vertical field of view in degrees.
///
/// Depth maps to 0..1 (near plane at 0), the clip convention the depth
/// attachment is cleared and compared against.
pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(0.0 < near && near < far);
    Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect_ratio, near, far)
}

/// Orthographic projection over an explicit box, 0..1 depth.
pub fn orthographic(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Mat4 {
    Mat4::orthographic_rh(left, right, bottom, top, near, far)
}

/// Composes the full pipeline for column vectors:
/// `clip = projection * view * model * vertex`.
pub fn mvp(model: Mat4, view: Mat4, projection: Mat4) -> Mat4 {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn model_applies_scale_then_rotation_then_translation() {
        let t = Transform {
            translation: Vec3::new(0.0, 0.0, 5.0),
            rotation: rotation_degrees(Vec3::Z, 90.0),
            scale: Vec3::splat(2.0),
        };
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (0,2,5)
        let p = t.matrix().transform_point3(Vec3::X);
        assert_vec3_near(p, Vec3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn positive_x_rotation_carries_y_to_z() {
        // The handedness pin: +90 degrees about +X maps +Y onto +Z.
        let r = rotation_degrees(Vec3::X, 90.0);
        assert_vec3_near(r * Vec3::Y, Vec3::Z);
    }

    #[test]
    fn view_translates_by_the_negated_offset() {
        let v = view(Vec3::new(0.0, 0.0, 3.0));
        assert_vec3_near(v.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn look_at_centers_the_target() {
        let view = look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        assert_vec3_near(view.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0));
        // A point one unit in front of the eye lands at z = -1 (forward
        // is -Z in view space).
        assert_vec3_near(
            view.transform_point3(Vec3::new(0.0, 0.0, 4.0)),
            Vec3::new(0.0, 0.0, -1.0),
        );
    }

    #[test]
    fn perspective_depth_spans_zero_to_one() {
        let proj = perspective(60.0, 16.0 / 9.0, 0.1, 100.0);

        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        assert!(near.z.abs() < 1e-5, "near plane should map to 0, got {}", near.z);

        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!((far.z - 1.0).abs() < 1e-4, "far plane should map to 1, got {}", far.z);
    }

    #[test]
    fn orthographic_maps_the_box_to_clip_space() {
        let proj = orthographic(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0);
        assert_vec3_near(
            proj.project_point3(Vec3::new(-2.0, -1.0, -0.1)),
            Vec3::new(-1.0, -1.0, 0.0),
        );
        assert_vec3_near(
            proj.project_point3(Vec3::new(2.0, 1.0, -10.0)),
            Vec3::new(1.0, 1.0, 1.0),
        );
    }

    #[test]
    fn mvp_multiplies_right_to_left() {
        let model = Mat4::from_translation(Vec3::X);
        let view = Mat4::from_translation(Vec3::Y);
        let proj = Mat4::from_scale(Vec3::splat(2.0));
        assert_eq!(mvp(model, view, proj), proj * view * model);
    }
}
