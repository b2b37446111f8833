use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::Deserialize;

/// Camera placement: world position plus Euler rotation in radians.
///
/// `rotation.x` is pitch, `rotation.y` yaw and `rotation.z` roll, applied in
/// yaw-pitch-roll order. Rotation is kept as Euler angles rather than a
/// quaternion because camera moves tween each angle independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
        )
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    /// Orientation facing `target`, with no roll.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dir = (target - position).normalize_or(Vec3::NEG_Z);
        let yaw = (-dir.x).atan2(-dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        Self {
            position,
            rotation: Vec3::new(pitch, yaw, 0.0),
        }
    }

    /// Component-wise distance used to decide when two poses coincide.
    pub fn approx_eq(&self, other: &CameraPose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation.abs_diff_eq(other.rotation, epsilon)
    }
}

/// A perspective camera for the room scene.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pose: CameraPose,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pose: CameraPose::at(Vec3::new(0.0, 10.0, 15.0)),
            fov: 65f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pose(mut self, pose: CameraPose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.pose.position;
        Mat4::look_to_rh(eye, self.pose.forward(), self.pose.up())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_pose_looks_down_negative_z() {
        let pose = CameraPose::at(Vec3::ZERO);
        assert!(pose.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn looking_at_points_forward_at_target() {
        let pose = CameraPose::looking_at(Vec3::new(0.0, 2.0, 5.0), Vec3::new(3.0, 0.0, -1.0));
        let expected = (Vec3::new(3.0, 0.0, -1.0) - pose.position).normalize();
        assert!(pose.forward().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn view_matrix_moves_pose_position_to_origin() {
        let pose = CameraPose::looking_at(Vec3::new(0.0, 2.6, 4.0), Vec3::ZERO);
        let camera = Camera::new().with_pose(pose).with_fov(65.0);
        assert_eq!(camera.position(), pose.position);
        let eye = camera.view_matrix().transform_point3(pose.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));
    }
}
