use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use winit::event::MouseButton;

use crate::camera::CameraPose;
use crate::config::OrbitConfig;
use crate::input::Input;

/// Radians of rotation per pixel of drag at `rotate_speed == 1.0`.
const DRAG_RADIANS_PER_PIXEL: f32 = 0.01;

/// Free camera control that orbits a target point with damped drag and zoom.
///
/// The orbit camera never decides on its own whether it may move; the caller
/// passes `enabled` each frame. While disabled, any leftover momentum is dropped
/// so control resumes from rest.
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitCamera::from_config(&config.camera.orbit);
///
/// // In frame loop:
/// orbit.update(&input, tick.dt, director.orbit_enabled(store.state()));
/// if director.orbit_enabled(store.state()) {
///     director.set_pose(orbit.pose());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in radians (yaw).
    pub azimuth: f32,
    /// Vertical angle above the target's horizon, in radians.
    pub elevation: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    /// Fraction of pending motion applied per 60 Hz frame.
    pub damping: f32,
    /// Scroll zoom sensitivity.
    pub zoom_sensitivity: f32,
    azimuth_velocity: f32,
    elevation_velocity: f32,
    zoom_velocity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&OrbitConfig::default())
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &OrbitConfig) -> Self {
        let (min_distance, max_distance) = config.distance;
        Self {
            target: config.target,
            distance: min_distance.max(5.0).min(max_distance),
            azimuth: 0.0,
            elevation: 0.0,
            // Polar angles are measured from +Y; elevation from the horizon.
            min_elevation: FRAC_PI_2 - config.max_polar,
            max_elevation: FRAC_PI_2 - config.min_polar,
            min_distance,
            max_distance,
            rotate_speed: config.rotate_speed,
            damping: config.damping,
            zoom_sensitivity: 0.5,
            azimuth_velocity: 0.0,
            elevation_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Change distance limits, pulling the current distance inside them.
    pub fn set_distance_limits(&mut self, min: f32, max: f32) {
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
    }

    /// Adopt an externally driven camera position as the orbit's current state.
    ///
    /// Called when control is handed back after a scripted move, so the next
    /// drag continues from where the camera actually is.
    pub fn sync_to(&mut self, pose: &CameraPose) {
        let offset = pose.position - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.azimuth = offset.x.atan2(offset.z);
        self.elevation = (offset.y / distance)
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(self.min_elevation, self.max_elevation);
        self.azimuth_velocity = 0.0;
        self.elevation_velocity = 0.0;
        self.zoom_velocity = 0.0;
    }

    /// Update from input. Pass `enabled = false` to freeze the orbit.
    pub fn update(&mut self, input: &Input, dt: f32, enabled: bool) {
        if !enabled {
            self.azimuth_velocity = 0.0;
            self.elevation_velocity = 0.0;
            self.zoom_velocity = 0.0;
            return;
        }

        // Rotate when left mouse button is held
        if input.mouse_down(MouseButton::Left) {
            let delta = input.mouse_delta();
            let per_pixel = DRAG_RADIANS_PER_PIXEL * self.rotate_speed;
            self.azimuth_velocity -= delta.x * per_pixel;
            self.elevation_velocity += delta.y * per_pixel;
        }

        let scroll = input.scroll_delta();
        if scroll.y.abs() > 0.0 {
            self.zoom_velocity -= scroll.y * self.zoom_sensitivity;
        }

        self.apply_damped_motion(dt);
    }

    fn apply_damped_motion(&mut self, dt: f32) {
        let frames = (dt * 60.0).max(0.0);
        let factor = 1.0 - (1.0 - self.damping.clamp(0.0, 1.0)).powf(frames);

        let azimuth_step = self.azimuth_velocity * factor;
        let elevation_step = self.elevation_velocity * factor;
        let zoom_step = self.zoom_velocity * factor;
        self.azimuth_velocity -= azimuth_step;
        self.elevation_velocity -= elevation_step;
        self.zoom_velocity -= zoom_step;

        self.azimuth += azimuth_step;
        self.elevation =
            (self.elevation + elevation_step).clamp(self.min_elevation, self.max_elevation);
        self.distance = (self.distance + zoom_step).clamp(self.min_distance, self.max_distance);
    }

    pub fn position(&self) -> Vec3 {
        // Spherical to Cartesian conversion
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );
        self.target + offset
    }

    /// Pose looking from the orbit position at the target.
    pub fn pose(&self) -> CameraPose {
        CameraPose::looking_at(self.position(), self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_round_trips_the_rest_pose() {
        let mut orbit = OrbitCamera::new();
        let rest = CameraPose::at(Vec3::new(0.0, 2.0, 5.0));
        orbit.sync_to(&rest);
        assert!(orbit.pose().approx_eq(&rest, 1e-4));
    }

    #[test]
    fn elevation_is_clamped_to_polar_limits() {
        let mut orbit = OrbitCamera::new();
        orbit.sync_to(&CameraPose::at(Vec3::new(0.0, 12.0, 1.0)));
        assert!((orbit.elevation - std::f32::consts::FRAC_PI_4).abs() < 1e-5);

        orbit.sync_to(&CameraPose::at(Vec3::new(0.0, -3.0, 4.0)));
        assert!(orbit.elevation.abs() < 1e-5);
    }

    #[test]
    fn disabled_orbit_does_not_move() {
        let mut orbit = OrbitCamera::new();
        orbit.sync_to(&CameraPose::at(Vec3::new(0.0, 2.0, 5.0)));
        let before = orbit.position();
        orbit.update(&Input::new(), 1.0 / 60.0, false);
        assert_eq!(orbit.position(), before);
    }

    #[test]
    fn distance_limits_pull_distance_in() {
        let mut orbit = OrbitCamera::new();
        orbit.distance = 6.0;
        orbit.set_distance_limits(2.0, 3.0);
        assert_eq!(orbit.distance, 3.0);
    }
}
