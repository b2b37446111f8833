//! Decorative motion and lighting that never feeds back into the core.
//!
//! Everything here is a function of time and the scene flags: the slow room
//! sway, the plant, five floating clouds, the photo frames, sun and moon, sky and light colours,
//! and the two onboarding cues (the "click the laptop" tip and the hint ping).

use glam::{EulerRot, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::clock::Tick;
use crate::config::SceneConfig;
use crate::store::SceneState;
use crate::timer::Delay;
use crate::tween::Lerp;

const CLOUD_COUNT: usize = 5;
/// Where the cloud bank is anchored.
const CLOUD_ORIGIN: Vec3 = Vec3::new(0.0, 5.0, -15.0);
const SWAY_AMPLITUDE: f32 = 0.15;
/// Fraction of the remaining sway distance covered per tick.
const SWAY_FOLLOW: f32 = 0.05;
/// Speed, rotation intensity and float intensity of the left and right
/// photo frames.
const PHOTO_FRAME_FLOAT: [(f32, f32, f32); 2] = [(1.0, 0.2, 0.5), (1.2, 0.3, 0.6)];

/// RGBA colour with sRGB-encoded channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
}

/// Is the sun up at this hour?
pub fn is_daytime(hour: f32) -> bool {
    (6.0..18.0).contains(&hour)
}

/// Background colour for the sky sphere and surface clear.
pub fn sky_color(dark_mode: bool, hour: f32) -> Color {
    let night = hour >= 20.0 || hour <= 5.0;
    if dark_mode {
        return if night {
            Color::hex(0x0a0a1a)
        } else {
            Color::hex(0x1a1a2e)
        };
    }
    if night {
        Color::hex(0x1a1a2e)
    } else if hour >= 17.0 || hour < 7.0 {
        Color::hex(0x2d3748)
    } else {
        Color::hex(0xf0f0f0)
    }
}

/// Light colours for the room rig.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: Color,
    pub key: Color,
    pub fill: Color,
    pub accent: Color,
    pub fog: Color,
}

impl Lighting {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                ambient: Color::hex(0xe9d5ff),
                key: Color::hex(0xe9d5ff),
                fill: Color::hex(0x818cf8),
                accent: Color::hex(0xc084fc),
                fog: Color::hex(0x1a1a2e),
            }
        } else {
            Self {
                ambient: Color::WHITE,
                key: Color::hex(0xfef9c3),
                fill: Color::hex(0xfef9c3),
                accent: Color::hex(0xfef9c3),
                fog: Color::hex(0xf0f0f0),
            }
        }
    }
}

/// A sun or moon: shown or not, and where.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialBody {
    pub visible: bool,
    pub position: Vec3,
}

/// Position and tilt of a floating element this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatPose {
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
}

impl FloatPose {
    /// Bob and wobble offset at time `t` for an element floating at `speed`.
    pub fn drift(t: f32, speed: f32, rotation_intensity: f32, float_intensity: f32) -> Self {
        let phase = t / 4.0 * speed;
        Self {
            position: Vec3::Y * (phase.sin() / 10.0 * float_intensity),
            rotation: Vec3::new(
                phase.cos() / 8.0 * rotation_intensity,
                phase.sin() / 8.0 * rotation_intensity,
                phase.sin() / 20.0 * rotation_intensity,
            ),
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// A cloud with randomised placement and float parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    /// Position relative to the cloud bank.
    pub position: Vec3,
    pub scale: Vec3,
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
}

impl Cloud {
    fn random(rng: &mut StdRng) -> Self {
        let mut unit = || rng.r#gen::<f32>();
        Self {
            position: Vec3::new((unit() - 0.5) * 20.0, unit() * 5.0, -5.0 - unit() * 10.0),
            scale: Vec3::new(8.0 + unit() * 4.0, 1.5, 1.5),
            speed: 0.5 + unit() * 0.5,
            rotation_intensity: 0.2 + unit() * 0.3,
            float_intensity: 0.5 + unit() * 0.3,
        }
    }

    /// Gentle bob and wobble at time `t`, in world space.
    pub fn pose(&self, t: f32) -> FloatPose {
        let drift = FloatPose::drift(t, self.speed, self.rotation_intensity, self.float_intensity);
        FloatPose {
            position: CLOUD_ORIGIN + self.position + drift.position,
            rotation: drift.rotation,
        }
    }
}

pub struct Ambient {
    time: f32,
    room_sway: f32,
    clouds: Vec<Cloud>,
    tip: Option<Delay>,
    tip_visible: bool,
    laptop_ever_opened: bool,
}

impl Ambient {
    pub fn new(config: &SceneConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            time: 0.0,
            room_sway: 0.0,
            clouds: (0..CLOUD_COUNT).map(|_| Cloud::random(&mut rng)).collect(),
            tip: Some(Delay::after(0.0, config.tip_delay)),
            tip_visible: false,
            laptop_ever_opened: false,
        }
    }

    pub fn tick(&mut self, tick: Tick, state: &SceneState) {
        self.time = tick.time;

        // Only drifts while nothing else is framing the room.
        if state.orbit_allowed() {
            let target = (tick.time * 0.5).sin() * SWAY_AMPLITUDE;
            self.room_sway = self.room_sway.lerp(target, SWAY_FOLLOW);
        }

        if state.laptop_open {
            self.laptop_ever_opened = true;
            self.tip_visible = false;
        }
        if let Some(tip) = self.tip.as_mut() {
            if tip.poll(tick.time) {
                self.tip = None;
                if !self.laptop_ever_opened {
                    info!("showing laptop tip");
                    self.tip_visible = true;
                }
            }
        }
    }

    /// Room group rotation about Y.
    pub fn room_sway(&self) -> f32 {
        self.room_sway
    }

    /// Plant rotation about Y.
    pub fn plant_sway(&self) -> f32 {
        (self.time / 2.0).sin() * 0.05
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn cloud_poses(&self) -> impl Iterator<Item = FloatPose> + '_ {
        self.clouds.iter().map(|cloud| cloud.pose(self.time))
    }

    /// Float offsets for the left and right photo frames, applied about the
    /// room origin.
    pub fn photo_frame_floats(&self) -> [FloatPose; 2] {
        PHOTO_FRAME_FLOAT.map(|(speed, rotation_intensity, float_intensity)| {
            FloatPose::drift(self.time, speed, rotation_intensity, float_intensity)
        })
    }

    /// Slow spin of the sky sphere, as Euler angles.
    pub fn sky_rotation(&self) -> Vec3 {
        Vec3::new(self.time * 0.05, self.time * 0.08, 0.0)
    }

    pub fn sun(&self, state: &SceneState) -> CelestialBody {
        CelestialBody {
            visible: is_daytime(state.time_of_day),
            position: Vec3::new(10.0, (self.time * 0.1).sin() * 15.0, -10.0),
        }
    }

    pub fn moon(&self, state: &SceneState) -> CelestialBody {
        CelestialBody {
            visible: !is_daytime(state.time_of_day),
            position: Vec3::new(-10.0, (self.time * 0.1).cos() * 15.0, 10.0),
        }
    }

    pub fn stars_visible(&self, state: &SceneState) -> bool {
        !state.laptop_open
    }

    /// The pulsing "click here" marker over the laptop.
    pub fn hint_visible(&self, state: &SceneState) -> bool {
        !state.laptop_open && !state.intro_animation_active
    }

    /// The onboarding tip toast.
    pub fn tip_visible(&self) -> bool {
        self.tip_visible
    }

    pub fn sky_color(&self, state: &SceneState) -> Color {
        sky_color(state.dark_mode, state.time_of_day)
    }

    pub fn lighting(&self, state: &SceneState) -> Lighting {
        Lighting::for_mode(state.dark_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient() -> Ambient {
        Ambient::new(&SceneConfig {
            seed: Some(3),
            ..SceneConfig::default()
        })
    }

    #[test]
    fn sway_freezes_while_laptop_is_open() {
        let mut ambient = ambient();
        let mut state = SceneState::default();
        ambient.tick(Tick::new(3.0, 0.1), &state);
        let swayed = ambient.room_sway();
        assert!(swayed != 0.0);

        state.laptop_open = true;
        ambient.tick(Tick::new(6.0, 0.1), &state);
        assert_eq!(ambient.room_sway(), swayed);

        state.laptop_open = false;
        state.intro_animation_active = true;
        ambient.tick(Tick::new(7.0, 0.1), &state);
        assert_eq!(ambient.room_sway(), swayed);
    }

    #[test]
    fn tip_appears_after_delay_unless_laptop_was_opened() {
        let mut shown = ambient();
        let state = SceneState::default();
        shown.tick(Tick::new(4.9, 0.1), &state);
        assert!(!shown.tip_visible());
        shown.tick(Tick::new(5.0, 0.1), &state);
        assert!(shown.tip_visible());

        let mut dismissed = ambient();
        let mut state = SceneState::default();
        state.laptop_open = true;
        dismissed.tick(Tick::new(1.0, 0.1), &state);
        state.laptop_open = false;
        dismissed.tick(Tick::new(5.0, 0.1), &state);
        assert!(!dismissed.tip_visible());
    }

    #[test]
    fn sky_follows_mode_and_hour() {
        assert_eq!(sky_color(false, 14.0), Color::hex(0xf0f0f0));
        assert_eq!(sky_color(false, 18.0), Color::hex(0x2d3748));
        assert_eq!(sky_color(false, 22.0), Color::hex(0x1a1a2e));
        assert_eq!(sky_color(true, 14.0), Color::hex(0x1a1a2e));
        assert_eq!(sky_color(true, 2.0), Color::hex(0x0a0a1a));
    }

    #[test]
    fn sun_and_moon_swap_at_dusk() {
        let ambient = ambient();
        let mut state = SceneState::default();
        assert!(ambient.sun(&state).visible);
        assert!(!ambient.moon(&state).visible);
        state.time_of_day = 19.0;
        assert!(!ambient.sun(&state).visible);
        assert!(ambient.moon(&state).visible);
    }

    #[test]
    fn clouds_are_seeded() {
        let a = ambient();
        let b = ambient();
        assert_eq!(a.clouds().len(), 5);
        assert_eq!(a.clouds(), b.clouds());
        for cloud in a.clouds() {
            assert!((-10.0..=10.0).contains(&cloud.position.x));
            assert!((8.0..=12.0).contains(&cloud.scale.x));
        }
    }

    #[test]
    fn hint_hidden_during_intro_or_when_open() {
        let ambient = ambient();
        let mut state = SceneState::default();
        assert!(ambient.hint_visible(&state));
        state.intro_animation_active = true;
        assert!(!ambient.hint_visible(&state));
        state.intro_animation_active = false;
        state.laptop_open = true;
        assert!(!ambient.hint_visible(&state));
        assert!(!ambient.stars_visible(&state));
    }

    #[test]
    fn clouds_and_frames_share_the_float_curve() {
        let mut ambient = ambient();
        ambient.tick(Tick::new(3.0, 0.1), &SceneState::default());

        let cloud = ambient.clouds()[0];
        let pose = ambient.cloud_poses().next().unwrap();
        let drift = FloatPose::drift(
            3.0,
            cloud.speed,
            cloud.rotation_intensity,
            cloud.float_intensity,
        );
        let expected = CLOUD_ORIGIN + cloud.position + drift.position;
        assert!(pose.position.abs_diff_eq(expected, 1e-5));
        assert_eq!(pose.rotation, drift.rotation);
        assert_eq!(ambient.cloud_poses().count(), 5);

        let [left, right] = ambient.photo_frame_floats();
        assert_eq!(left, FloatPose::drift(3.0, 1.0, 0.2, 0.5));
        assert!(left != right);
        // Bob stays within a tenth of the float intensity.
        assert!(left.position.y.abs() <= 0.05);
    }

    #[test]
    fn frames_start_level_and_drift_over_time() {
        let mut ambient = ambient();
        let [at_rest, _] = ambient.photo_frame_floats();
        assert_eq!(at_rest.position, Vec3::ZERO);
        ambient.tick(Tick::new(4.0, 0.1), &SceneState::default());
        let [later, _] = ambient.photo_frame_floats();
        assert!(later.position.y > 0.0);
    }

    #[test]
    fn sky_sphere_turns_with_time() {
        let mut ambient = ambient();
        assert_eq!(ambient.sky_rotation(), Vec3::ZERO);
        ambient.tick(Tick::new(10.0, 0.1), &SceneState::default());
        assert!(ambient.sky_rotation().abs_diff_eq(Vec3::new(0.5, 0.8, 0.0), 1e-5));
    }

    #[test]
    fn lighting_switches_palette_with_dark_mode() {
        let ambient = ambient();
        let mut state = SceneState::default();
        assert_eq!(ambient.lighting(&state).ambient, Color::WHITE);
        assert_eq!(ambient.lighting(&state).fog, ambient.sky_color(&state));

        state.dark_mode = true;
        let dark = ambient.lighting(&state);
        assert_eq!(dark.fill, Color::hex(0x818cf8));
        assert_eq!(dark.fog, Color::hex(0x1a1a2e));
    }
}
