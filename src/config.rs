//! TOML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock scene. Only the keys being changed need to appear:
//!
//! ```toml
//! [window]
//! title = "My Desk"
//!
//! [hologram]
//! spawn_interval = 3.0
//! seed = 7
//! ```

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;
use tracing::info;

use crate::camera::CameraPose;
use crate::error::ConfigError;
use crate::tween::Easing;

/// Top-level configuration for the portfolio scene.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub intro: IntroConfig,
    pub camera: CameraConfig,
    pub laptop: LaptopConfig,
    pub hologram: HologramConfig,
}

impl PortfolioConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    ///
    /// Non-positive terminal intervals are rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Check the settings that drive periodic timers.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let hologram = &self.hologram;
        for (field, value) in [
            ("hologram.spawn_interval", hologram.spawn_interval),
            ("hologram.typing_interval", hologram.typing_interval),
            ("hologram.blink_interval", hologram.blink_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveInterval {
                    path: path.to_path_buf(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Window title and initial size.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Deskfolio".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Initial values for the scene store.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub dark_mode: bool,
    pub muted: bool,
    pub time_of_day: f32,
    /// Seed for decorative randomness (cloud layout). Random when unset.
    pub seed: Option<u64>,
    /// Seconds before the "click the laptop" tip appears.
    pub tip_delay: f32,
    /// Images for the left and right photo frames, in that order.
    pub photos: Vec<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            muted: true,
            time_of_day: 14.0,
            seed: None,
            tip_delay: 5.0,
            photos: Vec::new(),
        }
    }
}

/// One stop of the intro flight.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    pub duration: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl Waypoint {
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.rotation)
    }
}

/// The scripted startup camera flight.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Seconds after startup before the flight begins.
    pub delay: f32,
    pub waypoints: Vec<Waypoint>,
}

impl Default for IntroConfig {
    fn default() -> Self {
        let room = Vec3::ZERO;
        let far = Vec3::new(-15.0, 10.0, -15.0);
        let mid = Vec3::new(-8.0, 5.0, -8.0);
        Self {
            delay: 0.5,
            waypoints: vec![
                Waypoint {
                    position: far,
                    rotation: CameraPose::looking_at(far, room).rotation,
                    duration: 0.0,
                    easing: Easing::Linear,
                },
                Waypoint {
                    position: mid,
                    rotation: CameraPose::looking_at(mid, room).rotation,
                    duration: 3.0,
                    easing: Easing::Power2InOut,
                },
                Waypoint {
                    position: Vec3::new(0.0, 2.0, 5.0),
                    rotation: Vec3::ZERO,
                    duration: 2.0,
                    easing: Easing::Power2InOut,
                },
            ],
        }
    }
}

/// Camera framing and orbit-control parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Pose before the intro starts.
    pub start: CameraPose,
    /// Canonical room-overview pose the camera returns to.
    pub rest: CameraPose,
    /// Offset from the laptop's world position when framing it.
    pub laptop_offset: Vec3,
    pub laptop_pitch: f32,
    pub laptop_move_duration: f32,
    pub laptop_pitch_duration: f32,
    /// How long before the laptop move ends the pitch adjustment starts.
    pub laptop_pitch_overlap: f32,
    pub room_move_duration: f32,
    pub room_rotate_duration: f32,
    pub fov_degrees: f32,
    pub orbit: OrbitConfig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: CameraPose::at(Vec3::new(0.0, 10.0, 15.0)),
            rest: CameraPose::at(Vec3::new(0.0, 2.0, 5.0)),
            laptop_offset: Vec3::new(0.0, 2.5, 4.0),
            laptop_pitch: -0.3,
            laptop_move_duration: 2.0,
            laptop_pitch_duration: 1.0,
            laptop_pitch_overlap: 0.5,
            room_move_duration: 1.5,
            room_rotate_duration: 1.0,
            fov_degrees: 65.0,
            orbit: OrbitConfig::default(),
        }
    }
}

/// Limits and feel of the free orbit controls.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub target: Vec3,
    /// Polar angle limits measured from straight up, in radians.
    pub min_polar: f32,
    pub max_polar: f32,
    pub distance: (f32, f32),
    pub distance_laptop_open: (f32, f32),
    pub rotate_speed: f32,
    pub damping: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            // Straight ahead of the rest pose.
            target: Vec3::new(0.0, 2.0, 0.0),
            min_polar: PI / 4.0,
            max_polar: PI / 2.0,
            distance: (3.0, 7.0),
            distance_laptop_open: (2.0, 3.0),
            rotate_speed: 0.5,
            damping: 0.05,
        }
    }
}

/// Lid, screen and hologram reveal timing.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LaptopConfig {
    /// World position of the laptop base.
    pub position: Vec3,
    /// Lid rotation when fully open, in radians.
    pub open_angle: f32,
    pub lid_stiffness: f32,
    /// Delay after opening before the screen lights up.
    pub boot_delay: f32,
    /// Further delay after boot before the hologram appears.
    pub hologram_delay: f32,
    pub glow_duration: f32,
    pub hologram_stiffness: f32,
    pub hologram_damping: f32,
    pub bounce_scale: f32,
    pub bounce_duration: f32,
}

impl Default for LaptopConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.1, 0.0),
            open_angle: PI / 2.2,
            lid_stiffness: 180.0,
            boot_delay: 0.4,
            hologram_delay: 0.8,
            glow_duration: 1.0,
            hologram_stiffness: 100.0,
            hologram_damping: 10.0,
            bounce_scale: 1.05,
            bounce_duration: 0.15,
        }
    }
}

/// Terminal-window spawning and typing.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HologramConfig {
    pub spawn_interval: f32,
    pub capacity: usize,
    pub typing_interval: f32,
    pub blink_interval: f32,
    /// Range of the window's top edge, in percent of the panel.
    pub top_range: (f32, f32),
    pub left_range: (f32, f32),
    /// Seed for template and placement choice. Random when unset.
    pub seed: Option<u64>,
}

impl Default for HologramConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 5.0,
            capacity: 4,
            typing_interval: 0.1,
            blink_interval: 0.5,
            top_range: (10.0, 40.0),
            left_range: (5.0, 25.0),
            seed: None,
        }
    }
}
