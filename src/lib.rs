//! # Deskfolio
//!
//! **An interactive 3D desk that doubles as a personal portfolio.**
//!
//! The scene opens with a scripted camera fly-in onto a small room. Clicking
//! the laptop opens its lid, frames it, and reveals a hologram panel full of
//! self-typing terminal windows; clicking anywhere else in the room closes it
//! again.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deskfolio::PortfolioConfig;
//!
//! fn main() -> Result<(), deskfolio::AppError> {
//!     let config = PortfolioConfig::load("deskfolio.toml")?;
//!     deskfolio::run(config)
//! }
//! ```
//!
//! ## Headless driving
//!
//! Everything except the window shell runs without a GPU. [`Portfolio`] can be
//! ticked from a [`SteppedClock`] for deterministic replays:
//!
//! ```
//! use deskfolio::{Input, Portfolio, PortfolioConfig, SteppedClock};
//!
//! let mut portfolio = Portfolio::new(&PortfolioConfig::default());
//! let mut clock = SteppedClock::new(1.0 / 60.0);
//! let input = Input::new();
//! while clock.now() < 6.0 {
//!     portfolio.tick(clock.tick(), &input);
//! }
//! assert!(portfolio.orbit_enabled());
//! ```

mod ambient;
mod app;
mod camera;
mod camera_director;
mod clock;
mod config;
mod error;
mod gpu;
mod hologram;
mod input;
mod laptop;
mod orbit_camera;
mod picking;
mod portfolio;
mod room;
mod router;
mod store;
mod texture;
mod timer;
mod tween;

pub use ambient::{Ambient, CelestialBody, Cloud, Color, FloatPose, Lighting, is_daytime, sky_color};
pub use app::run;
pub use camera::{Camera, CameraPose};
pub use camera_director::{CameraDirector, CameraFlight, CameraState};
pub use clock::{Clock, SteppedClock, Tick};
pub use config::{
    CameraConfig, HologramConfig, IntroConfig, LaptopConfig, OrbitConfig, PortfolioConfig,
    SceneConfig, Waypoint, WindowConfig,
};
pub use error::{AppError, ConfigError, GpuError, TextureError};
pub use gpu::GpuContext;
pub use hologram::{
    Hologram, PanelContent, PanelSection, ProjectCard, Role, TerminalKind, TerminalWindow,
};
pub use input::Input;
pub use laptop::{Laptop, LaptopEvent, LaptopPhase};
pub use orbit_camera::OrbitCamera;
pub use picking::{Collider, Ray, RayHit, raycast, raycast_all};
pub use portfolio::Portfolio;
pub use room::{Hidden, Name, Parent, PointerEvent, Room, Transform};
pub use router::{InteractionRouter, RouteOutcome};
pub use store::{SceneState, SceneStore, StoreChange, SubscriptionId};
pub use texture::TextureImage;
pub use timer::{Delay, Interval};
pub use tween::{Easing, Leg, Lerp, Spring, Track, Tween};

/// Names of the props in the room, as they appear in [`PointerEvent`] paths.
pub mod props {
    pub use crate::room::{
        CHAIR, DESK, DESK_AREA, HOLOGRAM, HOLOGRAM_PANEL, HOLOGRAM_REST, LAPTOP, LAPTOP_BASE,
        LAPTOP_LID, MUG, PHOTO_FRAME_LEFT, PHOTO_FRAME_RIGHT, PLANT, ROOM,
    };
}

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;

pub use hecs::{Entity, World};
