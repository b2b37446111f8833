//! Scripted camera moves: the startup fly-in and laptop/room framing.
//!
//! The director owns the camera pose whenever a scripted move runs. It holds
//! at most one [`CameraFlight`]; requesting a new move replaces the flight in
//! progress and starts from wherever the camera currently is, so two moves can
//! never drive the camera at once.
//!
//! State changes arrive from the scene store through
//! [`CameraDirector::handle_change`]; the director itself only writes the
//! intro flag.

use glam::Vec3;
use tracing::debug;

use crate::camera::CameraPose;
use crate::clock::Tick;
use crate::config::{CameraConfig, IntroConfig};
use crate::store::{SceneState, SceneStore, StoreChange};
use crate::timer::Delay;
use crate::tween::{Easing, Leg, Track};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraState {
    #[default]
    Idle,
    IntroFlight,
    FramingLaptop,
    FramingRoom,
}

/// Position and rotation tracks for one scripted move.
#[derive(Clone, Debug)]
pub struct CameraFlight {
    position: Track<Vec3>,
    rotation: Track<Vec3>,
}

impl CameraFlight {
    pub fn new(position: Track<Vec3>, rotation: Track<Vec3>) -> Self {
        Self { position, rotation }
    }

    /// Advance both tracks and return the resulting pose.
    pub fn advance(&mut self, dt: f32) -> CameraPose {
        CameraPose::new(self.position.advance(dt), self.rotation.advance(dt))
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position.value(), self.rotation.value())
    }

    pub fn is_finished(&self) -> bool {
        self.position.is_finished() && self.rotation.is_finished()
    }
}

pub struct CameraDirector {
    intro: IntroConfig,
    camera: CameraConfig,
    state: CameraState,
    pose: CameraPose,
    flight: Option<CameraFlight>,
    intro_delay: Option<Delay>,
    laptop_anchor: Vec3,
    /// Laptop opened during the intro; frame it once the intro lands.
    frame_laptop_after_intro: bool,
}

impl CameraDirector {
    /// A director holding the start pose, with the intro scheduled
    /// `intro.delay` seconds after time zero.
    pub fn new(intro: &IntroConfig, camera: &CameraConfig) -> Self {
        Self {
            intro: intro.clone(),
            camera: camera.clone(),
            state: CameraState::Idle,
            pose: camera.start,
            flight: None,
            intro_delay: Some(Delay::after(0.0, intro.delay)),
            laptop_anchor: Vec3::ZERO,
            frame_laptop_after_intro: false,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Place the camera directly. Ignored while a scripted move runs.
    pub fn set_pose(&mut self, pose: CameraPose) {
        if self.flight.is_none() {
            self.pose = pose;
        }
    }

    /// True while a scripted move drives the camera.
    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// The move in progress, if any.
    pub fn flight(&self) -> Option<&CameraFlight> {
        self.flight.as_ref()
    }

    /// World position the laptop framing offset is applied to.
    pub fn set_laptop_anchor(&mut self, anchor: Vec3) {
        self.laptop_anchor = anchor;
    }

    /// Orbit controls may move the camera only when idle and nothing else
    /// claims it. The camera stays put on the start pose until the intro runs.
    pub fn orbit_enabled(&self, state: &SceneState) -> bool {
        self.state == CameraState::Idle
            && self.flight.is_none()
            && self.intro_delay.is_none()
            && state.orbit_allowed()
    }

    /// React to a scene store change.
    pub fn handle_change(&mut self, change: StoreChange) {
        match change {
            StoreChange::LaptopOpen(true) => {
                if self.state == CameraState::IntroFlight {
                    self.frame_laptop_after_intro = true;
                } else {
                    self.frame_laptop();
                }
            }
            StoreChange::LaptopOpen(false) => {
                self.frame_laptop_after_intro = false;
                if self.state != CameraState::IntroFlight {
                    self.frame_room();
                }
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, tick: Tick, store: &mut SceneStore) {
        let mut dt = tick.dt;

        if let Some(delay) = self.intro_delay.as_mut() {
            if delay.poll(tick.time) {
                let due = delay.due();
                self.intro_delay = None;
                self.begin_intro(store);
                // Only the part of this frame after the deadline belongs to the flight.
                dt = (tick.time - due).clamp(0.0, tick.dt);
            }
        }

        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        self.pose = flight.advance(dt);
        if flight.is_finished() {
            self.flight = None;
            self.finish_flight(store);
        }
    }

    fn begin_intro(&mut self, store: &mut SceneStore) {
        self.frame_laptop_after_intro = store.laptop_open();
        store.set_intro_animation_active(true);

        let position: Vec<Leg<Vec3>> = self
            .intro
            .waypoints
            .iter()
            .map(|w| Leg::new(w.position, w.duration, w.easing))
            .collect();
        let rotation: Vec<Leg<Vec3>> = self
            .intro
            .waypoints
            .iter()
            .map(|w| Leg::new(w.rotation, w.duration, w.easing))
            .collect();
        self.start(
            CameraState::IntroFlight,
            CameraFlight::new(
                Track::new(self.pose.position, position),
                Track::new(self.pose.rotation, rotation),
            ),
        );
    }

    fn finish_flight(&mut self, store: &mut SceneStore) {
        match self.state {
            CameraState::IntroFlight => {
                store.set_intro_animation_active(false);
                if std::mem::take(&mut self.frame_laptop_after_intro) && store.laptop_open() {
                    self.frame_laptop();
                } else {
                    self.set_state(CameraState::Idle);
                }
            }
            CameraState::FramingRoom => self.set_state(CameraState::Idle),
            // Holds on the laptop until it closes.
            CameraState::FramingLaptop | CameraState::Idle => {}
        }
    }

    fn frame_laptop(&mut self) {
        let cam = &self.camera;
        let target = self.laptop_anchor + cam.laptop_offset;
        let pitch_delay = (cam.laptop_move_duration - cam.laptop_pitch_overlap).max(0.0);
        let flight = CameraFlight::new(
            Track::new(
                self.pose.position,
                vec![Leg::new(target, cam.laptop_move_duration, Easing::Power3InOut)],
            ),
            Track::new(
                self.pose.rotation,
                vec![Leg::new(
                    Vec3::new(cam.laptop_pitch, 0.0, 0.0),
                    cam.laptop_pitch_duration,
                    Easing::Power2Out,
                )],
            )
            .delay(pitch_delay),
        );
        self.start(CameraState::FramingLaptop, flight);
    }

    fn frame_room(&mut self) {
        let cam = &self.camera;
        let flight = CameraFlight::new(
            Track::new(
                self.pose.position,
                vec![Leg::new(
                    cam.rest.position,
                    cam.room_move_duration,
                    Easing::Power3InOut,
                )],
            ),
            Track::new(
                self.pose.rotation,
                vec![Leg::new(
                    cam.rest.rotation,
                    cam.room_rotate_duration,
                    Easing::Power2InOut,
                )],
            ),
        );
        self.start(CameraState::FramingRoom, flight);
    }

    fn start(&mut self, state: CameraState, flight: CameraFlight) {
        if self.flight.is_some() {
            debug!(from = ?self.state, to = ?state, "camera move superseded");
        }
        self.flight = Some(flight);
        self.set_state(state);
    }

    fn set_state(&mut self, state: CameraState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "camera state");
            self.state = state;
        }
    }
}
