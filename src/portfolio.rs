//! The scene as a whole: store, controllers and prop hierarchy wired together.
//!
//! [`Portfolio`] owns every controller and is the only place where they meet.
//! Each frame it advances them in a fixed order and then writes their output
//! into the room transforms:
//!
//! 1. camera director (may end the intro and flip the intro flag)
//! 2. laptop lid, glow and reveal timers
//! 3. hologram panel
//! 4. orbit controls, when the director allows them
//! 5. ambient motion (room sway, plant, floating photo frames)
//!
//! Store changes are collected by a subscriber into a mailbox and dispatched
//! to the director and laptop after every step that can mutate the store.
//!
//! # Example
//!
//! ```ignore
//! let mut portfolio = Portfolio::new(&config);
//!
//! // In frame loop:
//! let tick = clock.tick();
//! for &cursor in input.clicks() {
//!     let event = portfolio.pick(cursor, viewport);
//!     portfolio.click(&event);
//! }
//! portfolio.handle_keys(&input);
//! portfolio.tick(tick, &input);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec2};
use tracing::{debug, info};
use winit::keyboard::KeyCode;

use crate::ambient::{Ambient, Color};
use crate::camera::{Camera, CameraPose};
use crate::camera_director::CameraDirector;
use crate::clock::Tick;
use crate::config::{OrbitConfig, PortfolioConfig};
use crate::hologram::{Hologram, PanelSection};
use crate::input::Input;
use crate::laptop::{Laptop, LaptopEvent};
use crate::orbit_camera::OrbitCamera;
use crate::picking::{Ray, raycast};
use crate::room::{HOLOGRAM_REST, PointerEvent, Room};
use crate::router::{InteractionRouter, RouteOutcome};
use crate::store::{SceneState, SceneStore, StoreChange};
use crate::texture::TextureImage;

/// Number of photo frames in the room.
const PHOTO_FRAMES: usize = 2;

pub struct Portfolio {
    store: SceneStore,
    mailbox: Rc<RefCell<Vec<StoreChange>>>,
    director: CameraDirector,
    orbit: OrbitCamera,
    orbit_config: OrbitConfig,
    orbit_was_enabled: bool,
    fov_degrees: f32,
    room: Room,
    router: InteractionRouter,
    laptop: Laptop,
    hologram: Hologram,
    ambient: Ambient,
    photos: Vec<TextureImage>,
    now: f32,
}

impl Portfolio {
    pub fn new(config: &PortfolioConfig) -> Self {
        let mut store = SceneStore::with_state(SceneState {
            dark_mode: config.scene.dark_mode,
            muted: config.scene.muted,
            time_of_day: config.scene.time_of_day.rem_euclid(24.0),
            ..SceneState::default()
        });
        let mailbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&mailbox);
        store.subscribe(move |_, change| sink.borrow_mut().push(change));

        let room = Room::new(config.laptop.position);
        let mut director = CameraDirector::new(&config.intro, &config.camera);
        director.set_laptop_anchor(room.laptop_world_position());

        let photos = (0..PHOTO_FRAMES)
            .map(|i| match config.scene.photos.get(i) {
                Some(path) => TextureImage::load_or_fallback(path),
                None => TextureImage::fallback(64),
            })
            .collect();

        Self {
            store,
            mailbox,
            director,
            orbit: OrbitCamera::from_config(&config.camera.orbit),
            orbit_config: config.camera.orbit.clone(),
            orbit_was_enabled: false,
            fov_degrees: config.camera.fov_degrees,
            room,
            router: InteractionRouter::new(),
            laptop: Laptop::new(&config.laptop),
            hologram: Hologram::new(&config.hologram).scale_spring(
                config.laptop.hologram_stiffness,
                config.laptop.hologram_damping,
            ),
            ambient: Ambient::new(&config.scene),
            photos,
            now: 0.0,
        }
    }

    /// Advance every controller by one frame.
    pub fn tick(&mut self, tick: Tick, input: &Input) {
        self.now = tick.time;

        self.director.set_laptop_anchor(self.room.laptop_world_position());
        self.director.tick(tick, &mut self.store);
        self.dispatch();

        for event in self.laptop.tick(tick) {
            self.apply_laptop_event(event);
        }
        self.hologram.tick(tick);

        self.update_orbit(tick, input);
        self.ambient.tick(tick, self.store.state());
        self.sync_room();
    }

    /// Route a click on the room. Store changes it causes take effect
    /// immediately.
    pub fn click(&mut self, event: &PointerEvent) -> RouteOutcome {
        let outcome = self
            .router
            .route(event, &mut self.laptop, &mut self.store);
        debug!(?outcome, struck = ?event.struck(), "click routed");
        self.dispatch();
        outcome
    }

    /// Resolve a window pixel to the prop under it.
    pub fn pick(&self, cursor: Vec2, viewport: Vec2) -> PointerEvent {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return PointerEvent::default();
        }
        let camera = self.camera();
        let ray = Ray::from_screen(
            cursor.x,
            cursor.y,
            viewport.x,
            viewport.y,
            camera.view_matrix(),
            camera.projection_matrix(viewport.x / viewport.y),
        );
        raycast(&self.room, &ray)
            .map(|hit| self.room.pointer_event(hit.entity))
            .unwrap_or_default()
    }

    /// Keyboard shortcuts: M mutes, D switches dark mode, 1 to 3 pick a
    /// panel section.
    pub fn handle_keys(&mut self, input: &Input) {
        if input.key_pressed(KeyCode::KeyM) {
            self.toggle_mute();
        }
        if input.key_pressed(KeyCode::KeyD) {
            self.toggle_dark_mode();
        }
        let sections = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
        for (key, section) in sections.into_iter().zip(PanelSection::ALL) {
            if input.key_pressed(key) {
                self.select_section(section);
            }
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.store.toggle_dark_mode();
        info!(dark_mode = self.store.dark_mode(), "dark mode toggled");
        self.dispatch();
    }

    pub fn toggle_mute(&mut self) {
        self.store.toggle_mute();
        info!(muted = self.store.muted(), "mute toggled");
        self.dispatch();
    }

    pub fn set_time_of_day(&mut self, hour: f32) {
        self.store.set_time_of_day(hour);
        self.dispatch();
    }

    pub fn select_section(&mut self, section: PanelSection) {
        self.hologram.select_section(section);
    }

    /// Close a terminal window on the hologram panel.
    pub fn close_terminal(&mut self, id: &str) -> bool {
        self.hologram.close_window(id)
    }

    pub fn toggle_project_card(&mut self, index: usize) -> Option<bool> {
        self.hologram.toggle_project_card(index)
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn state(&self) -> &SceneState {
        self.store.state()
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.director.pose()
    }

    /// Camera for rendering and picking at the current pose.
    pub fn camera(&self) -> Camera {
        Camera::new()
            .with_pose(self.director.pose())
            .with_fov(self.fov_degrees)
    }

    pub fn director(&self) -> &CameraDirector {
        &self.director
    }

    pub fn orbit_enabled(&self) -> bool {
        self.director.orbit_enabled(self.store.state())
    }

    pub fn laptop(&self) -> &Laptop {
        &self.laptop
    }

    pub fn hologram(&self) -> &Hologram {
        &self.hologram
    }

    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Textures for the left and right photo frames.
    pub fn photos(&self) -> &[TextureImage] {
        &self.photos
    }

    pub fn sky_color(&self) -> Color {
        self.ambient.sky_color(self.store.state())
    }

    /// Short human-readable summary, used for the window title.
    pub fn status_line(&self) -> String {
        let state = self.store.state();
        let mut parts = Vec::new();
        if state.laptop_open {
            parts.push(self.hologram.active_section().title());
        }
        if state.dark_mode {
            parts.push("dark");
        }
        if state.muted {
            parts.push("muted");
        }
        if self.ambient.tip_visible() {
            parts.push("click the laptop");
        }
        parts.join(" | ")
    }

    fn dispatch(&mut self) {
        loop {
            let pending = std::mem::take(&mut *self.mailbox.borrow_mut());
            if pending.is_empty() {
                return;
            }
            for change in pending {
                self.director.handle_change(change);
                if let Some(event) = self.laptop.handle_change(change, self.now) {
                    self.apply_laptop_event(event);
                }
            }
        }
    }

    fn apply_laptop_event(&mut self, event: LaptopEvent) {
        let hologram = self.room.hologram();
        match event {
            LaptopEvent::ScreenOn => {}
            LaptopEvent::RevealHologram => {
                self.hologram.show(self.now);
                self.room.set_hidden(hologram, false);
            }
            LaptopEvent::HideHologram => {
                self.hologram.hide();
                self.room.set_hidden(hologram, true);
            }
        }
    }

    fn update_orbit(&mut self, tick: Tick, input: &Input) {
        let (min, max) = if self.store.laptop_open() {
            self.orbit_config.distance_laptop_open
        } else {
            self.orbit_config.distance
        };
        self.orbit.set_distance_limits(min, max);

        let enabled = self.director.orbit_enabled(self.store.state());
        if enabled && !self.orbit_was_enabled {
            self.orbit.sync_to(&self.director.pose());
            debug!("orbit controls handed the camera");
        }
        self.orbit_was_enabled = enabled;

        self.orbit.update(input, tick.dt, enabled);
        if enabled {
            self.director.set_pose(self.orbit.pose());
        }
    }

    fn sync_room(&mut self) {
        let sway = self.ambient.room_sway();
        let plant_sway = self.ambient.plant_sway();
        let base_scale = self.laptop.base_scale();
        let lid_angle = self.laptop.lid_angle();
        let spin = self.hologram.spin();
        let bob = self.hologram.bob();
        let scale = self.hologram.scale();
        let frame_floats = self.ambient.photo_frame_floats();

        let room = &mut self.room;
        for ((frame, rest), float) in room.photo_frames().into_iter().zip(frame_floats) {
            let tilt = float.quat();
            room.update_transform(frame, |t| {
                t.position = tilt * rest.position + float.position;
                t.rotation = tilt * rest.rotation;
            });
        }
        room.update_transform(room.root(), |t| t.rotation = Quat::from_rotation_y(sway));
        room.update_transform(room.plant(), |t| {
            t.rotation = Quat::from_rotation_y(plant_sway)
        });
        room.update_transform(room.laptop_base(), |t| {
            *t = t.uniform_scale(base_scale)
        });
        room.update_transform(room.laptop_lid(), |t| {
            t.rotation = Quat::from_rotation_x(-lid_angle)
        });
        room.update_transform(room.hologram(), |t| {
            t.position = HOLOGRAM_REST + glam::Vec3::Y * bob;
            t.rotation = Quat::from_rotation_y(spin);
            *t = t.uniform_scale(scale);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppedClock;
    use crate::room::{DESK, DESK_AREA, LAPTOP, LAPTOP_LID, ROOM};

    const STEP: f32 = 1.0 / 60.0;

    fn portfolio() -> Portfolio {
        let mut config = PortfolioConfig::default();
        config.scene.seed = Some(1);
        config.hologram.seed = Some(1);
        Portfolio::new(&config)
    }

    fn run(portfolio: &mut Portfolio, clock: &mut SteppedClock, until: f32) {
        let input = Input::new();
        while clock.now() < until {
            portfolio.tick(clock.tick(), &input);
        }
    }

    fn lid() -> PointerEvent {
        PointerEvent::new(vec![LAPTOP_LID, LAPTOP, DESK_AREA, ROOM])
    }

    #[test]
    fn starts_from_config_flags() {
        let mut config = PortfolioConfig::default();
        config.scene.dark_mode = true;
        config.scene.time_of_day = 25.0;
        let portfolio = Portfolio::new(&config);
        assert!(portfolio.state().dark_mode);
        assert_eq!(portfolio.state().time_of_day, 1.0);
        assert_eq!(portfolio.photos().len(), 2);
        assert!(portfolio.photos().iter().all(|p| p.is_fallback));
    }

    #[test]
    fn lid_follows_clicks() {
        let mut portfolio = portfolio();
        let mut clock = SteppedClock::new(STEP);
        run(&mut portfolio, &mut clock, 6.0);

        assert_eq!(portfolio.click(&lid()), RouteOutcome::ToggledLaptop);
        run(&mut portfolio, &mut clock, 7.0);
        let lid = portfolio.room().local_transform(portfolio.room().laptop_lid());
        let (_, angle) = lid.rotation.to_axis_angle();
        assert!(angle > 1.0);
        assert!(!portfolio.orbit_enabled());
    }

    #[test]
    fn hologram_unhides_with_reveal() {
        let mut portfolio = portfolio();
        let mut clock = SteppedClock::new(STEP);
        run(&mut portfolio, &mut clock, 6.0);
        let hologram = portfolio.room().hologram();

        portfolio.click(&lid());
        run(&mut portfolio, &mut clock, 7.0);
        assert!(portfolio.room().is_hidden(hologram));
        run(&mut portfolio, &mut clock, 7.3);
        assert!(!portfolio.room().is_hidden(hologram));
        assert!(portfolio.hologram().is_visible());

        portfolio.click(&PointerEvent::new(vec![DESK, DESK_AREA, ROOM]));
        assert!(portfolio.room().is_hidden(hologram));
        assert_eq!(portfolio.hologram().window_count(), 0);
    }

    #[test]
    fn orbit_takes_over_at_rest_pose() {
        let mut portfolio = portfolio();
        let mut clock = SteppedClock::new(STEP);
        run(&mut portfolio, &mut clock, 0.3);
        assert!(!portfolio.orbit_enabled());

        run(&mut portfolio, &mut clock, 6.0);
        assert!(portfolio.orbit_enabled());
        let rest = CameraPose::at(glam::Vec3::new(0.0, 2.0, 5.0));
        assert!(portfolio.camera_pose().approx_eq(&rest, 1e-3));
    }

    #[test]
    fn status_line_reflects_flags() {
        let mut portfolio = portfolio();
        assert_eq!(portfolio.status_line(), "muted");
        portfolio.toggle_mute();
        portfolio.toggle_dark_mode();
        assert_eq!(portfolio.status_line(), "dark");
    }

    #[test]
    fn pick_with_empty_viewport_misses() {
        let portfolio = portfolio();
        let event = portfolio.pick(Vec2::new(10.0, 10.0), Vec2::ZERO);
        assert_eq!(event.struck(), None);
    }

    #[test]
    fn photo_frames_float_around_their_rest_pose() {
        let mut portfolio = portfolio();
        let mut clock = SteppedClock::new(STEP);
        let [(left, rest), _] = portfolio.room().photo_frames();

        run(&mut portfolio, &mut clock, 4.0);
        let early = portfolio.room().local_transform(left);
        assert!(early.position != rest.position);
        assert!(early.position.distance(rest.position) < 0.5);

        run(&mut portfolio, &mut clock, 8.0);
        let later = portfolio.room().local_transform(left);
        assert!(later.position != early.position);
        assert!(later.rotation.angle_between(rest.rotation) < 0.2);
    }

    #[test]
    fn zero_typing_interval_types_without_stalling() {
        let mut config = PortfolioConfig::default();
        config.hologram.seed = Some(1);
        config.hologram.typing_interval = 0.0;
        config.hologram.blink_interval = 0.0;
        let mut portfolio = Portfolio::new(&config);
        let mut clock = SteppedClock::new(STEP);
        run(&mut portfolio, &mut clock, 6.0);

        portfolio.click(&lid());
        run(&mut portfolio, &mut clock, 7.5);
        let terminal = portfolio.hologram().windows().next().unwrap();
        assert!(terminal.is_fully_typed());
    }
}
