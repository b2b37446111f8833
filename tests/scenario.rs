use deskfolio::props::{DESK, DESK_AREA, HOLOGRAM, HOLOGRAM_PANEL, LAPTOP, LAPTOP_LID, PLANT, ROOM};
use deskfolio::{
    CameraPose, CameraState, Input, PointerEvent, Portfolio, PortfolioConfig, RouteOutcome,
    SteppedClock, Vec3,
};

const STEP: f32 = 1.0 / 60.0;

struct Scene {
    portfolio: Portfolio,
    clock: SteppedClock,
    input: Input,
}

impl Scene {
    fn new() -> Self {
        let mut config = PortfolioConfig::default();
        config.scene.seed = Some(11);
        config.hologram.seed = Some(11);
        Self {
            portfolio: Portfolio::new(&config),
            clock: SteppedClock::new(STEP),
            input: Input::new(),
        }
    }

    /// A scene that has finished its intro flight.
    fn settled() -> Self {
        let mut scene = Self::new();
        scene.run_until(6.0);
        scene
    }

    fn step(&mut self) {
        let tick = self.clock.tick();
        self.portfolio.tick(tick, &self.input);
    }

    fn run_until(&mut self, until: f32) {
        while self.clock.now() < until {
            self.step();
        }
    }

    fn run_for(&mut self, seconds: f32) {
        let until = self.clock.now() + seconds;
        self.run_until(until);
    }

    fn now(&self) -> f32 {
        self.clock.now()
    }

    fn click(&mut self, path: Vec<&'static str>) -> RouteOutcome {
        self.portfolio.click(&PointerEvent::new(path))
    }

    fn click_laptop(&mut self) -> RouteOutcome {
        self.click(vec![LAPTOP_LID, LAPTOP, DESK_AREA, ROOM])
    }

    fn click_desk(&mut self) -> RouteOutcome {
        self.click(vec![DESK, DESK_AREA, ROOM])
    }
}

fn rest_pose() -> CameraPose {
    CameraPose::at(Vec3::new(0.0, 2.0, 5.0))
}

#[test]
fn intro_flight_runs_then_hands_over_to_orbit() {
    let mut scene = Scene::new();

    scene.run_until(0.45);
    assert!(!scene.portfolio.state().intro_animation_active);
    assert!(!scene.portfolio.orbit_enabled());

    scene.run_until(0.55);
    assert!(scene.portfolio.state().intro_animation_active);
    assert!(!scene.portfolio.orbit_enabled());

    scene.run_until(5.45);
    assert!(scene.portfolio.state().intro_animation_active);
    assert!(!scene.portfolio.orbit_enabled());

    scene.run_until(5.6);
    assert!(!scene.portfolio.state().intro_animation_active);
    assert!(scene.portfolio.orbit_enabled());
    assert!(scene.portfolio.camera_pose().approx_eq(&rest_pose(), 1e-3));
}

#[test]
fn laptop_click_opens_and_reveals_hologram() {
    let mut scene = Scene::settled();

    assert_eq!(scene.click_laptop(), RouteOutcome::ToggledLaptop);
    let clicked = scene.now();
    assert!(scene.portfolio.state().laptop_open);
    assert!(!scene.portfolio.orbit_enabled());

    scene.run_for(0.2);
    let early = scene.portfolio.laptop().lid_angle();
    assert!(early > 0.0);
    scene.run_for(0.2);
    assert!(scene.portfolio.laptop().lid_angle() > early);

    scene.run_until(clicked + 1.15);
    assert!(!scene.portfolio.hologram().is_visible());

    scene.run_until(clicked + 1.25);
    assert!(scene.portfolio.hologram().is_visible());
    assert_eq!(scene.portfolio.hologram().window_count(), 1);
}

#[test]
fn second_click_before_reveal_cancels_hologram_and_reverses_lid() {
    let mut scene = Scene::settled();

    scene.click_laptop();
    scene.run_for(0.6);
    let angle = scene.portfolio.laptop().lid_angle();

    assert_eq!(scene.click_laptop(), RouteOutcome::ToggledLaptop);
    assert!(!scene.portfolio.state().laptop_open);
    // Reversal starts from the current angle, with no jump.
    assert_eq!(scene.portfolio.laptop().lid_angle(), angle);

    let until = scene.now() + 3.0;
    while scene.now() < until {
        scene.step();
        assert!(!scene.portfolio.hologram().is_visible());
    }
    assert!(scene.portfolio.laptop().lid_angle().abs() < 1e-3);
}

#[test]
fn room_click_closes_laptop_and_returns_camera_to_rest() {
    let mut scene = Scene::settled();
    scene.click_laptop();
    scene.run_for(3.0);
    assert_eq!(scene.portfolio.director().state(), CameraState::FramingLaptop);
    assert!(scene.portfolio.hologram().is_visible());

    assert_eq!(scene.click_desk(), RouteOutcome::ClosedLaptop);
    assert!(!scene.portfolio.state().laptop_open);
    assert!(!scene.portfolio.hologram().is_visible());

    scene.run_for(2.0);
    assert_eq!(scene.portfolio.director().state(), CameraState::Idle);
    assert!(scene.portfolio.camera_pose().approx_eq(&rest_pose(), 1e-3));
    assert!(scene.portfolio.orbit_enabled());
}

#[test]
fn room_click_while_closed_is_unhandled() {
    let mut scene = Scene::settled();
    assert_eq!(
        scene.click(vec![PLANT, DESK_AREA, ROOM]),
        RouteOutcome::Unhandled
    );
    assert!(!scene.portfolio.state().laptop_open);
    assert!(scene.portfolio.orbit_enabled());
}

#[test]
fn hologram_clicks_keep_laptop_open() {
    let mut scene = Scene::settled();
    scene.click_laptop();
    scene.run_for(1.5);

    assert_eq!(
        scene.click(vec![HOLOGRAM_PANEL, HOLOGRAM]),
        RouteOutcome::Ignored
    );
    assert!(scene.portfolio.state().laptop_open);
    assert!(scene.portfolio.hologram().is_visible());
}

#[test]
fn laptop_state_tracks_toggle_parity() {
    let mut scene = Scene::new();
    let gaps = [0.0, 0.1, 0.7, 0.0, 2.3, 0.05, 1.1, 0.4, 0.0];
    for (n, gap) in gaps.iter().enumerate() {
        scene.run_for(*gap);
        scene.click_laptop();
        assert_eq!(scene.portfolio.state().laptop_open, n % 2 == 0);
    }
}

#[test]
fn terminal_windows_are_capped_and_evict_oldest() {
    let mut scene = Scene::settled();
    scene.click_laptop();
    let clicked = scene.now();
    scene.run_until(clicked + 1.25);

    let first = scene
        .portfolio
        .hologram()
        .windows()
        .next()
        .map(|w| w.id.clone())
        .expect("first terminal spawns on reveal");

    // Spawns at reveal, then every 5 s: the fifth lands 20 s after reveal.
    while scene.now() < clicked + 1.2 + 19.9 {
        scene.step();
        assert!(scene.portfolio.hologram().window_count() <= 4);
    }
    assert!(scene.portfolio.hologram().window(&first).is_some());

    scene.run_until(clicked + 1.2 + 20.1);
    assert_eq!(scene.portfolio.hologram().window_count(), 4);
    assert!(scene.portfolio.hologram().window(&first).is_none());
}

#[test]
fn terminal_types_one_line_per_interval() {
    let mut scene = Scene::settled();
    scene.click_laptop();
    let clicked = scene.now();
    scene.run_until(clicked + 1.25);
    let (id, created) = scene
        .portfolio
        .hologram()
        .windows()
        .next()
        .map(|w| (w.id.clone(), w.created_at))
        .expect("first terminal spawns on reveal");

    scene.run_until(created + 0.25);
    let terminal = scene.portfolio.hologram().window(&id).unwrap();
    assert_eq!(terminal.lines_shown(), 2);
    assert!(!terminal.is_fully_typed());

    scene.run_until(created + 0.45);
    let terminal = scene.portfolio.hologram().window(&id).unwrap();
    assert_eq!(terminal.lines_shown(), 4);
    assert!(terminal.is_fully_typed());
    let expected: Vec<&str> = terminal.text().lines().collect();
    assert_eq!(terminal.displayed_text(), expected.join("\n"));
}

#[test]
fn closing_terminal_removes_only_that_window() {
    let mut scene = Scene::settled();
    scene.click_laptop();
    scene.run_for(6.5);
    assert_eq!(scene.portfolio.hologram().window_count(), 2);

    let id = scene
        .portfolio
        .hologram()
        .windows()
        .next()
        .map(|w| w.id.clone())
        .unwrap();
    assert!(scene.portfolio.close_terminal(&id));
    assert!(!scene.portfolio.close_terminal(&id));
    assert_eq!(scene.portfolio.hologram().window_count(), 1);
}

#[test]
fn interrupted_camera_move_settles_on_latest_target() {
    let mut scene = Scene::settled();

    scene.click_laptop();
    scene.run_for(0.8);
    assert!(scene.portfolio.director().is_animating());
    scene.click_laptop();
    assert_eq!(scene.portfolio.director().state(), CameraState::FramingRoom);

    scene.run_for(0.5);
    scene.click_laptop();
    assert_eq!(scene.portfolio.director().state(), CameraState::FramingLaptop);

    scene.run_for(3.0);
    assert!(!scene.portfolio.director().is_animating());
    let pose = scene.portfolio.camera_pose();
    assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 2.6, 4.0), 1e-3));
    assert!((pose.rotation.x + 0.3).abs() < 1e-3);
}

#[test]
fn laptop_opened_during_intro_is_framed_after_landing() {
    let mut scene = Scene::new();
    scene.run_until(2.0);

    assert_eq!(scene.click_laptop(), RouteOutcome::ToggledLaptop);
    assert!(scene.portfolio.state().laptop_open);
    assert!(scene.portfolio.state().intro_animation_active);
    assert_eq!(scene.portfolio.director().state(), CameraState::IntroFlight);

    scene.run_until(5.6);
    assert!(!scene.portfolio.state().intro_animation_active);
    assert_eq!(scene.portfolio.director().state(), CameraState::FramingLaptop);
    assert!(!scene.portfolio.orbit_enabled());
}

#[test]
fn panel_section_survives_close_and_reopen() {
    let mut scene = Scene::settled();
    scene.click_laptop();
    scene.run_for(1.5);
    scene
        .portfolio
        .select_section(deskfolio::PanelSection::Projects);
    assert_eq!(scene.portfolio.toggle_project_card(1), Some(true));

    scene.click_desk();
    scene.run_for(2.0);
    scene.click_laptop();
    scene.run_for(1.5);

    let hologram = scene.portfolio.hologram();
    assert_eq!(
        hologram.active_section(),
        deskfolio::PanelSection::Projects
    );
    assert!(hologram.is_card_flipped(1));
    assert_eq!(hologram.window_count(), 1);
}
