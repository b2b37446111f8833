//! The hologram panel shown above the open laptop.
//!
//! While visible, the panel spawns a terminal window immediately and then one
//! every `spawn_interval` seconds. At most `capacity` windows exist; a new one
//! evicts the oldest. Each window types its script one line per
//! `typing_interval` and blinks a cursor every `blink_interval`, both on its
//! own schedule.
//!
//! Hiding the panel tears down every window and the spawn schedule. The
//! selected section and flipped project cards survive a hide/show cycle.
//!
//! # Example
//!
//! ```ignore
//! let mut hologram = Hologram::new(&config.hologram)
//!     .scale_spring(config.laptop.hologram_stiffness, config.laptop.hologram_damping);
//!
//! hologram.show(tick.time);
//! // In frame loop:
//! hologram.tick(tick);
//! for window in hologram.windows() {
//!     draw_terminal(&window.id, &window.displayed_text(), window.cursor_visible());
//! }
//! ```

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::clock::Tick;
use crate::config::HologramConfig;
use crate::timer::Interval;
use crate::tween::{Lerp, Spring};

/// Radians per second the panel turns about its vertical axis.
const SPIN_SPEED: f32 = 0.5;
/// Panel scale the reveal spring starts from.
const REVEAL_SCALE: f32 = 0.1;

/// Panel tabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PanelSection {
    #[default]
    About,
    Projects,
    Experience,
}

impl PanelSection {
    pub const ALL: [PanelSection; 3] = [
        PanelSection::About,
        PanelSection::Projects,
        PanelSection::Experience,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelSection::About => "About",
            PanelSection::Projects => "Projects",
            PanelSection::Experience => "Experience",
        }
    }
}

/// Terminal flavours. The kind names the window's icon and prefixes its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    Shield,
    Code2,
    Network,
}

impl TerminalKind {
    pub const ALL: [TerminalKind; 3] = [
        TerminalKind::Shield,
        TerminalKind::Code2,
        TerminalKind::Network,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TerminalKind::Shield => "Shield",
            TerminalKind::Code2 => "Code2",
            TerminalKind::Network => "Network",
        }
    }

    /// Text the window types out.
    pub fn script(self) -> &'static str {
        match self {
            TerminalKind::Shield => {
                "> booting portfolio...\n> mounting projects...\n> indexing experience...\n> ready.\n"
            }
            TerminalKind::Code2 => {
                "> skills:\n  - Rust / wgpu\n  - TypeScript\n  - shaders (WGSL, GLSL)\n"
            }
            TerminalKind::Network => {
                "> recent work:\n  - Desk portfolio\n  - Render graph\n  - Sync service\n"
            }
        }
    }
}

/// An auto-typing text window inside the panel.
#[derive(Clone, Debug)]
pub struct TerminalWindow {
    pub id: String,
    pub kind: TerminalKind,
    /// Top edge, percent of the panel height.
    pub top_percent: f32,
    /// Left edge, percent of the panel width.
    pub left_percent: f32,
    pub created_at: f32,
    lines_shown: usize,
    typing: Interval,
    cursor_visible: bool,
    blink: Interval,
}

impl TerminalWindow {
    fn new(
        id: String,
        kind: TerminalKind,
        top_percent: f32,
        left_percent: f32,
        now: f32,
        config: &HologramConfig,
    ) -> Self {
        Self {
            id,
            kind,
            top_percent,
            left_percent,
            created_at: now,
            lines_shown: 0,
            typing: Interval::starting_at(now, config.typing_interval),
            cursor_visible: true,
            blink: Interval::starting_at(now, config.blink_interval),
        }
    }

    pub fn text(&self) -> &'static str {
        self.kind.script()
    }

    pub fn line_count(&self) -> usize {
        self.text().lines().count()
    }

    pub fn lines_shown(&self) -> usize {
        self.lines_shown
    }

    /// The lines typed so far.
    pub fn displayed_text(&self) -> String {
        self.text()
            .lines()
            .take(self.lines_shown)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_fully_typed(&self) -> bool {
        self.lines_shown >= self.line_count()
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn tick(&mut self, now: f32) {
        let typed = self.typing.poll(now) as usize;
        self.lines_shown = (self.lines_shown + typed).min(self.line_count());
        if self.blink.poll(now) % 2 == 1 {
            self.cursor_visible = !self.cursor_visible;
        }
    }
}

/// One entry of the projects tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectCard {
    pub name: &'static str,
    pub kind: &'static str,
    pub summary: &'static str,
    /// Shown on the back of the card.
    pub description: &'static str,
}

/// One entry of the experience tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Role {
    pub title: &'static str,
    pub company: &'static str,
    pub period: &'static str,
    pub summary: &'static str,
}

/// Static text shown on the panel.
#[derive(Clone, Debug)]
pub struct PanelContent {
    pub name: &'static str,
    pub tagline: &'static str,
    pub bio: &'static str,
    pub skills: &'static [&'static str],
    pub interests: &'static [&'static str],
    pub projects: &'static [ProjectCard],
    pub experience: &'static [Role],
}

impl Default for PanelContent {
    fn default() -> Self {
        Self {
            name: "Alex Rivera",
            tagline: "Graphics programmer and tools developer",
            bio: "Builds interactive 3D scenes and the tooling behind them. \
                  Most at home where rendering meets user interaction.",
            skills: &[
                "Rust", "wgpu", "WGSL", "TypeScript", "three.js", "ECS design", "UX",
            ],
            interests: &["Real-time rendering", "AR/VR", "Game tools", "Motion design"],
            projects: &[
                ProjectCard {
                    name: "Desk Portfolio",
                    kind: "web",
                    summary: "Interactive room scene",
                    description: "A 3D desk with a clickable laptop that opens a holographic resume.",
                },
                ProjectCard {
                    name: "Render Graph",
                    kind: "engine",
                    summary: "Composable GPU passes",
                    description: "Declarative pass scheduling with hot-reloaded shaders.",
                },
                ProjectCard {
                    name: "Sync Service",
                    kind: "cloud",
                    summary: "Realtime state sync",
                    description: "Conflict-free replication for collaborative editors.",
                },
                ProjectCard {
                    name: "Field Notes",
                    kind: "mobile",
                    summary: "Offline-first notes",
                    description: "Cross-platform note taking with background sync.",
                },
            ],
            experience: &[
                Role {
                    title: "Senior Engineer",
                    company: "Lumen Labs",
                    period: "2022 - present",
                    summary: "Leads the interactive visualisation team.",
                },
                Role {
                    title: "Graphics Engineer",
                    company: "Northwind Studio",
                    period: "2020 - 2022",
                    summary: "Shipped the studio's in-house scene editor.",
                },
                Role {
                    title: "Full Stack Developer",
                    company: "Brightside",
                    period: "2018 - 2020",
                    summary: "Built web frontends and the APIs behind them.",
                },
            ],
        }
    }
}

pub struct Hologram {
    config: HologramConfig,
    content: PanelContent,
    rng: StdRng,
    visible: bool,
    section: PanelSection,
    flipped: Vec<bool>,
    windows: VecDeque<TerminalWindow>,
    spawner: Option<Interval>,
    next_id: u32,
    scale: Spring,
    spin: f32,
    time: f32,
}

impl Hologram {
    pub fn new(config: &HologramConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let content = PanelContent::default();
        Self {
            config: config.clone(),
            flipped: vec![false; content.projects.len()],
            content,
            rng,
            visible: false,
            section: PanelSection::default(),
            windows: VecDeque::new(),
            spawner: None,
            next_id: 0,
            scale: Spring::new(REVEAL_SCALE, 100.0, 10.0),
            spin: 0.0,
            time: 0.0,
        }
    }

    /// Tension and friction of the reveal scale spring.
    pub fn scale_spring(mut self, stiffness: f32, damping: f32) -> Self {
        self.scale.stiffness = stiffness;
        self.scale.damping = damping;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    /// Mount the panel at time `now`. Already visible panels are left alone.
    pub fn show(&mut self, now: f32) {
        if self.visible {
            return;
        }
        info!("hologram shown");
        self.visible = true;
        self.time = now;
        self.scale.snap(REVEAL_SCALE);
        self.scale.retarget(1.0);
        self.spawner = Some(Interval::starting_at(now, self.config.spawn_interval));
        self.spawn(now);
    }

    /// Unmount the panel, discarding every terminal window.
    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }
        info!("hologram hidden");
        self.visible = false;
        self.windows.clear();
        self.spawner = None;
        self.next_id = 0;
        self.scale.snap(REVEAL_SCALE);
    }

    pub fn tick(&mut self, tick: Tick) {
        if !self.visible {
            return;
        }
        self.time = tick.time;
        self.spin += SPIN_SPEED * tick.dt;
        self.scale.step(tick.dt);

        let due = self.spawner.as_mut().map_or(0, |s| s.poll(tick.time));
        for _ in 0..due {
            self.spawn(tick.time);
        }
        for window in &mut self.windows {
            window.tick(tick.time);
        }
    }

    fn spawn(&mut self, now: f32) {
        let kind = TerminalKind::ALL[self.rng.gen_range(0..TerminalKind::ALL.len())];
        let (top_lo, top_hi) = self.config.top_range;
        let (left_lo, left_hi) = self.config.left_range;
        let top = top_lo.lerp(top_hi, self.rng.r#gen::<f32>());
        let left = left_lo.lerp(left_hi, self.rng.r#gen::<f32>());

        self.next_id += 1;
        let id = format!("{}_{}", kind.label(), self.next_id);

        while self.windows.len() >= self.config.capacity.max(1) {
            if let Some(evicted) = self.windows.pop_front() {
                debug!(id = %evicted.id, "terminal evicted");
            }
        }
        debug!(%id, top, left, "terminal spawned");
        self.windows
            .push_back(TerminalWindow::new(id, kind, top, left, now, &self.config));
    }

    /// Terminal windows, oldest first.
    pub fn windows(&self) -> impl Iterator<Item = &TerminalWindow> {
        self.windows.iter()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn window(&self, id: &str) -> Option<&TerminalWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Close a terminal window. Returns false if no window has that id.
    pub fn close_window(&mut self, id: &str) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        let closed = self.windows.len() != before;
        if closed {
            debug!(id, "terminal closed");
        }
        closed
    }

    pub fn active_section(&self) -> PanelSection {
        self.section
    }

    pub fn select_section(&mut self, section: PanelSection) {
        if self.section != section {
            info!(section = section.title(), "panel section selected");
            self.section = section;
        }
    }

    /// Flip a project card over. Returns the new side, or `None` for an
    /// unknown card.
    pub fn toggle_project_card(&mut self, index: usize) -> Option<bool> {
        let flipped = self.flipped.get_mut(index)?;
        *flipped = !*flipped;
        Some(*flipped)
    }

    pub fn is_card_flipped(&self, index: usize) -> bool {
        self.flipped.get(index).copied().unwrap_or(false)
    }

    /// Reveal scale, springing from near zero to 1 after `show`.
    pub fn scale(&self) -> f32 {
        self.scale.current
    }

    /// Accumulated rotation about the vertical axis.
    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Vertical float offset.
    pub fn bob(&self) -> f32 {
        (self.time * 0.5).sin() * 0.03
    }

    /// Flickering material opacity.
    pub fn opacity(&self) -> f32 {
        0.8 + (self.time * 2.0).sin() * 0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppedClock;

    fn hologram() -> Hologram {
        Hologram::new(&HologramConfig {
            seed: Some(42),
            ..HologramConfig::default()
        })
    }

    fn run(hologram: &mut Hologram, clock: &mut SteppedClock, until: f32) {
        while clock.now() < until - 1e-4 {
            hologram.tick(clock.tick());
        }
    }

    #[test]
    fn first_window_appears_on_show() {
        let mut h = hologram();
        assert_eq!(h.window_count(), 0);
        h.show(0.0);
        assert_eq!(h.window_count(), 1);
        let first = h.windows().next().unwrap();
        assert!(first.id.ends_with("_1"));
        assert!((10.0..=40.0).contains(&first.top_percent));
        assert!((5.0..=25.0).contains(&first.left_percent));
    }

    #[test]
    fn windows_are_capped_fifo() {
        let mut h = hologram();
        let mut clock = SteppedClock::new(0.1);
        h.show(0.0);
        run(&mut h, &mut clock, 21.0);

        // Spawned at 0, 5, 10, 15 and 20 seconds.
        assert_eq!(h.window_count(), 4);
        let created: Vec<f32> = h.windows().map(|w| w.created_at).collect();
        assert!(created.iter().all(|&t| t > 1.0), "oldest survived: {created:?}");
        let ids: Vec<&str> = h.windows().map(|w| w.id.as_str()).collect();
        assert!(ids[0].ends_with("_2") && ids[3].ends_with("_5"));
    }

    #[test]
    fn typing_reveals_one_line_per_firing() {
        let mut h = hologram();
        h.show(0.0);
        let id = h.windows().next().unwrap().id.clone();
        assert_eq!(h.window(&id).unwrap().line_count(), 4);

        for (n, time) in [0.1_f32, 0.2, 0.3, 0.4].into_iter().enumerate() {
            h.tick(Tick::new(time + 1e-4, 0.1));
            let window = h.window(&id).unwrap();
            assert_eq!(window.lines_shown(), n + 1);
        }
        let window = h.window(&id).unwrap();
        assert!(window.is_fully_typed());
        assert_eq!(window.displayed_text(), window.text().trim_end());

        h.tick(Tick::new(1.0, 0.6));
        assert_eq!(h.window(&id).unwrap().lines_shown(), 4);
    }

    #[test]
    fn cursor_blinks_after_typing_finishes() {
        let mut h = hologram();
        h.show(0.0);
        let id = h.windows().next().unwrap().id.clone();
        assert!(h.window(&id).unwrap().cursor_visible());
        h.tick(Tick::new(0.5, 0.5));
        assert!(!h.window(&id).unwrap().cursor_visible());
        // Six firings by 3.0s in total, long after typing finished.
        h.tick(Tick::new(3.0, 2.5));
        assert!(h.window(&id).unwrap().cursor_visible());
        h.tick(Tick::new(3.5, 0.5));
        assert!(!h.window(&id).unwrap().cursor_visible());
    }

    #[test]
    fn close_removes_only_the_named_window() {
        let mut h = hologram();
        h.show(0.0);
        h.tick(Tick::new(5.0, 5.0));
        let ids: Vec<String> = h.windows().map(|w| w.id.clone()).collect();
        assert_eq!(ids.len(), 2);

        assert!(h.close_window(&ids[0]));
        assert!(!h.close_window(&ids[0]));
        assert_eq!(h.window_count(), 1);
        assert_eq!(h.windows().next().unwrap().id, ids[1]);
    }

    #[test]
    fn hide_resets_windows_but_keeps_section() {
        let mut h = hologram();
        h.show(0.0);
        h.select_section(PanelSection::Experience);
        h.toggle_project_card(2);
        h.tick(Tick::new(5.0, 5.0));
        h.hide();
        assert!(!h.is_visible());
        assert_eq!(h.window_count(), 0);

        h.show(10.0);
        assert_eq!(h.window_count(), 1);
        assert!(h.windows().next().unwrap().id.ends_with("_1"));
        assert_eq!(h.active_section(), PanelSection::Experience);
        assert!(h.is_card_flipped(2));
    }

    #[test]
    fn hidden_panel_does_not_spawn() {
        let mut h = hologram();
        h.tick(Tick::new(30.0, 30.0));
        assert_eq!(h.window_count(), 0);
    }

    #[test]
    fn reveal_scale_springs_to_full_size() {
        let mut h = hologram();
        let mut clock = SteppedClock::new(1.0 / 60.0);
        h.show(0.0);
        assert!((h.scale() - 0.1).abs() < 1e-6);
        run(&mut h, &mut clock, 3.0);
        assert!((h.scale() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn panel_content_matches_card_slots() {
        let mut h = hologram();
        let projects = h.content().projects;
        assert_eq!(projects.len(), 4);
        assert_eq!(h.content().experience.len(), 3);
        assert_eq!(h.toggle_project_card(projects.len() - 1), Some(true));
        assert_eq!(h.toggle_project_card(projects.len()), None);
    }

    #[test]
    fn opacity_flickers_around_eighty_percent() {
        let mut h = hologram();
        let mut clock = SteppedClock::new(0.05);
        h.show(0.0);
        let mut seen = Vec::new();
        while clock.now() < 3.0 {
            h.tick(clock.tick());
            seen.push(h.opacity());
        }
        assert!(seen.iter().all(|o| (0.69..=0.91).contains(o)));
        let (lo, hi) = seen
            .iter()
            .fold((1.0_f32, 0.0_f32), |(lo, hi), o| (lo.min(*o), hi.max(*o)));
        assert!(hi - lo > 0.1);
    }

    #[test]
    fn unknown_project_card_is_rejected() {
        let mut h = hologram();
        assert_eq!(h.toggle_project_card(0), Some(true));
        assert_eq!(h.toggle_project_card(0), Some(false));
        assert_eq!(h.toggle_project_card(99), None);
    }

    #[test]
    fn same_seed_places_windows_identically() {
        let mut a = hologram();
        let mut b = hologram();
        a.show(0.0);
        b.show(0.0);
        let wa = a.windows().next().unwrap();
        let wb = b.windows().next().unwrap();
        assert_eq!(wa.id, wb.id);
        assert_eq!(wa.top_percent, wb.top_percent);
    }
}
