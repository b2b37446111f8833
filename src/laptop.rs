//! The laptop prop: lid spring, screen glow, click bounce and the delayed
//! hologram reveal.
//!
//! The scene store's `laptop_open` flag is the single source of truth. A click
//! only flips that flag through [`Laptop::toggle`]; the lid, glow and reveal
//! timers follow from [`Laptop::handle_change`], so a close triggered by a
//! room click behaves exactly like one triggered by the laptop itself.
//!
//! Reveal timing runs from the moment the laptop opens:
//!
//! ```text
//! open ──0.4s──▶ screen on ──0.8s──▶ hologram revealed
//! ```
//!
//! Closing at any point cancels both pending steps and hides the hologram
//! immediately.

use tracing::{debug, info};

use crate::clock::Tick;
use crate::config::LaptopConfig;
use crate::store::{SceneStore, StoreChange};
use crate::timer::Delay;
use crate::tween::{Easing, Leg, Spring, Track, Tween};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LaptopPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Signals for the hologram panel and screen visuals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaptopEvent {
    ScreenOn,
    RevealHologram,
    HideHologram,
}

pub struct Laptop {
    config: LaptopConfig,
    phase: LaptopPhase,
    lid: Spring,
    glow: Option<Tween<f32>>,
    bounce: Option<Track<f32>>,
    boot: Option<Delay>,
    reveal: Option<Delay>,
}

impl Laptop {
    pub fn new(config: &LaptopConfig) -> Self {
        Self {
            config: config.clone(),
            phase: LaptopPhase::Closed,
            lid: Spring::critically_damped(0.0, config.lid_stiffness),
            glow: None,
            bounce: None,
            boot: None,
            reveal: None,
        }
    }

    pub fn phase(&self) -> LaptopPhase {
        self.phase
    }

    /// Current lid opening angle in radians.
    pub fn lid_angle(&self) -> f32 {
        self.lid.current
    }

    /// Screen emissive intensity in `[0, 1]`.
    pub fn screen_glow(&self) -> f32 {
        self.glow.as_ref().map_or(0.0, Tween::value)
    }

    /// Uniform scale of the base, briefly above 1 after a click.
    pub fn base_scale(&self) -> f32 {
        self.bounce.as_ref().map_or(1.0, Track::value)
    }

    /// True while the hologram reveal is still scheduled.
    pub fn reveal_pending(&self) -> bool {
        self.reveal.is_some()
    }

    /// Flip the open flag. The store notifies everything else.
    pub fn toggle(&mut self, store: &mut SceneStore) {
        let open = !store.laptop_open();
        info!(open, "laptop toggled");
        let scale = self.config.bounce_scale;
        let half = self.config.bounce_duration;
        self.bounce = Some(Track::new(
            1.0,
            vec![
                Leg::new(scale, half, Easing::EaseOut),
                Leg::new(1.0, half, Easing::EaseIn),
            ],
        ));
        store.set_laptop_open(open);
    }

    /// React to a scene store change observed at time `now`.
    pub fn handle_change(&mut self, change: StoreChange, now: f32) -> Option<LaptopEvent> {
        match change {
            StoreChange::LaptopOpen(true) => {
                self.open(now);
                None
            }
            StoreChange::LaptopOpen(false) => {
                self.close();
                Some(LaptopEvent::HideHologram)
            }
            _ => None,
        }
    }

    fn open(&mut self, now: f32) {
        self.lid.retarget(self.config.open_angle);
        self.boot = Some(Delay::after(now, self.config.boot_delay));
        self.reveal = Some(Delay::after(
            now,
            self.config.boot_delay + self.config.hologram_delay,
        ));
        self.set_phase(LaptopPhase::Opening);
    }

    fn close(&mut self) {
        self.lid.retarget(0.0);
        self.boot = None;
        self.reveal = None;
        self.glow = None;
        self.set_phase(LaptopPhase::Closing);
    }

    /// Advance animations and fire due reveal steps.
    pub fn tick(&mut self, tick: Tick) -> Vec<LaptopEvent> {
        let mut events = Vec::new();

        self.lid.step(tick.dt);
        if let Some(bounce) = self.bounce.as_mut() {
            bounce.advance(tick.dt);
            if bounce.is_finished() {
                self.bounce = None;
            }
        }
        if let Some(glow) = self.glow.as_mut() {
            glow.advance(tick.dt);
        }

        if let Some(boot) = self.boot.as_mut() {
            if boot.poll(tick.time) {
                let late = tick.time - boot.due();
                self.boot = None;
                let mut glow =
                    Tween::new(0.0, 1.0, self.config.glow_duration).easing(Easing::Power2Out);
                glow.advance(late);
                self.glow = Some(glow);
                debug!("laptop screen on");
                events.push(LaptopEvent::ScreenOn);
            }
        }
        if let Some(reveal) = self.reveal.as_mut() {
            if reveal.poll(tick.time) {
                self.reveal = None;
                events.push(LaptopEvent::RevealHologram);
            }
        }

        if self.lid.is_settled() {
            match self.phase {
                LaptopPhase::Opening => self.set_phase(LaptopPhase::Open),
                LaptopPhase::Closing => self.set_phase(LaptopPhase::Closed),
                LaptopPhase::Open | LaptopPhase::Closed => {}
            }
        }
        events
    }

    fn set_phase(&mut self, phase: LaptopPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "laptop phase");
            self.phase = phase;
        }
    }
}
