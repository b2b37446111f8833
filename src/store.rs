//! The shared scene store.
//!
//! [`SceneStore`] is the single owner of [`SceneState`]. Components read the
//! state freely through getters; every mutation goes through a setter, and
//! every setter that changes a value synchronously notifies all subscribers
//! before returning.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use deskfolio::{SceneStore, StoreChange};
//!
//! let mut store = SceneStore::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! store.subscribe(move |_, change| sink.borrow_mut().push(change));
//!
//! store.set_laptop_open(true);
//! assert!(store.laptop_open());
//! assert_eq!(*seen.borrow(), vec![StoreChange::LaptopOpen(true)]);
//! ```

use tracing::debug;

/// Process-wide scene flags.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub dark_mode: bool,
    pub muted: bool,
    pub laptop_open: bool,
    /// True only while the scripted startup camera flight is running.
    pub intro_animation_active: bool,
    /// Hour of day in `[0, 24)`, consumed by the sky background.
    pub time_of_day: f32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            dark_mode: false,
            muted: true,
            laptop_open: false,
            intro_animation_active: false,
            time_of_day: 14.0,
        }
    }
}

impl SceneState {
    /// Free camera orbiting is only allowed when nothing else drives the camera.
    pub fn orbit_allowed(&self) -> bool {
        !self.laptop_open && !self.intro_animation_active
    }
}

/// A single field change, delivered to subscribers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoreChange {
    DarkMode(bool),
    Muted(bool),
    LaptopOpen(bool),
    IntroAnimationActive(bool),
    TimeOfDay(f32),
}

/// Handle returned by [`SceneStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&SceneState, StoreChange)>;

/// Owner of [`SceneState`] with observer-style change notification.
pub struct SceneStore {
    state: SceneState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::with_state(SceneState::default())
    }
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SceneState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Snapshot of all fields.
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn dark_mode(&self) -> bool {
        self.state.dark_mode
    }

    pub fn muted(&self) -> bool {
        self.state.muted
    }

    pub fn laptop_open(&self) -> bool {
        self.state.laptop_open
    }

    pub fn intro_animation_active(&self) -> bool {
        self.state.intro_animation_active
    }

    pub fn time_of_day(&self) -> f32 {
        self.state.time_of_day
    }

    /// Register a callback invoked after every effective change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SceneState, StoreChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub, _)| *sub != id);
    }

    pub fn set_dark_mode(&mut self, value: bool) {
        if self.state.dark_mode != value {
            self.state.dark_mode = value;
            self.notify(StoreChange::DarkMode(value));
        }
    }

    pub fn set_muted(&mut self, value: bool) {
        if self.state.muted != value {
            self.state.muted = value;
            self.notify(StoreChange::Muted(value));
        }
    }

    pub fn set_laptop_open(&mut self, value: bool) {
        if self.state.laptop_open != value {
            self.state.laptop_open = value;
            self.notify(StoreChange::LaptopOpen(value));
        }
    }

    pub fn set_intro_animation_active(&mut self, value: bool) {
        if self.state.intro_animation_active != value {
            self.state.intro_animation_active = value;
            self.notify(StoreChange::IntroAnimationActive(value));
        }
    }

    /// Set the hour of day, wrapped into `[0, 24)`.
    pub fn set_time_of_day(&mut self, hour: f32) {
        let hour = hour.rem_euclid(24.0);
        if self.state.time_of_day != hour {
            self.state.time_of_day = hour;
            self.notify(StoreChange::TimeOfDay(hour));
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.set_dark_mode(!self.state.dark_mode);
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.state.muted);
    }

    fn notify(&mut self, change: StoreChange) {
        debug!(?change, "scene store changed");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state, change);
        }
    }
}
