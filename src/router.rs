//! Click routing.
//!
//! Exactly one handler reacts to a click. The laptop claims clicks on itself
//! in any state. While the laptop is open, the hologram swallows its own
//! clicks and anything else in the room closes the laptop. While it is closed,
//! room clicks fall through unhandled.

use tracing::info;

use crate::laptop::Laptop;
use crate::room::{HOLOGRAM, LAPTOP, PointerEvent};
use crate::store::SceneStore;

/// What a routed click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The laptop was toggled.
    ToggledLaptop,
    /// A room click closed the open laptop.
    ClosedLaptop,
    /// Consumed without effect (hologram clicks while open).
    Ignored,
    /// Nothing claimed the click.
    Unhandled,
}

impl RouteOutcome {
    /// True if the click stopped at a handler.
    pub fn consumed(self) -> bool {
        !matches!(self, RouteOutcome::Unhandled)
    }
}

/// Maps clicks on named props to store mutations.
#[derive(Clone, Debug)]
pub struct InteractionRouter {
    laptop: &'static str,
    hologram: &'static str,
}

impl Default for InteractionRouter {
    fn default() -> Self {
        Self {
            laptop: LAPTOP,
            hologram: HOLOGRAM,
        }
    }
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        &self,
        event: &PointerEvent,
        laptop: &mut Laptop,
        store: &mut SceneStore,
    ) -> RouteOutcome {
        let Some(struck) = event.struck() else {
            return RouteOutcome::Unhandled;
        };

        if event.involves(self.laptop) {
            laptop.toggle(store);
            return RouteOutcome::ToggledLaptop;
        }

        if !store.laptop_open() {
            return RouteOutcome::Unhandled;
        }

        if event.involves(self.hologram) {
            return RouteOutcome::Ignored;
        }

        info!(struck, "room click closes laptop");
        store.set_laptop_open(false);
        RouteOutcome::ClosedLaptop
    }
}
