//! The room scene graph.
//!
//! Props live in a `hecs` world as entities with a [`Name`], a local
//! [`Transform`], an optional [`Parent`] and an optional
//! [`Collider`](crate::Collider). Grouping matters for interaction: a click on
//! the laptop lid is a click on the laptop because `"laptop"` appears in the
//! lid's ancestor chain.
//!
//! ```text
//! room (sways)
//! ├── photo_frame_left, photo_frame_right (float)
//! └── desk_area
//!     ├── desk, chair, plant, mug
//!     └── laptop
//!         └── laptop_base (bounces)
//!             └── laptop_lid (rotates)
//! hologram (hidden until revealed)
//! └── hologram_panel
//! ```

use std::f32::consts::{FRAC_PI_6, FRAC_PI_8};

use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};
use tracing::warn;

use crate::picking::Collider;

pub const ROOM: &str = "room";
pub const DESK_AREA: &str = "desk_area";
pub const DESK: &str = "desk";
pub const CHAIR: &str = "chair";
pub const LAPTOP: &str = "laptop";
pub const LAPTOP_BASE: &str = "laptop_base";
pub const LAPTOP_LID: &str = "laptop_lid";
pub const PLANT: &str = "plant";
pub const MUG: &str = "mug";
pub const PHOTO_FRAME_LEFT: &str = "photo_frame_left";
pub const PHOTO_FRAME_RIGHT: &str = "photo_frame_right";
pub const HOLOGRAM: &str = "hologram";
pub const HOLOGRAM_PANEL: &str = "hologram_panel";

/// Resting position of the hologram, floating above and clear of the laptop.
pub const HOLOGRAM_REST: Vec3 = Vec3::new(0.0, 1.6, 0.0);

/// Identity of a prop. Interaction policy matches on these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Name(pub &'static str);

/// Scene-graph parent. Entities without one are roots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Marks an entity (and everything below it) as not rendered and not pickable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hidden;

/// Position, rotation and scale relative to the parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Local-to-parent matrix in scale, rotate, translate order.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// A click target described by name, struck object first, then each ancestor
/// up to the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerEvent {
    pub path: Vec<&'static str>,
}

impl PointerEvent {
    pub fn new(path: Vec<&'static str>) -> Self {
        Self { path }
    }

    /// Name of the struck object, if anything was struck.
    pub fn struck(&self) -> Option<&'static str> {
        self.path.first().copied()
    }

    /// True if the struck object or any of its ancestors has this name.
    pub fn involves(&self, name: &str) -> bool {
        self.path.iter().any(|n| *n == name)
    }
}

/// The prop hierarchy and the handles the controllers drive each tick.
pub struct Room {
    world: World,
    root: Entity,
    laptop_base: Entity,
    laptop_lid: Entity,
    hologram: Entity,
    plant: Entity,
    photo_frames: [(Entity, Transform); 2],
}

impl Room {
    /// Build the stock room with the laptop base at `laptop_position`.
    pub fn new(laptop_position: Vec3) -> Self {
        let mut world = World::new();

        let root = world.spawn((Name(ROOM), Transform::new()));
        let photo_frames = [
            (PHOTO_FRAME_LEFT, Vec3::new(-1.5, 1.5, -0.5), FRAC_PI_6),
            (PHOTO_FRAME_RIGHT, Vec3::new(1.5, 1.8, -0.8), -FRAC_PI_8),
        ]
        .map(|(name, position, yaw)| {
            let rest = Transform::from_position(position).rotation(Quat::from_rotation_y(yaw));
            let frame = world.spawn((
                Name(name),
                Parent(root),
                rest,
                Collider::box_collider(Vec3::new(0.6, 0.8, 0.05)),
            ));
            (frame, rest)
        });

        let desk_area = world.spawn((Name(DESK_AREA), Parent(root), Transform::new()));
        world.spawn((
            Name(DESK),
            Parent(desk_area),
            Transform::from_position(Vec3::new(0.0, 0.04, 0.0)),
            Collider::box_collider(Vec3::new(2.4, 0.08, 1.2)),
        ));
        world.spawn((
            Name(CHAIR),
            Parent(desk_area),
            Transform::from_position(Vec3::new(0.0, -0.4, 0.8)),
            Collider::box_collider(Vec3::new(0.6, 0.8, 0.6)),
        ));
        let plant = world.spawn((
            Name(PLANT),
            Parent(desk_area),
            Transform::from_position(Vec3::new(0.9, 0.3, -0.3)),
            Collider::sphere(0.25),
        ));
        world.spawn((
            Name(MUG),
            Parent(desk_area),
            Transform::from_position(Vec3::new(-0.7, 0.16, 0.2)),
            Collider::box_collider(Vec3::new(0.12, 0.16, 0.12)),
        ));

        let laptop = world.spawn((Name(LAPTOP), Parent(desk_area), Transform::new()));
        let laptop_base = world.spawn((
            Name(LAPTOP_BASE),
            Parent(laptop),
            Transform::from_position(laptop_position),
            Collider::box_collider(Vec3::new(0.8, 0.02, 0.5)),
        ));
        let laptop_lid = world.spawn((
            Name(LAPTOP_LID),
            Parent(laptop_base),
            Transform::from_position(Vec3::new(0.0, 0.25, -0.25)),
            Collider::box_collider(Vec3::new(0.8, 0.5, 0.02)),
        ));

        let hologram = world.spawn((
            Name(HOLOGRAM),
            Transform::from_position(HOLOGRAM_REST),
            Hidden,
        ));
        world.spawn((
            Name(HOLOGRAM_PANEL),
            Parent(hologram),
            Transform::from_position(Vec3::new(0.0, 0.0, -0.2)),
            Collider::box_collider(Vec3::new(5.0, 2.0, 0.05)),
        ));

        Self {
            world,
            root,
            laptop_base,
            laptop_lid,
            hologram,
            plant,
            photo_frames,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn laptop_base(&self) -> Entity {
        self.laptop_base
    }

    pub fn laptop_lid(&self) -> Entity {
        self.laptop_lid
    }

    pub fn hologram(&self) -> Entity {
        self.hologram
    }

    pub fn plant(&self) -> Entity {
        self.plant
    }

    /// Left and right photo frames with the transforms they were placed at.
    pub fn photo_frames(&self) -> [(Entity, Transform); 2] {
        self.photo_frames
    }

    /// First entity carrying `name`.
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    pub fn name(&self, entity: Entity) -> Option<&'static str> {
        self.world.get::<&Name>(entity).ok().map(|n| n.0)
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(entity).ok().map(|p| p.0)
    }

    /// `entity` followed by each of its ancestors, nearest first.
    pub fn ancestor_chain(&self, entity: Entity) -> Vec<Entity> {
        let mut chain = vec![entity];
        let mut current = entity;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Describe a click on `entity` for the interaction router.
    pub fn pointer_event(&self, entity: Entity) -> PointerEvent {
        PointerEvent::new(
            self.ancestor_chain(entity)
                .into_iter()
                .filter_map(|e| self.name(e))
                .collect(),
        )
    }

    pub fn local_transform(&self, entity: Entity) -> Transform {
        self.world
            .get::<&Transform>(entity)
            .map(|t| *t)
            .unwrap_or_default()
    }

    /// Apply `update` to an entity's local transform. Unknown entities are ignored.
    pub fn update_transform(&mut self, entity: Entity, update: impl FnOnce(&mut Transform)) {
        if let Ok(mut transform) = self.world.get::<&mut Transform>(entity) {
            update(&mut transform);
        }
    }

    /// Local-to-world matrix, composed through every ancestor.
    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        self.ancestor_chain(entity)
            .into_iter()
            .rev()
            .fold(Mat4::IDENTITY, |acc, e| acc * self.local_transform(e).matrix())
    }

    pub fn world_position(&self, entity: Entity) -> Vec3 {
        self.world_matrix(entity).transform_point3(Vec3::ZERO)
    }

    /// Where the camera frames the laptop from.
    pub fn laptop_world_position(&self) -> Vec3 {
        self.world_position(self.laptop_base)
    }

    pub fn set_hidden(&mut self, entity: Entity, hidden: bool) {
        if hidden {
            if self.world.insert_one(entity, Hidden).is_err() {
                warn!(?entity, "cannot hide despawned entity");
            }
        } else if let Err(hecs::ComponentError::NoSuchEntity) =
            self.world.remove_one::<Hidden>(entity)
        {
            warn!(?entity, "cannot show despawned entity");
        }
    }

    /// True if the entity or any ancestor is hidden.
    pub fn is_hidden(&self, entity: Entity) -> bool {
        self.ancestor_chain(entity)
            .into_iter()
            .any(|e| self.world.get::<&Hidden>(e).is_ok())
    }
}
