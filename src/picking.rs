//! Mouse picking against the room's colliders.
//!
//! - [`Ray`]: origin and direction, usually built from a cursor position
//! - [`Collider`]: box or sphere attached to a prop
//! - [`raycast`]: nearest visible prop under a ray
//!
//! Rays are tested in each collider's local space, so rotated and scaled props
//! (an opening lid, a bouncing base) pick exactly where they are drawn.
//!
//! # Example
//!
//! ```ignore
//! let ray = Ray::from_screen(x, y, width, height, camera.view_matrix(), camera.projection_matrix(aspect));
//! if let Some(hit) = raycast(&room, &ray) {
//!     router.route(&room.pointer_event(hit.entity), ...);
//! }
//! ```

use glam::{Mat4, Vec3, Vec4};
use hecs::Entity;

use crate::room::Room;

/// A ray in 3D space with a normalized direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray through a window pixel, from the near plane toward the far plane.
    pub fn from_screen(
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        view_matrix: Mat4,
        projection_matrix: Mat4,
    ) -> Self {
        let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
        // Window Y grows downward
        let ndc_y = 1.0 - (2.0 * screen_y / screen_height);

        let inv_view_proj = (projection_matrix * view_matrix).inverse();
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near_point = near.truncate() / near.w;
        let far_point = far.truncate() / far.w;

        Self::new(near_point, far_point - near_point)
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed in another space. The direction is not
    /// renormalized, so ray parameters stay comparable across spaces.
    fn transformed(&self, matrix: Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    /// Ray parameter of the nearest forward hit on an axis-aligned box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            if dir.abs() < f32::EPSILON {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let (t1, t2) = {
                let a = (min[axis] - origin) * inv;
                let b = (max[axis] - origin) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        nearest_forward(t_min, t_max)
    }

    /// Ray parameter of the nearest forward hit on a sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let a = self.direction.dot(self.direction);
        let b = 2.0 * oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 || a <= f32::EPSILON {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        nearest_forward((-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a))
    }
}

fn nearest_forward(near: f32, far: f32) -> Option<f32> {
    if near > 0.0 {
        Some(near)
    } else if far > 0.0 {
        Some(far)
    } else {
        None
    }
}

/// A pick shape, centred on its entity's origin in local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Collider {
    /// Box from full width, height and depth.
    pub fn box_collider(size: Vec3) -> Self {
        Self::Box {
            half_extents: size * 0.5,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Distance along a world-space ray to this collider placed by `world`.
    pub fn intersect(&self, ray: &Ray, world: Mat4) -> Option<f32> {
        // A degenerate transform (zero scale) cannot be hit.
        if world.determinant().abs() <= f32::EPSILON {
            return None;
        }
        // Direction isn't renormalized, so the local parameter equals the
        // world distance along the unit-length world ray.
        let local = ray.transformed(world.inverse());
        match *self {
            Collider::Box { half_extents } => local.intersect_aabb(-half_extents, half_extents),
            Collider::Sphere { radius } => local.intersect_sphere(Vec3::ZERO, radius),
        }
    }
}

/// A ray striking a collider.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Every visible collider the ray strikes, nearest first.
pub fn raycast_all(room: &Room, ray: &Ray) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = room
        .world()
        .query::<&Collider>()
        .iter()
        .filter(|(entity, _)| !room.is_hidden(*entity))
        .filter_map(|(entity, collider)| {
            collider
                .intersect(ray, room.world_matrix(entity))
                .map(|distance| RayHit {
                    entity,
                    distance,
                    point: ray.point_at(distance),
                })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// The nearest visible collider the ray strikes.
pub fn raycast(room: &Room, ray: &Ray) -> Option<RayHit> {
    raycast_all(room, ray).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{self, Room};

    #[test]
    fn ray_hits_unit_box_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray.intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5));
        assert_eq!(t, Some(4.5));
    }

    #[test]
    fn scaled_collider_reports_world_distance() {
        let collider = Collider::box_collider(Vec3::ONE);
        let world = Mat4::from_scale(Vec3::splat(2.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = collider.intersect(&ray, world).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_from_above_strikes_laptop_before_desk() {
        let room = Room::new(Vec3::new(0.0, 0.1, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let hit = raycast(&room, &ray).unwrap();
        let event = room.pointer_event(hit.entity);
        assert!(event.involves(room::LAPTOP), "struck {:?}", event.struck());
    }

    #[test]
    fn hidden_hologram_is_not_pickable() {
        let mut room = Room::new(Vec3::new(0.0, 0.1, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 1.2, 5.0), Vec3::NEG_Z);
        let names = |room: &Room| -> Vec<&'static str> {
            raycast_all(room, &ray)
                .iter()
                .filter_map(|hit| room.name(hit.entity))
                .collect()
        };
        assert!(!names(&room).contains(&room::HOLOGRAM_PANEL));

        let hologram = room.hologram();
        room.set_hidden(hologram, false);
        assert!(names(&room).contains(&room::HOLOGRAM_PANEL));
    }

    #[test]
    fn screen_centre_ray_points_forward() {
        let view = Mat4::look_to_rh(Vec3::new(0.0, 2.0, 5.0), Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let ray = Ray::from_screen(50.0, 50.0, 100.0, 100.0, view, proj);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }
}
