use glam::Vec3;
use log::{debug, warn};

use super::aabb::Aabb;
use super::toy::Toy;

/// Tunable constants for the toy engine. Defaults are the values the machine
/// is balanced around.
#[derive(Debug, Clone, Copy)]
pub struct ToyWorldConfig {
    pub gravity: Vec3,
    /// Per-tick air-drag factor applied to velocity.
    pub damping: f32,
    /// Velocity fraction retained when reflecting off a wall.
    pub restitution: f32,
    /// Extra horizontal damping while resolving floor contact.
    pub floor_friction: f32,
    /// Safety ceiling on speed, units/s.
    pub max_speed: f32,
    /// Distance from the play-area center beyond which a toy is treated as
    /// escaped and teleported back to its spawn point.
    pub reset_distance: f32,
    /// How far below the play-area floor a toy may sink before being reset.
    pub floor_reset_margin: f32,
    /// Frame dt is clamped into this range before stepping.
    pub min_dt: f32,
    pub max_dt: f32,
}

impl Default for ToyWorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            damping: 0.985,
            restitution: 0.7,
            floor_friction: 0.95,
            max_speed: 10.0,
            reset_distance: 50.0,
            floor_reset_margin: 0.35,
            min_dt: 0.0016,
            max_dt: 0.032,
        }
    }
}

/// Discrete outcomes of a physics tick, consumed by the surrounding
/// application (score counter, removal effects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToyEvent {
    /// The toy settled inside the collection volume and left the active set.
    Collected { name: String },
    /// A sanity guard teleported the toy back to its spawn point.
    Reset { name: String },
}

/// Collision and integration engine for every free toy in the machine.
///
/// Toys are rigid spheres with no rotational state. The engine resolves
/// ball/ball contacts pairwise, keeps toys inside the play-area box, and
/// funnels them into the nested collection volume whose only opening is its
/// top face.
#[derive(Debug, Clone)]
pub struct ToyWorld {
    toys: Vec<Toy>,
    spawns: Vec<Vec3>,
    in_collection: Vec<bool>,
    bounds: Aabb,
    collection: Aabb,
    barriers: Vec<Aabb>,
    config: ToyWorldConfig,
    gravity_enabled: bool,
    collected_count: usize,
}

impl ToyWorld {
    pub fn new(bounds: Aabb, collection: Aabb) -> Self {
        Self::with_config(bounds, collection, ToyWorldConfig::default())
    }

    pub fn with_config(bounds: Aabb, collection: Aabb, config: ToyWorldConfig) -> Self {
        Self {
            toys: Vec::new(),
            spawns: Vec::new(),
            in_collection: Vec::new(),
            bounds,
            collection,
            barriers: Vec::new(),
            config,
            gravity_enabled: true,
            collected_count: 0,
        }
    }

    /// Adds a toy to the active set, remembering its spawn point for resets.
    pub fn add_toy(&mut self, toy: Toy) -> usize {
        self.spawns.push(toy.position);
        self.in_collection.push(false);
        self.toys.push(toy);
        self.toys.len() - 1
    }

    /// Adds a solid static volume toys bounce off.
    pub fn add_barrier(&mut self, barrier: Aabb) {
        self.barriers.push(barrier);
    }

    pub fn toys(&self) -> &[Toy] {
        &self.toys
    }

    pub fn toys_mut(&mut self) -> &mut [Toy] {
        &mut self.toys
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn collection(&self) -> Aabb {
        self.collection
    }

    pub fn collected_count(&self) -> usize {
        self.collected_count
    }

    pub fn config(&self) -> &ToyWorldConfig {
        &self.config
    }

    pub fn toggle_gravity(&mut self) -> bool {
        self.gravity_enabled = !self.gravity_enabled;
        debug!("toy gravity enabled: {}", self.gravity_enabled);
        self.gravity_enabled
    }

    /// Advances every active toy by one tick and returns the discrete events
    /// it produced. `dt` is clamped into the configured range first.
    pub fn step(&mut self, dt: f32) -> Vec<ToyEvent> {
        let dt = dt.clamp(self.config.min_dt, self.config.max_dt);
        let mut events = Vec::new();

        // Pairwise sphere contacts first, so the positional pass below works
        // from separated centers.
        for i in 0..self.toys.len() {
            for j in (i + 1)..self.toys.len() {
                let (head, tail) = self.toys.split_at_mut(j);
                Self::resolve_pair(&self.config, &mut head[i], &mut tail[0]);
            }
        }

        let barriers = self.barriers.clone();
        let mut removed = Vec::new();
        for i in 0..self.toys.len() {
            if !self.toys[i].is_active() {
                self.toys[i].velocity = Vec3::ZERO;
                continue;
            }

            let entry_position = self.toys[i].position;
            self.integrate_toy(i, dt, &barriers);
            self.handle_box_collision(i, self.bounds);
            for barrier in &barriers {
                Self::resolve_solid_box(&self.config, &mut self.toys[i], *barrier);
            }
            self.handle_collection_collision(i);

            if self.update_collection_state(i) {
                removed.push(i);
                continue;
            }

            self.apply_sanity_guards(i, entry_position, &mut events);
        }

        // Back-to-front so earlier indices stay valid.
        for &i in removed.iter().rev() {
            let toy = self.toys.remove(i);
            self.spawns.remove(i);
            self.in_collection.remove(i);
            self.collected_count += 1;
            debug!(
                "toy {} collected ({} total)",
                toy.name, self.collected_count
            );
            events.push(ToyEvent::Collected { name: toy.name });
        }

        events
    }

    /// Gravity, position integration (swept when fast), drag and speed cap.
    fn integrate_toy(&mut self, i: usize, dt: f32, barriers: &[Aabb]) {
        let config = self.config;
        let bounds = self.bounds;
        let toy = &mut self.toys[i];

        if self.gravity_enabled {
            toy.velocity += config.gravity * dt;
        }

        // Fast movers can tunnel through thin walls in one tick; sweep them
        // in bounded sub-steps instead.
        if toy.speed() * dt > toy.radius * 0.5 {
            Self::swept_move(&config, toy, bounds, barriers, dt);
        } else {
            toy.position += toy.velocity * dt;
        }

        toy.velocity *= config.damping;
        let speed = toy.speed();
        if speed > config.max_speed {
            toy.velocity *= config.max_speed / speed;
        }
    }

    /// Continuous sphere sweep: advance along the velocity direction in
    /// radius-sized sub-steps, capped at five iterations, and stop at the
    /// first corrected contact.
    fn swept_move(config: &ToyWorldConfig, toy: &mut Toy, bounds: Aabb, barriers: &[Aabb], dt: f32) {
        let move_vector = toy.velocity * dt;
        let move_distance = move_vector.length();
        if move_distance < 0.001 {
            toy.position += move_vector;
            return;
        }
        let direction = move_vector / move_distance;
        let mut remaining = move_distance;

        for _ in 0..5 {
            if remaining <= 0.001 {
                break;
            }
            let step = remaining.min(toy.radius);
            toy.position += direction * step;
            remaining -= step;

            // Leaving the container counts as penetrating its wall.
            let inset = Aabb::new(
                bounds.min + Vec3::splat(toy.radius),
                bounds.max - Vec3::splat(toy.radius),
            );
            if !inset.contains_point(toy.position) {
                let clamped = inset.closest_point(toy.position);
                let outward = (toy.position - clamped).normalize_or_zero();
                toy.position = clamped;
                let along = toy.velocity.dot(outward);
                toy.velocity -= outward * (2.0 * along * config.restitution);
                return;
            }

            for barrier in barriers {
                let closest = barrier.closest_point(toy.position);
                let offset = toy.position - closest;
                let distance = offset.length();
                if distance < toy.radius {
                    let outward = offset.normalize_or_zero();
                    let depth = toy.radius - distance;
                    toy.position += outward * (depth + 0.001);
                    let along = toy.velocity.dot(outward);
                    toy.velocity -= outward * (2.0 * along * config.restitution);
                    return;
                }
            }
        }

        if remaining > 0.001 {
            toy.position += direction * remaining;
        }
    }

    /// Keeps the toy's sphere inside `bounds`: exact positional clamp per
    /// crossed axis and reflection of that velocity component, with extra
    /// horizontal friction when the floor is involved. Returns whether any
    /// axis was corrected.
    pub fn handle_box_collision(&mut self, i: usize, bounds: Aabb) -> bool {
        let config = self.config;
        let toy = &mut self.toys[i];
        let r = toy.radius;
        let restitution = config.restitution;
        let mut collided = false;

        if toy.position.x - r < bounds.min.x {
            toy.position.x = bounds.min.x + r;
            toy.velocity.x = -toy.velocity.x * restitution;
            collided = true;
        }
        if toy.position.x + r > bounds.max.x {
            toy.position.x = bounds.max.x - r;
            toy.velocity.x = -toy.velocity.x * restitution;
            collided = true;
        }
        if toy.position.y - r < bounds.min.y {
            toy.position.y = bounds.min.y + r;
            toy.velocity.y = -toy.velocity.y * restitution;
            toy.velocity.x *= config.floor_friction;
            toy.velocity.z *= config.floor_friction;
            collided = true;
        }
        if toy.position.y + r > bounds.max.y {
            toy.position.y = bounds.max.y - r;
            toy.velocity.y = -toy.velocity.y * restitution;
            collided = true;
        }
        if toy.position.z - r < bounds.min.z {
            toy.position.z = bounds.min.z + r;
            toy.velocity.z = -toy.velocity.z * restitution;
            collided = true;
        }
        if toy.position.z + r > bounds.max.z {
            toy.position.z = bounds.max.z - r;
            toy.velocity.z = -toy.velocity.z * restitution;
            collided = true;
        }

        if collided {
            toy.velocity *= 0.95;
        }
        collided
    }

    /// Pushes the toy's sphere out of a solid box, reflecting velocity along
    /// the push direction.
    fn resolve_solid_box(config: &ToyWorldConfig, toy: &mut Toy, barrier: Aabb) {
        let closest = barrier.closest_point(toy.position);
        let offset = toy.position - closest;
        let distance = offset.length();
        if distance >= toy.radius || distance == 0.0 {
            return;
        }
        let outward = offset / distance;
        toy.position += outward * (toy.radius - distance + 0.001);
        let along = toy.velocity.dot(outward);
        if along < 0.0 {
            toy.velocity -= outward * (2.0 * along * config.restitution);
        }
    }

    /// Collection-volume walls, in two regimes.
    ///
    /// A toy predominantly outside sees the five closed faces as one-way
    /// walls it cannot pass through; the open top is the only way in. A toy
    /// already inside is contained by every face, with a softer, high-friction
    /// floor so it settles.
    pub fn handle_collection_collision(&mut self, i: usize) -> bool {
        let config = self.config;
        let bx = self.collection;
        let toy = &mut self.toys[i];
        let r = toy.radius;
        let p = toy.position;
        let v = &mut toy.velocity;

        // Signed clearance to each closed face; negative means the sphere
        // overlaps that face's plane from outside.
        let d_left = p.x - r - bx.min.x;
        let d_right = bx.max.x - (p.x + r);
        let d_bottom = p.y - r - bx.min.y;
        let d_front = bx.max.z - (p.z + r);
        let d_back = p.z - r - bx.min.z;
        let walls_outside = [d_left, d_right, d_bottom, d_front, d_back]
            .iter()
            .filter(|d| **d < 0.0)
            .count();

        let predominantly_outside = walls_outside >= 3;
        let completely_inside = p.x - r > bx.min.x
            && p.x + r < bx.max.x
            && p.y - r > bx.min.y
            && p.z - r > bx.min.z
            && p.z + r < bx.max.z;

        let within_y = p.y >= bx.min.y && p.y <= bx.max.y;
        let within_x = p.x >= bx.min.x && p.x <= bx.max.x;
        let within_z = p.z >= bx.min.z && p.z <= bx.max.z;

        let mut collided = false;

        if predominantly_outside && !completely_inside {
            // One-way walls: reflect only motion heading into the volume
            // through a closed face.
            if p.x - r < bx.min.x && within_y && within_z && v.x > 0.0 {
                toy.position.x = bx.min.x - r - 0.01;
                v.x = -v.x * config.restitution;
                collided = true;
            }
            if p.x + r > bx.max.x && within_y && within_z && v.x < 0.0 {
                toy.position.x = bx.max.x + r + 0.01;
                v.x = -v.x * config.restitution;
                collided = true;
            }
            if p.z + r > bx.max.z && within_y && within_x && v.z < 0.0 {
                toy.position.z = bx.max.z + r + 0.01;
                v.z = -v.z * config.restitution;
                collided = true;
            }
            if p.z - r < bx.min.z && within_y && within_x && v.z > 0.0 {
                toy.position.z = bx.min.z - r - 0.01;
                v.z = -v.z * config.restitution;
                collided = true;
            }
            if p.y - r < bx.min.y && within_x && within_z && v.y > 0.0 {
                toy.position.y = bx.min.y - r - 0.01;
                v.y = -v.y * 0.5;
                v.x *= 0.9;
                v.z *= 0.9;
                collided = true;
            }
        } else if !predominantly_outside {
            // Containing walls: push back inward regardless of approach.
            if p.x - r < bx.min.x {
                toy.position.x = bx.min.x + r + 0.01;
                v.x = v.x.abs() * config.restitution;
                collided = true;
            }
            if p.x + r > bx.max.x {
                toy.position.x = bx.max.x - r - 0.01;
                v.x = -v.x.abs() * config.restitution;
                collided = true;
            }
            if p.y - r < bx.min.y {
                toy.position.y = bx.min.y + r + 0.01;
                v.y = v.y.abs() * 0.5;
                v.x *= 0.92;
                v.z *= 0.92;
                collided = true;
            }
            if p.z + r > bx.max.z {
                toy.position.z = bx.max.z - r - 0.01;
                v.z = -v.z.abs() * config.restitution;
                collided = true;
            }
            if p.z - r < bx.min.z {
                toy.position.z = bx.min.z + r + 0.01;
                v.z = v.z.abs() * config.restitution;
                collided = true;
            }
        }

        if collided {
            toy.velocity *= 0.97;
        }
        collided
    }

    /// Tracks collection membership and detects the settled terminal state.
    /// Returns true when the toy should be removed as collected.
    fn update_collection_state(&mut self, i: usize) -> bool {
        let bx = self.collection;
        let toy = &self.toys[i];
        let r = toy.radius;

        if self.in_collection[i] {
            let from_bottom = toy.position.y - (bx.min.y + r);
            let laterally_contained = toy.position.x > bx.min.x + r
                && toy.position.x < bx.max.x - r
                && toy.position.z > bx.min.z + r
                && toy.position.z < bx.max.z - r;
            if from_bottom < 0.15 && laterally_contained && toy.speed() < 0.1 {
                return true;
            }
            // Members near the floor get extra damping so they come to rest.
            if from_bottom < 0.2 {
                let toy = &mut self.toys[i];
                toy.velocity *= 0.85;
                toy.velocity.x *= 0.7;
                toy.velocity.z *= 0.7;
            }
        } else if bx.intersects_sphere(toy.position, r) {
            debug!("toy {} entered the collection volume", toy.name);
            self.in_collection[i] = true;
        }
        false
    }

    /// Recoverable-fault guards: escape-distance and below-floor teleport
    /// resets. Keyed on the position the toy entered the tick with, since the
    /// containment pass clamps any position it can reach; only externally
    /// corrupted or tunneled state trips these. Velocity capping happens
    /// during integration.
    fn apply_sanity_guards(&mut self, i: usize, entry_position: Vec3, events: &mut Vec<ToyEvent>) {
        let center = self.bounds.center();
        let floor_limit = self.bounds.min.y - self.config.floor_reset_margin;
        let escaped = entry_position.distance(center) > self.config.reset_distance;
        let sunk = entry_position.y < floor_limit;
        if escaped || sunk {
            warn!(
                "toy {} fell out of bounds, resetting to spawn",
                self.toys[i].name
            );
            self.reset_toy(i);
            events.push(ToyEvent::Reset {
                name: self.toys[i].name.clone(),
            });
        }
    }

    /// Teleports the toy back to its spawn point with zero velocity.
    pub fn reset_toy(&mut self, i: usize) {
        let spawn = self.spawns[i];
        let toy = &mut self.toys[i];
        toy.position = spawn;
        toy.velocity = Vec3::ZERO;
        self.in_collection[i] = false;
    }

    /// Resolves one sphere/sphere contact: mass-weighted separation, then an
    /// impulse along the contact normal unless the pair is already
    /// separating. Immobile toys never move but still reflect their mobile
    /// partner.
    fn resolve_pair(config: &ToyWorldConfig, a: &mut Toy, b: &mut Toy) {
        let distance = a.position.distance(b.position);
        let combined = a.radius + b.radius;
        if distance >= combined {
            return;
        }

        // Exact overlap has no normal; nudge one apart and let the next tick
        // resolve it.
        if distance < 0.001 {
            b.position.x += 0.02;
            b.position.z += 0.02;
            return;
        }

        let penetration = (combined - distance).min(a.radius.min(b.radius)) * 0.5;
        let normal = (a.position - b.position) / distance;

        let immobile_a = a.immobile && !a.grabbed;
        let immobile_b = b.immobile && !b.grabbed;

        match (immobile_a, immobile_b) {
            (true, true) => return,
            (true, false) => b.position -= normal * penetration,
            (false, true) => a.position += normal * penetration,
            (false, false) => {
                let total_mass = a.mass + b.mass;
                a.position += normal * (penetration * b.mass / total_mass);
                b.position -= normal * (penetration * a.mass / total_mass);
            }
        }

        let relative = a.velocity - b.velocity;
        if relative.dot(normal) > 0.0 {
            return;
        }

        if immobile_a {
            let along = b.velocity.dot(normal);
            b.velocity -= normal * (2.0 * along);
            b.velocity *= config.restitution;
        } else if immobile_b {
            let along = a.velocity.dot(normal);
            a.velocity -= normal * (2.0 * along);
            a.velocity *= config.restitution;
        } else {
            let impulse = -(1.0 + config.restitution) * relative.dot(normal)
                / (1.0 / a.mass + 1.0 / b.mass);
            a.velocity += normal * (impulse / a.mass);
            b.velocity -= normal * (impulse / b.mass);
        }

        if !immobile_a {
            a.velocity *= 0.99;
        }
        if !immobile_b {
            b.velocity *= 0.99;
        }
    }
}
