//! Shared entity model
//!
//! Every simulated object carries a [`Body`] and implements [`GameObject`].
//! Walls and bullets live here; tanks and items have their own modules.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Facing direction (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step along this direction
    pub fn unit(self) -> DVec2 {
        match self {
            Direction::Up => DVec2::new(0.0, -1.0),
            Direction::Right => DVec2::new(1.0, 0.0),
            Direction::Down => DVec2::new(0.0, 1.0),
            Direction::Left => DVec2::new(-1.0, 0.0),
        }
    }

    /// Uniformly random direction
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Direction along the dominant axis of `delta` (ties go vertical)
    pub fn toward(delta: DVec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// Playfield extent; positions are top-left corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: u32,
    pub height: u32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    /// Clamp a body into the arena. Returns which axes were clamped.
    pub fn clamp(&self, body: &mut Body) -> (bool, bool) {
        let max_x = self.width.saturating_sub(body.width) as f64;
        let max_y = self.height.saturating_sub(body.height) as f64;
        let x = body.pos.x.clamp(0.0, max_x);
        let y = body.pos.y.clamp(0.0, max_y);
        let clamped = (x != body.pos.x, y != body.pos.y);
        body.pos = DVec2::new(x, y);
        clamped
    }

    /// True if a point lies outside the arena
    pub fn is_outside(&self, pos: DVec2) -> bool {
        pos.x < 0.0 || pos.x > self.width as f64 || pos.y < 0.0 || pos.y > self.height as f64
    }
}

/// Attributes common to every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: DVec2,
    pub width: u32,
    pub height: u32,
    pub direction: Direction,
    /// Scalar (max) speed in pixels per second
    pub speed: f64,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: DVec2, width: u32, height: u32, direction: Direction) -> Self {
        Self {
            pos,
            width,
            height,
            direction,
            speed: 0.0,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, DVec2::new(self.width as f64, self.height as f64))
    }

    pub fn center(&self) -> DVec2 {
        self.pos + DVec2::new(self.width as f64, self.height as f64) * 0.5
    }
}

/// Capability set shared by all simulated objects
pub trait GameObject {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Advance this entity by `dt` seconds
    fn update(&mut self, dt: f64, arena: &Arena);

    /// Integrate position along the facing direction while alive
    fn advance(&mut self, dt: f64, _arena: &Arena) {
        let body = self.body_mut();
        if body.alive {
            body.pos += body.direction.unit() * body.speed * dt;
        }
    }

    /// Response to touching something solid: back off by a tenth of speed
    fn on_collision(&mut self, _arena: &Arena) {
        let body = self.body_mut();
        let backup = body.speed * 0.1;
        body.pos -= body.direction.unit() * backup;
    }

    fn bounds(&self) -> Aabb {
        self.body().bounds()
    }

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    fn pos(&self) -> DVec2 {
        self.body().pos
    }
}

/// Wall material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallKind {
    /// Destroyed by any bullet
    #[default]
    #[serde(rename = "brick", alias = "breakable")]
    Brick,
    /// Destroyed only by a powered player bullet
    #[serde(rename = "steel", alias = "indestructible")]
    Steel,
}

/// An immobile wall block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub body: Body,
    pub kind: WallKind,
}

impl Wall {
    pub fn new(pos: DVec2, width: u32, height: u32, kind: WallKind) -> Self {
        Self {
            body: Body::new(pos, width, height, Direction::Up),
            kind,
        }
    }

    /// Square wall of side `size` at integer coordinates
    pub fn block(x: i32, y: i32, size: u32, kind: WallKind) -> Self {
        Self::new(DVec2::new(x as f64, y as f64), size, size, kind)
    }

    pub fn is_destructible(&self) -> bool {
        self.kind == WallKind::Brick
    }

    /// Whether a bullet hitting this wall destroys it
    pub fn breaks_under(&self, bullet: &Bullet) -> bool {
        self.is_destructible() || (bullet.powered && bullet.from_player)
    }
}

impl GameObject for Wall {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _dt: f64, _arena: &Arena) {}

    fn advance(&mut self, _dt: f64, _arena: &Arena) {}

    fn on_collision(&mut self, _arena: &Arena) {}
}

/// A shell in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    pub from_player: bool,
    pub damage: u32,
    pub powered: bool,
}

impl Bullet {
    /// Create a bullet centred on `center`
    pub fn new(center: DVec2, direction: Direction, from_player: bool, powered: bool) -> Self {
        let (size, damage, speed) = if powered {
            (POWERED_BULLET_SIZE, 2, BULLET_SPEED * POWERED_BULLET_SPEED_FACTOR)
        } else {
            (BULLET_SIZE, 1, BULLET_SPEED)
        };
        let half = size as f64 / 2.0;
        let mut body = Body::new(center - DVec2::splat(half), size, size, direction);
        body.speed = speed;
        Self {
            body,
            from_player,
            damage,
            powered,
        }
    }
}

impl GameObject for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt: f64, arena: &Arena) {
        self.advance(dt, arena);
    }

    fn on_collision(&mut self, _arena: &Arena) {
        self.body.alive = false;
    }
}
