//! Tanks: ramped-speed motion, firing, damage
//!
//! [`Tank`] holds what player and enemy tanks share. Speed ramps toward the
//! body's max speed while the tank wants to move and coasts down otherwise;
//! the arena edge clamps position and bleeds off speed.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ai::EnemyBrain;
use super::entity::{Arena, Body, Bullet, Direction, GameObject};
use super::item::TimedBuff;
use crate::consts::*;

/// Shared tank state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// `body.speed` is the max speed
    pub body: Body,
    pub health: i32,
    /// Move intent
    pub moving: bool,
    pub shoot_cooldown: f64,
    /// Seconds until the next shot is allowed
    pub cooldown: f64,
    pub current_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
}

impl Tank {
    pub fn new(pos: DVec2, direction: Direction, max_speed: f64, shoot_cooldown: f64) -> Self {
        let mut body = Body::new(pos, TANK_SIZE, TANK_SIZE, direction);
        body.speed = max_speed;
        Self {
            body,
            health: 1,
            moving: false,
            shoot_cooldown,
            cooldown: 0.0,
            current_speed: 0.0,
            acceleration: TANK_ACCELERATION,
            deceleration: TANK_DECELERATION,
        }
    }

    /// Cooldown, speed ramp and coasting motion for one frame
    pub fn update_motion(&mut self, dt: f64, arena: &Arena) {
        self.cooldown = (self.cooldown - dt).max(0.0);

        if !self.body.alive {
            return;
        }

        if self.moving {
            self.current_speed = (self.current_speed + self.acceleration * dt).min(self.body.speed);
        } else {
            self.current_speed = (self.current_speed - self.deceleration * dt).max(0.0);
        }

        if self.current_speed > 0.0 {
            self.drive(dt, arena);
        }
    }

    /// Move at the current speed, clamping to the arena
    fn drive(&mut self, dt: f64, arena: &Arena) {
        if !self.body.alive {
            return;
        }
        self.body.pos += self.body.direction.unit() * self.current_speed * dt;
        let (clamped_x, clamped_y) = arena.clamp(&mut self.body);
        if clamped_x {
            self.current_speed *= EDGE_SPEED_DAMPING;
        }
        if clamped_y {
            self.current_speed *= EDGE_SPEED_DAMPING;
        }
    }

    /// Fixed backward nudge, then clamp to the arena
    pub fn bump(&mut self, arena: &Arena) {
        self.body.pos -= self.body.direction.unit() * TANK_BUMP_DISTANCE;
        arena.clamp(&mut self.body);
    }

    pub fn can_fire(&self) -> bool {
        self.body.alive && self.cooldown <= 0.0
    }

    /// Fire from the muzzle if the cooldown allows it
    pub fn fire(&mut self, from_player: bool, powered: bool) -> Option<Bullet> {
        if !self.can_fire() {
            return None;
        }
        self.cooldown = self.shoot_cooldown;

        let half = DVec2::new(self.body.width as f64, self.body.height as f64) * 0.5;
        let muzzle = self.body.center() + self.body.direction.unit() * half;
        Some(Bullet::new(muzzle, self.body.direction, from_player, powered))
    }

    /// Take one hit; returns true if this killed the tank
    pub fn hit(&mut self) -> bool {
        self.health -= 1;
        if self.health <= 0 {
            self.body.alive = false;
            return true;
        }
        false
    }
}

impl GameObject for Tank {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt: f64, arena: &Arena) {
        self.update_motion(dt, arena);
    }

    fn advance(&mut self, dt: f64, arena: &Arena) {
        self.drive(dt, arena);
    }

    fn on_collision(&mut self, arena: &Arena) {
        self.bump(arena);
    }
}

/// Access to the shared tank core of player and enemy tanks
pub trait TankUnit: GameObject {
    fn tank(&self) -> &Tank;
    fn tank_mut(&mut self) -> &mut Tank;

    /// Take a hit; returns true if it removed the tank (or a life)
    fn hit(&mut self) -> bool;

    /// Try to fire a bullet
    fn fire(&mut self) -> Option<Bullet>;
}

/// The player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTank {
    pub tank: Tank,
    pub lives: u32,
    /// Post-respawn invulnerability
    pub invincibility: TimedBuff,
    pub shield: TimedBuff,
    pub speed_boost: TimedBuff,
    pub fire_power: TimedBuff,
    /// Max speed without a speed boost
    pub base_speed: f64,
}

impl PlayerTank {
    pub fn new(pos: DVec2, speed: f64, shoot_cooldown: f64, lives: u32) -> Self {
        Self {
            tank: Tank::new(pos, Direction::Up, speed, shoot_cooldown),
            lives,
            invincibility: TimedBuff::default(),
            shield: TimedBuff::default(),
            speed_boost: TimedBuff::default(),
            fire_power: TimedBuff::default(),
            base_speed: speed,
        }
    }

    /// Invulnerable from either respawn protection or a shield
    pub fn is_invincible(&self) -> bool {
        self.invincibility.active || self.shield.active
    }

    pub fn has_shield(&self) -> bool {
        self.shield.active
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed_boost.active
    }

    pub fn has_fire_power(&self) -> bool {
        self.fire_power.active
    }

    pub fn max_speed(&self) -> f64 {
        self.tank.body.speed
    }

    pub fn activate_shield(&mut self, duration: f64) {
        self.shield.arm(duration);
    }

    pub fn activate_speed_boost(&mut self, duration: f64) {
        self.speed_boost.arm(duration);
        self.tank.body.speed = self.base_speed * SPEED_BOOST_FACTOR;
    }

    pub fn activate_fire_power(&mut self, duration: f64) {
        self.fire_power.arm(duration);
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    /// Come back at `pos` with fresh respawn protection and no buffs
    pub fn respawn(&mut self, pos: DVec2, direction: Direction, invincibility: f64) {
        if self.lives == 0 {
            return;
        }
        let tank = &mut self.tank;
        tank.body.pos = pos;
        tank.body.direction = direction;
        tank.body.alive = true;
        tank.body.speed = self.base_speed;
        tank.health = 1;
        tank.current_speed = 0.0;
        tank.moving = false;
        tank.cooldown = 0.0;

        self.invincibility.arm(invincibility);
        self.shield.clear();
        self.speed_boost.clear();
        self.fire_power.clear();
    }

    fn restore_base_speed(&mut self) {
        self.tank.body.speed = self.base_speed;
        self.tank.current_speed = self.tank.current_speed.min(self.base_speed);
    }
}

impl GameObject for PlayerTank {
    fn body(&self) -> &Body {
        &self.tank.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.tank.body
    }

    fn update(&mut self, dt: f64, arena: &Arena) {
        self.tank.update_motion(dt, arena);

        self.invincibility.tick(dt);
        self.shield.tick(dt);
        if self.speed_boost.tick(dt) {
            self.restore_base_speed();
        }
        self.fire_power.tick(dt);
    }

    fn advance(&mut self, dt: f64, arena: &Arena) {
        self.tank.advance(dt, arena);
    }

    fn on_collision(&mut self, arena: &Arena) {
        self.tank.bump(arena);
    }
}

impl TankUnit for PlayerTank {
    fn tank(&self) -> &Tank {
        &self.tank
    }

    fn tank_mut(&mut self) -> &mut Tank {
        &mut self.tank
    }

    /// One hit costs a life unless protected
    fn hit(&mut self) -> bool {
        if self.is_invincible() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.tank.body.alive = false;
        true
    }

    fn fire(&mut self) -> Option<Bullet> {
        let powered = self.fire_power.active;
        self.tank.fire(true, powered)
    }
}

/// An AI-driven enemy tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTank {
    pub tank: Tank,
    pub brain: EnemyBrain,
}

impl EnemyTank {
    pub fn new(
        pos: DVec2,
        direction: Direction,
        speed: f64,
        shoot_cooldown: f64,
        brain: EnemyBrain,
    ) -> Self {
        let mut tank = Tank::new(pos, direction, speed, shoot_cooldown);
        tank.moving = true;
        Self { tank, brain }
    }
}

impl GameObject for EnemyTank {
    fn body(&self) -> &Body {
        &self.tank.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.tank.body
    }

    fn update(&mut self, dt: f64, arena: &Arena) {
        self.tank.update_motion(dt, arena);
    }

    fn advance(&mut self, dt: f64, arena: &Arena) {
        self.tank.advance(dt, arena);
    }

    fn on_collision(&mut self, arena: &Arena) {
        self.tank.bump(arena);
    }
}

impl TankUnit for EnemyTank {
    fn tank(&self) -> &Tank {
        &self.tank
    }

    fn tank_mut(&mut self) -> &mut Tank {
        &mut self.tank
    }

    fn hit(&mut self) -> bool {
        self.tank.hit()
    }

    fn fire(&mut self) -> Option<Bullet> {
        self.tank.fire(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 1.0 / 60.0;

    fn player_at(x: f64, y: f64) -> PlayerTank {
        PlayerTank::new(DVec2::new(x, y), PLAYER_SPEED, PLAYER_SHOOT_COOLDOWN, PLAYER_LIVES)
    }

    #[test]
    fn test_speed_ramps_then_plateaus() {
        let arena = Arena::default();
        let mut player = player_at(380.0, 500.0);
        player.tank.moving = true;

        let mut last = player.tank.current_speed;
        let mut plateau_frames = 0;
        for _ in 0..60 {
            player.update(DT, &arena);
            let speed = player.tank.current_speed;
            if last < PLAYER_SPEED {
                assert!(speed > last, "speed must rise until max");
            } else {
                assert_eq!(speed, PLAYER_SPEED);
                plateau_frames += 1;
            }
            assert!(speed <= PLAYER_SPEED);
            last = speed;
        }
        assert!(plateau_frames > 0);
        // First frame is nowhere near top speed
        let mut fresh = player_at(380.0, 500.0);
        fresh.tank.moving = true;
        fresh.update(DT, &arena);
        assert!(fresh.tank.current_speed < PLAYER_SPEED);
    }

    #[test]
    fn test_release_coasts_to_stop() {
        let arena = Arena::default();
        let mut player = player_at(380.0, 500.0);
        player.tank.moving = true;
        for _ in 0..60 {
            player.update(DT, &arena);
        }
        player.tank.moving = false;
        let before = player.pos();
        player.update(DT, &arena);
        assert!(player.tank.current_speed > 0.0);
        assert!(player.pos().y < before.y, "still coasting upward");
        for _ in 0..60 {
            player.update(DT, &arena);
        }
        assert_eq!(player.tank.current_speed, 0.0);
    }

    #[test]
    fn test_edge_clamp_damps_speed() {
        let arena = Arena::default();
        let mut player = player_at(100.0, 0.5);
        player.tank.moving = true;
        player.tank.current_speed = 100.0;
        player.update(DT, &arena);
        assert_eq!(player.pos().y, 0.0);
        let expected = (100.0 + TANK_ACCELERATION * DT).min(PLAYER_SPEED) * EDGE_SPEED_DAMPING;
        assert!((player.tank.current_speed - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cooldown_floors_at_zero_and_gates_fire() {
        let arena = Arena::default();
        let mut player = player_at(100.0, 100.0);
        assert!(player.fire().is_some());
        assert!(player.fire().is_none());
        for _ in 0..30 {
            player.update(DT, &arena);
        }
        assert_eq!(player.tank.cooldown, 0.0);
        assert!(player.fire().is_some());
    }

    #[test]
    fn test_bullet_leaves_muzzle() {
        let mut player = player_at(100.0, 100.0);
        let bullet = player.fire().unwrap();
        // Tank centre is (120, 120); muzzle is half a tank up
        assert!((bullet.body.center() - DVec2::new(120.0, 100.0)).length() < 1e-9);
        assert!(bullet.from_player);
        assert!(!bullet.powered);

        player.tank.cooldown = 0.0;
        player.activate_fire_power(10.0);
        assert!(player.fire().unwrap().powered);
    }

    #[test]
    fn test_respawn_grants_invincibility() {
        let arena = Arena::default();
        let mut player = player_at(100.0, 100.0);
        assert!(player.hit());
        assert_eq!(player.lives, 2);
        assert!(!player.is_alive());

        player.respawn(DVec2::new(400.0, 520.0), Direction::Up, RESPAWN_INVINCIBILITY);
        assert!(player.is_alive());
        assert!(player.is_invincible());
        assert!(!player.hit());
        assert_eq!(player.lives, 2);

        for _ in 0..200 {
            player.update(DT, &arena);
        }
        assert!(!player.is_invincible());
        assert!(player.hit());
        assert_eq!(player.lives, 1);
    }

    #[test]
    fn test_shield_blocks_hits() {
        let mut player = player_at(100.0, 100.0);
        player.activate_shield(5.0);
        assert!(!player.hit());
        assert_eq!(player.lives, PLAYER_LIVES);
        assert!(player.is_alive());
    }

    #[test]
    fn test_respawn_clears_buffs() {
        let mut player = player_at(100.0, 100.0);
        player.activate_speed_boost(7.0);
        player.activate_fire_power(10.0);
        player.tank.body.alive = false;
        player.respawn(DVec2::new(400.0, 520.0), Direction::Up, RESPAWN_INVINCIBILITY);
        assert!(!player.has_speed_boost());
        assert!(!player.has_fire_power());
        assert_eq!(player.max_speed(), PLAYER_SPEED);
    }

    #[test]
    fn test_no_respawn_without_lives() {
        let mut player = player_at(100.0, 100.0);
        player.lives = 1;
        assert!(player.hit());
        player.respawn(DVec2::new(400.0, 520.0), Direction::Up, RESPAWN_INVINCIBILITY);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_speed_boost_restores_exact_base() {
        let arena = Arena::default();
        let mut player = player_at(380.0, 300.0);
        player.activate_speed_boost(SPEED_BOOST_DURATION);
        assert_eq!(player.max_speed(), PLAYER_SPEED * SPEED_BOOST_FACTOR);
        player.tank.moving = true;

        let mut elapsed = 0.0;
        while elapsed < 7.01 {
            player.tank.body.direction = if (elapsed as i32) % 2 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            player.update(0.01, &arena);
            elapsed += 0.01;
        }
        assert!(!player.has_speed_boost());
        assert_eq!(player.max_speed(), PLAYER_SPEED);
        assert!(player.tank.current_speed <= PLAYER_SPEED);
    }

    #[test]
    fn test_enemy_hit_uses_health() {
        let mut enemy = EnemyTank::new(
            DVec2::ZERO,
            Direction::Down,
            ENEMY_SPEED,
            ENEMY_SHOOT_COOLDOWN,
            EnemyBrain::fixed(3.0, 1.0),
        );
        enemy.tank.health = 2;
        assert!(!enemy.hit());
        assert!(enemy.is_alive());
        assert!(enemy.hit());
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_bump_is_fixed_and_clamped() {
        let arena = Arena::default();
        let mut tank = Tank::new(DVec2::new(100.0, 100.0), Direction::Right, 100.0, 0.5);
        tank.current_speed = 90.0;
        tank.on_collision(&arena);
        assert_eq!(tank.body.pos, DVec2::new(98.0, 100.0));

        let mut edge = Tank::new(DVec2::new(0.5, 100.0), Direction::Right, 100.0, 0.5);
        edge.on_collision(&arena);
        assert_eq!(edge.body.pos.x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_tanks_stay_in_arena(
            x in 0.0..760.0f64,
            y in 0.0..560.0f64,
            dirs in proptest::collection::vec(0usize..4, 1..80),
            dt in 0.001..0.2f64,
        ) {
            let arena = Arena::default();
            let mut player = player_at(x, y);
            player.tank.moving = true;
            for d in dirs {
                player.tank.body.direction = Direction::ALL[d];
                player.update(dt, &arena);
                let pos = player.pos();
                prop_assert!(pos.x >= 0.0 && pos.x <= (ARENA_WIDTH - TANK_SIZE) as f64);
                prop_assert!(pos.y >= 0.0 && pos.y <= (ARENA_HEIGHT - TANK_SIZE) as f64);
                prop_assert!(player.tank.current_speed >= 0.0);
                prop_assert!(player.tank.current_speed <= player.max_speed());
            }
        }
    }
}
