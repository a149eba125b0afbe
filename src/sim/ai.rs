//! Enemy decision loop
//!
//! Two independent countdowns drive each enemy. When the direction timer
//! runs out the tank turns to a random heading; when the decision timer
//! runs out it may turn toward the player and may fire. Each timer draws a
//! fresh random interval every time it runs out. On top of that every
//! frame carries a small random chance to shoot.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Direction, GameObject};
use super::tank::{EnemyTank, PlayerTank, TankUnit};
use crate::tuning::Tuning;

/// Per-enemy AI timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub direction_interval: f64,
    pub direction_elapsed: f64,
    pub decision_interval: f64,
    pub decision_elapsed: f64,
}

fn roll_interval(rng: &mut impl Rng, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

impl EnemyBrain {
    /// Fresh timers with randomized intervals
    pub fn new(rng: &mut impl Rng, tuning: &Tuning) -> Self {
        Self {
            direction_interval: roll_interval(rng, tuning.direction_interval),
            direction_elapsed: 0.0,
            decision_interval: roll_interval(rng, tuning.decision_interval),
            decision_elapsed: 0.0,
        }
    }

    /// Timers with fixed first intervals
    pub fn fixed(direction_interval: f64, decision_interval: f64) -> Self {
        Self {
            direction_interval,
            direction_elapsed: 0.0,
            decision_interval,
            decision_elapsed: 0.0,
        }
    }
}

impl EnemyTank {
    /// Run one frame of AI. Returns a bullet if the tank fired.
    pub fn update_ai(
        &mut self,
        dt: f64,
        player: &PlayerTank,
        rng: &mut impl Rng,
        tuning: &Tuning,
    ) -> Option<Bullet> {
        if !self.is_alive() {
            return None;
        }
        let mut shot = None;

        self.brain.direction_elapsed += dt;
        if self.brain.direction_elapsed >= self.brain.direction_interval {
            self.tank.body.direction = Direction::random(rng);
            self.brain.direction_elapsed = 0.0;
            self.brain.direction_interval = roll_interval(rng, tuning.direction_interval);
        }

        self.brain.decision_elapsed += dt;
        if self.brain.decision_elapsed >= self.brain.decision_interval {
            if rng.random_bool(tuning.track_player_chance.clamp(0.0, 1.0)) && player.is_alive() {
                self.face(player);
            }
            if rng.random_bool(tuning.decision_fire_chance.clamp(0.0, 1.0)) {
                shot = self.fire();
            }
            self.brain.decision_elapsed = 0.0;
            self.brain.decision_interval = roll_interval(rng, tuning.decision_interval);
        }

        let chance = tuning.enemy_fire_mode.chance(dt).clamp(0.0, 1.0);
        if rng.random_bool(chance) {
            if let Some(bullet) = self.fire() {
                shot.get_or_insert(bullet);
            }
        }

        shot
    }

    /// Turn toward the player along the dominant axis
    pub fn face(&mut self, player: &PlayerTank) {
        let delta = player.pos() - self.pos();
        self.tank.body.direction = Direction::toward(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::tuning::EnemyFireMode;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy(brain: EnemyBrain) -> EnemyTank {
        EnemyTank::new(
            DVec2::new(100.0, 100.0),
            Direction::Up,
            ENEMY_SPEED,
            ENEMY_SHOOT_COOLDOWN,
            brain,
        )
    }

    fn player_at(x: f64, y: f64) -> PlayerTank {
        PlayerTank::new(DVec2::new(x, y), PLAYER_SPEED, PLAYER_SHOOT_COOLDOWN, PLAYER_LIVES)
    }

    fn quiet_tuning() -> Tuning {
        Tuning {
            enemy_fire_mode: EnemyFireMode::PerFrame { chance: 0.0 },
            ..Tuning::default()
        }
    }

    #[test]
    fn test_intervals_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = Tuning::default();
        for _ in 0..100 {
            let brain = EnemyBrain::new(&mut rng, &tuning);
            assert!((2.0..5.0).contains(&brain.direction_interval));
            assert!((0.5..2.0).contains(&brain.decision_interval));
        }
    }

    #[test]
    fn test_always_tracks_and_fires_when_certain() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning {
            track_player_chance: 1.0,
            decision_fire_chance: 1.0,
            ..quiet_tuning()
        };
        let mut tank = enemy(EnemyBrain::fixed(100.0, 0.1));
        let player = player_at(400.0, 120.0);

        let shot = tank.update_ai(0.2, &player, &mut rng, &tuning);
        assert_eq!(tank.body().direction, Direction::Right);
        let bullet = shot.expect("decision fire");
        assert!(!bullet.from_player);
        // Decision timer restarted with a new interval
        assert_eq!(tank.brain.decision_elapsed, 0.0);
        assert!((0.5..2.0).contains(&tank.brain.decision_interval));
    }

    #[test]
    fn test_out_of_range_chances_saturate() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = Tuning::from_json(
            r#"{ "track_player_chance": 1.5, "decision_fire_chance": -0.5,
                 "enemy_fire_mode": { "per_frame": { "chance": 0.0 } } }"#,
        )
        .unwrap();
        let mut tank = enemy(EnemyBrain::fixed(100.0, 0.1));
        let player = player_at(400.0, 120.0);

        let shot = tank.update_ai(0.2, &player, &mut rng, &tuning);
        assert_eq!(tank.body().direction, Direction::Right);
        assert!(shot.is_none());
        for _ in 0..600 {
            tank.update_ai(1.0 / 60.0, &player, &mut rng, &tuning);
        }
    }

    #[test]
    fn test_dead_player_is_not_tracked() {
        let mut rng = Pcg32::seed_from_u64(2);
        let tuning = Tuning {
            track_player_chance: 1.0,
            decision_fire_chance: 0.0,
            ..quiet_tuning()
        };
        let mut tank = enemy(EnemyBrain::fixed(100.0, 0.1));
        let mut player = player_at(400.0, 120.0);
        player.tank.body.alive = false;
        tank.update_ai(0.2, &player, &mut rng, &tuning);
        assert_eq!(tank.body().direction, Direction::Up);
    }

    #[test]
    fn test_direction_timer_rerolls() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = quiet_tuning();
        let mut tank = enemy(EnemyBrain::fixed(1.0, 100.0));
        tank.update_ai(0.5, &player_at(0.0, 0.0), &mut rng, &tuning);
        assert_eq!(tank.brain.direction_elapsed, 0.5);
        tank.update_ai(0.6, &player_at(0.0, 0.0), &mut rng, &tuning);
        assert_eq!(tank.brain.direction_elapsed, 0.0);
        assert!((2.0..5.0).contains(&tank.brain.direction_interval));
    }

    #[test]
    fn test_random_fire_respects_cooldown() {
        let mut rng = Pcg32::seed_from_u64(4);
        let tuning = Tuning {
            enemy_fire_mode: EnemyFireMode::PerFrame { chance: 1.0 },
            decision_fire_chance: 0.0,
            ..Tuning::default()
        };
        let mut tank = enemy(EnemyBrain::fixed(100.0, 100.0));
        let player = player_at(0.0, 0.0);
        assert!(tank.update_ai(0.016, &player, &mut rng, &tuning).is_some());
        assert!(tank.update_ai(0.016, &player, &mut rng, &tuning).is_none());
    }
}
