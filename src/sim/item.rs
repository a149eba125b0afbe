//! Pickups and timed buffs

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Body, Direction, GameObject};
use super::tank::PlayerTank;
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Shield,
    Speed,
    Power,
    Life,
    Bomb,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Shield,
        ItemKind::Speed,
        ItemKind::Power,
        ItemKind::Life,
        ItemKind::Bomb,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Effect duration in seconds (0 for instant effects)
    pub fn duration(self) -> f64 {
        match self {
            ItemKind::Shield => SHIELD_DURATION,
            ItemKind::Speed => SPEED_BOOST_DURATION,
            ItemKind::Power => FIRE_POWER_DURATION,
            ItemKind::Life | ItemKind::Bomb => 0.0,
        }
    }
}

/// A countdown that is either running or off
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedBuff {
    pub active: bool,
    pub remaining: f64,
}

impl TimedBuff {
    /// Start (or restart) the buff; re-arming resets rather than stacks
    pub fn arm(&mut self, duration: f64) {
        self.active = true;
        self.remaining = duration;
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.remaining = 0.0;
    }

    /// Count down; returns true on the tick the buff expires
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.clear();
            return true;
        }
        false
    }
}

/// A pickup lying on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub body: Body,
    pub kind: ItemKind,
    /// Effect duration once picked up
    pub duration: f64,
    /// Seconds until it vanishes unconsumed
    pub lifetime: f64,
}

impl Item {
    pub fn new(pos: DVec2, kind: ItemKind) -> Self {
        Self {
            body: Body::new(pos, ITEM_SIZE, ITEM_SIZE, Direction::Up),
            kind,
            duration: kind.duration(),
            lifetime: ITEM_LIFETIME,
        }
    }

    /// Apply this item to the player. Bomb is resolved by the game state,
    /// never here, so it is rejected.
    pub fn apply_effect(&self, player: &mut PlayerTank) -> bool {
        if !player.is_alive() || !self.is_alive() {
            return false;
        }
        match self.kind {
            ItemKind::Shield => player.activate_shield(self.duration),
            ItemKind::Speed => player.activate_speed_boost(self.duration),
            ItemKind::Power => player.activate_fire_power(self.duration),
            ItemKind::Life => player.add_life(),
            ItemKind::Bomb => return false,
        }
        true
    }
}

impl GameObject for Item {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt: f64, _arena: &Arena) {
        if self.body.alive {
            self.lifetime -= dt;
            if self.lifetime <= 0.0 {
                self.body.alive = false;
            }
        }
    }

    fn advance(&mut self, _dt: f64, _arena: &Arena) {}
}
