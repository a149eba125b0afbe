//! Sound event sink
//!
//! The simulation never plays audio. It names what happened and hands the
//! event to a [`SoundSink`], which is free to ignore it.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    /// A tank fired a bullet
    TankFire,
    /// Player started moving
    TankMove,
    /// A tank was destroyed
    TankExplosion,
    /// A bullet struck a wall
    BulletHit,
    /// Player collected an item
    ItemPickup,
    /// New game started
    GameStart,
    /// Level cleared
    Victory,
    /// Player ran out of lives
    GameOver,
}

impl SoundEffect {
    /// Event name as understood by audio backends
    pub fn as_str(self) -> &'static str {
        match self {
            SoundEffect::TankFire => "tank_fire",
            SoundEffect::TankMove => "tank_move",
            SoundEffect::TankExplosion => "tank_explosion",
            SoundEffect::BulletHit => "bullet_hit",
            SoundEffect::ItemPickup => "item_pickup",
            SoundEffect::GameStart => "game_start",
            SoundEffect::Victory => "victory",
            SoundEffect::GameOver => "game_over",
        }
    }
}

impl std::fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget receiver of sound events
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs each event at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink {
    pub muted: bool,
}

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            log::debug!("sound: {}", effect);
        }
    }
}

/// Collects events in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<SoundEffect>,
}

impl RecordingSink {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.events.iter().filter(|e| **e == effect).count()
    }
}

impl SoundSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect) {
        self.events.push(effect);
    }
}

/// Shared handle so a caller can keep reading what a boxed sink received
impl<S: SoundSink> SoundSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn play(&mut self, effect: SoundEffect) {
        self.borrow_mut().play(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_names() {
        assert_eq!(SoundEffect::TankFire.as_str(), "tank_fire");
        assert_eq!(SoundEffect::TankExplosion.to_string(), "tank_explosion");
        assert_eq!(
            serde_json::to_string(&SoundEffect::ItemPickup).unwrap(),
            "\"item_pickup\""
        );
    }

    #[test]
    fn test_recording_through_shared_handle() {
        let shared = Rc::new(RefCell::new(RecordingSink::default()));
        let mut sink: Box<dyn SoundSink> = Box::new(shared.clone());
        sink.play(SoundEffect::GameStart);
        sink.play(SoundEffect::TankFire);
        sink.play(SoundEffect::TankFire);
        assert_eq!(shared.borrow().events.len(), 3);
        assert_eq!(shared.borrow().count(SoundEffect::TankFire), 2);
    }
}
