//! Level loading, enemy waves and item cadence
//!
//! A level sets a quota of enemies. At most `max_live_enemies` are on the
//! field at once; every spawn draws one from the quota. Items appear on a
//! periodic timer and as drops from destroyed enemies.

use glam::DVec2;
use rand::Rng;

use super::ai::EnemyBrain;
use super::entity::{Direction, Wall, WallKind};
use super::item::{Item, ItemKind};
use super::state::GameState;
use super::tank::EnemyTank;
use crate::levels::LevelDescription;

/// Quota for levels without a description
pub fn default_quota(level: u32) -> u32 {
    10 + 2 * level.saturating_sub(1)
}

/// Player spawn used when a level does not name one
pub fn default_player_spawn(state: &GameState) -> DVec2 {
    let g = state.tuning.grid_size as f64;
    DVec2::new(
        state.arena.width as f64 / 2.0,
        state.arena.height as f64 - 2.0 * g,
    )
}

/// Replace the field with the layout for `state.level`.
///
/// Without a description (or with one that lists no walls) the wall layout
/// is generated procedurally.
pub fn load_level(state: &mut GameState, desc: Option<&LevelDescription>, rng: &mut impl Rng) {
    state.clear_field();
    let grid = state.tuning.grid_size;
    let level = state.level;

    let procedural_walls = desc.is_none_or(|d| d.walls.is_empty());
    match desc {
        Some(desc) => {
            state.remaining_enemies = desc.enemy_tank_count;
            state.player_spawn = desc
                .player_spawn
                .map(|p| p.to_vec())
                .unwrap_or_else(|| default_player_spawn(state));
            state.enemy_spawns = desc.enemy_spawns.iter().map(|p| p.to_vec()).collect();
            state.walls = desc.walls.iter().map(|w| w.to_wall(grid)).collect();
        }
        None => {
            state.remaining_enemies = default_quota(level);
            state.player_spawn = default_player_spawn(state);
            state.enemy_spawns.clear();
        }
    }
    if procedural_walls {
        state.walls = generate_walls(level, state.arena.width, state.arena.height, grid, rng);
    }

    let body = &mut state.player.tank.body;
    body.pos = state.player_spawn;
    body.direction = Direction::Up;
    state.player.tank.current_speed = 0.0;

    let initial = state.tuning.max_live_enemies.min(state.remaining_enemies as usize);
    let spawns = state.enemy_spawns.clone();
    for i in 0..initial {
        if spawns.is_empty() {
            spawn_enemy(state, rng);
        } else {
            spawn_enemy_at(state, spawns[i % spawns.len()], rng);
        }
    }

    if level >= 2 {
        spawn_random_item(state, rng);
    }

    log::info!(
        "Level {} loaded: quota {}, {} walls{}",
        level,
        state.remaining_enemies + initial as u32,
        state.walls.len(),
        if procedural_walls { " (procedural)" } else { "" }
    );
}

/// Spawn an enemy at `pos` with level-scaled stats; draws from the quota
pub fn spawn_enemy_at(state: &mut GameState, pos: DVec2, rng: &mut impl Rng) {
    let tuning = &state.tuning;
    let direction = Direction::random(rng);
    let brain = EnemyBrain::new(rng, tuning);
    let enemy = EnemyTank::new(
        pos,
        direction,
        tuning.enemy_speed_for_level(state.level),
        tuning.enemy_cooldown_for_level(state.level),
        brain,
    );
    state.enemies.push(enemy);
    state.remaining_enemies = state.remaining_enemies.saturating_sub(1);
    log::debug!(
        "Enemy spawned at ({}, {}), {} left in quota",
        pos.x,
        pos.y,
        state.remaining_enemies
    );
}

/// Spawn an enemy at a searched spawn point
pub fn spawn_enemy(state: &mut GameState, rng: &mut impl Rng) {
    let pos = find_enemy_spawn(state, rng);
    spawn_enemy_at(state, pos, rng);
}

/// Pick a spawn candidate not within two grid cells of a live enemy.
/// Falls back to the arena origin once the attempt budget runs out.
pub fn find_enemy_spawn(state: &GameState, rng: &mut impl Rng) -> DVec2 {
    let candidates = state.enemy_spawn_candidates();
    let reach = 2.0 * state.tuning.grid_size as f64;
    let crowded = |pos: DVec2| {
        state.enemies.iter().any(|e| {
            let d = (e.tank.body.pos - pos).abs();
            e.tank.body.alive && d.x < reach && d.y < reach
        })
    };

    for _ in 0..state.tuning.spawn_attempts.max(1) {
        let pos = candidates[rng.random_range(0..candidates.len())];
        if !crowded(pos) {
            return pos;
        }
    }
    log::warn!(
        "No free enemy spawn point after {} attempts, forcing (0, 0)",
        state.tuning.spawn_attempts
    );
    DVec2::ZERO
}

/// Top up the field by one enemy if it is short and the quota allows
pub fn replenish_enemies(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if state.live_enemy_count() < state.tuning.max_live_enemies && state.remaining_enemies > 0 {
        spawn_enemy(state, rng);
        return true;
    }
    false
}

/// Place a random item on a free spot. Gives up quietly if none is found.
pub fn spawn_random_item(state: &mut GameState, rng: &mut impl Rng) -> bool {
    let kind = ItemKind::random(rng);
    let g = state.tuning.grid_size as f64;
    let x_span = (state.arena.width as f64 - 2.0 * g).max(1.0) as u32;
    let y_span = (state.arena.height as f64 - 4.0 * g).max(1.0) as u32;
    let near = |a: DVec2, b: DVec2| (a.x - b.x).abs() < g && (a.y - b.y).abs() < g;

    for _ in 0..state.tuning.item_placement_attempts {
        let pos = DVec2::new(
            rng.random_range(0..x_span) as f64 + g,
            rng.random_range(0..y_span) as f64 + g,
        );
        let blocked = state.walls.iter().any(|w| w.body.alive && near(w.body.pos, pos))
            || (state.player.tank.body.alive && near(state.player.tank.body.pos, pos))
            || state.enemies.iter().any(|e| e.tank.body.alive && near(e.tank.body.pos, pos));
        if !blocked {
            log::debug!("{:?} item placed at ({}, {})", kind, pos.x, pos.y);
            state.items.push(Item::new(pos, kind));
            return true;
        }
    }
    false
}

/// Roll the kill-drop chance and drop a random item where the enemy died.
/// Drops ignore the field item cap.
pub fn roll_kill_drop(state: &mut GameState, pos: DVec2, rng: &mut impl Rng) {
    if rng.random_bool(state.tuning.item_drop_chance.clamp(0.0, 1.0)) {
        let kind = ItemKind::random(rng);
        state.items.push(Item::new(pos, kind));
    }
}

/// Advance the periodic item timer; on each period roll for a spawn
pub fn tick_item_spawner(state: &mut GameState, dt: f64, rng: &mut impl Rng) {
    state.item_timer += dt;
    if state.item_timer < state.tuning.item_spawn_interval {
        return;
    }
    state.item_timer = 0.0;
    let live_items = state.items.iter().filter(|i| i.body.alive).count();
    if rng.random_bool(state.tuning.item_spawn_chance.clamp(0.0, 1.0))
        && live_items < state.tuning.max_field_items
    {
        spawn_random_item(state, rng);
    }
}

/// Procedural wall layout: three fixed designs, then random fields
pub fn generate_walls(
    level: u32,
    width: u32,
    height: u32,
    grid: u32,
    rng: &mut impl Rng,
) -> Vec<Wall> {
    let mut layout = Layout {
        w: width as i32,
        h: height as i32,
        g: grid as i32,
        walls: Vec::new(),
    };
    match level {
        1 => layout.first(),
        2 => layout.second(),
        3 => layout.third(),
        _ => layout.random(rng),
    }
    layout.walls
}

struct Layout {
    w: i32,
    h: i32,
    g: i32,
    walls: Vec<Wall>,
}

impl Layout {
    fn put(&mut self, x: i32, y: i32, kind: WallKind) {
        self.walls.push(Wall::block(x, y, self.g as u32, kind));
    }

    /// Five blocks hugging the player base
    fn base(&mut self, kind: WallKind) {
        let (w, h, g) = (self.w, self.h, self.g);
        self.put(w / 2 - g, h - 3 * g, kind);
        self.put(w / 2, h - 3 * g, kind);
        self.put(w / 2 + g, h - 3 * g, kind);
        self.put(w / 2 - g, h - 4 * g, kind);
        self.put(w / 2 + g, h - 4 * g, kind);
    }

    fn first(&mut self) {
        let (w, h, g) = (self.w, self.h, self.g);
        for i in 0..5 {
            self.put(3 * g, g * (i + 2), WallKind::Brick);
            self.put(w - 4 * g, g * (i + 2), WallKind::Brick);
        }
        for i in 0..3 {
            self.put(w / 2 - g / 2, h / 2 - g + i * g, WallKind::Steel);
        }
        self.base(WallKind::Brick);
    }

    fn second(&mut self) {
        let (w, h, g) = (self.w, self.h, self.g);
        for i in 0..8 {
            self.put(g * (i + 2), 3 * g, WallKind::Brick);
            self.put(g * (i + 11), 3 * g, WallKind::Brick);
        }
        for i in 0..4 {
            self.put(g * (i + 4), h / 2, WallKind::Brick);
            self.put(g * (i + 13), h / 2, WallKind::Brick);
        }
        for i in 0..3 {
            self.put(7 * g, h / 2 - g * (i + 1), WallKind::Brick);
            self.put(w - 8 * g, h / 2 - g * (i + 1), WallKind::Brick);
        }
        for i in 0..3 {
            self.put(g * (i + 4), h - 7 * g, WallKind::Steel);
            self.put(w - g * (i + 5), h - 7 * g, WallKind::Steel);
        }
        self.base(WallKind::Steel);
    }

    fn third(&mut self) {
        let (w, h, g) = (self.w, self.h, self.g);
        for i in (0..10).step_by(2) {
            self.put(g * (i + 1), 2 * g, WallKind::Steel);
            self.put(g * (i + 2), 2 * g, WallKind::Brick);
        }
        for i in 0..5 {
            self.put(5 * g, g * (i + 4), WallKind::Brick);
            self.put(w - 6 * g, g * (i + 4), WallKind::Brick);
        }
        // Checkerboard centre
        for i in 0..3 {
            for j in 0..3 {
                let kind = if (i + j) % 2 == 0 { WallKind::Steel } else { WallKind::Brick };
                self.put(w / 2 - g + i * g, h / 2 - g + j * g, kind);
            }
        }
        // Lower barrier with gaps
        for i in 0..8 {
            if i % 3 != 1 {
                self.put(g * (i + 2), h - 6 * g, WallKind::Steel);
                self.put(w - g * (i + 3), h - 6 * g, WallKind::Steel);
            }
        }
        self.base(WallKind::Steel);
    }

    fn random(&mut self, rng: &mut impl Rng) {
        self.base(WallKind::Steel);
        let (w, h, g) = (self.w, self.h, self.g);
        let cols = w / g - 2;
        let rows = h / g - 6;
        if cols <= 0 || rows <= 0 {
            return;
        }
        let bricks = rng.random_range(40..60);
        let steels = rng.random_range(10..20);
        let plan = std::iter::repeat_n(WallKind::Brick, bricks)
            .chain(std::iter::repeat_n(WallKind::Steel, steels));
        for kind in plan {
            let x = (rng.random_range(0..cols) + 1) * g;
            let y = (rng.random_range(0..rows) + 1) * g;
            // Keep the player's spawn area open
            if (x - w / 2).abs() < 2 * g && (y - (h - 2 * g)).abs() < 2 * g {
                continue;
            }
            self.put(x, y, kind);
        }
    }
}
