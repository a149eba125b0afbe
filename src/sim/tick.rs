//! Per-frame simulation step
//!
//! Frame order is fixed: player, enemies (motion then AI), bullets, items,
//! tank-vs-wall, tank-vs-tank, win/loss, enemy top-up, item cadence.
//! Entities that die during a pass are flagged and swept with `retain`
//! once the pass finishes, so no pass ever walks a list it is shrinking.

use rand::Rng;

use super::collision::{first_hit, intersects};
use super::entity::{Direction, GameObject};
use super::item::ItemKind;
use super::state::{GamePhase, GameState};
use super::tank::TankUnit;
use super::wave;
use crate::audio::SoundEffect;

/// Advance the game by `dt` seconds. Does nothing unless running.
pub fn tick(state: &mut GameState, dt: f64, rng: &mut impl Rng) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.frames += 1;
    let arena = state.arena;

    state.player.update(dt, &arena);

    // Bullets fired this frame join after the bullet pass
    let mut fired = Vec::new();
    for enemy in state.enemies.iter_mut() {
        enemy.update(dt, &arena);
        if let Some(bullet) = enemy.update_ai(dt, &state.player, rng, &state.tuning) {
            fired.push(bullet);
        }
    }

    update_bullets(state, dt, rng);
    state.bullets.append(&mut fired);
    if state.phase != GamePhase::Running {
        return;
    }

    update_items(state, dt);

    resolve_tank_walls(state);
    resolve_tank_tanks(state);

    evaluate_outcome(state);
    if state.phase != GamePhase::Running {
        return;
    }

    wave::replenish_enemies(state, rng);
    wave::tick_item_spawner(state, dt, rng);
}

/// Set the player's heading and move intent
pub fn apply_move_intent(state: &mut GameState, direction: Direction, moving: bool) {
    if state.phase != GamePhase::Running || !state.player.is_alive() {
        return;
    }
    state.player.tank.body.direction = direction;
    state.player.tank.moving = moving;
    if moving {
        state.emit(SoundEffect::TankMove);
    }
}

/// Fire the player's gun if the cooldown allows it
pub fn player_fire(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    match state.player.fire() {
        Some(bullet) => {
            state.bullets.push(bullet);
            state.emit(SoundEffect::TankFire);
            true
        }
        None => false,
    }
}

fn update_bullets(state: &mut GameState, dt: f64, rng: &mut impl Rng) {
    let arena = state.arena;
    for i in 0..state.bullets.len() {
        if !state.bullets[i].is_alive() {
            continue;
        }
        state.bullets[i].update(dt, &arena);
        if arena.is_outside(state.bullets[i].pos()) {
            state.bullets[i].body.alive = false;
            continue;
        }
        bullet_vs_tanks(state, i, rng);
        if state.bullets[i].is_alive() {
            bullet_vs_walls(state, i);
        }
    }
    state.bullets.retain(|b| b.is_alive());
    state.enemies.retain(|e| e.is_alive());
    state.walls.retain(|w| w.is_alive());
}

/// Enemy bullets strike the player; player bullets strike the first
/// enemy they overlap.
fn bullet_vs_tanks(state: &mut GameState, i: usize, rng: &mut impl Rng) {
    let arena = state.arena;

    if !state.bullets[i].from_player {
        if !intersects(&state.bullets[i], &state.player) {
            return;
        }
        state.bullets[i].on_collision(&arena);
        if !state.player.hit() {
            state.emit(SoundEffect::BulletHit);
            return;
        }
        state.emit(SoundEffect::TankExplosion);
        if state.player.lives == 0 {
            state.emit(SoundEffect::GameOver);
            state.set_phase(GamePhase::GameOver);
        } else {
            let spawn = state.player_spawn;
            let window = state.tuning.respawn_invincibility;
            state.player.respawn(spawn, Direction::Up, window);
            log::info!("Player respawned, {} lives left", state.player.lives);
        }
        return;
    }

    let Some(j) = first_hit(&state.bullets[i], &state.enemies) else {
        return;
    };
    state.bullets[i].on_collision(&arena);
    if state.enemies[j].hit() {
        let pos = state.enemies[j].pos();
        state.add_kill_score(1);
        state.emit(SoundEffect::TankExplosion);
        wave::roll_kill_drop(state, pos, rng);
    }
}

fn bullet_vs_walls(state: &mut GameState, i: usize) {
    let arena = state.arena;
    let Some(j) = first_hit(&state.bullets[i], &state.walls) else {
        return;
    };
    if state.walls[j].breaks_under(&state.bullets[i]) {
        state.walls[j].body.alive = false;
    }
    state.bullets[i].on_collision(&arena);
    state.emit(SoundEffect::BulletHit);
}

fn update_items(state: &mut GameState, dt: f64) {
    let arena = state.arena;
    for i in 0..state.items.len() {
        state.items[i].update(dt, &arena);
        if !intersects(&state.player, &state.items[i]) {
            continue;
        }
        if state.items[i].kind == ItemKind::Bomb {
            detonate_bomb(state);
        } else {
            state.items[i].apply_effect(&mut state.player);
        }
        state.items[i].body.alive = false;
        state.emit(SoundEffect::ItemPickup);
    }
    state.items.retain(|item| item.is_alive());
}

/// Destroy every live enemy, scoring each kill and shrinking the quota
fn detonate_bomb(state: &mut GameState) {
    let destroyed = state.live_enemy_count();
    state.enemies.clear();
    state.add_kill_score(destroyed as u64);
    state.remaining_enemies = state.remaining_enemies.saturating_sub(destroyed as u32);
    state.emit(SoundEffect::TankExplosion);
    log::info!("Bomb destroyed {} enemies, {} left in quota", destroyed, state.remaining_enemies);
}

/// One nudge per tank touching any wall, then a hard clamp to the arena
fn resolve_tank_walls(state: &mut GameState) {
    let arena = state.arena;

    if state.player.is_alive() {
        if state.walls.iter().any(|w| intersects(&state.player, w)) {
            state.player.on_collision(&arena);
        }
        arena.clamp(&mut state.player.tank.body);
    }

    for enemy in state.enemies.iter_mut() {
        if !enemy.is_alive() {
            continue;
        }
        if state.walls.iter().any(|w| intersects(&*enemy, w)) {
            enemy.on_collision(&arena);
        }
        arena.clamp(&mut enemy.tank.body);
    }
}

fn resolve_tank_tanks(state: &mut GameState) {
    let arena = state.arena;

    for enemy in state.enemies.iter_mut() {
        if intersects(&state.player, &*enemy) {
            state.player.on_collision(&arena);
            enemy.on_collision(&arena);
        }
    }

    let n = state.enemies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if intersects(&state.enemies[i], &state.enemies[j]) {
                state.enemies[i].on_collision(&arena);
                state.enemies[j].on_collision(&arena);
            }
        }
    }
}

/// Loss wins over a simultaneous level clear
fn evaluate_outcome(state: &mut GameState) {
    if !state.player.is_alive() && state.player.lives == 0 {
        state.set_phase(GamePhase::GameOver);
        return;
    }
    if state.is_level_cleared() {
        state.emit(SoundEffect::Victory);
        if state.has_next_level() {
            state.set_phase(GamePhase::LevelComplete);
        } else {
            state.set_phase(GamePhase::Victory);
        }
    }
}
