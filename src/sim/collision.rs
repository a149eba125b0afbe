//! Axis-aligned collision detection
//!
//! Rectangles overlap with half-open semantics: touching edges do not
//! count. Dead entities never collide.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::GameObject;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(pos: DVec2, size: DVec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Half-open overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// True iff both entities are alive and their boxes overlap
pub fn intersects<A, B>(a: &A, b: &B) -> bool
where
    A: GameObject + ?Sized,
    B: GameObject + ?Sized,
{
    a.is_alive() && b.is_alive() && a.bounds().overlaps(&b.bounds())
}

/// Index of the first entity in `targets` that `probe` intersects
pub fn first_hit<A, B>(probe: &A, targets: &[B]) -> Option<usize>
where
    A: GameObject + ?Sized,
    B: GameObject,
{
    targets.iter().position(|t| intersects(probe, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Bullet, Direction, Wall, WallKind};
    use proptest::prelude::*;

    fn wall_at(x: f64, y: f64, w: u32, h: u32) -> Wall {
        Wall::new(DVec2::new(x, y), w, h, WallKind::Brick)
    }

    #[test]
    fn test_overlap_and_touching() {
        let a = wall_at(0.0, 0.0, 40, 40);
        let overlapping = wall_at(39.0, 39.0, 40, 40);
        let touching = wall_at(40.0, 0.0, 40, 40);
        assert!(intersects(&a, &overlapping));
        assert!(!intersects(&a, &touching));
    }

    #[test]
    fn test_dead_entities_never_collide() {
        let a = wall_at(0.0, 0.0, 40, 40);
        let mut b = wall_at(10.0, 10.0, 40, 40);
        assert!(intersects(&a, &b));
        b.body.alive = false;
        assert!(!intersects(&a, &b));
        assert!(!intersects(&b, &a));
    }

    #[test]
    fn test_first_hit_respects_order() {
        let bullet = Bullet::new(DVec2::new(50.0, 50.0), Direction::Up, true, false);
        let mut walls = vec![
            wall_at(200.0, 200.0, 40, 40),
            wall_at(40.0, 40.0, 40, 40),
            wall_at(45.0, 45.0, 40, 40),
        ];
        assert_eq!(first_hit(&bullet, &walls), Some(1));
        walls[1].body.alive = false;
        assert_eq!(first_hit(&bullet, &walls), Some(2));
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(
            ax in -100.0..900.0f64, ay in -100.0..700.0f64, aw in 1u32..80, ah in 1u32..80,
            bx in -100.0..900.0f64, by in -100.0..700.0f64, bw in 1u32..80, bh in 1u32..80,
            a_alive: bool, b_alive: bool,
        ) {
            let mut a = wall_at(ax, ay, aw, ah);
            let mut b = wall_at(bx, by, bw, bh);
            a.body.alive = a_alive;
            b.body.alive = b_alive;
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }
    }
}
