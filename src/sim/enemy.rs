//! Enemy patrol movement
//!
//! Enemies walk one cell per step along a single axis and turn around when
//! they reach the edge of the board.

use super::state::{Direction, Enemy, Position};

/// Advance one enemy by a single cell, bouncing off the board edge.
///
/// The position is clamped first, then the facing flips once the enemy
/// stands on the edge it was heading for, so an enemy already on the edge
/// stays put for this step and turns around.
pub fn advance(enemy: Enemy) -> Enemy {
    let Enemy { pos, direction } = enemy;
    let pos = pos.step(direction);

    let at_edge = match direction {
        Direction::Right => pos.x == Position::MAX_X,
        Direction::Left => pos.x == 0,
        Direction::Down => pos.y == Position::MAX_Y,
        Direction::Up => pos.y == 0,
    };

    Enemy {
        pos,
        direction: if at_edge { direction.reversed() } else { direction },
    }
}

/// Advance every enemy in place
pub fn advance_all(enemies: &mut [Enemy]) {
    for enemy in enemies.iter_mut() {
        *enemy = advance(*enemy);
    }
}

/// Enemies placed at the start of `level`: two patrols, plus a vertical one
/// from level 3 on
pub fn roster_for_level(level: u32) -> Vec<Enemy> {
    let mut enemies = vec![
        Enemy::new(0, 0, Direction::Right),
        Enemy::new(4, 2, Direction::Left),
    ];
    if level > 2 {
        enemies.push(Enemy::new(2, 1, Direction::Down));
    }
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_right_bounce_at_edge() {
        let e = advance(Enemy::new(4, 0, Direction::Right));
        assert_eq!(e.pos, Position::new(4, 0));
        assert_eq!(e.direction, Direction::Left);
    }

    #[test]
    fn test_left_bounce_at_edge() {
        let e = advance(Enemy::new(0, 3, Direction::Left));
        assert_eq!(e.pos, Position::new(0, 3));
        assert_eq!(e.direction, Direction::Right);
    }

    #[test]
    fn test_turns_on_arrival() {
        // Stepping onto the last column flips the facing immediately
        let e = advance(Enemy::new(3, 0, Direction::Right));
        assert_eq!(e.pos, Position::new(4, 0));
        assert_eq!(e.direction, Direction::Left);

        let e = advance(Enemy::new(2, 4, Direction::Down));
        assert_eq!(e.pos, Position::new(2, 5));
        assert_eq!(e.direction, Direction::Up);

        let e = advance(Enemy::new(2, 1, Direction::Up));
        assert_eq!(e.pos, Position::new(2, 0));
        assert_eq!(e.direction, Direction::Down);
    }

    #[test]
    fn test_full_patrol_cycle() {
        // A horizontal patrol from the left edge returns after 8 steps
        let start = Enemy::new(0, 0, Direction::Right);
        let mut e = start;
        let mut xs = Vec::new();
        for _ in 0..8 {
            e = advance(e);
            xs.push(e.pos.x);
        }
        assert_eq!(xs, vec![1, 2, 3, 4, 3, 2, 1, 0]);
        assert_eq!(e.direction, Direction::Right);
    }

    #[test]
    fn test_roster_grows_after_level_two() {
        assert_eq!(roster_for_level(1).len(), 2);
        assert_eq!(roster_for_level(2).len(), 2);
        assert_eq!(roster_for_level(3).len(), 3);
        assert_eq!(
            roster_for_level(3)[2],
            Enemy::new(2, 1, Direction::Down)
        );
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_enemies_stay_in_bounds(
            x in 0u8..5,
            y in 0u8..6,
            dir in any_direction(),
            steps in 1usize..40,
        ) {
            let mut e = Enemy::new(x, y, dir);
            for _ in 0..steps {
                let before = e.pos;
                e = advance(e);
                prop_assert!(e.pos.x <= Position::MAX_X);
                prop_assert!(e.pos.y <= Position::MAX_Y);
                // One cell at most, along one axis
                let dx = (e.pos.x as i16 - before.x as i16).abs();
                let dy = (e.pos.y as i16 - before.y as i16).abs();
                prop_assert!(dx + dy <= 1);
            }
        }
    }
}
