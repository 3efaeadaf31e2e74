#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy decision making.
//!
//! Runs once per tick against frozen snapshots and proposes steps and shots
//! as commands. The world remains the sole authority: a proposed step that
//! lands on a wall or arrives inside a cooldown window is simply refused
//! there, so this system never has to agree with the world about timing.

use std::time::Duration;

use grid_strike_core::{
    BehaviorPattern, Command, EnemyId, EnemySnapshot, EnemyView, Event, GridPos, PlayerSnapshot,
    PlayerView,
};
use grid_strike_world::grid::WallGrid;

/// Stateful AI planner; the only state it keeps is pursuit memory for
/// aggressive enemies, which chase beyond their patrol radius once provoked.
#[derive(Debug, Default)]
pub struct EnemyAi {
    pursuing: Vec<EnemyId>,
}

impl EnemyAi {
    /// Creates a planner with no pursuit memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and immutable views to emit enemy commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        players: &PlayerView,
        enemies: &EnemyView,
        grid: &WallGrid,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        // Drop pursuit memory for enemies that are gone or fading.
        self.pursuing
            .retain(|id| enemies.iter().any(|e| e.id == *id && !e.is_destroyed));

        for enemy in enemies.iter() {
            if enemy.is_destroyed {
                continue;
            }
            let Some(target) = nearest_target(enemy, players) else {
                continue;
            };

            self.plan_movement(enemy, target, out);
            plan_shot(enemy, target, grid, out);
        }
    }

    fn plan_movement(&mut self, enemy: &EnemySnapshot, target: &PlayerSnapshot, out: &mut Vec<Command>) {
        if enemy.move_ready_in > Duration::ZERO {
            return;
        }

        let radius = f64::from(enemy.patrol_radius);
        let provoked = enemy.anchor.distance(target.position) <= radius;

        let destination = match enemy.behavior {
            BehaviorPattern::Guard => None,
            BehaviorPattern::Patrol => {
                if provoked {
                    Some(target.position)
                } else if enemy.position != enemy.anchor {
                    Some(enemy.anchor)
                } else {
                    None
                }
            }
            BehaviorPattern::Aggressive => {
                let was_pursuing = self.pursuing.contains(&enemy.id);
                if provoked && !was_pursuing {
                    self.pursuing.push(enemy.id);
                }
                let give_up = enemy.anchor.distance(target.position) > radius * 2.0;
                if give_up {
                    self.pursuing.retain(|id| *id != enemy.id);
                }
                if (provoked || was_pursuing) && !give_up {
                    Some(target.position)
                } else if enemy.position != enemy.anchor {
                    Some(enemy.anchor)
                } else {
                    None
                }
            }
            BehaviorPattern::Defensive => {
                // Give ground toward the anchor while the threat is close.
                if provoked && enemy.position != enemy.anchor {
                    Some(enemy.anchor)
                } else {
                    None
                }
            }
        };

        let Some(destination) = destination else {
            return;
        };
        if let Some(direction) = enemy.position.step_toward(destination) {
            out.push(Command::StepEnemy {
                enemy: enemy.id,
                direction,
            });
        }
    }
}

fn nearest_target<'players>(
    enemy: &EnemySnapshot,
    players: &'players PlayerView,
) -> Option<&'players PlayerSnapshot> {
    players
        .iter()
        .filter(|player| player.is_alive && !player.at_exit)
        .min_by(|a, b| {
            let da = enemy.position.distance(a.position);
            let db = enemy.position.distance(b.position);
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        })
}

fn plan_shot(
    enemy: &EnemySnapshot,
    target: &PlayerSnapshot,
    grid: &WallGrid,
    out: &mut Vec<Command>,
) {
    if enemy.shoot_ready_in > Duration::ZERO {
        return;
    }
    let stats = enemy.class.stats();
    if enemy.position.distance(target.position) > f64::from(stats.shoot_range) {
        return;
    }
    if !aligned(enemy.position, target.position) {
        return;
    }
    if !grid.line_of_sight(enemy.position, target.position) {
        return;
    }
    out.push(Command::EnemyShoot {
        enemy: enemy.id,
        target: target.position,
    });
}

// Enemies only fire along rows and columns.
fn aligned(from: GridPos, to: GridPos) -> bool {
    from.x() == to.x() || from.y() == to.y()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_strike_core::{Direction, EnemyClass, Health, HeroClass, PlayerId, PlayerSnapshot};

    fn player_at(position: GridPos) -> PlayerSnapshot {
        PlayerSnapshot {
            id: PlayerId::new(0),
            position,
            hero: HeroClass::Vanguard,
            health: Health::new(3),
            max_health: Health::new(3),
            is_hit: false,
            is_alive: true,
            at_exit: false,
        }
    }

    fn enemy_at(
        position: GridPos,
        anchor: GridPos,
        class: EnemyClass,
        behavior: BehaviorPattern,
    ) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            position,
            anchor,
            patrol_radius: class.stats().default_patrol_radius,
            class,
            behavior,
            health: class.stats().max_health,
            is_chasing: false,
            is_hit: false,
            is_destroyed: false,
            move_ready_in: Duration::ZERO,
            shoot_ready_in: Duration::ZERO,
        }
    }

    fn tick_events() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }]
    }

    fn run(players: Vec<PlayerSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<Command> {
        let mut ai = EnemyAi::new();
        let mut out = Vec::new();
        ai.handle(
            &tick_events(),
            &PlayerView::from_snapshots(players),
            &EnemyView::from_snapshots(enemies),
            &WallGrid::new(),
            &mut out,
        );
        out
    }

    #[test]
    fn patroller_chases_inside_its_radius() {
        let commands = run(
            vec![player_at(GridPos::new(8, 5))],
            vec![enemy_at(
                GridPos::new(5, 5),
                GridPos::new(5, 5),
                EnemyClass::Guard,
                BehaviorPattern::Patrol,
            )],
        );
        assert!(commands.contains(&Command::StepEnemy {
            enemy: EnemyId::new(0),
            direction: Direction::East,
        }));
    }

    #[test]
    fn patroller_returns_to_anchor_when_the_player_leaves() {
        let commands = run(
            vec![player_at(GridPos::new(20, 15))],
            vec![enemy_at(
                GridPos::new(7, 5),
                GridPos::new(5, 5),
                EnemyClass::Guard,
                BehaviorPattern::Patrol,
            )],
        );
        assert!(commands.contains(&Command::StepEnemy {
            enemy: EnemyId::new(0),
            direction: Direction::West,
        }));
    }

    #[test]
    fn guard_shoots_but_never_steps() {
        let commands = run(
            vec![player_at(GridPos::new(5, 8))],
            vec![enemy_at(
                GridPos::new(5, 5),
                GridPos::new(5, 5),
                EnemyClass::Sentinel,
                BehaviorPattern::Guard,
            )],
        );
        assert_eq!(
            commands,
            vec![Command::EnemyShoot {
                enemy: EnemyId::new(0),
                target: GridPos::new(5, 8),
            }]
        );
    }

    #[test]
    fn shots_require_an_unobstructed_orthogonal_line() {
        let mut grid = WallGrid::new();
        grid.place_wall(GridPos::new(5, 6));
        let mut ai = EnemyAi::new();
        let mut out = Vec::new();
        ai.handle(
            &tick_events(),
            &PlayerView::from_snapshots(vec![player_at(GridPos::new(5, 8))]),
            &EnemyView::from_snapshots(vec![enemy_at(
                GridPos::new(5, 5),
                GridPos::new(5, 5),
                EnemyClass::Sentinel,
                BehaviorPattern::Guard,
            )]),
            &grid,
            &mut out,
        );
        assert!(out.is_empty());

        // A diagonal offset also suppresses the shot even without walls.
        out.clear();
        ai.handle(
            &tick_events(),
            &PlayerView::from_snapshots(vec![player_at(GridPos::new(7, 7))]),
            &EnemyView::from_snapshots(vec![enemy_at(
                GridPos::new(5, 5),
                GridPos::new(5, 5),
                EnemyClass::Sentinel,
                BehaviorPattern::Guard,
            )]),
            &WallGrid::new(),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn aggressive_enemy_pursues_beyond_its_radius_once_provoked() {
        let mut ai = EnemyAi::new();
        let anchor = GridPos::new(5, 5);
        let enemy = enemy_at(anchor, anchor, EnemyClass::Stalker, BehaviorPattern::Aggressive);

        // Provocation inside the radius starts the pursuit.
        let mut out = Vec::new();
        ai.handle(
            &tick_events(),
            &PlayerView::from_snapshots(vec![player_at(GridPos::new(8, 5))]),
            &EnemyView::from_snapshots(vec![enemy.clone()]),
            &WallGrid::new(),
            &mut out,
        );
        assert!(!out.is_empty());

        // The player retreats past the radius but inside twice the radius;
        // the pursuit continues.
        out.clear();
        ai.handle(
            &tick_events(),
            &PlayerView::from_snapshots(vec![player_at(GridPos::new(11, 5))]),
            &EnemyView::from_snapshots(vec![enemy.clone()]),
            &WallGrid::new(),
            &mut out,
        );
        assert!(out.contains(&Command::StepEnemy {
            enemy: EnemyId::new(0),
            direction: Direction::East,
        }));

        // Past twice the radius the enemy gives up and heads home.
        out.clear();
        ai.handle(
            &tick_events(),
            &PlayerView::from_snapshots(vec![player_at(GridPos::new(20, 5))]),
            &EnemyView::from_snapshots(vec![enemy]),
            &WallGrid::new(),
            &mut out,
        );
        assert!(!out.contains(&Command::StepEnemy {
            enemy: EnemyId::new(0),
            direction: Direction::East,
        }));
    }

    #[test]
    fn defensive_enemy_gives_ground_toward_its_anchor() {
        let commands = run(
            vec![player_at(GridPos::new(7, 5))],
            vec![enemy_at(
                GridPos::new(8, 5),
                GridPos::new(5, 5),
                EnemyClass::Warden,
                BehaviorPattern::Defensive,
            )],
        );
        assert!(commands.contains(&Command::StepEnemy {
            enemy: EnemyId::new(0),
            direction: Direction::West,
        }));
    }

    #[test]
    fn nothing_happens_without_a_time_advance() {
        let mut ai = EnemyAi::new();
        let mut out = Vec::new();
        ai.handle(
            &[],
            &PlayerView::from_snapshots(vec![player_at(GridPos::new(8, 5))]),
            &EnemyView::from_snapshots(vec![enemy_at(
                GridPos::new(5, 5),
                GridPos::new(5, 5),
                EnemyClass::Guard,
                BehaviorPattern::Patrol,
            )]),
            &WallGrid::new(),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
