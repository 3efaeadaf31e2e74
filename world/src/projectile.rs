//! Projectile entities and their per-weapon travel and retention rules.

use std::time::Duration;

use grid_strike_core::{
    AimVector, EnemyId, GridPos, ProjectileId, ProjectileOwner, RemovalReason, WeaponSpec,
    WeaponType, MELEE_LIFETIME,
};

use crate::grid::WallGrid;

/// Outcome of advancing a projectile against the current clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TravelOutcome {
    /// The projectile stays in flight (it may or may not have moved).
    Flying,
    /// The world must drop the projectile for the given reason.
    Removed(RemovalReason),
}

/// A projectile in flight, owned by the world.
#[derive(Debug, Clone)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) owner: ProjectileOwner,
    pub(crate) weapon: WeaponType,
    pub(crate) spec: WeaponSpec,
    pub(crate) position: GridPos,
    pub(crate) aim: AimVector,
    pub(crate) start: GridPos,
    pub(crate) spawned_at: Duration,
    pub(crate) last_advance_at: Duration,
    pub(crate) traveled: u32,
    pub(crate) has_returned: bool,
    pub(crate) penetrated: Vec<EnemyId>,
    trajectory: Vec<GridPos>,
    trajectory_index: usize,
}

/// Cells of a lobbed shot, fixed at launch. A quadratic lift bows the path
/// off the firing axis, so the lob clears intervening cover and comes back
/// down on the straight-line endpoint.
fn arc_cells(start: GridPos, aim: AimVector, range: u32) -> Vec<GridPos> {
    let span = range as i32;
    let peak = f64::from(range) / 2.0;
    (1..=span)
        .map(|step| {
            let t = f64::from(step) / f64::from(span);
            let lift = (4.0 * peak * t * (1.0 - t)).round() as i32;
            let x = start.x() + i32::from(aim.dx()) * step;
            let y = start.y() + i32::from(aim.dy()) * step;
            if aim.dx() == 0 {
                GridPos::new((x - lift).max(0), y)
            } else {
                GridPos::new(x, (y - lift).max(0))
            }
        })
        .collect()
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        owner: ProjectileOwner,
        weapon: WeaponType,
        position: GridPos,
        aim: AimVector,
        now: Duration,
    ) -> Self {
        let spec = weapon.spec();
        let trajectory = if spec.parabolic {
            arc_cells(position, aim, spec.range)
        } else {
            Vec::new()
        };
        Self {
            id,
            owner,
            weapon,
            spec,
            position,
            aim,
            start: position,
            spawned_at: now,
            last_advance_at: now,
            traveled: 0,
            has_returned: false,
            penetrated: Vec::new(),
            trajectory,
            trajectory_index: 0,
        }
    }

    /// Advances the projectile as far as the clock allows, applying the
    /// weapon's retention rules after every single-cell step.
    pub(crate) fn advance(&mut self, now: Duration, grid: &WallGrid) -> TravelOutcome {
        if self.spec.melee {
            // Melee strikes never move; they expire after their flash window.
            if now.saturating_sub(self.spawned_at) >= MELEE_LIFETIME {
                return TravelOutcome::Removed(RemovalReason::MeleeExpired);
            }
            return TravelOutcome::Flying;
        }

        while now.saturating_sub(self.last_advance_at) >= self.spec.travel_period {
            self.last_advance_at += self.spec.travel_period;
            if let TravelOutcome::Removed(reason) = self.step_once(grid) {
                return TravelOutcome::Removed(reason);
            }
        }
        TravelOutcome::Flying
    }

    fn step_once(&mut self, grid: &WallGrid) -> TravelOutcome {
        if self.spec.parabolic {
            return self.step_arc(grid);
        }

        self.position = self.position.offset(self.aim);
        self.traveled = self.traveled.saturating_add(1);

        // A burn cone lingers through cover and off the grid edge; only
        // the distance test retires it, and the cell at exactly max range
        // is kept for one more collision pass.
        if self.spec.continuous {
            if self.position.distance(self.start) > f64::from(self.spec.range) {
                return TravelOutcome::Removed(RemovalReason::RangeExhausted);
            }
            return TravelOutcome::Flying;
        }

        if !grid.in_bounds(self.position) {
            return TravelOutcome::Removed(RemovalReason::OutOfBounds);
        }

        if grid.is_wall(self.position) && !self.spec.pierce_walls {
            return TravelOutcome::Removed(RemovalReason::WallHit);
        }

        if self.spec.returning {
            if self.has_returned && self.position.distance(self.start) <= 1.0 {
                return TravelOutcome::Removed(RemovalReason::Returned);
            }
            if !self.has_returned && self.traveled >= self.spec.range {
                self.has_returned = true;
                self.aim = self.aim.reversed();
            }
            return TravelOutcome::Flying;
        }

        if self.traveled >= self.spec.range {
            return TravelOutcome::Removed(RemovalReason::RangeExhausted);
        }

        TravelOutcome::Flying
    }

    // Lobbed shots replay their launch-time cell list; walls never stop
    // them, only leaving the grid or landing does.
    fn step_arc(&mut self, grid: &WallGrid) -> TravelOutcome {
        let Some(cell) = self.trajectory.get(self.trajectory_index).copied() else {
            return TravelOutcome::Removed(RemovalReason::RangeExhausted);
        };
        self.trajectory_index += 1;
        self.position = cell;

        if !grid.in_bounds(cell) {
            return TravelOutcome::Removed(RemovalReason::OutOfBounds);
        }

        if self.trajectory_index == self.trajectory.len() {
            if self.spec.blast_radius > 0 {
                return TravelOutcome::Removed(RemovalReason::Detonated);
            }
            return TravelOutcome::Removed(RemovalReason::RangeExhausted);
        }

        TravelOutcome::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(weapon: WeaponType, position: GridPos, aim: AimVector) -> Projectile {
        Projectile::new(
            ProjectileId::new(1),
            ProjectileOwner::Player(grid_strike_core::PlayerId::new(0)),
            weapon,
            position,
            aim,
            Duration::ZERO,
        )
    }

    fn advance_by(p: &mut Projectile, grid: &WallGrid, until: Duration) -> TravelOutcome {
        p.advance(until, grid)
    }

    #[test]
    fn straight_round_stops_at_a_wall() {
        let mut grid = WallGrid::new();
        grid.place_wall(GridPos::new(8, 5));
        let mut p = projectile(WeaponType::Rifle, GridPos::new(5, 5), AimVector::new(1, 0));
        let outcome = advance_by(&mut p, &grid, Duration::from_secs(10));
        assert_eq!(outcome, TravelOutcome::Removed(RemovalReason::WallHit));
        assert_eq!(p.position, GridPos::new(8, 5));
    }

    #[test]
    fn piercing_round_ignores_walls_and_leaves_the_grid() {
        let mut grid = WallGrid::new();
        grid.place_wall(GridPos::new(8, 5));
        let mut p = projectile(
            WeaponType::SniperRifle,
            GridPos::new(5, 5),
            AimVector::new(1, 0),
        );
        let outcome = advance_by(&mut p, &grid, Duration::from_secs(10));
        assert_eq!(outcome, TravelOutcome::Removed(RemovalReason::OutOfBounds));
    }

    #[test]
    fn boomerang_flips_at_max_range_and_returns_home() {
        let grid = WallGrid::new();
        let mut p = projectile(
            WeaponType::Boomerang,
            GridPos::new(5, 5),
            AimVector::new(1, 0),
        );
        let period = p.spec.travel_period;

        // Outward leg: four cells, then the flip.
        let _ = advance_by(&mut p, &grid, period * 4);
        assert!(p.has_returned);
        assert_eq!(p.position, GridPos::new(9, 5));
        assert_eq!(p.aim, AimVector::new(-1, 0));

        // Return leg ends within one cell of the launch position.
        let outcome = advance_by(&mut p, &grid, period * 7);
        assert_eq!(outcome, TravelOutcome::Removed(RemovalReason::Returned));
        assert_eq!(p.position, GridPos::new(6, 5));
    }

    #[test]
    fn flame_cone_burns_through_cover_and_expires_by_distance() {
        let mut grid = WallGrid::new();
        // A wall directly in front of the nozzle does not snuff the cone.
        grid.place_wall(GridPos::new(6, 5));
        let mut p = projectile(
            WeaponType::Flamethrower,
            GridPos::new(5, 5),
            AimVector::new(1, 0),
        );
        let period = p.spec.travel_period;

        // The burn holds its cell at exactly max range.
        assert_eq!(advance_by(&mut p, &grid, period * 3), TravelOutcome::Flying);
        assert_eq!(p.position, GridPos::new(8, 5));

        let outcome = advance_by(&mut p, &grid, period * 4);
        assert_eq!(outcome, TravelOutcome::Removed(RemovalReason::RangeExhausted));
        assert_eq!(p.position, GridPos::new(9, 5));
    }

    #[test]
    fn grenade_arcs_over_cover_and_detonates_at_the_end() {
        let mut grid = WallGrid::new();
        // The wall sits on a mid-flight arc cell and is overflown anyway.
        grid.place_wall(GridPos::new(7, 3));
        let mut p = projectile(WeaponType::Grenade, GridPos::new(5, 5), AimVector::new(1, 0));
        let period = p.spec.travel_period;

        // The lob lifts off the firing row on its way up.
        assert_eq!(advance_by(&mut p, &grid, period), TravelOutcome::Flying);
        assert_eq!(p.position, GridPos::new(6, 3));
        assert_eq!(advance_by(&mut p, &grid, period * 2), TravelOutcome::Flying);
        assert_eq!(p.position, GridPos::new(7, 3));

        // It comes back down on the straight-line endpoint and bursts.
        let outcome = advance_by(&mut p, &grid, Duration::from_secs(10));
        assert_eq!(outcome, TravelOutcome::Removed(RemovalReason::Detonated));
        assert_eq!(p.position, GridPos::new(10, 5));
    }

    #[test]
    fn a_lobbed_arrow_lands_without_a_blast() {
        let grid = WallGrid::new();
        let mut p = projectile(WeaponType::Bow, GridPos::new(5, 9), AimVector::new(0, -1));
        let outcome = advance_by(&mut p, &grid, Duration::from_secs(10));
        assert_eq!(outcome, TravelOutcome::Removed(RemovalReason::RangeExhausted));
        assert_eq!(p.position, GridPos::new(5, 3));
    }

    #[test]
    fn melee_strike_holds_position_then_expires() {
        let grid = WallGrid::new();
        let mut p = projectile(WeaponType::Axe, GridPos::new(5, 5), AimVector::new(1, 0));
        assert_eq!(
            advance_by(&mut p, &grid, Duration::from_millis(150)),
            TravelOutcome::Flying
        );
        assert_eq!(p.position, GridPos::new(5, 5));
        assert_eq!(
            advance_by(&mut p, &grid, Duration::from_millis(200)),
            TravelOutcome::Removed(RemovalReason::MeleeExpired)
        );
    }
}
