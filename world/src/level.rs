//! Level validation and the storage port used by adapters.
//!
//! Validation returns the full list of problems instead of failing on the
//! first one, so editors can surface everything at once. A level with an
//! empty problem list is safe to instantiate.

use grid_strike_core::{GridPos, LevelData, EXIT_ROW, GRID_COLUMNS, GRID_ROWS};
use thiserror::Error;

fn in_bounds(cell: GridPos) -> bool {
    cell.x() >= 0 && cell.x() < GRID_COLUMNS && cell.y() >= 0 && cell.y() < GRID_ROWS
}

/// Checks an authored level and reports every problem found.
#[must_use]
pub fn validate(level: &LevelData) -> Vec<String> {
    let mut problems = Vec::new();

    if level.metadata.name.trim().is_empty() {
        problems.push("level name must not be empty".to_owned());
    }
    if let Some(limit) = level.metadata.time_limit_seconds {
        if limit == 0 {
            problems.push("time limit must be at least one second".to_owned());
        }
    }

    if !in_bounds(level.player_start) {
        problems.push(format!(
            "player start {:?} is outside the {}x{} grid",
            level.player_start, GRID_COLUMNS, GRID_ROWS
        ));
    }

    let mut wall_cells = Vec::new();
    for wall in &level.walls {
        if !in_bounds(wall.position) {
            problems.push(format!("wall at {:?} is out of bounds", wall.position));
            continue;
        }
        if wall_cells.contains(&wall.position) {
            problems.push(format!("duplicate wall at {:?}", wall.position));
        } else {
            wall_cells.push(wall.position);
        }
    }

    if wall_cells.contains(&level.player_start) {
        problems.push("player start sits on a wall".to_owned());
    }

    for enemy in &level.enemies {
        if !in_bounds(enemy.position) {
            problems.push(format!("enemy at {:?} is out of bounds", enemy.position));
        } else if wall_cells.contains(&enemy.position) {
            problems.push(format!("enemy at {:?} sits on a wall", enemy.position));
        }
        if enemy.config.patrol_radius == Some(0) {
            problems.push(format!(
                "enemy at {:?} has a zero patrol radius",
                enemy.position
            ));
        }
    }

    for collectible in &level.collectibles {
        if !in_bounds(collectible.position) {
            problems.push(format!(
                "collectible at {:?} is out of bounds",
                collectible.position
            ));
        } else if wall_cells.contains(&collectible.position) {
            problems.push(format!(
                "collectible at {:?} sits on a wall",
                collectible.position
            ));
        }
    }

    for power_up in &level.power_ups {
        if !in_bounds(power_up.position) {
            problems.push(format!(
                "power-up at {:?} is out of bounds",
                power_up.position
            ));
        } else if wall_cells.contains(&power_up.position) {
            problems.push(format!("power-up at {:?} sits on a wall", power_up.position));
        }
    }

    for captive in &level.captives {
        if !in_bounds(captive.position) {
            problems.push(format!("captive at {:?} is out of bounds", captive.position));
        } else if wall_cells.contains(&captive.position) {
            problems.push(format!("captive at {:?} sits on a wall", captive.position));
        }
        if captive.rescue_radius == 0 {
            problems.push(format!(
                "captive at {:?} has a zero rescue radius",
                captive.position
            ));
        }
    }

    if level.exit_zones.is_empty() {
        // Victory is unreachable without somewhere to escape to.
        problems.push("level has no exit zones".to_owned());
    }

    for exit in &level.exit_zones {
        // Escape happens by stepping from the top playable row onto the
        // boundary row above it, so exits only make sense on row zero.
        if exit.position.y() != EXIT_ROW + 1 {
            problems.push(format!(
                "exit zone at {:?} must sit on the top playable row",
                exit.position
            ));
        } else if !in_bounds(exit.position) {
            problems.push(format!(
                "exit zone at {:?} is out of bounds",
                exit.position
            ));
        } else if wall_cells.contains(&exit.position) {
            problems.push(format!("exit zone at {:?} sits on a wall", exit.position));
        }
    }

    problems
}

/// Failures surfaced by a level storage backend.
#[derive(Debug, Error)]
pub enum LevelStoreError {
    /// No level with the requested name exists in the store.
    #[error("no level named {name:?}")]
    NotFound {
        /// Name that was requested.
        name: String,
    },
    /// The stored content could not be decoded into a level.
    #[error("stored level {name:?} is malformed: {reason}")]
    Malformed {
        /// Name of the offending level.
        name: String,
        /// Decoder diagnostic.
        reason: String,
    },
    /// The backing medium failed.
    #[error("level store backend failed: {0}")]
    Backend(String),
}

/// Port through which adapters persist and retrieve authored levels.
pub trait LevelStore {
    /// Loads the level stored under `name`.
    fn load(&self, name: &str) -> Result<LevelData, LevelStoreError>;

    /// Stores `level` under `name`, replacing any previous content.
    fn save(&mut self, name: &str, level: &LevelData) -> Result<(), LevelStoreError>;

    /// Lists the names of every stored level.
    fn list(&self) -> Result<Vec<String>, LevelStoreError>;

    /// Deletes the level stored under `name`.
    fn delete(&mut self, name: &str) -> Result<(), LevelStoreError>;
}
