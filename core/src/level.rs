//! Authored level content: placements, editor objects and metadata.
//!
//! These are the serde-facing shapes shared by the world's validator, the
//! editor bridge and the CLI transfer codec. Every placement carries a typed
//! configuration; there is no untyped escape hatch.

use serde::{Deserialize, Serialize};

use crate::{BehaviorPattern, EnemyClass, GridPos, HeroClass, PowerUpKind};

/// Complete authored content of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Cell the first controlled player spawns in.
    pub player_start: GridPos,
    /// Enemy placements.
    #[serde(default)]
    pub enemies: Vec<EnemyPlacement>,
    /// Wall placements.
    #[serde(default)]
    pub walls: Vec<WallPlacement>,
    /// Hero pickup placements.
    #[serde(default)]
    pub collectibles: Vec<CollectiblePlacement>,
    /// Power-up pickup placements.
    #[serde(default)]
    pub power_ups: Vec<PowerUpPlacement>,
    /// Captive placements.
    #[serde(default)]
    pub captives: Vec<CaptivePlacement>,
    /// Exit zone placements on the top playable row.
    #[serde(default)]
    pub exit_zones: Vec<ExitZonePlacement>,
    /// Descriptive metadata.
    pub metadata: LevelMetadata,
}

/// An enemy authored into a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    /// Cell the enemy spawns in; doubles as its patrol anchor.
    pub position: GridPos,
    /// Behavior configuration.
    pub config: EnemyConfig,
}

/// Typed configuration of an authored enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Archetype driving the stat block.
    pub class: EnemyClass,
    /// Chase-trigger distance from the anchor; `None` uses the class default.
    #[serde(default)]
    pub patrol_radius: Option<u32>,
    /// AI branch; `None` uses the class default.
    #[serde(default)]
    pub behavior: Option<BehaviorPattern>,
}

impl EnemyConfig {
    /// Configuration carrying only a class, with all defaults deferred.
    #[must_use]
    pub const fn of_class(class: EnemyClass) -> Self {
        Self {
            class,
            patrol_radius: None,
            behavior: None,
        }
    }
}

/// A wall cell authored into a level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    /// Cell the wall occupies.
    pub position: GridPos,
}

/// A hero pickup authored into a level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectiblePlacement {
    /// Cell the pickup rests on.
    pub position: GridPos,
    /// Hero class granted on collection.
    pub hero: HeroClass,
}

/// A power-up pickup authored into a level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerUpPlacement {
    /// Cell the pickup rests on.
    pub position: GridPos,
    /// Buff granted on collection.
    pub kind: PowerUpKind,
}

/// A captive authored into a level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptivePlacement {
    /// Cell the captive waits on.
    pub position: GridPos,
    /// Hero class of the ally once freed.
    pub hero: HeroClass,
    /// Distance within which any player triggers the rescue.
    #[serde(default = "default_rescue_radius")]
    pub rescue_radius: u32,
}

const fn default_rescue_radius() -> u32 {
    1
}

/// An exit zone cell authored into a level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitZonePlacement {
    /// Cell the exit zone occupies; must sit on the top playable row.
    pub position: GridPos,
}

/// Difficulty label carried in level metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Forgiving layouts.
    Easy,
    /// Standard layouts.
    Medium,
    /// Punishing layouts.
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// Descriptive metadata attached to a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelMetadata {
    /// Display name.
    pub name: String,
    /// Author attribution.
    #[serde(default)]
    pub author: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Difficulty label.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Countdown override in seconds; `None` uses the engine default.
    #[serde(default)]
    pub time_limit_seconds: Option<u32>,
}

impl LevelMetadata {
    /// Metadata carrying only a name, with everything else defaulted.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: String::new(),
            description: String::new(),
            difficulty: Difficulty::default(),
            tags: Vec::new(),
            time_limit_seconds: None,
        }
    }
}

/// Identifier of an object inside the editor workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EditorObjectId(u32);

impl EditorObjectId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One placeable object in the editor workspace, tagged by kind so each
/// variant carries exactly the configuration its kind needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorObject {
    /// The single player spawn marker.
    PlayerStart {
        /// Cell the first player spawns in.
        position: GridPos,
    },
    /// An enemy with its typed configuration.
    Enemy(EnemyPlacement),
    /// A wall cell.
    Wall(WallPlacement),
    /// A hero pickup.
    Collectible(CollectiblePlacement),
    /// A power-up pickup.
    PowerUp(PowerUpPlacement),
    /// A captive.
    Captive(CaptivePlacement),
    /// An exit zone cell.
    Exit(ExitZonePlacement),
}

impl EditorObject {
    /// Cell the object occupies.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        match self {
            Self::PlayerStart { position } => *position,
            Self::Enemy(placement) => placement.position,
            Self::Wall(placement) => placement.position,
            Self::Collectible(placement) => placement.position,
            Self::PowerUp(placement) => placement.position,
            Self::Captive(placement) => placement.position,
            Self::Exit(placement) => placement.position,
        }
    }
}
