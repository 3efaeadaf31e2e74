#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Strike engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod level;

pub use level::{EditorObject, EditorObjectId, LevelData};

/// Number of tile columns in the standard arena (800 px / 32 px cells).
pub const GRID_COLUMNS: i32 = 25;
/// Number of tile rows in the standard arena (600 px / 32 px cells).
pub const GRID_ROWS: i32 = 18;
/// The only legal out-of-bounds row: players escape through the top edge.
pub const EXIT_ROW: i32 = -1;

/// Duration a hit flash stays lit on a damaged actor.
pub const HIT_FLASH_DURATION: Duration = Duration::from_millis(200);
/// Delay between an enemy's logical destruction and its removal.
pub const DESTROY_FADE_DURATION: Duration = Duration::from_millis(500);
/// Lifetime of a melee strike projectile.
pub const MELEE_LIFETIME: Duration = Duration::from_millis(200);
/// Interval of the captive blink toggle (visual only).
pub const CAPTIVE_BLINK_INTERVAL: Duration = Duration::from_millis(400);
/// Time limit applied when a level's metadata does not override it.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);
/// Damage inflicted by direct enemy contact, once per tick while it persists.
pub const CONTACT_DAMAGE: u32 = 1;

/// Score awarded for destroying an enemy.
pub const SCORE_ENEMY_DESTROYED: u32 = 100;
/// Score awarded for collecting a hero pickup.
pub const SCORE_HERO_COLLECTED: u32 = 150;
/// Score awarded for rescuing a captive.
pub const SCORE_CAPTIVE_RESCUED: u32 = 250;
/// Score awarded for collecting a power-up.
pub const SCORE_POWER_UP: u32 = 50;

/// Location of a single grid cell expressed as signed column/row coordinates.
///
/// Coordinates are signed because the exit boundary lives at row
/// [`EXIT_ROW`], one cell above the playable lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell reached by applying the provided aim vector once.
    #[must_use]
    pub const fn offset(self, aim: AimVector) -> Self {
        Self {
            x: self.x + aim.dx() as i32,
            y: self.y + aim.dy() as i32,
        }
    }

    /// Returns the neighboring cell in the provided cardinal direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        Self {
            x: self.x + direction.dx(),
            y: self.y + direction.dy(),
        }
    }

    /// Euclidean distance between two cells, used for radius checks.
    #[must_use]
    pub fn distance(self, other: GridPos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Greedy single step toward `target`: whichever axis has the larger
    /// absolute delta wins, ties go to the vertical axis. Returns `None`
    /// when already at the target.
    #[must_use]
    pub const fn step_toward(self, target: GridPos) -> Option<Direction> {
        let dx = target.x - self.x;
        let dy = target.y - self.y;

        if dx.abs() > dy.abs() {
            Some(if dx > 0 {
                Direction::East
            } else {
                Direction::West
            })
        } else if dy != 0 {
            Some(if dy > 0 {
                Direction::South
            } else {
                Direction::North
            })
        } else if dx != 0 {
            Some(if dx > 0 {
                Direction::East
            } else {
                Direction::West
            })
        } else {
            None
        }
    }

    /// Per-axis sign direction toward `target`, the aiming rule used when
    /// spawning projectiles at a sighted player.
    #[must_use]
    pub const fn aim_toward(self, target: GridPos) -> AimVector {
        AimVector::new(
            (target.x - self.x).signum() as i8,
            (target.y - self.y).signum() as i8,
        )
    }
}

/// Cardinal movement directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Column delta of a single step in this direction.
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Self::East => 1,
            Self::West => -1,
            Self::North | Self::South => 0,
        }
    }

    /// Row delta of a single step in this direction.
    #[must_use]
    pub const fn dy(self) -> i32 {
        match self {
            Self::South => 1,
            Self::North => -1,
            Self::East | Self::West => 0,
        }
    }

    /// The aim vector equivalent of this cardinal direction.
    #[must_use]
    pub const fn aim(self) -> AimVector {
        AimVector::new(self.dx() as i8, self.dy() as i8)
    }
}

/// Unit-ish travel vector with components in `{-1, 0, 1}`.
///
/// Used for shooting and projectile travel, where eight directions are
/// permitted, unlike grid movement which is strictly cardinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AimVector {
    dx: i8,
    dy: i8,
}

impl AimVector {
    /// Creates a new aim vector from per-axis signs.
    #[must_use]
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the vector.
    #[must_use]
    pub const fn dx(&self) -> i8 {
        self.dx
    }

    /// Vertical component of the vector.
    #[must_use]
    pub const fn dy(&self) -> i8 {
        self.dy
    }

    /// Reports whether the vector has no direction at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Negation of both components, used when a boomerang turns around.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    /// Collapses a possibly diagonal vector onto its dominant axis, the
    /// normalization applied to held-key movement input. Vertical wins ties.
    #[must_use]
    pub const fn dominant_direction(self) -> Option<Direction> {
        if self.dx.abs() > self.dy.abs() {
            Some(if self.dx > 0 {
                Direction::East
            } else {
                Direction::West
            })
        } else if self.dy != 0 {
            Some(if self.dy > 0 {
                Direction::South
            } else {
                Direction::North
            })
        } else if self.dx != 0 {
            Some(if self.dx > 0 {
                Direction::East
            } else {
                Direction::West
            })
        } else {
            None
        }
    }
}

/// Bounded hit-point counter that floors at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a health value with the provided hit points.
    #[must_use]
    pub const fn new(points: u32) -> Self {
        Self(points)
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Applies damage, saturating at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
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
    };
}

id_newtype!(
    /// Unique identifier assigned to a controlled player.
    PlayerId
);
id_newtype!(
    /// Unique identifier assigned to an enemy.
    EnemyId
);
id_newtype!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);
id_newtype!(
    /// Unique identifier assigned to a collectible hero pickup.
    CollectibleId
);
id_newtype!(
    /// Unique identifier assigned to a power-up pickup.
    PowerUpId
);
id_newtype!(
    /// Unique identifier assigned to a captive awaiting rescue.
    CaptiveId
);

/// Playable hero classes; each defines health, movement cadence and weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroClass {
    /// Balanced rifleman.
    Vanguard,
    /// Durable close-quarters fighter with a spear.
    Lancer,
    /// Scout whose boomerang comes back.
    Tracker,
    /// Slow demolitionist lobbing grenades in an arc.
    Grenadier,
    /// Area-denial specialist with a short flame cone.
    Pyro,
    /// Fragile long-range shooter whose rounds pierce walls.
    Marksman,
    /// Fast skirmisher throwing penetrating stars.
    Shadow,
    /// Caster whose bolts pass through cover.
    Arcanist,
    /// Heavy melee bruiser with an axe.
    Berserker,
    /// Archer firing arcing arrows.
    Archer,
}

impl HeroClass {
    /// Maximum health for heroes of this class.
    #[must_use]
    pub const fn max_health(self) -> Health {
        Health::new(match self {
            Self::Vanguard | Self::Tracker | Self::Grenadier | Self::Archer => 3,
            Self::Lancer | Self::Pyro => 4,
            Self::Marksman | Self::Shadow | Self::Arcanist => 2,
            Self::Berserker => 5,
        })
    }

    /// Minimum interval between two accepted moves.
    #[must_use]
    pub const fn move_period(self) -> Duration {
        Duration::from_millis(match self {
            Self::Shadow => 400,
            Self::Lancer | Self::Archer => 450,
            Self::Vanguard | Self::Tracker | Self::Arcanist | Self::Berserker => 500,
            Self::Pyro | Self::Marksman => 550,
            Self::Grenadier => 600,
        })
    }

    /// Weapon wielded by heroes of this class.
    #[must_use]
    pub const fn weapon(self) -> WeaponType {
        match self {
            Self::Vanguard => WeaponType::Rifle,
            Self::Lancer => WeaponType::Spear,
            Self::Tracker => WeaponType::Boomerang,
            Self::Grenadier => WeaponType::Grenade,
            Self::Pyro => WeaponType::Flamethrower,
            Self::Marksman => WeaponType::SniperRifle,
            Self::Shadow => WeaponType::ThrowingStar,
            Self::Arcanist => WeaponType::MagicBolt,
            Self::Berserker => WeaponType::Axe,
            Self::Archer => WeaponType::Bow,
        }
    }
}

/// Weapon families available to heroes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    /// Straight-flying default round.
    Rifle,
    /// Instantaneous melee thrust.
    Spear,
    /// Returning throw that flips direction at max range.
    Boomerang,
    /// Parabolic lob that detonates at the end of its arc.
    Grenade,
    /// Short persistent cone of flame.
    Flamethrower,
    /// Long-range round that ignores walls.
    SniperRifle,
    /// Fast star that passes through multiple enemies.
    ThrowingStar,
    /// Arcane bolt that passes through cover.
    MagicBolt,
    /// Heavy melee swing.
    Axe,
    /// Arrow fired on a shallow arc.
    Bow,
}

/// Static behavior table resolved for a projectile at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponSpec {
    /// Damage applied per hit.
    pub damage: u32,
    /// Minimum interval between two shots.
    pub cooldown: Duration,
    /// Maximum travel distance in cells.
    pub range: u32,
    /// Minimum interval between two single-cell advances.
    pub travel_period: Duration,
    /// Passes through enemies without being consumed on first hit.
    pub penetration: bool,
    /// Flips direction at max range and flies back to its start.
    pub returning: bool,
    /// Persistent cone: never consumed by hits, expires past its range.
    pub continuous: bool,
    /// Ignores wall occupancy; only grid bounds remove it.
    pub pierce_walls: bool,
    /// Instantaneous strike with a short visual lifetime.
    pub melee: bool,
    /// Follows a precomputed arc instead of straight-line travel.
    pub parabolic: bool,
    /// Radius of the detonation scheduled when a parabolic arc ends.
    pub blast_radius: u32,
}

impl WeaponType {
    /// Resolves the static behavior table for this weapon.
    #[must_use]
    pub const fn spec(self) -> WeaponSpec {
        const NONE: WeaponSpec = WeaponSpec {
            damage: 1,
            cooldown: Duration::from_millis(300),
            range: 15,
            travel_period: Duration::from_millis(200),
            penetration: false,
            returning: false,
            continuous: false,
            pierce_walls: false,
            melee: false,
            parabolic: false,
            blast_radius: 0,
        };

        match self {
            Self::Rifle => NONE,
            Self::Spear => WeaponSpec {
                damage: 2,
                cooldown: Duration::from_millis(500),
                range: 1,
                travel_period: Duration::from_millis(100),
                melee: true,
                ..NONE
            },
            Self::Boomerang => WeaponSpec {
                damage: 1,
                cooldown: Duration::from_millis(800),
                range: 4,
                travel_period: Duration::from_millis(250),
                returning: true,
                ..NONE
            },
            Self::Grenade => WeaponSpec {
                damage: 2,
                cooldown: Duration::from_millis(1000),
                range: 5,
                travel_period: Duration::from_millis(300),
                parabolic: true,
                blast_radius: 1,
                ..NONE
            },
            Self::Flamethrower => WeaponSpec {
                damage: 1,
                cooldown: Duration::from_millis(600),
                range: 3,
                travel_period: Duration::from_millis(100),
                continuous: true,
                ..NONE
            },
            Self::SniperRifle => WeaponSpec {
                damage: 3,
                cooldown: Duration::from_millis(1200),
                range: 25,
                travel_period: Duration::from_millis(100),
                pierce_walls: true,
                ..NONE
            },
            Self::ThrowingStar => WeaponSpec {
                damage: 1,
                cooldown: Duration::from_millis(400),
                range: 8,
                travel_period: Duration::from_millis(150),
                penetration: true,
                ..NONE
            },
            Self::MagicBolt => WeaponSpec {
                damage: 2,
                cooldown: Duration::from_millis(700),
                range: 10,
                travel_period: Duration::from_millis(200),
                pierce_walls: true,
                ..NONE
            },
            Self::Axe => WeaponSpec {
                damage: 3,
                cooldown: Duration::from_millis(700),
                range: 1,
                travel_period: Duration::from_millis(100),
                melee: true,
                ..NONE
            },
            Self::Bow => WeaponSpec {
                damage: 1,
                cooldown: Duration::from_millis(500),
                range: 6,
                travel_period: Duration::from_millis(150),
                parabolic: true,
                ..NONE
            },
        }
    }
}

/// Enemy archetypes; each defines health, cadence and engagement stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyClass {
    /// Basic patroller.
    Guard,
    /// Fast, fragile hunter that keeps chasing once provoked.
    Stalker,
    /// Tough stationary defender.
    Sentinel,
    /// Wide-ranging patroller.
    Raider,
    /// Cautious skirmisher that gives ground while shooting.
    Warden,
}

/// Static stat block for an enemy class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStats {
    /// Maximum health for the class.
    pub max_health: Health,
    /// Minimum interval between two accepted steps.
    pub move_period: Duration,
    /// Minimum interval between two shots.
    pub shoot_cooldown: Duration,
    /// Maximum shooting distance in cells.
    pub shoot_range: u32,
    /// Chase-trigger distance from the patrol anchor.
    pub default_patrol_radius: u32,
    /// Behavior branch evaluated by the AI when the level does not override.
    pub default_behavior: BehaviorPattern,
}

impl EnemyClass {
    /// Resolves the static stat block for this class.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Guard => EnemyStats {
                max_health: Health::new(2),
                move_period: Duration::from_millis(800),
                shoot_cooldown: Duration::from_millis(1000),
                shoot_range: 5,
                default_patrol_radius: 3,
                default_behavior: BehaviorPattern::Patrol,
            },
            Self::Stalker => EnemyStats {
                max_health: Health::new(1),
                move_period: Duration::from_millis(600),
                shoot_cooldown: Duration::from_millis(800),
                shoot_range: 4,
                default_patrol_radius: 4,
                default_behavior: BehaviorPattern::Aggressive,
            },
            Self::Sentinel => EnemyStats {
                max_health: Health::new(3),
                move_period: Duration::from_millis(1000),
                shoot_cooldown: Duration::from_millis(1200),
                shoot_range: 6,
                default_patrol_radius: 2,
                default_behavior: BehaviorPattern::Guard,
            },
            Self::Raider => EnemyStats {
                max_health: Health::new(2),
                move_period: Duration::from_millis(700),
                shoot_cooldown: Duration::from_millis(900),
                shoot_range: 5,
                default_patrol_radius: 5,
                default_behavior: BehaviorPattern::Patrol,
            },
            Self::Warden => EnemyStats {
                max_health: Health::new(3),
                move_period: Duration::from_millis(900),
                shoot_cooldown: Duration::from_millis(1000),
                shoot_range: 5,
                default_patrol_radius: 3,
                default_behavior: BehaviorPattern::Defensive,
            },
        }
    }
}

/// AI branch evaluated for an enemy each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorPattern {
    /// Chase inside the patrol radius, return to the anchor outside it.
    Patrol,
    /// Hold the anchor cell; shoot but never move.
    Guard,
    /// Once triggered, keep chasing until twice the patrol radius.
    Aggressive,
    /// Give ground toward the anchor while threatened, shooting throughout.
    Defensive,
}

/// Timed buffs granted by power-up pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Halves the collecting party's move period.
    SpeedBoost,
    /// Halves the collecting party's shoot period.
    RapidFire,
    /// Blocks projectile damage to players.
    Shield,
}

impl PowerUpKind {
    /// Duration the buff stays active after collection.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::SpeedBoost => Duration::from_secs(8),
            Self::RapidFire => Duration::from_secs(6),
            Self::Shield => Duration::from_secs(5),
        }
    }
}

/// Lifecycle states of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The simulation is advancing.
    Playing,
    /// Timer expired or every controlled character fell.
    GameOver,
    /// Enemies cleared, captives rescued, everyone on an exit.
    Victory,
    /// Enemies cleared but captives or exits remain outstanding.
    LevelComplete,
    /// Orthogonal paused state used while editing or awaiting a valid level.
    Paused,
}

impl GameStatus {
    /// Reports whether the status is sticky: only a reset leaves it.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory | Self::LevelComplete)
    }
}

/// Countdown thresholds that fire a one-shot timer alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerThreshold {
    /// One minute remaining.
    At60s,
    /// Thirty seconds remaining.
    At30s,
    /// Ten seconds remaining.
    At10s,
}

impl TimerThreshold {
    /// Seconds remaining when this alert fires.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        match self {
            Self::At60s => 60,
            Self::At30s => 30,
            Self::At10s => 10,
        }
    }
}

/// Attribution of a projectile, used for friendly-fire exclusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    /// Fired by a controlled player.
    Player(PlayerId),
    /// Fired by an enemy.
    Enemy(EnemyId),
}

/// Reasons the world removed a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// Left the grid bounds.
    OutOfBounds,
    /// Entered a wall cell without the pierce flag.
    WallHit,
    /// Travelled its configured maximum range.
    RangeExhausted,
    /// Melee strike lifetime elapsed.
    MeleeExpired,
    /// Boomerang came back to within one cell of its origin.
    Returned,
    /// Parabolic arc ended and the payload detonated.
    Detonated,
    /// Consumed by striking a target.
    Consumed,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Validates and installs a level, replacing all placed entities.
    LoadLevel {
        /// Authored level content to instantiate.
        level: LevelData,
    },
    /// Creates the controlled party and transitions into play.
    StartGame {
        /// Hero classes of the controlled characters, in join order.
        roster: Vec<HeroClass>,
    },
    /// Discards the session back to the freshly-loaded level shape.
    Reset,
    /// Toggles the orthogonal paused state used by the editor.
    SetPaused {
        /// Whether the simulation should hold.
        paused: bool,
    },
    /// Advances the simulation clock and everything time-driven.
    Tick {
        /// Simulated time elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a single-cell player move in a cardinal direction.
    MovePlayer {
        /// Identifier of the moving player.
        player: PlayerId,
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests a shot from a player's configured weapon.
    PlayerShoot {
        /// Identifier of the shooting player.
        player: PlayerId,
        /// Travel vector of the shot; components in `{-1, 0, 1}`.
        aim: AimVector,
    },
    /// Requests a single-cell enemy step chosen by the AI system.
    StepEnemy {
        /// Identifier of the moving enemy.
        enemy: EnemyId,
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests an enemy shot at a sighted player's current cell.
    EnemyShoot {
        /// Identifier of the shooting enemy.
        enemy: EnemyId,
        /// Cell the shot is aimed at.
        target: GridPos,
    },
    /// Applies a combat-system effect batch in one pass.
    ApplyEffects {
        /// Ordered effects computed against the frozen tick snapshot.
        effects: Vec<CombatEffect>,
    },
    /// Runs the status state machine against the post-collision state.
    ResolveStatus,
    /// Adds an authored object to the editor workspace.
    PlaceEditorObject {
        /// Object to place.
        object: EditorObject,
    },
    /// Removes an authored object from the editor workspace.
    RemoveEditorObject {
        /// Identifier of the object to remove.
        id: EditorObjectId,
    },
    /// Replaces an authored object's configuration after a config exchange.
    UpdateEditorObject {
        /// Identifier of the object to update.
        id: EditorObjectId,
        /// Replacement object carrying the confirmed configuration.
        object: EditorObject,
    },
    /// Asks the world to publish an object's configuration for editing.
    RequestObjectConfig {
        /// Identifier of the object whose config is requested.
        id: EditorObjectId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level validated and was instantiated.
    LevelLoaded,
    /// Reports that a level failed validation and was not instantiated.
    LevelRejected {
        /// Human-readable reasons the level was refused.
        reasons: Vec<String>,
    },
    /// Confirms that the controlled party was created and play began.
    GameStarted,
    /// Announces a game-status transition.
    StatusChanged {
        /// Status that became active.
        status: GameStatus,
    },
    /// Confirms that a player moved between two cells.
    PlayerMoved {
        /// Identifier of the player that moved.
        player: PlayerId,
        /// Cell occupied before the move.
        from: GridPos,
        /// Cell occupied after the move.
        to: GridPos,
    },
    /// Confirms that a player crossed the exit boundary row.
    PlayerExited {
        /// Identifier of the escaping player.
        player: PlayerId,
        /// Exit-row cell the player reached.
        at: GridPos,
    },
    /// Reports damage applied to a player.
    PlayerDamaged {
        /// Identifier of the damaged player.
        player: PlayerId,
        /// Hit points removed this application.
        amount: u32,
        /// Health remaining afterward.
        remaining: Health,
    },
    /// Reports that a player's health reached zero.
    PlayerDefeated {
        /// Identifier of the defeated player.
        player: PlayerId,
    },
    /// Confirms that a projectile entered the world.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Attribution for friendly-fire exclusion.
        owner: ProjectileOwner,
        /// Weapon family the projectile belongs to.
        weapon: WeaponType,
        /// Cell the projectile started in.
        at: GridPos,
    },
    /// Confirms that a projectile left the world.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
        /// Why the world removed it.
        reason: RemovalReason,
    },
    /// Confirms that an enemy stepped between two cells.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Cell occupied before the step.
        from: GridPos,
        /// Cell occupied after the step.
        to: GridPos,
    },
    /// Reports damage applied to an enemy.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Player credited with the damage, if any.
        by: Option<PlayerId>,
        /// Hit points removed this application.
        amount: u32,
        /// Health remaining afterward.
        remaining: Health,
    },
    /// Reports that an enemy's health reached zero and its fade began.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Player credited with the destruction, if any.
        by: Option<PlayerId>,
    },
    /// Reports that a destroyed enemy's fade window elapsed.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Confirms that a hero pickup joined the party.
    HeroCollected {
        /// Identifier of the consumed pickup.
        collectible: CollectibleId,
        /// Player that collected it.
        by: PlayerId,
        /// Hero class that joined the party roster.
        hero: HeroClass,
    },
    /// Confirms that a power-up was collected and its buff started.
    PowerUpActivated {
        /// Identifier of the consumed pickup.
        power_up: PowerUpId,
        /// Player that collected it.
        by: PlayerId,
        /// Buff that became active.
        kind: PowerUpKind,
    },
    /// Reports that a timed buff ran out.
    PowerUpExpired {
        /// Buff that ended.
        kind: PowerUpKind,
    },
    /// Confirms that a captive was rescued and joined as a new player.
    CaptiveRescued {
        /// Identifier of the rescued captive.
        captive: CaptiveId,
        /// Player whose proximity triggered the rescue.
        by: PlayerId,
        /// Hero class of the freed ally.
        hero: HeroClass,
        /// Identifier assigned to the new party member.
        joined: PlayerId,
    },
    /// Announces the new score after an award.
    ScoreChanged {
        /// Total score after the change.
        score: u32,
    },
    /// Fires once when the countdown crosses an alert threshold.
    TimerAlert {
        /// Threshold that was crossed.
        threshold: TimerThreshold,
    },
    /// Publishes an editor object's configuration for out-of-band editing.
    ObjectConfigRequested {
        /// Identifier of the object being edited.
        id: EditorObjectId,
        /// Current object content, including its configuration.
        object: EditorObject,
    },
    /// Confirms that an editor object was placed.
    EditorObjectPlaced {
        /// Identifier assigned to the placed object.
        id: EditorObjectId,
    },
    /// Confirms that an editor object's configuration was replaced.
    EditorObjectUpdated {
        /// Identifier of the updated object.
        id: EditorObjectId,
    },
    /// Confirms that an editor object was removed.
    EditorObjectRemoved {
        /// Identifier of the removed object.
        id: EditorObjectId,
    },
}

/// Two-phase collision currency: the combat system computes an ordered batch
/// of effects against frozen positions, and the world applies them in one
/// pass. Applying an effect twice is harmless by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatEffect {
    /// Removes hit points from a player.
    DamagePlayer {
        /// Identifier of the player to damage.
        player: PlayerId,
        /// Hit points to remove.
        amount: u32,
    },
    /// Removes hit points from an enemy.
    DamageEnemy {
        /// Identifier of the enemy to damage.
        enemy: EnemyId,
        /// Hit points to remove.
        amount: u32,
        /// Player credited with the damage, if any.
        by: Option<PlayerId>,
    },
    /// Consumes a projectile that struck a target.
    RemoveProjectile {
        /// Identifier of the projectile to consume.
        projectile: ProjectileId,
    },
    /// Records that a penetrating projectile already damaged an enemy.
    MarkPenetrated {
        /// Identifier of the penetrating projectile.
        projectile: ProjectileId,
        /// Enemy that must not be damaged again by the same pass.
        enemy: EnemyId,
    },
    /// Consumes a hero pickup and adds its hero to the party roster.
    CollectHero {
        /// Identifier of the pickup.
        collectible: CollectibleId,
        /// Player standing on the pickup cell.
        by: PlayerId,
    },
    /// Consumes a power-up pickup and starts its timed buff.
    CollectPowerUp {
        /// Identifier of the pickup.
        power_up: PowerUpId,
        /// Player standing on the pickup cell.
        by: PlayerId,
    },
    /// Frees a captive and converts it into a controlled party member.
    RescueCaptive {
        /// Identifier of the captive.
        captive: CaptiveId,
        /// Player whose proximity triggered the rescue.
        by: PlayerId,
    },
}

/// Immutable representation of a single player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Unique identifier assigned to the player.
    pub id: PlayerId,
    /// Grid cell currently occupied by the player.
    pub position: GridPos,
    /// Hero class driving periods, weapon and max health.
    pub hero: HeroClass,
    /// Current health.
    pub health: Health,
    /// Health ceiling.
    pub max_health: Health,
    /// Whether the hit flash is currently lit.
    pub is_hit: bool,
    /// Whether the player still has hit points.
    pub is_alive: bool,
    /// Whether the player stands on an exit cell or the exit row.
    pub at_exit: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Grid cell currently occupied by the enemy.
    pub position: GridPos,
    /// Patrol anchor the enemy returns to.
    pub anchor: GridPos,
    /// Chase-trigger distance from the anchor.
    pub patrol_radius: u32,
    /// Archetype driving the stat block.
    pub class: EnemyClass,
    /// AI branch evaluated for this enemy.
    pub behavior: BehaviorPattern,
    /// Current health.
    pub health: Health,
    /// Whether the enemy was chasing on the previous AI evaluation.
    pub is_chasing: bool,
    /// Whether the hit flash is currently lit.
    pub is_hit: bool,
    /// Whether the enemy is destroyed and fading out.
    pub is_destroyed: bool,
    /// Time remaining until the enemy may step again.
    pub move_ready_in: Duration,
    /// Time remaining until the enemy may shoot again.
    pub shoot_ready_in: Duration,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Grid cell currently occupied by the projectile.
    pub position: GridPos,
    /// Travel vector.
    pub aim: AimVector,
    /// Attribution for friendly-fire exclusion.
    pub owner: ProjectileOwner,
    /// Weapon family the projectile belongs to.
    pub weapon: WeaponType,
    /// Damage applied per hit.
    pub damage: u32,
    /// Cell the projectile started in.
    pub start: GridPos,
    /// Whether a returning projectile has already turned around.
    pub has_returned: bool,
    /// Enemies a penetrating projectile has already damaged.
    pub penetrated: Vec<EnemyId>,
}

/// Immutable representation of a hero pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectibleSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: CollectibleId,
    /// Grid cell the pickup rests on.
    pub position: GridPos,
    /// Hero class granted on collection.
    pub hero: HeroClass,
    /// Whether the pickup was already consumed.
    pub collected: bool,
}

/// Immutable representation of a power-up pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUpSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PowerUpId,
    /// Grid cell the pickup rests on.
    pub position: GridPos,
    /// Buff granted on collection.
    pub kind: PowerUpKind,
    /// Whether the pickup was already consumed.
    pub collected: bool,
}

/// Immutable representation of a captive used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptiveSnapshot {
    /// Unique identifier assigned to the captive.
    pub id: CaptiveId,
    /// Grid cell the captive waits on.
    pub position: GridPos,
    /// Hero class of the ally once freed.
    pub hero: HeroClass,
    /// Distance within which any player triggers the rescue.
    pub rescue_radius: u32,
    /// Current state of the visual blink toggle.
    pub blink_on: bool,
}

/// Detonation scheduled by a parabolic projectile reaching the end of its
/// arc; resolved by the combat system on the same tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlastSnapshot {
    /// Center cell of the detonation.
    pub center: GridPos,
    /// Radius of the affected area in cells.
    pub radius: u32,
    /// Damage applied to every actor inside the radius.
    pub damage: u32,
    /// Player credited with the blast, if any.
    pub by: Option<PlayerId>,
}

macro_rules! snapshot_view {
    ($(#[$doc:meta])* $view:ident, $snapshot:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default)]
        pub struct $view {
            snapshots: Vec<$snapshot>,
        }

        impl $view {
            /// Creates a view from snapshots, sorted into deterministic order.
            #[must_use]
            pub fn from_snapshots(mut snapshots: Vec<$snapshot>) -> Self {
                snapshots.sort_by_key(|snapshot| snapshot.id);
                Self { snapshots }
            }

            /// Iterator over the captured snapshots in deterministic order.
            pub fn iter(&self) -> impl Iterator<Item = &$snapshot> {
                self.snapshots.iter()
            }

            /// Number of captured snapshots.
            #[must_use]
            pub fn len(&self) -> usize {
                self.snapshots.len()
            }

            /// Reports whether the view captured nothing.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.snapshots.is_empty()
            }

            /// Consumes the view, yielding the underlying snapshots.
            #[must_use]
            pub fn into_vec(self) -> Vec<$snapshot> {
                self.snapshots
            }
        }
    };
}

snapshot_view!(
    /// Read-only snapshot describing all controlled players.
    PlayerView,
    PlayerSnapshot
);
snapshot_view!(
    /// Read-only snapshot describing all enemies, including fading ones.
    EnemyView,
    EnemySnapshot
);
snapshot_view!(
    /// Read-only snapshot describing all live projectiles.
    ProjectileView,
    ProjectileSnapshot
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn step_toward_prefers_dominant_axis() {
        let from = GridPos::new(5, 5);
        assert_eq!(from.step_toward(GridPos::new(9, 7)), Some(Direction::East));
        assert_eq!(from.step_toward(GridPos::new(6, 9)), Some(Direction::South));
        // Equal deltas tie-break onto the vertical axis.
        assert_eq!(from.step_toward(GridPos::new(8, 2)), Some(Direction::North));
        assert_eq!(from.step_toward(from), None);
    }

    #[test]
    fn aim_toward_yields_per_axis_signs() {
        let from = GridPos::new(3, 3);
        assert_eq!(from.aim_toward(GridPos::new(7, 1)), AimVector::new(1, -1));
        assert_eq!(from.aim_toward(GridPos::new(3, 9)), AimVector::new(0, 1));
        assert!(from.aim_toward(from).is_zero());
    }

    #[test]
    fn dominant_direction_normalizes_diagonals() {
        assert_eq!(
            AimVector::new(1, 1).dominant_direction(),
            Some(Direction::South)
        );
        assert_eq!(
            AimVector::new(-1, 0).dominant_direction(),
            Some(Direction::West)
        );
        assert_eq!(AimVector::new(0, 0).dominant_direction(), None);
    }

    #[test]
    fn health_floors_at_zero() {
        let health = Health::new(3);
        assert_eq!(health.damaged(5), Health::new(0));
        assert!(health.damaged(5).is_zero());
        assert_eq!(health.damaged(1), Health::new(2));
    }

    #[test]
    fn melee_weapons_carry_the_melee_flag_only() {
        for weapon in [WeaponType::Spear, WeaponType::Axe] {
            let spec = weapon.spec();
            assert!(spec.melee);
            assert_eq!(spec.range, 1);
            assert!(!spec.penetration && !spec.returning && !spec.parabolic);
        }
    }

    #[test]
    fn parabolic_weapons_have_arcs_and_only_grenades_detonate() {
        assert!(WeaponType::Grenade.spec().parabolic);
        assert!(WeaponType::Bow.spec().parabolic);
        assert_eq!(WeaponType::Grenade.spec().blast_radius, 1);
        assert_eq!(WeaponType::Bow.spec().blast_radius, 0);
    }

    #[test]
    fn every_hero_resolves_a_weapon_spec() {
        let heroes = [
            HeroClass::Vanguard,
            HeroClass::Lancer,
            HeroClass::Tracker,
            HeroClass::Grenadier,
            HeroClass::Pyro,
            HeroClass::Marksman,
            HeroClass::Shadow,
            HeroClass::Arcanist,
            HeroClass::Berserker,
            HeroClass::Archer,
        ];
        for hero in heroes {
            let spec = hero.weapon().spec();
            assert!(spec.damage > 0);
            assert!(!spec.cooldown.is_zero());
            assert!(hero.max_health().get() > 0);
        }
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_pos_round_trips_through_bincode() {
        assert_round_trip(&GridPos::new(-1, 17));
    }

    #[test]
    fn ids_round_trip_through_bincode() {
        assert_round_trip(&PlayerId::new(2));
        assert_round_trip(&EnemyId::new(7));
        assert_round_trip(&CaptiveId::new(42));
    }

    #[test]
    fn enums_round_trip_through_bincode() {
        assert_round_trip(&HeroClass::Marksman);
        assert_round_trip(&EnemyClass::Warden);
        assert_round_trip(&BehaviorPattern::Defensive);
        assert_round_trip(&PowerUpKind::Shield);
        assert_round_trip(&GameStatus::LevelComplete);
    }
}
