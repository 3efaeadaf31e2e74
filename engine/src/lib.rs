#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick orchestration.
//!
//! The engine owns the world and every system and advances them in a fixed
//! sequence each tick: drain buffered input, plan enemy actions, advance the
//! clock, resolve collisions, then run the status machine. Every stage talks
//! to the world exclusively through commands, so the full tick is a pure
//! function of the input stream and the tick durations. Feed two engines the
//! same actions and the same `dt` sequence and they produce identical
//! snapshots.

use std::time::Duration;

use grid_strike_core::{
    CaptiveSnapshot, CollectibleSnapshot, Command, EnemySnapshot, Event, GameStatus, HeroClass,
    LevelData, PlayerId, PlayerSnapshot, PowerUpKind, PowerUpSnapshot, ProjectileSnapshot,
};
use grid_strike_system_analytics::{Analytics, SessionReport};
use grid_strike_system_combat::{Combat, CombatInputs};
use grid_strike_system_enemy_ai::EnemyAi;
use grid_strike_system_input::Input;
use grid_strike_world::{apply, query, World};
use thiserror::Error;

/// Failures that stop the engine from advancing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The submitted level failed validation.
    #[error("level rejected: {}", reasons.join("; "))]
    LevelRejected {
        /// Validation problems, one per offense.
        reasons: Vec<String>,
    },
    /// A session operation arrived before a level was loaded.
    #[error("no level loaded")]
    NoLevel,
    /// A tick arrived before the session was started.
    #[error("session not started")]
    NotStarted,
    /// A previous fault halted the engine; load or start again to recover.
    #[error("engine halted: {0}")]
    Halted(String),
}

/// Immutable picture of the session published after every tick.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    /// Lifecycle status after the tick.
    pub status: GameStatus,
    /// Total simulated time elapsed.
    pub clock: Duration,
    /// Time left on the countdown.
    pub remaining: Duration,
    /// Current score.
    pub score: u32,
    /// Controlled players in id order.
    pub players: Vec<PlayerSnapshot>,
    /// Enemies in id order, fading ones included.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles in flight, in id order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Hero pickups.
    pub collectibles: Vec<CollectibleSnapshot>,
    /// Power-up pickups.
    pub power_ups: Vec<PowerUpSnapshot>,
    /// Captives awaiting rescue.
    pub captives: Vec<CaptiveSnapshot>,
    /// Active party buffs with remaining durations.
    pub buffs: Vec<(PowerUpKind, Duration)>,
}

/// Owns the world and the systems and drives them in tick order.
#[derive(Debug, Default)]
pub struct Engine {
    world: World,
    input: Input,
    ai: EnemyAi,
    combat: Combat,
    analytics: Analytics,
    active_player: Option<PlayerId>,
    events: Vec<Event>,
    fault: Option<String>,
}

impl Engine {
    /// Creates an engine with an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and installs a level.
    pub fn load_level(&mut self, level: LevelData) -> Result<(), EngineError> {
        self.events.clear();
        apply(&mut self.world, Command::LoadLevel { level }, &mut self.events);
        for event in &self.events {
            if let Event::LevelRejected { reasons } = event {
                return Err(EngineError::LevelRejected {
                    reasons: reasons.clone(),
                });
            }
        }
        self.fault = None;
        Ok(())
    }

    /// Starts a session on the loaded level with the given hero roster.
    pub fn start(&mut self, roster: Vec<HeroClass>) -> Result<(), EngineError> {
        if query::level(&self.world).is_none() {
            return Err(EngineError::NoLevel);
        }
        self.events.clear();
        apply(&mut self.world, Command::StartGame { roster }, &mut self.events);
        self.analytics.handle(&self.events);
        self.active_player = query::player_view(&self.world)
            .iter()
            .next()
            .map(|player| player.id);
        self.ai = EnemyAi::new();
        self.fault = None;
        Ok(())
    }

    /// The input buffer adapters feed player actions into.
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// The player currently receiving input, if any.
    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active_player
    }

    /// Hands input control to a specific party member.
    pub fn select_player(&mut self, player: PlayerId) {
        if query::player_view(&self.world)
            .iter()
            .any(|p| p.id == player && in_field(p))
        {
            self.active_player = Some(player);
        }
    }

    /// Submits a raw command outside the tick pipeline, for editor bridges
    /// and other adapters that drive the world directly.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        self.analytics.handle(&events);
        events
    }

    /// Read-only access to the world for query helpers.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events emitted by the most recent tick.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// The statistics accumulated since the session started.
    #[must_use]
    pub fn report(&self) -> &SessionReport {
        self.analytics.report()
    }

    /// Advances the simulation by `dt` and publishes the resulting snapshot.
    pub fn tick(&mut self, dt: Duration) -> Result<GameSnapshot, EngineError> {
        if let Some(reason) = &self.fault {
            return Err(EngineError::Halted(reason.clone()));
        }
        if query::level(&self.world).is_none() {
            return self.halt(EngineError::NoLevel);
        }
        if query::player_view(&self.world).is_empty() {
            return self.halt(EngineError::NotStarted);
        }

        self.events.clear();
        self.refresh_active_player();
        let tick_marker = [Event::TimeAdvanced { dt }];

        // 1. Drain buffered input into movement and shooting commands.
        let status = query::status(&self.world);
        let mut planned = Vec::new();
        if let Some(player) = self.active_player {
            self.input.handle(player, status, &mut planned);
        }
        for command in planned.drain(..) {
            apply(&mut self.world, command, &mut self.events);
        }

        // 2. Enemy planning against the post-input positions.
        {
            let players = query::player_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.ai.handle(
                &tick_marker,
                &players,
                &enemies,
                query::wall_grid(&self.world),
                &mut planned,
            );
        }
        for command in planned.drain(..) {
            apply(&mut self.world, command, &mut self.events);
        }

        // 3. Advance the clock, cooldowns, projectiles and timers.
        apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        // 4. Resolve collisions against the frozen post-movement state.
        {
            let players = query::player_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            let projectiles = query::projectile_view(&self.world);
            let collectibles = query::collectibles(&self.world);
            let power_ups = query::power_ups(&self.world);
            let captives = query::captives(&self.world);
            let blasts = query::pending_blasts(&self.world);
            self.combat.handle(
                &tick_marker,
                CombatInputs {
                    players: &players,
                    enemies: &enemies,
                    projectiles: &projectiles,
                    collectibles: &collectibles,
                    power_ups: &power_ups,
                    captives: &captives,
                    blasts: &blasts,
                },
                &mut planned,
            );
        }
        for command in planned.drain(..) {
            apply(&mut self.world, command, &mut self.events);
        }

        // 5. Run the status machine over the settled state.
        apply(&mut self.world, Command::ResolveStatus, &mut self.events);

        // 6. Fold the tick's events into the session statistics.
        self.analytics.handle(&self.events);

        Ok(self.snapshot())
    }

    /// Captures the current state without advancing time.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: query::status(&self.world),
            clock: query::clock(&self.world),
            remaining: query::remaining_time(&self.world),
            score: query::score(&self.world),
            players: query::player_view(&self.world).into_vec(),
            enemies: query::enemy_view(&self.world).into_vec(),
            projectiles: query::projectile_view(&self.world).into_vec(),
            collectibles: query::collectibles(&self.world),
            power_ups: query::power_ups(&self.world),
            captives: query::captives(&self.world),
            buffs: query::active_buffs(&self.world),
        }
    }

    fn refresh_active_player(&mut self) {
        let players = query::player_view(&self.world);
        let current_usable = self
            .active_player
            .is_some_and(|id| players.iter().any(|p| p.id == id && in_field(p)));
        if !current_usable {
            // Control falls to the lowest-id member still in the field.
            self.active_player = players.iter().find(|p| in_field(p)).map(|p| p.id);
        }
    }

    fn halt(&mut self, error: EngineError) -> Result<GameSnapshot, EngineError> {
        log::error!("engine halted: {error}");
        self.fault = Some(error.to_string());
        Err(error)
    }
}

// A party member is controllable while alive and still on the lattice;
// escaped players sit on the boundary row.
fn in_field(player: &PlayerSnapshot) -> bool {
    player.is_alive && player.position.y() >= 0
}
