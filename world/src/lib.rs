#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Strike.
//!
//! The world owns every entity and is the only place state mutates. All
//! mutations arrive as [`Command`] values through [`apply`], which executes
//! them deterministically and pushes [`Event`] values describing what
//! actually happened. Systems never reach into the world directly; they read
//! the snapshot views exposed by [`query`] and respond with new commands.

use std::time::Duration;

use grid_strike_core::{
    level::{
        CaptivePlacement, CollectiblePlacement, EnemyPlacement, ExitZonePlacement, LevelMetadata,
        PowerUpPlacement, WallPlacement,
    },
    BehaviorPattern, BlastSnapshot, CaptiveId, CollectibleId, CombatEffect, Command, EditorObject,
    EditorObjectId, EnemyClass, EnemyId, Event, GameStatus, GridPos, Health, HeroClass, LevelData,
    PlayerId, PowerUpId, PowerUpKind, ProjectileId, ProjectileOwner, RemovalReason,
    TimerThreshold, WeaponType, DEFAULT_TIME_LIMIT, DESTROY_FADE_DURATION, EXIT_ROW,
    HIT_FLASH_DURATION, SCORE_CAPTIVE_RESCUED, SCORE_ENEMY_DESTROYED, SCORE_HERO_COLLECTED,
    SCORE_POWER_UP,
};

pub mod grid;
pub mod level;
mod projectile;

use grid::WallGrid;
use projectile::{Projectile, TravelOutcome};

const ALERT_THRESHOLDS: [TimerThreshold; 3] = [
    TimerThreshold::At60s,
    TimerThreshold::At30s,
    TimerThreshold::At10s,
];

#[derive(Debug, Clone)]
struct Player {
    id: PlayerId,
    hero: HeroClass,
    position: GridPos,
    health: Health,
    last_move_at: Option<Duration>,
    last_shot_at: Option<Duration>,
    hit_until: Duration,
    exited: bool,
}

impl Player {
    fn spawn(id: PlayerId, hero: HeroClass, position: GridPos) -> Self {
        Self {
            id,
            hero,
            position,
            health: hero.max_health(),
            last_move_at: None,
            last_shot_at: None,
            hit_until: Duration::ZERO,
            exited: false,
        }
    }

    fn is_alive(&self) -> bool {
        !self.health.is_zero()
    }
}

#[derive(Debug, Clone)]
struct Enemy {
    id: EnemyId,
    class: EnemyClass,
    behavior: BehaviorPattern,
    position: GridPos,
    anchor: GridPos,
    patrol_radius: u32,
    health: Health,
    destroyed_at: Option<Duration>,
    hit_until: Duration,
    last_move_at: Option<Duration>,
    last_shot_at: Option<Duration>,
}

impl Enemy {
    fn from_placement(id: EnemyId, placement: &EnemyPlacement) -> Self {
        let stats = placement.config.class.stats();
        Self {
            id,
            class: placement.config.class,
            behavior: placement
                .config
                .behavior
                .unwrap_or(stats.default_behavior),
            position: placement.position,
            anchor: placement.position,
            patrol_radius: placement
                .config
                .patrol_radius
                .unwrap_or(stats.default_patrol_radius),
            health: stats.max_health,
            destroyed_at: None,
            hit_until: Duration::ZERO,
            last_move_at: None,
            last_shot_at: None,
        }
    }

    fn is_active(&self) -> bool {
        self.destroyed_at.is_none()
    }
}

#[derive(Debug, Clone)]
struct Collectible {
    id: CollectibleId,
    position: GridPos,
    hero: HeroClass,
    collected: bool,
}

#[derive(Debug, Clone)]
struct PowerUpPickup {
    id: PowerUpId,
    position: GridPos,
    kind: PowerUpKind,
    collected: bool,
}

#[derive(Debug, Clone)]
struct Captive {
    id: CaptiveId,
    position: GridPos,
    hero: HeroClass,
    rescue_radius: u32,
}

#[derive(Debug, Clone, Copy)]
struct ActiveBuff {
    kind: PowerUpKind,
    expires_at: Duration,
}

#[derive(Debug, Default)]
struct EditorWorkspace {
    entries: Vec<(EditorObjectId, EditorObject)>,
    next_id: u32,
}

impl EditorWorkspace {
    fn allocate(&mut self) -> EditorObjectId {
        let id = EditorObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, object: EditorObject) -> EditorObjectId {
        let id = self.allocate();
        self.entries.push((id, object));
        id
    }
}

/// Represents the authoritative Grid Strike world state.
#[derive(Debug)]
pub struct World {
    status: GameStatus,
    clock: Duration,
    time_limit: Duration,
    alerts_fired: Vec<TimerThreshold>,
    level: Option<LevelData>,
    grid: WallGrid,
    roster: Vec<HeroClass>,
    players: Vec<Player>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    collectibles: Vec<Collectible>,
    power_ups: Vec<PowerUpPickup>,
    captives: Vec<Captive>,
    exit_zones: Vec<GridPos>,
    buffs: Vec<ActiveBuff>,
    pending_blasts: Vec<BlastSnapshot>,
    score: u32,
    next_player_id: u32,
    next_enemy_id: u32,
    next_projectile_id: u32,
    editor: EditorWorkspace,
}

impl World {
    /// Creates an empty world awaiting a level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: GameStatus::Paused,
            clock: Duration::ZERO,
            time_limit: DEFAULT_TIME_LIMIT,
            alerts_fired: Vec::new(),
            level: None,
            grid: WallGrid::new(),
            roster: Vec::new(),
            players: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            captives: Vec::new(),
            exit_zones: Vec::new(),
            buffs: Vec::new(),
            pending_blasts: Vec::new(),
            score: 0,
            next_player_id: 0,
            next_enemy_id: 0,
            next_projectile_id: 0,
            editor: EditorWorkspace::default(),
        }
    }

    fn install_level(&mut self, level: &LevelData) {
        self.grid.clear();
        for wall in &level.walls {
            self.grid.place_wall(wall.position);
        }

        self.players.clear();
        self.projectiles.clear();
        self.buffs.clear();
        self.pending_blasts.clear();
        self.roster.clear();
        self.alerts_fired.clear();
        self.clock = Duration::ZERO;
        self.score = 0;
        self.next_player_id = 0;
        self.next_enemy_id = 0;
        self.next_projectile_id = 0;

        self.time_limit = level
            .metadata
            .time_limit_seconds
            .map_or(DEFAULT_TIME_LIMIT, |seconds| {
                Duration::from_secs(u64::from(seconds))
            });

        self.enemies = level
            .enemies
            .iter()
            .enumerate()
            .map(|(index, placement)| Enemy::from_placement(EnemyId::new(index as u32), placement))
            .collect();
        self.next_enemy_id = self.enemies.len() as u32;

        self.collectibles = level
            .collectibles
            .iter()
            .enumerate()
            .map(|(index, placement)| Collectible {
                id: CollectibleId::new(index as u32),
                position: placement.position,
                hero: placement.hero,
                collected: false,
            })
            .collect();

        self.power_ups = level
            .power_ups
            .iter()
            .enumerate()
            .map(|(index, placement)| PowerUpPickup {
                id: PowerUpId::new(index as u32),
                position: placement.position,
                kind: placement.kind,
                collected: false,
            })
            .collect();

        self.captives = level
            .captives
            .iter()
            .enumerate()
            .map(|(index, placement)| Captive {
                id: CaptiveId::new(index as u32),
                position: placement.position,
                hero: placement.hero,
                rescue_radius: placement.rescue_radius,
            })
            .collect();

        self.exit_zones = level.exit_zones.iter().map(|zone| zone.position).collect();
    }

    fn rebuild_editor_from_level(&mut self) {
        self.editor = EditorWorkspace::default();
        let Some(level) = self.level.clone() else {
            return;
        };
        let _ = self.editor.push(EditorObject::PlayerStart {
            position: level.player_start,
        });
        for wall in level.walls {
            let _ = self.editor.push(EditorObject::Wall(wall));
        }
        for enemy in level.enemies {
            let _ = self.editor.push(EditorObject::Enemy(enemy));
        }
        for collectible in level.collectibles {
            let _ = self.editor.push(EditorObject::Collectible(collectible));
        }
        for power_up in level.power_ups {
            let _ = self.editor.push(EditorObject::PowerUp(power_up));
        }
        for captive in level.captives {
            let _ = self.editor.push(EditorObject::Captive(captive));
        }
        for exit in level.exit_zones {
            let _ = self.editor.push(EditorObject::Exit(exit));
        }
    }

    fn rebuild_level_from_editor(&mut self) {
        let metadata = self
            .level
            .as_ref()
            .map_or_else(|| LevelMetadata::named("untitled"), |l| l.metadata.clone());

        let mut player_start = self
            .level
            .as_ref()
            .map_or(GridPos::new(0, 0), |l| l.player_start);
        let mut enemies: Vec<EnemyPlacement> = Vec::new();
        let mut walls: Vec<WallPlacement> = Vec::new();
        let mut collectibles: Vec<CollectiblePlacement> = Vec::new();
        let mut power_ups: Vec<PowerUpPlacement> = Vec::new();
        let mut captives: Vec<CaptivePlacement> = Vec::new();
        let mut exit_zones: Vec<ExitZonePlacement> = Vec::new();

        for (_, object) in &self.editor.entries {
            match object {
                EditorObject::PlayerStart { position } => player_start = *position,
                EditorObject::Enemy(placement) => enemies.push(placement.clone()),
                EditorObject::Wall(placement) => walls.push(*placement),
                EditorObject::Collectible(placement) => collectibles.push(*placement),
                EditorObject::PowerUp(placement) => power_ups.push(*placement),
                EditorObject::Captive(placement) => captives.push(*placement),
                EditorObject::Exit(placement) => exit_zones.push(*placement),
            }
        }

        self.level = Some(LevelData {
            player_start,
            enemies,
            walls,
            collectibles,
            power_ups,
            captives,
            exit_zones,
            metadata,
        });
    }

    fn buff_active(&self, kind: PowerUpKind) -> bool {
        self.buffs
            .iter()
            .any(|buff| buff.kind == kind && buff.expires_at > self.clock)
    }

    fn effective_move_period(&self, hero: HeroClass) -> Duration {
        let period = hero.move_period();
        if self.buff_active(PowerUpKind::SpeedBoost) {
            period / 2
        } else {
            period
        }
    }

    fn effective_shoot_cooldown(&self, weapon: WeaponType) -> Duration {
        let cooldown = weapon.spec().cooldown;
        if self.buff_active(PowerUpKind::RapidFire) {
            cooldown / 2
        } else {
            cooldown
        }
    }

    fn cooldown_ready(&self, last: Option<Duration>, period: Duration) -> bool {
        last.map_or(true, |at| self.clock.saturating_sub(at) >= period)
    }

    fn spawn_player(&mut self, hero: HeroClass, position: GridPos) -> PlayerId {
        let id = PlayerId::new(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player::spawn(id, hero, position));
        id
    }

    fn spawn_projectile(
        &mut self,
        owner: ProjectileOwner,
        weapon: WeaponType,
        position: GridPos,
        aim: grid_strike_core::AimVector,
        out_events: &mut Vec<Event>,
    ) {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles
            .push(Projectile::new(id, owner, weapon, position, aim, self.clock));
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            owner,
            weapon,
            at: position,
        });
    }

    fn award(&mut self, points: u32, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(points);
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn set_status(&mut self, status: GameStatus, out_events: &mut Vec<Event>) {
        if self.status != status {
            self.status = status;
            out_events.push(Event::StatusChanged { status });
        }
    }

    fn enemies_cleared(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.is_active())
    }

    fn player_at_exit(&self, player: &Player) -> bool {
        player.exited || self.exit_zones.contains(&player.position)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level } => {
            let problems = level::validate(&level);
            if !problems.is_empty() {
                log::warn!("rejected level {:?}: {problems:?}", level.metadata.name);
                out_events.push(Event::LevelRejected { reasons: problems });
                return;
            }
            world.install_level(&level);
            world.level = Some(level);
            world.rebuild_editor_from_level();
            out_events.push(Event::LevelLoaded);
            world.set_status(GameStatus::Paused, out_events);
        }
        Command::StartGame { roster } => {
            let Some(level) = world.level.clone() else {
                return;
            };
            world.install_level(&level);
            let lead = roster.first().copied().unwrap_or(HeroClass::Vanguard);
            let _ = world.spawn_player(lead, level.player_start);
            world.roster = roster.iter().skip(1).copied().collect();
            out_events.push(Event::GameStarted);
            world.set_status(GameStatus::Playing, out_events);
        }
        Command::Reset => {
            let Some(level) = world.level.clone() else {
                return;
            };
            world.install_level(&level);
            world.set_status(GameStatus::Paused, out_events);
        }
        Command::SetPaused { paused } => match (paused, world.status) {
            (true, GameStatus::Playing) => world.set_status(GameStatus::Paused, out_events),
            (false, GameStatus::Paused) if !world.players.is_empty() => {
                world.set_status(GameStatus::Playing, out_events);
            }
            _ => {}
        },
        Command::Tick { dt } => tick(world, dt, out_events),
        Command::MovePlayer { player, direction } => move_player(world, player, direction, out_events),
        Command::PlayerShoot { player, aim } => player_shoot(world, player, aim, out_events),
        Command::StepEnemy { enemy, direction } => step_enemy(world, enemy, direction, out_events),
        Command::EnemyShoot { enemy, target } => enemy_shoot(world, enemy, target, out_events),
        Command::ApplyEffects { effects } => apply_effects(world, effects, out_events),
        Command::ResolveStatus => resolve_status(world, out_events),
        Command::PlaceEditorObject { object } => {
            if world.status != GameStatus::Paused {
                return;
            }
            let id = world.editor.push(object);
            world.rebuild_level_from_editor();
            out_events.push(Event::EditorObjectPlaced { id });
        }
        Command::RemoveEditorObject { id } => {
            if world.status != GameStatus::Paused {
                return;
            }
            let before = world.editor.entries.len();
            world.editor.entries.retain(|(entry_id, _)| *entry_id != id);
            if world.editor.entries.len() != before {
                world.rebuild_level_from_editor();
                out_events.push(Event::EditorObjectRemoved { id });
            }
        }
        Command::UpdateEditorObject { id, object } => {
            if world.status != GameStatus::Paused {
                return;
            }
            let Some(entry) = world
                .editor
                .entries
                .iter_mut()
                .find(|(entry_id, _)| *entry_id == id)
            else {
                return;
            };
            entry.1 = object;
            world.rebuild_level_from_editor();
            out_events.push(Event::EditorObjectUpdated { id });
        }
        Command::RequestObjectConfig { id } => {
            let Some((_, object)) = world
                .editor
                .entries
                .iter()
                .find(|(entry_id, _)| *entry_id == id)
            else {
                return;
            };
            out_events.push(Event::ObjectConfigRequested {
                id,
                object: object.clone(),
            });
        }
    }
}

fn tick(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    // Paused and terminal states hold the clock entirely.
    if world.status != GameStatus::Playing {
        return;
    }

    world.clock = world.clock.saturating_add(dt);
    out_events.push(Event::TimeAdvanced { dt });

    let remaining = world.time_limit.saturating_sub(world.clock);
    for threshold in ALERT_THRESHOLDS {
        if remaining <= Duration::from_secs(threshold.seconds())
            && !world.alerts_fired.contains(&threshold)
        {
            world.alerts_fired.push(threshold);
            out_events.push(Event::TimerAlert { threshold });
        }
    }

    let mut expired = Vec::new();
    world.buffs.retain(|buff| {
        if buff.expires_at <= world.clock {
            expired.push(buff.kind);
            false
        } else {
            true
        }
    });
    for kind in expired {
        out_events.push(Event::PowerUpExpired { kind });
    }

    let clock = world.clock;
    let mut faded = Vec::new();
    world.enemies.retain(|enemy| match enemy.destroyed_at {
        Some(at) if clock.saturating_sub(at) >= DESTROY_FADE_DURATION => {
            faded.push(enemy.id);
            false
        }
        _ => true,
    });
    for enemy in faded {
        out_events.push(Event::EnemyRemoved { enemy });
    }

    let mut dropped = Vec::new();
    for projectile in world.projectiles.iter_mut() {
        match projectile.advance(clock, &world.grid) {
            TravelOutcome::Flying => {}
            TravelOutcome::Removed(reason) => {
                if reason == RemovalReason::Detonated {
                    world.pending_blasts.push(BlastSnapshot {
                        center: projectile.position,
                        radius: projectile.spec.blast_radius,
                        damage: projectile.spec.damage,
                        by: match projectile.owner {
                            ProjectileOwner::Player(id) => Some(id),
                            ProjectileOwner::Enemy(_) => None,
                        },
                    });
                }
                dropped.push((projectile.id, reason));
            }
        }
    }
    world
        .projectiles
        .retain(|projectile| !dropped.iter().any(|(id, _)| *id == projectile.id));
    for (projectile, reason) in dropped {
        out_events.push(Event::ProjectileRemoved { projectile, reason });
    }
}

fn move_player(
    world: &mut World,
    player: PlayerId,
    direction: grid_strike_core::Direction,
    out_events: &mut Vec<Event>,
) {
    if world.status != GameStatus::Playing {
        return;
    }
    let Some(index) = world.players.iter().position(|p| p.id == player) else {
        return;
    };
    if !world.players[index].is_alive() || world.players[index].exited {
        return;
    }

    let period = world.effective_move_period(world.players[index].hero);
    if !world.cooldown_ready(world.players[index].last_move_at, period) {
        return;
    }

    let from = world.players[index].position;
    let target = from.step(direction);

    if target.y() == EXIT_ROW {
        // The boundary row is only reachable through an exit zone cell.
        if !world.exit_zones.contains(&from) {
            return;
        }
        let clock = world.clock;
        let escaping = &mut world.players[index];
        escaping.position = target;
        escaping.exited = true;
        escaping.last_move_at = Some(clock);
        out_events.push(Event::PlayerExited { player, at: target });
        return;
    }

    if !world.grid.is_walkable(target) {
        return;
    }
    if world
        .players
        .iter()
        .any(|other| other.id != player && !other.exited && other.is_alive() && other.position == target)
    {
        return;
    }

    let clock = world.clock;
    let moving = &mut world.players[index];
    moving.position = target;
    moving.last_move_at = Some(clock);
    out_events.push(Event::PlayerMoved {
        player,
        from,
        to: target,
    });
}

fn player_shoot(
    world: &mut World,
    player: PlayerId,
    aim: grid_strike_core::AimVector,
    out_events: &mut Vec<Event>,
) {
    if world.status != GameStatus::Playing || aim.is_zero() {
        return;
    }
    let Some(index) = world.players.iter().position(|p| p.id == player) else {
        return;
    };
    if !world.players[index].is_alive() || world.players[index].exited {
        return;
    }

    let weapon = world.players[index].hero.weapon();
    let spec = weapon.spec();
    let cooldown = world.effective_shoot_cooldown(weapon);
    if !world.cooldown_ready(world.players[index].last_shot_at, cooldown) {
        return;
    }

    let origin = world.players[index].position;
    let spawn_at = if spec.melee { origin.offset(aim) } else { origin };
    if spec.melee && !world.grid.in_bounds(spawn_at) {
        return;
    }

    let clock = world.clock;
    world.players[index].last_shot_at = Some(clock);
    world.spawn_projectile(
        ProjectileOwner::Player(player),
        weapon,
        spawn_at,
        aim,
        out_events,
    );
}

fn step_enemy(
    world: &mut World,
    enemy: EnemyId,
    direction: grid_strike_core::Direction,
    out_events: &mut Vec<Event>,
) {
    if world.status != GameStatus::Playing {
        return;
    }
    let Some(index) = world.enemies.iter().position(|e| e.id == enemy) else {
        return;
    };
    if !world.enemies[index].is_active() {
        return;
    }

    let stats = world.enemies[index].class.stats();
    if !world.cooldown_ready(world.enemies[index].last_move_at, stats.move_period) {
        return;
    }

    let from = world.enemies[index].position;
    let target = from.step(direction);

    // Blocked steps are rejected without consuming the cooldown.
    if !world.grid.is_walkable(target) {
        return;
    }
    if world
        .enemies
        .iter()
        .any(|other| other.id != enemy && other.is_active() && other.position == target)
    {
        return;
    }

    let clock = world.clock;
    let moving = &mut world.enemies[index];
    moving.position = target;
    moving.last_move_at = Some(clock);
    out_events.push(Event::EnemyMoved {
        enemy,
        from,
        to: target,
    });
}

fn enemy_shoot(world: &mut World, enemy: EnemyId, target: GridPos, out_events: &mut Vec<Event>) {
    if world.status != GameStatus::Playing {
        return;
    }
    let Some(index) = world.enemies.iter().position(|e| e.id == enemy) else {
        return;
    };
    if !world.enemies[index].is_active() {
        return;
    }

    let stats = world.enemies[index].class.stats();
    if !world.cooldown_ready(world.enemies[index].last_shot_at, stats.shoot_cooldown) {
        return;
    }

    let origin = world.enemies[index].position;
    if origin.distance(target) > f64::from(stats.shoot_range) {
        return;
    }
    // The AI plans shots it can see, but the gate holds for any submitter.
    if !world.grid.line_of_sight(origin, target) {
        return;
    }
    let aim = origin.aim_toward(target);
    if aim.is_zero() {
        return;
    }

    let clock = world.clock;
    world.enemies[index].last_shot_at = Some(clock);
    world.spawn_projectile(
        ProjectileOwner::Enemy(enemy),
        WeaponType::Rifle,
        origin,
        aim,
        out_events,
    );
}

fn apply_effects(world: &mut World, effects: Vec<CombatEffect>, out_events: &mut Vec<Event>) {
    if world.status != GameStatus::Playing {
        return;
    }

    for effect in effects {
        match effect {
            CombatEffect::DamagePlayer { player, amount } => {
                if world.buff_active(PowerUpKind::Shield) {
                    continue;
                }
                let clock = world.clock;
                let Some(victim) = world
                    .players
                    .iter_mut()
                    .find(|p| p.id == player && p.is_alive() && !p.exited)
                else {
                    continue;
                };
                victim.health = victim.health.damaged(amount);
                victim.hit_until = clock + HIT_FLASH_DURATION;
                let remaining = victim.health;
                out_events.push(Event::PlayerDamaged {
                    player,
                    amount,
                    remaining,
                });
                if remaining.is_zero() {
                    out_events.push(Event::PlayerDefeated { player });
                }
            }
            CombatEffect::DamageEnemy { enemy, amount, by } => {
                let clock = world.clock;
                let Some(victim) = world
                    .enemies
                    .iter_mut()
                    .find(|e| e.id == enemy && e.is_active())
                else {
                    continue;
                };
                victim.health = victim.health.damaged(amount);
                victim.hit_until = clock + HIT_FLASH_DURATION;
                let remaining = victim.health;
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    by,
                    amount,
                    remaining,
                });
                if remaining.is_zero() {
                    victim.destroyed_at = Some(clock);
                    out_events.push(Event::EnemyDestroyed { enemy, by });
                    world.award(SCORE_ENEMY_DESTROYED, out_events);
                }
            }
            CombatEffect::RemoveProjectile { projectile } => {
                let before = world.projectiles.len();
                world.projectiles.retain(|p| p.id != projectile);
                if world.projectiles.len() != before {
                    out_events.push(Event::ProjectileRemoved {
                        projectile,
                        reason: RemovalReason::Consumed,
                    });
                }
            }
            CombatEffect::MarkPenetrated { projectile, enemy } => {
                if let Some(p) = world.projectiles.iter_mut().find(|p| p.id == projectile) {
                    if !p.penetrated.contains(&enemy) {
                        p.penetrated.push(enemy);
                    }
                }
            }
            CombatEffect::CollectHero { collectible, by } => {
                let Some(pickup) = world
                    .collectibles
                    .iter_mut()
                    .find(|c| c.id == collectible && !c.collected)
                else {
                    continue;
                };
                pickup.collected = true;
                let hero = pickup.hero;
                world.roster.push(hero);
                out_events.push(Event::HeroCollected {
                    collectible,
                    by,
                    hero,
                });
                world.award(SCORE_HERO_COLLECTED, out_events);
            }
            CombatEffect::CollectPowerUp { power_up, by } => {
                let clock = world.clock;
                let Some(pickup) = world
                    .power_ups
                    .iter_mut()
                    .find(|p| p.id == power_up && !p.collected)
                else {
                    continue;
                };
                pickup.collected = true;
                let kind = pickup.kind;
                let expires_at = clock + kind.duration();
                // Re-collecting a kind restarts its timer.
                world.buffs.retain(|buff| buff.kind != kind);
                world.buffs.push(ActiveBuff { kind, expires_at });
                out_events.push(Event::PowerUpActivated { power_up, by, kind });
                world.award(SCORE_POWER_UP, out_events);
            }
            CombatEffect::RescueCaptive { captive, by } => {
                // The first rescue wins; later effects for the same captive
                // find it gone and fall through.
                let Some(index) = world.captives.iter().position(|c| c.id == captive) else {
                    continue;
                };
                let freed = world.captives.remove(index);
                let joined = world.spawn_player(freed.hero, freed.position);
                out_events.push(Event::CaptiveRescued {
                    captive,
                    by,
                    hero: freed.hero,
                    joined,
                });
                world.award(SCORE_CAPTIVE_RESCUED, out_events);
            }
        }
    }

    // Blasts are valid for exactly one collision pass.
    world.pending_blasts.clear();
}

fn resolve_status(world: &mut World, out_events: &mut Vec<Event>) {
    if world.status != GameStatus::Playing {
        return;
    }

    // Timer expiry outranks every other outcome on the same tick.
    if world.clock >= world.time_limit {
        world.set_status(GameStatus::GameOver, out_events);
        return;
    }

    if !world.players.is_empty() && world.players.iter().all(|p| p.health.is_zero()) {
        world.set_status(GameStatus::GameOver, out_events);
        return;
    }

    if world.enemies_cleared() && !world.players.is_empty() {
        let rescued_all = world.captives.is_empty();
        let everyone_out = world
            .players
            .iter()
            .filter(|p| p.is_alive())
            .all(|p| world.player_at_exit(p));
        if rescued_all && everyone_out {
            world.set_status(GameStatus::Victory, out_events);
        } else {
            world.set_status(GameStatus::LevelComplete, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use grid_strike_core::{
        BlastSnapshot, CaptiveSnapshot, CollectibleSnapshot, EditorObject, EditorObjectId,
        EnemySnapshot, EnemyView, GameStatus, GridPos, HeroClass, LevelData, PlayerSnapshot,
        PlayerView, PowerUpKind, PowerUpSnapshot, ProjectileSnapshot, ProjectileView,
        CAPTIVE_BLINK_INTERVAL,
    };

    use super::{grid::WallGrid, World};

    /// Current lifecycle status of the session.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Total simulated time elapsed since the session started.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Time left on the countdown; zero once the limit is reached.
    #[must_use]
    pub fn remaining_time(world: &World) -> Duration {
        world.time_limit.saturating_sub(world.clock)
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Reserve hero roster: collected heroes waiting off-field.
    #[must_use]
    pub fn roster(world: &World) -> &[HeroClass] {
        &world.roster
    }

    /// Read-only access to the wall lattice.
    #[must_use]
    pub fn wall_grid(world: &World) -> &WallGrid {
        &world.grid
    }

    /// The currently installed level, if any.
    #[must_use]
    pub fn level(world: &World) -> Option<&LevelData> {
        world.level.as_ref()
    }

    /// Exit zone cells on the top playable row.
    #[must_use]
    pub fn exit_zones(world: &World) -> &[GridPos] {
        &world.exit_zones
    }

    /// Captures a read-only view of the controlled players.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        let snapshots = world
            .players
            .iter()
            .map(|player| PlayerSnapshot {
                id: player.id,
                position: player.position,
                hero: player.hero,
                health: player.health,
                max_health: player.hero.max_health(),
                is_hit: world.clock < player.hit_until,
                is_alive: player.is_alive(),
                at_exit: world.player_at_exit(player),
            })
            .collect();
        PlayerView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the enemies, fading ones included.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| {
                let stats = enemy.class.stats();
                // The chase trigger is evaluated against the anchor, not the
                // enemy's current cell.
                let triggered = world.players.iter().any(|player| {
                    player.is_alive()
                        && !player.exited
                        && enemy.anchor.distance(player.position)
                            <= f64::from(enemy.patrol_radius)
                });
                EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    anchor: enemy.anchor,
                    patrol_radius: enemy.patrol_radius,
                    class: enemy.class,
                    behavior: enemy.behavior,
                    health: enemy.health,
                    is_chasing: triggered && enemy.destroyed_at.is_none(),
                    is_hit: world.clock < enemy.hit_until,
                    is_destroyed: enemy.destroyed_at.is_some(),
                    move_ready_in: enemy.last_move_at.map_or(Duration::ZERO, |at| {
                        stats
                            .move_period
                            .saturating_sub(world.clock.saturating_sub(at))
                    }),
                    shoot_ready_in: enemy.last_shot_at.map_or(Duration::ZERO, |at| {
                        stats
                            .shoot_cooldown
                            .saturating_sub(world.clock.saturating_sub(at))
                    }),
                }
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position,
                aim: projectile.aim,
                owner: projectile.owner,
                weapon: projectile.weapon,
                damage: projectile.spec.damage,
                start: projectile.start,
                has_returned: projectile.has_returned,
                penetrated: projectile.penetrated.clone(),
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Snapshots of every hero pickup, consumed ones flagged.
    #[must_use]
    pub fn collectibles(world: &World) -> Vec<CollectibleSnapshot> {
        world
            .collectibles
            .iter()
            .map(|pickup| CollectibleSnapshot {
                id: pickup.id,
                position: pickup.position,
                hero: pickup.hero,
                collected: pickup.collected,
            })
            .collect()
    }

    /// Snapshots of every power-up pickup, consumed ones flagged.
    #[must_use]
    pub fn power_ups(world: &World) -> Vec<PowerUpSnapshot> {
        world
            .power_ups
            .iter()
            .map(|pickup| PowerUpSnapshot {
                id: pickup.id,
                position: pickup.position,
                kind: pickup.kind,
                collected: pickup.collected,
            })
            .collect()
    }

    /// Snapshots of the captives still awaiting rescue.
    #[must_use]
    pub fn captives(world: &World) -> Vec<CaptiveSnapshot> {
        let blink_on =
            (world.clock.as_millis() / CAPTIVE_BLINK_INTERVAL.as_millis()) % 2 == 0;
        world
            .captives
            .iter()
            .map(|captive| CaptiveSnapshot {
                id: captive.id,
                position: captive.position,
                hero: captive.hero,
                rescue_radius: captive.rescue_radius,
                blink_on,
            })
            .collect()
    }

    /// Detonations awaiting the current tick's collision pass.
    #[must_use]
    pub fn pending_blasts(world: &World) -> Vec<BlastSnapshot> {
        world.pending_blasts.clone()
    }

    /// Active party buffs with their remaining durations.
    #[must_use]
    pub fn active_buffs(world: &World) -> Vec<(PowerUpKind, Duration)> {
        world
            .buffs
            .iter()
            .map(|buff| (buff.kind, buff.expires_at.saturating_sub(world.clock)))
            .collect()
    }

    /// Objects currently in the editor workspace.
    #[must_use]
    pub fn editor_objects(world: &World) -> Vec<(EditorObjectId, EditorObject)> {
        world.editor.entries.clone()
    }
}
