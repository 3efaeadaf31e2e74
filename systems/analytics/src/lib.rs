#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic session statistics folded from the event stream.
//!
//! The system never queries the world; everything it reports is derived
//! purely from events, so replaying the same event log always reproduces
//! the same report.

use std::time::Duration;

use grid_strike_core::{Event, PlayerId};

/// Accumulated statistics for one controlled player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    /// Hit points this player inflicted on enemies.
    pub damage_dealt: u32,
    /// Hit points this player received.
    pub damage_taken: u32,
    /// Enemies whose destruction was credited to this player.
    pub enemies_defeated: u32,
    /// Captives this player rescued.
    pub captives_rescued: u32,
    /// Power-ups this player collected.
    pub power_ups_collected: u32,
    /// Hero pickups this player collected.
    pub heroes_collected: u32,
    /// Cells this player traversed.
    pub cells_traveled: u32,
    /// Projectiles this player fired.
    pub shots_fired: u32,
}

/// Session-wide statistics alongside the per-player breakdown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Simulated time covered by the report.
    pub elapsed: Duration,
    /// Final score observed.
    pub score: u32,
    /// Per-player statistics in join order.
    pub players: Vec<(PlayerId, PlayerStats)>,
}

impl SessionReport {
    /// Statistics for one player, if the report has seen them.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerStats> {
        self.players
            .iter()
            .find(|(player, _)| *player == id)
            .map(|(_, stats)| stats)
    }
}

/// Stateful system folding events into a [`SessionReport`].
#[derive(Debug, Default)]
pub struct Analytics {
    report: SessionReport,
}

impl Analytics {
    /// Creates an analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The report accumulated so far.
    #[must_use]
    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    /// Folds a batch of world events into the running report.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GameStarted => self.report = SessionReport::default(),
                Event::TimeAdvanced { dt } => {
                    self.report.elapsed = self.report.elapsed.saturating_add(*dt);
                }
                Event::ScoreChanged { score } => self.report.score = *score,
                Event::PlayerMoved { player, .. } => {
                    self.stats_mut(*player).cells_traveled += 1;
                }
                Event::ProjectileSpawned { owner, .. } => {
                    if let grid_strike_core::ProjectileOwner::Player(player) = owner {
                        self.stats_mut(*player).shots_fired += 1;
                    }
                }
                Event::PlayerDamaged { player, amount, .. } => {
                    self.stats_mut(*player).damage_taken += amount;
                }
                Event::EnemyDamaged {
                    by: Some(player),
                    amount,
                    ..
                } => {
                    self.stats_mut(*player).damage_dealt += amount;
                }
                Event::EnemyDestroyed {
                    by: Some(player), ..
                } => {
                    self.stats_mut(*player).enemies_defeated += 1;
                }
                Event::CaptiveRescued { by, .. } => {
                    self.stats_mut(*by).captives_rescued += 1;
                }
                Event::PowerUpActivated { by, .. } => {
                    self.stats_mut(*by).power_ups_collected += 1;
                }
                Event::HeroCollected { by, .. } => {
                    self.stats_mut(*by).heroes_collected += 1;
                }
                _ => {}
            }
        }
    }

    fn stats_mut(&mut self, player: PlayerId) -> &mut PlayerStats {
        if let Some(index) = self
            .report
            .players
            .iter()
            .position(|(id, _)| *id == player)
        {
            return &mut self.report.players[index].1;
        }
        let index = self.report.players.len();
        self.report.players.push((player, PlayerStats::default()));
        &mut self.report.players[index].1
    }
}
