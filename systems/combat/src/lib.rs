#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-phase collision resolution.
//!
//! Every tick this system reads the frozen post-movement snapshots, computes
//! an ordered batch of [`CombatEffect`] values, and submits the whole batch
//! as a single `ApplyEffects` command. Because nothing mutates while the
//! batch is being computed, two projectiles arriving in the same cell on the
//! same tick are resolved against identical state, in snapshot id order,
//! with no dependence on iteration accidents.

use grid_strike_core::{
    BlastSnapshot, CaptiveSnapshot, CollectibleSnapshot, CombatEffect, Command, EnemyView, Event,
    PlayerView, PowerUpSnapshot, ProjectileOwner, ProjectileView, CONTACT_DAMAGE,
};

/// Read-only state captured for one collision pass.
#[derive(Debug, Clone, Copy)]
pub struct CombatInputs<'views> {
    /// Controlled players.
    pub players: &'views PlayerView,
    /// Enemies, fading ones included.
    pub enemies: &'views EnemyView,
    /// Projectiles in flight.
    pub projectiles: &'views ProjectileView,
    /// Hero pickups.
    pub collectibles: &'views [CollectibleSnapshot],
    /// Power-up pickups.
    pub power_ups: &'views [PowerUpSnapshot],
    /// Captives awaiting rescue.
    pub captives: &'views [CaptiveSnapshot],
    /// Detonations scheduled by this tick's projectile travel.
    pub blasts: &'views [BlastSnapshot],
}

/// Pure system that folds the tick's overlaps into one effect batch.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<CombatEffect>,
}

impl Combat {
    /// Creates a combat resolver with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and immutable views to emit the effect batch.
    ///
    /// The batch is emitted even when empty so the world can retire
    /// single-tick state such as pending blasts.
    pub fn handle(&mut self, events: &[Event], inputs: CombatInputs<'_>, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.scratch.clear();
        resolve_projectiles(&inputs, &mut self.scratch);
        resolve_blasts(&inputs, &mut self.scratch);
        resolve_contact(&inputs, &mut self.scratch);
        resolve_pickups(&inputs, &mut self.scratch);

        out.push(Command::ApplyEffects {
            effects: std::mem::take(&mut self.scratch),
        });
    }
}

fn resolve_projectiles(inputs: &CombatInputs<'_>, effects: &mut Vec<CombatEffect>) {
    for projectile in inputs.projectiles.iter() {
        let spec = projectile.weapon.spec();
        match projectile.owner {
            ProjectileOwner::Player(by) => {
                let Some(victim) = inputs
                    .enemies
                    .iter()
                    .find(|enemy| {
                        !enemy.is_destroyed
                            && enemy.position == projectile.position
                            && !projectile.penetrated.contains(&enemy.id)
                    })
                else {
                    continue;
                };
                effects.push(CombatEffect::DamageEnemy {
                    enemy: victim.id,
                    amount: projectile.damage,
                    by: Some(by),
                });
                if spec.penetration {
                    effects.push(CombatEffect::MarkPenetrated {
                        projectile: projectile.id,
                        enemy: victim.id,
                    });
                } else if !spec.continuous {
                    effects.push(CombatEffect::RemoveProjectile {
                        projectile: projectile.id,
                    });
                }
            }
            ProjectileOwner::Enemy(_) => {
                let Some(victim) = inputs
                    .players
                    .iter()
                    .find(|player| player.is_alive && !player.at_exit && player.position == projectile.position)
                else {
                    continue;
                };
                effects.push(CombatEffect::DamagePlayer {
                    player: victim.id,
                    amount: projectile.damage,
                });
                effects.push(CombatEffect::RemoveProjectile {
                    projectile: projectile.id,
                });
            }
        }
    }
}

fn resolve_blasts(inputs: &CombatInputs<'_>, effects: &mut Vec<CombatEffect>) {
    for blast in inputs.blasts {
        let radius = f64::from(blast.radius);
        match blast.by {
            Some(by) => {
                for enemy in inputs.enemies.iter() {
                    if !enemy.is_destroyed && blast.center.distance(enemy.position) <= radius {
                        effects.push(CombatEffect::DamageEnemy {
                            enemy: enemy.id,
                            amount: blast.damage,
                            by: Some(by),
                        });
                    }
                }
            }
            None => {
                for player in inputs.players.iter() {
                    if player.is_alive
                        && !player.at_exit
                        && blast.center.distance(player.position) <= radius
                    {
                        effects.push(CombatEffect::DamagePlayer {
                            player: player.id,
                            amount: blast.damage,
                        });
                    }
                }
            }
        }
    }
}

fn resolve_contact(inputs: &CombatInputs<'_>, effects: &mut Vec<CombatEffect>) {
    for enemy in inputs.enemies.iter() {
        if enemy.is_destroyed {
            continue;
        }
        for player in inputs.players.iter() {
            if player.is_alive && !player.at_exit && player.position == enemy.position {
                effects.push(CombatEffect::DamagePlayer {
                    player: player.id,
                    amount: CONTACT_DAMAGE,
                });
            }
        }
    }
}

fn resolve_pickups(inputs: &CombatInputs<'_>, effects: &mut Vec<CombatEffect>) {
    for player in inputs.players.iter() {
        if !player.is_alive || player.at_exit {
            continue;
        }
        for collectible in inputs.collectibles {
            if !collectible.collected && collectible.position == player.position {
                effects.push(CombatEffect::CollectHero {
                    collectible: collectible.id,
                    by: player.id,
                });
            }
        }
        for power_up in inputs.power_ups {
            if !power_up.collected && power_up.position == player.position {
                effects.push(CombatEffect::CollectPowerUp {
                    power_up: power_up.id,
                    by: player.id,
                });
            }
        }
        for captive in inputs.captives {
            if player.position.distance(captive.position) <= f64::from(captive.rescue_radius) {
                effects.push(CombatEffect::RescueCaptive {
                    captive: captive.id,
                    by: player.id,
                });
            }
        }
    }
}
