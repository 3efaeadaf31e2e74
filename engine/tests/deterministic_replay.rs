//! Two engines fed the same script must agree on every snapshot field.

use std::time::Duration;

use grid_strike_core::{
    level::{
        CollectiblePlacement, EnemyConfig, EnemyPlacement, ExitZonePlacement, LevelMetadata,
        PowerUpPlacement, WallPlacement,
    },
    AimVector, Direction, EnemyClass, GridPos, HeroClass, LevelData, PowerUpKind,
};
use grid_strike_engine::{Engine, GameSnapshot};
use grid_strike_system_input::PlayerAction;

fn replay_level() -> LevelData {
    LevelData {
        player_start: GridPos::new(3, 12),
        enemies: vec![
            EnemyPlacement {
                position: GridPos::new(12, 6),
                config: EnemyConfig::of_class(EnemyClass::Guard),
            },
            EnemyPlacement {
                position: GridPos::new(18, 12),
                config: EnemyConfig::of_class(EnemyClass::Warden),
            },
        ],
        walls: vec![
            WallPlacement {
                position: GridPos::new(8, 12),
            },
            WallPlacement {
                position: GridPos::new(8, 11),
            },
        ],
        collectibles: vec![CollectiblePlacement {
            position: GridPos::new(4, 12),
            hero: HeroClass::Marksman,
        }],
        power_ups: vec![PowerUpPlacement {
            position: GridPos::new(5, 12),
            kind: PowerUpKind::SpeedBoost,
        }],
        captives: Vec::new(),
        exit_zones: vec![ExitZonePlacement {
            position: GridPos::new(24, 0),
        }],
        metadata: LevelMetadata::named("replay"),
    }
}

fn run_script() -> GameSnapshot {
    let mut engine = Engine::new();
    engine.load_level(replay_level()).expect("level loads");
    engine.start(vec![HeroClass::Vanguard]).expect("starts");

    engine.input_mut().press_direction(Direction::East);
    for step in 0..80 {
        if step == 20 {
            engine.input_mut().release_direction(Direction::East);
            engine
                .input_mut()
                .push(PlayerAction::Shoot(AimVector::new(1, -1)));
        }
        if step == 40 {
            engine.input_mut().press_direction(Direction::North);
        }
        let _ = engine.tick(Duration::from_millis(50)).expect("tick");
    }
    engine.snapshot()
}

#[test]
fn identical_scripts_produce_identical_snapshots() {
    let first = run_script();
    let second = run_script();

    assert_eq!(first.status, second.status);
    assert_eq!(first.clock, second.clock);
    assert_eq!(first.score, second.score);
    assert_eq!(first.players, second.players);
    assert_eq!(first.enemies, second.enemies);
    assert_eq!(first.projectiles, second.projectiles);
    assert_eq!(first.collectibles, second.collectibles);
    assert_eq!(first.power_ups, second.power_ups);
    assert_eq!(first.buffs, second.buffs);
}
