#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Buffered player input translated into world commands.
//!
//! Adapters feed abstract actions in whatever order their event source
//! delivers them; the system buffers everything and drains the buffer once
//! per tick so a burst of key events between two ticks cannot reorder
//! itself. Held directions repeat every tick, leaving the cadence to the
//! world's cooldown gates.

use std::collections::VecDeque;

use grid_strike_core::{AimVector, Command, Direction, GameStatus, PlayerId};

/// Abstract action produced by an adapter's key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// A single requested step.
    Move(Direction),
    /// A shot along the given vector; zero falls back to the facing.
    Shoot(AimVector),
    /// Toggle between playing and paused.
    TogglePause,
    /// Discard the session back to the loaded level.
    Reset,
}

/// Stateful input buffer that emits commands for the controlled player.
#[derive(Debug, Default)]
pub struct Input {
    queue: VecDeque<PlayerAction>,
    held: Vec<Direction>,
    facing: Option<Direction>,
}

impl Input {
    /// Creates an empty input buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers a one-shot action.
    pub fn push(&mut self, action: PlayerAction) {
        self.queue.push_back(action);
    }

    /// Records a direction key going down: buffers one step immediately and
    /// keeps the direction repeating until released.
    pub fn press_direction(&mut self, direction: Direction) {
        if !self.held.contains(&direction) {
            self.held.push(direction);
        }
        self.queue.push_back(PlayerAction::Move(direction));
    }

    /// Records a direction key going up.
    pub fn release_direction(&mut self, direction: Direction) {
        self.held.retain(|held| *held != direction);
    }

    /// Drains the buffer and emits commands for the active player.
    ///
    /// Held directions contribute one repeat step per call, most recent
    /// press winning, so diagonal holds resolve deterministically.
    pub fn handle(&mut self, player: PlayerId, status: GameStatus, out: &mut Vec<Command>) {
        while let Some(action) = self.queue.pop_front() {
            match action {
                PlayerAction::Move(direction) => {
                    self.facing = Some(direction);
                    if status == GameStatus::Playing {
                        out.push(Command::MovePlayer { player, direction });
                    }
                }
                PlayerAction::Shoot(aim) => {
                    if status != GameStatus::Playing {
                        continue;
                    }
                    let aim = if aim.is_zero() {
                        // A directionless trigger fires along the facing.
                        self.facing.unwrap_or(Direction::North).aim()
                    } else {
                        aim
                    };
                    out.push(Command::PlayerShoot { player, aim });
                }
                PlayerAction::TogglePause => match status {
                    GameStatus::Playing => out.push(Command::SetPaused { paused: true }),
                    GameStatus::Paused => out.push(Command::SetPaused { paused: false }),
                    _ => {}
                },
                PlayerAction::Reset => out.push(Command::Reset),
            }
        }

        if status == GameStatus::Playing {
            if let Some(direction) = self.held.last().copied() {
                self.facing = Some(direction);
                out.push(Command::MovePlayer { player, direction });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &mut Input, status: GameStatus) -> Vec<Command> {
        let mut out = Vec::new();
        input.handle(PlayerId::new(0), status, &mut out);
        out
    }

    #[test]
    fn buffered_actions_drain_in_arrival_order() {
        let mut input = Input::new();
        input.push(PlayerAction::Move(Direction::East));
        input.push(PlayerAction::Shoot(AimVector::new(0, -1)));
        let commands = drain(&mut input, GameStatus::Playing);
        assert_eq!(
            commands,
            vec![
                Command::MovePlayer {
                    player: PlayerId::new(0),
                    direction: Direction::East,
                },
                Command::PlayerShoot {
                    player: PlayerId::new(0),
                    aim: AimVector::new(0, -1),
                },
            ]
        );
        assert!(drain(&mut input, GameStatus::Playing).is_empty());
    }

    #[test]
    fn held_directions_repeat_with_the_latest_press_winning() {
        let mut input = Input::new();
        input.press_direction(Direction::East);
        input.press_direction(Direction::South);
        let first = drain(&mut input, GameStatus::Playing);
        // Two buffered presses plus one repeat for the newest held key.
        assert_eq!(first.len(), 3);
        assert_eq!(
            first[2],
            Command::MovePlayer {
                player: PlayerId::new(0),
                direction: Direction::South,
            }
        );

        input.release_direction(Direction::South);
        let second = drain(&mut input, GameStatus::Playing);
        assert_eq!(
            second,
            vec![Command::MovePlayer {
                player: PlayerId::new(0),
                direction: Direction::East,
            }]
        );
    }

    #[test]
    fn directionless_shot_uses_the_facing() {
        let mut input = Input::new();
        input.push(PlayerAction::Move(Direction::West));
        input.push(PlayerAction::Shoot(AimVector::new(0, 0)));
        let commands = drain(&mut input, GameStatus::Playing);
        assert_eq!(
            commands[1],
            Command::PlayerShoot {
                player: PlayerId::new(0),
                aim: AimVector::new(-1, 0),
            }
        );
    }

    #[test]
    fn movement_is_swallowed_while_paused_but_pause_toggles_through() {
        let mut input = Input::new();
        input.press_direction(Direction::North);
        input.push(PlayerAction::TogglePause);
        let commands = drain(&mut input, GameStatus::Paused);
        assert_eq!(commands, vec![Command::SetPaused { paused: false }]);
    }
}
