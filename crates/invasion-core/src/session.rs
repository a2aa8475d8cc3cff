//! Game session - menu, pause and game-over states around the engine
//!
//! The presentation layer maps its raw input (keys, buttons) to [`Command`]s
//! and forwards a [`MoveInput`] every frame. Only the session decides whether
//! the world actually ticks.

use invasion_logic::config::{ConfigError, GameConfig};
use invasion_logic::geometry::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::MoveInput;
use crate::engine::SimulationEngine;
use crate::events::GameEvent;
use crate::snapshot::WorldSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Discrete player intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StartGame,
    TogglePause,
    ToggleUpgradePanel,
    OpenUpgradePanel,
    CloseUpgradePanel,
    PurchaseUpgrade(String),
    ClaimQuest(usize),
    Restart,
    ReturnToMenu,
    Quit,
}

pub struct GameSession {
    config: GameConfig,
    engine: SimulationEngine,
    state: GameState,
    upgrade_panel_open: bool,
    /// Seconds spent in Playing since the last (re)start
    play_time: f32,
    running: bool,
}

impl GameSession {
    /// New session waiting in the menu
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let engine = SimulationEngine::new(config.clone())?;
        Ok(Self {
            config,
            engine,
            state: GameState::Menu,
            upgrade_panel_open: false,
            play_time: 0.0,
            running: true,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn upgrade_panel_open(&self) -> bool {
        self.upgrade_panel_open
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    /// Apply a command. Returns false when it does not apply in the current
    /// state (or the underlying operation was refused).
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::StartGame => {
                if self.state != GameState::Menu {
                    return false;
                }
                self.transition(GameState::Playing);
                true
            }
            Command::TogglePause => match self.state {
                GameState::Playing => {
                    self.transition(GameState::Paused);
                    true
                }
                GameState::Paused => {
                    self.transition(GameState::Playing);
                    true
                }
                _ => false,
            },
            Command::ToggleUpgradePanel => {
                if self.upgrade_panel_open {
                    self.handle(Command::CloseUpgradePanel)
                } else {
                    self.handle(Command::OpenUpgradePanel)
                }
            }
            Command::OpenUpgradePanel => {
                if self.state != GameState::Playing || self.upgrade_panel_open {
                    return false;
                }
                self.upgrade_panel_open = true;
                true
            }
            Command::CloseUpgradePanel => {
                let was_open = self.upgrade_panel_open;
                self.upgrade_panel_open = false;
                was_open
            }
            Command::PurchaseUpgrade(id) => self.is_live() && self.engine.purchase_upgrade(&id),
            Command::ClaimQuest(index) => self.is_live() && self.engine.claim_quest(index),
            Command::Restart => {
                if self.state == GameState::Menu {
                    return false;
                }
                self.reset(GameState::Playing)
            }
            Command::ReturnToMenu => {
                if !matches!(self.state, GameState::Paused | GameState::GameOver) {
                    return false;
                }
                self.reset(GameState::Menu)
            }
            Command::Quit => {
                log::info!("Quit requested");
                self.running = false;
                true
            }
        }
    }

    /// Run one frame. The world only advances while Playing; with the
    /// upgrade panel open the movement intent is dropped but time still runs.
    pub fn update(&mut self, delta_seconds: f32, input: &MoveInput) {
        if self.state != GameState::Playing {
            return;
        }
        let input = if self.upgrade_panel_open {
            MoveInput::NONE
        } else {
            *input
        };
        self.engine.tick(delta_seconds, &input);
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.play_time += delta_seconds;
        }

        if let Some(limit) = self.config.session_time_limit {
            if self.play_time >= limit {
                log::info!("Session time limit of {}s reached", limit);
                self.transition(GameState::GameOver);
            }
        }
    }

    /// Forward a click/tap target. Ignored unless the agent can move.
    pub fn set_pointer_target(&mut self, target: Vec2) -> bool {
        if self.state != GameState::Playing || self.upgrade_panel_open {
            return false;
        }
        self.engine.set_pointer_target(target);
        true
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.engine, self.state, self.upgrade_panel_open)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.engine.drain_events()
    }

    fn is_live(&self) -> bool {
        matches!(self.state, GameState::Playing | GameState::Paused)
    }

    fn transition(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        log::info!("State {:?} -> {:?}", from, to);
        self.state = to;
        if to != GameState::Playing {
            self.upgrade_panel_open = false;
        }
        self.engine.push_event(GameEvent::StateChanged { from, to });
    }

    /// Replace the engine with a fresh one built from the same config.
    fn reset(&mut self, to: GameState) -> bool {
        match SimulationEngine::new(self.config.clone()) {
            Ok(engine) => {
                self.engine = engine;
                self.play_time = 0.0;
                self.upgrade_panel_open = false;
                self.transition(to);
                true
            }
            Err(err) => {
                log::warn!("Restart failed: {}", err);
                false
            }
        }
    }
}
