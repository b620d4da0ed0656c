use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sweeper_core::{Coord2, Game, GameConfig, GameStatus};
use sweeper_surface::{PointerButtons, STATUS_LOST, STATUS_WON};
use sweeper_vision::{BoardMonitor, BoardReading, VisionConfig, draw_boxes, draw_grid, reconstruct};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Invokes cell buttons in-process.
    Direct,
    /// Clicks cell centres through the desktop and reads every frame back.
    Pixel,
    /// Direct play that reports the reconstructed board whenever it changes.
    Monitor,
}

impl Strategy {
    const fn clicks(self) -> bool {
        matches!(self, Self::Pixel)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Task {
    StartGame,
    PlayBatch,
}

/// Substring checks on the status line decide when a game is over.
fn status_from_text(text: &str) -> GameStatus {
    const WIN_MARKER: &str = "Win";
    const LOSS_MARKER: &str = "Over";
    debug_assert!(STATUS_WON.contains(WIN_MARKER) && STATUS_LOST.contains(LOSS_MARKER));

    if text.contains(WIN_MARKER) {
        GameStatus::Won
    } else if text.contains(LOSS_MARKER) {
        GameStatus::Lost
    } else {
        GameStatus::InProgress
    }
}

pub struct Bot<D> {
    desktop: D,
    strategy: Strategy,
    game_config: GameConfig,
    agent: AgentConfig,
    vision: VisionConfig,
    events: EventLoop<Task>,
    rng: SmallRng,
    stats: Stats,
    debug: DebugArtifacts,
    monitor: BoardMonitor,
    last_reading: Option<BoardReading>,
    game_number: u32,
}

impl<D: Desktop> Bot<D> {
    pub fn new(desktop: D, strategy: Strategy, config: &BotConfig, pacing: Pacing) -> Self {
        let seed = config.agent.seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("Bot seed: {}", seed);
        Self {
            desktop,
            strategy,
            game_config: config.game,
            agent: config.agent.clone(),
            vision: config.vision.clone(),
            events: EventLoop::new(pacing),
            rng: SmallRng::seed_from_u64(seed),
            stats: Stats::default(),
            debug: DebugArtifacts::disabled(),
            monitor: BoardMonitor::new(),
            last_reading: None,
            game_number: 0,
        }
    }

    pub fn with_debug(mut self, debug: DebugArtifacts) -> Self {
        self.debug = debug;
        self
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn last_reading(&self) -> Option<&BoardReading> {
        self.last_reading.as_ref()
    }

    /// Plays games until the loop is stopped or runs out of work.
    pub fn run(&mut self) -> sweeper_core::Result<Stats> {
        log::info!("Starting {:?} agent on {:?}", self.strategy, self.game_config);
        self.events.after(std::time::Duration::ZERO, Task::StartGame);

        while let Some(task) = self.events.next_task() {
            match task {
                Task::StartGame => self.start_game()?,
                Task::PlayBatch => self.play_batch()?,
            }
        }

        log::info!("Stopped. {}", self.stats);
        Ok(self.stats)
    }

    fn start_game(&mut self) -> sweeper_core::Result<()> {
        self.events.cancel_all();
        self.game_number += 1;

        let game = Game::random(self.game_config, self.rng.random())?;
        self.desktop.close();
        self.desktop.open(game);
        self.monitor.reset();
        self.last_reading = None;
        log::info!("Game {} started", self.game_number);

        if self.strategy.clicks() {
            self.save_artifacts("start");
        }
        self.events.after(self.agent.start_delay(), Task::PlayBatch);
        Ok(())
    }

    fn play_batch(&mut self) -> sweeper_core::Result<()> {
        if self.strategy.clicks() && self.desktop.key_pressed(self.agent.exit_key) {
            log::info!("Exit key '{}' pressed", self.agent.exit_key);
            self.events.stop();
            return Ok(());
        }

        for _ in 0..self.agent.num_moves {
            let Some(surface) = self.desktop.surface() else {
                log::warn!("Game window disappeared, stopping");
                self.events.stop();
                return Ok(());
            };

            let (rows, cols) = surface.size();
            let coords: Coord2 = (self.rng.random_range(0..rows), self.rng.random_range(0..cols));
            if surface.is_pressed(coords) {
                continue;
            }

            self.perform_move(coords)?;
            self.observe_board();

            let status = self
                .desktop
                .surface()
                .map_or(GameStatus::InProgress, |surface| status_from_text(surface.status_text()));
            if status.is_finished() {
                self.finish_game(status);
                return Ok(());
            }
            self.events.pause(self.agent.delay());
        }

        self.events.after(self.agent.batch_delay(), Task::PlayBatch);
        Ok(())
    }

    fn perform_move(&mut self, coords: Coord2) -> sweeper_core::Result<()> {
        log::debug!("Move at {:?}", coords);
        if self.strategy.clicks() {
            let Some(surface) = self.desktop.surface() else {
                return Ok(());
            };
            let (x, y) = surface.layout().cell_center(coords);
            match self.desktop.click(x, y, PointerButtons::LEFT) {
                Ok(()) => return Ok(()),
                Err(err) => log::warn!("{}, activating directly", err),
            }
        }

        if let Some(surface) = self.desktop.surface_mut() {
            surface.activate(coords)?;
        }
        Ok(())
    }

    /// Best-effort vision pass; its output is logged, never acted on.
    fn observe_board(&mut self) {
        if self.strategy == Strategy::Direct {
            return;
        }

        let frame = match self.desktop.capture() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Capture failed: {}", err);
                return;
            }
        };
        let reading = reconstruct(&frame, &self.vision).reading;

        match self.strategy {
            Strategy::Monitor => {
                if let Some(text) = self.monitor.observe(&reading) {
                    log::info!("Board changed:\n{}", text);
                }
            }
            _ => log::debug!("Reconstructed board:\n{}", reading),
        }
        self.last_reading = Some(reading);
    }

    fn finish_game(&mut self, status: GameStatus) {
        self.stats.record(status);
        log::info!("Game {} {:?}. {}", self.game_number, status, self.stats);

        if self.strategy.clicks() {
            self.save_artifacts("end");
        }

        if self
            .agent
            .max_games
            .is_some_and(|max_games| self.stats.games >= max_games)
        {
            log::info!("Reached {} games", self.stats.games);
            self.events.stop();
            return;
        }
        self.events.after(self.agent.restart_delay(), Task::StartGame);
    }

    fn save_artifacts(&self, stage: &str) {
        if !self.debug.is_enabled() {
            return;
        }
        let frame = match self.desktop.capture() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Capture for {} artifact failed: {}", stage, err);
                return;
            }
        };
        let result = reconstruct(&frame, &self.vision);
        let game = self.game_number;
        let saved = self
            .debug
            .save(stage, game, frame.to_rgb_image())
            .and_then(|_| {
                let mask = result.segmentation.mask.clone();
                self.debug.save(&format!("{stage}_threshold"), game, mask)
            })
            .and_then(|_| {
                let boxes = draw_boxes(&frame, &result.segmentation.cells);
                self.debug.save(&format!("{stage}_cells"), game, boxes)
            })
            .and_then(|_| {
                let rows = draw_grid(&frame, &result.grid);
                self.debug.save(&format!("{stage}_grid"), game, rows)
            });
        if let Err(err) = saved {
            log::warn!("Could not save {} artifact: {}", stage, err);
        }
    }
}
