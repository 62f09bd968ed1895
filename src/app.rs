use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::entities::GameState;
use crate::input::{InputAction, InputHandler, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::timestep::FixedTimestep;
use crate::world::World;

/// How long the loop sleeps between frames to avoid spinning the CPU
const FRAME_SLEEP: Duration = Duration::from_millis(4);

/// Terminal front end: owns the world and turns real time and key events into steps and frames.
pub struct App {
    running: bool,
    paused: bool,
    world: World,
    timestep: FixedTimestep,
    last_frame_time: Instant,
    fps: u32,
    /// Something changed since the last draw
    dirty: bool,
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// `reports_key_release` tells whether the terminal sends release events; when
    /// it does not, held keys time out after `config.key_hold`.
    pub fn new(config: GameConfig, reports_key_release: bool) -> Self {
        let hold_timeout = (!reports_key_release).then_some(config.key_hold);
        let timestep = FixedTimestep::new(config.step());
        let renderer = GameRenderer::new(config.show_velocity);
        let world =
            World::new(config).with_input(InputHandler::default().with_hold_timeout(hold_timeout));

        Self {
            running: true,
            paused: false,
            world,
            timestep,
            last_frame_time: Instant::now(),
            fps: 0,
            dirty: true,
            input_manager: InputManager::new(),
            renderer,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn game_state(&self) -> GameState {
        if self.paused {
            GameState::Paused
        } else if self.world.is_game_over() {
            GameState::GameOver
        } else {
            GameState::Playing
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            let game_state = self.game_state();
            self.input_manager
                .poll_events(game_state, self.world.input_mut())?;
            let actions = self.input_manager.take_actions();
            self.process_actions(&actions);

            let now = Instant::now();
            self.world.input_mut().expire_stale(now);
            self.advance(now);

            if self.dirty {
                self.measure_fps(now);
                let view = RenderView {
                    game_state: self.game_state(),
                    world: &self.world,
                    fps: self.fps,
                };
                terminal.draw(|frame| self.renderer.render(frame, &view))?;
                self.dirty = false;
            }

            std::thread::sleep(FRAME_SLEEP);
        }

        tracing::info!(
            high_score = self.world.stats().high_score,
            steps = self.timestep.total_steps(),
            "quitting"
        );
        Ok(())
    }

    /// Runs the fixed steps covered by the time since the previous frame.
    /// Returns how many ran; none while paused.
    pub fn advance(&mut self, now: Instant) -> u32 {
        if self.paused {
            return 0;
        }

        let world = &mut self.world;
        let steps = self.timestep.tick(now, |dt| world.update(dt));
        if steps > 0 {
            self.dirty = true;
        }
        steps
    }

    /// Process input actions and update game state accordingly
    pub fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Pause => {
                    self.paused = true;
                    self.world.input_mut().release_all();
                    tracing::info!("paused");
                }
                InputAction::Resume => {
                    self.paused = false;
                    // Time spent paused is not simulated
                    self.timestep.reset_clock();
                    tracing::info!("resumed");
                }
            }
            self.dirty = true;
        }
    }

    fn measure_fps(&mut self, now: Instant) {
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        if frame_time.as_micros() > 0 {
            self.fps = (1_000_000 / frame_time.as_micros()) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(GameConfig::default(), true)
    }

    #[test]
    fn test_new_app_is_playing() {
        let app = app();
        assert!(app.is_running());
        assert_eq!(app.game_state(), GameState::Playing);
    }

    #[test]
    fn test_advance_runs_fixed_steps() {
        let mut app = app();
        let start = Instant::now();
        assert_eq!(app.advance(start), 0);
        assert_eq!(app.advance(start + Duration::from_millis(100)), 6);
        assert_eq!(app.world().stats().loop_count, 6);
    }

    #[test]
    fn test_pause_stops_simulation() {
        let mut app = app();
        let start = Instant::now();
        app.advance(start);

        app.process_actions(&[InputAction::Pause]);
        assert_eq!(app.game_state(), GameState::Paused);
        assert_eq!(app.advance(start + Duration::from_secs(10)), 0);

        app.process_actions(&[InputAction::Resume]);
        assert_eq!(app.game_state(), GameState::Playing);
        // The paused time is dropped, the clock restarts
        assert_eq!(app.advance(start + Duration::from_secs(11)), 0);
        assert_eq!(app.world().stats().loop_count, 0);
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut app = app();
        app.process_actions(&[InputAction::Quit]);
        assert!(!app.is_running());

        // The loop exits before doing anything
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
        assert!(app.run(&mut terminal).is_ok());
    }
}
