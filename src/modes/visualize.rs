//! Visualization mode for watching trained agents
//!
//! Loads a trained model and displays the agent playing in a TUI. Playback
//! speed is adjustable, episodes auto-restart, and nothing fed back into the
//! agent: the display is purely presentational.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 4=very fast)
//! - Q/Esc: Quit

use std::io::{stderr, Stderr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{interval, Interval};

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction, SpeedSetting};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::rl::{load_model, QLearningAgent, SnakeEnvironment};

/// Residual exploration while visualizing, so the agent cannot wedge itself
/// into a perfectly repeating loop on screen
const VISUALIZE_EPSILON: f32 = 0.01;

impl SpeedSetting {
    /// Tick interval for this playback speed
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }
}

/// Visualization mode for watching trained agents
pub struct VisualizeMode {
    agent: QLearningAgent,
    env: SnakeEnvironment,
    renderer: Renderer,
    input_handler: InputHandler,
    metrics: GameMetrics,
    should_quit: bool,
    paused: bool,
    speed: SpeedSetting,
}

impl VisualizeMode {
    /// Load a trained model and set up the playback environment
    pub fn new(model_path: &Path, config: GameConfig) -> Result<Self> {
        let (mut agent, metadata) = load_model(model_path)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;
        agent.set_epsilon(VISUALIZE_EPSILON);

        println!("{}", "=".repeat(60));
        println!("Loaded Model Information");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", model_path);
        println!("Episodes trained: {}", metadata.episodes_trained);
        println!("Training steps: {}", metadata.training_steps);
        println!("States discovered: {}", agent.table_len());
        println!("Version: {}", metadata.version);
        println!("{}", "=".repeat(60));
        println!();
        println!("Starting visualization...");
        println!();

        let env = SnakeEnvironment::new(config);

        Ok(Self {
            agent,
            env,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            metrics: GameMetrics::new(),
            should_quit: false,
            paused: false,
            speed: SpeedSetting::Normal,
        })
    }

    /// Run the visualization loop
    ///
    /// Sets up the terminal, runs the main loop, and cleans up on exit.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_visualization_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Main visualization loop
    async fn run_visualization_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks based on speed
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        let mut done = false;

        loop {
            tokio::select! {
                // Handle keyboard input
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.paused {
                        if done {
                            // Auto-restart
                            self.metrics.on_episode_end(self.env.state().length());
                            self.env.reset();
                            done = false;
                        } else {
                            let obs = self.env.observe();
                            let action = self.agent.select_action(obs);
                            let (_, _, terminated) = self.env.step(action);
                            done = terminated;
                        }
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle keyboard events
    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::TogglePause => {
                    self.paused = !self.paused;
                }
                KeyAction::Restart => {
                    self.metrics.on_episode_end(self.env.state().length());
                    self.env.reset();
                }
                KeyAction::SetSpeed(speed) => {
                    self.speed = speed;
                    tick_timer.reset_after(self.speed.tick_interval());
                }
                KeyAction::None => {}
            }
        }
    }

    /// Cleanup terminal state
    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
