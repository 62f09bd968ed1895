use std::{
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use space_shooter::{
    App, GameConfig,
    config::{DEFAULT_FPS, DEFAULT_LOG_FILE},
};

#[derive(Parser, Debug)]
#[command(name = "space-shooter")]
#[command(about = "Arcade space shooter for the terminal")]
struct Args {
    /// Simulation steps per second
    #[arg(long, env = "SHOOTER_FPS", default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Seed for enemy placement, random when omitted
    #[arg(long, env = "SHOOTER_SEED")]
    seed: Option<u64>,

    /// Draw each body's velocity vector
    #[arg(long, env = "SHOOTER_SHOW_VELOCITY")]
    show_velocity: bool,

    /// How long a key stays held on terminals that never report key releases
    #[arg(long, env = "SHOOTER_KEY_HOLD_MS", default_value_t = 300)]
    key_hold_ms: u64,

    /// Where log lines go, since stdout is the game screen
    #[arg(long, env = "SHOOTER_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

impl Args {
    fn config(&self) -> GameConfig {
        GameConfig {
            update_rate: self.fps,
            seed: self.seed.unwrap_or_else(rand::random),
            show_velocity: self.show_velocity,
            key_hold: Duration::from_millis(self.key_hold_ms),
            ..GameConfig::default()
        }
    }
}

fn init_tracing(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = args.config();
    tracing::info!(
        fps = config.update_rate,
        seed = config.seed,
        "starting space shooter"
    );

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    tracing::info!(supports_keyboard_enhancement, "terminal capabilities");

    // Raw mode + alternate screen; restored below whatever the loop returns
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Flags must be pushed after entering the alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(config, supports_keyboard_enhancement).run(&mut terminal);
    if let Err(err) = &result {
        tracing::error!(error = %err, "game loop failed");
    }

    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
