//! Dino Run entry point
//!
//! Runs the session on a terminal: one tick per iteration, then a fixed sleep.
//! Logs go to stderr; redirect them (`2>dino-run.log`) to keep the board clean.

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use dino_run::audio::AudioManager;
use dino_run::platform::{Clock, SystemClock};
use dino_run::renderer::terminal::TerminalConsole;
use dino_run::settings::Settings;
use dino_run::sim::{GameSession, Peripherals, TickInput};

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Dino Run starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(wall_clock_seed);

    let mut audio = AudioManager::new();
    audio.set_master_volume(settings.effective_volume());
    audio.set_muted(settings.muted);

    let mut clock = SystemClock::new();
    let mut console = TerminalConsole::new(settings.key_hold_ms)?;
    let mut session = GameSession::new(seed);
    log::info!("Game initialized with seed: {}", session.seed());

    loop {
        console.poll()?;
        if console.quit_requested() {
            break;
        }

        let input = TickInput::sample(&mut console);
        let before = session.state();
        let mut io = Peripherals {
            clock: &mut clock,
            audio: &mut audio,
            display: &mut console,
        };
        session.tick(&input, &mut io);
        if session.state() != before {
            // The transition blocked on a jingle
            console.discard_pending()?;
        }

        clock.sleep_ms(settings.tick_ms);
    }

    console.restore()?;
    log::info!(
        "Dino Run exiting after {} runs (high score {}, {} tones)",
        session.runs_started(),
        session.difficulty().high_score,
        audio.played()
    );
    Ok(())
}
