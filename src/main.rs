use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use tokio::runtime::Handle;

use offline_launcher::app::App;
use offline_launcher::backend::ManifestBackend;
use offline_launcher::event::channel;
use offline_launcher::orchestrator::Orchestrator;
use offline_launcher::service::TokioSpawner;
use offline_launcher::settings::SettingsManager;
use offline_launcher::{logging, ui, utils};

const TICK: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is configured from the settings file, so it comes up second.
    let manager = SettingsManager::new(utils::get_settings_path())
        .context("Failed to load launcher settings")?;
    let settings = manager.get().clone();

    let log_path = logging::init(&settings.logging, &utils::get_data_dir())
        .context("Failed to initialize logging")?;
    log::info!("offline-launcher {} starting", env!("CARGO_PKG_VERSION"));
    log::info!("Settings loaded from {:?}", manager.path());
    if let Some(path) = log_path {
        log::debug!("Logging to {:?}", path);
    }

    let backend = ManifestBackend::from_settings(&settings)
        .context("Failed to initialize installer backend")?;
    let (sink, events) = channel();
    let orchestrator = Orchestrator::new(
        Arc::new(backend),
        Arc::new(TokioSpawner),
        settings.install_dir.clone(),
        sink,
    );
    let mut app = App::new(orchestrator, events, settings.username.clone(), Handle::current());
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Launcher exited with error: {:?}", err);
        println!("{err:?}");
    }

    log::info!("offline-launcher stopped");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, app))?;
        handle_events(app)?;
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(TICK)? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.should_quit = true;
                return Ok(());
            }

            if app.state.notice.is_some() {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    app.dismiss_notice();
                }
                return Ok(());
            }

            match key.code {
                KeyCode::Esc => app.should_quit = true,
                KeyCode::Tab | KeyCode::Down => app.next_focus(),
                KeyCode::BackTab | KeyCode::Up => app.previous_focus(),
                KeyCode::Left => app.cycle_selection(-1),
                KeyCode::Right => app.cycle_selection(1),
                KeyCode::Enter => app.activate(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) => app.input_char(c),
                _ => {}
            }
        }
    }
    Ok(())
}
