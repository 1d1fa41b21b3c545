use std::io;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::widgets::Block;
use tracing::{error, info, warn};

use fasttype::app::{App, AppScreen};
use fasttype::config::{Config, Overrides};
use fasttype::event::{AppEvent, EventHandler, TICK_RATE};
use fasttype::logging;
use fasttype::store::json_store::JsonStore;
use fasttype::ui::components::key_stats::KeyStatsView;
use fasttype::ui::components::nav::{HelpFooter, NavBar};
use fasttype::ui::components::settings::SettingsView;
use fasttype::ui::components::typing_area::TypingArea;
use fasttype::ui::layout::{self, AppLayout};
use fasttype::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "fasttype", version, about = "Fast and minimal terminal typing trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Keyboard scheme (qwerty, dvorak, colemak)")]
    scheme: Option<String>,

    #[arg(short, long, help = "Number of words per run")]
    words: Option<usize>,

    #[arg(long, help = "Forget all recorded key stats before starting")]
    reset_stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up before the config is read so load warnings are kept.
    let log_level = match logging::init(&logging::log_path(), logging::STARTUP_LEVEL) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("logging disabled: {e}");
            None
        }
    };
    info!(version = env!("CARGO_PKG_VERSION"), "starting fasttype");

    let config = Config::load();
    if let Some(handle) = &log_level {
        if let Err(e) = handle.set_level(&config.log_level) {
            warn!(error = %e, "keeping startup log level");
        }
    }

    let overrides = Overrides {
        theme: cli.theme,
        keyboard_scheme: cli.scheme,
        word_count: cli.words,
    };

    // Resolve the theme before the first frame so nothing flashes in the
    // wrong colours.
    let theme = Theme::resolve(&config.with_overrides(&overrides).theme);

    let store = match JsonStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "key stats will not be saved");
            None
        }
    };

    let mut app = App::new(config, &overrides, theme, store);
    if cli.reset_stats {
        app.reset_stats();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result =
        EventHandler::new(TICK_RATE).and_then(|events| run_app(&mut terminal, &mut app, &events));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "fasttype exited with an error");
        eprintln!("Error: {err:?}");
    }
    app.save_stats();
    info!("bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| render(frame, app, now))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Only presses count; repeats would inflate the stats and releases are
    // not reported by every terminal.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if let KeyCode::Char(ch) = key.code {
        app.press_key(&ch.to_string(), now);
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key, now),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.go_to_settings(),
        KeyCode::Enter => app.new_run(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch, now),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, now: Instant) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let app_layout = AppLayout::new(area);

    let mut status = format!(
        "{:.0} WPM  {:.0}%",
        app.practice.wpm_at(now),
        app.practice.progress() * 100.0
    );
    if let Some(last) = app.last_wpm {
        status.push_str(&format!("  (last {last:.0})"));
    }
    frame.render_widget(NavBar::new(&app.theme).status(status), app_layout.nav);

    match app.screen {
        AppScreen::Practice => {
            frame.render_widget(TypingArea::new(&app.practice, &app.theme), app_layout.typing);
        }
        AppScreen::Settings => {
            let centered = layout::centered_rect(60, 80, app_layout.typing);
            frame.render_widget(
                SettingsView::new(&app.config, app.settings_selected, &app.theme),
                centered,
            );
        }
    }

    if let Some(keyboard_area) = app_layout.keyboard {
        let view = KeyStatsView::new(&app.keyboard, &app.key_stats, app.formula(), &app.theme, now);
        frame.render_widget(view, keyboard_area);
    }

    let hints = match app.screen {
        AppScreen::Practice => " [ESC] Quit  [Tab] Settings  [Enter] New words  [Backspace] Delete ",
        AppScreen::Settings => " [ESC] Save & back ",
    };
    frame.render_widget(HelpFooter::new(hints, &app.theme), app_layout.footer);
}
