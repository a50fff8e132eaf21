use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use crossterm::execute;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use filterpop::action::Action;
use filterpop::components::Component;
use filterpop::config::{Config, Mode};
use filterpop::dialog::FilterPopover;
use filterpop::store::{TableSeed, TableStore};
use filterpop::tui::Event as TuiEvent;
use color_eyre::Result;
use tracing::{debug, error, info, warn};

const DEMO_STATE: &str = include_str!("../../demo/payments.json");

/// Interactive filter builder over a column set
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON file with `columns` and `filters` to start from (defaults to a built-in demo)
    #[arg(long = "state", value_name = "PATH")]
    state: Option<PathBuf>,
    /// Print the final filter list as JSON on exit
    #[arg(long = "print")]
    print: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel { Error, Warn, Info, Debug, Trace }

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let cwd = std::env::current_dir()?;
    let level = match args.logging {
        Some(LogLevel::Error) => Some(tracing::Level::ERROR),
        Some(LogLevel::Warn)  => Some(tracing::Level::WARN),
        Some(LogLevel::Info)  => Some(tracing::Level::INFO),
        Some(LogLevel::Debug) => Some(tracing::Level::DEBUG),
        Some(LogLevel::Trace) => Some(tracing::Level::TRACE),
        None => None,
    };
    filterpop::logging::init_with(Some(cwd.join("filterpop.log")), level)?;

    let config = match Config::from_path(args.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Falling back to built-in config: {e}");
            Config::embedded()?
        }
    };

    let mut store = match &args.state {
        Some(path) => TableStore::from_path(path)?,
        None => TableStore::from_seed(serde_json::from_str::<TableSeed>(DEMO_STATE)?),
    };
    info!("Loaded {} columns and {} filters", store.columns().len(), store.filters().len());

    let mut popover = FilterPopover::new();
    popover.register_config_handler(config.clone())?;
    popover.register_action_handler(store.dispatcher())?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut popover, &mut store, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    if let Err(e) = res {
        error!("Error: {e}");
        return Err(color_eyre::eyre::eyre!("{e:#}"));
    }

    if args.print {
        println!("{}", serde_json::to_string_pretty(store.filters())?);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    popover: &mut FilterPopover,
    store: &mut TableStore,
    config: &Config,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let size = f.area();
            let [_toolbar, body] = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(size);
            draw_summary(f, body, store);
            // popover last so it overlays the summary
            if let Err(e) = popover.draw(f, size, store) {
                error!("Error drawing filter popover: {e}");
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            let Some(tui_event) = TuiEvent::from_crossterm(event::read()?) else {
                continue;
            };
            if let TuiEvent::Key(key_event) = &tui_event {
                let ctrl_c = key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL);
                // while open the popover decides what the quit key means
                if ctrl_c || (!popover.is_open()
                    && config.action_for_key(Mode::Global, *key_event) == Some(Action::Quit))
                {
                    break;
                }
            }
            match popover.handle_events(Some(tui_event), store) {
                Ok(Some(action)) => debug!("Unhandled action: {action}"),
                Ok(None) => {}
                Err(e) => error!("Error handling event: {e}"),
            }
        }
        let changed = store.process_pending();
        if changed > 0 {
            debug!("Applied {changed} filter updates");
        }
    }
    Ok(())
}

fn draw_summary(f: &mut ratatui::Frame, area: ratatui::layout::Rect, store: &TableStore) {
    let mut lines: Vec<Line> = Vec::new();
    let headings: Vec<&str> = store.columns().iter().map(|c| c.heading.as_str()).collect();
    lines.push(Line::styled(format!("Columns: {}", headings.join(", ")), Style::default().fg(Color::DarkGray)));
    lines.push(Line::from(""));
    if store.filters().is_empty() {
        lines.push(Line::from("All rows shown."));
    }
    for (i, entry) in store.filters().iter().enumerate() {
        let prefix = if i == 0 { "Where" } else { "And" };
        lines.push(Line::from(format!("{prefix} {}", entry.summary())));
    }
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Active filters"));
    f.render_widget(paragraph, area);
}
