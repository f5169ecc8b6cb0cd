mod build_info;
mod constants;
mod effects;
mod game;
mod scoreboard;
mod ui;
mod utils;

use constants::*;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use effects::color::GOOSE_COLORS;
use game::logic;
use game::types::{Game, GamePhase};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{backend::CrosstermBackend, Terminal};
use scoreboard::geo::{self, Location};
use scoreboard::store::{LocalStore, RemoteStore, ScoreStore, StoreError};
use scoreboard::types::ScoreEntry;
use scoreboard::{HighScoreBoard, HighScoreCheck, SubmitError};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use ui::game_over_scene::{self, GameOverScreen, SubmitState};
use ui::game_scene;
use ui::highscores_scene::{self, HighScoresScreen};
use ui::start_scene;
use utils::persistence;

/// Environment variable selecting a remote scoreboard service.
const API_ENV_VAR: &str = "FLAPPY_GOOSE_API";
const SETTINGS_FILE: &str = "settings.json";

enum Screen {
    Start,
    Game,
    HighScores,
}

/// Persisted player preferences.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Settings {
    goose_color: usize,
}

/// In-flight background work, polled once per frame.
#[derive(Default)]
struct Tasks {
    geo: Option<JoinHandle<Location>>,
    check: Option<JoinHandle<Result<HighScoreCheck, StoreError>>>,
    submit: Option<JoinHandle<Result<bool, SubmitError>>>,
    fetch: Option<JoinHandle<Result<Vec<ScoreEntry>, StoreError>>>,
    purge: Option<JoinHandle<Result<bool, StoreError>>>,
}

fn take_finished<T>(slot: &mut Option<JoinHandle<T>>) -> Option<T> {
    if slot.as_ref().map(|h| h.is_finished()).unwrap_or(false) {
        slot.take().and_then(|h| h.join().ok())
    } else {
        None
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!(
                    "flappy-goose {} ({})",
                    build_info::BUILD_DATE,
                    build_info::BUILD_COMMIT
                );
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Flappy Goose - Terminal Arcade Game\n");
                println!("Usage: flappy-goose [command]\n");
                println!("Commands:");
                println!("  --version  Show version information");
                println!("  --help     Show this help message\n");
                println!("Set {} to a service URL to share scores.", API_ENV_VAR);
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'flappy-goose --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    // Scoreboard backend: remote service if configured, local file otherwise.
    let store: Arc<dyn ScoreStore> = match std::env::var(API_ENV_VAR) {
        Ok(url) if !url.is_empty() => Arc::new(RemoteStore::new(url)),
        _ => Arc::new(LocalStore::new()?),
    };
    let board = HighScoreBoard::new(store);

    let mut tasks = Tasks::default();
    // Resolve the country once, off the render path.
    tasks.geo = Some(std::thread::spawn(geo::lookup));
    let mut location = Location::unknown();

    let mut settings: Settings = persistence::load_json_or_default(SETTINGS_FILE);
    settings.goose_color %= GOOSE_COLORS.len();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, board, &mut tasks, &mut location, &mut settings);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    board: HighScoreBoard,
    tasks: &mut Tasks,
    location: &mut Location,
    settings: &mut Settings,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut game = Game::new(&mut rng);
    game.goose.color = GOOSE_COLORS[settings.goose_color].1;

    let mut current_screen = Screen::Start;
    let mut go_screen = GameOverScreen::new();
    let mut hs_screen = HighScoresScreen::new();
    let mut game_over_handled = false;
    let mut last_placement = 1usize;
    let mut retry_submit = false;

    let epoch = Instant::now();
    let tick = Duration::from_millis(TICK_INTERVAL_MS);
    let mut last_frame = Instant::now();
    let mut accumulator = Duration::ZERO;

    loop {
        let now = Instant::now();
        accumulator += now - last_frame;
        last_frame = now;
        let now_ms = epoch.elapsed().as_millis() as u64;

        // Fixed-timestep simulation, decoupled from the frame rate.
        while accumulator >= tick {
            accumulator -= tick;
            if matches!(current_screen, Screen::Game) {
                logic::process_tick(&mut game, now_ms, &mut rng);
            }
        }

        poll_tasks(
            &board,
            tasks,
            location,
            &mut go_screen,
            &mut hs_screen,
            &mut last_placement,
            &mut retry_submit,
        );

        // Entering game over kicks off the leaderboard check.
        if game.phase == GamePhase::GameOver && !game_over_handled {
            game_over_handled = true;
            go_screen = GameOverScreen::new();
            retry_submit = false;
            let b = board.clone();
            let score = game.score;
            tasks.check = Some(std::thread::spawn(move || b.is_high_score(score)));
        }

        terminal.draw(|frame| {
            let area = frame.size();
            match current_screen {
                Screen::Start => start_scene::render_start(frame, area, settings.goose_color),
                Screen::HighScores => {
                    highscores_scene::render_highscores(frame, area, &hs_screen)
                }
                Screen::Game => {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Min(8), Constraint::Length(1)])
                        .split(area);
                    game_scene::render_game(frame, chunks[0], &game, now_ms);
                    game_scene::render_status_bar(frame, chunks[1], &game);
                    if game.phase == GamePhase::GameOver {
                        game_over_scene::render_game_over(
                            frame, chunks[0], &game, &go_screen, now_ms,
                        );
                    }
                }
            }
        })?;

        if !event::poll(Duration::from_millis(5))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match current_screen {
            Screen::Start => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    game.goose.color = GOOSE_COLORS[settings.goose_color].1;
                    logic::start(&mut game);
                    game_over_handled = false;
                    current_screen = Screen::Game;
                }
                KeyCode::Left => {
                    settings.goose_color =
                        (settings.goose_color + GOOSE_COLORS.len() - 1) % GOOSE_COLORS.len();
                    persistence::save_json(SETTINGS_FILE, settings).ok();
                }
                KeyCode::Right => {
                    settings.goose_color = (settings.goose_color + 1) % GOOSE_COLORS.len();
                    persistence::save_json(SETTINGS_FILE, settings).ok();
                }
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    open_highscores(&board, tasks, &mut hs_screen);
                    current_screen = Screen::HighScores;
                }
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                _ => {}
            },

            Screen::Game if game.phase == GamePhase::Playing => match key.code {
                KeyCode::Char(' ') | KeyCode::Up => logic::jump(&mut game),
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Esc => current_screen = Screen::Start,
                _ => {}
            },

            Screen::Game => {
                // Game-over overlay. Text entry owns the keyboard while open.
                if go_screen.accepting_text() {
                    match key.code {
                        KeyCode::Char(c) => go_screen.handle_char(c),
                        KeyCode::Backspace => go_screen.handle_backspace(),
                        KeyCode::Esc => go_screen.state = SubmitState::NotHighScore,
                        KeyCode::Enter => {
                            if retry_submit
                                || matches!(go_screen.state, SubmitState::Prompt { .. })
                            {
                                go_screen.state = SubmitState::Submitting;
                                let b = board.clone();
                                let name = go_screen.name.clone();
                                let score = game.score;
                                let loc = location.clone();
                                tasks.submit = Some(std::thread::spawn(move || {
                                    b.submit_score(&name, score, &loc)
                                }));
                            } else {
                                // Submission never started; retry the check.
                                go_screen.state = SubmitState::Checking;
                                let b = board.clone();
                                let score = game.score;
                                tasks.check =
                                    Some(std::thread::spawn(move || b.is_high_score(score)));
                            }
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char(' ') if game.can_restart(now_ms) => {
                            logic::start(&mut game);
                            game_over_handled = false;
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            open_highscores(&board, tasks, &mut hs_screen);
                            current_screen = Screen::HighScores;
                        }
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Esc => current_screen = Screen::Start,
                        _ => {}
                    }
                }
            }

            Screen::HighScores => {
                if hs_screen.purge_unlocked {
                    match key.code {
                        KeyCode::Esc => hs_screen.cancel_purge(),
                        KeyCode::Char(c) => {
                            if hs_screen.purge_key(c) {
                                hs_screen.cancel_purge();
                                hs_screen.loading = true;
                                let b = board.clone();
                                tasks.purge = Some(std::thread::spawn(move || b.purge_all()));
                            }
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            hs_screen.unlock_purge();
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') => hs_screen.cycle_sort(),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            open_highscores(&board, tasks, &mut hs_screen);
                        }
                        KeyCode::Char('q') | KeyCode::Esc => current_screen = Screen::Start,
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Mark the screen loading and fetch entries in the background.
fn open_highscores(board: &HighScoreBoard, tasks: &mut Tasks, hs_screen: &mut HighScoresScreen) {
    hs_screen.loading = true;
    hs_screen.error = None;
    let b = board.clone();
    tasks.fetch = Some(std::thread::spawn(move || b.fetch()));
}

/// Collect results from any finished background thread.
fn poll_tasks(
    board: &HighScoreBoard,
    tasks: &mut Tasks,
    location: &mut Location,
    go_screen: &mut GameOverScreen,
    hs_screen: &mut HighScoresScreen,
    last_placement: &mut usize,
    retry_submit: &mut bool,
) {
    if let Some(loc) = take_finished(&mut tasks.geo) {
        *location = loc;
    }

    if let Some(result) = take_finished(&mut tasks.check) {
        go_screen.state = match result {
            Ok(check) if check.is_high_score => {
                *last_placement = check.placement;
                SubmitState::Prompt {
                    placement: check.placement,
                }
            }
            Ok(_) => SubmitState::NotHighScore,
            Err(e) => {
                *retry_submit = false;
                SubmitState::Failed(format!("Couldn't reach the leaderboard: {}", e))
            }
        };
    }

    if let Some(result) = take_finished(&mut tasks.submit) {
        go_screen.state = match result {
            Ok(true) => SubmitState::Submitted {
                placement: *last_placement,
            },
            Ok(false) => SubmitState::NotHighScore,
            Err(e) => {
                *retry_submit = true;
                SubmitState::Failed(e.to_string())
            }
        };
    }

    if let Some(result) = take_finished(&mut tasks.fetch) {
        match result {
            Ok(entries) => hs_screen.set_entries(entries),
            Err(e) => hs_screen.set_error(format!("Couldn't load scores: {}", e)),
        }
    }

    if let Some(result) = take_finished(&mut tasks.purge) {
        match result {
            // Purge done; show the (now empty) board.
            Ok(_) => {
                let b = board.clone();
                tasks.fetch = Some(std::thread::spawn(move || b.fetch()));
            }
            Err(e) => hs_screen.set_error(format!("Purge failed: {}", e)),
        }
    }
}
