mod display;

use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use space_hooligans::entities::GameStatus;
use space_hooligans::hooks::{Collaborators, InputProvider, PaymentSession};
use space_hooligans::leaderboard::LocalLeaderboard;
use space_hooligans::scheduler::FrameScheduler;
use space_hooligans::session::{unix_now, LocalSession};
use space_hooligans::{Game, GameConfig};

use display::{Overlay, TerminalSurface, TerminalUi};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

#[derive(Parser, Debug)]
#[command(name = "space_hooligans", about = "Pay-to-play arcade shooter for the terminal")]
struct Args {
    /// JSON file overriding game tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write logs (the terminal itself is the game screen).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Name recorded on the leaderboard.
    #[arg(long, default_value = "player")]
    player: String,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("space_hooligans"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn init_logging(path: PathBuf) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path).with_context(|| format!("creating log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Latest pointer position and pending fire presses, fed from terminal events.
struct TerminalInput {
    pointer: (f64, f64),
    fire: u32,
}

impl InputProvider for TerminalInput {
    fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    fn take_fire_events(&mut self) -> u32 {
        std::mem::take(&mut self.fire)
    }
}

/// One-shot requests from the keyboard, applied after events are drained.
enum Command {
    Start,
    Continue,
    Pay,
    Menu,
    ToggleLeaderboard,
    Quit,
}

fn command_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Start),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Continue),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pay),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::Menu),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(Command::ToggleLeaderboard),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

struct Host {
    game: Game,
    scheduler: FrameScheduler,
    session: LocalSession,
    leaderboard: LocalLeaderboard,
    ui: TerminalUi,
    input: TerminalInput,
    surface: TerminalSurface,
    rng: StdRng,
    player: String,
}

fn game_loop<W: Write>(
    out: &mut W,
    host: &mut Host,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let clock = Instant::now();
    let (mut width, mut height) = terminal::size()?;

    loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut commands = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) => {
                    if code == KeyCode::Char(' ') {
                        host.input.fire += 1;
                    } else if let Some(cmd) = command_for(code, modifiers) {
                        commands.push(cmd);
                    }
                }
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    host.input.pointer = host.surface.to_canvas(column, row);
                    if kind == MouseEventKind::Down(MouseButton::Left) {
                        host.input.fire += 1;
                    }
                }
                Event::Resize(w, h) => {
                    width = w;
                    height = h;
                    host.surface.resize(w, h);
                }
                _ => {}
            }
        }

        for cmd in commands {
            match cmd {
                Command::Quit => return Ok(()),
                Command::Pay => {
                    match host.session.pay(&host.player, unix_now()) {
                        Ok(()) => {
                            host.ui.notice = Some(format!(
                                "Payment recorded: {} lives ready",
                                host.session.lives_granted()
                            ));
                        }
                        Err(e) => {
                            warn!("payment failed: {}", e);
                            host.ui.notice = Some(format!("Payment failed: {}", e));
                        }
                    }
                    if host.ui.overlay == Overlay::SessionRequired {
                        host.ui.overlay = Overlay::Menu;
                    }
                }
                Command::ToggleLeaderboard => host.ui.show_leaderboard = !host.ui.show_leaderboard,
                Command::Start | Command::Continue | Command::Menu => {
                    let mut io = Collaborators {
                        session: &mut host.session,
                        scores: &mut host.leaderboard,
                        ui: &mut host.ui,
                    };
                    match cmd {
                        Command::Start => {
                            if let Err(e) = host.game.start_game(&mut io) {
                                info!("start refused: {}", e);
                            }
                        }
                        Command::Continue => {
                            host.game.continue_game(now_ms, &mut io);
                        }
                        _ => {
                            host.game.return_to_menu(&mut io);
                        }
                    }
                }
            }
        }

        {
            let mut io = Collaborators {
                session: &mut host.session,
                scores: &mut host.leaderboard,
                ui: &mut host.ui,
            };
            host.scheduler.run_frame(
                &mut host.game,
                now_ms,
                &mut host.input,
                &mut io,
                &mut host.surface,
                &mut host.rng,
            );
        }

        // Keep the menu's best score current between games.
        if host.game.status() != GameStatus::Playing {
            host.ui.hud.high_score = host.game.high_score();
        }

        display::render(out, &host.surface, &host.ui, host.leaderboard.board(), width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir().join("space_hooligans.log"));
    init_logging(log_file)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => GameConfig::default(),
    };

    let (width, height) = terminal::size()?;
    let game = Game::new(config.clone());
    let mut host = Host {
        ui: TerminalUi::new(game.hud()),
        scheduler: FrameScheduler::new(config.max_frame_ms),
        session: match LocalSession::default_path() {
            Some(path) => LocalSession::open(&path, config.default_lives, unix_now()),
            None => LocalSession::in_memory(config.default_lives),
        },
        leaderboard: LocalLeaderboard::open(&args.player, LocalLeaderboard::default_path()),
        input: TerminalInput {
            pointer: (config.canvas_width / 2.0, 0.0),
            fire: 0,
        },
        surface: TerminalSurface::new(config.canvas_width, config.canvas_height, width, height),
        rng: match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        },
        player: args.player.clone(),
        game,
    };
    info!(player = %host.player, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut host, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("game loop failed: {:#}", e);
    }
    result
}
