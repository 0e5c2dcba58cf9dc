/// Terminal rendering: the character-cell surface, overlays and HUD.
///
/// `TerminalSurface` rasterises the core's canvas draw calls into a grid of
/// character cells; `TerminalUi` holds the overlay and readout state the
/// core pushes through `GameUi`. `render` turns both into terminal commands.

use std::f64::consts::{FRAC_PI_4, PI, TAU};
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_hooligans::entities::GameStatus;
use space_hooligans::error::CollaboratorError;
use space_hooligans::hooks::{GameUi, Hud};
use space_hooligans::leaderboard::Leaderboard;
use space_hooligans::surface::{DrawSurface, Rgb, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_INTENSITY: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_PLAYER_FADED: Color = Color::DarkGrey;
const C_ENEMY: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;

/// Rows reserved above the playfield for the HUD.
const HUD_ROWS: u16 = 1;
/// Rows reserved below the playfield for the controls hint.
const HINT_ROWS: u16 = 1;
/// Anything fainter than this is not drawn.
const MIN_VISIBLE_ALPHA: f64 = 0.05;

// ── Canvas → cell surface ─────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

/// Translation, rotation and alpha, as pushed by `save`.
#[derive(Clone, Copy)]
struct DrawState {
    tx: f64,
    ty: f64,
    rot: f64,
    alpha: f64,
}

const IDENTITY: DrawState = DrawState { tx: 0.0, ty: 0.0, rot: 0.0, alpha: 1.0 };

pub struct TerminalSurface {
    canvas_width: f64,
    canvas_height: f64,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl TerminalSurface {
    pub fn new(canvas_width: f64, canvas_height: f64, term_width: u16, term_height: u16) -> Self {
        let mut surface = Self {
            canvas_width,
            canvas_height,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            state: IDENTITY,
            stack: Vec::new(),
        };
        surface.resize(term_width, term_height);
        surface
    }

    /// Fit the playfield to a new terminal size.
    pub fn resize(&mut self, term_width: u16, term_height: u16) {
        self.cols = term_width.max(1);
        self.rows = term_height.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    /// Terminal cell → canvas coordinates (cell centre).
    pub fn to_canvas(&self, column: u16, row: u16) -> (f64, f64) {
        let play_row = row.saturating_sub(HUD_ROWS).min(self.rows - 1);
        let x = (column as f64 + 0.5) / self.cols as f64 * self.canvas_width;
        let y = (play_row as f64 + 0.5) / self.rows as f64 * self.canvas_height;
        (x, y)
    }

    /// Apply the current transform to a local point.
    fn world(&self, x: f64, y: f64) -> (f64, f64) {
        let (sin, cos) = self.state.rot.sin_cos();
        (
            self.state.tx + x * cos - y * sin,
            self.state.ty + x * sin + y * cos,
        )
    }

    fn cell_of(&self, wx: f64, wy: f64) -> Option<(u16, u16)> {
        if wx < 0.0 || wy < 0.0 || wx >= self.canvas_width || wy >= self.canvas_height {
            return None;
        }
        let col = (wx / self.canvas_width * self.cols as f64) as u16;
        let row = (wy / self.canvas_height * self.rows as f64) as u16;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }

    fn plot(&mut self, wx: f64, wy: f64, ch: char, color: Color) {
        if self.state.alpha < MIN_VISIBLE_ALPHA {
            return;
        }
        if let Some((col, row)) = self.cell_of(wx, wy) {
            let idx = row as usize * self.cols as usize + col as usize;
            self.cells[idx] = Cell { ch, color };
        }
    }

    /// Fill every cell whose centre lies inside the world-space box.
    fn plot_box(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, ch: char, color: Color) {
        let cell_w = self.canvas_width / self.cols as f64;
        let cell_h = self.canvas_height / self.rows as f64;
        let mut y = y0 + cell_h / 2.0;
        let mut any = false;
        while y < y1 {
            let mut x = x0 + cell_w / 2.0;
            while x < x1 {
                self.plot(x, y, ch, color);
                any = true;
                x += cell_w;
            }
            y += cell_h;
        }
        // Smaller than one cell: still show it.
        if !any {
            self.plot((x0 + x1) / 2.0, (y0 + y1) / 2.0, ch, color);
        }
    }

    /// Write the playfield below the HUD row.
    pub fn flush_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, HUD_ROWS + row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if cell.color != current {
                    out.queue(style::SetForegroundColor(cell.color))?;
                    current = cell.color;
                }
                out.queue(Print(cell.ch))?;
            }
        }
        Ok(())
    }
}

/// Arrow glyph for a facing angle where 0 points up the screen.
fn facing_glyph(angle: f64) -> char {
    let octant = ((angle.rem_euclid(TAU) + FRAC_PI_4 / 2.0) / FRAC_PI_4) as usize % 8;
    ['▲', '◥', '►', '◢', '▼', '◣', '◄', '◤'][octant]
}

fn to_color(rgb: Rgb, alpha: f64) -> Color {
    let Rgb(r, g, b) = rgb;
    let fade = |c: u8| (c as f64 * alpha.clamp(0.0, 1.0)) as u8;
    Color::Rgb { r: fade(r), g: fade(g), b: fade(b) }
}

impl DrawSurface for TerminalSurface {
    fn clear(&mut self) {
        self.cells.fill(BLANK);
        self.state = IDENTITY;
        self.stack.clear();
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        let (wx, wy) = self.world(x, y);
        self.state.tx = wx;
        self.state.ty = wy;
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rot += radians;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn draw_image(&mut self, sprite: Sprite, x: f64, y: f64, width: f64, height: f64) {
        match sprite {
            Sprite::Player => {
                // The core draws the player rotated a half turn past its facing.
                let (cx, cy) = self.world(x + width / 2.0, y + height / 2.0);
                let glyph = facing_glyph(self.state.rot - PI);
                let color = if self.state.alpha < 0.5 { C_PLAYER_FADED } else { C_PLAYER };
                self.plot(cx, cy, glyph, color);
            }
            Sprite::Enemy => {
                let (x0, y0) = self.world(x, y);
                let (x1, y1) = self.world(x + width, y + height);
                self.plot_box(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1), '▓', C_ENEMY);
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        let (cx, cy) = self.world(x + width / 2.0, y + height / 2.0);
        let alpha = self.state.alpha;
        self.plot(cx, cy, '║', to_color(color, alpha));
    }

    fn fill_circle(&mut self, x: f64, y: f64, _radius: f64, color: Rgb) {
        let (cx, cy) = self.world(x, y);
        let alpha = self.state.alpha;
        let ch = if alpha > 0.5 { '*' } else { '·' };
        self.plot(cx, cy, ch, to_color(color, alpha));
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, _line_width: f64, color: Rgb) {
        let alpha = self.state.alpha.max(0.4);
        for i in 0..12 {
            let a = TAU * i as f64 / 12.0;
            let (wx, wy) = self.world(x + radius * a.cos(), y + radius * a.sin());
            self.plot(wx, wy, '·', to_color(color, alpha));
        }
    }
}

// ── UI collaborator ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    None,
    Menu,
    SessionRequired,
    LifeLost { remaining: u32 },
    GameOver { score: u32, high_score: u32 },
}

pub struct TerminalUi {
    pub status: GameStatus,
    pub hud: Hud,
    pub overlay: Overlay,
    pub show_leaderboard: bool,
    /// One-line notice under the overlay (payment result, submission errors).
    pub notice: Option<String>,
}

impl TerminalUi {
    pub fn new(hud: Hud) -> Self {
        Self {
            status: GameStatus::Menu,
            hud,
            overlay: Overlay::Menu,
            show_leaderboard: false,
            notice: None,
        }
    }
}

impl GameUi for TerminalUi {
    fn status_changed(&mut self, status: GameStatus, hud: &Hud) {
        self.status = status;
        self.hud = hud.clone();
        match status {
            GameStatus::Playing => {
                self.overlay = Overlay::None;
                self.show_leaderboard = false;
                self.notice = None;
            }
            GameStatus::Menu => self.overlay = Overlay::Menu,
            // Filled in by `life_lost` / `game_over`.
            GameStatus::LifeLost | GameStatus::GameOver => {}
        }
    }

    fn refresh_hud(&mut self, hud: &Hud) {
        self.hud = hud.clone();
    }

    fn life_lost(&mut self, lives_remaining: u32) {
        self.overlay = Overlay::LifeLost { remaining: lives_remaining };
    }

    fn game_over(&mut self, score: u32, high_score: u32) {
        self.overlay = Overlay::GameOver { score, high_score };
    }

    fn session_required(&mut self) {
        self.overlay = Overlay::SessionRequired;
    }

    fn score_submission_failed(&mut self, error: &CollaboratorError) {
        self.notice = Some(format!("Score not saved: {}", error));
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    surface: &TerminalSurface,
    ui: &TerminalUi,
    board: &Leaderboard,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    surface.flush_to(out)?;
    if ui.status == GameStatus::Playing {
        draw_hud(out, &ui.hud, width)?;
    }

    if ui.show_leaderboard {
        draw_leaderboard(out, board, width, height)?;
    } else {
        draw_overlay(out, ui, width, height)?;
    }
    draw_controls_hint(out, ui.status, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", hud.score_text())))?;

    let intensity = format!("Intensity {}", hud.intensity_text());
    let ix = (width / 2).saturating_sub(intensity.len() as u16 / 2);
    out.queue(cursor::MoveTo(ix, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_INTENSITY))?;
    out.queue(Print(&intensity))?;

    let lives = format!("Lives:{}", "♥".repeat(hud.lives as usize));
    let lx = width.saturating_sub(lives.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(lx, 0))?;
    // Readout glows green while the shield is up.
    out.queue(style::SetForegroundColor(if hud.invincible {
        Color::Green
    } else {
        C_HUD_LIVES
    }))?;
    out.queue(Print(&lives))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    ui: &TerminalUi,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut lines: Vec<(String, Color)> = match &ui.overlay {
        Overlay::None => return draw_notice(out, ui, width, height / 2),
        Overlay::Menu => vec![
            ("★  SPACE  HOOLIGANS  ★".into(), C_TITLE),
            (format!("Best Score: {}", ui.hud.high_score), Color::Yellow),
            ("ENTER - Start   P - Pay to play".into(), Color::White),
            ("L - Leaderboard   Q - Quit".into(), C_HINT),
        ],
        Overlay::SessionRequired => vec![
            ("╔════════════════════════╗".into(), Color::Red),
            ("║   PAYMENT  REQUIRED    ║".into(), Color::Red),
            ("╚════════════════════════╝".into(), Color::Red),
            ("P - Pay to play".into(), Color::White),
        ],
        Overlay::LifeLost { remaining } => vec![
            ("╔════════════════════╗".into(), Color::Yellow),
            ("║     LIFE  LOST     ║".into(), Color::Yellow),
            ("╚════════════════════╝".into(), Color::Yellow),
            (format!("Lives remaining: {}", remaining), Color::White),
            ("C - Continue".into(), Color::Green),
        ],
        Overlay::GameOver { score, high_score } => {
            let best_line = if score >= high_score && *score > 0 {
                format!("★ NEW BEST: {:>6} ★", high_score)
            } else {
                format!("Best Score:  {:>6}", high_score)
            };
            vec![
                ("╔════════════════════╗".into(), Color::Red),
                ("║    GAME  OVER      ║".into(), Color::Red),
                ("╚════════════════════╝".into(), Color::Red),
                (format!("Final Score: {:>6}", score), Color::Yellow),
                (best_line, Color::DarkGrey),
                ("P - Pay again   M - Menu   L - Leaderboard".into(), Color::White),
            ]
        }
    };
    if let Some(notice) = &ui.notice {
        lines.push((notice.clone(), Color::Magenta));
    }
    draw_centered(out, &lines, width, height)
}

fn draw_notice<W: Write>(out: &mut W, ui: &TerminalUi, width: u16, row: u16) -> std::io::Result<()> {
    if let Some(notice) = &ui.notice {
        let col = (width / 2).saturating_sub(notice.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(Color::Magenta))?;
        out.queue(Print(notice))?;
    }
    Ok(())
}

fn draw_leaderboard<W: Write>(
    out: &mut W,
    board: &Leaderboard,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".into(), C_BORDER),
        ("║    LEADERBOARD     ║".into(), C_TITLE),
        ("╚════════════════════╝".into(), C_BORDER),
    ];
    if board.entries.is_empty() {
        lines.push(("No players yet. Be the first to pay and play!".into(), C_HINT));
    }
    for (rank, entry) in board.ranked().take(10) {
        lines.push((
            format!(
                "{:>2}. {:<12} {:>8} pts {:>4} games",
                rank, entry.player, entry.total_score, entry.games_played
            ),
            if rank == 1 { Color::Yellow } else { Color::White },
        ));
    }
    lines.push(("L - Close".into(), C_HINT));
    draw_centered(out, &lines, width, height)
}

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, status: GameStatus, height: u16) -> std::io::Result<()> {
    let hint = match status {
        GameStatus::Playing => "MOUSE : Aim   SPACE / CLICK : Shoot   Q : Quit",
        GameStatus::LifeLost => "C : Continue   Q : Quit",
        GameStatus::Menu | GameStatus::GameOver => "ENTER : Start   P : Pay   L : Leaderboard   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
