use crate::config::{Settings, Theme};
use crate::model::{GameState, Screen, Side};
use crate::timer::Urgency;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Right half of a double-width glyph; never printed.
const WIDE_TAIL: char = '\0';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, fg: Color, bg: Color) {
        self.cells.fill(Cell { ch: ' ', fg, bg });
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn bell(&mut self) -> anyhow::Result<()> {
        queue!(self.out, Print('\x07'))?;
        self.out.flush()?;
        Ok(())
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c.ch == WIDE_TAIL || (diff_only && c == self.prev.cells[i]) {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Theme palette
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) accent: Color,
    pub(crate) good: Color,
    pub(crate) bad: Color,
    pub(crate) warn: Color,
    pub(crate) dim: Color,
}

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::DarkBlue,
                good: Color::DarkGreen,
                bad: Color::DarkRed,
                warn: Color::DarkYellow,
                dim: Color::DarkGrey,
            },
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                accent: Color::Cyan,
                good: Color::Green,
                bad: Color::Red,
                warn: Color::Yellow,
                dim: Color::Grey,
            },
        }
    }

    /// Swapped foreground/background, used for the haptic flash.
    pub(crate) fn inverted(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
            ..self
        }
    }
}

/// Whether a vibration pattern (alternating on/off ms) is "on" at `elapsed_ms`.
pub(crate) fn vibration_on(pattern: &[u64], elapsed_ms: u64) -> bool {
    let mut t = elapsed_ms;
    for (i, seg) in pattern.iter().enumerate() {
        if t < *seg {
            return i % 2 == 0;
        }
        t -= seg;
    }
    false
}

/* -----------------------------
   Text helpers
------------------------------ */

fn is_wide(ch: char) -> bool {
    matches!(ch as u32, 0x1F300..=0x1FAFF)
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    let mut xx = x;
    for ch in s.chars() {
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
        xx = xx.saturating_add(1);
        if is_wide(ch) {
            buf.set(xx, y, Cell { ch: WIDE_TAIL, fg, bg });
            xx = xx.saturating_add(1);
        }
    }
}

fn draw_centered(buf: &mut CellBuffer, y: u16, s: &str, fg: Color, bg: Color) {
    let len = s.chars().count() as u16;
    let x = buf.w.saturating_sub(len) / 2;
    draw_text(buf, x, y, s, fg, bg);
}

/// Greedy word wrap on character count.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn bar(percent: u8, width: usize) -> String {
    let fill = (percent.min(100) as usize * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { '░' });
    }
    s.push(']');
    s
}

pub(crate) fn draw_box(
    buf: &mut CellBuffer,
    x0: u16,
    y0: u16,
    bw: u16,
    bh: u16,
    fg: Color,
    bg: Color,
) {
    if bw < 2 || bh < 2 {
        return;
    }
    let x1 = x0 + bw - 1;
    let y1 = y0 + bh - 1;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let ch = match (x == x0, x == x1, y == y0, y == y1) {
                (true, _, true, _) => '┌',
                (_, true, true, _) => '┐',
                (true, _, _, true) => '└',
                (_, true, _, true) => '┘',
                (_, _, true, _) | (_, _, _, true) => '─',
                (true, _, _, _) | (_, true, _, _) => '│',
                _ => ' ',
            };
            buf.set(x, y, Cell { ch, fg, bg });
        }
    }
}

fn draw_center_box(buf: &mut CellBuffer, pal: &Palette, title: &str, body: &str) {
    let bw = buf.w.saturating_sub(4).min(60);
    let inner = bw.saturating_sub(4) as usize;
    let lines: Vec<String> = body
        .lines()
        .flat_map(|l| {
            let wrapped = wrap(l, inner);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped
            }
        })
        .collect();
    let bh = (lines.len() as u16 + 4).min(buf.h.saturating_sub(2));
    if bw < 2 || bh < 3 {
        return;
    }

    let x0 = buf.w.saturating_sub(bw) / 2;
    let y0 = buf.h.saturating_sub(bh) / 2;
    draw_box(buf, x0, y0, bw, bh, pal.accent, pal.bg);
    draw_text(buf, x0 + 2, y0 + 1, title, pal.accent, pal.bg);

    for (i, line) in lines.iter().enumerate() {
        let yy = y0 + 3 + i as u16;
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, pal.fg, pal.bg);
    }
}

/* -----------------------------
   Screens
------------------------------ */

pub(crate) fn draw_screen(buf: &mut CellBuffer, st: &GameState, pal: &Palette) {
    buf.clear(pal.fg, pal.bg);

    match st.screen {
        Screen::Menu => draw_menu(buf, pal),
        Screen::Difficulty => draw_difficulty(buf, pal),
        Screen::Instructions => draw_instructions(buf, pal),
        Screen::Settings => draw_settings(buf, st, &st.settings, pal),
        Screen::Game => draw_game(buf, st, pal),
        Screen::Result => draw_result(buf, st, pal),
    }

    let help = match st.screen {
        Screen::Menu => "Enter bắt đầu | i hướng dẫn | o cài đặt | q thoát",
        Screen::Difficulty => "1 dễ | 2 trung bình | 3 khó | esc quay lại",
        Screen::Instructions => "Enter chơi ngay | esc quay lại",
        Screen::Settings => "↑↓ chọn | enter đổi | esc quay lại",
        Screen::Game => "← / 1 ảnh trái | → / 2 ảnh phải | esc về menu",
        Screen::Result => "r chơi lại | m menu | q thoát",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, pal.dim, pal.bg);

    if st.loading {
        draw_center_box(buf, pal, "Đang tải...", "Chuẩn bị câu hỏi");
    }
}

fn draw_menu(buf: &mut CellBuffer, pal: &Palette) {
    let y = buf.h / 3;
    draw_centered(buf, y, "AN TOÀN THỰC PHẨM", pal.accent, pal.bg);
    draw_centered(buf, y + 1, "Chọn đúng hình ảnh an toàn trước khi hết giờ", pal.fg, pal.bg);
    let items = ["[Enter] Bắt đầu", "[I] Hướng dẫn", "[O] Cài đặt", "[Q] Thoát"];
    for (i, item) in items.iter().enumerate() {
        draw_centered(buf, y + 3 + i as u16, item, pal.fg, pal.bg);
    }
}

fn draw_difficulty(buf: &mut CellBuffer, pal: &Palette) {
    let y = buf.h / 3;
    draw_centered(buf, y, "Chọn độ khó", pal.accent, pal.bg);
    for (i, d) in crate::model::Difficulty::ALL.iter().enumerate() {
        let line = format!("[{}] {} ({} câu)", i + 1, d.label(), d.total_questions());
        draw_centered(buf, y + 2 + i as u16, &line, pal.fg, pal.bg);
    }
}

fn draw_instructions(buf: &mut CellBuffer, pal: &Palette) {
    draw_center_box(
        buf,
        pal,
        "Hướng dẫn",
        "Mỗi câu hỏi có hai hình ảnh. Chọn hình an toàn hoặc chính hãng.\n\
         Bạn có 10 giây cho mỗi câu.\n\
         Trả lời đúng: 10 điểm cộng số giây còn lại.\n\
         Hết giờ được tính là trả lời sai.",
    );
}

pub(crate) fn draw_settings(
    buf: &mut CellBuffer,
    st: &GameState,
    settings: &Settings,
    pal: &Palette,
) {
    let on_off = |b: bool| if b { "Bật" } else { "Tắt" };
    let theme = match settings.theme {
        Theme::Light => "Sáng",
        Theme::Dark => "Tối",
    };
    let rows = [
        format!("Âm thanh: {}", on_off(settings.sound)),
        format!("Rung: {}", on_off(settings.vibration)),
        format!("Giao diện: {theme}"),
    ];

    let y = buf.h / 3;
    draw_centered(buf, y, "Cài đặt", pal.accent, pal.bg);
    for (i, row) in rows.iter().enumerate() {
        let selected = i == st.settings_cursor;
        let line = format!("{} {}", if selected { ">" } else { " " }, row);
        let fg = if selected { pal.accent } else { pal.fg };
        draw_text(buf, buf.w.saturating_sub(24) / 2, y + 2 + i as u16, &line, fg, pal.bg);
    }
}

fn draw_game(buf: &mut CellBuffer, st: &GameState, pal: &Palette) {
    let Some(view) = st.current.as_ref() else {
        return;
    };

    let timer_fg = match st.timer.urgency() {
        Urgency::Normal => pal.fg,
        Urgency::Warning => pal.warn,
        Urgency::Danger => pal.bad,
    };
    let header = format!(
        "Câu {}/{} [{}]  |  Điểm: {}",
        view.number,
        view.total,
        view.category.code(),
        view.score
    );
    draw_text(buf, 1, 0, &header, pal.fg, pal.bg);
    let timer = format!("Thời gian: {:>2}s", st.timer_remaining());
    let timer_x = buf.w.saturating_sub(timer.chars().count() as u16 + 1);
    draw_text(buf, timer_x, 0, &timer, timer_fg, pal.bg);

    let bar_w = buf.w.saturating_sub(4) as usize;
    draw_text(buf, 1, 1, &bar(view.progress_percent, bar_w.saturating_sub(2)), pal.accent, pal.bg);

    let mut y = 3;
    for line in wrap(&view.prompt, buf.w.saturating_sub(4) as usize) {
        draw_centered(buf, y, &line, pal.fg, pal.bg);
        y += 1;
    }

    let gap = 2;
    let card_w = (buf.w.saturating_sub(gap + 4) / 2).max(12);
    let card_h = 7;
    let top = y + 1;
    let left_x = 2;
    let right_x = left_x + card_w + gap;

    for (side, x, label, path) in [
        (Side::Left, left_x, "[1] ←", view.true_image),
        (Side::Right, right_x, "[2] →", view.false_image),
    ] {
        let border = card_color(st, side, pal);
        draw_box(buf, x, top, card_w, card_h, border, pal.bg);
        draw_text(buf, x + 2, top + 1, label, border, pal.bg);
        let name = path.rsplit('/').next().unwrap_or(path);
        draw_text(buf, x + 2, top + 3, name, pal.fg, pal.bg);
        if let Some(mark) = card_mark(st, side) {
            draw_text(buf, x + 2, top + 5, mark, border, pal.bg);
        }
    }

    if let Some(fb) = st.feedback {
        let line = match (fb.selected, fb.selected_correct) {
            (None, _) => "Hết giờ!".to_string(),
            (Some(_), true) => format!("Chính xác! +{} điểm", fb.points),
            (Some(_), false) => "Chưa đúng!".to_string(),
        };
        let fg = if fb.selected_correct { pal.good } else { pal.bad };
        draw_centered(buf, top + card_h + 1, &line, fg, pal.bg);
    }

    if let Some(text) = st.explanation {
        draw_center_box(buf, pal, "Giải thích:", text);
    }
}

fn card_color(st: &GameState, side: Side, pal: &Palette) -> Color {
    let Some(fb) = st.feedback else {
        return pal.fg;
    };
    if fb.correct_side == Some(side) {
        pal.good
    } else if fb.selected == Some(side) {
        pal.bad
    } else {
        pal.dim
    }
}

fn card_mark(st: &GameState, side: Side) -> Option<&'static str> {
    let fb = st.feedback?;
    if fb.correct_side == Some(side) {
        Some("✔ đúng")
    } else if fb.selected == Some(side) {
        Some("✘ sai")
    } else {
        None
    }
}

fn draw_result(buf: &mut CellBuffer, st: &GameState, pal: &Palette) {
    let Some(result) = st.result.as_ref() else {
        return;
    };
    let s = &result.summary;
    let y = buf.h / 3;
    draw_centered(buf, y, &format!("{} {}", s.title, s.icon), pal.accent, pal.bg);
    draw_centered(buf, y + 1, s.message, pal.fg, pal.bg);
    draw_centered(buf, y + 3, &format!("Điểm: {}", result.score), pal.fg, pal.bg);
    draw_centered(
        buf,
        y + 4,
        &format!("Đúng: {}/{} ({}%)", result.correct_count, result.total, s.percentage),
        pal.fg,
        pal.bg,
    );
}
