use std::{
    io::{self, Stderr, Write},
    panic::{self, PanicHookInfo},
    time::Duration,
};

use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::{
    ExecutableCommand, QueueableCommand, cursor as ccursor, event as cevent, style, terminal,
};
use scopeguard::{ScopeGuard, guard};

use crate::{
    backend::Backend,
    buf::CellBuf,
    error::{Error, Result},
    event::key,
    geom::Expanse,
    style::{Color, ColorPair, Palette},
};

/// A boxed panic hook.
type Hook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Reinstall a previously active panic hook.
fn restore_hook(hook: Hook) {
    panic::set_hook(hook);
}

/// Translate a thicket color into a crossterm color.
fn translate_color(c: Color) -> style::Color {
    match c {
        Color::Reset => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::DarkGrey => style::Color::DarkGrey,
        Color::Red => style::Color::Red,
        Color::DarkRed => style::Color::DarkRed,
        Color::Green => style::Color::Green,
        Color::DarkGreen => style::Color::DarkGreen,
        Color::Yellow => style::Color::Yellow,
        Color::DarkYellow => style::Color::DarkYellow,
        Color::Blue => style::Color::Blue,
        Color::DarkBlue => style::Color::DarkBlue,
        Color::Magenta => style::Color::Magenta,
        Color::DarkMagenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::Cyan,
        Color::DarkCyan => style::Color::DarkCyan,
        Color::White => style::Color::White,
        Color::Grey => style::Color::Grey,
        Color::Rgb { r, g, b } => style::Color::Rgb { r, g, b },
        Color::AnsiValue(a) => style::Color::AnsiValue(a),
    }
}

/// Map IO results into thicket errors.
fn translate_result<T>(e: io::Result<T>) -> Result<T> {
    e.map_err(|e| Error::Backend(e.to_string()))
}

/// Translate crossterm key modifiers into thicket modifiers.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
    }
}

/// Translate a crossterm key event into a thicket key.
fn translate_key(k: cevent::KeyEvent) -> key::Key {
    key::Key {
        mods: translate_key_modifiers(k.modifiers),
        key: match k.code {
            cevent::KeyCode::Backspace => key::KeyCode::Backspace,
            cevent::KeyCode::Enter => key::KeyCode::Enter,
            cevent::KeyCode::Left => key::KeyCode::Left,
            cevent::KeyCode::Right => key::KeyCode::Right,
            cevent::KeyCode::Up => key::KeyCode::Up,
            cevent::KeyCode::Down => key::KeyCode::Down,
            cevent::KeyCode::Home => key::KeyCode::Home,
            cevent::KeyCode::End => key::KeyCode::End,
            cevent::KeyCode::PageUp => key::KeyCode::PageUp,
            cevent::KeyCode::PageDown => key::KeyCode::PageDown,
            cevent::KeyCode::Tab => key::KeyCode::Tab,
            cevent::KeyCode::BackTab => key::KeyCode::BackTab,
            cevent::KeyCode::Delete => key::KeyCode::Delete,
            cevent::KeyCode::Insert => key::KeyCode::Insert,
            cevent::KeyCode::F(x) => key::KeyCode::F(x),
            cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
            cevent::KeyCode::Esc => key::KeyCode::Esc,
            _ => key::KeyCode::Unknown,
        },
    }
    .normalize()
}

/// A backend drawing to stderr through crossterm.
pub struct CrosstermBackend {
    /// Output handle.
    fp: Stderr,
    /// Pair-to-color mapping used when drawing.
    palette: Palette,
    /// Whether start installs a terminal-restoring panic hook.
    panic_hook: bool,
    /// The hook that was active before ours, restored on drop.
    previous_hook: Option<ScopeGuard<Hook, fn(Hook)>>,
    /// Whether the terminal is currently in raw mode.
    active: bool,
    /// A resize seen while polling for keys.
    resize: Option<Expanse>,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self {
            fp: io::stderr(),
            palette: Palette::new(),
            panic_hook: false,
            previous_hook: None,
            active: false,
            resize: None,
        }
    }
}

impl CrosstermBackend {
    /// Construct a backend with an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a panic hook while running that restores the terminal before
    /// printing a backtrace.
    pub fn with_panic_hook(mut self) -> Self {
        self.panic_hook = true;
        self
    }

    /// Use the given palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Mutable access to the palette.
    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Enter alternate screen and raw mode.
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.fp.execute(terminal::EnterAlternateScreen)?;
        self.fp.execute(ccursor::Hide)?;
        Ok(())
    }

    /// Leave alternate screen and restore terminal state.
    fn exit(&mut self) -> io::Result<()> {
        self.fp.execute(style::ResetColor)?;
        self.fp.execute(terminal::LeaveAlternateScreen)?;
        self.fp.execute(ccursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Install the terminal-restoring panic hook.
    fn install_hook(&mut self) {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|pi| {
            let mut stderr = io::stderr();
            #[allow(unused_must_use)]
            {
                crossterm::execute!(
                    stderr,
                    style::ResetColor,
                    terminal::LeaveAlternateScreen,
                    ccursor::Show
                );
                terminal::disable_raw_mode();
                BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream());
            }
        }));
        self.previous_hook = Some(guard(previous, restore_hook as fn(Hook)));
    }

    /// Queue one row of a frame, grouping runs of equal color.
    fn draw_row(&mut self, frame: &CellBuf, y: u32) -> io::Result<()> {
        self.fp.queue(ccursor::MoveTo(0, y as u16))?;
        let mut run = String::new();
        let mut color: Option<ColorPair> = None;
        for cell in frame.row(y) {
            if color != Some(cell.color) {
                if let Some(c) = color {
                    self.print_run(c, &run)?;
                    run.clear();
                }
                color = Some(cell.color);
            }
            run.push(cell.ch);
        }
        if let Some(c) = color {
            self.print_run(c, &run)?;
        }
        Ok(())
    }

    /// Queue a run of text in one color.
    fn print_run(&mut self, pair: ColorPair, txt: &str) -> io::Result<()> {
        let colors = self.palette.get(pair);
        self.fp
            .queue(style::SetForegroundColor(translate_color(colors.fg)))?;
        self.fp
            .queue(style::SetBackgroundColor(translate_color(colors.bg)))?;
        self.fp.queue(style::Print(txt))?;
        Ok(())
    }
}

impl Backend for CrosstermBackend {
    fn start(&mut self) -> Result<()> {
        if self.panic_hook {
            self.install_hook();
        }
        translate_result(self.enter())?;
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            translate_result(self.exit())?;
        }
        drop(self.previous_hook.take());
        Ok(())
    }

    fn surface_size(&self) -> Result<Expanse> {
        let (w, h) = translate_result(terminal::size())?;
        Ok(Expanse::new(w.into(), h.into()))
    }

    fn flush(&mut self, frame: &CellBuf) -> Result<()> {
        for y in 0..frame.size().h {
            translate_result(self.draw_row(frame, y))?;
        }
        translate_result(self.fp.flush())
    }

    fn poll_key(&mut self) -> Result<Option<key::Key>> {
        while translate_result(cevent::poll(Duration::ZERO))? {
            match translate_result(cevent::read())? {
                cevent::Event::Key(k) if k.kind != cevent::KeyEventKind::Release => {
                    return Ok(Some(translate_key(k)));
                }
                cevent::Event::Resize(w, h) => {
                    self.resize = Some(Expanse::new(w.into(), h.into()));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn take_resize(&mut self) -> Option<Expanse> {
        self.resize.take()
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        drop(self.stop());
    }
}
