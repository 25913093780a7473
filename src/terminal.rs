use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use crate::error::{JiraFrogError, Result};
use crate::output::{Frame, DETAIL_ROW};

/// A key press as far as the browser cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Char(char),
    /// Ctrl-C; raw mode turns it into a key instead of SIGINT
    Interrupt,
    /// Anything else, including non-key events such as a resize
    Other,
}

/// What the browser loop draws on and reads keys from.
pub trait Screen {
    /// Terminal (columns, rows)
    fn size(&self) -> Result<(u16, u16)>;
    fn draw(&mut self, frame: &Frame) -> Result<()>;
    /// Block until the next input event.
    fn read_key(&mut self) -> Result<Key>;
}

/// Opens issue links.
pub trait Launcher {
    fn open(&mut self, url: &str) -> Result<()>;
}

pub struct CrosstermScreen {
    out: Stdout,
}

impl CrosstermScreen {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Screen for CrosstermScreen {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;

        for (y, row) in frame.rows.iter().enumerate() {
            queue!(self.out, MoveTo(0, screen_row(y, 0)), Print(row.paint()))?;
        }
        for (y, line) in frame.detail.iter().enumerate() {
            queue!(self.out, MoveTo(0, screen_row(y, DETAIL_ROW)), Print(line.paint()))?;
        }

        let bottom = screen_row(frame.detail.len(), DETAIL_ROW).max(screen_row(frame.rows.len(), 0));
        queue!(self.out, MoveTo(0, bottom))?;
        self.out.flush()?;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        with_raw_mode(CrosstermModes, true, || Ok(key_from_event(event::read()?)))
    }
}

fn screen_row(offset: usize, origin: u16) -> u16 {
    u16::try_from(offset).unwrap_or(u16::MAX).saturating_add(origin)
}

/// Default system browser.
pub struct SystemBrowser;

impl Launcher for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        webbrowser::open(url)?;
        Ok(())
    }
}

/// Terminal mode switches the raw-mode guard toggles.
trait TerminalModes {
    fn enable_raw(&mut self) -> io::Result<()>;
    fn disable_raw(&mut self) -> io::Result<()>;
    fn hide_cursor(&mut self) -> io::Result<()>;
    fn show_cursor(&mut self) -> io::Result<()>;
}

struct CrosstermModes;

impl TerminalModes for CrosstermModes {
    fn enable_raw(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(io::stdout(), Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        execute!(io::stdout(), Show)
    }
}

/// Raw mode (and optionally a hidden cursor) for as long as the guard lives.
/// Dropping it restores the terminal on every exit path, unwinding included.
struct RawModeGuard<M: TerminalModes> {
    modes: M,
    cursor_hidden: bool,
}

impl<M: TerminalModes> RawModeGuard<M> {
    fn enter(modes: M, hide_cursor: bool) -> io::Result<Self> {
        let mut guard = Self {
            modes,
            cursor_hidden: false,
        };
        guard.modes.enable_raw()?;
        if hide_cursor {
            guard.cursor_hidden = true;
            guard.modes.hide_cursor()?;
        }
        Ok(guard)
    }
}

impl<M: TerminalModes> Drop for RawModeGuard<M> {
    fn drop(&mut self) {
        if self.cursor_hidden {
            let _ = self.modes.show_cursor();
        }
        let _ = self.modes.disable_raw();
    }
}

/// Run `body` in raw mode; the terminal is restored however `body` exits.
fn with_raw_mode<M, T>(modes: M, hide_cursor: bool, body: impl FnOnce() -> Result<T>) -> Result<T>
where
    M: TerminalModes,
{
    let _guard = RawModeGuard::enter(modes, hide_cursor)?;
    body()
}

pub fn key_from_event(event: Event) -> Key {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if kind != KeyEventKind::Release => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        },
        _ => Key::Other,
    }
}

/// Prompt for a line of input, echoing what is typed.
pub fn read_line(prompt: &str) -> Result<String> {
    read_answer(prompt, true)
}

/// Prompt for a secret without echoing it.
pub fn read_secret(prompt: &str) -> Result<String> {
    read_answer(prompt, false)
}

/// All answers go through crossterm's reader, so text pasted ahead of a
/// later prompt is still there when that prompt reads. Backspace edits,
/// Ctrl-C aborts.
fn read_answer(prompt: &str, echo: bool) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let answer = with_raw_mode(CrosstermModes, false, || {
        let events = std::iter::from_fn(|| Some(event::read().map(key_event_only)));
        collect_line(events, |edit| {
            if echo {
                echo_edit(&mut io::stdout(), edit)
            } else {
                Ok(())
            }
        })
    })?;

    writeln!(stdout)?;
    Ok(answer)
}

/// A change to the line being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Push(char),
    Pop,
}

fn echo_edit(out: &mut impl Write, edit: Edit) -> io::Result<()> {
    match edit {
        Edit::Push(c) => write!(out, "{c}")?,
        Edit::Pop => write!(out, "\x08 \x08")?,
    }
    out.flush()
}

fn key_event_only(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(key),
        _ => None,
    }
}

fn collect_line<I, E>(events: I, mut on_edit: E) -> Result<String>
where
    I: IntoIterator<Item = io::Result<Option<KeyEvent>>>,
    E: FnMut(Edit) -> io::Result<()>,
{
    let mut line = String::new();

    for event in events {
        let Some(key) = event? else {
            continue;
        };
        match key.code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(JiraFrogError::Interrupted);
            }
            KeyCode::Backspace => {
                if line.pop().is_some() {
                    on_edit(Edit::Pop)?;
                }
            }
            KeyCode::Char(c) => {
                line.push(c);
                on_edit(Edit::Push(c))?;
            }
            _ => {}
        }
    }

    Ok(line)
}
