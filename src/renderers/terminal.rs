use std::io::{self, stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::core::Color;
use crate::error::Result;
use crate::pipeline::{Frame, Present};

static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);
/// Set while a presenter holds the terminal in raw mode.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Chains a terminal restoring hook in front of the current panic hook, once
/// per process. Returns false if it was already installed.
fn install_panic_hook() -> bool {
    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = TerminalPresenter::cleanup_terminal();
        }
        log::error!("Panic occurred: {}", panic_info);
        previous_hook(panic_info);
    }));
    true
}

/// Draws frames as colored block characters on the alternate screen.
///
/// Raw mode and the alternate screen are entered on construction and left on
/// drop (or on panic).
pub struct TerminalPresenter {
    cells: Vec<Color>,
    quit: bool,
}

impl TerminalPresenter {
    pub fn new() -> Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
        if let Err(e) = execute!(stdout(), EnterAlternateScreen, Hide) {
            TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
            let _ = Self::cleanup_terminal();
            return Err(e.into());
        }
        log::info!("Entered terminal mode");

        Ok(Self {
            cells: Vec::new(),
            quit: false,
        })
    }

    fn cleanup_terminal() -> io::Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), ResetColor, Show, LeaveAlternateScreen)
    }

    /// Drains pending key events. False once Escape or q was pressed.
    pub fn is_open(&mut self) -> bool {
        while let Ok(true) = event::poll(std::time::Duration::ZERO) {
            if let Ok(Event::Key(key)) = event::read() {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) {
                    self.quit = true;
                }
            }
        }
        !self.quit
    }

    /// One escape sequence per color run rather than per cell.
    fn encode(cells: &[Color], columns: usize) -> String {
        let mut output = String::with_capacity(cells.len() * 4);
        let mut last_color = None;

        for (row, line) in cells.chunks(columns).enumerate() {
            output.push_str(&format!("\x1B[{};1H", row + 1));
            for cell in line {
                if last_color != Some(*cell) {
                    output.push_str(&cell.to_ansii_escape());
                    last_color = Some(*cell);
                }
                output.push('█');
            }
        }
        output
    }
}

impl Present for TerminalPresenter {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (columns, rows) = terminal::size()?;
        let (columns, rows) = (columns as usize, rows as usize);
        if columns == 0 || rows == 0 {
            return Ok(());
        }

        self.cells.resize(columns * rows, Color::BLACK);
        frame.resolve_into(columns, rows, &mut self.cells, |c| c);

        let mut out = stdout();
        queue!(out, MoveTo(0, 0), Print(Self::encode(&self.cells, columns)))?;
        out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        if !TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = Self::cleanup_terminal() {
            log::error!("Failed to restore terminal: {}", e);
        }
        log::info!("Left terminal mode");
    }
}
