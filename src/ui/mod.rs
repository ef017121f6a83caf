//! Operator output
//!
//! Everything the importer reports goes through the [`Ui`] trait:
//! - Current phase (Fetching, Extracting, Loading, Enriching, Indexing)
//! - Progress (current/total with optional details)
//! - Activity log (download notices, malformed lines, counts)
//!
//! [`ConsoleUi`] prints plain lines to stdout, [`UiApp`] draws a ratatui
//! screen and [`SilentUi`] discards everything.

mod components;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use components::{LogPanel, ProgressPanel, StatusPanel};

/// Pipeline phases shown in the status panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Fetching,
    Extracting,
    Loading,
    Enriching,
    Indexing,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Fetching => write!(f, "Fetching GeoNames dumps"),
            Phase::Extracting => write!(f, "Extracting cities archive"),
            Phase::Loading => write!(f, "Loading tables"),
            Phase::Enriching => write!(f, "Resolving ISO 3166-2 codes"),
            Phase::Indexing => write!(f, "Building full-text index"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress information for the current operation
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Trait for UI implementations - allows console, TUI and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);

    /// Recoverable problems (malformed lines, unresolved codes)
    fn warn(&mut self, message: impl Into<String>) {
        self.log(message);
    }
}

/// Line-oriented stdout output, the default for non-interactive runs
#[derive(Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        println!("\n{}...", phase);
    }

    fn set_info(&mut self, info: impl Into<String>) {
        println!("{}", info.into());
    }

    fn set_progress(&mut self, current: u64, _total: u64, label: impl Into<String>) {
        println!("Processed {} records {}", label.into(), current);
    }

    fn clear_progress(&mut self) {}

    fn log(&mut self, message: impl Into<String>) {
        println!("{}", message.into());
    }
}

/// Restores the terminal when dropped, whatever way the run ends
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

/// Minimum time between two redraws triggered by progress updates
const REDRAW_INTERVAL: Duration = Duration::from_millis(50);

/// Full-screen terminal UI
pub struct UiApp {
    guard: TerminalGuard,
    status: StatusPanel,
    progress: ProgressPanel,
    log: LogPanel,
    last_draw: Option<Instant>,
}

impl UiApp {
    /// Enter the alternate screen; it is left again when the app is dropped
    pub fn new() -> Result<Self> {
        Ok(Self {
            guard: TerminalGuard::enter()?,
            status: StatusPanel::new(),
            progress: ProgressPanel::new(),
            log: LogPanel::new(),
            last_draw: None,
        })
    }

    fn draw(&mut self) -> Result<()> {
        let (status, progress, log) = (&self.status, &self.progress, &self.log);

        self.guard.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5), // Status panel
                    Constraint::Length(3), // Progress bar
                    Constraint::Min(5),    // Log panel
                ])
                .split(frame.area());

            status.render(frame, chunks[0]);
            progress.render(frame, chunks[1]);
            log.render(frame, chunks[2]);
        })?;

        self.last_draw = Some(Instant::now());
        Ok(())
    }

    /// Redraw unless the last frame is still fresh
    fn draw_throttled(&mut self) {
        let fresh = self
            .last_draw
            .is_some_and(|at| at.elapsed() < REDRAW_INTERVAL);
        if !fresh {
            self.draw().ok();
        }
    }

    /// Show the summary and wait for a key before leaving the screen
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.status.set_phase(Phase::Complete);
        self.progress.clear();
        self.log.add(summary);
        self.log.add("Press any key to exit...");
        self.draw()?;

        loop {
            if event::poll(Duration::from_millis(100))? {
                if let CrosstermEvent::Key(_) = event::read()? {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Leave the screen immediately
    pub fn restore(self) -> Result<()> {
        drop(self);
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.draw().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.draw_throttled();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.progress
            .set_progress(Progress::new(current, total, label));
        self.draw_throttled();
    }

    fn clear_progress(&mut self) {
        self.progress.clear();
        self.draw_throttled();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.log.add(message);
        self.draw_throttled();
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.log.add_warning(message);
        self.draw_throttled();
    }
}

/// Silent UI implementation for testing
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio() {
        assert_eq!(Progress::new(5, 0, "geoname").ratio(), 0.0);
        assert_eq!(Progress::new(250, 1000, "geoname").ratio(), 0.25);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Indexing.to_string(), "Building full-text index");
    }
}
