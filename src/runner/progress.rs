//! Terminal progress indicator.
//!
//! A reporter is started with a label and ends in exactly one of two states,
//! succeed or fail. It never influences control flow.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::style::{PrintStyledContent, StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute};

/// Spinner animation frames.
const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Time between spinner frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Starts progress indicators.
pub trait ProgressReporter: Send + Sync {
    /// Shows the running state with `label`.
    fn start(&self, label: &str) -> Box<dyn ProgressHandle>;
}

/// A running indicator, consumed by its terminal transition.
pub trait ProgressHandle: Send {
    /// Transitions to the success state.
    fn succeed(self: Box<Self>, message: &str);

    /// Transitions to the failure state.
    fn fail(self: Box<Self>, message: &str);
}

/// Braille spinner drawn on stderr.
///
/// When stderr is not a terminal (e.g. inside a hook whose output is
/// captured) only the label and the final state are printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spinner;

impl ProgressReporter for Spinner {
    fn start(&self, label: &str) -> Box<dyn ProgressHandle> {
        Box::new(SpinnerHandle::new(label))
    }
}

/// Handle for a running [`Spinner`].
pub struct SpinnerHandle {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SpinnerHandle {
    fn new(label: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));

        if !io::stderr().is_terminal() {
            eprintln!("{label}");
            return Self {
                running,
                handle: None,
            };
        }

        let running_clone = running.clone();
        let label = label.to_string();
        let _ = execute!(io::stderr(), cursor::Hide);

        let handle = thread::spawn(move || {
            let mut i = 0;
            while running_clone.load(Ordering::Relaxed) {
                let mut stderr = io::stderr();
                let _ = write!(stderr, "\r{} {label}", FRAMES[i]);
                let _ = stderr.flush();
                i = (i + 1) % FRAMES.len();
                thread::sleep(FRAME_INTERVAL);
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stops the animation thread and clears its line.
    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            let _ = execute!(
                io::stderr(),
                Clear(ClearType::CurrentLine),
                cursor::MoveToColumn(0),
                cursor::Show
            );
        }
    }

    fn finish(mut self: Box<Self>, symbol: StyledContent<&'static str>, message: &str) {
        self.stop();
        let mut stderr = io::stderr();
        let _ = execute!(stderr, PrintStyledContent(symbol.bold()));
        let _ = writeln!(stderr, " {message}");
    }
}

impl ProgressHandle for SpinnerHandle {
    fn succeed(self: Box<Self>, message: &str) {
        self.finish("✔".green(), message);
    }

    fn fail(self: Box<Self>, message: &str) {
        self.finish("✖".red(), message);
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
