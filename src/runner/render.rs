//! Typing-animation replay of model responses.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::pin::Pin;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use crossterm::execute;
use crossterm::style::{PrintStyledContent, Stylize};
use regex::Regex;

/// Delay between typed characters.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(4);

// Opening or closing fence with an optional language tag
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[\w+#.-]*").unwrap());

/// Pass/fail tag shown next to a rendered message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// The response contains the perfect keyword.
    Succeed,
    /// Anything else.
    Fail,
}

/// Classifies `text` by whether `keyword` is one of its whitespace-separated words.
#[must_use]
pub fn classify(text: &str, keyword: &str) -> Classification {
    if text.split_whitespace().any(|word| word == keyword) {
        Classification::Succeed
    } else {
        Classification::Fail
    }
}

/// Removes Markdown code-fence markers, keeping the code itself.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// Reveals a message incrementally.
pub trait Typewriter: Send + Sync {
    /// Types `text` with a marker for `classification`, completing only when done.
    fn type_out<'a>(
        &'a self,
        text: &'a str,
        classification: Classification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Types characters to stdout with a fixed delay.
#[derive(Debug, Clone)]
pub struct TerminalTypewriter {
    delay: Duration,
}

impl TerminalTypewriter {
    /// Creates a typewriter with the given per-character delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl TerminalTypewriter {
    /// Pause after typing `ch`; none for whitespace or when not animating.
    fn pause_after(&self, ch: char, animate: bool) -> Option<Duration> {
        (animate && !ch.is_whitespace()).then_some(self.delay)
    }
}

impl Default for TerminalTypewriter {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_DELAY)
    }
}

impl Typewriter for TerminalTypewriter {
    fn type_out<'a>(
        &'a self,
        text: &'a str,
        classification: Classification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let marker = match classification {
                Classification::Succeed => "✔".green(),
                Classification::Fail => "✖".red(),
            };
            execute!(io::stdout(), PrintStyledContent(marker.bold()))?;
            print!(" ");

            // Captured output (e.g. inside a hook) is written without pauses.
            let animate = io::stdout().is_terminal();
            for ch in text.chars() {
                let mut stdout = io::stdout();
                write!(stdout, "{ch}")?;
                stdout.flush()?;
                if let Some(pause) = self.pause_after(ch, animate) {
                    tokio::time::sleep(pause).await;
                }
            }
            println!("\n");
            Ok(())
        })
    }
}

/// Replays responses through a [`Typewriter`], one after another.
pub struct Renderer {
    typewriter: Box<dyn Typewriter>,
    perfect_keyword: String,
}

impl Renderer {
    /// Creates a renderer classifying against `perfect_keyword`.
    pub fn new(typewriter: Box<dyn Typewriter>, perfect_keyword: impl Into<String>) -> Self {
        Self {
            typewriter,
            perfect_keyword: perfect_keyword.into(),
        }
    }

    /// Types every response in order; each finishes before the next starts.
    pub async fn render(&self, responses: &[String]) -> Result<()> {
        for response in responses {
            let text = strip_code_fences(response);
            let classification = classify(&text, &self.perfect_keyword);
            self.typewriter.type_out(&text, classification).await?;
        }
        Ok(())
    }
}
