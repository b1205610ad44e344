//! Prompt templates for review and test generation.

use crate::config::{Mode, UserOptions};
use crate::files::FileReadResult;

/// Turns one file into an ordered list of prompts.
pub trait PromptGenerator: Send + Sync {
    /// Returns the prompts for `file`, one per chunk, in source order.
    fn prompts(&self, file: &FileReadResult) -> Vec<String>;
}

/// Built-in templates for both modes.
#[derive(Clone, Debug)]
pub struct DefaultPromptGenerator {
    mode: Mode,
    perfect_keyword: String,
    max_chars: usize,
}

impl DefaultPromptGenerator {
    /// Creates a generator; `max_chars` bounds the source embedded per prompt.
    pub fn new(mode: Mode, perfect_keyword: impl Into<String>, max_chars: usize) -> Self {
        Self {
            mode,
            perfect_keyword: perfect_keyword.into(),
            max_chars: max_chars.max(1),
        }
    }

    /// Creates a generator from resolved user options.
    pub fn from_options(options: &UserOptions) -> Self {
        Self::new(
            options.mode,
            options.perfect_keyword.clone(),
            options.max_prompt_chars,
        )
    }

    fn review_prompt(&self, path: &str, language: &str, fence: &str, part: &str, body: &str) -> String {
        format!(
            "You are a senior software engineer reviewing a change to `{path}` ({language}){part}.\n\
             Point out bugs, security problems, and hard-to-read code, each with a short \
             suggested fix. Do not repeat the code back.\n\
             If the code needs no changes, reply with the single word {keyword}.\n\n\
             ```{fence}\n{body}\n```",
            keyword = self.perfect_keyword,
        )
    }

    fn test_prompt(&self, path: &str, language: &str, fence: &str, part: &str, body: &str) -> String {
        format!(
            "Write a complete unit test file for the following {language} code from `{path}`{part}.\n\
             Cover normal behaviour and edge cases, import what the tests need, \
             and reply with only the test code.\n\n\
             ```{fence}\n{body}\n```"
        )
    }
}

impl PromptGenerator for DefaultPromptGenerator {
    fn prompts(&self, file: &FileReadResult) -> Vec<String> {
        let path = file.path.display().to_string();
        let extension = file.extension().unwrap_or("");
        let language = language_for(extension);

        let (source, fence) = match (self.mode, file.diff.as_deref()) {
            (Mode::Review, Some(diff)) if !diff.trim().is_empty() => (diff, "diff"),
            _ => (file.content.as_str(), extension),
        };

        let chunks = chunk_lines(source, self.max_chars);
        let total = chunks.len();
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let part = if total > 1 {
                    format!(", part {}/{total}", i + 1)
                } else {
                    String::new()
                };
                match self.mode {
                    Mode::Review => self.review_prompt(&path, language, fence, &part, chunk),
                    Mode::Test => self.test_prompt(&path, language, fence, &part, chunk),
                }
            })
            .collect()
    }
}

/// Maps a file extension to a language name for prompts.
fn language_for(extension: &str) -> &'static str {
    match extension {
        "ts" | "tsx" => "TypeScript",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "rs" => "Rust",
        "py" => "Python",
        "go" => "Go",
        "java" => "Java",
        "kt" => "Kotlin",
        "rb" => "Ruby",
        "c" | "h" => "C",
        "cpp" | "cc" | "hpp" => "C++",
        _ => "source",
    }
}

/// Splits `text` on line boundaries into chunks of at most `max_chars` chars.
///
/// A single line longer than `max_chars` is split mid-line on character
/// boundaries. Blank input yields no chunks.
pub fn chunk_lines(text: &str, max_chars: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let max_chars = max_chars.max(1);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let mut pieces: Vec<String> = Vec::new();
        let chars: Vec<char> = line.chars().collect();
        if chars.len() > max_chars {
            pieces.extend(chars.chunks(max_chars).map(|c| c.iter().collect()));
        } else {
            pieces.push(line.to_string());
        }

        for piece in pieces {
            let piece_len = piece.chars().count();
            // +1 accounts for the joining newline
            let needed = if current.is_empty() { piece_len } else { piece_len + 1 };
            if current_len + needed > max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
