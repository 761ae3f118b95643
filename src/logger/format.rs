//! Log formatting and output with ANSI colors and text wrapping
//!
//! Handles:
//! - Colorized console output with fixed-width tag and level columns
//! - Highlighting of 0x-prefixed addresses and hashes
//! - Text wrapping at word boundaries
//! - Broken pipe handling for piped commands

use std::io::{stdout, ErrorKind, Write};

use chrono::Local;
use colored::*;
use once_cell::sync::Lazy;
use regex::Regex;

use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;

const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 8;
const BRACKET_SPACE_WIDTH: usize = 3;
const TOTAL_PREFIX_WIDTH: usize = TAG_WIDTH + LEVEL_WIDTH + BRACKET_SPACE_WIDTH * 2;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

static HEX_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]{8,}").ok());

pub fn format_and_log(tag: &LogTag, level: LogLevel, message: &str) {
    let now = Local::now();
    let prefix = format!("{} ", now.format("%H:%M:%S")).dimmed().to_string();

    let base_line = format!("{}[{}] [{}] ", prefix, format_tag(tag), format_level(level));
    let base_length = strip_ansi_codes(&base_line).len();
    let available_space = if MAX_LINE_LENGTH > base_length {
        MAX_LINE_LENGTH - base_length
    } else {
        50
    };

    let chunks = wrap_text(message, available_space);
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_clean = tag.to_plain_string();
    let continuation_prefix = " ".repeat(strip_ansi_codes(&prefix).len() + TOTAL_PREFIX_WIDTH);

    for (index, chunk) in chunks.iter().enumerate() {
        let console_line = if index == 0 {
            format!("{}{}", base_line, highlight_hex(chunk))
        } else {
            format!("{}{}", continuation_prefix, highlight_hex(chunk))
        };
        print_stdout_safe(&console_line);
        write_to_file(&format!(
            "{} [{}] [{}] {}",
            timestamp,
            tag_clean,
            level.as_str(),
            chunk
        ));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Rpc => label.bright_cyan().bold(),
        LogTag::Wallet => label.bright_magenta().bold(),
        LogTag::Contract => label.bright_blue().bold(),
        LogTag::Registry => label.bright_green().bold(),
        LogTag::Trading => label.green().bold(),
        LogTag::Notify => label.yellow().bold(),
        LogTag::Test => label.blue().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
    }
}

fn highlight_hex(text: &str) -> String {
    match HEX_PATTERN.as_ref() {
        Some(pattern) => pattern
            .replace_all(text, |caps: &regex::Captures| caps[0].cyan().to_string())
            .into_owned(),
        None => text.to_string(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    if let Err(e) = writeln!(stdout(), "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
    if let Err(e) = stdout().flush() {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
}

/// Remove ANSI color codes from text
pub(crate) fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;

    for ch in text.chars() {
        if ch == '\x1b' {
            in_escape = true;
        } else if in_escape && ch == 'm' {
            in_escape = false;
        } else if !in_escape {
            result.push(ch);
        }
    }
    result
}

/// Wrap text at word boundaries, respecting existing newlines.
/// Words longer than the width are split on character boundaries.
pub(crate) fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_width.max(1)) {
                    result.push(piece.iter().collect());
                }
            } else if current.is_empty() {
                current = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        let colored = "\x1b[31mred\x1b[0m text";
        assert_eq!(strip_ansi_codes(colored), "red text");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("scan window 9538247 to 9538347 skipped", 20);
        assert_eq!(lines, vec!["scan window 9538247", "to 9538347 skipped"]);
    }

    #[test]
    fn splits_long_words() {
        let lines = wrap_text("0x85D562eF9008a4Dc3Cb1", 10);
        assert_eq!(lines, vec!["0x85D562eF", "9008a4Dc3C", "b1"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(wrap_text("a\nb", 80), vec!["a", "b"]);
        assert_eq!(wrap_text("", 80), vec![""]);
    }
}
