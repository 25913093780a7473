use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::types::Issue;

/// Row where the detail panel starts, regardless of list length
pub const DETAIL_ROW: u16 = 20;
/// Row of the first description line (heading, underline and a blank line come first)
const DESCRIPTION_ROW: usize = DETAIL_ROW as usize + 3;
/// Description stops this many rows above the bottom of the terminal
const BOTTOM_MARGIN: usize = 8;

const KEY_WIDTH: usize = 15;
const SUMMARY_WIDTH: usize = 50;
const STATUS_WIDTH: usize = 10;

pub const IN_PROGRESS: &str = "In Progress";
pub const NO_DESCRIPTION: &str = "(No description)";
pub const NO_ISSUES: &str = "No issues assigned to you in open sprints.";

/// Every color the browser draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    /// Rows whose status is "In Progress"
    CadetBlue,
    /// All other rows
    SpringGreen,
    /// Background of the selected row
    Azure,
    /// Detail panel text
    MistyRose,
}

impl Shade {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Shade::CadetBlue => (95, 158, 160),
            Shade::SpringGreen => (0, 139, 69),
            Shade::Azure => (193, 205, 205),
            Shade::MistyRose => (255, 228, 225),
        }
    }
}

/// One line of screen text plus how to paint it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub fg: Option<Shade>,
    pub bg: Option<Shade>,
    pub bold: bool,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: None,
            bg: None,
            bold: false,
        }
    }

    fn detail(text: impl Into<String>) -> Self {
        Self {
            fg: Some(Shade::MistyRose),
            ..Self::plain(text)
        }
    }

    fn heading(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::detail(text)
        }
    }

    /// Render with ANSI escapes
    pub fn paint(&self) -> String {
        let mut painted = self.text.as_str().normal();
        if let Some(fg) = self.fg {
            let (r, g, b) = fg.rgb();
            painted = painted.truecolor(r, g, b);
        }
        if let Some(bg) = self.bg {
            let (r, g, b) = bg.rgb();
            painted = painted.on_truecolor(r, g, b);
        }
        if self.bold {
            painted = painted.bold();
        }
        painted.to_string()
    }
}

/// Everything drawn for one iteration of the browser loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Issue list, drawn from the top-left corner
    pub rows: Vec<Line>,
    /// Detail panel, drawn from [`DETAIL_ROW`]
    pub detail: Vec<Line>,
}

impl Frame {
    pub fn build(issues: &[Issue], selected: usize, width: usize, height: usize) -> Self {
        let Some(current) = issues.get(selected) else {
            return Self {
                rows: vec![Line::plain(NO_ISSUES)],
                detail: Vec::new(),
            };
        };

        let rows = issues
            .iter()
            .enumerate()
            .map(|(i, issue)| {
                let (fg, bg) = row_shades(issue.status_name(), i == selected);
                Line {
                    fg: Some(fg),
                    bg,
                    ..Line::plain(format_row(issue))
                }
            })
            .collect();

        Self {
            rows,
            detail: detail_lines(current, width, height),
        }
    }
}

/// Foreground and optional highlight background for a list row
pub fn row_shades(status: &str, selected: bool) -> (Shade, Option<Shade>) {
    let base = if status == IN_PROGRESS {
        Shade::CadetBlue
    } else {
        Shade::SpringGreen
    };
    (base, selected.then_some(Shade::Azure))
}

pub fn format_row(issue: &Issue) -> String {
    let summary: String = issue.summary().chars().take(SUMMARY_WIDTH).collect();
    format!(
        "{:<KEY_WIDTH$} {:<SUMMARY_WIDTH$} {:<STATUS_WIDTH$}",
        issue.key,
        summary,
        issue.status_name()
    )
}

fn detail_lines(issue: &Issue, width: usize, height: usize) -> Vec<Line> {
    let heading = format!("{}: {}", issue.key, issue.summary());
    let underline = "=".repeat(heading.chars().count());

    let mut lines = vec![Line::heading(heading), Line::heading(underline), Line::plain("")];

    let description = issue.description().unwrap_or(NO_DESCRIPTION);
    let last_row = height.saturating_sub(BOTTOM_MARGIN);
    for (i, text) in wrap(description, width).into_iter().enumerate() {
        lines.push(Line::detail(text));
        if DESCRIPTION_ROW + i >= last_row {
            break;
        }
    }

    lines
}

/// Word-wrap to `width` display columns, keeping the text's own line breaks.
/// Words wider than a whole line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut wrapped = Vec::new();

    for source in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in source.split_whitespace() {
            let word_width = word.width();
            let needed = if line.is_empty() {
                word_width
            } else {
                line_width + 1 + word_width
            };

            if needed <= width {
                if !line.is_empty() {
                    line.push(' ');
                    line_width += 1;
                }
                line.push_str(word);
                line_width += word_width;
                continue;
            }

            if !line.is_empty() {
                wrapped.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if !line.is_empty() && line_width + char_width > width {
                    wrapped.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += char_width;
            }
        }

        wrapped.push(line);
    }

    wrapped
}
