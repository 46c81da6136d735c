//! Text rendering for the terminal. Every `render_*` returns a `String` so output
//! can be tested without capturing stdout; `color` is off in tests.

use colored::{ColoredString, Colorize};
use objman::commands::{CmdMessage, MessageLevel};
use objman::config::{ObjmanConfig, CONFIG_KEYS};
use objman::filter::CompiledPredicate;
use objman::layout::LayoutModel;
use objman::model::{CatalogEntry, LayoutBlock, Width, HEADER_SECTION};
use std::io::IsTerminal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LABEL_WIDTH: usize = 28;
const KIND_WIDTH: usize = 14;
const REF_WIDTH: usize = 20;

pub fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn paint(text: &str, color: bool, style: fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Truncates to `width` columns (with an ellipsis) and pads with spaces.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    if s.width() > width {
        let limit = width.saturating_sub(1);
        for c in s.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > limit {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    } else {
        out.push_str(s);
        used = s.width();
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn render_block(block: &LayoutBlock, color: bool) -> String {
    let width = match block.width {
        Width::Half => "half",
        Width::Full => "full",
    };
    let mut line = format!(
        "  {:>3}  {}{}{}{}",
        block.order,
        fit(&block.label, LABEL_WIDTH),
        fit(block.kind().as_str(), KIND_WIDTH),
        fit(block.reference_id(), REF_WIDTH),
        width
    );
    if let objman::model::BlockContent::RelatedList {
        display_columns, ..
    } = &block.content
    {
        if !display_columns.is_empty() {
            line.push_str(&format!("  [{}]", display_columns.join(", ")));
        }
    }
    if !block.visible {
        line.push_str(&paint("  (hidden)", color, |s| s.dimmed()));
    }
    line.trim_end().to_string() + "\n"
}

pub fn render_layout(model: &LayoutModel, color: bool) -> String {
    let mut out = String::new();
    for section in model.sections() {
        let marker = if section.is_reserved { ", reserved" } else { "" };
        let heading = format!("{} ({}{})", section.name, section.section_type, marker);
        out.push_str(&paint(&heading, color, |s| s.bold()));
        out.push('\n');

        let blocks = model.blocks_in(&section.name);
        if blocks.is_empty() {
            out.push_str(&paint("  (empty)", color, |s| s.dimmed()));
            out.push('\n');
        }
        for block in blocks {
            out.push_str(&render_block(block, color));
        }
    }

    let buttons = model.buttons();
    if !buttons.is_empty() {
        out.push_str(&paint(HEADER_SECTION, color, |s| s.bold()));
        out.push('\n');
        for block in buttons {
            out.push_str(&render_block(block, color));
        }
    }
    out
}

pub fn render_palette(entries: &[CatalogEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let line = format!(
                "  {}{}{}",
                fit(&e.display_name, LABEL_WIDTH),
                fit(e.kind.as_str(), KIND_WIDTH),
                e.id
            );
            line.trim_end().to_string() + "\n"
        })
        .collect()
}

pub fn render_compiled(compiled: &CompiledPredicate) -> String {
    let mut out = format!("{}\n", compiled.predicate);
    for (i, parameter) in compiled.parameters.iter().enumerate() {
        let value = serde_json::to_string(parameter).unwrap_or_else(|_| parameter.to_string());
        out.push_str(&format!("  {} = {}\n", i + 1, value));
    }
    out
}

pub fn render_config(config: &ObjmanConfig) -> String {
    CONFIG_KEYS
        .iter()
        .map(|key| format!("{} = {}\n", key, config.get(key).unwrap_or_default()))
        .collect()
}

pub fn render_messages(messages: &[CmdMessage], color: bool) -> String {
    messages
        .iter()
        .map(|m| {
            let text = match m.level {
                MessageLevel::Info => paint(&m.content, color, |s| s.dimmed()),
                MessageLevel::Success => paint(&m.content, color, |s| s.green()),
                MessageLevel::Warning => paint(&m.content, color, |s| s.yellow()),
                MessageLevel::Error => paint(&m.content, color, |s| s.red()),
            };
            format!("{}\n", text)
        })
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages, use_color()));
}
