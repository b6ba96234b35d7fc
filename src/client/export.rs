//! Shareable quote cards.
//!
//! Cards are SVG: a category gradient with the quote word-wrapped and centred
//! on top. Glyph widths are estimated from the font size, which is close
//! enough for the sans-serif faces browsers fall back to.

use super::state::DisplayedQuote;
use super::theme;
use crate::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

pub const CARD_SIZE: u32 = 1080;
pub const TEXT_WIDTH: f32 = 900.0;
pub const FONT_SIZE: f32 = 48.0;
const LINE_HEIGHT: f32 = FONT_SIZE * 1.4;
const AVERAGE_GLYPH_WIDTH: f32 = 0.52;

/// Greedy word wrap. A single word wider than `max_width` gets its own line.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn estimate_width(text: &str) -> f32 {
    text.chars().count() as f32 * FONT_SIZE * AVERAGE_GLYPH_WIDTH
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_card(displayed: &DisplayedQuote) -> String {
    let gradient = theme::gradient(displayed.category);
    let lines = wrap_text(&displayed.quote, TEXT_WIDTH, estimate_width);

    let size = CARD_SIZE as f32;
    let block_height = LINE_HEIGHT * lines.len().saturating_sub(1) as f32;
    let first_baseline = size / 2.0 - block_height / 2.0;

    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        text.push_str(&format!(
            "    <text x=\"{}\" y=\"{:.1}\">{}</text>\n",
            size / 2.0,
            first_baseline + LINE_HEIGHT * i as f32,
            escape_xml(line)
        ));
    }

    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">\n",
            "  <defs>\n",
            "    <linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\">\n",
            "      <stop offset=\"0%\" stop-color=\"{start}\"/>\n",
            "      <stop offset=\"100%\" stop-color=\"{end}\"/>\n",
            "    </linearGradient>\n",
            "  </defs>\n",
            "  <rect width=\"100%\" height=\"100%\" fill=\"url(#bg)\"/>\n",
            "  <g fill=\"#ffffff\" font-family=\"Helvetica, Arial, sans-serif\" font-size=\"{font}\" text-anchor=\"middle\" dominant-baseline=\"middle\">\n",
            "{text}",
            "  </g>\n",
            "</svg>\n"
        ),
        size = CARD_SIZE,
        start = gradient.start,
        end = gradient.end,
        font = FONT_SIZE,
        text = text,
    )
}

/// Write the card for `displayed` into `dir` and return the file path.
pub fn save_card(displayed: &DisplayedQuote, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "motivational-quote-{}-{}.svg",
        displayed.category,
        Utc::now().timestamp_millis()
    ));
    fs::write(&path, render_card(displayed))?;
    tracing::info!("Saved quote card to {}", path.display());
    Ok(path)
}
