//! Text measurement and truncation.

/// Heuristic: estimate pixel width of text (there is no font to measure with).
pub fn estimate_text_width_px(text: &str, font_px: f32) -> f32 {
    // f64 so that exact fits (10 chars at 10 px = 60 px) do not round up
    let w = text.chars().count() as f64 * font_px as f64 * 0.6;
    ((w * 1e4).round() / 1e4).ceil() as f32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: f32, max_px: f32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&format!("{out}…"), font_px) > max_px {
            out.pop();
            break;
        }
    }
    if out.is_empty() {
        return out;
    }
    out.push('…');
    out
}

/// Wrap text on word boundaries so each line fits `max_px`. Words wider than a
/// whole line are truncated.
pub fn wrap_text_to_width(text: &str, font_px: f32, max_px: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if estimate_text_width_px(&candidate, font_px) <= max_px {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if estimate_text_width_px(word, font_px) <= max_px {
            cur = word.to_string();
        } else {
            lines.push(truncate_to_width(word, font_px, max_px));
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}
