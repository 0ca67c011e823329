//! Terminal markup renderer — converts the report's markdown-like markup to
//! ANSI escape codes.
//!
//! The report text is untrusted model output. When raw markup is disabled in
//! the configuration the text is printed as-is, markers and all, instead of
//! being interpreted.

/// ANSI escape codes for terminal formatting.
mod ansi {
    pub const BOLD_ON: &str = "\x1b[1m";
    pub const BOLD_OFF: &str = "\x1b[22m";
    pub const UNDERLINE_ON: &str = "\x1b[4m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RESET: &str = "\x1b[0m";
}

/// Render a full report for the terminal.
///
/// With `raw_markup` enabled, heading lines (fully `**`-wrapped) render bold
/// with markers stripped, inline `**bold**` spans render bold, and
/// `[Title](url)` links render as an underlined title with a dimmed URL.
/// Without it, the text passes through untouched.
pub fn render_report(content: &str, raw_markup: bool, width: usize) -> String {
    if !raw_markup {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len() + 64);
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.len() >= 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
            out.push_str(ansi::BOLD_ON);
            out.push_str(&trimmed.replace("**", ""));
            out.push_str(ansi::RESET);
        } else {
            let styled = render_inline(line);
            // Wrap on the plain text; ANSI codes only appear around whole
            // spans so wrapped segments stay balanced enough for a terminal.
            out.push_str(&textwrap::fill(&styled, width));
        }
        out.push('\n');
    }
    out
}

/// Apply inline bold and link styling within a single line.
fn render_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    let mut bold = false;

    while let Some(pos) = rest.find("**") {
        out.push_str(&rest[..pos]);
        out.push_str(if bold { ansi::BOLD_OFF } else { ansi::BOLD_ON });
        bold = !bold;
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    if bold {
        // Unbalanced marker: close the style rather than bleed it.
        out.push_str(ansi::BOLD_OFF);
    }

    render_links(&out)
}

/// Replace `[Title](url)` with an underlined title and a dimmed URL.
fn render_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find("](") else {
            break;
        };
        let close = open + close;
        let Some(end) = rest[close..].find(')') else {
            break;
        };
        let end = close + end;

        let title = &rest[open + 1..close];
        let url = &rest[close + 2..end];
        out.push_str(&rest[..open]);
        out.push_str(ansi::UNDERLINE_ON);
        out.push_str(title);
        out.push_str(ansi::RESET);
        out.push_str(ansi::CYAN);
        out.push_str(" (");
        out.push_str(url);
        out.push(')');
        out.push_str(ansi::RESET);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}
