//! Highlighted rendering of two stored traces
//!
//! Walks each snapshot's raw text line by line and wraps the hop lines
//! whose position is in the diff set in a highlight marker. The newer
//! snapshot highlights green, the older one red, so a changed hop reads as
//! "was red, is now green".

use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Output flavor of the renderer; one code path, two marker sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// ANSI background-color escapes for terminals
    Plain,
    /// HTML `<span>` markers; `html_breaks` additionally turns every
    /// newline into a `<br />` tag
    Markup { html_breaks: bool },
}

/// One stored trace plus its display timestamp
#[derive(Debug, Clone, Copy)]
pub struct RenderEntry<'a> {
    pub raw: &'a str,
    pub recorded_at: &'a str,
}

/// Highlight color role for one side of the diff
#[derive(Clone, Copy)]
enum Tint {
    Newer,
    Older,
}

/// Render two snapshots with the changed hop lines highlighted.
///
/// `changed` holds 0-based hop positions as produced by [`crate::diff`];
/// hop lines print their 1-based number, so membership is tested after
/// subtracting one.
pub fn render_diff(
    newer: RenderEntry<'_>,
    older: RenderEntry<'_>,
    changed: &BTreeSet<usize>,
    mode: RenderMode,
) -> String {
    let mut out = String::new();

    for (entry, tint) in [(newer, Tint::Newer), (older, Tint::Older)] {
        let _ = write!(out, "Route recorded at {}:", entry.recorded_at);
        push_newline(&mut out, mode);
        render_body(&mut out, entry.raw, changed, mode, tint);
    }

    out
}

fn render_body(out: &mut String, raw: &str, changed: &BTreeSet<usize>, mode: RenderMode, tint: Tint) {
    for line in raw.lines() {
        match hop_index(line) {
            Some(index) if changed.contains(&index) => highlight(out, line, mode, tint),
            _ => out.push_str(line),
        }
        push_newline(out, mode);
    }
}

/// 0-based hop position of a line, if its first token is the printed
/// 1-based hop number
fn hop_index(line: &str) -> Option<usize> {
    let number: usize = line.split_whitespace().next()?.parse().ok()?;
    number.checked_sub(1)
}

fn highlight(out: &mut String, line: &str, mode: RenderMode, tint: Tint) {
    match (mode, tint) {
        (RenderMode::Plain, Tint::Newer) => {
            let _ = write!(out, "{}", line.black().on_bright_green());
        }
        (RenderMode::Plain, Tint::Older) => {
            let _ = write!(out, "{}", line.black().on_bright_red());
        }
        (RenderMode::Markup { .. }, Tint::Newer) => {
            let _ = write!(
                out,
                r#"<span class="trace-green" style="background-color: darkgreen; color: white">{line}</span>"#
            );
        }
        (RenderMode::Markup { .. }, Tint::Older) => {
            let _ = write!(
                out,
                r#"<span class="trace-red" style="background-color: darkred; color: white">{line}</span>"#
            );
        }
    }
}

fn push_newline(out: &mut String, mode: RenderMode) {
    if let RenderMode::Markup { html_breaks: true } = mode {
        out.push_str("<br />");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWER: &str = " 1  gateway (192.168.1.1)  0.4 ms\n 2  10.11.0.99  1.1 ms\n";
    const OLDER: &str = " 1  gateway (192.168.1.1)  0.4 ms\n 2  10.11.0.1  1.0 ms\n";

    fn entries() -> (RenderEntry<'static>, RenderEntry<'static>) {
        (
            RenderEntry { raw: NEWER, recorded_at: "2024-03-02 10:00:00" },
            RenderEntry { raw: OLDER, recorded_at: "2024-03-01 10:00:00" },
        )
    }

    #[test]
    fn test_empty_diff_set_highlights_nothing() {
        let (newer, older) = entries();
        let out = render_diff(newer, older, &BTreeSet::new(), RenderMode::Plain);
        assert!(!out.contains('\x1b'));
        assert!(out.contains("Route recorded at 2024-03-02 10:00:00:"));
        assert!(out.contains(" 2  10.11.0.99  1.1 ms"));
    }

    #[test]
    fn test_only_changed_hop_lines_highlighted() {
        let (newer, older) = entries();
        let changed: BTreeSet<usize> = [1].into_iter().collect();
        let out = render_diff(newer, older, &changed, RenderMode::Plain);

        for line in out.lines() {
            // Printed hop number 2 translates to position 1
            let highlighted = line.contains('\x1b');
            let is_changed_hop = line.contains("10.11.0.99") || line.contains("10.11.0.1");
            assert_eq!(highlighted, is_changed_hop, "line: {line:?}");
        }
    }

    #[test]
    fn test_markup_mode_emits_spans_and_breaks() {
        let (newer, older) = entries();
        let changed: BTreeSet<usize> = [1].into_iter().collect();
        let out = render_diff(newer, older, &changed, RenderMode::Markup { html_breaks: true });

        assert!(out.contains(r#"<span class="trace-green""#));
        assert!(out.contains(r#"<span class="trace-red""#));
        assert!(out.contains("<br />"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_markup_without_breaks_keeps_newlines_bare() {
        let (newer, older) = entries();
        let out = render_diff(newer, older, &BTreeSet::new(), RenderMode::Markup { html_breaks: false });
        assert!(!out.contains("<br />"));
    }
}
