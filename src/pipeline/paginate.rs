//! Plain-text pagination: wrap text to a content width, fill pages
//! top-to-bottom.
//!
//! Wrapping is a function of *measured* text width, not character count.
//! Two renditions of the same input match line-for-line only if they agree
//! on the font metrics, so measurement lives behind the [`FontMetrics`]
//! seam and the built-in [`HelveticaMetrics`] carries the standard Helvetica
//! AFM advance widths (per-mille of the font size), the same tables every
//! Helvetica-based PDF generator ships.

use crate::config::PageGeometry;

pub(crate) const MM_PER_PT: f32 = 25.4 / 72.0;

/// Measures rendered text width for a given font size.
pub trait FontMetrics {
    /// Advance width of one character in per-mille of the font size.
    fn advance_millis(&self, c: char) -> u32;

    /// Width of `text` in millimetres at `font_size_pt`.
    fn text_width_mm(&self, text: &str, font_size_pt: f32) -> f32 {
        let millis: u32 = text.chars().map(|c| self.advance_millis(c)).sum();
        millis as f32 / 1000.0 * font_size_pt * MM_PER_PT
    }
}

/// Standard Helvetica advance widths (AFM, per-mille of font size) for the
/// printable ASCII range; everything else falls back to the lowercase
/// average width.
pub struct HelveticaMetrics;

// Widths for U+0020 ' ' through U+007E '~', in code-point order.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const DEFAULT_WIDTH: u16 = 556;

impl FontMetrics for HelveticaMetrics {
    fn advance_millis(&self, c: char) -> u32 {
        let code = c as u32;
        if (0x20..=0x7E).contains(&code) {
            HELVETICA_WIDTHS[(code - 0x20) as usize] as u32
        } else {
            DEFAULT_WIDTH as u32
        }
    }
}

/// Wrap `text` into lines no wider than `max_width_mm`.
///
/// Existing newlines are hard breaks; within a line, words break greedily on
/// spaces, and a single word wider than the content width splits at the last
/// character that still fits.
pub fn wrap_text(
    text: &str,
    max_width_mm: f32,
    font_size_pt: f32,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();

    for raw in normalised.split('\n') {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in raw.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if metrics.text_width_mm(&candidate, font_size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // Word alone still too wide: split it by measured width.
            let mut piece = String::new();
            for c in word.chars() {
                piece.push(c);
                if metrics.text_width_mm(&piece, font_size_pt) > max_width_mm
                    && piece.chars().count() > 1
                {
                    let overflow = piece.pop().unwrap();
                    lines.push(std::mem::take(&mut piece));
                    piece.push(overflow);
                }
            }
            current = piece;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Distribute wrapped lines onto pages.
///
/// The vertical cursor starts at the top margin and advances one line height
/// per line; a line that would cross the bottom margin starts a new page and
/// resets the cursor. Always yields at least one (possibly empty) page.
pub fn paginate(
    text: &str,
    geometry: &PageGeometry,
    metrics: &dyn FontMetrics,
) -> Vec<Vec<String>> {
    let lines = wrap_text(
        text,
        geometry.content_width_mm(),
        geometry.font_size_pt,
        metrics,
    );

    let mut pages: Vec<Vec<String>> = vec![Vec::new()];
    let mut y = geometry.margin_mm;

    for line in lines {
        if y + geometry.line_height_mm > geometry.page_height_mm - geometry.margin_mm {
            pages.push(Vec::new());
            y = geometry.margin_mm;
        }
        pages.last_mut().expect("at least one page").push(line);
        y += geometry.line_height_mm;
    }

    pages
}

/// Number of lines that fit on one page of `geometry`.
pub fn lines_per_page(geometry: &PageGeometry) -> usize {
    let mut count = 0;
    let mut y = geometry.margin_mm;
    while y + geometry.line_height_mm <= geometry.page_height_mm - geometry.margin_mm {
        count += 1;
        y += geometry.line_height_mm;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PageGeometry {
        PageGeometry::default()
    }

    #[test]
    fn default_geometry_capacity() {
        // A4, 20 mm margins, 7 mm lines: cursor runs 20, 27, … and the last
        // line that fits starts at 270 mm.
        assert_eq!(lines_per_page(&geometry()), 36);
    }

    #[test]
    fn exact_capacity_is_one_page() {
        let n = lines_per_page(&geometry());
        let text = vec!["x"; n].join("\n");
        let pages = paginate(&text, &geometry(), &HelveticaMetrics);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), n);
    }

    #[test]
    fn one_line_over_capacity_overflows_to_page_two() {
        let n = lines_per_page(&geometry());
        let text = vec!["x"; n + 1].join("\n");
        let pages = paginate(&text, &geometry(), &HelveticaMetrics);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], vec!["x".to_string()]);
    }

    #[test]
    fn overflow_character_is_sole_content_of_page_two() {
        let g = geometry();
        let n = lines_per_page(&g);
        // One unbroken word that wraps into exactly n+1 lines: n full lines
        // and a single trailing character.
        let per_line = chars_that_fit(&g);
        let word = "m".repeat(per_line * n + 1);
        let pages = paginate(&word, &g, &HelveticaMetrics);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1][0], "m");
    }

    fn chars_that_fit(g: &PageGeometry) -> usize {
        let metrics = HelveticaMetrics;
        let mut s = String::new();
        loop {
            s.push('m');
            if metrics.text_width_mm(&s, g.font_size_pt) > g.content_width_mm() {
                return s.len() - 1;
            }
        }
    }

    #[test]
    fn empty_text_yields_one_empty_page() {
        let pages = paginate("", &geometry(), &HelveticaMetrics);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn wrap_respects_measured_width() {
        let metrics = HelveticaMetrics;
        // 'W' (944) is much wider than 'i' (222): the same character count
        // must wrap differently.
        let wide = "W ".repeat(40);
        let narrow = "i ".repeat(40);
        let wide_lines = wrap_text(&wide, 50.0, 16.0, &metrics);
        let narrow_lines = wrap_text(&narrow, 50.0, 16.0, &metrics);
        assert!(wide_lines.len() > narrow_lines.len());
        for line in &wide_lines {
            assert!(metrics.text_width_mm(line, 16.0) <= 50.0, "line too wide: {line}");
        }
    }

    #[test]
    fn blank_lines_survive_wrapping() {
        let lines = wrap_text("a\n\nb", 170.0, 16.0, &HelveticaMetrics);
        assert_eq!(lines, vec!["a".to_string(), String::new(), "b".to_string()]);
    }

    #[test]
    fn long_word_is_hard_split() {
        let metrics = HelveticaMetrics;
        let word = "x".repeat(400);
        let lines = wrap_text(&word, 50.0, 16.0, &metrics);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.text_width_mm(line, 16.0) <= 50.0);
        }
        // No characters lost.
        assert_eq!(lines.concat(), word);
    }
}
