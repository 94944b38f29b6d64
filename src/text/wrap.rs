use crate::text::measure::TextMeasure;

/// Separator between paragraphs inside one caption.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Greedily break `text` into display lines that fit `target_width - margin`.
///
/// Paragraphs (split on [`PARAGRAPH_SEPARATOR`]) and single `\n` breaks inside a paragraph are
/// hard breaks, and each of them yields at least one line, so an intentionally blank paragraph
/// keeps its vertical space as an empty line.
///
/// A candidate line is accepted while `measure(candidate) < target_width - margin`. When a word
/// does not fit, the line built so far is emitted (empty or not) and the word starts the next
/// line. Words are never split: a word wider than the budget ends up alone on an overflowing
/// line. Candidates are re-measured as whole strings so shaping across the joining space matches
/// what gets drawn.
pub fn wrap<M>(text: &str, target_width: f32, margin: f32, measure: &mut M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let budget = target_width - margin;
    let text = text.replace("\r\n", "\n");
    let mut lines = Vec::new();

    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        for segment in paragraph.split('\n') {
            wrap_segment(segment, budget, measure, &mut lines);
        }
    }

    lines
}

fn wrap_segment<M>(segment: &str, budget: f32, measure: &mut M, out: &mut Vec<String>)
where
    M: TextMeasure + ?Sized,
{
    let mut current = String::new();

    for word in segment.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if measure.measure(&candidate) < budget {
            current = candidate;
        } else {
            out.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }

    out.push(current);
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
