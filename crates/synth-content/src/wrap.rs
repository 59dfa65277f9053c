//! Greedy word wrapping against a pixel width

/// Wrap words into lines no wider than `max_width`
///
/// `measure` returns the pixel width of one word and `space` the width of
/// an inter-word gap. A word wider than `max_width` gets a line of its own.
///
/// # Returns
/// Lines of word indices into `words`; never empty
pub fn wrap_words<F>(words: &[&str], max_width: u32, space: u32, measure: F) -> Vec<Vec<usize>>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_width = 0u32;

    for (i, word) in words.iter().enumerate() {
        let width = measure(word);

        if current.is_empty() {
            current.push(i);
            current_width = width;
        } else if current_width + space + width <= max_width {
            current.push(i);
            current_width += space + width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(i);
            current_width = width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(Vec::new());
    }

    lines
}

/// Horizontal positions of the words of one justified line
///
/// The first word starts at `x`; the last word ends at `x + max_width` when
/// the line has more than one word. Single-word lines stay left aligned.
pub fn justify(widths: &[u32], x: u32, max_width: u32, min_space: u32) -> Vec<u32> {
    if widths.len() < 2 {
        return widths.iter().map(|_| x).collect();
    }

    let ink: u32 = widths.iter().sum();
    let gaps = widths.len() as u32 - 1;
    let total_space = max_width.saturating_sub(ink).max(min_space * gaps);
    let base = total_space / gaps;
    let extra = total_space % gaps;

    let mut positions = Vec::with_capacity(widths.len());
    let mut cursor = x;
    for (i, w) in widths.iter().enumerate() {
        positions.push(cursor);
        let gap = base + u32::from((i as u32) < extra);
        cursor += w + gap;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn char_width(word: &str) -> u32 {
        word.chars().count() as u32 * 10
    }

    #[test]
    fn test_wrap_basic() {
        let words = ["aaa", "bb", "cccc", "d"];
        // 30 + 5 + 20 = 55 fits in 60; adding cccc does not
        let lines = wrap_words(&words, 60, 5, char_width);
        assert_eq!(lines, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let words: Vec<&str> = "lorem ipsum dolor sit amet consectetur adipiscing elit"
            .split(' ')
            .collect();
        let lines = wrap_words(&words, 120, 5, char_width);
        for line in &lines {
            let width: u32 = line.iter().map(|&i| char_width(words[i])).sum::<u32>()
                + 5 * (line.len() as u32 - 1);
            assert!(width <= 120 || line.len() == 1);
        }
    }

    #[test]
    fn test_wrap_oversized_word_alone() {
        let words = ["a", "enormousword", "b"];
        let lines = wrap_words(&words, 50, 5, char_width);
        assert_eq!(lines, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_wrap_empty() {
        let lines = wrap_words(&[], 100, 5, char_width);
        assert_eq!(lines, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_justify_fills_width() {
        let widths = [30, 20, 40];
        let pos = justify(&widths, 10, 120, 4);
        assert_eq!(pos[0], 10);
        // Last word ends at the right edge
        assert_eq!(pos[2] + 40, 130);
    }

    #[test]
    fn test_justify_single_word() {
        assert_eq!(justify(&[50], 7, 200, 4), vec![7]);
    }
}
