//! Body text, headers, captions and labels

use crate::corpus::Corpus;
use crate::typeface::{TextStyle, Typeface};
use crate::wrap::{justify, wrap_words};
use image::ImageBuffer;
use page_canvas::{Asset, WHITE};
use rand::Rng;

/// Inner padding of a text block, bounded by its size
fn padding(extent: u32) -> u32 {
    (extent / 20).min(10)
}

/// Wrap and draw words starting at `(x, y)`
///
/// Returns the y coordinate below the last drawn line and whether every
/// line fit above `bottom`.
#[allow(clippy::too_many_arguments)]
fn draw_lines(
    image: &mut Asset,
    face: &Typeface,
    words: &[&str],
    x: u32,
    y: u32,
    max_width: u32,
    bottom: u32,
    style: &TextStyle,
    justified: bool,
) -> (u32, bool) {
    let space = face.space(style.size);
    let line_height = face.line_height(style.size);
    let lines = wrap_words(words, max_width, space, |w| {
        face.measure(w, style.size, style.bold)
    });

    let mut y = y;
    for (i, line) in lines.iter().enumerate() {
        if y + style.size > bottom {
            return (y, false);
        }
        let widths: Vec<u32> = line
            .iter()
            .map(|&w| face.measure(words[w], style.size, style.bold))
            .collect();
        let last = i + 1 == lines.len();
        let xs = if justified && !last {
            justify(&widths, x, max_width, space)
        } else {
            let mut cursor = x;
            widths
                .iter()
                .map(|w| {
                    let at = cursor;
                    cursor += w + space;
                    at
                })
                .collect()
        };
        for (&w, &wx) in line.iter().zip(&xs) {
            face.draw_word(image, wx, y, words[w], style);
        }
        y += line_height;
    }
    (y, true)
}

/// Justified paragraphs of corpus text filling a `width` x `height` block
///
/// A bold style renders a short left-aligned header instead.
pub fn render_text_block<R: Rng + ?Sized>(
    face: &Typeface,
    corpus: &Corpus,
    rng: &mut R,
    width: u32,
    height: u32,
    style: &TextStyle,
) -> Asset {
    let mut image: Asset = ImageBuffer::from_pixel(width, height, WHITE);
    let pad_x = padding(width);
    let pad_y = padding(height);
    let max_width = width.saturating_sub(2 * pad_x).max(1);
    let bottom = height.saturating_sub(pad_y);

    if style.bold {
        let count = rng.gen_range(2..=8);
        let header = corpus.sentence(rng, count);
        let header = header.trim_end_matches('.');
        let words: Vec<&str> = header.split_whitespace().collect();
        draw_lines(&mut image, face, &words, pad_x, pad_y, max_width, bottom, style, false);
        return image;
    }

    let mut y = pad_y;
    while y + style.size <= bottom {
        let sentences = rng.gen_range(2..=6);
        let paragraph: Vec<String> = (0..sentences)
            .map(|_| {
                let count = rng.gen_range(6..=20);
                corpus.sentence(rng, count)
            })
            .collect();
        let paragraph = paragraph.join(" ");
        let words: Vec<&str> = paragraph.split_whitespace().collect();

        let (next_y, complete) =
            draw_lines(&mut image, face, &words, pad_x, y, max_width, bottom, style, true);
        if !complete {
            break;
        }
        y = next_y + style.size / 2;
    }

    image
}

/// Single line of text vertically centred in a `width` x `height` asset
pub fn render_label(face: &Typeface, label: &str, width: u32, height: u32, style: &TextStyle) -> Asset {
    let mut image: Asset = ImageBuffer::from_pixel(width, height, WHITE);
    let size = style.size.min(height.saturating_sub(2)).max(1);
    let style = TextStyle { size, ..*style };

    let words: Vec<&str> = label.split_whitespace().collect();
    let space = face.space(size);
    let total: u32 = words
        .iter()
        .map(|w| face.measure(w, size, style.bold))
        .sum::<u32>()
        + space * words.len().saturating_sub(1) as u32;

    let mut x = width.saturating_sub(total) / 2;
    let y = height.saturating_sub(size) / 2;
    for word in words {
        face.draw_word(&mut image, x, y, word, &style);
        x += face.measure(word, size, style.bold) + space;
    }
    image
}

/// Draw a one-line figure caption into the strip `[y, y + height)` of `image`
pub fn draw_caption<R: Rng + ?Sized>(
    image: &mut Asset,
    face: &Typeface,
    corpus: &Corpus,
    rng: &mut R,
    y: u32,
    height: u32,
) {
    if height < 4 {
        return;
    }
    let size = (height * 7 / 10).max(4);
    let style = TextStyle::new(size, false);
    let pad_x = padding(image.width());
    let max_width = image.width().saturating_sub(2 * pad_x).max(1);

    let number = rng.gen_range(1..=12);
    let count = rng.gen_range(4..=12);
    let caption = format!("Figure {}: {}", number, corpus.sentence(rng, count));
    let words: Vec<&str> = caption.split_whitespace().collect();

    let space = face.space(size);
    let lines = wrap_words(&words, max_width, space, |w| face.measure(w, size, false));
    let first = lines.first().cloned().unwrap_or_default();

    let total: u32 = first
        .iter()
        .map(|&i| face.measure(words[i], size, false))
        .sum::<u32>()
        + space * first.len().saturating_sub(1) as u32;
    let mut x = pad_x + max_width.saturating_sub(total) / 2;
    let top = y + (height - size) / 2;
    for i in first {
        face.draw_word(image, x, top, words[i], &style);
        x += face.measure(words[i], size, false) + space;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ink_rows(image: &Asset) -> Vec<u32> {
        (0..image.height())
            .filter(|&y| (0..image.width()).any(|x| *image.get_pixel(x, y) != WHITE))
            .collect()
    }

    #[test]
    fn test_text_block_exact_size_and_inked() {
        let corpus = Corpus::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let image = render_text_block(
            &Typeface::greeked(),
            &corpus,
            &mut rng,
            500,
            300,
            &TextStyle::new(14, false),
        );
        assert_eq!(image.dimensions(), (500, 300));
        let rows = ink_rows(&image);
        assert!(!rows.is_empty());
        // Nothing is drawn into the bottom padding
        assert!(*rows.last().unwrap() < 300 - padding(300));
    }

    #[test]
    fn test_header_is_short() {
        let corpus = Corpus::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let image = render_text_block(
            &Typeface::greeked(),
            &corpus,
            &mut rng,
            1000,
            120,
            &TextStyle::new(32, true),
        );
        let rows = ink_rows(&image);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| y < 120));
    }

    #[test]
    fn test_tiny_block_does_not_panic() {
        let corpus = Corpus::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let image = render_text_block(
            &Typeface::greeked(),
            &corpus,
            &mut rng,
            3,
            2,
            &TextStyle::new(14, false),
        );
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn test_label_centered() {
        let image = render_label(
            &Typeface::greeked(),
            "Page 12",
            100,
            30,
            &TextStyle::new(14, false),
        );
        let rows = ink_rows(&image);
        assert!(!rows.is_empty());
        let xs: Vec<u32> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != WHITE)
            .map(|(x, _, _)| x)
            .collect();
        let min = *xs.iter().min().unwrap();
        let max = *xs.iter().max().unwrap();
        // Roughly symmetric margins
        assert!((min as i64 - (99 - max) as i64).abs() <= 10);
    }

    #[test]
    fn test_caption_stays_in_strip() {
        let corpus = Corpus::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut image: Asset = ImageBuffer::from_pixel(300, 250, WHITE);
        draw_caption(&mut image, &Typeface::greeked(), &corpus, &mut rng, 225, 25);
        let rows = ink_rows(&image);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| y >= 225));
    }
}
