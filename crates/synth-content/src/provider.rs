//! Synthetic content provider

use crate::chart::{render_chart, ChartSpec};
use crate::corpus::Corpus;
use crate::photo::{render_photo, PhotoLibrary, PhotoSource};
use crate::text::{render_label, render_text_block};
use crate::typeface::{TextStyle, Typeface};
use layout::{Category, ContentProvider, FigureKind, RenderError, RenderRequest};
use page_canvas::Asset;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_AXIS_FRACTION: f64 = 0.15;
const DEFAULT_FONT_SIZE: u32 = 16;

/// Renders every drawable category from a corpus, a typeface and an
/// optional photo library
///
/// Rendering is a pure function of the request: all randomness is seeded
/// from `request.context.seed`, so one provider can serve many threads.
///
/// # Example
///
/// ```ignore
/// use synth_content::{Corpus, SyntheticProvider};
///
/// let provider = SyntheticProvider::new(Corpus::embedded()?)
///     .with_axis_fraction(config.axis_fraction);
/// let generator = DatasetGenerator::new(config, provider)?;
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    corpus: Corpus,
    typeface: Typeface,
    photos: Option<PhotoLibrary>,
    axis_fraction: f64,
}

impl SyntheticProvider {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            typeface: Typeface::greeked(),
            photos: None,
            axis_fraction: DEFAULT_AXIS_FRACTION,
        }
    }

    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = typeface;
        self
    }

    /// Draw photos from `library`; an empty library keeps the procedural fallback
    pub fn with_photos(mut self, library: PhotoLibrary) -> Self {
        self.photos = (!library.is_empty()).then_some(library);
        self
    }

    /// Must match the layout's axis fraction so axes land in the annotated strips
    pub fn with_axis_fraction(mut self, fraction: f64) -> Self {
        self.axis_fraction = fraction;
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    pub fn photos(&self) -> Option<&PhotoLibrary> {
        self.photos.as_ref()
    }
}

impl ContentProvider for SyntheticProvider {
    fn render(&self, request: &RenderRequest) -> Result<Asset, RenderError> {
        let RenderRequest {
            category,
            width,
            height,
            ref context,
        } = *request;

        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize {
                category,
                width,
                height,
            });
        }

        let mut rng = StdRng::seed_from_u64(context.seed);
        let font_size = if context.font_size == 0 {
            DEFAULT_FONT_SIZE
        } else {
            context.font_size
        };

        match category {
            Category::Text => Ok(render_text_block(
                &self.typeface,
                &self.corpus,
                &mut rng,
                width,
                height,
                &TextStyle::new(font_size, context.bold),
            )),
            Category::Graph => {
                let spec = ChartSpec {
                    width,
                    height,
                    kind: context.figure.unwrap_or(FigureKind::Line),
                    caption_height: context.caption_height,
                    axis_fraction: self.axis_fraction,
                };
                Ok(render_chart(&self.typeface, &self.corpus, &mut rng, &spec))
            }
            Category::Image => {
                let source = PhotoSource {
                    library: self.photos.as_ref(),
                    face: &self.typeface,
                    corpus: &self.corpus,
                };
                Ok(render_photo(
                    &source,
                    &mut rng,
                    width,
                    height,
                    context.caption_height,
                )?)
            }
            Category::PageNumber => {
                let label = context.label.as_deref().unwrap_or_default();
                Ok(render_label(
                    &self.typeface,
                    label,
                    width,
                    height,
                    &TextStyle::new(font_size, false),
                ))
            }
            derived => Err(RenderError::Unsupported(derived)),
        }
    }
}
