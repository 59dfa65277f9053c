//! Integration tests for page-canvas

use image::{ImageBuffer, Rgb};
use page_canvas::{
    decode_asset, fit_to_frame, draw, ArtifactFilter, Asset, ImageScaleMode, OutputFormat,
    PageCanvas, BLACK, WHITE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn solid(w: u32, h: u32, color: Rgb<u8>) -> Asset {
    ImageBuffer::from_pixel(w, h, color)
}

#[test]
fn test_composite_multiple_assets() {
    let mut canvas = PageCanvas::blank(200, 300);

    let red = solid(50, 40, Rgb([255, 0, 0]));
    let blue = solid(30, 30, Rgb([0, 0, 255]));
    canvas.paste(&red, 10, 10).unwrap();
    canvas.paste(&blue, 100, 200).unwrap();

    let img = canvas.image();
    assert_eq!(*img.get_pixel(10, 10), Rgb([255, 0, 0]));
    assert_eq!(*img.get_pixel(59, 49), Rgb([255, 0, 0]));
    assert_eq!(*img.get_pixel(60, 50), WHITE);
    assert_eq!(*img.get_pixel(129, 229), Rgb([0, 0, 255]));
}

#[test]
fn test_fitted_asset_pastes_exactly_into_frame() {
    let mut canvas = PageCanvas::blank(400, 400);
    let odd = solid(123, 77, BLACK);

    let fitted = fit_to_frame(&odd, 150, 90, ImageScaleMode::Stretch).unwrap();
    canvas.paste(&fitted, 50, 60).unwrap();

    let img = canvas.image();
    assert_eq!(*img.get_pixel(50, 60), BLACK);
    assert_eq!(*img.get_pixel(199, 149), BLACK);
    assert_eq!(*img.get_pixel(200, 150), WHITE);
}

#[test]
fn test_png_round_trip_preserves_pixels() {
    let mut canvas = PageCanvas::blank(64, 48);
    draw::fill_rect(canvas.image_mut(), 8, 8, 16, 16, BLACK);

    let bytes = canvas.encode(OutputFormat::Png).unwrap();
    let decoded = decode_asset(&bytes).unwrap();
    assert_eq!(&decoded, canvas.image());
}

#[test]
fn test_artifact_filter_then_save() {
    let dir = std::env::temp_dir().join(format!("page-canvas-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("page.jpg");

    let canvas = PageCanvas::blank(120, 80);
    let mut rng = StdRng::seed_from_u64(11);
    let filtered = ArtifactFilter::new(6, Some(60))
        .apply(&mut rng, canvas.image())
        .unwrap();
    PageCanvas::from_image(filtered)
        .save(&path, OutputFormat::Jpeg { quality: 90 })
        .unwrap();

    let decoded = decode_asset(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(decoded.dimensions(), (120, 80));

    std::fs::remove_dir_all(&dir).unwrap();
}
