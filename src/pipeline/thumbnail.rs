//! Bounding-box downscale of a rendered page.
//!
//! The target size is computed the way classic image-library `thumbnail`
//! helpers do it: only ever shrink, keep the aspect ratio, and pick between
//! floor and ceil of the derived edge whichever keeps the ratio closest.
//! The derived edge is never smaller than one pixel.

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

/// Size `(width, height)` fits inside `(max_width, max_height)`.
///
/// Returns the input size unchanged when it already fits.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    let (x, y) = (max_width as f64, max_height as f64);

    if x / y >= aspect {
        let w = round_aspect(y * aspect, |n| (aspect - n / y).abs());
        (w, max_height)
    } else {
        let h = round_aspect(x / aspect, |n| {
            if n == 0.0 {
                0.0
            } else {
                (aspect - x / n).abs()
            }
        });
        (max_width, h)
    }
}

fn round_aspect(number: f64, error: impl Fn(f64) -> f64) -> u32 {
    let (lo, hi) = (number.floor(), number.ceil());
    // Ties go to the floor.
    let best = if error(hi) < error(lo) { hi } else { lo };
    best.max(1.0) as u32
}

/// Shrink `image` to fit the bounding box with a Lanczos3 filter.
///
/// Images already inside the box are returned untouched.
pub fn shrink_to_fit(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    let (tw, th) = fit_within(w, h, max_width, max_height);
    if (tw, th) == (w, h) {
        debug!("Page {}x{} px already fits {}x{}", w, h, max_width, max_height);
        return image;
    }

    debug!("Resizing page {}x{} → {}x{} px", w, h, tw, th);
    image.resize_exact(tw, th, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn aspect_close(a: (u32, u32), b: (u32, u32)) -> bool {
        let ra = a.0 as f64 / a.1 as f64;
        let rb = b.0 as f64 / b.1 as f64;
        // One pixel of rounding on the derived edge.
        (ra - rb).abs() <= ra / a.1.min(a.0) as f64 + 1e-9
    }

    #[test]
    fn small_image_is_unchanged() {
        assert_eq!(fit_within(800, 600, 1200, 1754), (800, 600));
        assert_eq!(fit_within(1200, 1754, 1200, 1754), (1200, 1754));
    }

    #[test]
    fn exact_ratio_hits_the_box() {
        assert_eq!(fit_within(2400, 3508, 1200, 1754), (1200, 1754));
    }

    #[test]
    fn a4_at_200_dpi_fits_by_width() {
        let (w, h) = fit_within(1654, 2339, 1200, 1754);
        assert_eq!(w, 1200);
        assert!(h <= 1754);
        assert!(aspect_close((1654, 2339), (w, h)), "got {w}x{h}");
    }

    #[test]
    fn landscape_fits_by_width() {
        assert_eq!(fit_within(3000, 1000, 1200, 1754), (1200, 400));
    }

    #[test]
    fn tall_narrow_fits_by_height() {
        let (w, h) = fit_within(1000, 5000, 1200, 1754);
        assert_eq!(h, 1754);
        assert!(w <= 1200);
        assert!(aspect_close((1000, 5000), (w, h)), "got {w}x{h}");
    }

    #[test]
    fn derived_edge_never_collapses_to_zero() {
        assert_eq!(fit_within(100_000, 10, 1200, 1754), (1200, 1));
    }

    #[test]
    fn shrink_resizes_pixels() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2400, 3508, Rgb([200, 10, 10])));
        let out = shrink_to_fit(img, 1200, 1754);
        assert_eq!((out.width(), out.height()), (1200, 1754));
    }

    #[test]
    fn shrink_leaves_small_image_alone() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 400, Rgb([0, 0, 0])));
        let out = shrink_to_fit(img, 1200, 1754);
        assert_eq!((out.width(), out.height()), (300, 400));
    }
}
