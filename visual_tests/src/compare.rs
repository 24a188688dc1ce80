use crate::{Result, VisualTestError};
use image::{Rgba, RgbaImage};
use image_compare::Algorithm;

/// Result of comparing two images
pub struct CompareResult {
    /// Similarity score from 0.0 to 1.0
    pub similarity: f64,
}

/// Compare two images using SSIM algorithm
pub fn compare_images(reference: &RgbaImage, captured: &RgbaImage) -> Result<CompareResult> {
    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "Image dimensions don't match: reference {:?} vs captured {:?}",
            reference.dimensions(),
            captured.dimensions()
        )));
    }

    // SSIM works on grayscale or RGB
    let ref_rgb = image::DynamicImage::ImageRgba8(reference.clone()).to_rgb8();
    let cap_rgb = image::DynamicImage::ImageRgba8(captured.clone()).to_rgb8();

    let result =
        image_compare::rgb_similarity_structure(&Algorithm::MSSIMSimple, &ref_rgb, &cap_rgb)
            .map_err(|e| VisualTestError::Compare(format!("SSIM comparison failed: {}", e)))?;

    Ok(CompareResult {
        similarity: result.score,
    })
}

/// Highlight pixels that differ in red over a dimmed copy of `captured`.
pub fn generate_diff_image(reference: &RgbaImage, captured: &RgbaImage) -> RgbaImage {
    let (width, height) = reference.dimensions();
    let mut diff_img = RgbaImage::new(width, height);

    for (x, y, out) in diff_img.enumerate_pixels_mut() {
        let ref_pixel = reference.get_pixel(x, y);
        let Some(cap_pixel) = captured.get_pixel_checked(x, y) else {
            *out = Rgba([255, 0, 255, 255]);
            continue;
        };

        let diff = pixel_difference(ref_pixel, cap_pixel);
        *out = if diff > 10 {
            let intensity = (diff as f32 / 255.0 * 200.0 + 55.0) as u8;
            Rgba([intensity, 0, 0, 255])
        } else {
            Rgba([cap_pixel[0] / 3, cap_pixel[1] / 3, cap_pixel[2] / 3, 255])
        };
    }

    diff_img
}

/// Calculate the maximum channel difference between two pixels
fn pixel_difference(a: &Rgba<u8>, b: &Rgba<u8>) -> u8 {
    let dr = a[0].abs_diff(b[0]);
    let dg = a[1].abs_diff(b[1]);
    let db = a[2].abs_diff(b[2]);
    dr.max(dg).max(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_images_match() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([200, 100, 50, 255]));
        let result = compare_images(&image, &image.clone()).unwrap();
        assert!(result.similarity > 0.999);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = RgbaImage::new(8, 8);
        let b = RgbaImage::new(8, 9);
        assert!(matches!(
            compare_images(&a, &b),
            Err(VisualTestError::Compare(_))
        ));
    }

    #[test]
    fn test_diff_marks_changed_pixels() {
        let reference = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let mut captured = reference.clone();
        captured.put_pixel(1, 2, Rgba([0, 0, 0, 255]));

        let diff = generate_diff_image(&reference, &captured);
        assert_eq!(*diff.get_pixel(1, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*diff.get_pixel(0, 0), Rgba([85, 85, 85, 255]));
    }
}
