mod capture;
mod compare;

pub use capture::{CaptureConfig, FramePoint, capture_story};
pub use compare::{CompareResult, compare_images, generate_diff_image};

use std::path::PathBuf;

use coil::story::StoryError;
use image::{Rgba, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("Failed to capture story: {0}")]
    Capture(String),
    #[error("Failed to compare images: {0}")]
    Compare(String),
    #[error("Reference image not found: {0} (run with UPDATE_REFERENCES=1)")]
    ReferenceNotFound(PathBuf),
    #[error("Story error: {0}")]
    Story(#[from] StoryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

/// Configuration for a visual test
#[derive(Clone)]
pub struct VisualTestConfig {
    /// Display name of the story
    pub story_name: String,
    /// Name of the reference image, without extension
    pub reference_name: String,
    pub frame: FramePoint,
    /// Similarity threshold (0.0 to 1.0, default 0.99)
    pub similarity_threshold: f64,
}

impl Default for VisualTestConfig {
    fn default() -> Self {
        Self {
            story_name: String::new(),
            reference_name: String::new(),
            frame: FramePoint::Settled,
            similarity_threshold: 0.99,
        }
    }
}

/// Result of a visual test
pub struct VisualTestResult {
    /// Whether the test passed (similarity >= threshold)
    pub passed: bool,
    /// The similarity score (0.0 to 1.0)
    pub similarity: f64,
    /// Path to the captured frame
    pub captured_path: PathBuf,
    /// Path to the reference image
    pub reference_path: PathBuf,
    /// Path to diff image (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

/// Get the path to the references directory
pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

/// Get the path to a reference image
pub fn reference_path(name: &str) -> PathBuf {
    references_dir().join(format!("{}.png", name))
}

/// Get the path to the output directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

/// Get the path to a captured frame
pub fn captured_path(name: &str) -> PathBuf {
    output_dir().join(format!("{}_captured.png", name))
}

/// Get the path to a diff image
pub fn diff_path(name: &str) -> PathBuf {
    output_dir().join(format!("{}_diff.png", name))
}

fn capture_frame(config: &VisualTestConfig) -> Result<RgbaImage> {
    capture_story(&CaptureConfig::new(&config.story_name, config.frame))
}

/// Run a visual regression test.
///
/// References are written by [`update_reference`]; a missing one is an error.
pub fn run_visual_test(config: &VisualTestConfig) -> Result<VisualTestResult> {
    let ref_path = reference_path(&config.reference_name);
    if !ref_path.exists() {
        return Err(VisualTestError::ReferenceNotFound(ref_path));
    }

    std::fs::create_dir_all(output_dir())?;
    let cap_path = captured_path(&config.reference_name);

    let captured = capture_frame(config)?;
    captured.save(&cap_path)?;

    let reference = image::open(&ref_path)?.to_rgba8();
    let compare_result = compare_images(&reference, &captured)?;
    let passed = compare_result.similarity >= config.similarity_threshold;

    let diff = if !passed {
        let diff_file = diff_path(&config.reference_name);
        generate_diff_image(&reference, &captured).save(&diff_file)?;
        Some(diff_file)
    } else {
        None
    };

    Ok(VisualTestResult {
        passed,
        similarity: compare_result.similarity,
        captured_path: cap_path,
        reference_path: ref_path,
        diff_path: diff,
    })
}

/// Update the reference image for a story frame
pub fn update_reference(config: &VisualTestConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;

    let ref_path = reference_path(&config.reference_name);
    capture_frame(config)?.save(&ref_path)?;

    log::info!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}

/// Number of pixels in `image` that differ from the runner's background.
pub fn stroke_pixels(image: &RgbaImage) -> usize {
    let background: Rgba<u8> = coil::runner::RunnerConfig::default().background;
    coil::draw::painted_pixels(image, background)
}
