use coil::runner::{Frame, RunnerConfig, StoryRunner};
use coil::stories;
use coil::story::StoryCatalog;
use image::RgbaImage;

use crate::Result;

/// Which frame of a story to capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePoint {
    /// The first paint, before mount callbacks ran
    First,
    /// `n` frames after mount
    After(usize),
    /// The first frame with every animation at rest
    Settled,
}

/// Configuration for capturing a story frame
pub struct CaptureConfig {
    /// Display name of the story in the catalog
    pub story_name: String,
    pub frame: FramePoint,
    /// Seconds between frames
    pub frame_dt: f32,
    /// Give up waiting for `Settled` after this many frames
    pub max_frames: usize,
    pub runner: RunnerConfig,
}

impl CaptureConfig {
    pub fn new(story_name: &str, frame: FramePoint) -> Self {
        Self {
            story_name: story_name.to_string(),
            frame,
            frame_dt: 1.0 / 60.0,
            max_frames: 600,
            runner: RunnerConfig::default(),
        }
    }
}

/// Mount a bundled story in-process and render the requested frame.
pub fn capture_story(config: &CaptureConfig) -> Result<RgbaImage> {
    let mut catalog = StoryCatalog::new();
    stories::register_all(&mut catalog)?;
    let mut runner = StoryRunner::mount(&catalog, &config.story_name)?;

    let frame = match config.frame {
        FramePoint::First => runner.current_frame(),
        FramePoint::After(n) => advance(&mut runner, config.frame_dt, n),
        FramePoint::Settled => {
            let mut frames = runner.run_until_settled(config.frame_dt, config.max_frames);
            if !runner.is_idle() {
                return Err(crate::VisualTestError::Capture(format!(
                    "'{}' still animating after {} frames",
                    config.story_name, config.max_frames
                )));
            }
            frames.pop().unwrap_or_else(|| runner.current_frame())
        }
    };
    log::debug!(
        "captured '{}' frame {} ({:?})",
        config.story_name,
        frame.index,
        config.frame
    );

    let image = frame.render(&config.runner)?;
    runner.unmount();
    Ok(image)
}

fn advance(runner: &mut StoryRunner, dt: f32, frames: usize) -> Frame {
    let mut frame = runner.current_frame();
    for _ in 0..frames {
        frame = runner.frame(dt);
    }
    frame
}
