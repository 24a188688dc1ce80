//! Mounting and driving stories headlessly.
//!
//! Mounting follows the lifecycle a view sees on screen: the factory runs
//! inside a fresh owner, the first frame is painted, shape refs carried by
//! painted paths are mounted, and only then do the story's mount callbacks
//! run. Frames are driven either with an explicit delta
//! ([`StoryRunner::frame`]) or from a timer ([`StoryRunner::run_realtime`]).

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};
use image::{Rgba, RgbaImage};

use crate::animation::frame_loop;
use crate::draw::{Scene, rasterize};
use crate::reactive::{
    FrameRequest, OwnerId, dispose_owner, peek_frame_request, run_in_owner, take_frame_request,
    with_owner,
};
use crate::story::{StoryCatalog, StoryContext, StoryError, View};

thread_local! {
    /// Name of the story mounted on this thread. The frame loop and frame
    /// requests are per thread, so only one runner may drive them.
    static LIVE_STORY: RefCell<Option<String>> = const { RefCell::new(None) };
}

pub struct RunnerConfig {
    /// Output width in pixels; the height follows the scene's aspect ratio
    pub width: u32,
    /// Frames per second for real-time runs
    pub fps: u32,
    /// Upper bound on frames after the first paint
    pub max_frames: usize,
    /// Write every frame as PNG into this directory
    pub output_dir: Option<PathBuf>,
    pub background: Rgba<u8>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            width: 180,
            fps: 60,
            max_frames: 600,
            output_dir: None,
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

impl RunnerConfig {
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// A painted frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// 0 is the first paint, before mount callbacks ran
    pub index: usize,
    pub scene: Scene,
    /// Whether the view was called for this frame or the last scene reused
    pub repainted: bool,
}

impl Frame {
    pub fn render(&self, config: &RunnerConfig) -> Result<RgbaImage, StoryError> {
        let scale = if self.scene.width > 0.0 {
            config.width as f32 / self.scene.width
        } else {
            1.0
        };
        Ok(rasterize(&self.scene.to_svg(), scale, config.background)?)
    }
}

/// Outcome of [`StoryRunner::run_realtime`].
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Frames painted, the first paint included
    pub frames: usize,
    /// Whether every animation came to rest before `max_frames`
    pub settled: bool,
    pub written: Vec<PathBuf>,
}

/// A mounted story. Dropping it unmounts the story.
///
/// At most one runner is live per thread.
pub struct StoryRunner {
    name: String,
    owner: OwnerId,
    view: View,
    scene: Scene,
    frame_index: usize,
    /// Mount callbacks changed the view; the next frame paints it unticked
    mount_paint: bool,
}

impl StoryRunner {
    /// Mount the story registered as `name`.
    ///
    /// Errors from shape mounting or mount callbacks unmount the story again
    /// before they are returned. Fails with [`StoryError::RunnerBusy`] while
    /// another runner is live on this thread.
    pub fn mount(catalog: &StoryCatalog, name: &str) -> Result<Self, StoryError> {
        let story = catalog.get(name)?;
        if let Some(live) = LIVE_STORY.with(|live| live.borrow().clone()) {
            log::warn!("cannot mount {:?} while {:?} is mounted", story.name(), live);
            return Err(StoryError::RunnerBusy(live));
        }
        let cx = StoryContext::new();

        let (view, owner) = with_owner(|| story.build(&cx));
        let scene = run_in_owner(owner, &view);
        // Setup writes are part of the first paint.
        take_frame_request();

        let mut runner = Self {
            name: story.name().to_string(),
            owner,
            view,
            scene,
            frame_index: 0,
            mount_paint: false,
        };
        LIVE_STORY.with(|live| *live.borrow_mut() = Some(runner.name.clone()));
        log::info!("mounted story {:?}", runner.name);

        if let Err(e) = runner.mount_shapes() {
            log::warn!("mounting shapes of {:?} failed: {}", runner.name, e);
            return Err(e);
        }
        for callback in cx.take_mount_callbacks() {
            if let Err(e) = run_in_owner(owner, callback) {
                log::warn!("mount callback of {:?} failed: {}", runner.name, e);
                return Err(e);
            }
        }
        runner.mount_paint = peek_frame_request().contains(FrameRequest::PAINT);

        Ok(runner)
    }

    fn mount_shapes(&self) -> Result<(), StoryError> {
        for path in self.scene.paths() {
            if let Some(shape_ref) = path.shape_ref {
                shape_ref.mount_data(&path.d)?;
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last painted scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn current_frame(&self) -> Frame {
        Frame {
            index: self.frame_index,
            scene: self.scene.clone(),
            repainted: false,
        }
    }

    /// Advance animations by `dt` seconds and paint the next frame.
    ///
    /// The view is only called again when a signal changed since the last
    /// paint. The first frame after a mount that changed the view paints
    /// that change without advancing animations.
    pub fn frame(&mut self, dt: f32) -> Frame {
        if !std::mem::take(&mut self.mount_paint) {
            frame_loop::tick(dt);
        }

        let repainted = take_frame_request().contains(FrameRequest::PAINT);
        if repainted {
            self.scene = run_in_owner(self.owner, &self.view);
        }
        self.frame_index += 1;

        Frame {
            index: self.frame_index,
            scene: self.scene.clone(),
            repainted,
        }
    }

    /// Whether nothing is left to animate.
    pub fn is_idle(&self) -> bool {
        !frame_loop::has_active_animations()
    }

    /// Paint frames `dt` seconds apart until every animation is at rest, at
    /// most `max_frames` of them.
    pub fn run_until_settled(&mut self, dt: f32, max_frames: usize) -> Vec<Frame> {
        let mut frames = Vec::new();
        for _ in 0..max_frames {
            frames.push(self.frame(dt));
            if self.is_idle() {
                break;
            }
        }
        log::debug!(
            "{:?} ran {} frames, idle: {}",
            self.name,
            frames.len(),
            self.is_idle()
        );
        frames
    }

    /// Paint frames off a timer at `config.fps` until the story is idle or
    /// `config.max_frames` is reached. Frames are measured with the wall
    /// clock, so a slow frame advances the springs further.
    pub fn run_realtime(&mut self, config: &RunnerConfig) -> Result<RunSummary, StoryError> {
        let mut event_loop: EventLoop<Realtime> =
            EventLoop::try_new().map_err(|e| StoryError::EventLoop(e.to_string()))?;

        let mut state = Realtime {
            runner: self,
            config,
            signal: event_loop.get_signal(),
            last_tick: Instant::now(),
            summary: RunSummary::default(),
            error: None,
        };

        let first = state.runner.current_frame();
        state.output(&first)?;

        let interval = config.frame_interval();
        event_loop
            .handle()
            .insert_source(Timer::from_duration(interval), move |_, _, state| {
                if state.tick() {
                    TimeoutAction::ToDuration(interval)
                } else {
                    state.signal.stop();
                    TimeoutAction::Drop
                }
            })
            .map_err(|e| StoryError::EventLoop(e.error.to_string()))?;

        log::info!(
            "running {:?} at {} fps, at most {} frames",
            state.runner.name,
            config.fps,
            config.max_frames
        );
        event_loop
            .run(interval, &mut state, |_| {})
            .map_err(|e| StoryError::EventLoop(e.to_string()))?;

        if let Some(e) = state.error {
            return Err(e);
        }
        state.summary.settled = state.runner.is_idle();
        Ok(state.summary)
    }

    /// Unmount the story: dispose its owner, cancelling its springs.
    pub fn unmount(self) {
        // Drop does the work.
    }
}

impl Drop for StoryRunner {
    fn drop(&mut self) {
        dispose_owner(self.owner);
        LIVE_STORY.with(|live| live.borrow_mut().take());
        log::info!("unmounted story {:?}", self.name);
    }
}

struct Realtime<'a> {
    runner: &'a mut StoryRunner,
    config: &'a RunnerConfig,
    signal: LoopSignal,
    last_tick: Instant,
    summary: RunSummary,
    error: Option<StoryError>,
}

impl Realtime<'_> {
    /// Paint one frame; returns whether to keep going.
    fn tick(&mut self) -> bool {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        let frame = self.runner.frame(dt);
        if let Err(e) = self.output(&frame) {
            self.error = Some(e);
            return false;
        }

        !self.runner.is_idle() && frame.index < self.config.max_frames
    }

    fn output(&mut self, frame: &Frame) -> Result<(), StoryError> {
        self.summary.frames += 1;
        let Some(dir) = &self.config.output_dir else {
            return Ok(());
        };
        let path = write_frame(dir, &self.runner.name, frame, self.config)?;
        self.summary.written.push(path);
        Ok(())
    }
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise. Safe to call
/// more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Render `frame` and save it as `<dir>/<story>_<index>.png`.
pub fn write_frame(
    dir: &Path,
    story: &str,
    frame: &Frame,
    config: &RunnerConfig,
) -> Result<PathBuf, StoryError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{:04}.png", file_stem(story), frame.index));
    frame.render(config)?.save(&path)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
