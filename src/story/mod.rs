//! Story catalog: named demo views registered for visual testing.
//!
//! A story is a factory called once per mount. It creates its signals and
//! springs, queues work for after the first paint with
//! [`StoryContext::on_mount`] and returns a [`View`] the runner calls each
//! time the scene has to be repainted.

use std::cell::RefCell;

use thiserror::Error;

use crate::draw::{RenderError, Scene};
use crate::shape::{ShapeError, ShapeRef, create_shape_ref};

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("A story named {0:?} is already registered")]
    DuplicateStory(String),
    #[error("No story named {0:?}")]
    UnknownStory(String),
    #[error("Story {0:?} is already mounted on this thread")]
    RunnerBusy(String),
    #[error("Mount failed: {0}")]
    Mount(#[from] ShapeError),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("Event loop error: {0}")]
    EventLoop(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Paints the current state of a story.
pub type View = Box<dyn Fn() -> Scene>;

type MountCallback = Box<dyn FnOnce() -> Result<(), StoryError>>;
type StoryFactory = Box<dyn Fn(&StoryContext) -> View>;

/// Handed to a story factory while it builds its view.
#[derive(Default)]
pub struct StoryContext {
    mount_callbacks: RefCell<Vec<MountCallback>>,
}

impl StoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` once, after the first paint, when shape refs are mounted.
    pub fn on_mount<F>(&self, f: F)
    where
        F: FnOnce() -> Result<(), StoryError> + 'static,
    {
        self.mount_callbacks.borrow_mut().push(Box::new(f));
    }

    /// A shape ref, mounted by the runner once a path carrying it is painted.
    pub fn shape_ref(&self) -> ShapeRef {
        create_shape_ref()
    }

    /// Take the queued mount callbacks, in registration order.
    pub fn take_mount_callbacks(&self) -> Vec<MountCallback> {
        std::mem::take(&mut *self.mount_callbacks.borrow_mut())
    }
}

pub struct Story {
    name: String,
    factory: StoryFactory,
}

impl Story {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(&self, cx: &StoryContext) -> View {
        (self.factory)(cx)
    }
}

impl std::fmt::Debug for Story {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Story").field("name", &self.name).finish()
    }
}

/// Stories by display name, in registration order.
#[derive(Default, Debug)]
pub struct StoryCatalog {
    stories: Vec<Story>,
}

impl StoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), StoryError>
    where
        F: Fn(&StoryContext) -> View + 'static,
    {
        let name = name.into();
        if self.stories.iter().any(|story| story.name == name) {
            return Err(StoryError::DuplicateStory(name));
        }
        log::debug!("registered story {:?}", name);
        self.stories.push(Story {
            name,
            factory: Box::new(factory),
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Story, StoryError> {
        self.stories
            .iter()
            .find(|story| story.name == name)
            .ok_or_else(|| StoryError::UnknownStory(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stories.iter().map(|story| story.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
