//! Shape measurement.
//!
//! A [`ShapeRef`] is handed to a view before anything is painted. The story
//! runner mounts it with the path data the view actually painted, after which
//! the outline can be measured.

mod path;

pub use path::PathShape;

use std::sync::Arc;

use thiserror::Error;

use crate::reactive::{Signal, create_signal};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Invalid path data {data:?}: {reason}")]
    InvalidPathData { data: String, reason: String },
    #[error("Path data {0:?} has no drawable segments")]
    EmptyPath(String),
    #[error("Shape is not mounted yet")]
    Unmounted,
}

/// A handle to a painted shape.
///
/// Created via [`create_shape_ref()`]. Reads are reactive: an effect reading
/// [`is_mounted`](Self::is_mounted) re-runs when the shape is mounted.
#[derive(Clone, Copy, Debug)]
pub struct ShapeRef {
    signal: Signal<Option<Arc<PathShape>>>,
}

impl ShapeRef {
    pub fn mount(&self, shape: Arc<PathShape>) {
        self.signal.set(Some(shape));
    }

    /// Parse `data` and mount the result.
    pub fn mount_data(&self, data: &str) -> Result<(), ShapeError> {
        let shape = PathShape::parse(data)?;
        self.mount(Arc::new(shape));
        Ok(())
    }

    pub fn unmount(&self) {
        self.signal.set(None);
    }

    pub fn is_mounted(&self) -> bool {
        self.signal.with(Option::is_some)
    }

    pub fn shape(&self) -> Result<Arc<PathShape>, ShapeError> {
        self.signal.get().ok_or(ShapeError::Unmounted)
    }

    /// Total outline length of the mounted shape in user units.
    pub fn total_length(&self) -> Result<f32, ShapeError> {
        self.signal.with(|shape| {
            shape
                .as_ref()
                .map(|shape| shape.total_length() as f32)
                .ok_or(ShapeError::Unmounted)
        })
    }
}

/// Create an unmounted `ShapeRef`.
pub fn create_shape_ref() -> ShapeRef {
    ShapeRef {
        signal: create_signal(None),
    }
}
