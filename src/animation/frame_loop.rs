//! Per-thread frame loop for running animations.
//!
//! Each animated value registers a ticker once and schedules it whenever it
//! gets a new target. A frame ticks every scheduled ticker with the frame
//! delta; tickers that report they are at rest drop out of the schedule until
//! scheduled again. Cancelling removes the ticker for good (unmount).

use std::cell::RefCell;

use crate::reactive::{FrameRequest, batch, request_frame};

/// Handle to a registered ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationId(usize);

/// Advances one animation by `dt` seconds; returns whether it is still moving.
type Ticker = Box<dyn FnMut(f32) -> bool>;

struct Slot {
    /// `None` while the ticker is running or once cancelled
    ticker: Option<Ticker>,
    cancelled: bool,
}

#[derive(Default)]
struct FrameLoop {
    slots: Vec<Slot>,
    scheduled: Vec<AnimationId>,
}

thread_local! {
    static FRAME_LOOP: RefCell<FrameLoop> = RefCell::new(FrameLoop::default());
}

fn with_frame_loop<F, R>(f: F) -> R
where
    F: FnOnce(&mut FrameLoop) -> R,
{
    FRAME_LOOP.with(|fl| f(&mut fl.borrow_mut()))
}

pub fn register<F>(ticker: F) -> AnimationId
where
    F: FnMut(f32) -> bool + 'static,
{
    with_frame_loop(|fl| {
        let id = AnimationId(fl.slots.len());
        fl.slots.push(Slot {
            ticker: Some(Box::new(ticker)),
            cancelled: false,
        });
        id
    })
}

/// Put a ticker on the schedule for the next frames. Idempotent.
pub fn schedule(id: AnimationId) {
    let scheduled = with_frame_loop(|fl| {
        let live = fl.slots.get(id.0).is_some_and(|slot| !slot.cancelled);
        if live && !fl.scheduled.contains(&id) {
            fl.scheduled.push(id);
        }
        live
    });
    if scheduled {
        log::trace!("scheduled animation {:?}", id);
        request_frame(FrameRequest::ANIMATION);
    }
}

/// Unregister a ticker; it will never run again.
pub fn cancel(id: AnimationId) {
    let ticker = with_frame_loop(|fl| {
        fl.scheduled.retain(|scheduled| *scheduled != id);
        fl.slots.get_mut(id.0).and_then(|slot| {
            slot.cancelled = true;
            slot.ticker.take()
        })
    });
    // Dropped outside the borrow: the ticker may own values with Drop impls.
    drop(ticker);
    log::trace!("cancelled animation {:?}", id);
}

/// Tick every scheduled animation by `dt` seconds.
///
/// Effects triggered by the new values run once, after all tickers.
/// Returns whether any animation is still scheduled.
pub fn tick(dt: f32) -> bool {
    let due = with_frame_loop(|fl| fl.scheduled.clone());
    batch(|| {
        for id in due {
            let Some(mut ticker) = with_frame_loop(|fl| {
                fl.slots.get_mut(id.0).and_then(|slot| slot.ticker.take())
            }) else {
                continue;
            };

            let moving = ticker(dt);

            with_frame_loop(|fl| {
                let Some(slot) = fl.slots.get_mut(id.0) else {
                    return;
                };
                if slot.cancelled {
                    return;
                }
                slot.ticker = Some(ticker);
                if !moving {
                    fl.scheduled.retain(|scheduled| *scheduled != id);
                }
            });
        }
    });
    has_active_animations()
}

pub fn has_active_animations() -> bool {
    with_frame_loop(|fl| !fl.scheduled.is_empty())
}

pub fn active_count() -> usize {
    with_frame_loop(|fl| fl.scheduled.len())
}
