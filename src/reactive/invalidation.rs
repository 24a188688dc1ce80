use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};
use std::thread::{self, ThreadId};

use bitflags::bitflags;

bitflags! {
    /// What the next frame has to do.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct FrameRequest: u8 {
        /// A signal changed; the view has to be repainted.
        const PAINT     = 0b01;
        /// A spring was scheduled on the frame loop.
        const ANIMATION = 0b10;
    }
}

/// Pending requests keyed by the thread that drives the frames.
///
/// Shared by all threads so a write from a worker reaches the thread whose
/// runtime owns the signal.
static FRAME_REQUESTS: LazyLock<Mutex<HashMap<ThreadId, FrameRequest>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Ask the frame driver of the current thread for another frame.
///
/// Requests coalesce: any number of calls between two frames produce one.
pub fn request_frame(request: FrameRequest) {
    request_frame_on(thread::current().id(), request);
}

/// Ask the frame driver running on `thread` for another frame.
pub fn request_frame_on(thread: ThreadId, request: FrameRequest) {
    let mut pending = FRAME_REQUESTS.lock().expect("frame requests poisoned");
    *pending.entry(thread).or_default() |= request;
}

/// Take and clear the current thread's pending request.
pub fn take_frame_request() -> FrameRequest {
    FRAME_REQUESTS
        .lock()
        .expect("frame requests poisoned")
        .remove(&thread::current().id())
        .unwrap_or_default()
}

/// Check the current thread's pending request without clearing it.
pub fn peek_frame_request() -> FrameRequest {
    FRAME_REQUESTS
        .lock()
        .expect("frame requests poisoned")
        .get(&thread::current().id())
        .copied()
        .unwrap_or_default()
}
