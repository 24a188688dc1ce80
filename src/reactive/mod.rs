pub mod effect;
pub mod invalidation;
pub mod maybe_dyn;
pub mod owner;
pub mod runtime;
pub mod signal;
pub mod storage;

pub use effect::{Effect, create_effect};
pub use invalidation::{
    FrameRequest, peek_frame_request, request_frame, request_frame_on, take_frame_request,
};
pub use maybe_dyn::{IntoMaybeDyn, MaybeDyn};
pub use owner::{OwnerId, current_owner, dispose_owner, on_cleanup, run_in_owner, with_owner};
pub use runtime::batch;
pub use signal::{ReadSignal, Signal, WriteSignal, create_signal};
