use crate::targets::BufferSlot;

/// Errors surfaced by the magnifier.
///
/// Missing buffers are not an error: the pipeline renders the scene directly
/// for that frame instead.
#[derive(Debug, thiserror::Error)]
pub enum LensError {
    /// A buffer could not be created at the requested size.
    #[error("cannot allocate {slot} buffer of {width}x{height} (device limit {limit})")]
    BufferAllocation {
        slot: BufferSlot,
        width: u32,
        height: u32,
        limit: u32,
    },

    /// A render backend reported a failed pass.
    #[error("{pass} pass failed: {message}")]
    Render { pass: &'static str, message: String },
}

pub type Result<T, E = LensError> = std::result::Result<T, E>;
