/// What the frame loop does after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface; reconfigured, next frame can render.
    Reconfigured,
    /// Timeout or unspecified failure; drop this frame only.
    SkipFrame,
    /// Out of memory; the app should exit.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
