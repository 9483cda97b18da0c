//! Offscreen buffer ownership.

use std::fmt;

use loupe_engine::coords::{Size, Viewport};

use crate::error::Result;

/// The three offscreen buffers the pipeline renders through.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferSlot {
    /// The scene at its normal viewport.
    Original,
    /// The scene through the magnifying viewport.
    Zoomed,
    /// Lens output awaiting the antialiasing pass.
    Filtered,
}

impl BufferSlot {
    pub const ALL: [BufferSlot; 3] = [BufferSlot::Original, BufferSlot::Zoomed, BufferSlot::Filtered];

    pub fn label(self) -> &'static str {
        match self {
            BufferSlot::Original => "loupe original buffer",
            BufferSlot::Zoomed => "loupe zoomed buffer",
            BufferSlot::Filtered => "loupe filtered buffer",
        }
    }
}

impl fmt::Display for BufferSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferSlot::Original => "original",
            BufferSlot::Zoomed => "zoomed",
            BufferSlot::Filtered => "filtered",
        };
        f.write_str(name)
    }
}

/// Creates and releases offscreen color buffers.
///
/// Buffers are linearly filtered 8-bit RGBA color surfaces without
/// depth/stencil.
pub trait BufferAllocator {
    type Buffer;

    /// Allocates a buffer of `size` device pixels. Failures propagate.
    fn allocate(&mut self, slot: BufferSlot, size: Size) -> Result<Self::Buffer>;

    /// Releases the GPU side of `buffer`.
    fn release(&mut self, buffer: Self::Buffer);
}

/// The allocated buffer set.
#[derive(Debug)]
pub struct LensBuffers<B> {
    pub original: B,
    pub zoomed: B,
    pub filtered: B,
}

/// Owns the magnifier's offscreen buffers and reallocates them when the
/// device-pixel screen size changes.
///
/// `original` and `filtered` always match the screen. `zoomed` starts at the
/// screen size and may be shrunk by [`ensure_zoomed_resolution`] when the
/// magnified extent would exceed hardware limits.
///
/// [`ensure_zoomed_resolution`]: LensTargets::ensure_zoomed_resolution
#[derive(Debug)]
pub struct LensTargets<B> {
    buffers: Option<LensBuffers<B>>,
    /// Screen size the set was allocated for.
    size: Option<Size>,
    zoomed_size: Size,
}

impl<B> LensTargets<B> {
    pub fn new() -> Self {
        Self {
            buffers: None,
            size: None,
            zoomed_size: Size::default(),
        }
    }

    /// Allocated buffers, or `None` before the first successful
    /// [`ensure_buffers`](Self::ensure_buffers) or after disposal.
    pub fn buffers(&self) -> Option<&LensBuffers<B>> {
        self.buffers.as_ref()
    }

    /// Screen size the current set was allocated for.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Current size of the zoomed buffer.
    pub fn zoomed_size(&self) -> Option<Size> {
        self.buffers.as_ref().map(|_| self.zoomed_size)
    }

    /// Makes sure all three buffers exist at `round(logical * pixel_ratio)`.
    ///
    /// Does nothing when that size equals the current allocation. Otherwise
    /// the old set is disposed first. If any allocation fails the partially
    /// built set is released and the error returned; the targets are then
    /// empty and the pipeline renders unmagnified until a later call succeeds.
    pub fn ensure_buffers<A>(
        &mut self,
        alloc: &mut A,
        logical: Viewport,
        pixel_ratio: f32,
    ) -> Result<()>
    where
        A: BufferAllocator<Buffer = B> + ?Sized,
    {
        let size = Size::from_logical(logical.width, logical.height, pixel_ratio);

        if self.size == Some(size) && self.buffers.is_some() {
            return Ok(());
        }

        self.dispose(alloc);
        log::debug!("allocating lens buffers at {}x{}", size.width, size.height);

        let original = alloc.allocate(BufferSlot::Original, size)?;
        let zoomed = match alloc.allocate(BufferSlot::Zoomed, size) {
            Ok(b) => b,
            Err(e) => {
                alloc.release(original);
                return Err(e);
            }
        };
        let filtered = match alloc.allocate(BufferSlot::Filtered, size) {
            Ok(b) => b,
            Err(e) => {
                alloc.release(original);
                alloc.release(zoomed);
                return Err(e);
            }
        };

        self.buffers = Some(LensBuffers { original, zoomed, filtered });
        self.size = Some(size);
        self.zoomed_size = size;
        Ok(())
    }

    /// Resizes only the zoomed buffer to `resolution`.
    ///
    /// No-op when the set is not allocated or the size already matches. On
    /// failure the whole set is disposed.
    pub fn ensure_zoomed_resolution<A>(&mut self, alloc: &mut A, resolution: Size) -> Result<()>
    where
        A: BufferAllocator<Buffer = B> + ?Sized,
    {
        let Some(buffers) = self.buffers.as_mut() else {
            return Ok(());
        };
        if self.zoomed_size == resolution {
            return Ok(());
        }

        log::debug!(
            "resizing zoomed buffer {}x{} -> {}x{}",
            self.zoomed_size.width,
            self.zoomed_size.height,
            resolution.width,
            resolution.height,
        );

        match alloc.allocate(BufferSlot::Zoomed, resolution) {
            Ok(zoomed) => {
                let old = std::mem::replace(&mut buffers.zoomed, zoomed);
                alloc.release(old);
                self.zoomed_size = resolution;
                Ok(())
            }
            Err(e) => {
                self.dispose(alloc);
                Err(e)
            }
        }
    }

    /// Releases every buffer. Safe to call repeatedly.
    pub fn dispose<A>(&mut self, alloc: &mut A)
    where
        A: BufferAllocator<Buffer = B> + ?Sized,
    {
        self.size = None;
        self.zoomed_size = Size::default();
        let Some(LensBuffers { original, zoomed, filtered }) = self.buffers.take() else {
            return;
        };
        log::debug!("releasing lens buffers");
        alloc.release(original);
        alloc.release(zoomed);
        alloc.release(filtered);
    }
}

impl<B> Default for LensTargets<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::LensError;

    /// Hands out numbered buffers and records every call.
    #[derive(Debug, Default)]
    pub(crate) struct CountingAllocator {
        pub next_id: u32,
        pub allocated: Vec<(BufferSlot, Size)>,
        pub released: Vec<u32>,
        /// Fail the allocation with this index (0-based, counted over all calls).
        pub fail_at: Option<usize>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct FakeBuffer {
        pub id: u32,
        pub slot: BufferSlot,
        pub size: Size,
    }

    impl BufferAllocator for CountingAllocator {
        type Buffer = FakeBuffer;

        fn allocate(&mut self, slot: BufferSlot, size: Size) -> Result<FakeBuffer> {
            if self.fail_at == Some(self.allocated.len()) {
                self.allocated.push((slot, size));
                return Err(LensError::BufferAllocation {
                    slot,
                    width: size.width,
                    height: size.height,
                    limit: 0,
                });
            }
            self.allocated.push((slot, size));
            self.next_id += 1;
            Ok(FakeBuffer { id: self.next_id, slot, size })
        }

        fn release(&mut self, buffer: FakeBuffer) {
            self.released.push(buffer.id);
        }
    }

    fn ids(b: &LensBuffers<FakeBuffer>) -> [u32; 3] {
        [b.original.id, b.zoomed.id, b.filtered.id]
    }

    // ── ensure_buffers ────────────────────────────────────────────────────

    #[test]
    fn first_call_allocates_scaled_size() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();

        targets.ensure_buffers(&mut alloc, Viewport::new(400.0, 300.0), 2.0).unwrap();
        let b = targets.buffers().unwrap();
        assert_eq!(b.original.size, Size::new(800, 600));
        assert_eq!(b.zoomed.slot, BufferSlot::Zoomed);
        assert_eq!(alloc.allocated.len(), 3);
        assert_eq!(targets.size(), Some(Size::new(800, 600)));
    }

    #[test]
    fn identical_inputs_do_not_reallocate() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();

        targets.ensure_buffers(&mut alloc, Viewport::new(800.0, 600.0), 1.0).unwrap();
        let first = ids(targets.buffers().unwrap());
        targets.ensure_buffers(&mut alloc, Viewport::new(800.0, 600.0), 1.0).unwrap();
        let second = ids(targets.buffers().unwrap());

        assert_eq!(first, second);
        assert_eq!(alloc.allocated.len(), 3);
        assert!(alloc.released.is_empty());
    }

    #[test]
    fn pixel_ratio_change_reallocates_after_release() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();

        targets.ensure_buffers(&mut alloc, Viewport::new(800.0, 600.0), 1.0).unwrap();
        let first = ids(targets.buffers().unwrap());
        targets.ensure_buffers(&mut alloc, Viewport::new(800.0, 600.0), 1.5).unwrap();
        let b = targets.buffers().unwrap();

        assert_eq!(b.filtered.size, Size::new(1200, 900));
        assert_eq!(alloc.released, first.to_vec());
        assert_eq!(alloc.allocated.len(), 6);
    }

    #[test]
    fn same_device_size_from_different_inputs_is_reused() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();

        targets.ensure_buffers(&mut alloc, Viewport::new(800.0, 600.0), 1.0).unwrap();
        targets.ensure_buffers(&mut alloc, Viewport::new(400.0, 300.0), 2.0).unwrap();
        assert_eq!(alloc.allocated.len(), 3);
    }

    #[test]
    fn failed_allocation_releases_partial_set() {
        let mut alloc = CountingAllocator { fail_at: Some(2), ..Default::default() };
        let mut targets = LensTargets::<FakeBuffer>::new();

        let err = targets.ensure_buffers(&mut alloc, Viewport::new(800.0, 600.0), 1.0);
        assert!(matches!(err, Err(LensError::BufferAllocation { slot: BufferSlot::Filtered, .. })));
        assert_eq!(alloc.released, vec![1, 2]);
        assert!(targets.buffers().is_none());
        assert_eq!(targets.size(), None);
    }

    // ── ensure_zoomed_resolution ──────────────────────────────────────────

    #[test]
    fn zoomed_resize_touches_only_zoomed() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();
        targets.ensure_buffers(&mut alloc, Viewport::new(4000.0, 3000.0), 1.0).unwrap();
        let before = ids(targets.buffers().unwrap());

        targets.ensure_zoomed_resolution(&mut alloc, Size::new(1820, 1365)).unwrap();
        let after = ids(targets.buffers().unwrap());

        assert_eq!(after[0], before[0]);
        assert_ne!(after[1], before[1]);
        assert_eq!(after[2], before[2]);
        assert_eq!(alloc.released, vec![before[1]]);
        assert_eq!(targets.zoomed_size(), Some(Size::new(1820, 1365)));
    }

    #[test]
    fn zoomed_resize_keeps_base_size_idempotent() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();
        targets.ensure_buffers(&mut alloc, Viewport::new(4000.0, 3000.0), 1.0).unwrap();
        targets.ensure_zoomed_resolution(&mut alloc, Size::new(1820, 1365)).unwrap();
        targets.ensure_zoomed_resolution(&mut alloc, Size::new(1820, 1365)).unwrap();
        let count = alloc.allocated.len();

        targets.ensure_buffers(&mut alloc, Viewport::new(4000.0, 3000.0), 1.0).unwrap();
        assert_eq!(alloc.allocated.len(), count);
        assert_eq!(count, 4);
    }

    #[test]
    fn zoomed_resize_without_buffers_is_noop() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::<FakeBuffer>::new();
        targets.ensure_zoomed_resolution(&mut alloc, Size::new(10, 10)).unwrap();
        assert!(alloc.allocated.is_empty());
    }

    // ── dispose ───────────────────────────────────────────────────────────

    #[test]
    fn dispose_is_idempotent() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();
        targets.ensure_buffers(&mut alloc, Viewport::new(8.0, 8.0), 1.0).unwrap();

        targets.dispose(&mut alloc);
        targets.dispose(&mut alloc);

        assert_eq!(alloc.released.len(), 3);
        assert!(targets.buffers().is_none());
        assert_eq!(targets.zoomed_size(), None);
    }

    #[test]
    fn ensure_after_dispose_reallocates() {
        let mut alloc = CountingAllocator::default();
        let mut targets = LensTargets::new();
        targets.ensure_buffers(&mut alloc, Viewport::new(8.0, 8.0), 1.0).unwrap();
        targets.dispose(&mut alloc);
        targets.ensure_buffers(&mut alloc, Viewport::new(8.0, 8.0), 1.0).unwrap();
        assert_eq!(alloc.allocated.len(), 6);
    }
}
