use bitflags::bitflags;

/// Visual layers, back to front. The stacking order is fixed for the
/// lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Terrain,
    Underlay,
    Units,
    Overlay,
}

impl Layer {
    /// Paint order, back to front.
    pub const Z_ORDER: [Layer; 4] = [
        Layer::Terrain,
        Layer::Underlay,
        Layer::Units,
        Layer::Overlay,
    ];

    pub fn mask(self) -> LayerMask {
        match self {
            Layer::Terrain => LayerMask::TERRAIN,
            Layer::Underlay => LayerMask::UNDERLAY,
            Layer::Units => LayerMask::UNITS,
            Layer::Overlay => LayerMask::OVERLAY,
        }
    }
}

bitflags! {
    /// One dirty bit per layer.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LayerMask: u8 {
        const TERRAIN = 1;
        const UNDERLAY = 1 << 1;
        const UNITS = 1 << 2;
        const OVERLAY = 1 << 3;
    }
}

/// Coalesces any number of dirty marks into at most one repaint per frame.
///
/// `begin_frame` clears the pending guard before anything else, so a
/// mutation arriving during paint schedules a fresh, later frame rather
/// than being lost.
#[derive(Debug, Default)]
pub struct RepaintCoalescer {
    dirty: LayerMask,
    frame_pending: bool,
}

impl RepaintCoalescer {
    pub fn mark(&mut self, layer: Layer) {
        self.dirty |= layer.mask();
        self.frame_pending = true;
    }

    pub fn mark_all(&mut self) {
        self.dirty = LayerMask::all();
        self.frame_pending = true;
    }

    /// Request a frame without dirtying any live layer. Used when the view
    /// switches to or from a historical snapshot.
    pub fn schedule(&mut self) {
        self.frame_pending = true;
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn begin_frame(&mut self) {
        self.frame_pending = false;
    }

    /// The accumulated dirty set, cleared on read. Only the live paint
    /// path consumes this; historical paints leave it untouched.
    pub fn take_dirty(&mut self) -> LayerMask {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty(&self) -> LayerMask {
        self.dirty
    }
}
