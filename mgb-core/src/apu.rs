//! Audio stub. The machine has no audio output; this module only keeps the
//! audio slot in the per-cycle sub-step order (DMA, PPU, APU, timer) so a
//! real synthesizer can slot in without touching the scheduling.

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ApuState;

impl ApuState {
    pub(crate) fn new() -> Self {
        Self
    }
}

/// Advance the audio unit by one clock tick. Does nothing.
pub(crate) fn tick(_apu_state: &mut ApuState) {}
