//! Emulation core for the original monochrome handheld (DMG): an LR35902
//! CPU, memory bus, scanline PPU, OAM DMA, timer, and interrupt controller
//! interleaved on a shared 4.194304 MHz clock, plus a disassembler for
//! tracing.
//!
//! The host feeds in a [`Cartridge`] and gamepad state and drives the
//! [`Machine`] one frame at a time; everything else (windowing, input
//! decoding, audio output, persistence) lives outside this crate.

mod apu;
mod bootrom;
mod cpu;
mod disasm;
mod input;
mod machine;
mod memory;
mod ppu;
mod timer;

pub use bootrom::{BootRom, BOOT_ROM_LEN};
pub use cpu::InterruptType;
pub use disasm::{disassemble, BusReader};
pub use input::Gamepad;
pub use machine::{EmulationError, Machine};
pub use memory::Cartridge;
pub use ppu::{FRAME_BUFFER_LEN, SCREEN_HEIGHT, SCREEN_WIDTH};
