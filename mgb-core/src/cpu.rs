pub(crate) mod instructions;
mod registers;

#[cfg(test)]
mod tests;

use crate::memory::ioregisters::IoRegister;
use crate::memory::AddressSpace;

pub use registers::{CpuRegister, CpuRegisterPair, CpuRegisters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    VBlank,
    LcdStatus,
    Timer,
    Serial,
    Joypad,
}

impl InterruptType {
    /// All interrupt sources in dispatch priority order, V-blank first.
    pub const PRIORITY_ORDER: [Self; 5] = [
        Self::VBlank,
        Self::LcdStatus,
        Self::Timer,
        Self::Serial,
        Self::Joypad,
    ];

    /// This source's bit in the IE and IF registers.
    pub fn bit(self) -> u8 {
        match self {
            Self::VBlank => 1 << 0,
            Self::LcdStatus => 1 << 1,
            Self::Timer => 1 << 2,
            Self::Serial => 1 << 3,
            Self::Joypad => 1 << 4,
        }
    }

    /// The fixed address of this source's interrupt handler.
    pub fn handler_address(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::LcdStatus => 0x0048,
            Self::Timer => 0x0050,
            Self::Serial => 0x0058,
            Self::Joypad => 0x0060,
        }
    }
}

// Clock cycles consumed by interrupt dispatch (two stack push cycles)
pub(crate) const ISR_CYCLES_REQUIRED: u32 = 8;

/// The set of interrupt sources that are both requested and enabled,
/// regardless of the IME flag.
pub(crate) fn pending_interrupts(address_space: &AddressSpace) -> u8 {
    let requested = address_space.get_io_registers().read_register(IoRegister::IF);
    requested & address_space.get_ie_register() & 0x1F
}

/// The highest-priority interrupt that is requested and enabled, if any.
pub(crate) fn highest_priority_interrupt(address_space: &AddressSpace) -> Option<InterruptType> {
    let pending = pending_interrupts(address_space);
    InterruptType::PRIORITY_ORDER
        .into_iter()
        .find(|interrupt_type| pending & interrupt_type.bit() != 0)
}

/// Dispatch the given interrupt: clear its request bit, clear IME, push PC,
/// and jump to the handler vector.
pub(crate) fn execute_interrupt_service_routine(
    cpu_registers: &mut CpuRegisters,
    address_space: &mut AddressSpace,
    interrupt_type: InterruptType,
) {
    log::trace!("Dispatching {interrupt_type:?} interrupt from pc {:04X}", cpu_registers.pc);

    address_space
        .get_io_registers_mut()
        .interrupt_flags()
        .clear(interrupt_type);
    cpu_registers.ime = false;

    cpu_registers.sp = cpu_registers.sp.wrapping_sub(2);
    address_space.write_address_u16(cpu_registers.sp, cpu_registers.pc);

    cpu_registers.pc = interrupt_type.handler_address();
}
