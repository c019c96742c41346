use crate::cpu::InterruptType;
use crate::memory::ioregisters::{IoRegister, IoRegisters};

/// Advance the timer subsystem by one clock tick.
///
/// `clock` is the machine's free-running 4 MHz counter *before* this tick's
/// increment; the divider and TIMA fire when their divisor bits roll over.
pub(crate) fn tick(io_registers: &mut IoRegisters, clock: u64) {
    // The divider increments every 256th clock regardless of TAC
    if clock & 0xFF == 0 {
        let divider = io_registers.read_register(IoRegister::DIV);
        io_registers.privileged_set_div(divider.wrapping_add(1));
    }

    let timer_control = io_registers.read_register(IoRegister::TAC);
    if timer_control & 0x04 == 0 {
        // TIMA updates are disabled
        return;
    }

    let divisor_mask: u64 = match timer_control & 0x03 {
        0x00 => 0x03FF, // 4096 Hz
        0x01 => 0x000F, // 262144 Hz
        0x02 => 0x003F, // 65536 Hz
        0x03 => 0x00FF, // 16384 Hz
        _ => panic!("{timer_control} & 0x03 produced a value outside 0x00-0x03"),
    };

    if clock & divisor_mask != 0 {
        return;
    }

    let counter = io_registers.read_register(IoRegister::TIMA);
    match counter.overflowing_add(1) {
        (new_counter, false) => {
            io_registers.write_register(IoRegister::TIMA, new_counter);
        }
        (_, true) => {
            // Overflow reloads TIMA from the modulo register and requests
            // the timer interrupt
            let timer_modulo = io_registers.read_register(IoRegister::TMA);
            io_registers.write_register(IoRegister::TIMA, timer_modulo);
            io_registers.interrupt_flags().set(InterruptType::Timer);
        }
    }
}
