use crate::apu::{self, ApuState};
use crate::bootrom::BootRom;
use crate::cpu::instructions::{self, ParseError};
use crate::cpu::{self, CpuRegisters, InterruptType};
use crate::disasm::{self, BusReader};
use crate::input::Gamepad;
use crate::memory::{AddressSpace, Cartridge};
use crate::ppu::{self, PpuState, FRAME_BUFFER_LEN};
use crate::timer;
use std::fmt::Write;
use thiserror::Error;

// Clock ticks per CPU machine cycle
const CYCLES_PER_M_CYCLE: u32 = 4;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulationError {
    #[error("undefined opcode {opcode:#04X} at pc {pc:#06X}")]
    UndefinedOpcode { opcode: u8, pc: u16 },
    #[error("STOP executed; low-power mode is not implemented")]
    StopExecuted,
}

impl From<ParseError> for EmulationError {
    fn from(err: ParseError) -> Self {
        let ParseError::UndefinedOpcode { opcode, pc } = err;
        Self::UndefinedOpcode { opcode, pc }
    }
}

/// The whole console: CPU, bus, PPU, DMA, timer, and the (stubbed) APU,
/// interleaved on a shared 4.194304 MHz clock.
///
/// The machine is single-threaded; the host drives it one instruction or one
/// frame at a time and reads the frame buffer between frames.
pub struct Machine {
    address_space: AddressSpace,
    cpu_registers: CpuRegisters,
    ppu_state: PpuState,
    apu_state: ApuState,
    clock: u64,
    trace: bool,
}

impl Machine {
    /// Create a machine around the given cartridge.
    ///
    /// With `use_boot_rom` set the machine starts executing the embedded
    /// boot image at `0x0000`; if this build carries no boot image (see
    /// [`BootRom::embedded`]), or with `use_boot_rom` unset, the machine
    /// starts from the published post-boot register state at the cartridge
    /// entry point.
    pub fn new(cartridge: Cartridge, use_boot_rom: bool) -> Self {
        let boot_rom = if use_boot_rom {
            let boot_rom = BootRom::embedded();
            if boot_rom.is_none() {
                log::warn!(
                    "No boot ROM embedded in this build; starting from the post-boot state"
                );
            }
            boot_rom
        } else {
            None
        };

        Self::construct(cartridge, boot_rom)
    }

    /// Create a machine that boots through the given boot image.
    pub fn with_boot_rom(cartridge: Cartridge, boot_rom: BootRom) -> Self {
        Self::construct(cartridge, Some(boot_rom))
    }

    fn construct(cartridge: Cartridge, boot_rom: Option<BootRom>) -> Self {
        let cpu_registers = if boot_rom.is_some() {
            CpuRegisters::new()
        } else {
            CpuRegisters::post_boot()
        };

        Self {
            address_space: AddressSpace::new(cartridge, boot_rom),
            cpu_registers,
            ppu_state: PpuState::new(),
            apu_state: ApuState::new(),
            clock: 0,
            trace: false,
        }
    }

    /// Enable or disable per-instruction trace logging (emitted at the
    /// `trace` log level).
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Latch a new gamepad state. A transition from no buttons pressed to
    /// any button pressed raises the joypad interrupt.
    pub fn update_pad(&mut self, gamepad: Gamepad) {
        let was_pressed = self.address_space.joypad().gamepad().any_pressed();
        self.address_space.joypad_mut().set_gamepad(gamepad);

        if !was_pressed && gamepad.any_pressed() {
            self.address_space
                .get_io_registers_mut()
                .interrupt_flags()
                .set(InterruptType::Joypad);
        }
    }

    /// The 160x144 output buffer of little-endian `0xAARRGGBB` pixels,
    /// valid until the next frame step.
    pub fn frame_buffer(&self) -> &[u32; FRAME_BUFFER_LEN] {
        self.ppu_state.frame_buffer()
    }

    /// Read a byte from the bus without consuming any cycles.
    pub fn read(&self, address: u16) -> u8 {
        self.address_space.read_address_u8(address)
    }

    /// Write a byte to the bus without consuming any cycles.
    pub fn write(&mut self, address: u16, value: u8) {
        self.address_space.write_address_u8(address, value);
    }

    /// Execute one instruction (or one halted machine cycle), advancing all
    /// subsystems by the consumed cycles.
    pub fn step_instruction(&mut self) -> Result<(), EmulationError> {
        if self.cpu_registers.stopped {
            return Err(EmulationError::StopExecuted);
        }

        // A pending, enabled interrupt wakes a halted CPU even when IME is
        // cleared
        if cpu::pending_interrupts(&self.address_space) != 0 {
            self.cpu_registers.halted = false;
        }

        if self.cpu_registers.halted {
            self.advance(CYCLES_PER_M_CYCLE);
            return Ok(());
        }

        if self.cpu_registers.ime {
            if let Some(interrupt_type) = cpu::highest_priority_interrupt(&self.address_space) {
                cpu::execute_interrupt_service_routine(
                    &mut self.cpu_registers,
                    &mut self.address_space,
                    interrupt_type,
                );
                self.advance(cpu::ISR_CYCLES_REQUIRED);
            }
        }

        if self.trace {
            self.log_trace();
        }

        let (instruction, next_pc) =
            instructions::parse_next_instruction(&self.address_space, self.cpu_registers.pc)?;
        self.cpu_registers.pc = next_pc;

        // Cycle counts for conditional control flow depend on the flags as
        // they are before execution
        let cycles_required = instruction.cycles_required(&self.cpu_registers);
        instruction.execute(&mut self.address_space, &mut self.cpu_registers);
        self.advance(cycles_required);

        if self.cpu_registers.stopped {
            return Err(EmulationError::StopExecuted);
        }

        Ok(())
    }

    /// Run until the start of the next V-blank period, i.e. one full video
    /// frame, returning the number of 4 MHz clock cycles consumed (about
    /// 70224 for a frame).
    pub fn step_frame(&mut self) -> Result<u64, EmulationError> {
        let start_clock = self.clock;

        while self.ppu_state.in_vblank() {
            self.step_instruction()?;
        }
        while !self.ppu_state.in_vblank() {
            self.step_instruction()?;
        }

        Ok(self.clock.wrapping_sub(start_clock))
    }

    // Advance DMA, PPU, APU, and timer by the given number of clock ticks,
    // in that fixed order within each tick
    fn advance(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.address_space.progress_oam_dma();
            ppu::tick(&mut self.ppu_state, &mut self.address_space);
            apu::tick(&mut self.apu_state);
            timer::tick(self.address_space.get_io_registers_mut(), self.clock);
            self.clock = self.clock.wrapping_add(1);
        }
    }

    // One line per instruction: raw bytes, mnemonic, then registers with the
    // high flag nibble in binary and the clock in machine cycles
    fn log_trace(&self) {
        let pc = self.cpu_registers.pc;
        let mut reader = BusReader::new(self, pc);
        let mnemonic = disasm::disassemble(&mut reader).unwrap_or_else(|_| "??".into());

        let mut raw_bytes = String::new();
        for address in pc..reader.address() {
            let _ = write!(raw_bytes, "{:02x} ", self.read(address));
        }

        let r = &self.cpu_registers;
        log::trace!(
            "{raw_bytes:<9} {mnemonic:<16} | b={:02x} c={:02x} d={:02x} e={:02x} h={:02x} l={:02x} a={:02x} f={:04b} sp={:04x} pc={:04x} clk={}",
            r.b,
            r.c,
            r.d,
            r.e,
            r.h,
            r.l,
            r.accumulator,
            r.flags >> 4,
            r.sp,
            pc,
            self.clock / 4
        );
    }
}
