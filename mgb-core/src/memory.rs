pub mod address;
pub mod ioregisters;
mod mapper;

use crate::bootrom::{self, BootRom};
use crate::input::JoypadState;
use crate::memory::ioregisters::IoRegisters;
use crate::memory::mapper::Mapper;

pub(crate) const VRAM_LEN: usize = 8192;
pub(crate) const WORKING_RAM_LEN: usize = 8192;
pub(crate) const OAM_LEN: usize = 160;
pub(crate) const HRAM_LEN: usize = 127;

const OAM_TRANSFER_LENGTH: u16 = 160;

/// A cartridge image plus its (possibly absent) mapper hardware.
///
/// The ROM header is never parsed here; the host decides which variant a
/// given image gets.
pub struct Cartridge {
    rom: Vec<u8>,
    ram: Vec<u8>,
    mapper: Mapper,
}

impl Cartridge {
    /// Create a mapper-less cartridge: 32 KiB or less of ROM, no external RAM.
    pub fn rom_only(rom: Vec<u8>) -> Self {
        log::info!("Initializing bank-0 ROM cartridge from {} bytes", rom.len());

        Self {
            rom,
            ram: Vec::new(),
            mapper: Mapper::None,
        }
    }

    /// Create an MBC1 cartridge with switchable 16 KiB ROM banks and 8 KiB of
    /// external RAM.
    pub fn mbc1(rom: Vec<u8>) -> Self {
        log::info!("Initializing MBC1 cartridge from {} bytes", rom.len());

        Self {
            rom,
            ram: vec![0; 8192],
            mapper: Mapper::Mbc1 {
                ram_enable: false,
                rom_bank: 0x00,
            },
        }
    }

    /// Read a value from the given ROM address. Addresses that map past the
    /// end of the image read as open bus (`0xFF`).
    pub(crate) fn read_rom_address(&self, address: u16) -> u8 {
        let mapped_address = self.mapper.map_rom_address(address);
        self.rom
            .get(mapped_address as usize)
            .copied()
            .unwrap_or(0xFF)
    }

    // A ROM write only ever touches mapper registers
    pub(crate) fn write_rom_address(&mut self, address: u16, value: u8) {
        self.mapper.write_rom_address(address, value);
    }

    /// Read a value from external cartridge RAM. Returns `0xFF` when RAM is
    /// absent or disabled.
    pub(crate) fn read_ram_address(&self, address: u16) -> u8 {
        if !self.mapper.ram_accessible() {
            return 0xFF;
        }

        self.ram
            .get(usize::from(address & 0x1FFF))
            .copied()
            .unwrap_or(0xFF)
    }

    /// Write a value to external cartridge RAM. Dropped when RAM is absent or
    /// disabled.
    pub(crate) fn write_ram_address(&mut self, address: u16, value: u8) {
        if !self.mapper.ram_accessible() {
            return;
        }

        if let Some(ram_value) = self.ram.get_mut(usize::from(address & 0x1FFF)) {
            *ram_value = value;
        }
    }
}

/// OAM DMA engine state. While active, one byte is copied per clock tick;
/// the source region stays readable throughout (no bus blocking).
#[derive(Debug, Clone, Copy)]
struct OamDmaState {
    active: bool,
    source_page: u8,
    index: u16,
}

impl OamDmaState {
    fn new() -> Self {
        Self {
            active: false,
            source_page: 0x00,
            index: 0,
        }
    }

    fn start(&mut self, source_page: u8) {
        self.active = true;
        self.source_page = source_page;
        self.index = 0;
    }
}

/// The full 64 KiB address space as seen by the CPU, routing every read and
/// write to the device mapped at that address.
///
/// Routing is purely combinational; the bus itself never consumes cycles.
/// Unmapped reads return `0xFF` and unmapped writes are dropped.
pub struct AddressSpace {
    cartridge: Cartridge,
    boot_rom: Option<BootRom>,
    vram: [u8; VRAM_LEN],
    working_ram: [u8; WORKING_RAM_LEN],
    oam: [u8; OAM_LEN],
    io_registers: IoRegisters,
    joypad: JoypadState,
    oam_dma: OamDmaState,
    hram: [u8; HRAM_LEN],
    ie_register: u8,
}

impl AddressSpace {
    pub fn new(cartridge: Cartridge, boot_rom: Option<BootRom>) -> Self {
        Self {
            cartridge,
            boot_rom,
            vram: [0; VRAM_LEN],
            working_ram: [0; WORKING_RAM_LEN],
            oam: [0; OAM_LEN],
            io_registers: IoRegisters::new(),
            joypad: JoypadState::new(),
            oam_dma: OamDmaState::new(),
            hram: [0; HRAM_LEN],
            ie_register: 0,
        }
    }

    /// Read the value at the given address from the perspective of the CPU.
    pub fn read_address_u8(&self, address: u16) -> u8 {
        match address {
            address @ address::ROM_START..=address::ROM_END => {
                if let Some(boot_rom) = &self.boot_rom {
                    if usize::from(address) < bootrom::BOOT_ROM_LEN {
                        return boot_rom.read(address);
                    }
                }
                self.cartridge.read_rom_address(address)
            }
            address @ address::VRAM_START..=address::VRAM_END => {
                self.vram[usize::from(address & 0x1FFF)]
            }
            address @ address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => {
                self.cartridge.read_ram_address(address)
            }
            address @ address::WORKING_RAM_START..=address::WORKING_RAM_END => {
                self.working_ram[usize::from(address - address::WORKING_RAM_START)]
            }
            // Echo region: the 8 KiB address mask lands on the same bytes
            address @ address::ECHO_RAM_START..=address::ECHO_RAM_END => {
                self.working_ram[usize::from(address & 0x1FFF)]
            }
            address @ address::OAM_START..=address::OAM_END => {
                self.oam[usize::from(address - address::OAM_START)]
            }
            _address @ address::UNUSABLE_START..=address::UNUSABLE_END => 0xFF,
            address::JOYPAD_REGISTER => self.joypad.register_read(),
            address @ address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                self.io_registers.read_address(address)
            }
            address @ address::HRAM_START..=address::HRAM_END => {
                self.hram[usize::from(address - address::HRAM_START)]
            }
            address::IE_REGISTER => self.ie_register,
        }
    }

    /// Read the value at the given address and the following address as a
    /// little-endian 16-bit value.
    pub fn read_address_u16(&self, address: u16) -> u16 {
        let lsb = self.read_address_u8(address);
        let msb = self.read_address_u8(address.wrapping_add(1));
        u16::from_le_bytes([lsb, msb])
    }

    /// Assign a value to the given address from the perspective of the CPU.
    pub fn write_address_u8(&mut self, address: u16, value: u8) {
        match address {
            address @ address::ROM_START..=address::ROM_END => {
                self.cartridge.write_rom_address(address, value);
            }
            address @ address::VRAM_START..=address::VRAM_END => {
                self.vram[usize::from(address & 0x1FFF)] = value;
            }
            address @ address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => {
                self.cartridge.write_ram_address(address, value);
            }
            address @ address::WORKING_RAM_START..=address::WORKING_RAM_END => {
                self.working_ram[usize::from(address - address::WORKING_RAM_START)] = value;
            }
            address @ address::ECHO_RAM_START..=address::ECHO_RAM_END => {
                self.working_ram[usize::from(address & 0x1FFF)] = value;
            }
            address @ address::OAM_START..=address::OAM_END => {
                self.oam[usize::from(address - address::OAM_START)] = value;
            }
            _address @ address::UNUSABLE_START..=address::UNUSABLE_END => {}
            address::JOYPAD_REGISTER => {
                self.joypad.register_write(value);
            }
            address::DMA_REGISTER => {
                self.oam_dma.start(value);
                self.io_registers.write_address(address, value);
            }
            address::BOOT_LOCK_REGISTER => {
                self.lock_boot_rom();
            }
            address @ address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                self.io_registers.write_address(address, value);
            }
            address @ address::HRAM_START..=address::HRAM_END => {
                self.hram[usize::from(address - address::HRAM_START)] = value;
            }
            address::IE_REGISTER => {
                // Only the five interrupt source bits exist
                self.ie_register = value & 0x1F;
            }
        }
    }

    /// Assign a 16-bit value to the given address and the following address,
    /// using little-endian.
    pub fn write_address_u16(&mut self, address: u16, value: u16) {
        let [lsb, msb] = value.to_le_bytes();
        self.write_address_u8(address, lsb);
        self.write_address_u8(address.wrapping_add(1), msb);
    }

    /// Permanently remap `0x0000..=0x00FF` from the boot ROM to the
    /// cartridge. A no-op if the boot ROM was never mapped.
    fn lock_boot_rom(&mut self) {
        if self.boot_rom.take().is_some() {
            log::info!("Boot ROM locked out; 0x0000-0x00FF now reads from the cartridge");
        }
    }

    /// Copy the next OAM DMA byte if a transfer is active. Called once per
    /// clock tick.
    pub(crate) fn progress_oam_dma(&mut self) {
        if !self.oam_dma.active {
            return;
        }

        let source = (u16::from(self.oam_dma.source_page) << 8) + self.oam_dma.index;
        self.copy_byte(source, address::OAM_START + self.oam_dma.index);

        self.oam_dma.index += 1;
        if self.oam_dma.index == OAM_TRANSFER_LENGTH {
            self.oam_dma.active = false;
        }
    }

    // Copy a byte between two bus addresses; used by the OAM DMA engine
    fn copy_byte(&mut self, src_address: u16, dst_address: u16) {
        let byte = self.read_address_u8(src_address);
        self.write_address_u8(dst_address, byte);
    }

    pub(crate) fn get_io_registers(&self) -> &IoRegisters {
        &self.io_registers
    }

    pub(crate) fn get_io_registers_mut(&mut self) -> &mut IoRegisters {
        &mut self.io_registers
    }

    /// Retrieve the current value of the IE register (interrupts enabled).
    pub(crate) fn get_ie_register(&self) -> u8 {
        self.ie_register
    }

    // Direct tile/sprite memory access for the PPU renderer
    pub(crate) fn vram(&self) -> &[u8; VRAM_LEN] {
        &self.vram
    }

    pub(crate) fn oam(&self) -> &[u8; OAM_LEN] {
        &self.oam
    }

    pub(crate) fn joypad(&self) -> &JoypadState {
        &self.joypad
    }

    pub(crate) fn joypad_mut(&mut self) -> &mut JoypadState {
        &mut self.joypad
    }
}
