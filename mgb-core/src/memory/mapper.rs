/// Cartridge mapper hardware: either no mapper at all (a bank-0 ROM) or the
/// first-generation MBC1 bank controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mapper {
    None,
    Mbc1 { ram_enable: bool, rom_bank: u8 },
}

impl Mapper {
    /// Map a CPU address in `0x0000..=0x7FFF` to an offset into the ROM
    /// image. The caller is responsible for treating offsets past the end of
    /// the image as open bus.
    ///
    /// # Panics
    ///
    /// This method will panic if the address is outside of the cartridge ROM
    /// address range.
    pub(crate) fn map_rom_address(&self, address: u16) -> u32 {
        match self {
            Self::None => u32::from(address),
            &Self::Mbc1 { rom_bank, .. } => match address {
                address @ 0x0000..=0x3FFF => u32::from(address),
                address @ 0x4000..=0x7FFF => {
                    // Bank numbers whose low five bits are zero snap to the
                    // next bank; bank 0 is only reachable through 0x0000-0x3FFF
                    let bank = if rom_bank & 0x1F == 0 {
                        rom_bank | 0x01
                    } else {
                        rom_bank
                    };
                    u32::from(address & 0x3FFF) + (u32::from(bank) << 14)
                }
                _ => panic!("mapper called for address outside of cartridge ROM range: {address:04X}"),
            },
        }
    }

    // ROM writes never modify the ROM itself; on MBC1 they set mapper registers
    pub(crate) fn write_rom_address(&mut self, address: u16, value: u8) {
        match self {
            Self::None => {}
            Self::Mbc1 {
                ram_enable,
                rom_bank,
            } => match address {
                _address @ 0x0000..=0x1FFF => {
                    *ram_enable = value & 0x0F == 0x0A;
                    log::trace!("MBC1 RAM enable changed to {ram_enable}");
                }
                _address @ 0x2000..=0x3FFF => {
                    *rom_bank = value;
                    log::trace!("MBC1 ROM bank register changed to {value:02X}");
                }
                _ => {}
            },
        }
    }

    pub(crate) fn ram_accessible(&self) -> bool {
        match self {
            Self::None => false,
            &Self::Mbc1 { ram_enable, .. } => ram_enable,
        }
    }
}
