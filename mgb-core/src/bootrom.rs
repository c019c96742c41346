pub const BOOT_ROM_LEN: usize = 256;

/// A 256-byte DMG boot image, mapped over `0x0000..=0x00FF` until any write
/// to `0xFF50` locks it out for the rest of the session.
#[derive(Debug, Clone)]
pub struct BootRom([u8; BOOT_ROM_LEN]);

impl BootRom {
    pub fn new(image: [u8; BOOT_ROM_LEN]) -> Self {
        Self(image)
    }

    /// Returns the boot image embedded at build time, if this build carries
    /// one. The image is not redistributable, so embedding is opt-in: build
    /// with the `boot-rom` feature after placing a dump at
    /// `mgb-core/boot/dmg_boot.bin`.
    pub fn embedded() -> Option<Self> {
        #[cfg(feature = "boot-rom")]
        {
            return Some(Self(*include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/boot/dmg_boot.bin"
            ))));
        }

        #[cfg(not(feature = "boot-rom"))]
        {
            None
        }
    }

    pub(crate) fn read(&self, address: u16) -> u8 {
        self.0[usize::from(address)]
    }
}
