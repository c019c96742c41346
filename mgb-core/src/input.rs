/// Latched state of the eight DMG buttons, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gamepad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub start: bool,
    pub select: bool,
}

impl Gamepad {
    pub fn any_pressed(self) -> bool {
        self.up
            || self.down
            || self.left
            || self.right
            || self.a
            || self.b
            || self.start
            || self.select
    }
}

/// State behind the joypad register at `0xFF00`: the latched gamepad plus
/// the two active-low group select lines.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JoypadState {
    gamepad: Gamepad,
    actions_selected: bool,
    directions_selected: bool,
}

impl JoypadState {
    pub(crate) fn new() -> Self {
        Self {
            gamepad: Gamepad::default(),
            actions_selected: false,
            directions_selected: false,
        }
    }

    pub(crate) fn gamepad(&self) -> Gamepad {
        self.gamepad
    }

    pub(crate) fn set_gamepad(&mut self, gamepad: Gamepad) {
        self.gamepad = gamepad;
    }

    /// Joypad register readback: the selected groups' keys as active-low
    /// bits 3..0, the select lines (also active-low) echoed in bits 5..4.
    pub(crate) fn register_read(&self) -> u8 {
        let mut keys = 0x0F;

        if self.actions_selected {
            keys &= !(u8::from(self.gamepad.a)
                | (u8::from(self.gamepad.b) << 1)
                | (u8::from(self.gamepad.select) << 2)
                | (u8::from(self.gamepad.start) << 3));
        }

        if self.directions_selected {
            keys &= !(u8::from(self.gamepad.right)
                | (u8::from(self.gamepad.left) << 1)
                | (u8::from(self.gamepad.up) << 2)
                | (u8::from(self.gamepad.down) << 3));
        }

        keys | (u8::from(!self.directions_selected) << 4)
            | (u8::from(!self.actions_selected) << 5)
    }

    /// A write drives the group select lines; a 0 in bit 4/5 selects the
    /// directions/actions group respectively.
    pub(crate) fn register_write(&mut self, value: u8) {
        self.directions_selected = value & 0x10 == 0;
        self.actions_selected = value & 0x20 == 0;
    }
}
