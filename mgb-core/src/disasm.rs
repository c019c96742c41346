//! Pure disassembler for the DMG instruction set.
//!
//! Decoding follows the classic 8080-family table partition
//! (<http://www.z80.info/decoding.htm>): an opcode splits into
//! `x = op >> 6`, `y = (op >> 3) & 7`, `z = op & 7`, with `p = y >> 1` and
//! `q = y & 1` selecting register pairs. Encodings with no instruction
//! behind them come back as `db $nn` data bytes, so disassembly is total
//! over byte sequences; the only failure mode is a short read.

use crate::machine::Machine;
use std::io::{self, Read};

const R_TABLE: [&str; 8] = ["b", "c", "d", "e", "h", "l", "(hl)", "a"];
const RP1_TABLE: [&str; 4] = ["bc", "de", "hl", "sp"];
const RP2_TABLE: [&str; 4] = ["bc", "de", "hl", "af"];
const CC_TABLE: [&str; 4] = ["nz", "z", "nc", "c"];
const ALU_TABLE: [&str; 8] = [
    "add a,", "adc a,", "sub a,", "sbc a,", "and", "xor", "or", "cp",
];
const ROT_TABLE: [&str; 8] = ["rlc", "rrc", "rl", "rr", "sla", "sra", "sll", "srl"];

fn fetch8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buffer = [0x00];
    reader.read_exact(&mut buffer)?;
    Ok(buffer[0])
}

fn fetch16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buffer = [0x00, 0x00];
    reader.read_exact(&mut buffer)?;
    Ok(u16::from_le_bytes(buffer))
}

/// Disassemble one instruction from the reader, consuming its 1-3 encoded
/// bytes and returning the mnemonic.
///
/// # Errors
///
/// Returns an error only when the reader cannot supply an encoded byte
/// (a short read); no byte sequence itself is an error.
pub fn disassemble<R: Read>(reader: &mut R) -> io::Result<String> {
    let opcode = fetch8(reader)?;

    if opcode == 0xCB {
        return disassemble_cb(fetch8(reader)?);
    }

    disassemble_primary(opcode, reader)
}

fn disassemble_primary<R: Read>(opcode: u8, reader: &mut R) -> io::Result<String> {
    let x = opcode >> 6;
    let y = usize::from((opcode >> 3) & 0x07);
    let z = usize::from(opcode & 0x07);
    let p = y >> 1;
    let q = y & 0x01;

    let text = match x {
        0 => match z {
            0 => match y {
                0 => "nop".into(),
                1 => format!("ld (${:04x}), sp", fetch16(reader)?),
                2 => "stop".into(),
                3 => format!("jr {:+}", fetch8(reader)? as i8),
                _ => format!("jr {}, {:+}", CC_TABLE[y - 4], fetch8(reader)? as i8),
            },
            1 => match q {
                0 => format!("ld {}, ${:04x}", RP1_TABLE[p], fetch16(reader)?),
                _ => format!("add hl, {}", RP1_TABLE[p]),
            },
            2 => {
                let operand = ["(bc)", "(de)", "(hl+)", "(hl-)"][p];
                match q {
                    0 => format!("ld {operand}, a"),
                    _ => format!("ld a, {operand}"),
                }
            }
            3 => match q {
                0 => format!("inc {}", RP1_TABLE[p]),
                _ => format!("dec {}", RP1_TABLE[p]),
            },
            4 => format!("inc {}", R_TABLE[y]),
            5 => format!("dec {}", R_TABLE[y]),
            6 => format!("ld {}, ${:02x}", R_TABLE[y], fetch8(reader)?),
            _ => ["rlca", "rrca", "rla", "rra", "daa", "cpl", "scf", "ccf"][y].into(),
        },
        1 => {
            if y == 6 && z == 6 {
                "halt".into()
            } else {
                format!("ld {}, {}", R_TABLE[y], R_TABLE[z])
            }
        }
        2 => format!("{} {}", ALU_TABLE[y], R_TABLE[z]),
        _ => match z {
            0 => match y {
                0..=3 => format!("ret {}", CC_TABLE[y]),
                4 => format!("ld ($ff{:02x}), a", fetch8(reader)?),
                5 => format!("add sp, {}", fetch8(reader)? as i8),
                6 => format!("ld a, ($ff{:02x})", fetch8(reader)?),
                _ => format!("ld hl, sp{:+}", fetch8(reader)? as i8),
            },
            1 => match (q, p) {
                (0, _) => format!("pop {}", RP2_TABLE[p]),
                (_, 0) => "ret".into(),
                (_, 1) => "reti".into(),
                (_, 2) => "jp (hl)".into(),
                _ => "ld sp, hl".into(),
            },
            2 => match y {
                0..=3 => format!("jp {}, ${:04x}", CC_TABLE[y], fetch16(reader)?),
                4 => "ld (c), a".into(),
                5 => format!("ld (${:04x}), a", fetch16(reader)?),
                6 => "ld a, (c)".into(),
                _ => format!("ld a, (${:04x})", fetch16(reader)?),
            },
            3 => match y {
                0 => format!("jp ${:04x}", fetch16(reader)?),
                6 => "di".into(),
                7 => "ei".into(),
                _ => data_byte(opcode),
            },
            4 => match y {
                0..=3 => format!("call {}, ${:04x}", CC_TABLE[y], fetch16(reader)?),
                _ => data_byte(opcode),
            },
            5 => match (q, y) {
                (0, _) => format!("push {}", RP2_TABLE[p]),
                (_, 1) => format!("call ${:04x}", fetch16(reader)?),
                _ => data_byte(opcode),
            },
            6 => format!("{} ${:02x}", ALU_TABLE[y], fetch8(reader)?),
            _ => format!("rst ${:04x}", y << 3),
        },
    };

    Ok(text)
}

fn disassemble_cb(opcode: u8) -> io::Result<String> {
    let y = usize::from((opcode >> 3) & 0x07);
    let z = usize::from(opcode & 0x07);

    let text = match opcode >> 6 {
        0 => format!("{} {}", ROT_TABLE[y], R_TABLE[z]),
        1 => format!("bit {}, {}", y, R_TABLE[z]),
        2 => format!("res {}, {}", y, R_TABLE[z]),
        _ => format!("set {}, {}", y, R_TABLE[z]),
    };

    Ok(text)
}

fn data_byte(opcode: u8) -> String {
    format!("db ${opcode:02x}")
}

/// `io::Read` adapter over machine memory, starting at a given address.
///
/// Bus reads are total (unmapped regions read `0xFF`), so reading through
/// this adapter never fails and never advances the emulation clock.
pub struct BusReader<'a> {
    machine: &'a Machine,
    address: u16,
}

impl<'a> BusReader<'a> {
    pub fn new(machine: &'a Machine, address: u16) -> Self {
        Self { machine, address }
    }

    /// The address of the next byte this reader will yield.
    pub fn address(&self) -> u16 {
        self.address
    }
}

impl Read for BusReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for slot in buf.iter_mut() {
            *slot = self.machine.read(self.address);
            self.address = self.address.wrapping_add(1);
        }

        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disassemble_bytes(bytes: &[u8]) -> String {
        disassemble(&mut &bytes[..]).expect("byte sequence should disassemble")
    }

    #[test]
    fn representative_mnemonics() {
        assert_eq!("nop", disassemble_bytes(&[0x00]));
        assert_eq!("jp $0150", disassemble_bytes(&[0xC3, 0x50, 0x01]));
        assert_eq!("bit 7, h", disassemble_bytes(&[0xCB, 0x7C]));
        assert_eq!("db $d3", disassemble_bytes(&[0xD3]));
    }

    #[test]
    fn loads_and_arithmetic() {
        assert_eq!("ld b, c", disassemble_bytes(&[0x41]));
        assert_eq!("ld a, (hl)", disassemble_bytes(&[0x7E]));
        assert_eq!("ld (hl), $2a", disassemble_bytes(&[0x36, 0x2A]));
        assert_eq!("ld hl, $8000", disassemble_bytes(&[0x21, 0x00, 0x80]));
        assert_eq!("ld ($c123), sp", disassemble_bytes(&[0x08, 0x23, 0xC1]));
        assert_eq!("ld ($ff44), a", disassemble_bytes(&[0xE0, 0x44]));
        assert_eq!("ld a, ($ff00)", disassemble_bytes(&[0xF0, 0x00]));
        assert_eq!("add a, b", disassemble_bytes(&[0x80]));
        assert_eq!("adc a, (hl)", disassemble_bytes(&[0x8E]));
        assert_eq!("xor a", disassemble_bytes(&[0xAF]));
        assert_eq!("cp $90", disassemble_bytes(&[0xFE, 0x90]));
        assert_eq!("add hl, de", disassemble_bytes(&[0x19]));
        assert_eq!("add sp, -8", disassemble_bytes(&[0xE8, 0xF8]));
        assert_eq!("ld hl, sp+3", disassemble_bytes(&[0xF8, 0x03]));
        assert_eq!("inc de", disassemble_bytes(&[0x13]));
        assert_eq!("dec (hl)", disassemble_bytes(&[0x35]));
        assert_eq!("daa", disassemble_bytes(&[0x27]));
    }

    #[test]
    fn control_flow() {
        assert_eq!("jr +5", disassemble_bytes(&[0x18, 0x05]));
        assert_eq!("jr nz, -2", disassemble_bytes(&[0x20, 0xFE]));
        assert_eq!("jp c, $1234", disassemble_bytes(&[0xDA, 0x34, 0x12]));
        assert_eq!("jp (hl)", disassemble_bytes(&[0xE9]));
        assert_eq!("call $0038", disassemble_bytes(&[0xCD, 0x38, 0x00]));
        assert_eq!("call nc, $4000", disassemble_bytes(&[0xD4, 0x00, 0x40]));
        assert_eq!("ret", disassemble_bytes(&[0xC9]));
        assert_eq!("ret z", disassemble_bytes(&[0xC8]));
        assert_eq!("reti", disassemble_bytes(&[0xD9]));
        assert_eq!("rst $0028", disassemble_bytes(&[0xEF]));
        assert_eq!("push af", disassemble_bytes(&[0xF5]));
        assert_eq!("pop bc", disassemble_bytes(&[0xC1]));
        assert_eq!("halt", disassemble_bytes(&[0x76]));
        assert_eq!("stop", disassemble_bytes(&[0x10]));
        assert_eq!("ei", disassemble_bytes(&[0xFB]));
    }

    #[test]
    fn cb_prefixed() {
        assert_eq!("rlc b", disassemble_bytes(&[0xCB, 0x00]));
        assert_eq!("rr (hl)", disassemble_bytes(&[0xCB, 0x1E]));
        assert_eq!("sll a", disassemble_bytes(&[0xCB, 0x37]));
        assert_eq!("srl d", disassemble_bytes(&[0xCB, 0x3A]));
        assert_eq!("res 0, e", disassemble_bytes(&[0xCB, 0x83]));
        assert_eq!("set 3, (hl)", disassemble_bytes(&[0xCB, 0xDE]));
    }

    #[test]
    fn undefined_opcodes_become_data_bytes() {
        for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
            assert_eq!(format!("db ${opcode:02x}"), disassemble_bytes(&[opcode]));
        }
    }

    #[test]
    fn total_over_all_single_opcodes() {
        // Every opcode disassembles when followed by enough operand bytes
        for opcode in 0x00..=0xFF {
            let bytes = [opcode, 0x00, 0x00];
            disassemble(&mut &bytes[..]).expect("padded opcode should disassemble");
        }

        for opcode in 0x00..=0xFF {
            let bytes = [0xCB, opcode];
            disassemble(&mut &bytes[..]).expect("CB opcode should disassemble");
        }
    }

    #[test]
    fn short_read_is_an_io_error() {
        let error = disassemble(&mut &[0xC3, 0x50][..]).expect_err("truncated jp");
        assert_eq!(io::ErrorKind::UnexpectedEof, error.kind());

        let error = disassemble(&mut &[][..]).expect_err("empty stream");
        assert_eq!(io::ErrorKind::UnexpectedEof, error.kind());
    }
}
