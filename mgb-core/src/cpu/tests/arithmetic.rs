use super::{hash_map, run_test, set_in_state, ExpectedState, ALL_REGISTERS};

use crate::cpu::registers::CpuRegister;

#[test]
fn add_immediate() {
    run_test(
        // LD A, 0x05; ADD 0xDE
        "3E05C6DE",
        &ExpectedState {
            a: Some(0xE3),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x01; ADD 0x03
        "3E01C603",
        &ExpectedState {
            a: Some(0x04),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // Adding up to exactly 0x100 sets Z, H, and C together
    run_test(
        // LD A, 0x3A; LD B, 0xC6; ADD B
        "3E3A06C680",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xB0),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0xFF; ADD 0x12
        "3EFFC612",
        &ExpectedState {
            a: Some(0x11),
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_register() {
    for r in ALL_REGISTERS {
        let load_opcode = 0x06 | (r.to_opcode_bits() << 3);
        let add_opcode = 0x80 | r.to_opcode_bits();

        let (expected_a, expected_f) = match r {
            CpuRegister::A => (0x68, 0x10),
            _ => (0xEA, 0x00),
        };

        let mut expected_state = ExpectedState {
            a: Some(expected_a),
            f: Some(expected_f),
            ..ExpectedState::empty()
        };
        if r != CpuRegister::A {
            set_in_state(&mut expected_state, r, 0xB4);
        }

        run_test(
            // LD A, 0x36; LD <r>, 0xB4; ADD <r>
            &format!("3E36{load_opcode:02x}B4{add_opcode:02x}"),
            &expected_state,
        );
    }
}

#[test]
fn add_indirect_hl() {
    run_test(
        // LD HL, 0xC0A4; LD (HL), 0x3B; LD A, 0xA1; ADD (HL)
        "21A4C0363B3EA186",
        &ExpectedState {
            a: Some(0xDC),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn adc() {
    run_test(
        // LD A, 0xBC; ADC 0x15
        "3EBCCE15",
        &ExpectedState {
            a: Some(0xD1),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0xBC; SCF; ADC 0x15
        "3EBC37CE15",
        &ExpectedState {
            a: Some(0xD2),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0xFF; SCF; ADC 0x00
        "3EFF37CE00",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xB0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn sub() {
    run_test(
        // LD A, 0x10; SUB 0x01
        "3E10D601",
        &ExpectedState {
            a: Some(0x0F),
            f: Some(0x60),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x42; SUB 0x42
        "3E42D642",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xC0),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x05; SUB 0x20 -- underflow sets carry
        "3E05D620",
        &ExpectedState {
            a: Some(0xE5),
            f: Some(0x50),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn sbc() {
    run_test(
        // LD A, 0x37; SCF; SBC 0x10
        "3E3737DE10",
        &ExpectedState {
            a: Some(0x26),
            f: Some(0x40),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x00; SCF; SBC 0x00
        "3E0037DE00",
        &ExpectedState {
            a: Some(0xFF),
            f: Some(0x70),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn compare() {
    run_test(
        // LD A, 0x45; CP 0x45 -- A is untouched
        "3E45FE45",
        &ExpectedState {
            a: Some(0x45),
            f: Some(0xC0),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x45; CP 0x50
        "3E45FE50",
        &ExpectedState {
            a: Some(0x45),
            f: Some(0x50),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn inc_dec_register() {
    run_test(
        // INC B
        "04",
        &ExpectedState {
            b: Some(0x01),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // DEC B -- borrow out of the low nibble, carry untouched
        "05",
        &ExpectedState {
            b: Some(0xFF),
            f: Some(0x60),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD C, 0x0F; INC C
        "0E0F0C",
        &ExpectedState {
            c: Some(0x10),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn inc_dec_indirect_hl() {
    run_test(
        // LD HL, 0xC0A4; LD (HL), 0xFF; INC (HL)
        "21A4C036FF34",
        &ExpectedState {
            f: Some(0xA0),
            memory: hash_map! { 0xC0A4: 0x00 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC0A4; LD (HL), 0x01; DEC (HL)
        "21A4C0360135",
        &ExpectedState {
            f: Some(0xC0),
            memory: hash_map! { 0xC0A4: 0x00 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn and_or_xor() {
    run_test(
        // LD A, 0x55; AND 0x0F
        "3E55E60F",
        &ExpectedState {
            a: Some(0x05),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x55; AND 0xAA
        "3E55E6AA",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xA0),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0xF0; OR 0x0F
        "3EF0F60F",
        &ExpectedState {
            a: Some(0xFF),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x00; OR 0x00
        "3E00F600",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x5A; XOR A
        "3E5AAF",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn complement_accumulator() {
    run_test(
        // LD A, 0x35; CPL
        "3E352F",
        &ExpectedState {
            a: Some(0xCA),
            f: Some(0x60),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn carry_flag_ops() {
    run_test(
        // SCF
        "37",
        &ExpectedState {
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // SCF; CCF
        "373F",
        &ExpectedState {
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn decimal_adjust_after_add() {
    // 0x45 + 0x38 in BCD is 0x83
    run_test(
        // LD A, 0x45; ADD 0x38; DAA
        "3E45C63827",
        &ExpectedState {
            a: Some(0x83),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // 0x90 + 0x20 in BCD is 0x10 carry 1
    run_test(
        // LD A, 0x90; ADD 0x20; DAA
        "3E90C62027",
        &ExpectedState {
            a: Some(0x10),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn decimal_adjust_after_sub() {
    // 0x42 - 0x15 in BCD is 0x27
    run_test(
        // LD A, 0x42; SUB 0x15; DAA
        "3E42D61527",
        &ExpectedState {
            a: Some(0x27),
            f: Some(0x40),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_hl_register_pair() {
    run_test(
        // LD HL, 0x8A23; LD BC, 0x0605; ADD HL, BC
        "21238A01050609",
        &ExpectedState {
            h: Some(0x90),
            l: Some(0x28),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0x8A23; ADD HL, HL -- carry out of bit 15
        "21238A29",
        &ExpectedState {
            h: Some(0x14),
            l: Some(0x46),
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn inc_dec_register_pair() {
    run_test(
        // LD BC, 0x0000; DEC BC
        "0100000B",
        &ExpectedState {
            b: Some(0xFF),
            c: Some(0xFF),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD DE, 0x00FF; INC DE
        "11FF0013",
        &ExpectedState {
            d: Some(0x01),
            e: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_sp_immediate() {
    run_test(
        // LD SP, 0x4FFF; ADD SP, 1
        "31FF4FE801",
        &ExpectedState {
            sp: Some(0x5000),
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD SP, 0x5000; ADD SP, -2
        "310050E8FE",
        &ExpectedState {
            sp: Some(0x4FFE),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_hl_sp_offset() {
    run_test(
        // LD SP, 0x5000; LD HL, SP-1
        "310050F8FF",
        &ExpectedState {
            h: Some(0x4F),
            l: Some(0xFF),
            sp: Some(0x5000),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}
