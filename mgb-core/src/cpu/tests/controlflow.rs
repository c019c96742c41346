use super::{hash_map, run_test, ExpectedState};

#[test]
fn jump_absolute() {
    run_test(
        // LD B, 0; LD C, 0; JP 0x0159; INC B; INC B; INC C
        //
        // The jump lands on the final INC C, so B stays 0
        "06000E00C3590104040C",
        &ExpectedState {
            b: Some(0x00),
            c: Some(0x01),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn jump_hl() {
    run_test(
        // LD C, 0; LD HL, 0x0158; JP HL; INC B; INC B; INC C
        "0E00215801E904040C",
        &ExpectedState {
            b: Some(0x00),
            c: Some(0x01),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn relative_jump_forward() {
    run_test(
        // LD B, 0; JR +2; INC B; INC B -- the jump skips both increments
        "060018020404",
        &ExpectedState {
            b: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn relative_jump_backward_loop() {
    run_test(
        // LD B, 5; DEC B; JR NZ, -3 -- counts B down to zero
        "06050520FD",
        &ExpectedState {
            b: Some(0x00),
            f: Some(0xC0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn conditional_relative_jump() {
    run_test(
        // SCF; JR C, +2; INC B; INC B; INC B -- taken, skips two
        "373802040404",
        &ExpectedState {
            b: Some(0x01),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // OR A; JR C, +2; INC B; INC B; INC B -- not taken, all three run
        "B73802040404",
        &ExpectedState {
            b: Some(0x03),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn call_and_return() {
    run_test(
        // LD SP, 0xDFFE; LD C, 0; CALL 0x015C; INC B; JP 0x015E;
        // subroutine at 0x015C: INC C; RET
        "31FEDF0E00CD5C0104C35E010CC9",
        &ExpectedState {
            b: Some(0x01),
            c: Some(0x01),
            sp: Some(0xDFFE),
            // The return address 0x0158 stays below the stack pointer
            memory: hash_map! { 0xDFFC: 0x58, 0xDFFD: 0x01 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn conditional_call_not_taken() {
    run_test(
        // OR A; CALL C, 0x0158; INC B
        "B7DC580104",
        &ExpectedState {
            b: Some(0x01),
            sp: Some(0xFFFE),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn conditional_return() {
    run_test(
        // LD SP, 0xDFFE; LD C, 0; CALL 0x015C; INC B; JP 0x0160;
        // subroutine: INC C; RET NZ; INC C; RET
        //
        // INC C leaves Z clear, so RET NZ returns and the second INC C
        // never runs
        "31FEDF0E00CD5C0104C360010CC00CC9",
        &ExpectedState {
            b: Some(0x01),
            c: Some(0x01),
            sp: Some(0xDFFE),
            ..ExpectedState::empty()
        },
    );
}
