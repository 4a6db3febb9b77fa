//! End to end scenarios driven through the public `Chip8` facade.
//!
//! Each test loads a small program at 0x200 and steps it, checking the
//! machine the way a host would see it.

use emu8::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, STACK_DEPTH};
use emu8::{decode, Chip8, Config, Error, MachineState, Operation};

/// Helper function to create a deterministic machine running `program`
fn setup_chip8(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_config(Config::default().seeded(8));
    chip8.load(program).unwrap();
    chip8
}

fn lit_pixels(chip8: &Chip8) -> usize {
    (0..DISPLAY_HEIGHT)
        .flat_map(|y| (0..DISPLAY_WIDTH).map(move |x| (x, y)))
        .filter(|&(x, y)| chip8.get_pixel(x, y))
        .count()
}

// ========== Instruction scenarios ==========

#[test]
fn test_clear_screen() {
    assert_eq!(decode(0x00E0).unwrap().operation, Operation::Cls);

    // ld I, 0x050; drw V0, V0, 5; cls
    let mut chip8 = setup_chip8(&[0xA0, 0x50, 0xD0, 0x05, 0x00, 0xE0]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert!(lit_pixels(&chip8) > 0);

    let before = *chip8.registers();
    chip8.step().unwrap();

    assert_eq!(lit_pixels(&chip8), 0);
    assert_eq!(chip8.pc(), 0x206);
    assert_eq!(chip8.registers().all(), before.all());
    assert_eq!(chip8.i(), before.i());
}

#[test]
fn test_load_byte() {
    let mut chip8 = setup_chip8(&[0x6A, 0x05]);
    assert_eq!(chip8.step().unwrap(), MachineState::Running);
    assert_eq!(chip8.v(0xA), Some(0x05));
    assert_eq!(chip8.pc(), 0x202);
}

#[test]
fn test_add_with_carry() {
    // ld V1, 0xFF; ld V2, 0x01; add V1, V2
    let mut chip8 = setup_chip8(&[0x61, 0xFF, 0x62, 0x01, 0x81, 0x24]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.v(0x1), Some(0x00));
    assert_eq!(chip8.v(0x2), Some(0x01));
    assert_eq!(chip8.v(0xF), Some(0x01));
    assert_eq!(chip8.pc(), 0x206);
}

#[test]
fn test_call() {
    let mut chip8 = setup_chip8(&[0x23, 0x00]);
    chip8.step().unwrap();
    assert_eq!(chip8.sp(), 1);
    assert_eq!(chip8.stack(), &[0x202]);
    assert_eq!(chip8.pc(), 0x300);
}

#[test]
fn test_wait_for_key_round_trip() {
    // ld V3, K; se V3, 0x07; cls
    let mut chip8 = setup_chip8(&[0xF3, 0x0A, 0x33, 0x07, 0x00, 0xE0]);
    assert_eq!(
        chip8.step().unwrap(),
        MachineState::WaitingForKey { register: 0x3 }
    );
    assert_eq!(chip8.supply_key(0x7).unwrap(), MachineState::Running);
    chip8.step().unwrap();
    assert_eq!(chip8.pc(), 0x206);
}

// ========== Boundary scenarios ==========

#[test]
fn test_stack_overflow_halts() {
    // call 0x200, forever
    let mut chip8 = setup_chip8(&[0x22, 0x00]);
    for _ in 0..STACK_DEPTH {
        assert_eq!(chip8.step().unwrap(), MachineState::Running);
    }
    let fault = chip8.step().unwrap_err();

    assert!(matches!(fault.error, Error::StackOverflow));
    assert_eq!(fault.pc, 0x200);
    assert_eq!(fault.word, Some(0x2200));
    assert_eq!(chip8.state(), MachineState::Halted);
    assert_eq!(chip8.sp(), 16);
    assert_eq!(chip8.stack(), &[0x202; STACK_DEPTH]);
}

#[test]
fn test_return_with_empty_stack_halts() {
    let mut chip8 = setup_chip8(&[0x00, 0xEE]);
    let fault = chip8.step().unwrap_err();
    assert!(matches!(fault.error, Error::StackUnderflow));
    assert_eq!(chip8.step().unwrap(), MachineState::Halted);
}

#[test]
fn test_supply_key_while_running() {
    let mut chip8 = setup_chip8(&[0x6A, 0x05, 0x00, 0xE0]);
    chip8.step().unwrap();
    let before = *chip8.registers();
    assert_eq!(chip8.supply_key(0x4).unwrap(), MachineState::Running);
    assert_eq!(*chip8.registers(), before);
    assert_eq!(chip8.pc(), 0x202);
}

#[test]
fn test_bcd_into_vram_halts() {
    // ld I, 0xF00; ld V0, 0xFF; ld B, V0
    let mut chip8 = setup_chip8(&[0xAF, 0x00, 0x60, 0xFF, 0xF0, 0x33]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    let fault = chip8.step().unwrap_err();

    assert!(matches!(fault.error, Error::ReservedRegion { address: 0xF00 }));
    assert_eq!(fault.word, Some(0xF033));
    assert_eq!(lit_pixels(&chip8), 0);
    assert!(chip8.memory().vram().iter().all(|&b| b == 0));
}

#[test]
fn test_empty_program_is_clean() {
    let mut chip8 = setup_chip8(&[0x12, 0x34]);
    chip8.load(&[]).unwrap();
    assert_eq!(chip8.memory().read8(0x200).unwrap(), 0x00);
}

#[test]
fn test_program_reads_back() {
    let program = [0x6A, 0x05, 0x81, 0x24, 0xF3, 0x0A];
    let chip8 = setup_chip8(&program);
    assert_eq!(chip8.memory().slice(0x200, program.len()).unwrap(), &program);
}

#[test]
fn test_random_is_seeded() {
    // rnd V0, 0xFF; rnd V1, 0xFF
    let program = [0xC0, 0xFF, 0xC1, 0xFF];
    let mut first = setup_chip8(&program);
    let mut second = setup_chip8(&program);
    for chip8 in [&mut first, &mut second] {
        chip8.step().unwrap();
        chip8.step().unwrap();
    }
    assert_eq!(first.registers(), second.registers());
}

#[test]
fn test_machines_are_independent() {
    let mut first = setup_chip8(&[0x6A, 0x05]);
    let second = setup_chip8(&[0x6A, 0x05]);
    first.step().unwrap();
    assert_eq!(first.v(0xA), Some(0x05));
    assert_eq!(second.v(0xA), Some(0x00));
    assert_eq!(second.pc(), 0x200);
}
