use emu8::constants::{MAX_PROGRAM_SIZE, PROGRAM_START};
use emu8::decode;

use crate::formatter::{format_data, format_instruction};
use crate::{Disassembler, Line, Listing};

/// # Linear sweep
/// Decodes every 2-byte word of the ROM in order.
///
/// Data mixed in with code is decoded as if it were code whenever it happens to
/// match an opcode; words that match nothing are listed as `db`.
/// Bytes past what the engine would load are not listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSweep;

impl Disassembler for LinearSweep {
    fn disassemble(&self, rom: &[u8]) -> Listing {
        let rom = &rom[..rom.len().min(MAX_PROGRAM_SIZE)];
        let lines = rom
            .chunks(2)
            .enumerate()
            .map(|(index, bytes)| {
                let address = PROGRAM_START + 2 * index as u16;
                let mnemonic = match bytes {
                    [high, low] => match decode(u16::from_be_bytes([*high, *low])) {
                        Ok(instruction) => format_instruction(&instruction),
                        Err(_) => format_data(bytes),
                    },
                    _ => format_data(bytes),
                };
                Line {
                    address,
                    bytes: bytes.to_vec(),
                    mnemonic,
                }
            })
            .collect::<Vec<_>>();
        Listing::from(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rom() {
        assert!(LinearSweep.disassemble(&[]).is_empty());
    }

    #[test]
    fn test_every_word_in_order() {
        let listing = LinearSweep.disassemble(&[0x00, 0xE0, 0x6A, 0x05, 0x12, 0x00]);
        let lines: Vec<(u16, &str)> = listing.iter().collect();
        assert_eq!(
            lines,
            vec![(0x200, "cls"), (0x202, "ld VA, 0x05"), (0x204, "jp 0x200")]
        );
    }

    #[test]
    fn test_unknown_word_is_data() {
        let listing = LinearSweep.disassemble(&[0xFF, 0xFF, 0x00, 0xEE]);
        assert_eq!(listing.mnemonic_at(0x200), Some("db 0xFF, 0xFF"));
        assert_eq!(listing.mnemonic_at(0x202), Some("ret"));
    }

    #[test]
    fn test_trailing_byte_is_data() {
        let listing = LinearSweep.disassemble(&[0x00, 0xE0, 0x12]);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.mnemonic_at(0x202), Some("db 0x12"));
    }

    #[test]
    fn test_sprite_data_misread_as_code() {
        // jp 0x204; a sprite row pair that happens to be `ld V0, 0x90`
        let listing = LinearSweep.disassemble(&[0x12, 0x04, 0x60, 0x90, 0x00, 0xEE]);
        assert_eq!(listing.mnemonic_at(0x202), Some("ld V0, 0x90"));
    }

    #[test]
    fn test_stops_at_largest_program() {
        let rom: Vec<u8> = [0x00, 0xE0].repeat(MAX_PROGRAM_SIZE / 2 + 2);
        let listing = LinearSweep.disassemble(&rom);
        assert_eq!(listing.len(), MAX_PROGRAM_SIZE / 2);
        assert_eq!(listing.mnemonic_at(0xE9E), Some("cls"));
        assert_eq!(listing.mnemonic_at(0xEA0), None);
    }
}
