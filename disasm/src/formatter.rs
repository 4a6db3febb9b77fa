//! Formatting functions for disassembled instructions

use emu8::Instruction;

/// Format a single instruction as assembly text
///
/// Fills the fields of the instruction's assembly form from its word:
/// registers as `V1`, bytes as `0x05`, addresses as `0x234`, nibbles in decimal.
pub fn format_instruction(instruction: &Instruction) -> String {
    instruction
        .entry()
        .syntax
        .split(' ')
        .map(|word| {
            let (token, comma) = match word.strip_suffix(',') {
                Some(token) => (token, ","),
                None => (word, ""),
            };
            format!("{}{}", format_operand(instruction, token), comma)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_operand(instruction: &Instruction, token: &str) -> String {
    match token {
        "Vx" => format!("V{:X}", instruction.x),
        "Vy" => format!("V{:X}", instruction.y),
        "byte" => format!("0x{:02X}", instruction.kk),
        "addr" => format!("0x{:03X}", instruction.nnn),
        "nibble" => instruction.n.to_string(),
        literal => literal.to_string(),
    }
}

/// Format bytes that are not code as a `db` directive
pub fn format_data(bytes: &[u8]) -> String {
    let values: Vec<String> = bytes.iter().map(|b| format!("0x{:02X}", b)).collect();
    format!("db {}", values.join(", "))
}
