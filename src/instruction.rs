use crate::error::{Error, Result};

/// Every operation in the CHIP-8 instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Cls,
    Ret,
    Sys,
    Jp,
    Call,
    SeByte,
    SneByte,
    SeReg,
    LdByte,
    AddByte,
    LdReg,
    Or,
    And,
    Xor,
    AddReg,
    Sub,
    Shr,
    Subn,
    Shl,
    SneReg,
    LdI,
    JpV0,
    Rnd,
    Drw,
    Skp,
    Sknp,
    LdVxDt,
    LdVxK,
    LdDtVx,
    LdStVx,
    AddI,
    LdF,
    LdB,
    StoreRegs,
    LoadRegs,
}

/// One row of the opcode table.
///
/// A word matches when `word & mask == value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub operation: Operation,
    /// Assembly form; `Vx`, `Vy`, `byte`, `addr` and `nibble` stand for fields
    pub syntax: &'static str,
    /// Hex pattern, lowercase letters are fields
    pub pattern: &'static str,
    pub mask: u16,
    pub value: u16,
}

impl OpcodeEntry {
    pub fn matches(&self, word: u16) -> bool {
        word & self.mask == self.value
    }
}

const fn entry(
    operation: Operation,
    syntax: &'static str,
    pattern: &'static str,
    mask: u16,
    value: u16,
) -> OpcodeEntry {
    OpcodeEntry {
        operation,
        syntax,
        pattern,
        mask,
        value,
    }
}

/// The instruction set, in match order.
///
/// Earlier rows win: `00E0` and `00EE` must come before the `0nnn` catch-all.
/// Class `0x8` is keyed on its low nibble alone, so its rows never overlap.
pub static OPCODE_TABLE: [OpcodeEntry; 35] = [
    entry(Operation::Cls, "cls", "00E0", 0xFFFF, 0x00E0),
    entry(Operation::Ret, "ret", "00EE", 0xFFFF, 0x00EE),
    entry(Operation::Sys, "sys addr", "0nnn", 0xF000, 0x0000),
    entry(Operation::Jp, "jp addr", "1nnn", 0xF000, 0x1000),
    entry(Operation::Call, "call addr", "2nnn", 0xF000, 0x2000),
    entry(Operation::SeByte, "se Vx, byte", "3xkk", 0xF000, 0x3000),
    entry(Operation::SneByte, "sne Vx, byte", "4xkk", 0xF000, 0x4000),
    entry(Operation::SeReg, "se Vx, Vy", "5xy0", 0xF00F, 0x5000),
    entry(Operation::LdByte, "ld Vx, byte", "6xkk", 0xF000, 0x6000),
    entry(Operation::AddByte, "add Vx, byte", "7xkk", 0xF000, 0x7000),
    entry(Operation::LdReg, "ld Vx, Vy", "8xy0", 0xF00F, 0x8000),
    entry(Operation::Or, "or Vx, Vy", "8xy1", 0xF00F, 0x8001),
    entry(Operation::And, "and Vx, Vy", "8xy2", 0xF00F, 0x8002),
    entry(Operation::Xor, "xor Vx, Vy", "8xy3", 0xF00F, 0x8003),
    entry(Operation::AddReg, "add Vx, Vy", "8xy4", 0xF00F, 0x8004),
    entry(Operation::Sub, "sub Vx, Vy", "8xy5", 0xF00F, 0x8005),
    entry(Operation::Shr, "shr Vx, Vy", "8xy6", 0xF00F, 0x8006),
    entry(Operation::Subn, "subn Vx, Vy", "8xy7", 0xF00F, 0x8007),
    entry(Operation::Shl, "shl Vx, Vy", "8xyE", 0xF00F, 0x800E),
    entry(Operation::SneReg, "sne Vx, Vy", "9xy0", 0xF00F, 0x9000),
    entry(Operation::LdI, "ld I, addr", "Annn", 0xF000, 0xA000),
    entry(Operation::JpV0, "jp V0, addr", "Bnnn", 0xF000, 0xB000),
    entry(Operation::Rnd, "rnd Vx, byte", "Cxkk", 0xF000, 0xC000),
    entry(Operation::Drw, "drw Vx, Vy, nibble", "Dxyn", 0xF000, 0xD000),
    entry(Operation::Skp, "skp Vx", "Ex9E", 0xF0FF, 0xE09E),
    entry(Operation::Sknp, "sknp Vx", "ExA1", 0xF0FF, 0xE0A1),
    entry(Operation::LdVxDt, "ld Vx, DT", "Fx07", 0xF0FF, 0xF007),
    entry(Operation::LdVxK, "ld Vx, K", "Fx0A", 0xF0FF, 0xF00A),
    entry(Operation::LdDtVx, "ld DT, Vx", "Fx15", 0xF0FF, 0xF015),
    entry(Operation::LdStVx, "ld ST, Vx", "Fx18", 0xF0FF, 0xF018),
    entry(Operation::AddI, "add I, Vx", "Fx1E", 0xF0FF, 0xF01E),
    entry(Operation::LdF, "ld F, Vx", "Fx29", 0xF0FF, 0xF029),
    entry(Operation::LdB, "ld B, Vx", "Fx33", 0xF0FF, 0xF033),
    entry(Operation::StoreRegs, "ld [I], Vx", "Fx55", 0xF0FF, 0xF055),
    entry(Operation::LoadRegs, "ld Vx, [I]", "Fx65", 0xF0FF, 0xF065),
];

/// A decoded instruction: the raw word, the operation it selects and its
/// operand fields.
///
/// ```text
/// word  u x y n
///             kk = y n
///         nnn = x y n
/// ```
///
/// Every field is extracted whether or not the operation uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub word: u16,
    pub operation: Operation,
    /// Instruction class, the top nibble
    pub u: u8,
    /// Register Vx, or the last register of V0..=Vx
    pub x: u8,
    /// Register Vy
    pub y: u8,
    /// Sprite height for `Dxyn`
    pub n: u8,
    /// Immediate byte
    pub kk: u8,
    /// 12-bit address
    pub nnn: u16,
    entry: &'static OpcodeEntry,
}

impl Instruction {
    fn new(word: u16, entry: &'static OpcodeEntry) -> Self {
        Instruction {
            word,
            operation: entry.operation,
            u: (word >> 12) as u8,
            x: ((word >> 8) & 0xF) as u8,
            y: ((word >> 4) & 0xF) as u8,
            n: (word & 0xF) as u8,
            kk: (word & 0xFF) as u8,
            nnn: word & 0x0FFF,
            entry,
        }
    }

    /// The opcode table row this instruction was decoded from
    pub fn entry(&self) -> &'static OpcodeEntry {
        self.entry
    }
}

/// Selects the first `OPCODE_TABLE` row matching `word`
pub fn decode(word: u16) -> Result<Instruction> {
    OPCODE_TABLE
        .iter()
        .find(|entry| entry.matches(word))
        .map(|entry| Instruction::new(word, entry))
        .ok_or(Error::UnknownOpcode { word })
}
