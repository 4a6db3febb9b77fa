use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use emu8::constants::{MAX_PROGRAM_SIZE, PROGRAM_START};
use emu8::{decode, Instruction, Operation};
use log::{debug, warn};

use crate::formatter::{format_data, format_instruction};
use crate::{Disassembler, Line, Listing};

/// Distinct known values of V0 followed through one address before it is
/// treated as unknown there
pub const MAX_V0_STATES: usize = 8;

/// What the traversal knows about V0 at some point in the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V0 {
    Known(u8),
    Unknown,
}

impl V0 {
    /// V0 once `instruction` has executed
    fn after(self, instruction: &Instruction) -> V0 {
        use Operation::*;

        let writes_v0 = instruction.x == 0;
        match instruction.operation {
            LdByte if writes_v0 => V0::Known(instruction.kk),
            AddByte if writes_v0 => match self {
                V0::Known(value) => V0::Known(value.wrapping_add(instruction.kk)),
                V0::Unknown => V0::Unknown,
            },
            LdReg if writes_v0 && instruction.y == 0 => self,
            LoadRegs => V0::Unknown,
            LdReg | Or | And | Xor | AddReg | Sub | Shr | Subn | Shl | Rnd | LdVxDt | LdVxK
                if writes_v0 =>
            {
                V0::Unknown
            }
            _ => self,
        }
    }
}

/// Everything a recursive traversal found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    pub listing: Listing,
    /// Addresses of `jp V0, addr` reached without knowing V0
    pub unresolved: Vec<u16>,
    /// Targets of `call`
    pub subroutines: Vec<u16>,
}

/// # Recursive traversal
/// Follows control flow from 0x200 and only decodes what execution can reach.
///
/// - `jp` follows its target, `call` its target and the return address
/// - skips follow both the next and the skipped-to instruction
/// - `ret` and `sys` end a path
/// - `jp V0, addr` follows `addr + V0` whenever V0 is known
///
/// V0 is tracked through the instructions that write it. An address is walked
/// once per distinct V0 and at most `MAX_V0_STATES` of those, so loops that
/// keep changing V0 still terminate.
///
/// Bytes that are never reached are listed as data. Bytes past what the engine
/// would load are not listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveTraversal;

impl RecursiveTraversal {
    pub fn traverse(&self, rom: &[u8]) -> Traversal {
        let rom = &rom[..rom.len().min(MAX_PROGRAM_SIZE)];
        let mut walk = Walk::new(rom);

        debug!("entry point at {:#05X}", PROGRAM_START);
        walk.visit(PROGRAM_START, V0::Unknown);
        while let Some((address, v0)) = walk.pending.pop() {
            walk.step(address, v0);
        }
        walk.finish()
    }
}

impl Disassembler for RecursiveTraversal {
    fn disassemble(&self, rom: &[u8]) -> Listing {
        self.traverse(rom).listing
    }
}

struct Walk<'a> {
    rom: &'a [u8],
    pending: Vec<(u16, V0)>,
    seen: HashMap<u16, HashSet<V0>>,
    code: BTreeMap<u16, Instruction>,
    unresolved: BTreeSet<u16>,
    subroutines: BTreeSet<u16>,
}

impl<'a> Walk<'a> {
    fn new(rom: &'a [u8]) -> Self {
        Walk {
            rom,
            pending: Vec::new(),
            seen: HashMap::new(),
            code: BTreeMap::new(),
            unresolved: BTreeSet::new(),
            subroutines: BTreeSet::new(),
        }
    }

    /// Queues `address` unless it was already walked with this V0
    fn visit(&mut self, address: u16, v0: V0) {
        let states = self.seen.entry(address).or_default();
        if states.contains(&v0) {
            return;
        }
        let known = states.iter().filter(|s| matches!(s, V0::Known(_))).count();
        let v0 = match v0 {
            V0::Known(_) if known >= MAX_V0_STATES => V0::Unknown,
            v0 => v0,
        };
        if states.insert(v0) {
            self.pending.push((address, v0));
        }
    }

    /// Instruction at `address`, if it is inside the ROM and executable
    fn fetch(&self, address: u16) -> Option<Instruction> {
        if address % 2 != 0 || address < PROGRAM_START {
            return None;
        }
        let offset = usize::from(address - PROGRAM_START);
        let bytes = self.rom.get(offset..offset + 2)?;
        decode(u16::from_be_bytes([bytes[0], bytes[1]])).ok()
    }

    fn step(&mut self, address: u16, v0: V0) {
        let instruction = match self.fetch(address) {
            Some(instruction) => instruction,
            None => return,
        };
        self.code.insert(address, instruction);

        let next = v0.after(&instruction);
        match instruction.operation {
            Operation::Ret | Operation::Sys => {}
            Operation::Jp => self.visit(instruction.nnn, next),
            Operation::Call => {
                if self.subroutines.insert(instruction.nnn) {
                    debug!("entry point at {:#05X}", instruction.nnn);
                }
                self.visit(instruction.nnn, next);
                self.visit(address + 2, V0::Unknown);
            }
            Operation::SeByte
            | Operation::SneByte
            | Operation::SeReg
            | Operation::SneReg
            | Operation::Skp
            | Operation::Sknp => {
                self.visit(address + 2, next);
                self.visit(address + 4, next);
            }
            Operation::JpV0 => match v0 {
                V0::Known(offset) => self.visit(instruction.nnn + u16::from(offset), next),
                V0::Unknown => {
                    if self.unresolved.insert(address) {
                        warn!("unresolved jp V0 at {:#05X}", address);
                    }
                }
            },
            _ => self.visit(address + 2, next),
        }
    }

    fn finish(self) -> Traversal {
        let mut lines = Vec::new();
        let mut offset = 0;
        while offset < self.rom.len() {
            let address = PROGRAM_START + offset as u16;
            let (end, mnemonic) = match self.code.get(&address) {
                Some(instruction) => (offset + 2, format_instruction(instruction)),
                None => {
                    let end = (offset + 2).min(self.rom.len());
                    (end, format_data(&self.rom[offset..end]))
                }
            };
            lines.push(Line {
                address,
                bytes: self.rom[offset..end].to_vec(),
                mnemonic,
            });
            offset = end;
        }

        Traversal {
            listing: Listing::from(lines),
            unresolved: self.unresolved.into_iter().collect(),
            subroutines: self.subroutines.into_iter().collect(),
        }
    }
}
