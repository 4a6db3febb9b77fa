use crate::constants::{FLAG_REGISTER, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT};
use crate::error::{Error, Result};

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
/// - (pc) a 16-bit program counter
///
/// The stack pointer lives with the stack it indexes, see `Stack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    v: [u8; REGISTER_COUNT],
    i: u16,
    pc: u16,
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
        }
    }

    /// Vx, or `None` past VF
    pub fn v(&self, x: u8) -> Option<u8> {
        self.v.get(usize::from(x)).copied()
    }

    /// Vx for a decoded register nibble
    pub(crate) fn get(&self, x: u8) -> u8 {
        self.v[usize::from(x)]
    }

    pub(crate) fn set(&mut self, x: u8, value: u8) {
        self.v[usize::from(x)] = value;
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG_REGISTER]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG_REGISTER] = u8::from(set);
    }

    pub fn all(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    /// V0..=Vx
    pub(crate) fn range(&self, x: u8) -> &[u8] {
        &self.v[..=usize::from(x)]
    }

    pub(crate) fn range_mut(&mut self, x: u8) -> &mut [u8] {
        &mut self.v[..=usize::from(x)]
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, i: u16) {
        self.i = i;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// PC += 2; running off the end of memory is an error, not a wrap
    pub fn advance_pc(&mut self) -> Result<()> {
        let next = usize::from(self.pc) + 2;
        if next >= MEMORY_SIZE {
            return Err(Error::OutOfRange { address: next });
        }
        self.pc = next as u16;
        Ok(())
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_registers {
    use super::*;

    #[test]
    fn test_starts_at_program() {
        let registers = RegisterFile::new();
        assert_eq!(registers.pc(), 0x200);
        assert_eq!(registers.i(), 0x0);
        assert_eq!(registers.all(), &[0; 16]);
    }

    #[test]
    fn test_flag_is_vf() {
        let mut registers = RegisterFile::new();
        registers.set_flag(true);
        assert_eq!(registers.get(0xF), 0x1);
        registers.set(0xF, 0x0);
        assert_eq!(registers.flag(), 0x0);
    }

    #[test]
    fn test_v_past_vf() {
        let mut registers = RegisterFile::new();
        registers.set(0x0, 0x7);
        assert_eq!(registers.v(0x0), Some(0x7));
        assert_eq!(registers.v(0xF), Some(0x0));
        assert_eq!(registers.v(0x10), None);
        assert_eq!(registers.v(0xFF), None);
    }

    #[test]
    fn test_range_is_inclusive() {
        let mut registers = RegisterFile::new();
        registers.range_mut(0x2).copy_from_slice(&[0x1, 0x2, 0x3]);
        assert_eq!(registers.range(0x2), &[0x1, 0x2, 0x3]);
        assert_eq!(registers.get(0x3), 0x0);
    }

    #[test]
    fn test_advance_pc() {
        let mut registers = RegisterFile::new();
        registers.advance_pc().unwrap();
        assert_eq!(registers.pc(), 0x202);
    }

    #[test]
    fn test_advance_pc_off_the_end() {
        let mut registers = RegisterFile::new();
        registers.set_pc(0xFFE);
        assert!(matches!(
            registers.advance_pc(),
            Err(Error::OutOfRange { address: 0x1000 })
        ));
        assert_eq!(registers.pc(), 0xFFE);
    }
}
