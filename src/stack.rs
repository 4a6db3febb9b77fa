use crate::constants::STACK_DEPTH;
use crate::error::{Error, Result};

/// # Stack
/// Return addresses for up to 16 nested subroutine calls.
///
/// `sp` is the 8-bit stack pointer: the number of slots in use.
/// Overflow and underflow are errors and never touch the stored addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    sp: u8,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            slots: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let slot = self
            .slots
            .get_mut(usize::from(self.sp))
            .ok_or(Error::StackOverflow)?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        self.sp = self.sp.checked_sub(1).ok_or(Error::StackUnderflow)?;
        Ok(self.slots[usize::from(self.sp)])
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// The saved return addresses, oldest first
    pub fn entries(&self) -> &[u16] {
        &self.slots[..usize::from(self.sp)]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
