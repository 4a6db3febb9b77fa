use std::ops::Range;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_ADDRESS, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START,
    RESERVED_END, SPRITE_SHEET, VRAM_ROW_BYTES, VRAM_SIZE, VRAM_START,
};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of flat, byte addressable memory.
///
/// ```text
/// 0x000-0x1FF  interpreter (sprite sheet at 0x050)
/// 0x200-0xE9F  program
/// 0xEA0-0xEFF  interpreter work area
/// 0xF00-0xFFF  display
/// ```
///
/// Addresses are `usize` so that `I + offset` can be checked without wrapping.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    /// Zeroed memory with the sprite sheet installed
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        };
        memory.install(FONT_ADDRESS as usize, &SPRITE_SHEET);
        memory
    }

    /// Copies `program` to 0x200 on top of freshly initialised memory.
    /// Oversized programs are rejected before anything is touched.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        *self = Memory::new();
        self.install(PROGRAM_START as usize, program);
        Ok(())
    }

    pub fn read8(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Error::OutOfRange { address: addr })
    }

    /// Writes a byte on behalf of a running program, see `write_slice`
    pub fn write8(&mut self, addr: usize, byte: u8) -> Result<()> {
        self.write_slice(addr, &[byte])
    }

    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let bytes = self.slice(addr, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Writes all of `data` from `addr` onwards, or nothing at all.
    /// Programs may not write to the interpreter region below 0x200 or to the
    /// display, which only `00E0` and `Dxyn` change.
    pub fn write_slice(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        if addr < RESERVED_END as usize {
            return Err(Error::ReservedRegion { address: addr });
        }
        let range = Self::span(addr, data.len())?;
        let vram = VRAM_START as usize;
        if range.end > vram {
            return Err(Error::ReservedRegion {
                address: addr.max(vram),
            });
        }
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Borrows `len` bytes starting at `addr`
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        Ok(&self.bytes[Self::span(addr, len)?])
    }

    /// `addr..addr + len`, if all of it is inside memory
    fn span(addr: usize, len: usize) -> Result<Range<usize>> {
        addr.checked_add(len)
            .filter(|&end| end <= MEMORY_SIZE)
            .map(|end| addr..end)
            .ok_or(Error::OutOfRange {
                address: addr.max(MEMORY_SIZE),
            })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Initialisation-time write that ignores the reserved region
    fn install(&mut self, addr: usize, data: &[u8]) {
        self.bytes[addr..addr + data.len()].copy_from_slice(data);
    }

    /// Whether the pixel at (x, y) is lit; anything off screen is dark
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let (index, mask) = Self::pixel_location(x, y);
        self.bytes[index] & mask != 0
    }

    /// XORs a lit pixel onto (x, y), returning true if it was already lit.
    /// Coordinates wrap around the display edges.
    pub(crate) fn flip_pixel(&mut self, x: usize, y: usize) -> bool {
        let (index, mask) = Self::pixel_location(x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT);
        let erased = self.bytes[index] & mask != 0;
        self.bytes[index] ^= mask;
        erased
    }

    pub(crate) fn clear_vram(&mut self) {
        let start = VRAM_START as usize;
        self.bytes[start..start + VRAM_SIZE].fill(0);
    }

    pub fn vram(&self) -> &[u8] {
        let start = VRAM_START as usize;
        &self.bytes[start..start + VRAM_SIZE]
    }

    fn pixel_location(x: usize, y: usize) -> (usize, u8) {
        let index = VRAM_START as usize + y * VRAM_ROW_BYTES + x / 8;
        (index, 0x80 >> (x % 8))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
