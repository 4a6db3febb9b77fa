//! CHIP-8 disassemblers
//!
//! Turns a ROM image into an address-ordered listing of mnemonics, using either
//! a linear sweep over every word or a recursive traversal of control flow.

use std::fmt;

pub mod formatter;
mod linear;
mod recursive;

pub use linear::LinearSweep;
pub use recursive::{RecursiveTraversal, Traversal, V0, MAX_V0_STATES};

/// One listed instruction or run of data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Where the bytes are loaded in memory
    pub address: u16,
    pub bytes: Vec<u8>,
    pub mnemonic: String,
}

/// Disassembly output, ordered by address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    lines: Vec<Line>,
}

impl Listing {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The mnemonic listed at exactly `address`
    pub fn mnemonic_at(&self, address: u16) -> Option<&str> {
        self.lines
            .binary_search_by_key(&address, |line| line.address)
            .ok()
            .map(|index| self.lines[index].mnemonic.as_str())
    }

    /// `(address, mnemonic)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.lines
            .iter()
            .map(|line| (line.address, line.mnemonic.as_str()))
    }
}

impl From<Vec<Line>> for Listing {
    fn from(mut lines: Vec<Line>) -> Self {
        lines.sort_by_key(|line| line.address);
        Listing { lines }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let hex: String = line.bytes.iter().map(|b| format!("{:02X}", b)).collect();
            writeln!(f, "{:03X}  {:<4}  {}", line.address, hex, line.mnemonic)?;
        }
        Ok(())
    }
}

/// A strategy for turning a ROM loaded at 0x200 into a listing
pub trait Disassembler {
    fn disassemble(&self, rom: &[u8]) -> Listing;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(address: u16, mnemonic: &str) -> Line {
        Line {
            address,
            bytes: vec![0x00, 0xE0],
            mnemonic: mnemonic.to_string(),
        }
    }

    #[test]
    fn test_listing_is_ordered() {
        let listing = Listing::from(vec![line(0x204, "b"), line(0x200, "a")]);
        let addresses: Vec<u16> = listing.iter().map(|(address, _)| address).collect();
        assert_eq!(addresses, vec![0x200, 0x204]);
    }

    #[test]
    fn test_mnemonic_at() {
        let listing = Listing::from(vec![line(0x200, "cls"), line(0x202, "ret")]);
        assert_eq!(listing.mnemonic_at(0x202), Some("ret"));
        assert_eq!(listing.mnemonic_at(0x201), None);
    }

    #[test]
    fn test_display() {
        let listing = Listing::from(vec![line(0x200, "cls")]);
        assert_eq!(listing.to_string(), "200  00E0  cls\n");
    }
}
