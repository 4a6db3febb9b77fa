use std::fmt;

/// Everything that can go wrong while loading or running a program.
///
/// All variants except `InvalidKey`, `ProgramTooLarge` and `Io` are fatal to
/// emulation: the machine halts and reports them from `step`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown opcode {word:#06X}")]
    UnknownOpcode { word: u16 },

    #[error("call with all 16 stack slots in use")]
    StackOverflow,

    #[error("return with an empty stack")]
    StackUnderflow,

    #[error("address {address:#06X} is outside of memory")]
    OutOfRange { address: usize },

    #[error("program is {size} bytes, at most {max} fit")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("address {address:#06X} is not writable by programs")]
    ReservedRegion { address: usize },

    #[error("branch to odd address {target:#06X}")]
    MisalignedBranch { target: u16 },

    #[error("machine code routine at {address:#05X} cannot be executed")]
    MachineCodeRoutine { address: u16 },

    #[error("key {key:#04X} is not on the keypad")]
    InvalidKey { key: u8 },

    #[error("unable to read program")]
    Io(#[from] std::io::Error),
}

/// A fatal `Error` together with where it happened.
#[derive(thiserror::Error, Debug)]
pub struct Fault {
    /// PC of the instruction that failed
    pub pc: u16,
    /// The instruction word, if it was fetched
    pub word: Option<u16>,
    #[source]
    pub error: Error,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.word {
            Some(word) => write!(f, "halted at {:#06X} ({:04X}): {}", self.pc, word, self.error),
            None => write!(f, "halted at {:#06X}: {}", self.pc, self.error),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
