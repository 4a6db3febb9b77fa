/// What to do with `0nnn`, a jump into a native COSMAC machine code routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineCodePolicy {
    /// Treat the routine as a no-op and carry on with the next instruction
    Skip,
    /// Halt with `Error::MachineCodeRoutine`
    Halt,
}

/// # Quirks
/// CHIP-8 interpreters disagree on a handful of instructions.
/// The defaults follow the canonical COSMAC semantics except where noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// `Fx55`/`Fx65` leave I pointing past the last register transferred
    pub load_store_increments_i: bool,
    /// `8xy6`/`8xyE` shift Vy into Vx; otherwise Vx is shifted in place
    pub shift_reads_vy: bool,
    /// `8xy1`/`8xy2`/`8xy3` clear VF
    pub logic_resets_vf: bool,
    pub machine_code: MachineCodePolicy,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            load_store_increments_i: false,
            shift_reads_vy: true,
            logic_resets_vf: false,
            machine_code: MachineCodePolicy::Skip,
        }
    }
}

/// Machine configuration, fixed for the lifetime of a `Chip8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    /// Seed for `Cxkk`; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_quirks(quirks: Quirks) -> Self {
        Config { quirks, seed: None }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
