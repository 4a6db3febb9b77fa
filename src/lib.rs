pub use chip8::{Chip8, MachineState};
pub use config::{Config, MachineCodePolicy, Quirks};
pub use constants::{CLOCK_SPEED, TIMER_HZ};
pub use error::{Error, Fault, Result};
pub use instruction::{decode, Instruction, OpcodeEntry, Operation, OPCODE_TABLE};
pub use memory::Memory;
pub use registers::RegisterFile;
pub use stack::Stack;
pub use timers::TimerUnit;

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod memory;
mod operations;
mod registers;
mod stack;
mod timers;
