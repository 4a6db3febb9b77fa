use std::io::Read;

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, Quirks};
use crate::constants::KEY_COUNT;
use crate::error::{Error, Fault, Result};
use crate::instruction::decode;
use crate::memory::Memory;
use crate::operations::{from_op, Flow};
use crate::registers::RegisterFile;
use crate::stack::Stack;
use crate::timers::TimerUnit;

/// Where the engine is in its fetch-decode-execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Running,
    /// `Fx0A` is waiting for `supply_key`, the key lands in V`register`
    WaitingForKey { register: u8 },
    /// A fault stopped emulation; only `load` or `reset` leave this state
    Halted,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - `memory`, `registers`, the call `stack` and the `timers`
///  - the pressed status of the 16 keys
///  - whether the engine is running, waiting for a key or halted
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing, releasing and supplying keys
/// - advancing the CPU by one instruction
/// - advancing its timers
/// - inspecting its display for rendering by some frontend
///
/// Every instance owns all of its state; nothing is shared between machines.
pub struct Chip8 {
    pub(crate) memory: Memory,
    pub(crate) registers: RegisterFile,
    pub(crate) stack: Stack,
    pub(crate) timers: TimerUnit,
    pub(crate) quirks: Quirks,
    pub(crate) rng: StdRng,
    pub(crate) draw_flag: bool,
    pressed_keys: [bool; KEY_COUNT],
    state: MachineState,
    config: Config,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            memory: Memory::new(),
            registers: RegisterFile::new(),
            stack: Stack::new(),
            timers: TimerUnit::new(),
            quirks: config.quirks,
            rng,
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            state: MachineState::Running,
            config,
        }
    }

    /// Load a program at 0x200 and start it from a clean machine.
    /// An oversized program leaves the machine as it was.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load(program)?;
        self.reset_cpu();
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load(&program)
    }

    /// Back to a freshly constructed machine with no program, keeping the config
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.reset_cpu();
        debug!("reset");
    }

    fn reset_cpu(&mut self) {
        self.registers = RegisterFile::new();
        self.stack = Stack::new();
        self.timers = TimerUnit::new();
        self.pressed_keys = [false; KEY_COUNT];
        self.state = MachineState::Running;
        self.draw_flag = true;
    }

    /// Advances the CPU by a single instruction
    /// - does nothing while waiting for a key or halted
    /// - gets and executes the next opcode
    /// - halts on any fault, which is returned exactly once
    pub fn step(&mut self) -> std::result::Result<MachineState, Fault> {
        if self.state != MachineState::Running {
            return Ok(self.state);
        }

        let pc = self.registers.pc();
        let op = match self.memory.read_word(usize::from(pc)) {
            Ok(op) => op,
            Err(error) => return Err(self.halt(pc, None, error)),
        };

        match self.execute(op) {
            Ok(()) => Ok(self.state),
            Err(error) => Err(self.halt(pc, Some(op), error)),
        }
    }

    fn execute(&mut self, op: u16) -> Result<()> {
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.registers.all(),
            self.registers.i(),
            self.registers.pc()
        );
        let instruction = decode(op)?;
        match from_op(instruction.operation)(&instruction, self)? {
            Flow::Next => self.registers.advance_pc(),
            Flow::Skip => {
                self.registers.advance_pc()?;
                self.registers.advance_pc()
            }
            Flow::Jump(target) => {
                self.registers.set_pc(target);
                Ok(())
            }
            Flow::Wait(register) => {
                debug!("waiting for a key for V{:X}", register);
                self.state = MachineState::WaitingForKey { register };
                Ok(())
            }
        }
    }

    fn halt(&mut self, pc: u16, word: Option<u16>, error: Error) -> Fault {
        let fault = Fault { pc, word, error };
        error!("{}", fault);
        self.state = MachineState::Halted;
        fault
    }

    /// Completes a pending `Fx0A` by storing `key` in its register.
    /// Outside of `WaitingForKey`, or with a key that is not on the keypad, this does nothing.
    pub fn supply_key(&mut self, key: u8) -> std::result::Result<MachineState, Fault> {
        let register = match self.state {
            MachineState::WaitingForKey { register } => register,
            _ => return Ok(self.state),
        };
        if usize::from(key) >= KEY_COUNT {
            warn!("ignoring supplied key {:#04X}", key);
            return Ok(self.state);
        }

        self.registers.set(register, key);
        self.state = MachineState::Running;
        debug!("V{:X} = key {:X}", register, key);

        let pc = self.registers.pc();
        match self.registers.advance_pc() {
            Ok(()) => Ok(self.state),
            Err(error) => {
                let word = self.memory.read_word(usize::from(pc)).ok();
                Err(self.halt(pc, word, error))
            }
        }
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_down(&mut self, key: u8) -> Result<()> {
        self.set_key(key, true)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_up(&mut self, key: u8) -> Result<()> {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self.pressed_keys.get_mut(usize::from(key)).ok_or_else(|| {
            warn!("key {:#04X} is not on the keypad", key);
            Error::InvalidKey { key }
        })?;
        *slot = pressed;
        Ok(())
    }

    /// Keys off the keypad are never down
    pub fn is_key_down(&self, key: u8) -> bool {
        self.pressed_keys
            .get(usize::from(key))
            .copied()
            .unwrap_or(false)
    }

    /// Decrements the delay and sound timers; call at `TIMER_HZ`
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.timers.sound() > 0
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.memory.pixel(x, y)
    }

    /// Returns whether the display changed since the last call, and resets that
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.draw_flag, false)
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Vx, or `None` past VF
    pub fn v(&self, x: u8) -> Option<u8> {
        self.registers.v(x)
    }

    pub fn i(&self) -> u16 {
        self.registers.i()
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc()
    }

    pub fn sp(&self) -> u8 {
        self.stack.sp()
    }

    /// Saved return addresses, oldest first
    pub fn stack(&self) -> &[u16] {
        self.stack.entries()
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn timers(&self) -> &TimerUnit {
        &self.timers
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
