use log::warn;
use rand::Rng;

use crate::chip8::Chip8;
use crate::config::MachineCodePolicy;
use crate::constants::{FONT_ADDRESS, FONT_GLYPH_SIZE, MEMORY_SIZE, RESERVED_END};
use crate::error::{Error, Result};
use crate::instruction::{Instruction, Operation};

/// What the engine does with PC once an operation has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// PC += 2
    Next,
    /// PC += 4
    Skip,
    /// PC = target; the operation set PC itself
    Jump(u16),
    /// Block until a key is supplied for Vx; PC stays on this instruction
    Wait(u8),
}

impl Flow {
    fn skip_if(condition: bool) -> Flow {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

pub type Handler = fn(op: &Instruction, chip8: &mut Chip8) -> Result<Flow>;

/// Selects the handler for a decoded operation
pub fn from_op(operation: Operation) -> Handler {
    match operation {
        Operation::Cls => clr,
        Operation::Ret => rts,
        Operation::Sys => sys,
        Operation::Jp => jump,
        Operation::Call => call,
        Operation::SeByte => ske,
        Operation::SneByte => skne,
        Operation::SeReg => skre,
        Operation::LdByte => load,
        Operation::AddByte => add,
        Operation::LdReg => mv,
        Operation::Or => or,
        Operation::And => and,
        Operation::Xor => xor,
        Operation::AddReg => addr,
        Operation::Sub => sub,
        Operation::Shr => shr,
        Operation::Subn => subn,
        Operation::Shl => shl,
        Operation::SneReg => skrne,
        Operation::LdI => loadi,
        Operation::JpV0 => jumpi,
        Operation::Rnd => rand,
        Operation::Drw => draw,
        Operation::Skp => skpr,
        Operation::Sknp => skup,
        Operation::LdVxDt => moved,
        Operation::LdVxK => keyd,
        Operation::LdDtVx => loads,
        Operation::LdStVx => ld,
        Operation::AddI => addi,
        Operation::LdF => ldspr,
        Operation::LdB => bcd,
        Operation::StoreRegs => stor,
        Operation::LoadRegs => read,
    }
}

/// Branches may only land on an even address in the program area or above
fn branch_target(target: u16) -> Result<u16> {
    if target < RESERVED_END {
        Err(Error::ReservedRegion {
            address: usize::from(target),
        })
    } else if usize::from(target) >= MEMORY_SIZE {
        Err(Error::OutOfRange {
            address: usize::from(target),
        })
    } else if target % 2 != 0 {
        Err(Error::MisalignedBranch { target })
    } else {
        Ok(target)
    }
}

/// clear
pub fn clr(_op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    chip8.memory.clear_vram();
    chip8.draw_flag = true;
    Ok(Flow::Next)
}

/// PC = STACK.pop()
pub fn rts(_op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let address = chip8.stack.pop()?;
    Ok(Flow::Jump(branch_target(address)?))
}

/// machine code routine at addr
pub fn sys(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    match chip8.quirks.machine_code {
        MachineCodePolicy::Skip => {
            warn!("skipping machine code routine at {:#05X}", op.nnn);
            Ok(Flow::Next)
        }
        MachineCodePolicy::Halt => Err(Error::MachineCodeRoutine { address: op.nnn }),
    }
}

/// PC = addr
pub fn jump(op: &Instruction, _chip8: &mut Chip8) -> Result<Flow> {
    Ok(Flow::Jump(branch_target(op.nnn)?))
}

/// STACK.push(PC + 2); PC = addr
pub fn call(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let target = branch_target(op.nnn)?;
    chip8.stack.push(chip8.registers.pc() + 0x2)?;
    Ok(Flow::Jump(target))
}

/// if Vx == kk then pc += 2
pub fn ske(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    Ok(Flow::skip_if(chip8.registers.get(op.x) == op.kk))
}

/// if Vx != kk then pc += 2
pub fn skne(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    Ok(Flow::skip_if(chip8.registers.get(op.x) != op.kk))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let registers = &chip8.registers;
    Ok(Flow::skip_if(registers.get(op.x) == registers.get(op.y)))
}

/// Vx = kk
pub fn load(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    chip8.registers.set(op.x, op.kk);
    Ok(Flow::Next)
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let res = chip8.registers.get(op.x).wrapping_add(op.kk);
    chip8.registers.set(op.x, res);
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let vy = chip8.registers.get(op.y);
    chip8.registers.set(op.x, vy);
    Ok(Flow::Next)
}

fn logic(op: &Instruction, chip8: &mut Chip8, f: fn(u8, u8) -> u8) -> Result<Flow> {
    let res = f(chip8.registers.get(op.x), chip8.registers.get(op.y));
    if chip8.quirks.logic_resets_vf {
        chip8.registers.set_flag(false);
    }
    chip8.registers.set(op.x, res);
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    logic(op, chip8, |vx, vy| vx | vy)
}

/// Vx &= Vy
pub fn and(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    logic(op, chip8, |vx, vy| vx & vy)
}

/// Vx ^= Vy
pub fn xor(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    logic(op, chip8, |vx, vy| vx ^ vy)
}

// The flag operations below compute VF from the operands as they were before
// the instruction, write VF, and only then write Vx. With x = F the result wins.

/// Vx += Vy; VF = overflow
pub fn addr(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let (res, over) = chip8
        .registers
        .get(op.x)
        .overflowing_add(chip8.registers.get(op.y));
    chip8.registers.set_flag(over);
    chip8.registers.set(op.x, res);
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let (res, under) = chip8
        .registers
        .get(op.x)
        .overflowing_sub(chip8.registers.get(op.y));
    chip8.registers.set_flag(!under);
    chip8.registers.set(op.x, res);
    Ok(Flow::Next)
}

/// The register a shift reads from
fn shift_source(op: &Instruction, chip8: &Chip8) -> u8 {
    if chip8.quirks.shift_reads_vy {
        chip8.registers.get(op.y)
    } else {
        chip8.registers.get(op.x)
    }
}

/// Vx = Vy >> 1; VF = shifted out bit
pub fn shr(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let source = shift_source(op, chip8);
    chip8.registers.set_flag(source & 0x1 != 0);
    chip8.registers.set(op.x, source >> 1);
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let (res, under) = chip8
        .registers
        .get(op.y)
        .overflowing_sub(chip8.registers.get(op.x));
    chip8.registers.set_flag(!under);
    chip8.registers.set(op.x, res);
    Ok(Flow::Next)
}

/// Vx = Vy << 1; VF = shifted out bit
pub fn shl(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let source = shift_source(op, chip8);
    chip8.registers.set_flag(source & 0x80 != 0);
    chip8.registers.set(op.x, source << 1);
    Ok(Flow::Next)
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let registers = &chip8.registers;
    Ok(Flow::skip_if(registers.get(op.x) != registers.get(op.y)))
}

/// I = addr
pub fn loadi(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    chip8.registers.set_i(op.nnn);
    Ok(Flow::Next)
}

/// PC = V0 + addr
pub fn jumpi(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let target = op.nnn + u16::from(chip8.registers.get(0x0));
    Ok(Flow::Jump(branch_target(target)?))
}

/// Vx = rand_byte & kk
pub fn rand(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let rand_byte: u8 = chip8.rng.gen();
    chip8.registers.set(op.x, rand_byte & op.kk);
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..n at position x, y on the display with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let x = usize::from(chip8.registers.get(op.x));
    let y = usize::from(chip8.registers.get(op.y));
    let sprite = chip8
        .memory
        .slice(usize::from(chip8.registers.i()), usize::from(op.n))?
        .to_vec();

    let mut collision = false;
    for (row, byte) in sprite.iter().enumerate() {
        for bit in 0..8 {
            if (byte >> (7 - bit)) & 0x1 == 0x1 {
                collision |= chip8.memory.flip_pixel(x + bit, y + row);
            }
        }
    }

    chip8.registers.set_flag(collision);
    chip8.draw_flag = true;
    Ok(Flow::Next)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let key = chip8.registers.get(op.x);
    Ok(Flow::skip_if(chip8.is_key_down(key)))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let key = chip8.registers.get(op.x);
    Ok(Flow::skip_if(!chip8.is_key_down(key)))
}

/// Vx = DT
pub fn moved(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    chip8.registers.set(op.x, chip8.timers.delay());
    Ok(Flow::Next)
}

/// await keypress for Vx
pub fn keyd(op: &Instruction, _chip8: &mut Chip8) -> Result<Flow> {
    Ok(Flow::Wait(op.x))
}

/// DT = Vx
pub fn loads(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    chip8.timers.set_delay(chip8.registers.get(op.x));
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    chip8.timers.set_sound(chip8.registers.get(op.x));
    Ok(Flow::Next)
}

/// I += Vx
pub fn addi(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let i = chip8
        .registers
        .i()
        .wrapping_add(u16::from(chip8.registers.get(op.x)));
    chip8.registers.set_i(i);
    Ok(Flow::Next)
}

/// I = sprite(Vx)
/// Set I to the memory address of the sprite for the low nibble of Vx
pub fn ldspr(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let digit = u16::from(chip8.registers.get(op.x) & 0xF);
    chip8.registers.set_i(FONT_ADDRESS + digit * FONT_GLYPH_SIZE);
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let vx = chip8.registers.get(op.x);
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    chip8
        .memory
        .write_slice(usize::from(chip8.registers.i()), &bcd)?;
    Ok(Flow::Next)
}

/// I += x + 1 when the dialect leaves I past the transferred block
fn bump_i(op: &Instruction, chip8: &mut Chip8) {
    if chip8.quirks.load_store_increments_i {
        let i = chip8.registers.i().wrapping_add(u16::from(op.x) + 1);
        chip8.registers.set_i(i);
    }
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let i = usize::from(chip8.registers.i());
    chip8.memory.write_slice(i, chip8.registers.range(op.x))?;
    bump_i(op, chip8);
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &Instruction, chip8: &mut Chip8) -> Result<Flow> {
    let i = usize::from(chip8.registers.i());
    let block = chip8.memory.slice(i, usize::from(op.x) + 1)?;
    chip8.registers.range_mut(op.x).copy_from_slice(block);
    bump_i(op, chip8);
    Ok(Flow::Next)
}
