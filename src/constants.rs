/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// 0x000 - 0x1FF is reserved for the interpreter and its sprite sheet
pub const RESERVED_END: u16 = 0x200;

/// ROMs are loaded at, and execution starts from, 0x200
pub const PROGRAM_START: u16 = 0x200;

/// 0xEA0 - 0xEFF held the COSMAC stack, work area and variables
pub const INTERPRETER_AREA: u16 = 0x0EA0;

/// 0x200 - 0xE9F; the COSMAC VIP leaves 3232 bytes for programs
pub const MAX_PROGRAM_SIZE: usize = (INTERPRETER_AREA - PROGRAM_START) as usize;

/// 0xF00 - 0xFFF is display memory
pub const VRAM_START: u16 = 0x0F00;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Display rows are packed 8 pixels to a byte, most significant bit leftmost
pub const VRAM_ROW_BYTES: usize = DISPLAY_WIDTH / 8;
pub const VRAM_SIZE: usize = VRAM_ROW_BYTES * DISPLAY_HEIGHT;

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: usize = 0xF;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;

/// Nanoseconds per CPU cycle at 500Hz
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Rate at which hosts should call `tick`
pub const TIMER_HZ: u32 = 60;

pub const FONT_ADDRESS: u16 = 0x050;
pub const FONT_GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// Hex digits 0..F, each 4 pixels wide and 5 rows tall.
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
