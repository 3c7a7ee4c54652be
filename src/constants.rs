use crate::types::Address;

// Memory layout

// First data address handed out to variables
pub const VARIABLE_BASE: Address = 16;

// Largest address an address-load instruction can carry
pub const MAX_ADDRESS: u16 = mask(ADDRESS.size);

// Reserved names, checked before labels and variables
pub const PREDEFINED_SYMBOLS: [(&str, Address); 23] = [
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

// Instruction Fields

pub struct InstructionField {
    pub size: u8,
    pub pos: u32,
}

impl InstructionField {
    pub const fn new(size: u8, pos: u32) -> Self {
        InstructionField { size, pos }
    }
}

// Address-load instruction fields
pub const ADDRESS: InstructionField = InstructionField::new(15, 0);

// Compute instruction fields
pub const PREFIX: InstructionField = InstructionField::new(3, 13);
pub const COMP: InstructionField = InstructionField::new(7, 6);
pub const DEST: InstructionField = InstructionField::new(3, 3);
pub const JUMP: InstructionField = InstructionField::new(3, 0);

// Bitmasking
pub const fn mask(size: u8) -> u16 {
    ((1u32 << size) - 1) as u16
}
