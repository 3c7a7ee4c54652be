use crate::{constants::*, types::*};

// Address-load instruction: leading 0, then the 15-bit address.
pub fn encode_address(address: u16) -> u16 {
    address & mask(ADDRESS.size)
}

// Compute instruction: 111, then comp, dest and jump codes.
pub fn encode_compute(dest: Dest, comp: Comp, jump: Jump) -> u16 {
    mask(PREFIX.size) << PREFIX.pos
        | (comp as u16) << COMP.pos
        | (dest as u16) << DEST.pos
        | (jump as u16) << JUMP.pos
}

pub fn to_binary(word: u16) -> String {
    format!("{:016b}", word)
}
