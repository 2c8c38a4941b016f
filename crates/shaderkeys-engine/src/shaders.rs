use std::fmt;

use crate::input::KEY_DIGIT_1;

/// Number of shader slots; one per digit key `1..=9`.
pub const SLOT_COUNT: usize = 9;

/// One of the nine fixed shader slots, 1-indexed to match the digit keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderSlot {
    #[default]
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
}

impl ShaderSlot {
    /// Ascending order; the input scan walks slots in this order.
    pub const ALL: [ShaderSlot; SLOT_COUNT] = [
        ShaderSlot::S1,
        ShaderSlot::S2,
        ShaderSlot::S3,
        ShaderSlot::S4,
        ShaderSlot::S5,
        ShaderSlot::S6,
        ShaderSlot::S7,
        ShaderSlot::S8,
        ShaderSlot::S9,
    ];

    /// Zero-based position in the bank.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The digit printed on the key (1..=9).
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1..=9 => Some(Self::ALL[usize::from(n) - 1]),
            _ => None,
        }
    }

    /// Key code that selects this slot (`'1'` = 49 ... `'9'` = 57).
    pub fn key_code(self) -> u32 {
        KEY_DIGIT_1 + self.index() as u32
    }

    pub fn from_key_code(code: u32) -> Option<Self> {
        let off = code.checked_sub(KEY_DIGIT_1)?;
        Self::ALL.get(off as usize).copied()
    }
}

impl fmt::Display for ShaderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader{}", self.number())
    }
}

/// Exactly nine program handles, looked up by slot.
///
/// `P` is whatever the renderer uses to identify a compiled program (a GL program name in
/// the binary, a plain label in tests). The bank is built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBank<P> {
    programs: [P; SLOT_COUNT],
}

impl<P> ShaderBank<P> {
    pub fn new(programs: [P; SLOT_COUNT]) -> Self {
        Self { programs }
    }

    /// Build from a list that must contain exactly nine entries; hands the list back otherwise.
    pub fn from_vec(programs: Vec<P>) -> Result<Self, Vec<P>> {
        <[P; SLOT_COUNT]>::try_from(programs).map(Self::new)
    }

    pub fn get(&self, slot: ShaderSlot) -> &P {
        &self.programs[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShaderSlot, &P)> {
        ShaderSlot::ALL.into_iter().zip(self.programs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_map_to_ascii_digit_codes() {
        for (i, slot) in ShaderSlot::ALL.into_iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(slot.key_code(), 49 + i as u32);
            assert_eq!(ShaderSlot::from_key_code(slot.key_code()), Some(slot));
            assert_eq!(ShaderSlot::from_number(slot.number()), Some(slot));
        }
        assert_eq!(ShaderSlot::from_key_code(48), None);
        assert_eq!(ShaderSlot::from_key_code(58), None);
        assert_eq!(ShaderSlot::from_key_code(32), None);
        assert_eq!(ShaderSlot::from_number(0), None);
    }

    #[test]
    fn display_uses_one_based_name() {
        assert_eq!(ShaderSlot::S1.to_string(), "shader1");
        assert_eq!(ShaderSlot::S9.to_string(), "shader9");
        assert_eq!(ShaderSlot::default(), ShaderSlot::S1);
    }

    #[test]
    fn bank_requires_exactly_nine_programs() {
        assert!(ShaderBank::from_vec(vec![0u32; 8]).is_err());
        assert!(ShaderBank::from_vec(vec![0u32; 10]).is_err());

        let bank = ShaderBank::from_vec((1..=9).collect::<Vec<u32>>()).unwrap();
        assert_eq!(*bank.get(ShaderSlot::S1), 1);
        assert_eq!(*bank.get(ShaderSlot::S5), 5);
        assert_eq!(*bank.get(ShaderSlot::S9), 9);
        assert_eq!(bank.iter().count(), SLOT_COUNT);
    }
}
