use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One-byte operation codes of the HVM stack machine.
///
/// The numbering follows the EVM convention: arithmetic in 0x00-0x0F,
/// comparison and logic in 0x10-0x1F, hashing and bit tricks in 0x20s,
/// stack/memory in 0x50s, the PUSH family in 0x60s, DUP/SWAP in
/// 0x80/0x90 and control at the top of the range.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Opcode {
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,
    MULHI = 0x0C,
    MODEXP = 0x0D,
    ADDCARRY = 0x0E,
    FIXMUL18 = 0x0F,

    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,
    SHL = 0x1B,
    SHR = 0x1C,
    SAR = 0x1D,
    CLZ = 0x1E,
    FIXDIV18 = 0x1F,

    HASH = 0x20,
    ROL = 0x21,
    ROR = 0x22,
    POPCNT = 0x23,
    BSWAP = 0x24,

    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    JUMP = 0x56,
    JUMPI = 0x57,
    JUMPDEST = 0x5B,
    PUSH0 = 0x5F,

    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,

    DUP1 = 0x80,
    DUP2 = 0x81,
    SWAP1 = 0x90,
    SWAP2 = 0x91,

    RETURN = 0xF3,
    REVERT = 0xFD,
}

/// Static per-opcode record: gas cost plus stack effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpInfo {
    pub gas: u32,
    pub args: u8,
    pub results: u8,
}

impl Opcode {
    /// Case-insensitive mnemonic lookup, for tooling that reads
    /// opcode names from text.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_uppercase().parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("undefined opcode: {s}")),
        }
    }

    pub fn info(self) -> OpInfo {
        use Opcode::*;
        let (gas, args, results) = match self {
            STOP => (0, 0, 0),
            ADD | SUB => (3, 2, 1),
            MUL | DIV | SDIV | MOD | SMOD | SIGNEXTEND | MULHI | FIXMUL18 => (5, 2, 1),
            ADDMOD | MULMOD => (8, 3, 1),
            EXP => (8, 2, 1),
            MODEXP => (20, 3, 1),
            ADDCARRY => (5, 3, 2),

            LT | GT | SLT | SGT | EQ | AND | OR | XOR => (3, 2, 1),
            ISZERO | NOT | CLZ => (3, 1, 1),
            BYTE | SHL | SHR | SAR => (3, 2, 1),
            FIXDIV18 => (5, 2, 1),

            HASH => (30, 2, 1),
            ROL | ROR => (3, 2, 1),
            POPCNT | BSWAP => (3, 1, 1),

            POP => (2, 1, 0),
            MLOAD => (3, 1, 1),
            MSTORE | MSTORE8 => (3, 2, 0),
            JUMP => (8, 1, 0),
            JUMPI => (10, 2, 0),
            JUMPDEST => (1, 0, 0),
            PUSH0 => (2, 0, 1),

            PUSH1 | PUSH2 | PUSH3 | PUSH4 | PUSH5 | PUSH6 | PUSH7 | PUSH8 => (2, 0, 1),

            DUP1 => (3, 1, 2),
            DUP2 => (3, 2, 3),
            SWAP1 => (3, 2, 2),
            SWAP2 => (3, 3, 3),

            RETURN | REVERT => (0, 2, 0),
        };
        OpInfo { gas, args, results }
    }

    pub fn gas(self) -> u32 {
        self.info().gas
    }

    /// True for PUSH1 through PUSH8 (PUSH0 carries no immediate).
    pub fn is_push(self) -> bool {
        let b = u8::from(self);
        (u8::from(Opcode::PUSH1)..=u8::from(Opcode::PUSH8)).contains(&b)
    }

    /// Number of immediate bytes following the opcode byte.
    pub fn push_size(self) -> usize {
        if self.is_push() {
            (u8::from(self) - u8::from(Opcode::PUSH1)) as usize + 1
        } else {
            0
        }
    }

    /// Display name for a raw byte, even one outside the defined set.
    pub fn name_of(byte: u8) -> String {
        match Opcode::try_from(byte) {
            Ok(op) => op.to_string(),
            Err(_) => format!("UNKNOWN(0x{byte:02X})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip() {
        assert_eq!(Opcode::try_from(0x01), Ok(Opcode::ADD));
        assert_eq!(Opcode::try_from(0x5F), Ok(Opcode::PUSH0));
        assert_eq!(Opcode::try_from(0xF3), Ok(Opcode::RETURN));
        assert_eq!(u8::from(Opcode::MULMOD), 0x09);
        assert_eq!(u8::from(Opcode::SWAP1), 0x90);
    }

    #[test]
    fn undefined_bytes_do_not_panic() {
        assert!(Opcode::try_from(0x30).is_err());
        assert_eq!(Opcode::name_of(0x30), "UNKNOWN(0x30)");
        assert_eq!(Opcode::name_of(0x15), "ISZERO");
    }

    #[test]
    fn parse_names() {
        assert_eq!(Opcode::parse("add"), Ok(Opcode::ADD));
        assert_eq!(Opcode::parse("MulMod"), Ok(Opcode::MULMOD));
        assert!(Opcode::parse("hoge").is_err());
    }

    #[test]
    fn push_family() {
        assert!(!Opcode::PUSH0.is_push());
        assert!(Opcode::PUSH1.is_push());
        assert!(Opcode::PUSH8.is_push());
        assert!(!Opcode::ADD.is_push());
        assert_eq!(Opcode::PUSH0.push_size(), 0);
        assert_eq!(Opcode::PUSH1.push_size(), 1);
        assert_eq!(Opcode::PUSH5.push_size(), 5);
        assert_eq!(Opcode::PUSH8.push_size(), 8);
    }

    #[test]
    fn info_table() {
        assert_eq!(Opcode::STOP.gas(), 0);
        assert_eq!(Opcode::MULMOD.info(), OpInfo { gas: 8, args: 3, results: 1 });
        assert_eq!(Opcode::ADDCARRY.info(), OpInfo { gas: 5, args: 3, results: 2 });
        assert_eq!(Opcode::ISZERO.info(), OpInfo { gas: 3, args: 1, results: 1 });
        assert_eq!(Opcode::HASH.gas(), 30);
        assert_eq!(Opcode::JUMPI.gas(), 10);
    }
}
