use crate::op::Opcode;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One bytecode instruction: an opcode plus the immediate it carries.
///
/// Only the PUSH family carries an immediate; for every other opcode
/// `imm` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inst {
    pub op: Opcode,
    pub imm: Option<i64>,
}

impl Inst {
    pub fn op(op: Opcode) -> Self {
        Inst { op, imm: None }
    }

    /// Push a constant with the minimal-width encoding.
    ///
    /// Zero becomes PUSH0 with no immediate bytes. Otherwise the
    /// smallest PUSHn able to hold the unsigned bit pattern is chosen;
    /// negative values always take the full 8-byte form so the sign
    /// bits survive.
    pub fn push(val: i64) -> Self {
        if val == 0 {
            return Inst::op(Opcode::PUSH0);
        }
        let mut n = 0;
        let mut v = val as u64;
        while v > 0 {
            n += 1;
            v >>= 8;
        }
        if val < 0 {
            n = 8;
        }
        let op = match n {
            1 => Opcode::PUSH1,
            2 => Opcode::PUSH2,
            3 => Opcode::PUSH3,
            4 => Opcode::PUSH4,
            5 => Opcode::PUSH5,
            6 => Opcode::PUSH6,
            7 => Opcode::PUSH7,
            _ => Opcode::PUSH8,
        };
        Inst { op, imm: Some(val) }
    }

    /// Append the opcode byte and exactly `push_size()` little-endian
    /// immediate bytes.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.op.into());
        let n = self.op.push_size();
        if n > 0 {
            let le = (self.imm.unwrap_or(0) as u64).to_le_bytes();
            out.extend_from_slice(&le[..n]);
        }
    }

    /// Read one instruction back from a byte stream. Returns the
    /// instruction and the number of bytes consumed, or `None` on an
    /// undefined opcode byte or a truncated immediate. Immediates
    /// shorter than 8 bytes are zero-extended.
    pub fn decode(buf: &[u8]) -> Option<(Inst, usize)> {
        let (&byte, rest) = buf.split_first()?;
        let op = Opcode::try_from(byte).ok()?;
        let n = op.push_size();
        if n == 0 {
            return Some((Inst::op(op), 1));
        }
        if rest.len() < n {
            return None;
        }
        let mut le = [0u8; 8];
        le[..n].copy_from_slice(&rest[..n]);
        let imm = i64::from_le_bytes(le);
        Some((Inst { op, imm: Some(imm) }, 1 + n))
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.op.is_push() {
            write!(f, "{} 0x{:X}", self.op, self.imm.unwrap_or(0) as u64)
        } else {
            write!(f, "{}", self.op)
        }
    }
}

/// Flat byte image of an instruction sequence.
pub fn encode(code: &[Inst]) -> Vec<u8> {
    let mut out = Vec::new();
    for inst in code {
        inst.encode_into(&mut out);
    }
    out
}

/// Decode a whole byte image back into instructions.
///
/// A bad byte never panics: the error names the offending offset and
/// the opcode, `UNKNOWN(0xXX)` for bytes outside the defined set.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Inst>, String> {
    let mut code = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        match Inst::decode(&bytes[pos..]) {
            Some((inst, used)) => {
                code.push(inst);
                pos += used;
            }
            None => {
                let byte = bytes[pos];
                let name = Opcode::name_of(byte);
                return Err(if Opcode::try_from(byte).is_ok() {
                    format!("truncated immediate after {name} at offset {pos}")
                } else {
                    format!("undefined opcode {name} at offset {pos}")
                });
            }
        }
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_round_trip {
        ($($name:ident: $inst:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = $inst;
                    let mut buf = Vec::new();
                    inst.encode_into(&mut buf);
                    let (back, used) = Inst::decode(&buf).unwrap();
                    assert_eq!(used, buf.len());
                    assert_eq!(inst, back);
                }
            )*
        }
    }

    test_round_trip! {
        rt_stop: Inst::op(Opcode::STOP),
        rt_add: Inst::op(Opcode::ADD),
        rt_mulmod: Inst::op(Opcode::MULMOD),
        rt_swap1: Inst::op(Opcode::SWAP1),
        rt_return: Inst::op(Opcode::RETURN),
        rt_push_zero: Inst::push(0),
        rt_push_small: Inst::push(0x42),
        rt_push_two: Inst::push(0x1234),
        rt_push_four: Inst::push(0xDEADBEEF),
        rt_push_seven: Inst::push(0x00FF_FFFF_FFFF_FFFF),
        rt_push_max: Inst::push(i64::MAX),
        rt_push_neg_one: Inst::push(-1),
        rt_push_min: Inst::push(i64::MIN),
    }

    #[test]
    fn minimal_width_selection() {
        assert_eq!(Inst::push(0).op, Opcode::PUSH0);
        assert_eq!(Inst::push(0).imm, None);
        assert_eq!(Inst::push(1).op, Opcode::PUSH1);
        assert_eq!(Inst::push(0xFF).op, Opcode::PUSH1);
        assert_eq!(Inst::push(0x100).op, Opcode::PUSH2);
        assert_eq!(Inst::push(0xFFFF).op, Opcode::PUSH2);
        assert_eq!(Inst::push(0x1_0000).op, Opcode::PUSH3);
        assert_eq!(Inst::push(0xFFFF_FFFF).op, Opcode::PUSH4);
        assert_eq!(Inst::push(0x1_0000_0000).op, Opcode::PUSH5);
        assert_eq!(Inst::push((1 << 56) - 1).op, Opcode::PUSH7);
        assert_eq!(Inst::push(1 << 56).op, Opcode::PUSH8);
        assert_eq!(Inst::push(i64::MAX).op, Opcode::PUSH8);
    }

    #[test]
    fn negative_values_take_full_width() {
        for v in [-1, -128, -0x1234, i64::MIN] {
            let inst = Inst::push(v);
            assert_eq!(inst.op, Opcode::PUSH8);
            let mut buf = Vec::new();
            inst.encode_into(&mut buf);
            assert_eq!(buf.len(), 9);
            assert_eq!(&buf[1..], &(v as u64).to_le_bytes());
        }
    }

    #[test]
    fn immediates_are_little_endian() {
        let mut buf = Vec::new();
        Inst::push(0x0201).encode_into(&mut buf);
        assert_eq!(buf, vec![u8::from(Opcode::PUSH2), 0x01, 0x02]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Inst::decode(&[]).is_none());
        // 0x30 is not a defined opcode
        assert!(Inst::decode(&[0x30]).is_none());
        // PUSH4 with only two immediate bytes
        assert!(Inst::decode(&[u8::from(Opcode::PUSH4), 0xAA, 0xBB]).is_none());
    }

    #[test]
    fn decode_all_round_trips() {
        let code = vec![
            Inst::push(0x1234),
            Inst::op(Opcode::MUL),
            Inst::push(-1),
            Inst::op(Opcode::STOP),
        ];
        assert_eq!(decode_all(&encode(&code)), Ok(code));
        assert_eq!(decode_all(&[]), Ok(vec![]));
    }

    #[test]
    fn decode_all_reports_bad_bytes() {
        // ADD, then a byte outside the defined set
        let err = decode_all(&[0x01, 0x30]).unwrap_err();
        assert_eq!(err, "undefined opcode UNKNOWN(0x30) at offset 1");
        // PUSH4 with only two immediate bytes
        let err = decode_all(&[u8::from(Opcode::PUSH4), 0xAA, 0xBB]).unwrap_err();
        assert_eq!(err, "truncated immediate after PUSH4 at offset 0");
    }

    #[test]
    fn sequence_encoding() {
        let code = vec![
            Inst::push(3),
            Inst::push(4),
            Inst::op(Opcode::ADD),
            Inst::op(Opcode::STOP),
        ];
        let bytes = encode(&code);
        assert_eq!(bytes, vec![0x60, 0x03, 0x60, 0x04, 0x01, 0x00]);
    }

    #[test]
    fn display_mnemonics() {
        assert_eq!(Inst::op(Opcode::STOP).to_string(), "STOP");
        assert_eq!(Inst::push(0).to_string(), "PUSH0");
        assert_eq!(Inst::push(0x1234).to_string(), "PUSH2 0x1234");
        assert_eq!(Inst::push(-1).to_string(), "PUSH8 0xFFFFFFFFFFFFFFFF");
    }
}
