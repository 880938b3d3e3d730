pub mod inst;
pub mod op;

pub use inst::{decode_all, encode, Inst};
pub use op::{OpInfo, Opcode};
