// output.rs

use isa::Inst;

/// Assembly listing with per-instruction gas and a trailing total.
pub fn render_asm(code: &[Inst]) -> String {
    let mut out = String::new();
    let mut total_gas: u64 = 0;
    for (i, inst) in code.iter().enumerate() {
        let gas = inst.op.gas();
        total_gas += u64::from(gas);
        let text = inst.to_string();
        out.push_str(&format!(
            "  {:04}  {:<20}  ; 0x{:02X}  gas={}\n",
            i,
            text,
            u8::from(inst.op),
            gas
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "; Total: {} instructions, estimated gas: {}\n",
        code.len(),
        total_gas
    ));
    out
}

/// Uppercase hex dump of the encoded bytecode, one continuous string.
pub fn render_hex(code: &[Inst]) -> String {
    isa::encode(code)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect()
}
