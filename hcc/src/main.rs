use clap::Parser as ClapParser;
use color_print::cprintln;
use std::fs;

use hcc::output::{render_asm, render_hex};
use hcc::{CodeGen, Error, Lexer, Parser};

#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "HolyC-dialect compiler for the HVM stack machine")]
struct Args {
    /// Input source file
    input: String,

    /// Print the assembly listing (default)
    #[clap(long)]
    asm: bool,

    /// Print the bytecode as hex
    #[clap(long)]
    hex: bool,

    /// Write raw bytecode to a file
    #[clap(long)]
    bin: bool,

    /// Output file for --bin (defaults to the input with a .hcb suffix)
    #[clap(short, long)]
    output: Option<String>,
}

fn run(args: &Args) -> Result<(), Error> {
    let src = fs::read_to_string(&args.input)?;

    let lexer = Lexer::new(&src, &args.input);
    let (program, errors) = Parser::new(lexer).parse();
    if !errors.is_empty() {
        for e in &errors {
            cprintln!("<red,bold>error</>: {}", e);
        }
        return Err(Error::Compile(errors.len()));
    }

    let (code, warnings) = CodeGen::new().generate(&program);
    for w in &warnings {
        cprintln!("<yellow,bold>warn</>: {}", w);
    }

    if args.hex {
        println!("{}", render_hex(&code));
    } else if args.bin {
        let outfile = match &args.output {
            Some(path) => path.clone(),
            None => match args.input.strip_suffix(".HC") {
                Some(stem) => format!("{}.hcb", stem),
                None => format!("{}.hcb", args.input),
            },
        };
        let bytes = isa::encode(&code);
        fs::write(&outfile, &bytes)?;
        println!("wrote {} bytes to {}", bytes.len(), outfile);
    } else {
        print!("{}", render_asm(&code));
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        cprintln!("<red,bold>error</>: {}", e);
        std::process::exit(1);
    }
}
