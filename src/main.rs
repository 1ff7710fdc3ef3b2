use std::io::{self, Write};

use treecalc::{compute, make_operators, Operator};

/// Prints all registered symbols sorted by ascending precedence; symbols
/// without a rank come first.
fn print_supported_operators(stdout: &mut impl Write) -> io::Result<()> {
    let mut ops = make_operators::<f64>();
    ops.sort_by_key(|op: &Operator<f64>| op.prec);
    write!(stdout, "supported operators:")?;
    for op in &ops {
        write!(stdout, " {}", op.repr)?;
    }
    writeln!(stdout)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    print_supported_operators(&mut stdout)?;
    loop {
        stdout.write_all("> ".as_bytes())?;
        stdout.flush()?;
        if stdin.read_line(&mut buffer)? == 0 {
            // end of input
            break;
        }
        let line = buffer.trim();
        if !line.is_empty() {
            match compute::<f64>(line) {
                Ok(x) => println!("{x}"),
                Err(e) => println!("An error occurred: {e}"),
            }
        }
        buffer.clear();
    }
    Ok(())
}
