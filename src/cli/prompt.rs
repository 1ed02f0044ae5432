//! Blocking console prompts

use std::io::{self, BufRead, Write};

/// Print `prefix` and read one line, without its line ending
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prefix: &str,
) -> io::Result<String> {
    write!(output, "{}", prefix)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for an answer",
        ));
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Prompt until the answer parses as a non-negative integer
pub fn prompt_millis<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prefix: &str,
) -> io::Result<u64> {
    loop {
        let answer = prompt_line(input, output, prefix)?;
        match answer.trim().parse() {
            Ok(ms) => return Ok(ms),
            Err(_) => writeln!(output, "{:?} is not a whole number of milliseconds", answer)?,
        }
    }
}

/// Block until the user presses Enter
pub fn pause<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    write!(output, "Press 'Enter' to continue...")?;
    output.flush()?;
    let mut sink = String::new();
    input.read_line(&mut sink)?;
    Ok(())
}
