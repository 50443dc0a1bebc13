// file: src/utils/prompt.rs
// version: 1.0.0
// guid: 6f2a8c14-d3e9-4b05-97a1-e8b0c5d2f731

//! Interactive confirmation for destructive operations

use crate::Result;
use std::io::{BufRead, Write};

/// Only a bare `y` or `Y` confirms
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

/// Print `question` and read one line of input; end of input counts as "no"
pub fn confirm<R: BufRead, W: Write>(question: &str, mut input: R, mut output: W) -> Result<bool> {
    write!(output, "{} [y/N]: ", question)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

/// Confirm on the process stdin/stdout
pub fn confirm_stdin(question: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    confirm(question, stdin.lock(), std::io::stdout())
}
