use std::io::{self, BufRead, Write};

/// Blocking yes/no confirmation.
pub trait Confirm {
    fn ask_yes_no(&mut self, question: &str) -> bool;
}

/// Terminal prompt that re-asks until it gets `y`/`yes` or `n`/`no`.
///
/// End of input counts as "no", so a closed stdin never blocks or mutates anything.
#[derive(Debug)]
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for StdinPrompt<R, W> {
    fn ask_yes_no(&mut self, question: &str) -> bool {
        loop {
            if write!(self.output, "{question} (y/n): ")
                .and_then(|()| self.output.flush())
                .is_err()
            {
                tracing::warn!("Failed to write prompt");
            }

            let mut answer = String::new();
            match self.input.read_line(&mut answer) {
                Ok(0) => {
                    tracing::debug!("Prompt input closed, treating as 'no'");
                    let _ = writeln!(self.output);
                    return false;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read answer: {}", e);
                    return false;
                }
            }

            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => {
                    let _ = writeln!(self.output, "Please answer 'y' or 'n'");
                }
            }
        }
    }
}
