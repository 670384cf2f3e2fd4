use std::io::{BufRead, Write};

use enumkit_types::host::NamePrompt;

/// Asks for names on a terminal. End of input counts as cancelling.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> TerminalPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R, W> NamePrompt for TerminalPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    fn ask(&mut self, title: &str, message: &str) -> Option<String> {
        write!(self.output, "{title}\n{message}").ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
        }
    }
}
