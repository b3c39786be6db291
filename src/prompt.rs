//! Prompted input collection.

use crate::payload::RegistrationInput;
use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{BufRead, Write};

pub const NAME_PROMPT: &str = "Enter Name: ";
pub const EMAIL_PROMPT: &str = "Enter Email: ";
pub const PASSWORD_PROMPT: &str = "Enter Password: ";
pub const ROLE_PROMPT: &str = "Select Role (1: Student, 2: Teacher, 3: Admin): ";

/// Source of prompted input lines, so the terminal can be swapped out
pub trait LineSource {
    /// Show `prompt` and read one line without its terminator.
    /// Returns `None` at end of input; an interrupt is an error.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive line editor on the controlling terminal
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => bail!("interrupted"),
            Err(e) => Err(e.into()),
        }
    }
}

/// Plain buffered reader, prompts written to `writer`
pub struct Plain<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Plain<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> LineSource for Plain<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Ask for name, email, password and role choice in that order.
/// Once input runs out, the remaining fields are left empty.
pub fn collect_input(source: &mut dyn LineSource) -> Result<RegistrationInput> {
    let mut exhausted = false;
    let mut ask = |prompt: &str| -> Result<String> {
        if exhausted {
            return Ok(String::new());
        }
        match source.read_line(prompt)? {
            Some(line) => Ok(line),
            None => {
                exhausted = true;
                Ok(String::new())
            }
        }
    };

    let name = ask(NAME_PROMPT)?;
    let email = ask(EMAIL_PROMPT)?;
    let password = ask(PASSWORD_PROMPT)?;
    let role_choice = ask(ROLE_PROMPT)?;

    Ok(RegistrationInput {
        name,
        email,
        password,
        role_choice,
    })
}
