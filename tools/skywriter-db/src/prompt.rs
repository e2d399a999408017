use std::io::{self, BufRead, Write};

use skywriter_core::Profile;

/// Line-oriented operator prompt for manual profile entry.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks for one value; blank answers and end of input yield `None`.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    /// Asks a yes/no question; only `y`/`yes` count as yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(&format!("{question} [y/N]"))?
            .is_some_and(|a| a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")))
    }

    /// Collects a profile for an unknown dump.
    ///
    /// Returns `None` when the operator leaves the character name blank.
    pub fn profile_entry(
        &mut self,
        character_id: &str,
        game_id: Option<&str>,
        filename: &str,
    ) -> io::Result<Option<Profile>> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Manual Entry for {filename} ===")?;
        writeln!(self.output, "Character ID: {character_id}")?;
        writeln!(self.output, "Game ID: {}", game_id.unwrap_or("-"))?;
        writeln!(self.output, "Enter profile data (press Enter to skip):")?;

        let Some(character_name) = self.ask("Character Name")? else {
            return Ok(None);
        };

        Ok(Some(Profile {
            character_name: Some(character_name),
            game_series: self.ask("Game Series")?,
            biography: self.ask("Biography/Description")?,
            release_date: self.ask("Release Date")?,
            amiibo_type: self.ask("Amiibo Type (Figure/Card/etc)")?,
        }))
    }
}
