//! Interactive range-conflict prompt.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the prompt asks for a replacement `dmin`/`dmax` when the requested one
//!   lies outside the data
//!
//! The answer must lie strictly inside the observed range; `q` cancels, and a
//! closed stdin turns the conflict into the usual range error.

use std::io::{self, BufRead, Write};

use crate::distribution::{RangeConflict, RangeConflictResolver};
use crate::error::{Bound, PoreError};

/// Asks on `output` and reads answers from `input` (stdin/stdout by default).
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl PromptResolver<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, conflict: &RangeConflict) -> io::Result<Option<String>> {
        let observed = conflict.observed;
        let side = match conflict.bound {
            Bound::Upper => "largest",
            Bound::Lower => "smallest",
        };
        write!(
            self.output,
            "{}={} is outside the data ({side} observed diameter: {}). Enter a value in ({}, {}) (q to quit): ",
            conflict.bound, conflict.requested, observed_edge(conflict), observed.min, observed.max
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> RangeConflictResolver for PromptResolver<R, W> {
    fn resolve(&mut self, conflict: &RangeConflict) -> Result<f64, PoreError> {
        loop {
            let answer = match self.ask(conflict) {
                Ok(Some(answer)) => answer,
                // No terminal to ask: same outcome as the non-interactive policy.
                Ok(None) | Err(_) => return Err(conflict.to_error()),
            };

            if answer.eq_ignore_ascii_case("q") {
                return Err(PoreError::Canceled);
            }

            match answer.parse::<f64>() {
                Ok(v) if v > conflict.observed.min && v < conflict.observed.max => {
                    tracing::info!("{} set to {v} from prompt", conflict.bound);
                    return Ok(v);
                }
                Ok(v) => {
                    let _ = writeln!(self.output, "{v} is not inside the observed range.");
                }
                Err(_) => {
                    let _ = writeln!(self.output, "Not a number: '{answer}'.");
                }
            }
        }
    }
}

fn observed_edge(conflict: &RangeConflict) -> f64 {
    match conflict.bound {
        Bound::Upper => conflict.observed.max,
        Bound::Lower => conflict.observed.min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservedRange;

    fn conflict() -> RangeConflict {
        RangeConflict {
            bound: Bound::Upper,
            requested: 200.0,
            observed: ObservedRange {
                min: 0.01,
                max: 100.0,
                count: 30,
            },
        }
    }

    fn resolve(answers: &str) -> (Result<f64, PoreError>, String) {
        let mut out = Vec::new();
        let result = PromptResolver::new(answers.as_bytes(), &mut out).resolve(&conflict());
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn re_asks_until_the_value_is_inside_the_data() {
        let (result, transcript) = resolve("abc\n150\n100\n80\n");
        assert_eq!(result, Ok(80.0));
        assert_eq!(transcript.matches("Enter a value").count(), 4);
        assert!(transcript.contains("Not a number: 'abc'."));
        assert!(transcript.contains("150 is not inside"));
        assert!(transcript.starts_with("dmax=200 is outside the data (largest observed diameter: 100)"));
    }

    #[test]
    fn q_cancels() {
        assert_eq!(resolve("q\n").0, Err(PoreError::Canceled));
    }

    #[test]
    fn closed_input_is_a_range_error() {
        assert_eq!(resolve("").0, Err(conflict().to_error()));
    }
}
