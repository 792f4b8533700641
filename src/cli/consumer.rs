//! Positional argument bookkeeping
//!
//! Plugin commands take their positional arguments as raw tokens. The
//! [`ArgConsumer`] hands them out by index, reports missing required
//! arguments, and reports anything left over once the command has read
//! what it needs.

use std::collections::BTreeSet;

/// Consumes positional arguments and reports usage problems through a
/// diagnostic callback
///
/// The callback receives the message and the command name. It will usually
/// print a help hint and exit, but the consumer does not rely on that.
pub struct ArgConsumer<F>
where
    F: FnMut(&str, &str),
{
    positional_args: Vec<String>,
    command: String,
    consumed: BTreeSet<usize>,
    diagnose: F,
}

impl<F> ArgConsumer<F>
where
    F: FnMut(&str, &str),
{
    /// Create a consumer over `positional_args`, where index 0 is the command
    /// name and is always considered consumed
    pub fn new(positional_args: Vec<String>, diagnose: F) -> Self {
        let command = positional_args.first().cloned().unwrap_or_default();
        let mut consumed = BTreeSet::new();
        consumed.insert(0);
        Self {
            positional_args,
            command,
            consumed,
            diagnose,
        }
    }

    /// The command name the arguments belong to
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Read a required argument
    ///
    /// Returns an empty string after raising a diagnostic if the argument is
    /// missing or empty.
    pub fn consume(&mut self, index: usize, description: &str) -> String {
        match self.lookup(index) {
            Some(arg) => {
                self.consumed.insert(index);
                arg
            }
            None => {
                let message = format!("Incorrect usage: {} not specified.", description);
                (self.diagnose)(&message, &self.command);
                String::new()
            }
        }
    }

    /// Read an optional argument, returning an empty string if it is absent
    pub fn consume_optional(&mut self, index: usize, _description: &str) -> String {
        match self.lookup(index) {
            Some(arg) => {
                self.consumed.insert(index);
                arg
            }
            None => String::new(),
        }
    }

    /// Raise a diagnostic naming any arguments that were never consumed
    pub fn check_all_consumed(&mut self) {
        if self.consumed.len() >= self.positional_args.len() {
            return;
        }

        let extra: Vec<&str> = self
            .positional_args
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed.contains(i))
            .map(|(_, arg)| arg.as_str())
            .collect();

        let noun = if extra.len() > 1 { "arguments" } else { "argument" };
        let message = format!("Incorrect usage: invalid {} '{}'.", noun, extra.join(" "));
        (self.diagnose)(&message, &self.command);
    }

    fn lookup(&self, index: usize) -> Option<String> {
        self.positional_args
            .get(index)
            .filter(|arg| !arg.is_empty())
            .cloned()
    }
}
