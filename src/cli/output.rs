//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Diagnostics go to stderr; report lines go to the given writer.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Success status (green checkmark)
pub fn success(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", "✓".green(), msg)
}

/// Failure status (red X)
pub fn failure(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", "✗".red(), msg)
}

/// Skipped item (yellow label)
pub fn skip(w: &mut impl Write, label: &str, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", label.yellow(), msg)
}

/// Completed action (green label)
pub fn action(w: &mut impl Write, label: &str, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}: {}", label.green(), msg)
}

/// Section banner (cyan bold, framed by rules)
pub fn banner(w: &mut impl Write, title: &str) -> io::Result<()> {
    let rule = "=".repeat(title.chars().count().max(40));
    writeln!(w, "{}", rule.cyan())?;
    writeln!(w, "{}", title.cyan().bold())?;
    writeln!(w, "{}", rule.cyan())
}

/// Plain output (no color, for command lines and data)
pub fn info(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}", msg)
}
