use std::io::{self, Write};

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Writes generated HTML as is; it carries its own trailing newline
pub fn print_html(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{s}")?;
    out.flush()
}
