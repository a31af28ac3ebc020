//! User-facing messages.
//! Primary command output (env values, HTTP bodies) goes to stdout unprefixed;
//! status lines get a colored prefix when the stream is a TTY.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Ok,
    Info,
    Warn,
    Error,
    Hint,
}

impl Tone {
    fn label(self) -> &'static str {
        match self {
            Tone::Ok => "ok:",
            Tone::Info => "info:",
            Tone::Warn => "warn:",
            Tone::Error => "error:",
            Tone::Hint => "hint:",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Tone::Warn | Tone::Error | Tone::Hint)
    }
}

fn emit(tone: Tone, msg: &str) {
    let stream = if tone.to_stderr() {
        atty::Stream::Stderr
    } else {
        atty::Stream::Stdout
    };
    let label = tone.label();
    let line = if atty::is(stream) {
        let painted = match tone {
            Tone::Ok => label.green().bold().to_string(),
            Tone::Info => label.cyan().bold().to_string(),
            Tone::Warn => label.yellow().bold().to_string(),
            Tone::Error => label.red().bold().to_string(),
            Tone::Hint => label.dimmed().to_string(),
        };
        format!("{painted} {msg}")
    } else {
        format!("{label} {msg}")
    };
    if tone.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn print_success(msg: &str) {
    emit(Tone::Ok, msg);
}

pub fn print_info(msg: &str) {
    emit(Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Tone::Warn, msg);
}

/// Print an error and, when available, a follow-up hint line.
pub fn print_error(msg: &str, hint: Option<&str>) {
    emit(Tone::Error, msg);
    if let Some(h) = hint {
        emit(Tone::Hint, h);
    }
}

/// Print a plain line (no prefix) for output users may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
