//! Terminal output with a typing animation.
//!
//! Everything ntc prints goes through a [`Renderer`]. The terminal renderer
//! types message text out one character at a time, writing ANSI escape
//! sequences whole so a style change never shows up half-drawn. Tests use
//! [`BufferRenderer`] to capture output.
//!
//! Animation blocks the calling task: a handler returns only once its line
//! is fully drawn, so output never interleaves. Live messages that arrive
//! meanwhile wait in the update stream and are drawn right after. Ctrl-C
//! finishes the current line at once; see [`note_interrupt`].

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::theme::ansi;
use crate::utils::text::strip_ansi;

/// Frames drawn by [`Renderer::spin`].
pub const SPINNER_FRAMES: [&str; 3] = ["⠋", "⠙", "⠹"];

/// Pause between spinner frames.
pub const SPIN_FRAME_DELAY: Duration = Duration::from_millis(10);

/// Per-character delay for a message of `len` characters.
///
/// Short messages type slower per character than long ones.
pub fn typing_delay(len: usize) -> Duration {
    let millis = match len {
        0..=10 => 8,
        11..=30 => 6,
        31..=60 => 4,
        _ => 2,
    };
    Duration::from_millis(millis)
}

/// Splits `text` into the pieces the animation writes one at a time: single
/// characters, and complete `ESC ... m` sequences.
pub fn animation_units(text: &str) -> Vec<&str> {
    let mut units = Vec::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let len = if c == '\x1b' {
            rest.find('m').map_or(c.len_utf8(), |end| end + 1)
        } else {
            c.len_utf8()
        };
        let (unit, tail) = rest.split_at(len);
        units.push(unit);
        rest = tail;
    }
    units
}

/// Records a Ctrl-C in `flag`. Returns true when one was already pending,
/// which the binary treats as a request to quit.
pub fn note_interrupt(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::Relaxed)
}

/// Sink for everything ntc prints.
pub trait Renderer: Send {
    /// Prints `line` followed by a newline.
    fn print_line(&mut self, line: &str);

    /// Prints `text` without a newline and flushes.
    fn print_inline(&mut self, text: &str);

    /// Types `text` out with `delay` between visible characters. No newline
    /// is added.
    fn type_text(&mut self, text: &str, delay: Duration) {
        _ = delay;
        self.print_inline(text);
    }

    /// Shows a short spinner in `color`, then clears it.
    fn spin(&mut self, color: &str) {
        _ = color;
    }

    /// Returns true if the current animation should finish at once.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Renderer writing to stdout.
pub struct TerminalRenderer {
    stdout: Stdout,
    use_color: bool,
    animate: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl TerminalRenderer {
    /// Creates a renderer with colors and animation on.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
            animate: true,
            interrupted: None,
        }
    }

    /// Creates a renderer with the given color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            use_color,
            ..Self::new()
        }
    }

    /// Turns the typing animation and spinner on or off.
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Attaches the flag a Ctrl-C handler sets.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    fn write(&mut self, text: &str) {
        let result = if self.use_color {
            self.stdout.write_all(text.as_bytes())
        } else {
            self.stdout.write_all(strip_ansi(text).as_bytes())
        };
        // A closed stdout leaves nothing useful to report to.
        _ = result;
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn print_line(&mut self, line: &str) {
        self.write(line);
        self.write("\n");
        self.flush();
    }

    fn print_inline(&mut self, text: &str) {
        self.write(text);
        self.flush();
    }

    fn type_text(&mut self, text: &str, delay: Duration) {
        if !self.animate {
            self.print_inline(text);
            return;
        }
        let units = animation_units(text);
        for (idx, unit) in units.iter().enumerate() {
            if self.should_interrupt() {
                self.write(&units[idx..].concat());
                break;
            }
            self.write(unit);
            if !unit.starts_with('\x1b') {
                self.flush();
                std::thread::sleep(delay);
            }
        }
        self.flush();
    }

    fn spin(&mut self, color: &str) {
        if !self.animate {
            return;
        }
        for frame in SPINNER_FRAMES {
            if self.should_interrupt() {
                break;
            }
            self.write(&format!("\r{color}{frame}{}", ansi::RESET));
            self.flush();
            std::thread::sleep(SPIN_FRAME_DELAY);
        }
        self.write(&format!("\r{}", ansi::RESET));
        self.write("\r \r");
        self.flush();
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Renderer that collects output in memory, ANSI sequences removed.
#[derive(Debug, Clone, Default)]
pub struct BufferRenderer {
    buffer: Arc<Mutex<String>>,
}

impl BufferRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything printed so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets everything printed so far.
    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, text: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(&strip_ansi(text));
    }
}

impl Renderer for BufferRenderer {
    fn print_line(&mut self, line: &str) {
        self.push(line);
        self.push("\n");
    }

    fn print_inline(&mut self, text: &str) {
        self.push(text);
    }
}
