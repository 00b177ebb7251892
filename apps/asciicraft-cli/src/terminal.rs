use std::io::{self, Write};

use asciicraft_common::BlockId;
use asciicraft_render::Picture;

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Encode a picture as ANSI text: cursor homed, one line per row, runs of
/// the highlight identity wrapped in green.
pub fn encode_frame(picture: &Picture, highlight: BlockId) -> String {
    let mut out = String::with_capacity(CURSOR_HOME.len() + (picture.width() + 1) * picture.height());
    out.push_str(CURSOR_HOME);
    for row in picture.rows() {
        let mut colored = false;
        for id in row {
            let lit = *id == highlight;
            if lit != colored {
                out.push_str(if lit { GREEN } else { RESET });
                colored = lit;
            }
            out.push(id.as_char());
        }
        if colored {
            out.push_str(RESET);
        }
        out.push('\n');
    }
    out
}

/// Scoped terminal handle.
///
/// Acquiring it clears the screen and hides the cursor; dropping it resets
/// colors and shows the cursor again, on every exit path.
pub struct TerminalSession<W: Write> {
    out: W,
    highlight: BlockId,
}

impl<W: Write> TerminalSession<W> {
    pub fn acquire(mut out: W, highlight: BlockId) -> io::Result<Self> {
        write!(out, "{CLEAR_SCREEN}{HIDE_CURSOR}")?;
        out.flush()?;
        tracing::debug!("terminal session acquired");
        Ok(Self { out, highlight })
    }

    /// Draw one frame over the previous one.
    pub fn draw(&mut self, picture: &Picture) -> io::Result<()> {
        self.out.write_all(encode_frame(picture, self.highlight).as_bytes())?;
        self.out.flush()
    }

    /// Write a status line below the frame.
    pub fn status(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{RESET}{line}\x1b[K")?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        let restored = write!(self.out, "{RESET}{SHOW_CURSOR}").and_then(|_| self.out.flush());
        if let Err(err) = restored {
            tracing::warn!(%err, "failed to restore terminal");
        } else {
            tracing::debug!("terminal restored");
        }
    }
}
