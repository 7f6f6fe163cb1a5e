//! Output sinks for run progress and the final report.
//!
//! The harness only produces text. Each sink decides how to present it:
//! the terminal sink colors verdict symbols and summary lines, the buffer and
//! file sinks keep plain text.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Presentation hint attached to a chunk of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Pass,
    Fail,
    Ignore,
    Skip,
    /// Summary line highlighted when the run is green.
    Success,
    /// Summary line highlighted when the run has failures.
    Failure,
}

impl Style {
    fn color_spec(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Style::Pass => spec.set_fg(Some(Color::Green)),
            Style::Fail => spec.set_fg(Some(Color::Red)),
            Style::Ignore | Style::Skip => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            Style::Success => spec
                .set_fg(Some(Color::White))
                .set_bg(Some(Color::Green))
                .set_bold(true),
            Style::Failure => spec
                .set_fg(Some(Color::Yellow))
                .set_bg(Some(Color::Red))
                .set_bold(true),
        };
        spec
    }
}

/// Receives the text the harness produces.
pub trait OutputSink {
    fn write_str(&mut self, text: &str);

    fn write_styled(&mut self, text: &str, _style: Style) {
        self.write_str(text);
    }
}

/// BufferSink: collects output into a String for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub buffer: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for BufferSink {
    fn write_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// TerminalSink: writes to stdout, coloring styled chunks when enabled.
pub struct TerminalSink {
    stream: StandardStream,
}

impl TerminalSink {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stream: StandardStream::stdout(choice),
        }
    }

    /// Colors only when stdout is a terminal.
    pub fn auto() -> Self {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(choice)
    }
}

impl OutputSink for TerminalSink {
    fn write_str(&mut self, text: &str) {
        let _ = self.stream.write_all(text.as_bytes());
        let _ = self.stream.flush();
    }

    fn write_styled(&mut self, text: &str, style: Style) {
        let _ = self.stream.set_color(&style.color_spec());
        let _ = self.stream.write_all(text.as_bytes());
        let _ = self.stream.reset();
        let _ = self.stream.flush();
    }
}

/// FileSink: appends plain text to a log file.
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::create(path)?,
        })
    }
}

impl OutputSink for FileSink {
    fn write_str(&mut self, text: &str) {
        let _ = self.file.write_all(text.as_bytes());
    }
}

/// MultiSink: fans every chunk out to all attached sinks.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn OutputSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_output(&mut self, sink: Box<dyn OutputSink>) {
        self.sinks.push(sink);
    }
}

impl OutputSink for MultiSink {
    fn write_str(&mut self, text: &str) {
        for sink in &mut self.sinks {
            sink.write_str(text);
        }
    }

    fn write_styled(&mut self, text: &str, style: Style) {
        for sink in &mut self.sinks {
            sink.write_styled(text, style);
        }
    }
}
