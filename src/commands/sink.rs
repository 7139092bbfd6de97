//! Progress sinks for the CLI
//!
//! The engine emits structured events; these sinks render them. Human mode
//! shows a progress bar when not verbose and suspends it around any line it
//! prints so the bar does not get mangled. JSON mode streams events to
//! stderr one object per line.

use indicatif::{ProgressBar, ProgressStyle};

use unidup_core::progress::{Level, ProgressEvent, ProgressSink};

/// Human-readable sink with an optional progress bar
pub struct ConsoleSink {
    bar: Option<ProgressBar>,
    verbose: bool,
    quiet: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            bar: None,
            verbose,
            quiet,
        }
    }

    fn print(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn event(&mut self, event: ProgressEvent) {
        match event.level {
            Level::Info => {
                if !self.quiet {
                    self.print(&event.message);
                }
            }
            Level::Warn => self.print(&format!("WARNING: {}", event.message)),
        }
    }

    fn begin(&mut self, total: u64) {
        // Verbose runs log a line per member instead of a bar
        if self.verbose || self.quiet {
            return;
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40} {pos}/{len} duplicates processed")
        {
            bar.set_style(style);
        }
        self.bar = Some(bar);
    }

    fn advance(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// JSON sink: one event object per line on stderr
#[derive(Debug, Default)]
pub struct JsonSink;

impl ProgressSink for JsonSink {
    fn event(&mut self, event: ProgressEvent) {
        if let Ok(line) = serde_json::to_string(&event) {
            eprintln!("{}", line);
        }
    }
}
