//! The surface run loop.

use std::io::Write;
use std::time::Duration;

use kestrel_ui::BridgeClosed;

use super::init::ChatApp;
use super::types::POLL_INTERVAL;

impl ChatApp {
    /// Run posted work for up to `timeout`. Returns how many tasks ran.
    pub fn tick(&mut self, timeout: Duration) -> usize {
        match self.queue.pump(&mut self.shell, timeout) {
            Ok(ran) => ran,
            Err(BridgeClosed) => {
                self.shell.request_exit();
                0
            }
        }
    }

    /// Transcript lines produced since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        self.shell.take_output()
    }

    /// Drive the surface until the user quits, writing the transcript to
    /// `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.flush(out)?;
        while !self.shell.should_exit() {
            self.tick(POLL_INTERVAL);
            self.flush(out)?;
        }
        Ok(())
    }

    pub fn flush<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let lines = self.shell.take_output();
        if lines.is_empty() {
            return Ok(());
        }
        for line in lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}
