//! Host-side `Hal` mock used by driver tests and the CLI's `simulate`
//! subcommand; records every register write for inspection.

use super::hal::{Hal, HalError};

#[derive(Debug, Default)]
pub struct MockHal {
    trace: Vec<(u8, Vec<u8>)>,
    fail_next: bool,
}

impl MockHal {
    pub fn new() -> Self {
        MockHal::default()
    }

    pub fn trace(&self) -> &[(u8, Vec<u8>)] {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Make the next `write_register` call fail, to exercise error paths.
    pub fn fail_next_write(&mut self) {
        self.fail_next = true;
    }
}

impl Hal for MockHal {
    fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), HalError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(HalError::Transaction("simulated NACK".into()));
        }
        self.trace.push((reg, data.to_vec()));
        Ok(())
    }
}
