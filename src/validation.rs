//! Container validation.
//!
//! [`Container::validate`] inspects a container and returns a
//! [`ValidationReport`] describing its structure, the properties an
//! unpack/pack round trip will not carry over, and any broken invariants.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//!
//! use gifbundle::Container;
//!
//! let container = Container::decode(File::open("input.gif")?, "input.gif")?;
//! let report = container.validate();
//! if !report.is_valid() {
//!     for error in &report.errors {
//!         println!("Error: {error}");
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::container::{Container, Repeat};

/// Summary of container validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Properties that will be lost or changed by unpack followed by pack.
    pub warnings: Vec<String>,
    /// Broken invariants that will make encoding fail.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found.
    ///
    /// Warnings do not affect this result.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

impl Container {
    /// Run validation checks on the container.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        report.info.push(format!("Screen: {}x{}", self.width, self.height));
        report.info.push(format!("Frames: {}", self.frames.len()));
        report.info.push(match self.repeat {
            Repeat::Infinite => "Loop: infinite".to_string(),
            Repeat::Finite(count) => format!("Loop: {count} time(s)"),
        });

        if self.frames.is_empty() {
            report
                .warnings
                .push("Container has no frames; unpack writes no files".to_string());
        }

        let delayed = self.frames.iter().filter(|frame| frame.delay > 0).count();
        if delayed > 0 {
            report.warnings.push(format!(
                "{delayed} frame(s) have a non-zero delay; pack resets delays to 0"
            ));
        }

        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.covers(self.width, self.height) {
                report.warnings.push(format!(
                    "Frame {index} is {}x{} at {},{}; PNG output keeps only its own size",
                    frame.width, frame.height, frame.left, frame.top
                ));
            }
            if u32::from(frame.left) + u32::from(frame.width) > u32::from(self.width)
                || u32::from(frame.top) + u32::from(frame.height) > u32::from(self.height)
            {
                report
                    .errors
                    .push(format!("Frame {index} lies outside the logical screen"));
            }
            if let Err(reason) = frame.check() {
                report.errors.push(format!("Frame {index}: {reason}"));
            }
        }

        report
    }
}
