//! User-facing progress output
//!
//! `PlainReporter` prints colored markers line by line and works in pipes and
//! logs. With the `tui` feature, `ClackReporter` renders the same steps with
//! cliclack when attached to a terminal.

use anyhow::Result;
use colored::Colorize;

/// Sink for pipeline progress
pub trait Reporter {
    /// Announce the start of a run
    fn intro(&self, title: &str) -> Result<()>;

    /// Announce a step before its work starts
    fn step(&self, message: &str) -> Result<()>;

    /// Mark the current step complete
    fn done(&self) -> Result<()>;

    /// Report a terminal, user-facing failure
    fn error(&self, message: &str) -> Result<()>;

    /// Print the closing headline and follow-up instructions
    fn finish(&self, headline: &str, next_steps: &[String]) -> Result<()>;
}

/// Colored line-oriented output on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainReporter;

impl Reporter for PlainReporter {
    fn intro(&self, title: &str) -> Result<()> {
        println!();
        println!("{}", title.cyan().bold());
        Ok(())
    }

    fn step(&self, message: &str) -> Result<()> {
        println!("{}", format!("** {}", message).yellow());
        Ok(())
    }

    fn done(&self) -> Result<()> {
        println!("{}", "Done!".green());
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        println!("{}", message.red());
        Ok(())
    }

    fn finish(&self, headline: &str, next_steps: &[String]) -> Result<()> {
        println!("{}", headline.green().bold());
        for step in next_steps {
            println!("{}", step);
        }
        Ok(())
    }
}

/// Charm-style output using cliclack
#[cfg(feature = "tui")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackReporter;

#[cfg(feature = "tui")]
impl Reporter for ClackReporter {
    fn intro(&self, title: &str) -> Result<()> {
        cliclack::intro(title)?;
        Ok(())
    }

    fn step(&self, message: &str) -> Result<()> {
        cliclack::log::step(message)?;
        Ok(())
    }

    fn done(&self) -> Result<()> {
        cliclack::log::success("Done!")?;
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        cliclack::log::error(message)?;
        Ok(())
    }

    fn finish(&self, headline: &str, next_steps: &[String]) -> Result<()> {
        cliclack::log::success(headline)?;

        println!();
        println!("  Next steps");
        println!();
        for step in next_steps {
            for line in step.lines() {
                println!("  {}", line);
            }
        }

        cliclack::outro("Happy coding!")?;
        Ok(())
    }
}
