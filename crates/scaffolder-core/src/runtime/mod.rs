//! External commands and tool detection
//!
//! This module provides:
//! - `CommandSpec`, a program invocation run inside an explicit directory
//! - Tool availability checks for the generators and package manager

pub mod command;
pub mod tool;

pub use command::CommandSpec;
pub use tool::{check_tools, ToolConfig};
