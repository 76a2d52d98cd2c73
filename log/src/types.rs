// Copyright (c) 2022, 37 Miners, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use hlog_deps::chrono::{DateTime, Local};
use hlog_err::Error;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::AtomicI32;
use std::sync::{Arc, RwLock};

/// A logging threshold. The standard 6 levels are available as the constants [`TRACE`],
/// [`DEBUG`], [`INFO`], [`WARN`], [`ERROR`] and [`FATAL`]. Internally the level is the
/// integer value used by log4j style engines, so levels are ordered numerically and
/// a logger configured with threshold `t` is enabled for level `l` when `t <= l`.
/// Arbitrary integers are mapped onto the named levels with [`LogLevel::to_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogLevel(pub(crate) i32);

/// Very fine grained logging information that should not generally be visible except for
/// debugging purposes
pub const TRACE: LogLevel = LogLevel(5_000);
/// Debugging information
pub const DEBUG: LogLevel = LogLevel(10_000);
/// Standard information that is usually displayed to the user under most circumstances
pub const INFO: LogLevel = LogLevel(20_000);
/// Warning of something that the user should be aware of, although it may not be an error
pub const WARN: LogLevel = LogLevel(30_000);
/// Error that the user must be aware of
pub const ERROR: LogLevel = LogLevel(40_000);
/// Fatal error that usually causes the application to be unusable
pub const FATAL: LogLevel = LogLevel(50_000);

/// The place in the source code where a record was produced. Built by the
/// [`crate::location`] macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
	/// The source file, as reported by `file!()`.
	pub file: &'static str,
	/// The line number, as reported by `line!()`.
	pub line: u32,
	/// The module path, as reported by `module_path!()`.
	pub module_path: &'static str,
}

/// A single log event as it is handed to the [`Appender`]s of a [`Registry`].
#[derive(Debug, Clone)]
pub struct Record {
	/// Name of the logger that produced this record. The root logger is the empty string.
	pub logger: String,
	/// The level of this record.
	pub level: LogLevel,
	/// Where the record was produced.
	pub location: Location,
	/// The formatted message.
	pub message: String,
	/// A snapshot of the producing thread's mapped diagnostic context.
	pub mdc: BTreeMap<String, String>,
	/// The light weight process id of the producing thread. See [`crate::lwp_id`].
	pub lwp: u32,
	/// The time at which the record was produced.
	pub timestamp: DateTime<Local>,
}

/// An output destination for records. Appenders are registered with a [`Registry`]
/// and receive every record emitted by any logger of that registry.
pub trait Appender: Send + Sync {
	/// Write the record to this appender.
	fn append(&self, record: &Record) -> Result<(), Error>;
	/// Flush any buffered output.
	fn flush(&self) -> Result<(), Error> {
		Ok(())
	}
}

/// This enum contains the names of the configuration options. It is used in the
/// [`Registry::get_config_option`] function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogConfigOptionName {
	/// View the Colors setting. See [`LogConfigOption::Colors`].
	Colors,
	/// View the Stdout logging setting. See [`LogConfigOption::Stdout`].
	Stdout,
	/// View the Timestamp setting. See [`LogConfigOption::Timestamp`].
	Timestamp,
	/// View the Level setting. See [`LogConfigOption::Level`].
	Level,
	/// View the LineNum setting. See [`LogConfigOption::LineNum`].
	LineNum,
	/// View the ShowMillis setting. See [`LogConfigOption::ShowMillis`].
	ShowMillis,
	/// View the LoggerName setting. See [`LogConfigOption::LoggerName`].
	LoggerName,
	/// View the Mdc setting. See [`LogConfigOption::Mdc`].
	Mdc,
	/// View the Lwp setting. See [`LogConfigOption::Lwp`].
	Lwp,
	/// View the FilePath setting. See [`LogConfigOption::FilePath`].
	FilePath,
	/// View the LineNumDataMaxLen setting. See [`LogConfigOption::LineNumDataMaxLen`].
	LineNumDataMaxLen,
	/// View the RootLevel setting. See [`LogConfigOption::RootLevel`].
	RootLevel,
	/// View the Levels setting. See [`LogConfigOption::Levels`].
	Levels,
}

/// A single configuration value. Each field of [`LogConfig`] holds the variant of the
/// same name; a configuration holding a variant in the wrong field is rejected when it
/// is applied.
#[derive(PartialEq, Debug, Clone)]
pub enum LogConfigOption {
	/// Whether or not to color the level of console output. The default value is false.
	Colors(bool),
	/// Whether or not to log to standard output. The default value is true.
	Stdout(bool),
	/// Whether or not to display the timestamp. The default value is true.
	Timestamp(bool),
	/// Whether or not to display the log level. The default value is true.
	Level(bool),
	/// Whether or not to display the file and line number. The default value is false.
	LineNum(bool),
	/// Whether or not to show milliseconds in the timestamp. The default value is true.
	ShowMillis(bool),
	/// Whether or not to display the logger name. The default value is true.
	LoggerName(bool),
	/// Whether or not to display the mapped diagnostic context. The default value is true.
	Mdc(bool),
	/// Whether or not to display the light weight process id. The default value is false.
	Lwp(bool),
	/// The optional file path that records are appended to. The default value is None.
	FilePath(Option<PathBuf>),
	/// The maximum length of the file and line number data that is logged. Since the path
	/// of the file may be long, it must be limited. The default value is 25 characters.
	LineNumDataMaxLen(usize),
	/// The threshold of the root logger. The default value is [`INFO`].
	RootLevel(LogLevel),
	/// Explicit thresholds for named loggers. The default value is empty.
	Levels(Vec<(String, LogLevel)>),
}

/// The log configuration struct. A configuration is applied with
/// [`Registry::configure_with`] or [`crate::configure_with`]. The default
/// configuration is the basic configuration used when nothing else is configured: a
/// single console appender and a root threshold of [`INFO`].
///
///```
/// use hlog::LogConfigOption::*;
/// use hlog::{LogConfig, DEBUG};
///
/// let config = LogConfig {
///     line_num: LineNum(true),
///     root_level: RootLevel(DEBUG),
///     levels: Levels(vec![("svc.db".to_string(), hlog::WARN)]),
///     ..Default::default()
/// };
/// assert_eq!(config.stdout, Stdout(true));
///```
#[derive(PartialEq, Debug, Clone)]
pub struct LogConfig {
	/// See [`LogConfigOption::Colors`]. The default value is Colors(false).
	pub colors: LogConfigOption,
	/// See [`LogConfigOption::Stdout`]. The default value is Stdout(true).
	pub stdout: LogConfigOption,
	/// See [`LogConfigOption::Timestamp`]. The default value is Timestamp(true).
	pub timestamp: LogConfigOption,
	/// See [`LogConfigOption::Level`]. The default value is Level(true).
	pub level: LogConfigOption,
	/// See [`LogConfigOption::LineNum`]. The default value is LineNum(false).
	pub line_num: LogConfigOption,
	/// See [`LogConfigOption::ShowMillis`]. The default value is ShowMillis(true).
	pub show_millis: LogConfigOption,
	/// See [`LogConfigOption::LoggerName`]. The default value is LoggerName(true).
	pub logger_name: LogConfigOption,
	/// See [`LogConfigOption::Mdc`]. The default value is Mdc(true).
	pub mdc: LogConfigOption,
	/// See [`LogConfigOption::Lwp`]. The default value is Lwp(false).
	pub lwp: LogConfigOption,
	/// See [`LogConfigOption::FilePath`]. The default value is FilePath(None).
	pub file_path: LogConfigOption,
	/// See [`LogConfigOption::LineNumDataMaxLen`]. The default value is
	/// LineNumDataMaxLen(25).
	pub line_num_data_max_len: LogConfigOption,
	/// See [`LogConfigOption::RootLevel`]. The default value is RootLevel(INFO).
	pub root_level: LogConfigOption,
	/// See [`LogConfigOption::Levels`]. The default value is Levels(vec![]).
	pub levels: LogConfigOption,
}

/// Formats records into single lines. Built from a [`LogConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
	pub(crate) colors: bool,
	pub(crate) timestamp: bool,
	pub(crate) level: bool,
	pub(crate) line_num: bool,
	pub(crate) show_millis: bool,
	pub(crate) logger_name: bool,
	pub(crate) mdc: bool,
	pub(crate) lwp: bool,
	pub(crate) line_num_data_max_len: usize,
}

pub(crate) struct LoggerNode {
	pub(crate) name: String,
	pub(crate) level: AtomicI32,
	pub(crate) parent: Option<Arc<LoggerNode>>,
}

/// The logger hierarchy. A registry owns every logger node, the appenders records are
/// written to and the configuration that built them. Nodes are created on first use
/// together with all of their missing ancestors, so the parent of `a.b.c` is always
/// `a.b`. Registries are independent of each other; the process wide registry used by
/// the logging macros is returned by [`crate::registry`].
pub struct Registry {
	pub(crate) root: Arc<LoggerNode>,
	pub(crate) loggers: RwLock<HashMap<String, Arc<LoggerNode>>>,
	pub(crate) appenders: RwLock<Vec<Arc<dyn Appender>>>,
	pub(crate) config: RwLock<LogConfig>,
}

/// A handle to a logger of a [`Registry`]. Handles are cheap to clone and two handles
/// for the same name of the same registry compare equal.
#[derive(Clone)]
pub struct Logger {
	pub(crate) node: Arc<LoggerNode>,
	pub(crate) registry: Arc<Registry>,
}

/// The logger argument accepted by [`crate::get_logger`] and the logging macros: either
/// the name of a logger or an existing handle. An empty name stands for the current
/// default logger.
#[derive(Debug, Clone, Copy)]
pub enum LoggerArg<'a> {
	/// Look the logger up by its dotted name.
	Name(&'a str),
	/// Use this logger.
	Handle(&'a Logger),
}

/// The default-logger state: the logger used by code that does not name one. The
/// default logger is changed only by pushing and popping context names, so its name is
/// always the dot joined list of the names pushed and not yet popped.
///
/// A `LogContext` is a plain value mutated through `&mut self`. The process wide default
/// logger used by the logging macros is changed through [`crate::push_context`] and
/// [`crate::pop_context`] and read without locking; those calls are individually
/// atomic, but push/pop sequences issued concurrently from several threads interleave
/// and corrupt each other's nesting. Configure contexts from a single thread.
pub struct LogContext {
	pub(crate) default_logger: Logger,
}

/// Scope guard returned by [`LogContext::scoped`]. The pushed context is popped when the
/// guard is dropped. The guard dereferences to the context for reading and nests with
/// [`ContextScope::scoped`]; the context can't be pushed or popped through it, so the
/// guard always pops what it pushed.
///
///```compile_fail
/// use hlog::*;
///
/// let mut ctx = LogContext::new(&Registry::new());
/// let mut scope = ctx.scoped("svc").unwrap();
/// scope.pop_context();
///```
pub struct ContextScope<'a> {
	pub(crate) context: &'a mut LogContext,
}

/// Scope guard for the process wide default logger. Construction pushes the name with
/// [`crate::push_context`] and fails the same way; dropping the guard pops it again,
/// including when the enclosing scope is left early through `?` or a panic.
///
///```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn process() -> Result<(), Error> {
///     let _ctx = LogContextGuard::new("process")?;
///     info!("running")?; // logged by the 'process' logger
///     Ok(())
/// }
///```
pub struct LogContextGuard {
	pub(crate) _private: (),
}

#[cfg(test)]
mod test {
	use crate::types::{LogConfig, LogConfigOption, DEBUG, ERROR, FATAL, INFO, TRACE, WARN};
	use hlog_err::Error;

	#[test]
	fn test_log_config() -> Result<(), Error> {
		let d = LogConfig::default();
		assert_eq!(d.colors, LogConfigOption::Colors(false));
		assert_eq!(d.stdout, LogConfigOption::Stdout(true));
		assert_eq!(d.root_level, LogConfigOption::RootLevel(INFO));
		assert_eq!(d.levels, LogConfigOption::Levels(vec![]));
		Ok(())
	}

	#[test]
	fn test_level_ordering() -> Result<(), Error> {
		assert!(TRACE < DEBUG);
		assert!(DEBUG < INFO);
		assert!(INFO < WARN);
		assert!(WARN < ERROR);
		assert!(ERROR < FATAL);
		Ok(())
	}

	#[test]
	fn test_display_levels() -> Result<(), Error> {
		assert_eq!(format!("{}", TRACE), "TRACE".to_string());
		assert_eq!(format!("{}", DEBUG), "DEBUG".to_string());
		assert_eq!(format!("{}", INFO), "INFO".to_string());
		assert_eq!(format!("{}", WARN), "WARN".to_string());
		assert_eq!(format!("{}", ERROR), "ERROR".to_string());
		assert_eq!(format!("{}", FATAL), "FATAL".to_string());
		Ok(())
	}
}
