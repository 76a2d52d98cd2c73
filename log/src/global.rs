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

use crate::context::check_context_name;
use crate::types::{LogConfig, LogContextGuard, LogLevel, Logger, LoggerArg, Registry};
use hlog_deps::arc_swap::ArcSwap;
use hlog_deps::lazy_static::lazy_static;
use hlog_err::Error;
use std::path::Path;
use std::sync::Arc;

lazy_static! {
	static ref REGISTRY: Arc<Registry> = {
		let registry = Registry::new();
		// falls back to the basic configuration by itself, an error here means poison
		let _ = registry.configure_from_env();
		registry
	};
	// read on every record, so readers never take a lock
	static ref DEFAULT_LOGGER: ArcSwap<Logger> = ArcSwap::from_pointee(REGISTRY.root_logger());
}

impl<'a> From<&'a str> for LoggerArg<'a> {
	fn from(name: &'a str) -> Self {
		LoggerArg::Name(name)
	}
}

impl<'a> From<&'a String> for LoggerArg<'a> {
	fn from(name: &'a String) -> Self {
		LoggerArg::Name(name.as_str())
	}
}

impl<'a> From<&'a Logger> for LoggerArg<'a> {
	fn from(logger: &'a Logger) -> Self {
		LoggerArg::Handle(logger)
	}
}

/// The process wide registry used by the logging macros. On first use it is configured
/// from the file named by the `HLOG_CONFIG` environment variable, or with the basic
/// configuration (console output, root threshold INFO) if the variable is unset or the
/// file can't be used.
pub fn registry() -> &'static Arc<Registry> {
	&REGISTRY
}

/// The root logger of the process wide registry.
pub fn root_logger() -> Logger {
	REGISTRY.root_logger()
}

/// The current default logger: the logger named by the context names pushed with
/// [`push_context`] and not popped yet, or the root logger.
pub fn default_logger() -> Logger {
	(**DEFAULT_LOGGER.load()).clone()
}

/// The name of the current default logger; the empty string for the root logger.
pub fn default_logger_name() -> String {
	default_logger().name().to_string()
}

/// Resolve a logger argument. A handle is returned as is, an empty name resolves to the
/// current default logger and any other name to the logger of that name in the process
/// wide registry.
///
///```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn main() -> Result<(), Error> {
///     let db = get_logger("svc.db")?;
///     assert_eq!(db.name(), "svc.db");
///     assert_eq!(get_logger(&db)?, db);
///     assert_eq!(get_logger("")?, default_logger());
///     Ok(())
/// }
///```
pub fn get_logger<'a, L>(logger: L) -> Result<Logger, Error>
where
	L: Into<LoggerArg<'a>>,
{
	match logger.into() {
		LoggerArg::Handle(logger) => Ok(logger.clone()),
		LoggerArg::Name("") => Ok(default_logger()),
		LoggerArg::Name(name) => REGISTRY.get_logger(name),
	}
}

/// Push a context name onto the process wide default logger. See
/// [`crate::LogContext::push_context`]. Each push and pop is applied atomically, but
/// push/pop sequences from several threads interleave; see [`crate::LogContext`].
///
///```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn main() -> Result<(), Error> {
///     push_context("svc")?;
///     info!("logged by 'svc'")?;
///     pop_context()?;
///     Ok(())
/// }
///```
pub fn push_context(name: &str) -> Result<(), Error> {
	check_context_name(name)?;
	let mut res = Ok(());
	DEFAULT_LOGGER.rcu(|current| match current.child(name) {
		Ok(logger) => {
			res = Ok(());
			Arc::new(logger)
		}
		Err(e) => {
			res = Err(e);
			current.clone()
		}
	});
	res
}

/// Pop the last context name from the process wide default logger. Popping at the root
/// logger does nothing.
pub fn pop_context() -> Result<(), Error> {
	DEFAULT_LOGGER.rcu(|current| match current.parent() {
		Some(parent) => Arc::new(parent),
		None => current.clone(),
	});
	Ok(())
}

fn reset_context() -> Result<(), Error> {
	DEFAULT_LOGGER.store(Arc::new(REGISTRY.root_logger()));
	Ok(())
}

/// Set the threshold of a logger.
pub fn set_level<'a, L>(logger: L, level: LogLevel) -> Result<(), Error>
where
	L: Into<LoggerArg<'a>>,
{
	get_logger(logger)?.set_level(level);
	Ok(())
}

/// Return the threshold set on the logger itself, or `None` if it inherits its threshold.
/// See [`get_effective_level`] for the threshold in force.
///
///```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn main() -> Result<(), Error> {
///     set_level("doc.level", WARN)?;
///     assert_eq!(get_level("doc.level")?, Some(WARN));
///     assert_eq!(get_level("doc.level.child")?, None);
///     assert_eq!(get_effective_level("doc.level.child")?, WARN);
///     Ok(())
/// }
///```
pub fn get_level<'a, L>(logger: L) -> Result<Option<LogLevel>, Error>
where
	L: Into<LoggerArg<'a>>,
{
	Ok(get_logger(logger)?.get_level())
}

/// Return the threshold in force for a logger: its own or the nearest ancestor's.
pub fn get_effective_level<'a, L>(logger: L) -> Result<LogLevel, Error>
where
	L: Into<LoggerArg<'a>>,
{
	Ok(get_logger(logger)?.effective_level())
}

/// Return true if a logger is enabled for `level`.
pub fn is_enabled_for<'a, L>(logger: L, level: LogLevel) -> Result<bool, Error>
where
	L: Into<LoggerArg<'a>>,
{
	Ok(get_logger(logger)?.is_enabled_for(level))
}

/// Reconfigure the process wide registry from `HLOG_CONFIG` or with the basic
/// configuration. Like every configuration call this resets all levels, appenders and
/// the default logger.
pub fn configure() -> Result<(), Error> {
	REGISTRY.configure_from_env()?;
	reset_context()
}

/// Configure the process wide registry from a properties file, falling back to the basic
/// configuration. See [`Registry::configure_file`].
pub fn configure_file<P: AsRef<Path>>(path: P) -> Result<(), Error> {
	REGISTRY.configure_file(path.as_ref())?;
	reset_context()
}

/// Configure the process wide registry from properties text. See
/// [`Registry::configure_prop`]. On error nothing changes, the default logger included.
pub fn configure_prop(text: &str) -> Result<(), Error> {
	REGISTRY.configure_prop(text)?;
	reset_context()
}

/// Configure the process wide registry from a [`LogConfig`].
pub fn configure_with(config: LogConfig) -> Result<(), Error> {
	REGISTRY.configure_with(config)?;
	reset_context()
}

impl LogContextGuard {
	/// Push `name` onto the process wide default logger; the guard pops it when dropped.
	/// Invalid names are rejected like [`push_context`] rejects them.
	pub fn new(name: &str) -> Result<Self, Error> {
		push_context(name)?;
		Ok(Self { _private: () })
	}
}

impl Drop for LogContextGuard {
	fn drop(&mut self) {
		let _ = pop_context();
	}
}

#[cfg(test)]
mod test {
	use crate::global::{
		configure_prop, configure_with, default_logger, default_logger_name,
		get_effective_level, get_level, get_logger, is_enabled_for, pop_context, push_context,
		registry, root_logger, set_level,
	};
	use crate::test_util::{serial, CaptureAppender};
	use crate::types::{LogConfig, LogConfigOption, LogContextGuard, DEBUG, ERROR, INFO, WARN};
	use hlog_err::{Error, ErrorKind};
	use std::sync::atomic::{AtomicBool, Ordering};
	use std::sync::Arc;

	#[test]
	fn test_get_logger_args() -> Result<(), Error> {
		let _lock = serial();
		let by_str = get_logger("global.args")?;
		let by_string = get_logger(&"global.args".to_string())?;
		let by_handle = get_logger(&by_str)?;
		assert_eq!(by_str, by_string);
		assert_eq!(by_str, by_handle);
		assert_eq!(get_logger("")?, default_logger());
		assert_eq!(get_logger("root")?, root_logger());
		Ok(())
	}

	#[test]
	fn test_global_levels() -> Result<(), Error> {
		let _lock = serial();
		set_level("global.levels", WARN)?;
		assert_eq!(get_level("global.levels")?, Some(WARN));
		assert_eq!(get_effective_level("global.levels")?, WARN);
		assert_eq!(get_level("global.levels.child")?, None);
		assert_eq!(get_effective_level("global.levels.child")?, WARN);
		assert!(!is_enabled_for("global.levels", INFO)?);
		assert!(is_enabled_for("global.levels", ERROR)?);

		let logger = get_logger("global.levels")?;
		set_level(&logger, DEBUG)?;
		assert_eq!(get_level(&logger)?, Some(DEBUG));
		assert_eq!(get_effective_level("global.levels.child")?, DEBUG);
		assert!(registry().exists("global.levels.child")?);

		let child = get_logger("global.levels.child")?;
		child.set_level(ERROR);
		assert_eq!(get_level(&child)?, Some(ERROR));
		child.clear_level();
		assert_eq!(get_level(&child)?, None);
		Ok(())
	}

	#[test]
	fn test_scenario_push_log_pop() -> Result<(), Error> {
		let _lock = serial();
		let capture = CaptureAppender::new();
		registry().add_appender(capture.clone())?;

		assert_eq!(default_logger_name(), "");
		push_context("svc")?;
		info!("inside svc")?;
		pop_context()?;
		info!("back at root")?;
		pop_context()?;
		assert_eq!(default_logger_name(), "");

		let records: Vec<_> = capture
			.records()
			.into_iter()
			.filter(|r| r.message == "inside svc" || r.message == "back at root")
			.collect();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].logger, "svc");
		assert_eq!(records[1].logger, "");

		let dyn_capture: std::sync::Arc<dyn crate::types::Appender> = capture;
		registry().remove_appender(&dyn_capture)?;
		Ok(())
	}

	#[test]
	fn test_global_validation() -> Result<(), Error> {
		let _lock = serial();
		push_context("valid")?;
		assert!(matches!(
			push_context("").unwrap_err().kind(),
			ErrorKind::IllegalArgument(_)
		));
		assert!(matches!(
			push_context("x.y").unwrap_err().kind(),
			ErrorKind::IllegalArgument(_)
		));
		assert!(matches!(
			push_context("root").unwrap_err().kind(),
			ErrorKind::IllegalArgument(_)
		));
		assert_eq!(default_logger_name(), "valid");
		pop_context()?;
		assert_eq!(default_logger_name(), "");

		assert!(push_context("root").is_err());
		assert!(LogContextGuard::new("root").is_err());
		assert!(default_logger().is_root());
		Ok(())
	}

	#[test]
	fn test_default_logger_concurrent_reads() -> Result<(), Error> {
		let _lock = serial();
		let done = Arc::new(AtomicBool::new(false));
		let mut readers = vec![];
		for _ in 0..4 {
			let done = done.clone();
			readers.push(std::thread::spawn(move || {
				let mut seen = 0;
				while !done.load(Ordering::SeqCst) {
					let name = default_logger_name();
					assert!(name.is_empty() || name == "conc" || name == "conc.inner");
					seen += 1;
				}
				seen
			}));
		}

		for _ in 0..200 {
			push_context("conc")?;
			push_context("inner")?;
			assert_eq!(default_logger_name(), "conc.inner");
			pop_context()?;
			pop_context()?;
		}
		done.store(true, Ordering::SeqCst);
		for reader in readers {
			assert!(reader.join().is_ok());
		}
		assert_eq!(default_logger_name(), "");
		Ok(())
	}

	fn guarded(fail: bool) -> Result<String, Error> {
		let _ctx = LogContextGuard::new("guarded")?;
		let _inner = LogContextGuard::new("inner")?;
		if fail {
			return Err(hlog_err::err!(hlog_err::ErrKind::Misc, "fail"));
		}
		Ok(default_logger_name())
	}

	#[test]
	fn test_log_context_guard() -> Result<(), Error> {
		let _lock = serial();
		assert_eq!(guarded(false)?, "guarded.inner");
		assert_eq!(default_logger_name(), "");
		assert!(guarded(true).is_err());
		assert_eq!(default_logger_name(), "");

		assert!(LogContextGuard::new("").is_err());
		assert!(LogContextGuard::new("a.b").is_err());
		assert_eq!(default_logger_name(), "");
		Ok(())
	}

	#[test]
	fn test_configure_resets_context() -> Result<(), Error> {
		let _lock = serial();
		push_context("before_configure")?;
		set_level("global.reset", ERROR)?;

		assert!(configure_prop("root.level = SHOUT").is_err());
		assert_eq!(default_logger_name(), "before_configure");

		configure_prop("root.level = WARN\nstdout = false")?;
		assert_eq!(default_logger_name(), "");
		assert_eq!(get_level("global.reset")?, None);
		assert_eq!(get_effective_level("global.reset")?, WARN);
		assert_eq!(
			registry().get_config_option(crate::types::LogConfigOptionName::Stdout)?,
			LogConfigOption::Stdout(false)
		);

		configure_with(LogConfig::default())?;
		assert_eq!(get_level("")?, Some(INFO));
		Ok(())
	}
}
