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

/// Lock a rwlock in write mode and return the appropriate error if the lock is poisoned.
macro_rules! lockw {
	($a:expr) => {{
		let res = $a.write().map_err(|e| {
			let error: hlog_err::Error =
				hlog_err::ErrorKind::Poison(format!("Poison Error: {}", e.to_string())).into();
			error
		});

		res
	}};
}

/// Lock a rwlock in read mode and return the appropriate error if the lock is poisoned.
macro_rules! lockr {
	($a:expr) => {{
		let res = $a.read().map_err(|e| {
			let error: hlog_err::Error =
				hlog_err::ErrorKind::Poison(format!("Poison Error: {}", e.to_string())).into();
			error
		});

		res
	}};
}

/// Build a [`crate::Location`] for the place this macro is invoked from.
#[macro_export]
macro_rules! location {
	() => {
		$crate::Location::new(file!(), line!(), module_path!())
	};
}

/// The main logging macro. The first parameter is the logger, either a name (`&str` or
/// `&String`) or a `&Logger` handle; an empty name selects the current default logger.
/// The second parameter is the level. The remaining parameters are used like the
/// println/format macros. The message is only formatted when the logger is enabled for
/// the level, so the arguments are not evaluated at all otherwise. The macro returns
/// `Result<(), Error>`.
///
/// To log to the default logger without naming it see [`trace`], [`debug`], [`info`],
/// [`warn`], [`error`] and [`fatal`].
///
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     let abc = 123;
///     log!("svc.db", INFO, "my value = {}", abc)?;
///
///     let logger = get_logger("svc.db")?;
///     log!(&logger, WARN, "hi")?;
///     Ok(())
/// }
///
/// // The output will look something like this:
/// // [2022-02-16 19:37:48.112]: (INFO): svc.db: my value = 123
/// // [2022-02-16 19:37:48.112]: (WARN): svc.db: hi
/// ```
#[macro_export]
macro_rules! log {
	($logger:expr, $level:expr, $($arg:tt)+) => {{
		match $crate::get_logger($logger) {
			Ok(logger) => {
				let level: $crate::LogLevel = $level;
				match logger.is_enabled_for(level) {
					true => logger.log(level, $crate::location!(), format_args!($($arg)+)),
					false => Ok(()),
				}
			}
			Err(e) => Err(e),
		}
	}};
}

/// Stream style logging. Like [`log`] except that the message is built by appending
/// every remaining parameter, each of which may be any value that implements
/// [`std::fmt::Display`], in order. The parameters are only evaluated when the logger
/// is enabled for the level.
///
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     let (x, y) = (3, 2.71828);
///     logs!("geometry", DEBUG, "coordinates: x=", x, " y=", y)?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! logs {
	($logger:expr, $level:expr, $($part:expr),+ $(,)?) => {{
		match $crate::get_logger($logger) {
			Ok(logger) => {
				let level: $crate::LogLevel = $level;
				match logger.is_enabled_for(level) {
					true => {
						let msg = (|| -> ::std::result::Result<String, ::std::fmt::Error> {
							let mut msg = String::new();
							$(
								::std::fmt::Write::write_fmt(
									&mut msg,
									format_args!("{}", $part),
								)?;
							)+
							Ok(msg)
						})();
						match msg {
							Ok(msg) => logger.log_msg(level, $crate::location!(), &msg),
							Err(e) => Err(e.into()),
						}
					}
					false => Ok(()),
				}
			}
			Err(e) => Err(e),
		}
	}};
}

/// Return whether a logger is enabled for a level. With only a level the default logger
/// is checked, otherwise the logger is given first as `logger: <name or handle>`.
///
/// # Examples
/// ```
/// use hlog::*;
///
/// if enabled!(DEBUG) {
///     // build an expensive debugging report
/// }
/// let verbose = enabled!(logger: "svc.db", TRACE);
/// ```
#[macro_export]
macro_rules! enabled {
	(logger: $logger:expr, $level:expr) => {{
		match $crate::get_logger($logger) {
			Ok(logger) => logger.is_enabled_for($level),
			Err(_) => false,
		}
	}};
	($level:expr) => {{
		$crate::default_logger().is_enabled_for($level)
	}};
}

/// Log at the 'fatal' (50000) log level. This macro logs to the default logger unless a
/// logger is given first as `logger: <name or handle>`. It is used like the
/// println/format macros. Also see [`trace`], [`debug`], [`info`], [`warn`], or [`error`].
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     let abc = 123;
///     fatal!("my value = {}", abc)?;
///     fatal!(logger: "svc", "hi")?;
///     Ok(())
/// }
///
/// // The output will look something like this:
/// // [2022-02-16 19:37:48.112]: (FATAL): root: my value = 123
/// // [2022-02-16 19:37:48.112]: (FATAL): svc: hi
/// ```
#[macro_export]
macro_rules! fatal {
	(logger: $logger:expr, $($arg:tt)+) => {
		$crate::log!($logger, $crate::FATAL, $($arg)+)
	};
	($($arg:tt)+) => {
		$crate::log!(&$crate::default_logger(), $crate::FATAL, $($arg)+)
	};
}

/// Log at the 'error' (40000) log level. This macro logs to the default logger unless a
/// logger is given first as `logger: <name or handle>`. It is used like the
/// println/format macros. Also see [`trace`], [`debug`], [`info`], [`warn`], or [`fatal`].
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     let abc = 123;
///     error!("my value = {}", abc)?;
///     error!(logger: "svc", "hi")?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! error {
	(logger: $logger:expr, $($arg:tt)+) => {
		$crate::log!($logger, $crate::ERROR, $($arg)+)
	};
	($($arg:tt)+) => {
		$crate::log!(&$crate::default_logger(), $crate::ERROR, $($arg)+)
	};
}

/// Log at the 'warn' (30000) log level. This macro logs to the default logger unless a
/// logger is given first as `logger: <name or handle>`. It is used like the
/// println/format macros. Also see [`trace`], [`debug`], [`info`], [`error`], or [`fatal`].
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     warn!("disk {}% full", 91)?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! warn {
	(logger: $logger:expr, $($arg:tt)+) => {
		$crate::log!($logger, $crate::WARN, $($arg)+)
	};
	($($arg:tt)+) => {
		$crate::log!(&$crate::default_logger(), $crate::WARN, $($arg)+)
	};
}

/// Log at the 'info' (20000) log level. This macro logs to the default logger unless a
/// logger is given first as `logger: <name or handle>`. It is used like the
/// println/format macros. Also see [`trace`], [`debug`], [`warn`], [`error`], or [`fatal`].
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     info!("ready")?;
///     let logger = get_logger("svc")?;
///     info!(logger: &logger, "listening on port {}", 8080)?;
///     Ok(())
/// }
///
/// test().unwrap();
/// ```
#[macro_export]
macro_rules! info {
	(logger: $logger:expr, $($arg:tt)+) => {
		$crate::log!($logger, $crate::INFO, $($arg)+)
	};
	($($arg:tt)+) => {
		$crate::log!(&$crate::default_logger(), $crate::INFO, $($arg)+)
	};
}

/// Log at the 'debug' (10000) log level. This macro logs to the default logger unless a
/// logger is given first as `logger: <name or handle>`. It is used like the
/// println/format macros. Also see [`trace`], [`info`], [`warn`], [`error`], or [`fatal`].
#[macro_export]
macro_rules! debug {
	(logger: $logger:expr, $($arg:tt)+) => {
		$crate::log!($logger, $crate::DEBUG, $($arg)+)
	};
	($($arg:tt)+) => {
		$crate::log!(&$crate::default_logger(), $crate::DEBUG, $($arg)+)
	};
}

/// Log at the 'trace' (5000) log level. This macro logs to the default logger unless a
/// logger is given first as `logger: <name or handle>`. It is used like the
/// println/format macros. Also see [`debug`], [`info`], [`warn`], [`error`], or [`fatal`].
#[macro_export]
macro_rules! trace {
	(logger: $logger:expr, $($arg:tt)+) => {
		$crate::log!($logger, $crate::TRACE, $($arg)+)
	};
	($($arg:tt)+) => {
		$crate::log!(&$crate::default_logger(), $crate::TRACE, $($arg)+)
	};
}

/// Just like [`fatal`], but stream style. See [`logs`].
#[macro_export]
macro_rules! fatal_stream {
	(logger: $logger:expr, $($part:expr),+ $(,)?) => {
		$crate::logs!($logger, $crate::FATAL, $($part),+)
	};
	($($part:expr),+ $(,)?) => {
		$crate::logs!(&$crate::default_logger(), $crate::FATAL, $($part),+)
	};
}

/// Just like [`error`], but stream style. See [`logs`].
#[macro_export]
macro_rules! error_stream {
	(logger: $logger:expr, $($part:expr),+ $(,)?) => {
		$crate::logs!($logger, $crate::ERROR, $($part),+)
	};
	($($part:expr),+ $(,)?) => {
		$crate::logs!(&$crate::default_logger(), $crate::ERROR, $($part),+)
	};
}

/// Just like [`warn`], but stream style. See [`logs`].
#[macro_export]
macro_rules! warn_stream {
	(logger: $logger:expr, $($part:expr),+ $(,)?) => {
		$crate::logs!($logger, $crate::WARN, $($part),+)
	};
	($($part:expr),+ $(,)?) => {
		$crate::logs!(&$crate::default_logger(), $crate::WARN, $($part),+)
	};
}

/// Just like [`info`], but stream style. See [`logs`].
///
/// # Examples
/// ```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn test() -> Result<(), Error> {
///     let x = 3;
///     info_stream!("Format ", x, " ", 2.71828, " foo")?;
///     info_stream!(logger: "svc", "x=", x)?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! info_stream {
	(logger: $logger:expr, $($part:expr),+ $(,)?) => {
		$crate::logs!($logger, $crate::INFO, $($part),+)
	};
	($($part:expr),+ $(,)?) => {
		$crate::logs!(&$crate::default_logger(), $crate::INFO, $($part),+)
	};
}

/// Just like [`debug`], but stream style. See [`logs`].
#[macro_export]
macro_rules! debug_stream {
	(logger: $logger:expr, $($part:expr),+ $(,)?) => {
		$crate::logs!($logger, $crate::DEBUG, $($part),+)
	};
	($($part:expr),+ $(,)?) => {
		$crate::logs!(&$crate::default_logger(), $crate::DEBUG, $($part),+)
	};
}

/// Just like [`trace`], but stream style. See [`logs`].
#[macro_export]
macro_rules! trace_stream {
	(logger: $logger:expr, $($part:expr),+ $(,)?) => {
		$crate::logs!($logger, $crate::TRACE, $($part),+)
	};
	($($part:expr),+ $(,)?) => {
		$crate::logs!(&$crate::default_logger(), $crate::TRACE, $($part),+)
	};
}

#[cfg(test)]
mod test {
	use crate::test_util::CaptureAppender;
	use crate::types::{Registry, DEBUG, ERROR, FATAL, INFO, TRACE, WARN};
	use hlog_err::{Error, ErrorKind};
	use std::cell::Cell;
	use std::sync::{Arc, RwLock};
	use std::thread::spawn;

	#[test]
	fn test_format_macros() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		let logger = registry.get_logger("macros.format")?;
		logger.set_level(TRACE);

		trace!(logger: &logger, "trace {}", 1)?;
		debug!(logger: &logger, "debug {}", 2)?;
		info!(logger: &logger, "info {}", 3)?;
		warn!(logger: &logger, "warn {}", 4)?;
		error!(logger: &logger, "error {}", 5)?;
		fatal!(logger: &logger, "fatal {}", 6)?;
		log!(&logger, WARN, "plain")?;

		let records = capture.records();
		let levels: Vec<_> = records.iter().map(|r| r.level).collect();
		assert_eq!(levels, vec![TRACE, DEBUG, INFO, WARN, ERROR, FATAL, WARN]);
		let messages: Vec<_> = records.iter().map(|r| r.message.clone()).collect();
		assert_eq!(
			messages,
			vec!["trace 1", "debug 2", "info 3", "warn 4", "error 5", "fatal 6", "plain"]
		);
		assert!(records.iter().all(|r| r.logger == "macros.format"));
		assert_eq!(records[0].location.file, file!());
		assert_eq!(records[0].location.module_path, module_path!());
		Ok(())
	}

	#[test]
	fn test_stream_macros() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		let logger = registry.get_logger("macros.stream")?;
		logger.set_level(DEBUG);

		info_stream!(logger: &logger, "Format ", 3, " ", 2.71828, " foo c++")?;
		debug_stream!(logger: &logger, "x=", 1, ", y=", 'q')?;
		trace_stream!(logger: &logger, "not shown")?;
		logs!(&logger, ERROR, "only one part")?;
		warn_stream!(logger: &logger, "w",)?;
		error_stream!(logger: &logger, "e")?;
		fatal_stream!(logger: &logger, "f")?;

		let messages: Vec<_> = capture.records().iter().map(|r| r.message.clone()).collect();
		assert_eq!(
			messages,
			vec![
				"Format 3 2.71828 foo c++",
				"x=1, y=q",
				"only one part",
				"w",
				"e",
				"f"
			]
		);
		Ok(())
	}

	struct Unprintable;

	impl std::fmt::Display for Unprintable {
		fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			Err(std::fmt::Error)
		}
	}

	#[test]
	fn test_stream_format_error() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		let logger = registry.get_logger("macros.stream_error")?;

		let res = info_stream!(logger: &logger, "before ", Unprintable, " after");
		assert!(matches!(res.unwrap_err().kind(), ErrorKind::Log(_)));
		assert!(logs!(&logger, WARN, Unprintable).is_err());
		assert!(capture.records().is_empty());

		// disabled levels never format the parts
		trace_stream!(logger: &logger, Unprintable)?;
		info_stream!(logger: &logger, "fine")?;
		assert_eq!(capture.records().len(), 1);
		Ok(())
	}

	#[test]
	fn test_disabled_levels_do_not_evaluate_arguments() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		let logger = registry.get_logger("macros.lazy")?;
		logger.set_level(INFO);

		let evaluated = Cell::new(0);
		let expensive = || {
			evaluated.set(evaluated.get() + 1);
			"expensive"
		};

		debug!(logger: &logger, "value = {}", expensive())?;
		trace_stream!(logger: &logger, "value = ", expensive())?;
		log!(&logger, TRACE, "{}", expensive())?;
		assert_eq!(evaluated.get(), 0);
		assert!(capture.records().is_empty());

		info!(logger: &logger, "value = {}", expensive())?;
		assert_eq!(evaluated.get(), 1);
		assert_eq!(capture.records().len(), 1);
		Ok(())
	}

	#[test]
	fn test_threshold_info() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		registry.root_logger().set_level(INFO);
		let root = registry.root_logger();

		trace!(logger: &root, "hidden trace")?;
		debug!(logger: &root, "hidden debug")?;
		assert!(capture.records().is_empty());

		info!(logger: &root, "ready")?;
		let records = capture.records();
		assert_eq!(records.len(), 1);
		assert!(records[0].message.contains("ready"));
		assert_eq!(records[0].logger, "");
		Ok(())
	}

	#[test]
	fn test_enabled() -> Result<(), Error> {
		let registry = Registry::new();
		let logger = registry.get_logger("macros.enabled")?;
		logger.set_level(WARN);
		assert!(!enabled!(logger: &logger, INFO));
		assert!(enabled!(logger: &logger, WARN));
		assert!(enabled!(logger: &logger, FATAL));
		Ok(())
	}

	#[test]
	fn test_macros_from_threads() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		let logger = registry.get_logger("macros.threads")?;

		let mut jhs = vec![];
		for i in 0..4 {
			let logger = logger.clone();
			jhs.push(spawn(move || -> Result<(), Error> {
				for j in 0..10 {
					info!(logger: &logger, "thread {} msg {}", i, j)?;
				}
				Ok(())
			}));
		}
		for jh in jhs {
			jh.join().expect("join")?;
		}
		assert_eq!(capture.records().len(), 40);
		Ok(())
	}

	#[test]
	fn test_lock() -> Result<(), Error> {
		let v: u32 = 0;
		let x = Arc::new(RwLock::new(v));
		let x_clone = x.clone();
		let jh = spawn(move || {
			let p: Option<u32> = None;
			let _x = lockw!(x_clone).unwrap();
			p.unwrap(); // cause thread panic and poison this lock
		});

		// this will be an error but we ignore for the purposes of this test
		let _ = jh.join();

		// try to get the lock here and it's a poison error
		let res = lockw!(x);
		assert!(res.is_err());
		let res = lockr!(x);
		assert!(res.is_err());

		Ok(())
	}
}
