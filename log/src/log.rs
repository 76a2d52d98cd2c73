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

use crate::lwp::lwp_id;
use crate::mdc::{mdc_init_thread, mdc_snapshot};
use crate::types::{
	Location, LogLevel, Logger, Record, Registry, DEBUG, ERROR, FATAL, INFO, TRACE, WARN,
};
use hlog_deps::chrono::Local;
use hlog_err::{err, ErrKind, Error};
use std::fmt::{Arguments, Debug, Formatter};
use std::sync::Arc;

impl Location {
	/// Create a location. Usually called through the [`crate::location`] macro.
	pub const fn new(file: &'static str, line: u32, module_path: &'static str) -> Self {
		Self {
			file,
			line,
			module_path,
		}
	}
}

impl Logger {
	/// The dotted name of this logger. The root logger's name is the empty string.
	pub fn name(&self) -> &str {
		&self.node.name
	}

	/// Return true if this is the root logger.
	pub fn is_root(&self) -> bool {
		self.node.parent.is_none()
	}

	/// Return the parent of this logger or `None` for the root logger.
	pub fn parent(&self) -> Option<Logger> {
		self.node.parent.as_ref().map(|parent| Logger {
			node: parent.clone(),
			registry: self.registry.clone(),
		})
	}

	/// Return the child logger `suffix` of this logger. The suffix may itself be dotted.
	/// For the root logger this is the same as looking `suffix` up in the registry.
	pub fn child(&self, suffix: &str) -> Result<Logger, Error> {
		if suffix.is_empty() {
			return Err(err!(
				ErrKind::IllegalArgument,
				"empty child logger name not allowed"
			));
		}
		match self.is_root() {
			true => self.registry.get_logger(suffix),
			false => self
				.registry
				.get_logger(&format!("{}.{}", self.name(), suffix)),
		}
	}

	/// The explicit threshold of this logger, or `None` if it inherits its threshold.
	pub fn get_level(&self) -> Option<LogLevel> {
		self.node.level()
	}

	/// Set the explicit threshold of this logger.
	pub fn set_level(&self, level: LogLevel) {
		self.node.set_level(Some(level));
	}

	/// Remove the explicit threshold so that this logger inherits from its ancestors.
	/// The root logger always has a threshold and is reset to [`INFO`] instead.
	pub fn clear_level(&self) {
		match self.is_root() {
			true => self.node.set_level(Some(INFO)),
			false => self.node.set_level(None),
		}
	}

	/// The threshold in force: this logger's explicit level or the level of the nearest
	/// ancestor that has one.
	pub fn effective_level(&self) -> LogLevel {
		self.node.effective_level()
	}

	/// Return true if a record at `level` would be written by this logger. This does not
	/// allocate and takes no locks.
	pub fn is_enabled_for(&self, level: LogLevel) -> bool {
		self.node.effective_level() <= level
	}

	pub fn is_trace_enabled(&self) -> bool {
		self.is_enabled_for(TRACE)
	}

	pub fn is_debug_enabled(&self) -> bool {
		self.is_enabled_for(DEBUG)
	}

	pub fn is_info_enabled(&self) -> bool {
		self.is_enabled_for(INFO)
	}

	pub fn is_warn_enabled(&self) -> bool {
		self.is_enabled_for(WARN)
	}

	pub fn is_error_enabled(&self) -> bool {
		self.is_enabled_for(ERROR)
	}

	pub fn is_fatal_enabled(&self) -> bool {
		self.is_enabled_for(FATAL)
	}

	/// The registry this logger belongs to.
	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	/// Emit a record with a formatted message. The level is not checked here; the
	/// macros check [`Logger::is_enabled_for`] before the arguments are built.
	pub fn log(&self, level: LogLevel, location: Location, args: Arguments) -> Result<(), Error> {
		match args.as_str() {
			Some(s) => self.log_msg(level, location, s),
			None => self.log_msg(level, location, &args.to_string()),
		}
	}

	/// Emit a record with an already built message. The calling thread's registered MDC
	/// initialization hooks are run first if this is its first record.
	pub fn log_msg(&self, level: LogLevel, location: Location, message: &str) -> Result<(), Error> {
		mdc_init_thread()?;
		let record = Record {
			logger: self.name().to_string(),
			level,
			location,
			message: message.to_string(),
			mdc: mdc_snapshot(),
			lwp: lwp_id(),
			timestamp: Local::now(),
		};
		self.registry.emit(&record)
	}
}

impl PartialEq for Logger {
	fn eq(&self, other: &Logger) -> bool {
		Arc::ptr_eq(&self.node, &other.node)
	}
}

impl Debug for Logger {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
		f.debug_struct("Logger")
			.field("name", &self.node.name)
			.field("level", &self.node.level())
			.finish()
	}
}

#[cfg(test)]
mod test {
	use crate::mdc::{mdc, mdc_remove};
	use crate::test_util::CaptureAppender;
	use crate::types::{Registry, DEBUG, ERROR, FATAL, INFO, TRACE, WARN};
	use hlog_err::{Error, ErrorKind};

	#[test]
	fn test_names_and_children() -> Result<(), Error> {
		let registry = Registry::new();
		let root = registry.root_logger();
		assert_eq!(root.name(), "");
		let svc = root.child("svc")?;
		assert_eq!(svc.name(), "svc");
		let db = svc.child("db.pool")?;
		assert_eq!(db.name(), "svc.db.pool");
		assert_eq!(db.parent().unwrap().name(), "svc.db");
		assert_eq!(db, registry.get_logger("svc.db.pool")?);
		assert!(matches!(
			svc.child("").unwrap_err().kind(),
			ErrorKind::IllegalArgument(_)
		));
		Ok(())
	}

	#[test]
	fn test_enabled_helpers() -> Result<(), Error> {
		let registry = Registry::new();
		let logger = registry.get_logger("lvl")?;
		logger.set_level(WARN);
		assert!(!logger.is_trace_enabled());
		assert!(!logger.is_debug_enabled());
		assert!(!logger.is_info_enabled());
		assert!(logger.is_warn_enabled());
		assert!(logger.is_error_enabled());
		assert!(logger.is_fatal_enabled());

		logger.set_level(TRACE);
		assert!(logger.is_trace_enabled());
		logger.clear_level();
		assert_eq!(logger.get_level(), None);
		assert!(!logger.is_debug_enabled());
		assert!(logger.is_info_enabled());

		let root = registry.root_logger();
		root.set_level(ERROR);
		assert!(!logger.is_warn_enabled());
		root.clear_level();
		assert_eq!(root.get_level(), Some(INFO));
		assert!(root.is_enabled_for(FATAL));
		assert!(!root.is_enabled_for(DEBUG));
		Ok(())
	}

	#[test]
	fn test_record_contents() -> Result<(), Error> {
		let registry = Registry::new();
		let capture = CaptureAppender::new();
		registry.add_appender(capture.clone())?;
		let logger = registry.get_logger("record.test")?;

		mdc("record_key", "record_value");
		logger.log(INFO, location!(), format_args!("value={}", 7))?;
		mdc_remove("record_key");
		logger.log_msg(WARN, location!(), "second")?;

		let records = capture.records();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].logger, "record.test");
		assert_eq!(records[0].level, INFO);
		assert_eq!(records[0].message, "value=7");
		assert_eq!(
			records[0].mdc.get("record_key"),
			Some(&"record_value".to_string())
		);
		assert_eq!(records[1].mdc.get("record_key"), None);
		assert_eq!(records[0].lwp, records[1].lwp);
		assert!(records[0].timestamp <= records[1].timestamp);
		assert!(records[1].location.line > records[0].location.line);
		Ok(())
	}

	#[test]
	fn test_debug_format() -> Result<(), Error> {
		let registry = Registry::new();
		let logger = registry.get_logger("dbg")?;
		logger.set_level(DEBUG);
		let s = format!("{:?}", logger);
		assert!(s.contains("dbg"));
		assert!(s.contains("10000"));
		Ok(())
	}
}
