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

//! Glue between hlog and the [log](https://docs.rs/log/latest/log/) crate. Records can
//! flow both ways: [`HostLogAppender`] hands hlog records to whatever logger is
//! installed for the log crate and [`LogBridge`] is a log crate logger that feeds the
//! log crate's records into the hlog hierarchy. A record never crosses back to the
//! side it came from.

use crate::global::registry;
use crate::registry::ROOT_NAME;
use crate::types::{Appender, Location, LogLevel, Record, Registry, DEBUG, ERROR, INFO, TRACE, WARN};
use hlog_deps::lazy_static::lazy_static;
use hlog_deps::log::{self as host, Level, LevelFilter, Log, Metadata};
use hlog_err::{err, ErrKind, Error};
use std::cell::Cell;
use std::sync::{Arc, Mutex};

thread_local! {
	// set while a record is being passed from one side to the other
	static FORWARDING: Cell<bool> = Cell::new(false);
}

lazy_static! {
	static ref HOST_APPENDER: Mutex<Option<Arc<dyn Appender>>> = Mutex::new(None);
}

fn forward<F, R>(f: F) -> Option<R>
where
	F: FnOnce() -> R,
{
	if FORWARDING.with(|fwd| fwd.replace(true)) {
		return None;
	}
	let ret = f();
	FORWARDING.with(|fwd| fwd.set(false));
	Some(ret)
}

impl LogLevel {
	/// Translate to a log crate level. There is no fatal level in the log crate so both
	/// [`ERROR`] and [`crate::FATAL`] map to [`Level::Error`].
	pub fn to_host(&self) -> Level {
		match *self {
			l if l <= TRACE => Level::Trace,
			l if l <= DEBUG => Level::Debug,
			l if l <= INFO => Level::Info,
			l if l <= WARN => Level::Warn,
			_ => Level::Error,
		}
	}

	/// Translate a log crate level.
	pub fn from_host(level: Level) -> Self {
		match level {
			Level::Trace => TRACE,
			Level::Debug => DEBUG,
			Level::Info => INFO,
			Level::Warn => WARN,
			Level::Error => ERROR,
		}
	}
}

/// An [`Appender`] that passes records on to the logger installed for the log crate. The
/// target of each forwarded record is the hlog logger name (`root` for the root logger)
/// and the hlog MDC is not forwarded.
#[derive(Default)]
pub struct HostLogAppender {}

impl HostLogAppender {
	pub fn new() -> Self {
		Self {}
	}
}

impl Appender for HostLogAppender {
	fn append(&self, record: &Record) -> Result<(), Error> {
		let target = match record.logger.is_empty() {
			true => ROOT_NAME,
			false => record.logger.as_str(),
		};
		forward(|| {
			host::logger().log(
				&host::Record::builder()
					.args(format_args!("{}", record.message))
					.level(record.level.to_host())
					.target(target)
					.file(Some(record.location.file))
					.line(Some(record.location.line))
					.module_path(Some(record.location.module_path))
					.build(),
			)
		});
		Ok(())
	}

	fn flush(&self) -> Result<(), Error> {
		host::logger().flush();
		Ok(())
	}
}

/// Forward the records of the process wide registry to the log crate as well. At most
/// one forwarding appender is installed however often this is called. Configuring the
/// process wide registry removes it, call this again afterwards.
pub fn use_host_logging() -> Result<(), Error> {
	let mut host_appender = HOST_APPENDER.lock()?;
	if let Some(appender) = host_appender.take() {
		registry().remove_appender(&appender)?;
	}
	let appender: Arc<dyn Appender> = Arc::new(HostLogAppender::new());
	registry().add_appender(appender.clone())?;
	*host_appender = Some(appender);
	Ok(())
}

/// Stop forwarding records of the process wide registry to the log crate.
pub fn do_not_use_host_logging() -> Result<(), Error> {
	let mut host_appender = HOST_APPENDER.lock()?;
	if let Some(appender) = host_appender.take() {
		registry().remove_appender(&appender)?;
	}
	Ok(())
}

/// Forwards records to the log crate while it is in scope. See [`use_host_logging`].
pub struct HostLogging {
	_private: (),
}

impl HostLogging {
	pub fn new() -> Result<Self, Error> {
		use_host_logging()?;
		Ok(Self { _private: () })
	}
}

impl Drop for HostLogging {
	fn drop(&mut self) {
		let _ = do_not_use_host_logging();
	}
}

/// A log crate logger that sends records into an hlog [`Registry`]. The record target is
/// used as the logger name with `::` replaced by `.`, so a record logged from module
/// `app::db` goes to the logger `app.db` and obeys that logger's threshold.
///
///```no_run
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn main() -> Result<(), Error> {
///     LogBridge::init()?;
///     hlog_deps::log::info!(target: "app::db", "connected");
///     Ok(())
/// }
///```
pub struct LogBridge {
	registry: Arc<Registry>,
}

impl LogBridge {
	pub fn new(registry: Arc<Registry>) -> Self {
		Self { registry }
	}

	/// Install a bridge to the process wide registry as the log crate's logger. Fails if
	/// the log crate already has a logger.
	pub fn init() -> Result<(), Error> {
		let bridge = LogBridge::new(registry().clone());
		host::set_boxed_logger(Box::new(bridge)).map_err(|e| {
			let error: Error = err!(ErrKind::Log, format!("could not install bridge: {}", e));
			error
		})?;
		host::set_max_level(LevelFilter::Trace);
		Ok(())
	}

	fn logger_name(target: &str) -> String {
		target.replace("::", ".")
	}
}

impl Log for LogBridge {
	fn enabled(&self, metadata: &Metadata) -> bool {
		match self
			.registry
			.get_logger(&Self::logger_name(metadata.target()))
		{
			Ok(logger) => logger.is_enabled_for(LogLevel::from_host(metadata.level())),
			Err(_) => false,
		}
	}

	fn log(&self, record: &host::Record) {
		let logger = match self
			.registry
			.get_logger(&Self::logger_name(record.target()))
		{
			Ok(logger) => logger,
			Err(_) => return,
		};
		let level = LogLevel::from_host(record.level());
		if !logger.is_enabled_for(level) {
			return;
		}
		let location = Location::new(
			record.file_static().unwrap_or("<unknown>"),
			record.line().unwrap_or(0),
			record.module_path_static().unwrap_or(""),
		);
		forward(|| {
			let _ = match record.args().as_str() {
				Some(msg) => logger.log_msg(level, location, msg),
				None => logger.log_msg(level, location, &record.args().to_string()),
			};
		});
	}

	fn flush(&self) {
		let _ = self.registry.flush();
	}
}
