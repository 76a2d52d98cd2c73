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

use crate::types::{Appender, LogConfig, LogLevel, Logger, LoggerNode, Record, Registry, INFO};
use hlog_err::{err, ErrKind, Error};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

// no explicit threshold, inherit from the parent
pub(crate) const LEVEL_UNSET: i32 = i32::MIN;
pub(crate) const ROOT_NAME: &str = "root";

impl LoggerNode {
	fn new(name: String, level: i32, parent: Option<Arc<LoggerNode>>) -> Self {
		Self {
			name,
			level: AtomicI32::new(level),
			parent,
		}
	}

	pub(crate) fn level(&self) -> Option<LogLevel> {
		match self.level.load(Ordering::Relaxed) {
			LEVEL_UNSET => None,
			v => Some(LogLevel(v)),
		}
	}

	pub(crate) fn set_level(&self, level: Option<LogLevel>) {
		let v = match level {
			Some(level) => level.0,
			None => LEVEL_UNSET,
		};
		self.level.store(v, Ordering::Relaxed);
	}

	pub(crate) fn effective_level(&self) -> LogLevel {
		let mut node = self;
		loop {
			let v = node.level.load(Ordering::Relaxed);
			if v != LEVEL_UNSET {
				return LogLevel(v);
			}
			match &node.parent {
				Some(parent) => node = parent.as_ref(),
				// root always carries a level, the fallback covers a cleared root
				None => return INFO,
			}
		}
	}
}

impl Registry {
	/// Create an empty hierarchy: a root logger with threshold [`INFO`], no appenders and
	/// the default configuration recorded. Nothing is written until an appender is added
	/// or a configuration is applied.
	pub fn new() -> Arc<Self> {
		Arc::new(Self {
			root: Arc::new(LoggerNode::new(String::new(), INFO.0, None)),
			loggers: RwLock::new(HashMap::new()),
			appenders: RwLock::new(vec![]),
			config: RwLock::new(LogConfig::default()),
		})
	}

	/// Return the root logger of this registry.
	pub fn root_logger(self: &Arc<Self>) -> Logger {
		Logger {
			node: self.root.clone(),
			registry: self.clone(),
		}
	}

	/// Return the logger for the dotted `name`. The names `""` and `"root"` resolve to the
	/// root logger. The logger and all of its missing ancestors are created on first use,
	/// so `get_logger("a.b.c")` also creates `a` and `a.b`. Names with empty segments
	/// such as `a..b` or `.a` are rejected with an IllegalArgument error.
	pub fn get_logger(self: &Arc<Self>, name: &str) -> Result<Logger, Error> {
		if name.is_empty() || name == ROOT_NAME {
			return Ok(self.root_logger());
		}

		{
			let loggers = lockr!(self.loggers)?;
			if let Some(node) = loggers.get(name) {
				return Ok(Logger {
					node: node.clone(),
					registry: self.clone(),
				});
			}
		}

		if name.split('.').any(|segment| segment.is_empty()) {
			return Err(err!(
				ErrKind::IllegalArgument,
				format!("invalid logger name: '{}'", name)
			));
		}

		let mut loggers = lockw!(self.loggers)?;
		let mut parent = self.root.clone();
		let mut end = 0;
		for segment in name.split('.') {
			end = match end {
				0 => segment.len(),
				_ => end + 1 + segment.len(),
			};
			let prefix = &name[0..end];
			let node = match loggers.get(prefix) {
				Some(node) => node.clone(),
				None => {
					let node = Arc::new(LoggerNode::new(
						prefix.to_string(),
						LEVEL_UNSET,
						Some(parent.clone()),
					));
					loggers.insert(prefix.to_string(), node.clone());
					node
				}
			};
			parent = node;
		}

		Ok(Logger {
			node: parent,
			registry: self.clone(),
		})
	}

	/// Return true if a logger with this name has already been created.
	pub fn exists(&self, name: &str) -> Result<bool, Error> {
		if name.is_empty() || name == ROOT_NAME {
			return Ok(true);
		}
		Ok(lockr!(self.loggers)?.contains_key(name))
	}

	/// Add an appender. Every record emitted by a logger of this registry is written
	/// to every appender, in the order they were added.
	pub fn add_appender(&self, appender: Arc<dyn Appender>) -> Result<(), Error> {
		lockw!(self.appenders)?.push(appender);
		Ok(())
	}

	/// Remove a previously added appender. Returns true if it was found.
	pub fn remove_appender(&self, appender: &Arc<dyn Appender>) -> Result<bool, Error> {
		let mut appenders = lockw!(self.appenders)?;
		let target = Arc::as_ptr(appender) as *const ();
		let len = appenders.len();
		appenders.retain(|a| Arc::as_ptr(a) as *const () != target);
		Ok(appenders.len() != len)
	}

	/// Remove all appenders.
	pub fn clear_appenders(&self) -> Result<(), Error> {
		lockw!(self.appenders)?.clear();
		Ok(())
	}

	/// Clear the explicit level of every logger, set the root back to [`INFO`] and remove
	/// all appenders. Logger nodes and handles stay valid.
	pub fn reset(&self) -> Result<(), Error> {
		{
			let loggers = lockr!(self.loggers)?;
			for node in loggers.values() {
				node.set_level(None);
			}
		}
		self.root.set_level(Some(INFO));
		self.clear_appenders()
	}

	pub(crate) fn emit(&self, record: &Record) -> Result<(), Error> {
		let appenders = lockr!(self.appenders)?;
		for appender in appenders.iter() {
			appender.append(record)?;
		}
		Ok(())
	}

	/// Flush every appender.
	pub fn flush(&self) -> Result<(), Error> {
		let appenders = lockr!(self.appenders)?;
		for appender in appenders.iter() {
			appender.flush()?;
		}
		Ok(())
	}
}
