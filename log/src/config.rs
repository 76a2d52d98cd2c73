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

use crate::appender::{ConsoleAppender, FileAppender};
use crate::types::{Appender, Layout, LogConfig, LogConfigOption, LogConfigOptionName};
use crate::types::{LogLevel, Registry, INFO};
use hlog_err::{err, map_err, ErrKind, Error};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The environment variable naming the properties file that configures the process
/// wide registry.
pub const HLOG_CONFIG_ENV: &str = "HLOG_CONFIG";

/// Name of the logger the library reports its own problems to.
pub const HLOG_LOGGER: &str = "hlog";

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			colors: LogConfigOption::Colors(false),
			stdout: LogConfigOption::Stdout(true),
			timestamp: LogConfigOption::Timestamp(true),
			level: LogConfigOption::Level(true),
			line_num: LogConfigOption::LineNum(false),
			show_millis: LogConfigOption::ShowMillis(true),
			logger_name: LogConfigOption::LoggerName(true),
			mdc: LogConfigOption::Mdc(true),
			lwp: LogConfigOption::Lwp(false),
			file_path: LogConfigOption::FilePath(None),
			line_num_data_max_len: LogConfigOption::LineNumDataMaxLen(25),
			root_level: LogConfigOption::RootLevel(INFO),
			levels: LogConfigOption::Levels(vec![]),
		}
	}
}

pub(crate) fn check_config(config: &LogConfig) -> Result<(), Error> {
	let ok = matches!(config.colors, LogConfigOption::Colors(_))
		&& matches!(config.stdout, LogConfigOption::Stdout(_))
		&& matches!(config.timestamp, LogConfigOption::Timestamp(_))
		&& matches!(config.level, LogConfigOption::Level(_))
		&& matches!(config.line_num, LogConfigOption::LineNum(_))
		&& matches!(config.show_millis, LogConfigOption::ShowMillis(_))
		&& matches!(config.logger_name, LogConfigOption::LoggerName(_))
		&& matches!(config.mdc, LogConfigOption::Mdc(_))
		&& matches!(config.lwp, LogConfigOption::Lwp(_))
		&& matches!(config.file_path, LogConfigOption::FilePath(_))
		&& matches!(
			config.line_num_data_max_len,
			LogConfigOption::LineNumDataMaxLen(_)
		) && matches!(config.root_level, LogConfigOption::RootLevel(_))
		&& matches!(config.levels, LogConfigOption::Levels(_));

	match ok {
		true => Ok(()),
		false => Err(err!(
			ErrKind::Configuration,
			"LogConfigOption variant does not match the LogConfig field it is stored in"
		)),
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
	match value.to_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" => Ok(false),
		_ => Err(err!(
			ErrKind::Configuration,
			format!("expected a boolean for '{}', found '{}'", key, value)
		)),
	}
}

impl LogConfig {
	/// Parse a configuration from properties text. Each non empty line that does not
	/// start with `#` or `!` is a `key = value` pair. Options not named keep their
	/// default values. The keys are:
	///
	/// * `root.level`: threshold of the root logger.
	/// * `logger.<name>.level`: threshold of the logger `<name>`.
	/// * `stdout`, `colors`, `timestamp`, `level`, `line_num`, `show_millis`,
	///   `logger_name`, `mdc`, `lwp`: booleans, see [`LogConfigOption`].
	/// * `file`: path of a file to append records to.
	/// * `line_num_data_max_len`: an integer.
	///
	/// Levels are given by name (`DEBUG`, `info`, ...) or as an integer threshold.
	///
	///```
	/// use hlog::*;
	/// use hlog_err::Error;
	///
	/// fn main() -> Result<(), Error> {
	///     let config = LogConfig::from_properties(
	///         "# quiet by default\n\
	///          root.level = WARN\n\
	///          logger.svc.db.level = DEBUG\n\
	///          line_num = true\n",
	///     )?;
	///     assert_eq!(config.root_level, LogConfigOption::RootLevel(WARN));
	///     assert_eq!(config.line_num, LogConfigOption::LineNum(true));
	///     Ok(())
	/// }
	///```
	pub fn from_properties(text: &str) -> Result<Self, Error> {
		let mut config = LogConfig::default();
		let mut levels = vec![];

		for (i, line) in text.lines().enumerate() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
				continue;
			}
			let (key, value) = match line.split_once('=') {
				Some((key, value)) => (key.trim(), value.trim()),
				None => {
					return Err(err!(
						ErrKind::Configuration,
						format!("line {}: expected 'key = value', found '{}'", i + 1, line)
					))
				}
			};

			match key {
				"root.level" => config.root_level = LogConfigOption::RootLevel(value.parse()?),
				"stdout" => config.stdout = LogConfigOption::Stdout(parse_bool(key, value)?),
				"colors" => config.colors = LogConfigOption::Colors(parse_bool(key, value)?),
				"timestamp" => {
					config.timestamp = LogConfigOption::Timestamp(parse_bool(key, value)?)
				}
				"level" => config.level = LogConfigOption::Level(parse_bool(key, value)?),
				"line_num" => config.line_num = LogConfigOption::LineNum(parse_bool(key, value)?),
				"show_millis" => {
					config.show_millis = LogConfigOption::ShowMillis(parse_bool(key, value)?)
				}
				"logger_name" => {
					config.logger_name = LogConfigOption::LoggerName(parse_bool(key, value)?)
				}
				"mdc" => config.mdc = LogConfigOption::Mdc(parse_bool(key, value)?),
				"lwp" => config.lwp = LogConfigOption::Lwp(parse_bool(key, value)?),
				"file" => {
					config.file_path = match value.is_empty() {
						true => LogConfigOption::FilePath(None),
						false => LogConfigOption::FilePath(Some(PathBuf::from(value))),
					}
				}
				"line_num_data_max_len" => {
					let len = map_err!(
						value.parse::<usize>(),
						ErrKind::Configuration,
						format!("invalid value for '{}'", key)
					)?;
					config.line_num_data_max_len = LogConfigOption::LineNumDataMaxLen(len);
				}
				_ => {
					let name = key
						.strip_prefix("logger.")
						.and_then(|k| k.strip_suffix(".level"));
					match name {
						Some(name) if !name.is_empty() => {
							let level: LogLevel = value.parse()?;
							levels.push((name.to_string(), level));
						}
						_ => {
							return Err(err!(
								ErrKind::Configuration,
								format!("line {}: unknown key '{}'", i + 1, key)
							))
						}
					}
				}
			}
		}

		config.levels = LogConfigOption::Levels(levels);
		Ok(config)
	}

	/// Return the option stored under `name`.
	pub fn get_config_option(&self, name: LogConfigOptionName) -> &LogConfigOption {
		match name {
			LogConfigOptionName::Colors => &self.colors,
			LogConfigOptionName::Stdout => &self.stdout,
			LogConfigOptionName::Timestamp => &self.timestamp,
			LogConfigOptionName::Level => &self.level,
			LogConfigOptionName::LineNum => &self.line_num,
			LogConfigOptionName::ShowMillis => &self.show_millis,
			LogConfigOptionName::LoggerName => &self.logger_name,
			LogConfigOptionName::Mdc => &self.mdc,
			LogConfigOptionName::Lwp => &self.lwp,
			LogConfigOptionName::FilePath => &self.file_path,
			LogConfigOptionName::LineNumDataMaxLen => &self.line_num_data_max_len,
			LogConfigOptionName::RootLevel => &self.root_level,
			LogConfigOptionName::Levels => &self.levels,
		}
	}

	/// Store `value` in the field that matches its variant.
	pub fn set_config_option(&mut self, value: LogConfigOption) {
		match value {
			LogConfigOption::Colors(_) => self.colors = value,
			LogConfigOption::Stdout(_) => self.stdout = value,
			LogConfigOption::Timestamp(_) => self.timestamp = value,
			LogConfigOption::Level(_) => self.level = value,
			LogConfigOption::LineNum(_) => self.line_num = value,
			LogConfigOption::ShowMillis(_) => self.show_millis = value,
			LogConfigOption::LoggerName(_) => self.logger_name = value,
			LogConfigOption::Mdc(_) => self.mdc = value,
			LogConfigOption::Lwp(_) => self.lwp = value,
			LogConfigOption::FilePath(_) => self.file_path = value,
			LogConfigOption::LineNumDataMaxLen(_) => self.line_num_data_max_len = value,
			LogConfigOption::RootLevel(_) => self.root_level = value,
			LogConfigOption::Levels(_) => self.levels = value,
		}
	}
}

impl Registry {
	/// Apply `config`: all logger levels are cleared, all appenders are removed, and then
	/// the thresholds and appenders described by `config` are installed. On error
	/// nothing is changed.
	pub fn configure_with(self: &Arc<Self>, config: LogConfig) -> Result<(), Error> {
		check_config(&config)?;
		let layout = Layout::from_checked(&config);

		let mut appenders: Vec<Arc<dyn Appender>> = vec![];
		if config.stdout == LogConfigOption::Stdout(true) {
			appenders.push(Arc::new(ConsoleAppender::new(layout.clone())));
		}
		if let LogConfigOption::FilePath(Some(path)) = &config.file_path {
			appenders.push(Arc::new(FileAppender::open(path, layout)?));
		}

		let mut loggers = vec![];
		if let LogConfigOption::Levels(levels) = &config.levels {
			for (name, level) in levels {
				loggers.push((self.get_logger(name)?, *level));
			}
		}

		self.reset()?;
		if let LogConfigOption::RootLevel(level) = config.root_level {
			self.root.set_level(Some(level));
		}
		for (logger, level) in loggers {
			logger.set_level(level);
		}
		for appender in appenders {
			self.add_appender(appender)?;
		}
		*lockw!(self.config)? = config;
		Ok(())
	}

	/// Apply the basic configuration: one console appender and a root threshold of
	/// [`INFO`].
	pub fn configure_basic(self: &Arc<Self>) -> Result<(), Error> {
		self.configure_with(LogConfig::default())
	}

	/// Apply a configuration given as properties text. See [`LogConfig::from_properties`].
	/// Malformed text is a Configuration error and leaves the current configuration in
	/// place.
	pub fn configure_prop(self: &Arc<Self>, text: &str) -> Result<(), Error> {
		let config = LogConfig::from_properties(text)?;
		self.configure_with(config)
	}

	/// Apply the properties file at `path`. If the file cannot be read or applied, the
	/// basic configuration is used instead and the problem is logged to the `hlog`
	/// logger.
	pub fn configure_file(self: &Arc<Self>, path: &Path) -> Result<(), Error> {
		let res = map_err!(
			read_to_string(path),
			ErrKind::Configuration,
			format!("could not read '{}'", path.display())
		)
		.and_then(|text| self.configure_prop(&text));

		match res {
			Ok(_) => Ok(()),
			Err(e) => {
				self.configure_basic()?;
				let logger = self.get_logger(HLOG_LOGGER)?;
				warn!(
					logger: &logger,
					"using basic configuration, {}: {}",
					path.display(),
					e.kind()
				)
			}
		}
	}

	/// Apply the file named by the `HLOG_CONFIG` environment variable, or the basic
	/// configuration if it is unset or empty.
	pub fn configure_from_env(self: &Arc<Self>) -> Result<(), Error> {
		match std::env::var(HLOG_CONFIG_ENV) {
			Ok(path) if !path.trim().is_empty() => self.configure_file(Path::new(path.trim())),
			_ => {
				self.configure_basic()?;
				let logger = self.get_logger(HLOG_LOGGER)?;
				debug!(
					logger: &logger,
					"{} not set, using basic configuration", HLOG_CONFIG_ENV
				)
			}
		}
	}

	/// Return the configuration option `name` of the configuration last applied.
	pub fn get_config_option(&self, name: LogConfigOptionName) -> Result<LogConfigOption, Error> {
		Ok(lockr!(self.config)?.get_config_option(name).clone())
	}

	/// Return a copy of the configuration last applied.
	pub fn config(&self) -> Result<LogConfig, Error> {
		Ok(lockr!(self.config)?.clone())
	}
}
