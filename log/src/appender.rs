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

use crate::config::check_config;
use crate::registry::ROOT_NAME;
use crate::types::{Appender, Layout, LogConfig, LogConfigOption, Record};
use crate::types::{DEBUG, ERROR, FATAL, INFO, WARN};
use hlog_deps::colored::Colorize;
use hlog_err::{map_err, ErrKind, Error};
use std::fmt::Write as FmtWrite;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

impl Layout {
	/// Build a layout from the display options of `config`.
	pub fn new(config: &LogConfig) -> Result<Self, Error> {
		check_config(config)?;
		Ok(Self::from_checked(config))
	}

	pub(crate) fn from_checked(config: &LogConfig) -> Self {
		Self {
			colors: config.colors == LogConfigOption::Colors(true),
			timestamp: config.timestamp == LogConfigOption::Timestamp(true),
			level: config.level == LogConfigOption::Level(true),
			line_num: config.line_num == LogConfigOption::LineNum(true),
			show_millis: config.show_millis == LogConfigOption::ShowMillis(true),
			logger_name: config.logger_name == LogConfigOption::LoggerName(true),
			mdc: config.mdc == LogConfigOption::Mdc(true),
			lwp: config.lwp == LogConfigOption::Lwp(true),
			line_num_data_max_len: match config.line_num_data_max_len {
				LogConfigOption::LineNumDataMaxLen(len) => len,
				_ => 25,
			},
		}
	}

	/// Return a copy of this layout with colors turned off.
	pub fn without_colors(&self) -> Self {
		let mut ret = self.clone();
		ret.colors = false;
		ret
	}

	/// Render a record as a single line without the trailing newline.
	pub fn format(&self, record: &Record) -> String {
		let mut line = String::new();

		if self.timestamp {
			let ts = match self.show_millis {
				true => record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
				false => record.timestamp.format("%Y-%m-%d %H:%M:%S"),
			};
			let _ = write!(line, "[{}]: ", ts);
		}

		if self.level {
			let name = record.level.as_str();
			match self.colors {
				true => {
					let colored = match record.level {
						FATAL => name.bright_red(),
						ERROR => name.red(),
						WARN => name.yellow(),
						INFO => name.green(),
						DEBUG => name.cyan(),
						_ => name.magenta(),
					};
					let _ = write!(line, "({}) ", colored);
				}
				false => {
					let _ = write!(line, "({}) ", name);
				}
			}
		}

		if self.lwp {
			let _ = write!(line, "<{}> ", record.lwp);
		}

		if self.line_num {
			let location = format!("{}:{}", record.location.file, record.location.line);
			let _ = write!(
				line,
				"[{}]: ",
				truncate_location(&location, self.line_num_data_max_len)
			);
		}

		if self.logger_name {
			match record.logger.is_empty() {
				true => line.push_str(ROOT_NAME),
				false => line.push_str(&record.logger),
			}
			line.push_str(": ");
		}

		line.push_str(&record.message);

		if self.mdc && !record.mdc.is_empty() {
			line.push_str(" {");
			for (i, (k, v)) in record.mdc.iter().enumerate() {
				if i > 0 {
					line.push_str(", ");
				}
				let _ = write!(line, "{}={}", k, v);
			}
			line.push('}');
		}

		line
	}
}

// keep the tail of the path, it is the informative part
fn truncate_location(location: &str, max_len: usize) -> String {
	if location.len() <= max_len {
		return location.to_string();
	}
	let keep = max_len.saturating_sub(2);
	let skip = location.len() - keep;
	let start = (skip..location.len())
		.find(|i| location.is_char_boundary(*i))
		.unwrap_or(location.len());
	format!("..{}", &location[start..])
}

/// Writes records to standard output.
pub struct ConsoleAppender {
	layout: Layout,
}

impl ConsoleAppender {
	pub fn new(layout: Layout) -> Self {
		Self { layout }
	}
}

impl Appender for ConsoleAppender {
	fn append(&self, record: &Record) -> Result<(), Error> {
		let line = self.layout.format(record);
		let stdout = std::io::stdout();
		let mut stdout = stdout.lock();
		writeln!(stdout, "{}", line)?;
		Ok(())
	}

	fn flush(&self) -> Result<(), Error> {
		std::io::stdout().flush()?;
		Ok(())
	}
}

/// Appends records to a file. The file is created if it does not exist. Colors are never
/// written to files.
pub struct FileAppender {
	layout: Layout,
	path: PathBuf,
	file: Mutex<File>,
}

impl FileAppender {
	pub fn open(path: &Path, layout: Layout) -> Result<Self, Error> {
		let file = map_err!(
			OpenOptions::new().create(true).append(true).open(path),
			ErrKind::IO,
			format!("could not open log file '{}'", path.display())
		)?;
		Ok(Self {
			layout: layout.without_colors(),
			path: path.to_path_buf(),
			file: Mutex::new(file),
		})
	}

	/// The path of the file records are appended to.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Appender for FileAppender {
	fn append(&self, record: &Record) -> Result<(), Error> {
		let line = self.layout.format(record);
		let mut file = self.file.lock()?;
		map_err!(writeln!(file, "{}", line), ErrKind::IO)?;
		Ok(())
	}

	fn flush(&self) -> Result<(), Error> {
		let mut file = self.file.lock()?;
		map_err!(file.flush(), ErrKind::IO)?;
		Ok(())
	}
}
