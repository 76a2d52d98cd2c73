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

use crate::types::{LogLevel, DEBUG, ERROR, FATAL, INFO, TRACE, WARN};
use hlog_err::{err, ErrKind, Error};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ascending, the search in to_level relies on it
const LEVELS: [(LogLevel, &str); 6] = [
	(TRACE, "TRACE"),
	(DEBUG, "DEBUG"),
	(INFO, "INFO"),
	(WARN, "WARN"),
	(ERROR, "ERROR"),
	(FATAL, "FATAL"),
];

impl LogLevel {
	/// The TRACE level.
	pub const fn trace() -> Self {
		TRACE
	}
	/// The DEBUG level.
	pub const fn debug() -> Self {
		DEBUG
	}
	/// The INFO level.
	pub const fn info() -> Self {
		INFO
	}
	/// The WARN level.
	pub const fn warn() -> Self {
		WARN
	}
	/// The ERROR level.
	pub const fn error() -> Self {
		ERROR
	}
	/// The FATAL level.
	pub const fn fatal() -> Self {
		FATAL
	}

	/// Map an integer threshold onto one of the six levels. Values between two levels
	/// round up to the next level, so a threshold keeps filtering out everything it
	/// filtered before. Values below [`TRACE`] map to [`TRACE`] and values above
	/// [`FATAL`] map to [`FATAL`]. The mapping is idempotent:
	/// `to_level(to_level(n).to_int()) == to_level(n)`.
	///
	///```
	/// use hlog::{LogLevel, INFO, WARN, FATAL};
	///
	/// assert_eq!(LogLevel::to_level(20_000), INFO);
	/// assert_eq!(LogLevel::to_level(25_000), WARN);
	/// assert_eq!(LogLevel::to_level(i32::MAX), FATAL);
	///```
	pub fn to_level(value: i32) -> Self {
		for (level, _) in LEVELS.iter() {
			if value <= level.0 {
				return *level;
			}
		}
		FATAL
	}

	/// Return the integer value of this level.
	pub fn to_int(&self) -> i32 {
		self.0
	}

	/// Return the upper case name of this level.
	pub fn as_str(&self) -> &'static str {
		LEVELS
			.iter()
			.find(|(level, _)| level == self)
			.map(|(_, name)| *name)
			.unwrap_or("FATAL")
	}
}

impl Display for LogLevel {
	fn fmt(&self, w: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
		write!(w, "{}", self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = Error;

	/// Parse a level name (case insensitive, `WARNING` is accepted for `WARN`) or an
	/// integer threshold.
	fn from_str(s: &str) -> Result<Self, Error> {
		let s = s.trim();
		let upper = s.to_uppercase();
		let upper = match upper.as_str() {
			"WARNING" => "WARN",
			other => other,
		};
		for (level, name) in LEVELS.iter() {
			if *name == upper {
				return Ok(*level);
			}
		}
		match s.parse::<i32>() {
			Ok(value) => Ok(LogLevel::to_level(value)),
			Err(_) => Err(err!(
				ErrKind::Configuration,
				format!("unknown log level: '{}'", s)
			)),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::types::{LogLevel, DEBUG, ERROR, FATAL, INFO, TRACE, WARN};
	use hlog_err::{Error, ErrorKind};

	#[test]
	fn test_accessors() -> Result<(), Error> {
		assert_eq!(LogLevel::trace(), TRACE);
		assert_eq!(LogLevel::debug(), DEBUG);
		assert_eq!(LogLevel::info(), INFO);
		assert_eq!(LogLevel::warn(), WARN);
		assert_eq!(LogLevel::error(), ERROR);
		assert_eq!(LogLevel::fatal(), FATAL);
		assert_eq!(INFO.to_int(), 20_000);
		Ok(())
	}

	#[test]
	fn test_to_level() -> Result<(), Error> {
		assert_eq!(LogLevel::to_level(5_000), TRACE);
		assert_eq!(LogLevel::to_level(10_000), DEBUG);
		assert_eq!(LogLevel::to_level(40_000), ERROR);
		assert_eq!(LogLevel::to_level(i32::MIN), TRACE);
		assert_eq!(LogLevel::to_level(0), TRACE);
		assert_eq!(LogLevel::to_level(10_001), INFO);
		assert_eq!(LogLevel::to_level(49_999), FATAL);
		assert_eq!(LogLevel::to_level(50_001), FATAL);

		for value in [i32::MIN, -1, 0, 4_999, 7_500, 20_000, 33_333, 60_000, i32::MAX] {
			let level = LogLevel::to_level(value);
			assert_eq!(LogLevel::to_level(level.to_int()), level);
		}
		Ok(())
	}

	#[test]
	fn test_parse() -> Result<(), Error> {
		assert_eq!("info".parse::<LogLevel>()?, INFO);
		assert_eq!(" Debug ".parse::<LogLevel>()?, DEBUG);
		assert_eq!("WARNING".parse::<LogLevel>()?, WARN);
		assert_eq!("fatal".parse::<LogLevel>()?, FATAL);
		assert_eq!("30000".parse::<LogLevel>()?, WARN);
		assert_eq!("15000".parse::<LogLevel>()?, INFO);

		let res = "verbose".parse::<LogLevel>();
		assert!(matches!(
			res.unwrap_err().kind(),
			ErrorKind::Configuration(_)
		));
		Ok(())
	}
}
