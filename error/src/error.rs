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

use hlog_deps::failure::{Backtrace, Context, Fail};
use std::fmt::{Display, Formatter, Result};
use std::num::ParseIntError;
use std::sync::{MutexGuard, PoisonError, RwLockReadGuard, RwLockWriteGuard};

/// Base Error struct which is used throughout hlog.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

impl PartialEq for Error {
	fn eq(&self, r: &Error) -> bool {
		r.kind() == self.kind()
	}
}

/// Kinds of errors that can occur.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// IO Error
	#[fail(display = "IO Error: {}", _0)]
	IO(String),
	/// Log Error
	#[fail(display = "Log Error: {}", _0)]
	Log(String),
	/// Configuration Error
	#[fail(display = "Configuration Error: {}", _0)]
	Configuration(String),
	/// Poison error multiple locks
	#[fail(display = "Poison Error: {}", _0)]
	Poison(String),
	/// IllegalArgument
	#[fail(display = "IllegalArgument: {}", _0)]
	IllegalArgument(String),
	/// Illegal State
	#[fail(display = "Illegal State Error: {}", _0)]
	IllegalState(String),
	/// Miscellaneous Error
	#[fail(display = "Miscellaneous Error: {}", _0)]
	Misc(String),
}

/// The names of ErrorKinds in this crate. This enum is used to map to error
/// names using the [`crate::err`] and [`crate::map_err`] macros.
pub enum ErrKind {
	/// IO Error
	IO,
	/// An appender or the logging engine failed
	Log,
	/// Configuration error
	Configuration,
	/// Attempt to obtain a lock resulted in a poison error. See [`std::sync::PoisonError`]
	/// for further details
	Poison,
	/// Illegal argument was specified
	IllegalArgument,
	/// Application is in an illegal state
	IllegalState,
	/// A Miscellaneous Error occurred
	Misc,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		let output = format!("{} \n Backtrace: {:?}", self.inner, self.backtrace());
		Display::fmt(&output, f)
	}
}

impl Error {
	/// get the kind of error that occurred.
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}

	/// get the cause (if available) of this error.
	pub fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	/// get the backtrace (if available) of this error.
	pub fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}

	/// get the inner error as a string.
	pub fn inner(&self) -> String {
		self.inner.to_string()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Error {
		Error {
			inner: Context::new(ErrorKind::IO(format!("{}", e))),
		}
	}
}

impl From<ParseIntError> for Error {
	fn from(e: ParseIntError) -> Error {
		Error {
			inner: Context::new(ErrorKind::Misc(format!("ParseIntError: {}", e))),
		}
	}
}

impl From<std::fmt::Error> for Error {
	fn from(e: std::fmt::Error) -> Error {
		Error {
			inner: Context::new(ErrorKind::Log(format!("formatting failed: {}", e))),
		}
	}
}

impl<T> From<PoisonError<RwLockWriteGuard<'_, T>>> for Error {
	fn from(e: PoisonError<RwLockWriteGuard<'_, T>>) -> Error {
		Error {
			inner: Context::new(ErrorKind::Poison(format!("Poison error: {}", e))),
		}
	}
}

impl<T> From<PoisonError<RwLockReadGuard<'_, T>>> for Error {
	fn from(e: PoisonError<RwLockReadGuard<'_, T>>) -> Error {
		Error {
			inner: Context::new(ErrorKind::Poison(format!("Poison error: {}", e))),
		}
	}
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
	fn from(e: PoisonError<MutexGuard<'_, T>>) -> Error {
		Error {
			inner: Context::new(ErrorKind::Poison(format!("Poison error: {}", e))),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::{err, ErrKind, Error, ErrorKind};
	use std::fmt::{Display, Formatter};
	use std::sync::{Arc, Mutex, RwLock};

	struct Unprintable;

	impl Display for Unprintable {
		fn fmt(&self, _: &mut Formatter<'_>) -> std::fmt::Result {
			Err(std::fmt::Error)
		}
	}

	fn check_error<T: Sized, Q>(r: Result<T, Q>, ematch: Error) -> Result<(), Error>
	where
		crate::Error: From<Q>,
	{
		if let Err(r) = r {
			let e: Error = r.into();

			// The os specific text differs between platforms, the prefix is fixed by the kind.
			let prefix: String = ematch.inner().chars().take(10).collect();
			assert!(e.to_string().starts_with(&prefix));
			assert!(e.kind().to_string().starts_with(&prefix));
			assert!(e.inner().starts_with(&prefix));
			assert!(e.cause().is_none());
			println!("e={}", e);
		} else {
			panic!("expected an error");
		}
		Ok(())
	}

	#[test]
	fn test_errors() -> Result<(), Error> {
		check_error(
			std::fs::File::open("/no/path/here"),
			ErrorKind::IO("No such file or directory (os error 2)".to_string()).into(),
		)?;

		let x: Result<u32, _> = "abc".parse();
		check_error(x, ErrorKind::Misc(format!("ParseIntError..")).into())?;

		let mut msg = String::new();
		check_error(
			std::fmt::Write::write_fmt(&mut msg, format_args!("{}", Unprintable)),
			ErrorKind::Log(format!("formatting..")).into(),
		)?;

		Ok(())
	}

	#[test]
	fn test_poison_errors() -> Result<(), Error> {
		let mutex = Arc::new(Mutex::new(0));
		let mutex_clone = mutex.clone();
		let lock = Arc::new(RwLock::new(0));
		let lock_clone = lock.clone();
		let _ = std::thread::spawn(move || -> Result<u32, Error> {
			let _mutex = mutex_clone.lock();
			let _x = lock.write();
			let y: Option<u32> = None;
			Ok(y.unwrap())
		})
		.join();

		check_error(
			lock_clone.write(),
			ErrorKind::Poison(format!("Poison..")).into(),
		)?;

		check_error(
			lock_clone.read(),
			ErrorKind::Poison(format!("Poison..")).into(),
		)?;

		check_error(mutex.lock(), ErrorKind::Poison(format!("Poison..")).into())?;

		let x = err!(ErrKind::Poison, "");
		let y = err!(ErrKind::IllegalArgument, "");
		let z = err!(ErrKind::Poison, "");

		assert_ne!(x, y);
		assert_eq!(x, z);

		Ok(())
	}

	#[test]
	fn test_display_kinds() -> Result<(), Error> {
		let e = err!(ErrKind::IllegalArgument, "empty context name not allowed");
		assert_eq!(
			e.kind().to_string(),
			"IllegalArgument: empty context name not allowed"
		);
		assert_eq!(e.inner(), "IllegalArgument: empty context name not allowed");
		let e = err!(ErrKind::Configuration, "bad key");
		assert_eq!(e.kind(), ErrorKind::Configuration("bad key".to_string()));
		Ok(())
	}
}
