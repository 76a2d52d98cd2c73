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

use crate::registry::ROOT_NAME;
use crate::types::{ContextScope, LogContext, Logger, Registry};
use hlog_err::{err, ErrKind, Error};
use std::ops::Deref;
use std::sync::Arc;

pub(crate) fn check_context_name(name: &str) -> Result<(), Error> {
	if name.is_empty() {
		return Err(err!(
			ErrKind::IllegalArgument,
			"empty context name not allowed"
		));
	}
	if name.contains('.') {
		return Err(err!(
			ErrKind::IllegalArgument,
			format!("multi-level contexts are not allowed: {}", name)
		));
	}
	// "root" names the root logger, pushing it would not extend the name
	if name == ROOT_NAME {
		return Err(err!(
			ErrKind::IllegalArgument,
			format!("reserved context name not allowed: {}", name)
		));
	}
	Ok(())
}

impl LogContext {
	/// Create a context whose default logger is the root logger of `registry`.
	pub fn new(registry: &Arc<Registry>) -> Self {
		Self {
			default_logger: registry.root_logger(),
		}
	}

	/// The logger used by code that does not name one.
	pub fn default_logger(&self) -> &Logger {
		&self.default_logger
	}

	/// The name of the default logger; the empty string when it is the root logger.
	pub fn default_logger_name(&self) -> &str {
		self.default_logger.name()
	}

	/// Append `name` to the default logger's name: from the root logger the default
	/// logger becomes `name`, otherwise `<current>.<name>`. The name must be non empty
	/// must not contain a `.` and must not be the reserved name `root`; otherwise an
	/// IllegalArgument error is returned and the default logger is left unchanged.
	///
	///```
	/// use hlog::*;
	/// use hlog_err::Error;
	///
	/// fn main() -> Result<(), Error> {
	///     let mut ctx = LogContext::new(&Registry::new());
	///     ctx.push_context("x")?;
	///     ctx.push_context("y")?;
	///     assert_eq!(ctx.default_logger_name(), "x.y");
	///     assert!(ctx.push_context("a.b").is_err());
	///     ctx.pop_context();
	///     assert_eq!(ctx.default_logger_name(), "x");
	///     Ok(())
	/// }
	///```
	pub fn push_context(&mut self, name: &str) -> Result<(), Error> {
		check_context_name(name)?;
		let logger = self.default_logger.child(name)?;
		self.default_logger = logger;
		Ok(())
	}

	/// Make the parent of the default logger the new default logger. Popping when the
	/// default logger is the root logger does nothing.
	pub fn pop_context(&mut self) {
		if let Some(parent) = self.default_logger.parent() {
			self.default_logger = parent;
		}
	}

	/// Make the root logger the default logger again.
	pub fn reset(&mut self) {
		self.default_logger = self.default_logger.registry().root_logger();
	}

	/// Push `name` and return a guard that pops it when dropped. Fails like
	/// [`LogContext::push_context`].
	///
	///```
	/// use hlog::*;
	/// use hlog_err::Error;
	///
	/// fn main() -> Result<(), Error> {
	///     let mut ctx = LogContext::new(&Registry::new());
	///     {
	///         let mut outer = ctx.scoped("svc")?;
	///         let inner = outer.scoped("db")?;
	///         assert_eq!(inner.default_logger_name(), "svc.db");
	///     }
	///     assert_eq!(ctx.default_logger_name(), "");
	///     Ok(())
	/// }
	///```
	pub fn scoped(&mut self, name: &str) -> Result<ContextScope<'_>, Error> {
		self.push_context(name)?;
		Ok(ContextScope { context: self })
	}
}

impl ContextScope<'_> {
	/// Push a nested scope on the same context. See [`LogContext::scoped`].
	pub fn scoped(&mut self, name: &str) -> Result<ContextScope<'_>, Error> {
		self.context.scoped(name)
	}
}

impl Deref for ContextScope<'_> {
	type Target = LogContext;
	fn deref(&self) -> &LogContext {
		self.context
	}
}

impl Drop for ContextScope<'_> {
	fn drop(&mut self) {
		self.context.pop_context();
	}
}
