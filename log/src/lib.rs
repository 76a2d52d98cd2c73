// Copyright (c) 2022, 37 Miners, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Hierarchical logging. Loggers are named with dotted names (`svc.db.pool`) and inherit
//! their threshold from the nearest ancestor that has one. Code that does not name a
//! logger logs to the "default logger", which starts out as the root logger and is
//! changed by pushing and popping context names with [`push_context`] and
//! [`pop_context`] (or the [`LogContextGuard`] scope guard). Each thread has a mapped
//! diagnostic context ([`mdc`]) that is attached to every record it emits, and hooks
//! registered with [`mdc_register_init`] seed it once per thread before that thread's
//! first record.
//!
//! The crate has a macro for each of the 6 levels: [`trace`], [`debug`], [`info`],
//! [`warn`], [`error`] and [`fatal`], each with a stream style variant such as
//! [`info_stream`]. Every macro checks the threshold before its arguments are evaluated
//! and returns a `Result` so you will have to add the error handling, which can be as
//! simple as using the question mark operator.
//!
//! The process wide registry is configured on first use from the properties file named
//! by the `HLOG_CONFIG` environment variable, or with a basic configuration that logs
//! INFO and above to standard output. See [`LogConfig`] and [`configure_prop`]. The
//! [`LogBridge`] and [`HostLogAppender`] connect the hierarchy with the
//! [log](https://docs.rs/log/latest/log/) crate in both directions.
//!
//! The default output will look something like this:
//!
//! ```text
//! [2022-02-24 13:52:24.123]: (FATAL) root: fatal
//! [2022-02-24 13:52:24.123]: (ERROR) svc: error {REQ=17}
//! [2022-02-24 13:52:24.123]: (WARN) svc.db: warn {REQ=17}
//! [2022-02-24 13:52:24.123]: (INFO) svc.db: info {REQ=17}
//! ```
//!
//! # Examples
//!
//!```
//! use hlog::*;
//! use hlog_err::Error;
//!
//! fn handle_request(id: u64) -> Result<(), Error> {
//!     let _ctx = LogContextGuard::new("svc")?;
//!     mdc("REQ", &id.to_string());
//!     info!("handling request")?;
//!     debug_stream!("request id=", id)?;
//!     warn!(logger: "svc.db", "slow query: {}ms", 230)?;
//!     Ok(())
//! }
//!
//! handle_request(17).unwrap();
//! assert_eq!(default_logger_name(), "");
//!```

#[macro_use]
mod macros;

mod appender;
mod bridge;
mod config;
mod context;
mod global;
mod level;
mod log;
mod lwp;
mod mdc;
mod registry;
#[cfg(test)]
mod test_util;
mod types;

pub use crate::appender::{ConsoleAppender, FileAppender};
pub use crate::bridge::{
	do_not_use_host_logging, use_host_logging, HostLogAppender, HostLogging, LogBridge,
};
pub use crate::config::{HLOG_CONFIG_ENV, HLOG_LOGGER};
pub use crate::global::{
	configure, configure_file, configure_prop, configure_with, default_logger,
	default_logger_name, get_effective_level, get_level, get_logger, is_enabled_for,
	pop_context, push_context, registry, root_logger, set_level,
};
pub use crate::lwp::lwp_id;
pub use crate::mdc::{mdc, mdc_get, mdc_register_init, mdc_remove};
pub use crate::types::{
	Appender, ContextScope, Layout, Location, LogConfig, LogConfigOption, LogConfigOptionName,
	LogContext, LogContextGuard, LogLevel, Logger, LoggerArg, Record, Registry, DEBUG, ERROR,
	FATAL, INFO, TRACE, WARN,
};
