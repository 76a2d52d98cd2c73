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

//! This crate includes the error structs, enums and macros used by the hlog
//! crates. The errors are wrappers around the rust failure crate. The [`crate::map_err`]
//! macro can be used to conveniently map errors from 3rd party crates
//! into [`crate::ErrorKind`] in this crate. The [`crate::err`] macro
//! can be used to generate errors. In most cases errors should be created
//! using one of these two macros.
//!
//! # Examples
//!```
//! use hlog_err::{Error, ErrorKind, ErrKind, err, map_err};
//! use std::fs::File;
//! use std::io::Read;
//!
//! fn check_context_name(name: &str) -> Result<(), Error> {
//!     if name.is_empty() {
//!         return Err(err!(ErrKind::IllegalArgument, "empty context name not allowed"));
//!     }
//!     Ok(())
//! }
//!
//! fn read_config(path: &str) -> Result<String, Error> {
//!     // map the file open error to a 'Configuration' Error. The text of the original
//!     // error will be included in the mapped error.
//!     let mut file = map_err!(File::open(path), ErrKind::Configuration, "open failed")?;
//!     let mut text = String::new();
//!     file.read_to_string(&mut text)?;
//!     Ok(text)
//! }
//!
//! assert!(check_context_name("").is_err());
//! assert!(read_config("/no/such/hlog.properties").is_err());
//!```

mod error;
mod macros;

pub use crate::error::{ErrKind, Error, ErrorKind};
