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

use crate::types::{Appender, Record};
use hlog_deps::lazy_static::lazy_static;
use hlog_err::Error;
use std::sync::{Arc, Mutex, MutexGuard};

lazy_static! {
	static ref SERIAL: Mutex<()> = Mutex::new(());
}

/// Tests that touch the process wide registry or default logger hold this.
pub(crate) fn serial() -> MutexGuard<'static, ()> {
	match SERIAL.lock() {
		Ok(guard) => guard,
		// a failed test must not fail the ones after it
		Err(e) => e.into_inner(),
	}
}

pub(crate) struct CaptureAppender {
	records: Mutex<Vec<Record>>,
}

impl CaptureAppender {
	pub(crate) fn new() -> Arc<Self> {
		Arc::new(Self {
			records: Mutex::new(vec![]),
		})
	}

	pub(crate) fn records(&self) -> Vec<Record> {
		match self.records.lock() {
			Ok(records) => records.clone(),
			Err(e) => e.into_inner().clone(),
		}
	}
}

impl Appender for CaptureAppender {
	fn append(&self, record: &Record) -> Result<(), Error> {
		self.records.lock()?.push(record.clone());
		Ok(())
	}
}
