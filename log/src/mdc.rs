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

use hlog_deps::lazy_static::lazy_static;
use hlog_err::Error;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::thread::LocalKey;

type InitHook = Box<dyn Fn() + Send>;

thread_local! {
	static MDC: RefCell<BTreeMap<String, String>> = RefCell::new(BTreeMap::new());
	static MDC_INIT_DONE: Cell<bool> = Cell::new(false);
}

lazy_static! {
	static ref MDC_INIT: Mutex<Vec<InitHook>> = Mutex::new(vec![]);
}

/// Set `key` to `value` in the calling thread's mapped diagnostic context. The MDC is
/// attached to every record the thread emits from now on.
pub fn mdc(key: &str, value: &str) {
	MDC.with(|m| {
		m.borrow_mut().insert(key.to_string(), value.to_string());
	});
}

/// Remove `key` from the calling thread's mapped diagnostic context.
pub fn mdc_remove(key: &str) {
	MDC.with(|m| {
		m.borrow_mut().remove(key);
	});
}

/// Return the calling thread's value for `key`.
pub fn mdc_get(key: &str) -> Option<String> {
	MDC.with(|m| m.borrow().get(key).cloned())
}

pub(crate) fn mdc_snapshot() -> BTreeMap<String, String> {
	MDC.with(|m| m.borrow().clone())
}

/// Register a hook that initializes the MDC of every thread. The hook runs right away
/// in the calling thread and then once in every other thread, before the first record
/// that thread emits. Threads that already emitted a record do not run hooks registered
/// afterwards.
///
/// Hooks run while the hook list is locked. A hook must not panic, register another hook
/// or emit records itself; doing so is undefined. If the hook list can't be locked the
/// calling thread's hooks stay pending and every later record reports the error.
///
/// The returned integer has no meaning. It allows registration from a `lazy_static`
/// initializer.
///
///```
/// use hlog::*;
/// use hlog_err::Error;
///
/// fn main() -> Result<(), Error> {
///     mdc_register_init(|| mdc("THREAD", &lwp_id().to_string()))?;
///     assert!(mdc_get("THREAD").is_some());
///     Ok(())
/// }
///```
pub fn mdc_register_init<F>(f: F) -> Result<i32, Error>
where
	F: Fn() + Send + 'static,
{
	// hooks registered before are due in this thread first
	mdc_init_thread()?;
	let mut hooks = MDC_INIT.lock()?;
	f();
	hooks.push(Box::new(f));
	Ok(1)
}

/// Run the registered hooks in the calling thread unless that already happened.
pub(crate) fn mdc_init_thread() -> Result<(), Error> {
	init_thread_with(&MDC_INIT, &MDC_INIT_DONE)
}

fn init_thread_with(
	hooks: &Mutex<Vec<InitHook>>,
	done: &'static LocalKey<Cell<bool>>,
) -> Result<(), Error> {
	// set before the sweep so a hook that logs does not start it again
	if done.with(|done| done.replace(true)) {
		return Ok(());
	}
	let hooks = match hooks.lock() {
		Ok(hooks) => hooks,
		Err(e) => {
			// nothing ran, the sweep is still due
			done.with(|done| done.set(false));
			return Err(e.into());
		}
	};
	for hook in hooks.iter() {
		hook();
	}
	Ok(())
}
