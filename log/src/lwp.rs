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

#[cfg(not(target_os = "linux"))]
use std::sync::atomic::{AtomicU32, Ordering};

thread_local! {
	static LWP: u32 = next_lwp();
}

/// Return the light weight process id of the calling thread. On linux this is the kernel
/// thread id (the value `top -H` and `/proc/<pid>/task` show). Elsewhere threads are
/// numbered in the order they first call this function, starting at 1.
pub fn lwp_id() -> u32 {
	LWP.with(|lwp| *lwp)
}

#[cfg(target_os = "linux")]
fn next_lwp() -> u32 {
	// gettid cannot fail
	let tid = unsafe { hlog_deps::libc::syscall(hlog_deps::libc::SYS_gettid) };
	tid as u32
}

#[cfg(not(target_os = "linux"))]
fn next_lwp() -> u32 {
	static NEXT: AtomicU32 = AtomicU32::new(1);
	NEXT.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod test {
	use crate::lwp::lwp_id;
	use hlog_err::Error;
	use std::thread::spawn;

	#[test]
	fn test_lwp_id() -> Result<(), Error> {
		let id = lwp_id();
		assert_ne!(id, 0);
		assert_eq!(id, lwp_id());

		let other = spawn(lwp_id).join().unwrap();
		assert_ne!(other, 0);
		assert_ne!(other, id);
		Ok(())
	}

	#[cfg(target_os = "linux")]
	#[test]
	fn test_lwp_is_task_id() -> Result<(), Error> {
		let path = format!("/proc/self/task/{}", lwp_id());
		assert!(std::path::Path::new(&path).exists());
		Ok(())
	}
}
