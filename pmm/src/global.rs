/*
 * This file is part of pmm, a standalone physical memory manager crate.
 * Copyright (C) 2024 pmm contributors
 *
 * Licensed under the GNU Lesser General Public License, version 3 or
 * (at your option) any later version. See the LICENSE file for details.
 */

//! An optional process-wide singleton, for kernels that want one
//! [`Pmm`] shared across call sites instead of threading a value
//! through explicitly.
//!
//! [`Pmm`] itself has no internal synchronization (see the crate's
//! concurrency notes): every method takes `&mut self`. This module just
//! wraps one in a spinlock and exposes the same operations as free
//! functions, for callers that have a genuine need for shared global
//! state rather than an owned value threaded through their call graph.

use spin::Mutex;

use crate::allocator::Pmm;
use crate::status::Status;

static PMM: Mutex<Pmm> = Mutex::new(Pmm::new());

/// Initializes the global allocator. See [`Pmm::init`].
pub fn init(start: u64, end: u64, min_block: u64) -> Status {
	PMM.lock().init(start, end, min_block)
}

/// Tears down the global allocator. See [`Pmm::shutdown`].
pub fn shutdown() {
	PMM.lock().shutdown();
}

/// Allocates from the global allocator. See [`Pmm::alloc`].
pub fn alloc(nbytes: u64) -> (Status, u64) {
	PMM.lock().alloc(nbytes)
}

/// Frees into the global allocator. See [`Pmm::free`].
pub fn free(addr: u64, nbytes: u64) -> Status {
	PMM.lock().free(addr, nbytes)
}

/// Reserves a sub-range of the global allocator. See [`Pmm::mark_reserved_range`].
pub fn mark_reserved_range(s: u64, e: u64) -> Status {
	PMM.lock().mark_reserved_range(s, e)
}

/// Re-frees a sub-range of the global allocator. See [`Pmm::mark_free_range`].
pub fn mark_free_range(s: u64, e: u64) -> Status {
	PMM.lock().mark_free_range(s, e)
}

/// Runs `f` with exclusive, locked access to the global allocator.
///
/// Useful for introspection queries, which are normally only exposed as
/// `&self` methods on [`Pmm`].
pub fn with_pmm<R>(f: impl FnOnce(&mut Pmm) -> R) -> R {
	f(&mut PMM.lock())
}
