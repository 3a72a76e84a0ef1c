/*
 * This file is part of pmm, a standalone physical memory manager crate.
 * Copyright (C) 2024 pmm contributors
 *
 * Licensed under the GNU Lesser General Public License, version 3 or
 * (at your option) any later version. See the LICENSE file for details.
 */

//! Stable numeric status codes returned by every fallible operation.
//!
//! The crate never panics or unwinds on caller misuse; every public
//! operation returns a [`Status`] instead. The numeric values are part of
//! the public contract (they are sometimes passed across an FFI boundary
//! by callers), so variants must keep the discriminants below fixed.

use core::fmt;

/// Result of a public [`crate::Pmm`] operation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	/// The operation completed successfully.
	Ok = 0,
	/// No block at the requested order (or larger) is free.
	Oom = 1,
	/// Malformed arguments: zero size, bad range, bad `min_block`, oversized free.
	Invalid = 2,
	/// Operation attempted on an uninitialized allocator.
	NotInit = 3,
	/// `init` called twice without an intervening `shutdown`.
	AlreadyInit = 4,
	/// `free`'s address is not aligned to its inferred order.
	NotAligned = 5,
	/// `free`'s address lies outside `[base, limit)`.
	OutOfRange = 6,
	/// Internal: an expected buddy was absent. Reserved for future use.
	NotFound = 7,
}

impl Status {
	/// Returns `true` for [`Status::Ok`].
	#[inline]
	#[must_use]
	pub const fn is_ok(self) -> bool {
		matches!(self, Status::Ok)
	}

	/// The stable numeric code, as documented in the crate's external interface.
	#[inline]
	#[must_use]
	pub const fn code(self) -> u8 {
		self as u8
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let msg = match self {
			Status::Ok => "success",
			Status::Oom => "no block at the requested order or larger is free",
			Status::Invalid => "malformed arguments",
			Status::NotInit => "allocator not initialized",
			Status::AlreadyInit => "allocator already initialized",
			Status::NotAligned => "address not aligned to its inferred order",
			Status::OutOfRange => "address outside the managed range",
			Status::NotFound => "expected buddy not found",
		};
		f.write_str(msg)
	}
}
