/*
 * This file is part of pmm, a standalone physical memory manager crate.
 * Copyright (C) 2024 pmm contributors
 *
 * Licensed under the GNU Lesser General Public License, version 3 or
 * (at your option) any later version. See the LICENSE file for details.
 */

//! Read-only queries and the structural validator used by tests (and
//! available to any caller that wants a consistency check).
//!
//! None of this allocates: freelist snapshots are handed back as
//! iterators over link-word chains, never collected into an owned
//! buffer, matching the no-auxiliary-table design of the freelist
//! itself.

use crate::addr::order_to_size;
use crate::allocator::Pmm;
use crate::status::Status;

impl Pmm {
	/// Whether `init` has been called without a subsequent `shutdown`.
	#[inline]
	#[must_use]
	pub fn is_initialized(&self) -> bool {
		self.is_inited()
	}

	/// The managed range's inclusive lower bound. `0` if uninitialized.
	#[inline]
	#[must_use]
	pub fn base(&self) -> u64 {
		self.base_raw()
	}

	/// The managed range's exclusive upper bound. `0` if uninitialized.
	#[inline]
	#[must_use]
	pub fn limit(&self) -> u64 {
		self.limit_raw()
	}

	/// `limit - base`.
	#[inline]
	#[must_use]
	pub fn size(&self) -> u64 {
		self.limit_raw() - self.base_raw()
	}

	/// The block size `B` passed to `init` (or [`crate::allocator::DEFAULT_MIN_BLOCK`]
	/// if uninitialized).
	#[inline]
	#[must_use]
	pub fn min_block(&self) -> u64 {
		self.min_block_raw()
	}

	/// The largest order currently tracked, `O_max`.
	#[inline]
	#[must_use]
	pub fn order_max(&self) -> usize {
		self.order_max_raw()
	}

	/// Walks the freelist at `order`, head to tail, without mutating it.
	///
	/// Orders above [`Self::order_max`] are always empty.
	pub fn free_list(&self, order: usize) -> impl Iterator<Item = u64> + '_ {
		// SAFETY: a read-only walk never violates the freelist's invariants.
		unsafe { self.free_lists().iter(order) }
	}

	/// Checks every tracked free block against the allocator's structural
	/// invariants: containment within `[base, limit)`, `min_block`-alignment,
	/// and pairwise disjointness. Returns [`Status::NotInit`] if
	/// uninitialized, [`Status::Invalid`] if any invariant is violated,
	/// otherwise [`Status::Ok`].
	///
	/// This only checks `min_block`-alignment, not the stronger
	/// `S(o)`-alignment a correctly operating allocator always produces;
	/// see the crate's design notes on the weak alignment invariant.
	#[must_use]
	pub fn validate(&self) -> Status {
		if !self.is_inited() {
			return Status::NotInit;
		}

		let base = self.base_raw();
		let limit = self.limit_raw();
		let min_block = self.min_block_raw();
		let order_max = self.order_max_raw();

		for order in 0..=order_max {
			let size = order_to_size(min_block, order);
			for addr in self.free_list(order) {
				if addr < base || addr + size > limit {
					return Status::Invalid;
				}
				if (addr - base) % min_block != 0 {
					return Status::Invalid;
				}
			}
		}

		for o1 in 0..=order_max {
			let s1 = order_to_size(min_block, o1);
			for a1 in self.free_list(o1) {
				for o2 in 0..=order_max {
					let s2 = order_to_size(min_block, o2);
					for a2 in self.free_list(o2) {
						if o1 == o2 && a1 == a2 {
							continue;
						}
						let disjoint = a1 + s1 <= a2 || a2 + s2 <= a1;
						if !disjoint {
							return Status::Invalid;
						}
					}
				}
			}
		}

		Status::Ok
	}

	/// Sum of the sizes of every currently-free block, across all orders.
	#[must_use]
	pub fn free_bytes(&self) -> u64 {
		let min_block = self.min_block_raw();
		(0..=self.order_max_raw())
			.map(|o| {
				let size = order_to_size(min_block, o);
				self.free_list(o).count() as u64 * size
			})
			.sum()
	}
}
