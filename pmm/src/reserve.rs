/*
 * This file is part of pmm, a standalone physical memory manager crate.
 * Copyright (C) 2024 pmm contributors
 *
 * Licensed under the GNU Lesser General Public License, version 3 or
 * (at your option) any later version. See the LICENSE file for details.
 */

//! Reservation layer: carving reserved sub-ranges out of the managed
//! region, and re-freeing them later.

use crate::addr::{align_down, align_up, order_to_size, ORDER_HARD_CAP};
use crate::allocator::Pmm;
use crate::partition::partition;
use crate::status::Status;

/// A partially-overlapping free block straddling the reserved range can
/// contribute at most two re-freeable fragments (one on each side) per
/// order, so a top-down sweep across every order needs no more than
/// this many slots — no heap allocation required.
const MAX_REFREE_FRAGMENTS: usize = 2 * ORDER_HARD_CAP;

impl Pmm {
	/// Removes `[s, e)` from the allocator's free capacity, splitting any
	/// partially-overlapping free block so only the overlapping portion is
	/// discarded.
	///
	/// `s`/`e` are clamped to `[base, limit)` and expanded to block
	/// granularity before the freelists are walked.
	pub fn mark_reserved_range(&mut self, s: u64, e: u64) -> Status {
		if !self.is_inited() {
			return Status::NotInit;
		}
		if e <= s {
			return Status::Invalid;
		}

		let base = self.base_raw();
		let limit = self.limit_raw();
		let min_block = self.min_block_raw();

		let s = s.max(base);
		let e = e.min(limit);
		if s >= e {
			return Status::Invalid;
		}

		let s = align_down(s, min_block);
		let e = align_up(e, min_block);

		let order_max = self.order_max_raw();

		// Fragments to re-free are collected here and only replayed once
		// every order has been swept: pushing them back in mid-sweep would
		// race the in-progress top-down walk (see `retain_removing`).
		let mut refree = [(0u64, 0u64); MAX_REFREE_FRAGMENTS];
		let mut refree_len = 0usize;

		for order in (0..=order_max).rev() {
			let size = order_to_size(min_block, order);

			// SAFETY: `retain_removing` captures each block's link word
			// before invoking the closure, so removing the current block
			// from within it never invalidates the walk.
			unsafe {
				self.free_lists_mut().retain_removing(order, |bs| {
					let be = bs + size;
					if be <= s || bs >= e {
						return false; // disjoint from the reserved range
					}

					if bs < s {
						refree[refree_len] = (bs, s);
						refree_len += 1;
					}
					if be > e {
						refree[refree_len] = (e, be);
						refree_len += 1;
					}
					true
				});
			}
		}

		for &(lo, hi) in &refree[..refree_len] {
			self.mark_free_range(lo, hi);
		}

		log::debug!("pmm: mark_reserved_range [{s:#x}, {e:#x})");
		Status::Ok
	}

	/// Re-adds `[s, e)` to the allocator's free capacity via the greedy
	/// partitioner. Does not coalesce with existing neighboring free
	/// blocks; see the crate's design notes.
	pub fn mark_free_range(&mut self, s: u64, e: u64) -> Status {
		if !self.is_inited() {
			return Status::NotInit;
		}
		if e <= s {
			return Status::Invalid;
		}

		let base = self.base_raw();
		let limit = self.limit_raw();
		let min_block = self.min_block_raw();

		let s = s.max(base);
		let e = e.min(limit);
		if s >= e {
			return Status::Invalid;
		}

		let s = align_up(s, min_block);
		let e = align_down(e, min_block);
		if s >= e {
			return Status::Invalid;
		}

		let order_max = self.order_max_raw();
		for block in partition(base, min_block, order_max, s, e) {
			// SAFETY: the partitioner only emits addresses inside `[s, e)`,
			// which the caller has guaranteed is not already tracked.
			unsafe { self.free_lists_mut().push(block.order, block.addr) };
		}

		log::debug!("pmm: mark_free_range [{s:#x}, {e:#x})");
		Status::Ok
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reserve_then_refree_restores_total_free_capacity() {
		let mut pmm = Pmm::new();
		assert_eq!(pmm.init(0x1000, 0x21000, 4096), Status::Ok);
		assert_eq!(pmm.mark_reserved_range(0x5000, 0x7000), Status::Ok);
		assert_eq!(pmm.mark_free_range(0x5000, 0x7000), Status::Ok);
		assert_eq!(pmm.free_bytes(), 0x20000);
	}

	#[test]
	fn reserved_range_is_never_returned_by_alloc() {
		let mut pmm = Pmm::new();
		assert_eq!(pmm.init(0x1000, 0x21000, 4096), Status::Ok);
		assert_eq!(pmm.mark_reserved_range(0x5000, 0x7000), Status::Ok);

		for _ in 0..32 {
			let (status, a) = pmm.alloc(4096);
			if status != Status::Ok {
				break;
			}
			assert!(a + 4096 <= 0x5000 || a >= 0x7000);
		}
	}

	#[test]
	fn mark_reserved_range_on_uninitialized_is_not_init() {
		let mut pmm = Pmm::new();
		assert_eq!(pmm.mark_reserved_range(0, 0x1000), Status::NotInit);
		assert_eq!(pmm.mark_free_range(0, 0x1000), Status::NotInit);
	}

	#[test]
	fn degenerate_range_is_invalid() {
		let mut pmm = Pmm::new();
		pmm.init(0, 0x8000, 4096);
		assert_eq!(pmm.mark_reserved_range(0x1000, 0x1000), Status::Invalid);
		assert_eq!(pmm.mark_free_range(0x1000, 0x1000), Status::Invalid);
	}
}
