//! Per-resource busy flags
//!
//! The display and each edge pin can run at most one deferred job. A job
//! holds a [`Lease`] for its resource; the flag is cleared when the lease is
//! dropped, whichever way the job ends.
//!
//! Each flag stores the token of its current holder (0 = free). `reset`
//! clears every flag while jobs may still be running; a stale lease only
//! clears a flag that still carries its own token, so it never releases a
//! newer holder.

use portable_atomic::{AtomicU32, Ordering};

use crate::pin::{PinId, PIN_COUNT};

const FREE: u32 = 0;

/// Busy flags for the display and the edge pins
pub struct BusyRegistry {
    display: AtomicU32,
    pins: [AtomicU32; PIN_COUNT],
    next_token: AtomicU32,
}

impl BusyRegistry {
    pub const fn new() -> Self {
        Self {
            display: AtomicU32::new(FREE),
            pins: [AtomicU32::new(FREE), AtomicU32::new(FREE), AtomicU32::new(FREE)],
            next_token: AtomicU32::new(1),
        }
    }

    fn issue_token(&self) -> u32 {
        loop {
            let token = self.next_token.fetch_add(1, Ordering::Relaxed);
            if token != FREE {
                return token;
            }
        }
    }

    fn acquire<'a>(&'a self, slot: &'a AtomicU32) -> Option<Lease<'a>> {
        let token = self.issue_token();
        slot.compare_exchange(FREE, token, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Lease { slot, token })
    }

    /// Mark the display busy, or `None` if a display job already holds it
    pub fn try_acquire_display(&self) -> Option<Lease<'_>> {
        self.acquire(&self.display)
    }

    /// Mark a pin busy, or `None` if a tone job already holds it
    pub fn try_acquire_pin(&self, pin: PinId) -> Option<Lease<'_>> {
        self.acquire(&self.pins[pin.index()])
    }

    pub fn is_display_busy(&self) -> bool {
        self.display.load(Ordering::Acquire) != FREE
    }

    pub fn is_pin_busy(&self, pin: PinId) -> bool {
        self.pins[pin.index()].load(Ordering::Acquire) != FREE
    }

    /// Clear every flag
    pub fn reset(&self) {
        self.display.store(FREE, Ordering::Release);
        for pin in &self.pins {
            pin.store(FREE, Ordering::Release);
        }
    }
}

impl Default for BusyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive claim on one resource, released on drop
#[must_use = "dropping a lease releases the resource immediately"]
pub struct Lease<'a> {
    slot: &'a AtomicU32,
    token: u32,
}

impl Lease<'_> {
    /// Whether the flag still carries this lease's token
    pub fn is_current(&self) -> bool {
        self.slot.load(Ordering::Acquire) == self.token
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        let _ = self
            .slot
            .compare_exchange(self.token, FREE, Ordering::AcqRel, Ordering::Acquire);
    }
}

impl core::fmt::Debug for Lease<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lease").field("token", &self.token).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_exclusive() {
        let busy = BusyRegistry::new();
        let lease = busy.try_acquire_display();
        assert!(lease.is_some());
        assert!(busy.is_display_busy());
        assert!(busy.try_acquire_display().is_none());
        drop(lease);
        assert!(!busy.is_display_busy());
        assert!(busy.try_acquire_display().is_some());
    }

    #[test]
    fn test_pins_independent() {
        let busy = BusyRegistry::new();
        let _p0 = busy.try_acquire_pin(PinId::P0).unwrap();
        assert!(busy.try_acquire_pin(PinId::P0).is_none());
        assert!(busy.try_acquire_pin(PinId::P1).is_some());
        assert!(!busy.is_display_busy());
    }

    #[test]
    fn test_reset_clears_all() {
        let busy = BusyRegistry::new();
        let _d = busy.try_acquire_display().unwrap();
        let _p = busy.try_acquire_pin(PinId::P2).unwrap();
        busy.reset();
        assert!(!busy.is_display_busy());
        assert!(!busy.is_pin_busy(PinId::P2));
    }

    #[test]
    fn test_stale_lease_does_not_release_new_holder() {
        let busy = BusyRegistry::new();
        let stale = busy.try_acquire_display().unwrap();
        busy.reset();
        let fresh = busy.try_acquire_display().unwrap();
        assert!(!stale.is_current());
        drop(stale);
        assert!(busy.is_display_busy());
        assert!(fresh.is_current());
        drop(fresh);
        assert!(!busy.is_display_busy());
    }
}
