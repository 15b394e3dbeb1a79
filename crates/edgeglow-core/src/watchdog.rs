#![forbid(unsafe_code)]

//! Deferred forced release.
//!
//! An absorb schedules a release a fixed delay later in case the host never
//! reports one. Each schedule mints a new token; a deadline only fires if
//! its token is still the current one, so superseded or cancelled deadlines
//! can never fire late.

/// Token identifying one scheduled deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseToken(u64);

impl ReleaseToken {
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: ReleaseToken,
    deadline_ms: u64,
}

/// Single-slot cancellable deadline.
#[derive(Debug, Clone, Default)]
pub struct ReleaseWatchdog {
    next_token: u64,
    pending: Option<Pending>,
}

impl ReleaseWatchdog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a deadline `delay_ms` after `now_ms`, superseding any
    /// pending one.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) -> ReleaseToken {
        self.next_token = self.next_token.wrapping_add(1);
        let token = ReleaseToken(self.next_token);
        self.pending = Some(Pending {
            token,
            deadline_ms: now_ms.saturating_add(delay_ms),
        });
        token
    }

    /// Drop the pending deadline. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether `token` is still the pending deadline.
    #[must_use]
    pub fn is_current(&self, token: ReleaseToken) -> bool {
        self.pending.is_some_and(|p| p.token == token)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.map(|p| p.deadline_ms)
    }

    /// Fire the pending deadline if `now_ms` has reached it.
    ///
    /// Returns the fired token; a deadline fires at most once.
    pub fn poll(&mut self, now_ms: u64) -> Option<ReleaseToken> {
        match self.pending {
            Some(p) if now_ms >= p.deadline_ms => {
                self.pending = None;
                Some(p.token)
            }
            _ => None,
        }
    }
}
