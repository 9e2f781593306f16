//! Instrumented element type for lifetime and panic-safety tests.
//!
//! Every [`Tracked`] value created on a thread is recorded in that thread's
//! ledger, and so is every drop. A container that neither leaks nor double
//! drops leaves [`live`] at zero once it is gone. The ledger can also be armed
//! to panic on the n-th `Clone` or `Default`, which is how failing element
//! operations are simulated.

use std::cell::Cell;
use std::fmt;

thread_local! {
    static LEDGER: Ledger = const { Ledger::new() };
}

struct Ledger {
    constructed: Cell<usize>,
    dropped: Cell<usize>,
    clones_before_panic: Cell<Option<usize>>,
    defaults_before_panic: Cell<Option<usize>>,
}

impl Ledger {
    const fn new() -> Ledger {
        Ledger {
            constructed: Cell::new(0),
            dropped: Cell::new(0),
            clones_before_panic: Cell::new(None),
            defaults_before_panic: Cell::new(None),
        }
    }
}

/// Counters of the current thread's ledger at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerSnapshot {
    /// Values created by `new`, `Default` or `Clone`.
    pub constructed: usize,
    /// Values dropped.
    pub dropped: usize,
}

impl LedgerSnapshot {
    pub fn live(&self) -> isize {
        self.constructed as isize - self.dropped as isize
    }
}

/// Clears the current thread's counters and disarms any injected failure.
pub fn reset() {
    LEDGER.with(|l| {
        l.constructed.set(0);
        l.dropped.set(0);
        l.clones_before_panic.set(None);
        l.defaults_before_panic.set(None);
    });
}

pub fn snapshot() -> LedgerSnapshot {
    LEDGER.with(|l| LedgerSnapshot {
        constructed: l.constructed.get(),
        dropped: l.dropped.get(),
    })
}

/// Number of `Tracked` values currently alive on this thread.
pub fn live() -> isize {
    snapshot().live()
}

/// Lets `n` more clones succeed, then panics on the next one.
pub fn panic_after_clones(n: usize) {
    LEDGER.with(|l| l.clones_before_panic.set(Some(n)));
}

/// Lets `n` more `Default::default()` calls succeed, then panics on the next one.
pub fn panic_after_defaults(n: usize) {
    LEDGER.with(|l| l.defaults_before_panic.set(Some(n)));
}

/// Disarms injected failures without touching the counters.
pub fn disarm() {
    LEDGER.with(|l| {
        l.clones_before_panic.set(None);
        l.defaults_before_panic.set(None);
    });
}

fn countdown(counter: &Cell<Option<usize>>, what: &str) {
    match counter.get() {
        Some(0) => {
            counter.set(None);
            panic!("injected {what} failure");
        }
        Some(n) => counter.set(Some(n - 1)),
        None => (),
    }
}

fn record_construction() {
    LEDGER.with(|l| l.constructed.set(l.constructed.get() + 1));
}

/// An `i64` payload whose lifetime is recorded in the thread-local ledger.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tracked(i64);

impl Tracked {
    pub fn new(value: i64) -> Tracked {
        record_construction();
        Tracked(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        LEDGER.with(|l| countdown(&l.clones_before_panic, "clone"));
        Tracked::new(self.0)
    }

    fn clone_from(&mut self, source: &Self) {
        LEDGER.with(|l| countdown(&l.clones_before_panic, "clone"));
        self.0 = source.0;
    }
}

impl Default for Tracked {
    fn default() -> Self {
        LEDGER.with(|l| countdown(&l.defaults_before_panic, "default"));
        Tracked::new(0)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        // `try_with`: values may outlive the ledger during thread teardown.
        let _ = LEDGER.try_with(|l| l.dropped.set(l.dropped.get() + 1));
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.0)
    }
}

impl PartialEq<i64> for Tracked {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

/// Collects the payloads of a slice of tracked values.
pub fn values(items: &[Tracked]) -> Vec<i64> {
    items.iter().map(Tracked::value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_counts() {
        reset();
        let a = Tracked::new(1);
        let b = a.clone();
        let c = Tracked::default();
        assert_eq!(snapshot().constructed, 3);
        drop((a, b));
        assert_eq!(live(), 1);
        drop(c);
        assert_eq!(
            snapshot(),
            LedgerSnapshot {
                constructed: 3,
                dropped: 3
            }
        );
    }

    #[test]
    fn test_injected_clone_failure() {
        reset();
        let a = Tracked::new(5);
        panic_after_clones(1);
        let b = a.clone();
        let res = std::panic::catch_unwind(|| a.clone());
        assert!(res.is_err());
        // The failure fires once.
        let c = a.clone();
        assert_eq!(values(&[a, b, c]), [5, 5, 5]);
        assert_eq!(live(), 0);
    }

    #[test]
    fn test_disarm_keeps_counters() {
        reset();
        panic_after_clones(0);
        panic_after_defaults(0);
        let a = Tracked::new(3);
        disarm();
        let b = a.clone();
        let c = Tracked::default();
        assert_eq!(values(&[a, b, c]), [3, 3, 0]);
        assert_eq!(snapshot().constructed, 3);
        assert_eq!(live(), 0);
    }
}
