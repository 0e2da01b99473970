use std::sync::atomic::{AtomicBool, Ordering};

/// At-most-one-in-flight gate for a pipeline.
///
/// The original UI prevented double submits by disabling buttons; here the
/// caller must hold an [`OpPermit`] for the duration of the operation. The
/// permit releases on drop, so every exit path gives the slot back.
pub struct OpGate {
    name: &'static str,
    busy: AtomicBool,
}

impl OpGate {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            busy: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn try_acquire(&self) -> Option<OpPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| OpPermit { gate: self })
    }
}

pub struct OpPermit<'a> {
    gate: &'a OpGate,
}

impl Drop for OpPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let gate = OpGate::new("encode");
        let permit = gate.try_acquire();
        assert!(permit.is_some());
        assert!(gate.try_acquire().is_none());
        drop(permit);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn permit_releases_on_early_exit() {
        let gate = OpGate::new("scan");
        {
            let _permit = gate.try_acquire().unwrap();
            // simulated failure path: permit dropped with the scope
        }
        assert!(gate.try_acquire().is_some());
    }
}
