#![forbid(unsafe_code)]

//! Re-measure hint for an external virtualized renderer.
//!
//! Some virtualized renderers keep showing stale row contents when the
//! bound sequence changes while they are hidden. The fix is to ask them to
//! re-measure once they are visible again. Only the host knows when that is,
//! so [`RenderSyncSignal::notify_if_visible`] is a manual call: recomputing a
//! view never fires it.

/// The renderer side of the signal.
pub trait RenderHost {
    /// Whether the list is currently laid out and visible.
    fn is_visible(&self) -> bool;

    /// Ask the renderer to re-measure its rows.
    fn remeasure(&mut self);
}

/// Counts re-measure hints sent to a [`RenderHost`].
#[derive(Debug, Clone, Default)]
pub struct RenderSyncSignal {
    emitted: u64,
    suppressed: u64,
}

impl RenderSyncSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a re-measure hint if the host is visible.
    ///
    /// Returns `true` if the hint was sent.
    pub fn notify_if_visible<H>(&mut self, host: &mut H) -> bool
    where
        H: RenderHost + ?Sized,
    {
        if host.is_visible() {
            host.remeasure();
            self.emitted += 1;
            crate::debug!(emitted = self.emitted, "renderer re-measure requested");
            true
        } else {
            self.suppressed += 1;
            false
        }
    }

    /// Hints sent so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Calls skipped because the host was hidden.
    #[must_use]
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Host {
        visible: bool,
        remeasured: u32,
    }

    impl RenderHost for Host {
        fn is_visible(&self) -> bool {
            self.visible
        }

        fn remeasure(&mut self) {
            self.remeasured += 1;
        }
    }

    #[test]
    fn hidden_host_is_not_remeasured() {
        let mut host = Host::default();
        let mut signal = RenderSyncSignal::new();
        assert!(!signal.notify_if_visible(&mut host));
        assert_eq!(host.remeasured, 0);
        assert_eq!(signal.suppressed(), 1);
    }

    #[test]
    fn visible_host_is_remeasured() {
        let mut host = Host {
            visible: true,
            ..Host::default()
        };
        let mut signal = RenderSyncSignal::new();
        assert!(signal.notify_if_visible(&mut host));
        assert!(signal.notify_if_visible(&mut host));
        assert_eq!(host.remeasured, 2);
        assert_eq!(signal.emitted(), 2);
    }

    #[test]
    fn works_through_trait_objects() {
        let mut host = Host {
            visible: true,
            ..Host::default()
        };
        let dyn_host: &mut dyn RenderHost = &mut host;
        assert!(RenderSyncSignal::new().notify_if_visible(dyn_host));
    }
}
