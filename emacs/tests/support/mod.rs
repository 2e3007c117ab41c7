#![allow(dead_code)]

pub mod mock_clipboard;
pub mod mock_host;

use emacs_mini::Coordinator;

use mock_host::MockHost;

/// Deliver everything the host queued up since the last pump.
pub fn pump(coordinator: &mut Coordinator, host: &mut MockHost) {
    for event in host.drain_events() {
        coordinator.notify(event);
    }
}
