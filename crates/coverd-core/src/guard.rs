// ── Cover state guard ──
//
// Turns a requested action into at most one motion command, based on a
// fresh status read. The decision itself is a pure function; the guard
// adds the status fetch and fire-and-forget dispatch around it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::command::CoverCommand;
use crate::device::Device;
use crate::model::{CoverAction, CoverState, CoverStatus};

/// Slat tilt assumed when the device does not report one.
const DEFAULT_SLAT_POSITION: u8 = 50;
/// Tilt change applied per slat request.
const SLAT_STEP: u8 = 25;
const SLAT_MAX: u8 = 100;

/// Decide which command, if any, `action` requires given `status`.
///
/// A moving cover is always stopped first, whatever was asked. Slat
/// requests against a moving cover are dropped, not queued.
pub fn decide(status: &CoverStatus, action: CoverAction) -> Option<CoverCommand> {
    if status.is_moving() {
        return Some(CoverCommand::Stop);
    }

    match action {
        CoverAction::Open => (status.state != CoverState::Open).then_some(CoverCommand::Open),
        CoverAction::Close => (status.state != CoverState::Closed).then_some(CoverCommand::Close),
        CoverAction::SlatOpen | CoverAction::SlatClose => {
            let current = status.slat_position.unwrap_or(DEFAULT_SLAT_POSITION);
            let target = if action == CoverAction::SlatOpen {
                current.saturating_add(SLAT_STEP).min(SLAT_MAX)
            } else {
                current.saturating_sub(SLAT_STEP)
            };
            (target != current).then(|| CoverCommand::slat(target))
        }
    }
}

/// Guards one cover against conflicting or redundant commands.
pub struct CoverGuard<D> {
    cover_id: u32,
    device: Arc<D>,
}

impl<D> Clone for CoverGuard<D> {
    fn clone(&self) -> Self {
        Self {
            cover_id: self.cover_id,
            device: Arc::clone(&self.device),
        }
    }
}

impl<D: Device> CoverGuard<D> {
    pub fn new(cover_id: u32, device: Arc<D>) -> Self {
        Self { cover_id, device }
    }

    /// Re-read status, decide, and spawn the resulting command.
    ///
    /// Returns the handle of the spawned command task, or `None` when
    /// nothing was sent. The handle may be dropped; the command still runs
    /// and logs its own outcome.
    pub async fn handle(&self, action: CoverAction) -> Option<JoinHandle<()>> {
        let cover_id = self.cover_id;

        let status = match self.device.cover_status(cover_id).await {
            Ok(Some(status)) => status,
            Ok(None) => {
                error!(cover_id, %action, "cover status unavailable: no such cover");
                return None;
            }
            Err(e) => {
                error!(cover_id, %action, error = %e, "cover status unavailable");
                return None;
            }
        };

        let Some(command) = decide(&status, action) else {
            debug!(cover_id, %action, state = %status.state, "no command needed");
            return None;
        };

        if command == CoverCommand::Stop {
            info!(cover_id, %action, state = %status.state, "cover is moving, stopping");
        } else {
            info!(cover_id, %action, %command, "sending cover command");
        }

        let device = Arc::clone(&self.device);
        Some(tokio::spawn(async move {
            match device.send(cover_id, command).await {
                Ok(()) => debug!(cover_id, %command, "cover command accepted"),
                Err(e) => warn!(cover_id, %command, error = %e, "cover command failed"),
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fake::{Call, FakeDevice};

    fn at(state: CoverState) -> CoverStatus {
        CoverStatus::new(state)
    }

    // ── decide ──

    #[test]
    fn moving_cover_is_always_stopped() {
        for state in [CoverState::Opening, CoverState::Closing, CoverState::Calibrating] {
            for action in [
                CoverAction::Open,
                CoverAction::Close,
                CoverAction::SlatOpen,
                CoverAction::SlatClose,
            ] {
                assert_eq!(
                    decide(&at(state.clone()), action),
                    Some(CoverCommand::Stop),
                    "{state} / {action}"
                );
            }
        }
    }

    #[test]
    fn open_is_skipped_when_already_open() {
        assert_eq!(decide(&at(CoverState::Open), CoverAction::Open), None);
        assert_eq!(
            decide(&at(CoverState::Closed), CoverAction::Open),
            Some(CoverCommand::Open)
        );
        assert_eq!(
            decide(&at(CoverState::Stopped), CoverAction::Open),
            Some(CoverCommand::Open)
        );
    }

    #[test]
    fn close_is_skipped_when_already_closed() {
        assert_eq!(decide(&at(CoverState::Closed), CoverAction::Close), None);
        assert_eq!(
            decide(&at(CoverState::Open), CoverAction::Close),
            Some(CoverCommand::Close)
        );
        assert_eq!(
            decide(&at(CoverState::Unknown("jammed".into())), CoverAction::Close),
            Some(CoverCommand::Close)
        );
    }

    #[test]
    fn slat_steps_from_reported_position() {
        let status = at(CoverState::Stopped).with_slat(40);
        assert_eq!(decide(&status, CoverAction::SlatOpen), Some(CoverCommand::slat(65)));
        assert_eq!(decide(&status, CoverAction::SlatClose), Some(CoverCommand::slat(15)));
    }

    #[test]
    fn slat_defaults_to_midpoint() {
        let status = at(CoverState::Open);
        assert_eq!(decide(&status, CoverAction::SlatOpen), Some(CoverCommand::slat(75)));
        assert_eq!(decide(&status, CoverAction::SlatClose), Some(CoverCommand::slat(25)));
    }

    #[test]
    fn slat_clamps_and_skips_at_limits() {
        let near_top = at(CoverState::Open).with_slat(90);
        assert_eq!(decide(&near_top, CoverAction::SlatOpen), Some(CoverCommand::slat(100)));

        let top = at(CoverState::Open).with_slat(100);
        assert_eq!(decide(&top, CoverAction::SlatOpen), None);

        let near_bottom = at(CoverState::Closed).with_slat(10);
        assert_eq!(decide(&near_bottom, CoverAction::SlatClose), Some(CoverCommand::slat(0)));

        let bottom = at(CoverState::Closed).with_slat(0);
        assert_eq!(decide(&bottom, CoverAction::SlatClose), None);
    }

    #[test]
    fn slat_move_never_carries_cover_position() {
        let mut status = at(CoverState::Stopped).with_slat(50);
        status.position = Some(30);
        match decide(&status, CoverAction::SlatOpen) {
            Some(CoverCommand::GoToPosition { position, slat_position }) => {
                assert_eq!(position, None);
                assert_eq!(slat_position, Some(75));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    // ── handle ──

    #[tokio::test]
    async fn handle_sends_one_command_after_status_read() {
        let device = Arc::new(FakeDevice::with_status(at(CoverState::Closed)));
        let guard = CoverGuard::new(1, Arc::clone(&device));

        guard.handle(CoverAction::Open).await.unwrap().await.unwrap();

        assert_eq!(
            device.calls(),
            vec![Call::Status(1), Call::Send(1, CoverCommand::Open)]
        );
    }

    #[tokio::test]
    async fn handle_stops_moving_cover_and_drops_slat_request() {
        let device = Arc::new(FakeDevice::with_status(at(CoverState::Opening).with_slat(10)));
        let guard = CoverGuard::new(0, Arc::clone(&device));

        guard.handle(CoverAction::SlatOpen).await.unwrap().await.unwrap();

        assert_eq!(device.commands(), vec![CoverCommand::Stop]);
    }

    #[tokio::test]
    async fn handle_is_silent_when_nothing_to_do() {
        let device = Arc::new(FakeDevice::with_status(at(CoverState::Open)));
        let guard = CoverGuard::new(0, Arc::clone(&device));

        assert!(guard.handle(CoverAction::Open).await.is_none());
        assert!(device.commands().is_empty());
    }

    #[tokio::test]
    async fn status_failure_sends_nothing() {
        let device = Arc::new(FakeDevice::failing_status());
        let guard = CoverGuard::new(0, Arc::clone(&device));

        assert!(guard.handle(CoverAction::Close).await.is_none());
        assert_eq!(device.calls(), vec![Call::Status(0)]);
    }

    #[tokio::test]
    async fn missing_cover_sends_nothing() {
        let device = Arc::new(FakeDevice::default());
        let guard = CoverGuard::new(3, Arc::clone(&device));

        assert!(guard.handle(CoverAction::Open).await.is_none());
        assert!(device.commands().is_empty());
    }

    #[tokio::test]
    async fn command_failure_is_contained() {
        let device = Arc::new(FakeDevice::with_status(at(CoverState::Open)));
        device.fail_on("Cover.Close");
        let guard = CoverGuard::new(0, Arc::clone(&device));

        // Failure is logged inside the task, never surfaced as a panic.
        guard.handle(CoverAction::Close).await.unwrap().await.unwrap();
        assert_eq!(device.commands(), vec![CoverCommand::Close]);
    }
}
