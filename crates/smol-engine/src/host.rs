//! Render host seam: whoever displays the world gets one snapshot per tick.

use std::sync::mpsc;

use smol_core::error::{Result, SimError};
use smol_core::state::WorldSnapshot;

/// Consumer of finished ticks. Called on the loop thread after the entity
/// pass; a failure is logged and the loop keeps going.
pub trait RenderHost: Send {
    fn render(&mut self, snapshot: &WorldSnapshot) -> Result<()>;
}

/// Host that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl RenderHost for NullHost {
    fn render(&mut self, _snapshot: &WorldSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Forwards snapshots to another thread.
#[derive(Debug)]
pub struct ChannelHost {
    tx: mpsc::Sender<WorldSnapshot>,
}

impl ChannelHost {
    /// Host plus the receiving end for the consumer.
    pub fn channel() -> (Self, mpsc::Receiver<WorldSnapshot>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl RenderHost for ChannelHost {
    fn render(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        self.tx
            .send(snapshot.clone())
            .map_err(|_| SimError::Render("snapshot receiver dropped".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_host_forwards() {
        let (mut host, rx) = ChannelHost::channel();
        host.render(&WorldSnapshot::default()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), WorldSnapshot::default());
    }

    #[test]
    fn test_channel_host_fails_without_receiver() {
        let (mut host, rx) = ChannelHost::channel();
        drop(rx);
        assert!(matches!(
            host.render(&WorldSnapshot::default()),
            Err(SimError::Render(_))
        ));
    }
}
