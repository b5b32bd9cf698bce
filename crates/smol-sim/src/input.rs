//! Input seam: the simulation only reads what a UI thread has published.
//!
//! `InputSlot` is a single-writer/single-reader handoff. The publisher
//! overwrites the frame (last write wins); the loop thread copies the whole
//! frame under the same lock, so it never observes half an update.

use std::sync::{Arc, Mutex, MutexGuard};

use smol_core::enums::Direction;
use smol_core::types::Point;

/// Everything an input source has to say for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub direction: Option<Direction>,
    pub position: Option<Point>,
    pub hittable: bool,
}

/// An external source of movement commands.
pub trait InputComponent: Send + Sync {
    fn direction(&self) -> Option<Direction>;

    fn position(&self) -> Option<Point>;

    fn is_hittable(&self) -> bool;

    /// All three values, read together.
    fn frame(&self) -> InputFrame {
        InputFrame {
            direction: self.direction(),
            position: self.position(),
            hittable: self.is_hittable(),
        }
    }
}

/// Shared command slot. Clones share the same frame: the UI side keeps one
/// clone to publish into, the entity keeps another to read from.
#[derive(Debug, Clone, Default)]
pub struct InputSlot {
    frame: Arc<Mutex<InputFrame>>,
}

impl InputSlot {
    pub fn new(hittable: bool) -> Self {
        Self {
            frame: Arc::new(Mutex::new(InputFrame {
                hittable,
                ..Default::default()
            })),
        }
    }

    /// Held direction, or `None` once the key is released.
    pub fn set_direction(&self, direction: Option<Direction>) {
        self.lock().direction = direction;
    }

    /// Latest pointer position, or `None` to stop chasing it.
    pub fn set_position(&self, position: Option<Point>) {
        self.lock().position = position;
    }

    pub fn set_hittable(&self, hittable: bool) {
        self.lock().hittable = hittable;
    }

    /// Replace the whole frame in one write.
    pub fn publish(&self, frame: InputFrame) {
        *self.lock() = frame;
    }

    /// Drop any pending direction and position.
    pub fn clear(&self) {
        let mut frame = self.lock();
        frame.direction = None;
        frame.position = None;
    }

    fn lock(&self) -> MutexGuard<'_, InputFrame> {
        match self.frame.lock() {
            Ok(guard) => guard,
            Err(e) => {
                log::error!("input slot lock poisoned: {e}");
                e.into_inner()
            }
        }
    }
}

impl InputComponent for InputSlot {
    fn direction(&self) -> Option<Direction> {
        self.lock().direction
    }

    fn position(&self) -> Option<Point> {
        self.lock().position
    }

    fn is_hittable(&self) -> bool {
        self.lock().hittable
    }

    fn frame(&self) -> InputFrame {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_frame() {
        let publisher = InputSlot::new(false);
        let reader: Arc<dyn InputComponent> = Arc::new(publisher.clone());

        publisher.set_direction(Some(Direction::Left));
        publisher.set_hittable(true);

        let frame = reader.frame();
        assert_eq!(frame.direction, Some(Direction::Left));
        assert!(frame.hittable);
        assert_eq!(frame.position, None);
    }

    #[test]
    fn last_write_wins() {
        let slot = InputSlot::new(true);
        slot.set_position(Some(Point::new(1.0, 1.0)));
        slot.set_position(Some(Point::new(9.0, 9.0)));
        assert_eq!(slot.position(), Some(Point::new(9.0, 9.0)));

        slot.clear();
        assert_eq!(slot.frame().position, None);
        assert!(slot.is_hittable());
    }

    #[test]
    fn publish_from_another_thread() {
        let slot = InputSlot::new(false);
        let publisher = slot.clone();
        std::thread::spawn(move || {
            publisher.publish(InputFrame {
                direction: Some(Direction::Down),
                position: Some(Point::new(3.0, 4.0)),
                hittable: true,
            });
        })
        .join()
        .unwrap();

        let frame = slot.frame();
        assert_eq!(frame.direction, Some(Direction::Down));
        assert_eq!(frame.position, Some(Point::new(3.0, 4.0)));
        assert!(frame.hittable);
    }
}
