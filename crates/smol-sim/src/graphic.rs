//! Graphic seam: a per-entity sink updated once per tick.

use smol_core::error::Result;
use smol_core::state::EntityView;

/// External renderer for one entity. Failures are logged by the caller and
/// never stop the tick.
pub trait GraphicComponent: Send + Sync {
    fn update(&mut self, view: &EntityView) -> Result<()>;
}

/// Sink that draws nothing. Used by headless sessions and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGraphic;

impl GraphicComponent for NullGraphic {
    fn update(&mut self, _view: &EntityView) -> Result<()> {
        Ok(())
    }
}
