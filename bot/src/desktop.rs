use std::collections::VecDeque;
use sweeper_core::Game;
use sweeper_surface::{Layout, PointerButtons, PointerEvent, Surface, render};
use sweeper_vision::Frame;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Game window not found")]
    WindowNotFound,
    #[error("Window geometry {width}x{height} cannot be captured")]
    InvalidGeometry { width: u32, height: u32 },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Click at ({x}, {y}) is outside the game window")]
    OutsideWindow { x: i32, y: i32 },
    #[error("No cell at ({x}, {y})")]
    NoCellAt { x: i32, y: i32 },
}

/// Window management, screen capture, pointer and keyboard access.
pub trait Desktop {
    /// Shows a new game window, replacing any previous one.
    fn open(&mut self, game: Game);

    fn close(&mut self);

    fn surface(&self) -> Option<&Surface>;

    fn surface_mut(&mut self) -> Option<&mut Surface>;

    /// Pixels of the game window.
    fn capture(&self) -> Result<Frame, CaptureError>;

    /// Pointer click at absolute desktop coordinates.
    fn click(&mut self, x: i32, y: i32, buttons: PointerButtons) -> Result<(), DispatchError>;

    /// Whether `key` was pressed since the last poll.
    fn key_pressed(&mut self, key: char) -> bool;
}

/// In-process desktop: frames come from the software rasteriser and clicks are
/// routed by hit-testing the surface layout.
#[derive(Debug, Default)]
pub struct VirtualDesktop {
    layout: Layout,
    surface: Option<Surface>,
    keys: VecDeque<char>,
}

impl VirtualDesktop {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            surface: None,
            keys: VecDeque::new(),
        }
    }

    /// Queues a key press for the next poll.
    pub fn press_key(&mut self, key: char) {
        self.keys.push_back(key);
    }
}

impl Desktop for VirtualDesktop {
    fn open(&mut self, game: Game) {
        self.surface = Some(Surface::new(game, self.layout));
    }

    fn close(&mut self) {
        self.surface = None;
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    fn capture(&self) -> Result<Frame, CaptureError> {
        let surface = self.surface.as_ref().ok_or(CaptureError::WindowNotFound)?;
        let (width, height) = surface.layout().window_size(surface.size());
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidGeometry { width, height });
        }
        Ok(render(surface))
    }

    fn click(&mut self, x: i32, y: i32, buttons: PointerButtons) -> Result<(), DispatchError> {
        let surface = self
            .surface
            .as_mut()
            .ok_or(DispatchError::OutsideWindow { x, y })?;
        if !surface.layout().window_rect(surface.size()).contains(x, y) {
            return Err(DispatchError::OutsideWindow { x, y });
        }
        let coords = surface.cell_at(x, y).ok_or(DispatchError::NoCellAt { x, y })?;
        surface
            .handle(PointerEvent { coords, buttons })
            .map_err(|_| DispatchError::NoCellAt { x, y })?;
        Ok(())
    }

    fn key_pressed(&mut self, key: char) -> bool {
        match self.keys.iter().position(|&pressed| pressed == key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }
}
