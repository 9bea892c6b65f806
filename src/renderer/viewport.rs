use winit::dpi::{LogicalSize, PhysicalSize};

/// Something with a client area measured in logical units.
pub trait DrawableSurface {
    fn client_size(&self) -> LogicalSize<f64>;
    fn scale_factor(&self) -> f64;
}

impl DrawableSurface for winit::window::Window {
    fn client_size(&self) -> LogicalSize<f64> {
        self.inner_size().to_logical(self.scale_factor())
    }

    fn scale_factor(&self) -> f64 {
        winit::window::Window::scale_factor(self)
    }
}

/// Tracks the physical pixel size last applied to the device.
#[derive(Debug, Default)]
pub struct Viewport {
    current: Option<PhysicalSize<u32>>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new physical size when it differs from the last one applied.
    ///
    /// Zero-sized surfaces (minimised windows) are ignored.
    pub fn resync(&mut self, surface: &impl DrawableSurface) -> Option<PhysicalSize<u32>> {
        let size = physical_size(surface.client_size(), surface.scale_factor());
        if size.width == 0 || size.height == 0 || self.current == Some(size) {
            return None;
        }

        self.current = Some(size);
        Some(size)
    }

    /// Records a size applied outside of `resync`, e.g. at surface creation.
    pub fn mark_applied(&mut self, size: PhysicalSize<u32>) {
        self.current = Some(size);
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<PhysicalSize<u32>> {
        self.current
    }
}

pub fn physical_size(logical: LogicalSize<f64>, scale_factor: f64) -> PhysicalSize<u32> {
    PhysicalSize::new(
        to_pixels(logical.width * scale_factor),
        to_pixels(logical.height * scale_factor),
    )
}

/// Sizes that came from whole pixels snap back to them; genuinely
/// fractional sizes floor so the framebuffer never exceeds the client area.
fn to_pixels(scaled: f64) -> u32 {
    const SNAP: f64 = 1e-6;

    let nearest = scaled.round();
    if (scaled - nearest).abs() < SNAP {
        nearest as u32
    } else {
        scaled.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeSurface {
        size: Cell<LogicalSize<f64>>,
        scale: f64,
    }

    impl FakeSurface {
        fn new(width: f64, height: f64, scale: f64) -> Self {
            Self {
                size: Cell::new(LogicalSize::new(width, height)),
                scale,
            }
        }
    }

    impl DrawableSurface for FakeSurface {
        fn client_size(&self) -> LogicalSize<f64> {
            self.size.get()
        }

        fn scale_factor(&self) -> f64 {
            self.scale
        }
    }

    #[test]
    fn unchanged_surface_updates_once() {
        let surface = FakeSurface::new(400.0, 300.0, 2.0);
        let mut viewport = Viewport::new();

        let updates = (0..2).filter_map(|_| viewport.resync(&surface)).count();

        assert_eq!(updates, 1);
        assert_eq!(viewport.current(), Some(PhysicalSize::new(800, 600)));
    }

    #[test]
    fn changed_surface_updates_again() {
        let surface = FakeSurface::new(400.0, 300.0, 1.0);
        let mut viewport = Viewport::new();
        viewport.resync(&surface);

        surface.size.set(LogicalSize::new(500.0, 300.0));

        assert_eq!(viewport.resync(&surface), Some(PhysicalSize::new(500, 300)));
    }

    #[test]
    fn fractional_scale_floors() {
        assert_eq!(
            physical_size(LogicalSize::new(101.0, 33.0), 1.5),
            PhysicalSize::new(151, 49)
        );
    }

    #[test]
    fn window_sizes_survive_the_logical_round_trip() {
        for scale in [1.0, 1.25, 1.5, 1.75, 2.0, 2.25, 2.5, 3.0, 1.1, 1.33] {
            for width in 1..4000u32 {
                let physical = PhysicalSize::new(width, width / 2 + 1);
                let logical = physical.to_logical::<f64>(scale);
                assert_eq!(physical_size(logical, scale), physical, "scale {scale}");
            }
        }
    }

    #[test]
    fn applied_window_size_is_not_resized_again() {
        let physical = PhysicalSize::new(61u32, 115);
        let logical = physical.to_logical::<f64>(1.75);
        let surface = FakeSurface::new(logical.width, logical.height, 1.75);
        let mut viewport = Viewport::new();
        viewport.mark_applied(physical);

        assert_eq!(viewport.resync(&surface), None);
    }

    #[test]
    fn zero_sized_surface_is_ignored() {
        let surface = FakeSurface::new(0.0, 300.0, 1.0);
        let mut viewport = Viewport::new();

        assert_eq!(viewport.resync(&surface), None);
        assert_eq!(viewport.current(), None);
    }

    #[test]
    fn marked_size_suppresses_redundant_update() {
        let surface = FakeSurface::new(640.0, 480.0, 1.0);
        let mut viewport = Viewport::new();
        viewport.mark_applied(PhysicalSize::new(640, 480));

        assert_eq!(viewport.resync(&surface), None);
    }
}
