use std::rc::Rc;

use crate::geometry::place_popup;
use crate::host::{Anchor, Host, ObserverHandle, PopupSurface};

/// Keeps the popup placed next to the selected element for as long as it runs.
pub trait ResizeTracking {
    fn stop(&mut self);
}

#[derive(Clone)]
pub struct PlacementTarget {
    pub selected: Option<Rc<dyn Anchor>>,
    pub wrapper: Rc<dyn Anchor>,
    pub surface: Rc<dyn PopupSurface>,
}

impl PlacementTarget {
    pub fn reposition(&self) {
        let Some(selected) = self.selected.as_ref() else {
            tracing::debug!("no selected element; skipping popup placement");
            return;
        };
        let placement = place_popup(
            selected.bounds(),
            self.wrapper.bounds(),
            self.surface.size(),
        );
        self.surface.apply_placement(placement);
    }
}

/// Repositions on every wrapper resize until stopped.
pub struct ObservedResize {
    handle: Box<dyn ObserverHandle>,
}

impl ResizeTracking for ObservedResize {
    fn stop(&mut self) {
        self.handle.disconnect();
    }
}

/// Places the popup once; used when the host cannot observe resizes.
pub struct OneShotPlacement;

impl ResizeTracking for OneShotPlacement {
    fn stop(&mut self) {}
}

pub fn start_resize_tracking(host: &dyn Host, target: PlacementTarget) -> Box<dyn ResizeTracking> {
    match host.resize_observer() {
        Some(observer) => {
            let wrapper = Rc::clone(&target.wrapper);
            // The observer fires once on start, which places the popup initially.
            let handle = observer.observe(wrapper, Rc::new(move || target.reposition()));
            Box::new(ObservedResize { handle })
        }
        None => {
            tracing::debug!("resize observation unavailable; placing popup once");
            target.reposition();
            Box::new(OneShotPlacement)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bounds, Size};
    use crate::host::{MemoryAnchor, MemoryHost, MemorySurface};

    fn target(surface: &Rc<MemorySurface>, selected: &Rc<MemoryAnchor>) -> PlacementTarget {
        let selected: Rc<dyn Anchor> = selected.clone();
        let surface: Rc<dyn PopupSurface> = surface.clone();
        PlacementTarget {
            selected: Some(selected),
            wrapper: Rc::new(MemoryAnchor::new(Bounds::new(0.0, 0.0, 1000.0, 800.0))),
            surface,
        }
    }

    #[test]
    fn observed_tracking_repositions_until_stopped() {
        let host = MemoryHost::new();
        let surface = Rc::new(MemorySurface::new([1], Size::new(100.0, 50.0)));
        let selected = Rc::new(MemoryAnchor::new(Bounds::new(10.0, 10.0, 20.0, 20.0)));

        let mut tracking = start_resize_tracking(&host, target(&surface, &selected));
        assert_eq!(surface.placements().len(), 1);

        selected.set_bounds(Bounds::new(40.0, 10.0, 20.0, 20.0));
        host.notify_resize();
        assert_eq!(surface.placements().len(), 2);
        assert_eq!(surface.last_placement().map(|p| p.left), Some(40.0));

        tracking.stop();
        tracking.stop();
        host.notify_resize();
        assert_eq!(surface.placements().len(), 2);
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn missing_observer_places_once() {
        let host = MemoryHost::without_resize_observer();
        let surface = Rc::new(MemorySurface::new([1], Size::new(100.0, 50.0)));
        let selected = Rc::new(MemoryAnchor::new(Bounds::new(10.0, 10.0, 20.0, 20.0)));

        let mut tracking = start_resize_tracking(&host, target(&surface, &selected));
        host.notify_resize();
        tracking.stop();

        assert_eq!(surface.placements().len(), 1);
    }
}
