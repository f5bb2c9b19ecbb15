use std::collections::HashMap;

use uuid::Uuid;

use super::{BoardEvent, EventKind};

/// Anything that can receive a board event.
///
/// Plain closures get this for free through the blanket impl below, so both
/// subscription shapes (a callback, or an object with a dispatch method)
/// funnel into the one interface at registration time.
pub trait EventHandler {
    fn handle_event(&mut self, event: &BoardEvent);
}

impl<F: FnMut(&BoardEvent)> EventHandler for F {
    fn handle_event(&mut self, event: &BoardEvent) {
        self(event)
    }
}

/// Token returned by [`EventBus::on`], used to detach a single handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

/// Minimal synchronous publish/subscribe channel.
///
/// Handlers for one event kind fire in registration order. Triggering a
/// kind nobody subscribed to is a no-op.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<(HandlerId, Box<dyn EventHandler>)>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count: usize = self.handlers.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{count} handlers>"))
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to one event kind.
    pub fn on<H: EventHandler + 'static>(&mut self, kind: EventKind, handler: H) -> HandlerId {
        let id = HandlerId(Uuid::new_v4());
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove every handler registered for `kind`.
    pub fn off(&mut self, kind: EventKind) {
        self.handlers.remove(&kind);
    }

    /// Detach a single handler by its registration id. Returns `true` if it
    /// was still registered.
    pub fn remove(&mut self, id: HandlerId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(idx) = handlers.iter().position(|(hid, _)| *hid == id) {
                handlers.remove(idx);
                return true;
            }
        }
        false
    }

    /// Fire an event synchronously to all handlers of its kind.
    pub fn trigger(&mut self, event: &BoardEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for (_, handler) in handlers.iter_mut() {
                handler.handle_event(event);
            }
        }
    }

    /// Drop every handler for every event kind.
    pub fn remove_all_listeners(&mut self) {
        self.handlers.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use egui::Pos2;

    use super::*;

    /// The "object with a dispatch method" subscription shape.
    struct Counter {
        hits: Rc<RefCell<usize>>,
    }

    impl EventHandler for Counter {
        fn handle_event(&mut self, _event: &BoardEvent) {
            *self.hits.borrow_mut() += 1;
        }
    }

    fn draw_at(x: f32, y: f32) -> BoardEvent {
        BoardEvent::Draw(Pos2::new(x, y))
    }

    #[test]
    fn both_handler_shapes_receive_events() {
        let mut bus = EventBus::new();
        let closure_hits = Rc::new(RefCell::new(0));
        let object_hits = Rc::new(RefCell::new(0));

        let hits = Rc::clone(&closure_hits);
        bus.on(EventKind::Draw, move |_: &BoardEvent| {
            *hits.borrow_mut() += 1;
        });
        bus.on(
            EventKind::Draw,
            Counter {
                hits: Rc::clone(&object_hits),
            },
        );

        bus.trigger(&draw_at(1.0, 2.0));
        assert_eq!(*closure_hits.borrow(), 1);
        assert_eq!(*object_hits.borrow(), 1);
    }

    #[test]
    fn handlers_fire_in_registration_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.on(EventKind::Dispose, move |_: &BoardEvent| {
                order.borrow_mut().push(tag);
            });
        }

        bus.trigger(&BoardEvent::Dispose);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn trigger_without_subscribers_is_a_no_op() {
        let mut bus = EventBus::new();
        bus.trigger(&draw_at(0.0, 0.0));
    }

    #[test]
    fn handlers_only_see_their_kind() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let h = Rc::clone(&hits);
        bus.on(EventKind::DrawEnd, move |_: &BoardEvent| {
            *h.borrow_mut() += 1;
        });

        bus.trigger(&draw_at(0.0, 0.0));
        assert_eq!(*hits.borrow(), 0);

        bus.trigger(&BoardEvent::DrawEnd(Pos2::ZERO));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn off_clears_all_handlers_of_a_kind() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        for _ in 0..2 {
            let h = Rc::clone(&hits);
            bus.on(EventKind::Draw, move |_: &BoardEvent| {
                *h.borrow_mut() += 1;
            });
        }
        bus.off(EventKind::Draw);

        bus.trigger(&draw_at(0.0, 0.0));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn remove_detaches_a_single_handler() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let h = Rc::clone(&hits);
        let keep = bus.on(EventKind::Draw, move |_: &BoardEvent| {
            *h.borrow_mut() += 1;
        });
        let h = Rc::clone(&hits);
        let drop_id = bus.on(EventKind::Draw, move |_: &BoardEvent| {
            *h.borrow_mut() += 10;
        });

        assert!(bus.remove(drop_id));
        assert!(!bus.remove(drop_id));

        bus.trigger(&draw_at(0.0, 0.0));
        assert_eq!(*hits.borrow(), 1);

        assert!(bus.remove(keep));
    }

    #[test]
    fn remove_all_listeners_empties_the_bus() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let h = Rc::clone(&hits);
        bus.on(EventKind::Draw, move |_: &BoardEvent| {
            *h.borrow_mut() += 1;
        });
        bus.remove_all_listeners();

        bus.trigger(&draw_at(0.0, 0.0));
        assert_eq!(*hits.borrow(), 0);
    }
}
