use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Spiderfy,
    Unspiderfy,
    Click,
    MouseOver,
    MouseEnter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpiderEvent<M> {
    Spiderfy { spiderfied: Vec<M>, non_nearby: Vec<M> },
    Unspiderfy { unspiderfied: Vec<M>, non_nearby: Vec<M> },
    Click(M),
    MouseOver(M),
    MouseEnter(M),
}

impl<M> SpiderEvent<M> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Spiderfy { .. } => EventKind::Spiderfy,
            Self::Unspiderfy { .. } => EventKind::Unspiderfy,
            Self::Click(_) => EventKind::Click,
            Self::MouseOver(_) => EventKind::MouseOver,
            Self::MouseEnter(_) => EventKind::MouseEnter,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<M> = Rc<RefCell<dyn FnMut(&SpiderEvent<M>)>>;

struct BusInner<M> {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<(HandlerId, Handler<M>)>>,
}

/// Observer registry for spiderfier notifications.
///
/// Clones share the same handler table, so a handler may capture a clone and
/// unsubscribe itself or others. `emit` snapshots the handlers for the event
/// kind before calling any of them: every handler registered when dispatch
/// starts runs exactly once, and changes made during dispatch apply from the
/// next `emit`.
pub struct EventBus<M> {
    inner: Rc<RefCell<BusInner<M>>>,
}

impl<M> Clone for EventBus<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Default for EventBus<M> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 0,
                handlers: HashMap::new(),
            })),
        }
    }
}

impl<M: 'static> EventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&SpiderEvent<M>) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = HandlerId(inner.next_id);
        inner.next_id += 1;
        let handler: Handler<M> = Rc::new(RefCell::new(handler));
        inner.handlers.entry(kind).or_default().push((id, handler));
        id
    }

    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(handlers) = inner.handlers.get_mut(&kind) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn clear(&self, kind: EventKind) {
        self.inner.borrow_mut().handlers.remove(&kind);
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn emit(&self, event: &SpiderEvent<M>) {
        let snapshot = self
            .inner
            .borrow()
            .handlers
            .get(&event.kind())
            .map(|handlers| {
                handlers
                    .iter()
                    .map(|(id, handler)| (*id, Rc::clone(handler)))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        for (id, handler) in snapshot {
            match handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(event),
                Err(_) => log::warn!(
                    "skipping re-entered {:?} handler {id:?}",
                    event.kind()
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::<u32>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            bus.on(EventKind::Click, move |event| {
                if let SpiderEvent::Click(marker) = event {
                    calls.borrow_mut().push((label, *marker));
                }
            });
        }

        bus.emit(&SpiderEvent::Click(7));
        assert_eq!(
            *calls.borrow(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn events_only_reach_their_kind() {
        let bus = EventBus::<u32>::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        bus.on(EventKind::Click, move |_| counter.set(counter.get() + 1));

        bus.emit(&SpiderEvent::MouseOver(1));
        bus.emit(&SpiderEvent::Spiderfy {
            spiderfied: vec![1, 2],
            non_nearby: Vec::new(),
        });
        assert_eq!(clicks.get(), 0);

        bus.emit(&SpiderEvent::Click(1));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn off_and_clear_detach_handlers() {
        let bus = EventBus::<u32>::new();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let first = bus.on(EventKind::MouseEnter, move |_| counter.set(counter.get() + 1));
        let counter = Rc::clone(&hits);
        bus.on(EventKind::MouseEnter, move |_| counter.set(counter.get() + 10));

        assert!(bus.off(EventKind::MouseEnter, first));
        assert!(!bus.off(EventKind::MouseEnter, first));
        assert!(!bus.off(EventKind::Click, first));
        bus.emit(&SpiderEvent::MouseEnter(3));
        assert_eq!(hits.get(), 10);

        bus.clear(EventKind::MouseEnter);
        assert_eq!(bus.handler_count(EventKind::MouseEnter), 0);
        bus.emit(&SpiderEvent::MouseEnter(3));
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn removal_during_dispatch_takes_effect_next_emit() {
        let bus = EventBus::<u32>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let second_id = Rc::new(Cell::new(None));

        let remover_bus = bus.clone();
        let remover_calls = Rc::clone(&calls);
        let remover_target = Rc::clone(&second_id);
        bus.on(EventKind::Click, move |_| {
            remover_calls.borrow_mut().push("remover");
            if let Some(id) = remover_target.get() {
                remover_bus.off(EventKind::Click, id);
            }
        });

        let second_calls = Rc::clone(&calls);
        let id = bus.on(EventKind::Click, move |_| {
            second_calls.borrow_mut().push("second");
        });
        second_id.set(Some(id));

        bus.emit(&SpiderEvent::Click(0));
        assert_eq!(*calls.borrow(), vec!["remover", "second"]);

        bus.emit(&SpiderEvent::Click(0));
        assert_eq!(*calls.borrow(), vec!["remover", "second", "remover"]);
    }

    #[test]
    fn handler_added_during_dispatch_waits_for_next_emit() {
        let bus = EventBus::<u32>::new();
        let late_hits = Rc::new(Cell::new(0));

        let adder_bus = bus.clone();
        let adder_hits = Rc::clone(&late_hits);
        let added = Cell::new(false);
        bus.on(EventKind::Click, move |_| {
            if !added.replace(true) {
                let hits = Rc::clone(&adder_hits);
                adder_bus.on(EventKind::Click, move |_| hits.set(hits.get() + 1));
            }
        });

        bus.emit(&SpiderEvent::Click(0));
        assert_eq!(late_hits.get(), 0);
        bus.emit(&SpiderEvent::Click(0));
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn nested_emit_skips_the_running_handler() {
        let bus = EventBus::<u32>::new();
        let depth = Rc::new(Cell::new(0));

        let inner_bus = bus.clone();
        let counter = Rc::clone(&depth);
        bus.on(EventKind::Click, move |event| {
            counter.set(counter.get() + 1);
            inner_bus.emit(event);
        });

        bus.emit(&SpiderEvent::Click(1));
        assert_eq!(depth.get(), 1);
    }
}
