// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashMap;

use strum_macros::{Display, EnumString};

/// Emitted by [`crate::Interface`], delivered synchronously in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceEvent {
    Line(String),
    /// History after a line was committed, most recent first.
    History(Vec<String>),
    Pause,
    Resume,
    Close,
    Sigint,
    Sigtstp,
    Sigcont,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum InterfaceEventKind {
    #[strum(serialize = "line")]
    Line,
    #[strum(serialize = "history")]
    History,
    #[strum(serialize = "pause")]
    Pause,
    #[strum(serialize = "resume")]
    Resume,
    #[strum(serialize = "close")]
    Close,
    #[strum(serialize = "SIGINT")]
    Sigint,
    #[strum(serialize = "SIGTSTP")]
    Sigtstp,
    #[strum(serialize = "SIGCONT")]
    Sigcont,
}

impl InterfaceEvent {
    #[must_use]
    pub fn kind(&self) -> InterfaceEventKind {
        match self {
            InterfaceEvent::Line(_) => InterfaceEventKind::Line,
            InterfaceEvent::History(_) => InterfaceEventKind::History,
            InterfaceEvent::Pause => InterfaceEventKind::Pause,
            InterfaceEvent::Resume => InterfaceEventKind::Resume,
            InterfaceEvent::Close => InterfaceEventKind::Close,
            InterfaceEvent::Sigint => InterfaceEventKind::Sigint,
            InterfaceEvent::Sigtstp => InterfaceEventKind::Sigtstp,
            InterfaceEvent::Sigcont => InterfaceEventKind::Sigcont,
        }
    }
}

pub type EventListener = Box<dyn FnMut(&InterfaceEvent) + Send>;

/// Listener slots per event kind.
#[allow(missing_debug_implementations)]
#[derive(Default)]
pub struct EventListeners {
    slots: HashMap<InterfaceEventKind, Vec<EventListener>>,
}

impl EventListeners {
    pub fn add(&mut self, kind: InterfaceEventKind, listener: EventListener) {
        self.slots.entry(kind).or_default().push(listener);
    }

    #[must_use]
    pub fn count(&self, kind: InterfaceEventKind) -> usize {
        self.slots.get(&kind).map_or(0, Vec::len)
    }

    /// Calls every listener for the event's kind, in registration order.
    pub fn emit(&mut self, event: &InterfaceEvent) {
        if let Some(listeners) = self.slots.get_mut(&event.kind()) {
            for listener in listeners {
                listener(event);
            }
        }
    }

    pub fn clear(&mut self) { self.slots.clear(); }
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr,
              sync::{Arc, Mutex}};

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(InterfaceEventKind::Line, "line")]
    #[test_case(InterfaceEventKind::History, "history")]
    #[test_case(InterfaceEventKind::Sigint, "SIGINT")]
    #[test_case(InterfaceEventKind::Sigcont, "SIGCONT")]
    fn test_kind_names(kind: InterfaceEventKind, name: &str) {
        assert_eq!(kind.to_string(), name);
        assert_eq!(InterfaceEventKind::from_str(name).unwrap(), kind);
    }

    #[test]
    fn test_emit_in_registration_order() {
        let seen = Arc::new(Mutex::new(vec![]));
        let mut listeners = EventListeners::default();
        for tag in ["first", "second"] {
            let seen = seen.clone();
            listeners.add(
                InterfaceEventKind::Line,
                Box::new(move |event| seen.lock().unwrap().push(format!("{tag}: {event:?}"))),
            );
        }

        listeners.emit(&InterfaceEvent::Line("hi".into()));
        listeners.emit(&InterfaceEvent::Close);

        assert_eq!(listeners.count(InterfaceEventKind::Line), 2);
        assert_eq!(listeners.count(InterfaceEventKind::Close), 0);
        assert_eq!(
            *seen.lock().unwrap(),
            [r#"first: Line("hi")"#, r#"second: Line("hi")"#]
        );

        listeners.clear();
        assert_eq!(listeners.count(InterfaceEventKind::Line), 0);
    }
}
