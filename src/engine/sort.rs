use super::coercer::CoercedEvent;

/// Anything ordered by its `HH:MM` start
pub trait Timed {
    fn sort_key(&self) -> String;
}

impl Timed for CoercedEvent<'_> {
    fn sort_key(&self) -> String {
        CoercedEvent::sort_key(self)
    }
}

/// Stable: events sharing a time keep their feed order. Untimed events go last.
pub fn sort_by_time<T: Timed>(mut events: Vec<T>) -> Vec<T> {
    events.sort_by_cached_key(|event| event.sort_key());
    events
}
