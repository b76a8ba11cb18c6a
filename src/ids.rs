//! Message identifier generation.

use uuid::Uuid;

/// Generates unique message ids, invoked once per created message.
pub trait IdentifierFactory: Send + Sync {
    fn generate(&self) -> String;
}

/// Random (v4) UUID ids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidFactory;

impl IdentifierFactory for UuidFactory {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Any `Fn() -> String` closure is a factory (handy for fixed ids in tests).
impl<F> IdentifierFactory for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_factory_yields_distinct_ids() {
        let factory = UuidFactory;
        let ids: HashSet<String> = (0..100).map(|_| factory.generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn uuid_factory_renders_hyphenated_uuid() {
        let id = UuidFactory.generate();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn closure_is_a_factory() {
        let factory = || "fixed-id".to_string();
        assert_eq!(factory.generate(), "fixed-id");
    }
}
