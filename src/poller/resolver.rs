//! Identifier resolution from page state.

use crate::page::Page;
use crate::poller::status::CorrelationId;

/// Reads the correlation identifier from one named input field.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    field: String,
}

impl IdentifierResolver {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// `None` means "not rendered yet", never an error.
    pub fn resolve<P: Page + ?Sized>(&self, page: &P) -> Option<CorrelationId> {
        page.input_value(&self.field).and_then(CorrelationId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;

    #[test]
    fn test_missing_and_empty_are_absent() {
        let resolver = IdentifierResolver::new("regRequestId");
        let page = StaticPage::new();
        assert_eq!(resolver.resolve(&page), None);

        page.set_input("regRequestId", "");
        assert_eq!(resolver.resolve(&page), None);

        page.set_input("regRequestId", "req-42");
        assert_eq!(resolver.resolve(&page).unwrap().as_str(), "req-42");
        // re-reading has no side effects
        assert_eq!(resolver.resolve(&page).unwrap().as_str(), "req-42");
    }

    #[test]
    fn test_other_fields_ignored() {
        let resolver = IdentifierResolver::new("pushAuthPushId");
        let page = StaticPage::new().with_input("pushAuthKeyId", "key-1");
        assert_eq!(resolver.resolve(&page), None);
    }
}
