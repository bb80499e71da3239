//! ListSessionsHandler - query handler for the admin session listing.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{Page, SessionFilter, SessionPage, SessionReader};

/// Query for listing sessions.
#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    pub filter: SessionFilter,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Handler for listing sessions.
pub struct ListSessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl ListSessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<SessionPage, DomainError> {
        let defaults = Page::default();
        let page = Page {
            page: query.page.unwrap_or(defaults.page).max(1),
            per_page: query.per_page.unwrap_or(defaults.per_page).clamp(1, 100),
        };
        self.reader.list(&query.filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionRecordId, Timestamp};
    use crate::ports::{SessionDetail, SessionStats, SessionSummary};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockReader {
        pages_seen: Mutex<Vec<Page>>,
    }

    #[async_trait]
    impl SessionReader for MockReader {
        async fn list(
            &self,
            _filter: &SessionFilter,
            page: Page,
        ) -> Result<SessionPage, DomainError> {
            self.pages_seen.lock().unwrap().push(page);
            Ok(SessionPage { items: vec![], total: 0, has_more: false })
        }

        async fn find_by_id(
            &self,
            _id: &SessionRecordId,
        ) -> Result<Option<SessionDetail>, DomainError> {
            Ok(None)
        }

        async fn stats(&self, _now: Timestamp) -> Result<SessionStats, DomainError> {
            unimplemented!("not used in this test")
        }

        async fn export(
            &self,
            _filter: &SessionFilter,
        ) -> Result<Vec<SessionSummary>, DomainError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn clamps_per_page_and_defaults_page() {
        let reader = Arc::new(MockReader { pages_seen: Mutex::new(vec![]) });
        let handler = ListSessionsHandler::new(reader.clone());

        handler
            .handle(ListSessionsQuery {
                per_page: Some(10_000),
                ..Default::default()
            })
            .await
            .unwrap();

        let pages = reader.pages_seen.lock().unwrap();
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].per_page, 100);
    }
}
