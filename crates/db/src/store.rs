//! [`PageStore`] backed by PostgreSQL.

use async_trait::async_trait;
use pages_core::error::CoreError;
use pages_core::page::{Page, PageDraft, PageUpdate};
use pages_core::revision::Revision;
use pages_core::store::PageStore;
use pages_core::types::DbId;

use crate::repositories::{PageRepo, RevisionRepo};
use crate::DbPool;

/// PostgreSQL unique violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgPageStore {
    pool: DbPool,
}

impl PgPageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error onto the domain error type.
///
/// Unique violations on `uq_`-prefixed constraints become
/// [`CoreError::Conflict`]; everything else is a storage failure.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Page store query failed");
    CoreError::Storage(Box::new(err))
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(map_sqlx_error)
    }

    async fn find_page(&self, id: DbId) -> Result<Option<Page>, CoreError> {
        let row = PageRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Page::from))
    }

    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, CoreError> {
        let row = PageRepo::find_by_slug(&self.pool, slug)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Page::from))
    }

    async fn list_pages(&self) -> Result<Vec<Page>, CoreError> {
        let rows = PageRepo::list(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Page::from).collect())
    }

    async fn insert_page(&self, draft: &PageDraft, editor_id: DbId) -> Result<Page, CoreError> {
        let row = PageRepo::create(&self.pool, draft, editor_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn save_with_revision(
        &self,
        page_id: DbId,
        update: &PageUpdate,
    ) -> Result<Option<(Page, Revision)>, CoreError> {
        let saved = PageRepo::save_with_revision(&self.pool, page_id, update)
            .await
            .map_err(map_sqlx_error)?;
        Ok(saved.map(|(page, revision)| (page.into(), revision.into())))
    }

    async fn update_status(
        &self,
        page_id: DbId,
        status: &str,
        editor_id: DbId,
    ) -> Result<Option<Page>, CoreError> {
        let row = PageRepo::update_status(&self.pool, page_id, status, editor_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Page::from))
    }

    async fn delete_page(&self, page_id: DbId) -> Result<bool, CoreError> {
        PageRepo::delete(&self.pool, page_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_revision(&self, id: DbId) -> Result<Option<Revision>, CoreError> {
        let row = RevisionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Revision::from))
    }

    async fn list_revisions(&self, page_id: DbId) -> Result<Vec<Revision>, CoreError> {
        let rows = RevisionRepo::list_by_page(&self.pool, page_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Revision::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_are_storage_failures() {
        assert_matches!(map_sqlx_error(sqlx::Error::RowNotFound), CoreError::Storage(_));
        assert_matches!(map_sqlx_error(sqlx::Error::PoolTimedOut), CoreError::Storage(_));
    }
}
