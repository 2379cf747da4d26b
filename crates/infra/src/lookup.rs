use std::str::FromStr;

use tracing::instrument;

use workwear_core::DomainError;
use workwear_inventory::{search_names, Catalog};

use crate::error::ServiceError;
use crate::store::InventoryStore;

/// Which name list a search runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Worker,
    Foreman,
}

impl FromStr for SearchKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "name" | "worker" => Ok(SearchKind::Worker),
            "foreman" => Ok(SearchKind::Foreman),
            other => Err(DomainError::validation(format!(
                "unknown search type {other:?}; expected name or foreman"
            ))),
        }
    }
}

/// Read-only queries over committed store state.
#[derive(Debug, Clone)]
pub struct LookupService<S> {
    store: S,
}

impl<S> LookupService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn foremen(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.store.foremen().await?)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<String>, ServiceError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let names = match kind {
            SearchKind::Worker => self.store.workers().await?,
            SearchKind::Foreman => self.store.foremen().await?,
        };
        Ok(search_names(&names, query))
    }

    pub async fn search_workers(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        self.search(query, SearchKind::Worker).await
    }

    pub async fn search_foremen(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        self.search(query, SearchKind::Foreman).await
    }

    pub async fn catalog(&self) -> Result<Catalog, ServiceError> {
        let stock = self.store.stock().await?;
        Ok(Catalog::from_stock(&stock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryInventoryStore, StoreSnapshot};
    use workwear_core::StockEntry;

    async fn service() -> LookupService<InMemoryInventoryStore> {
        let store = InMemoryInventoryStore::new();
        store
            .replace_all(StoreSnapshot {
                stock: vec![StockEntry::new("Cap", "", "S", 0)],
                workers: vec!["Ivan Petrenko".into(), "Anna".into()],
                foremen: vec!["Petro".into()],
            })
            .await
            .unwrap();
        LookupService::new(store)
    }

    #[tokio::test]
    async fn search_picks_the_requested_list() {
        let svc = service().await;
        assert_eq!(svc.search("an", SearchKind::Worker).await.unwrap(), vec!["Ivan Petrenko", "Anna"]);
        assert_eq!(svc.search_foremen("pet").await.unwrap(), vec!["Petro"]);
        assert_eq!(svc.search_workers("PETR").await.unwrap(), vec!["Ivan Petrenko"]);
        assert!(svc.search("", SearchKind::Worker).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_lists_types_without_zero_sizes() {
        let catalog = service().await.catalog().await.unwrap();
        assert_eq!(catalog.items().len(), 1);
        assert!(catalog.sizes_of("Cap", "").unwrap().is_empty());
    }

    #[test]
    fn search_kind_parses() {
        assert_eq!("name".parse::<SearchKind>().unwrap(), SearchKind::Worker);
        assert_eq!("Foreman".parse::<SearchKind>().unwrap(), SearchKind::Foreman);
        assert!("boss".parse::<SearchKind>().is_err());
    }
}
