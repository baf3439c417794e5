use crate::constants::DEFAULT_DATABASE_URL;
use crate::error::Result;
use crate::store::PageStore;

#[derive(Clone)]
pub struct AppState {
    pages: PageStore,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let pages = PageStore::initialize(&database_url).await?;
        pages.seed_catalog().await?;
        Ok(Self { pages })
    }

    pub fn with_store(pages: PageStore) -> Self {
        Self { pages }
    }

    pub fn store(&self) -> &PageStore {
        &self.pages
    }
}
