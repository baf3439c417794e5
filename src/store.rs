use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::catalog::{Area, Location};
use crate::content::WhyUsItem;
use crate::error::Result;

/// A generated landing page as stored and served. Created only through the
/// bulk endpoint; afterwards only its active flag changes, or the row is
/// deleted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPage {
    pub id: i64,
    pub area_name: String,
    pub city_name: String,
    pub purpose: String,
    pub slug: String,
    pub overview: String,
    pub benefits: Vec<String>,
    pub why_us: Vec<WhyUsItem>,
    pub is_active: bool,
}

/// Candidate record for the bulk endpoint: a `DynamicPage` without an id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageCandidate {
    pub area_name: String,
    pub city_name: String,
    pub purpose: String,
    pub slug: String,
    pub overview: String,
    pub benefits: Vec<String>,
    pub why_us: Vec<WhyUsItem>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkOutcome {
    pub created: u32,
    pub skipped: u32,
    pub message: String,
}

#[derive(Clone)]
pub struct PageStore {
    pool: SqlitePool,
}

impl PageStore {
    pub async fn initialize(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Single-connection in-memory store. SQLite gives every connection its
    /// own `:memory:` database, so the pool must stay at one.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS areas (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                location_id INTEGER NOT NULL REFERENCES locations(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dynamic_pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_name TEXT NOT NULL,
                city_name TEXT NOT NULL,
                purpose TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                overview TEXT NOT NULL,
                benefits TEXT NOT NULL,
                why_us TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS landing_leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                page_slug TEXT,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now')),
                updated_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts candidates in input order, skipping any whose slug already
    /// exists, whether from a prior batch or earlier in this one. Each
    /// insert stands alone; a partially-new batch is a correctly-counted
    /// success, not an error.
    pub async fn insert_batch(&self, candidates: &[PageCandidate]) -> Result<BulkOutcome> {
        let mut created = 0u32;
        let mut skipped = 0u32;
        for candidate in candidates {
            let benefits = serde_json::to_string(&candidate.benefits)?;
            let why_us = serde_json::to_string(&candidate.why_us)?;
            let result = sqlx::query(
                r#"
                INSERT INTO dynamic_pages
                    (area_name, city_name, purpose, slug, overview, benefits, why_us, is_active)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(slug) DO NOTHING
                "#,
            )
            .bind(&candidate.area_name)
            .bind(&candidate.city_name)
            .bind(&candidate.purpose)
            .bind(&candidate.slug)
            .bind(&candidate.overview)
            .bind(&benefits)
            .bind(&why_us)
            .bind(candidate.is_active)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                skipped += 1;
            } else {
                created += 1;
            }
        }
        let message = format!("Created {created} pages, skipped {skipped} duplicates");
        info!(created, skipped, "bulk insert finished");
        Ok(BulkOutcome {
            created,
            skipped,
            message,
        })
    }

    pub async fn list_pages(&self) -> Result<Vec<DynamicPage>> {
        let rows = sqlx::query("SELECT * FROM dynamic_pages ORDER BY slug")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(page_from_row).collect()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<DynamicPage>> {
        let row = sqlx::query("SELECT * FROM dynamic_pages WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(page_from_row).transpose()
    }

    pub async fn get_page(&self, id: i64) -> Result<Option<DynamicPage>> {
        let row = sqlx::query("SELECT * FROM dynamic_pages WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(page_from_row).transpose()
    }

    /// Returns false when no page has this id.
    pub async fn set_active(&self, id: i64, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE dynamic_pages SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flips the active flag and returns the refreshed page.
    pub async fn toggle_active(&self, id: i64) -> Result<Option<DynamicPage>> {
        let result = sqlx::query("UPDATE dynamic_pages SET is_active = NOT is_active WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_page(id).await
    }

    pub async fn delete_page(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dynamic_pages WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        let rows = sqlx::query("SELECT id, name, slug FROM locations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| Location {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
            })
            .collect())
    }

    pub async fn areas_for_location(&self, location_id: i64) -> Result<Vec<Area>> {
        let rows = sqlx::query(
            "SELECT id, name, location_id FROM areas WHERE location_id = ?1 ORDER BY name",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(area_from_row).collect())
    }

    /// An area together with its city's name, for composing candidates
    /// server-side.
    pub async fn area_with_city(&self, area_id: i64) -> Result<Option<(Area, String)>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, a.name, a.location_id, l.name AS city_name
            FROM areas a JOIN locations l ON l.id = a.location_id
            WHERE a.id = ?1
            "#,
        )
        .bind(area_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| (area_from_row(&row), row.get("city_name"))))
    }

    /// Seeds the city/area catalog on first start. No-op when locations
    /// already exist.
    pub async fn seed_catalog(&self) -> Result<()> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM locations")
            .fetch_one(&self.pool)
            .await?
            .get("n");
        if count > 0 {
            return Ok(());
        }

        let catalog: &[(i64, &str, &str, &[(i64, &str)])] = &[
            (
                1,
                "Pune",
                "pune",
                &[(101, "Baner"), (102, "Hinjewadi"), (103, "Kharadi"), (104, "Viman Nagar")],
            ),
            (
                2,
                "Bengaluru",
                "bengaluru",
                &[
                    (201, "Koramangala 5th Block"),
                    (202, "HSR Layout"),
                    (203, "Indiranagar"),
                    (204, "Whitefield"),
                ],
            ),
            (
                3,
                "Mumbai",
                "mumbai",
                &[(301, "Andheri East"), (302, "Bandra Kurla Complex"), (303, "Lower Parel")],
            ),
            (
                4,
                "Hyderabad",
                "hyderabad",
                &[(401, "HITEC City"), (402, "Gachibowli"), (403, "Banjara Hills")],
            ),
            (
                5,
                "Gurugram",
                "gurugram",
                &[(501, "Cyber City"), (502, "Golf Course Road"), (503, "Udyog Vihar")],
            ),
        ];

        for (id, name, slug, areas) in catalog {
            sqlx::query("INSERT INTO locations (id, name, slug) VALUES (?1, ?2, ?3)")
                .bind(*id)
                .bind(*name)
                .bind(*slug)
                .execute(&self.pool)
                .await?;
            for (area_id, area_name) in *areas {
                sqlx::query("INSERT INTO areas (id, name, location_id) VALUES (?1, ?2, ?3)")
                    .bind(*area_id)
                    .bind(*area_name)
                    .bind(*id)
                    .execute(&self.pool)
                    .await?;
            }
        }
        info!("seeded location catalog");
        Ok(())
    }

    /// Upserts a captured lead keyed by email, keeping the latest page slug.
    pub async fn record_lead(&self, email: &str, page_slug: Option<&str>) -> Result<()> {
        let normalized_email = email.trim().to_ascii_lowercase();
        if normalized_email.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO landing_leads (email, page_slug, created_at, updated_at)
            VALUES (?1, ?2, STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'), STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(email) DO UPDATE SET
                page_slug = excluded.page_slug,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(normalized_email)
        .bind(page_slug)
        .execute(&self.pool)
        .await
        .map(|_| ())?;
        Ok(())
    }

    pub async fn lead_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM landing_leads")
            .fetch_one(&self.pool)
            .await?
            .get("n");
        Ok(count)
    }
}

fn area_from_row(row: &SqliteRow) -> Area {
    Area {
        id: row.get("id"),
        name: row.get("name"),
        location_id: row.get("location_id"),
    }
}

fn page_from_row(row: &SqliteRow) -> Result<DynamicPage> {
    let benefits_json: String = row.try_get("benefits")?;
    let why_us_json: String = row.try_get("why_us")?;
    Ok(DynamicPage {
        id: row.try_get("id")?,
        area_name: row.try_get("area_name")?,
        city_name: row.try_get("city_name")?,
        purpose: row.try_get("purpose")?,
        slug: row.try_get("slug")?,
        overview: row.try_get("overview")?,
        benefits: serde_json::from_str(&benefits_json)?,
        why_us: serde_json::from_str(&why_us_json)?,
        is_active: row.try_get("is_active")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;

    fn candidate(area: &str, city: &str, purpose: &str) -> PageCandidate {
        let content = content::compose(area, city, purpose);
        PageCandidate {
            area_name: area.to_string(),
            city_name: city.to_string(),
            purpose: purpose.to_string(),
            slug: content.slug,
            overview: content.overview,
            benefits: content.benefits,
            why_us: content.why_us,
            is_active: true,
        }
    }

    fn sample_batch() -> Vec<PageCandidate> {
        vec![
            candidate("Baner", "Pune", "GST Registration"),
            candidate("Hinjewadi", "Pune", "GST Registration"),
            candidate("Baner", "Pune", "Company Registration"),
        ]
    }

    #[tokio::test]
    async fn resubmitting_a_batch_skips_everything() {
        let store = PageStore::in_memory().await.expect("store");
        let batch = sample_batch();

        let first = store.insert_batch(&batch).await.expect("first insert");
        assert_eq!((first.created, first.skipped), (3, 0));

        let second = store.insert_batch(&batch).await.expect("second insert");
        assert_eq!((second.created, second.skipped), (0, 3));
        assert_eq!(store.list_pages().await.expect("list").len(), 3);
    }

    #[tokio::test]
    async fn duplicates_within_one_batch_are_skipped_in_order() {
        let store = PageStore::in_memory().await.expect("store");
        let mut batch = sample_batch();
        batch.push(candidate("Baner", "Pune", "GST Registration"));

        let outcome = store.insert_batch(&batch).await.expect("insert");
        assert_eq!((outcome.created, outcome.skipped), (3, 1));
        assert!(outcome.message.contains("3"));
        assert!(outcome.message.contains("1"));
    }

    #[tokio::test]
    async fn empty_batch_trivially_succeeds() {
        let store = PageStore::in_memory().await.expect("store");
        let outcome = store.insert_batch(&[]).await.expect("insert");
        assert_eq!((outcome.created, outcome.skipped), (0, 0));
    }

    #[tokio::test]
    async fn pages_round_trip_with_ordered_lists_intact() {
        let store = PageStore::in_memory().await.expect("store");
        let batch = vec![candidate("Koramangala 5th Block", "Bengaluru", "GST Registration")];
        store.insert_batch(&batch).await.expect("insert");

        let page = store
            .get_by_slug("koramangala-5th-block-gst-registration")
            .await
            .expect("fetch")
            .expect("page exists");
        assert_eq!(page.benefits, batch[0].benefits);
        assert_eq!(page.why_us, batch[0].why_us);
        assert!(page.is_active);
        assert!(store.get_by_slug("no-such-slug").await.expect("fetch").is_none());
    }

    #[tokio::test]
    async fn active_flag_toggles_and_pages_delete() {
        let store = PageStore::in_memory().await.expect("store");
        store
            .insert_batch(&[candidate("Baner", "Pune", "GST Registration")])
            .await
            .expect("insert");
        let page = store
            .get_by_slug("baner-gst-registration")
            .await
            .expect("fetch")
            .expect("page");

        assert!(store.set_active(page.id, false).await.expect("set"));
        let toggled = store
            .toggle_active(page.id)
            .await
            .expect("toggle")
            .expect("page");
        assert!(toggled.is_active);

        assert!(store.delete_page(page.id).await.expect("delete"));
        assert!(!store.delete_page(page.id).await.expect("second delete"));
        assert!(!store.set_active(page.id, true).await.expect("set on gone"));
    }

    #[tokio::test]
    async fn catalog_seeds_once_and_serves_areas() {
        let store = PageStore::in_memory().await.expect("store");
        store.seed_catalog().await.expect("seed");
        store.seed_catalog().await.expect("second seed is a no-op");

        let locations = store.list_locations().await.expect("locations");
        assert_eq!(locations.len(), 5);

        let pune = locations.iter().find(|l| l.name == "Pune").expect("pune");
        let areas = store.areas_for_location(pune.id).await.expect("areas");
        assert!(areas.iter().any(|a| a.name == "Baner"));

        let (baner, city) = store
            .area_with_city(areas.iter().find(|a| a.name == "Baner").expect("baner").id)
            .await
            .expect("lookup")
            .expect("pair");
        assert_eq!(baner.name, "Baner");
        assert_eq!(city, "Pune");

        assert!(store.areas_for_location(9999).await.expect("empty").is_empty());
    }

    #[tokio::test]
    async fn leads_upsert_by_email() {
        let store = PageStore::in_memory().await.expect("store");
        store
            .record_lead("Founder@Example.com", Some("baner-gst-registration"))
            .await
            .expect("record");
        store
            .record_lead("founder@example.com", Some("hinjewadi-gst-registration"))
            .await
            .expect("update");
        store.record_lead("   ", None).await.expect("blank ignored");
        assert_eq!(store.lead_count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn generation_flow_end_to_end() {
        use crate::selection::SelectionState;
        use crate::web::views::{render_public_page, standard_plans};

        let store = PageStore::in_memory().await.expect("store");
        store.seed_catalog().await.expect("seed");

        let pune = store
            .list_locations()
            .await
            .expect("locations")
            .into_iter()
            .find(|l| l.name == "Pune")
            .expect("pune");
        let baner = store
            .areas_for_location(pune.id)
            .await
            .expect("areas")
            .into_iter()
            .find(|a| a.name == "Baner")
            .expect("baner");

        let mut state = SelectionState::new();
        let epoch = state.toggle_city(&pune);
        assert!(state.apply_pool(epoch, vec![baner.clone()]));
        state.toggle_area(baner.id);
        state.toggle_purpose("GST Registration");

        let candidates = state.plan().expect("plan");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].slug, "baner-gst-registration");
        assert_eq!(candidates[0].benefits.len(), 8);

        let outcome = store.insert_batch(&candidates).await.expect("submit");
        assert_eq!((outcome.created, outcome.skipped), (1, 0));

        let page = store
            .get_by_slug("baner-gst-registration")
            .await
            .expect("fetch")
            .expect("published page");
        let html = render_public_page(&page, &standard_plans());
        assert!(html.contains("Baner"));
        assert!(html.contains("GST Registration"));
    }
}
