// src/services/catalog_sync.rs
//! Merges an external product feed into the local catalog, keyed by `external_id`.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};

use super::feed::{FeedClient, FeedRecord, SyncError};
use crate::models::product::{MAX_EXTERNAL_ID_LEN, MAX_NAME_LEN, MAX_SLUG_LEN, MAX_URL_LEN};
use crate::utils::{numbered_slug, slugify_or};

/// Advisory lock key shared by every process running a catalog sync.
const CATALOG_SYNC_LOCK_KEY: i64 = 0x0AF1_11AD_05C0;

/// Fields a sync (or an admin edit) writes onto a product row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: String,
}

impl ProductFields {
    pub fn from_record(record: &FeedRecord, slug: String) -> Self {
        Self {
            name: record.name.clone(),
            slug,
            price: record.price(),
            description: record.external_description.clone(),
            image: record.external_image.clone(),
            link: record.external_link.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub updated: i32,
    pub created: i32,
    pub skipped: i32,
}

impl SyncReport {
    /// Products updated or created, the figure recorded as the last sync count.
    pub fn processed(&self) -> i32 {
        self.updated + self.created
    }
}

/// Unit of work for one merge. Implementations must make all writes visible together or not at all.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn default_subcategory(&mut self) -> Result<Option<i64>, sqlx::Error>;
    async fn product_by_external_id(&mut self, external_id: &str) -> Result<Option<i64>, sqlx::Error>;
    async fn slug_owner(&mut self, slug: &str) -> Result<Option<i64>, sqlx::Error>;
    async fn update_product(&mut self, id: i64, fields: &ProductFields) -> Result<(), sqlx::Error>;
    async fn insert_product(
        &mut self,
        fields: &ProductFields,
        subcategory_id: Option<i64>,
        external_id: Option<&str>,
    ) -> Result<i64, sqlx::Error>;
}

/// Slug derived from `name` that is free or already belongs to `owner`; collisions get `-2`, `-3`, ...
pub async fn available_slug<S: CatalogStore>(
    store: &mut S,
    name: &str,
    owner: Option<i64>,
) -> Result<String, sqlx::Error> {
    let base = slugify_or(name, "product");
    let mut n = 1;
    loop {
        let candidate = numbered_slug(&base, n, MAX_SLUG_LEN);
        match store.slug_owner(&candidate).await? {
            None => return Ok(candidate),
            Some(id) if Some(id) == owner => return Ok(candidate),
            Some(_) => n += 1,
        }
    }
}

/// Slug for one record of a batch. Slugs held by products in `batch` count as free; slugs already
/// planned for earlier records do not.
async fn batch_slug<S: CatalogStore>(
    store: &mut S,
    name: &str,
    batch: &HashSet<i64>,
    claimed: &mut HashSet<String>,
) -> Result<String, sqlx::Error> {
    let base = slugify_or(name, "product");
    let mut n = 1;
    loop {
        let candidate = numbered_slug(&base, n, MAX_SLUG_LEN);
        if !claimed.contains(&candidate) {
            let held_elsewhere = match store.slug_owner(&candidate).await? {
                Some(id) => !batch.contains(&id),
                None => false,
            };
            if !held_elsewhere {
                claimed.insert(candidate.clone());
                return Ok(candidate);
            }
        }
        n += 1;
    }
}

/// Why a record cannot be stored at all, if it cannot.
fn oversized_field(record: &FeedRecord) -> Option<&'static str> {
    if record.external_id.chars().count() > MAX_EXTERNAL_ID_LEN {
        Some("external_id")
    } else if record.name.chars().count() > MAX_NAME_LEN {
        Some("name")
    } else if record.external_link.chars().count() > MAX_URL_LEN {
        Some("external_link")
    } else if record.external_image.as_ref().is_some_and(|i| i.chars().count() > MAX_URL_LEN) {
        Some("external_image")
    } else {
        None
    }
}

enum Target {
    Existing(i64),
    New(i64),
}

/// Plans every slug of the batch before writing anything. Rerunning an unchanged feed rewrites
/// the same values.
pub async fn merge_records<S: CatalogStore>(
    store: &mut S,
    records: &[FeedRecord],
) -> Result<SyncReport, sqlx::Error> {
    let default_subcategory = store.default_subcategory().await?;
    let mut report = SyncReport::default();

    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(records.len());
    for record in records {
        if record.external_id.trim().is_empty() {
            warn!(name = %record.name, "Feed record without external_id, skipping");
            report.skipped += 1;
            continue;
        }
        if let Some(field) = oversized_field(record) {
            warn!(external_id = %record.external_id, field, "Feed record field too long, skipping");
            report.skipped += 1;
            continue;
        }
        if !seen.insert(record.external_id.as_str()) {
            warn!(external_id = %record.external_id, "Duplicate external_id in feed, skipping");
            report.skipped += 1;
            continue;
        }

        let target = match store.product_by_external_id(&record.external_id).await? {
            Some(id) => Target::Existing(id),
            None => {
                let Some(subcategory_id) = default_subcategory else {
                    warn!(
                        external_id = %record.external_id,
                        "No subcategories defined, cannot add new product from the API"
                    );
                    report.skipped += 1;
                    continue;
                };
                Target::New(subcategory_id)
            }
        };
        accepted.push((record, target));
    }

    let batch: HashSet<i64> = accepted
        .iter()
        .filter_map(|(_, target)| match target {
            Target::Existing(id) => Some(*id),
            Target::New(_) => None,
        })
        .collect();
    let mut claimed = HashSet::new();
    let mut planned = Vec::with_capacity(accepted.len());
    for (record, target) in accepted {
        let slug = batch_slug(store, &record.name, &batch, &mut claimed).await?;
        planned.push((record, target, ProductFields::from_record(record, slug)));
    }

    for (record, target, fields) in planned {
        match target {
            Target::Existing(id) => {
                store.update_product(id, &fields).await?;
                report.updated += 1;
            }
            Target::New(subcategory_id) => {
                store
                    .insert_product(&fields, Some(subcategory_id), Some(&record.external_id))
                    .await?;
                report.created += 1;
            }
        }
    }

    Ok(report)
}

/// Fetches `url` and merges it in a single transaction. A fetch failure returns before the
/// database is touched; a merge failure rolls back every write of the run.
#[instrument(skip(client, pool))]
pub async fn sync_catalog(client: &FeedClient, pool: &PgPool, url: &str) -> Result<SyncReport, SyncError> {
    let records = client.fetch(url).await?;
    info!(records = records.len(), "Fetched external product feed");

    let mut store = PgCatalogStore::begin(pool).await?;
    store.lock_for_sync().await?;
    store.defer_slug_uniqueness().await?;
    let report = merge_records(&mut store, &records).await?;
    store.commit().await?;

    info!(updated = report.updated, created = report.created, skipped = report.skipped, "Catalog sync committed");
    Ok(report)
}

pub struct PgCatalogStore {
    tx: Transaction<'static, Postgres>,
}

impl PgCatalogStore {
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(Self { tx: pool.begin().await? })
    }

    /// Serializes sync runs across processes until this transaction ends.
    pub async fn lock_for_sync(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CATALOG_SYNC_LOCK_KEY)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Lets a batch swap slugs between products; uniqueness is checked again at commit.
    pub async fn defer_slug_uniqueness(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("SET CONSTRAINTS products_slug_key DEFERRED")
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

impl CatalogStore for PgCatalogStore {
    async fn default_subcategory(&mut self) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM subcategories ORDER BY id LIMIT 1")
            .fetch_optional(&mut *self.tx)
            .await
    }

    async fn product_by_external_id(&mut self, external_id: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM products WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&mut *self.tx)
            .await
    }

    async fn slug_owner(&mut self, slug: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM products WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&mut *self.tx)
            .await
    }

    async fn update_product(&mut self, id: i64, fields: &ProductFields) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE products SET
                name = $2, slug = $3, price = $4, description = $5, image = $6, link = $7,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.image)
        .bind(&fields.link)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_product(
        &mut self,
        fields: &ProductFields,
        subcategory_id: Option<i64>,
        external_id: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO products (name, slug, price, description, image, link, subcategory_id, external_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.image)
        .bind(&fields.link)
        .bind(subcategory_id)
        .bind(external_id)
        .fetch_one(&mut *self.tx)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::feed::FeedPrice;

    #[derive(Debug, Clone, PartialEq)]
    struct StoredProduct {
        id: i64,
        fields: ProductFields,
        subcategory_id: Option<i64>,
        external_id: Option<String>,
    }

    #[derive(Default)]
    struct MemoryCatalog {
        subcategories: Vec<i64>,
        products: Vec<StoredProduct>,
        next_id: i64,
    }

    impl MemoryCatalog {
        fn with_subcategory(id: i64) -> Self {
            Self { subcategories: vec![id], ..Default::default() }
        }

        fn by_external_id(&self, external_id: &str) -> Option<&StoredProduct> {
            self.products.iter().find(|p| p.external_id.as_deref() == Some(external_id))
        }
    }

    impl CatalogStore for MemoryCatalog {
        async fn default_subcategory(&mut self) -> Result<Option<i64>, sqlx::Error> {
            Ok(self.subcategories.iter().min().copied())
        }

        async fn product_by_external_id(&mut self, external_id: &str) -> Result<Option<i64>, sqlx::Error> {
            Ok(self.by_external_id(external_id).map(|p| p.id))
        }

        async fn slug_owner(&mut self, slug: &str) -> Result<Option<i64>, sqlx::Error> {
            Ok(self.products.iter().find(|p| p.fields.slug == slug).map(|p| p.id))
        }

        async fn update_product(&mut self, id: i64, fields: &ProductFields) -> Result<(), sqlx::Error> {
            let product = self
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(sqlx::Error::RowNotFound)?;
            product.fields = fields.clone();
            Ok(())
        }

        async fn insert_product(
            &mut self,
            fields: &ProductFields,
            subcategory_id: Option<i64>,
            external_id: Option<&str>,
        ) -> Result<i64, sqlx::Error> {
            self.next_id += 1;
            self.products.push(StoredProduct {
                id: self.next_id,
                fields: fields.clone(),
                subcategory_id,
                external_id: external_id.map(str::to_string),
            });
            Ok(self.next_id)
        }
    }

    fn record(external_id: &str, name: &str, price: &str) -> FeedRecord {
        FeedRecord {
            external_id: external_id.to_string(),
            name: name.to_string(),
            external_price: Some(FeedPrice::Text(price.to_string())),
            external_description: Some("d".to_string()),
            external_image: Some("/i.jpg".to_string()),
            external_link: format!("https://x/{external_id}"),
        }
    }

    #[tokio::test]
    async fn unseen_record_creates_product_in_default_subcategory() {
        let mut store = MemoryCatalog::with_subcategory(4);
        let report = merge_records(&mut store, &[record("EXT001", "Widget", "$10.50")]).await.unwrap();

        assert_eq!(report, SyncReport { updated: 0, created: 1, skipped: 0 });
        let product = store.by_external_id("EXT001").unwrap();
        assert_eq!(product.fields.slug, "widget");
        assert_eq!(product.fields.price, Decimal::new(1050, 2));
        assert_eq!(product.fields.link, "https://x/EXT001");
        assert_eq!(product.subcategory_id, Some(4));
    }

    #[tokio::test]
    async fn default_subcategory_is_lowest_id() {
        let mut store = MemoryCatalog { subcategories: vec![9, 3, 5], ..Default::default() };
        merge_records(&mut store, &[record("EXT001", "Widget", "$1")]).await.unwrap();
        assert_eq!(store.by_external_id("EXT001").unwrap().subcategory_id, Some(3));
    }

    #[tokio::test]
    async fn known_record_updates_in_place() {
        let mut store = MemoryCatalog::with_subcategory(1);
        merge_records(&mut store, &[record("EXT001", "Widget", "$10.50")]).await.unwrap();
        let original_id = store.by_external_id("EXT001").unwrap().id;

        let report = merge_records(&mut store, &[record("EXT001", "Widget Pro", "$1,180")]).await.unwrap();

        assert_eq!(report, SyncReport { updated: 1, created: 0, skipped: 0 });
        assert_eq!(store.products.len(), 1);
        let product = store.by_external_id("EXT001").unwrap();
        assert_eq!(product.id, original_id);
        assert_eq!(product.fields.name, "Widget Pro");
        assert_eq!(product.fields.slug, "widget-pro");
        assert_eq!(product.fields.price, Decimal::from(1180));
    }

    #[tokio::test]
    async fn unparsable_price_defaults_to_zero_without_aborting() {
        let mut store = MemoryCatalog::with_subcategory(1);
        let report = merge_records(
            &mut store,
            &[record("EXT001", "Widget", "precio a consultar"), record("EXT002", "Gadget", "€75")],
        )
        .await
        .unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(store.by_external_id("EXT001").unwrap().fields.price, Decimal::ZERO);
        assert_eq!(store.by_external_id("EXT002").unwrap().fields.price, Decimal::from(75));
    }

    #[tokio::test]
    async fn without_subcategory_new_records_are_skipped_but_updates_apply() {
        let mut store = MemoryCatalog::default();
        store.products.push(StoredProduct {
            id: 1,
            fields: ProductFields {
                name: "Old".into(),
                slug: "old".into(),
                price: Decimal::ONE,
                description: None,
                image: None,
                link: "https://old".into(),
            },
            subcategory_id: None,
            external_id: Some("EXT001".into()),
        });
        store.next_id = 1;

        let report = merge_records(
            &mut store,
            &[record("EXT009", "Nuevo", "$5"), record("EXT001", "Renamed", "$2")],
        )
        .await
        .unwrap();

        assert_eq!(report, SyncReport { updated: 1, created: 0, skipped: 1 });
        assert_eq!(report.processed(), 1);
        assert_eq!(store.products.len(), 1);
        assert_eq!(store.products[0].fields.name, "Renamed");
    }

    #[tokio::test]
    async fn repeated_sync_is_idempotent() {
        let feed = vec![
            record("EXT001", "Widget", "$10.50"),
            record("EXT002", "Widget", "$12"),
            record("EXT003", "Smartwatch Pro S", "$250"),
        ];
        let mut store = MemoryCatalog::with_subcategory(1);

        let first = merge_records(&mut store, &feed).await.unwrap();
        let after_first = store.products.clone();
        let second = merge_records(&mut store, &feed).await.unwrap();

        assert_eq!(first.processed(), 3);
        assert_eq!(second, SyncReport { updated: 3, created: 0, skipped: 0 });
        assert_eq!(store.products, after_first);
    }

    #[tokio::test]
    async fn swapped_names_settle_on_the_same_slugs_every_run() {
        let mut store = MemoryCatalog::with_subcategory(1);
        merge_records(&mut store, &[record("EXT1", "Foo", "$1"), record("EXT2", "Bar", "$2")])
            .await
            .unwrap();

        let feed = vec![record("EXT1", "Bar", "$1"), record("EXT2", "Foo", "$2")];
        let first = merge_records(&mut store, &feed).await.unwrap();
        let after_first = store.products.clone();
        let second = merge_records(&mut store, &feed).await.unwrap();

        assert_eq!(first, SyncReport { updated: 2, created: 0, skipped: 0 });
        assert_eq!(second, first);
        assert_eq!(store.products, after_first);
        assert_eq!(store.by_external_id("EXT1").unwrap().fields.slug, "bar");
        assert_eq!(store.by_external_id("EXT2").unwrap().fields.slug, "foo");
    }

    #[tokio::test]
    async fn slugs_of_products_outside_the_feed_stay_taken() {
        let mut store = MemoryCatalog::with_subcategory(1);
        merge_records(&mut store, &[record("EXT1", "Widget", "$1")]).await.unwrap();

        merge_records(&mut store, &[record("EXT2", "Widget", "$2")]).await.unwrap();

        assert_eq!(store.by_external_id("EXT1").unwrap().fields.slug, "widget");
        assert_eq!(store.by_external_id("EXT2").unwrap().fields.slug, "widget-2");
    }

    #[tokio::test]
    async fn long_colliding_names_keep_slugs_within_column() {
        let name = "a".repeat(MAX_NAME_LEN);
        let mut store = MemoryCatalog::with_subcategory(1);
        let report = merge_records(&mut store, &[record("EXT1", &name, "$1"), record("EXT2", &name, "$2")])
            .await
            .unwrap();

        assert_eq!(report.created, 2);
        let first = &store.by_external_id("EXT1").unwrap().fields.slug;
        let second = &store.by_external_id("EXT2").unwrap().fields.slug;
        assert_eq!(first.len(), MAX_SLUG_LEN);
        assert!(second.len() <= MAX_SLUG_LEN);
        assert!(second.ends_with("-2"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn records_too_long_for_their_columns_are_skipped() {
        let long_name = record("EXT1", &"n".repeat(MAX_NAME_LEN + 1), "$1");
        let mut long_link = record("EXT2", "Link", "$1");
        long_link.external_link = format!("https://x/{}", "l".repeat(MAX_URL_LEN));
        let mut long_image = record("EXT3", "Image", "$1");
        long_image.external_image = Some(format!("/{}", "i".repeat(MAX_URL_LEN)));
        let long_id = record(&"E".repeat(MAX_EXTERNAL_ID_LEN + 1), "Id", "$1");

        let mut store = MemoryCatalog::with_subcategory(1);
        let report = merge_records(
            &mut store,
            &[long_name, long_link, long_image, long_id, record("EXT5", "Fine", "$1")],
        )
        .await
        .unwrap();

        assert_eq!(report, SyncReport { updated: 0, created: 1, skipped: 4 });
        assert_eq!(store.products.len(), 1);
        assert_eq!(store.products[0].fields.slug, "fine");
    }

    #[tokio::test]
    async fn price_beyond_column_is_stored_as_zero() {
        let mut store = MemoryCatalog::with_subcategory(1);
        let report = merge_records(&mut store, &[record("EXT1", "Yacht", "$10,000,000,000")])
            .await
            .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(store.by_external_id("EXT1").unwrap().fields.price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn duplicate_external_id_in_feed_keeps_first_record() {
        let mut store = MemoryCatalog::with_subcategory(1);
        let report = merge_records(&mut store, &[record("EXT1", "Widget", "$1"), record("EXT1", "Gadget", "$2")])
            .await
            .unwrap();

        assert_eq!(report, SyncReport { updated: 0, created: 1, skipped: 1 });
        assert_eq!(store.products.len(), 1);
        assert_eq!(store.products[0].fields.name, "Widget");
    }

    #[tokio::test]
    async fn colliding_names_get_suffixed_slugs() {
        let mut store = MemoryCatalog::with_subcategory(1);
        merge_records(
            &mut store,
            &[record("EXT001", "Widget", "$1"), record("EXT002", "Widget", "$2")],
        )
        .await
        .unwrap();

        assert_eq!(store.by_external_id("EXT001").unwrap().fields.slug, "widget");
        assert_eq!(store.by_external_id("EXT002").unwrap().fields.slug, "widget-2");
    }

    #[tokio::test]
    async fn blank_external_id_is_skipped() {
        let mut store = MemoryCatalog::with_subcategory(1);
        let report = merge_records(&mut store, &[record("  ", "Ghost", "$1")]).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert!(store.products.is_empty());
    }
}
