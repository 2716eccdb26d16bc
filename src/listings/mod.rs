//! Listing queries and the view models pages render.
//!
//! The home page and the suburb filter deliberately run different queries:
//! home shows a random sample of active listings, while the filter ignores
//! `active` and returns rows in storage order.

use sqlx::SqlitePool;

use crate::db::{ListPrice, Property, PROPERTY_COLUMNS};

/// Most properties shown on one page
pub const PROPERTY_LIMIT: i64 = 21;
/// Suburb choices on the home page
pub const HOME_SUBURB_LIMIT: i64 = 18;
/// Suburb choices on filtered pages, before "All" is prepended
pub const FILTER_SUBURB_LIMIT: i64 = 21;

/// Route value meaning "no suburb restriction"
pub const ALL_SUBURBS: &str = "All";

/// Path prefix listing images are served from
pub const IMAGE_URL_PREFIX: &str = "/images/houses/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// Random active listings
    Home,
    /// Every listing, active or not
    All,
    /// Listings in exactly this suburb
    Suburb(String),
}

impl ListingScope {
    /// Scope for a `/filter/:suburb` path segment.
    pub fn from_filter(suburb: &str) -> Self {
        if suburb == ALL_SUBURBS {
            Self::All
        } else {
            Self::Suburb(suburb.to_string())
        }
    }
}

/// A property as handed to templates.
#[derive(Debug, Clone)]
pub struct PropertyView {
    pub id: i64,
    pub address: String,
    pub suburb: String,
    pub town_city: String,
    pub description: String,
    pub list_price: ListPrice,
    pub image_name: String,
    pub image_url: String,
    pub bedrooms: i64,
    pub ensuite: bool,
    pub sold: bool,
    pub featured: bool,
    pub pool: bool,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Property> for PropertyView {
    fn from(p: Property) -> Self {
        Self {
            image_url: format!("{}{}", IMAGE_URL_PREFIX, p.image_name),
            id: p.id,
            address: p.address,
            suburb: p.suburb,
            town_city: p.town_city,
            description: p.description,
            list_price: p.list_price,
            image_name: p.image_name,
            bedrooms: p.bedrooms,
            ensuite: p.ensuite,
            sold: p.sold,
            featured: p.featured,
            pool: p.pool,
            active: p.active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub properties: Vec<PropertyView>,
    pub suburbs: Vec<String>,
}

pub async fn load(db: &SqlitePool, scope: &ListingScope) -> Result<Listing, sqlx::Error> {
    let properties = fetch_properties(db, scope).await?;
    let suburbs = match scope {
        ListingScope::Home => home_suburbs(db).await?,
        ListingScope::All | ListingScope::Suburb(_) => filter_suburbs(db).await?,
    };

    Ok(Listing {
        properties: properties.into_iter().map(PropertyView::from).collect(),
        suburbs,
    })
}

async fn fetch_properties(db: &SqlitePool, scope: &ListingScope) -> Result<Vec<Property>, sqlx::Error> {
    match scope {
        ListingScope::Home => {
            let sql = format!(
                "SELECT {} FROM properties WHERE active = 1 ORDER BY RANDOM() LIMIT ?",
                PROPERTY_COLUMNS
            );
            sqlx::query_as(&sql).bind(PROPERTY_LIMIT).fetch_all(db).await
        }
        ListingScope::All => {
            let sql = format!("SELECT {} FROM properties LIMIT ?", PROPERTY_COLUMNS);
            sqlx::query_as(&sql).bind(PROPERTY_LIMIT).fetch_all(db).await
        }
        ListingScope::Suburb(suburb) => {
            let sql = format!(
                "SELECT {} FROM properties WHERE suburb = ? LIMIT ?",
                PROPERTY_COLUMNS
            );
            sqlx::query_as(&sql)
                .bind(suburb)
                .bind(PROPERTY_LIMIT)
                .fetch_all(db)
                .await
        }
    }
}

async fn home_suburbs(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT suburb FROM properties WHERE active = 1 LIMIT ?")
        .bind(HOME_SUBURB_LIMIT)
        .fetch_all(db)
        .await
}

async fn filter_suburbs(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let suburbs: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT suburb FROM properties ORDER BY suburb ASC LIMIT ?")
            .bind(FILTER_SUBURB_LIMIT)
            .fetch_all(db)
            .await?;

    let mut with_all = Vec::with_capacity(suburbs.len() + 1);
    with_all.push(ALL_SUBURBS.to_string());
    with_all.extend(suburbs);
    Ok(with_all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_property, sample_properties, seeded_test_pool, test_pool, SAMPLE_PROPERTY_COUNT};

    #[test]
    fn test_scope_from_filter() {
        assert_eq!(ListingScope::from_filter("All"), ListingScope::All);
        assert_eq!(
            ListingScope::from_filter("all"),
            ListingScope::Suburb("all".to_string())
        );
        assert_eq!(
            ListingScope::from_filter("Karori"),
            ListingScope::Suburb("Karori".to_string())
        );
    }

    #[tokio::test]
    async fn test_home_shows_only_active() {
        let db = seeded_test_pool().await;
        let listing = load(&db, &ListingScope::Home).await.unwrap();

        assert_eq!(listing.properties.len(), PROPERTY_LIMIT as usize);
        assert!(listing.properties.iter().all(|p| p.active));
        assert_eq!(listing.suburbs.len(), HOME_SUBURB_LIMIT as usize);
        assert!(!listing.suburbs.iter().any(|s| s == ALL_SUBURBS));
    }

    #[tokio::test]
    async fn test_home_suburbs_exclude_inactive_only_suburbs() {
        let db = test_pool().await;
        let mut sample = sample_properties().into_iter();
        let mut active = sample.next().unwrap();
        active.suburb = "Karori".to_string();
        let mut inactive = sample.next().unwrap();
        inactive.suburb = "Newtown".to_string();
        inactive.active = false;
        insert_property(&db, &active).await.unwrap();
        insert_property(&db, &inactive).await.unwrap();

        let listing = load(&db, &ListingScope::Home).await.unwrap();
        assert_eq!(listing.suburbs, vec!["Karori"]);
        assert_eq!(listing.properties.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_suburbs_include_inactive_only_suburbs() {
        let db = test_pool().await;
        let mut sample = sample_properties().into_iter();
        let mut active = sample.next().unwrap();
        active.suburb = "Karori".to_string();
        let mut inactive = sample.next().unwrap();
        inactive.suburb = "Newtown".to_string();
        inactive.active = false;
        insert_property(&db, &inactive).await.unwrap();
        insert_property(&db, &active).await.unwrap();

        let all = load(&db, &ListingScope::All).await.unwrap();
        assert_eq!(all.suburbs, vec!["All", "Karori", "Newtown"]);

        let newtown = load(&db, &ListingScope::Suburb("Newtown".to_string()))
            .await
            .unwrap();
        assert_eq!(newtown.suburbs, vec!["All", "Karori", "Newtown"]);
        assert_eq!(newtown.properties.len(), 1);

        let home = load(&db, &ListingScope::Home).await.unwrap();
        assert_eq!(home.suburbs, vec!["Karori"]);
    }

    #[tokio::test]
    async fn test_all_ignores_active_flag() {
        let db = test_pool().await;
        for mut property in sample_properties().into_iter().take(5) {
            property.active = false;
            insert_property(&db, &property).await.unwrap();
        }

        let listing = load(&db, &ListingScope::All).await.unwrap();
        assert_eq!(listing.properties.len(), 5);
        assert!(listing.properties.iter().all(|p| !p.active));
    }

    #[tokio::test]
    async fn test_all_is_capped_and_suburbs_sorted() {
        let db = seeded_test_pool().await;
        let listing = load(&db, &ListingScope::All).await.unwrap();

        assert!(SAMPLE_PROPERTY_COUNT > PROPERTY_LIMIT as usize);
        assert_eq!(listing.properties.len(), PROPERTY_LIMIT as usize);

        assert_eq!(listing.suburbs[0], ALL_SUBURBS);
        let rest = &listing.suburbs[1..];
        assert_eq!(rest.len(), FILTER_SUBURB_LIMIT as usize);
        let mut sorted = rest.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(rest, sorted.as_slice());
    }

    #[tokio::test]
    async fn test_suburb_filter_is_exact() {
        let db = seeded_test_pool().await;
        let listing = load(&db, &ListingScope::Suburb("Belmont".to_string()))
            .await
            .unwrap();

        assert!(!listing.properties.is_empty());
        assert!(listing.properties.iter().all(|p| p.suburb == "Belmont"));
        // inactive Belmont listings are included
        assert!(listing.properties.iter().any(|p| !p.active));
        assert_eq!(listing.suburbs[0], ALL_SUBURBS);

        let lower = load(&db, &ListingScope::Suburb("belmont".to_string()))
            .await
            .unwrap();
        assert!(lower.properties.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_suburb_is_empty() {
        let db = seeded_test_pool().await;
        let listing = load(&db, &ListingScope::Suburb("Atlantis".to_string()))
            .await
            .unwrap();
        assert!(listing.properties.is_empty());
        assert!(listing.suburbs.len() > 1);
    }

    #[tokio::test]
    async fn test_image_url_uses_prefix() {
        let db = seeded_test_pool().await;
        let listing = load(&db, &ListingScope::All).await.unwrap();
        for property in &listing.properties {
            assert_eq!(
                property.image_url,
                format!("/images/houses/{}", property.image_name)
            );
        }
    }
}
