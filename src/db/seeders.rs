//! Sample listings for development and tests.
//!
//! The seeder is deterministic: the same 30 properties spread over 24 suburbs
//! every time, with a handful marked inactive so listing queries have
//! something to filter out.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use super::ListPrice;

const SUBURBS: [(&str, &str); 24] = [
    ("Addington", "Christchurch"),
    ("Avondale", "Auckland"),
    ("Beckenham", "Christchurch"),
    ("Belmont", "Lower Hutt"),
    ("Brooklyn", "Wellington"),
    ("Cashmere", "Christchurch"),
    ("Devonport", "Auckland"),
    ("Epsom", "Auckland"),
    ("Fendalton", "Christchurch"),
    ("Grey Lynn", "Auckland"),
    ("Halswell", "Christchurch"),
    ("Hataitai", "Wellington"),
    ("Island Bay", "Wellington"),
    ("Karori", "Wellington"),
    ("Kelburn", "Wellington"),
    ("Merivale", "Christchurch"),
    ("Mount Eden", "Auckland"),
    ("Newtown", "Wellington"),
    ("Ponsonby", "Auckland"),
    ("Remuera", "Auckland"),
    ("Riccarton", "Christchurch"),
    ("St Albans", "Christchurch"),
    ("Sumner", "Christchurch"),
    ("Thorndon", "Wellington"),
];

const STREETS: [&str; 6] = [
    "Queen Street",
    "Victoria Avenue",
    "Harbour View Road",
    "Kowhai Lane",
    "Rimu Crescent",
    "Totara Drive",
];

pub const SAMPLE_PROPERTY_COUNT: usize = 30;

/// A listing ready to insert.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub address: String,
    pub suburb: String,
    pub town_city: String,
    pub description: String,
    pub list_price: ListPrice,
    pub image_name: String,
    pub bedrooms: i64,
    pub ensuite: bool,
    pub sold: bool,
    pub featured: bool,
    pub pool: bool,
    pub active: bool,
}

pub fn sample_properties() -> Vec<NewProperty> {
    (0..SAMPLE_PROPERTY_COUNT)
        .map(|i| {
            let (suburb, town_city) = SUBURBS[i % SUBURBS.len()];
            let bedrooms = (i % 5) as i64 + 1;
            NewProperty {
                address: format!("{} {}", 10 + i * 7, STREETS[i % STREETS.len()]),
                suburb: suburb.to_string(),
                town_city: town_city.to_string(),
                description: format!(
                    "A {}-bedroom home in the heart of {}, close to schools and transport.",
                    bedrooms, suburb
                ),
                list_price: ListPrice::from_cents(
                    (450_000 + i as u64 * 37_500) * 100 + (i as u64 % 2) * 50,
                ),
                image_name: format!("house{}.jpg", i % 12 + 1),
                bedrooms,
                ensuite: i % 2 == 0,
                sold: i % 9 == 4,
                featured: i % 4 == 0,
                pool: i % 6 == 1,
                active: i % 7 != 3,
            }
        })
        .collect()
}

pub async fn insert_property(pool: &SqlitePool, property: &NewProperty) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO properties
        (address, suburb, town_city, description, list_price, image_name,
         bedrooms, ensuite, sold, featured, pool, active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&property.address)
    .bind(&property.suburb)
    .bind(&property.town_city)
    .bind(&property.description)
    .bind(property.list_price.to_string())
    .bind(&property.image_name)
    .bind(property.bedrooms)
    .bind(property.ensuite)
    .bind(property.sold)
    .bind(property.featured)
    .bind(property.pool)
    .bind(property.active)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Seed sample listings when the properties table is empty.
pub async fn seed_sample_properties(pool: &SqlitePool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!("Properties table already has {} rows, skipping sample data", existing);
        return Ok(());
    }

    let properties = sample_properties();
    for property in &properties {
        insert_property(pool, property).await?;
    }

    info!("Seeded {} sample properties", properties.len());
    Ok(())
}
