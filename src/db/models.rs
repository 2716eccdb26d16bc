use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, FromRow)]
pub struct Property {
    pub id: i64,
    pub address: String,
    pub suburb: String,
    pub town_city: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub list_price: ListPrice,
    pub image_name: String,
    pub bedrooms: i64,
    pub ensuite: bool,
    pub sold: bool,
    pub featured: bool,
    pub pool: bool,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Column list matching [`Property`], for `SELECT` statements.
pub const PROPERTY_COLUMNS: &str = "id, address, suburb, town_city, description, list_price, \
     image_name, bedrooms, ensuite, sold, featured, pool, active, created_at, updated_at";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid list price {0:?}")]
pub struct ListPriceError(pub String);

/// Listing price with two fractional digits, held as whole cents.
/// Prices are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListPrice(u64);

impl ListPrice {
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Currency form for pages, e.g. `$1,250,000.00`.
    pub fn formatted(&self) -> String {
        let dollars = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("${}.{:02}", grouped, self.0 % 100)
    }
}

impl fmt::Display for ListPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl std::str::FromStr for ListPrice {
    type Err = ListPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ListPriceError(s.to_string());
        let trimmed = s.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for ListPrice {
    type Error = ListPriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_price() {
        assert_eq!("450000".parse::<ListPrice>().unwrap().cents(), 45_000_000);
        assert_eq!("450000.5".parse::<ListPrice>().unwrap().cents(), 45_000_050);
        assert_eq!("450000.05".parse::<ListPrice>().unwrap().cents(), 45_000_005);
        assert_eq!(" 99.99 ".parse::<ListPrice>().unwrap().cents(), 9_999);
    }

    #[test]
    fn test_reject_malformed_list_price() {
        for bad in ["", ".50", "12.345", "-100.00", "1e6", "12,000", "abc"] {
            assert!(bad.parse::<ListPrice>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_list_price_display() {
        let price = ListPrice::from_cents(125_000_050);
        assert_eq!(price.to_string(), "1250000.50");
        assert_eq!(price.formatted(), "$1,250,000.50");
        assert_eq!(ListPrice::from_cents(99_900).formatted(), "$999.00");
        assert_eq!(ListPrice::from_cents(0).formatted(), "$0.00");
    }

    #[test]
    fn test_small_and_large_prices_format() {
        assert_eq!(ListPrice::from_cents(5).formatted(), "$0.05");
        assert_eq!(ListPrice::from_cents(5).to_string(), "0.05");
        assert_eq!(ListPrice::from_cents(100_000).formatted(), "$1,000.00");
        assert_eq!(
            ListPrice::from_cents(u64::MAX).to_string().parse::<ListPrice>(),
            Ok(ListPrice::from_cents(u64::MAX))
        );
        assert!("184467440737095516.16".parse::<ListPrice>().is_err());
    }
}
