//! Property search query construction.
//!
//! A [`PropertySearch`] is the caller's bag of optional constraints. It is
//! turned into an ordered list of [`Filter`]s, and the list is folded into one
//! parameterized statement by [`SearchQuery::build`]. Each filter knows its
//! column expression, its operator and its bound value, so the statement text
//! never depends on which particular filters happen to be present: the first
//! emitted predicate opens the `WHERE` clause and every later one is joined
//! with `AND`.
//!
//! The same filter list drives the in-memory backend through
//! [`Filter::matches`], so both backends agree on what a search returns.

use crate::db::Property;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};


/// Select list, source tables and review join shared by every search.
const BASE_QUERY: &str = "SELECT properties.*, avg(property_reviews.rating) AS average_rating\n\
FROM properties\n\
JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Expression compared against price bounds: whole currency units.
const NIGHTLY_PRICE_EXPR: &str = "properties.cost_per_night / 100";

/// Optional constraints for a property search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySearch {
    /// Case-insensitive substring of the city name.
    pub city: Option<String>,
    /// Lowest acceptable nightly price, in whole currency units.
    pub minimum_price_per_night: Option<i32>,
    /// Highest acceptable nightly price, in whole currency units.
    pub maximum_price_per_night: Option<i32>,
    /// Only properties listed by this owner.
    pub owner_id: Option<i32>,
    /// Lowest acceptable average review rating.
    pub minimum_rating: Option<Decimal>,
}

impl PropertySearch {
    /// Creates an empty search matching every reviewed property.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to cities containing `city`.
    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the lower nightly price bound.
    #[must_use]
    pub fn minimum_price_per_night(mut self, price: i32) -> Self {
        self.minimum_price_per_night = Some(price);
        self
    }

    /// Sets the upper nightly price bound.
    #[must_use]
    pub fn maximum_price_per_night(mut self, price: i32) -> Self {
        self.maximum_price_per_night = Some(price);
        self
    }

    /// Restricts results to one owner.
    #[must_use]
    pub fn owner_id(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the lower average rating bound.
    #[must_use]
    pub fn minimum_rating(mut self, rating: Decimal) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Row-level filters present in this search, in clause order:
    /// city, minimum price, maximum price, owner.
    ///
    /// A blank city is treated as absent.
    #[must_use]
    pub fn filters(&self) -> Vec<Filter> {
        let city = self
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(|city| Filter::CityContains(city.to_string()));

        [
            city,
            self.minimum_price_per_night.map(Filter::MinNightlyPrice),
            self.maximum_price_per_night.map(Filter::MaxNightlyPrice),
            self.owner_id.map(Filter::Owner),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Whether an average rating passes the `minimum_rating` bound.
    ///
    /// A property without reviews has no average and never passes a search,
    /// matching the inner join against reviews.
    #[must_use]
    pub fn accepts_rating(&self, average_rating: Option<Decimal>) -> bool {
        match (average_rating, self.minimum_rating) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(avg), Some(min)) => avg >= min,
        }
    }
}

/// Comparison operator of a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Case-insensitive pattern match.
    ILike,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `=`
    Equal,
}

impl Operator {
    /// SQL spelling of the operator.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::ILike => "ILIKE",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Equal => "=",
        }
    }
}

/// Value bound to a numbered statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text value.
    Text(String),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    BigInt(i64),
    /// Exact decimal.
    Decimal(Decimal),
}

/// One row-level predicate of a property search.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// City name contains the text, ignoring case.
    CityContains(String),
    /// Nightly price is at least this many whole units.
    MinNightlyPrice(i32),
    /// Nightly price is at most this many whole units.
    MaxNightlyPrice(i32),
    /// Listed by this owner.
    Owner(i32),
}

impl Filter {
    /// Column expression on the left-hand side of the predicate.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::CityContains(_) => "properties.city",
            Self::MinNightlyPrice(_) | Self::MaxNightlyPrice(_) => NIGHTLY_PRICE_EXPR,
            Self::Owner(_) => "properties.owner_id",
        }
    }

    /// Operator of the predicate.
    #[must_use]
    pub fn operator(&self) -> Operator {
        match self {
            Self::CityContains(_) => Operator::ILike,
            Self::MinNightlyPrice(_) => Operator::GreaterOrEqual,
            Self::MaxNightlyPrice(_) => Operator::LessOrEqual,
            Self::Owner(_) => Operator::Equal,
        }
    }

    /// Value bound for the predicate. City text has its `LIKE`
    /// metacharacters escaped and is wrapped in `%` wildcards.
    #[must_use]
    pub fn param(&self) -> SqlParam {
        match self {
            Self::CityContains(city) => SqlParam::Text(format!("%{}%", escape_like(city))),
            Self::MinNightlyPrice(price) | Self::MaxNightlyPrice(price) => SqlParam::Int(*price),
            Self::Owner(owner_id) => SqlParam::Int(*owner_id),
        }
    }

    /// Evaluates the predicate against a property in memory.
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Self::CityContains(city) => property
                .city
                .to_lowercase()
                .contains(&city.to_lowercase()),
            Self::MinNightlyPrice(price) => property.nightly_price() >= *price,
            Self::MaxNightlyPrice(price) => property.nightly_price() <= *price,
            Self::Owner(owner_id) => property.owner_id == *owner_id,
        }
    }
}

/// Escapes `\`, `%` and `_` so the text matches itself literally under
/// `LIKE`/`ILIKE` with the default backslash escape.
#[must_use]
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Parameterized statement for a property search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl SearchQuery {
    /// Folds a search into one statement with numbered parameters.
    ///
    /// The statement always has exactly one `GROUP BY`, gains a `HAVING`
    /// only when a minimum rating is requested, orders by nightly cost and
    /// ends with `LIMIT` bound to the last parameter.
    #[must_use]
    pub fn build(search: &PropertySearch, limit: u32) -> Self {
        let mut sql = String::from(BASE_QUERY);
        let mut params = Vec::new();

        for (index, filter) in search.filters().iter().enumerate() {
            params.push(filter.param());
            let keyword = if index == 0 { "WHERE" } else { "AND" };
            sql.push_str(&format!(
                "\n{} {} {} ${}",
                keyword,
                filter.column(),
                filter.operator().as_sql(),
                params.len()
            ));
        }

        sql.push_str("\nGROUP BY properties.id");
        if let Some(rating) = search.minimum_rating {
            params.push(SqlParam::Decimal(rating));
            sql.push_str(&format!(
                "\nHAVING avg(property_reviews.rating) >= ${}",
                params.len()
            ));
        }

        params.push(SqlParam::BigInt(i64::from(limit)));
        sql.push_str(&format!(
            "\nORDER BY properties.cost_per_night, properties.id\nLIMIT ${}",
            params.len()
        ));

        Self { sql, params }
    }

    /// Statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in binding order (`$1` first).
    #[must_use]
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Splits the query into statement text and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        (self.sql, self.params)
    }
}
