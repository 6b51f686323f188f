//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide row-level insert/query/update/delete over canonical `items`.
//! - Build `WHERE` clauses from [`ItemFilter`] with bound parameters only.
//!
//! # Invariants
//! - A rejected payload never reaches SQLite, so nothing is partially written.
//! - Every call is a single autocommitted statement.

use crate::contract::{
    COLUMN_DESCRIPTION, COLUMN_ID, COLUMN_NAME, COLUMN_PRICE, COLUMN_QUANTITY, TABLE_NAME,
};
use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemValidationError, ItemValues};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row predicate. Every `Some` field narrows the match; the default matches all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub id: Option<ItemId>,
    pub name: Option<String>,
    /// Case-sensitive substring of `name`.
    pub name_contains: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
}

impl ItemFilter {
    pub fn by_id(id: ItemId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Items with `quantity <= threshold`.
    pub fn low_stock(threshold: i64) -> Self {
        Self {
            max_quantity: Some(threshold),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColumn {
    Id,
    Name,
    Description,
    Price,
    Quantity,
}

impl ItemColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Id => COLUMN_ID,
            Self::Name => COLUMN_NAME,
            Self::Description => COLUMN_DESCRIPTION,
            Self::Price => COLUMN_PRICE,
            Self::Quantity => COLUMN_QUANTITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Result ordering. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSort {
    pub column: ItemColumn,
    pub direction: SortDirection,
}

impl ItemSort {
    pub fn ascending(column: ItemColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: ItemColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Repository interface for item persistence.
pub trait ItemRepository {
    fn insert_item(&self, values: &ItemValues) -> RepoResult<ItemId>;
    fn query_items(&self, filter: &ItemFilter, sort: Option<ItemSort>) -> RepoResult<Vec<Item>>;
    fn update_items(&self, filter: &ItemFilter, values: &ItemValues) -> RepoResult<usize>;
    fn delete_items(&self, filter: &ItemFilter) -> RepoResult<usize>;
}

/// SQLite-backed item repository borrowing a bootstrapped connection.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, values: &ItemValues) -> RepoResult<ItemId> {
        values.validate_for_insert()?;

        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE_NAME} (
                    {COLUMN_NAME},
                    {COLUMN_DESCRIPTION},
                    {COLUMN_PRICE},
                    {COLUMN_QUANTITY}
                ) VALUES (?1, ?2, ?3, ?4);"
            ),
            params![
                values.name.as_deref(),
                values.description.as_deref(),
                values.price.unwrap_or(0),
                values.quantity.unwrap_or(0),
            ],
        )?;

        Ok(ItemId(self.conn.last_insert_rowid()))
    }

    fn query_items(&self, filter: &ItemFilter, sort: Option<ItemSort>) -> RepoResult<Vec<Item>> {
        let mut sql = format!(
            "SELECT {COLUMN_ID}, {COLUMN_NAME}, {COLUMN_DESCRIPTION}, {COLUMN_PRICE}, {COLUMN_QUANTITY}
             FROM {TABLE_NAME}"
        );
        let mut bind_values = Vec::new();
        push_where(filter, &mut sql, &mut bind_values);

        match sort {
            Some(ItemSort { column, direction }) => {
                let direction = match direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                sql.push_str(&format!(
                    " ORDER BY {} {direction}, {COLUMN_ID} ASC",
                    column.as_sql()
                ));
            }
            None => sql.push_str(&format!(" ORDER BY {COLUMN_ID} ASC")),
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn update_items(&self, filter: &ItemFilter, values: &ItemValues) -> RepoResult<usize> {
        values.validate_for_update()?;
        if values.is_empty() {
            return Ok(0);
        }

        let mut assignments = Vec::with_capacity(values.len());
        let mut bind_values = Vec::with_capacity(values.len());
        if let Some(name) = &values.name {
            assignments.push(format!("{COLUMN_NAME} = ?"));
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(description) = &values.description {
            assignments.push(format!("{COLUMN_DESCRIPTION} = ?"));
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(price) = values.price {
            assignments.push(format!("{COLUMN_PRICE} = ?"));
            bind_values.push(Value::Integer(price));
        }
        if let Some(quantity) = values.quantity {
            assignments.push(format!("{COLUMN_QUANTITY} = ?"));
            bind_values.push(Value::Integer(quantity));
        }

        let mut sql = format!("UPDATE {TABLE_NAME} SET {}", assignments.join(", "));
        push_where(filter, &mut sql, &mut bind_values);

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn delete_items(&self, filter: &ItemFilter) -> RepoResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        let mut bind_values = Vec::new();
        push_where(filter, &mut sql, &mut bind_values);

        let deleted = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(deleted)
    }
}

fn push_where(filter: &ItemFilter, sql: &mut String, bind_values: &mut Vec<Value>) {
    sql.push_str(" WHERE 1 = 1");

    if let Some(id) = filter.id {
        sql.push_str(&format!(" AND {COLUMN_ID} = ?"));
        bind_values.push(Value::Integer(id.0));
    }
    if let Some(name) = &filter.name {
        sql.push_str(&format!(" AND {COLUMN_NAME} = ?"));
        bind_values.push(Value::Text(name.clone()));
    }
    if let Some(fragment) = &filter.name_contains {
        // instr() avoids LIKE wildcard escaping.
        sql.push_str(&format!(" AND instr({COLUMN_NAME}, ?) > 0"));
        bind_values.push(Value::Text(fragment.clone()));
    }

    let bounds = [
        (filter.min_price, COLUMN_PRICE, ">="),
        (filter.max_price, COLUMN_PRICE, "<="),
        (filter.min_quantity, COLUMN_QUANTITY, ">="),
        (filter.max_quantity, COLUMN_QUANTITY, "<="),
    ];
    for (bound, column, op) in bounds {
        if let Some(bound) = bound {
            sql.push_str(&format!(" AND {column} {op} ?"));
            bind_values.push(Value::Integer(bound));
        }
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id = ItemId(row.get(COLUMN_ID)?);

    let price: i64 = row.get(COLUMN_PRICE)?;
    if price < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative price `{price}` for item {id}"
        )));
    }
    let quantity: i64 = row.get(COLUMN_QUANTITY)?;
    if quantity < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative quantity `{quantity}` for item {id}"
        )));
    }

    Ok(Item {
        id,
        name: row.get(COLUMN_NAME)?,
        description: row
            .get::<_, Option<String>>(COLUMN_DESCRIPTION)?
            .unwrap_or_default(),
        price,
        quantity,
    })
}
