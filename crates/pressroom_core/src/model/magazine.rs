//! Magazine entity and its contributor views.
//!
//! # Invariants
//! - `name` is 2 to 16 characters and `category` is non-empty after every
//!   assignment, not only at construction.
//! - `id` is assigned by storage only.
//! - A frequent contributor has strictly more than
//!   `FREQUENT_CONTRIBUTOR_THRESHOLD` articles in this magazine.

use super::article::Article;
use super::author::Author;
use super::validation::{
    require_char_len, require_non_empty, MAGAZINE_NAME_MAX_CHARS, MAGAZINE_NAME_MIN_CHARS,
};
use super::{
    create_tables, delete_row, drop_entity_table, invalid_row, query_all, query_one, require_id,
    ModelError, ModelResult, RowId,
};
use crate::db::{ConnectionProvider, Table};
use log::debug;
use rusqlite::{params, Row};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const ENTITY: &str = "magazine";

const MAGAZINE_SELECT_SQL: &str = "SELECT id, name, category FROM magazines";

/// Article count an author must exceed to be a frequent contributor.
pub const FREQUENT_CONTRIBUTOR_THRESHOLD: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Magazine {
    id: Option<RowId>,
    name: String,
    category: String,
}

impl Magazine {
    /// Creates an unsaved magazine.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> ModelResult<Self> {
        let mut magazine = Self {
            id: None,
            name: String::new(),
            category: String::new(),
        };
        magazine.set_name(name)?;
        magazine.set_category(category)?;
        Ok(magazine)
    }

    /// Creates a magazine and inserts it immediately.
    pub fn create(
        provider: &ConnectionProvider,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> ModelResult<Self> {
        let mut magazine = Self::new(name, category)?;
        magazine.save(provider)?;
        Ok(magazine)
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ModelResult<()> {
        let name = name.into();
        require_char_len(
            "name",
            &name,
            MAGAZINE_NAME_MIN_CHARS,
            MAGAZINE_NAME_MAX_CHARS,
        )?;
        self.name = name;
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> ModelResult<()> {
        let category = category.into();
        require_non_empty("category", &category)?;
        self.category = category;
        Ok(())
    }

    /// Inserts the magazine when unsaved, otherwise rewrites its row.
    pub fn save(&mut self, provider: &ConnectionProvider) -> ModelResult<()> {
        let conn = provider.acquire()?;
        match self.id {
            None => {
                conn.execute(
                    "INSERT INTO magazines (name, category) VALUES (?1, ?2);",
                    params![self.name.as_str(), self.category.as_str()],
                )?;
                let id = conn.last_insert_rowid();
                self.id = Some(id);
                debug!("event=magazine_save module=model status=ok op=insert id={id}");
            }
            Some(id) => {
                let changed = conn.execute(
                    "UPDATE magazines SET name = ?1, category = ?2 WHERE id = ?3;",
                    params![self.name.as_str(), self.category.as_str(), id],
                )?;
                if changed == 0 {
                    return Err(ModelError::NotFound { entity: ENTITY, id });
                }
                debug!("event=magazine_save module=model status=ok op=update id={id}");
            }
        }

        Ok(())
    }

    /// Deletes the stored row. Articles published here are kept.
    pub fn delete(self, provider: &ConnectionProvider) -> ModelResult<()> {
        let id = require_id(ENTITY, self.id)?;
        delete_row(provider, Table::Magazines, ENTITY, id)?;
        debug!("event=magazine_delete module=model status=ok id={id}");
        Ok(())
    }

    /// Replaces this instance's state with the stored row `id`.
    pub fn fetch_from_db(&mut self, provider: &ConnectionProvider, id: RowId) -> ModelResult<()> {
        let stored = Self::get_by_id(provider, id)?
            .ok_or(ModelError::NotFound { entity: ENTITY, id })?;
        *self = stored;
        Ok(())
    }

    /// Looks up one magazine. A miss is `Ok(None)`, not an error.
    pub fn get_by_id(provider: &ConnectionProvider, id: RowId) -> ModelResult<Option<Self>> {
        query_one(
            provider,
            &format!("{MAGAZINE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            Self::from_row,
        )
    }

    /// Lists all magazines in insertion order.
    pub fn get_all(provider: &ConnectionProvider) -> ModelResult<Vec<Self>> {
        query_all(
            provider,
            &format!("{MAGAZINE_SELECT_SQL} ORDER BY id ASC;"),
            [],
            Self::from_row,
        )
    }

    /// Articles published in this magazine.
    pub fn articles(&self, provider: &ConnectionProvider) -> ModelResult<Vec<Article>> {
        let id = require_id(ENTITY, self.id)?;
        Article::list_by_magazine(provider, id)
    }

    /// Distinct authors with at least one article in this magazine.
    pub fn contributors(&self, provider: &ConnectionProvider) -> ModelResult<Vec<Author>> {
        let id = require_id(ENTITY, self.id)?;
        query_all(
            provider,
            "SELECT DISTINCT au.id AS id, au.name AS name
             FROM authors au
             INNER JOIN articles a ON a.author_id = au.id
             WHERE a.magazine_id = ?1
             ORDER BY au.id ASC;",
            [id],
            Author::from_row,
        )
    }

    /// Titles of this magazine's articles, or `None` when it has none.
    pub fn article_titles(&self, provider: &ConnectionProvider) -> ModelResult<Option<Vec<String>>> {
        let id = require_id(ENTITY, self.id)?;
        let titles = query_all(
            provider,
            "SELECT title FROM articles WHERE magazine_id = ?1 ORDER BY id ASC;",
            [id],
            |row| Ok(row.get::<_, String>("title")?),
        )?;

        if titles.is_empty() {
            return Ok(None);
        }
        Ok(Some(titles))
    }

    /// Authors with more than `FREQUENT_CONTRIBUTOR_THRESHOLD` articles here.
    pub fn contributing_authors(&self, provider: &ConnectionProvider) -> ModelResult<Vec<Author>> {
        let id = require_id(ENTITY, self.id)?;
        query_all(
            provider,
            "SELECT au.id AS id, au.name AS name
             FROM authors au
             INNER JOIN articles a ON a.author_id = au.id
             WHERE a.magazine_id = ?1
             GROUP BY au.id, au.name
             HAVING COUNT(a.id) > ?2
             ORDER BY au.id ASC;",
            params![id, FREQUENT_CONTRIBUTOR_THRESHOLD],
            Author::from_row,
        )
    }

    pub fn create_table(provider: &ConnectionProvider) -> ModelResult<()> {
        create_tables(provider)
    }

    pub fn drop_table(provider: &ConnectionProvider) -> ModelResult<()> {
        drop_entity_table(provider, Table::Magazines)
    }

    pub(crate) fn from_row(row: &Row<'_>) -> ModelResult<Self> {
        let id: RowId = row.get("id")?;
        let name: String = row.get("name")?;
        let category: String = row.get("category")?;
        Self::new(name, category)
            .map(|magazine| Self {
                id: Some(id),
                ..magazine
            })
            .map_err(|err| invalid_row(Table::Magazines.name(), id, err))
    }
}

impl Display for Magazine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Magazine {}>", self.name)
    }
}
