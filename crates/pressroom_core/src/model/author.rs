//! Author entity.
//!
//! # Invariants
//! - `name` is non-empty and write-once: the constructor assigns it and
//!   every later `set_name` call fails with `StateError::WriteOnce`.
//! - `fetch_from_db` reloads the stored name; it is not an assignment.

use super::article::Article;
use super::magazine::Magazine;
use super::validation::{require_non_empty, StateError};
use super::{
    create_tables, delete_row, drop_entity_table, invalid_row, query_all, query_one, require_id,
    ModelError, ModelResult, RowId,
};
use crate::db::{ConnectionProvider, Table};
use log::debug;
use rusqlite::{params, Row};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const ENTITY: &str = "author";

const AUTHOR_SELECT_SQL: &str = "SELECT id, name FROM authors";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    id: Option<RowId>,
    name: String,
    #[serde(skip)]
    name_assigned: bool,
}

impl Author {
    /// Creates an unsaved author.
    pub fn new(name: impl Into<String>) -> ModelResult<Self> {
        let mut author = Self {
            id: None,
            name: String::new(),
            name_assigned: false,
        };
        author.set_name(name)?;
        Ok(author)
    }

    /// Creates an author and inserts it immediately.
    pub fn create(provider: &ConnectionProvider, name: impl Into<String>) -> ModelResult<Self> {
        let mut author = Self::new(name)?;
        author.save(provider)?;
        Ok(author)
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigns the name. Succeeds only once per instance.
    pub fn set_name(&mut self, name: impl Into<String>) -> ModelResult<()> {
        if self.name_assigned {
            return Err(StateError::WriteOnce { field: "name" }.into());
        }
        let name = name.into();
        require_non_empty("name", &name)?;
        self.name = name;
        self.name_assigned = true;
        Ok(())
    }

    /// Inserts the author when unsaved, otherwise rewrites its row.
    pub fn save(&mut self, provider: &ConnectionProvider) -> ModelResult<()> {
        let conn = provider.acquire()?;
        match self.id {
            None => {
                conn.execute(
                    "INSERT INTO authors (name) VALUES (?1);",
                    params![self.name.as_str()],
                )?;
                let id = conn.last_insert_rowid();
                self.id = Some(id);
                debug!("event=author_save module=model status=ok op=insert id={id}");
            }
            Some(id) => {
                let changed = conn.execute(
                    "UPDATE authors SET name = ?1 WHERE id = ?2;",
                    params![self.name.as_str(), id],
                )?;
                if changed == 0 {
                    return Err(ModelError::NotFound { entity: ENTITY, id });
                }
                debug!("event=author_save module=model status=ok op=update id={id}");
            }
        }

        Ok(())
    }

    /// Deletes the stored row. Articles written by this author are kept.
    pub fn delete(self, provider: &ConnectionProvider) -> ModelResult<()> {
        let id = require_id(ENTITY, self.id)?;
        delete_row(provider, Table::Authors, ENTITY, id)?;
        debug!("event=author_delete module=model status=ok id={id}");
        Ok(())
    }

    /// Replaces this instance's state with the stored row `id`.
    pub fn fetch_from_db(&mut self, provider: &ConnectionProvider, id: RowId) -> ModelResult<()> {
        let stored = Self::get_by_id(provider, id)?
            .ok_or(ModelError::NotFound { entity: ENTITY, id })?;
        *self = stored;
        Ok(())
    }

    pub fn get_by_id(provider: &ConnectionProvider, id: RowId) -> ModelResult<Option<Self>> {
        query_one(
            provider,
            &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
            [id],
            Self::from_row,
        )
    }

    /// Lists all authors in insertion order.
    pub fn get_all(provider: &ConnectionProvider) -> ModelResult<Vec<Self>> {
        query_all(
            provider,
            &format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"),
            [],
            Self::from_row,
        )
    }

    /// Articles written by this author.
    pub fn articles(&self, provider: &ConnectionProvider) -> ModelResult<Vec<Article>> {
        let id = require_id(ENTITY, self.id)?;
        Article::list_by_author(provider, id)
    }

    /// Distinct magazines this author has written for.
    pub fn magazines(&self, provider: &ConnectionProvider) -> ModelResult<Vec<Magazine>> {
        let id = require_id(ENTITY, self.id)?;
        query_all(
            provider,
            "SELECT DISTINCT m.id AS id, m.name AS name, m.category AS category
             FROM magazines m
             INNER JOIN articles a ON a.magazine_id = m.id
             WHERE a.author_id = ?1
             ORDER BY m.id ASC;",
            [id],
            Magazine::from_row,
        )
    }

    pub fn create_table(provider: &ConnectionProvider) -> ModelResult<()> {
        create_tables(provider)
    }

    pub fn drop_table(provider: &ConnectionProvider) -> ModelResult<()> {
        drop_entity_table(provider, Table::Authors)
    }

    pub(crate) fn from_row(row: &Row<'_>) -> ModelResult<Self> {
        let id: RowId = row.get("id")?;
        let name: String = row.get("name")?;
        Self::new(name)
            .map(|author| Self {
                id: Some(id),
                ..author
            })
            .map_err(|err| invalid_row(Table::Authors.name(), id, err))
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Author {}>", self.name)
    }
}
