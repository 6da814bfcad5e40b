//! Article entity.
//!
//! # Invariants
//! - `title` is 5 to 50 characters after every assignment.
//! - `author_id` and `magazine_id` always come from persisted entities.
//! - Storage does not enforce those references: `fetch_author` and
//!   `fetch_magazine` report a dangling id as `NotFound`.

use super::author::Author;
use super::magazine::Magazine;
use super::validation::{require_char_len, ARTICLE_TITLE_MAX_CHARS, ARTICLE_TITLE_MIN_CHARS};
use super::{
    create_tables, delete_row, drop_entity_table, invalid_row, query_all, query_one, require_id,
    ModelError, ModelResult, RowId,
};
use crate::db::{ConnectionProvider, Table};
use log::debug;
use rusqlite::{params, Row};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const ENTITY: &str = "article";

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    author_id,
    magazine_id
FROM articles";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    id: Option<RowId>,
    title: String,
    content: String,
    author_id: RowId,
    magazine_id: RowId,
}

impl Article {
    /// Creates an unsaved article linked to a saved author and magazine.
    ///
    /// # Errors
    /// - `NotPersisted` when `author` or `magazine` has no id yet.
    /// - `Validation` when `title` is outside the length window.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: &Author,
        magazine: &Magazine,
    ) -> ModelResult<Self> {
        let author_id = require_id("author", author.id())?;
        let magazine_id = require_id("magazine", magazine.id())?;
        Self::from_parts(None, title.into(), content.into(), author_id, magazine_id)
    }

    /// Creates an article and inserts it immediately.
    pub fn create(
        provider: &ConnectionProvider,
        title: impl Into<String>,
        content: impl Into<String>,
        author: &Author,
        magazine: &Magazine,
    ) -> ModelResult<Self> {
        let mut article = Self::new(title, content, author, magazine)?;
        article.save(provider)?;
        Ok(article)
    }

    fn from_parts(
        id: Option<RowId>,
        title: String,
        content: String,
        author_id: RowId,
        magazine_id: RowId,
    ) -> ModelResult<Self> {
        let mut article = Self {
            id,
            title: String::new(),
            content,
            author_id,
            magazine_id,
        };
        article.set_title(title)?;
        Ok(article)
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> RowId {
        self.author_id
    }

    pub fn magazine_id(&self) -> RowId {
        self.magazine_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> ModelResult<()> {
        let title = title.into();
        require_char_len(
            "title",
            &title,
            ARTICLE_TITLE_MIN_CHARS,
            ARTICLE_TITLE_MAX_CHARS,
        )?;
        self.title = title;
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Re-links the article to another saved author.
    pub fn set_author(&mut self, author: &Author) -> ModelResult<()> {
        self.author_id = require_id("author", author.id())?;
        Ok(())
    }

    /// Re-links the article to another saved magazine.
    pub fn set_magazine(&mut self, magazine: &Magazine) -> ModelResult<()> {
        self.magazine_id = require_id("magazine", magazine.id())?;
        Ok(())
    }

    /// Inserts the article when unsaved, otherwise rewrites its row.
    pub fn save(&mut self, provider: &ConnectionProvider) -> ModelResult<()> {
        let conn = provider.acquire()?;
        match self.id {
            None => {
                conn.execute(
                    "INSERT INTO articles (title, content, author_id, magazine_id)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        self.title.as_str(),
                        self.content.as_str(),
                        self.author_id,
                        self.magazine_id,
                    ],
                )?;
                let id = conn.last_insert_rowid();
                self.id = Some(id);
                debug!(
                    "event=article_save module=model status=ok op=insert id={id} author_id={} magazine_id={}",
                    self.author_id, self.magazine_id
                );
            }
            Some(id) => {
                let changed = conn.execute(
                    "UPDATE articles
                     SET
                        title = ?1,
                        content = ?2,
                        author_id = ?3,
                        magazine_id = ?4
                     WHERE id = ?5;",
                    params![
                        self.title.as_str(),
                        self.content.as_str(),
                        self.author_id,
                        self.magazine_id,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(ModelError::NotFound { entity: ENTITY, id });
                }
                debug!("event=article_save module=model status=ok op=update id={id}");
            }
        }

        Ok(())
    }

    pub fn delete(self, provider: &ConnectionProvider) -> ModelResult<()> {
        let id = require_id(ENTITY, self.id)?;
        delete_row(provider, Table::Articles, ENTITY, id)?;
        debug!("event=article_delete module=model status=ok id={id}");
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
            &format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            Self::from_row,
        )
    }

    pub fn get_all(provider: &ConnectionProvider) -> ModelResult<Vec<Self>> {
        query_all(
            provider,
            &format!("{ARTICLE_SELECT_SQL} ORDER BY id ASC;"),
            [],
            Self::from_row,
        )
    }

    /// Reads the linked author row.
    pub fn fetch_author(&self, provider: &ConnectionProvider) -> ModelResult<Author> {
        Author::get_by_id(provider, self.author_id)?.ok_or(ModelError::NotFound {
            entity: "author",
            id: self.author_id,
        })
    }

    /// Reads the linked magazine row.
    pub fn fetch_magazine(&self, provider: &ConnectionProvider) -> ModelResult<Magazine> {
        Magazine::get_by_id(provider, self.magazine_id)?.ok_or(ModelError::NotFound {
            entity: "magazine",
            id: self.magazine_id,
        })
    }

    pub fn create_table(provider: &ConnectionProvider) -> ModelResult<()> {
        create_tables(provider)
    }

    pub fn drop_table(provider: &ConnectionProvider) -> ModelResult<()> {
        drop_entity_table(provider, Table::Articles)
    }

    pub(crate) fn list_by_author(
        provider: &ConnectionProvider,
        author_id: RowId,
    ) -> ModelResult<Vec<Self>> {
        query_all(
            provider,
            &format!("{ARTICLE_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;"),
            [author_id],
            Self::from_row,
        )
    }

    pub(crate) fn list_by_magazine(
        provider: &ConnectionProvider,
        magazine_id: RowId,
    ) -> ModelResult<Vec<Self>> {
        query_all(
            provider,
            &format!("{ARTICLE_SELECT_SQL} WHERE magazine_id = ?1 ORDER BY id ASC;"),
            [magazine_id],
            Self::from_row,
        )
    }

    fn from_row(row: &Row<'_>) -> ModelResult<Self> {
        let id: RowId = row.get("id")?;
        let content = row.get::<_, Option<String>>("content")?.unwrap_or_default();
        Self::from_parts(
            Some(id),
            row.get("title")?,
            content,
            row.get("author_id")?,
            row.get("magazine_id")?,
        )
        .map_err(|err| invalid_row(Table::Articles.name(), id, err))
    }
}

impl Display for Article {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Article {}>", self.title)
    }
}
