use pressroom_core::{
    Article, Author, ConnectionProvider, Magazine, ModelError, ValidationError,
};

struct Fixture {
    provider: ConnectionProvider,
    author: Author,
    magazine: Magazine,
}

fn setup() -> Fixture {
    let provider = ConnectionProvider::in_memory().unwrap();
    Article::create_table(&provider).unwrap();
    let author = Author::create(&provider, "John Doe").unwrap();
    let magazine = Magazine::create(&provider, "Tech Weekly", "Technology").unwrap();
    Fixture {
        provider,
        author,
        magazine,
    }
}

#[test]
fn create_links_author_and_magazine() {
    let fx = setup();

    let article = Article::create(
        &fx.provider,
        "Test Title",
        "Test Content",
        &fx.author,
        &fx.magazine,
    )
    .unwrap();

    assert!(article.id().is_some());
    assert_eq!(article.title(), "Test Title");
    assert_eq!(article.content(), "Test Content");
    assert_eq!(Some(article.author_id()), fx.author.id());
    assert_eq!(Some(article.magazine_id()), fx.magazine.id());
}

#[test]
fn titles_outside_window_are_rejected() {
    let fx = setup();
    let too_long = "x".repeat(51);

    for title in ["", "Four", too_long.as_str()] {
        let err = Article::new(title, "body", &fx.author, &fx.magazine).unwrap_err();
        assert!(
            matches!(
                err,
                ModelError::Validation(ValidationError::LengthOutOfRange { field: "title", .. })
            ),
            "unexpected error for `{title}`: {err}"
        );
    }
}

#[test]
fn titles_inside_window_roundtrip_exactly() {
    let fx = setup();
    let longest = "y".repeat(50);

    for title in ["Fives", "Émile's café review", longest.as_str()] {
        let article =
            Article::create(&fx.provider, title, "", &fx.author, &fx.magazine).unwrap();
        assert_eq!(article.title(), title);

        let stored = Article::get_by_id(&fx.provider, article.id().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(stored.title(), title);
    }
}

#[test]
fn unsaved_magazine_cannot_be_linked() {
    let fx = setup();
    let draft = Magazine::new("Draft Mag", "Drafts").unwrap();

    let err = Article::new("Valid title", "body", &fx.author, &draft).unwrap_err();
    assert!(matches!(err, ModelError::NotPersisted { entity: "magazine" }));
}

#[test]
fn save_updates_fields_and_is_idempotent() {
    let fx = setup();
    let other_magazine = Magazine::create(&fx.provider, "Sports Daily", "Sports").unwrap();
    let mut article =
        Article::create(&fx.provider, "First draft", "v1", &fx.author, &fx.magazine).unwrap();
    let id = article.id().unwrap();

    article.set_title("Second draft").unwrap();
    article.set_content("v2");
    article.set_magazine(&other_magazine).unwrap();
    article.save(&fx.provider).unwrap();
    let after_first_save = Article::get_by_id(&fx.provider, id).unwrap().unwrap();

    article.save(&fx.provider).unwrap();
    let after_second_save = Article::get_by_id(&fx.provider, id).unwrap().unwrap();

    assert_eq!(after_first_save, after_second_save);
    assert_eq!(after_second_save.title(), "Second draft");
    assert_eq!(after_second_save.content(), "v2");
    assert_eq!(Some(after_second_save.magazine_id()), other_magazine.id());
}

#[test]
fn rejected_title_keeps_previous_value() {
    let fx = setup();
    let mut article =
        Article::new("Stable title", "body", &fx.author, &fx.magazine).unwrap();

    assert!(article.set_title("tiny").is_err());
    assert_eq!(article.title(), "Stable title");
}

#[test]
fn fetch_author_and_magazine_follow_foreign_keys() {
    let fx = setup();
    let article =
        Article::create(&fx.provider, "Linked piece", "", &fx.author, &fx.magazine).unwrap();

    assert_eq!(article.fetch_author(&fx.provider).unwrap(), fx.author);
    assert_eq!(article.fetch_magazine(&fx.provider).unwrap(), fx.magazine);
}

#[test]
fn deleting_referents_leaves_dangling_article() {
    let fx = setup();
    let article =
        Article::create(&fx.provider, "Orphan to be", "", &fx.author, &fx.magazine).unwrap();
    let author_id = fx.author.id().unwrap();
    let magazine_id = fx.magazine.id().unwrap();

    fx.author.delete(&fx.provider).unwrap();
    fx.magazine.delete(&fx.provider).unwrap();

    let stored = Article::get_by_id(&fx.provider, article.id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.author_id(), author_id);

    let err = stored.fetch_author(&fx.provider).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { entity: "author", id } if id == author_id));
    let err = stored.fetch_magazine(&fx.provider).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { entity: "magazine", id } if id == magazine_id));
}

#[test]
fn delete_then_lookups_miss() {
    let fx = setup();
    let article =
        Article::create(&fx.provider, "Short lived", "", &fx.author, &fx.magazine).unwrap();
    let id = article.id().unwrap();
    let stale_handle = article.clone();

    article.delete(&fx.provider).unwrap();

    assert!(Article::get_by_id(&fx.provider, id).unwrap().is_none());
    let mut target = stale_handle.clone();
    assert!(matches!(
        target.fetch_from_db(&fx.provider, id).unwrap_err(),
        ModelError::NotFound { entity: "article", .. }
    ));
    assert!(matches!(
        stale_handle.delete(&fx.provider).unwrap_err(),
        ModelError::NotFound { .. }
    ));
}

#[test]
fn get_all_returns_every_article() {
    let fx = setup();
    let first = Article::create(&fx.provider, "First piece", "", &fx.author, &fx.magazine).unwrap();
    let second =
        Article::create(&fx.provider, "Second piece", "", &fx.author, &fx.magazine).unwrap();

    assert_eq!(Article::get_all(&fx.provider).unwrap(), vec![first, second]);
}
