use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{
    author_with_books, datastore,
    models::{Author, Book},
    MockTransport,
};
use tether::{transport::Method, Error, Model, RequestOptions};

#[tokio::test]
async fn find_decodes_a_single_resource() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        200,
        json!({"data": {"type": "authors", "id": "1", "attributes": {"name": "A", "dob": "1970-01-02"}}}),
    );

    let author = db.find::<Author>("1", RequestOptions::new()).await.unwrap();

    assert_eq!(author.id().as_deref(), Some("1"));
    assert_eq!(author.name().as_deref(), Some("A"));
    assert_eq!(
        author.date_of_birth(),
        Some(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap())
    );
    assert!(!author.as_resource().has_dirty_attributes());

    let request = transport.log().pop();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "http://localhost:8080/authors/1");
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn find_all_links_included_resources() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(200, author_with_books());

    let authors = db
        .find_all::<Author>(RequestOptions::new().param("include", "books"))
        .await
        .unwrap();

    assert_eq!(authors.len(), 1);
    let author = &authors.models()[0];
    assert_eq!(author.name().as_deref(), Some("A"));

    let books = author.books();
    let [book] = books.get() else {
        panic!("expected one book, got {books:?}");
    };
    assert_eq!(book.id().as_deref(), Some("9"));
    assert_eq!(book.title().as_deref(), Some("T"));
    assert_eq!(
        book.date_published(),
        Some(Utc.with_ymd_and_hms(2001, 5, 6, 0, 0, 0).unwrap())
    );

    let back = book.author();
    assert!(back
        .get()
        .unwrap()
        .as_resource()
        .ptr_eq(author.as_resource()));

    let peeked = db.peek::<Book>("9").unwrap();
    assert!(peeked.as_resource().ptr_eq(book.as_resource()));
    assert!(db.peek::<Author>("1").is_some());

    assert_eq!(
        transport.log().pop().url,
        "http://localhost:8080/authors?include=books"
    );
}

#[tokio::test]
async fn decoding_again_keeps_identity_and_refreshes() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(200, author_with_books());
    let mut second = author_with_books();
    second["data"][0]["attributes"]["name"] = json!("A2");
    transport.respond(200, second);

    let first = db.find_all::<Author>(RequestOptions::new()).await.unwrap();
    let again = db.find_all::<Author>(RequestOptions::new()).await.unwrap();

    let first = &first.models()[0];
    let again = &again.models()[0];
    assert!(first.as_resource().ptr_eq(again.as_resource()));
    assert_eq!(first.name().as_deref(), Some("A2"));
    assert_eq!(db.peek_all::<Author>().len(), 1);
    assert_eq!(db.peek_all::<Book>().len(), 1);
}

#[tokio::test]
async fn included_resources_do_not_overwrite_unsaved_edits() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        200,
        json!({"data": {"type": "authors", "id": "1", "attributes": {"name": "A"}}}),
    );
    transport.respond(
        200,
        json!({
            "data": {
                "type": "books", "id": "9",
                "attributes": {"title": "T"},
                "relationships": {"author": {"data": {"type": "authors", "id": "1"}}}
            },
            "included": [
                {"type": "authors", "id": "1", "attributes": {"name": "A"}}
            ]
        }),
    );

    let author = db.find::<Author>("1", RequestOptions::new()).await.unwrap();
    author.set_name("EDITED");

    let book = db.find::<Book>("9", RequestOptions::new()).await.unwrap();
    let linked = book.author().into_inner().flatten().unwrap();

    assert!(linked.as_resource().ptr_eq(author.as_resource()));
    assert_eq!(author.name().as_deref(), Some("EDITED"));
    assert!(author.as_resource().is_dirty("name"));
    assert_eq!(
        serde_json::to_value(db.request_body(&author)).unwrap()["data"]["attributes"],
        json!({"name": "EDITED"})
    );
}

#[tokio::test]
async fn refetching_keeps_dirty_fields_and_refreshes_the_rest() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        200,
        json!({"data": {"type": "authors", "id": "1", "attributes": {"name": "A", "dob": "1970-01-02"}}}),
    );
    transport.respond(
        200,
        json!({"data": {"type": "authors", "id": "1", "attributes": {"name": "A2", "dob": "1980-03-04"}}}),
    );

    let author = db.find::<Author>("1", RequestOptions::new()).await.unwrap();
    author.set_name("EDITED");
    let again = db.find::<Author>("1", RequestOptions::new()).await.unwrap();

    assert!(again.as_resource().ptr_eq(author.as_resource()));
    assert_eq!(author.name().as_deref(), Some("EDITED"));
    assert!(author.as_resource().is_dirty("name"));
    assert_eq!(
        author.date_of_birth(),
        Some(Utc.with_ymd_and_hms(1980, 3, 4, 0, 0, 0).unwrap())
    );
    assert!(!author.as_resource().is_dirty("date_of_birth"));
}

#[tokio::test]
async fn unknown_references_become_stubs_and_upgrade() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        200,
        json!({"data": {
            "type": "books", "id": "9",
            "attributes": {"title": "T"},
            "relationships": {"author": {"data": {"type": "authors", "id": "4"}}}
        }}),
    );
    transport.respond(
        200,
        json!({"data": {"type": "authors", "id": "4", "attributes": {"name": "Late"}}}),
    );

    let book = db.find::<Book>("9", RequestOptions::new()).await.unwrap();
    let stub = book.author().into_inner().flatten().unwrap();
    assert!(stub.as_resource().is_stub());
    assert_eq!(stub.name(), None);

    let author = db.find::<Author>("4", RequestOptions::new()).await.unwrap();
    assert!(author.as_resource().ptr_eq(stub.as_resource()));
    assert!(!stub.as_resource().is_stub());
    assert_eq!(stub.name().as_deref(), Some("Late"));
}

#[tokio::test]
async fn relations_missing_from_payload_are_not_loaded() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        200,
        json!({"data": {
            "type": "books", "id": "9",
            "attributes": {"title": null},
            "relationships": {"chapters": {"links": {"related": "/books/9/chapters"}}}
        }}),
    );

    let book = db.find::<Book>("9", RequestOptions::new()).await.unwrap();

    assert!(!book.author().is_loaded());
    assert!(!book.chapters().is_loaded());
    assert_eq!(book.title(), None);
    assert_eq!(book.as_resource().attribute("title"), Some(tether::Value::Null));
}

#[tokio::test]
async fn find_all_exposes_meta_and_links() {
    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct PageMeta {
        total: u64,
    }

    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        200,
        json!({
            "data": [],
            "meta": {"total": 0},
            "links": {"self": "http://localhost:8080/authors"}
        }),
    );

    let authors = db.find_all::<Author>(RequestOptions::new()).await.unwrap();

    assert!(authors.is_empty());
    assert_eq!(authors.meta_as::<PageMeta>().unwrap(), Some(PageMeta { total: 0 }));
    assert_eq!(
        authors.links(),
        Some(&json!({"self": "http://localhost:8080/authors"}))
    );
}

#[tokio::test]
async fn error_documents_keep_every_error() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(
        404,
        json!({"errors": [
            {"status": "404", "title": "Not Found", "detail": "no author 1"},
            {"code": "gone", "title": "Gone"}
        ]}),
    );

    let err = db
        .find::<Author>("1", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_api());
    assert_eq!(err.status(), Some(404));

    let titles = err
        .api_errors()
        .unwrap()
        .iter()
        .map(|e| e.title.as_deref().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Not Found", "Gone"]);
}

#[tokio::test]
async fn non_document_failures_are_transport_errors() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(500, json!({"message": "boom"}));
    transport.fail(Error::transport(None, "connection refused", None));

    let err = db.find_all::<Author>(RequestOptions::new()).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.transport_body(), Some(&json!({"message": "boom"})));

    let err = db.find_all::<Author>(RequestOptions::new()).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn transport_failures_carrying_error_documents() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.fail(Error::transport(
        Some(401),
        "unauthorized",
        Some(json!({"errors": [{"title": "Unauthorized"}]})),
    ));

    let err = db.find_all::<Author>(RequestOptions::new()).await.unwrap_err();
    assert!(err.is_api());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn find_without_body_is_malformed() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond_empty(200);
    transport.respond(200, json!({"meta": {}}));

    let err = db
        .find::<Author>("1", RequestOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_malformed_response());

    let err = db.find_all::<Author>(RequestOptions::new()).await.unwrap_err();
    assert!(err.is_malformed_response());
}

#[tokio::test]
async fn clear_store_keeps_handed_out_instances() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    transport.respond(200, author_with_books());
    let authors = db.find_all::<Author>(RequestOptions::new()).await.unwrap();

    db.clear_store();

    assert!(db.peek::<Author>("1").is_none());
    assert!(db.store().is_empty());
    assert_eq!(authors.models()[0].name().as_deref(), Some("A"));
    assert_eq!(authors.models()[0].books().get().len(), 1);
}
