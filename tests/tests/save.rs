use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{
    author_with_books, datastore,
    models::{Author, Book, Chapter},
    MockTransport,
};
use tether::{transport::Method, Datastore, Model, RequestOptions, Value};

async fn load_author(transport: &MockTransport, db: &Datastore) -> Author {
    transport.respond(200, author_with_books());
    let author = db
        .find_all::<Author>(RequestOptions::new())
        .await
        .unwrap()
        .into_models()
        .remove(0);
    transport.log().clear();
    author
}

#[tokio::test]
async fn saving_a_new_model_posts_its_attributes() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    let book = db.create::<Book>([("title", Value::from("T"))]);
    assert!(book.as_resource().is_new());
    assert!(db.peek_all::<Book>().is_empty());

    transport.respond(
        201,
        json!({"data": {"type": "books", "id": "5", "attributes": {"title": "T", "date_published": null}}}),
    );

    let saved = db.save(&book, RequestOptions::new()).await.unwrap();

    let request = transport.log().pop();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "http://localhost:8080/books");
    assert_eq!(
        request.body,
        Some(json!({"data": {"type": "books", "attributes": {"title": "T"}}}))
    );
    assert_eq!(
        request.headers.get("content-type"),
        Some("application/vnd.api+json")
    );

    assert!(saved.as_resource().ptr_eq(book.as_resource()));
    assert_eq!(book.id().as_deref(), Some("5"));
    assert!(!book.as_resource().has_dirty_attributes());
    assert!(db
        .peek::<Book>("5")
        .unwrap()
        .as_resource()
        .ptr_eq(book.as_resource()));
}

#[tokio::test]
async fn created_without_body_is_malformed() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    let book = db.create::<Book>([("title", Value::from("T"))]);
    transport.respond_empty(201);

    let err = db.save(&book, RequestOptions::new()).await.unwrap_err();

    assert!(err.is_malformed_response());
    assert!(book.as_resource().is_new());
    assert!(db.peek_all::<Book>().is_empty());
}

#[tokio::test]
async fn updates_send_dirty_attributes_only() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;

    author.set_name("B");
    author.set_name("B");
    assert!(author.as_resource().is_dirty("name"));
    assert!(!author.as_resource().is_dirty("date_of_birth"));

    transport.respond(
        200,
        json!({"data": {"type": "authors", "id": "1", "attributes": {"name": "B"}}}),
    );
    db.save(&author, RequestOptions::new()).await.unwrap();

    let request = transport.log().pop();
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.url, "http://localhost:8080/authors/1");
    assert_eq!(
        request.body,
        Some(json!({"data": {"type": "authors", "id": "1", "attributes": {"name": "B"}}}))
    );
    assert!(!author.as_resource().has_dirty_attributes());
}

#[tokio::test]
async fn unchanged_attributes_are_not_sent() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;

    author.set_name("A");
    author.set_date_of_birth(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap());

    assert!(!author.as_resource().has_dirty_attributes());
    assert_eq!(
        serde_json::to_value(db.request_body(&author)).unwrap(),
        json!({"data": {"type": "authors", "id": "1", "attributes": {}}})
    );
}

#[tokio::test]
async fn dates_use_their_wire_name_and_format() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;

    author.set_date_of_birth(Utc.with_ymd_and_hms(1980, 3, 4, 5, 6, 7).unwrap());

    assert_eq!(
        serde_json::to_value(db.request_body(&author)).unwrap()["data"]["attributes"],
        json!({"dob": "1980-03-04T05:06:07Z"})
    );
}

#[tokio::test]
async fn no_content_keeps_the_model_and_clears_dirty() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;

    author.set_name("B");
    transport.respond_empty(204);

    let saved = db.save(&author, RequestOptions::new()).await.unwrap();

    assert!(saved.as_resource().ptr_eq(author.as_resource()));
    assert_eq!(author.name().as_deref(), Some("B"));
    assert!(!author.as_resource().has_dirty_attributes());
}

#[tokio::test]
async fn failed_saves_leave_the_model_dirty() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;

    author.set_name("");
    transport.respond(
        422,
        json!({"errors": [{"title": "Invalid", "source": {"pointer": "/data/attributes/name"}}]}),
    );

    let err = db.save(&author, RequestOptions::new()).await.unwrap_err();

    assert!(err.is_api());
    assert_eq!(err.status(), Some(422));
    assert!(author.as_resource().is_dirty("name"));
}

#[tokio::test]
async fn cleared_relations_are_sent_explicitly() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;
    let book = author.books().get()[0].clone();

    book.set_author(None);
    author.set_books(&[]);

    assert_eq!(
        serde_json::to_value(db.request_body(&book)).unwrap()["data"]["relationships"],
        json!({"author": {"data": null}})
    );
    assert_eq!(
        serde_json::to_value(db.request_body(&author)).unwrap()["data"]["relationships"],
        json!({"books": {"data": []}})
    );
}

#[tokio::test]
async fn saving_links_the_inverse_relation() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let author = load_author(&transport, &db).await;

    let book = db.create::<Book>([("title", Value::from("Second"))]);
    book.set_author(Some(&author));

    transport.respond(
        201,
        json!({"data": {
            "type": "books", "id": "10",
            "attributes": {"title": "Second"},
            "relationships": {"author": {"data": {"type": "authors", "id": "1"}}}
        }}),
    );
    db.save(&book, RequestOptions::new()).await.unwrap();

    let request = transport.log().pop();
    assert_eq!(
        request.body.unwrap()["data"]["relationships"],
        json!({"author": {"data": {"type": "authors", "id": "1"}}})
    );

    let ids = author
        .books()
        .get()
        .iter()
        .map(|book| book.id().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["9", "10"]);
    assert!(book
        .author()
        .get()
        .unwrap()
        .as_resource()
        .ptr_eq(author.as_resource()));
}

#[tokio::test]
async fn unsaved_related_models_are_embedded() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    let author = db.create::<Author>([("name", Value::from("New"))]);
    let book = db.create::<Book>([("title", Value::from("T"))]);
    book.set_author(Some(&author));

    assert_eq!(
        serde_json::to_value(db.request_body(&book)).unwrap(),
        json!({"data": {
            "type": "books",
            "attributes": {"title": "T"},
            "relationships": {
                "author": {"data": {"type": "authors", "attributes": {"name": "New"}}}
            }
        }})
    );
}

#[tokio::test]
async fn custom_endpoint_paths() {
    let transport = MockTransport::new();
    let db = datastore(&transport);

    let chapter = db.create::<Chapter>([("title", Value::from("One")), ("ordering", Value::from(1))]);
    transport.respond(
        201,
        json!({"data": {"type": "chapters", "id": "3", "attributes": {"title": "One", "ordering": 1}}}),
    );

    let chapter = db.save(&chapter, RequestOptions::new()).await.unwrap();

    assert_eq!(transport.log().pop().url, "http://localhost:8080/book-chapters");
    assert_eq!(chapter.ordering(), Some(1));
}

#[tokio::test]
async fn saving_an_unregistered_type_fails() {
    let transport = MockTransport::new();
    let db = datastore(&transport);
    let chapter = db.create::<Chapter>([("title", Value::from("One"))]);

    let other = {
        let mut builder = Datastore::builder();
        builder.register_schema(tether::schema::Model::new("authors"));
        builder.build(transport.clone()).unwrap()
    };

    let err = other.save(&chapter, RequestOptions::new()).await.unwrap_err();

    assert!(err.is_unknown_model());
    assert!(transport.log().is_empty());
}
