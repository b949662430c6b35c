pub use exec_log::ExecLog;

pub use mock_transport::MockTransport;


use tether::Datastore;

use serde_json::json;

/// Builds a datastore over the given transport with every test model
/// registered and `http://localhost:8080` as base URL.
pub fn datastore(transport: &MockTransport) -> Datastore {
    init_tracing();

    let mut builder = Datastore::builder();
    builder
        .register::<models::Author>()
        .register::<models::Book>()
        .register::<models::Chapter>()
        .base_url("http://localhost:8080");

    builder.build(transport.clone()).unwrap()
}

/// Installs a `RUST_LOG`-driven subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `authors/1` with one book (`books/9`) side-loaded, which points back at
/// its author.
pub fn author_with_books() -> serde_json::Value {
    json!({
        "data": [{
            "type": "authors",
            "id": "1",
            "attributes": {"name": "A", "dob": "1970-01-02"},
            "relationships": {
                "books": {"data": [{"type": "books", "id": "9"}]}
            }
        }],
        "included": [{
            "type": "books",
            "id": "9",
            "attributes": {"title": "T", "date_published": "2001-05-06T00:00:00Z"},
            "relationships": {
                "author": {"data": {"type": "authors", "id": "1"}}
            }
        }]
    })
}
