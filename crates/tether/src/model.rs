use crate::Resource;

use tether_core::schema;

/// A typed view over resources of one type.
///
/// Implementations wrap a [`Resource`] handle and expose accessors for its
/// attributes and relations.
pub trait Model: Sized {
    /// The JSON:API `type` of the resource.
    const TYPE: &'static str;

    /// Declaration registered with the datastore.
    fn schema() -> schema::Model;

    fn from_resource(resource: Resource) -> Self;

    fn as_resource(&self) -> &Resource;
}
