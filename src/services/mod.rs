// Read-only catalogue of services offered by the garage.
// Documents are created out-of-band, straight in the datastore.

pub mod handlers;

pub use handlers::*;
