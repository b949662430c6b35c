//! Turns documents into connected resource graphs and resources back into
//! request bodies.

mod decode;
pub(crate) use decode::Decoder;

mod diff;
pub(crate) use diff::{backfill_inverse, build_request_body};

mod resolve;
