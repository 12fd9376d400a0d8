//! Wire encodings for bucket properties
//!
//! - `compact`: protocol buffers record (`n_val`, `allow_mult` only)
//! - `frame`: length-prefixed framing for the compact protocol
//! - `rest`: JSON body of the REST interface (every setting)

pub mod compact;
pub mod frame;
pub mod rest;

pub use compact::{from_compact_record, to_compact_record, CompactRecord};
pub use frame::{decode_frame, encode_frame, Frame, MessageCode};
pub use rest::{parse_from_response, to_json, RestResponse, JSON_CONTENT_TYPE};
