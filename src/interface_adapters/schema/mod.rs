// Wire message definitions for both encodings.

pub mod envelope;
pub mod table;
