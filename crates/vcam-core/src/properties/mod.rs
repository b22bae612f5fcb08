//! Properties module containing the `.properties` text codec.
//!
//! The external hooking module reads the settings file with a stock
//! Java-style properties loader, so the file written here must follow that
//! grammar exactly.  See [`codec`] for the accepted syntax.

pub mod codec;

pub use codec::{decode_latin1, parse_properties, store_properties, Properties, PropertiesError};
