//! Archive decoders feeding the extraction engine.

pub mod tar;

pub use self::tar::TarEntries;
