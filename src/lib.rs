//! Maps syndicated feeds (RSS/Atom) into normalized records for a content
//! system: deterministic import identifiers, category resolution against a
//! configured mapping, and opportunistic mirroring of enclosure media.

pub mod categories;
pub mod config;
pub mod content;
pub mod feed;
pub mod http;
pub mod mapper;
pub mod media;
pub mod slug;
pub mod store;

pub use categories::{ImportLogger, TracingLogger};
pub use config::{CategoryMapping, RunContext, TaskConfiguration};
pub use feed::{FeedError, FeedItem};
pub use mapper::{FeedMapper, IMPORT_SOURCE, NormalizedRecord, RecordStore, RecordType};
pub use media::MediaAttachment;
pub use slug::{SlugGenerator, TitleSlugger};
pub use store::JsonlStore;
