pub mod record;
pub mod snapshot;
pub mod source;
pub mod track;

pub use record::RawTrackRecord;
pub use snapshot::{ErrorKind, ErrorRecord, OutputSnapshot};
pub use source::SourceType;
pub use track::{SourcePosition, UniqueTrack};
