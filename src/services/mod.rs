mod applier;
mod synthesizer;

pub use applier::{ApplierService, ConfigApplier, LoggingApplier};
pub use synthesizer::{SyncRequest, SynthesizerService};
