mod controller;
mod error;
#[cfg(test)]
mod fakes;
mod ports;
mod state;
mod use_cases;

pub use controller::{SessionController, SessionPorts};
pub use error::ApplicationError;
pub use ports::{
    AnnotationReader, FileMover, Frame, ImageDecoder, ImageLister, Notice, RandomSource,
    Renderer, SnapshotStore,
};
pub use state::SessionState;
pub use use_cases::{DispatchOutcome, InitializeSessionCommand, SessionCommand, SessionOptions};
