mod lister;
mod mover;

pub use lister::DirectoryImageLister;
pub use mover::FsFileMover;
