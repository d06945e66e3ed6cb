//! Host adapters: façades over the collaborators spec.md §1 scopes out
//! of the core (PNG codec, MP4→H.264 extraction) plus the embedded
//! clear-image asset.

pub mod assets;
pub mod image;
pub mod mp4;
