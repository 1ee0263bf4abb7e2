//! Ports to external collaborators

pub mod photo_store;

pub use photo_store::{PhotoStore, PhotoUpload, UploadedPhoto};

#[cfg(test)]
pub use photo_store::MockPhotoStore;
