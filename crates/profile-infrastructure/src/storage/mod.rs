//! Photo storage adapters

pub mod cloudinary;

pub use cloudinary::CloudinaryPhotoStore;
