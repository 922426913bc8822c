pub mod assets;
pub mod contact;
pub mod landing;
