pub mod health;
pub mod members;
