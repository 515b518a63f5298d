pub mod callback;
pub mod health;
pub mod pages;
pub mod root;
