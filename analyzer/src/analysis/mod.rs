pub mod agreement;
pub mod sensitivity;
