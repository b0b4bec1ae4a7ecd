pub mod capture;
pub mod check;
pub mod new;
pub mod verify;
