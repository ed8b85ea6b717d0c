// src/models/mod.rs

pub mod appointment;
pub mod department;
pub mod doctor;
pub mod inventory;
pub mod medical_record;
pub mod patient;
pub mod user;
pub mod wire;

pub use appointment::*;
pub use department::*;
pub use doctor::*;
pub use inventory::*;
pub use medical_record::*;
pub use patient::*;
pub use user::*;
