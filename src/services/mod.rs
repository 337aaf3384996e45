pub mod hashing;
pub mod key_manager;
pub mod signature;
pub mod signing_service;
pub mod verification_service;
pub mod archival_service;

pub use signing_service::SigningService;
pub use verification_service::VerificationService;
pub use archival_service::ArchivalService;
