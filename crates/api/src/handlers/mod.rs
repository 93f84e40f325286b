pub mod auth;
pub mod campaigns;
pub mod characters;
pub mod encounters;
pub mod projects;
