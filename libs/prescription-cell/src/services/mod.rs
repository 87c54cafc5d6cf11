pub mod cascade;
pub mod prescribing;
