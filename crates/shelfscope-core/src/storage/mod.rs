pub mod json_cards;
pub mod sessions;
