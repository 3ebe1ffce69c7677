pub mod search_link;
pub mod state;
