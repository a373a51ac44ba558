// Read Later state managers
// Managers own mutable state: the reading list and the title prompt.

pub mod list_repository;
pub mod title_prompt;
