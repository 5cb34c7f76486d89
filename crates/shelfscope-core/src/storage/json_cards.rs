use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Book;

/// Save a Book as a JSON file: `{cards_dir}/{id}.json`.
pub fn save_card(cards_dir: &Path, book: &Book) -> Result<PathBuf> {
    fs::create_dir_all(cards_dir)?;
    let path = cards_dir.join(format!("{}.json", book.id));
    let json = serde_json::to_string_pretty(book)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Load a single Book from a JSON file.
pub fn load_card(path: &Path) -> Result<Book> {
    let contents = fs::read_to_string(path)?;
    let book: Book = serde_json::from_str(&contents)?;
    Ok(book)
}

/// Load a Book by ID from the cards directory.
pub fn load_card_by_id(cards_dir: &Path, id: &uuid::Uuid) -> Result<Book> {
    let path = cards_dir.join(format!("{id}.json"));
    if !path.exists() {
        return Err(crate::error::ShelfscopeError::BookNotFound(id.to_string()));
    }
    load_card(&path)
}

/// Delete a Book JSON file by ID.
pub fn delete_card(cards_dir: &Path, id: &uuid::Uuid) -> Result<()> {
    let path = cards_dir.join(format!("{id}.json"));
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

/// List all Books in the cards directory. Unparseable files are skipped
/// with a warning so one bad card never hides the rest of the library.
pub fn list_cards(cards_dir: &Path) -> Result<Vec<Book>> {
    if !cards_dir.exists() {
        return Ok(Vec::new());
    }

    let mut books = Vec::new();
    for entry in fs::read_dir(cards_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            match load_card(&path) {
                Ok(book) => books.push(book),
                Err(e) => {
                    tracing::warn!(card = %path.display(), error = %e, "skipping invalid card");
                }
            }
        }
    }
    Ok(books)
}
