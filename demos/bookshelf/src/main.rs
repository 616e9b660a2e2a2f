//! CLI demo for the bookshelf example.

use bookshelf::{Book, BookId, BookshelfAction, User, UserId, build_store, selectors};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Bookshelf Example ===\n");

    let store = build_store()?;

    let ada = User {
        id: UserId::new(),
        name: "ada".into(),
    };
    let books = vec![
        Book::shared(BookId::new(), "Dune".into()),
        Book::shared(BookId::new(), "The Dispossessed".into()),
        Book::owned_by(BookId::new(), "Ada's Reading List".into(), ada.id.clone()),
    ];
    store.dispatch(BookshelfAction::SetBooks { books })?;

    let visible = selectors::select_visible_books();

    println!("Visible while signed out:");
    for book in store.select(&visible)?.iter() {
        println!("  - {}", book.title);
    }

    println!("\nSigning in as {}...", ada.name);
    store.dispatch(BookshelfAction::SelectUser { user: ada })?;

    println!("Visible while signed in:");
    for book in store.select(&visible)?.iter() {
        println!("  - {}", book.title);
    }

    Ok(())
}
