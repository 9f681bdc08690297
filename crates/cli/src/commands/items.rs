//! Pantry item inspection commands.

use pantry_tracker::store::{PantryItemRepository, PostgresDocumentStore};
use pantry_tracker_core::{UserId, filter_by_name};

use super::{CommandError, connect};

/// Print `user`'s items in store order, optionally filtered by name.
pub async fn list(user: &str, search: Option<&str>) -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = PostgresDocumentStore::new(pool);
    let user = UserId::new(user);
    let items = PantryItemRepository::new(&store, &user).list().await?;
    let shown = filter_by_name(&items, search.unwrap_or(""));

    #[allow(clippy::print_stdout)]
    {
        for item in &shown {
            println!(
                "{}\t{}\t{}\t{}",
                item.id, item.name, item.quantity, item.expiration_date
            );
        }
        println!("{} of {} items", shown.len(), items.len());
    }
    Ok(())
}
