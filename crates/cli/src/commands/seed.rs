//! Seed a user's pantry with sample items.

use chrono::{Days, Local};

use pantry_tracker::store::{PantryItemRepository, PostgresDocumentStore};
use pantry_tracker_core::{ItemFields, UserId};

use super::{CommandError, connect};

/// Sample items: name, quantity, days until expiry.
const SAMPLE_ITEMS: &[(&str, u32, u64)] = &[
    ("Milk", 2, 5),
    ("Eggs", 12, 14),
    ("Spinach", 1, 2),
    ("Rice", 1, 365),
    ("Canned tomatoes", 4, 540),
];

/// Insert the sample items into `user`'s collection.
///
/// # Returns
///
/// The number of items inserted.
pub async fn sample_items(user: &str) -> Result<usize, CommandError> {
    let pool = connect().await?;
    let store = PostgresDocumentStore::new(pool);
    let user = UserId::new(user);
    let repo = PantryItemRepository::new(&store, &user);
    let today = Local::now().date_naive();

    let mut inserted = 0;
    for &(name, quantity, days) in SAMPLE_ITEMS {
        let expiration_date = today.checked_add_days(Days::new(days)).unwrap_or(today);
        let item = repo
            .insert(ItemFields {
                name: name.to_string(),
                quantity,
                expiration_date,
            })
            .await?;
        tracing::info!(item_id = %item.id, name = %item.name, "Seeded item");
        inserted += 1;
    }

    tracing::info!(
        user_id = %user,
        collection = %repo.collection(),
        count = inserted,
        "Seeding complete!"
    );
    Ok(inserted)
}
