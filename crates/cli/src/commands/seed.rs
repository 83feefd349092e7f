//! Seed the catalog with the default categories.
//!
//! Slugs that already exist are left alone, so the command can be re-run
//! safely after an admin has edited or added categories.

use luxe_backend::BackendClient;
use luxe_backend::rows::CategoryPayload;
use luxe_backend::tables::CategoryRepository;

use super::CliError;

/// Default categories as `(name, slug, description)`.
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Clothing", "clothing", "Fashion essentials"),
    ("Shoes", "shoes", "Step in style"),
    ("Electronics", "electronics", "Latest tech"),
    ("Writing Tools", "writing-tools", "Premium pens"),
    ("AI Robots", "ai-robots", "Smart companions"),
    ("Machines", "machines", "Power tools"),
];

/// Defaults whose slug is not in `existing`.
fn missing_categories(existing: &[String]) -> Vec<CategoryPayload> {
    DEFAULT_CATEGORIES
        .iter()
        .filter(|(_, slug, _)| !existing.iter().any(|s| s == slug))
        .map(|&(name, slug, description)| CategoryPayload {
            name: name.to_owned(),
            slug: slug.to_owned(),
            description: Some(description.to_owned()),
            image_url: None,
            is_active: true,
        })
        .collect()
}

/// Insert the default categories that are not there yet.
///
/// # Errors
///
/// Returns an error if the existing slugs cannot be read or the insert is
/// rejected.
pub async fn categories(client: &BackendClient) -> Result<usize, CliError> {
    let repo = CategoryRepository::new(client, None);
    let existing = repo
        .existing_slugs(DEFAULT_CATEGORIES.iter().map(|(_, slug, _)| slug))
        .await?;

    let missing = missing_categories(&existing);
    if missing.is_empty() {
        tracing::info!("All default categories already exist");
        return Ok(0);
    }

    let created = repo.create_many(&missing).await?;
    for row in &created {
        tracing::info!(slug = %row.slug, "Category created");
    }
    tracing::info!(
        created = created.len(),
        skipped = DEFAULT_CATEGORIES.len() - missing.len(),
        "Seeding complete"
    );
    Ok(created.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_backend_gets_all_defaults() {
        let missing = missing_categories(&[]);
        assert_eq!(missing.len(), 6);
        assert!(missing.iter().all(|c| c.is_active));
        assert_eq!(missing[3].name, "Writing Tools");
        assert_eq!(missing[3].slug, "writing-tools");
    }

    #[test]
    fn test_existing_slugs_are_skipped() {
        let existing = vec!["shoes".to_owned(), "machines".to_owned(), "garden".to_owned()];
        let slugs: Vec<String> = missing_categories(&existing)
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(slugs, ["clothing", "electronics", "writing-tools", "ai-robots"]);
    }

    #[test]
    fn test_default_slugs_match_their_names() {
        for (name, slug, _) in DEFAULT_CATEGORIES {
            assert_eq!(luxe_core::slug::slugify(name), *slug);
        }
    }
}
