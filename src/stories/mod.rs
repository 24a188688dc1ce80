//! The stories shipped with the crate.

pub mod spring_hook;

use crate::story::{StoryCatalog, StoryError};

/// Register every bundled story with `catalog`.
pub fn register_all(catalog: &mut StoryCatalog) -> Result<(), StoryError> {
    catalog.add(spring_hook::NAME, spring_hook::spring_hook)?;
    Ok(())
}
