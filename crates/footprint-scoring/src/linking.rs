//! ResourceLinking: explicit resource-to-activity links.

use std::sync::Arc;

use footprint_core::constants::{TOKEN_CURRENT, TOKEN_GLOBAL};
use footprint_core::errors::RequestError;
use footprint_core::traits::ActivityProvider;
use footprint_core::types::ResourceTriple;
use footprint_storage::queries::resource_links;
use footprint_storage::DatabaseManager;

pub struct ResourceLinking {
    db: Arc<DatabaseManager>,
    activities: Arc<dyn ActivityProvider>,
}

impl ResourceLinking {
    pub fn new(db: Arc<DatabaseManager>, activities: Arc<dyn ActivityProvider>) -> Self {
        Self { db, activities }
    }

    /// Link `resource` to `activity`. Returns `false` if it was already linked.
    pub fn link(&self, agent: &str, resource: &str, activity: &str) -> Result<bool, RequestError> {
        let triple = self.triple(agent, resource, activity)?;
        let inserted = self
            .db
            .with_writer(|conn| resource_links::insert_link(conn, &triple))?;
        tracing::debug!(%triple, inserted, "resource linked");
        Ok(inserted)
    }

    /// Remove a link. Returns `false` if there was none.
    pub fn unlink(&self, agent: &str, resource: &str, activity: &str) -> Result<bool, RequestError> {
        let triple = self.triple(agent, resource, activity)?;
        let removed = self
            .db
            .with_writer(|conn| resource_links::delete_link(conn, &triple))?;
        tracing::debug!(%triple, removed, "resource unlinked");
        Ok(removed)
    }

    pub fn is_linked(&self, agent: &str, resource: &str, activity: &str) -> Result<bool, RequestError> {
        let triple = self.triple(agent, resource, activity)?;
        Ok(self
            .db
            .with_reader(|conn| resource_links::is_linked(conn, &triple))?)
    }

    /// Links stored for `activity`.
    pub fn linked_resources(&self, activity: &str) -> Result<Vec<ResourceTriple>, RequestError> {
        let activity = self.resolve_activity(activity)?;
        Ok(self
            .db
            .with_reader(|conn| resource_links::links_for_activity(conn, &activity))?)
    }

    fn triple(&self, agent: &str, resource: &str, activity: &str) -> Result<ResourceTriple, RequestError> {
        if resource.is_empty() {
            return Err(RequestError::InvalidArgument {
                name: "resource".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(ResourceTriple::new(
            self.resolve_activity(activity)?,
            agent,
            resource,
        ))
    }

    /// Empty and `:current` mean the current activity; `:global` is stored as
    /// the empty string. Anything else must be a known activity.
    fn resolve_activity(&self, activity: &str) -> Result<String, RequestError> {
        match activity {
            TOKEN_GLOBAL => Ok(String::new()),
            "" | TOKEN_CURRENT => {
                let current = self.activities.current_activity();
                if current.is_empty() {
                    Err(RequestError::UnknownActivity {
                        activity: TOKEN_CURRENT.to_string(),
                    })
                } else {
                    Ok(current)
                }
            }
            known if self.activities.is_known(known) => Ok(known.to_string()),
            unknown => Err(RequestError::UnknownActivity {
                activity: unknown.to_string(),
            }),
        }
    }
}
