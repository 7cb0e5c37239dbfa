//! V002: resources explicitly linked to an activity.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ResourceLink (
    usedActivity TEXT NOT NULL,
    initiatingAgent TEXT NOT NULL,
    targettedResource TEXT NOT NULL,
    PRIMARY KEY (usedActivity, initiatingAgent, targettedResource)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_resource_link_activity
    ON ResourceLink(usedActivity);
"#;
