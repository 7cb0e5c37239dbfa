//! V001: usage intervals and the per-triple score cache.

pub const MIGRATION_SQL: &str = r#"
-- One row per usage interval. end IS NULL marks the interval still open;
-- start = end marks an instantaneous access.
CREATE TABLE IF NOT EXISTS ResourceEvent (
    usedActivity TEXT NOT NULL,
    initiatingAgent TEXT NOT NULL,
    targettedResource TEXT NOT NULL,
    start INTEGER NOT NULL,
    end INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_resource_event_triple
    ON ResourceEvent(usedActivity, initiatingAgent, targettedResource, start);
CREATE INDEX IF NOT EXISTS idx_resource_event_end
    ON ResourceEvent(end);

-- Decayed score per triple. lastUpdate = -1 means never computed.
CREATE TABLE IF NOT EXISTS ResourceScoreCache (
    usedActivity TEXT NOT NULL,
    initiatingAgent TEXT NOT NULL,
    targettedResource TEXT NOT NULL,
    scoreType INTEGER NOT NULL DEFAULT 0,
    cachedScore REAL NOT NULL DEFAULT 0,
    firstUpdate INTEGER NOT NULL,
    lastUpdate INTEGER NOT NULL,
    PRIMARY KEY (usedActivity, initiatingAgent, targettedResource)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_score_cache_score
    ON ResourceScoreCache(cachedScore DESC);
"#;
