use serde::{Deserialize, Serialize};

/// Configuration-sourced identity of a channel, established by a lineup
/// metadata line and shared by every stream URL that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub name: String,
    pub id: String,
    pub category: String,
}

/// A fully resolved channel: the lineup identity plus the metadata scraped
/// from the platform page. Immutable once appended to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub name: String,
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl ChannelRecord {
    pub fn new(
        identity: &ChannelIdentity,
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: identity.name.clone(),
            id: identity.id.clone(),
            category: identity.category.clone(),
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
        }
    }
}

/// Ordered, append-only collection of the channels resolved during one run.
///
/// Owned by the run orchestrator and passed mutably into each resolver call;
/// records come back out in resolver invocation order, which is also the
/// guide entry order.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    records: Vec<ChannelRecord>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ChannelRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ChannelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_insertion_order() {
        let identity = |name: &str| ChannelIdentity {
            name: name.to_string(),
            id: format!("{name}.example"),
            category: "News".to_string(),
        };

        let mut registry = ChannelRegistry::new();
        registry.push(ChannelRecord::new(&identity("first"), "", "", ""));
        registry.push(ChannelRecord::new(&identity("second"), "", "", ""));

        let names: Vec<_> = registry.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }
}
