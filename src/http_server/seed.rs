//! Startup documents
//!
//! A seed file is one JSON object with optional `datasources` and
//! `presentations` arrays. Data sources are stored exactly as given, so a
//! seed can carry absent or legacy settings.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::datasource::DataSourceRecord;
use crate::presentation::Presentation;

use super::datasource_routes::DatasourceState;
use super::errors::{ServerError, ServerResult};
use super::presentation_routes::PresentationState;

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub datasources: Vec<DataSourceRecord>,
    #[serde(default)]
    pub presentations: Vec<Presentation>,
}

impl SeedData {
    pub fn load(path: &Path) -> ServerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ServerError::Internal(format!("Failed to read seed file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| ServerError::BadRequest(format!("Invalid seed file {}: {}", path.display(), e)))
    }

    /// Moves every document into the stores
    pub fn install(self, datasources: &DatasourceState, presentations: &PresentationState) -> ServerResult<()> {
        for record in self.datasources {
            datasources.insert(record)?;
        }
        for presentation in self.presentations {
            presentations.store.create(presentation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_install_keeps_raw_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "datasources": [
                    {{"id": "ds_1", "name": "Warehouse", "type": "redshift",
                      "settings": {{"experiments": {{"table": "viewed"}}}}}}
                ],
                "presentations": [
                    {{"id": "pres_1", "organization": "org_1", "title": "Deck",
                      "dateCreated": "2024-01-01T00:00:00Z", "dateUpdated": "2024-01-01T00:00:00Z"}}
                ]
            }}"#
        )
        .unwrap();

        let datasources = DatasourceState::new();
        let presentations = PresentationState::new();
        SeedData::load(file.path())
            .unwrap()
            .install(&datasources, &presentations)
            .unwrap();

        let record = datasources.get("ds_1").unwrap();
        assert_eq!(record.settings.unwrap()["experiments"]["table"], "viewed");
        assert_eq!(presentations.store.get("pres_1").unwrap().title, "Deck");
    }

    #[test]
    fn test_empty_seed() {
        let seed: SeedData = serde_json::from_str("{}").unwrap();
        assert!(seed.datasources.is_empty());
        assert!(seed.presentations.is_empty());
    }
}
