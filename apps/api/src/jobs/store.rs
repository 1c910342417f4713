//! Persisted job artifact: one CSV file whose modification time is the freshness
//! signal. Writes go to a sibling temp file that is renamed over the target, so
//! readers see either the old table or the new one.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info};

use crate::jobs::classifier::{classify, Category};
use crate::jobs::models::{JobRecord, JobTable, Platform, DEFAULT_LOCATION, DEFAULT_SALARY};

pub const COL_PLATFORM: &str = "Platform";
pub const COL_TITLE: &str = "Job Title";
pub const COL_COMPANY: &str = "Company";
pub const COL_LOCATION: &str = "Location";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SALARY: &str = "Salary";
pub const COL_EXPERIENCE: &str = "Experience";
pub const COL_LINK: &str = "Job link";

/// Canonical schema, in write order.
pub const CANONICAL_COLUMNS: [&str; 8] = [
    COL_PLATFORM,
    COL_TITLE,
    COL_COMPANY,
    COL_LOCATION,
    COL_CATEGORY,
    COL_SALARY,
    COL_EXPERIENCE,
    COL_LINK,
];

/// Legacy column names and the canonical column they fold into.
const COLUMN_ALIASES: &[(&str, &str)] = &[("Job Link", COL_LINK)];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("artifact {} has no 'Job Title' column", .0.display())]
    MissingTitleColumn(PathBuf),
}

#[derive(Debug, Clone)]
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the artifact, `None` when it does not exist.
    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<JobTable, StoreError> {
        let file = std::fs::File::open(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let table = read_table(file, &self.path)?;
        debug!("Loaded {} jobs from {}", table.len(), self.path.display());
        Ok(table)
    }

    /// Replaces the artifact in full. On error the previous artifact is untouched.
    pub fn save(&self, table: &JobTable) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        write_table(tmp.as_file_mut(), table)?;
        tmp.as_file_mut().flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        info!("Persisted {} jobs to {}", table.len(), self.path.display());
        Ok(())
    }
}

fn write_table<W: Write>(writer: W, table: &JobTable) -> Result<(), StoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CANONICAL_COLUMNS)?;
    for record in &table.records {
        csv.write_record([
            record.source.as_str(),
            record.title.as_str(),
            record.company.as_str(),
            record.location.as_str(),
            record.category.as_str(),
            record.salary.as_str(),
            record.experience_level.as_str(),
            record.apply_url.as_str(),
        ])?;
    }
    csv.flush().map_err(|e| StoreError::Csv(e.into()))?;
    Ok(())
}

/// Reads any artifact whose headers are a superset, subset or legacy variant of
/// the canonical schema and folds it into canonical records.
fn read_table<R: std::io::Read>(reader: R, path: &Path) -> Result<JobTable, StoreError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: HashMap<String, usize> = csv
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect();

    if !columns.contains_key(COL_TITLE) {
        return Err(StoreError::MissingTitleColumn(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let cell = |name: &str| -> Option<String> {
            let canonical = columns
                .get(name)
                .and_then(|idx| row.get(*idx))
                .map(str::trim)
                .filter(|v| !v.is_empty());
            let alias = || {
                COLUMN_ALIASES
                    .iter()
                    .filter(|(_, target)| *target == name)
                    .find_map(|(legacy, _)| {
                        columns
                            .get(*legacy)
                            .and_then(|idx| row.get(*idx))
                            .map(str::trim)
                            .filter(|v| !v.is_empty())
                    })
            };
            canonical.or_else(alias).map(str::to_string)
        };

        let Some(title) = cell(COL_TITLE) else {
            continue;
        };
        let source = match cell(COL_PLATFORM).and_then(|p| p.parse::<Platform>().ok()) {
            Some(platform) => platform,
            // Artifacts predating the Platform column came from Internshala only.
            None => Platform::Internshala,
        };
        let category = cell(COL_CATEGORY)
            .and_then(|c| c.parse::<Category>().ok())
            .unwrap_or_else(|| classify(&title));

        records.push(JobRecord {
            source,
            category,
            company: cell(COL_COMPANY).unwrap_or_default(),
            location: cell(COL_LOCATION).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            salary: cell(COL_SALARY).unwrap_or_else(|| DEFAULT_SALARY.to_string()),
            experience_level: cell(COL_EXPERIENCE)
                .unwrap_or_else(|| source.default_experience().to_string()),
            apply_url: cell(COL_LINK).unwrap_or_default(),
            title,
        });
    }

    Ok(JobTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::{normalize, RawListing};
    use tempfile::TempDir;

    fn record(platform: Platform, title: &str, link: &str) -> JobRecord {
        normalize(
            platform,
            RawListing {
                title: Some(title.to_string()),
                company: Some("Initech".to_string()),
                apply_url: Some(link.to_string()),
                ..RawListing::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_save_then_load_preserves_schema_and_rows() {
        let dir = TempDir::new().unwrap();
        let store = JobStore::new(dir.path().join("data").join("jobs.csv"));
        let table = JobTable::new(vec![
            record(Platform::Internshala, "React Developer", "https://a/1"),
            record(Platform::FreshersWorld, "Data Analyst, Reporting", "https://b/2"),
        ]);

        store.save(&table).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, table);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let header = raw.lines().next().unwrap();
        assert_eq!(
            header,
            "Platform,Job Title,Company,Location,Category,Salary,Experience,Job link"
        );
    }

    #[test]
    fn test_save_overwrites_in_full() {
        let dir = TempDir::new().unwrap();
        let store = JobStore::new(dir.path().join("jobs.csv"));
        store
            .save(&JobTable::new(vec![
                record(Platform::Internshala, "One", ""),
                record(Platform::Internshala, "Two", ""),
            ]))
            .unwrap();
        store
            .save(&JobTable::new(vec![record(Platform::FreshersWorld, "Three", "")]))
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records[0].title, "Three");
        // No temp files left behind next to the artifact.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_modified_absent_then_present() {
        let dir = TempDir::new().unwrap();
        let store = JobStore::new(dir.path().join("jobs.csv"));
        assert!(store.modified().is_none());
        assert!(!store.exists());

        store.save(&JobTable::default()).unwrap();
        assert!(store.modified().is_some());
        assert!(store.exists());
    }

    #[test]
    fn test_legacy_link_column_is_reconciled() {
        let csv = "\
Platform,Job Title,Company,Location,Category,Salary,Experience,Job Link,Job link
Internshala,Java Developer,Acme,Pune,Software Development,10k,Fresher,https://legacy/1,
FreshersWorld,QA Engineer,Beta,Delhi,Quality Assurance,20k,1 Year,https://legacy/2,https://canonical/2
";
        let table = read_table(csv.as_bytes(), Path::new("jobs.csv")).unwrap();
        assert_eq!(table.records[0].apply_url, "https://legacy/1");
        assert_eq!(table.records[1].apply_url, "https://canonical/2");
    }

    #[test]
    fn test_missing_columns_get_defaults_and_category_is_recomputed() {
        let csv = "\
Job Title,Company,Job Link
Experienced DBA,Acme,https://x/1
,Ghost,https://x/2
";
        let table = read_table(csv.as_bytes(), Path::new("jobs.csv")).unwrap();
        assert_eq!(table.len(), 1);

        let job = &table.records[0];
        assert_eq!(job.category, Category::Database);
        assert_eq!(job.source, Platform::Internshala);
        assert_eq!(job.location, DEFAULT_LOCATION);
        assert_eq!(job.salary, DEFAULT_SALARY);
        assert_eq!(job.experience_level, "Fresher");
        assert_eq!(job.apply_url, "https://x/1");
    }

    #[test]
    fn test_artifact_without_title_column_is_rejected() {
        let err = read_table("Company\nAcme\n".as_bytes(), Path::new("jobs.csv")).unwrap_err();
        assert!(matches!(err, StoreError::MissingTitleColumn(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = JobStore::new(dir.path().join("nope.csv"));
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }
}
