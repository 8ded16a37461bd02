//! Catalog-backed search collaborator.
//!
//! The catalog is a JSON array of [`WsiRecord`]s loaded once at startup.
//! Matching is a case-insensitive substring scan over path and description,
//! preferring path hits, which is all a local stand-in for the remote search
//! service needs.

use std::fs;
use std::path::Path;

use super::{SearchBackend, SearchError, WsiRecord};

/// Searchable, in-memory slide catalog.
pub struct CatalogBackend {
	records: Vec<WsiRecord>,
}

impl CatalogBackend {
	/// Load a catalog from a JSON file.
	pub fn load(path: &Path) -> Result<Self, SearchError> {
		let text = fs::read_to_string(path)
			.map_err(|err| SearchError::Backend(format!("reading {}: {err}", path.display())))?;
		let records: Vec<WsiRecord> = serde_json::from_str(&text)
			.map_err(|err| SearchError::Backend(format!("parsing {}: {err}", path.display())))?;
		log::info!("loaded {} slide records from {}", records.len(), path.display());
		Ok(Self { records })
	}

	/// Build a catalog from already-loaded records.
	#[must_use]
	pub fn from_records(records: Vec<WsiRecord>) -> Self {
		Self { records }
	}

	/// Number of records in the catalog.
	#[must_use]
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Whether the catalog holds no records.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

impl SearchBackend for CatalogBackend {
	fn search(&self, query: &str, _boundary_text: &str) -> Result<WsiRecord, SearchError> {
		let needle = query.trim().to_lowercase();
		if needle.is_empty() {
			return Err(SearchError::NoMatch(query.to_string()));
		}

		let path_hit = self
			.records
			.iter()
			.find(|record| record.path.to_lowercase().contains(&needle));
		let description_hit = || {
			self.records.iter().find(|record| {
				record
					.description
					.as_ref()
					.is_some_and(|d| d.to_lowercase().contains(&needle))
			})
		};

		path_hit
			.or_else(description_hit)
			.cloned()
			.ok_or_else(|| SearchError::NoMatch(query.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	fn sample() -> CatalogBackend {
		CatalogBackend::from_records(vec![
			WsiRecord {
				path: "slides/liver_001.svs".into(),
				description: Some("Liver biopsy, H&E stain".into()),
				width: Some(98_304),
				height: Some(65_536),
			},
			WsiRecord {
				path: "slides/kidney_002.svs".into(),
				description: Some("Kidney section, CD34".into()),
				width: None,
				height: None,
			},
		])
	}

	#[test]
	fn path_matches_win_over_description_matches() {
		let record = sample().search("kidney", "[0,0,1,1]").expect("match");
		assert_eq!(record.path, "slides/kidney_002.svs");
	}

	#[test]
	fn description_is_searched_when_no_path_matches() {
		let record = sample().search("cd34", "ignored").expect("match");
		assert_eq!(record.path, "slides/kidney_002.svs");
	}

	#[test]
	fn unmatched_and_empty_queries_fail() {
		assert!(matches!(
			sample().search("pancreas", ""),
			Err(SearchError::NoMatch(_))
		));
		assert!(matches!(
			sample().search("   ", ""),
			Err(SearchError::NoMatch(_))
		));
	}

	#[test]
	fn catalog_loads_from_json_file() {
		let mut file = tempfile::NamedTempFile::new().expect("temp file");
		write!(
			file,
			r#"[{{"path": "slides/a.svs", "description": "first"}}, {{"path": "slides/b.svs"}}]"#
		)
		.expect("write catalog");

		let catalog = CatalogBackend::load(file.path()).expect("well-formed catalog");
		assert_eq!(catalog.len(), 2);
		let record = catalog.search("b.svs", "").expect("match");
		assert_eq!(record.path, "slides/b.svs");
		assert_eq!(record.description, None);
	}

	#[test]
	fn malformed_catalog_reports_backend_error() {
		let mut file = tempfile::NamedTempFile::new().expect("temp file");
		write!(file, "not a catalog").expect("write");
		assert!(matches!(
			CatalogBackend::load(file.path()),
			Err(SearchError::Backend(_))
		));
	}
}
