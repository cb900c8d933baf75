/// Reference catalog of (disease, symptoms, cure) records.
///
/// Loaded once at startup from a header-less three-column CSV file and shared read-only
/// afterwards. Malformed rows fail the load with the offending line number rather than
/// being skipped.
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::AppError;
use crate::model::CatalogRecord;

const FIELD_NAMES: [&str; 3] = ["disease_name", "symptoms", "cure"];

/// Non-empty, immutable, ordered set of catalog records.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[CatalogRecord]>,
}

impl Catalog {
    pub fn new(records: Vec<CatalogRecord>) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::EmptyCatalog);
        }
        Ok(Self {
            records: records.into(),
        })
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Symptom descriptions in catalog order, as fed to the embedder.
    pub fn symptom_texts(&self) -> Vec<String> {
        self.records.iter().map(|r| r.symptoms.clone()).collect()
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::Config(format!("failed to read {}: {e}", path.display())))?;
    parse_catalog(file)
}

pub fn parse_catalog<R: Read>(reader: R) -> Result<Catalog, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(|e| AppError::CatalogLoad {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        if row.len() != FIELD_NAMES.len() {
            return Err(AppError::CatalogLoad {
                line,
                message: format!("expected 3 fields, found {}", row.len()),
            });
        }
        for (value, name) in row.iter().zip(FIELD_NAMES) {
            if value.is_empty() {
                return Err(AppError::CatalogLoad {
                    line,
                    message: format!("empty {name}"),
                });
            }
        }

        records.push(CatalogRecord {
            disease_name: row[0].to_string(),
            symptoms: row[1].to_string(),
            cure: row[2].to_string(),
        });
    }

    Catalog::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted_fields() {
        let content = r#"Common Cold,"fever, cough, sore throat",rest and fluids
Migraine,"throbbing headache, nausea, light sensitivity","Rest in a dark room, stay hydrated"
"#;
        let catalog = parse_catalog(content.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let cold = &catalog.records()[0];
        assert_eq!(cold.disease_name, "Common Cold");
        assert_eq!(cold.symptoms, "fever, cough, sore throat");
        assert_eq!(cold.cure, "rest and fluids");
        assert_eq!(
            catalog.records()[1].cure,
            "Rest in a dark room, stay hydrated"
        );
        assert_eq!(
            catalog.symptom_texts(),
            vec![
                "fever, cough, sore throat".to_string(),
                "throbbing headache, nausea, light sensitivity".to_string(),
            ]
        );
    }

    #[test]
    fn wrong_field_count_reports_line() {
        let content = "Common Cold,\"fever, cough\",rest\nFlu,fever\n";
        match parse_catalog(content.as_bytes()) {
            Err(AppError::CatalogLoad { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("found 2"), "{message}");
            }
            other => panic!("expected CatalogLoad, got {other:?}"),
        }
    }

    #[test]
    fn empty_field_is_rejected() {
        let content = "Common Cold,  ,rest and fluids\n";
        match parse_catalog(content.as_bytes()) {
            Err(AppError::CatalogLoad { line, message }) => {
                assert_eq!(line, 1);
                assert_eq!(message, "empty symptoms");
            }
            other => panic!("expected CatalogLoad, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let content: &[u8] = b"Cold,fever,rest\nFlu,\xff\xfe,sleep\n";
        assert!(matches!(
            parse_catalog(content),
            Err(AppError::CatalogLoad { .. })
        ));
    }

    #[test]
    fn empty_input_is_an_empty_catalog() {
        assert!(matches!(
            parse_catalog("".as_bytes()),
            Err(AppError::EmptyCatalog)
        ));
        assert!(matches!(Catalog::new(vec![]), Err(AppError::EmptyCatalog)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_catalog(Path::new("/nonexistent/carebot/catalog.csv")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn bundled_catalog_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/health_dataset.csv");
        let catalog = load_catalog(&path).expect("bundled catalog should parse");
        assert!(catalog.len() >= 10, "expected at least 10 records");
        assert!(catalog
            .records()
            .iter()
            .any(|r| r.disease_name == "Common Cold"));
    }
}
