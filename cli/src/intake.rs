//! Intake documents
//!
//! A TOML or YAML document keyed by field wire names, plus an optional
//! `files` list of attachment paths relative to the document. Each key
//! becomes one input event on the form.

use chrono::NaiveDate;
use rfp_intake::{Attachment, Field, FieldValue, FormController, ValueKind};
use std::path::{Path, PathBuf};

const FILES_KEY: &str = "files";

/// Untyped value as read from either document format.
#[derive(Debug, Clone, PartialEq)]
enum Raw {
    Null,
    Text(String),
    Integer(i64),
    List(Vec<Raw>),
    Unsupported(&'static str),
}

impl Raw {
    fn describe(&self) -> &'static str {
        match self {
            Raw::Null => "null",
            Raw::Text(_) => "string",
            Raw::Integer(_) => "integer",
            Raw::List(_) => "list",
            Raw::Unsupported(kind) => kind,
        }
    }
}

impl From<toml::Value> for Raw {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Raw::Text(s),
            toml::Value::Integer(n) => Raw::Integer(n),
            toml::Value::Datetime(d) => Raw::Text(d.to_string()),
            toml::Value::Array(items) => Raw::List(items.into_iter().map(Raw::from).collect()),
            toml::Value::Float(_) => Raw::Unsupported("float"),
            toml::Value::Boolean(_) => Raw::Unsupported("boolean"),
            toml::Value::Table(_) => Raw::Unsupported("table"),
        }
    }
}

impl From<serde_yaml::Value> for Raw {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Raw::Null,
            serde_yaml::Value::String(s) => Raw::Text(s),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Raw::Integer(i),
                None => Raw::Unsupported("float"),
            },
            serde_yaml::Value::Sequence(items) => Raw::List(items.into_iter().map(Raw::from).collect()),
            serde_yaml::Value::Bool(_) => Raw::Unsupported("boolean"),
            serde_yaml::Value::Mapping(_) => Raw::Unsupported("mapping"),
            serde_yaml::Value::Tagged(tagged) => Raw::from(tagged.value),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Intake {
    /// Field inputs in document order. Reference links are listed as plain
    /// strings so they can be created as options one by one.
    pub inputs: Vec<(Field, FieldValue)>,
    pub reference_links: Vec<String>,
    pub files: Vec<PathBuf>,
}

impl Intake {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml(&content, base)
        } else {
            Self::from_toml(&content, base)
        }
    }

    pub fn from_toml(content: &str, base: &Path) -> Result<Self, String> {
        let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
        Self::from_entries(table.into_iter().map(|(k, v)| (k, Raw::from(v))), base)
    }

    pub fn from_yaml(content: &str, base: &Path) -> Result<Self, String> {
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = key.as_str().ok_or("intake keys must be strings")?.to_string();
            entries.push((key, Raw::from(value)));
        }
        Self::from_entries(entries.into_iter(), base)
    }

    fn from_entries(entries: impl Iterator<Item = (String, Raw)>, base: &Path) -> Result<Self, String> {
        let mut intake = Intake::default();
        for (key, raw) in entries {
            if key == FILES_KEY {
                intake.files = strings(&key, raw)?.into_iter().map(|f| base.join(f)).collect();
                continue;
            }
            let field: Field = key.parse().map_err(|e: rfp_intake::FormError| e.to_string())?;
            if field == Field::ReferenceLinks {
                intake.reference_links = strings(&key, raw)?;
                continue;
            }
            intake.inputs.push((field, to_value(field, raw)?));
        }
        Ok(intake)
    }

    /// Replay the document onto `form` as input events and select the
    /// attachments, document files first.
    pub async fn apply<T>(
        &self,
        form: &mut FormController<T>,
        extra_files: &[PathBuf],
    ) -> Result<(), String> {
        for (field, value) in &self.inputs {
            form.set_field(*field, value.clone()).map_err(|e| e.to_string())?;
        }
        for link in &self.reference_links {
            form.add_reference_link(link).map_err(|e| e.to_string())?;
        }
        let mut attachments = Vec::new();
        for path in self.files.iter().chain(extra_files) {
            attachments.push(Attachment::from_path(path).await.map_err(|e| e.to_string())?);
        }
        form.select_files(attachments);
        Ok(())
    }
}

fn strings(key: &str, raw: Raw) -> Result<Vec<String>, String> {
    match raw {
        Raw::Null => Ok(Vec::new()),
        Raw::Text(s) => Ok(vec![s]),
        Raw::List(items) => items
            .into_iter()
            .map(|item| match item {
                Raw::Text(s) => Ok(s),
                other => Err(format!("{} entries must be strings, got {}", key, other.describe())),
            })
            .collect(),
        other => Err(format!("{} must be a list of strings, got {}", key, other.describe())),
    }
}

fn to_value(field: Field, raw: Raw) -> Result<FieldValue, String> {
    match (field.kind(), raw) {
        (ValueKind::Text, Raw::Null) => Ok(FieldValue::text("")),
        (ValueKind::Text, Raw::Text(s)) => Ok(FieldValue::Text(s)),
        (ValueKind::Date, Raw::Null) => Ok(FieldValue::Date(None)),
        (ValueKind::Date, Raw::Text(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(FieldValue::date)
            .map_err(|e| format!("{}: invalid date {:?}: {}", field, s, e)),
        (ValueKind::Number, Raw::Null) => Ok(FieldValue::Number(None)),
        (ValueKind::Number, Raw::Integer(n)) => u32::try_from(n)
            .map(FieldValue::number)
            .map_err(|_| format!("{}: {} is out of range", field, n)),
        (ValueKind::Number, Raw::Text(s)) => s
            .trim()
            .parse::<u32>()
            .map(FieldValue::number)
            .map_err(|e| format!("{}: invalid number {:?}: {}", field, s, e)),
        (kind, raw) => Err(format!("{} expects a {} value, got {}", field, kind, raw.describe())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_INTAKE: &str = r#"
accountManager = "Aditya"
emailAddress = "a@b.com"
clientName = "Acme"
dateOfProposalSubmission = 2024-01-01
estimate = "Actual"
locationOfProject = "Dubai"
typeOfProject = "Rental/Event"
eventDate = "2024-02-10"
eventDuration = 3
hardwarePurchase = "No Hardware Required"
technicalSupport = "Not required"
presentation = "No"
sow = "Build a stage"
referenceLinks = ["http://example.com", "http://example.org"]
files = ["brief.pdf"]
"#;

    #[test]
    fn test_toml_intake() {
        let intake = Intake::from_toml(TOML_INTAKE, Path::new("/work")).unwrap();

        assert_eq!(intake.inputs.len(), 13);
        assert!(intake.inputs.contains(&(
            Field::DateOfProposalSubmission,
            FieldValue::date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        )));
        assert!(intake.inputs.contains(&(Field::EventDuration, FieldValue::number(3))));
        assert_eq!(intake.reference_links, vec!["http://example.com", "http://example.org"]);
        assert_eq!(intake.files, vec![PathBuf::from("/work/brief.pdf")]);
    }

    #[test]
    fn test_yaml_intake() {
        let yaml = "clientName: Acme\neventDate: null\neventDuration: \"2\"\nreferenceLinks: http://example.com\n";
        let intake = Intake::from_yaml(yaml, Path::new("")).unwrap();

        assert_eq!(
            intake.inputs,
            vec![
                (Field::ClientName, FieldValue::text("Acme")),
                (Field::EventDate, FieldValue::Date(None)),
                (Field::EventDuration, FieldValue::number(2)),
            ]
        );
        assert_eq!(intake.reference_links, vec!["http://example.com"]);
    }

    #[test]
    fn test_inputs_keep_document_order() {
        let toml = "sow = \"Stage\"\nclientName = \"Acme\"\naccountManager = \"Aditya\"\n";
        let yaml = "sow: Stage\nclientName: Acme\naccountManager: Aditya\n";
        let expected = vec![Field::Sow, Field::ClientName, Field::AccountManager];

        for intake in [
            Intake::from_toml(toml, Path::new("")).unwrap(),
            Intake::from_yaml(yaml, Path::new("")).unwrap(),
        ] {
            let fields: Vec<Field> = intake.inputs.iter().map(|(f, _)| *f).collect();
            assert_eq!(fields, expected);
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Intake::from_toml("scopeOfWork = \"x\"", Path::new("")).unwrap_err();
        assert!(err.contains("scopeOfWork"));
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let err = Intake::from_toml("eventDuration = -1", Path::new("")).unwrap_err();
        assert!(err.contains("out of range"));

        let err = Intake::from_toml("clientName = 5", Path::new("")).unwrap_err();
        assert!(err.contains("expects a text value"));

        let err = Intake::from_yaml("dateOfProposalSubmission: 01/02/2024", Path::new("")).unwrap_err();
        assert!(err.contains("invalid date"));
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("intake.yml");
        std::fs::write(&yaml, "clientName: Acme\nfiles: [deck.pdf]\n").unwrap();

        let intake = Intake::load(&yaml).unwrap();
        assert_eq!(intake.inputs, vec![(Field::ClientName, FieldValue::text("Acme"))]);
        assert_eq!(intake.files, vec![dir.path().join("deck.pdf")]);
    }
}
