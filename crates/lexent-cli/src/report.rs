//! Per-document output

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lexent_extractor::identifiers::IdentifierReport;
use lexent_extractor::EntitySet;

/// Everything extracted from one document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub document: String,
    pub extracted_at: DateTime<Utc>,
    pub entities: EntitySet,
    pub identifiers: IdentifierReport,
}

impl DocumentReport {
    pub fn new(document: impl Into<String>, entities: EntitySet, identifiers: IdentifierReport) -> Self {
        Self {
            document: document.into(),
            extracted_at: Utc::now(),
            entities,
            identifiers,
        }
    }
}

impl fmt::Display for DocumentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        writeln!(f, "{rule}")?;
        writeln!(f, "File: {}", self.document)?;
        writeln!(f, "{rule}")?;

        let ids = &self.identifiers;
        let sections: [(&str, &[String]); 10] = [
            ("Acts & Sections", ids.acts_and_sections.as_slice()),
            ("People", self.entities.people.as_slice()),
            ("Organizations", self.entities.organizations.as_slice()),
            ("Mobile Numbers", ids.mobile_numbers.as_slice()),
            ("Email IDs", ids.emails.as_slice()),
            ("PAN Numbers", ids.pans.as_slice()),
            ("GSTINs", ids.gstins.as_slice()),
            ("Passport Numbers", ids.passports.as_slice()),
            ("Account Numbers", ids.bank_accounts.as_slice()),
            ("IFSC Codes", ids.ifsc_codes.as_slice()),
        ];

        for (title, items) in sections {
            writeln!(f)?;
            writeln!(f, "{title} Found:")?;
            for item in items {
                writeln!(f, "- {item}")?;
            }
        }

        if ids.addresses.is_empty() {
            writeln!(f)?;
            writeln!(f, "No structured addresses found.")?;
        }
        for (i, address) in ids.addresses.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Address Block {}", i + 1)?;
            for (name, value) in address.fields() {
                writeln!(f, "- {name}: {}", value.unwrap_or("-"))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexent_extractor::identifiers::AddressComponents;

    fn report() -> DocumentReport {
        DocumentReport::new(
            "files/affidavit.txt",
            EntitySet {
                people: vec!["Anita Verma".to_string()],
                organizations: vec!["Tata Consultancy Services".to_string()],
            },
            IdentifierReport {
                mobile_numbers: vec!["9810033445".to_string()],
                addresses: vec![AddressComponents {
                    street: Some("Tower Road".to_string()),
                    pincode: Some("400001".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_text_layout() {
        let text = report().to_string();

        assert!(text.contains("File: files/affidavit.txt"));
        assert!(text.contains("People Found:\n- Anita Verma\n"));
        assert!(text.contains("Mobile Numbers Found:\n- 9810033445\n"));
        assert!(text.find("Acts & Sections").unwrap() < text.find("People").unwrap());
        assert!(text.find("Account Numbers").unwrap() < text.find("IFSC Codes").unwrap());
        assert!(text.contains("Address Block 1\n- house_number: -\n"));
        assert!(text.contains("- street: Tower Road\n- pincode: 400001\n"));
        assert!(!text.contains("No structured addresses found."));
    }

    #[test]
    fn test_text_without_addresses() {
        let report = DocumentReport::new("empty.txt", EntitySet::default(), IdentifierReport::default());
        assert!(report.to_string().ends_with("No structured addresses found.\n"));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(report()).unwrap();

        assert_eq!(value["document"], "files/affidavit.txt");
        assert_eq!(value["entities"]["people"][0], "Anita Verma");
        assert_eq!(value["identifiers"]["mobile_numbers"][0], "9810033445");
        assert!(value["extracted_at"].is_string());
        assert_eq!(value["identifiers"]["addresses"][0]["street"], "Tower Road");
        assert!(value["identifiers"]["addresses"][0]["landmark"].is_null());
    }
}
