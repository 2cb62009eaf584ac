//! Structured identifier extraction
//!
//! Single-pattern extractors for the identifiers that show up next to names
//! in legal records: statute references, Indian mobile numbers, e-mail
//! addresses, PAN/GSTIN tax ids, passport numbers and bank details. Every
//! extractor returns a sorted list without duplicates, except address
//! blocks, which keep document order.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use lexent_core::{LexentError, Result};

/// Words that must precede a mobile number for it to count
const MOBILE_CONTEXT: &[&str] = &["mobile", "contact", "phone", "cell", "tel"];

/// Characters inspected before a mobile number for a context word
const MOBILE_CONTEXT_CHARS: usize = 50;

const EMAIL_TLDS: &[&str] = &["com", "in", "net", "org", "co", "gov", "edu", "biz"];

const MIN_ACCOUNT_DIGITS: usize = 11;

/// Every identifier found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierReport {
    pub acts_and_sections: Vec<String>,
    pub mobile_numbers: Vec<String>,
    pub emails: Vec<String>,
    pub pans: Vec<String>,
    pub gstins: Vec<String>,
    pub passports: Vec<String>,
    pub bank_accounts: Vec<String>,
    pub ifsc_codes: Vec<String>,
    pub addresses: Vec<AddressComponents>,
}

/// Components parsed from one "Address:" block; the first match of each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    pub house_number: Option<String>,
    pub building: Option<String>,
    pub landmark: Option<String>,
    pub street: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
}

impl AddressComponents {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }

    /// Component names and values, in display order
    pub fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("house_number", self.house_number.as_deref()),
            ("building", self.building.as_deref()),
            ("landmark", self.landmark.as_deref()),
            ("street", self.street.as_deref()),
            ("pincode", self.pincode.as_deref()),
            ("country", self.country.as_deref()),
        ]
    }
}

/// Compiled identifier patterns
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    section: Regex,
    mobile: Regex,
    email: Regex,
    pan: Regex,
    gstin: Regex,
    passport: Regex,
    ifsc: Regex,
    account: Regex,
    address_block: Regex,
    house_number: Regex,
    building: Regex,
    landmark: Regex,
    street: Regex,
    pincode: Regex,
    country: Regex,
}

impl IdentifierExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            section: compile(
                r"\b[Ss]ection\s+(\d+[A-Z]?(?:\(\w+\))?)\s+(?:of|under)\s+(?:the\s+)?((?:[A-Z][\w&/.-]*\s+){1,8}?)(Act|Code|Regulation|Amendment|Rules)\b(?:,?\s*(\d{4})\b)?",
            )?,
            mobile: compile(r"(?:(?:\+91|91|0)[-\s]*)?([6-9]\d{4}[-\s]?\d{5})\b")?,
            email: compile(r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\b")?,
            pan: compile(r"\b[A-Z]{5}[0-9]{4}[A-Z]\b")?,
            gstin: compile(r"\b\d{2}[A-Z]{5}\d{4}[A-Z][A-Z\d]Z[A-Z\d]\b")?,
            passport: compile(r"\b(?:Passport\s*[:\-]?\s*)?([A-PR-WYa-pr-wy][1-9]\d{6})\b")?,
            ifsc: compile(r"\b[A-Z]{4}0[A-Z0-9]{6}\b")?,
            account: compile(r"\b\d{9,18}\b")?,
            // Up to the next blank line or the end of the text
            address_block: compile(r"(?s)\bAddress[ \t]*:\s*(.*?)(?:\n[ \t]*\n|\z)")?,
            house_number: compile(
                r"(?i)\b(?:(?:flat|house|plot|shop|door)[ \t]*no|h\.?[ \t]*no|bungalow(?:[ \t]*no)?)\.?[ \t]*[:\-]?[ \t]*[\w/-]+|\b[A-Z]-\d{1,4}\b",
            )?,
            building: compile(
                r"\b(?:(?i:near|opp\.?|opposite|behind|beside)[ \t]+)?((?:[A-Z][\w&'-]*[ \t]+){1,4}(?:Towers|Residency|Apartments?|Heights|Court|Complex)\b)",
            )?,
            landmark: compile(
                r"\b(?i:near|opp\.?|opposite|behind|beside)[ \t]+[A-Z][\w&.'-]*(?:[ \t]+[A-Z][\w&.'-]*)*",
            )?,
            street: compile(
                r"\b(?:(?i:near|opp\.?|opposite|behind|beside)[ \t]+)?((?:[A-Z][\w.'-]*[ \t]+){1,4}(?:Road|Street|Lane|Marg)\b)",
            )?,
            pincode: compile(r"\b[1-9]\d{5}\b")?,
            country: compile(r"\bIndia\b")?,
        })
    }

    /// Run every extractor over `text`
    pub fn extract_all(&self, text: &str) -> IdentifierReport {
        let (pans, gstins) = self.pan_and_gstin(text);
        let (bank_accounts, ifsc_codes) = self.bank_details(text);

        IdentifierReport {
            acts_and_sections: self.acts_and_sections(text),
            mobile_numbers: self.mobile_numbers(text),
            emails: self.emails(text),
            pans,
            gstins,
            passports: self.passport_numbers(text),
            bank_accounts,
            ifsc_codes,
            addresses: self.addresses(text),
        }
    }

    /// Statute references rendered as "Section N of Name Act YYYY"
    pub fn acts_and_sections(&self, text: &str) -> Vec<String> {
        let found = self.section.captures_iter(text).map(|caps| {
            let mut parts = vec![
                "Section".to_string(),
                caps[1].to_string(),
                "of".to_string(),
                caps[2].split_whitespace().collect::<Vec<_>>().join(" "),
                caps[3].to_string(),
            ];
            if let Some(year) = caps.get(4) {
                parts.push(year.as_str().to_string());
            }
            parts.join(" ")
        });
        sorted(found)
    }

    /// Indian mobile numbers introduced by a context word, as 10 digits
    pub fn mobile_numbers(&self, text: &str) -> Vec<String> {
        let found = self.mobile.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            let before = &text[..whole.start()];

            // Tail of a longer digit run
            if before.chars().next_back().is_some_and(|c| c.is_ascii_digit()) {
                return None;
            }

            let context: String = before
                .chars()
                .rev()
                .take(MOBILE_CONTEXT_CHARS)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<String>()
                .to_lowercase();
            if !MOBILE_CONTEXT.iter().any(|word| context.contains(word)) {
                return None;
            }

            let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
            (digits.len() == 10).then_some(digits)
        });
        sorted(found)
    }

    /// E-mail addresses on the accepted top-level domains
    pub fn emails(&self, text: &str) -> Vec<String> {
        let found = self
            .email
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|email| {
                email
                    .rsplit('.')
                    .next()
                    .is_some_and(|tld| EMAIL_TLDS.contains(&tld.to_lowercase().as_str()))
            });
        sorted(found)
    }

    /// PANs and GSTINs; a PAN already inside a found GSTIN is dropped
    pub fn pan_and_gstin(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let gstins = sorted(self.gstin.find_iter(text).map(|m| m.as_str().to_string()));
        let pans = sorted(
            self.pan
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .filter(|pan| !gstins.iter().any(|gstin| gstin.contains(pan.as_str()))),
        );
        (pans, gstins)
    }

    /// Passport numbers, uppercased
    pub fn passport_numbers(&self, text: &str) -> Vec<String> {
        sorted(
            self.passport
                .captures_iter(text)
                .map(|caps| caps[1].to_uppercase()),
        )
    }

    /// Bank account numbers and IFSC codes
    ///
    /// Accounts are digit runs of 11 to 18 digits that are not a detected
    /// mobile number.
    pub fn bank_details(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let mobiles = self.mobile_numbers(text);
        let accounts = sorted(
            self.account
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .filter(|acc| acc.len() >= MIN_ACCOUNT_DIGITS && !mobiles.contains(acc)),
        );
        let ifsc = sorted(self.ifsc.find_iter(text).map(|m| m.as_str().to_string()));
        (accounts, ifsc)
    }

    /// Components of every "Address:" block that yields at least one
    pub fn addresses(&self, text: &str) -> Vec<AddressComponents> {
        self.address_block
            .captures_iter(text)
            .map(|caps| self.address_components(caps[1].trim()))
            .filter(|address| !address.is_empty())
            .collect()
    }

    /// Parse one address block
    pub fn address_components(&self, block: &str) -> AddressComponents {
        AddressComponents {
            house_number: first_match(&self.house_number, block),
            building: first_group(&self.building, block),
            landmark: first_match(&self.landmark, block),
            street: first_group(&self.street, block),
            pincode: first_match(&self.pincode, block),
            country: first_match(&self.country, block),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| LexentError::Other(e.into()))
}

fn first_match(regex: &Regex, text: &str) -> Option<String> {
    regex.find(text).and_then(|m| component(m.as_str()))
}

fn first_group(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| component(m.as_str()))
}

fn component(text: &str) -> Option<String> {
    let text = text.trim().trim_end_matches(['.', ',', '-']);
    (!text.is_empty()).then(|| text.to_string())
}

fn sorted(items: impl Iterator<Item = String>) -> Vec<String> {
    items.collect::<BTreeSet<_>>().into_iter().collect()
}
