use crate::error::{HousingError, Result};
use crate::models::Record;
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street_number: String,
    pub designator: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerAddressParts {
    pub address: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ParseStats {
    pub parsed: usize,
    pub malformed: usize,
    pub missing: usize,
}

/// Decompose `"<number> <street>, <city>"`.
///
/// The street number is everything before the first space, the city is
/// everything after the last comma and the designator is what lies between.
/// Internal whitespace of each part is left as is. An empty designator or
/// city makes the address malformed.
pub fn parse_property_address(address: &str) -> Result<ParsedAddress> {
    let trimmed = address.trim();
    let malformed = || HousingError::MalformedAddress(address.to_string());

    let first_space = trimmed.find(' ').ok_or_else(malformed)?;
    let last_comma = trimmed.rfind(',').ok_or_else(malformed)?;
    if first_space > last_comma {
        return Err(malformed());
    }

    let parsed = ParsedAddress {
        street_number: trimmed[..first_space].trim().to_string(),
        designator: trimmed[first_space + 1..last_comma].trim().to_string(),
        city: trimmed[last_comma + 1..].trim().to_string(),
    };
    if parsed.designator.is_empty() || parsed.city.is_empty() {
        return Err(malformed());
    }
    Ok(parsed)
}

/// Split `"<street>, <city>, <state>"`. Any other number of parts yields `None`.
pub fn split_owner_address(address: &str) -> Option<OwnerAddressParts> {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [address, city, state] => Some(OwnerAddressParts {
            address: address.to_string(),
            city: city.to_string(),
            state: state.to_string(),
        }),
        _ => None,
    }
}

pub struct AddressParser;

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressParser {
    pub fn new() -> Self {
        Self
    }

    /// Fill StreetNumber, Designator and City on every row. A malformed
    /// address only affects its own row.
    pub fn apply(&self, records: &mut [Record]) -> ParseStats {
        let mut stats = ParseStats::default();

        for record in records.iter_mut() {
            record.street_number = None;
            record.designator = None;
            record.city = None;
            record.address_malformed = false;

            let Some(address) = record.property_address.as_deref() else {
                debug!("UniqueID {}: no PropertyAddress to parse", record.unique_id);
                stats.missing += 1;
                continue;
            };

            match parse_property_address(address) {
                Ok(parsed) => {
                    record.street_number = Some(parsed.street_number);
                    record.designator = Some(parsed.designator);
                    record.city = Some(parsed.city);
                    stats.parsed += 1;
                }
                Err(e) => {
                    warn!("UniqueID {}: {}", record.unique_id, e);
                    record.address_malformed = true;
                    stats.malformed += 1;
                }
            }
        }

        info!(
            "Parsed {} addresses ({} malformed, {} missing)",
            stats.parsed, stats.malformed, stats.missing
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::FieldNormalizer;
    use crate::models::RawRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_well_formed_address() {
        let parsed = parse_property_address("123 Main St, Nashville").unwrap();
        assert_eq!(parsed.street_number, "123");
        assert_eq!(parsed.designator, "Main St");
        assert_eq!(parsed.city, "Nashville");
    }

    #[test]
    fn test_double_space_and_padding() {
        let parsed = parse_property_address("  1808  FOX CHASE DR,  GOODLETTSVILLE ").unwrap();
        assert_eq!(parsed.street_number, "1808");
        assert_eq!(parsed.designator, "FOX CHASE DR");
        assert_eq!(parsed.city, "GOODLETTSVILLE");
    }

    #[test]
    fn test_city_is_after_last_comma() {
        let parsed = parse_property_address("12 Oak Ct, Unit 4, Antioch").unwrap();
        assert_eq!(parsed.designator, "Oak Ct, Unit 4");
        assert_eq!(parsed.city, "Antioch");
    }

    #[test]
    fn test_malformed_addresses() {
        assert!(matches!(
            parse_property_address("Nashville"),
            Err(HousingError::MalformedAddress(_))
        ));
        assert!(parse_property_address("123 Main St Nashville").is_err());
        assert!(parse_property_address("123,Main St").is_err());
    }

    #[test]
    fn test_empty_parts_are_malformed() {
        assert!(matches!(
            parse_property_address("123 , Nashville"),
            Err(HousingError::MalformedAddress(_))
        ));
        assert!(parse_property_address("123 Main St,  ").is_err());
    }

    #[test]
    fn test_owner_address_split() {
        let parts = split_owner_address("1808  FOX CHASE DR, GOODLETTSVILLE, TN").unwrap();
        assert_eq!(parts.address, "1808  FOX CHASE DR");
        assert_eq!(parts.city, "GOODLETTSVILLE");
        assert_eq!(parts.state, "TN");
        assert_eq!(split_owner_address("1808 FOX CHASE DR, TN"), None);
    }

    #[test]
    fn test_apply_isolates_bad_rows() {
        let date = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap();
        let mut good = RawRecord::new(1, "P1", date);
        good.property_address = Some("10 Elm, Nashville".to_string());
        let mut bad = RawRecord::new(2, "P2", date);
        bad.property_address = Some("NO COMMA HERE".to_string());
        let missing = RawRecord::new(3, "P3", date);

        let (mut records, _) = FieldNormalizer::new().normalize(vec![good, bad, missing]);
        let stats = AddressParser::new().apply(&mut records);

        assert_eq!(stats, ParseStats { parsed: 1, malformed: 1, missing: 1 });
        assert_eq!(records[0].city.as_deref(), Some("Nashville"));
        assert!(records[1].address_malformed);
        assert_eq!(records[1].property_address.as_deref(), Some("NO COMMA HERE"));
        assert_eq!(records[1].designator, None);
        assert_eq!(records[1].city, None);
        assert!(!records[2].address_malformed);
    }
}
