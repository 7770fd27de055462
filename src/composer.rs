//! Formats an address as the reply note body.

use crate::geocoder::Address;

/// Labels in output order.
pub const LABELS: [&str; 12] = [
    "FormattedAddress",
    "Street",
    "HouseNumber",
    "Suburb",
    "Postcode",
    "State",
    "StateCode",
    "StateDistrict",
    "County",
    "Country",
    "CountryCode",
    "City",
];

/// Render one `Label: value` line per address field.
///
/// Empty fields still get their label line.
pub fn compose(address: &Address) -> String {
    let values = [
        &address.formatted_address,
        &address.street,
        &address.house_number,
        &address.suburb,
        &address.postcode,
        &address.state,
        &address.state_code,
        &address.state_district,
        &address.county,
        &address.country,
        &address.country_code,
        &address.city,
    ];

    LABELS
        .iter()
        .zip(values)
        .map(|(label, value)| format!("{}: {}\n", label, value))
        .collect()
}
